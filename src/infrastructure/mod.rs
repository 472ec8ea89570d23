//! Infrastructure layer: everything that touches the outside world.

pub mod persistence;
