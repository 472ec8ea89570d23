//! Short code generation, secret minting, and input validation.

use crate::error::AppError;
use base64::Engine as _;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Alphabet for generated codes: digits, then lowercase, then uppercase.
///
/// Codes minted from this set are case sensitive; `aB3` and `Ab3` are
/// distinct links.
pub const CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a randomly generated code.
pub const GENERATED_CODE_LEN: usize = 7;

/// How many random codes the assignment protocol will try before giving up.
pub const MAX_GENERATION_ATTEMPTS: u32 = 5;

/// Length of random bytes behind a deletion secret, before base64 encoding.
const SECRET_LENGTH_BYTES: usize = 9;

/// Custom codes: 3 to 64 characters from `[0-9a-zA-Z_-]`.
static CUSTOM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z_-]{3,64}$").unwrap());

/// Generates one candidate short code of [`GENERATED_CODE_LEN`] characters
/// drawn uniformly from [`CODE_ALPHABET`].
///
/// Uniqueness is not guaranteed here; the caller checks the store and
/// retries up to [`MAX_GENERATION_ATTEMPTS`] times.
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Mints a deletion secret from OS entropy.
///
/// Encodes [`SECRET_LENGTH_BYTES`] random bytes as URL-safe base64 without
/// padding, producing a 12-character secret.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn mint_secret() -> String {
    let mut buffer = [0u8; SECRET_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Validates a target URL for link creation.
///
/// The string must parse as an absolute URL with an `http` or `https`
/// scheme. Anything else, including relative references and other schemes
/// such as `ftp` or `javascript`, is rejected.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] when the rule is violated.
pub fn validate_url(raw: &str) -> Result<(), AppError> {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::InvalidUrl),
    }
}

/// Validates a caller-supplied custom code.
///
/// # Rules
///
/// - Length: 3-64 characters
/// - Allowed characters: ASCII letters (both cases), digits, `_`, `-`
///
/// # Errors
///
/// Returns [`AppError::InvalidCodeFormat`] if the rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if CUSTOM_CODE_RE.is_match(code) {
        Ok(())
    } else {
        Err(AppError::InvalidCodeFormat)
    }
}
