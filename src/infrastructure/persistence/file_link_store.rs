//! Single-file JSON implementation of the link store.
//!
//! The whole data set lives in one pretty-printed JSON object keyed by
//! code. Every operation reads the file fresh and mutations rewrite it in
//! full, so the file stays the single source of truth and survives process
//! restarts without a separate flush step.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LIST_LIMIT, LinkStore};
use crate::error::AppError;

/// Link store backed by a JSON file on local disk.
///
/// A process-wide mutex serializes every load-modify-save sequence, so
/// concurrent handlers in one process cannot lose updates to each other.
/// Two *processes* sharing the file can still interleave writes; deploys
/// that need that use the relational backend instead.
pub struct FileLinkStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLinkStore {
    /// Creates a store over the given file path. The file itself is
    /// created by [`LinkStore::init`], not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Reads the full map from disk. A missing file reads as empty; a file
    /// that exists but does not parse is a hard error rather than a silent
    /// reset, so corrupted data is never overwritten.
    async fn load(&self) -> Result<HashMap<String, Link>, AppError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(AppError::backend(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| AppError::backend(format!("parse {}: {e}", self.path.display())))
    }

    async fn persist(&self, links: &HashMap<String, Link>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(links)
            .map_err(|e| AppError::backend(format!("serialize links: {e}")))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::backend(format!("write {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl LinkStore for FileLinkStore {
    async fn init(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::backend(format!("mkdir {}: {e}", parent.display())))?;
            }
        }

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| AppError::backend(format!("stat {}: {e}", self.path.display())))?;

        if !exists {
            self.persist(&HashMap::new()).await?;
        }

        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, AppError> {
        let _guard = self.lock.lock().await;

        Ok(self.load().await?.get(code).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Link>, AppError> {
        let _guard = self.lock.lock().await;

        let mut links: Vec<Link> = self.load().await?.into_values().collect();
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        links.truncate(LIST_LIMIT);

        Ok(links)
    }

    async fn create(&self, link: NewLink) -> Result<Link, AppError> {
        let _guard = self.lock.lock().await;

        let mut links = self.load().await?;
        if links.contains_key(&link.code) {
            return Err(AppError::DuplicateCode { code: link.code });
        }

        let stored = Link {
            code: link.code,
            url: link.url,
            secret: link.secret,
            clicks: 0,
            created_at: link.created_at,
            expires_at: link.expires_at,
        };
        links.insert(stored.code.clone(), stored.clone());
        self.persist(&links).await?;

        Ok(stored)
    }

    async fn remove(&self, code: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;

        let mut links = self.load().await?;
        let existed = links.remove(code).is_some();
        if existed {
            self.persist(&links).await?;
        }

        Ok(existed)
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<i64>, AppError> {
        let _guard = self.lock.lock().await;

        let mut links = self.load().await?;
        let Some(link) = links.get_mut(code) else {
            return Ok(None);
        };

        link.clicks += 1;
        let clicks = link.clicks;
        self.persist(&links).await?;

        Ok(Some(clicks))
    }

    async fn close(&self) {}

    fn backend(&self) -> &'static str {
        "file"
    }
}
