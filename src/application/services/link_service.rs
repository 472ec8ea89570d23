//! Link lifecycle service: creation, lookup, redirect counting, deletion.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::code_generator::{
    MAX_GENERATION_ATTEMPTS, generate_code, mint_secret, validate_custom_code, validate_url,
};

/// Service implementing the code assignment, redirect, and deletion
/// protocols over an abstract [`LinkStore`].
///
/// The backend is injected as a trait object because it is selected at
/// startup from the environment; the service behaves identically over
/// both.
pub struct LinkService {
    store: Arc<dyn LinkStore>,
}

impl LinkService {
    /// Creates a new link service over the given store.
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Creates a short link.
    ///
    /// Validation is ordered: the target URL is checked before any code
    /// handling or store access. A custom code is trimmed first and an
    /// empty result counts as absent, falling through to random
    /// generation.
    ///
    /// # Code assignment
    ///
    /// - Custom code: format check, then an existence probe; a taken code
    ///   is a conflict.
    /// - Otherwise up to [`MAX_GENERATION_ATTEMPTS`] candidates are
    ///   generated and probed; the first free one wins.
    /// - An insert that still collides (the code was claimed between the
    ///   probe and the insert) is retried once with a fresh candidate on
    ///   the generated path, and reported as a conflict on the custom
    ///   path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`], [`AppError::InvalidCodeFormat`],
    /// [`AppError::CodeConflict`], or [`AppError::CodeGenerationExhausted`]
    /// per the rules above, and passes store failures through.
    pub async fn create_link(
        &self,
        url: Option<String>,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let url = url.filter(|u| !u.is_empty()).ok_or(AppError::InvalidUrl)?;
        validate_url(&url)?;

        let custom = custom_code
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());

        let secret = mint_secret();

        if let Some(code) = custom {
            validate_custom_code(&code)?;

            if self.store.get(&code).await?.is_some() {
                return Err(AppError::CodeConflict { code });
            }

            return match self.store.create(new_link(code, &url, &secret)).await {
                Err(AppError::DuplicateCode { code }) => Err(AppError::CodeConflict { code }),
                other => other,
            };
        }

        let code = self.assign_free_code().await?;
        match self.store.create(new_link(code, &url, &secret)).await {
            Err(AppError::DuplicateCode { .. }) => {
                // Claimed between probe and insert. One fresh candidate,
                // then give up rather than loop under contention.
                let retry = self.assign_free_code().await?;
                match self.store.create(new_link(retry, &url, &secret)).await {
                    Err(AppError::DuplicateCode { .. }) => Err(AppError::CodeGenerationExhausted),
                    other => other,
                }
            }
            other => other,
        }
    }

    /// Retrieves a link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record matches.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.store.get(code).await?.ok_or(AppError::NotFound)
    }

    /// Lists the most recently created links, newest first, capped by the
    /// store's listing limit.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.store.get_all().await
    }

    /// Resolves a code for redirecting and counts the click.
    ///
    /// The increment is awaited before the target URL is returned, so the
    /// count is durable by the time the response goes out. A record
    /// deleted between lookup and increment still redirects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record matches.
    pub async fn resolve_and_count(&self, code: &str) -> Result<String, AppError> {
        let link = self.store.get(code).await?.ok_or(AppError::NotFound)?;

        self.store.increment_clicks(code).await?;

        Ok(link.url)
    }

    /// Deletes a link, authorized by its creation secret.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingSecret`] when no secret was supplied,
    /// [`AppError::NotFound`] for unknown codes, and
    /// [`AppError::Forbidden`] when the secret does not match exactly.
    pub async fn delete_link(&self, code: &str, secret: Option<String>) -> Result<(), AppError> {
        let secret = secret
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingSecret)?;

        let link = self.store.get(code).await?.ok_or(AppError::NotFound)?;

        if link.secret != secret {
            return Err(AppError::Forbidden);
        }

        // A vanished record at this point still counts as success.
        self.store.remove(code).await?;

        Ok(())
    }

    /// Probes generated candidates until one is free.
    async fn assign_free_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_code();

            if self.store.get(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::CodeGenerationExhausted)
    }
}

fn new_link(code: String, url: &str, secret: &str) -> NewLink {
    NewLink {
        code,
        url: url.to_owned(),
        secret: secret.to_owned(),
        created_at: Utc::now().timestamp_millis(),
        expires_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkStore;
    use crate::utils::code_generator::{CODE_ALPHABET, GENERATED_CODE_LEN};
    use mockall::Sequence;

    fn stored(link: NewLink) -> Link {
        Link {
            code: link.code,
            url: link.url,
            secret: link.secret,
            clicks: 0,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }

    fn test_link(code: &str, url: &str, secret: &str) -> Link {
        Link {
            code: code.to_string(),
            url: url.to_string(),
            secret: secret.to_string(),
            clicks: 3,
            created_at: 1_700_000_000_000,
            expires_at: None,
        }
    }

    fn service(store: MockLinkStore) -> LinkService {
        LinkService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_create_link_generates_code_and_secret() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|link| {
                link.code.len() == GENERATED_CODE_LEN
                    && link.code.bytes().all(|b| CODE_ALPHABET.contains(&b))
                    && link.secret.len() == 12
                    && link.url == "https://example.com/page"
                    && link.created_at > 0
                    && link.expires_at.is_none()
            })
            .times(1)
            .returning(|link| Ok(stored(link)));

        let result = service(store)
            .create_link(Some("https://example.com/page".to_string()), None)
            .await;

        let link = result.unwrap();
        assert_eq!(link.url, "https://example.com/page");
        assert_eq!(link.clicks, 0);
    }

    #[tokio::test]
    async fn test_create_link_rejects_missing_or_invalid_url() {
        for bad in [None, Some(String::new()), Some("not-a-url".to_string())] {
            let store = MockLinkStore::new();

            let result = service(store).create_link(bad, None).await;

            assert!(matches!(result.unwrap_err(), AppError::InvalidUrl));
        }
    }

    #[tokio::test]
    async fn test_create_link_checks_url_before_custom_code() {
        let store = MockLinkStore::new();

        let result = service(store)
            .create_link(Some("ftp://example.com".to_string()), Some("ab".to_string()))
            .await;

        // Both inputs are bad; the URL error wins.
        assert!(matches!(result.unwrap_err(), AppError::InvalidUrl));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_code() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .withf(|code| code == "my-code")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|link| link.code == "my-code")
            .times(1)
            .returning(|link| Ok(stored(link)));

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("my-code".to_string()),
            )
            .await;

        assert_eq!(result.unwrap().code, "my-code");
    }

    #[tokio::test]
    async fn test_create_link_trims_custom_code() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .withf(|code| code == "padded")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|link| link.code == "padded")
            .times(1)
            .returning(|link| Ok(stored(link)));

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("  padded  ".to_string()),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_blank_custom_code_falls_through_to_generation() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|link| link.code.len() == GENERATED_CODE_LEN)
            .times(1)
            .returning(|link| Ok(stored(link)));

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("   ".to_string()),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_invalid_custom_code() {
        let store = MockLinkStore::new();

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("ab".to_string()),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCodeFormat));
    }

    #[tokio::test]
    async fn test_create_link_custom_code_taken() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .withf(|code| code == "taken")
            .times(1)
            .returning(|_| Ok(Some(test_link("taken", "https://other.com", "s"))));
        store.expect_create().times(0);

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("taken".to_string()),
            )
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::CodeConflict { code } if code == "taken"
        ));
    }

    #[tokio::test]
    async fn test_create_link_custom_code_insert_race_is_conflict() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store
            .expect_create()
            .times(1)
            .returning(|link| Err(AppError::DuplicateCode { code: link.code }));

        let result = service(store)
            .create_link(
                Some("https://example.com".to_string()),
                Some("raced".to_string()),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::CodeConflict { .. }));
    }

    #[tokio::test]
    async fn test_create_link_gives_up_after_five_taken_candidates() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(5)
            .returning(|code| Ok(Some(test_link(code, "https://example.com", "s"))));
        store.expect_create().times(0);

        let result = service(store)
            .create_link(Some("https://example.com".to_string()), None)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::CodeGenerationExhausted
        ));
    }

    #[tokio::test]
    async fn test_create_link_retries_once_on_insert_race() {
        let mut seq = Sequence::new();
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|link| Err(AppError::DuplicateCode { code: link.code }));
        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|link| Ok(stored(link)));

        let result = service(store)
            .create_link(Some("https://example.com".to_string()), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_second_insert_race_exhausts() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(2).returning(|_| Ok(None));
        store
            .expect_create()
            .times(2)
            .returning(|link| Err(AppError::DuplicateCode { code: link.code }));

        let result = service(store)
            .create_link(Some("https://example.com".to_string()), None)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::CodeGenerationExhausted
        ));
    }

    #[tokio::test]
    async fn test_get_link_found() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com", "s"))));

        let link = service(store).get_link("abc1234").await.unwrap();
        assert_eq!(link.code, "abc1234");
    }

    #[tokio::test]
    async fn test_get_link_missing_is_not_found() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));

        let result = service(store).get_link("nothere").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_and_count_increments_before_returning() {
        let mut seq = Sequence::new();
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com/x", "s"))));
        store
            .expect_increment_clicks()
            .withf(|code| code == "abc1234")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(4)));

        let url = service(store).resolve_and_count("abc1234").await.unwrap();
        assert_eq!(url, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_resolve_and_count_missing_is_not_found() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store.expect_increment_clicks().times(0);

        let result = service(store).resolve_and_count("nothere").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_and_count_tolerates_record_deleted_mid_flight() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com/x", "s"))));
        store
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(None));

        let url = service(store).resolve_and_count("abc1234").await.unwrap();
        assert_eq!(url, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_delete_link_requires_secret() {
        for missing in [None, Some(String::new())] {
            let store = MockLinkStore::new();

            let result = service(store).delete_link("abc1234", missing).await;

            assert!(matches!(result.unwrap_err(), AppError::MissingSecret));
        }
    }

    #[tokio::test]
    async fn test_delete_link_unknown_code_is_not_found() {
        let mut store = MockLinkStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store.expect_remove().times(0);

        let result = service(store)
            .delete_link("nothere", Some("whatever".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_link_wrong_secret_is_forbidden() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com", "right"))));
        store.expect_remove().times(0);

        let result = service(store)
            .delete_link("abc1234", Some("wrong".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_delete_link_with_matching_secret() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com", "right"))));
        store
            .expect_remove()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|_| Ok(true));

        let result = service(store)
            .delete_link("abc1234", Some("right".to_string()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_succeeds_when_record_vanished_after_auth() {
        let mut store = MockLinkStore::new();

        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc1234", "https://example.com", "right"))));
        store.expect_remove().times(1).returning(|_| Ok(false));

        let result = service(store)
            .delete_link("abc1234", Some("right".to_string()))
            .await;

        assert!(result.is_ok());
    }
}
