//! Short link creation, listing and resolution.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::key_issuer::UniqueKeyIssuer;
use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::identity::{Caller, IdentityResolver};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::url_normalizer::prepare_target_url;

/// Number of links on every public listing page.
pub const PUBLIC_PAGE_SIZE: u64 = 10;

/// Input for [`ShortLinkService::create_short_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateShortLink {
    pub target_url: String,
    pub is_private: Option<bool>,
    pub expiration_in_days: Option<i64>,
}

/// Service orchestrating the short link lifecycle.
///
/// Holds no state between calls apart from its collaborators; all durable
/// state lives in the repository.
pub struct ShortLinkService<S, I>
where
    S: ShortLinkRepository + ?Sized,
    I: IdentityResolver + ?Sized,
{
    repository: Arc<S>,
    identity: Arc<I>,
    issuer: UniqueKeyIssuer,
}

impl<S, I> ShortLinkService<S, I>
where
    S: ShortLinkRepository + ?Sized,
    I: IdentityResolver + ?Sized,
{
    pub fn new(repository: Arc<S>, identity: Arc<I>, issuer: UniqueKeyIssuer) -> Self {
        Self {
            repository,
            identity,
            issuer,
        }
    }

    /// Creates a short link for `request.target_url`.
    ///
    /// # Flow
    ///
    /// 1. Normalize and validate the target URL
    /// 2. Resolve the owner from `caller`; any failure means anonymous
    /// 3. Derive `expires_at` from a positive `expiration_in_days`
    /// 4. Issue a free key and insert the record
    ///
    /// If the insert loses a race for the key to a concurrent writer, step 4 is
    /// repeated with a fresh key, bounded by the issuer's attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the URL is blank or the expiry
    /// overflows the calendar.
    /// Returns [`AppError::InvalidUrl`] if the URL fails validation.
    /// Returns [`AppError::KeyExhausted`] if no free key could be secured.
    pub async fn create_short_link(
        &self,
        request: CreateShortLink,
        caller: &Caller,
    ) -> Result<ShortLink, AppError> {
        let target_url = prepare_target_url(&request.target_url)?;

        let owner = self.resolve_owner(caller).await;

        let created_at = Utc::now();
        let expires_at = match request.expiration_in_days {
            Some(days) if days > 0 => Some(
                Duration::try_days(days)
                    .and_then(|d| created_at.checked_add_signed(d))
                    .ok_or_else(|| {
                        AppError::invalid_input(
                            "Expiration is too far in the future",
                            json!({ "expiration_in_days": days }),
                        )
                    })?,
            ),
            _ => None,
        };

        let max_attempts = self.issuer.max_attempts();
        for attempt in 1..=max_attempts {
            let key = self.issuer.issue(self.repository.as_ref()).await?;

            let new_link = NewShortLink {
                key,
                target_url: target_url.clone(),
                is_private: request.is_private.unwrap_or(false),
                owner: owner.clone(),
                created_at,
                expires_at,
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    info!(
                        key = %link.key,
                        private = link.is_private,
                        owner_id = link.owner.as_ref().map(|o| o.id),
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::KeyConflict { key }) => {
                    warn!(attempt, key = %key, "Lost race for short key, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::KeyExhausted {
            attempts: max_attempts,
        })
    }

    /// Lists public links, newest first, 10 per page.
    ///
    /// `page_number` is 1-based; 0 and negative values behave like 1.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PageOutOfRange`] if the page lies past the last
    /// page. With no public links at all, page 1 is still valid and empty.
    pub async fn list_public_short_links(
        &self,
        page_number: i64,
    ) -> Result<Page<ShortLink>, AppError> {
        let request = PageRequest::new(page_number, PUBLIC_PAGE_SIZE);

        let (items, total_elements) = self
            .repository
            .list_public(request.offset(), request.limit())
            .await?;

        let page = Page::new(items, request, total_elements);

        let max_page = page.total_pages().max(1);
        if request.page_number() > max_page {
            return Err(AppError::PageOutOfRange { max_page });
        }

        Ok(page)
    }

    /// Resolves a short key for redirection and counts the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is unknown.
    /// Returns [`AppError::Gone`] if the link has expired; expired links do
    /// not count clicks.
    pub async fn resolve_short_link(&self, key: &str) -> Result<ShortLink, AppError> {
        let link = self
            .repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))?;

        if link.is_expired() {
            return Err(AppError::gone(
                "Short link has expired",
                json!({ "key": key, "expires_at": link.expires_at }),
            ));
        }

        self.repository
            .increment_click_count(key)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))
    }

    /// Checks that the backing store answers.
    pub async fn is_store_healthy(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn resolve_owner(&self, caller: &Caller) -> Option<Owner> {
        match self.identity.resolve(caller).await {
            Ok(owner) => Some(owner),
            Err(reason) => {
                debug!(%reason, "Creating anonymous short link");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{IdentityError, MockIdentityResolver};
    use crate::domain::repositories::MockShortLinkRepository;
    use crate::utils::key_generator::{KeyGenerator, is_well_formed_key};

    fn service(
        repo: MockShortLinkRepository,
        identity: MockIdentityResolver,
    ) -> ShortLinkService<MockShortLinkRepository, MockIdentityResolver> {
        ShortLinkService::new(
            Arc::new(repo),
            Arc::new(identity),
            UniqueKeyIssuer::new(KeyGenerator::with_seed(11), 10),
        )
    }

    fn anonymous_identity() -> MockIdentityResolver {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_resolve()
            .returning(|_| Err(IdentityError::Anonymous));
        identity
    }

    fn stored_link(id: i64, key: &str, is_private: bool) -> ShortLink {
        ShortLink::from_new(
            id,
            NewShortLink {
                key: key.to_string(),
                target_url: format!("https://example.com/{id}"),
                is_private,
                owner: None,
                created_at: Utc::now(),
                expires_at: None,
            },
        )
    }

    fn request(url: &str) -> CreateShortLink {
        CreateShortLink {
            target_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| {
                new_link.target_url == "http://foo.com"
                    && !new_link.is_private
                    && new_link.owner.is_none()
                    && new_link.expires_at.is_none()
                    && is_well_formed_key(&new_link.key)
            })
            .times(1)
            .returning(|new_link| Ok(ShortLink::from_new(1, new_link)));

        let link = service(repo, anonymous_identity())
            .create_short_link(request("foo.com"), &Caller::Anonymous)
            .await
            .unwrap();

        assert_eq!(link.target_url, "http://foo.com");
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_create_short_link_with_expiration() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().returning(|_| Ok(false));
        repo.expect_create()
            .returning(|new_link| Ok(ShortLink::from_new(1, new_link)));

        let link = service(repo, anonymous_identity())
            .create_short_link(
                CreateShortLink {
                    target_url: "foo.com".to_string(),
                    is_private: None,
                    expiration_in_days: Some(5),
                },
                &Caller::Anonymous,
            )
            .await
            .unwrap();

        assert_eq!(link.expires_at, Some(link.created_at + Duration::days(5)));
    }

    #[tokio::test]
    async fn test_create_short_link_non_positive_expiration_is_ignored() {
        for days in [Some(0), Some(-3), None] {
            let mut repo = MockShortLinkRepository::new();
            repo.expect_exists_by_key().returning(|_| Ok(false));
            repo.expect_create()
                .returning(|new_link| Ok(ShortLink::from_new(1, new_link)));

            let link = service(repo, anonymous_identity())
                .create_short_link(
                    CreateShortLink {
                        target_url: "foo.com".to_string(),
                        is_private: Some(true),
                        expiration_in_days: days,
                    },
                    &Caller::Anonymous,
                )
                .await
                .unwrap();

            assert!(link.expires_at.is_none());
            assert!(link.is_private);
        }
    }

    #[tokio::test]
    async fn test_create_short_link_huge_expiration_is_rejected() {
        let repo = MockShortLinkRepository::new();

        let result = service(repo, anonymous_identity())
            .create_short_link(
                CreateShortLink {
                    target_url: "foo.com".to_string(),
                    is_private: None,
                    expiration_in_days: Some(i64::MAX),
                },
                &Caller::Anonymous,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_attaches_owner() {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_resolve()
            .withf(|caller| caller == &Caller::bearer("good"))
            .times(1)
            .returning(|_| Ok(Owner::new(2, "Auth User")));

        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new_link| new_link.owner == Some(Owner::new(2, "Auth User")))
            .times(1)
            .returning(|new_link| Ok(ShortLink::from_new(1, new_link)));

        let link = service(repo, identity)
            .create_short_link(request("https://example.com"), &Caller::bearer("good"))
            .await
            .unwrap();

        assert_eq!(link.owner.unwrap().name, "Auth User");
    }

    #[tokio::test]
    async fn test_create_short_link_swallows_identity_failure() {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_resolve()
            .returning(|_| Err(IdentityError::Backend("connection reset".to_string())));

        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().returning(|_| Ok(false));
        repo.expect_create()
            .returning(|new_link| Ok(ShortLink::from_new(1, new_link)));

        let link = service(repo, identity)
            .create_short_link(request("https://example.com"), &Caller::bearer("bad"))
            .await
            .unwrap();

        assert!(link.owner.is_none());
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_create().times(0);

        let result = service(repo, anonymous_identity())
            .create_short_link(request("http://localhost"), &Caller::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_blank_url() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_create().times(0);

        let result = service(repo, anonymous_identity())
            .create_short_link(request("   "), &Caller::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_key_exhaustion() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().times(10).returning(|_| Ok(true));
        repo.expect_create().times(0);

        let result = service(repo, anonymous_identity())
            .create_short_link(request("foo.com"), &Caller::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::KeyExhausted { attempts: 10 })));
    }

    #[tokio::test]
    async fn test_create_short_link_retries_after_insert_conflict() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().times(2).returning(|_| Ok(false));

        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Err(AppError::KeyConflict { key: new_link.key }));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(ShortLink::from_new(9, new_link)));

        let link = service(repo, anonymous_identity())
            .create_short_link(request("foo.com"), &Caller::Anonymous)
            .await
            .unwrap();

        assert_eq!(link.id, 9);
    }

    #[tokio::test]
    async fn test_create_short_link_gives_up_after_repeated_conflicts() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_exists_by_key().times(10).returning(|_| Ok(false));
        repo.expect_create()
            .times(10)
            .returning(|new_link| Err(AppError::KeyConflict { key: new_link.key }));

        let result = service(repo, anonymous_identity())
            .create_short_link(request("foo.com"), &Caller::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::KeyExhausted { .. })));
    }

    #[tokio::test]
    async fn test_list_public_first_page() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_list_public()
            .withf(|offset, limit| *offset == 0 && *limit == 10)
            .times(1)
            .returning(|_, _| {
                let items = (1..=10)
                    .map(|i| stored_link(i, &format!("key{i:03}"), false))
                    .collect();
                Ok((items, 20))
            });

        let page = service(repo, anonymous_identity())
            .list_public_short_links(1)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_elements, 20);
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_first());
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[tokio::test]
    async fn test_list_public_clamps_page_number() {
        for requested in [0, -5, i64::MIN] {
            let mut repo = MockShortLinkRepository::new();
            repo.expect_list_public()
                .withf(|offset, _| *offset == 0)
                .times(1)
                .returning(|_, _| Ok((vec![stored_link(1, "abc123", false)], 1)));

            let page = service(repo, anonymous_identity())
                .list_public_short_links(requested)
                .await
                .unwrap();

            assert_eq!(page.page_number, 1);
        }
    }

    #[tokio::test]
    async fn test_list_public_second_page_offset() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_list_public()
            .withf(|offset, limit| *offset == 10 && *limit == 10)
            .times(1)
            .returning(|_, _| Ok((vec![stored_link(11, "abc123", false)], 11)));

        let page = service(repo, anonymous_identity())
            .list_public_short_links(2)
            .await
            .unwrap();

        assert!(page.is_last());
        assert!(page.has_previous());
    }

    #[tokio::test]
    async fn test_list_public_page_out_of_range() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_list_public()
            .returning(|_, _| Ok((vec![], 20)));

        let result = service(repo, anonymous_identity())
            .list_public_short_links(999)
            .await;

        assert!(matches!(result, Err(AppError::PageOutOfRange { max_page: 2 })));
    }

    #[tokio::test]
    async fn test_list_public_empty_store() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_list_public().returning(|_, _| Ok((vec![], 0)));
        let service = service(repo, anonymous_identity());

        let page = service.list_public_short_links(1).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 0);

        let result = service.list_public_short_links(2).await;
        assert!(matches!(result, Err(AppError::PageOutOfRange { max_page: 1 })));
    }

    #[tokio::test]
    async fn test_resolve_short_link_counts_click() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_find_by_key()
            .withf(|key| key == "abc123")
            .returning(|_| Ok(Some(stored_link(1, "abc123", true))));
        repo.expect_increment_click_count()
            .times(1)
            .returning(|_| {
                let mut link = stored_link(1, "abc123", true);
                link.click_count = 1;
                Ok(Some(link))
            });

        let link = service(repo, anonymous_identity())
            .resolve_short_link("abc123")
            .await
            .unwrap();

        assert_eq!(link.click_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_short_link_not_found() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_find_by_key().returning(|_| Ok(None));

        let result = service(repo, anonymous_identity())
            .resolve_short_link("zzzzzz")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_short_link_expired() {
        let mut repo = MockShortLinkRepository::new();
        repo.expect_find_by_key().returning(|_| {
            let mut link = stored_link(1, "old123", false);
            link.expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(link))
        });
        repo.expect_increment_click_count().times(0);

        let result = service(repo, anonymous_identity())
            .resolve_short_link("old123")
            .await;

        assert!(matches!(result, Err(AppError::Gone { .. })));
    }
}
