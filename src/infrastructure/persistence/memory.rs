//! Process-local repository implementations.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Data lives only as long as the process.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::repositories::{ApiToken, ShortLinkRepository, TokenRepository};
use crate::error::AppError;

/// In-memory short link store keyed by short key.
///
/// Key uniqueness is enforced with the map's entry API, which holds the shard
/// lock across the check and the insert.
#[derive(Debug)]
pub struct InMemoryShortLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl InMemoryShortLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored links, public and private.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for InMemoryShortLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.key.clone()) {
            Entry::Occupied(_) => Err(AppError::KeyConflict { key: new_link.key }),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let link = ShortLink::from_new(id, new_link);
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(key).map(|entry| entry.value().clone()))
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(key))
    }

    async fn list_public(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<ShortLink>, u64), AppError> {
        let mut public: Vec<ShortLink> = self
            .links
            .iter()
            .filter(|entry| entry.is_public())
            .map(|entry| entry.value().clone())
            .collect();

        public.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = public.len() as u64;
        let items = public
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok((items, total))
    }

    async fn increment_click_count(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get_mut(key).map(|mut entry| {
            entry.click_count += 1;
            entry.updated_at = Utc::now();
            entry.value().clone()
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory owner and token store.
///
/// Tokens are keyed by their hash, mirroring the unique index used by the
/// PostgreSQL schema.
#[derive(Debug)]
pub struct InMemoryTokenRepository {
    owners: DashMap<i64, Owner>,
    tokens: DashMap<String, ApiToken>,
    next_owner_id: AtomicI64,
    next_token_id: AtomicI64,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self {
            owners: DashMap::new(),
            tokens: DashMap::new(),
            next_owner_id: AtomicI64::new(1),
            next_token_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_owner_by_token_hash(&self, token_hash: &str) -> Result<Option<Owner>, AppError> {
        let Some(token) = self.tokens.get(token_hash) else {
            return Ok(None);
        };

        if token.is_revoked() {
            return Ok(None);
        }

        Ok(self.owners.get(&token.owner_id).map(|o| o.value().clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(mut token) = self.tokens.get_mut(token_hash)
            && !token.is_revoked()
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_owner(&self, name: &str) -> Result<Owner, AppError> {
        let id = self.next_owner_id.fetch_add(1, Ordering::Relaxed);
        let owner = Owner::new(id, name);
        self.owners.insert(id, owner.clone());
        Ok(owner)
    }

    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        if !self.owners.contains_key(&owner_id) {
            return Err(AppError::not_found(
                "Owner not found",
                json!({ "owner_id": owner_id }),
            ));
        }

        if self.tokens.iter().any(|t| t.name == name) {
            return Err(AppError::conflict(
                "Token name already exists",
                json!({ "name": name }),
            ));
        }

        match self.tokens.entry(token_hash.to_string()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            )),
            Entry::Vacant(slot) => {
                let token = ApiToken {
                    id: self.next_token_id.fetch_add(1, Ordering::Relaxed),
                    owner_id,
                    name: name.to_string(),
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    last_used_at: None,
                    revoked_at: None,
                };
                slot.insert(token.clone());
                Ok(token)
            }
        }
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(tokens)
    }

    async fn revoke_token(&self, name: &str) -> Result<bool, AppError> {
        let mut revoked = false;
        for mut token in self.tokens.iter_mut() {
            if token.name == name && !token.is_revoked() {
                token.revoked_at = Some(Utc::now());
                revoked = true;
            }
        }
        Ok(revoked)
    }
}
