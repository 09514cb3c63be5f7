//! Short link entity representing a key to target URL mapping.

use chrono::{DateTime, Utc};

use super::Owner;

/// A persisted short link with ownership and visibility metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub key: String,
    pub target_url: String,
    pub is_private: bool,
    pub owner: Option<Owner>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortLink {
    /// Materializes a freshly inserted record.
    ///
    /// The click counter starts at zero and `updated_at` equals `created_at`.
    pub fn from_new(id: i64, new_link: NewShortLink) -> Self {
        Self {
            id,
            key: new_link.key,
            target_url: new_link.target_url,
            is_private: new_link.is_private,
            owner: new_link.owner,
            click_count: 0,
            created_at: new_link.created_at,
            updated_at: new_link.created_at,
            expires_at: new_link.expires_at,
        }
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the link is expired relative to `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Returns true if the link may appear in public listings.
    pub fn is_public(&self) -> bool {
        !self.is_private
    }
}

/// Input data for creating a new short link.
///
/// Timestamps are decided by the caller so that `expires_at` can be derived
/// from the exact `created_at` value that gets stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub key: String,
    pub target_url: String,
    pub is_private: bool,
    pub owner: Option<Owner>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
