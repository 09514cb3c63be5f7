//! DTOs for short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreateShortLink;
use crate::domain::entities::{Owner, ShortLink};

/// Request body for `POST /api/short-urls`.
///
/// `originalUrl` is accepted as an alias of `targetUrl`. A missing URL is
/// read as empty and rejected by the service as invalid input.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortLinkRequest {
    #[serde(default, alias = "originalUrl")]
    #[validate(length(max = 2048, message = "Target URL is too long"))]
    pub target_url: String,

    pub is_private: Option<bool>,

    /// Days until expiry. Zero or negative means the link never expires.
    pub expiration_in_days: Option<i64>,
}

impl From<CreateShortLinkRequest> for CreateShortLink {
    fn from(request: CreateShortLinkRequest) -> Self {
        CreateShortLink {
            target_url: request.target_url,
            is_private: request.is_private,
            expiration_in_days: request.expiration_in_days,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OwnerResponse {
    pub id: i64,
    pub name: String,
}

impl From<Owner> for OwnerResponse {
    fn from(owner: Owner) -> Self {
        OwnerResponse {
            id: owner.id,
            name: owner.name,
        }
    }
}

/// A short link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub id: i64,
    pub key: String,
    pub target_url: String,
    pub is_private: bool,
    pub owner: Option<OwnerResponse>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortLink> for ShortLinkResponse {
    fn from(link: ShortLink) -> Self {
        ShortLinkResponse {
            id: link.id,
            key: link.key,
            target_url: link.target_url,
            is_private: link.is_private,
            owner: link.owner.map(Into::into),
            click_count: link.click_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}
