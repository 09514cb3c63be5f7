#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use shortlinks::api::handlers::{health_handler, redirect_handler};
use shortlinks::api::routes::api_routes;
use shortlinks::domain::entities::{NewShortLink, Owner, ShortLink};
use shortlinks::domain::repositories::{ShortLinkRepository, TokenRepository};
use shortlinks::infrastructure::persistence::{InMemoryShortLinkRepository, InMemoryTokenRepository};
use shortlinks::application::services::hash_token;
use shortlinks::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";

pub struct TestApp {
    pub links: Arc<InMemoryShortLinkRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
    pub state: AppState,
}

pub fn create_test_app() -> TestApp {
    let links = Arc::new(InMemoryShortLinkRepository::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());

    let state = AppState::from_repositories(
        links.clone(),
        tokens.clone(),
        SIGNING_SECRET.to_string(),
        10,
    );

    TestApp {
        links,
        tokens,
        state,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

pub fn test_server(app: &TestApp) -> TestServer {
    TestServer::new(router(app.state.clone())).unwrap()
}

pub async fn insert_link(
    links: &InMemoryShortLinkRepository,
    key: &str,
    is_private: bool,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> ShortLink {
    links
        .create(NewShortLink {
            key: key.to_string(),
            target_url: format!("https://example.com/{key}"),
            is_private,
            owner: None,
            created_at,
            expires_at,
        })
        .await
        .unwrap()
}

/// Inserts `public` public and `private` private links, one second apart,
/// interleaving private links among the public ones.
pub async fn seed_links(links: &InMemoryShortLinkRepository, public: usize, private: usize) {
    let base = Utc::now() - Duration::hours(1);
    let mut offset = 0;

    for i in 0..public.max(private) {
        if i < public {
            let at = base + Duration::seconds(offset);
            insert_link(links, &format!("pub{i:03}"), false, at, None).await;
            offset += 1;
        }
        if i < private {
            let at = base + Duration::seconds(offset);
            insert_link(links, &format!("prv{i:03}"), true, at, None).await;
            offset += 1;
        }
    }
}

pub async fn create_owner_with_token(
    tokens: &InMemoryTokenRepository,
    name: &str,
    token: &str,
) -> Owner {
    let owner = tokens.create_owner(name).await.unwrap();
    tokens
        .create_token(owner.id, &format!("{name}-token"), &hash_token(SIGNING_SECRET, token))
        .await
        .unwrap();
    owner
}
