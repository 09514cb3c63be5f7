//! Collision-avoiding short key issuance.

use tracing::{debug, warn};

use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::key_generator::{KeyGenerator, is_reserved_key};

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Hard ceiling on the retry budget.
pub const MAX_ATTEMPTS_LIMIT: u32 = 100;

/// Issues short keys that are not yet present in the store.
///
/// This is an optimistic check-then-act scheme: a key reported free here can
/// still be taken by a concurrent writer before it is inserted. The store's
/// unique constraint is the final arbiter; see
/// [`crate::application::services::ShortLinkService::create_short_link`] for
/// the retry on insert.
pub struct UniqueKeyIssuer {
    generator: KeyGenerator,
    max_attempts: u32,
}

impl UniqueKeyIssuer {
    /// Creates an issuer with the given retry budget, clamped to
    /// `1..=MAX_ATTEMPTS_LIMIT`.
    pub fn new(generator: KeyGenerator, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Finds a key the store does not know about.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::KeyExhausted`] if every candidate in the budget
    /// was already taken. Store errors are propagated unchanged.
    pub async fn issue<S>(&self, store: &S) -> Result<String, AppError>
    where
        S: ShortLinkRepository + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if is_available(store, &candidate).await? {
                return Ok(candidate);
            }

            debug!(attempt, key = %candidate, "Short key collision");
        }

        warn!(attempts = self.max_attempts, "Short key space looks crowded");
        Err(AppError::KeyExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Reserved keys count as taken without asking the store.
async fn is_available<S>(store: &S, candidate: &str) -> Result<bool, AppError>
where
    S: ShortLinkRepository + ?Sized,
{
    if is_reserved_key(candidate) {
        return Ok(false);
    }
    Ok(!store.exists_by_key(candidate).await?)
}

impl Default for UniqueKeyIssuer {
    fn default() -> Self {
        Self::new(KeyGenerator::new(), DEFAULT_MAX_ATTEMPTS)
    }
}
