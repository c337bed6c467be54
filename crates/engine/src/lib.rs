//! Request-scoped services composing the pure scoring/comparison math with
//! storage and the AI bridge. Each service borrows its collaborators, holds
//! no per-request state, and never caches results.

pub mod alternatives;
pub mod compare;
pub mod scorer;

use verdant_core::ServiceError;
use verdant_db::RepositoryError;

pub use alternatives::AlternativeFinder;
pub use compare::{Comparator, FALLBACK_SUMMARY};
pub use scorer::{ScoreService, ScoredProduct};

pub(crate) fn storage_error(error: RepositoryError) -> ServiceError {
    ServiceError::Storage(error.to_string())
}
