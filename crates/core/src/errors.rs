use thiserror::Error;

/// Failure taxonomy shared by the recommendation services.
///
/// `NotFound` and `Validation` propagate to the transport boundary
/// unchanged. `Upstream` and `Parse` surface for the standalone
/// analyze/tips operations but are swallowed inside the comparator's
/// summary step, which substitutes a fixed fallback string instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("product not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("generation service failure: {0}")]
    Upstream(String),
    #[error("generation payload could not be decoded: {0}")]
    Parse(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Message safe to hand to an API caller without leaking internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "The referenced product does not exist.",
            Self::Validation(_) => "The request could not be processed. Check inputs and try again.",
            Self::Upstream(_) | Self::Parse(_) => {
                "The analysis service is temporarily unavailable. Please retry shortly."
            }
            Self::Storage(_) => "The service is temporarily unavailable. Please retry shortly.",
        }
    }
}
