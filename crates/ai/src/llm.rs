use async_trait::async_trait;
use thiserror::Error;

/// Failures crossing the bridge boundary. `Upstream` covers transport and
/// provider errors (including timeouts); `Parse` means the provider
/// answered but no decodable structured payload could be extracted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("generation call failed: {0}")]
    Upstream(String),
    #[error("generation response held no decodable payload: {0}")]
    Parse(String),
}

/// Text-in, text-out seam to the external generation service. Production
/// uses [`crate::GeminiClient`]; tests substitute deterministic doubles.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, BridgeError>;
}
