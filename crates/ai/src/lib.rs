pub mod bridge;
pub mod extract;
pub mod gemini;
pub mod llm;
pub mod payload;

pub use bridge::{AiBridge, ComparisonPrompt, PromptProduct};
pub use gemini::GeminiClient;
pub use llm::{BridgeError, LlmClient};
pub use payload::{CategoryTips, GreenwashingWarning, SustainabilityIndicators, Tip};
