//! The adapter between structured requests and the free-text generation
//! service: builds natural-language prompts that describe the exact payload
//! shape wanted, then decodes that payload back out of the prose response.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::warn;

use crate::extract::decode_embedded;
use crate::llm::{BridgeError, LlmClient};
use crate::payload::{CategoryTips, SustainabilityIndicators};

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Product facts fed into the comparison-summary prompt.
#[derive(Clone, Debug)]
pub struct PromptProduct {
    pub name: String,
    pub brand: String,
    pub sustainability_score: Option<f64>,
    pub price: Decimal,
    pub carbon_footprint: Option<(f64, String)>,
    pub recycled_percentage: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct ComparisonPrompt {
    pub product1: PromptProduct,
    pub product2: PromptProduct,
}

pub struct AiBridge {
    client: Arc<dyn LlmClient>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl AiBridge {
    pub fn new(client: Arc<dyn LlmClient>, max_retries: u32) -> Self {
        Self { client, max_retries, retry_backoff: DEFAULT_RETRY_BACKOFF }
    }

    #[cfg(test)]
    fn with_backoff(client: Arc<dyn LlmClient>, max_retries: u32, backoff: Duration) -> Self {
        Self { client, max_retries, retry_backoff: backoff }
    }

    /// Retry upstream failures only: a `Parse` failure is deterministic
    /// for a given response, so retrying would just repeat it.
    async fn complete_with_retry(&self, prompt: &str) -> Result<String, BridgeError> {
        let mut attempt = 0u32;
        loop {
            match self.client.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(BridgeError::Upstream(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, reason = %reason, "generation call failed, retrying");
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    pub async fn analyze_description(
        &self,
        description: &str,
    ) -> Result<SustainabilityIndicators, BridgeError> {
        let prompt = analyze_prompt(description);
        let response = self.complete_with_retry(&prompt).await?;
        decode_embedded(&response)
    }

    pub async fn category_tips(&self, category: &str) -> Result<CategoryTips, BridgeError> {
        let prompt = tips_prompt(category);
        let response = self.complete_with_retry(&prompt).await?;
        decode_embedded(&response)
    }

    /// Plain-prose summary; no retry here because the comparator already
    /// carries a deterministic fallback.
    pub async fn comparison_summary(&self, pair: &ComparisonPrompt) -> Result<String, BridgeError> {
        let prompt = summary_prompt(pair);
        let response = self.client.complete(&prompt).await?;
        let summary = response.trim();
        if summary.is_empty() {
            return Err(BridgeError::Parse("summary response was empty".to_string()));
        }
        Ok(summary.to_string())
    }
}

fn analyze_prompt(description: &str) -> String {
    format!(
        r#"Analyze the following product description and extract sustainability indicators:
- Carbon footprint estimation (if mentioned)
- Water usage (if mentioned)
- Recycled materials percentage
- Organic materials
- Sustainable certifications
- Ethical manufacturing practices

Product: {description}

Respond in JSON format with these fields:
{{
  "carbonFootprint": {{"value": number, "unit": "kg CO2e"}},
  "waterUsage": {{"value": number, "unit": "liters"}},
  "recycledMaterials": {{"percentage": number, "materials": [string]}},
  "certifications": [string],
  "isVegan": boolean,
  "isOrganic": boolean,
  "sustainabilityScore": number (0-100),
  "sustainabilityHighlights": [string],
  "sustainabilityConcerns": [string]
}}"#
    )
}

fn tips_prompt(category: &str) -> String {
    format!(
        r#"Provide 3-5 specific sustainability tips for consumers looking to purchase products in the "{category}" category.
Focus on:
1. What sustainability features to look for
2. Common greenwashing tactics to avoid
3. How to properly dispose of or recycle the product
4. Alternative more sustainable options in this category

Format your response as a JSON object with this structure:
{{
  "category": "{category}",
  "tips": [{{"title": "Tip title", "description": "Detailed explanation"}}],
  "greenwashingWarnings": [{{"claim": "Common misleading claim", "reality": "The actual truth"}}],
  "disposalGuidance": "How to properly dispose of these products",
  "sustainableAlternatives": ["Alternative 1", "Alternative 2"]
}}"#
    )
}

fn format_optional<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "N/A".to_string(), ToString::to_string)
}

fn summary_prompt(pair: &ComparisonPrompt) -> String {
    let describe = |product: &PromptProduct| {
        let carbon = product
            .carbon_footprint
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |(value, unit)| format!("{value} {unit}"));
        format!(
            "{} by {}\nSustainability Score: {}/100\nPrice: ${}\nCarbon Footprint: {}\nRecycled Materials: {}%",
            product.name,
            product.brand,
            format_optional(&product.sustainability_score),
            product.price,
            carbon,
            format_optional(&product.recycled_percentage),
        )
    };

    format!(
        "Compare these two products from a sustainability perspective:\n\n\
         Product 1: {}\n\nProduct 2: {}\n\n\
         Provide a brief (3-4 sentences) comparison summary focusing on sustainability, \
         which product is more eco-friendly, and whether the price difference is justified \
         by the sustainability benefits.",
        describe(&pair.product1),
        describe(&pair.product2),
    )
}
