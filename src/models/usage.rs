use serde::Deserialize;

// gpt-4o per-1K-token pricing, USD.
const PROMPT_PRICE_PER_1K: f64 = 0.005;
const COMPLETION_PRICE_PER_1K: f64 = 0.015;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn estimated_cost(&self) -> f64 {
        (self.prompt_tokens as f64 / 1000.0) * PROMPT_PRICE_PER_1K
            + (self.completion_tokens as f64 / 1000.0) * COMPLETION_PRICE_PER_1K
    }
}

/// Informational only; one log line, no persistence.
pub fn log_usage(usage: Option<&TokenUsage>) {
    if let Some(usage) = usage {
        tracing::info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            cost_usd = %format!("{:.5}", usage.estimated_cost()),
            "completion usage"
        );
    }
}
