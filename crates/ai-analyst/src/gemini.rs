use crate::error::AnalystError;
use crate::export::{build_prompt, render_trade_history};
use crate::responses::{AnalystReview, GenerateContentResponse};
use crate::AnalystClient;
use async_trait::async_trait;
use configuration::AnalystConfig;
use core_types::TradeRecord;

/// Client for the Gemini generate-content API.
///
/// The API key is read from the `GEMINI_API_KEY` environment variable, never
/// from configuration files.
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AnalystConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key,
        }
    }

    /// Builds a client with the key from `GEMINI_API_KEY`.
    pub fn from_env(config: &AnalystConfig) -> Result<Self, AnalystError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AnalystError::MissingApiKey)?;
        Ok(Self::new(config, api_key))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        )
    }
}

#[async_trait]
impl AnalystClient for GeminiClient {
    async fn review(&self, trades: &[TradeRecord]) -> Result<AnalystReview, AnalystError> {
        let history = render_trade_history(trades);
        let prompt = build_prompt(&history);

        tracing::info!(trade_count = trades.len(), model = %self.model, "Requesting AI review");

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json"
            }
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalystError::Api(format!("{status}: {detail}")));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::Deserialization(e.to_string()))?;

        payload.into_review()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalystConfig {
        AnalystConfig {
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            history_days: 30,
        }
    }

    #[test]
    fn endpoint_interpolates_base_model_and_key() {
        let client = GeminiClient::new(&config(), "secret".to_string());
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }
}
