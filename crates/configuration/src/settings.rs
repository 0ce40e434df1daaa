use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub analyst: AnalystConfig,
}

/// Where the JSON API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the AI coaching-summary integration. The API key itself is
/// read from the `GEMINI_API_KEY` environment variable, never from the file.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalystConfig {
    /// Model identifier, e.g. "gemini-2.0-flash".
    pub model: String,
    /// Base URL of the generate-content API.
    pub api_base: String,
    /// How many days of trade history to send for review.
    #[serde(default = "default_history_days")]
    pub history_days: i64,
}

fn default_history_days() -> i64 {
    30
}
