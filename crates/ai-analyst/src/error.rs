use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalystError {
    #[error("The GEMINI_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Failed to reach the AI service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The AI service returned an error: {0}")]
    Api(String),

    #[error("Failed to parse the AI service response: {0}")]
    Deserialization(String),
}
