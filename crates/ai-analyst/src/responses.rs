use crate::error::AnalystError;
use serde::{Deserialize, Serialize};

/// The structured coaching review produced by the AI service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystReview {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl AnalystReview {
    /// The canned review returned without calling the service when there is
    /// no recent history to analyze.
    pub fn no_recent_trades() -> Self {
        Self {
            summary: "No trades found in the last 30 days to analyze.".to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            tips: Vec::new(),
        }
    }
}

// --- Generate-content wire format ---

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatePart {
    pub text: String,
}

impl GenerateContentResponse {
    /// Extracts the model's text payload and parses it as a review.
    pub(crate) fn into_review(self) -> Result<AnalystReview, AnalystError> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                AnalystError::Deserialization("response contained no candidates".to_string())
            })?;

        serde_json::from_str(text.trim())
            .map_err(|e| AnalystError::Deserialization(format!("{e}. Raw text: {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(text: &str) -> GenerateContentResponse {
        serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
        .unwrap()
    }

    #[test]
    fn parses_a_well_formed_review() {
        let response = wire(
            r#"{"summary":"Solid month.","strengths":["discipline"],"weaknesses":[],"tips":["size down"]}"#,
        );

        let review = response.into_review().unwrap();
        assert_eq!(review.summary, "Solid month.");
        assert_eq!(review.strengths, vec!["discipline".to_string()]);
        assert!(review.weaknesses.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        let response = wire("this is not json");
        assert!(matches!(
            response.into_review(),
            Err(AnalystError::Deserialization(_))
        ));
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(response.into_review().is_err());
    }
}
