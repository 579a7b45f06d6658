//! Synchronous client for the Anthropic Messages API.

use thiserror::Error;

use super::parser::parse_review;
use super::prompts::{build_analysis_prompt, SYSTEM_PROMPT};
use crate::schema::Model;
use crate::validators::Report;

/// Default reviewer model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Errors from the semantic review flow.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// No API key was passed and `ANTHROPIC_API_KEY` is unset.
    #[error(
        "no Anthropic API key configured; set the ANTHROPIC_API_KEY environment variable or pass --api-key"
    )]
    MissingApiKey,

    /// The API rejected the configured key.
    #[error("invalid Anthropic API key")]
    InvalidApiKey,

    /// The API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The response body did not have the expected shape.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
}

/// Reviews models through the Anthropic Messages API.
///
/// The call is synchronous; review latency is dominated by the API round
/// trip, and nothing else in the pipeline would benefit from overlapping it.
pub struct SemanticReviewer {
    api_key: String,
    model: String,
}

impl SemanticReviewer {
    /// Create a reviewer. The key falls back to the `ANTHROPIC_API_KEY`
    /// environment variable, the model to [`DEFAULT_MODEL`].
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, SemanticError> {
        let api_key = api_key
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.is_empty())
            .ok_or(SemanticError::MissingApiKey)?;
        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Ask the reviewer about a model and parse its findings.
    pub fn review(&self, model: &Model) -> Result<Report, SemanticError> {
        let prompt = build_analysis_prompt(model);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": prompt }],
        });

        tracing::debug!(model = %self.model, "requesting semantic review");

        let response = ureq::post(API_URL)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", API_VERSION)
            .send_json(body);

        match response {
            Ok(response) => {
                let value: serde_json::Value = response
                    .into_json()
                    .map_err(|err| SemanticError::MalformedResponse(err.to_string()))?;
                let text = response_text(&value)?;
                Ok(parse_review(&text))
            }
            Err(ureq::Error::Status(401, _)) => Err(SemanticError::InvalidApiKey),
            Err(ureq::Error::Status(status, response)) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "<unreadable body>".to_string());
                Err(SemanticError::Api { status, message })
            }
            Err(err) => Err(SemanticError::Http(err.to_string())),
        }
    }
}

/// Concatenate the text blocks of a Messages API response.
fn response_text(value: &serde_json::Value) -> Result<String, SemanticError> {
    let blocks = value
        .get("content")
        .and_then(|content| content.as_array())
        .ok_or_else(|| SemanticError::MalformedResponse("missing content array".to_string()))?;

    let mut text = String::new();
    for block in blocks {
        if let Some(part) = block.get("text").and_then(|t| t.as_str()) {
            text.push_str(part);
        }
    }
    Ok(text)
}

/// One-shot convenience wrapper around [`SemanticReviewer`].
pub fn review_model(
    model: &Model,
    api_key: Option<String>,
    model_name: Option<String>,
) -> Result<Report, SemanticError> {
    SemanticReviewer::new(api_key, model_name)?.review(model)
}
