//! Extraction error types

/// Failures of the structured completion call.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Extraction API key required: set X-OpenAI-API-Key, the request body key, or OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Upstream authentication failed: {0}")]
    Auth(String),

    #[error("Upstream completion call failed: {0}")]
    Upstream(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Failed to build extraction HTTP client: {0}")]
    ClientInit(String),
}
