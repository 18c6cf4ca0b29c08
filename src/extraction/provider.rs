//! Completion providers
//!
//! Defines the provider trait and the OpenAI-compatible implementation used
//! for grounded structured extraction.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ExtractionConfig;

use super::types::ExtractionError;

/// Fixed instructions for grounded extraction. The grounded schema enforces
/// the shape; the prompt explains what the context fields must contain.
const SYSTEM_PROMPT: &str = "You extract structured information from a document. \
Return only values grounded in the source text. \
For every extracted field, include a context metadata field that contains the exact snippet \
from the document where the value was found. \
If a field is invoice_number, include invoice_number_context. \
For list fields, include context per item; for scalar lists, include a parallel list context field. \
For nested objects, include _context_snippet when useful.";

/// One structured completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Full document text, newline-joined token map in page order
    pub document_text: &'a str,
    /// Grounded JSON Schema constraining the response
    pub schema: &'a Value,
    /// Model name
    pub model: &'a str,
    /// Bearer credential for the upstream endpoint
    pub api_key: &'a str,
}

/// Structured completion provider trait
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one extraction and return the value tree conforming to the
    /// grounded schema.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Value, ExtractionError>;
}

/// OpenAI-compatible chat-completions provider with strict structured output.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Build the provider from configuration.
    ///
    /// This is the one place configuration can hard-fail: an unreadable CA
    /// bundle or an invalid proxy URL aborts construction instead of
    /// surfacing as a confusing TLS error on the first request.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(path) = &config.ca_bundle {
            let pem = std::fs::read(path).map_err(|e| {
                ExtractionError::ClientInit(format!("CA bundle {}: {e}", path.display()))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ExtractionError::ClientInit(format!("CA bundle {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ExtractionError::ClientInit(format!("proxy {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ExtractionError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Value, ExtractionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let user_prompt = format!(
            "Extract data from the document using the required response format.\n\n\
             Document text:\n{}",
            request.document_text
        );

        let body = serde_json::json!({
            "model": request.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "extraction_response",
                    "strict": true,
                    "schema": request.schema,
                },
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Auth(format!("{status}: {detail}")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Upstream(format!("{status}: {detail}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ExtractionError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        serde_json::from_str(content).map_err(|e| {
            ExtractionError::MalformedResponse(format!("content is not valid JSON: {e}"))
        })
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub response: Value,
}

#[cfg(test)]
#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<Value, ExtractionError> {
        Ok(self.response.clone())
    }
}
