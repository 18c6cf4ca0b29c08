//! Extraction Routes
//!
//! POST /api/v1/extract - run a grounded extraction against an indexed
//! document: augment the caller's schema, invoke the completion provider,
//! and resolve every returned context snippet to page coordinates.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::extraction::{CompletionRequest, ExtractionError};
use crate::grounding::{map_extraction_to_coordinates, FieldMatch};
use crate::schema::augment_schema;
use crate::state::AppState;

/// Header carrying a per-request API key; wins over the body and the
/// configured fallback.
const API_KEY_HEADER: &str = "x-openai-api-key";

/// Create the extract router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(extract_document))
}

/// Extraction request
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub file_id: Uuid,
    /// Arbitrary caller schema; normalized leniently, never rejected
    pub json_schema: Value,
    /// Override for the configured model
    #[serde(default)]
    pub model: Option<String>,
    /// API key fallback when the header is absent
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

/// Extraction response: raw values plus per-field provenance
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_id: Uuid,
    pub data: Value,
    pub field_matches: Vec<FieldMatch>,
}

/// POST /api/v1/extract
async fn extract_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>> {
    let document = state.store().get(&request.file_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "file_id {} not found. Index a PDF first.",
            request.file_id
        ))
    })?;

    let api_key = resolve_api_key(&headers, request.openai_api_key.as_deref(), state.config())
        .ok_or(ExtractionError::MissingApiKey)?;

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.config().extraction.model.clone());

    let grounded_schema = augment_schema(&request.json_schema).to_json_schema();

    let data = state
        .provider()
        .complete(CompletionRequest {
            document_text: &document.full_text,
            schema: &grounded_schema,
            model: &model,
            api_key: &api_key,
        })
        .await?;

    let field_matches = map_extraction_to_coordinates(
        &data,
        &document.token_map,
        state.config().matching.min_score,
    );

    tracing::info!(
        file_id = %request.file_id,
        model = %model,
        matches = field_matches.len(),
        "Extraction grounded"
    );

    Ok(Json(ExtractResponse {
        file_id: request.file_id,
        data,
        field_matches,
    }))
}

/// Header, then body, then configured fallback; empty values don't count.
fn resolve_api_key(headers: &HeaderMap, body_key: Option<&str>, config: &Config) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|key| !key.is_empty())
        .or_else(|| {
            body_key
                .map(str::to_string)
                .filter(|key| !key.is_empty())
        })
        .or_else(|| config.extraction.api_key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::config::Config;
    use crate::extraction::MockProvider;
    use crate::pdf::TextBlock;

    fn block(page: u32, block_index: u32, text: &str) -> TextBlock {
        TextBlock {
            page,
            x0: 72.0,
            y0: 700.0,
            x1: 240.0,
            y1: 712.0,
            text: text.to_string(),
            block_index,
        }
    }

    fn test_server(config: Config, response: Value) -> (AppState, TestServer) {
        let state = AppState::new(config, Arc::new(MockProvider { response }));
        let app = Router::new()
            .nest("/api/v1/extract", router())
            .with_state(state.clone());
        (state, TestServer::new(app).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_file_id_is_404() {
        let (_state, server) = test_server(Config::default(), json!({}));

        let response = server
            .post("/api/v1/extract")
            .json(&json!({
                "file_id": Uuid::new_v4(),
                "json_schema": {"properties": {}},
                "openai_api_key": "sk-test"
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_400() {
        let (state, server) = test_server(Config::default(), json!({}));
        let document = state.store().insert(b"pdf", 1, vec![block(1, 0, "text")]);

        let response = server
            .post("/api/v1/extract")
            .json(&json!({
                "file_id": document.file_id,
                "json_schema": {"properties": {}}
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_configured_api_key_is_accepted_as_fallback() {
        let mut config = Config::default();
        config.extraction.api_key = Some("sk-config".to_string());
        let (state, server) = test_server(config, json!({"_context_snippet": null}));
        let document = state.store().insert(b"pdf", 1, vec![block(1, 0, "text")]);

        let response = server
            .post("/api/v1/extract")
            .json(&json!({
                "file_id": document.file_id,
                "json_schema": {"properties": {}}
            }))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_extract_returns_data_and_grounded_matches() {
        let mock_response = json!({
            "invoice_number": "INV-42",
            "invoice_number_context": "Invoice INV-42",
            "_context_snippet": null
        });
        let (state, server) = test_server(Config::default(), mock_response.clone());
        let document = state
            .store()
            .insert(b"pdf", 1, vec![block(1, 0, "Invoice INV-42")]);

        let response = server
            .post("/api/v1/extract")
            .add_header(
                HeaderName::from_static(API_KEY_HEADER),
                HeaderValue::from_static("sk-test"),
            )
            .json(&json!({
                "file_id": document.file_id,
                "json_schema": {
                    "properties": {"invoice_number": {"type": "string"}}
                }
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["file_id"], json!(document.file_id));
        assert_eq!(body["data"], mock_response);

        let matches = body["field_matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["path"], json!("invoice_number"));
        assert_eq!(matches[0]["snippet"], json!("Invoice INV-42"));
        assert_eq!(matches[0]["matched_text"], json!("Invoice INV-42"));
        assert_eq!(matches[0]["score"], json!(100.0));
        assert_eq!(matches[0]["page"], json!(1));
        assert_eq!(matches[0]["block_index"], json!(0));
    }

    #[tokio::test]
    async fn test_unresolvable_snippets_drop_silently() {
        let mock_response = json!({
            "total": 99.5,
            "total_context": "nothing like the document says",
            "_context_snippet": null
        });
        let (state, server) = test_server(Config::default(), mock_response);
        let document = state
            .store()
            .insert(b"pdf", 1, vec![block(1, 0, "Grand total: 99.50 EUR")]);

        let response = server
            .post("/api/v1/extract")
            .add_header(
                HeaderName::from_static(API_KEY_HEADER),
                HeaderValue::from_static("sk-test"),
            )
            .json(&json!({
                "file_id": document.file_id,
                "json_schema": {"properties": {"total": {"type": "number"}}}
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        // Partial grounding is not an error: data survives, match list may
        // be shorter than the field list.
        assert_eq!(body["data"]["total"], json!(99.5));
        assert!(body["field_matches"].as_array().unwrap().is_empty());
    }
}
