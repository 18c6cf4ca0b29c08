//! Document Routes
//!
//! HTTP endpoints for document ingestion:
//! - POST /api/v1/documents - Upload and index a PDF
//! - GET /api/v1/documents/:file_id - Registry status for one document
//!
//! Indexing returns the full token map and rendered page images so the UI
//! can draw provenance overlays without a second round trip.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::pdf::{index_pdf, PageImage, TokenMap};
use crate::state::AppState;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(index_document))
        .route("/:file_id", get(document_status))
}

/// Response for a successful upload-and-index
#[derive(Debug, Serialize)]
pub struct IndexDocumentResponse {
    pub file_id: Uuid,
    pub page_count: u32,
    pub page_images: Vec<PageImage>,
    pub token_map: TokenMap,
}

/// Registry status for an indexed document
#[derive(Debug, Serialize)]
pub struct DocumentStatusResponse {
    pub file_id: Uuid,
    pub page_count: u32,
    pub block_count: usize,
    pub checksum: String,
    pub indexed_at: chrono::DateTime<chrono::Utc>,
}

/// POST /api/v1/documents
///
/// Accepts a multipart upload with a `file` field containing a PDF, indexes
/// it, and registers the result for later extraction calls.
async fn index_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IndexDocumentResponse>)> {
    let mut pdf_bytes: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some("application/pdf") {
            return Err(AppError::BadRequest(
                "Only PDF files are supported".to_string(),
            ));
        }
        pdf_bytes = Some(field.bytes().await?);
    }

    let pdf_bytes = pdf_bytes
        .ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".to_string()))?;
    if pdf_bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded PDF is empty".to_string()));
    }

    // MuPDF work is CPU-bound; keep it off the async workers.
    let bytes_for_index = pdf_bytes.clone();
    let index = tokio::task::spawn_blocking(move || index_pdf(&bytes_for_index))
        .await
        .map_err(|e| AppError::Internal(format!("indexing task failed: {e}")))??;

    let document = state
        .store()
        .insert(&pdf_bytes, index.page_count, index.token_map);

    tracing::info!(
        file_id = %document.file_id,
        pages = index.page_count,
        blocks = document.token_map.len(),
        "Document indexed"
    );

    Ok((
        StatusCode::CREATED,
        Json(IndexDocumentResponse {
            file_id: document.file_id,
            page_count: document.page_count,
            page_images: index.page_images,
            token_map: document.token_map.clone(),
        }),
    ))
}

/// GET /api/v1/documents/:file_id
async fn document_status(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<DocumentStatusResponse>> {
    let document = state
        .store()
        .get(&file_id)
        .ok_or_else(|| AppError::NotFound(format!("file_id {file_id} not found")))?;

    Ok(Json(DocumentStatusResponse {
        file_id: document.file_id,
        page_count: document.page_count,
        block_count: document.token_map.len(),
        checksum: document.checksum.clone(),
        indexed_at: document.indexed_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::config::Config;
    use crate::extraction::MockProvider;
    use crate::pdf::TextBlock;

    fn test_server() -> (AppState, TestServer) {
        let state = AppState::new(
            Config::default(),
            Arc::new(MockProvider {
                response: json!({}),
            }),
        );
        let app = Router::new()
            .nest("/api/v1/documents", router())
            .with_state(state.clone());
        (state, TestServer::new(app).unwrap())
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_content_type() {
        let (_state, server) = test_server();
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"plain words".to_vec())
                .file_name("note.txt")
                .mime_type("text/plain"),
        );

        let response = server.post("/api/v1/documents").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_empty_upload() {
        let (_state, server) = test_server();
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(Vec::new())
                .file_name("empty.pdf")
                .mime_type("application/pdf"),
        );

        let response = server.post("/api/v1/documents").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_missing_file_field() {
        let (_state, server) = test_server();
        let form = MultipartForm::new().add_part(
            "attachment",
            Part::bytes(b"misnamed".to_vec())
                .file_name("doc.pdf")
                .mime_type("application/pdf"),
        );

        let response = server.post("/api/v1/documents").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_for_unknown_document_is_404() {
        let (_state, server) = test_server();
        let response = server
            .get(&format!("/api/v1/documents/{}", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_reports_registered_document() {
        let (state, server) = test_server();
        let document = state.store().insert(
            b"raw pdf bytes",
            3,
            vec![TextBlock {
                page: 1,
                x0: 0.0,
                y0: 0.0,
                x1: 50.0,
                y1: 10.0,
                text: "hello".to_string(),
                block_index: 0,
            }],
        );

        let response = server
            .get(&format!("/api/v1/documents/{}", document.file_id))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["file_id"], json!(document.file_id));
        assert_eq!(body["page_count"], json!(3));
        assert_eq!(body["block_count"], json!(1));
        assert_eq!(body["checksum"], json!(document.checksum.clone()));
    }
}
