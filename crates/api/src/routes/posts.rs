//! Landing page and upload routes.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use imgboard_core::post::{NewPost, Post, PostError, PostListing, UploadService};
use imgboard_core::storage::BackendAvailability;
use imgboard_shared::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::AppState;
use crate::error::ApiError;

/// Creates the landing page and upload routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Fixed confirmation message.
    pub message: &'static str,
    /// Identifier of the new post.
    pub id: String,
}

/// Landing page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    posts: Vec<Post>,
    availability: BackendAvailability,
}

/// Fields collected from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    note: Option<String>,
    file: Option<(Bytes, Option<String>)>,
}

impl UploadForm {
    /// Check required-field presence and build the service input.
    ///
    /// Browsers send an empty `file` part when no file was chosen, so an
    /// empty part counts as missing.
    fn into_new_post(self) -> Result<NewPost, PostError> {
        let title = self.title.ok_or(PostError::MissingField("title"))?;
        let note = self.note.ok_or(PostError::MissingField("note"))?;
        let (image, content_type) = self
            .file
            .filter(|(image, _)| !image.is_empty())
            .ok_or(PostError::MissingField("file"))?;

        Ok(NewPost {
            title,
            note,
            image,
            content_type,
        })
    }
}

/// Read the `title`, `note`, and `file` parts. Unknown parts are skipped.
async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("title") => form.title = Some(field.text().await?),
            Some("note") => form.note = Some(field.text().await?),
            Some("file") => {
                let content_type = field.content_type().map(str::to_owned);
                form.file = Some((field.bytes().await?, content_type));
            }
            _ => {}
        }
    }

    Ok(form)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/`
/// Render the upload form, the post list, and backend status.
async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = PostListing::new(state.storage.clone()).snapshot().await;

    let page = IndexTemplate {
        posts: snapshot.posts,
        availability: snapshot.availability,
    };

    page.render().map(Html).map_err(|e| {
        error!(error = %e, "Failed to render landing page");
        ApiError(AppError::Internal("failed to render page".into()))
    })
}

/// POST `/upload`
/// Store a multipart upload of `title`, `note`, and `file`.
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Malformed upload form");
            return (
                e.status(),
                Json(json!({
                    "error": "invalid_multipart",
                    "message": e.body_text()
                })),
            )
                .into_response();
        }
    };

    let result = match form.into_new_post() {
        Ok(input) => UploadService::new(state.storage.clone()).upload(input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(receipt) => (
            StatusCode::OK,
            Json(UploadResponse {
                message: "Upload successful",
                id: receipt.id,
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
