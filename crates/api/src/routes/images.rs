//! Image download route.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use imgboard_core::post::{ImageRetrievalService, PostError};
use serde_json::json;
use tracing::debug;

use crate::AppState;

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/image/{id}", get(get_image))
}

/// GET `/image/{id}`
/// Serve image bytes with their stored content type.
async fn get_image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match ImageRetrievalService::new(state.storage.clone()).get(&id).await {
        Ok(blob) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, blob.content_type),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            ],
            blob.bytes,
        )
            .into_response(),
        Err(PostError::NotFound(_)) => {
            debug!(id = %id, "Image not found");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Image not found" })),
            )
                .into_response()
        }
        Err(e) => crate::error::ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use imgboard_core::post::ImageBlob;
    use imgboard_core::storage::StorageContext;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_stored_bytes() {
        let storage = Arc::new(StorageContext::local_only());
        storage
            .local()
            .put_image("abc", ImageBlob::new(vec![0xFFu8, 0xD8, 0xFF], None));

        let response = routes()
            .with_state(AppState::new(storage))
            .oneshot(get("/image/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), &[0xFFu8, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_html_upload_is_served_as_image() {
        let boundary = "imgboard-html-upload";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\nt\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\nn\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"x.html\"\r\n\
             Content-Type: text/html\r\n\r\n\
             <script>alert(document.cookie)</script>\r\n\
             --{boundary}--\r\n"
        );
        let app = crate::routes::routes()
            .with_state(AppState::new(Arc::new(StorageContext::local_only())));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let uploaded = response.into_body().collect().await.unwrap().to_bytes();
        let uploaded: serde_json::Value = serde_json::from_slice(&uploaded).unwrap();
        let id = uploaded["id"].as_str().unwrap();

        let response = app.oneshot(get(&format!("/image/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let response = routes()
            .with_state(AppState::new(Arc::new(StorageContext::local_only())))
            .oneshot(get("/image/missing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Image not found" }));
    }
}
