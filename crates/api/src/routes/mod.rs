//! Route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod images;
pub mod posts;

/// Creates the router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(posts::routes())
        .merge(images::routes())
}
