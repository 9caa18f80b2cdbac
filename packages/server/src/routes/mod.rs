use axum::Router;
use axum::routing::{any, get};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(upload_routes())
        .merge(photo_routes())
        .route("/media/{*key}", get(handlers::media::serve_media))
}

/// Upload endpoints accept every method so non-POST requests get a 400
/// from the handler rather than a 405 from the router.
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/", any(handlers::photo::upload_photo))
        .route("/upload", any(handlers::photo::upload_photo))
        .route("/api/upload/", any(handlers::photo::upload_photo))
        .route("/api/upload", any(handlers::photo::upload_photo))
}

fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/api/photos/", get(handlers::photo::list_photos))
        .route("/api/photos", get(handlers::photo::list_photos))
}
