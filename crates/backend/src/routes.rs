use axum::{routing::get, Router};

use crate::handlers;

/// Route configuration of the whole API
///
/// Every editable resource shares the same generic CRUD surface; the
/// resource segment is validated against the schema registry by the
/// handlers, so adding an aggregate needs no new route.
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/api/:resource",
            get(handlers::resource::list).post(handlers::resource::create),
        )
        .route(
            "/api/:resource/:id",
            get(handlers::resource::get_by_id)
                .put(handlers::resource::update)
                .delete(handlers::resource::delete),
        )
}
