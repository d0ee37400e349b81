pub mod following;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Following relationships
        .route("/api/following/all", get(following::latest))
        .route("/api/following/user", get(following::list_for_user))
        .route("/api/following/following/:id", get(following::check_status))
        .route("/api/following/org/:id", get(following::list_for_org))
        .route("/api/following/:id", get(following::get_one))
        .route(
            "/api/following",
            post(following::create)
                .put(following::update)
                .delete(following::remove),
        )
        .with_state(state)
}
