//! Cake CRUD routes. `/cakes` and `/cakes/` are the same collection.

use crate::handlers::cake::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn cake_routes(state: AppState) -> Router {
    Router::new()
        .route("/cakes", get(list).post(create))
        .route("/cakes/", get(list).post(create))
        .route(
            "/cakes/:id",
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
