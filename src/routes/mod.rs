use axum::{routing::post, Router};

use crate::handlers::rpc;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // One endpoint: POST carries the RPC body, GET is the liveness probe.
    Router::new()
        .route("/", post(rpc::handle_rpc).get(rpc::probe))
        .with_state(state)
}
