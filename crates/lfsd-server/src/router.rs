use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all admin endpoints behind the auth gate.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/mgmt", get(handler::index_handler))
        .route("/mgmt/refresh", get(handler::refresh_handler))
        .route("/mgmt/objects", get(handler::objects_handler))
        .route("/mgmt/users", get(handler::users_handler))
        .route("/mgmt/add", post(handler::add_user_handler))
        .route("/mgmt/del", post(handler::del_user_handler))
        .route("/mgmt/css/:file", get(handler::css_handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
