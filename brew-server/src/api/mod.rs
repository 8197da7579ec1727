//! HTTP routes for brew-server
//!
//! Each role group exposes `router()`; `create_router` stacks them behind
//! the auth middleware and a per-group role guard.

pub mod admin;
pub mod auth;
pub mod cafes;
pub mod chef;
pub mod customer;
pub mod health;
pub mod owner;
pub mod waiter;

use axum::routing::get;
use axum::{Json, Router, middleware};
use http::{HeaderValue, Method, header};
use shared::error::AppError;
use shared::models::Role;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, require_roles};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const CUSTOMER: &[Role] = &[Role::Customer];
/// Owner endpoints admit staff too; owner-only operations are narrowed by
/// the café scope check in each handler
const CAFE_MEMBERS: &[Role] = &[Role::CafeOwner, Role::Chef, Role::Waiter];
const CHEF: &[Role] = &[Role::Chef];
const WAITER: &[Role] = &[Role::Waiter];
const ADMIN: &[Role] = &[Role::Admin];

/// Plain `{ "message": ... }` body
pub fn message(msg: impl Into<String>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": msg.into() }))
}

fn guarded(router: Router<AppState>, roles: &'static [Role]) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(roles, require_roles))
}

fn cors(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);
    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, "Invalid FRONTEND_URL, CORS origin not set: {e}");
            layer
        }
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(guarded(customer::router(), CUSTOMER))
        .merge(guarded(owner::router(), CAFE_MEMBERS))
        .merge(guarded(chef::router(), CHEF))
        .merge(guarded(waiter::router(), WAITER))
        .merge(guarded(admin::router(), ADMIN))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::public_router())
        .merge(cafes::router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(cors(&state.frontend_url)),
        )
        .with_state(state)
}
