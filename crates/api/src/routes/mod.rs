//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod access;
pub mod codes;
pub mod health;
pub mod reports;
pub mod wallet;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except the health probe requires an authenticated user;
    // admin-only handlers additionally check the role themselves.
    let protected_routes = Router::new()
        .merge(wallet::routes())
        .merge(codes::routes())
        .merge(access::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}
