pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, validate_admin_middleware};

pub use crate::state::AppState;

/// Build the full router.
///
/// `route_layer` only wraps the methods registered before it, so each
/// chain lists its gated methods first and its open methods after.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    let verify = from_fn_with_state(state.clone(), jwt_auth_middleware);
    let admin = from_fn_with_state(state.clone(), validate_admin_middleware);

    Router::new()
        // Public
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .route("/jwt", post(public::auth::issue_token))
        .route("/reviews", get(public::reviews::list))
        .route("/carts/:id", delete(public::carts::remove))
        // Users: list is elevated, registration is public
        .route(
            "/users",
            get(elevated::users::list)
                .route_layer(admin.clone())
                .route_layer(verify.clone())
                .post(public::users::register),
        )
        // Admin status is protected, promotion is elevated; one path, one parameter name
        .route(
            "/users/admin/:key",
            get(protected::users::check_admin)
                .route_layer(verify.clone())
                .merge(
                    patch(elevated::users::promote)
                        .route_layer(admin.clone())
                        .route_layer(verify.clone()),
                ),
        )
        // Menu: creation is elevated, listing is public
        .route(
            "/menu",
            post(elevated::menu::create)
                .route_layer(admin)
                .route_layer(verify.clone())
                .get(public::menu::list),
        )
        // Carts: listing is protected, adding is public
        .route(
            "/carts",
            get(protected::carts::list)
                .route_layer(verify)
                .post(public::carts::add),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Permissive when no origins are configured, otherwise an allow-list.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
