//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Database readiness check
//!
//! # Catalog
//! GET  /api/catalog            - All categories with their products
//! GET  /api/catalog/{category} - Products of one category
//! GET  /api/search?q=          - Product name search
//!
//! # Cart (session scoped)
//! GET  /api/cart               - Cart lines, item count and price breakdown
//! POST /api/cart/add           - Add one unit ({name})
//! POST /api/cart/update        - Change quantity ({name, delta})
//! POST /api/cart/remove        - Remove a line ({name})
//! POST /api/cart/clear         - Empty the cart
//!
//! # Checkout
//! POST /api/checkout           - Submit the cart ({full_name, address, contact})
//! GET  /api/orders             - Order history (requires auth)
//!
//! # Location
//! GET  /api/location           - Delivery cities and the chosen one
//! POST /api/location           - Choose a city ({city})
//!
//! # Auth
//! POST /api/auth/signup        - Create account and log in
//! POST /api/auth/login         - Log in
//! POST /api/auth/logout        - Log out (resets the cart)
//! GET  /api/auth/me            - Current shopper
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod location;
pub mod orders;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{category}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/catalog", catalog_routes())
        .route("/api/search", get(catalog::search))
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::submit))
        .route("/api/orders", get(orders::index))
        .route(
            "/api/location",
            get(location::show).post(location::choose),
        )
        .nest("/api/auth", auth_routes())
}

/// Build the full application: health checks, API routes, sessions and
/// request tracing. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
