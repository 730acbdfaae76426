//! Authentication route handlers.
//!
//! A successful signup or login stores the shopper's [`Identity`] in the
//! session; logout clears it together with the cart.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sweet_treats_core::Identity;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalAuth;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::session::ShopSession;
use crate::state::AppState;

/// Credentials for signup and login.
#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Create an account and log in.
#[instrument(skip(state, session, credentials))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<Identity>)> {
    let user = AuthService::new(state.pool())
        .register(&credentials.email, &credentials.password)
        .await?;
    let identity = start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(identity)))
}

/// Log in with email and password.
#[instrument(skip(state, session, credentials))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Identity>> {
    let user = AuthService::new(state.pool())
        .login(&credentials.email, &credentials.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;
    let identity = start_session(&session, &user).await?;
    Ok(Json(identity))
}

/// Log out. The cart is reset; the chosen city is kept.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    let mut shop = ShopSession::load(&session).await?;
    shop.sign_out();
    shop.save(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in shopper.
pub async fn me(OptionalAuth(identity): OptionalAuth) -> Result<Json<Identity>> {
    identity
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))
}

async fn start_session(session: &Session, user: &User) -> Result<Identity> {
    let identity = Identity::from(user);

    let mut shop = ShopSession::load(session).await?;
    shop.sign_in(identity.clone());
    session.cycle_id().await?;
    shop.save(session).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Shopper logged in");
    Ok(identity)
}
