//! Authentication extractors.
//!
//! Both extractors read the identity out of the [`ShopSession`]; nothing
//! is looked up in the database per request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use sweet_treats_core::Identity;

use crate::session::ShopSession;

/// Extractor that requires a logged-in shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(identity): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
pub struct RequireAuth(pub Identity);

/// Rejection returned when the shopper is not logged in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Login required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalAuth(None));
        identity.map(Self).ok_or(AuthRejection)
    }
}

/// Extractor that optionally gets the logged-in shopper.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<Session>() {
            Some(session) => match ShopSession::load(session).await {
                Ok(shop) => shop.identity,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to load session; treating shopper as anonymous"
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Self(identity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use sweet_treats_core::{Email, UserId};

    use super::*;
    use crate::session::SHOP_SESSION_KEY;

    fn parts_with(session: Session) -> Parts {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        parts
    }

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_logged_in_session_is_authenticated() {
        let session = new_session();
        let mut shop = ShopSession::default();
        shop.sign_in(Identity {
            id: UserId::new(4),
            email: Email::parse("ann@shop.pk").unwrap(),
        });
        shop.save(&session).await.unwrap();

        let mut parts = parts_with(session);
        let Ok(RequireAuth(identity)) = RequireAuth::from_request_parts(&mut parts, &()).await
        else {
            panic!("expected an authenticated shopper");
        };
        assert_eq!(identity.id, UserId::new(4));
    }

    #[tokio::test]
    async fn test_unreadable_session_falls_back_to_anonymous() {
        let session = new_session();
        session.insert(SHOP_SESSION_KEY, 42).await.unwrap();
        assert!(ShopSession::load(&session).await.is_err());

        let mut parts = parts_with(session);
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());
        assert!(
            RequireAuth::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_anonymous() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());
    }
}
