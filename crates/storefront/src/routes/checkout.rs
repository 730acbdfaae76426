//! Checkout route handler.

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use sweet_treats_core::{OrderReceipt, ShippingForm, place_order};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::session::ShopSession;
use crate::state::AppState;

/// Submit the cart as a cash order.
///
/// The session is saved whatever the outcome: a success leaves an empty
/// cart behind, a failed submission keeps the cart and its checkout key so
/// a retry cannot create a second order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ShippingForm>,
) -> Result<Json<OrderReceipt>> {
    let mut shop = ShopSession::load(&session).await?;
    let store = OrderRepository::new(state.pool());

    let outcome = place_order(&mut shop.cart, &shop.identity, &form, &store).await;
    shop.save(&session).await?;

    Ok(Json(outcome?))
}
