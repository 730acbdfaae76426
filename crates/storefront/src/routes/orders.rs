//! Order history route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use sweet_treats_core::Order;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Orders placed by the logged-in shopper, newest first.
#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(identity.id)
        .await?;
    Ok(Json(orders))
}
