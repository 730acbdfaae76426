//! Cart route handlers.
//!
//! Every handler loads the [`ShopSession`], applies one cart command and
//! saves the session before answering with the updated cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sweet_treats_core::{Cart, CartLine, PriceBreakdown};

use crate::error::{AppError, Result};
use crate::session::ShopSession;
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub totals: PriceBreakdown,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            item_count: cart.item_count(),
            totals: PriceBreakdown::for_cart(cart),
        }
    }
}

/// Body naming a product.
#[derive(Debug, Deserialize)]
pub struct ProductName {
    pub name: String,
}

/// Body for a quantity change.
#[derive(Debug, Deserialize)]
pub struct QuantityChange {
    pub name: String,
    pub delta: i64,
}

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let shop = ShopSession::load(&session).await?;
    Ok(Json(CartView::from(&shop.cart)))
}

/// Add one unit of a catalog product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ProductName>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find(&body.name)
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.name)))?;

    let mut shop = ShopSession::load(&session).await?;
    shop.cart.add_to_cart(product);
    shop.save(&session).await?;

    Ok(Json(CartView::from(&shop.cart)))
}

/// Change a line's quantity by `delta`. Lines reaching zero are removed.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(body): Json<QuantityChange>) -> Result<Json<CartView>> {
    let mut shop = ShopSession::load(&session).await?;
    shop.cart.update_quantity(&body.name, body.delta);
    shop.save(&session).await?;

    Ok(Json(CartView::from(&shop.cart)))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(body): Json<ProductName>) -> Result<Json<CartView>> {
    let mut shop = ShopSession::load(&session).await?;
    shop.cart.remove_from_cart(&body.name);
    shop.save(&session).await?;

    Ok(Json(CartView::from(&shop.cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut shop = ShopSession::load(&session).await?;
    shop.cart.clear_cart();
    shop.save(&session).await?;

    Ok(Json(CartView::from(&shop.cart)))
}
