//! Delivery city picker.

use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use sweet_treats_core::City;

use crate::error::{AppError, Result};
use crate::session::ShopSession;

/// Available cities and the shopper's current choice.
#[derive(Debug, Serialize)]
pub struct LocationView {
    pub cities: Vec<City>,
    pub selected: Option<City>,
}

impl LocationView {
    fn new(selected: Option<City>) -> Self {
        Self {
            cities: City::ALL.to_vec(),
            selected,
        }
    }
}

/// Body for choosing a city.
#[derive(Debug, Deserialize)]
pub struct ChooseCity {
    pub city: String,
}

/// Show the city picker state.
pub async fn show(session: Session) -> Result<Json<LocationView>> {
    let shop = ShopSession::load(&session).await?;
    Ok(Json(LocationView::new(shop.city)))
}

/// Choose a delivery city.
pub async fn choose(session: Session, Json(body): Json<ChooseCity>) -> Result<Json<LocationView>> {
    let city = body.city.parse::<City>().map_err(AppError::BadRequest)?;

    let mut shop = ShopSession::load(&session).await?;
    shop.city = Some(city);
    shop.save(&session).await?;

    Ok(Json(LocationView::new(shop.city)))
}
