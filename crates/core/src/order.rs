//! Order records built at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::{IdempotencyKey, OrderId, Price, ProductId, UserId};

/// A required shipping field was blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("full name is required")]
    MissingFullName,
    #[error("address is required")]
    MissingAddress,
    #[error("contact number is required")]
    MissingContact,
}

/// Shipping form as entered by the shopper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

/// Shipping details with every field present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub contact: String,
}

impl ShippingForm {
    /// Check that all three fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first blank field, checked in
    /// form order (name, address, contact).
    pub fn validate(&self) -> Result<ShippingDetails, ValidationError> {
        let full_name = required(&self.full_name, ValidationError::MissingFullName)?;
        let address = required(&self.address, ValidationError::MissingAddress)?;
        let contact = required(&self.contact, ValidationError::MissingContact)?;
        Ok(ShippingDetails {
            full_name,
            address,
            contact,
        })
    }
}

fn required(value: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value.to_owned())
    }
}

/// How the order is paid. The shop only takes cash on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            other => Err(format!("unsupported payment method: {other}")),
        }
    }
}

/// One ordered product, captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

impl From<&CartLine> for LineItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}

/// Snapshot the cart's lines, decoupled from later cart mutation.
#[must_use]
pub fn snapshot_lines(cart: &Cart) -> Vec<LineItem> {
    cart.lines().iter().map(LineItem::from).collect()
}

/// An order ready to be written to the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub idempotency_key: IdempotencyKey,
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub address: String,
    pub contact: String,
    pub total_amount: Price,
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItem>,
}

/// An order as stored, read back for order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub address: String,
    pub contact: String,
    pub total_amount: Price,
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }
}

/// Confirmation returned after a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total_amount: Price,
    pub item_count: u32,
}
