//! In-memory shopping cart.
//!
//! A [`Cart`] holds at most one [`CartLine`] per product name, in the order
//! the products were first added. Every operation is total: unknown names
//! are ignored and quantities that reach zero remove the line.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::order::ShippingDetails;
use crate::types::{IdempotencyKey, Price, ProductId, UserId};

/// One product in the cart with its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price copied from the catalog when the line was created.
    pub price: Price,
    pub image: String,
    /// Always `>= 1` while the line is in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    /// Checkout attempt of the current contents, if one started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checkout_key: Option<PendingCheckout>,
}

/// An idempotency key and the request it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PendingCheckout {
    key: IdempotencyKey,
    user_id: Option<UserId>,
    details: ShippingDetails,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line with the same name or appends a new line
    /// with quantity 1.
    pub fn add_to_cart(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.name == product.name) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: 1,
            }),
        }
        self.checkout_key = None;
    }

    /// Remove the line for `name`. Unknown names are ignored.
    pub fn remove_from_cart(&mut self, name: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.name != name);
        if self.lines.len() != before {
            self.checkout_key = None;
        }
    }

    /// Set the quantity of `name` to `max(quantity + delta, 0)`.
    ///
    /// A resulting quantity of zero removes the line. Unknown names are
    /// ignored. Quantities are capped at `u32::MAX`.
    pub fn update_quantity(&mut self, name: &str, delta: i64) {
        let Some(index) = self.lines.iter().position(|l| l.name == name) else {
            return;
        };
        if delta == 0 {
            return;
        }

        let current = self.lines.get(index).map_or(0, |l| i64::from(l.quantity));
        let next = current.saturating_add(delta).max(0);
        let next = u32::try_from(next).unwrap_or(u32::MAX);

        if next == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = next;
        }
        self.checkout_key = None;
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.checkout_key = None;
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, l| total.saturating_add(l.quantity))
    }

    /// Pre-tax subtotal: sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `name`, if present.
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Key identifying a checkout of the current contents by `user_id`
    /// shipping to `details`.
    ///
    /// The same key is returned until the cart, the shopper or the shipping
    /// details change, so only a retry of the identical request reuses it.
    pub fn checkout_key(
        &mut self,
        user_id: Option<UserId>,
        details: &ShippingDetails,
    ) -> IdempotencyKey {
        match &self.checkout_key {
            Some(pending) if pending.user_id == user_id && pending.details == *details => {
                pending.key
            }
            _ => {
                let key = IdempotencyKey::generate();
                self.checkout_key = Some(PendingCheckout {
                    key,
                    user_id,
                    details: details.clone(),
                });
                key
            }
        }
    }

    /// Key of the pending checkout attempt, without creating one.
    #[must_use]
    pub fn pending_checkout_key(&self) -> Option<IdempotencyKey> {
        self.checkout_key.as_ref().map(|pending| pending.key)
    }
}
