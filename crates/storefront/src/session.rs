//! Per-shopper session context.
//!
//! [`ShopSession`] bundles everything one browser session owns: the cart,
//! the logged-in identity and the chosen delivery city. Handlers load it
//! from the tower-sessions [`Session`], run their command against it and
//! save it back. Nothing here is global; two sessions never share a cart.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use sweet_treats_core::{Cart, City, Identity, IdentityProvider};

/// Session key under which the [`ShopSession`] is stored.
pub const SHOP_SESSION_KEY: &str = "shop";

/// State owned by one shopper session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSession {
    pub cart: Cart,
    pub identity: Option<Identity>,
    pub city: Option<City>,
}

impl ShopSession {
    /// Load the shopper's state, starting fresh if the session has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .get::<Self>(SHOP_SESSION_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Write the shopper's state back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(SHOP_SESSION_KEY, self).await
    }

    /// Record a successful login. The cart is kept.
    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Log out: forget the identity and reset the cart.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.cart.clear_cart();
    }
}

impl IdentityProvider for ShopSession {
    fn current_user(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sweet_treats_core::{Catalog, Email, UserId};

    use super::*;

    fn identity() -> Identity {
        Identity {
            id: UserId::new(1),
            email: Email::parse("ann@shop.pk").unwrap(),
        }
    }

    #[test]
    fn test_sign_in_keeps_cart() {
        let catalog = Catalog::bundled().unwrap();
        let mut shop = ShopSession::default();
        shop.cart.add_to_cart(catalog.find("Galaxy Sundae").unwrap());

        shop.sign_in(identity());

        assert!(shop.is_authenticated());
        assert_eq!(shop.cart.item_count(), 1);
    }

    #[test]
    fn test_sign_out_resets_cart() {
        let catalog = Catalog::bundled().unwrap();
        let mut shop = ShopSession::default();
        shop.sign_in(identity());
        shop.cart.add_to_cart(catalog.find("Galaxy Sundae").unwrap());

        shop.sign_out();

        assert!(!shop.is_authenticated());
        assert!(shop.cart.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut shop = ShopSession {
            city: Some(City::Karachi),
            ..ShopSession::default()
        };
        shop.sign_in(identity());
        let json = serde_json::to_value(&shop).unwrap();
        let restored: ShopSession = serde_json::from_value(json).unwrap();
        assert_eq!(restored, shop);
    }
}
