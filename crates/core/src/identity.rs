//! Shopper identity as seen by the checkout.
//!
//! Sessions and login live outside this crate. The core only needs to ask
//! who the shopper is and whether they are logged in.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// A logged-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: Email,
}

/// Source of the current shopper's identity.
pub trait IdentityProvider {
    /// The logged-in shopper, if any.
    fn current_user(&self) -> Option<&Identity>;

    /// Whether a shopper is logged in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

impl IdentityProvider for Option<Identity> {
    fn current_user(&self) -> Option<&Identity> {
        self.as_ref()
    }
}

impl IdentityProvider for Identity {
    fn current_user(&self) -> Option<&Identity> {
        Some(self)
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_user(&self) -> Option<&Identity> {
        (**self).current_user()
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_option_identity_provider() {
        let anonymous: Option<Identity> = None;
        assert!(!anonymous.is_authenticated());

        let shopper = Some(Identity {
            id: UserId::new(1),
            email: Email::parse("ann@shop.pk").unwrap(),
        });
        assert!(shopper.is_authenticated());
        assert_eq!(shopper.current_user().unwrap().id, UserId::new(1));
    }
}
