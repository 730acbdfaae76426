//! Order submission.
//!
//! [`place_order`] turns a cart, the shopper's identity and a shipping form
//! into one [`NewOrder`], hands it to an [`OrderStore`], and clears the cart
//! once the store confirms the write.

use std::future::Future;

use crate::cart::Cart;
use crate::identity::IdentityProvider;
use crate::order::{
    NewOrder, OrderReceipt, PaymentMethod, ShippingForm, ValidationError, snapshot_lines,
};
use crate::pricing::PriceBreakdown;
use crate::types::OrderId;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by an [`OrderStore`].
#[derive(Debug, thiserror::Error)]
#[error("order store failure: {source}")]
pub struct OrderStoreError {
    #[source]
    source: BoxError,
}

impl OrderStoreError {
    /// Wrap an underlying error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Create an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            source: message.into().into(),
        }
    }
}

/// Durable storage for submitted orders.
pub trait OrderStore {
    /// Persist `order` and return its ID.
    ///
    /// Stores that track [`NewOrder::idempotency_key`] should return the
    /// existing ID when the same key is submitted twice rather than storing
    /// the order again.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderId, OrderStoreError>> + Send;
}

impl<T: OrderStore + Sync + ?Sized> OrderStore for &T {
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderId, OrderStoreError>> + Send {
        (**self).insert_order(order)
    }
}

/// Errors from [`place_order`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// No shopper is logged in.
    #[error("please log in to proceed with checkout")]
    AuthRequired,

    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// A shipping field is blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order store rejected or failed the write. The cart is unchanged.
    #[error("failed to place order: {0}")]
    Submission(#[from] OrderStoreError),
}

/// Submit the cart as an order.
///
/// Checks run in order: login, non-empty cart, shipping form. None of them
/// touch the store. The grand total is priced from the cart at submission
/// time. On success the cart is cleared; on any error it is left as is,
/// including its checkout key, so a retry reuses the same key.
///
/// Taking `&mut Cart` keeps the cart borrowed for the whole submission, so
/// it cannot be changed while the store call is in flight.
///
/// # Errors
///
/// See [`CheckoutError`].
pub async fn place_order<I, S>(
    cart: &mut Cart,
    identity: &I,
    form: &ShippingForm,
    store: &S,
) -> Result<OrderReceipt, CheckoutError>
where
    I: IdentityProvider + Sync + ?Sized,
    S: OrderStore + Sync + ?Sized,
{
    if !identity.is_authenticated() {
        return Err(CheckoutError::AuthRequired);
    }
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let details = form.validate()?;

    let totals = PriceBreakdown::for_cart(cart);
    let item_count = cart.item_count();
    let user_id = identity.current_user().map(|u| u.id);
    let order = NewOrder {
        idempotency_key: cart.checkout_key(user_id, &details),
        user_id,
        full_name: details.full_name,
        address: details.address,
        contact: details.contact,
        total_amount: totals.grand_total,
        payment_method: PaymentMethod::Cash,
        items: snapshot_lines(cart),
    };

    match store.insert_order(&order).await {
        Ok(order_id) => {
            tracing::info!(
                %order_id,
                idempotency_key = %order.idempotency_key,
                total = %order.total_amount,
                item_count,
                "Order placed"
            );
            cart.clear_cart();
            Ok(OrderReceipt {
                order_id,
                total_amount: order.total_amount,
                item_count,
            })
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                idempotency_key = %order.idempotency_key,
                "Failed to place order"
            );
            Err(CheckoutError::Submission(e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::Catalog;
    use crate::identity::Identity;
    use crate::types::{Email, Price, UserId};

    #[derive(Default)]
    struct RecordingStore {
        orders: Mutex<Vec<NewOrder>>,
        fail: bool,
    }

    impl OrderStore for RecordingStore {
        async fn insert_order(&self, order: &NewOrder) -> Result<OrderId, OrderStoreError> {
            if self.fail {
                return Err(OrderStoreError::msg("connection reset"));
            }
            let mut orders = self.orders.lock().unwrap();
            orders.push(order.clone());
            Ok(OrderId::new(i32::try_from(orders.len()).unwrap()))
        }
    }

    fn shopper() -> Option<Identity> {
        Some(Identity {
            id: UserId::new(9),
            email: Email::parse("ann@shop.pk").unwrap(),
        })
    }

    fn filled_form() -> ShippingForm {
        ShippingForm {
            full_name: "Ann".to_string(),
            address: "1 Canal Road, Faisalabad".to_string(),
            contact: "03001234567".to_string(),
        }
    }

    fn loaded_cart() -> Cart {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = Cart::new();
        cart.add_to_cart(catalog.find("Chocolate Fudge Cake").unwrap());
        cart.add_to_cart(catalog.find("Espresso Brownies").unwrap());
        cart.add_to_cart(catalog.find("Espresso Brownies").unwrap());
        cart
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let store = RecordingStore::default();
        let mut cart = loaded_cart();

        let receipt = place_order(&mut cart, &shopper(), &filled_form(), &store)
            .await
            .unwrap();

        assert_eq!(cart.item_count(), 0);
        assert_eq!(receipt.order_id, OrderId::new(1));
        assert_eq!(receipt.item_count, 3);

        let orders = store.orders.lock().unwrap();
        let order = orders.first().unwrap();
        assert_eq!(order.user_id, Some(UserId::new(9)));
        assert_eq!(order.payment_method, PaymentMethod::Cash);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_amount.to_string(), "Rs 6037.80");
        assert_eq!(receipt.total_amount, order.total_amount);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_before_submission() {
        let store = RecordingStore::default();
        let mut cart = loaded_cart();
        let before = cart.clone();
        let form = ShippingForm {
            full_name: "  ".to_string(),
            ..filled_form()
        };

        let err = place_order(&mut cart, &shopper(), &form, &store)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingFullName)
        ));
        assert_eq!(cart, before);
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_checkout_requires_login() {
        let store = RecordingStore::default();
        let mut cart = loaded_cart();

        let err = place_order(&mut cart, &None::<Identity>, &filled_form(), &store)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::AuthRequired));
        assert_eq!(cart.item_count(), 3);
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let store = RecordingStore::default();
        let err = place_order(&mut Cart::new(), &shopper(), &filled_form(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_store_failure_keeps_cart_and_key() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let mut cart = loaded_cart();

        let err = place_order(&mut cart, &shopper(), &filled_form(), &store)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Submission(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(cart.item_count(), 3);
        assert!(cart.pending_checkout_key().is_some());
    }

    #[tokio::test]
    async fn test_retry_reuses_idempotency_key() {
        let failing = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let mut cart = loaded_cart();
        let _ = place_order(&mut cart, &shopper(), &filled_form(), &failing).await;
        let key = cart.pending_checkout_key().unwrap();

        let store = RecordingStore::default();
        place_order(&mut cart, &shopper(), &filled_form(), &store)
            .await
            .unwrap();

        let orders = store.orders.lock().unwrap();
        assert_eq!(orders.first().unwrap().idempotency_key, key);
    }

    #[tokio::test]
    async fn test_snapshot_prices_at_submission() {
        let store = RecordingStore::default();
        let mut cart = loaded_cart();
        place_order(&mut cart, &shopper(), &filled_form(), &store)
            .await
            .unwrap();

        let orders = store.orders.lock().unwrap();
        let brownies = orders
            .first()
            .unwrap()
            .items
            .iter()
            .find(|i| i.name == "Espresso Brownies")
            .unwrap();
        assert_eq!(brownies.quantity, 2);
        assert_eq!(brownies.price, Price::from_rupees(1699));
    }
}
