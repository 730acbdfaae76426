//! Integration tests for the shopping flow.
//!
//! A [`ShopSession`] is driven through browsing, cart edits and checkout
//! against the in-memory order store.

#![allow(clippy::unwrap_used)]

use sweet_treats_core::{
    Catalog, CheckoutError, IdentityProvider, NewOrder, OrderId, OrderStore, OrderStoreError,
    Price, PriceBreakdown, ShippingForm, UserId, ValidationError, place_order,
};
use sweet_treats_integration_tests::{MemoryOrderStore, shopper};
use sweet_treats_storefront::session::ShopSession;

fn form(full_name: &str) -> ShippingForm {
    ShippingForm {
        full_name: full_name.to_string(),
        address: "12 Canal Road, Lahore".to_string(),
        contact: "0300-1234567".to_string(),
    }
}

fn form_to(full_name: &str, address: &str) -> ShippingForm {
    ShippingForm {
        address: address.to_string(),
        ..form(full_name)
    }
}

/// Writes the order, then reports a failure as if the reply was lost.
struct LostReply<'a>(&'a MemoryOrderStore);

impl OrderStore for LostReply<'_> {
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderId, OrderStoreError> {
        self.0.insert_order(order).await?;
        Err(OrderStoreError::msg("connection reset before reply"))
    }
}

fn logged_in() -> ShopSession {
    let mut shop = ShopSession::default();
    shop.sign_in(shopper(7, "ayesha@example.pk").unwrap());
    shop
}

// =============================================================================
// Cart Tests
// =============================================================================

#[test]
fn test_repeated_adds_collapse_into_one_line() {
    let catalog = Catalog::bundled().unwrap();
    let product = catalog.find("Oreo Brownies").unwrap();

    for calls in 1..=5_u32 {
        let mut shop = ShopSession::default();
        for _ in 0..calls {
            shop.cart.add_to_cart(product);
        }
        assert_eq!(shop.cart.lines().len(), 1);
        assert_eq!(shop.cart.line("Oreo Brownies").unwrap().quantity, calls);
    }
}

#[test]
fn test_totals_match_lines_for_every_product() {
    let catalog = Catalog::bundled().unwrap();
    let mut shop = ShopSession::default();

    for (i, product) in catalog.products().enumerate() {
        for _ in 0..=i % 3 {
            shop.cart.add_to_cart(product);
        }

        let expected_total: Price = shop
            .cart
            .lines()
            .iter()
            .map(|l| l.price * l.quantity)
            .sum();
        let expected_count: u32 = shop.cart.lines().iter().map(|l| l.quantity).sum();
        assert_eq!(shop.cart.total_price(), expected_total);
        assert_eq!(shop.cart.item_count(), expected_count);
    }
}

#[test]
fn test_negative_full_quantity_removes_line() {
    let catalog = Catalog::bundled().unwrap();
    let mut shop = ShopSession::default();
    shop.cart.add_to_cart(catalog.find("Coffee Cake").unwrap());
    shop.cart.add_to_cart(catalog.find("Coffee Cake").unwrap());
    shop.cart.add_to_cart(catalog.find("Galaxy Sundae").unwrap());

    shop.cart.update_quantity("Coffee Cake", -2);

    assert!(shop.cart.line("Coffee Cake").is_none());
    assert_eq!(shop.cart.item_count(), 1);
}

#[test]
fn test_remove_unknown_name_is_a_no_op() {
    let catalog = Catalog::bundled().unwrap();
    let mut shop = ShopSession::default();
    shop.cart.add_to_cart(catalog.find("Galaxy Sundae").unwrap());
    let before = shop.cart.clone();

    shop.cart.remove_from_cart("Mango Cake");

    assert_eq!(shop.cart, before);
}

// =============================================================================
// Pricing Tests
// =============================================================================

#[test]
fn test_two_product_scenario_totals() {
    let catalog = Catalog::bundled().unwrap();
    let mut shop = ShopSession::default();
    shop.cart.add_to_cart(catalog.find("Chocolate Fudge Cake").unwrap());
    shop.cart.add_to_cart(catalog.find("Nutella Brownies").unwrap());
    shop.cart.add_to_cart(catalog.find("Nutella Brownies").unwrap());

    let totals = PriceBreakdown::for_cart(&shop.cart);

    assert_eq!(totals.subtotal.to_string(), "Rs 5398.00");
    assert_eq!(totals.tax.to_string(), "Rs 539.80");
    assert_eq!(totals.shipping.to_string(), "Rs 100.00");
    assert_eq!(totals.grand_total.to_string(), "Rs 6037.80");
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[tokio::test]
async fn test_successful_checkout_clears_cart() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Red Velvet Cake").unwrap());
    shop.cart.add_to_cart(catalog.find("Galaxy Sundae").unwrap());

    let receipt = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap();

    assert_eq!(shop.cart.item_count(), 0);
    assert_eq!(receipt.item_count, 2);
    assert_eq!(store.len(), 1);

    let stored = store.get(receipt.order_id).unwrap();
    assert_eq!(stored.user_id, shop.current_user().map(|u| u.id));
    assert_eq!(stored.full_name, "Ayesha Khan");
    assert_eq!(stored.items.len(), 2);
    // (2199 + 899) * 1.1 + 100
    assert_eq!(stored.total_amount.to_string(), "Rs 3507.80");
}

#[tokio::test]
async fn test_blank_name_is_rejected_and_cart_kept() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Classic Brownies").unwrap());
    let before = shop.cart.clone();

    let err = place_order(&mut shop.cart, &shop.identity, &form("   "), &store)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Validation(ValidationError::MissingFullName)
    ));
    assert_eq!(shop.cart, before);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_anonymous_checkout_requires_login() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = ShopSession::default();
    shop.cart.add_to_cart(catalog.find("Classic Brownies").unwrap());

    let err = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::AuthRequired));
    assert_eq!(shop.cart.item_count(), 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_retry_after_failure_creates_one_order() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Espresso Brownies").unwrap());

    store.set_failing(true);
    let err = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Submission(_)));
    assert_eq!(shop.cart.item_count(), 1);
    let key = shop.cart.pending_checkout_key().unwrap();

    store.set_failing(false);
    let receipt = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(receipt.order_id).unwrap().idempotency_key, key);
    assert!(shop.cart.is_empty());
}

#[tokio::test]
async fn test_editing_cart_after_failure_starts_new_order() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Espresso Brownies").unwrap());

    store.set_failing(true);
    let _ = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store).await;
    let failed_key = shop.cart.pending_checkout_key().unwrap();

    shop.cart.add_to_cart(catalog.find("Nutella Sundae").unwrap());
    assert!(shop.cart.pending_checkout_key().is_none());

    store.set_failing(false);
    let receipt = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap();

    let stored = store.get(receipt.order_id).unwrap();
    assert_ne!(stored.idempotency_key, failed_key);
    assert_eq!(stored.items.len(), 2);
}

#[tokio::test]
async fn test_sign_out_resets_cart_and_blocks_checkout() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Caramel Brownies").unwrap());

    shop.sign_out();
    shop.cart.add_to_cart(catalog.find("Caramel Brownies").unwrap());

    let err = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::AuthRequired));
    assert_eq!(shop.cart.item_count(), 1);
}

#[tokio::test]
async fn test_other_shopper_after_lost_reply_gets_own_order() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Red Velvet Sundae").unwrap());

    let err = place_order(
        &mut shop.cart,
        &shop.identity,
        &form_to("Ayesha Khan", "A street"),
        &LostReply(&store),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CheckoutError::Submission(_)));
    assert_eq!(store.len(), 1);

    shop.sign_in(shopper(8, "bilal@example.pk").unwrap());
    let receipt = place_order(
        &mut shop.cart,
        &shop.identity,
        &form_to("Bilal Ahmed", "B street"),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(store.len(), 2);
    let stored = store.get(receipt.order_id).unwrap();
    assert_eq!(stored.user_id, Some(UserId::new(8)));
    assert_eq!(stored.address, "B street");
}

#[tokio::test]
async fn test_edited_address_after_lost_reply_is_a_new_order() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Three Milk Sundae").unwrap());

    let _ = place_order(
        &mut shop.cart,
        &shop.identity,
        &form_to("Ayesha Khan", "A street"),
        &LostReply(&store),
    )
    .await;

    let receipt = place_order(
        &mut shop.cart,
        &shop.identity,
        &form_to("Ayesha Khan", "B street"),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(receipt.order_id).unwrap().address, "B street");
}

#[tokio::test]
async fn test_identical_retry_after_lost_reply_returns_stored_order() {
    let catalog = Catalog::bundled().unwrap();
    let store = MemoryOrderStore::new();
    let mut shop = logged_in();
    shop.cart.add_to_cart(catalog.find("Three Milk Sundae").unwrap());

    let _ = place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &LostReply(&store))
        .await;
    place_order(&mut shop.cart, &shop.identity, &form("Ayesha Khan"), &store)
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    assert!(shop.cart.is_empty());
}
