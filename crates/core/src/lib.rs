//! Sweet Treats Core - catalog, cart, pricing and checkout.
//!
//! This crate holds the shop's domain logic, shared by:
//! - `storefront` - HTTP API for the mobile app
//! - `cli` - Command-line tools for migrations and catalog inspection
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic: no database,
//! no HTTP, no global state. The two outside collaborators are expressed as
//! traits and injected by the caller:
//!
//! - [`IdentityProvider`] - who is shopping and whether they are logged in
//! - [`OrderStore`] - where submitted orders are written
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails and prices
//! - [`catalog`] - Static product catalog grouped by category
//! - [`cart`] - In-memory cart engine
//! - [`pricing`] - Subtotal, tax, shipping and grand total
//! - [`order`] - Shipping form validation and order records
//! - [`checkout`] - Order submission
//! - [`identity`] - Shopper identity contract
//! - [`location`] - Delivery cities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod identity;
pub mod location;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogError, Category, CategoryGroup, Product};
pub use checkout::{CheckoutError, OrderStore, OrderStoreError, place_order};
pub use identity::{Identity, IdentityProvider};
pub use location::City;
pub use order::{
    LineItem, NewOrder, Order, OrderReceipt, PaymentMethod, ShippingDetails, ShippingForm,
    ValidationError,
};
pub use pricing::{PriceBreakdown, SHIPPING_FEE, TAX_RATE};
pub use types::*;
