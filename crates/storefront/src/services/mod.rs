//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Shopper sign-up and password login
//!
//! Cart, pricing and checkout logic live in `sweet_treats_core`; routes call
//! them directly against the shopper's session.

pub mod auth;
