//! Core value types for Sweet Treats.
//!
//! Type-safe wrappers for IDs, email addresses and money.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
