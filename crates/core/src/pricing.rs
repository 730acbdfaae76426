//! Order pricing: subtotal, tax, shipping and grand total.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::Cart;
use crate::types::Price;

/// Sales tax rate applied to the subtotal (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Flat delivery fee in rupees.
pub const SHIPPING_FEE: u32 = 100;

/// Derived totals for a cart.
///
/// Always computed from the current subtotal; nothing here is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Price,
    pub tax: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

impl PriceBreakdown {
    /// Price a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let tax = subtotal.scale(TAX_RATE);
        let shipping = Price::from_rupees(SHIPPING_FEE);
        Self {
            subtotal,
            tax,
            shipping,
            grand_total: subtotal + tax + shipping,
        }
    }

    /// Price the cart's current contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_subtotal(cart.total_price())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_thousand_rupee_subtotal() {
        let breakdown = PriceBreakdown::from_subtotal(Price::from_rupees(1000));
        assert_eq!(breakdown.tax, Price::from_rupees(100));
        assert_eq!(breakdown.shipping, Price::from_rupees(100));
        assert_eq!(breakdown.grand_total, Price::from_rupees(1200));
    }

    #[test]
    fn test_fractional_tax() {
        let breakdown = PriceBreakdown::from_subtotal(Price::from_rupees(5398));
        assert_eq!(breakdown.tax, Price::new(Decimal::new(5398, 1)).unwrap());
        assert_eq!(
            breakdown.grand_total,
            Price::new(Decimal::new(60378, 1)).unwrap()
        );
    }

    #[test]
    fn test_empty_cart_still_pays_shipping() {
        let breakdown = PriceBreakdown::for_cart(&Cart::new());
        assert_eq!(breakdown.subtotal, Price::ZERO);
        assert_eq!(breakdown.tax, Price::ZERO);
        assert_eq!(breakdown.grand_total, Price::from_rupees(SHIPPING_FEE));
    }

    #[test]
    fn test_tax_rate_is_ten_percent() {
        assert_eq!(TAX_RATE, Decimal::new(10, 2));
    }
}
