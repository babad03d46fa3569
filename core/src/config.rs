//! Pricing configuration.
//!
//! The order ledger never trusts a client-computed total: it recomputes the
//! total from price snapshots plus this server-owned policy and rejects the
//! request when the two deviate beyond the tolerance. Configuration values
//! should be provided by the application, not hardcoded.

use rust_decimal::Decimal;

/// Server-owned shipping/tax policy used to verify submitted order totals.
///
/// The default policy charges no shipping and no tax, so the computed total
/// equals the plain sum of line items.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Flat shipping fee added to every order.
    pub shipping_fee: Decimal,

    /// Item subtotal at which shipping becomes free, if any.
    pub free_shipping_threshold: Option<Decimal>,

    /// Tax rate applied to items plus shipping, as a fraction (`0.07` = 7%).
    pub tax_rate: Decimal,

    /// Maximum absolute deviation tolerated between the submitted and the
    /// computed total, absorbing client-side float rounding.
    ///
    /// Default: 0.01
    pub total_tolerance: Decimal,
}

impl PricingPolicy {
    /// Create a policy with a flat shipping fee.
    #[must_use]
    pub const fn new(shipping_fee: Decimal) -> Self {
        Self {
            shipping_fee,
            free_shipping_threshold: None,
            tax_rate: Decimal::ZERO,
            total_tolerance: Decimal::from_parts(1, 0, 0, false, 2),
        }
    }

    /// Set the free-shipping threshold.
    #[must_use]
    pub const fn with_free_shipping_over(mut self, threshold: Decimal) -> Self {
        self.free_shipping_threshold = Some(threshold);
        self
    }

    /// Set the tax rate.
    #[must_use]
    pub const fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Set the total-verification tolerance.
    #[must_use]
    pub const fn with_total_tolerance(mut self, tolerance: Decimal) -> Self {
        self.total_tolerance = tolerance;
        self
    }

    /// Compute the order total for a given item subtotal, rounded to cents.
    #[must_use]
    pub fn total_for(&self, item_subtotal: Decimal) -> Decimal {
        let shipping = match self.free_shipping_threshold {
            Some(threshold) if item_subtotal >= threshold => Decimal::ZERO,
            _ => self.shipping_fee,
        };
        ((item_subtotal + shipping) * (Decimal::ONE + self.tax_rate)).round_dp(2)
    }

    /// Whether a client-submitted total is acceptably close to the computed
    /// one.
    #[must_use]
    pub fn accepts(&self, submitted: Decimal, computed: Decimal) -> bool {
        (submitted - computed).abs() <= self.total_tolerance
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_identity() {
        let policy = PricingPolicy::default();
        let subtotal = Decimal::new(2000, 2); // 20.00

        assert_eq!(policy.total_for(subtotal), subtotal);
        assert!(policy.accepts(subtotal, subtotal));
    }

    #[test]
    fn test_flat_shipping_waived_over_threshold() {
        let policy = PricingPolicy::new(Decimal::new(499, 2)) // 4.99
            .with_free_shipping_over(Decimal::new(5000, 2)); // 50.00

        assert_eq!(
            policy.total_for(Decimal::new(2000, 2)),
            Decimal::new(2499, 2)
        );
        assert_eq!(
            policy.total_for(Decimal::new(6000, 2)),
            Decimal::new(6000, 2)
        );
    }

    #[test]
    fn test_tax_applied_and_rounded() {
        let policy = PricingPolicy::default().with_tax_rate(Decimal::new(7, 2)); // 7%

        // 10.00 * 1.07 = 10.70
        assert_eq!(
            policy.total_for(Decimal::new(1000, 2)),
            Decimal::new(1070, 2)
        );
    }

    #[test]
    fn test_tolerance_bounds() {
        let policy = PricingPolicy::default();
        let computed = Decimal::new(1000, 2);

        assert!(policy.accepts(Decimal::new(1001, 2), computed));
        assert!(!policy.accepts(Decimal::new(1002, 2), computed));
    }
}
