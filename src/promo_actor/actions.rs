/// Custom actions for promo codes.
#[derive(Debug, Clone, PartialEq)]
pub enum PromoAction {
    /// Flips the active flag. Counters are untouched.
    Toggle,
    /// Consumes one use of the code against an order subtotal.
    ///
    /// # Errors
    /// Fails if the code is inactive, out of uses, or the discount would
    /// exceed the remaining budget.
    Redeem { subtotal: f64 },
}

/// Results from PromoActions - variants match 1:1 with PromoAction
#[derive(Debug, Clone, PartialEq)]
pub enum PromoActionResult {
    Toggled { active: bool },
    Redeemed { amount: f64, exhausted: bool },
}
