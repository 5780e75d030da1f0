use serde::{Deserialize, Serialize};

use super::round_cents;

/// A percentage discount code with a usage limit and a cumulative budget.
///
/// Once either limit is reached the code can no longer be redeemed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub code: String,
    /// Percent off, in (0, 100].
    pub discount: f64,
    pub max_budget: f64,
    pub usage_limit: u32,
    #[serde(default)]
    pub used: u32,
    #[serde(default)]
    pub discount_granted: f64,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl PromoCode {
    /// Discount this code would grant on `subtotal`, in money.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        round_cents(subtotal * self.discount / 100.0)
    }

    pub fn remaining_uses(&self) -> u32 {
        self.usage_limit.saturating_sub(self.used)
    }

    pub fn remaining_budget(&self) -> f64 {
        round_cents((self.max_budget - self.discount_granted).max(0.0))
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses() == 0 || self.remaining_budget() <= 0.0
    }
}

/// Stored codes are trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Payload for creating a promo code from the admin form.
#[derive(Debug, Clone)]
pub struct PromoCreate {
    pub code: String,
    pub discount: f64,
    pub max_budget: f64,
    pub usage_limit: u32,
}

impl PromoCreate {
    pub fn new(code: impl Into<String>, discount: f64, max_budget: f64, usage_limit: u32) -> Self {
        Self {
            code: code.into(),
            discount,
            max_budget,
            usage_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(used: u32, granted: f64) -> PromoCode {
        PromoCode {
            code: "SAVE10".into(),
            discount: 10.0,
            max_budget: 100.0,
            usage_limit: 5,
            used,
            discount_granted: granted,
            active: true,
        }
    }

    #[test]
    fn test_discount_for_rounds_to_cents() {
        assert_eq!(code(0, 0.0).discount_for(33.33), 3.33);
    }

    #[test]
    fn test_exhaustion() {
        assert!(!code(4, 99.0).is_exhausted());
        assert!(code(5, 0.0).is_exhausted());
        assert!(code(1, 100.0).is_exhausted());
    }

    #[test]
    fn test_missing_counters_default() {
        let promo: PromoCode = serde_json::from_str(
            r#"{"code":"WELCOME","discount":5,"maxBudget":50,"usageLimit":10}"#,
        )
        .unwrap();
        assert_eq!(promo.used, 0);
        assert_eq!(promo.discount_granted, 0.0);
        assert!(promo.active);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  save10 "), "SAVE10");
    }
}
