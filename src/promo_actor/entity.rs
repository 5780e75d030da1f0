use tracing::info;

use crate::domain::{round_cents, PromoCode, PromoCreate};
use crate::entity::Entity;
use crate::store::PROMO_CODES_KEY;

use super::actions::{PromoAction, PromoActionResult};
use super::PromoError;

impl Entity for PromoCode {
    const COLLECTION_KEY: &'static str = PROMO_CODES_KEY;
    type CreateParams = PromoCreate;
    type Patch = (); // Codes are never edited, only toggled
    type Action = PromoAction;
    type ActionResult = PromoActionResult;
    type Error = PromoError;

    fn id(&self) -> &str {
        &self.code
    }

    /// Creates a code with zeroed counters, active.
    ///
    /// `code` is the already normalised code; uniqueness is checked by the
    /// caller against the stored collection.
    fn from_create_params(code: String, params: PromoCreate) -> Result<Self, PromoError> {
        if code.is_empty() {
            return Err(PromoError::ValidationError("Code is required".to_string()));
        }
        if params.discount.is_nan() || params.discount <= 0.0 || params.discount > 100.0 {
            return Err(PromoError::ValidationError(
                "Discount must be greater than 0 and at most 100 percent".to_string(),
            ));
        }
        if params.max_budget.is_nan() || params.max_budget <= 0.0 {
            return Err(PromoError::ValidationError(
                "Maximum budget must be greater than zero".to_string(),
            ));
        }
        if params.usage_limit == 0 {
            return Err(PromoError::ValidationError(
                "Usage limit must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            code,
            discount: params.discount,
            max_budget: params.max_budget,
            usage_limit: params.usage_limit,
            used: 0,
            discount_granted: 0.0,
            active: true,
        })
    }

    fn not_found(code: &str) -> PromoError {
        PromoError::NotFound(code.to_string())
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), PromoError> {
        Ok(())
    }

    fn handle_action(&mut self, action: PromoAction) -> Result<PromoActionResult, PromoError> {
        match action {
            PromoAction::Toggle => {
                self.active = !self.active;
                Ok(PromoActionResult::Toggled {
                    active: self.active,
                })
            }
            PromoAction::Redeem { subtotal } => self.redeem(subtotal),
        }
    }
}

impl PromoCode {
    fn redeem(&mut self, subtotal: f64) -> Result<PromoActionResult, PromoError> {
        if !self.active {
            return Err(PromoError::Inactive(self.code.clone()));
        }
        if self.used >= self.usage_limit {
            return Err(PromoError::UsageLimitReached(self.code.clone()));
        }

        let amount = self.discount_for(subtotal.max(0.0));
        let remaining = self.remaining_budget();
        if amount > remaining {
            return Err(PromoError::BudgetExceeded {
                code: self.code.clone(),
                requested: amount,
                remaining,
            });
        }

        self.used += 1;
        self.discount_granted = round_cents(self.discount_granted + amount);

        let exhausted = self.is_exhausted();
        if exhausted {
            self.active = false;
            info!(code = %self.code, used = self.used, "Promo code exhausted and deactivated");
        }

        Ok(PromoActionResult::Redeemed { amount, exhausted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save10() -> PromoCode {
        PromoCode::from_create_params("SAVE10".into(), PromoCreate::new("save10", 10.0, 100.0, 5)).unwrap()
    }

    #[test]
    fn test_create_starts_active_and_unused() {
        let promo = save10();
        assert_eq!(promo.used, 0);
        assert_eq!(promo.discount_granted, 0.0);
        assert!(promo.active);
    }

    #[test]
    fn test_create_validation() {
        for (code, params) in [
            ("", PromoCreate::new("", 10.0, 100.0, 5)),
            ("A", PromoCreate::new("A", 0.0, 100.0, 5)),
            ("A", PromoCreate::new("A", 101.0, 100.0, 5)),
            ("A", PromoCreate::new("A", 10.0, 0.0, 5)),
            ("A", PromoCreate::new("A", 10.0, 100.0, 0)),
        ] {
            assert!(matches!(
                PromoCode::from_create_params(code.into(), params),
                Err(PromoError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_toggle_flips_only_active() {
        let mut promo = save10();
        promo.handle_action(PromoAction::Redeem { subtotal: 50.0 }).unwrap();
        let before = promo.clone();

        assert_eq!(
            promo.handle_action(PromoAction::Toggle),
            Ok(PromoActionResult::Toggled { active: false })
        );
        assert_eq!(promo, PromoCode { active: false, ..before });
    }

    #[test]
    fn test_redeem_counts_usage_and_budget() {
        let mut promo = save10();
        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 200.0 }),
            Ok(PromoActionResult::Redeemed { amount: 20.0, exhausted: false })
        );
        assert_eq!(promo.used, 1);
        assert_eq!(promo.discount_granted, 20.0);
    }

    #[test]
    fn test_redeem_rejects_inactive() {
        let mut promo = save10();
        promo.handle_action(PromoAction::Toggle).unwrap();
        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 10.0 }),
            Err(PromoError::Inactive("SAVE10".into()))
        );
        assert_eq!(promo.used, 0);
    }

    #[test]
    fn test_usage_limit_deactivates() {
        let mut promo = PromoCode::from_create_params("ONCE".into(), PromoCreate::new("once", 10.0, 100.0, 1)).unwrap();
        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 10.0 }),
            Ok(PromoActionResult::Redeemed { amount: 1.0, exhausted: true })
        );
        assert!(!promo.active);

        // Re-enabling does not bring back spent uses.
        promo.handle_action(PromoAction::Toggle).unwrap();
        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 10.0 }),
            Err(PromoError::UsageLimitReached("ONCE".into()))
        );
    }

    #[test]
    fn test_budget_exceeded() {
        let mut promo = save10();
        promo.handle_action(PromoAction::Redeem { subtotal: 900.0 }).unwrap();
        assert_eq!(promo.remaining_budget(), 10.0);

        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 200.0 }),
            Err(PromoError::BudgetExceeded {
                code: "SAVE10".into(),
                requested: 20.0,
                remaining: 10.0
            })
        );

        // Spending exactly the rest exhausts the budget.
        assert_eq!(
            promo.handle_action(PromoAction::Redeem { subtotal: 100.0 }),
            Ok(PromoActionResult::Redeemed { amount: 10.0, exhausted: true })
        );
        assert!(!promo.active);
    }
}
