use crate::domain::OrderStatus;

use super::OrderError;

/// Decides whether an order may move from `current` to `requested`.
///
/// Cancelling is always allowed. Otherwise the status may stay put or move
/// forward along the chain. `Cancelled` and stored labels outside the chain
/// have no rank of their own and count as `Pending` when current. An unknown
/// label is never accepted as the requested status.
pub fn check_transition(current: &OrderStatus, requested: &OrderStatus) -> Result<(), OrderError> {
    if *requested == OrderStatus::Cancelled {
        return Ok(());
    }
    if let OrderStatus::Unknown(label) = requested {
        return Err(OrderError::ValidationError(format!("Unknown order status: {label}")));
    }

    let current_rank = current.rank().unwrap_or(0);
    let requested_rank = requested.rank().unwrap_or(0);

    if requested_rank >= current_rank {
        Ok(())
    } else {
        Err(OrderError::StatusRegression {
            from: current.clone(),
            to: requested.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_same_rank_allowed() {
        for current in &OrderStatus::ALL {
            for requested in &OrderStatus::ALL {
                if *requested == OrderStatus::Cancelled {
                    continue;
                }
                let current_rank = current.rank().unwrap_or(0);
                let requested_rank = requested.rank().unwrap_or(0);
                assert_eq!(
                    check_transition(current, requested).is_ok(),
                    requested_rank >= current_rank,
                    "{current} -> {requested}"
                );
            }
        }
    }

    #[test]
    fn test_cancel_always_allowed() {
        for current in &OrderStatus::ALL {
            assert_eq!(check_transition(current, &OrderStatus::Cancelled), Ok(()));
        }
    }

    #[test]
    fn test_regression_message() {
        let err = check_transition(&OrderStatus::Arrived, &OrderStatus::Processing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot change order status from Arrived back to Processing"
        );
    }

    #[test]
    fn test_cancelled_counts_as_pending() {
        assert!(check_transition(&OrderStatus::Cancelled, &OrderStatus::Pending).is_ok());
        assert!(check_transition(&OrderStatus::Cancelled, &OrderStatus::Completed).is_ok());
    }

    #[test]
    fn test_unknown_label() {
        let shipped = OrderStatus::Unknown("Shipped".to_string());
        assert!(check_transition(&shipped, &OrderStatus::Pending).is_ok());
        assert!(check_transition(&shipped, &OrderStatus::Arrived).is_ok());
        assert!(matches!(
            check_transition(&OrderStatus::Pending, &shipped),
            Err(OrderError::ValidationError(_))
        ));
    }
}
