//! Order status.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Where an order is in its lifecycle. Variants are declared in lifecycle
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipping,
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Shipping, Self::Delivered];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
        }
    }

    /// Whether an order in this status may be moved to `target`.
    ///
    /// Orders only move forward. Skipping ahead is allowed, and setting the
    /// current status again is a no-op that is allowed too.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        target >= self
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_round_trip_through_strings() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "cancelled".parse::<OrderStatus>(),
            Err(UnknownOrderStatus("cancelled".to_string()))
        );
        assert!("Paid".parse::<OrderStatus>().is_err(), "parsing is case-sensitive");
    }

    #[test]
    fn forward_and_same_status_transitions_are_allowed() {
        use OrderStatus::{Delivered, Paid, Pending, Shipping};

        assert!(Pending.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Shipping));
        assert!(Shipping.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Delivered), "skipping ahead is allowed");
        assert!(Paid.can_transition_to(Paid), "same status is a no-op");
    }

    #[test]
    fn backward_transitions_are_refused() {
        use OrderStatus::{Delivered, Paid, Pending, Shipping};

        assert!(!Paid.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Shipping));
        assert!(!Shipping.can_transition_to(Paid));
    }

    #[test]
    fn new_orders_are_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
