//! Order status transition stamps.
//!
//! `status_updated_at` records when an order's status last *changed*. It is
//! set when the order is first saved and again on every save that moves the
//! status to a different value. Saves that only touch other fields keep the
//! stored stamp.
//!
//! Any status may follow any other; staff decide the workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::OrderStatus;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The status columns of an order as currently persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct StoredStatus {
    pub status: OrderStatus,
    #[cfg_attr(feature = "postgres", sqlx(rename = "status_updated_at"))]
    pub updated_at: Option<DateTime<Utc>>,
}

/// What a save does to the status stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStamp {
    /// First save of the order.
    Created { status: OrderStatus, at: DateTime<Utc> },
    /// The status moved to a different value.
    Changed {
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    },
    /// Same status; the stored stamp is written back as-is.
    Unchanged(Option<DateTime<Utc>>),
}

impl StatusStamp {
    /// The value to persist in `status_updated_at`.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        match *self {
            Self::Created { at, .. } | Self::Changed { at, .. } => Some(at),
            Self::Unchanged(stored) => stored,
        }
    }

    #[must_use]
    pub const fn is_transition(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Changed { .. })
    }
}

/// Decides the stamp for each order save.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderStatusTracker<K = SystemClock> {
    clock: K,
}

impl<K: Clock> OrderStatusTracker<K> {
    #[must_use]
    pub const fn new(clock: K) -> Self {
        Self { clock }
    }

    /// Stamp for saving an order with `new_status`.
    ///
    /// `previous` is the persisted state, read in the same transaction as the
    /// write, or `None` when the order does not exist yet.
    #[must_use]
    pub fn on_save(&self, previous: Option<&StoredStatus>, new_status: OrderStatus) -> StatusStamp {
        match previous {
            None => StatusStamp::Created {
                status: new_status,
                at: self.clock.now(),
            },
            Some(stored) if stored.status != new_status => StatusStamp::Changed {
                from: stored.status,
                to: new_status,
                at: self.clock.now(),
            },
            Some(stored) => StatusStamp::Unchanged(stored.updated_at),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap()
    }

    fn tracker_at(at: DateTime<Utc>) -> OrderStatusTracker<FixedClock> {
        OrderStatusTracker::new(FixedClock(at))
    }

    #[test]
    fn test_new_record_is_stamped() {
        let now = t0();
        let stamp = tracker_at(now).on_save(None, OrderStatus::Pending);
        assert_eq!(
            stamp,
            StatusStamp::Created {
                status: OrderStatus::Pending,
                at: now
            }
        );
        assert_eq!(stamp.timestamp(), Some(now));
        assert!(stamp.is_transition());
    }

    #[test]
    fn test_same_status_keeps_stored_stamp() {
        let stored = StoredStatus {
            status: OrderStatus::Pending,
            updated_at: Some(t0()),
        };
        let later = t0() + Duration::hours(3);
        let stamp = tracker_at(later).on_save(Some(&stored), OrderStatus::Pending);

        assert_eq!(stamp, StatusStamp::Unchanged(Some(t0())));
        assert_eq!(stamp.timestamp(), Some(t0()));
        assert!(!stamp.is_transition());
    }

    #[test]
    fn test_same_status_without_stamp_stays_null() {
        let stored = StoredStatus {
            status: OrderStatus::Delivered,
            updated_at: None,
        };
        let stamp = tracker_at(t0()).on_save(Some(&stored), OrderStatus::Delivered);
        assert_eq!(stamp.timestamp(), None);
    }

    #[test]
    fn test_status_change_is_stamped() {
        let stored = StoredStatus {
            status: OrderStatus::Pending,
            updated_at: Some(t0()),
        };
        let later = t0() + Duration::days(1);
        let stamp = tracker_at(later).on_save(Some(&stored), OrderStatus::Processing);

        assert_eq!(
            stamp,
            StatusStamp::Changed {
                from: OrderStatus::Pending,
                to: OrderStatus::Processing,
                at: later
            }
        );
        assert_eq!(stamp.timestamp(), Some(later));
    }

    #[test]
    fn test_any_transition_is_allowed() {
        let tracker = tracker_at(t0());
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let stored = StoredStatus {
                    status: from,
                    updated_at: None,
                };
                let stamp = tracker.on_save(Some(&stored), to);
                assert_eq!(stamp.is_transition(), from != to, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let before = Utc::now();
        let stamp = OrderStatusTracker::new(SystemClock).on_save(None, OrderStatus::Pending);
        assert!(stamp.timestamp().is_some_and(|at| at >= before));
    }
}
