//! Re-arm handoff bookkeeping.
//!
//! Re-trapping in another area needs a new modal subscription scoped to that
//! area, and the old one has to be gone first. The old subscription notices
//! that its session was handed off on its next event and finishes, clearing
//! `trapping`. The new activation waits for that, either on the host's
//! teardown notification or by polling a timer.

use crate::host::{SubscriptionId, TimerId};
use crate::types::AreaId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handoff {
    /// Host calls back when it has removed the old subscription.
    Signal,
    /// Recurring timer re-checks the flags.
    Poll(TimerId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingRearm {
    pub(crate) target: AreaId,
    pub(crate) waiting_on: SubscriptionId,
    pub(crate) handoff: Handoff,
}

impl PendingRearm {
    pub(crate) fn timer(&self) -> Option<TimerId> {
        match self.handoff {
            Handoff::Poll(timer) => Some(timer),
            Handoff::Signal => None,
        }
    }

    pub(crate) fn is_polled_by(&self, timer: TimerId) -> bool {
        self.handoff == Handoff::Poll(timer)
    }

    pub(crate) fn awaits_signal_from(&self, subscription: SubscriptionId) -> bool {
        self.handoff == Handoff::Signal && self.waiting_on == subscription
    }
}
