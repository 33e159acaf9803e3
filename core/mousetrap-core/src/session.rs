//! Trap session state.
//!
//! A [`Session`] exists from activation until the session is switched off,
//! escaped, or handed over to a new area. It is owned by the controller that
//! the host dispatches into; nothing here is global.

use crate::host::SubscriptionId;
use crate::types::AreaId;
use serde::{Deserialize, Serialize};

/// The two observable session flags.
///
/// `trapping` implies `activated`, except while a re-arm handoff is waiting
/// for the old subscription to finish (`activated == false, trapping == true`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct SessionFlags {
    pub activated: bool,
    pub trapping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum TrapState {
    Inactive,
    /// Cursor is being clamped.
    Trapping,
    /// Session is running but the cursor is free (after a right click).
    Released,
    /// Waiting for the old subscription to end before trapping a new area.
    Rearming,
}

impl TrapState {
    pub fn as_str(self) -> &'static str {
        match self {
            TrapState::Inactive => "inactive",
            TrapState::Trapping => "trapping",
            TrapState::Released => "released",
            TrapState::Rearming => "rearming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) activated: bool,
    pub(crate) trapping: bool,
    pub(crate) area: AreaId,
    pub(crate) subscription: SubscriptionId,
}

impl Session {
    pub(crate) fn start(area: AreaId, subscription: SubscriptionId) -> Self {
        Self {
            activated: true,
            trapping: true,
            area,
            subscription,
        }
    }

    pub(crate) fn flags(&self) -> SessionFlags {
        SessionFlags {
            activated: self.activated,
            trapping: self.trapping,
        }
    }

    /// True when `subscription` is the live listener of a running session.
    pub(crate) fn is_driven_by(&self, subscription: SubscriptionId) -> bool {
        self.activated && self.subscription == subscription
    }

    pub(crate) fn release(&mut self) {
        self.trapping = false;
    }

    /// Marks the session for handover: the current subscription becomes stale
    /// and `trapping` stays set until it has finished.
    pub(crate) fn hand_off(&mut self) {
        self.trapping = true;
        self.activated = false;
    }
}
