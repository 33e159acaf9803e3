//! The services the controller needs from the embedding application.
//!
//! The controller never talks to a window system directly. Everything it
//! reads (areas, text state) and everything it does (warping, caret moves,
//! redraws, modal subscriptions, timers) goes through [`Host`].

use crate::types::{Area, AreaId, CaretMove, Notice, Point, TextView};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle of one modal event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

/// Handle of one recurring timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

/// What a modal subscription was started for.
///
/// The host hands this back with every event it dispatches to the
/// subscription; `area` is the area the subscription was scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModalContext {
    pub subscription: SubscriptionId,
    pub area: AreaId,
}

/// Answer to a timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Call again after the given interval.
    Repeat(Duration),
    /// Unregister the timer.
    Done,
}

pub trait Host {
    // =========================================================================
    // Introspection
    // =========================================================================

    /// All open areas with their current screen geometry.
    fn areas(&self) -> &[Area];

    fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas().iter().find(|area| area.id == id)
    }

    /// Text document shown in `area`, if it has one.
    fn text_view(&self, area: AreaId) -> Option<TextView>;

    // =========================================================================
    // Commands
    // =========================================================================

    /// Moves the pointer to an absolute screen position.
    fn warp_cursor(&mut self, to: Point);

    /// Scrolls the text view of `area` by `lines` (negative is up).
    fn scroll_text(&mut self, area: AreaId, lines: i32);

    /// Moves the caret of `area` to `line`.
    fn jump_to_line(&mut self, area: AreaId, line: i32);

    fn set_caret(&mut self, area: AreaId, caret: CaretMove);

    fn tag_redraw(&mut self, area: AreaId);

    fn notify(&mut self, notice: Notice);

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Starts delivering every event to the controller on behalf of `area`
    /// until the controller answers with a finishing outcome.
    fn begin_modal(&mut self, area: AreaId) -> SubscriptionId;

    fn register_timer(&mut self, interval: Duration) -> TimerId;

    fn unregister_timer(&mut self, timer: TimerId);

    /// True when the host calls `TrapController::on_subscription_ended` after
    /// it has removed a finished subscription.
    fn notifies_teardown(&self) -> bool {
        false
    }
}
