//! The trap controller: one modal input state machine.
//!
//! ## Per-event rules (first match wins)
//!
//! ```text
//! area gone, subscription stale    → finish
//! area gone                       → pass through
//! area not text editor / console  → pass through, nothing changes
//! subscription stale              → finish (clears trapping after a handoff)
//! Escape                          → deactivate, finish
//! right press while trapping      → release the cursor, keep the session
//! left press while released       → re-trap scan, pass through
//! trapping                        → warp a stray cursor back inside
//! Home / Ctrl+Up / Ctrl+Down      → navigation conveniences
//! anything else                   → pass through
//! ```
//!
//! ## Re-arm handoff
//!
//! ```text
//! click in area B while released
//!   → session: activated=false, trapping=true   (old subscription now stale)
//!   → old subscription's next event             → finish, session dropped
//!   → teardown signal / timer sees trapping=false → activate in B
//! ```
//!
//! At most one subscription drives a session; a fresh activation is never
//! issued while the handed-off subscription is still registered.

use crate::config::{HandoffMode, TrapConfig};
use crate::geometry::{locate_retrap_area, TrapBounds};
use crate::host::{Host, ModalContext, SubscriptionId, TimerAction, TimerId};
use crate::indicator::ToggleIndicator;
use crate::navigation::{navigation_action, NavigationAction};
use crate::rearm::{Handoff, PendingRearm};
use crate::session::{Session, SessionFlags, TrapState};
use crate::types::{AreaId, Event, EventKind, EventOutcome, Notice, Point};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TrapController {
    config: TrapConfig,
    session: Option<Session>,
    pending: Option<PendingRearm>,
}

impl Default for TrapController {
    fn default() -> Self {
        Self::new(TrapConfig::default())
    }
}

impl TrapController {
    pub fn new(config: TrapConfig) -> Self {
        Self {
            config,
            session: None,
            pending: None,
        }
    }

    pub fn config(&self) -> &TrapConfig {
        &self.config
    }

    pub fn flags(&self) -> SessionFlags {
        self.session
            .as_ref()
            .map(Session::flags)
            .unwrap_or_default()
    }

    pub fn state(&self) -> TrapState {
        if self.pending.is_some() {
            return TrapState::Rearming;
        }
        match self.flags() {
            SessionFlags {
                activated: true,
                trapping: true,
            } => TrapState::Trapping,
            SessionFlags {
                activated: true,
                trapping: false,
            } => TrapState::Released,
            SessionFlags {
                activated: false,
                trapping: true,
            } => TrapState::Rearming,
            SessionFlags {
                activated: false,
                trapping: false,
            } => TrapState::Inactive,
        }
    }

    pub fn indicator(&self) -> ToggleIndicator {
        ToggleIndicator::from_flags(self.flags())
    }

    /// Area the running session is scoped to.
    pub fn session_area(&self) -> Option<AreaId> {
        self.session.as_ref().map(|session| session.area)
    }

    /// Area a pending re-arm will activate in.
    pub fn rearm_target(&self) -> Option<AreaId> {
        self.pending.map(|pending| pending.target)
    }

    // =========================================================================
    // Toggle
    // =========================================================================

    /// The header button: switches trapping off when a session is running,
    /// otherwise starts one scoped to `area`.
    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H, area: AreaId) -> SessionFlags {
        self.cancel_rearm(host);

        if self.flags().activated {
            self.deactivate(host);
        } else {
            self.activate(host, area);
        }

        self.flags()
    }

    fn activate<H: Host + ?Sized>(&mut self, host: &mut H, area: AreaId) {
        let subscription = host.begin_modal(area);
        self.session = Some(Session::start(area, subscription));
        redraw_eligible(host);
        host.notify(Notice::TrapOn);
        info!(area = %area, subscription = subscription.0, "Mouse trap on");
    }

    fn deactivate<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.session = None;
        redraw_eligible(host);
        host.notify(Notice::TrapOff);
        info!("Mouse trap off");
    }

    /// Unregistration teardown: clears the session and any pending re-arm.
    /// Subscriptions still registered with the host finish on their next event.
    pub fn shutdown<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.cancel_rearm(host);
        if self.session.take().is_some() {
            redraw_eligible(host);
            debug!("Trap session dropped on shutdown");
        }
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Handles one event delivered to the subscription described by `context`.
    pub fn handle_event<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        context: ModalContext,
        event: &Event,
    ) -> EventOutcome {
        let Some(area) = host.area(context.area).cloned() else {
            // Scoped area left the screen. A stale listener still ends here;
            // the live one waits for the area to come back.
            if !self.is_driven_by(context.subscription) {
                self.finish_stale(context.subscription);
                return EventOutcome::FINISHED;
            }
            return EventOutcome::PASS_THROUGH;
        };
        if !area.is_eligible() {
            return EventOutcome::PASS_THROUGH;
        }

        if !self.is_driven_by(context.subscription) {
            self.finish_stale(context.subscription);
            return EventOutcome::FINISHED;
        }

        if event.is_press(EventKind::Escape) {
            self.deactivate(host);
            return EventOutcome::FINISHED_CONSUMED;
        }

        let trapping = self.flags().trapping;

        if trapping && event.is_press(EventKind::RightMouse) {
            if let Some(session) = self.session.as_mut() {
                session.release();
            }
            redraw_eligible(host);
            debug!(area = %area.id, "Cursor released");
            return EventOutcome::CONSUMED;
        }

        if !trapping && event.is_press(EventKind::LeftMouse) {
            self.begin_rearm(host, context.subscription, event.cursor);
            return EventOutcome::PASS_THROUGH;
        }

        if trapping {
            let bounds = TrapBounds::for_area(&area);
            if let Some(target) = bounds.clamp(event.cursor, self.config.trap.pad) {
                host.warp_cursor(target);
            }
        }

        if let Some(view) = host.text_view(area.id) {
            if let Some(action) = navigation_action(event, &view, &self.config.navigation) {
                apply_navigation(host, area.id, action);
                return EventOutcome::CONSUMED;
            }
        }

        EventOutcome::PASS_THROUGH
    }

    fn is_driven_by(&self, subscription: SubscriptionId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_driven_by(subscription))
    }

    /// A stale subscription is finishing. If it was the one a handoff is
    /// waiting on, its session goes away, which clears `trapping`.
    fn finish_stale(&mut self, subscription: SubscriptionId) {
        let handed_off = self
            .session
            .as_ref()
            .is_some_and(|session| !session.activated && session.subscription == subscription);
        if handed_off {
            self.session = None;
        }
        debug!(
            subscription = subscription.0,
            handed_off, "Stale trap subscription finished"
        );
    }

    // =========================================================================
    // Re-arm
    // =========================================================================

    fn begin_rearm<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        subscription: SubscriptionId,
        cursor: Point,
    ) {
        let Some(target) = locate_retrap_area(host.areas(), cursor) else {
            debug!(x = cursor.x, y = cursor.y, "Click outside trappable area");
            return;
        };

        self.cancel_rearm(host);
        if let Some(session) = self.session.as_mut() {
            session.hand_off();
        }

        let handoff = if self.config.rearm.handoff == HandoffMode::Auto && host.notifies_teardown()
        {
            Handoff::Signal
        } else {
            Handoff::Poll(host.register_timer(self.config.rearm.interval()))
        };

        self.pending = Some(PendingRearm {
            target,
            waiting_on: subscription,
            handoff,
        });
        debug!(target = %target, subscription = subscription.0, ?handoff, "Re-arm scheduled");
    }

    /// Teardown notification from hosts that report removed subscriptions.
    pub fn on_subscription_ended<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        subscription: SubscriptionId,
    ) {
        let Some(pending) = self.pending else {
            return;
        };
        if !pending.awaits_signal_from(subscription) {
            return;
        }

        // The host may drop a subscription without asking it first.
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.subscription == subscription)
        {
            self.session = None;
        }

        self.pending = None;
        self.complete_rearm(host, pending.target);
    }

    /// Recurring timer callback for polled handoffs.
    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, timer: TimerId) -> TimerAction {
        let Some(pending) = self.pending else {
            return TimerAction::Done;
        };
        if !pending.is_polled_by(timer) {
            return TimerAction::Done;
        }

        if self.flags().trapping {
            return TimerAction::Repeat(self.config.rearm.interval());
        }

        self.pending = None;
        self.complete_rearm(host, pending.target);
        TimerAction::Done
    }

    fn complete_rearm<H: Host + ?Sized>(&mut self, host: &mut H, target: AreaId) {
        if host.area(target).is_none() {
            warn!(area = %target, "Re-arm target closed before activation");
            return;
        }
        self.activate(host, target);
    }

    fn cancel_rearm<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if let Some(timer) = pending.timer() {
            host.unregister_timer(timer);
        }
        debug!(target = %pending.target, "Pending re-arm cancelled");
    }
}

fn redraw_eligible<H: Host + ?Sized>(host: &mut H) {
    let eligible: Vec<AreaId> = host
        .areas()
        .iter()
        .filter(|area| area.is_eligible())
        .map(|area| area.id)
        .collect();
    for area in eligible {
        host.tag_redraw(area);
    }
}

fn apply_navigation<H: Host + ?Sized>(host: &mut H, area: AreaId, action: NavigationAction) {
    match action {
        NavigationAction::SmartHome(caret) => {
            host.set_caret(area, caret);
        }
        NavigationAction::Recenter { scroll, jump_line } => {
            host.scroll_text(area, scroll);
            host.jump_to_line(area, jump_line);
        }
    }
}
