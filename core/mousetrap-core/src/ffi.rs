//! Foreign-host surface (Python addons, Swift, Kotlin) via UniFFI.
//!
//! Foreign hosts cannot implement [`Host`] directly, so every call carries a
//! [`HostSnapshotFfi`] with the geometry and text state the controller may
//! read, and the answer lists the commands the host has to apply, in order.
//! Subscription and timer ids are handed out by the engine; the host stores
//! them with its modal handler and timer callback.

use crate::config::{load_config, load_config_or_default, TrapConfig};
use crate::controller::TrapController;
use crate::error::TrapFfiError;
use crate::geometry::{locate_retrap_area, TrapBounds};
use crate::host::{Host, ModalContext, SubscriptionId, TimerAction, TimerId};
use crate::indicator::ToggleIndicator;
use crate::navigation::smart_home_column;
use crate::session::{SessionFlags, TrapState};
use crate::types::{
    Area, AreaId, AreaKind, CaretMove, Event, EventOutcome, Notice, Point, Rect, Region, TextView,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct AreaFfi {
    pub id: u32,
    pub kind: AreaKind,
    pub rect: Rect,
    pub regions: Vec<Region>,
}

impl From<AreaFfi> for Area {
    fn from(area: AreaFfi) -> Self {
        Area {
            id: AreaId(area.id),
            kind: area.kind,
            rect: area.rect,
            regions: area.regions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextViewFfi {
    pub area_id: u32,
    pub top: i32,
    pub visible_lines: i32,
    pub line_index: u32,
    pub line: String,
    pub caret: u32,
    pub selection_end: u32,
}

impl TextViewFfi {
    fn into_view(self) -> (AreaId, TextView) {
        (
            AreaId(self.area_id),
            TextView {
                top: self.top,
                visible_lines: self.visible_lines,
                line_index: self.line_index as usize,
                line: self.line,
                caret: self.caret as usize,
                selection_end: self.selection_end as usize,
            },
        )
    }
}

/// What the host can see right now.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct HostSnapshotFfi {
    pub areas: Vec<AreaFfi>,
    pub text_views: Vec<TextViewFfi>,
    /// Set when the host calls `subscription_ended` after removing a handler.
    pub notifies_teardown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum HostCommandFfi {
    WarpCursor {
        x: i32,
        y: i32,
    },
    ScrollText {
        area_id: u32,
        lines: i32,
    },
    JumpToLine {
        area_id: u32,
        line: i32,
    },
    SetCaret {
        area_id: u32,
        line: u32,
        column: u32,
        extend_selection: bool,
    },
    TagRedraw {
        area_id: u32,
    },
    Notify {
        message: String,
    },
    BeginModal {
        area_id: u32,
        subscription_id: u64,
    },
    RegisterTimer {
        timer_id: u64,
        interval_ms: u64,
    },
    UnregisterTimer {
        timer_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DispatchFfi {
    /// Remove the modal handler after this event.
    pub finished: bool,
    /// Stop the event from reaching other handlers.
    pub consumed: bool,
    pub commands: Vec<HostCommandFfi>,
    pub flags: SessionFlags,
    pub state: TrapState,
    pub indicator: ToggleIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TimerResultFfi {
    /// `None` unregisters the timer.
    pub repeat_ms: Option<u64>,
    pub commands: Vec<HostCommandFfi>,
    pub flags: SessionFlags,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Snapshot host
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct IdAllocator {
    next_subscription: u64,
    next_timer: u64,
}

impl IdAllocator {
    fn subscription(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    fn timer(&mut self) -> TimerId {
        self.next_timer += 1;
        TimerId(self.next_timer)
    }
}

/// [`Host`] over one snapshot that records commands instead of running them.
struct SnapshotHost<'a> {
    areas: Vec<Area>,
    views: BTreeMap<AreaId, TextView>,
    notifies_teardown: bool,
    ids: &'a mut IdAllocator,
    commands: Vec<HostCommandFfi>,
}

impl<'a> SnapshotHost<'a> {
    fn new(snapshot: HostSnapshotFfi, ids: &'a mut IdAllocator) -> Self {
        Self {
            areas: snapshot.areas.into_iter().map(Area::from).collect(),
            views: snapshot
                .text_views
                .into_iter()
                .map(TextViewFfi::into_view)
                .collect(),
            notifies_teardown: snapshot.notifies_teardown,
            ids,
            commands: Vec::new(),
        }
    }
}

impl Host for SnapshotHost<'_> {
    fn areas(&self) -> &[Area] {
        &self.areas
    }

    fn text_view(&self, area: AreaId) -> Option<TextView> {
        self.views.get(&area).cloned()
    }

    fn warp_cursor(&mut self, to: Point) {
        self.commands
            .push(HostCommandFfi::WarpCursor { x: to.x, y: to.y });
    }

    fn scroll_text(&mut self, area: AreaId, lines: i32) {
        self.commands.push(HostCommandFfi::ScrollText {
            area_id: area.0,
            lines,
        });
    }

    fn jump_to_line(&mut self, area: AreaId, line: i32) {
        self.commands.push(HostCommandFfi::JumpToLine {
            area_id: area.0,
            line,
        });
    }

    fn set_caret(&mut self, area: AreaId, caret: CaretMove) {
        self.commands.push(HostCommandFfi::SetCaret {
            area_id: area.0,
            line: saturating_u32(caret.line),
            column: saturating_u32(caret.column),
            extend_selection: caret.extend_selection,
        });
    }

    fn tag_redraw(&mut self, area: AreaId) {
        self.commands
            .push(HostCommandFfi::TagRedraw { area_id: area.0 });
    }

    fn notify(&mut self, notice: Notice) {
        self.commands.push(HostCommandFfi::Notify {
            message: notice.to_string(),
        });
    }

    fn begin_modal(&mut self, area: AreaId) -> SubscriptionId {
        let subscription = self.ids.subscription();
        self.commands.push(HostCommandFfi::BeginModal {
            area_id: area.0,
            subscription_id: subscription.0,
        });
        subscription
    }

    fn register_timer(&mut self, interval: Duration) -> TimerId {
        let timer = self.ids.timer();
        self.commands.push(HostCommandFfi::RegisterTimer {
            timer_id: timer.0,
            interval_ms: duration_ms(interval),
        });
        timer
    }

    fn unregister_timer(&mut self, timer: TimerId) {
        self.commands
            .push(HostCommandFfi::UnregisterTimer { timer_id: timer.0 });
    }

    fn notifies_teardown(&self) -> bool {
        self.notifies_teardown
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct EngineState {
    controller: TrapController,
    ids: IdAllocator,
}

/// Controller handle for foreign hosts.
///
/// One engine per host process; the host serializes calls from its event
/// thread, the mutex only satisfies the FFI `Send + Sync` contract.
#[derive(uniffi::Object)]
pub struct TrapEngine {
    state: Mutex<EngineState>,
}

impl TrapEngine {
    pub fn with_config(config: TrapConfig) -> Self {
        Self {
            state: Mutex::new(EngineState {
                controller: TrapController::new(config),
                ids: IdAllocator::default(),
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut EngineState) -> T) -> T {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn run(
        &self,
        snapshot: HostSnapshotFfi,
        f: impl FnOnce(&mut TrapController, &mut SnapshotHost<'_>) -> EventOutcome,
    ) -> DispatchFfi {
        self.with_state(|state| {
            let mut host = SnapshotHost::new(snapshot, &mut state.ids);
            let outcome = f(&mut state.controller, &mut host);
            DispatchFfi {
                finished: outcome.is_finished(),
                consumed: outcome.is_consumed(),
                commands: host.commands,
                flags: state.controller.flags(),
                state: state.controller.state(),
                indicator: state.controller.indicator(),
            }
        })
    }
}

#[uniffi::export]
impl TrapEngine {
    /// Creates an engine with the user's configuration (defaults if missing or
    /// unreadable).
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::with_config(load_config_or_default(None))
    }

    /// Creates an engine from an explicit configuration file.
    #[uniffi::constructor]
    pub fn from_config_file(path: String) -> Result<Self, TrapFfiError> {
        let config = load_config(Some(Path::new(&path)))?;
        Ok(Self::with_config(config))
    }

    /// Header button pressed in `area_id`.
    pub fn toggle(&self, snapshot: HostSnapshotFfi, area_id: u32) -> DispatchFfi {
        self.run(snapshot, |controller, host| {
            controller.toggle(host, AreaId(area_id));
            EventOutcome::PASS_THROUGH
        })
    }

    /// One event for the modal handler registered as `subscription_id`.
    pub fn handle_event(
        &self,
        snapshot: HostSnapshotFfi,
        subscription_id: u64,
        area_id: u32,
        event: Event,
    ) -> DispatchFfi {
        let context = ModalContext {
            subscription: SubscriptionId(subscription_id),
            area: AreaId(area_id),
        };
        self.run(snapshot, |controller, host| {
            controller.handle_event(host, context, &event)
        })
    }

    /// The host removed the modal handler `subscription_id`.
    pub fn subscription_ended(&self, snapshot: HostSnapshotFfi, subscription_id: u64) -> DispatchFfi {
        self.run(snapshot, |controller, host| {
            controller.on_subscription_ended(host, SubscriptionId(subscription_id));
            EventOutcome::FINISHED
        })
    }

    pub fn timer_fired(&self, snapshot: HostSnapshotFfi, timer_id: u64) -> TimerResultFfi {
        self.with_state(|state| {
            let mut host = SnapshotHost::new(snapshot, &mut state.ids);
            let action = state.controller.on_timer(&mut host, TimerId(timer_id));
            TimerResultFfi {
                repeat_ms: match action {
                    TimerAction::Repeat(interval) => Some(duration_ms(interval)),
                    TimerAction::Done => None,
                },
                commands: host.commands,
                flags: state.controller.flags(),
            }
        })
    }

    /// Addon unregistration.
    pub fn shutdown(&self, snapshot: HostSnapshotFfi) -> DispatchFfi {
        self.run(snapshot, |controller, host| {
            controller.shutdown(host);
            EventOutcome::FINISHED
        })
    }

    pub fn flags(&self) -> SessionFlags {
        self.with_state(|state| state.controller.flags())
    }

    pub fn indicator(&self) -> ToggleIndicator {
        self.with_state(|state| state.controller.indicator())
    }
}

impl Default for TrapEngine {
    fn default() -> Self {
        Self::with_config(TrapConfig::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Stateless helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Where `cursor` should be warped to stay inside `area`, if anywhere.
/// A negative `pad` is treated as zero.
#[uniffi::export]
pub fn confine_point(area: AreaFfi, cursor: Point, pad: i32) -> Option<Point> {
    TrapBounds::for_area(&Area::from(area)).clamp(cursor, pad)
}

/// Column the Home key should move to.
#[uniffi::export]
pub fn smart_home(line: String, caret: u32, selection_end: u32) -> u32 {
    saturating_u32(smart_home_column(
        &line,
        caret as usize,
        selection_end as usize,
    ))
}

/// Area a click at `cursor` would re-trap into.
#[uniffi::export]
pub fn retrap_target(areas: Vec<AreaFfi>, cursor: Point) -> Option<u32> {
    let areas: Vec<Area> = areas.into_iter().map(Area::from).collect();
    locate_retrap_area(&areas, cursor).map(|id| id.0)
}
