//! In-memory host for tests and scripted replays.
//!
//! [`HeadlessHost`] keeps a fixed screen layout, optional text documents per
//! area, the pointer position, live modal subscriptions and timers, and logs
//! every command the controller issues. [`Simulator`] plays the part of the
//! host's event loop: it delivers events to live subscriptions, removes the
//! ones that finish and fires due timers.

use crate::controller::TrapController;
use crate::error::{Result, TrapError};
use crate::host::{Host, ModalContext, SubscriptionId, TimerAction, TimerId};
use crate::session::SessionFlags;
use crate::types::{Area, AreaId, CaretMove, Event, EventOutcome, Notice, Point, TextView};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

pub const DEFAULT_VISIBLE_LINES: i32 = 40;

/// A command the controller asked the host to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    Warp { to: Point },
    Scroll { area: AreaId, lines: i32 },
    Jump { area: AreaId, line: i32 },
    SetCaret { area: AreaId, caret: CaretMove },
    Redraw { area: AreaId },
    Notify { notice: Notice },
    BeginModal { area: AreaId, subscription: SubscriptionId },
    EndModal { subscription: SubscriptionId },
    RegisterTimer { timer: TimerId, interval_ms: u64 },
    UnregisterTimer { timer: TimerId },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Text documents
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimal text buffer: lines, a caret with a selection anchor, and a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    lines: Vec<String>,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    caret: usize,
    #[serde(default)]
    anchor: usize,
    #[serde(default)]
    top: i32,
    #[serde(default = "default_visible_lines")]
    visible_lines: i32,
}

fn default_visible_lines() -> i32 {
    DEFAULT_VISIBLE_LINES
}

impl TextDocument {
    pub fn new(lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        Self {
            lines,
            line: 0,
            caret: 0,
            anchor: 0,
            top: 0,
            visible_lines: DEFAULT_VISIBLE_LINES,
        }
    }

    pub fn with_caret(mut self, line: usize, column: usize) -> Self {
        self.place(line, column, false);
        self
    }

    pub fn with_view(mut self, top: i32, visible_lines: i32) -> Self {
        self.top = top.max(0);
        self.visible_lines = visible_lines.max(1);
        self
    }

    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn view(&self) -> TextView {
        TextView {
            top: self.top,
            visible_lines: self.visible_lines,
            line_index: self.line,
            line: self.lines.get(self.line).cloned().unwrap_or_default(),
            caret: self.caret,
            selection_end: self.anchor,
        }
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn place(&mut self, line: usize, column: usize, extend: bool) {
        // Lines may be shorter than the requested column.
        let line = line.min(self.last_line());
        let width = self.lines.get(line).map_or(0, |text| text.chars().count());
        self.line = line;
        self.caret = column.min(width);
        if !extend {
            self.anchor = self.caret;
        }
    }

    fn scroll(&mut self, lines: i32) {
        let max_top = i32::try_from(self.last_line()).unwrap_or(i32::MAX);
        self.top = (self.top + lines).clamp(0, max_top);
    }

    fn jump(&mut self, line: i32) {
        let line = usize::try_from(line.max(0)).unwrap_or(0);
        self.place(line, 0, false);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Host
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub id: TimerId,
    pub due: Duration,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    areas: Vec<Area>,
    documents: BTreeMap<AreaId, TextDocument>,
    cursor: Point,
    commands: Vec<HostCommand>,
    subscriptions: Vec<ModalContext>,
    timers: Vec<ScheduledTimer>,
    now: Duration,
    next_subscription: u64,
    next_timer: u64,
    teardown_notifications: bool,
}

impl HeadlessHost {
    /// Builds a host over a fixed layout. Area ids must be unique and sizes
    /// non-negative.
    pub fn new(areas: Vec<Area>) -> Result<Self> {
        let mut seen = HashSet::new();
        for area in &areas {
            if !seen.insert(area.id) {
                return Err(TrapError::DuplicateArea(area.id));
            }
            if area.rect.width < 0 || area.rect.height < 0 {
                return Err(TrapError::InvalidAreaSize {
                    area: area.id,
                    width: area.rect.width,
                    height: area.rect.height,
                });
            }
        }

        Ok(Self {
            areas,
            documents: BTreeMap::new(),
            cursor: Point::default(),
            commands: Vec::new(),
            subscriptions: Vec::new(),
            timers: Vec::new(),
            now: Duration::ZERO,
            next_subscription: 1,
            next_timer: 1,
            teardown_notifications: false,
        })
    }

    /// Takes an area off the screen, as a layout switch or maximize does.
    /// Subscriptions scoped to it stay registered.
    pub fn remove_area(&mut self, area: AreaId) -> Result<Area> {
        let index = self
            .areas
            .iter()
            .position(|candidate| candidate.id == area)
            .ok_or(TrapError::UnknownArea(area))?;
        self.documents.remove(&area);
        Ok(self.areas.remove(index))
    }

    pub fn with_teardown_notifications(mut self, enabled: bool) -> Self {
        self.teardown_notifications = enabled;
        self
    }

    pub fn set_document(&mut self, area: AreaId, document: TextDocument) -> Result<()> {
        if !self.areas.iter().any(|candidate| candidate.id == area) {
            return Err(TrapError::UnknownArea(area));
        }
        self.documents.insert(area, document);
        Ok(())
    }

    pub fn document(&self, area: AreaId) -> Option<&TextDocument> {
        self.documents.get(&area)
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                HostCommand::Notify { notice } => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub fn last_warp(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|command| match command {
            HostCommand::Warp { to } => Some(*to),
            _ => None,
        })
    }

    pub fn live_subscriptions(&self) -> &[ModalContext] {
        &self.subscriptions
    }

    pub fn timers(&self) -> &[ScheduledTimer] {
        &self.timers
    }

    /// Removes a subscription the way the host does after a finishing outcome.
    pub fn end_modal(&mut self, subscription: SubscriptionId) {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|context| context.subscription != subscription);
        if self.subscriptions.len() != before {
            self.commands.push(HostCommand::EndModal { subscription });
        }
    }

    fn next_due_timer(&self, deadline: Duration) -> Option<ScheduledTimer> {
        self.timers
            .iter()
            .filter(|timer| timer.due <= deadline)
            .min_by_key(|timer| (timer.due, timer.id))
            .copied()
    }

    fn reschedule(&mut self, id: TimerId, interval: Duration) {
        let now = self.now;
        if let Some(timer) = self.timers.iter_mut().find(|timer| timer.id == id) {
            timer.due = now + interval;
        }
    }

    fn drop_timer(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }
}

impl Host for HeadlessHost {
    fn areas(&self) -> &[Area] {
        &self.areas
    }

    fn text_view(&self, area: AreaId) -> Option<TextView> {
        self.documents.get(&area).map(TextDocument::view)
    }

    fn warp_cursor(&mut self, to: Point) {
        self.cursor = to;
        self.commands.push(HostCommand::Warp { to });
    }

    fn scroll_text(&mut self, area: AreaId, lines: i32) {
        if let Some(document) = self.documents.get_mut(&area) {
            document.scroll(lines);
        }
        self.commands.push(HostCommand::Scroll { area, lines });
    }

    fn jump_to_line(&mut self, area: AreaId, line: i32) {
        if let Some(document) = self.documents.get_mut(&area) {
            document.jump(line);
        }
        self.commands.push(HostCommand::Jump { area, line });
    }

    fn set_caret(&mut self, area: AreaId, caret: CaretMove) {
        if let Some(document) = self.documents.get_mut(&area) {
            document.place(caret.line, caret.column, caret.extend_selection);
        }
        self.commands.push(HostCommand::SetCaret { area, caret });
    }

    fn tag_redraw(&mut self, area: AreaId) {
        self.commands.push(HostCommand::Redraw { area });
    }

    fn notify(&mut self, notice: Notice) {
        self.commands.push(HostCommand::Notify { notice });
    }

    fn begin_modal(&mut self, area: AreaId) -> SubscriptionId {
        let subscription = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(ModalContext { subscription, area });
        self.commands
            .push(HostCommand::BeginModal { area, subscription });
        subscription
    }

    fn register_timer(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.push(ScheduledTimer {
            id,
            due: self.now + interval,
        });
        self.commands.push(HostCommand::RegisterTimer {
            timer: id,
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        });
        id
    }

    fn unregister_timer(&mut self, timer: TimerId) {
        self.drop_timer(timer);
        self.commands.push(HostCommand::UnregisterTimer { timer });
    }

    fn notifies_teardown(&self) -> bool {
        self.teardown_notifications
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Event loop
// ═══════════════════════════════════════════════════════════════════════════════

/// Drives a [`TrapController`] against a [`HeadlessHost`].
#[derive(Debug, Clone)]
pub struct Simulator {
    host: HeadlessHost,
    controller: TrapController,
    peak_subscriptions: usize,
}

impl Simulator {
    pub fn new(host: HeadlessHost, controller: TrapController) -> Self {
        let peak_subscriptions = host.subscriptions.len();
        Self {
            host,
            controller,
            peak_subscriptions,
        }
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HeadlessHost {
        &mut self.host
    }

    pub fn controller(&self) -> &TrapController {
        &self.controller
    }

    /// Highest number of simultaneously registered subscriptions seen so far.
    pub fn peak_subscriptions(&self) -> usize {
        self.peak_subscriptions
    }

    pub fn toggle(&mut self, area: AreaId) -> SessionFlags {
        let flags = self.controller.toggle(&mut self.host, area);
        self.track_peak();
        flags
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown(&mut self.host);
    }

    /// Delivers `event` to live subscriptions, newest first, until one
    /// consumes it. Returns each subscription's outcome in delivery order.
    pub fn dispatch(&mut self, event: Event) -> Vec<EventOutcome> {
        self.host.cursor = event.cursor;

        let targets: Vec<ModalContext> = self.host.subscriptions.iter().rev().copied().collect();
        let mut outcomes = Vec::with_capacity(targets.len());

        for context in targets {
            let outcome = self
                .controller
                .handle_event(&mut self.host, context, &event);
            outcomes.push(outcome);

            if outcome.is_finished() {
                self.host.end_modal(context.subscription);
                if self.host.notifies_teardown() {
                    self.controller
                        .on_subscription_ended(&mut self.host, context.subscription);
                }
            }
            self.track_peak();

            if outcome.is_consumed() {
                break;
            }
        }

        outcomes
    }

    /// Moves the clock forward, firing every timer that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.host.now + elapsed;

        while let Some(timer) = self.host.next_due_timer(deadline) {
            self.host.now = timer.due;
            match self.controller.on_timer(&mut self.host, timer.id) {
                TimerAction::Repeat(interval) => self.host.reschedule(timer.id, interval),
                TimerAction::Done => self.host.drop_timer(timer.id),
            }
            self.track_peak();
        }

        self.host.now = deadline;
    }

    fn track_peak(&mut self) {
        self.peak_subscriptions = self.peak_subscriptions.max(self.host.subscriptions.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AreaKind, Rect};

    fn area(id: u32) -> Area {
        Area {
            id: AreaId(id),
            kind: AreaKind::TextEditor,
            rect: Rect::new(0, 0, 100, 100),
            regions: vec![],
        }
    }

    #[test]
    fn duplicate_area_ids_are_rejected() {
        let err = HeadlessHost::new(vec![area(1), area(1)]).expect_err("duplicate");
        assert!(matches!(err, TrapError::DuplicateArea(AreaId(1))));
    }

    #[test]
    fn negative_sizes_are_rejected() {
        let mut broken = area(1);
        broken.rect.width = -5;
        let err = HeadlessHost::new(vec![broken]).expect_err("negative");
        assert!(matches!(err, TrapError::InvalidAreaSize { .. }));
    }

    #[test]
    fn removed_area_keeps_its_subscription() {
        let mut host = HeadlessHost::new(vec![area(1), area(2)]).expect("layout");
        host.set_document(AreaId(1), TextDocument::new(vec!["x".to_string()]))
            .expect("document");
        let subscription = host.begin_modal(AreaId(1));

        let removed = host.remove_area(AreaId(1)).expect("remove");
        assert_eq!(removed.id, AreaId(1));
        assert!(host.area(AreaId(1)).is_none());
        assert!(host.document(AreaId(1)).is_none());
        assert_eq!(host.live_subscriptions()[0].subscription, subscription);

        let err = host.remove_area(AreaId(1)).expect_err("gone");
        assert!(matches!(err, TrapError::UnknownArea(AreaId(1))));
    }

    #[test]
    fn documents_need_a_known_area() {
        let mut host = HeadlessHost::new(vec![area(1)]).expect("layout");
        let err = host
            .set_document(AreaId(2), TextDocument::new(vec![]))
            .expect_err("unknown");
        assert!(matches!(err, TrapError::UnknownArea(AreaId(2))));
    }

    #[test]
    fn caret_placement_clamps_to_line_width() {
        let mut document = TextDocument::new(vec!["abc".to_string(), "de".to_string()]);
        document.place(5, 10, false);
        assert_eq!(document.line_index(), 1);
        assert_eq!(document.caret(), 2);
        assert_eq!(document.anchor(), 2);
    }

    #[test]
    fn extending_keeps_anchor() {
        let mut document = TextDocument::new(vec!["    body".to_string()]).with_caret(0, 8);
        document.place(0, 4, true);
        assert_eq!(document.caret(), 4);
        assert_eq!(document.anchor(), 8);
    }

    #[test]
    fn scrolling_stays_inside_document() {
        let mut document = TextDocument::new(vec!["x".to_string(); 5]);
        document.scroll(-1);
        assert_eq!(document.top(), 0);
        document.scroll(10);
        assert_eq!(document.top(), 4);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut host = HeadlessHost::new(vec![area(1)]).expect("layout");
        let slow = host.register_timer(Duration::from_millis(300));
        let fast = host.register_timer(Duration::from_millis(100));

        let first = host
            .next_due_timer(Duration::from_millis(500))
            .expect("due timer");
        assert_eq!(first.id, fast);
        host.drop_timer(fast);
        let second = host
            .next_due_timer(Duration::from_millis(500))
            .expect("due timer");
        assert_eq!(second.id, slow);
        assert_eq!(host.next_due_timer(Duration::from_millis(200)), None);
    }

    #[test]
    fn end_modal_logs_only_live_subscriptions() {
        let mut host = HeadlessHost::new(vec![area(1)]).expect("layout");
        let subscription = host.begin_modal(AreaId(1));
        host.end_modal(subscription);
        host.end_modal(subscription);
        let ends = host
            .commands()
            .iter()
            .filter(|command| matches!(command, HostCommand::EndModal { .. }))
            .count();
        assert_eq!(ends, 1);
    }
}
