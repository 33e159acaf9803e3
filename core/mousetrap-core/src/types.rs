//! Core value types shared by the controller, the in-memory host and the FFI layer.
//!
//! Screen coordinates follow the host convention: the origin sits at the
//! bottom-left of the window and `y` grows upward, so the "top" edge of a
//! rectangle is `y + height`.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// Geometry
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    /// Strict containment: points on the border are outside.
    ///
    /// Hit testing for re-trap uses this so a click on the seam between two
    /// areas belongs to neither.
    pub fn contains(&self, point: Point) -> bool {
        self.x < point.x && point.x < self.right() && self.y < point.y && point.y < self.top()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Areas and regions
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u32);

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "area#{}", self.0)
    }
}

/// Editor type shown in a screen area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    TextEditor,
    Console,
    Viewport,
    Properties,
    Outliner,
    #[serde(other)]
    Other,
}

impl AreaKind {
    /// Only text input editors may trap the cursor.
    pub fn is_eligible(self) -> bool {
        matches!(self, AreaKind::TextEditor | AreaKind::Console)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AreaKind::TextEditor => "text_editor",
            AreaKind::Console => "console",
            AreaKind::Viewport => "viewport",
            AreaKind::Properties => "properties",
            AreaKind::Outliner => "outliner",
            AreaKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Header,
    Footer,
    /// Side panel docked on the right edge (the host calls it the "UI" region).
    Sidebar,
    Window,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Region {
    pub kind: RegionKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub kind: AreaKind,
    pub rect: Rect,
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl Area {
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|region| region.kind == kind)
    }

    pub fn is_eligible(&self) -> bool {
        self.kind.is_eligible()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Escape,
    LeftMouse,
    RightMouse,
    MiddleMouse,
    MouseMove,
    WheelUp,
    WheelDown,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Home,
    End,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum KeyValue {
    Press,
    Release,
    /// Events without a pressed state (pointer motion, timers).
    #[default]
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Record)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub oskey: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        oskey: false,
    };

    pub fn ctrl_only(&self) -> bool {
        self.ctrl && !self.shift && !self.alt
    }
}

/// One input event as delivered by the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub value: KeyValue,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub cursor: Point,
}

impl Event {
    pub fn new(kind: EventKind, value: KeyValue, cursor: Point) -> Self {
        Self {
            kind,
            value,
            modifiers: Modifiers::NONE,
            cursor,
        }
    }

    pub fn press(kind: EventKind, cursor: Point) -> Self {
        Self::new(kind, KeyValue::Press, cursor)
    }

    pub fn motion(cursor: Point) -> Self {
        Self::new(EventKind::MouseMove, KeyValue::Nothing, cursor)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_press(&self, kind: EventKind) -> bool {
        self.kind == kind && self.value == KeyValue::Press
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dispatch results
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether the modal subscription stays registered after this event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Continue,
    Finish,
}

/// Whether the host should keep delivering the event to other handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    PassThrough,
    Consume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub flow: Flow,
    pub propagation: Propagation,
}

impl EventOutcome {
    /// Keep listening, let the host handle the event normally.
    pub const PASS_THROUGH: EventOutcome = EventOutcome {
        flow: Flow::Continue,
        propagation: Propagation::PassThrough,
    };

    /// Keep listening, the event was handled here.
    pub const CONSUMED: EventOutcome = EventOutcome {
        flow: Flow::Continue,
        propagation: Propagation::Consume,
    };

    /// Unsubscribe without touching the event.
    pub const FINISHED: EventOutcome = EventOutcome {
        flow: Flow::Finish,
        propagation: Propagation::PassThrough,
    };

    /// Unsubscribe and swallow the event that ended the session.
    pub const FINISHED_CONSUMED: EventOutcome = EventOutcome {
        flow: Flow::Finish,
        propagation: Propagation::Consume,
    };

    pub fn is_finished(&self) -> bool {
        self.flow == Flow::Finish
    }

    pub fn is_consumed(&self) -> bool {
        self.propagation == Propagation::Consume
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Text editor state
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot of the text document shown in an area.
///
/// Columns are character indices, not byte offsets. Line numbers are whatever
/// the host uses for its jump command; the controller only does arithmetic on
/// `top` and forwards the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextView {
    pub top: i32,
    pub visible_lines: i32,
    pub line_index: usize,
    pub line: String,
    pub caret: usize,
    pub selection_end: usize,
}

/// Caret placement request sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaretMove {
    pub line: usize,
    pub column: usize,
    pub extend_selection: bool,
}

/// User-facing status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    TrapOn,
    TrapOff,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::TrapOn => f.write_str("Mouse Trap: On"),
            Notice::TrapOff => f.write_str("Mouse Trap: Off"),
        }
    }
}
