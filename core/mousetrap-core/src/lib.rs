//! # mousetrap-core
//!
//! Cursor confinement for text editors and consoles embedded in a host
//! application's screen areas.
//!
//! While a trap session runs, pointer motion that leaves the active area's
//! editable interior is warped back inside. A right click frees the cursor,
//! a left click in another text area moves the trap there, and Escape or the
//! header toggle ends the session. Two keyboard conveniences ride along:
//! Smart Home and (opt-in) Ctrl+Up/Down scroll recentering.
//!
//! ## Design Principles
//!
//! - **Host-agnostic**: all host interaction goes through the [`Host`] trait.
//! - **Single-threaded**: the host's event loop drives every call.
//! - **No globals**: session state lives in a [`TrapController`] the host owns.
//! - **FFI-ready**: [`TrapEngine`] wraps the controller for Python/Swift hosts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mousetrap_core::{HeadlessHost, Simulator, TrapController, Event, Point, AreaId};
//!
//! let host = HeadlessHost::new(layout)?;
//! let mut sim = Simulator::new(host, TrapController::default());
//! sim.toggle(AreaId(1));
//! sim.dispatch(Event::motion(Point::new(-40, 120)));
//! assert!(sim.host().last_warp().is_some());
//! ```

// UniFFI scaffolding for Swift/Kotlin/Python bindings
uniffi::setup_scaffolding!();

pub mod config;
pub mod controller;
pub mod error;
pub mod ffi;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod indicator;
pub mod navigation;
mod rearm;
pub mod session;
pub mod types;

pub use config::*;
pub use controller::TrapController;
pub use error::{Result, TrapError, TrapFfiError};
pub use ffi::{confine_point, retrap_target, smart_home, TrapEngine};
pub use geometry::{locate_retrap_area, TrapBounds, DEFAULT_PAD};
pub use headless::{HeadlessHost, HostCommand, Simulator, TextDocument};
pub use host::{Host, ModalContext, SubscriptionId, TimerAction, TimerId};
pub use indicator::{ToggleIcon, ToggleIndicator};
pub use navigation::{navigation_action, smart_home_column, NavigationAction, ScrollDirection};
pub use session::{SessionFlags, TrapState};
pub use types::*;
