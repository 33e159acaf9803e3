//! Replay scripts: a screen layout, optional text documents and a list of
//! steps played through a [`Simulator`].
//!
//! ```json
//! {
//!   "layout": [
//!     { "id": 1, "kind": "text_editor", "rect": { "x": 0, "y": 0, "width": 400, "height": 300 } }
//!   ],
//!   "documents": { "1": { "lines": ["    pass"] } },
//!   "steps": [
//!     { "step": "toggle", "area": 1 },
//!     { "step": "event", "event": { "kind": "mouse_move", "cursor": { "x": -20, "y": 40 } } },
//!     { "step": "wait", "ms": 100 }
//!   ]
//! }
//! ```

use mousetrap_core::{
    Area, AreaId, Event, HeadlessHost, Host, HostCommand, SessionFlags, Simulator, TextDocument,
    TrapConfig, TrapController, TrapError, TrapState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Read(#[from] std::io::Error),

    #[error("Script {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Trap(#[from] TrapError),

    #[error("Step {index}: {reason}")]
    Step { index: usize, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub layout: Vec<Area>,
    #[serde(default)]
    pub documents: BTreeMap<AreaId, TextDocument>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Header toggle pressed in `area`.
    Toggle { area: AreaId },
    Event { event: Event },
    /// Advance the clock, firing due timers.
    Wait { ms: u64 },
    /// Addon unregistered.
    Shutdown,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = fs_err::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Commands issued while running one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub commands: Vec<HostCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    pub flags: SessionFlags,
    pub state: TrapState,
    pub peak_subscriptions: usize,
}

pub fn run(
    script: Script,
    config: TrapConfig,
    teardown_signal: bool,
) -> Result<ReplayReport, ReplayError> {
    let mut host = HeadlessHost::new(script.layout)?.with_teardown_notifications(teardown_signal);
    for (area, document) in script.documents {
        host.set_document(area, document)?;
    }
    let mut sim = Simulator::new(host, TrapController::new(config));

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.into_iter().enumerate() {
        match step {
            Step::Toggle { area } => {
                if sim.host().area(area).is_none() {
                    return Err(ReplayError::Step {
                        index,
                        reason: format!("toggle in unknown {area}"),
                    });
                }
                sim.toggle(area);
            }
            Step::Event { event } => {
                let outcomes = sim.dispatch(event);
                tracing::debug!(index, kind = ?event.kind, ?outcomes, "Event dispatched");
            }
            Step::Wait { ms } => sim.advance(Duration::from_millis(ms)),
            Step::Shutdown => sim.shutdown(),
        }

        steps.push(StepRecord {
            index,
            commands: sim.host_mut().take_commands(),
        });
    }

    let controller = sim.controller();
    Ok(ReplayReport {
        steps,
        flags: controller.flags(),
        state: controller.state(),
        peak_subscriptions: sim.peak_subscriptions(),
    })
}
