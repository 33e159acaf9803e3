//! State shown by the toggle button in the editor headers.

use crate::session::SessionFlags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum ToggleIcon {
    /// Cursor is held (the host's "drag with right mouse" glyph).
    Trapping,
    /// Cursor is free (the host's "mouse move" glyph).
    Free,
}

impl ToggleIcon {
    /// Icon identifier understood by the host's UI layer.
    pub fn host_icon(self) -> &'static str {
        match self {
            ToggleIcon::Trapping => "MOUSE_RMB_DRAG",
            ToggleIcon::Free => "MOUSE_MOVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ToggleIndicator {
    pub icon: ToggleIcon,
    pub depressed: bool,
}

impl ToggleIndicator {
    pub fn from_flags(flags: SessionFlags) -> Self {
        Self {
            icon: if flags.trapping {
                ToggleIcon::Trapping
            } else {
                ToggleIcon::Free
            },
            depressed: flags.activated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_button_is_raised() {
        let indicator = ToggleIndicator::from_flags(SessionFlags::default());
        assert_eq!(indicator.icon, ToggleIcon::Free);
        assert!(!indicator.depressed);
    }

    #[test]
    fn released_session_stays_depressed() {
        let indicator = ToggleIndicator::from_flags(SessionFlags {
            activated: true,
            trapping: false,
        });
        assert_eq!(indicator.icon.host_icon(), "MOUSE_MOVE");
        assert!(indicator.depressed);
    }

    #[test]
    fn trapping_shows_drag_icon() {
        let indicator = ToggleIndicator::from_flags(SessionFlags {
            activated: true,
            trapping: true,
        });
        assert_eq!(indicator.icon.host_icon(), "MOUSE_RMB_DRAG");
    }
}
