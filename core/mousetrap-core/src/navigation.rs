//! Keyboard conveniences layered on top of the host's text editor.
//!
//! - **Smart Home**: first press goes to the first non-whitespace column,
//!   a second press goes to column zero.
//! - **Recentering scroll**: Ctrl+Up/Down scrolls one line and drags the caret
//!   to the middle of the view. Disabled by default: the host has been seen
//!   crashing when the scroll command runs after the editor lost focus.

use crate::config::NavigationConfig;
use crate::types::{CaretMove, Event, EventKind, TextView};

/// Column Home should jump to, given the caret and selection end on `line`.
pub fn smart_home_column(line: &str, caret: usize, selection_end: usize) -> usize {
    let indent = line.chars().take_while(|c| c.is_whitespace()).count();
    if caret == indent || selection_end == indent {
        0
    } else {
        indent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn lines(self) -> i32 {
        match self {
            ScrollDirection::Up => -1,
            ScrollDirection::Down => 1,
        }
    }
}

/// Line the caret is dragged to after a recentering scroll.
///
/// The view's visual center sits a few lines off the arithmetic middle, so
/// `bias` is subtracted when scrolling up and added when scrolling down.
pub fn recenter_target(top: i32, visible_lines: i32, direction: ScrollDirection, bias: i32) -> i32 {
    let middle = top + visible_lines / 2;
    match direction {
        ScrollDirection::Up => middle - bias,
        ScrollDirection::Down => middle + bias,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    SmartHome(CaretMove),
    Recenter { scroll: i32, jump_line: i32 },
}

/// Maps a key press in a text editor to a navigation command, if any.
pub fn navigation_action(
    event: &Event,
    view: &TextView,
    config: &NavigationConfig,
) -> Option<NavigationAction> {
    if event.modifiers.ctrl_only() {
        let direction = if event.is_press(EventKind::UpArrow) {
            ScrollDirection::Up
        } else if event.is_press(EventKind::DownArrow) {
            ScrollDirection::Down
        } else {
            return None;
        };

        if !config.scroll_recentering {
            return None;
        }

        return Some(NavigationAction::Recenter {
            scroll: direction.lines(),
            jump_line: recenter_target(
                view.top,
                view.visible_lines,
                direction,
                config.recenter_bias,
            ),
        });
    }

    // Ctrl alone already returned above, so Ctrl+Home stays with the host.
    if config.smart_home && event.is_press(EventKind::Home) {
        return Some(NavigationAction::SmartHome(CaretMove {
            line: view.line_index,
            column: smart_home_column(&view.line, view.caret, view.selection_end),
            extend_selection: event.modifiers.shift,
        }));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Modifiers, Point};

    fn view(line: &str, caret: usize) -> TextView {
        TextView {
            top: 10,
            visible_lines: 40,
            line_index: 4,
            line: line.to_string(),
            caret,
            selection_end: caret,
        }
    }

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn smart_home_toggles_between_indent_and_zero() {
        assert_eq!(smart_home_column("   abc", 3, 3), 0);
        assert_eq!(smart_home_column("   abc", 0, 0), 3);
        assert_eq!(smart_home_column("   abc", 5, 5), 3);
    }

    #[test]
    fn smart_home_honours_selection_end() {
        // Shift+Home already extended a selection to the indent
        assert_eq!(smart_home_column("    x = 1", 9, 4), 0);
    }

    #[test]
    fn smart_home_counts_characters_not_bytes() {
        assert_eq!(smart_home_column("\u{3000}\tλx", 0, 0), 2);
    }

    #[test]
    fn smart_home_on_blank_lines() {
        assert_eq!(smart_home_column("", 0, 0), 0);
        assert_eq!(smart_home_column("    ", 1, 1), 4);
        assert_eq!(smart_home_column("    ", 4, 4), 0);
    }

    #[test]
    fn recenter_target_applies_bias() {
        assert_eq!(recenter_target(10, 40, ScrollDirection::Up, 3), 27);
        assert_eq!(recenter_target(10, 40, ScrollDirection::Down, 3), 33);
        assert_eq!(recenter_target(0, 7, ScrollDirection::Down, 0), 3);
    }

    #[test]
    fn home_press_maps_to_smart_home() {
        let event = Event::press(EventKind::Home, Point::new(0, 0));
        let action = navigation_action(&event, &view("  abc", 4), &NavigationConfig::default());
        assert_eq!(
            action,
            Some(NavigationAction::SmartHome(CaretMove {
                line: 4,
                column: 2,
                extend_selection: false,
            }))
        );
    }

    #[test]
    fn shift_home_extends_selection() {
        let event = Event::press(EventKind::Home, Point::new(0, 0)).with_modifiers(Modifiers {
            shift: true,
            ..Modifiers::NONE
        });
        let action = navigation_action(&event, &view("  abc", 2), &NavigationConfig::default());
        assert_eq!(
            action,
            Some(NavigationAction::SmartHome(CaretMove {
                line: 4,
                column: 0,
                extend_selection: true,
            }))
        );
    }

    #[test]
    fn ctrl_home_is_left_to_the_host() {
        let event = Event::press(EventKind::Home, Point::new(0, 0)).with_modifiers(ctrl());
        assert_eq!(
            navigation_action(&event, &view("  abc", 4), &NavigationConfig::default()),
            None
        );
    }

    #[test]
    fn home_with_other_modifier_mixes_still_applies() {
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };

        for (modifiers, extend_selection) in [(alt, false), (ctrl_shift, true)] {
            let event = Event::press(EventKind::Home, Point::new(0, 0)).with_modifiers(modifiers);
            assert_eq!(
                navigation_action(&event, &view("  abc", 4), &NavigationConfig::default()),
                Some(NavigationAction::SmartHome(CaretMove {
                    line: 4,
                    column: 2,
                    extend_selection,
                })),
                "{modifiers:?}"
            );
        }
    }

    #[test]
    fn home_release_is_ignored() {
        let event = Event::new(
            EventKind::Home,
            crate::types::KeyValue::Release,
            Point::new(0, 0),
        );
        assert_eq!(
            navigation_action(&event, &view("  abc", 4), &NavigationConfig::default()),
            None
        );
    }

    #[test]
    fn recentering_is_off_by_default() {
        let event = Event::press(EventKind::DownArrow, Point::new(0, 0)).with_modifiers(ctrl());
        assert_eq!(
            navigation_action(&event, &view("abc", 0), &NavigationConfig::default()),
            None
        );
    }

    #[test]
    fn recentering_when_enabled() {
        let config = NavigationConfig {
            scroll_recentering: true,
            ..NavigationConfig::default()
        };
        let down = Event::press(EventKind::DownArrow, Point::new(0, 0)).with_modifiers(ctrl());
        let up = Event::press(EventKind::UpArrow, Point::new(0, 0)).with_modifiers(ctrl());

        assert_eq!(
            navigation_action(&down, &view("abc", 0), &config),
            Some(NavigationAction::Recenter {
                scroll: 1,
                jump_line: 33,
            })
        );
        assert_eq!(
            navigation_action(&up, &view("abc", 0), &config),
            Some(NavigationAction::Recenter {
                scroll: -1,
                jump_line: 27,
            })
        );
    }

    #[test]
    fn smart_home_can_be_disabled() {
        let config = NavigationConfig {
            smart_home: false,
            ..NavigationConfig::default()
        };
        let event = Event::press(EventKind::Home, Point::new(0, 0));
        assert_eq!(navigation_action(&event, &view("  abc", 4), &config), None);
    }
}
