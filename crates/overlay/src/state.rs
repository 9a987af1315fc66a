//! Input state tracked across the run, and the overlay it implies.

use demoscope_action_log::event::{EventKind, InputEvent};
use demoscope_common::error::{DemoscopeError, DemoscopeResult};

/// Aggregate input state at a point in the recording.
///
/// One instance lives for the duration of a run, owned by the merge loop
/// and updated by each event in log order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    /// Held keys in press order. Duplicate presses are kept as-is; a
    /// release removes the first occurrence.
    pressed_keys: Vec<String>,

    /// Currently held mouse button, if any.
    active_button: Option<String>,

    /// Deltas of the most recent wheel tick. Cleared by any non-wheel
    /// event.
    last_wheel: Option<(i32, i32)>,

    cursor_x: i32,
    cursor_y: i32,
}

/// What the pointer overlay should show for the current state.
///
/// Recomputed from [`InputState`] at render time; the variant order below
/// is the rendering priority: a held button wins over a wheel tick, which
/// wins over the idle marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOverlay {
    /// Unfilled circle marking the resting cursor.
    Idle,

    /// Upward scroll arrow.
    WheelUp,

    /// Downward scroll arrow.
    WheelDown,

    /// Filled circle, left-button color.
    LeftHeld,

    /// Filled circle, right-button color.
    RightHeld,

    /// No pointer mark (unrecognized button, or a wheel tick that is not
    /// a single vertical notch).
    Hidden,
}

impl InputState {
    /// State at recording start: nothing held, cursor at frame center.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            pressed_keys: Vec::new(),
            active_button: None,
            last_wheel: None,
            cursor_x: (width / 2) as i32,
            cursor_y: (height / 2) as i32,
        }
    }

    /// Fold one event into the state.
    ///
    /// The only fallible transition is a `KeyRelease` for a key that is
    /// not currently held, which is a fatal inconsistency in the log.
    pub fn apply(&mut self, event: &InputEvent) -> DemoscopeResult<()> {
        if !matches!(event.kind, EventKind::Wheel { .. }) {
            self.last_wheel = None;
        }

        match &event.kind {
            EventKind::MouseMove { x, y } => {
                self.cursor_x = *x as i32;
                self.cursor_y = *y as i32;
            }
            EventKind::ButtonPress { button } => {
                self.active_button = Some(button.clone());
            }
            EventKind::ButtonRelease { .. } => {
                self.active_button = None;
            }
            EventKind::KeyPress { key } => {
                self.pressed_keys.push(key.clone());
            }
            EventKind::KeyRelease { key } => {
                let idx = self
                    .pressed_keys
                    .iter()
                    .position(|held| held == key)
                    .ok_or_else(|| DemoscopeError::key_not_held(key.clone()))?;
                self.pressed_keys.remove(idx);
            }
            EventKind::Wheel { delta_x, delta_y } => {
                self.last_wheel = Some((*delta_x, *delta_y));
            }
        }

        Ok(())
    }

    /// Resolve the pointer overlay for the current state.
    pub fn pointer_overlay(&self) -> PointerOverlay {
        match (&self.active_button, self.last_wheel) {
            (Some(button), _) => match button.to_ascii_lowercase().as_str() {
                "left" => PointerOverlay::LeftHeld,
                "right" => PointerOverlay::RightHeld,
                _ => PointerOverlay::Hidden,
            },
            (None, None) => PointerOverlay::Idle,
            (None, Some((0, 1))) => PointerOverlay::WheelUp,
            (None, Some((0, -1))) => PointerOverlay::WheelDown,
            (None, Some(_)) => PointerOverlay::Hidden,
        }
    }

    /// Text for the pressed-key banner, or `None` when no key is held.
    pub fn key_banner(&self) -> Option<String> {
        if self.pressed_keys.is_empty() {
            return None;
        }
        Some(self.pressed_keys.join(" + "))
    }

    /// Cursor position in pixel coordinates.
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Held keys in press order.
    pub fn pressed_keys(&self) -> &[String] {
        &self.pressed_keys
    }
}
