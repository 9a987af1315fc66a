//! Input event types and the per-line grammar of the action log.

use std::fmt;

/// Timestamp in milliseconds since recording start.
pub type TimestampMs = u64;

/// A single recorded input event with timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// Milliseconds since recording start.
    pub timestamp_ms: TimestampMs,

    /// The event payload.
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Pointer position update, in source pixel coordinates.
    MouseMove { x: f64, y: f64 },

    /// Scroll wheel tick. Deltas are signed tick counts, one unit per notch.
    Wheel { delta_x: i32, delta_y: i32 },

    /// Keyboard key press. The key identifier is recorded verbatim
    /// (e.g., "KeyA", "MetaLeft", "F1").
    KeyPress { key: String },

    /// Keyboard key release.
    KeyRelease { key: String },

    /// Mouse button press (e.g., "Left", "Right").
    ButtonPress { button: String },

    /// Mouse button release.
    ButtonRelease { button: String },
}

/// Why a log line failed to parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line does not start with an ms:<integer> timestamp")]
    MissingTimestamp,

    #[error("invalid timestamp value: {value}")]
    BadTimestamp { value: String },

    #[error("unrecognized event type")]
    UnknownKind,

    #[error("event payload has no {{ ... }} clause")]
    MissingPayload,

    #[error("payload field {name} is missing")]
    MissingField { name: String },

    #[error("payload field {name} has invalid value: {value}")]
    BadField { name: String, value: String },

    #[error("{kind} event has no parenthesized identifier")]
    MissingIdentifier { kind: String },
}

impl InputEvent {
    /// Create a mouse move event.
    pub fn mouse_move(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::MouseMove { x, y },
        }
    }

    /// Create a wheel event.
    pub fn wheel(timestamp_ms: TimestampMs, delta_x: i32, delta_y: i32) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::Wheel { delta_x, delta_y },
        }
    }

    /// Create a key press event.
    pub fn key_press(timestamp_ms: TimestampMs, key: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::KeyPress { key: key.into() },
        }
    }

    /// Create a key release event.
    pub fn key_release(timestamp_ms: TimestampMs, key: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::KeyRelease { key: key.into() },
        }
    }

    /// Create a button press event.
    pub fn button_press(timestamp_ms: TimestampMs, button: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::ButtonPress {
                button: button.into(),
            },
        }
    }

    /// Create a button release event.
    pub fn button_release(timestamp_ms: TimestampMs, button: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::ButtonRelease {
                button: button.into(),
            },
        }
    }
}

/// Parse one action log line.
///
/// The timestamp is the integer between `ms:` and the first comma; the
/// event kind is matched by substring, mirroring the recorder's output
/// format. Identifier-carrying kinds take the parenthesized text verbatim.
pub fn parse_line(line: &str) -> Result<InputEvent, ParseError> {
    let line = line.trim();

    let (head, _) = line.split_once(',').ok_or(ParseError::MissingTimestamp)?;
    let raw_ms = head.strip_prefix("ms:").ok_or(ParseError::MissingTimestamp)?;
    let timestamp_ms = raw_ms
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::BadTimestamp {
            value: raw_ms.trim().to_string(),
        })?;

    let kind = if line.contains("MouseMove") {
        EventKind::MouseMove {
            x: float_field(line, "x")?,
            y: float_field(line, "y")?,
        }
    } else if line.contains("Wheel") {
        EventKind::Wheel {
            delta_x: int_field(line, "delta_x")?,
            delta_y: int_field(line, "delta_y")?,
        }
    } else if line.contains("KeyPress") {
        EventKind::KeyPress {
            key: paren_identifier(line, "KeyPress")?.to_string(),
        }
    } else if line.contains("KeyRelease") {
        EventKind::KeyRelease {
            key: paren_identifier(line, "KeyRelease")?.to_string(),
        }
    } else if line.contains("ButtonPress") {
        EventKind::ButtonPress {
            button: paren_identifier(line, "ButtonPress")?.to_string(),
        }
    } else if line.contains("ButtonRelease") {
        EventKind::ButtonRelease {
            button: paren_identifier(line, "ButtonRelease")?.to_string(),
        }
    } else {
        return Err(ParseError::UnknownKind);
    };

    Ok(InputEvent { timestamp_ms, kind })
}

/// Look up a named field inside the trailing `{ key: value, ... }` clause.
fn brace_field<'a>(line: &'a str, name: &str) -> Result<&'a str, ParseError> {
    let open = line.find('{').ok_or(ParseError::MissingPayload)?;
    let close = line.rfind('}').ok_or(ParseError::MissingPayload)?;
    if close <= open {
        return Err(ParseError::MissingPayload);
    }

    for part in line[open + 1..close].split(',') {
        if let Some((key, value)) = part.split_once(':') {
            if key.trim() == name {
                return Ok(value.trim());
            }
        }
    }

    Err(ParseError::MissingField {
        name: name.to_string(),
    })
}

fn float_field(line: &str, name: &str) -> Result<f64, ParseError> {
    let raw = brace_field(line, name)?;
    raw.parse::<f64>().map_err(|_| ParseError::BadField {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

fn int_field(line: &str, name: &str) -> Result<i32, ParseError> {
    let raw = brace_field(line, name)?;
    raw.parse::<i32>().map_err(|_| ParseError::BadField {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

/// Extract the identifier between `<kind>(` and the next `)`.
fn paren_identifier<'a>(line: &'a str, kind: &str) -> Result<&'a str, ParseError> {
    let missing = || ParseError::MissingIdentifier {
        kind: kind.to_string(),
    };

    let marker = format!("{kind}(");
    let start = line.find(&marker).ok_or_else(missing)? + marker.len();
    let end = line[start..].find(')').ok_or_else(missing)? + start;
    Ok(&line[start..end])
}

impl fmt::Display for InputEvent {
    /// Render the event in the exact log-line grammar, round-tripping
    /// with [`parse_line`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.timestamp_ms;
        match &self.kind {
            EventKind::MouseMove { x, y } => {
                write!(f, "ms:{ms},event_type:MouseMove {{ x: {x:?}, y: {y:?} }}")
            }
            EventKind::Wheel { delta_x, delta_y } => write!(
                f,
                "ms:{ms},event_type:Wheel {{ delta_x: {delta_x}, delta_y: {delta_y} }}"
            ),
            EventKind::KeyPress { key } => write!(f, "ms:{ms},event_type:KeyPress({key})"),
            EventKind::KeyRelease { key } => write!(f, "ms:{ms},event_type:KeyRelease({key})"),
            EventKind::ButtonPress { button } => {
                write!(f, "ms:{ms},event_type:ButtonPress({button})")
            }
            EventKind::ButtonRelease { button } => {
                write!(f, "ms:{ms},event_type:ButtonRelease({button})")
            }
        }
    }
}
