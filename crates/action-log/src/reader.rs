//! Forward-only reader over an action log stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use demoscope_common::error::{DemoscopeError, DemoscopeResult};

use crate::event::{parse_line, InputEvent, ParseError};

/// Why the event stream ended.
///
/// A malformed line terminates the stream exactly like end-of-file does
/// (the run is not failed), but the reason stays distinguishable so callers
/// can report truncated logs.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEnd {
    /// The log was read to completion.
    Eof,

    /// A line failed to parse; nothing after it was read.
    Malformed { line_number: u64, error: ParseError },

    /// The underlying stream failed mid-read.
    Io { line_number: u64, message: String },
}

impl LogEnd {
    pub fn is_eof(&self) -> bool {
        matches!(self, LogEnd::Eof)
    }
}

/// Lazy, single-pass reader yielding events strictly in file order.
///
/// Not restartable; once an end reason is recorded no further events are
/// produced.
pub struct LogReader<R: BufRead> {
    input: R,
    line_number: u64,
    end: Option<LogEnd>,
}

impl LogReader<BufReader<File>> {
    /// Open an action log file for reading.
    pub fn from_path(path: &Path) -> DemoscopeResult<Self> {
        if !path.exists() {
            return Err(DemoscopeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LogReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line_number: 0,
            end: None,
        }
    }

    /// Read and parse the next line. Returns `None` once the stream has
    /// ended for any reason; [`LogReader::end`] tells which.
    pub fn next_event(&mut self) -> Option<InputEvent> {
        if self.end.is_some() {
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                self.end = Some(LogEnd::Eof);
                None
            }
            Ok(_) => {
                self.line_number += 1;
                match parse_line(&line) {
                    Ok(event) => Some(event),
                    Err(error) => {
                        tracing::debug!(
                            line = self.line_number,
                            %error,
                            "Action log ended at unparseable line"
                        );
                        self.end = Some(LogEnd::Malformed {
                            line_number: self.line_number,
                            error,
                        });
                        None
                    }
                }
            }
            Err(e) => {
                self.end = Some(LogEnd::Io {
                    line_number: self.line_number,
                    message: e.to_string(),
                });
                None
            }
        }
    }

    /// End reason, available once `next_event` has returned `None`.
    pub fn end(&self) -> Option<&LogEnd> {
        self.end.as_ref()
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = InputEvent;

    fn next(&mut self) -> Option<InputEvent> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use std::io::Cursor;

    fn reader(content: &str) -> LogReader<Cursor<Vec<u8>>> {
        LogReader::new(Cursor::new(content.as_bytes().to_vec()))
    }

    #[test]
    fn test_reads_events_in_file_order() {
        let mut log = reader(
            "ms:0,event_type:MouseMove { x: 10.0, y: 20.0 }\n\
             ms:100,event_type:ButtonPress(Left)\n\
             ms:250,event_type:ButtonRelease(Left)\n",
        );

        assert_eq!(
            log.next_event(),
            Some(InputEvent::mouse_move(0, 10.0, 20.0))
        );
        assert_eq!(log.next_event(), Some(InputEvent::button_press(100, "Left")));
        assert_eq!(
            log.next_event(),
            Some(InputEvent::button_release(250, "Left"))
        );
        assert_eq!(log.next_event(), None);
        assert_eq!(log.end(), Some(&LogEnd::Eof));
    }

    #[test]
    fn test_empty_input_is_eof() {
        let mut log = reader("");
        assert_eq!(log.next_event(), None);
        assert!(log.end().unwrap().is_eof());
    }

    #[test]
    fn test_malformed_line_ends_stream_without_skipping() {
        let mut log = reader(
            "ms:0,event_type:KeyPress(A)\n\
             this is not an event\n\
             ms:200,event_type:KeyRelease(A)\n",
        );

        assert_eq!(log.next_event(), Some(InputEvent::key_press(0, "A")));
        assert_eq!(log.next_event(), None);
        // The valid line after the malformed one is never yielded.
        assert_eq!(log.next_event(), None);

        match log.end() {
            Some(LogEnd::Malformed { line_number, .. }) => assert_eq!(*line_number, 2),
            other => panic!("expected malformed end, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line_ends_stream() {
        let mut log = reader("ms:0,event_type:KeyPress(A)\n\n ms:1,event_type:KeyRelease(A)\n");
        assert!(log.next_event().is_some());
        assert_eq!(log.next_event(), None);
        assert!(matches!(log.end(), Some(LogEnd::Malformed { .. })));
    }

    #[test]
    fn test_iterator_adapter_collects_prefix() {
        let log = reader(
            "ms:0,event_type:Wheel { delta_x: 0, delta_y: 1 }\n\
             ms:33,event_type:Wheel { delta_x: 0, delta_y: -1 }\n",
        );
        let events: Vec<InputEvent> = log.collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1].kind, EventKind::Wheel { delta_y: -1, .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let missing = Path::new("/nonexistent/actions.log");
        assert!(matches!(
            LogReader::from_path(missing),
            Err(DemoscopeError::FileNotFound { .. })
        ));
    }
}
