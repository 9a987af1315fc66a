//! Timestamp merge loop between the action log and the video stream.

use std::io::BufRead;

use demoscope_action_log::{LogEnd, LogReader};
use demoscope_common::error::DemoscopeResult;
use demoscope_video_io::{FrameSink, FrameSource};

use crate::draw::OverlayPainter;
use crate::state::InputState;

/// What a completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Events folded into the input state.
    pub events_applied: u64,

    /// Frames annotated and written to the sink.
    pub frames_written: u64,

    /// Why the event stream ended.
    pub log_end: LogEnd,
}

/// Merge the action log with the video stream.
///
/// One pass over both: each event is applied to the input state, then
/// frames are decoded, annotated with that state, and written until the
/// video position catches up to the event's timestamp. An event behind
/// the current position (bursts between frames) updates state without
/// advancing the video. The run ends when the log ends; frames past the
/// last event are not copied through.
///
/// Frames written before a failure stay in the sink; callers decide
/// whether to finalize it.
pub fn annotate<R, S, K>(
    reader: &mut LogReader<R>,
    source: &mut S,
    sink: &mut K,
    painter: &mut OverlayPainter,
) -> DemoscopeResult<SyncReport>
where
    R: BufRead,
    S: FrameSource,
    K: FrameSink,
{
    let mut state = InputState::centered(source.width(), source.height());
    let mut current_video_ms: u64 = 0;
    let mut source_done = false;
    let mut events_applied: u64 = 0;
    let mut frames_written: u64 = 0;

    while let Some(event) = reader.next_event() {
        state.apply(&event)?;
        events_applied += 1;

        if current_video_ms > event.timestamp_ms {
            continue;
        }

        while !source_done {
            let Some(mut frame) = source.read_frame()? else {
                source_done = true;
                break;
            };
            current_video_ms = source.position_ms();

            painter.paint(&mut frame, &state);
            sink.write_frame(&frame)?;
            frames_written += 1;

            if current_video_ms >= event.timestamp_ms {
                break;
            }
        }
    }

    let log_end = reader.end().cloned().unwrap_or(LogEnd::Eof);
    tracing::debug!(
        events_applied,
        frames_written,
        ?log_end,
        "Merge loop finished"
    );

    Ok(SyncReport {
        events_applied,
        frames_written,
        log_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::OverlayStyle;
    use demoscope_common::error::DemoscopeError;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    /// Fixed-rate source yielding a given number of black frames.
    struct VecSource {
        width: u32,
        height: u32,
        fps: u32,
        total: u64,
        read: u64,
    }

    impl VecSource {
        fn new(width: u32, height: u32, fps: u32, total: u64) -> Self {
            Self {
                width,
                height,
                fps,
                total,
                read: 0,
            }
        }
    }

    impl FrameSource for VecSource {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn read_frame(&mut self) -> DemoscopeResult<Option<RgbImage>> {
            if self.read == self.total {
                return Ok(None);
            }
            self.read += 1;
            Ok(Some(RgbImage::from_pixel(
                self.width,
                self.height,
                Rgb([0, 0, 0]),
            )))
        }

        fn position_ms(&self) -> u64 {
            self.read * 1000 / self.fps as u64
        }
    }

    #[derive(Default)]
    struct VecSink {
        frames: Vec<RgbImage>,
        finished: bool,
    }

    impl FrameSink for VecSink {
        fn write_frame(&mut self, frame: &RgbImage) -> DemoscopeResult<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn finish(&mut self) -> DemoscopeResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn reader(content: &str) -> LogReader<Cursor<Vec<u8>>> {
        LogReader::new(Cursor::new(content.as_bytes().to_vec()))
    }

    fn painter() -> OverlayPainter {
        OverlayPainter::new(OverlayStyle::default(), None)
    }

    #[test]
    fn test_each_event_annotates_frames_up_to_its_timestamp() {
        // At 1 fps, frame n covers up to (n + 1) * 1000 ms.
        let mut log = reader(
            "ms:0,event_type:MouseMove { x: 10.0, y: 20.0 }\n\
             ms:1000,event_type:Wheel { delta_x: 0, delta_y: 1 }\n",
        );
        let mut source = VecSource::new(64, 64, 1, 2);
        let mut sink = VecSink::default();

        let report = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap();

        assert_eq!(report.events_applied, 2);
        assert_eq!(report.frames_written, 2);
        assert!(report.log_end.is_eof());

        // First frame carries the idle circle around (10, 20).
        assert_eq!(*sink.frames[0].get_pixel(15, 20), Rgb([255, 0, 0]));
        // Second frame carries the up arrow shaft above the cursor.
        assert_eq!(*sink.frames[1].get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*sink.frames[1].get_pixel(15, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_event_behind_video_position_advances_no_frames() {
        // 10 fps: one frame spans 100 ms. The first event pulls the video
        // to 100 ms; the event at 50 ms is already behind and only updates
        // state; the event at 200 ms drains one more frame.
        let mut log = reader(
            "ms:100,event_type:Wheel { delta_x: 0, delta_y: 1 }\n\
             ms:50,event_type:MouseMove { x: 5.0, y: 5.0 }\n\
             ms:200,event_type:KeyPress(A)\n",
        );
        let mut source = VecSource::new(64, 64, 10, 10);
        let mut sink = VecSink::default();

        let report = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap();

        assert_eq!(report.events_applied, 3);
        assert_eq!(report.frames_written, 2);
    }

    #[test]
    fn test_video_exhaustion_still_drains_remaining_events() {
        let mut log = reader(
            "ms:0,event_type:KeyPress(A)\n\
             ms:5000,event_type:KeyPress(B)\n\
             ms:6000,event_type:KeyRelease(A)\n",
        );
        let mut source = VecSource::new(64, 64, 1, 2);
        let mut sink = VecSink::default();

        let report = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap();

        // Both frames were written while chasing the 5000 ms event; the
        // later events still fold into state without error.
        assert_eq!(report.events_applied, 3);
        assert_eq!(report.frames_written, 2);
        assert!(report.log_end.is_eof());
    }

    #[test]
    fn test_unheld_key_release_fails_even_after_video_end() {
        let mut log = reader(
            "ms:0,event_type:KeyPress(A)\n\
             ms:5000,event_type:KeyRelease(B)\n",
        );
        let mut source = VecSource::new(64, 64, 1, 1);
        let mut sink = VecSink::default();

        let err = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap_err();
        assert!(matches!(err, DemoscopeError::KeyNotHeld { ref key } if key == "B"));

        // The frame written before the failure is still in the sink.
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_malformed_tail_line_completes_with_prior_frames() {
        let mut log = reader(
            "ms:0,event_type:MouseMove { x: 10.0, y: 10.0 }\n\
             garbage line\n",
        );
        let mut source = VecSource::new(64, 64, 1, 3);
        let mut sink = VecSink::default();

        let report = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap();

        assert_eq!(report.events_applied, 1);
        assert_eq!(report.frames_written, 1);
        assert!(matches!(
            report.log_end,
            LogEnd::Malformed { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_empty_log_writes_nothing() {
        let mut log = reader("");
        let mut source = VecSource::new(64, 64, 30, 5);
        let mut sink = VecSink::default();

        let report = annotate(&mut log, &mut source, &mut sink, &mut painter()).unwrap();

        assert_eq!(report.events_applied, 0);
        assert_eq!(report.frames_written, 0);
        assert!(report.log_end.is_eof());
    }
}
