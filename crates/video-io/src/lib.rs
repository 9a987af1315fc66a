//! Demoscope Video I/O
//!
//! Frame-level boundary to the external video toolchain. Decoding and
//! encoding are delegated to an `ffmpeg` child process speaking raw rgb24
//! frames over pipes; stream geometry comes from `ffprobe`. The rest of
//! the pipeline only sees the [`FrameSource`] and [`FrameSink`] traits and
//! in-memory [`RgbImage`] buffers.

pub mod ffmpeg;
pub mod probe;

pub use ffmpeg::{ffmpeg_available, FfmpegFrameSink, FfmpegFrameSource};
pub use probe::{probe_video, VideoInfo};

use demoscope_common::error::DemoscopeResult;
use image::RgbImage;

/// Sequential read access to the frames of a video stream.
pub trait FrameSource {
    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;

    /// Decode the next frame. `Ok(None)` signals end of stream.
    fn read_frame(&mut self) -> DemoscopeResult<Option<RgbImage>>;

    /// Current playback position in milliseconds: the timestamp of the
    /// next frame to be decoded, at the fixed output rate.
    fn position_ms(&self) -> u64;
}

/// Sequential write access to an output video stream.
pub trait FrameSink {
    /// Encode one frame. Frames must match the sink's configured geometry.
    fn write_frame(&mut self, frame: &RgbImage) -> DemoscopeResult<()>;

    /// Flush and close the stream, surfacing any encoder failure.
    fn finish(&mut self) -> DemoscopeResult<()>;
}
