//! Stream geometry probing via ffprobe.

use std::path::Path;
use std::process::Command;

use demoscope_common::error::{DemoscopeError, DemoscopeResult};

/// Geometry of the first video stream in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,

    /// Packet count of the video stream, when the container reports one.
    pub frame_count: Option<u64>,
}

/// Probe a video file. Fails when the path is missing or ffprobe cannot
/// open the container.
pub fn probe_video(path: &Path) -> DemoscopeResult<VideoInfo> {
    if !path.exists() {
        return Err(DemoscopeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ])
        .arg(path)
        .output()
        .map_err(|e| DemoscopeError::video(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(DemoscopeError::video(format!(
            "Could not open video {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let (width, height) = parse_dimensions(&raw).ok_or_else(|| {
        DemoscopeError::video(format!(
            "ffprobe reported no usable video stream for {}",
            path.display()
        ))
    })?;

    let frame_count = probe_frame_count(path);

    Ok(VideoInfo {
        width,
        height,
        frame_count,
    })
}

/// Packet count of the first video stream; best effort, `None` when the
/// container does not support counting.
fn probe_frame_count(path: &Path) -> Option<u64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_packets",
            "-show_entries",
            "stream=nb_read_packets",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8(output.stdout).ok()?;
    parse_frame_count(&raw)
}

fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let line = raw.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.parse::<u32>().ok()?;
    let height = h.parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn parse_frame_count(raw: &str) -> Option<u64> {
    raw.lines().next()?.trim().parse::<u64>().ok()
}
