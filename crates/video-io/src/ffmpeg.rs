//! ffmpeg-backed implementations of [`FrameSource`] and [`FrameSink`].
//!
//! Both directions use raw rgb24 frames over pipes so no codec logic
//! lives in this crate. Each child's stderr is drained on a helper thread
//! to keep the pipe from blocking the encoder/decoder, and surfaced when
//! the process fails.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use demoscope_common::error::{DemoscopeError, DemoscopeResult};
use image::RgbImage;

use crate::probe::probe_video;
use crate::{FrameSink, FrameSource};

/// Check that the ffmpeg toolchain is reachable in PATH.
pub fn ffmpeg_available() -> bool {
    command_exists("ffmpeg") && command_exists("ffprobe")
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn drain_stderr(child: &mut Child) -> Option<JoinHandle<String>> {
    let stderr = child.stderr.take()?;
    Some(std::thread::spawn(move || {
        let mut reader = std::io::BufReader::new(stderr);
        let mut output = String::new();
        match reader.read_to_string(&mut output) {
            Ok(_) => output,
            Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
        }
    }))
}

fn join_stderr(task: Option<JoinHandle<String>>) -> String {
    task.map(|t| {
        t.join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string())
    })
    .unwrap_or_default()
}

/// Decodes a video file into a sequence of rgb24 frames.
pub struct FfmpegFrameSource {
    child: Child,
    stdout: ChildStdout,
    stderr_task: Option<JoinHandle<String>>,
    width: u32,
    height: u32,
    fps: u32,
    frames_read: u64,
    done: bool,
}

impl FfmpegFrameSource {
    /// Open a video for reading. Probes geometry first; an unopenable
    /// input aborts here, before any child process is spawned.
    pub fn open(path: &Path, fps: u32) -> DemoscopeResult<Self> {
        let info = probe_video(path)?;

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DemoscopeError::video(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DemoscopeError::video("Failed to capture ffmpeg stdout"))?;
        let stderr_task = drain_stderr(&mut child);

        tracing::info!(
            input = %path.display(),
            width = info.width,
            height = info.height,
            frame_count = ?info.frame_count,
            "Opened video source"
        );

        Ok(Self {
            child,
            stdout,
            stderr_task,
            width: info.width,
            height: info.height,
            fps: fps.max(1),
            frames_read: 0,
            done: false,
        })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_frame(&mut self) -> DemoscopeResult<Option<RgbImage>> {
        if self.done {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.width as usize * self.height as usize * 3];
        match self.stdout.read_exact(&mut buf) {
            Ok(()) => {
                self.frames_read += 1;
                let frame = RgbImage::from_raw(self.width, self.height, buf).ok_or_else(|| {
                    DemoscopeError::video("Decoded frame does not match probed geometry")
                })?;
                Ok(Some(frame))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.done = true;
                let status = self.child.wait()?;
                let stderr = join_stderr(self.stderr_task.take());
                if !status.success() {
                    return Err(DemoscopeError::video(format!(
                        "ffmpeg decode failed (status {status}): {}",
                        stderr.trim()
                    )));
                }
                tracing::debug!(frames = self.frames_read, "Video source exhausted");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn position_ms(&self) -> u64 {
        // Timestamp of the next frame to decode at the fixed rate.
        self.frames_read * 1000 / self.fps as u64
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if !self.done {
            self.child.kill().ok();
            self.child.wait().ok();
        }
        join_stderr(self.stderr_task.take());
    }
}

/// Encodes rgb24 frames into an H.264 MP4 file at a fixed frame rate.
pub struct FfmpegFrameSink {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_task: Option<JoinHandle<String>>,
    width: u32,
    height: u32,
    frames_written: u64,
    finished: bool,
}

impl FfmpegFrameSink {
    /// Open the output file for writing.
    pub fn create(path: &Path, fps: u32, width: u32, height: u32) -> DemoscopeResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let size = format!("{width}x{height}");
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &size, "-r", &fps.max(1).to_string(), "-i", "pipe:0"])
            .args(["-c:v", "libx264", "-preset", "medium", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DemoscopeError::render(format!("Failed to start ffmpeg encoder: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DemoscopeError::render("Failed to capture encoder stdin"))?;
        let stderr_task = drain_stderr(&mut child);

        tracing::info!(output = %path.display(), width, height, fps, "Opened video sink");

        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr_task,
            width,
            height,
            frames_written: 0,
            finished: false,
        })
    }
}

impl FrameSink for FfmpegFrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> DemoscopeResult<()> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(DemoscopeError::render(format!(
                "Frame geometry {}x{} does not match sink {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| DemoscopeError::render("Video sink is already closed"))?;

        stdin
            .write_all(frame.as_raw())
            .map_err(|e| DemoscopeError::render(format!("Failed to stream frame: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> DemoscopeResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        // Closing stdin lets the encoder flush and exit.
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .map_err(|e| DemoscopeError::render(format!("Failed to wait on encoder: {e}")))?;
        let stderr = join_stderr(self.stderr_task.take());

        if !status.success() {
            return Err(DemoscopeError::render(format!(
                "ffmpeg encode failed (status {status}): {}",
                stderr.trim()
            )));
        }

        tracing::info!(frames = self.frames_written, "Video sink finalized");
        Ok(())
    }
}

impl Drop for FfmpegFrameSink {
    fn drop(&mut self) {
        if !self.finished {
            drop(self.stdin.take());
            self.child.kill().ok();
            self.child.wait().ok();
            join_stderr(self.stderr_task.take());
        }
    }
}
