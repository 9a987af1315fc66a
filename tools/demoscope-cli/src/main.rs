//! Demoscope CLI — overlay recorded input events onto a screen recording.
//!
//! Usage:
//!   demoscope -i screen.mp4 -a actions.log -o annotated.mp4

use std::path::PathBuf;

use clap::Parser;

use demoscope_action_log::{LogEnd, LogReader};
use demoscope_common::config::AppConfig;
use demoscope_common::error::DemoscopeError;
use demoscope_overlay::{annotate, OverlayPainter, OverlayStyle, Typeface};
use demoscope_video_io::{
    ffmpeg_available, FfmpegFrameSink, FfmpegFrameSource, FrameSink, FrameSource,
};

#[derive(Parser)]
#[command(
    name = "demoscope",
    about = "Annotate a screen recording with its recorded input events",
    version,
    author
)]
struct Cli {
    /// Input video file
    #[arg(short, long)]
    input: PathBuf,

    /// Action log file recorded alongside the video
    #[arg(short = 'a', long = "log")]
    log: PathBuf,

    /// Output video file
    #[arg(short, long)]
    output: PathBuf,

    /// Frame rate used for log synchronization and output encoding
    /// (defaults to the configured rate)
    #[arg(long)]
    fps: Option<u32>,

    /// Font file for the pressed-key banner
    #[arg(long)]
    font: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    demoscope_common::logging::init_logging(&demoscope_common::config::LoggingConfig {
        level: log_level,
        ..config.logging.clone()
    });

    if !ffmpeg_available() {
        return Err(DemoscopeError::unsupported(
            "ffmpeg and ffprobe are required but were not found in PATH",
        )
        .into());
    }

    let fps = cli.fps.unwrap_or(config.render.fps);
    let font_path = cli.font.as_deref().or(config.font.as_deref());

    let mut reader = LogReader::from_path(&cli.log)?;
    let mut source = FfmpegFrameSource::open(&cli.input, fps)?;
    let mut sink = FfmpegFrameSink::create(&cli.output, fps, source.width(), source.height())?;

    let typeface = Typeface::discover(font_path);
    let mut painter = OverlayPainter::new(OverlayStyle::default(), typeface);

    let report = annotate(&mut reader, &mut source, &mut sink, &mut painter)?;
    sink.finish()?;

    match &report.log_end {
        LogEnd::Eof => {}
        LogEnd::Malformed { line_number, error } => {
            tracing::warn!(
                line = line_number,
                %error,
                "Action log ended at an unparseable line; output covers the parsed prefix"
            );
        }
        LogEnd::Io {
            line_number,
            message,
        } => {
            tracing::warn!(
                line = line_number,
                message,
                "Action log stream failed mid-read; output covers the parsed prefix"
            );
        }
    }

    tracing::info!(
        events = report.events_applied,
        frames = report.frames_written,
        output = %cli.output.display(),
        "Annotation finished"
    );

    Ok(())
}
