//! Demoscope Overlay Engine
//!
//! Turns the action log into per-frame annotations on a screen recording:
//!
//! ```text
//! actions.log ──▶ LogReader ──▶ InputState ──┐
//!                                            ├── merge by timestamp
//! input video ──▶ FrameSource ───────────────┘         │
//!                                                      ▼
//!                                              OverlayPainter
//!                                                      │
//!                                                      ▼
//!                                                 FrameSink
//! ```
//!
//! The merge loop is purely sequential: one input state owned by the
//! loop, one pass over both streams, no shared mutable state.

pub mod draw;
pub mod state;
pub mod style;
pub mod sync;

pub use draw::{draw_arrow, ArrowDirection, OverlayPainter, Typeface};
pub use state::{InputState, PointerOverlay};
pub use style::OverlayStyle;
pub use sync::{annotate, SyncReport};
