//! Demoscope Action Log
//!
//! Data model and reader for the textual action log produced alongside a
//! screen recording. Each line records one timestamped input event:
//!
//! ```text
//! ms:1720,event_type:MouseMove { x: 1269.0, y: 832.0 }
//! ms:4056,event_type:Wheel { delta_x: 0, delta_y: -1 }
//! ms:6073,event_type:KeyPress(MetaLeft)
//! ```
//!
//! The log is consumed in a single forward scan, strictly in file order.

pub mod event;
pub mod reader;

pub use event::*;
pub use reader::*;
