//! Drawing primitives for frame annotation.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use demoscope_common::error::{DemoscopeError, DemoscopeResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
    text_size,
};

use crate::state::{InputState, PointerOverlay};
use crate::style::OverlayStyle;

/// Direction of an arrow glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Draw an arrow glyph anchored at `pos`: a straight shaft of the given
/// length plus two diagonal head strokes at the tip.
pub fn draw_arrow(
    frame: &mut RgbImage,
    pos: (i32, i32),
    direction: ArrowDirection,
    color: Rgb<u8>,
    length: i32,
) {
    let (x, y) = pos;
    let tip = match direction {
        ArrowDirection::Up => (x, y - length),
        ArrowDirection::Down => (x, y + length),
        ArrowDirection::Left => (x - length, y),
        ArrowDirection::Right => (x + length, y),
    };

    let line = |frame: &mut RgbImage, from: (i32, i32), to: (i32, i32)| {
        draw_line_segment_mut(
            frame,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            color,
        );
    };

    line(frame, pos, tip);
    match direction {
        ArrowDirection::Up => {
            line(frame, tip, (tip.0 - 5, tip.1 + 10));
            line(frame, tip, (tip.0 + 5, tip.1 + 10));
        }
        ArrowDirection::Down => {
            line(frame, tip, (tip.0 - 5, tip.1 - 10));
            line(frame, tip, (tip.0 + 5, tip.1 - 10));
        }
        ArrowDirection::Left => {
            line(frame, tip, (tip.0 + 10, tip.1 - 5));
            line(frame, tip, (tip.0 + 10, tip.1 + 5));
        }
        ArrowDirection::Right => {
            line(frame, tip, (tip.0 - 10, tip.1 - 5));
            line(frame, tip, (tip.0 - 10, tip.1 + 5));
        }
    }
}

/// A loaded banner typeface.
pub struct Typeface {
    font: FontVec,
}

/// Font locations searched when no override is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
];

impl Typeface {
    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path) -> DemoscopeResult<Self> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            DemoscopeError::render(format!("Failed to parse font {}: {e}", path.display()))
        })?;
        Ok(Self { font })
    }

    /// Resolve a typeface from the configured override or well-known
    /// system locations. Returns `None` when nothing usable is found;
    /// the pressed-key banner is then skipped.
    pub fn discover(override_path: Option<&Path>) -> Option<Self> {
        if let Some(path) = override_path {
            match Self::load(path) {
                Ok(typeface) => return Some(typeface),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Configured font unusable");
                }
            }
        }

        for candidate in SYSTEM_FONT_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                if let Ok(typeface) = Self::load(path) {
                    tracing::debug!(path = candidate, "Using system font for key banner");
                    return Some(typeface);
                }
            }
        }

        None
    }
}

/// Paints the overlay implied by an [`InputState`] onto frames.
pub struct OverlayPainter {
    style: OverlayStyle,
    typeface: Option<Typeface>,
    banner_warned: bool,
}

impl OverlayPainter {
    pub fn new(style: OverlayStyle, typeface: Option<Typeface>) -> Self {
        Self {
            style,
            typeface,
            banner_warned: false,
        }
    }

    /// Annotate one frame with the current input state.
    pub fn paint(&mut self, frame: &mut RgbImage, state: &InputState) {
        let cursor = state.cursor();

        match state.pointer_overlay() {
            PointerOverlay::Idle => {
                draw_hollow_circle_mut(
                    frame,
                    cursor,
                    self.style.cursor_radius,
                    Rgb(self.style.idle_color),
                );
            }
            PointerOverlay::WheelUp => {
                draw_arrow(
                    frame,
                    cursor,
                    ArrowDirection::Up,
                    Rgb(self.style.arrow_color),
                    self.style.arrow_length,
                );
            }
            PointerOverlay::WheelDown => {
                draw_arrow(
                    frame,
                    cursor,
                    ArrowDirection::Down,
                    Rgb(self.style.arrow_color),
                    self.style.arrow_length,
                );
            }
            PointerOverlay::LeftHeld => {
                draw_filled_circle_mut(
                    frame,
                    cursor,
                    self.style.cursor_radius,
                    Rgb(self.style.left_click_color),
                );
            }
            PointerOverlay::RightHeld => {
                draw_filled_circle_mut(
                    frame,
                    cursor,
                    self.style.cursor_radius,
                    Rgb(self.style.right_click_color),
                );
            }
            PointerOverlay::Hidden => {}
        }

        if let Some(banner) = state.key_banner() {
            self.paint_banner(frame, &banner);
        }
    }

    fn paint_banner(&mut self, frame: &mut RgbImage, banner: &str) {
        let Some(typeface) = &self.typeface else {
            if !self.banner_warned {
                tracing::warn!("No banner typeface available; pressed keys will not be drawn");
                self.banner_warned = true;
            }
            return;
        };

        let scale = PxScale::from(self.style.banner_scale);
        let (text_width, _) = text_size(scale, &typeface.font, banner);
        let x = frame.width() as i32 / 2 - text_width as i32 / 2;
        let y = frame.height() as i32 - self.style.banner_bottom_margin;

        draw_text_mut(
            frame,
            Rgb(self.style.banner_color),
            x,
            y,
            scale,
            &typeface.font,
            banner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demoscope_action_log::event::InputEvent;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
    }

    #[test]
    fn test_arrow_up_draws_shaft_and_head() {
        let mut frame = blank(64, 64);
        draw_arrow(&mut frame, (30, 40), ArrowDirection::Up, Rgb([255, 0, 0]), 20);

        // Shaft passes through the midpoint between anchor and tip.
        assert_eq!(*frame.get_pixel(30, 30), Rgb([255, 0, 0]));
        // Tip.
        assert_eq!(*frame.get_pixel(30, 20), Rgb([255, 0, 0]));
        // Head stroke endpoints.
        assert_eq!(*frame.get_pixel(25, 30), Rgb([255, 0, 0]));
        assert_eq!(*frame.get_pixel(35, 30), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_arrow_down_points_the_other_way() {
        let mut frame = blank(64, 64);
        draw_arrow(&mut frame, (30, 20), ArrowDirection::Down, Rgb([255, 0, 0]), 20);

        assert_eq!(*frame.get_pixel(30, 40), Rgb([255, 0, 0]));
        assert_eq!(*frame.get_pixel(30, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_idle_state_paints_hollow_circle() {
        let mut painter = OverlayPainter::new(OverlayStyle::default(), None);
        let mut frame = blank(64, 64);
        let mut state = InputState::centered(64, 64);
        state.apply(&InputEvent::mouse_move(0, 20.0, 20.0)).unwrap();

        painter.paint(&mut frame, &state);

        // Rim is drawn, center is not.
        assert_eq!(*frame.get_pixel(25, 20), Rgb([255, 0, 0]));
        assert_eq!(*frame.get_pixel(20, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_left_hold_paints_filled_circle() {
        let mut painter = OverlayPainter::new(OverlayStyle::default(), None);
        let mut frame = blank(64, 64);
        let mut state = InputState::centered(64, 64);
        state.apply(&InputEvent::mouse_move(0, 20.0, 20.0)).unwrap();
        state.apply(&InputEvent::button_press(10, "Left")).unwrap();

        painter.paint(&mut frame, &state);

        assert_eq!(*frame.get_pixel(20, 20), Rgb([255, 165, 0]));
    }

    #[test]
    fn test_unknown_button_paints_nothing() {
        let mut painter = OverlayPainter::new(OverlayStyle::default(), None);
        let mut frame = blank(64, 64);
        let mut state = InputState::centered(64, 64);
        state.apply(&InputEvent::button_press(0, "Middle")).unwrap();

        painter.paint(&mut frame, &state);

        assert!(frame.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_banner_without_typeface_is_skipped() {
        let mut painter = OverlayPainter::new(OverlayStyle::default(), None);
        let mut frame = blank(64, 64);
        let mut state = InputState::centered(64, 64);
        state.apply(&InputEvent::button_press(0, "Middle")).unwrap();
        state.apply(&InputEvent::key_press(10, "A")).unwrap();

        // Must not panic and must leave pixels untouched.
        painter.paint(&mut frame, &state);
        assert!(frame.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
