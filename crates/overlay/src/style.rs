//! Overlay colors and geometry.

use serde::{Deserialize, Serialize};

/// Visual parameters of the overlay, all in output pixel units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Outline color of the idle cursor marker.
    pub idle_color: [u8; 3],

    /// Fill color while the left button is held.
    pub left_click_color: [u8; 3],

    /// Fill color while the right button is held.
    pub right_click_color: [u8; 3],

    /// Scroll arrow color.
    pub arrow_color: [u8; 3],

    /// Pressed-key banner text color.
    pub banner_color: [u8; 3],

    /// Radius of the cursor markers.
    pub cursor_radius: i32,

    /// Shaft length of the scroll arrows.
    pub arrow_length: i32,

    /// Distance of the banner from the bottom edge.
    pub banner_bottom_margin: i32,

    /// Banner glyph height in pixels.
    pub banner_scale: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            idle_color: [255, 0, 0],
            left_click_color: [255, 165, 0],
            right_click_color: [0, 0, 255],
            arrow_color: [255, 0, 0],
            banner_color: [255, 0, 0],
            cursor_radius: 5,
            arrow_length: 20,
            banner_bottom_margin: 50,
            banner_scale: 28.0,
        }
    }
}
