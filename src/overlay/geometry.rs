//! Overlay geometry: CSS percentage boxes and pixel rectangles.
//!
//! Annotation coordinates are percentages of the full image, so a container
//! sized exactly to the displayed image needs no arithmetic: the CSS box is
//! the percentages themselves. Pixel rectangles are only for hosts that draw
//! on a canvas or into an export.

use crate::response::Annotation;
use serde::Serialize;

/// CSS-compatible absolute box (`left/top/width/height` as `"N%"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayBox {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
}

impl OverlayBox {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        Self {
            left: css_percent(annotation.x),
            top: css_percent(annotation.y),
            width: css_percent(annotation.width),
            height: css_percent(annotation.height),
        }
    }
}

/// Current on-screen size of the displayed image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderBox {
    pub width: f64,
    pub height: f64,
}

impl RenderBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn from_percent(annotation: &Annotation, render: RenderBox) -> Self {
        Self {
            x: annotation.x / 100.0 * render.width,
            y: annotation.y / 100.0 * render.height,
            width: annotation.width / 100.0 * render.width,
            height: annotation.height / 100.0 * render.height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// `10.0` → `"10%"`, `12.5` → `"12.5%"`. Rounded to four decimals so float
/// noise never reaches the stylesheet.
pub fn css_percent(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0 + 0.0;
    format!("{}%", rounded)
}
