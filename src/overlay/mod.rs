//! Overlay domain: everything the host needs to draw annotation boxes.
//!
//!   - engine.rs    : session state: results, visibility, selection
//!   - palette.rs   : stable per-type colors
//!   - visibility.rs: per-type toggles and the toggle-all rule
//!   - geometry.rs  : CSS percentage boxes and pixel rectangles

pub mod engine;
pub mod geometry;
pub mod palette;
pub mod visibility;

pub use engine::{AnnotationOverlay, OverlayItem, Selection};
pub use geometry::{css_percent, OverlayBox, PixelRect, RenderBox};
pub use palette::{palette_color, ColorAssigner, PALETTE};
pub use visibility::VisibilityMap;
