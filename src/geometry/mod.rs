//! Geometry primitives and the original/display coordinate transform.

mod transform;

pub use transform::{
    compute_display_geometry, DisplayGeometry, GeometryError, Point, Rect, DEFAULT_MAX_DISPLAY_HEIGHT,
    DEFAULT_MAX_DISPLAY_WIDTH,
};
