//! Drawing surface abstraction used by the renderer.

use crate::config::{Color, TextStyle};
use crate::error::Result;

/// Minimal paginated canvas.
///
/// Every call carries its own style; implementations must not rely on color or
/// font state left over from a previous call. Coordinates are PDF user space
/// points with the origin at the bottom-left of the page.
pub trait DrawingSurface {
    /// Width of `text` set at `font_size` with the surface's font.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Stroke the outline of a rectangle whose bottom-left corner is `(x, y)`.
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<()>;

    /// Draw `text` horizontally centered on `center_x` with its baseline at `y`.
    fn draw_centred_text(&mut self, center_x: f32, y: f32, text: &str, style: &TextStyle) -> Result<()>;

    /// Finish the current page and start a new one.
    fn show_page(&mut self) -> Result<()>;
}
