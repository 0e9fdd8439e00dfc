//! Page geometry and card styling.
//!
//! Everything the renderer needs to know about sizes, colors and fonts lives in
//! these two structs; nothing is kept in process-wide state.

use serde::{Deserialize, Serialize};

/// A4 width in points.
pub const A4_SHORT_EDGE: f32 = 595.275_6;
/// A4 height in points.
pub const A4_LONG_EDGE: f32 = 841.889_8;

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0 };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Font size and fill color for one kind of text on a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font_size: f32, color: Color) -> Self {
        Self { font_size, color }
    }
}

/// Page size, margin and grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridSpec {
    /// Landscape A4, 40pt margin, 4x4 cards.
    fn default() -> Self {
        Self {
            page_width: A4_LONG_EDGE,
            page_height: A4_SHORT_EDGE,
            margin: 40.0,
            rows: 4,
            cols: 4,
        }
    }
}

impl GridSpec {
    /// Number of cards that fit on one page.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn cell_width(&self) -> f32 {
        (self.page_width - 2.0 * self.margin) / self.cols as f32
    }

    pub fn cell_height(&self) -> f32 {
        (self.page_height - 2.0 * self.margin) / self.rows as f32
    }
}

/// Fonts, colors and text placement for both sides of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    /// Resource and base-font name the font is registered under in the PDF.
    pub font_name: String,
    /// Small `<lesson>-kanji` caption on the front.
    pub caption: TextStyle,
    /// Front word.
    pub word: TextStyle,
    /// Reading on the back.
    pub reading: TextStyle,
    /// Wrapped translation on the back.
    pub translation: TextStyle,
    pub border_color: Color,
    /// Stroke a border around back cards as well.
    pub draw_back_border: bool,
    /// Horizontal room subtracted from the cell width before wrapping translations.
    pub translation_inset: f32,
    /// Distance from the top of the cell to the first translation baseline.
    pub translation_top_offset: f32,
    pub translation_line_height: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            font_name: "JapaneseFont".to_string(),
            caption: TextStyle::new(10.0, Color::BLACK),
            word: TextStyle::new(35.0, Color::RED),
            reading: TextStyle::new(20.0, Color::RED),
            translation: TextStyle::new(12.0, Color::BLACK),
            border_color: Color::BLACK,
            draw_back_border: false,
            translation_inset: 10.0,
            translation_top_offset: 85.0,
            translation_line_height: 15.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_landscape_four_by_four() {
        let grid = GridSpec::default();
        assert!(grid.page_width > grid.page_height);
        assert_eq!(grid.capacity(), 16);
        assert!((grid.cell_width() - (A4_LONG_EDGE - 80.0) / 4.0).abs() < 1e-4);
        assert!((grid.cell_height() - (A4_SHORT_EDGE - 80.0) / 4.0).abs() < 1e-4);
    }

    #[test]
    fn partial_style_json_keeps_defaults() {
        let style: CardStyle = serde_json::from_str(r#"{"draw_back_border": true}"#).unwrap();
        assert!(style.draw_back_border);
        assert_eq!(style.word, CardStyle::default().word);
    }
}
