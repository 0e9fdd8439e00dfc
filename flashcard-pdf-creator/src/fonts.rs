//! Font loading and metrics
//!
//! Loads the single font used on every card and measures strings with fontdue so
//! that centering and wrapping agree with the widths written into the PDF.

use crate::error::{FlashcardError, Result};
use fontdue::{Font, FontSettings};
use log::info;
use std::path::{Path, PathBuf};

/// A loaded font plus the raw bytes needed to embed it.
#[derive(Clone)]
pub struct FontContext {
    pub font: Font,
    pub font_name: String,     // PDF resource / base font name
    pub font_path: PathBuf,    // Source path, decides embedding strategy
    pub font_data: Vec<u8>,    // Raw font program for FontFile2
}

impl FontContext {
    /// Load the font at `path`, registering it under `font_name`.
    ///
    /// A missing file is reported as [`FlashcardError::MissingFontFile`] rather than
    /// falling back to some other font.
    pub fn load(path: impl AsRef<Path>, font_name: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FlashcardError::MissingFontFile(path.to_path_buf()));
        }

        let font_data = std::fs::read(path)?;
        let context = Self::from_bytes(font_data, font_name, path)?;
        info!("Loaded font {} from {}", context.font_name, path.display());
        Ok(context)
    }

    /// Build a context from font bytes already in memory.
    pub fn from_bytes(font_data: Vec<u8>, font_name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let font = Font::from_bytes(font_data.clone(), FontSettings::default()).map_err(|e| {
            FlashcardError::FontParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            font,
            font_name: font_name.to_string(),
            font_path: path.to_path_buf(),
            font_data,
        })
    }

    /// Horizontal advance of `ch` at `font_size`, in points.
    pub fn advance_width(&self, ch: char, font_size: f32) -> f32 {
        self.font.metrics(ch, font_size).advance_width
    }

    /// Kerning between two adjacent characters at `font_size`, in points.
    pub fn kerning(&self, left: char, right: char, font_size: f32) -> f32 {
        self.font.horizontal_kern(left, right, font_size).unwrap_or(0.0)
    }

    /// Width of `text` set at `font_size`, including kerning.
    pub fn calculate_text_width(&self, text: &str, font_size: f32) -> f32 {
        let chars: Vec<char> = text.chars().collect();
        let mut width = 0.0;
        for (i, &ch) in chars.iter().enumerate() {
            width += self.advance_width(ch, font_size);
            if let Some(&next) = chars.get(i + 1) {
                width += self.kerning(ch, next, font_size);
            }
        }
        width
    }

    /// Advance width of `ch` in thousandths of an em, as PDF width arrays expect.
    pub fn glyph_width_1000(&self, ch: char) -> f32 {
        self.advance_width(ch, 1000.0)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    /// Only plain TrueType files can go into a FontFile2 stream.
    pub fn is_embeddable(&self) -> bool {
        self.font_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ttf"))
            && !self.font_data.is_empty()
    }
}
