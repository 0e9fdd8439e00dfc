//! Error types for flashcard PDF creation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FlashcardError.
pub type Result<T> = std::result::Result<T, FlashcardError>;

/// Errors that abort a flashcard run.
#[derive(Debug, Error)]
pub enum FlashcardError {
    #[error("font file {} not found", .0.display())]
    MissingFontFile(PathBuf),

    #[error("failed to load font from {}: {reason}", .path.display())]
    FontParse { path: PathBuf, reason: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading the vocabulary file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read vocabulary file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed vocabulary data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vocabulary data contains no lessons")]
    NoLessons,

    #[error("lesson label must be a string or a number, got {0}")]
    InvalidLabel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_message_names_path() {
        let err = FlashcardError::MissingFontFile(PathBuf::from("files/NotoSans.ttf"));
        assert_eq!(err.to_string(), "font file files/NotoSans.ttf not found");
    }

    #[test]
    fn load_errors_pass_through_unchanged() {
        let err: FlashcardError = LoadError::NoLessons.into();
        assert_eq!(err.to_string(), "vocabulary data contains no lessons");
    }
}
