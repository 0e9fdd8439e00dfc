//! Flashcard PDF Creator
//!
//! Turns lesson vocabulary into a printable, double-sided flashcard PDF: a grid of
//! words on the front pages and, mirrored for duplex printing, their readings and
//! wrapped translations on the back pages.

pub mod config;
pub mod error;
pub mod flashcard_generator;
pub mod fonts;
pub mod layout;
pub mod pdf_surface;
pub mod surface;
pub mod typography;
pub mod vocabulary;

// Re-export commonly used functions and types
pub use config::{CardStyle, Color, GridSpec, TextStyle};
pub use error::{FlashcardError, LoadError, Result};
pub use flashcard_generator::{
    create_flashcards_pdf, FlashcardJob, FlashcardRenderer, FlashcardSummary, RenderPhase,
};
pub use fonts::FontContext;
pub use layout::{mirror_x, plan_pages, CardPosition, LayoutPlan, Page};
pub use pdf_surface::PdfSurface;
pub use surface::DrawingSurface;
pub use typography::wrap_text;
pub use vocabulary::{load_lesson, parse_lesson, Lesson, WordEntry};
