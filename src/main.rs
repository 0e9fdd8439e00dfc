//! Kanji Flashcards
//!
//! Builds `output/<lesson>-dars.pdf` from `files/words.json` using the font at
//! `files/NotoSans.ttf`.

use anyhow::{Context, Result};
use flashcard_pdf_creator::{create_flashcards_pdf, FlashcardJob};

const FONT_PATH: &str = "files/NotoSans.ttf";
const VOCABULARY_PATH: &str = "files/words.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let job = FlashcardJob::new(FONT_PATH, VOCABULARY_PATH);
    let summary = create_flashcards_pdf(&job).context("flashcard generation failed")?;

    log::info!(
        "{} words from lesson {} on {} pages",
        summary.word_count,
        summary.lesson_label,
        summary.page_count
    );
    println!("File {} created!", summary.output_path.display());
    Ok(())
}
