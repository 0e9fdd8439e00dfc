//! Double-sided flashcard generation
//!
//! Cards are drawn in two passes over one precomputed [`LayoutPlan`]: every front
//! page first, then every back page with columns mirrored so that duplex printing
//! puts each reading and translation behind its word.

use crate::config::{CardStyle, GridSpec};
use crate::error::{FlashcardError, Result};
use crate::fonts::FontContext;
use crate::layout::{plan_pages, CardPosition, LayoutPlan};
use crate::pdf_surface::PdfSurface;
use crate::surface::DrawingSurface;
use crate::typography::wrap_text;
use crate::vocabulary::load_lesson;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where the renderer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    FrontPass,
    BackPass,
    Done,
}

/// Draws flashcards onto a surface it owns for the duration of the run.
pub struct FlashcardRenderer<S: DrawingSurface> {
    surface: S,
    style: CardStyle,
    phase: RenderPhase,
}

impl<S: DrawingSurface> FlashcardRenderer<S> {
    pub fn new(surface: S, style: CardStyle) -> Self {
        Self {
            surface,
            style,
            phase: RenderPhase::FrontPass,
        }
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Hand the surface back, typically to save it.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render every page of `plan`: all fronts, then all mirrored backs.
    ///
    /// Exactly one page break follows each front page and each back page, even when
    /// the last front page is full, so back page k always prints behind front page k.
    /// The first drawing error aborts the run and is returned unchanged.
    pub fn render(&mut self, plan: &LayoutPlan<'_>, lesson_label: &str) -> Result<()> {
        if self.phase != RenderPhase::FrontPass {
            return Err(FlashcardError::Render(format!(
                "renderer already used (phase {:?})",
                self.phase
            )));
        }

        let caption = format!("{lesson_label}-kanji");
        for (index, page) in plan.pages.iter().enumerate() {
            for card in &page.positions {
                self.draw_front(plan, card, &caption)?;
            }
            self.surface.show_page()?;
            debug!("Front page {} done ({} cards)", index + 1, page.len());
        }
        self.phase = RenderPhase::BackPass;

        for (index, page) in plan.pages.iter().enumerate() {
            for card in &page.positions {
                self.draw_back(plan, card)?;
            }
            self.surface.show_page()?;
            debug!("Back page {} done ({} cards)", index + 1, page.len());
        }
        self.phase = RenderPhase::Done;

        Ok(())
    }

    fn draw_front(&mut self, plan: &LayoutPlan<'_>, card: &CardPosition<'_>, caption: &str) -> Result<()> {
        let (w, h) = (plan.cell_width, plan.cell_height);
        let center_x = card.x + w / 2.0;

        self.surface
            .stroke_rect(card.x, card.y, w, h, self.style.border_color)?;
        self.surface
            .draw_centred_text(center_x, card.y + h / 1.15, caption, &self.style.caption)?;
        self.surface
            .draw_centred_text(center_x, card.y + h / 2.5, &card.entry.front, &self.style.word)?;
        Ok(())
    }

    fn draw_back(&mut self, plan: &LayoutPlan<'_>, card: &CardPosition<'_>) -> Result<()> {
        let (w, h) = (plan.cell_width, plan.cell_height);
        let x = plan.mirrored_x(card.x);
        let center_x = x + w / 2.0;

        if self.style.draw_back_border {
            self.surface
                .stroke_rect(x, card.y, w, h, self.style.border_color)?;
        }
        self.surface
            .draw_centred_text(center_x, card.y + h / 1.8, &card.entry.reading, &self.style.reading)?;

        let translation = self.style.translation;
        let surface = &self.surface;
        let lines = wrap_text(
            &card.entry.translation,
            w - self.style.translation_inset,
            |line| surface.text_width(line, translation.font_size),
        );

        let mut line_y = card.y + h - self.style.translation_top_offset;
        for line in &lines {
            self.surface
                .draw_centred_text(center_x, line_y, line, &translation)?;
            line_y -= self.style.translation_line_height;
        }
        Ok(())
    }
}

/// Inputs for one flashcard PDF.
#[derive(Debug, Clone)]
pub struct FlashcardJob {
    pub font_path: PathBuf,
    pub vocabulary_path: PathBuf,
    /// Explicit output file; when `None` the file goes to
    /// `<output_dir>/<lesson label>-dars.pdf`.
    pub output_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub grid: GridSpec,
    pub style: CardStyle,
}

impl FlashcardJob {
    pub fn new(font_path: impl Into<PathBuf>, vocabulary_path: impl Into<PathBuf>) -> Self {
        Self {
            font_path: font_path.into(),
            vocabulary_path: vocabulary_path.into(),
            output_path: None,
            output_dir: PathBuf::from("output"),
            grid: GridSpec::default(),
            style: CardStyle::default(),
        }
    }

    fn resolve_output_path(&self, lesson_label: &str) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => self
                .output_dir
                .join(format!("{}-dars.pdf", sanitize_file_stem(lesson_label))),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardSummary {
    pub output_path: PathBuf,
    pub lesson_label: String,
    pub word_count: usize,
    pub page_count: usize,
}

/// Load the font and vocabulary, lay out the cards and write the PDF.
///
/// The font is loaded first so that a bad font path fails before anything else
/// is read or written.
pub fn create_flashcards_pdf(job: &FlashcardJob) -> Result<FlashcardSummary> {
    let font_context = FontContext::load(&job.font_path, &job.style.font_name)?;
    let lesson = load_lesson(&job.vocabulary_path)?;
    info!(
        "Lesson {}: {} words from {}",
        lesson.label,
        lesson.entries.len(),
        job.vocabulary_path.display()
    );

    let plan = plan_pages(&lesson.entries, &job.grid)?;

    let mut surface = PdfSurface::new(font_context, &job.grid);
    surface.set_title(format!("{}-dars", lesson.label));
    let mut renderer = FlashcardRenderer::new(surface, job.style.clone());
    renderer.render(&plan, &lesson.label)?;
    let surface = renderer.into_surface();
    let page_count = surface.page_count();

    let output_path = job.resolve_output_path(&lesson.label);
    ensure_parent_dir(&output_path)?;
    surface.save(&output_path)?;

    Ok(FlashcardSummary {
        output_path,
        lesson_label: lesson.label,
        word_count: lesson.entries.len(),
        page_count,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Make a lesson label safe to use as part of a file name.
fn sanitize_file_stem(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "lesson".to_string()
    } else {
        stem
    }
}
