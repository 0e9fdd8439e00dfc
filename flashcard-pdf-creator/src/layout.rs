//! Grid layout for flashcard pages
//!
//! The plan is computed once from the word list and reused unchanged by the front
//! and back passes, so both sides of page k hold the same words in the same order.

use crate::config::GridSpec;
use crate::error::{FlashcardError, Result};
use crate::vocabulary::WordEntry;
use log::debug;

/// Bottom-left corner of a card cell in PDF user space, and the word it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPosition<'a> {
    pub x: f32,
    pub y: f32,
    pub entry: &'a WordEntry,
}

/// Cards placed on one sheet, in placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub positions: Vec<CardPosition<'a>>,
}

impl<'a> Page<'a> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Complete page partition and cell geometry for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan<'a> {
    pub pages: Vec<Page<'a>>,
    pub page_width: f32,
    pub page_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl<'a> LayoutPlan<'a> {
    /// X of the back-side cell lying behind a front cell at `x`.
    pub fn mirrored_x(&self, x: f32) -> f32 {
        mirror_x(self.page_width, x, self.cell_width)
    }

    pub fn card_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}

/// Reflect a cell of width `cell_width` at `x` across the page's vertical center.
pub fn mirror_x(page_width: f32, x: f32, cell_width: f32) -> f32 {
    page_width - x - cell_width
}

/// Place `entries` on pages of `grid.rows` x `grid.cols` cards.
///
/// Cards fill a row left to right, then move one row down; a page is closed once
/// every row is used. A trailing partial page is kept, and no entries means no pages.
pub fn plan_pages<'a>(entries: &'a [WordEntry], grid: &GridSpec) -> Result<LayoutPlan<'a>> {
    validate_grid(grid)?;

    let cell_width = grid.cell_width();
    let cell_height = grid.cell_height();
    let x_start = grid.margin;
    let y_start = grid.page_height - grid.margin;

    let mut pages = Vec::new();
    let mut current = Vec::with_capacity(grid.capacity());
    let (mut row, mut col) = (0usize, 0usize);

    for entry in entries {
        current.push(CardPosition {
            x: x_start + col as f32 * cell_width,
            y: y_start - (row + 1) as f32 * cell_height,
            entry,
        });

        col += 1;
        if col >= grid.cols {
            col = 0;
            row += 1;
        }
        if row >= grid.rows {
            pages.push(Page {
                positions: std::mem::take(&mut current),
            });
            row = 0;
            col = 0;
        }
    }

    if !current.is_empty() {
        pages.push(Page { positions: current });
    }

    debug!(
        "Planned {} cards on {} pages ({}x{} grid)",
        entries.len(),
        pages.len(),
        grid.cols,
        grid.rows
    );

    Ok(LayoutPlan {
        pages,
        page_width: grid.page_width,
        page_height: grid.page_height,
        cell_width,
        cell_height,
    })
}

fn validate_grid(grid: &GridSpec) -> Result<()> {
    if grid.rows == 0 || grid.cols == 0 {
        return Err(FlashcardError::InvalidLayout(format!(
            "grid must have at least one row and column, got {}x{}",
            grid.cols, grid.rows
        )));
    }
    // NaN fails these comparisons as well.
    if !(grid.cell_width() > 0.0 && grid.cell_height() > 0.0) {
        return Err(FlashcardError::InvalidLayout(format!(
            "margin {} leaves no room for cards on a {}x{} page",
            grid.margin, grid.page_width, grid.page_height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(n: usize) -> Vec<WordEntry> {
        (0..n)
            .map(|i| WordEntry::new(format!("w{i}"), format!("r{i}"), format!("t{i}")))
            .collect()
    }

    fn simple_grid(rows: usize, cols: usize) -> GridSpec {
        GridSpec {
            page_width: 440.0,
            page_height: 340.0,
            margin: 20.0,
            rows,
            cols,
        }
    }

    #[test]
    fn page_count_and_last_page_size() {
        let grid = GridSpec::default();
        for n in [1usize, 5, 15, 16, 17, 31, 32, 33, 100] {
            let entries = words(n);
            let plan = plan_pages(&entries, &grid).unwrap();
            assert_eq!(plan.pages.len(), n.div_ceil(16), "n = {n}");
            let expected_last = if n % 16 == 0 { 16 } else { n % 16 };
            assert_eq!(plan.pages.last().unwrap().len(), expected_last, "n = {n}");
            assert_eq!(plan.card_count(), n);
        }
    }

    #[test]
    fn no_entries_no_pages() {
        let plan = plan_pages(&[], &GridSpec::default()).unwrap();
        assert!(plan.pages.is_empty());
    }

    #[test]
    fn seventeen_entries_split_sixteen_and_one() {
        let entries = words(17);
        let plan = plan_pages(&entries, &GridSpec::default()).unwrap();
        let sizes: Vec<usize> = plan.pages.iter().map(Page::len).collect();
        assert_eq!(sizes, vec![16, 1]);
        assert_eq!(plan.pages[1].positions[0].entry.front, "w16");
    }

    #[test]
    fn positions_fill_rows_left_to_right_from_the_top() {
        let entries = words(5);
        let plan = plan_pages(&entries, &simple_grid(2, 2)).unwrap();
        // cell = 200 x 150
        let coords: Vec<(f32, f32)> = plan.pages[0].positions.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            coords,
            vec![(20.0, 170.0), (220.0, 170.0), (20.0, 20.0), (220.0, 20.0)]
        );
        assert_eq!((plan.pages[1].positions[0].x, plan.pages[1].positions[0].y), (20.0, 170.0));
    }

    #[test]
    fn entries_keep_input_order_across_pages() {
        let entries = words(40);
        let plan = plan_pages(&entries, &GridSpec::default()).unwrap();
        let fronts: Vec<&str> = plan
            .pages
            .iter()
            .flat_map(|p| p.positions.iter().map(|c| c.entry.front.as_str()))
            .collect();
        let expected: Vec<&str> = entries.iter().map(|e| e.front.as_str()).collect();
        assert_eq!(fronts, expected);
    }

    #[test]
    fn partitioning_is_deterministic() {
        let entries = words(37);
        let grid = GridSpec::default();
        let first = plan_pages(&entries, &grid).unwrap();
        let second = plan_pages(&entries, &grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mirroring_swaps_columns_and_is_an_involution() {
        let entries = words(4);
        let plan = plan_pages(&entries, &simple_grid(1, 4)).unwrap();
        // cell width 100, columns at 20, 120, 220, 320
        let mirrored: Vec<f32> = plan.pages[0]
            .positions
            .iter()
            .map(|p| plan.mirrored_x(p.x))
            .collect();
        assert_eq!(mirrored, vec![320.0, 220.0, 120.0, 20.0]);

        for pos in &plan.pages[0].positions {
            assert_eq!(plan.mirrored_x(plan.mirrored_x(pos.x)), pos.x);
        }
    }

    #[test]
    fn rejects_empty_grid() {
        let err = plan_pages(&words(1), &simple_grid(0, 4)).unwrap_err();
        assert!(matches!(err, FlashcardError::InvalidLayout(_)));
    }

    #[test]
    fn rejects_margin_that_eats_the_page() {
        let grid = GridSpec {
            margin: 300.0,
            ..GridSpec::default()
        };
        assert!(matches!(
            plan_pages(&words(1), &grid).unwrap_err(),
            FlashcardError::InvalidLayout(_)
        ));
    }
}
