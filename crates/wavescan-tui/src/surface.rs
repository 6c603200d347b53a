//! Cell buffer the render pipeline paints into, shown as a ratatui widget.
//!
//! The buffer covers the whole scan window including its border. Writes are
//! clipped to the interior so the block border drawn on top stays intact.

use ratatui::text::{Line, Span};

use wavescan_core::{Attr, FIRST_LINE, ListLayout, Surface, WAITING_MESSAGE};

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    attr: Attr,
}

const BLANK: Cell = Cell {
    ch: ' ',
    attr: Attr::PLAIN,
};

#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    rows: Vec<Vec<Cell>>,
    frames: u64,
}

impl ScreenBuffer {
    /// Blank window showing the waiting message on the first entry row.
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            rows: vec![vec![BLANK; usize::from(width)]; usize::from(height)],
            frames: 0,
        };
        buffer.write(FIRST_LINE, 1, WAITING_MESSAGE, Attr::PLAIN);
        buffer
    }

    /// Start over at a new size. The next render tick repaints everything.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn layout(&self) -> ListLayout {
        ListLayout::for_window(self.height, self.width)
    }

    /// Completed frames, counted on every flush.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of one row without trailing blanks.
    pub fn row_text(&self, row: u16) -> String {
        self.rows
            .get(usize::from(row))
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_owned()
    }

    /// Styled lines, one per row, with adjacent cells of equal attribute
    /// merged into a single span.
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .map(|cells| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut run_attr = Attr::PLAIN;
                for cell in cells {
                    if cell.attr != run_attr && !run.is_empty() {
                        let text = std::mem::take(&mut run);
                        spans.push(Span::styled(text, theme::attr_style(run_attr)));
                    }
                    run_attr = cell.attr;
                    run.push(cell.ch);
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, theme::attr_style(run_attr)));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn interior_cols(&self) -> std::ops::Range<u16> {
        1..self.width.saturating_sub(1)
    }

    fn is_interior_row(&self, row: u16) -> bool {
        row >= 1 && row < self.height.saturating_sub(1)
    }
}

impl Surface for ScreenBuffer {
    fn clear_rows(&mut self, from: u16, to: u16) {
        let cols = self.interior_cols();
        for row in from..=to {
            if !self.is_interior_row(row) {
                continue;
            }
            if let Some(cells) = self.rows.get_mut(usize::from(row)) {
                for col in cols.clone() {
                    if let Some(cell) = cells.get_mut(usize::from(col)) {
                        *cell = BLANK;
                    }
                }
            }
        }
    }

    fn write(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
        if !self.is_interior_row(row) {
            return;
        }
        let cols = self.interior_cols();
        let Some(cells) = self.rows.get_mut(usize::from(row)) else {
            return;
        };
        let mut at = col;
        for ch in text.chars() {
            if at >= cols.end {
                break;
            }
            if cols.contains(&at) {
                if let Some(cell) = cells.get_mut(usize::from(at)) {
                    *cell = Cell { ch, attr };
                }
            }
            at = at.saturating_add(1);
        }
    }

    fn flush(&mut self) {
        self.frames += 1;
    }
}
