use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::StartupError;
use crate::state::CellPosition;

/// Screen rectangle in logical pixels.
///
/// Containment is left/top inclusive and right/bottom exclusive, so a point on
/// an edge shared by two neighbouring cells belongs to exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink on every side, never below zero size.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            w: (self.w - 2.0 * amount).max(0.0),
            h: (self.h - 2.0 * amount).max(0.0),
        }
    }
}

/// Fixed window and cell dimensions the grid is laid out from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub window_width: u32,
    pub window_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub label_margin_x: u32,
    pub label_margin_y: u32,
}

impl Geometry {
    pub fn new(
        window_width: u32,
        window_height: u32,
        cell_width: u32,
        cell_height: u32,
        label_margin_x: u32,
        label_margin_y: u32,
    ) -> Result<Self, StartupError> {
        if cell_width == 0 || cell_height == 0 {
            return Err(StartupError::InvalidGeometry(format!(
                "cell size {cell_width}x{cell_height} must be non-zero"
            )));
        }
        if label_margin_x >= window_width || label_margin_y >= window_height {
            return Err(StartupError::InvalidGeometry(format!(
                "label margins {label_margin_x}x{label_margin_y} leave no room in a \
                 {window_width}x{window_height} window"
            )));
        }
        if window_width < cell_width || window_height < cell_height {
            return Err(StartupError::InvalidGeometry(format!(
                "window {window_width}x{window_height} is smaller than one \
                 {cell_width}x{cell_height} cell"
            )));
        }
        Ok(Self {
            window_width,
            window_height,
            cell_width,
            cell_height,
            label_margin_x,
            label_margin_y,
        })
    }

    pub fn rows(&self) -> usize {
        (self.window_height / self.cell_height) as usize
    }

    pub fn cols(&self) -> usize {
        (self.window_width / self.cell_width) as usize
    }

    /// Rows whose top edge is inside the window. Trailing rows pushed past the
    /// bottom by the label margin exist in the model but are never on screen.
    pub fn visible_rows(&self) -> usize {
        (0..self.rows())
            .take_while(|&row| self.row_top(row) < self.window_height as f32)
            .count()
    }

    pub fn visible_cols(&self) -> usize {
        (0..self.cols())
            .take_while(|&col| self.col_left(col) < self.window_width as f32)
            .count()
    }

    pub fn col_left(&self, col: usize) -> f32 {
        (col as u32 * self.cell_width + self.label_margin_x) as f32
    }

    pub fn row_top(&self, row: usize) -> f32 {
        (row as u32 * self.cell_height + self.label_margin_y) as f32
    }

    pub fn cell_rect(&self, pos: CellPosition) -> Rect {
        Rect::new(
            self.col_left(pos.col),
            self.row_top(pos.row),
            self.cell_width as f32,
            self.cell_height as f32,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub content: String,
    pub bounds: Rect,
}

impl Cell {
    fn empty(bounds: Rect) -> Self {
        Self {
            content: String::new(),
            bounds,
        }
    }

    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Replace a byte range of the content. The range is clamped to the
    /// content and widened outward to the nearest char boundaries.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let mut start = range.start.min(self.content.len());
        while !self.content.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = range.end.clamp(start, self.content.len());
        while !self.content.is_char_boundary(end) {
            end += 1;
        }
        self.content.replace_range(start..end, text);
    }

    /// Remove the last user-perceived character. Returns false when empty.
    pub fn delete_last_grapheme(&mut self) -> bool {
        match self.content.grapheme_indices(true).next_back() {
            Some((idx, _)) => {
                self.content.truncate(idx);
                true
            }
            None => false,
        }
    }
}

/// The fixed grid of cells, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    geometry: Geometry,
    cells: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(geometry: Geometry) -> Self {
        let cells = (0..geometry.rows())
            .map(|row| {
                (0..geometry.cols())
                    .map(|col| Cell::empty(geometry.cell_rect(CellPosition::new(row, col))))
                    .collect()
            })
            .collect();

        Self { geometry, cells }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, pos: CellPosition) -> Option<&Cell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub fn cell_mut(&mut self, pos: CellPosition) -> Option<&mut Cell> {
        self.cells.get_mut(pos.row).and_then(|row| row.get_mut(pos.col))
    }

    pub fn content(&self, pos: CellPosition) -> &str {
        self.cell(pos).map_or("", |cell| cell.content.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellPosition::new(row, col), cell))
        })
    }

    /// First cell in row-major order whose bounds contain the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<CellPosition> {
        self.iter()
            .find(|(_, cell)| cell.bounds.contains(x, y))
            .map(|(pos, _)| pos)
    }
}
