//! Grid module - the 10x20 cell matrix of one board
//!
//! Flat row-major storage, `(column, row)` coordinates with row 0 at the top.
//! Cells hold 0 (empty), 1-7 (piece colors) or 8 (garbage) and nothing else.

use arrayvec::ArrayVec;

use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the grid
pub const GRID_SIZE: usize = WIDTH * HEIGHT;

/// One full grid row
pub type Row = [Cell; WIDTH];

/// Fixed-size cell matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_CELL; GRID_SIZE],
        }
    }

    #[inline(always)]
    fn index(column: i8, row: i8) -> Option<usize> {
        if column < 0 || column >= BOARD_WIDTH as i8 || row < 0 || row >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some(row as usize * WIDTH + column as usize)
    }

    /// Cell at `(column, row)`, `None` when out of bounds
    pub fn get(&self, column: i8, row: i8) -> Option<Cell> {
        Self::index(column, row).map(|idx| self.cells[idx])
    }

    /// Write a cell; returns false when out of bounds
    pub fn set(&mut self, column: i8, row: i8, cell: Cell) -> bool {
        match Self::index(column, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and non-empty
    pub fn is_filled(&self, column: i8, row: i8) -> bool {
        matches!(self.get(column, row), Some(c) if c != EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        row < HEIGHT && self.row(row).iter().all(|&c| c != EMPTY_CELL)
    }

    pub fn is_row_empty(&self, row: usize) -> bool {
        row >= HEIGHT || self.row(row).iter().all(|&c| c == EMPTY_CELL)
    }

    /// Remove every full row, compacting the rest downward
    ///
    /// Returns the cleared row indices (bottom to top). The same number of empty rows
    /// appears at the top, so the height never changes.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, HEIGHT> {
        let mut cleared = ArrayVec::new();
        let mut write = HEIGHT;

        for read in (0..HEIGHT).rev() {
            if self.is_row_full(read) {
                cleared.push(read);
            } else {
                write -= 1;
                if write != read {
                    self.cells
                        .copy_within(read * WIDTH..(read + 1) * WIDTH, write * WIDTH);
                }
            }
        }

        self.cells[..write * WIDTH].fill(EMPTY_CELL);
        cleared
    }

    /// Push `rows` in from the bottom, discarding the same number of rows at the top
    ///
    /// Returns true if any discarded row held a filled cell (the stack overflowed).
    pub fn push_rows_from_bottom(&mut self, rows: &[Row]) -> bool {
        let amount = rows.len().min(HEIGHT);
        if amount == 0 {
            return false;
        }

        let overflow = (0..amount).any(|r| !self.is_row_empty(r));

        self.cells.copy_within(amount * WIDTH.., 0);
        let base = (HEIGHT - amount) * WIDTH;
        for (i, row) in rows[rows.len() - amount..].iter().enumerate() {
            let start = base + i * WIDTH;
            self.cells[start..start + WIDTH].copy_from_slice(row);
        }

        overflow
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    /// Copy out as nested rows (snapshot form)
    pub fn to_rows(&self) -> [Row; HEIGHT] {
        let mut out = [[EMPTY_CELL; WIDTH]; HEIGHT];
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
        out
    }

    /// Build from ASCII art, bottom-aligned: `.` is empty, a digit is that cell value,
    /// any other character is garbage
    pub fn from_ascii(lines: &[&str]) -> Self {
        let mut grid = Self::new();
        let offset = HEIGHT.saturating_sub(lines.len());
        for (i, line) in lines.iter().take(HEIGHT).enumerate() {
            for (col, ch) in line.chars().take(WIDTH).enumerate() {
                let cell = match ch {
                    '.' => EMPTY_CELL,
                    d @ '0'..='8' => d as u8 - b'0',
                    _ => crate::types::GARBAGE_CELL,
                };
                grid.set(col as i8, (offset + i) as i8, cell);
            }
        }
        grid
    }
}
