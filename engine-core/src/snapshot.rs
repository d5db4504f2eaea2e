//! Read-only board snapshots handed to the presentation layer
//!
//! A snapshot is a plain value: the renderer gets its own copy of the board and
//! never has a path back into engine state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::{GameStatus, Player};

/// Render-level contents of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Numbered tile (merge puzzle)
    Tile(u32),
    /// Snake head
    Head,
    /// Snake body segment
    Body,
    Food,
    /// Settled or falling block tagged by piece kind letter
    Block(char),
    Mark(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn glyph(&self) -> String {
        match self {
            Cell::Empty => ".".to_string(),
            Cell::Tile(value) => value.to_string(),
            Cell::Head => "@".to_string(),
            Cell::Body => "o".to_string(),
            Cell::Food => "*".to_string(),
            Cell::Block(kind) => kind.to_string(),
            Cell::Mark(player) => player.symbol().to_string(),
        }
    }
}

/// Observation of a game at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells, `rows * cols` long
    pub cells: Vec<Cell>,
    pub score: u32,
    pub status: GameStatus,
    /// Cells the renderer should emphasise, as `(row, col)` (winning line)
    pub highlight: Vec<(usize, usize)>,
    /// Queued piece preview for games that have one
    pub next: Option<char>,
}

impl Snapshot {
    /// Empty snapshot of the given shape
    pub fn blank(rows: usize, cols: usize, score: u32, status: GameStatus) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            score,
            status,
            highlight: Vec::new(),
            next: None,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Overwrite a cell; coordinates outside the board are ignored
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = cell;
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyphs: Vec<String> = self.cells.iter().map(Cell::glyph).collect();
        let width = glyphs.iter().map(String::len).max().unwrap_or(1);

        for row in 0..self.rows {
            let line: Vec<String> = glyphs[row * self.cols..(row + 1) * self.cols]
                .iter()
                .map(|glyph| format!("{:>width$}", glyph, width = width))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "score: {} status: {:?}", self.score, self.status)?;
        if let Some(next) = self.next {
            write!(f, " next: {}", next)?;
        }
        Ok(())
    }
}
