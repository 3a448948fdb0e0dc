//! Board representation for two armies of queens

use crate::error::{PeaceError, PeaceResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Army color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

/// Contents of a single square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Queen(Color),
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Queen(color) => color.symbol(),
        }
    }
}

/// An n×n board holding queens of both colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub size: usize,
    pub cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from rows of cells
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> PeaceResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(PeaceError::InvalidParameters("board cannot be empty".to_string()));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(PeaceError::InvalidParameters(format!(
                    "row {} has length {}, expected {} (boards are square)",
                    i,
                    row.len(),
                    size
                )));
            }
        }

        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Get cell contents; squares off the board read as empty
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if row < self.size && col < self.size {
            self.cells[self.index(row, col)]
        } else {
            Cell::Empty
        }
    }

    /// Set cell contents
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> PeaceResult<()> {
        if row >= self.size || col >= self.size {
            return Err(PeaceError::OutOfRange {
                row,
                column: col,
                n: self.size,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Coordinates of every queen of the given color, row-major
    pub fn positions(&self, color: Color) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.get(row, col) == Cell::Queen(color) {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    /// Number of queens of the given color
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Queen(color)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == Cell::Empty)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(row, col).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
