use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Whether a cell is observed before or after the transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Prime {
    Pre,
    Post,
}

impl Prime {
    pub fn index(self) -> usize {
        match self {
            Prime::Pre => 0,
            Prime::Post => 1,
        }
    }
}

impl Display for Prime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Prime::Pre => write!(f, "pre"),
            Prime::Post => write!(f, "post"),
        }
    }
}

/// Dimensions of the post grid.
///
/// The pre grid has one extra cell on every border: post cells occupy rows `1..=rows`
/// and columns `1..=cols`, pre cells occupy rows `0..=rows + 1` and columns `0..=cols + 1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Largest supported side, so that pre coordinates fit an `i8`.
    pub const MAX_SIDE: usize = 125;

    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows > Self::MAX_SIDE || cols > Self::MAX_SIDE {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self, prime: Prime) -> usize {
        match prime {
            Prime::Pre => self.rows + 2,
            Prime::Post => self.rows,
        }
    }

    pub fn cols(&self, prime: Prime) -> usize {
        match prime {
            Prime::Pre => self.cols + 2,
            Prime::Post => self.cols,
        }
    }

    pub fn min_row(&self, prime: Prime) -> i8 {
        prime.index() as i8
    }

    pub fn max_row(&self, prime: Prime) -> i8 {
        (self.rows(prime) - 1 + prime.index()) as i8
    }

    pub fn min_col(&self, prime: Prime) -> i8 {
        prime.index() as i8
    }

    pub fn max_col(&self, prime: Prime) -> i8 {
        (self.cols(prime) - 1 + prime.index()) as i8
    }

    pub fn contains(&self, row: i8, col: i8, prime: Prime) -> bool {
        (self.min_row(prime)..=self.max_row(prime)).contains(&row)
            && (self.min_col(prime)..=self.max_col(prime)).contains(&col)
    }

    /// Cell at the given coordinate, if it lies on the grid of the given primality.
    pub fn cell(&self, row: i8, col: i8, prime: Prime) -> Result<Cell> {
        if !self.contains(row, col, prime) {
            return Err(Error::InvalidCoordinate { row, col, prime });
        }
        Ok(Cell { row, col, prime })
    }

    /// All cells of the given primality, in row-major order.
    pub fn cells(&self, prime: Prime) -> impl Iterator<Item = Cell> + '_ {
        (self.min_row(prime)..=self.max_row(prime))
            .flat_map(move |row| (self.min_col(prime)..=self.max_col(prime)).map(move |col| Cell { row, col, prime }))
    }
}

/// Grid position before or after one transition.
///
/// Equality and hashing only look at the coordinate.
#[derive(Debug, Copy, Clone)]
pub struct Cell {
    row: i8,
    col: i8,
    prime: Prime,
}

impl Cell {
    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn col(&self) -> i8 {
        self.col
    }

    pub fn prime(&self) -> Prime {
        self.prime
    }

    /// The same coordinate with another primality. Range is not checked.
    pub fn with_prime(&self, prime: Prime) -> Cell {
        Cell { prime, ..*self }
    }

    /// Whether `other` lies in the 3x3 block centered on this cell.
    pub fn in_neighbourhood(&self, other: &Cell) -> bool {
        (self.row - other.row).abs() <= 1 && (self.col - other.col).abs() <= 1
    }

    /// The nine pre cells of the 3x3 block centered on this cell, in row-major order.
    pub fn neighbourhood(&self, grid: &Grid) -> Result<Vec<Cell>> {
        let mut res = Vec::with_capacity(9);
        for dr in -1..=1 {
            for dc in -1..=1 {
                res.push(grid.cell(self.row + dr, self.col + dc, Prime::Pre)?);
            }
        }
        Ok(res)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.col.hash(state);
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)?;
        if self.prime == Prime::Post {
            write!(f, "'")?;
        }
        Ok(())
    }
}
