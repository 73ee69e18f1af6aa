use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Error, Result};
use crate::life::cell::{Cell, Grid, Prime};

/// Restriction of the post states to those with some symmetry.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Symmetry {
    #[default]
    None,
    /// Left-right mirror: a cell and its horizontal mirror share one post variable.
    Mirror,
}

impl Display for Symmetry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symmetry::None => write!(f, "None"),
            Symmetry::Mirror => write!(f, "Mirror (Vertical)"),
        }
    }
}

/// Mapping between cells and diagram variables.
///
/// Pre and post variables are interleaved row by row, so that the variables a
/// cell's relation depends on stay close in the order. Pre variables are never
/// shared; under [`Symmetry::Mirror`] the post variable of a cell is shared with
/// its mirror, and the inverse mapping yields the left one.
#[derive(Debug, Clone)]
pub struct VarMap {
    grid: Grid,
    symmetry: Symmetry,
    vars: [HashMap<Cell, usize>; 2],
    inverse: Vec<Cell>,
    varcount: [usize; 2],
}

impl VarMap {
    pub fn new(grid: Grid, symmetry: Symmetry) -> Result<Self> {
        let mut vm = Self {
            grid,
            symmetry,
            vars: [HashMap::new(), HashMap::new()],
            inverse: Vec::new(),
            varcount: [0, 0],
        };

        match symmetry {
            Symmetry::None => {
                for pre in grid.cells(Prime::Pre) {
                    vm.add(pre);
                    if grid.contains(pre.row(), pre.col(), Prime::Post) {
                        vm.add(pre.with_prime(Prime::Post));
                    }
                }
            }
            Symmetry::Mirror => {
                let cols = grid.cols(Prime::Pre) as i8;
                let min_col = grid.min_col(Prime::Pre);
                let max_col = grid.max_col(Prime::Pre);
                let last_left = min_col + cols / 2 - (cols % 2 == 0) as i8;

                for row in grid.min_row(Prime::Pre)..=grid.max_row(Prime::Pre) {
                    for left_col in min_col..=last_left {
                        let right_col = max_col - left_col;
                        let add_mirror = last_left < right_col;

                        let pre_left = grid.cell(row, left_col, Prime::Pre)?;
                        vm.add(pre_left);
                        if add_mirror {
                            vm.add(grid.cell(row, right_col, Prime::Pre)?);
                        }

                        if grid.contains(row, left_col, Prime::Post) {
                            let x = vm.add(pre_left.with_prime(Prime::Post));
                            if add_mirror {
                                let post_right = grid.cell(row, right_col, Prime::Post)?;
                                vm.vars[Prime::Post.index()].insert(post_right, x);
                            }
                        }
                    }
                }
            }
        }

        // Pre variables must never be merged.
        let expected = grid.rows(Prime::Pre) * grid.cols(Prime::Pre);
        let actual = vm.varcount_of(Prime::Pre);
        if actual != expected {
            return Err(Error::VarMapInvariant { expected, actual });
        }

        debug!(
            "VarMap {}x{} ({}): {} pre + {} post variables",
            grid.rows(Prime::Post),
            grid.cols(Prime::Post),
            symmetry,
            vm.varcount[0],
            vm.varcount[1]
        );

        Ok(vm)
    }

    /// Assign the next free variable to `cell`.
    fn add(&mut self, cell: Cell) -> usize {
        let x = self.inverse.len();
        let p = cell.prime().index();
        self.vars[p].insert(cell, x);
        self.varcount[p] += 1;
        self.inverse.push(cell);
        x
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    pub fn var_from_cell(&self, cell: &Cell) -> Result<usize> {
        if !self.grid.contains(cell.row(), cell.col(), cell.prime()) {
            return Err(Error::InvalidCoordinate {
                row: cell.row(),
                col: cell.col(),
                prime: cell.prime(),
            });
        }
        self.vars[cell.prime().index()]
            .get(cell)
            .copied()
            .ok_or(Error::UnmappedCell(*cell))
    }

    /// Cell of the variable `x`. For a shared post variable this is the left cell.
    pub fn cell_from_var(&self, x: usize) -> Result<Cell> {
        self.inverse.get(x).copied().ok_or(Error::UnmappedVariable(x))
    }

    /// Cell of the variable `x`, preferring `candidate` if it maps to `x`.
    pub fn cell_from_var_near(&self, x: usize, candidate: &Cell) -> Result<Cell> {
        if self.var_from_cell(candidate)? == x {
            return Ok(*candidate);
        }
        self.cell_from_var(x)
    }

    /// Whether `x` is the pre variable of a cell in the given row.
    pub fn is_pre_in_row(&self, x: usize, row: i8) -> bool {
        self.inverse
            .get(x)
            .is_some_and(|c| c.prime() == Prime::Pre && c.row() == row)
    }

    pub fn is_pre(&self, x: usize) -> bool {
        self.inverse.get(x).is_some_and(|c| c.prime() == Prime::Pre)
    }

    /// Total number of variables.
    pub fn varcount(&self) -> usize {
        self.inverse.len()
    }

    pub fn varcount_of(&self, prime: Prime) -> usize {
        self.varcount[prime.index()]
    }

    /// Number of cells that have a variable (shared post variables count once per cell).
    pub fn len(&self) -> usize {
        self.vars[0].len() + self.vars[1].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for VarMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for pre in self.grid.cells(Prime::Pre) {
            if let Some(x) = self.vars[0].get(&pre) {
                writeln!(f, "{} -> {}", pre, x)?;
            }
            let post = pre.with_prime(Prime::Post);
            if let Some(x) = self.vars[1].get(&post) {
                writeln!(f, "{} -> {}", post, x)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn var(vm: &VarMap, row: i8, col: i8, prime: Prime) -> usize {
        let cell = vm.grid().cell(row, col, prime).unwrap();
        vm.var_from_cell(&cell).unwrap()
    }

    #[test]
    fn test_none_interleaves() {
        let vm = VarMap::new(Grid::new(1, 1).unwrap(), Symmetry::None).unwrap();

        assert_eq!(vm.varcount_of(Prime::Pre), 9);
        assert_eq!(vm.varcount_of(Prime::Post), 1);
        assert_eq!(vm.varcount(), 10);
        assert_eq!(vm.len(), 10);

        // Row 0 holds variables 0..3, then (1, 0), (1, 1), (1, 1)', (1, 2).
        assert_eq!(var(&vm, 0, 2, Prime::Pre), 2);
        assert_eq!(var(&vm, 1, 0, Prime::Pre), 3);
        assert_eq!(var(&vm, 1, 1, Prime::Pre), 4);
        assert_eq!(var(&vm, 1, 1, Prime::Post), 5);
        assert_eq!(var(&vm, 1, 2, Prime::Pre), 6);
        assert_eq!(var(&vm, 2, 2, Prime::Pre), 9);
    }

    #[test]
    fn test_bijective_on_pre_cells() {
        for symmetry in [Symmetry::None, Symmetry::Mirror] {
            for (rows, cols) in [(1, 1), (2, 3), (4, 4), (3, 5)] {
                let grid = Grid::new(rows, cols).unwrap();
                let vm = VarMap::new(grid, symmetry).unwrap();

                assert_eq!(vm.varcount_of(Prime::Pre), (rows + 2) * (cols + 2));
                for cell in grid.cells(Prime::Pre) {
                    let x = vm.var_from_cell(&cell).unwrap();
                    let back = vm.cell_from_var(x).unwrap();
                    assert_eq!(back, cell);
                    assert_eq!(back.prime(), Prime::Pre);
                }
                for cell in grid.cells(Prime::Post) {
                    let x = vm.var_from_cell(&cell).unwrap();
                    assert_eq!(vm.cell_from_var_near(x, &cell).unwrap(), cell);
                    assert!(x > vm.var_from_cell(&cell.with_prime(Prime::Pre)).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_mirror_shares_post() {
        // Pre grid is 4 x 5: columns 0..=4, axis at column 2.
        let grid = Grid::new(2, 3).unwrap();
        let vm = VarMap::new(grid, Symmetry::Mirror).unwrap();

        assert_eq!(vm.varcount_of(Prime::Post), 4);
        assert_eq!(var(&vm, 1, 1, Prime::Post), var(&vm, 1, 3, Prime::Post));
        assert_ne!(var(&vm, 1, 1, Prime::Post), var(&vm, 1, 2, Prime::Post));
        assert_ne!(var(&vm, 1, 1, Prime::Pre), var(&vm, 1, 3, Prime::Pre));

        let x = var(&vm, 2, 3, Prime::Post);
        let right = grid.cell(2, 3, Prime::Post).unwrap();
        assert_eq!(vm.cell_from_var(x).unwrap().col(), 1);
        assert_eq!(vm.cell_from_var_near(x, &right).unwrap().col(), 3);
    }

    #[test]
    fn test_mirror_even_columns() {
        // Pre grid is 3 x 4: no axis column, every post cell is shared.
        let grid = Grid::new(1, 2).unwrap();
        let vm = VarMap::new(grid, Symmetry::Mirror).unwrap();

        assert_eq!(vm.varcount_of(Prime::Pre), 12);
        assert_eq!(vm.varcount_of(Prime::Post), 1);
        assert_eq!(var(&vm, 1, 1, Prime::Post), var(&vm, 1, 2, Prime::Post));
        assert_eq!(vm.len(), 14);
    }

    #[test]
    fn test_lookup_errors() {
        let grid = Grid::new(2, 2).unwrap();
        let vm = VarMap::new(grid, Symmetry::None).unwrap();

        assert_eq!(vm.cell_from_var(100), Err(Error::UnmappedVariable(100)));

        let bigger = Grid::new(5, 5).unwrap();
        let outside = bigger.cell(5, 5, Prime::Post).unwrap();
        assert!(matches!(
            vm.var_from_cell(&outside),
            Err(Error::InvalidCoordinate { row: 5, col: 5, .. })
        ));
    }

    #[test]
    fn test_pre_rows() {
        let vm = VarMap::new(Grid::new(2, 2).unwrap(), Symmetry::None).unwrap();

        let row0: Vec<usize> = (0..vm.varcount()).filter(|&x| vm.is_pre_in_row(x, 0)).collect();
        assert_eq!(row0, vec![0, 1, 2, 3]);
        let pre = (0..vm.varcount()).filter(|&x| vm.is_pre(x)).count();
        assert_eq!(pre, 16);
        assert!(!vm.is_pre(vm.varcount()));
    }
}
