//! N-Queens: count the placements of `n` non-attacking queens on an `n x n` board.
//!
//! Square `(row, col)` is variable `row * n + col`. The board is the conjunction over rows
//! of "some queen in this row attacks no other queen", and the per-square constraint is
//! built bottom-up in a single pass over the variables.

use log::info;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::manager::DiagramManager;
use crate::stats::{Stats, Step};

fn label(n: usize, row: usize, col: usize) -> usize {
    row * n + col
}

/// Queen at `(row, col)` and no queen on any square it attacks.
pub fn queens_square<M: DiagramManager>(mgr: &mut M, n: usize, row: usize, col: usize) -> Result<M::Dd> {
    let mut b = mgr.builder();
    let f = b.leaf(false);
    let mut root = b.leaf(true);

    for x in (0..n * n).rev() {
        let (i, j) = (x / n, x % n);
        root = if (i, j) == (row, col) {
            b.node(x, f, root)?
        } else if i == row || j == col || i.abs_diff(row) == j.abs_diff(col) {
            b.node(x, root, f)?
        } else {
            b.dont_care(x, root)?
        };
    }

    b.build()
}

/// Some square of `row` holds a queen that attacks no other queen.
pub fn queens_row<M: DiagramManager>(mgr: &mut M, n: usize, row: usize) -> Result<M::Dd> {
    let mut res = mgr.bot();
    for col in 0..n {
        let square = queens_square(mgr, n, row, col)?;
        res = mgr.apply_or(res, square);
    }
    Ok(res)
}

/// All valid placements, as a diagram over a manager with `n * n` variables.
pub fn queens_board<M: DiagramManager>(mgr: &mut M, n: usize, stats: &mut Stats) -> Result<M::Dd> {
    let mut res = mgr.top();
    for row in 0..n {
        let row_dd = queens_row(mgr, n, row)?;
        let m: &M = mgr;
        res = stats.time_apply(|| m.apply_and(res, row_dd));
        stats.checkpoint(Step::Iteration(row), || m.nodecount(res));
    }
    Ok(res)
}

/// Number of solutions of the `n`-Queens problem.
pub fn queens<M: DiagramManager>(n: usize, stats: &mut Stats) -> Result<BigUint> {
    if n == 0 {
        return Err(Error::InvalidDimensions { rows: n, cols: n });
    }

    let mut mgr = M::new(label(n, n - 1, n - 1) + 1);
    let board = queens_board(&mut mgr, n, stats)?;
    let solutions = mgr.satcount(board);
    info!(
        "{}-Queens ({}): {} solutions, {} nodes",
        n,
        M::NAME,
        solutions,
        mgr.nodecount(board)
    );
    Ok(solutions)
}
