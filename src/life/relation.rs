//! Transition relation of Conway's rule.
//!
//! Summing over the full 3x3 block (the cell itself included) removes the case split on
//! the cell's own state: a sum of 3 means alive next, a sum of 4 means unchanged, and any
//! other sum means dead.

use crate::error::Result;
use crate::life::cell::{Cell, Prime};
use crate::life::predicate::{construct_count, construct_eq};
use crate::life::var_map::VarMap;
use crate::manager::DiagramManager;
use crate::stats::{Stats, Step};

/// Relation between the pre neighbourhood of the post `cell` and its post variable.
pub fn construct_rel<M: DiagramManager>(mgr: &mut M, vm: &VarMap, cell: &Cell) -> Result<M::Dd> {
    let alive_3 = construct_count(mgr, vm, cell, 3)?;
    let alive_4 = construct_count(mgr, vm, cell, 4)?;
    let eq = construct_eq(mgr, vm, cell)?;

    let x_post = vm.var_from_cell(&cell.with_prime(Prime::Post))?;

    let born = mgr.apply_imp(alive_3, mgr.ithvar(x_post));
    let kept = mgr.apply_imp(alive_4, eq);
    let other = mgr.apply_not(mgr.apply_or(alive_3, alive_4));
    let dies = mgr.apply_imp(other, mgr.nithvar(x_post));

    Ok(mgr.apply_and(mgr.apply_and(born, kept), dies))
}

/// Conjunction of the relations of every post cell in `row`, right to left.
pub fn row_relation<M: DiagramManager>(mgr: &mut M, vm: &VarMap, row: i8, stats: &mut Stats) -> Result<M::Dd> {
    let grid = *vm.grid();
    let mut res = mgr.top();

    for col in (grid.min_col(Prime::Post)..=grid.max_col(Prime::Post)).rev() {
        let cell = grid.cell(row, col, Prime::Post)?;
        let rel = construct_rel(mgr, vm, &cell)?;
        res = mgr.apply_and(res, rel);

        stats.checkpoint(
            Step::Cell {
                row: row as usize,
                col: col as usize,
            },
            || mgr.nodecount(res),
        );
    }

    Ok(res)
}
