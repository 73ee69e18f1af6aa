//! Per-cell predicates built bottom-up with the node builder.
//!
//! Both predicates are built in one descending pass over all variables, which is
//! linear in the number of variables instead of going through generic combinators.

use crate::error::{Error, Result};
use crate::life::cell::{Cell, Prime};
use crate::life::var_map::VarMap;
use crate::manager::DiagramManager;

/// Diagram that is `true` iff exactly `alive` of the nine pre cells around `cell`
/// (itself included) are alive.
///
/// `chain[i]` holds the function "exactly `alive - i` of the neighbours seen so far are
/// alive". Only indices that can still reach `alive` are kept up to date: the window
/// `alive_min..=alive_max` narrows as neighbours are consumed.
pub fn construct_count<M: DiagramManager>(mgr: &mut M, vm: &VarMap, cell: &Cell, alive: usize) -> Result<M::Dd> {
    let mut remaining = cell.neighbourhood(vm.grid())?.len();
    if alive > remaining {
        return Ok(mgr.bot());
    }

    let mut b = mgr.builder();

    let f = b.leaf(false);
    let mut chain = vec![f; alive + 2];
    chain[alive] = b.leaf(true);

    let mut alive_max = alive;
    let mut alive_min = alive;

    for x in (0..vm.varcount()).rev() {
        let curr = vm.cell_from_var(x)?;

        if curr.prime() == Prime::Pre && cell.in_neighbourhood(&curr) {
            remaining -= 1;
            alive_min = alive_min.saturating_sub(1);
            alive_max = alive_max.min(remaining);

            for i in alive_min..=alive_max {
                chain[i] = b.node(x, chain[i], chain[i + 1])?;
            }
        } else {
            for i in alive_min..=alive_max {
                chain[i] = b.dont_care(x, chain[i])?;
            }
        }
    }

    b.build()
}

/// Diagram that is `true` iff the pre and post variables of `cell` agree.
pub fn construct_eq<M: DiagramManager>(mgr: &mut M, vm: &VarMap, cell: &Cell) -> Result<M::Dd> {
    let x_pre = vm.var_from_cell(&cell.with_prime(Prime::Pre))?;
    let x_post = vm.var_from_cell(&cell.with_prime(Prime::Post))?;
    construct_var_eq(mgr, x_pre, x_post)
}

/// Diagram that is `true` iff the variables `x` and `y` agree, in either order.
///
/// Below the larger variable there is a single don't-care chain. At the larger variable
/// it splits into one chain expecting the smaller variable to be true and one expecting
/// false, and the two merge again at the smaller variable.
pub fn construct_var_eq<M: DiagramManager>(mgr: &mut M, x: usize, y: usize) -> Result<M::Dd> {
    let varcount = mgr.varcount();
    for var in [x, y] {
        if var >= varcount {
            return Err(Error::VariableOutOfRange { var, varcount });
        }
    }
    if x == y {
        return Ok(mgr.top());
    }
    let (upper, lower) = (x.min(y), x.max(y));

    let mut b = mgr.builder();

    let f = b.leaf(false);
    let mut root0 = b.leaf(true);

    for v in (lower + 1..varcount).rev() {
        root0 = b.dont_care(v, root0)?;
    }

    let mut root1 = b.node(lower, f, root0)?;
    root0 = b.node(lower, root0, f)?;

    for v in (upper + 1..lower).rev() {
        root1 = b.dont_care(v, root1)?;
        root0 = b.dont_care(v, root0)?;
    }

    root0 = b.node(upper, root0, root1)?;

    for v in (0..upper).rev() {
        root0 = b.dont_care(v, root0)?;
    }

    b.build()
}
