//! 3D Tic-Tac-Toe: count the 4x4x4 boards with exactly `crosses` crosses (the rest are
//! noughts) where no line of four is held by a single player.

use log::info;
use num_bigint::BigUint;

use crate::error::Result;
use crate::manager::DiagramManager;
use crate::stats::{Stats, Step};

pub const CELLS: usize = 64;

fn label(i: usize, j: usize, k: usize) -> usize {
    16 * i + 4 * j + k
}

/// The 76 winning lines of the 4x4x4 cube.
///
/// Lines are listed roughly by increasing distance between their first and last variable.
pub fn lines() -> Vec<[usize; 4]> {
    let mut res = Vec::with_capacity(76);

    // Rows within each plane
    for i in 0..4 {
        for j in 0..4 {
            res.push([label(i, j, 0), label(i, j, 1), label(i, j, 2), label(i, j, 3)]);
        }
    }
    // Anti-diagonal within each plane
    for i in 0..4 {
        res.push([label(i, 0, 3), label(i, 1, 2), label(i, 2, 1), label(i, 3, 0)]);
    }
    // Columns within each plane
    for i in 0..4 {
        for k in 0..4 {
            res.push([label(i, 0, k), label(i, 1, k), label(i, 2, k), label(i, 3, k)]);
        }
    }
    // Diagonal within each plane
    for i in 0..4 {
        res.push([label(i, 0, 0), label(i, 1, 1), label(i, 2, 2), label(i, 3, 3)]);
    }

    // Two space diagonals
    res.push([label(0, 3, 3), label(1, 2, 2), label(2, 1, 1), label(3, 0, 0)]);
    res.push([label(0, 3, 0), label(1, 2, 1), label(2, 1, 2), label(3, 0, 3)]);

    // Anti-diagonals in the vertical planes of fixed j
    for j in 0..4 {
        res.push([label(0, j, 3), label(1, j, 2), label(2, j, 1), label(3, j, 0)]);
    }
    // Vertical lines
    for j in 0..4 {
        for k in 0..4 {
            res.push([label(0, j, k), label(1, j, k), label(2, j, k), label(3, j, k)]);
        }
    }
    // Diagonals in the vertical planes of fixed j
    for j in 0..4 {
        res.push([label(0, j, 0), label(1, j, 1), label(2, j, 2), label(3, j, 3)]);
    }
    // Diagonals in the vertical planes of fixed k
    for k in 0..4 {
        res.push([label(0, 3, k), label(1, 2, k), label(2, 1, k), label(3, 0, k)]);
    }
    for k in 0..4 {
        res.push([label(0, 0, k), label(1, 1, k), label(2, 2, k), label(3, 3, k)]);
    }

    // Remaining two space diagonals
    res.push([label(0, 0, 3), label(1, 1, 2), label(2, 2, 1), label(3, 3, 0)]);
    res.push([label(0, 0, 0), label(1, 1, 1), label(2, 2, 2), label(3, 3, 3)]);

    res
}

/// Exactly `crosses` of the 64 cells hold a cross.
pub fn construct_init<M: DiagramManager>(mgr: &mut M, crosses: usize) -> Result<M::Dd> {
    if crosses > CELLS {
        return Ok(mgr.bot());
    }

    let mut b = mgr.builder();
    let f = b.leaf(false);
    let mut chain = vec![f; crosses + 2];
    chain[crosses] = b.leaf(true);

    for x in (0..CELLS).rev() {
        let seen = CELLS - x;
        let min = crosses.saturating_sub(seen);
        let max = crosses.min(x);
        for i in min..=max {
            chain[i] = b.node(x, chain[i], chain[i + 1])?;
        }
    }

    b.build()
}

/// The line holds at least one cross and at least one nought.
pub fn construct_is_not_winning<M: DiagramManager>(mgr: &M, line: &[usize; 4]) -> M::Dd {
    // After processing index `idx`: `some_x` ("some cross at idx..") and
    // `some_o` ("some nought at idx..").
    let mut some_x = mgr.bot();
    let mut some_o = mgr.bot();

    for (idx, &v) in line.iter().enumerate().rev() {
        let x = mgr.ithvar(v);
        if idx == 0 {
            return mgr.ite(x, some_o, some_x);
        }
        some_x = mgr.ite(x, mgr.top(), some_x);
        some_o = mgr.ite(x, some_o, mgr.top());
    }

    some_x
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeOutcome {
    pub solutions: BigUint,
    pub init_nodes: u64,
    pub largest: u64,
    pub final_nodes: u64,
}

pub fn tic_tac_toe<M: DiagramManager>(crosses: usize, stats: &mut Stats) -> Result<TicTacToeOutcome> {
    let mut mgr = M::new(CELLS);

    let mut res = construct_init(&mut mgr, crosses)?;
    let init_nodes = mgr.nodecount(res);
    let mut largest = init_nodes;

    for (i, line) in lines().iter().enumerate() {
        let constraint = construct_is_not_winning(&mgr, line);
        res = stats.time_apply(|| mgr.apply_and(res, constraint));
        let nodes = mgr.nodecount(res);
        largest = largest.max(nodes);
        stats.checkpoint(Step::Iteration(i), || nodes);
    }

    let solutions = mgr.satcount(res);
    let final_nodes = mgr.nodecount(res);
    info!(
        "Tic-Tac-Toe with {} crosses ({}): {} solutions, largest {} nodes",
        crosses,
        M::NAME,
        solutions,
        largest
    );

    Ok(TicTacToeOutcome {
        solutions,
        init_nodes,
        largest,
        final_nodes,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_log::test;

    use super::*;
    use crate::bdd::Bdd;

    fn binomial(n: u128, k: u128) -> u128 {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn test_lines() {
        let lines = lines();
        assert_eq!(lines.len(), 76);

        let distinct: HashSet<[usize; 4]> = lines
            .iter()
            .map(|l| {
                let mut l = *l;
                l.sort();
                l
            })
            .collect();
        assert_eq!(distinct.len(), 76);
        assert!(lines.iter().flatten().all(|&v| v < CELLS));

        // Every line walks straight through the cube with steps in {-1, 0, 1} per axis.
        // The cube has exactly 76 such lines, so none is missing.
        let coords = |v: usize| [(v / 16) as i32, (v / 4 % 4) as i32, (v % 4) as i32];
        for line in &lines {
            let start = coords(line[0]);
            let step: Vec<i32> = (0..3).map(|a| coords(line[1])[a] - start[a]).collect();
            assert!(step.iter().all(|d| d.abs() <= 1) && step.iter().any(|&d| d != 0));
            for (t, &v) in line.iter().enumerate() {
                let c = coords(v);
                for a in 0..3 {
                    assert_eq!(c[a], start[a] + t as i32 * step[a], "line {:?}", line);
                }
            }
        }
    }

    #[test]
    fn test_vertical_lines_only() {
        let mut mgr = <Bdd as DiagramManager>::new(CELLS);
        let vertical: Vec<[usize; 4]> = lines()
            .into_iter()
            .filter(|l| l.iter().all(|&v| v % 16 == l[0] % 16))
            .collect();
        assert_eq!(vertical.len(), 16);

        let constrain = |mgr: &Bdd, init| {
            vertical
                .iter()
                .fold(init, |acc, line| mgr.apply_and(acc, construct_is_not_winning(mgr, line)))
        };

        // 16 crosses: exactly one cross per vertical line.
        let init = construct_init(&mut mgr, 16).unwrap();
        let f = constrain(&mgr, init);
        assert_eq!(mgr.satcount(f), BigUint::from(4u32).pow(16));

        // 17 crosses: one line holds two of them.
        let init = construct_init(&mut mgr, 17).unwrap();
        let f = constrain(&mgr, init);
        assert_eq!(mgr.satcount(f), BigUint::from(16u32 * 6) * BigUint::from(4u32).pow(15));
    }

    #[test]
    fn test_init_counts() {
        let mut mgr = <Bdd as DiagramManager>::new(CELLS);
        for crosses in [0, 1, 5, 20, 63, 64] {
            let f = construct_init(&mut mgr, crosses).unwrap();
            assert_eq!(mgr.satcount(f), BigUint::from(binomial(64, crosses as u128)));
        }
        assert_eq!(construct_init(&mut mgr, 65).unwrap(), mgr.bot());
    }

    #[test]
    fn test_is_not_winning() {
        let mgr = <Bdd as DiagramManager>::new(4);
        let f = construct_is_not_winning(&mgr, &[0, 1, 2, 3]);

        for bits in 0..16u32 {
            let a: Vec<bool> = (0..4).map(|i| bits >> i & 1 == 1).collect();
            assert_eq!(mgr.evaluate(f, &a), bits != 0 && bits != 15);
        }
    }

    #[test]
    fn test_all_noughts() {
        let outcome = tic_tac_toe::<Bdd>(0, &mut Stats::new()).unwrap();
        assert_eq!(outcome.solutions, BigUint::ZERO);
        assert_eq!(outcome.final_nodes, 1);
    }
}
