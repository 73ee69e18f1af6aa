//! Pigeonhole principle: `pigeons` pigeons in `holes` holes, no hole shared.
//!
//! The CNF is solved by conjoining clauses one at a time and existentially quantifying
//! each variable right after the last clause that mentions it. The formula is
//! satisfiable iff the accumulated diagram never becomes `false`.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::manager::DiagramManager;
use crate::stats::{Stats, Step};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Literal {
    pub var: usize,
    pub positive: bool,
}

impl Literal {
    pub fn pos(var: usize) -> Self {
        Self { var, positive: true }
    }

    pub fn neg(var: usize) -> Self {
        Self { var, positive: false }
    }
}

/// Disjunction of literals over distinct variables.
pub type Clause = Vec<Literal>;

/// Variable of "pigeon `i` sits in hole `j`".
pub fn label_of_pij(holes: usize, i: usize, j: usize) -> usize {
    i * holes + j
}

pub fn construct_php_cnf(pigeons: usize, holes: usize) -> Vec<Clause> {
    let mut cnf = Vec::new();

    // Every pigeon sits in some hole.
    for i in 0..pigeons {
        cnf.push((0..holes).map(|j| Literal::pos(label_of_pij(holes, i, j))).collect());
    }

    // No two pigeons share a hole.
    for j in 0..holes {
        for i in 0..pigeons {
            for k in i + 1..pigeons {
                cnf.push(vec![
                    Literal::neg(label_of_pij(holes, i, j)),
                    Literal::neg(label_of_pij(holes, k, j)),
                ]);
            }
        }
    }

    cnf
}

/// Diagram of a single clause, built bottom-up.
pub fn construct_clause<M: DiagramManager>(mgr: &mut M, clause: &[Literal]) -> Result<M::Dd> {
    let mut literals = clause.to_vec();
    literals.sort_by_key(|l| std::cmp::Reverse(l.var));

    // The empty clause is false, so `false` is built first.
    let mut b = mgr.builder();
    let mut root = b.leaf(false);
    let t = b.leaf(true);

    for lit in literals {
        root = if lit.positive {
            b.node(lit.var, root, t)?
        } else {
            b.node(lit.var, t, root)?
        };
    }

    b.build()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PigeonholeOutcome {
    pub satisfiable: bool,
    pub variables: usize,
    pub clauses: usize,
    pub largest: u64,
    pub final_nodes: u64,
}

/// Result of [`solve_cnf`].
#[derive(Debug, Copy, Clone)]
pub struct CnfSolution<D> {
    /// `top` or `bot`, since every variable gets quantified.
    pub result: D,
    /// Largest accumulated diagram.
    pub largest: u64,
}

/// Decide satisfiability of `cnf` over the manager's variables.
pub fn solve_cnf<M: DiagramManager>(mgr: &mut M, cnf: &[Clause], stats: &mut Stats) -> Result<CnfSolution<M::Dd>> {
    let varcount = mgr.varcount();

    // Clauses touching only large variables come first, so that those get closed early.
    let mut order: Vec<&Clause> = cnf.iter().collect();
    order.sort_by_key(|c| std::cmp::Reverse(c.iter().map(|l| l.var).min()));

    let mut last_use = vec![None; varcount];
    for (i, clause) in order.iter().enumerate() {
        for lit in clause.iter() {
            if lit.var >= varcount {
                return Err(Error::VariableOutOfRange { var: lit.var, varcount });
            }
            last_use[lit.var] = Some(i);
        }
    }

    let mut acc = mgr.top();
    let mut largest = 1;
    for (i, clause) in order.iter().enumerate() {
        let c = construct_clause(mgr, clause)?;
        let m: &M = mgr;
        acc = stats.time_apply(|| m.apply_and(acc, c));
        largest = largest.max(m.nodecount(acc));

        let closed: Vec<usize> = (0..varcount).filter(|&v| last_use[v] == Some(i)).collect();
        if !closed.is_empty() {
            debug!("Quantifying {:?}", closed);
            acc = stats.time_exists(|| m.exists_all(acc, closed));
        }
        stats.checkpoint(Step::Iteration(i), || m.nodecount(acc));

        if acc == m.bot() {
            debug!("Unsatisfiable after {} clauses", i + 1);
            break;
        }
    }

    // Variables never mentioned by any clause.
    let unused = (0..varcount).filter(|&v| last_use[v].is_none());
    Ok(CnfSolution {
        result: mgr.exists_all(acc, unused),
        largest,
    })
}

pub fn pigeonhole<M: DiagramManager>(pigeons: usize, holes: usize, stats: &mut Stats) -> Result<PigeonholeOutcome> {
    let variables = pigeons * holes;
    let cnf = construct_php_cnf(pigeons, holes);

    let mut mgr = M::new(variables);
    let solution = solve_cnf(&mut mgr, &cnf, stats)?;

    let satisfiable = solution.result != mgr.bot();
    info!(
        "Pigeonhole principle for {} : {} ({}): {}, largest {} nodes",
        pigeons,
        holes,
        M::NAME,
        if satisfiable { "SATISFIABLE" } else { "UNSATISFIABLE" },
        solution.largest
    );

    Ok(PigeonholeOutcome {
        satisfiable,
        variables,
        clauses: cnf.len(),
        largest: solution.largest,
        final_nodes: mgr.nodecount(solution.result),
    })
}
