//! Game of Life "Garden of Eden" workload.
//!
//! Counts the states of an `rows x cols` grid that have no predecessor under Conway's
//! rule. The predecessor ranges over a grid with one extra cell on every border, whose
//! outer cells are unconstrained.
//!
//! ```
//! use bdd_benchmark::bdd::Bdd;
//! use bdd_benchmark::life::{garden_of_eden, LifeConfig};
//! use bdd_benchmark::stats::Stats;
//!
//! let config = LifeConfig::default().with_rows(2).with_cols(2);
//! let outcome = garden_of_eden::<Bdd>(&config, &mut Stats::new()).unwrap();
//! assert_eq!(outcome.unreachable, 0u32.into());
//! ```

mod cell;
mod predicate;
mod relation;
mod solver;
mod var_map;

use log::{info, warn};
use num_bigint::BigUint;

pub use self::cell::{Cell, Grid, Prime};
pub use self::predicate::{construct_count, construct_eq, construct_var_eq};
pub use self::relation::{construct_rel, row_relation};
pub use self::solver::{Phase, QuantifySchedule, Solver};
pub use self::var_map::{Symmetry, VarMap};

use crate::error::Result;
use crate::manager::DiagramManager;
use crate::stats::Stats;

#[derive(Debug, Clone)]
pub struct LifeConfig {
    /// Rows of the post grid.
    pub rows: usize,
    /// Columns of the post grid.
    pub cols: usize,
    pub symmetry: Symmetry,
    pub schedule: QuantifySchedule,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            symmetry: Symmetry::None,
            schedule: QuantifySchedule::Eager,
        }
    }
}

impl LifeConfig {
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = cols;
        self
    }

    pub fn with_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.symmetry = symmetry;
        self
    }

    pub fn with_schedule(mut self, schedule: QuantifySchedule) -> Self {
        self.schedule = schedule;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Number of post states without a predecessor.
    pub unreachable: BigUint,
    pub variables: usize,
    pub pre_variables: usize,
    pub post_variables: usize,
    /// Size of the image diagram.
    pub image_nodes: u64,
}

/// Count the Garden of Eden states for the configured grid on a fresh `M` manager.
pub fn garden_of_eden<M: DiagramManager>(config: &LifeConfig, stats: &mut Stats) -> Result<Outcome> {
    let grid = Grid::new(config.rows, config.cols)?;
    if config.rows < config.cols {
        warn!("The variable ordering is designed for cols <= rows, consider flipping the dimensions");
    }

    let vm = VarMap::new(grid, config.symmetry)?;
    info!(
        "Game of Life [{} x {}] ({}), symmetry: {}, variables: {} ({} pre, {} post)",
        config.rows,
        config.cols,
        M::NAME,
        config.symmetry,
        vm.varcount(),
        vm.varcount_of(Prime::Pre),
        vm.varcount_of(Prime::Post)
    );

    let mut mgr = M::new(vm.varcount());
    let image = Solver::new(&mut mgr, &vm, config.schedule, stats).image()?;

    let unreachable = mgr.satcount_over(mgr.apply_not(image), vm.varcount_of(Prime::Post));
    info!("Unreachable states: {}", unreachable);

    Ok(Outcome {
        unreachable,
        variables: vm.varcount(),
        pre_variables: vm.varcount_of(Prime::Pre),
        post_variables: vm.varcount_of(Prime::Post),
        image_nodes: mgr.nodecount(image),
    })
}
