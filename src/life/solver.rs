//! One-step image of the full pre-state space.
//!
//! Row relations are conjoined from the top border down and from the bottom border up,
//! so that a pre row is no longer mentioned by any remaining row as early as possible.
//! Such a closed pre row can be quantified out of the half it belongs to right away.

use std::time::Instant;

use log::{debug, info};

use crate::error::Result;
use crate::life::cell::Prime;
use crate::life::relation::row_relation;
use crate::life::var_map::VarMap;
use crate::manager::DiagramManager;
use crate::stats::{Stats, Step};

/// Which closed pre rows are quantified before the final step.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum QuantifySchedule {
    /// Every pre row as soon as it is closed.
    #[default]
    Eager,
    /// Only the outermost pre row at the top and the two outermost at the bottom.
    Outermost,
    /// None; every pre variable is quantified at the end.
    Deferred,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    CollectTopHalf,
    CollectBottomHalf,
    CollectMiddleRow,
    QuantifyRemainingPre,
    Done,
}

impl Phase {
    /// The phase that follows, skipping the middle row when the row count is even.
    pub fn next(self, odd_rows: bool) -> Phase {
        match self {
            Phase::CollectTopHalf => Phase::CollectBottomHalf,
            Phase::CollectBottomHalf if odd_rows => Phase::CollectMiddleRow,
            Phase::CollectBottomHalf => Phase::QuantifyRemainingPre,
            Phase::CollectMiddleRow => Phase::QuantifyRemainingPre,
            Phase::QuantifyRemainingPre | Phase::Done => Phase::Done,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Half {
    Top,
    Bottom,
}

pub struct Solver<'a, M: DiagramManager> {
    mgr: &'a mut M,
    vm: &'a VarMap,
    schedule: QuantifySchedule,
    stats: &'a mut Stats,
    phase: Phase,
}

impl<'a, M: DiagramManager> Solver<'a, M> {
    pub fn new(mgr: &'a mut M, vm: &'a VarMap, schedule: QuantifySchedule, stats: &'a mut Stats) -> Self {
        Self {
            mgr,
            vm,
            schedule,
            stats,
            phase: Phase::CollectTopHalf,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Set of post states reachable in one step from any pre state.
    ///
    /// The result only depends on post variables.
    pub fn image(self) -> Result<M::Dd> {
        let top = self.mgr.top();
        self.image_of(top)
    }

    /// Set of post states reachable in one step from the pre states in `from`.
    ///
    /// `from` must only depend on pre variables.
    pub fn image_of(mut self, from: M::Dd) -> Result<M::Dd> {
        let post_rows = self.vm.grid().rows(Prime::Post);
        let odd_rows = post_rows % 2 == 1;

        let mut res = from;

        loop {
            debug!("Phase: {:?}", self.phase);
            match self.phase {
                Phase::CollectTopHalf => {
                    let top = self.collect_half(Half::Top)?;
                    res = self.conjoin(res, top);
                }
                Phase::CollectBottomHalf => {
                    let bottom = self.collect_half(Half::Bottom)?;
                    res = self.conjoin(res, bottom);
                }
                Phase::CollectMiddleRow => {
                    let row = (post_rows / 2 + 1) as i8;
                    let rel = self.row(row)?;
                    res = self.conjoin(res, rel);
                }
                Phase::QuantifyRemainingPre => {
                    let Self { mgr, vm, stats, .. } = &mut self;
                    let mgr: &M = mgr;
                    res = stats.time_exists(|| mgr.exists_by(res, |x| vm.is_pre(x)));
                    stats.checkpoint(Step::Quantified, || mgr.nodecount(res));
                    info!("Image computed: {} nodes", mgr.nodecount(res));
                }
                Phase::Done => return Ok(res),
            }
            self.phase = self.phase.next(odd_rows);
        }
    }

    fn conjoin(&mut self, f: M::Dd, g: M::Dd) -> M::Dd {
        let mgr: &M = self.mgr;
        self.stats.time_apply(|| mgr.apply_and(f, g))
    }

    fn row(&mut self, row: i8) -> Result<M::Dd> {
        let start = Instant::now();
        let res = row_relation(self.mgr, self.vm, row, self.stats);
        self.stats.apply_time += start.elapsed();
        let res = res?;
        self.stats.checkpoint(Step::Row(row as usize), || self.mgr.nodecount(res));
        Ok(res)
    }

    fn collect_half(&mut self, half: Half) -> Result<M::Dd> {
        let grid = *self.vm.grid();
        let half_rows = grid.rows(Prime::Post) as i8 / 2;
        let (begin, end, step) = match half {
            Half::Top => {
                let begin = grid.min_row(Prime::Post);
                (begin, begin + half_rows - 1, 1)
            }
            Half::Bottom => {
                let begin = grid.max_row(Prime::Post);
                (begin, begin - half_rows + 1, -1)
            }
        };

        let mut res = self.mgr.top();
        if half_rows == 0 {
            return Ok(res);
        }

        let mut row = begin;
        loop {
            let rel = self.row(row)?;
            res = self.conjoin(res, rel);
            self.stats.checkpoint(Step::Accumulated(row as usize), || self.mgr.nodecount(res));

            // The outward pre row is only read by post rows already conjoined.
            let closed = row - step;
            if self.should_quantify(half, begin, closed) {
                let Self { mgr, vm, stats, .. } = self;
                let mgr: &M = mgr;
                debug!("Quantifying pre row {}", closed);
                res = stats.time_exists(|| mgr.exists_by(res, |x| vm.is_pre_in_row(x, closed)));
                stats.checkpoint(Step::Quantified, || mgr.nodecount(res));
            }

            if row == end {
                break;
            }
            row += step;
        }

        Ok(res)
    }

    fn should_quantify(&self, half: Half, begin: i8, closed: i8) -> bool {
        match self.schedule {
            QuantifySchedule::Eager => true,
            QuantifySchedule::Outermost => match half {
                Half::Top => closed < begin,
                Half::Bottom => begin <= closed,
            },
            QuantifySchedule::Deferred => false,
        }
    }
}
