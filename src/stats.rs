//! Caller-owned instrumentation for the workloads.
//!
//! Nothing recorded here influences a result.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Point in a workload where a diagram size was recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Step {
    /// Relation of one cell, before it is conjoined into its row.
    Cell { row: usize, col: usize },
    /// Relation of one whole row.
    Row(usize),
    /// Accumulated image after a row has been conjoined.
    Accumulated(usize),
    /// Accumulated image after pre-variables have been quantified.
    Quantified,
    /// Generic step of the other workloads.
    Iteration(usize),
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Cell { row, col } => write!(f, "cell ({}, {})", row, col),
            Step::Row(row) => write!(f, "row {}", row),
            Step::Accumulated(row) => write!(f, "accumulated up to row {}", row),
            Step::Quantified => write!(f, "quantified"),
            Step::Iteration(i) => write!(f, "iteration {}", i),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Checkpoint {
    pub step: Step,
    pub nodes: u64,
}

#[derive(Debug, Default, Clone)]
pub struct Stats {
    /// Time spent in the Boolean combinators.
    pub apply_time: Duration,
    /// Time spent in quantification.
    pub exists_time: Duration,
    /// Record a [`Checkpoint`] after every step (costs a node count each time).
    pub track_sizes: bool,
    pub checkpoints: Vec<Checkpoint>,
    /// Largest diagram seen at any checkpoint.
    pub largest: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracking_sizes() -> Self {
        Self {
            track_sizes: true,
            ..Self::default()
        }
    }

    /// Run `f` and add its duration to [`apply_time`][Self::apply_time].
    pub fn time_apply<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let (res, elapsed) = timed(f);
        self.apply_time += elapsed;
        res
    }

    /// Run `f` and add its duration to [`exists_time`][Self::exists_time].
    pub fn time_exists<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let (res, elapsed) = timed(f);
        self.exists_time += elapsed;
        res
    }

    /// Record the size produced by `size` if tracking is enabled.
    pub fn checkpoint(&mut self, step: Step, size: impl FnOnce() -> u64) {
        if !self.track_sizes {
            return;
        }
        let nodes = size();
        log::debug!("{}: {} nodes", step, nodes);
        self.largest = self.largest.max(nodes);
        self.checkpoints.push(Checkpoint { step, nodes });
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let res = f();
    (res, start.elapsed())
}
