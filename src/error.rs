//! Error types shared by the encoder, the node builder and the workloads.

use thiserror::Error;

use crate::life::{Cell, Prime};

/// Errors that abort the construction in progress.
///
/// Backend resource exhaustion is not represented here:
/// the bundled backend panics when its unique table is full.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid coordinate: ({row}, {col}) is outside the {prime} grid")]
    InvalidCoordinate { row: i8, col: i8, prime: Prime },

    #[error("unmapped cell: {0}")]
    UnmappedCell(Cell),

    #[error("unmapped variable: {0}")]
    UnmappedVariable(usize),

    #[error("variable map invariant violated: expected {expected} pre variables, found {actual}")]
    VarMapInvariant { expected: usize, actual: usize },

    #[error("variable {var} is out of range (varcount = {varcount})")]
    VariableOutOfRange { var: usize, varcount: usize },

    #[error("node at variable {var} built after variable {last}: nodes must be built bottom-up")]
    BuildOrder { var: usize, last: usize },

    #[error("node at variable {var} has a child at variable {child}: children must lie strictly below")]
    BuildChild { var: usize, child: usize },

    #[error("build finished without any node")]
    EmptyBuild,
}

pub type Result<T> = std::result::Result<T, Error>;
