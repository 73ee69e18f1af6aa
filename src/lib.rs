//! # bdd-benchmark: decision diagram workloads in Rust
//!
//! **`bdd-benchmark`** runs the same combinatorial encodings against any decision diagram
//! engine that implements the [`DiagramManager`][crate::manager::DiagramManager] contract.
//!
//! ## Workloads
//!
//! - **[`life`]**: Game of Life "Garden of Eden" states. The one-step image of every
//!   pre state is computed symbolically, conjoining row relations from both borders inward
//!   and quantifying pre rows as soon as no remaining row reads them. Per-cell predicates
//!   are built bottom-up through a [`NodeBuilder`][crate::manager::NodeBuilder] session
//!   instead of generic Boolean combination.
//! - **[`queens`]**: number of solutions of the N-Queens problem.
//! - **[`tic_tac_toe`]**: 4x4x4 boards with a given number of crosses and no winner.
//! - **[`pigeonhole`]**: unsatisfiability of the pigeonhole principle via conjoin-and-quantify.
//!
//! ## Backend
//!
//! The crate ships a reduced ordered BDD with complement edges in [`bdd`]. It is a plain
//! reference engine: the unique table grows on demand, and there is no garbage collection
//! and no variable reordering.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bdd_benchmark::bdd::Bdd;
//! use bdd_benchmark::life::{garden_of_eden, LifeConfig, Symmetry};
//! use bdd_benchmark::stats::Stats;
//!
//! let config = LifeConfig::default()
//!     .with_rows(3)
//!     .with_cols(3)
//!     .with_symmetry(Symmetry::Mirror);
//!
//! let mut stats = Stats::new();
//! let outcome = garden_of_eden::<Bdd>(&config, &mut stats).unwrap();
//!
//! // Every state of a grid this small has a predecessor.
//! assert_eq!(outcome.unreachable, 0u32.into());
//! ```
//!
//! Nothing here installs a logger; progress is reported through the [`log`] facade.

pub mod backend;
pub mod bdd;
pub mod cache;
pub mod error;
pub mod life;
pub mod manager;
pub mod node;
pub mod pigeonhole;
pub mod queens;
pub mod reference;
pub mod sat;
pub mod stats;
pub mod table;
pub mod tic_tac_toe;
pub mod utils;

pub use error::{Error, Result};
