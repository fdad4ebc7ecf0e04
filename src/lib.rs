//! Polyomino Tiling Enumerator
//!
//! This library finds every tiling of a rectangular board by k-cell
//! polyominoes, by compiling the exact-cover problem to CNF and enumerating
//! the models of the formula with a SAT solver.

pub mod config;
pub mod error;
pub mod polyomino;
pub mod sat;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use error::{ErrorKind, TilingError};
pub use polyomino::{Piece, PieceGenerator};
pub use tiling::{EnumerationResult, Tiling, TilingProblem};

use anyhow::Result;

/// Main entry point for enumerating the tilings a configuration describes
pub fn enumerate_tilings(settings: Settings) -> Result<EnumerationResult> {
    let problem = TilingProblem::new(settings)?;
    problem.solve()
}
