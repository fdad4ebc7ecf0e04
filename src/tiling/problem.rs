//! A configured tiling problem: pieces, encoding and solver

use super::{EnumerationDriver, EnumerationResult};
use crate::config::Settings;
use crate::polyomino::{Piece, PieceGenerator};
use crate::sat::encoder::{Board, CnfEncoder, EncodingStatistics};
use crate::sat::solver::SatSolver;
use crate::sat::solver_factory::UnifiedSatSolver;
use anyhow::{Context, Result};
use log::info;

/// Represents one board / piece size / uniqueness combination
pub struct TilingProblem {
    settings: Settings,
    encoder: CnfEncoder,
}

impl TilingProblem {
    /// Generate the pieces and encode the problem described by `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().context("Invalid problem settings")?;

        let pieces = PieceGenerator::generate(settings.pieces.size)
            .context("Failed to generate pieces")?;
        info!(
            "Generated {} pieces of size {}",
            pieces.len(),
            settings.pieces.size
        );

        let board = Board::new(settings.board.width, settings.board.height)?;
        let encoder = CnfEncoder::encode(board, pieces, settings.encoding.unique)
            .context("Failed to encode tiling problem")?;

        Ok(Self { settings, encoder })
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Pieces in piece-index order
    pub fn pieces(&self) -> &[Piece] {
        self.encoder.pieces()
    }

    pub fn encoder(&self) -> &CnfEncoder {
        &self.encoder
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder.statistics()
    }

    /// The initial formula as DIMACS text
    pub fn export_dimacs(&self) -> String {
        self.encoder.export_dimacs()
    }

    /// Enumerate every tiling with the configured solver backend
    pub fn solve(self) -> Result<EnumerationResult> {
        let solver = UnifiedSatSolver::from_config(&self.settings.solver)?;
        info!("Enumerating tilings with the {} backend", solver.name());

        let mut driver = EnumerationDriver::new(self.encoder, solver)
            .with_max_solutions(self.settings.solver.max_solutions);
        driver.run().context("Enumeration failed")
    }
}
