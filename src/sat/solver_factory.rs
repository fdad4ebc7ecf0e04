//! Factory for creating SAT solver instances based on configuration

use super::constraints::Clause;
use super::solver::{CadicalSolver, ExternalSolver, SatSolver, SolverOutcome};
use crate::config::{SolverBackend, SolverConfig};
use crate::error::Result as TilingResult;
use anyhow::{Context, Result};

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(CadicalSolver),
    External(ExternalSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance for the configured backend
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        match config.backend {
            SolverBackend::Cadical => Ok(UnifiedSatSolver::Cadical(CadicalSolver::new())),
            SolverBackend::External => {
                let command = config
                    .command
                    .as_ref()
                    .context("External solver backend needs a command")?;
                Ok(UnifiedSatSolver::External(
                    ExternalSolver::new(command).with_args(config.args.iter().cloned()),
                ))
            }
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::External(_) => SolverBackend::External,
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(CadicalSolver::new())
    }
}

impl SatSolver for UnifiedSatSolver {
    fn solve(&mut self, num_variables: usize, clauses: &[Clause]) -> TilingResult<SolverOutcome> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(num_variables, clauses),
            UnifiedSatSolver::External(solver) => solver.solve(num_variables, clauses),
        }
    }

    fn name(&self) -> &str {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.name(),
            UnifiedSatSolver::External(solver) => solver.name(),
        }
    }
}
