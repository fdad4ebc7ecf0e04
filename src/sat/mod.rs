//! SAT encoding of tilings and the solver boundary

pub mod constraints;
pub mod dimacs;
pub mod encoder;
pub mod solver;
pub mod solver_factory;
pub mod variables;

pub use constraints::{Clause, Lit, Var};
pub use encoder::{Board, CnfEncoder, EncodingStatistics};
pub use solver::{Assignment, CadicalSolver, ExternalSolver, SatSolver, SolverOutcome};
pub use solver_factory::UnifiedSatSolver;
pub use variables::{PlacementLiteral, Variable, VariableSpace};
