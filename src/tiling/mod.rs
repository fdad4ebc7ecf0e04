//! Tilings: the solution model, its validation, persistence and enumeration

pub mod enumeration;
pub mod io;
pub mod problem;
pub mod tiling;
pub mod validator;

pub use enumeration::{DriverState, EnumerationDriver, EnumerationResult, StepOutcome};
pub use io::{load_tiling, load_tiling_from_file, save_dimacs, save_tiling_to_file, save_tilings, EnumerationSummary};
pub use problem::TilingProblem;
pub use tiling::Tiling;
pub use validator::{PieceInstance, TilingValidator, ValidationResult, Violation};
