//! Error types shared by the encoder, the solver boundary and the tiling model

use crate::sat::variables::PlacementLiteral;
use thiserror::Error;

/// Broad classification of a [`TilingError`]
///
/// None of these are retried: preconditions are rejected before encoding,
/// invariant violations indicate an encoding bug and external failures come
/// from a deterministic solver that would fail the same way again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the engine cannot encode
    Precondition,
    /// The encoder or decoder observed a state its constraints forbid
    Invariant,
    /// The SAT solver process failed or produced unusable output
    External,
}

#[derive(Debug, Error)]
pub enum TilingError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidBoard { width: usize, height: usize },

    #[error("piece size must be at least 1")]
    InvalidPieceSize,

    #[error("a piece needs at least one cell")]
    EmptyPiece,

    #[error("at least one piece is required")]
    NoPieces,

    #[error("piece {index} has {found} cells, expected {expected}")]
    MixedPieceSizes {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("board area {area} is not a multiple of piece size {size}")]
    AreaNotMultiple { area: usize, size: usize },

    #[error("invalid tiling text: {0}")]
    InvalidTiling(String),

    #[error("piece index {0} cannot be written in the single character tiling format")]
    UnprintablePieceIndex(usize),

    #[error("cell ({row}, {col}) is covered by more than one placement")]
    DoubleCover { row: usize, col: usize },

    #[error("cell ({row}, {col}) is not covered by any placement")]
    UncoveredCell { row: usize, col: usize },

    #[error("blocking clause has {found} literals, expected {expected}")]
    BlockingClauseSize { expected: usize, found: usize },

    #[error("an empty clause cannot be added to the formula")]
    EmptyClause,

    #[error("variable {0} is outside the variable space")]
    UnknownVariable(u32),

    #[error("placement {0:?} has no variable")]
    UnallocatedPlacement(PlacementLiteral),

    #[error("solver exited with {status}: {stderr}")]
    SolverFailure { status: String, stderr: String },

    #[error("malformed solver output: {0}")]
    MalformedOutput(String),

    #[error("failed to communicate with the solver process")]
    SolverIo(#[from] std::io::Error),
}

impl TilingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TilingError::InvalidBoard { .. }
            | TilingError::InvalidPieceSize
            | TilingError::EmptyPiece
            | TilingError::NoPieces
            | TilingError::MixedPieceSizes { .. }
            | TilingError::AreaNotMultiple { .. }
            | TilingError::InvalidTiling(_)
            | TilingError::UnprintablePieceIndex(_) => ErrorKind::Precondition,
            TilingError::DoubleCover { .. }
            | TilingError::UncoveredCell { .. }
            | TilingError::BlockingClauseSize { .. }
            | TilingError::EmptyClause
            | TilingError::UnknownVariable(_)
            | TilingError::UnallocatedPlacement(_) => ErrorKind::Invariant,
            TilingError::SolverFailure { .. }
            | TilingError::MalformedOutput(_)
            | TilingError::SolverIo(_) => ErrorKind::External,
        }
    }
}

pub type Result<T> = std::result::Result<T, TilingError>;
