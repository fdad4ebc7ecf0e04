//! Configuration management for the tiling enumerator

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, EncodingConfig, OutputConfig, OutputFormat, PieceConfig,
    Settings, SolverBackend, SolverConfig,
};
