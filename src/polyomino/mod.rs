//! Polyomino shapes and their enumeration

pub mod piece;
pub mod generator;

pub use piece::{Cell, Piece};
pub use generator::PieceGenerator;
