//! Breadth-first enumeration of polyominoes

use super::Piece;
use crate::error::{Result, TilingError};
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Enumerates every polyomino of a given size
pub struct PieceGenerator;

impl PieceGenerator {
    /// All polyominoes with `size` cells, one per translation class, in
    /// canonical order
    ///
    /// Rotations and reflections are kept as distinct shapes, so this yields
    /// 1, 2, 6, 19, 63, ... pieces for sizes 1, 2, 3, 4, 5, ...
    pub fn generate(size: usize) -> Result<Vec<Piece>> {
        if size == 0 {
            return Err(TilingError::InvalidPieceSize);
        }

        let mut pieces = BTreeSet::from([Piece::monomino()]);
        for current in 1..size {
            // The ordered set collapses translated duplicates
            pieces = pieces
                .par_iter()
                .flat_map_iter(|piece| piece.extensions())
                .collect();
            debug!("{} pieces of size {}", pieces.len(), current + 1);
        }

        Ok(pieces.into_iter().collect())
    }

    /// One representative per rotation/reflection class, in canonical order
    ///
    /// Yields 1, 1, 2, 5, 12, ... representatives for sizes 1, 2, 3, 4, 5, ...
    pub fn free_classes(size: usize) -> Result<Vec<Piece>> {
        let classes: BTreeSet<Piece> = Self::generate(size)?
            .par_iter()
            .map(Piece::free_canonical)
            .collect();
        Ok(classes.into_iter().collect())
    }
}
