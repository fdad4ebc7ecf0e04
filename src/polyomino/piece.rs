//! Polyomino shape representation

use crate::error::{Result, TilingError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// A (row, col) offset of one unit square
pub type Cell = (i32, i32);

/// An immutable polyomino, stored as its sorted, normalized cell offsets
///
/// Normalization shifts the shape so that the smallest row and the smallest
/// column are both zero, which makes two translated copies of the same shape
/// compare equal. The position of a cell in [`Piece::cells`] is its part index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Piece {
    cells: Vec<Cell>,
}

impl Piece {
    /// Build a piece from arbitrary cells, normalizing and deduplicating them
    pub fn new<I: IntoIterator<Item = Cell>>(cells: I) -> Result<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        let min_row = cells.iter().map(|c| c.0).min().ok_or(TilingError::EmptyPiece)?;
        let min_col = cells.iter().map(|c| c.1).min().ok_or(TilingError::EmptyPiece)?;

        let mut cells: Vec<Cell> = cells
            .into_iter()
            .map(|(r, c)| (r - min_row, c - min_col))
            .collect();
        cells.sort_unstable();

        Ok(Self { cells })
    }

    /// The single-cell piece every generation starts from
    pub fn monomino() -> Self {
        Self { cells: vec![(0, 0)] }
    }

    /// Number of unit squares
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Offsets as unsigned (row, col) pairs, indexed by part
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(|&(r, c)| (r as usize, c as usize))
    }

    /// Number of rows spanned by the bounding box
    pub fn height(&self) -> usize {
        self.cells.iter().map(|c| c.0).max().unwrap_or(0) as usize + 1
    }

    /// Number of columns spanned by the bounding box
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.1).max().unwrap_or(0) as usize + 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// All 4-neighbours of occupied cells that are not occupied themselves
    pub fn border(&self) -> BTreeSet<Cell> {
        self.cells
            .iter()
            .flat_map(|&(r, c)| [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)])
            .filter(|&cell| !self.contains(cell))
            .collect()
    }

    /// Every piece obtained by adding one border cell to this one
    pub fn extensions(&self) -> Vec<Piece> {
        self.border()
            .into_iter()
            .map(|cell| {
                let mut cells = self.cells.clone();
                cells.push(cell);
                // Non-empty by construction
                Piece::normalized(cells)
            })
            .collect()
    }

    /// Whether every cell is reachable from every other through 4-neighbours
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.cells.first() else {
            return false;
        };

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((r, c)) = queue.pop_front() {
            for next in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                if self.contains(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen.len() == self.cells.len()
    }

    /// Quarter turn clockwise
    pub fn rotated(&self) -> Piece {
        Piece::normalized(self.cells.iter().map(|&(r, c)| (c, -r)).collect())
    }

    /// Mirror image across the vertical axis
    pub fn reflected(&self) -> Piece {
        Piece::normalized(self.cells.iter().map(|&(r, c)| (r, -c)).collect())
    }

    /// Smallest of the eight rotations and reflections of this shape
    ///
    /// Two pieces share a free canonical form iff one can be turned or
    /// flipped into the other.
    pub fn free_canonical(&self) -> Piece {
        let mut best = self.clone();
        let mut current = self.clone();
        for _ in 0..4 {
            let mirrored = current.reflected();
            if current < best {
                best = current.clone();
            }
            if mirrored < best {
                best = mirrored;
            }
            current = current.rotated();
        }
        best
    }

    /// Sum of `row * k + col` over all cells, the primary ordering key
    fn weight(&self) -> i64 {
        let k = self.cells.len() as i64;
        self.cells
            .iter()
            .map(|&(r, c)| r as i64 * k + c as i64)
            .sum()
    }

    fn normalized(cells: Vec<Cell>) -> Piece {
        let min_row = cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_col = cells.iter().map(|c| c.1).min().unwrap_or(0);
        let mut cells: Vec<Cell> = cells
            .into_iter()
            .map(|(r, c)| (r - min_row, c - min_col))
            .collect();
        cells.sort_unstable();
        cells.dedup();
        Piece { cells }
    }
}

impl Ord for Piece {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size()
            .cmp(&other.size())
            .then_with(|| self.weight().cmp(&other.weight()))
            .then_with(|| self.cells.cmp(&other.cells))
    }
}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<Vec<Cell>> for Piece {
    type Error = TilingError;

    fn try_from(cells: Vec<Cell>) -> Result<Self> {
        Piece::new(cells)
    }
}

impl From<Piece> for Vec<Cell> {
    fn from(piece: Piece) -> Self {
        piece.cells
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height() as i32 {
            for c in 0..self.width() as i32 {
                write!(f, "{}", if self.contains((r, c)) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let piece = Piece::new([(3, 5), (3, 6), (4, 5)]).unwrap();
        assert_eq!(piece.cells(), &[(0, 0), (0, 1), (1, 0)]);

        let shifted = Piece::new([(-1, -1), (-1, 0), (0, -1)]).unwrap();
        assert_eq!(piece, shifted);
    }

    #[test]
    fn test_empty_piece_rejected() {
        assert!(matches!(Piece::new([]), Err(TilingError::EmptyPiece)));
    }

    #[test]
    fn test_duplicate_cells_collapse() {
        let piece = Piece::new([(0, 0), (0, 0), (0, 1)]).unwrap();
        assert_eq!(piece.size(), 2);
    }

    #[test]
    fn test_border() {
        let border = Piece::monomino().border();
        assert_eq!(border.len(), 4);
        assert!(border.contains(&(-1, 0)));
        assert!(border.contains(&(0, 1)));

        let domino = Piece::new([(0, 0), (0, 1)]).unwrap();
        assert_eq!(domino.border().len(), 6);
    }

    #[test]
    fn test_extensions_are_one_bigger() {
        let domino = Piece::new([(0, 0), (1, 0)]).unwrap();
        for piece in domino.extensions() {
            assert_eq!(piece.size(), 3);
            assert!(piece.is_connected());
        }
    }

    #[test]
    fn test_dimensions() {
        let ell = Piece::new([(0, 0), (1, 0), (2, 0), (2, 1)]).unwrap();
        assert_eq!(ell.height(), 3);
        assert_eq!(ell.width(), 2);
    }

    #[test]
    fn test_connectivity() {
        assert!(Piece::new([(0, 0), (0, 1), (1, 1)]).unwrap().is_connected());
        assert!(!Piece::new([(0, 0), (1, 1)]).unwrap().is_connected());
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let horizontal = Piece::new([(0, 0), (0, 1)]).unwrap();
        let vertical = Piece::new([(0, 0), (1, 0)]).unwrap();
        assert!(horizontal < vertical);

        let mut pieces = vec![vertical.clone(), horizontal.clone()];
        pieces.sort();
        assert_eq!(pieces, vec![horizontal, vertical]);
    }

    #[test]
    fn test_free_canonical() {
        let horizontal = Piece::new([(0, 0), (0, 1), (0, 2)]).unwrap();
        let vertical = Piece::new([(0, 0), (1, 0), (2, 0)]).unwrap();
        assert_eq!(horizontal.free_canonical(), vertical.free_canonical());

        let ell = Piece::new([(0, 0), (1, 0), (1, 1)]).unwrap();
        assert_ne!(ell.free_canonical(), horizontal.free_canonical());
    }

    #[test]
    fn test_rotation_cycle() {
        let ell = Piece::new([(0, 0), (1, 0), (2, 0), (2, 1)]).unwrap();
        let back = ell.rotated().rotated().rotated().rotated();
        assert_eq!(ell, back);
        assert_ne!(ell, ell.rotated());
    }

    #[test]
    fn test_display() {
        let ell = Piece::new([(0, 0), (1, 0), (1, 1)]).unwrap();
        assert_eq!(ell.to_string(), "#.\n##\n");
    }

    #[test]
    fn test_json_round_trip_normalizes() {
        let piece: Piece = serde_json::from_str("[[5,5],[5,6]]").unwrap();
        assert_eq!(piece.cells(), &[(0, 0), (0, 1)]);
        assert!(serde_json::from_str::<Piece>("[]").is_err());
    }
}
