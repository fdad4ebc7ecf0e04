//! Independent check that a tiling is an exact cover by the given pieces

use super::Tiling;
use crate::polyomino::Piece;

/// Validates tilings against a piece set
pub struct TilingValidator {
    pieces: Vec<Piece>,
    unique: bool,
}

/// One piece instance recovered from a tiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceInstance {
    pub piece: usize,
    /// Board cell of the piece's (0, 0) offset; may be off the board for
    /// pieces whose first row does not start in column 0
    pub anchor: (i64, i64),
}

/// A cell where the tiling could not be explained by a placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub cell: (usize, usize),
    pub description: String,
}

/// Result of tiling validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub instances: Vec<PieceInstance>,
    pub violations: Vec<Violation>,
}

impl TilingValidator {
    /// `pieces` must be in canonical order, as piece indices refer to it
    pub fn new(pieces: Vec<Piece>, unique: bool) -> Self {
        Self { pieces, unique }
    }

    /// Decompose the tiling into piece instances
    ///
    /// The first unclaimed cell in row-major order is always the first cell
    /// of its instance, so the decomposition is greedy and unique: the cell's
    /// piece index fixes the shape and therefore every other cell.
    pub fn validate(&self, tiling: &Tiling) -> ValidationResult {
        let (width, height) = (tiling.width(), tiling.height());
        let mut claimed = vec![false; width * height];
        let mut instances = Vec::new();
        let mut violations = Vec::new();

        for row in 0..height {
            for col in 0..width {
                if claimed[row * width + col] {
                    continue;
                }
                let Some(piece) = tiling.get(row, col) else {
                    continue;
                };

                match self.place(tiling, &claimed, piece, row, col) {
                    Ok((anchor, footprint)) => {
                        for (r, c) in footprint {
                            claimed[r * width + c] = true;
                        }
                        instances.push(PieceInstance { piece, anchor });
                    }
                    Err(description) => {
                        claimed[row * width + col] = true;
                        violations.push(Violation {
                            cell: (row, col),
                            description,
                        });
                    }
                }
            }
        }

        if self.unique {
            let mut seen = vec![false; self.pieces.len()];
            for instance in &instances {
                if std::mem::replace(&mut seen[instance.piece], true) {
                    let (r, c) = instance.anchor;
                    violations.push(Violation {
                        cell: first_cell(&self.pieces[instance.piece], r, c),
                        description: format!("piece {} is used more than once", instance.piece),
                    });
                }
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            instances,
            violations,
        }
    }

    /// Footprint of `piece` whose first cell is (row, col), if it fits
    fn place(
        &self,
        tiling: &Tiling,
        claimed: &[bool],
        piece: usize,
        row: usize,
        col: usize,
    ) -> Result<((i64, i64), Vec<(usize, usize)>), String> {
        let shape = self
            .pieces
            .get(piece)
            .ok_or_else(|| format!("piece index {} is out of range", piece))?;
        let (first_row, first_col) = shape.cells()[0];
        let anchor = (row as i64 - first_row as i64, col as i64 - first_col as i64);

        shape
            .cells()
            .iter()
            .map(|&(dr, dc)| {
                let (r, c) = (anchor.0 + dr as i64, anchor.1 + dc as i64);
                let inside = r >= 0 && c >= 0 && (r as usize) < tiling.height() && (c as usize) < tiling.width();
                if !inside {
                    return Err(format!("piece {} at ({}, {}) leaves the board", piece, row, col));
                }
                let (r, c) = (r as usize, c as usize);
                if claimed[r * tiling.width() + c] || tiling.get(r, c) != Some(piece) {
                    return Err(format!(
                        "piece {} at ({}, {}) does not match cell ({}, {})",
                        piece, row, col, r, c
                    ));
                }
                Ok((r, c))
            })
            .collect::<Result<Vec<_>, String>>()
            .map(|footprint| (anchor, footprint))
    }
}

fn first_cell(piece: &Piece, row: i64, col: i64) -> (usize, usize) {
    let (dr, dc) = piece.cells()[0];
    ((row + dr as i64) as usize, (col + dc as i64) as usize)
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;
        writeln!(f, "Piece instances: {}", self.instances.len())?;
        writeln!(f, "Violations: {}", self.violations.len())?;
        for violation in self.violations.iter().take(3) {
            writeln!(
                f,
                "  ({}, {}): {}",
                violation.cell.0, violation.cell.1, violation.description
            )?;
        }
        if self.violations.len() > 3 {
            writeln!(f, "  ... and {} more", self.violations.len() - 3)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyomino::PieceGenerator;

    fn validator(size: usize, unique: bool) -> TilingValidator {
        TilingValidator::new(PieceGenerator::generate(size).unwrap(), unique)
    }

    #[test]
    fn test_domino_tiling_is_valid() {
        // 0 is the horizontal domino, 1 the vertical one
        let tiling = Tiling::parse("1001\n1001").unwrap();
        let result = validator(2, false).validate(&tiling);
        assert!(result.is_valid, "{}", result);
        assert_eq!(result.instances.len(), 4);
        assert_eq!(result.instances[0], PieceInstance { piece: 1, anchor: (0, 0) });
    }

    #[test]
    fn test_adjacent_copies_are_split() {
        let result = validator(2, false).validate(&Tiling::parse("0000\n0000").unwrap());
        assert!(result.is_valid);
        assert_eq!(result.instances.len(), 4);
    }

    #[test]
    fn test_wrong_shape_is_reported() {
        // A lone vertical-domino cell with nothing below it
        let result = validator(2, false).validate(&Tiling::parse("1000\n0001").unwrap());
        assert!(!result.is_valid);
        assert_eq!(result.violations[0].cell, (0, 0));
    }

    #[test]
    fn test_unknown_piece_index() {
        let result = validator(2, false).validate(&Tiling::parse("22").unwrap());
        assert!(!result.is_valid);
        assert!(result.violations[0].description.contains("out of range"));
    }

    #[test]
    fn test_anchor_left_of_first_cell() {
        let pieces = PieceGenerator::generate(3).unwrap();
        let find = |cells: [(i32, i32); 3]| pieces.iter().position(|p| p.cells() == cells).unwrap();
        let corner = find([(0, 1), (1, 0), (1, 1)]);
        let ell = find([(0, 0), (0, 1), (1, 0)]);

        let tiling = Tiling::from_rows(vec![vec![ell, ell, corner], vec![ell, corner, corner]]).unwrap();
        let result = TilingValidator::new(pieces.clone(), false).validate(&tiling);
        assert!(result.is_valid, "{}", result);
        assert!(result
            .instances
            .contains(&PieceInstance { piece: corner, anchor: (0, 1) }));
    }

    #[test]
    fn test_uniqueness_mode() {
        let tiling = Tiling::parse("00\n11\n11").unwrap();
        assert!(validator(2, false).validate(&tiling).is_valid);
        let result = validator(2, true).validate(&tiling);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].cell, (1, 1));

        let repeated = Tiling::parse("0000").unwrap();
        assert!(validator(2, false).validate(&repeated).is_valid);
        let result = validator(2, true).validate(&repeated);
        assert!(!result.is_valid);
        assert_eq!(result.violations[0].cell, (0, 2));
    }
}
