//! The solution model: which piece occupies each board cell

use crate::error::{Result, TilingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Largest piece index the single-character text format can hold, exclusive
pub const TEXT_FORMAT_PIECES: usize = 36;

/// A complete tiling of a `width` x `height` board
///
/// `cells` holds one piece index per cell in row-major order. Equality and
/// hashing are over the whole cell map, so two tilings are equal exactly when
/// they serialize to the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTiling")]
pub struct Tiling {
    width: usize,
    height: usize,
    cells: Vec<usize>,
}

/// Unchecked shape of a tiling as it appears in JSON
#[derive(Deserialize)]
struct RawTiling {
    width: usize,
    height: usize,
    cells: Vec<usize>,
}

impl TryFrom<RawTiling> for Tiling {
    type Error = TilingError;

    fn try_from(raw: RawTiling) -> Result<Self> {
        Tiling::new(raw.width, raw.height, raw.cells)
    }
}

impl Tiling {
    /// Create a tiling from row-major piece indices
    pub fn new(width: usize, height: usize, cells: Vec<usize>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TilingError::InvalidBoard { width, height });
        }
        if cells.len() != width * height {
            return Err(TilingError::InvalidTiling(format!(
                "{} cells for a {}x{} board",
                cells.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a tiling from one vector per row
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(TilingError::InvalidTiling(format!(
                "row {} has length {}, expected {}",
                index,
                row.len(),
                width
            )));
        }

        Self::new(width, height, rows.into_iter().flatten().collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Piece index at (row, col), `None` off the board
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| self.cells[row * self.width + col])
    }

    /// Row-major piece indices
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Iterate over rows of piece indices
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.cells.chunks(self.width)
    }

    /// Distinct piece indices used, ascending
    pub fn piece_indices(&self) -> Vec<usize> {
        self.cell_counts().into_keys().collect()
    }

    /// Number of cells covered by each piece index
    pub fn cell_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for &piece in &self.cells {
            *counts.entry(piece).or_insert(0) += 1;
        }
        counts
    }

    /// Number of cells on which the two tilings disagree
    pub fn distance_to(&self, other: &Tiling) -> Result<usize> {
        if self.width != other.width || self.height != other.height {
            return Err(TilingError::InvalidTiling(format!(
                "cannot compare a {}x{} tiling with a {}x{} one",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(self
            .cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| a != b)
            .count())
    }

    /// Text form: one line per row, one character per cell, no trailing newline
    ///
    /// Indices 0-9 are written as digits and 10-35 as `a`-`z`.
    pub fn serialize(&self) -> Result<String> {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            for &piece in row {
                out.push(piece_char(piece)?);
            }
        }
        Ok(out)
    }

    /// Inverse of [`Tiling::serialize`]; blank lines are ignored
    pub fn parse(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, ch)| {
                        piece_index(ch).ok_or_else(|| {
                            TilingError::InvalidTiling(format!(
                                "invalid character '{}' at ({}, {})",
                                ch, row, col
                            ))
                        })
                    })
                    .collect::<Result<Vec<usize>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        if rows.is_empty() {
            return Err(TilingError::InvalidTiling("no rows".to_string()));
        }
        Self::from_rows(rows)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON string; the cell count is checked against the dimensions
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn piece_char(piece: usize) -> Result<char> {
    u32::try_from(piece)
        .ok()
        .and_then(|digit| char::from_digit(digit, TEXT_FORMAT_PIECES as u32))
        .ok_or(TilingError::UnprintablePieceIndex(piece))
}

fn piece_index(ch: char) -> Option<usize> {
    if ch.is_ascii_digit() || ch.is_ascii_lowercase() {
        ch.to_digit(TEXT_FORMAT_PIECES as u32).map(|d| d as usize)
    } else {
        None
    }
}

impl FromStr for Tiling {
    type Err = TilingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Tiling {
    /// Zero-padded piece indices separated by spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = (self.cells.len() - 1).to_string().len();
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|piece| format!("{:0pad$}", piece)).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let text = "0011\n2233";
        let tiling = Tiling::parse(text).unwrap();
        assert_eq!(tiling.width(), 4);
        assert_eq!(tiling.height(), 2);
        assert_eq!(tiling.get(1, 2), Some(3));
        assert_eq!(tiling.get(2, 0), None);
        assert_eq!(tiling.serialize().unwrap(), text);
        assert_eq!(text.parse::<Tiling>().unwrap(), tiling);
    }

    #[test]
    fn test_parse_tolerates_trailing_newline() {
        let tiling = Tiling::parse("01\n01\n").unwrap();
        assert_eq!(tiling.cells(), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_letters_extend_the_alphabet() {
        let tiling = Tiling::new(3, 1, vec![9, 10, 35]).unwrap();
        assert_eq!(tiling.serialize().unwrap(), "9az");
        assert_eq!(Tiling::parse("9az").unwrap(), tiling);

        let wide = Tiling::new(1, 1, vec![36]).unwrap();
        assert!(matches!(
            wide.serialize(),
            Err(TilingError::UnprintablePieceIndex(36))
        ));
        assert!(Tiling::parse("A").is_err());
    }

    #[test]
    fn test_rejects_ragged_or_empty_text() {
        assert!(matches!(
            Tiling::parse("000\n00"),
            Err(TilingError::InvalidTiling(_))
        ));
        assert!(Tiling::parse("").is_err());
        assert!(Tiling::parse("0-0").is_err());
        assert!(Tiling::new(2, 2, vec![0; 3]).is_err());
        assert!(Tiling::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_distance() {
        let a = Tiling::parse("0011").unwrap();
        let b = Tiling::parse("0111").unwrap();
        assert_eq!(a.distance_to(&b).unwrap(), 1);
        assert_eq!(a.distance_to(&a).unwrap(), 0);
        assert!(a.distance_to(&Tiling::parse("00\n11").unwrap()).is_err());
    }

    #[test]
    fn test_equality_and_counts() {
        let a = Tiling::parse("00\n11").unwrap();
        let b = Tiling::from_rows(vec![vec![0, 0], vec![1, 1]]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Tiling::parse("01\n01").unwrap());
        assert_eq!(a.piece_indices(), vec![0, 1]);
        assert_eq!(a.cell_counts().get(&1), Some(&2));
    }

    #[test]
    fn test_display_pads_indices() {
        let tiling = Tiling::parse("0011\n2233\n4455").unwrap();
        assert_eq!(tiling.to_string(), "00 00 01 01\n02 02 03 03\n04 04 05 05");
    }

    #[test]
    fn test_json_round_trip_validates() {
        let tiling = Tiling::parse("01\n01").unwrap();
        let json = tiling.to_json().unwrap();
        assert_eq!(Tiling::from_json(&json).unwrap(), tiling);

        let broken = r#"{"width": 2, "height": 2, "cells": [0, 1, 0]}"#;
        assert!(Tiling::from_json(broken).is_err());
    }
}
