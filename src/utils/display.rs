//! Display and output formatting utilities

use crate::polyomino::Piece;
use crate::tiling::{EnumerationResult, Tiling};

/// Palette cycled through by piece index
const PIECE_COLORS: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Format tilings and pieces for the terminal
pub struct TilingFormatter;

impl TilingFormatter {
    /// Zero-padded piece indices, each coloured by piece index
    pub fn format_tiling(tiling: &Tiling) -> String {
        let pad = (tiling.cells().len() - 1).to_string().len();
        let mut output = String::new();

        for row in tiling.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|&piece| {
                    ColorOutput::colored(&format!("{:0pad$}", piece), Self::piece_color(piece))
                })
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }

        output
    }

    /// Colour used for a piece index
    pub fn piece_color(piece: usize) -> Color {
        PIECE_COLORS[piece % PIECE_COLORS.len()]
    }

    /// Numbered list of piece shapes
    pub fn format_pieces(pieces: &[Piece]) -> String {
        let mut output = String::new();
        for (index, piece) in pieces.iter().enumerate() {
            output.push_str(&format!(
                "Piece {} ({}x{}):\n",
                index,
                piece.width(),
                piece.height()
            ));
            output.push_str(&piece.to_string());
            output.push('\n');
        }
        output
    }

    /// Counts, timing and solver calls of an enumeration
    pub fn format_summary(result: &EnumerationResult) -> String {
        let mut output = String::new();

        output.push_str("Enumeration Summary:\n");
        output.push_str(&format!("  Tilings found: {}\n", result.tilings.len()));
        output.push_str(&format!("  Duplicates skipped: {}\n", result.duplicates));
        output.push_str(&format!("  Solver calls: {}\n", result.solver_calls));
        output.push_str(&format!(
            "  Complete: {}\n",
            if result.exhausted { "yes" } else { "no (limit reached)" }
        ));
        output.push_str(&format!("  Time: {:.3}s\n", result.elapsed.as_secs_f64()));

        output
    }

    /// Cell-by-cell difference between two tilings of equal size
    pub fn format_difference(a: &Tiling, b: &Tiling) -> String {
        let mut output = String::new();
        for (row_a, row_b) in a.rows().zip(b.rows()) {
            for (x, y) in row_a.iter().zip(row_b) {
                output.push(if x == y { '·' } else { '█' });
            }
            output.push('\n');
        }
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyomino::PieceGenerator;
    use std::time::Duration;

    /// Drop ANSI escapes so assertions hold with or without colour support
    fn plain(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn test_tiling_formatting() {
        let tiling = Tiling::parse("0011\n2233\n4455").unwrap();
        let text = plain(&TilingFormatter::format_tiling(&tiling));
        assert_eq!(text, "00 00 01 01\n02 02 03 03\n04 04 05 05\n");
        assert_eq!(text.trim_end(), tiling.to_string());
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(TilingFormatter::piece_color(0), Color::Red);
        assert_eq!(TilingFormatter::piece_color(6), Color::Red);
        assert_eq!(TilingFormatter::piece_color(5), Color::Cyan);
    }

    #[test]
    fn test_piece_listing() {
        let pieces = PieceGenerator::generate(2).unwrap();
        let text = TilingFormatter::format_pieces(&pieces);
        assert!(text.starts_with("Piece 0 (2x1):\n##\n"));
        assert!(text.contains("Piece 1 (1x2):\n#\n#\n"));
    }

    #[test]
    fn test_summary_and_difference() {
        let a = Tiling::parse("00\n11").unwrap();
        let b = Tiling::parse("01\n01").unwrap();
        assert_eq!(TilingFormatter::format_difference(&a, &b), "·█\n█·\n");

        let result = EnumerationResult {
            tilings: vec![a, b],
            duplicates: 0,
            solver_calls: 3,
            exhausted: true,
            elapsed: Duration::from_millis(5),
        };
        let summary = TilingFormatter::format_summary(&result);
        assert!(summary.contains("Tilings found: 2"));
        assert!(summary.contains("Solver calls: 3"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert_eq!(plain(&ColorOutput::success("OK")), "OK");
    }
}
