//! Configuration settings for the tiling enumerator

use crate::polyomino::PieceGenerator;
use crate::tiling::tiling::TEXT_FORMAT_PIECES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub pieces: PieceConfig,
    pub encoding: EncodingConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceConfig {
    /// Number of cells per polyomino
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Use each piece at most once
    pub unique: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Solver binary for the external backend
    #[serde(default)]
    pub command: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Stop after this many tilings; unlimited when absent
    #[serde(default)]
    pub max_solutions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cadical,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: OutputFormat,
    /// Also write the initial formula as DIMACS
    #[serde(default)]
    pub save_cnf: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                width: 4,
                height: 4,
            },
            pieces: PieceConfig { size: 4 },
            encoding: EncodingConfig { unique: false },
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                command: None,
                args: Vec::new(),
                max_solutions: None,
            },
            output: OutputConfig {
                directory: PathBuf::from("output/tilings"),
                format: OutputFormat::Text,
                save_cnf: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.board.width == 0 || self.board.height == 0 {
            anyhow::bail!(
                "Board dimensions must be positive, got {}x{}",
                self.board.width,
                self.board.height
            );
        }

        if self.pieces.size == 0 {
            anyhow::bail!("Piece size must be at least 1");
        }

        let area = self.board.width * self.board.height;
        if area % self.pieces.size != 0 {
            anyhow::bail!(
                "Board area {} is not a multiple of piece size {}",
                area,
                self.pieces.size
            );
        }

        if self.output.format == OutputFormat::Text {
            let piece_count = PieceGenerator::generate(self.pieces.size)?.len();
            if piece_count > TEXT_FORMAT_PIECES {
                anyhow::bail!(
                    "Text output holds at most {} piece indices but size {} has {} pieces; use format: json",
                    TEXT_FORMAT_PIECES,
                    self.pieces.size,
                    piece_count
                );
            }
        }

        if self.solver.backend == SolverBackend::External && self.solver.command.is_none() {
            anyhow::bail!("External solver backend needs a command");
        }

        if self.solver.max_solutions == Some(0) {
            anyhow::bail!("Maximum solutions must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.board.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.board.height = height;
        }
        if let Some(size) = cli_overrides.size {
            self.pieces.size = size;
        }
        if cli_overrides.unique {
            self.encoding.unique = true;
        }
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = Some(max_solutions);
        }
        if let Some(ref command) = cli_overrides.solver_command {
            self.solver.backend = SolverBackend::External;
            self.solver.command = Some(command.clone());
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub size: Option<usize>,
    pub unique: bool,
    pub max_solutions: Option<usize>,
    pub solver_command: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.board.width, 4);
        assert_eq!(settings.pieces.size, 4);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.board.width = 6;
        settings.pieces.size = 3;
        settings.solver.max_solutions = Some(7);
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.board.width, 6);
        assert_eq!(loaded.pieces.size, 3);
        assert_eq!(loaded.solver.max_solutions, Some(7));
        assert_eq!(loaded.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_optional_solver_fields() {
        let yaml = "\
board: { width: 2, height: 4 }
pieces: { size: 2 }
encoding: { unique: true }
solver: { backend: external, command: kissat, args: [-q] }
output: { directory: out, format: json }
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.solver.backend, SolverBackend::External);
        assert_eq!(settings.solver.args, vec!["-q".to_string()]);
        assert_eq!(settings.solver.max_solutions, None);
        assert!(!settings.output.save_cnf);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.board.width = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.board.width = 3;
        settings.board.height = 3;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::External;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.max_solutions = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_text_output_limited_to_printable_pieces() {
        let mut settings = Settings::default();
        settings.board.width = 5;
        settings.board.height = 4;
        settings.pieces.size = 5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("use format: json"));

        settings.output.format = OutputFormat::Json;
        assert!(settings.validate().is_ok());

        // 19 fixed tetrominoes still fit the text format
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            width: Some(5),
            size: Some(5),
            unique: true,
            solver_command: Some(PathBuf::from("minisat")),
            ..CliOverrides::default()
        });
        assert_eq!(settings.board.width, 5);
        assert_eq!(settings.board.height, 4);
        assert_eq!(settings.pieces.size, 5);
        assert!(settings.encoding.unique);
        assert_eq!(settings.solver.backend, SolverBackend::External);
    }
}
