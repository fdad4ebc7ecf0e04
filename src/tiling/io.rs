//! File I/O for tilings and exported formulas

use super::{EnumerationResult, Tiling};
use crate::config::{OutputFormat, Settings};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Load a tiling from a text file
/// Format: one line per board row, one piece index character per cell
pub fn load_tiling_from_file<P: AsRef<Path>>(path: P) -> Result<Tiling> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read tiling file: {}", path.as_ref().display()))?;

    Tiling::parse(&content)
        .with_context(|| format!("Failed to parse tiling from file: {}", path.as_ref().display()))
}

/// Save a tiling to a text file, followed by a newline
pub fn save_tiling_to_file<P: AsRef<Path>>(tiling: &Tiling, path: P) -> Result<()> {
    let mut content = tiling.serialize()?;
    content.push('\n');
    write_creating_parent(path.as_ref(), &content)
}

/// Load a tiling from either format, chosen by the `.json` extension
pub fn load_tiling<P: AsRef<Path>>(path: P) -> Result<Tiling> {
    let path = path.as_ref();
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tiling file: {}", path.display()))?;
        Tiling::from_json(&content)
            .with_context(|| format!("Failed to parse tiling JSON: {}", path.display()))
    } else {
        load_tiling_from_file(path)
    }
}

/// Per-run record written next to JSON tilings
#[derive(Debug, Serialize)]
pub struct EnumerationSummary {
    pub width: usize,
    pub height: usize,
    pub piece_size: usize,
    pub unique: bool,
    pub tilings: usize,
    pub duplicates: usize,
    pub solver_calls: usize,
    pub exhausted: bool,
    pub elapsed_ms: u64,
}

impl EnumerationSummary {
    pub fn new(settings: &Settings, result: &EnumerationResult) -> Self {
        Self {
            width: settings.board.width,
            height: settings.board.height,
            piece_size: settings.pieces.size,
            unique: settings.encoding.unique,
            tilings: result.tilings.len(),
            duplicates: result.duplicates,
            solver_calls: result.solver_calls,
            exhausted: result.exhausted,
            elapsed_ms: result.elapsed.as_millis() as u64,
        }
    }
}

/// Save tilings to `output_dir`, one file each, and return the paths
///
/// Every tiling is serialized before the first file is written, so a tiling
/// the format cannot hold leaves the directory untouched. JSON output also
/// writes `summary.json` when a summary is given.
pub fn save_tilings<P: AsRef<Path>>(
    tilings: &[Tiling],
    output_dir: P,
    format: OutputFormat,
    summary: Option<&EnumerationSummary>,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();

    let contents = tilings
        .iter()
        .enumerate()
        .map(|(i, tiling)| -> Result<(String, String)> {
            match format {
                OutputFormat::Text => {
                    let mut text = tiling
                        .serialize()
                        .with_context(|| format!("Failed to serialize tiling {}", i + 1))?;
                    text.push('\n');
                    Ok((format!("tiling_{:03}.txt", i + 1), text))
                }
                OutputFormat::Json => {
                    let json = tiling.to_json().context("Failed to serialize tiling")?;
                    Ok((format!("tiling_{:03}.json", i + 1), json))
                }
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let summary_json = match (format, summary) {
        (OutputFormat::Json, Some(summary)) => Some(
            serde_json::to_string_pretty(summary).context("Failed to serialize summary")?,
        ),
        _ => None,
    };

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(contents.len());
    for (name, content) in contents {
        let path = output_dir.join(name);
        write_creating_parent(&path, &content)?;
        written.push(path);
    }

    if let Some(summary_json) = summary_json {
        write_creating_parent(&output_dir.join("summary.json"), &summary_json)?;
    }

    Ok(written)
}

/// Write DIMACS text to a file
pub fn save_dimacs<P: AsRef<Path>>(dimacs: &str, path: P) -> Result<()> {
    write_creating_parent(path.as_ref(), dimacs)
}

fn write_creating_parent(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
