//! Main CLI application for the polyomino tiling enumerator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use polyomino_tiling::{
    config::{CliOverrides, OutputFormat, Settings},
    polyomino::PieceGenerator,
    tiling::{load_tiling, save_dimacs, save_tilings, EnumerationSummary, TilingProblem, TilingValidator},
    utils::{ColorOutput, TilingFormatter},
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "polyomino_tiling")]
#[command(about = "Enumerate polyomino tilings of a rectangle with a SAT solver")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every tiling of a board
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Board height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Cells per piece (overrides config)
        #[arg(short = 'k', long)]
        size: Option<usize>,

        /// Use each piece at most once
        #[arg(short, long)]
        unique: bool,

        /// Maximum tilings to find (overrides config)
        #[arg(short, long)]
        max_solutions: Option<usize>,

        /// External DIMACS solver binary (overrides config)
        #[arg(short, long)]
        solver: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every tiling found
        #[arg(long)]
        show_all: bool,
    },

    /// List the pieces of a given size
    Pieces {
        /// Cells per piece
        #[arg(short = 'k', long)]
        size: usize,

        /// Also count classes under rotation and reflection
        #[arg(long)]
        free: bool,
    },

    /// Write the CNF formula of a problem as DIMACS
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        #[arg(long)]
        width: Option<usize>,

        #[arg(long)]
        height: Option<usize>,

        #[arg(short = 'k', long)]
        size: Option<usize>,

        #[arg(short, long)]
        unique: bool,

        /// Destination file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a saved tiling
    Show {
        /// Tiling file (text or .json)
        tiling: PathBuf,

        /// Check the tiling against the pieces of this size
        #[arg(short = 'k', long)]
        size: Option<usize>,

        /// Require each piece to be used at most once
        #[arg(short, long)]
        unique: bool,

        /// Compare with another tiling of the same board
        #[arg(short, long)]
        against: Option<PathBuf>,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Solve {
            config, width, height, size, unique, max_solutions, solver, output, show_all,
        } => {
            let overrides = CliOverrides {
                width,
                height,
                size,
                unique,
                max_solutions,
                solver_command: solver,
                output_dir: output,
            };
            solve_command(config, overrides, show_all, cli.verbose)
        }
        Commands::Pieces { size, free } => pieces_command(size, free),
        Commands::Encode { config, width, height, size, unique, output } => {
            let overrides = CliOverrides {
                width,
                height,
                size,
                unique,
                ..CliOverrides::default()
            };
            encode_command(config, overrides, output)
        }
        Commands::Show { tiling, size, unique, against } => {
            show_command(tiling, size, unique, against)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

/// Load the config file if present, then apply the overrides
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    show_all: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("🧩 Starting Polyomino Tiling Enumerator"));

    let settings = load_settings(&config_path, &overrides)?;

    if verbose {
        println!("Configuration:");
        println!("  Board: {}x{}", settings.board.width, settings.board.height);
        println!("  Piece size: {}", settings.pieces.size);
        println!("  Unique pieces: {}", settings.encoding.unique);
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  Output dir: {}", settings.output.directory.display());
        println!();
    }

    let problem = TilingProblem::new(settings.clone())
        .context("Failed to create tiling problem")?;

    if verbose {
        println!("{}", problem.encoding_statistics());
    }

    if settings.output.save_cnf {
        let cnf_path = settings.output.directory.join("problem.cnf");
        save_dimacs(&problem.export_dimacs(), &cnf_path)?;
        println!("Formula written to {}", cnf_path.display());
    }

    println!("{}", ColorOutput::info("🧮 Solving..."));
    let result = problem.solve()?;

    if result.tilings.is_empty() {
        println!("{}", ColorOutput::warning("❌ No tilings found"));
        return Ok(());
    }

    println!("{}", ColorOutput::success(&format!(
        "✅ Found {} tiling(s) in {:.3}s",
        result.tilings.len(),
        result.elapsed.as_secs_f64()
    )));
    println!("\n{}", TilingFormatter::format_summary(&result));

    let shown = if show_all { result.tilings.len() } else { 3 };
    for (i, tiling) in result.tilings.iter().take(shown).enumerate() {
        println!("{}", ColorOutput::info(&format!("Tiling {}:", i + 1)));
        println!("{}", TilingFormatter::format_tiling(tiling));
    }

    println!("{}", ColorOutput::info("💾 Saving tilings..."));
    let summary = EnumerationSummary::new(&settings, &result);
    save_tilings(
        &result.tilings,
        &settings.output.directory,
        settings.output.format,
        Some(&summary),
    )
    .context("Failed to save tilings")?;

    println!("{}", ColorOutput::success(&format!(
        "Tilings saved to {}",
        settings.output.directory.display()
    )));

    Ok(())
}

fn pieces_command(size: usize, free: bool) -> Result<()> {
    let pieces = PieceGenerator::generate(size).context("Failed to generate pieces")?;
    println!("{}", TilingFormatter::format_pieces(&pieces));
    println!("{}", ColorOutput::success(&format!(
        "Generated {} pieces of size {}.", pieces.len(), size
    )));

    if free {
        let classes = PieceGenerator::free_classes(size)?;
        println!("{} distinct up to rotation and reflection.", classes.len());
    }

    Ok(())
}

fn encode_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    let problem = TilingProblem::new(settings).context("Failed to create tiling problem")?;
    let dimacs = problem.export_dimacs();

    match output {
        Some(path) => {
            save_dimacs(&dimacs, &path)?;
            println!("{}", problem.encoding_statistics());
            println!("{}", ColorOutput::success(&format!("Formula written to {}", path.display())));
        }
        None => print!("{}", dimacs),
    }

    Ok(())
}

fn show_command(
    tiling_path: PathBuf,
    size: Option<usize>,
    unique: bool,
    against: Option<PathBuf>,
) -> Result<()> {
    let tiling = load_tiling(&tiling_path)?;

    println!("Tiling ({}x{}):", tiling.width(), tiling.height());
    println!("{}", TilingFormatter::format_tiling(&tiling));

    if let Some(size) = size {
        let pieces = PieceGenerator::generate(size).context("Failed to generate pieces")?;
        let result = TilingValidator::new(pieces, unique).validate(&tiling);
        println!("{}", result);

        if result.is_valid {
            println!("{}", ColorOutput::success("✅ Tiling is valid!"));
        } else {
            println!("{}", ColorOutput::error("❌ Tiling is invalid"));
        }
    }

    if let Some(other_path) = against {
        let other = load_tiling(&other_path)?;
        let distance = tiling
            .distance_to(&other)
            .with_context(|| format!("Cannot compare with {}", other_path.display()))?;

        println!("Difference from {} ({} cells):", other_path.display(), distance);
        println!("{}", TilingFormatter::format_difference(&tiling, &other));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let output_dir = directory.join("output/tilings");

    for dir in [&config_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut dominoes = Settings::default();
    dominoes.board.width = 4;
    dominoes.board.height = 2;
    dominoes.pieces.size = 2;
    dominoes.to_file(examples_dir.join("dominoes.yaml"))?;

    let mut unique = Settings::default();
    unique.board.width = 5;
    unique.board.height = 4;
    unique.pieces.size = 4;
    unique.encoding.unique = true;
    unique.output.format = OutputFormat::Json;
    unique.to_file(examples_dir.join("unique_tetrominoes.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "polyomino_tiling",
            "solve",
            "--config", "test.yaml",
            "--width", "4",
            "-k", "2",
            "--unique",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["polyomino_tiling", "pieces", "-k", "4", "--free", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Pieces { size: 4, free: true }));
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        assert!(config_path.exists());
        assert!(Settings::from_file(&config_path).is_ok());
        assert!(Settings::from_file(temp_dir.path().join("config/examples/dominoes.yaml")).is_ok());
        assert!(temp_dir.path().join("output/tilings").exists());
    }

    #[test]
    fn test_show_command_compares_tilings() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.txt");
        let narrow = temp_dir.path().join("narrow.txt");
        std::fs::write(&first, "1001\n1001\n").unwrap();
        std::fs::write(&second, "0000\n0000\n").unwrap();
        std::fs::write(&narrow, "00\n00\n").unwrap();

        show_command(first.clone(), Some(2), false, Some(second)).unwrap();
        assert!(show_command(first, None, false, Some(narrow)).is_err());
    }

    #[test]
    fn test_encode_command_writes_file() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("problem.cnf");
        let overrides = CliOverrides {
            width: Some(2),
            height: Some(2),
            size: Some(1),
            ..CliOverrides::default()
        };

        encode_command(temp_dir.path().join("missing.yaml"), overrides, Some(output.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "p cnf 4 4\n1 0\n2 0\n3 0\n4 0\n");
    }
}
