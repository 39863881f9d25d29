//! Command-line interface for the effectograph utility
//!
//! Provides a CLI to extract reactive effect definitions from TypeScript
//! sources and render them as PlantUML diagrams, one output file per input
//! file.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use effectograph::core::logging::init_logging;
use effectograph::extract::EffectExtractor;
use effectograph::render::{DiagramType, PumlRenderer};
use effectograph::syntax::SourceUnit;
use effectograph::{DiagramModel, EffectError};

const TARGET_EXTENSION: &str = "puml";

/// Effectograph - Render TypeScript effect definitions as PlantUML diagrams
#[derive(Parser)]
#[command(name = "effectograph")]
#[command(about = "A Rust utility to render TypeScript effect definitions as PlantUML diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate PlantUML diagrams from effect source files
    Generate {
        /// TypeScript effect source files
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// The diagram type to render
        #[arg(short, long, value_enum, default_value_t = DiagramChoice::Activity)]
        diagram: DiagramChoice,

        /// Directory for the generated .puml files (defaults to each
        /// source file's directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Directory containing the .puml templates for the
        /// template-activity diagram type
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Parse source files and report diagnostics without generating output
    Check {
        /// TypeScript effect source files
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Show supported diagram types
    Diagrams {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported diagram kinds
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum DiagramChoice {
    Activity,
    TemplateActivity,
    Sequence,
}

impl From<DiagramChoice> for DiagramType {
    fn from(value: DiagramChoice) -> Self {
        match value {
            DiagramChoice::Activity => DiagramType::Activity,
            DiagramChoice::TemplateActivity => DiagramType::TemplateActivity,
            DiagramChoice::Sequence => DiagramType::Sequence,
        }
    }
}

/// Main CLI application
pub struct EffectographApp;

impl EffectographApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Initialize logging with CLI flags (environment variables take precedence)
        let log_level_str = std::env::var("EFFECTOGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("EFFECTOGRAPH_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Effectograph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                sources,
                diagram,
                out_dir,
                template_dir,
            } => self.generate_command(&sources, diagram, out_dir, template_dir, cli.verbose),
            Commands::Check { sources } => self.check_command(&sources),
            Commands::Diagrams { json } => self.diagrams_command(json, cli.verbose),
        }
    }

    /// Handle the generate command
    ///
    /// Source files are processed independently and concurrently; one
    /// file's failure never aborts its siblings. The run fails if any file
    /// failed.
    pub fn generate_command(
        &self,
        sources: &[PathBuf],
        diagram: DiagramChoice,
        out_dir: Option<PathBuf>,
        template_dir: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let diagram_type = DiagramType::from(diagram);
        let renderer = match &template_dir {
            Some(dir) => PumlRenderer::with_template_dir(diagram_type, dir),
            None => PumlRenderer::new(diagram_type),
        };

        let results: Vec<(&Path, Result<PathBuf, EffectError>)> = sources
            .par_iter()
            .map(|source| {
                (
                    source.as_path(),
                    self.process_source(source, &renderer, out_dir.as_deref()),
                )
            })
            .collect();

        let mut failed = 0usize;
        for (source, result) in &results {
            match result {
                Ok(target) => {
                    info!(source = %source.display(), target = %target.display(), "generated diagram");
                    if verbose {
                        eprintln!("{} -> {}", source.display(), target.display());
                    }
                }
                Err(e) => {
                    failed += 1;
                    eprintln!("Error: {}: {}", source.display(), e);
                }
            }
        }

        if failed > 0 {
            return Err(anyhow!(
                "{} of {} source file(s) failed",
                failed,
                results.len()
            ));
        }
        Ok(())
    }

    /// Process one source file into its sibling .puml file
    fn process_source(
        &self,
        source: &Path,
        renderer: &PumlRenderer,
        out_dir: Option<&Path>,
    ) -> Result<PathBuf, EffectError> {
        let unit = SourceUnit::load(source)?;

        // Only error-severity diagnostics halt the file
        let diagnostics = unit.diagnostics();
        for diagnostic in diagnostics.iter().filter(|d| !d.is_error()) {
            warn!(source = %source.display(), "{}", diagnostic);
        }
        if diagnostics.iter().any(|d| d.is_error()) {
            let messages = diagnostics
                .iter()
                .filter(|d| d.is_error())
                .map(|d| d.to_string())
                .collect();
            return Err(EffectError::compile_diagnostics(
                source.display().to_string(),
                messages,
            ));
        }

        let effects = EffectExtractor::new(&unit).extract()?;
        if effects.is_empty() {
            return Err(EffectError::no_effects_found(source.display().to_string()));
        }

        let puml = renderer.output(&DiagramModel::new(effects))?;
        let target = target_path(source, out_dir);
        fs::write(&target, puml)?;
        Ok(target)
    }

    /// Handle the check command
    pub fn check_command(&self, sources: &[PathBuf]) -> Result<()> {
        let mut failed = 0usize;
        for source in sources {
            match self.check_source(source) {
                Ok(count) => println!("✓ {}: {} effect(s)", source.display(), count),
                Err(e) => {
                    failed += 1;
                    println!("✗ {}: {}", source.display(), e);
                }
            }
        }

        if failed > 0 {
            return Err(anyhow!("{} of {} source file(s) failed", failed, sources.len()));
        }
        Ok(())
    }

    fn check_source(&self, source: &Path) -> Result<usize, EffectError> {
        let unit = SourceUnit::load(source)?;
        let diagnostics = unit.diagnostics();
        for diagnostic in &diagnostics {
            println!("  {}", diagnostic);
        }
        if diagnostics.iter().any(|d| d.is_error()) {
            return Err(EffectError::compile_diagnostics(
                source.display().to_string(),
                diagnostics
                    .iter()
                    .filter(|d| d.is_error())
                    .map(|d| d.to_string())
                    .collect(),
            ));
        }
        Ok(EffectExtractor::new(&unit).extract()?.len())
    }

    /// Handle the diagrams command
    pub fn diagrams_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram types");
        }

        if json {
            let types = serde_json::json!({
                "supported_types": [
                    {
                        "name": "activity",
                        "description": "Branching activity diagram with fork/split lanes"
                    },
                    {
                        "name": "template-activity",
                        "description": "Activity diagram rendered through per-decorator templates"
                    },
                    {
                        "name": "sequence",
                        "description": "Relation-based sequence diagram"
                    }
                ],
                "total": 3
            });
            println!("{}", serde_json::to_string_pretty(&types)?);
        } else {
            println!("Supported diagram types:");
            println!("  activity           - Branching activity diagram with fork/split lanes");
            println!("  template-activity  - Activity diagram rendered through per-decorator templates");
            println!("  sequence           - Relation-based sequence diagram");
            println!();
            println!("Total: 3 diagram types supported");
        }

        Ok(())
    }
}

impl Default for EffectographApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The .puml file next to the source (or inside the output directory)
fn target_path(source: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let file_name = format!("{}.{}", stem.to_string_lossy(), TARGET_EXTENSION);
    match out_dir {
        Some(dir) => dir.join(file_name),
        None => source.with_file_name(file_name),
    }
}
