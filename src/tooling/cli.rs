//! CLI Tooling
//!
//! Command-line interface for catalog builds. Every command is workspace
//! scoped and idempotent: rebuilding from the same inputs rewrites the same
//! documents.

use crate::catalog::Catalog;
use crate::classification::{collapsed_prefix, normalize, NameResolver, BOUNDARIES};
use crate::config::{CatalogConfig, ConfigLoader};
use crate::error::{ApiError, StorageError};
use crate::input::{load_dictionary, load_records};
use crate::logging::LoggingConfig;
use crate::report::{
    format_build_summary_text, format_resolve_text, format_verify_report_text, CodeResolution,
    PrefixStep,
};
use crate::toc::sink::{DocumentSink, DryRunSink, FsSink};
use crate::verify::verify_output;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// tocbuild - paginated catalog index builder
#[derive(Parser)]
#[command(name = "tocbuild")]
#[command(about = "Build paginated toc.json catalog indexes from classified records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build both index views and metadata.json
    Build {
        /// Record feed (JSON)
        #[arg(long)]
        records: Option<PathBuf>,
        /// Classification dictionary (JSON or TOML)
        #[arg(long)]
        dictionary: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Remove the output directory before writing
        #[arg(long)]
        clean: bool,
        /// Report what would be written without touching the output
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check an emitted tree for dangling references and duplicate names
    Verify {
        /// Output directory to check
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show how a code normalizes, splits and resolves
    Resolve {
        /// Classification code
        code: String,
        /// Classification dictionary (JSON or TOML)
        #[arg(long)]
        dictionary: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context holding the workspace and its resolved configuration
pub struct CliContext {
    workspace_root: PathBuf,
    config: CatalogConfig,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.resolve_paths(&workspace_root);
        config.validate()?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Build {
                records,
                dictionary,
                output,
                clean,
                dry_run,
                format,
            } => self.handle_build(
                records.as_deref(),
                dictionary.as_deref(),
                output.as_deref(),
                *clean,
                *dry_run,
                format,
            ),
            Commands::Verify { output, format } => self.handle_verify(output.as_deref(), format),
            Commands::Resolve {
                code,
                dictionary,
                format,
            } => self.handle_resolve(code, dictionary.as_deref(), format),
        }
    }

    fn handle_build(
        &self,
        records: Option<&Path>,
        dictionary: Option<&Path>,
        output: Option<&Path>,
        clean: bool,
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let started = Instant::now();
        let records_path = self.resolve_path(records, &self.config.inputs.records);
        let dictionary_path = self.resolve_path(dictionary, &self.config.inputs.dictionary);
        let output_dir = self.resolve_path(output, &self.config.output.dir);

        // Inputs are loaded and the build is planned before anything in the
        // output directory is touched.
        let records = load_records(&records_path)?;
        let resolver = NameResolver::new(Arc::new(load_dictionary(&dictionary_path)?));
        let catalog = Catalog::new(&self.config, &resolver);
        let plan = catalog.plan(&records)?;

        if clean && output_dir.exists() {
            for input in [&records_path, &dictionary_path] {
                if input.starts_with(&output_dir) {
                    return Err(ApiError::ConfigError(format!(
                        "refusing to clean {}: it contains input {}",
                        output_dir.display(),
                        input.display()
                    )));
                }
            }
            if dry_run {
                info!(output = %output_dir.display(), "Dry run: would remove output directory");
            } else {
                warn!(output = %output_dir.display(), "Removing previous output");
                std::fs::remove_dir_all(&output_dir)
                    .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
            }
        }

        let mut sink: Box<dyn DocumentSink> = if dry_run {
            Box::new(DryRunSink::new())
        } else {
            Box::new(FsSink::new(&output_dir))
        };
        let mut summary = catalog.emit(plan, &records, sink.as_mut(), Utc::now())?;
        summary.output = Some(output_dir.display().to_string());
        summary.dry_run = dry_run;

        info!(
            documents = summary.documents_written,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Build finished"
        );
        match format {
            OutputFormat::Json => to_json(&summary),
            OutputFormat::Text => Ok(format_build_summary_text(&summary)),
        }
    }

    fn handle_verify(&self, output: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let output_dir = self.resolve_path(output, &self.config.output.dir);
        let report = verify_output(&output_dir)?;
        match format {
            OutputFormat::Json => to_json(&report),
            OutputFormat::Text => Ok(format_verify_report_text(&report)),
        }
    }

    fn handle_resolve(
        &self,
        code: &str,
        dictionary: Option<&Path>,
        format: &str,
    ) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let dictionary_path = self.resolve_path(dictionary, &self.config.inputs.dictionary);
        let resolver = NameResolver::new(Arc::new(load_dictionary(&dictionary_path)?));

        let normalized = normalize(code);
        let steps = BOUNDARIES
            .iter()
            .map(|&length| {
                let prefix = collapsed_prefix(normalized.as_str(), length);
                PrefixStep {
                    length,
                    label: resolver.resolve(&prefix),
                    prefix,
                }
            })
            .collect();
        let resolution = CodeResolution {
            input: code.to_string(),
            normalized: normalized.to_string(),
            label: resolver.resolve(normalized.as_str()),
            steps,
        };
        match format {
            OutputFormat::Json => to_json(&resolution),
            OutputFormat::Text => Ok(format_resolve_text(&resolution)),
        }
    }

    /// CLI override (relative to the workspace) or the configured path.
    fn resolve_path(&self, cli: Option<&Path>, configured: &Path) -> PathBuf {
        match cli {
            Some(path) if path.is_relative() => self.workspace_root.join(path),
            Some(path) => path.to_path_buf(),
            None => configured.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::from(e)))
}
