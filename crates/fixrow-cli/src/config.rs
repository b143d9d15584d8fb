//! Configuration file structure for `.fixrow.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.fixrow.toml` (user defaults)
//! - Project directory: `./.fixrow.toml` (project defaults)
//! - Custom location via `--config` (replaces the project file)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments
//! 2. Project config (or `--config`)
//! 3. User config
//! 4. Built-in defaults

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use fixrow_core::{
    Axis, Band, CatalogEntry, ColumnSchema, DocumentCatalog, FieldSpec, PipelineConfig,
    RowPipeline, DEFAULT_BAND_MAX, DEFAULT_BAND_MIN, DEFAULT_PDF_DIR,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".fixrow.toml";

/// Sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Comma-separated values with a header row (default)
    #[default]
    Csv,
    /// One SQLite table, recreated on each run
    Sqlite,
}

impl OutputFormat {
    /// File written when no output path is configured
    pub const fn default_path(self) -> &'static str {
        match self {
            Self::Csv => "rent_stabilized.csv",
            Self::Sqlite => "rent_stabilized.db",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunConfig>,

    /// Catalog; replaces the built-in borough list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<CatalogEntry>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Axis carrying the column signature (x or y)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_axis: Option<Axis>,

    /// Lower bound of the admissible y band (exclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_min: Option<f64>,

    /// Upper bound of the admissible y band (exclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// csv or sqlite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// SQLite table name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// CSV text for null values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_marker: Option<String>,

    /// Append the BBL column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_key: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    /// Only process catalog entries with these tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,

    /// Stop reading each PDF after this many pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

impl SchemaConfig {
    fn overlay(self, top: Self) -> Self {
        Self {
            signature_axis: top.signature_axis.or(self.signature_axis),
            band_min: top.band_min.or(self.band_min),
            band_max: top.band_max.or(self.band_max),
            fields: top.fields.or(self.fields),
        }
    }
}

impl OutputConfig {
    fn overlay(self, top: Self) -> Self {
        Self {
            format: top.format.or(self.format),
            path: top.path.or(self.path),
            table: top.table.or(self.table),
            null_marker: top.null_marker.or(self.null_marker),
            composite_key: top.composite_key.or(self.composite_key),
        }
    }
}

impl RunConfig {
    fn overlay(self, top: Self) -> Self {
        Self {
            continue_on_error: top.continue_on_error.or(self.continue_on_error),
            parallel: top.parallel.or(self.parallel),
            only: top.only.or(self.only),
            max_pages: top.max_pages.or(self.max_pages),
        }
    }
}

/// Field-wise merge of two optional sections; `top` wins
fn overlay_section<T>(base: Option<T>, top: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (base, top) {
        (Some(base), Some(top)) => Some(merge(base, top)),
        (base, top) => top.or(base),
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the user and project configs, or the explicit one in place of
    /// the project config, and merge them.
    ///
    /// An unreadable user or project file is reported and skipped; an
    /// unreadable explicit file is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let user = Self::user_config_path().and_then(|p| Self::load_optional(&p));
        let project = match explicit {
            Some(path) => Some(Self::load_from_file(path)?),
            None => Self::load_optional(Path::new(CONFIG_FILE_NAME)),
        };
        Ok(Self::merge(user, project))
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Ignoring config {}: {:#}",
                    "Warning:".yellow().bold(),
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Merge configs with precedence: project over user over defaults.
    ///
    /// Sections merge field by field; `documents` is replaced as a whole.
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let user = user_config.unwrap_or_default();
        let Some(project) = project_config else {
            return user;
        };
        Self {
            schema: overlay_section(user.schema, project.schema, SchemaConfig::overlay),
            output: overlay_section(user.output, project.output, OutputConfig::overlay),
            run: overlay_section(user.run, project.run, RunConfig::overlay),
            documents: project.documents.or(user.documents),
        }
    }

    /// Build the pipeline from `[schema]`, falling back to the built-in
    /// rent-stabilization layout.
    pub fn pipeline(&self) -> Result<RowPipeline> {
        let section = self.schema.clone().unwrap_or_default();
        let band = Band::new(
            section.band_min.unwrap_or(DEFAULT_BAND_MIN),
            section.band_max.unwrap_or(DEFAULT_BAND_MAX),
        );
        if band.min >= band.max {
            bail!(
                "Invalid band: band_min ({}) must be below band_max ({})",
                band.min,
                band.max
            );
        }

        let schema = match (section.fields, section.signature_axis) {
            (None, None | Some(Axis::X)) => ColumnSchema::rent_stabilization(),
            (fields, axis) => {
                let fields = fields
                    .unwrap_or_else(|| ColumnSchema::rent_stabilization().fields().to_vec());
                ColumnSchema::new(fields, axis.unwrap_or_default())
                    .context("Invalid [schema] section")?
            }
        };

        Ok(RowPipeline::with_config(schema, PipelineConfig { band }))
    }

    /// Configured catalog, or the five boroughs under `pdf_dir`, filtered by
    /// `only` (a non-empty `cli_only` replaces `[run] only`).
    pub fn catalog(&self, pdf_dir: Option<&Path>, cli_only: &[String]) -> DocumentCatalog {
        let catalog = match &self.documents {
            Some(entries) => DocumentCatalog::new(entries.clone()),
            None => DocumentCatalog::boroughs(pdf_dir.unwrap_or_else(|| Path::new(DEFAULT_PDF_DIR))),
        };
        let only = if cli_only.is_empty() {
            self.run
                .as_ref()
                .and_then(|r| r.only.clone())
                .unwrap_or_default()
        } else {
            cli_only.to_vec()
        };
        catalog.only(&only)
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn run(&self) -> RunConfig {
        self.run.clone().unwrap_or_default()
    }

    /// Resolve output format from CLI, config, or default
    pub fn resolve_output_format(
        cli_value: Option<OutputFormat>,
        config_value: Option<&str>,
    ) -> Result<OutputFormat> {
        if let Some(format) = cli_value {
            return Ok(format);
        }
        match config_value {
            None => Ok(OutputFormat::default()),
            Some(value) => OutputFormat::from_str(value, true)
                .map_err(|_| anyhow::anyhow!("Unknown output format in config: {value:?}")),
        }
    }
}

/// Template written by `fixrow config init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# fixrow configuration file

[schema]
# Axis carrying the column signature: x or y
# signature_axis = "x"

# Fragments are kept only when band_min < y < band_max
# band_min = 25.0
# band_max = 865.0

# Custom layout (defaults to the rent-stabilization building list)
# [[schema.fields]]
# name = "ZIP"
# signature = 25.0
#
# [[schema.fields]]
# name = "LOT"
# signature = 1143.0
# terminator = true
#
# [[schema.fields]]
# name = "BOROUGH_ID"
# signature = 2024.0
# tag = true

[output]
# Output format: csv or sqlite
# format = "csv"
# path = "rent_stabilized.csv"
# table = "rent_stabilized"
# null_marker = ""
# Append a BBL column (BOROUGH_ID + BLOCK + LOT)
# composite_key = false

[run]
# continue_on_error = false
# parallel = false
# only = ["1", "5"]
# max_pages = 10

# Documents to process (defaults to ./rent-stab-pdfs/2022-DHCR-<Borough>.pdf)
# [[documents]]
# tag = "5"
# path = "rent-stab-pdfs/2022-DHCR-Staten-Island.pdf"
"#;
