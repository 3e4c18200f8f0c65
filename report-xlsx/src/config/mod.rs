//! Conversion configuration with builder pattern
//!
//! Settings come from three layers, later ones winning: built-in defaults, an
//! optional TOML file and command-line flags. The resulting [`ReportConfig`] is
//! passed explicitly to [`crate::pipeline::convert`].
//!
//! Example `config.toml` (every key optional):
//!
//! ```toml
//! input = "Reporte_Contactos.csv"
//! output = "Reporte_Contactos_desglosado.xlsx"
//! source_column = "Cuestionario respondido"
//! sheet_name = "Sheet1"
//! encodings = ["utf-8", "latin-1", "cp1252", "latin-9"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::decompose::DEFAULT_SOURCE_COLUMN;
use crate::excel::DEFAULT_SHEET_NAME;
use crate::reader::Candidate;

/// Input file used when none is given
pub const DEFAULT_INPUT: &str = "Reporte_Contactos_2025_10_30_1215.csv";

const APP_DIR: &str = "report-xlsx";
const CONFIG_FILE: &str = "config.toml";

/// Everything a conversion run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// CSV report to read
    pub input: PathBuf,
    /// Workbook to write; derived from `input` when `None`
    pub output: Option<PathBuf>,
    /// Column holding the questionnaire text
    pub source_column: String,
    /// Name of the single worksheet
    pub sheet_name: String,
    /// Encoding labels, tried in order
    pub encodings: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: None,
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            encodings: Candidate::DEFAULT_ORDER
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
        }
    }
}

/// On-disk form; absent keys keep their defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    source_column: Option<String>,
    sheet_name: Option<String>,
    encodings: Option<Vec<String>>,
}

impl ReportConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::new()
    }

    /// Parse TOML text on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Invalid configuration")?;
        let defaults = Self::default();

        Ok(Self {
            input: file.input.unwrap_or(defaults.input),
            output: file.output.or(defaults.output),
            source_column: file.source_column.unwrap_or(defaults.source_column),
            sheet_name: file.sheet_name.unwrap_or(defaults.sheet_name),
            encodings: file.encodings.unwrap_or(defaults.encodings),
        })
    }

    /// Read a TOML configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `<config dir>/report-xlsx/config.toml`, e.g. `~/.config/report-xlsx/config.toml`
    pub fn default_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_file(path);
        }

        match Self::default_file_path() {
            Some(default_path) if default_path.is_file() => {
                log::debug!("Using config file {}", default_path.display());
                Self::load_file(&default_path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Where the workbook is written.
    ///
    /// Without an explicit output this is the input's file stem with an
    /// `.xlsx` extension, in the current directory.
    pub fn output_path(&self) -> PathBuf {
        if let Some(ref output) = self.output {
            return output.clone();
        }

        let mut name = self
            .input
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| "output".into());
        name.push(".xlsx");
        PathBuf::from(name)
    }

    /// Resolve the encoding labels, dropping repeats
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        if self.encodings.is_empty() {
            bail!("No encodings configured");
        }

        let mut candidates = Vec::with_capacity(self.encodings.len());
        for label in &self.encodings {
            let candidate = Candidate::from_label(label)
                .with_context(|| format!("Unsupported encoding: {}", label))?;
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }
}

/// Builder for ReportConfig
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    /// Start from the built-in defaults
    pub fn new() -> Self {
        Self {
            config: ReportConfig::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = Some(output.into());
        self
    }

    pub fn source_column(mut self, column: impl Into<String>) -> Self {
        self.config.source_column = column.into();
        self
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// Replace the encoding list
    pub fn encodings<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.encodings = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ReportConfig {
        self.config
    }
}

impl Default for ReportConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
