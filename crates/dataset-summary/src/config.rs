//! Configuration types for the summary report.
//!
//! The dataset list is plain configuration: an ordered list of
//! [`DatasetDescriptor`]s handed to the runner. [`ReportConfig::for_root`]
//! yields the default set of cleaned pollution datasets, and tests or the
//! `--config` flag substitute their own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of the generated PDF.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_datasets_summary.pdf";

/// Name of the directory under the root holding both inputs and output.
pub const OUTPUTS_DIR: &str = "outputs";

/// Default number of data rows read per sample.
pub const DEFAULT_SAMPLE_ROWS: usize = 50;

/// Default number of sampled rows shown in the preview table.
pub const DEFAULT_PREVIEW_ROWS: usize = 12;

/// Default number of column names listed per page.
pub const DEFAULT_MAX_LISTED_COLUMNS: usize = 20;

/// Cargo's build output directory name.
const CARGO_TARGET_DIR: &str = "target";

/// The default datasets as `(label, file name)` pairs, in page order.
const DEFAULT_DATASETS: [(&str, &str); 4] = [
    ("clean_200_2016", "pollution_us_200_2016_clean.csv"),
    ("clean_2000_2016", "pollution_us_2000_2016_clean.csv"),
    (
        "numeric_fixed",
        "pollution_us_200_2016_clean_numeric_fixed.csv",
    ),
    (
        "standardized",
        "pollution_us_200_2016_clean_numeric_standardized.csv",
    ),
];

/// One dataset to summarize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Short identifier shown in the page title.
    pub label: String,
    /// Location of the CSV file.
    pub path: PathBuf,
}

impl DatasetDescriptor {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Configuration for a report run.
///
/// Use [`ReportConfig::builder()`] for a validated configuration, or
/// [`ReportConfig::for_root`] for the default dataset set.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_summary::config::{DatasetDescriptor, ReportConfig};
///
/// let config = ReportConfig::builder()
///     .output_dir("reports")
///     .dataset(DatasetDescriptor::new("train", "data/train.csv"))
///     .preview_rows(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the PDF is written to. Created if missing.
    pub output_dir: PathBuf,

    /// File name of the PDF inside `output_dir`.
    /// Default: "cleaned_datasets_summary.pdf"
    pub output_name: String,

    /// Datasets to summarize, one page each, in this order.
    pub datasets: Vec<DatasetDescriptor>,

    /// Maximum number of data rows read per sample.
    /// Default: 50
    pub sample_rows: usize,

    /// Maximum number of sampled rows shown in the preview table.
    /// Default: 12
    pub preview_rows: usize,

    /// Maximum number of column names listed on a page.
    /// Default: 20
    pub max_listed_columns: usize,

    /// Whether to write a JSON run summary next to the PDF.
    /// Default: false
    pub emit_summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::for_root(".")
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// The default configuration for a project root: the four cleaned
    /// datasets under `<root>/outputs`, with the PDF written beside them.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let outputs = root.as_ref().join(OUTPUTS_DIR);
        let datasets = DEFAULT_DATASETS
            .iter()
            .map(|(label, file)| DatasetDescriptor::new(*label, outputs.join(file)))
            .collect();

        Self {
            output_dir: outputs,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            datasets,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            max_listed_columns: DEFAULT_MAX_LISTED_COLUMNS,
            emit_summary: false,
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Full path of the PDF.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.datasets.is_empty() {
            return Err(ConfigValidationError::NoDatasets);
        }

        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            if !seen.insert(dataset.label.as_str()) {
                return Err(ConfigValidationError::DuplicateLabel(
                    dataset.label.clone(),
                ));
            }
        }

        if self.output_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOutputName);
        }

        if self.sample_rows == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "sample_rows".to_string(),
                value: self.sample_rows,
            });
        }

        if self.preview_rows == 0 || self.preview_rows > self.sample_rows {
            return Err(ConfigValidationError::InvalidPreviewRows {
                preview_rows: self.preview_rows,
                sample_rows: self.sample_rows,
            });
        }

        if self.max_listed_columns == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "max_listed_columns".to_string(),
                value: self.max_listed_columns,
            });
        }

        Ok(())
    }
}

/// The project root derived from the install location.
///
/// Falls back to the current directory. See [`root_for_executable`].
pub fn install_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| fs::canonicalize(exe).ok())
        .and_then(|exe| root_for_executable(&exe))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The project root for an executable at `exe`.
///
/// An installed binary sits one level below the root (for example
/// `<root>/bin/dataset-summary`), so the root is the parent of its
/// directory. A cargo build output (`<root>/target/<profile>/` or
/// `<root>/target/<triple>/<profile>/`) resolves to the directory holding
/// `target/`.
pub fn root_for_executable(exe: &Path) -> Option<PathBuf> {
    let exe_dir = exe.parent()?;
    let cargo_root = exe_dir
        .ancestors()
        .skip(1)
        .take(2)
        .find(|dir| dir.file_name().is_some_and(|name| name == CARGO_TARGET_DIR))
        .and_then(Path::parent);

    cargo_root
        .or_else(|| exe_dir.parent())
        .map(Path::to_path_buf)
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("No datasets configured")]
    NoDatasets,

    #[error("Duplicate dataset label '{0}'")]
    DuplicateLabel(String),

    #[error("Output file name must not be empty")]
    EmptyOutputName,

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidLimit { field: String, value: usize },

    #[error("Invalid preview rows: {preview_rows} (must be between 1 and sample_rows = {sample_rows})")]
    InvalidPreviewRows {
        preview_rows: usize,
        sample_rows: usize,
    },
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    datasets: Vec<DatasetDescriptor>,
    sample_rows: Option<usize>,
    preview_rows: Option<usize>,
    max_listed_columns: Option<usize>,
    emit_summary: Option<bool>,
}

impl ReportConfigBuilder {
    /// Set the directory the PDF is written to.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the PDF file name.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Append one dataset.
    pub fn dataset(mut self, dataset: DatasetDescriptor) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Append several datasets, keeping their order.
    pub fn datasets(mut self, datasets: impl IntoIterator<Item = DatasetDescriptor>) -> Self {
        self.datasets.extend(datasets);
        self
    }

    /// Set the maximum number of data rows read per sample.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Set the maximum number of rows in the preview table.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the maximum number of listed column names.
    pub fn max_listed_columns(mut self, columns: usize) -> Self {
        self.max_listed_columns = Some(columns);
        self
    }

    /// Enable or disable the JSON run summary.
    pub fn emit_summary(mut self, emit: bool) -> Self {
        self.emit_summary = Some(emit);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let config = ReportConfig {
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(OUTPUTS_DIR)),
            output_name: self
                .output_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            datasets: self.datasets,
            sample_rows: self.sample_rows.unwrap_or(DEFAULT_SAMPLE_ROWS),
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            max_listed_columns: self
                .max_listed_columns
                .unwrap_or(DEFAULT_MAX_LISTED_COLUMNS),
            emit_summary: self.emit_summary.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
