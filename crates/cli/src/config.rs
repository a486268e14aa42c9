use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use los_graph::{AssemblerConfig, FocusScope, FocusSpec, UriConfig};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Batch run description, read from a TOML file
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Where every generated file goes
    pub output_dir: PathBuf,

    /// Workbook holding code list and DSD sheets
    #[serde(default)]
    pub workbook: Option<PathBuf>,

    /// Dataset family used in dataset and DSD ids
    #[serde(default = "default_family")]
    pub family: String,

    /// Build every plain `(code, label)` workbook sheet as a single-level list
    #[serde(default)]
    pub auto_sheets: bool,

    #[serde(default)]
    pub uris: UriConfig,

    #[serde(default)]
    pub assembler: AssemblerConfig,

    #[serde(default)]
    pub code_lists: Vec<CodeListSpec>,

    #[serde(default)]
    pub flat_code_lists: Vec<FlatCodeListSpec>,

    #[serde(default)]
    pub structures: Vec<StructureSpec>,

    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_family() -> String {
    "tourism".to_string()
}

/// Where rows come from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpec {
    Csv(PathBuf),

    /// Sheet of the batch workbook
    Sheet(String),
}

/// Hierarchical code list
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeListSpec {
    pub tag: String,
    pub source: SourceSpec,

    #[serde(default = "default_levels")]
    pub levels: usize,

    #[serde(default)]
    pub focus: Option<FocusSpec>,

    #[serde(default = "default_focus_scope")]
    pub focus_scope: FocusScope,
}

fn default_levels() -> usize {
    1
}

fn default_focus_scope() -> FocusScope {
    FocusScope::NonRoot
}

/// Single-level code list made of the distinct values of a column
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatCodeListSpec {
    pub tag: String,

    /// Zero-based column read from every source
    pub column: usize,

    pub sources: Vec<PathBuf>,

    #[serde(default)]
    pub focus: Option<FocusSpec>,
}

/// Structure definition sheet for one (dataset type, measure) pair
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureSpec {
    pub dataset_type: String,
    pub measure: String,
    pub source: SourceSpec,
    pub label: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Record field carrying the value
    #[serde(default = "default_value_field")]
    pub value_field: String,
}

fn default_value_field() -> String {
    "OBS_VALUE".to_string()
}

/// Observation file assembled once per measure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    pub dataset_type: String,
    pub measures: Vec<String>,
    pub data: PathBuf,

    /// Single-byte field delimiter
    #[serde(default)]
    pub delimiter: Option<char>,
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch config {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Invalid batch config {}", path.display()))?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(text).context("Invalid batch config")?;
        config.base_dir = base_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Resolve a config-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn workbook_path(&self) -> Option<PathBuf> {
        self.workbook.as_deref().map(|p| self.resolve(p))
    }

    pub fn validate(&self) -> Result<()> {
        self.uris.validate().map_err(|err| anyhow!("[uris] {err}"))?;

        let mut tags = HashSet::new();
        for tag in self
            .code_lists
            .iter()
            .map(|c| &c.tag)
            .chain(self.flat_code_lists.iter().map(|c| &c.tag))
        {
            if !tags.insert(tag.to_lowercase()) {
                bail!("Code list '{tag}' is declared more than once");
            }
        }

        for spec in &self.code_lists {
            if spec.levels == 0 {
                bail!("Code list '{}': levels must be at least 1", spec.tag);
            }
        }

        let needs_workbook = self.auto_sheets
            || self
                .code_lists
                .iter()
                .any(|c| matches!(c.source, SourceSpec::Sheet(_)))
            || self
                .structures
                .iter()
                .any(|s| matches!(s.source, SourceSpec::Sheet(_)));
        if needs_workbook && self.workbook.is_none() {
            bail!("Sheet sources are used but no workbook is configured");
        }

        for dataset in &self.datasets {
            if dataset.measures.is_empty() {
                bail!("Dataset '{}' lists no measures", dataset.dataset_type);
            }
            if let Some(delimiter) = dataset.delimiter {
                if !delimiter.is_ascii() {
                    bail!(
                        "Dataset '{}': delimiter must be a single ASCII character",
                        dataset.dataset_type
                    );
                }
            }
        }

        Ok(())
    }
}
