use crate::config::{BatchConfig, SourceSpec};
use anyhow::{anyhow, Context as AnyhowContext, Result};
use los_tabular::{CsvSource, Row, TabularSource, Workbook};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod codelists;
pub mod cube;
pub mod dsd;
pub mod package;

/// What a run produced, printed at the end (JSON with `--json`)
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub code_lists: Vec<CodeListReport>,
    pub structures: Vec<StructureReport>,
    pub datasets: Vec<DatasetReport>,
    pub packages: Vec<PackageReport>,
}

#[derive(Debug, Serialize)]
pub struct CodeListReport {
    pub tag: String,
    pub concepts: usize,
    pub triples: usize,
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct StructureReport {
    pub id: String,
    pub components: usize,
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DatasetReport {
    pub id: String,
    pub measure: String,
    pub observations: usize,
    pub skipped: usize,
    pub skipped_by_reason: BTreeMap<String, usize>,
    pub identity_collisions: usize,
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PackageReport {
    pub file: PathBuf,
    pub entries: Vec<String>,
}

impl RunSummary {
    pub fn skipped_records(&self) -> usize {
        self.datasets.iter().map(|d| d.skipped).sum()
    }

    /// One line per produced artifact
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for cl in &self.code_lists {
            out.push_str(&format!(
                "code list  {:<16} {:>6} concepts  {}\n",
                cl.tag,
                cl.concepts,
                cl.file.display()
            ));
        }
        for dsd in &self.structures {
            out.push_str(&format!(
                "structure  {:<16} {:>6} components  {}\n",
                dsd.id,
                dsd.components,
                dsd.file.display()
            ));
        }
        for ds in &self.datasets {
            out.push_str(&format!(
                "dataset    {:<16} {:>6} observations, {} skipped  {}\n",
                ds.id,
                ds.observations,
                ds.skipped,
                ds.file.display()
            ));
        }
        for pkg in &self.packages {
            out.push_str(&format!(
                "package    {} ({} files)\n",
                pkg.file.display(),
                pkg.entries.len()
            ));
        }
        out
    }
}

/// Open the configured workbook, if any
pub fn open_workbook(config: &BatchConfig) -> Result<Option<Workbook>> {
    config
        .workbook_path()
        .map(|path| {
            Workbook::open(&path)
                .with_context(|| format!("Failed to open workbook {}", path.display()))
        })
        .transpose()
}

/// Read every row of a configured source
pub fn read_rows(
    config: &BatchConfig,
    source: &SourceSpec,
    workbook: Option<&mut Workbook>,
) -> Result<Vec<Row>> {
    match source {
        SourceSpec::Csv(path) => {
            let path = config.resolve(path);
            let csv = CsvSource::from_path(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(csv.rows()?)
        }
        SourceSpec::Sheet(name) => {
            let workbook = workbook.ok_or_else(|| anyhow!("Sheet '{name}' needs a workbook"))?;
            let sheet = workbook.sheet(name)?;
            Ok(sheet.rows()?)
        }
    }
}
