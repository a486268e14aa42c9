use super::{PackageReport, RunSummary};
use crate::config::BatchConfig;
use anyhow::{Context as AnyhowContext, Result};
use los_graph::dataset_name;
use std::fs::File;
use std::path::Path;

/// Does `file_name` belong in the archive of one (dataset type, measure) pair
///
/// Code lists always do; other documents must mention both the dataset type
/// and the measure.
pub fn belongs_to(file_name: &str, dataset_type: &str, measure: &str) -> bool {
    let name = file_name.to_lowercase();
    if !name.ends_with(".ttl") {
        return false;
    }
    let measure = measure.replace('_', "").to_lowercase();
    name.starts_with("cl") || (name.contains(&dataset_type.to_lowercase()) && name.contains(&measure))
}

/// Zip the documents of one pair into `{dir}/{type}-{measure}.zip`
pub fn package(dir: &Path, dataset_type: &str, measure: &str) -> Result<PackageReport> {
    let mut entries: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| belongs_to(name, dataset_type, measure))
        .collect();
    entries.sort();

    let path = dir.join(format!("{}.zip", dataset_name(dataset_type, measure)));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options: zip::write::SimpleFileOptions = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for name in &entries {
        zip.start_file(name.as_str(), options)?;
        let mut input = File::open(dir.join(name))?;
        std::io::copy(&mut input, &mut zip)?;
    }
    zip.finish()?;

    log::info!("Packaged {} files into {}", entries.len(), path.display());
    Ok(PackageReport {
        file: path,
        entries,
    })
}

/// One archive per configured (dataset type, measure) pair
pub fn run(config: &BatchConfig, summary: &mut RunSummary) -> Result<()> {
    let output_dir = config.output_dir();
    for dataset in &config.datasets {
        for measure in &dataset.measures {
            summary
                .packages
                .push(package(&output_dir, &dataset.dataset_type, measure)?);
        }
    }
    Ok(())
}
