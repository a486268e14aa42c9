use super::dsd::{json_path, structure_id};
use super::{DatasetReport, RunSummary};
use crate::config::{BatchConfig, DatasetSpec};
use anyhow::{Context as AnyhowContext, Result};
use los_graph::{
    filter_measure, CodeListRegistry, DatasetRef, GraphSink, ObservationAssembler, RdfGraph,
    StructureDefinition, TurtleSink,
};
use los_tabular::{CsvSource, Record};
use rayon::prelude::*;
use std::path::Path;

pub fn destination(dataset_id: &str) -> String {
    format!("ds-{dataset_id}")
}

/// Tags of the `cl-{tag}.ttl` documents already present in `dir`
pub fn registry_from_output(dir: &Path) -> Result<CodeListRegistry> {
    let mut registry = CodeListRegistry::new();
    if !dir.exists() {
        return Ok(registry);
    }
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if let Some(tag) = name.strip_prefix("cl-").and_then(|n| n.strip_suffix(".ttl")) {
            registry.insert(tag);
        }
    }
    log::debug!("{} code lists available in {}", registry.len(), dir.display());
    Ok(registry)
}

pub fn run(config: &BatchConfig, summary: &mut RunSummary) -> Result<()> {
    let output_dir = config.output_dir();
    let registry = registry_from_output(&output_dir)?;
    let mut sink = TurtleSink::new(&output_dir);

    for dataset in &config.datasets {
        let path = config.resolve(&dataset.data);
        let mut source = CsvSource::from_path(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if let Some(delimiter) = dataset.delimiter {
            source = source.delimiter(delimiter as u8);
        }
        let records = source.records()?;

        let assembled: Vec<Result<(DatasetReport, RdfGraph)>> = dataset
            .measures
            .par_iter()
            .map(|measure| assemble_measure(config, &registry, dataset, measure, &records))
            .collect();

        for result in assembled {
            let (mut report, graph) = result?;
            let destination = destination(&report.id);
            sink.write(&graph, &destination)?;
            report.file = sink.path_for(&destination);
            summary.datasets.push(report);
        }
    }

    Ok(())
}

fn assemble_measure(
    config: &BatchConfig,
    registry: &CodeListRegistry,
    dataset: &DatasetSpec,
    measure: &str,
    records: &[Record],
) -> Result<(DatasetReport, RdfGraph)> {
    let id = structure_id(config, &dataset.dataset_type, measure);
    let definition_path = json_path(&config.output_dir(), &id);
    let definition = StructureDefinition::load(&definition_path).with_context(|| {
        format!(
            "No structure definition for '{id}' at {} (run `dsd` first)",
            definition_path.display()
        )
    })?;

    let assembler = ObservationAssembler::checked(
        definition,
        config.uris.clone(),
        config.assembler.clone(),
        registry,
    )
    .with_context(|| format!("Dataset '{id}'"))?;

    let selected = filter_measure(records, &config.assembler.measure_field, measure);
    log::debug!("{id}: {} of {} records carry {measure}", selected.len(), records.len());

    let batch = assembler.assemble_batch(selected, &DatasetRef::new(&id, &config.uris))?;
    let report = DatasetReport {
        id,
        measure: measure.to_string(),
        observations: batch.stats.assembled,
        skipped: batch.stats.skipped,
        skipped_by_reason: batch.stats.skipped_by_reason,
        identity_collisions: batch.stats.identity_collisions,
        file: Default::default(),
    };
    Ok((report, batch.graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_registry_from_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cl-nuts.ttl"), "").unwrap();
        fs::write(dir.path().join("cl-unit.ttl"), "").unwrap();
        fs::write(dir.path().join("dsd-tourism-partner-occni.ttl"), "").unwrap();

        let registry = registry_from_output(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("NUTS"));
        assert!(!registry.contains("tourism-partner-occni"));

        let missing = registry_from_output(&dir.path().join("nope")).unwrap();
        assert!(missing.is_empty());
    }
}
