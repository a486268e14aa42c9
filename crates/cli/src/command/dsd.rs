use super::{open_workbook, read_rows, RunSummary, StructureReport};
use crate::config::{BatchConfig, StructureSpec};
use anyhow::{Context as AnyhowContext, Result};
use los_graph::{dataset_id, GraphSink, MeasureSpec, StructureDefinition, TurtleSink};
use std::path::{Path, PathBuf};

/// File stem shared by the Turtle and JSON forms of a structure definition
pub fn destination(structure_id: &str) -> String {
    format!("dsd-{structure_id}")
}

/// Where the JSON form of a structure definition is stored
pub fn json_path(output_dir: &Path, structure_id: &str) -> PathBuf {
    output_dir.join(format!("{}.json", destination(structure_id)))
}

pub fn structure_id(config: &BatchConfig, dataset_type: &str, measure: &str) -> String {
    dataset_id(&config.family, dataset_type, measure)
}

pub fn run(config: &BatchConfig, summary: &mut RunSummary) -> Result<()> {
    let mut workbook = open_workbook(config)?;
    let output_dir = config.output_dir();
    let mut sink = TurtleSink::new(&output_dir);

    for spec in &config.structures {
        let id = structure_id(config, &spec.dataset_type, &spec.measure);
        let rows = read_rows(config, &spec.source, workbook.as_mut())
            .with_context(|| format!("Structure definition '{id}'"))?;
        let definition =
            StructureDefinition::from_dsd_rows(&id, &rows, &measure_spec(spec), &config.uris);

        let destination = destination(&id);
        sink.write(&definition.to_graph(&config.uris), &destination)?;

        let json = json_path(&output_dir, &id);
        std::fs::write(&json, definition.to_json()?)
            .with_context(|| format!("Failed to write {}", json.display()))?;

        summary.structures.push(StructureReport {
            id,
            components: definition.components.len(),
            file: sink.path_for(&destination),
        });
    }

    Ok(())
}

fn measure_spec(spec: &StructureSpec) -> MeasureSpec {
    MeasureSpec {
        id: spec.measure.clone(),
        field: spec.value_field.clone(),
        label: spec.label.clone(),
        description: spec.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use los_graph::ComponentRole;
    use std::fs;

    #[test]
    fn test_dsd_writes_turtle_and_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("dsd.csv"),
            "DSD partner,,,\nConcept,Name,Role,Existing concept\nNUTS,Region,Dimension,\nUNIT,Unit,Observation attribute,\n",
        )
        .unwrap();

        let config = BatchConfig::from_toml(
            r#"
output_dir = "out"

[[structures]]
dataset_type = "partner"
measure = "OCC_NI"
label = "Nights spent"
source = { csv = "dsd.csv" }
"#,
            dir.path(),
        )
        .unwrap();

        let mut summary = RunSummary::default();
        run(&config, &mut summary).unwrap();

        assert_eq!(summary.structures[0].id, "tourism-partner-occni");
        assert_eq!(summary.structures[0].components, 4);
        assert!(dir.path().join("out/dsd-tourism-partner-occni.ttl").exists());

        let loaded =
            StructureDefinition::load(&json_path(&config.output_dir(), "tourism-partner-occni"))
                .unwrap();
        let roles: Vec<_> = loaded.components().map(|c| c.role).collect();
        assert_eq!(
            roles,
            vec![
                ComponentRole::Dimension,
                ComponentRole::Attribute,
                ComponentRole::Measure,
                ComponentRole::Temporal
            ]
        );
    }
}
