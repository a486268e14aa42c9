use los_graph::vocab::{skos, xsd};
use los_graph::{
    AssemblerConfig, Component, DatasetRef, ObservationAssembler, SchemeBuilder,
    StructureDefinition, UriConfig,
};
use los_tabular::{Record, Row};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Rows for a level sequence; codes are `C{i}`
fn rows_for(levels: &[usize], level_count: usize) -> Vec<Row> {
    let mut rows: Vec<Row> = vec![(0..level_count * 2).map(|i| Some(format!("h{i}"))).collect()];
    for (i, &level) in levels.iter().enumerate() {
        let mut row: Row = vec![None; level * 2];
        row.push(Some(format!("C{i}")));
        row.push(Some(format!("Label {i}")));
        rows.push(row);
    }
    rows
}

/// Clamp raw draws into a sequence where each level is at most one deeper than the previous
fn valid_levels(raw: &[usize], level_count: usize) -> Vec<usize> {
    let mut levels = Vec::with_capacity(raw.len());
    let mut prev: Option<usize> = None;
    for &r in raw {
        let level = match prev {
            None => 0,
            Some(p) => r.min(p + 1).min(level_count - 1),
        };
        levels.push(level);
        prev = Some(level);
    }
    levels
}

fn hierarchy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..5).prop_flat_map(|level_count| {
        prop::collection::vec(0usize..5, 1..40)
            .prop_map(move |raw| (level_count, valid_levels(&raw, level_count)))
    })
}

proptest! {
    #[test]
    fn proptest_broader_target_is_one_level_up((level_count, levels) in hierarchy()) {
        let scheme = SchemeBuilder::new(UriConfig::default())
            .build("prop", &rows_for(&levels, level_count), level_count)
            .unwrap();

        prop_assert_eq!(scheme.len(), levels.len());
        for concept in &scheme.concepts {
            match scheme.parent_of(concept) {
                Some(parent) => prop_assert_eq!(parent.level + 1, concept.level),
                None => prop_assert_eq!(concept.level, 0),
            }
        }
    }

    #[test]
    fn proptest_broader_and_narrower_are_reciprocal((level_count, levels) in hierarchy()) {
        let config = UriConfig::default();
        let scheme = SchemeBuilder::new(config.clone())
            .build("prop", &rows_for(&levels, level_count), level_count)
            .unwrap();
        let graph = scheme.to_graph(&config);

        for concept in &scheme.concepts {
            for parent in graph.object_iris(&concept.uri, skos::BROADER) {
                prop_assert!(graph.has_triple(&parent, skos::NARROWER, &concept.uri));
            }
            for child in graph.object_iris(&concept.uri, skos::NARROWER) {
                prop_assert!(graph.has_triple(&child, skos::BROADER, &concept.uri));
            }
            prop_assert!(graph.object_iris(&concept.uri, skos::BROADER).len() <= 1);
        }
    }

    #[test]
    fn proptest_rebuild_is_deterministic((level_count, levels) in hierarchy()) {
        let config = UriConfig::default();
        let rows = rows_for(&levels, level_count);
        let builder = SchemeBuilder::new(config.clone());
        let first = builder.build("prop", &rows, level_count).unwrap();
        let second = builder.build("prop", &rows, level_count).unwrap();

        prop_assert_eq!(first.flatten(), second.flatten());
        prop_assert_eq!(
            first.to_graph(&config).canonical_triples(),
            second.to_graph(&config).canonical_triples()
        );
    }

    #[test]
    fn proptest_single_level_has_no_hierarchy_edges(count in 1usize..30) {
        let config = UriConfig::default();
        let levels = vec![0; count];
        let scheme = SchemeBuilder::new(config.clone())
            .build("flat", &rows_for(&levels, 1), 1)
            .unwrap();
        let graph = scheme.to_graph(&config);

        prop_assert!(graph.subjects_having(skos::BROADER).is_empty());
        prop_assert!(graph.subjects_having(skos::NARROWER).is_empty());
        prop_assert!(graph.subjects_having(skos::TOP_CONCEPT_OF).is_empty());
    }
}

#[test]
fn two_level_example_builds_top_concept_and_broader() {
    let config = UriConfig::default();
    let rows: Vec<Row> = vec![
        vec![Some("code".into()), Some("label".into()), Some("code".into()), Some("label".into())],
        vec![Some("A".into()), Some("Alpha".into()), None, None],
        vec![None, None, Some("A1".into()), Some("Alpha One".into())],
    ];
    let scheme = SchemeBuilder::new(config.clone()).build("demo", &rows, 2).unwrap();
    let graph = scheme.to_graph(&config);

    let a = config.code_item_uri("demo", "A");
    let a1 = config.code_item_uri("demo", "A1");
    assert!(graph.has_triple(&a, skos::TOP_CONCEPT_OF, &config.concept_class_uri("demo")));
    assert!(graph.has_triple(&a1, skos::BROADER, &a));
    assert!(graph.has_triple(&a, skos::NARROWER, &a1));
}

#[test]
fn observation_references_code_and_integer_value() {
    let config = UriConfig::default();
    let definition = StructureDefinition::new("demo")
        .with_component(Component::coded_dimension("NUTS"))
        .with_component(Component::measure("OBS_VALUE"));
    let assembler =
        ObservationAssembler::new(definition, config.clone(), AssemblerConfig::default());
    let dataset = DatasetRef::new("tourism-demo-occni", &config);

    let records = vec![
        Record::new(2).with("NUTS", "FR10").with("OBS_VALUE", "42"),
        Record::new(3).with("NUTS", "DE"),
    ];
    let batch = assembler.assemble_batch(&records, &dataset).unwrap();

    assert_eq!(batch.stats.assembled, 1);
    assert_eq!(batch.stats.skipped, 1);

    let obs = config.observation_uri("42");
    assert!(batch.graph.has_triple(
        &obs,
        &config.component_uri("dimension", "NUTS"),
        "http://id.linked-open-statistics.org/codes/nuts/FR10"
    ));
    let values = batch
        .graph
        .objects_of(&obs, &config.component_uri("measure", "OBS_VALUE"));
    let literal = values[0].as_literal().unwrap();
    assert_eq!(literal.value, "42");
    assert_eq!(literal.datatype.as_deref(), Some(xsd::INTEGER));
}
