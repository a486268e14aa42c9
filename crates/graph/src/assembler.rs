use crate::config::{AssemblerConfig, ObservationIdentity, UriConfig};
use crate::error::{GraphError, Result};
use crate::structure::{CodeListRegistry, Component, ComponentRole, StructureDefinition};
use crate::types::{Literal, RdfGraph};
use crate::vocab::{qb, sdmx_dimension, xsd};
use los_tabular::Record;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

/// Number of hex characters kept from the dimension hash
const HASH_ID_LEN: usize = 16;

/// Tags raw records with typed references, driven by a structure definition
///
/// Holds no per-record state; the same assembler can be reused across
/// batches and threads.
pub struct ObservationAssembler {
    definition: StructureDefinition,
    uris: UriConfig,
    config: AssemblerConfig,
}

/// Dataset every observation of a run belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub id: String,
    pub uri: String,
}

impl DatasetRef {
    pub fn new(id: &str, uris: &UriConfig) -> Self {
        Self {
            id: id.to_string(),
            uri: uris.dataset_uri(id),
        }
    }
}

/// Value of one component on an observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationValue {
    /// Concept IRI of a coded component
    Code(String),
    Literal(Literal),
}

/// One assembled observation, not yet written to a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Observation key, the last URI segment
    pub id: String,
    pub uri: String,
    pub dataset_uri: String,

    /// `(property IRI, value)` per component, in structure order
    pub values: Vec<(String, ObservationValue)>,
}

impl Observation {
    /// Add this observation's triples to `graph`
    pub fn write_into(&self, graph: &mut RdfGraph) {
        let node = graph.iri(&self.uri);
        graph.add_type(node, qb::OBSERVATION);
        graph.add_iri(node, qb::DATA_SET_PROPERTY, &self.dataset_uri);

        for (property, value) in &self.values {
            match value {
                ObservationValue::Code(iri) => {
                    graph.add_iri(node, property, iri);
                }
                ObservationValue::Literal(literal) => {
                    graph.add_literal(node, property, literal.clone())
                }
            }
        }
    }

    pub fn value_of(&self, property: &str) -> Option<&ObservationValue> {
        self.values
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, value)| value)
    }
}

/// Counters of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AssemblyStats {
    pub assembled: usize,
    pub skipped: usize,

    /// Error kind -> skipped records
    pub skipped_by_reason: BTreeMap<String, usize>,

    /// Observations whose key was already used in this batch
    pub identity_collisions: usize,
}

/// Result of assembling a batch of records
#[derive(Debug)]
pub struct AssembledBatch {
    pub graph: RdfGraph,
    pub observations: Vec<Observation>,
    pub stats: AssemblyStats,
}

impl ObservationAssembler {
    pub fn new(definition: StructureDefinition, uris: UriConfig, config: AssemblerConfig) -> Self {
        if config.identity == ObservationIdentity::DimensionHash {
            log::info!(
                "{}: observations are identified by a dimension hash; URIs differ from the legacy value-based format",
                definition.id
            );
        }
        Self {
            definition,
            uris,
            config,
        }
    }

    /// Like `new`, but first checks every coded component against `registry`
    pub fn checked(
        definition: StructureDefinition,
        uris: UriConfig,
        config: AssemblerConfig,
        registry: &CodeListRegistry,
    ) -> Result<Self> {
        definition.resolve(registry)?;
        Ok(Self::new(definition, uris, config))
    }

    pub fn definition(&self) -> &StructureDefinition {
        &self.definition
    }

    /// Assemble one record
    pub fn assemble(&self, record: &Record, dataset: &DatasetRef) -> Result<Observation> {
        let mut values = Vec::with_capacity(self.definition.components.len());
        let mut key_parts: BTreeMap<&str, &str> = BTreeMap::new();
        let mut measure_raw: Option<&str> = None;

        for component in self.definition.components() {
            let raw = required(record, component)?;
            let property = component.property_uri(&self.uris);

            let value = match component.role {
                ComponentRole::Measure => {
                    let parsed: i64 = raw.parse().map_err(|_| GraphError::MeasureParse {
                        line: record.line,
                        field: component.code.clone(),
                        value: raw.to_string(),
                    })?;
                    measure_raw = Some(raw);
                    ObservationValue::Literal(Literal::integer(parsed))
                }
                ComponentRole::Temporal => {
                    key_parts.insert(component.code.as_str(), raw);
                    ObservationValue::Literal(Literal::g_year(raw))
                }
                ComponentRole::Dimension | ComponentRole::Attribute => {
                    key_parts.insert(component.code.as_str(), raw);
                    match &component.code_list {
                        Some(tag) => ObservationValue::Code(self.uris.code_item_uri(tag, raw)),
                        None => ObservationValue::Literal(Literal::plain(raw)),
                    }
                }
            };
            values.push((property, value));
        }

        let id = match self.config.identity {
            ObservationIdentity::MeasureValue => match measure_raw {
                Some(raw) => raw.to_string(),
                None => {
                    return Err(GraphError::invalid_config(format!(
                        "structure '{}' has no measure component",
                        self.definition.id
                    )))
                }
            },
            ObservationIdentity::DimensionHash => dimension_hash(&dataset.id, &key_parts),
        };

        Ok(Observation {
            uri: self.uris.observation_uri(&id),
            id,
            dataset_uri: dataset.uri.clone(),
            values,
        })
    }

    /// Assemble every record, skipping and counting record-level failures
    ///
    /// Any other error aborts the batch.
    pub fn assemble_batch<'r, I>(&self, records: I, dataset: &DatasetRef) -> Result<AssembledBatch>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut graph = RdfGraph::new();
        graph.set_prefix("qb", qb::NS);
        graph.set_prefix("xsd", xsd::NS);
        graph.set_prefix("sdmx-dimension", sdmx_dimension::NS);
        graph.set_prefix("los-codes", self.uris.codes_base.as_str());
        graph.set_prefix("los-meta", self.uris.meta_base.as_str());

        let dataset_node = graph.iri(&dataset.uri);
        graph.add_type(dataset_node, qb::DATA_SET);
        graph.add_iri(
            dataset_node,
            qb::STRUCTURE,
            &self.uris.dsd_uri(&self.definition.id),
        );

        let mut stats = AssemblyStats::default();
        let mut observations = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in records {
            match self.assemble(record, dataset) {
                Ok(observation) => {
                    if !seen.insert(observation.id.clone()) {
                        stats.identity_collisions += 1;
                        log::warn!(
                            "{}: observation key '{}' reused at line {}",
                            dataset.id,
                            observation.id,
                            record.line
                        );
                    }
                    observation.write_into(&mut graph);
                    observations.push(observation);
                    stats.assembled += 1;
                }
                Err(err) if err.is_record_level() => {
                    log::warn!("{}: skipping record: {}", dataset.id, err);
                    stats.skipped += 1;
                    *stats.skipped_by_reason.entry(err.kind().to_string()).or_insert(0) += 1;
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Assembled dataset '{}': {} observations, {} skipped, {} triples",
            dataset.id,
            stats.assembled,
            stats.skipped,
            graph.edge_count()
        );

        Ok(AssembledBatch {
            graph,
            observations,
            stats,
        })
    }
}

/// Keep records whose discriminator field equals `measure`
pub fn filter_measure<'a>(
    records: &'a [Record],
    measure_field: &str,
    measure: &str,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| r.get_ignore_case(measure_field).map(str::trim) == Some(measure))
        .collect()
}

fn required<'r>(record: &'r Record, component: &Component) -> Result<&'r str> {
    record
        .get_ignore_case(&component.code)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GraphError::MissingField {
            line: record.line,
            field: component.code.clone(),
        })
}

fn dimension_hash(dataset_id: &str, parts: &BTreeMap<&str, &str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(dataset_id.as_bytes());
    for (code, value) in parts {
        hasher.update(b"\n");
        hasher.update(code.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_ID_LEN].to_string()
}
