use crate::config::UriConfig;
use crate::error::{GraphError, Result};
use crate::types::{Literal, RdfGraph};
use crate::vocab::{dc, dcterms, owl, qb, rdfs, sdmx_dimension, xsd};
use los_tabular::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Role of a component in a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Dimension,
    Attribute,
    Measure,

    /// Reference period; stored as a literal, never coded
    Temporal,
}

impl ComponentRole {
    /// Path segment of the component property URI
    pub const fn uri_segment(self) -> &'static str {
        match self {
            Self::Dimension | Self::Temporal => "dimension",
            Self::Attribute => "attribute",
            Self::Measure => "measure",
        }
    }
}

/// What an attribute attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attachment {
    Observation,
}

impl Attachment {
    pub const fn class_uri(self) -> &'static str {
        match self {
            Self::Observation => qb::OBSERVATION,
        }
    }
}

/// A named field of the record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Field name in the records, e.g. `NUTS`
    pub code: String,

    pub role: ComponentRole,

    /// Semantic concept IRI
    pub concept_ref: Option<String>,

    /// Tag of the code list values resolve into; `None` for literal fields
    pub code_list: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Published identifier when it differs from `code`
    #[serde(default)]
    pub identifier: Option<String>,

    /// `concept_ref` was minted for this structure and must be declared
    #[serde(default)]
    pub ad_hoc_concept: bool,
}

impl Component {
    /// Coded dimension resolving into the code list of the same name
    pub fn coded_dimension(code: &str) -> Self {
        Self::coded(code, ComponentRole::Dimension)
    }

    /// Coded attribute resolving into the code list of the same name
    pub fn coded_attribute(code: &str) -> Self {
        Self::coded(code, ComponentRole::Attribute)
    }

    fn coded(code: &str, role: ComponentRole) -> Self {
        Self {
            code: code.to_string(),
            role,
            concept_ref: None,
            code_list: Some(code.to_lowercase()),
            label: Some(code.to_lowercase()),
            description: None,
            identifier: None,
            ad_hoc_concept: false,
        }
    }

    pub fn measure(code: &str) -> Self {
        Self {
            code: code.to_string(),
            role: ComponentRole::Measure,
            concept_ref: None,
            code_list: None,
            label: None,
            description: None,
            identifier: None,
            ad_hoc_concept: false,
        }
    }

    pub fn time_period(code: &str) -> Self {
        Self {
            code: code.to_string(),
            role: ComponentRole::Temporal,
            concept_ref: None,
            code_list: None,
            label: None,
            description: None,
            identifier: None,
            ad_hoc_concept: false,
        }
    }

    pub fn is_coded(&self) -> bool {
        self.code_list.is_some()
            && matches!(self.role, ComponentRole::Dimension | ComponentRole::Attribute)
    }

    /// Property the observation uses for this component
    pub fn property_uri(&self, config: &UriConfig) -> String {
        match self.role {
            ComponentRole::Temporal => sdmx_dimension::TIME_PERIOD.to_string(),
            role => config.component_uri(role.uri_segment(), &self.code),
        }
    }
}

/// Component plus where it is attached (the anonymous component specification)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub component: Component,

    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// Measure metadata for a structure definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureSpec {
    /// Identifier, e.g. `TOURISM_OCCNI`
    pub id: String,

    /// Record field carrying the value
    #[serde(default = "default_value_field")]
    pub field: String,

    pub label: String,

    #[serde(default)]
    pub description: Option<String>,
}

fn default_value_field() -> String {
    "OBS_VALUE".to_string()
}

/// Record layout: which fields are dimensions, attributes and measures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDefinition {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub components: Vec<ComponentSpec>,
}

/// Tags of the code lists that were built or loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeListRegistry {
    tags: BTreeSet<String>,
}

impl CodeListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: &str) {
        self.tags.insert(tag.to_lowercase());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CodeListRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for tag in iter {
            registry.insert(tag.as_ref());
        }
        registry
    }
}

impl StructureDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            description: None,
            components: Vec::new(),
        }
    }

    /// Builder: add a component
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.push(component);
        self
    }

    /// Add a component; attributes attach to the observation
    pub fn push(&mut self, component: Component) {
        let attachment = (component.role == ComponentRole::Attribute)
            .then_some(Attachment::Observation);
        self.components.push(ComponentSpec {
            component,
            attachment,
        });
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().map(|spec| &spec.component)
    }

    pub fn measure(&self) -> Option<&Component> {
        self.components()
            .find(|c| c.role == ComponentRole::Measure)
    }

    /// Build from a DSD sheet
    ///
    /// The sheet has two header rows, then one `(code, name, role, concept)`
    /// row per component. Roles other than `Dimension` and
    /// `Observation attribute` are ignored. The measure and the time period
    /// dimension are appended.
    pub fn from_dsd_rows(
        id: &str,
        rows: &[Row],
        measure: &MeasureSpec,
        config: &UriConfig,
    ) -> Self {
        let mut definition = Self::new(id);

        for row in rows.iter().skip(2) {
            let Some(code) = row.first().cloned().flatten() else {
                continue;
            };
            let role = row.get(2).cloned().flatten().unwrap_or_default();
            let existing = row.get(3).cloned().flatten();

            let mut component = match role.as_str() {
                "Dimension" => Component::coded_dimension(&code),
                "Observation attribute" => Component::coded_attribute(&code),
                other => {
                    log::debug!("{id}: ignoring component '{code}' with role '{other}'");
                    continue;
                }
            };
            match existing {
                Some(uri) => component.concept_ref = Some(uri),
                None => {
                    component.concept_ref = Some(config.concept_uri(&code));
                    component.ad_hoc_concept = true;
                }
            }
            definition.push(component);
        }

        let mut value = Component::measure(&measure.field);
        value.concept_ref = Some(config.concept_uri(&measure.id));
        value.label = Some(measure.label.clone());
        value.description = measure.description.clone();
        value.identifier = Some(measure.id.clone());
        value.ad_hoc_concept = true;
        definition.push(value);
        definition.push(Component::time_period("TIME_PERIOD"));
        definition.description = measure.description.clone();
        definition.label = Some(format!("{} structure", measure.label));

        log::info!(
            "Structure definition '{}': {} components",
            definition.id,
            definition.components.len()
        );
        definition
    }

    /// Check every coded component against the available code lists
    pub fn resolve(&self, registry: &CodeListRegistry) -> Result<()> {
        for component in self.components().filter(|c| c.is_coded()) {
            if let Some(code_list) = &component.code_list {
                if !registry.contains(code_list) {
                    return Err(GraphError::UnresolvedComponent {
                        component: component.code.clone(),
                        code_list: code_list.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Render as a Data Cube structure definition graph
    pub fn to_graph(&self, config: &UriConfig) -> RdfGraph {
        let lang = config.label_lang.as_str();
        let mut graph = RdfGraph::new();
        graph.set_prefix("qb", qb::NS);
        graph.set_prefix("rdfs", rdfs::NS);
        graph.set_prefix("owl", owl::NS);
        graph.set_prefix("dc", dc::NS);
        graph.set_prefix("dcterms", dcterms::NS);
        graph.set_prefix("xsd", xsd::NS);
        graph.set_prefix("sdmx-dimension", sdmx_dimension::NS);

        let dsd = graph.iri(&config.dsd_uri(&self.id));
        graph.add_type(dsd, qb::DATA_STRUCTURE_DEFINITION);
        if let Some(label) = &self.label {
            graph.add_literal(dsd, rdfs::LABEL, Literal::lang(label, lang));
        }
        if let Some(description) = &self.description {
            graph.add_literal(dsd, dc::DESCRIPTION, Literal::lang(description, lang));
        }
        graph.add_literal(
            dsd,
            dcterms::IDENTIFIER,
            Literal::plain(format!("DSD-{}", self.id.to_uppercase())),
        );

        for spec in &self.components {
            let component = &spec.component;
            let component_spec = graph.blank();
            graph.add_type(component_spec, qb::COMPONENT_SPECIFICATION);
            graph.add_edge(dsd, qb::COMPONENT, component_spec);

            if component.role == ComponentRole::Temporal {
                graph.add_iri(component_spec, qb::DIMENSION, sdmx_dimension::TIME_PERIOD);
                continue;
            }

            if component.ad_hoc_concept {
                if let Some(concept) = &component.concept_ref {
                    let node = graph.iri(concept);
                    graph.add_type(node, owl::CLASS);
                    graph.add_type(node, rdfs::CLASS);
                    let label = component
                        .label
                        .clone()
                        .unwrap_or_else(|| component.code.to_lowercase());
                    graph.add_literal(node, rdfs::LABEL, Literal::lang(label, lang));
                    if let Some(description) = &component.description {
                        graph.add_literal(node, dc::DESCRIPTION, Literal::lang(description, lang));
                    }
                }
            }

            let property_uri = component.property_uri(config);
            let property = graph.iri(&property_uri);
            let (class, link) = match component.role {
                ComponentRole::Dimension => (qb::DIMENSION_PROPERTY, qb::DIMENSION),
                ComponentRole::Attribute => (qb::ATTRIBUTE_PROPERTY, qb::ATTRIBUTE),
                ComponentRole::Measure | ComponentRole::Temporal => {
                    (qb::MEASURE_PROPERTY, qb::MEASURE)
                }
            };
            graph.add_type(property, class);
            if let Some(label) = &component.label {
                graph.add_literal(property, rdfs::LABEL, Literal::lang(label, lang));
            }
            if let Some(concept) = &component.concept_ref {
                graph.add_iri(property, qb::CONCEPT, concept);
            }
            let identifier = component
                .identifier
                .clone()
                .unwrap_or_else(|| component.code.clone());
            graph.add_literal(property, dcterms::IDENTIFIER, Literal::plain(identifier));

            match &component.code_list {
                Some(tag) => {
                    graph.add_type(property, qb::CODED_PROPERTY);
                    graph.add_iri(property, rdfs::RANGE, &config.concept_class_uri(tag));
                    graph.add_iri(property, qb::CODE_LIST, &config.scheme_uri(tag));
                }
                None if component.role == ComponentRole::Measure => {
                    graph.add_iri(property, rdfs::RANGE, xsd::INTEGER);
                }
                None => {}
            }

            graph.add_edge(component_spec, link, property);
            if let Some(attachment) = spec.attachment {
                graph.add_iri(component_spec, qb::COMPONENT_ATTACHMENT, attachment.class_uri());
            }
        }

        graph
    }
}
