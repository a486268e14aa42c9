use crate::config::UriConfig;
use crate::types::{Literal, RdfGraph};
use crate::vocab::{foaf, owl, rdf, rdfs, skos};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One coded entry of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub code: String,
    pub label: Option<String>,

    /// Hierarchy level, 0 = top
    pub level: usize,

    pub uri: String,

    /// Index of the parent concept in the owning scheme
    pub broader: Option<usize>,

    /// Indexes of the child concepts
    pub narrower: Vec<usize>,

    /// Set on level-0 concepts of multi-level schemes
    pub top_concept: bool,

    /// External resource this code stands for
    pub focus: Option<String>,
}

/// Code list: an arena of concepts plus scheme metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptScheme {
    pub tag: String,
    pub label: Option<String>,
    pub uri: String,

    /// Root concept class every member is typed with
    pub concept_class_uri: String,

    pub level_count: usize,
    pub concepts: Vec<Concept>,

    #[serde(skip)]
    code_index: HashMap<String, usize>,
}

impl ConceptScheme {
    pub fn new(tag: &str, level_count: usize, config: &UriConfig) -> Self {
        Self {
            tag: tag.to_string(),
            label: Some(format!("{tag} label")),
            uri: config.scheme_uri(tag),
            concept_class_uri: config.concept_class_uri(tag),
            level_count,
            concepts: Vec::new(),
            code_index: HashMap::new(),
        }
    }

    /// Append a concept, returning its index
    pub fn push(&mut self, concept: Concept) -> usize {
        let idx = self.concepts.len();
        if self.code_index.insert(concept.code.clone(), idx).is_some() {
            log::debug!("{}: code '{}' appears more than once", self.tag, concept.code);
        }
        self.concepts.push(concept);
        idx
    }

    /// Record `child broader parent` and the reciprocal `narrower`
    pub fn link(&mut self, parent: usize, child: usize) {
        self.concepts[child].broader = Some(parent);
        self.concepts[parent].narrower.push(child);
    }

    /// Find concept by code
    pub fn find(&self, code: &str) -> Option<&Concept> {
        self.code_index
            .get(code)
            .and_then(|&idx| self.concepts.get(idx))
            .or_else(|| self.concepts.iter().find(|c| c.code == code))
    }

    pub fn parent_of(&self, concept: &Concept) -> Option<&Concept> {
        concept.broader.and_then(|idx| self.concepts.get(idx))
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Flatten to `(code, level, parent code)` triples in build order
    pub fn flatten(&self) -> Vec<(String, usize, Option<String>)> {
        self.concepts
            .iter()
            .map(|c| {
                (
                    c.code.clone(),
                    c.level,
                    self.parent_of(c).map(|p| p.code.clone()),
                )
            })
            .collect()
    }

    /// Render the scheme as a SKOS graph
    pub fn to_graph(&self, config: &UriConfig) -> RdfGraph {
        let lang = config.label_lang.as_str();
        let mut graph = RdfGraph::new();
        graph.set_prefix("rdfs", rdfs::NS);
        graph.set_prefix("owl", owl::NS);
        graph.set_prefix("skos", skos::NS);
        if self.concepts.iter().any(|c| c.focus.is_some()) {
            graph.set_prefix("foaf", foaf::NS);
        }
        graph.set_prefix("los-codes", config.codes_base.as_str());
        graph.set_prefix("los-concepts", config.concepts_base.as_str());

        let scheme = graph.iri(&self.uri);
        graph.add_type(scheme, skos::CONCEPT_SCHEME);
        if let Some(label) = &self.label {
            graph.add_literal(scheme, skos::PREF_LABEL, Literal::lang(label, lang));
        }
        graph.add_literal(scheme, skos::NOTATION, Literal::string(&self.tag));

        let class = graph.iri(&self.concept_class_uri);
        graph.add_type(class, owl::CLASS);
        graph.add_type(class, rdfs::CLASS);
        graph.add_iri(class, rdfs::SUB_CLASS_OF, skos::CONCEPT);
        graph.add_literal(class, skos::PREF_LABEL, Literal::lang(&self.tag, lang));
        graph.add_literal(class, skos::NOTATION, Literal::lang(&self.tag, lang));
        graph.add_iri(scheme, rdfs::SEE_ALSO, &self.concept_class_uri);
        graph.add_iri(class, rdfs::SEE_ALSO, &self.uri);

        for concept in &self.concepts {
            let node = graph.iri(&concept.uri);
            graph.add_type(node, &self.concept_class_uri);
            graph.add_type(node, skos::CONCEPT);
            graph.add_literal(node, skos::NOTATION, Literal::plain(&concept.code));
            if let Some(label) = &concept.label {
                graph.add_literal(node, skos::PREF_LABEL, Literal::lang(label, lang));
            }
            graph.add_iri(node, skos::IN_SCHEME, &self.uri);

            if let Some(parent) = self.parent_of(concept) {
                graph.add_iri(node, skos::BROADER, &parent.uri);
            } else if concept.top_concept {
                graph.add_iri(node, skos::TOP_CONCEPT_OF, &self.concept_class_uri);
            }
            for &child in &concept.narrower {
                graph.add_iri(node, skos::NARROWER, &self.concepts[child].uri);
            }
            if let Some(focus) = &concept.focus {
                graph.add_iri(node, foaf::FOCUS, focus);
            }
        }

        graph
    }
}
