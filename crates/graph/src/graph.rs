use crate::types::{GraphNode, RdfGraph, Term};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::BTreeSet;

impl RdfGraph {
    /// Objects of `subject predicate ?o`, in insertion order
    pub fn objects(&self, subject: NodeIndex, predicate: &str) -> Vec<&Term> {
        let mut edges: Vec<_> = self
            .graph
            .edges(subject)
            .filter(|e| e.weight().predicate == predicate)
            .collect();
        edges.sort_by_key(|e| e.id().index());
        edges
            .into_iter()
            .map(|e| &self.graph[e.target()].term)
            .collect()
    }

    /// Objects of `<subject> predicate ?o`
    pub fn objects_of(&self, subject: &str, predicate: &str) -> Vec<&Term> {
        self.find_iri(subject)
            .map(|idx| self.objects(idx, predicate))
            .unwrap_or_default()
    }

    /// IRI objects of `<subject> predicate ?o`, sorted
    pub fn object_iris(&self, subject: &str, predicate: &str) -> Vec<String> {
        let mut iris: Vec<String> = self
            .objects_of(subject, predicate)
            .into_iter()
            .filter_map(|t| t.as_iri().map(str::to_string))
            .collect();
        iris.sort();
        iris
    }

    /// Subjects of `?s predicate <object>`
    pub fn subjects_with(&self, predicate: &str, object: &str) -> Vec<NodeIndex> {
        let Some(target) = self.find_iri(object) else {
            return Vec::new();
        };
        let mut subjects: Vec<NodeIndex> = self
            .graph
            .edges_directed(target, Direction::Incoming)
            .filter(|e| e.weight().predicate == predicate)
            .map(|e| e.source())
            .collect();
        subjects.sort();
        subjects
    }

    /// Subjects carrying `predicate` at all
    pub fn subjects_having(&self, predicate: &str) -> Vec<NodeIndex> {
        let subjects: BTreeSet<NodeIndex> = self
            .graph
            .edge_references()
            .filter(|e| e.weight().predicate == predicate)
            .map(|e| e.source())
            .collect();
        subjects.into_iter().collect()
    }

    /// Is `<subject> predicate <object>` present
    pub fn has_triple(&self, subject: &str, predicate: &str, object: &str) -> bool {
        match (self.find_iri(subject), self.find_iri(object)) {
            (Some(s), Some(o)) => self
                .graph
                .edges(s)
                .any(|e| e.target() == o && e.weight().predicate == predicate),
            _ => false,
        }
    }

    /// Every triple, ordered by insertion
    pub fn triples(&self) -> Vec<(&Term, &str, &Term)> {
        let mut edges: Vec<_> = self.graph.edge_references().collect();
        edges.sort_by_key(|e| e.id().index());
        edges
            .into_iter()
            .map(|e| {
                (
                    &self.graph[e.source()].term,
                    e.weight().predicate.as_str(),
                    &self.graph[e.target()].term,
                )
            })
            .collect()
    }

    /// Canonical triple set rendered as N-Triples-like lines
    ///
    /// Blank node labels are kept as is, so two graphs built by the same code
    /// path compare equal.
    pub fn canonical_triples(&self) -> BTreeSet<String> {
        self.triples()
            .into_iter()
            .map(|(s, p, o)| format!("{s} <{p}> {o} ."))
            .collect()
    }

    /// Nodes that appear as subject of at least one triple, by node order
    pub fn subjects(&self) -> Vec<(NodeIndex, &GraphNode)> {
        self.nodes()
            .filter(|(idx, _)| self.graph.edges(*idx).next().is_some())
            .collect()
    }
}
