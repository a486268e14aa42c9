use crate::vocab::xsd;
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Literal value with an optional datatype or language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form
    pub value: String,

    /// Datatype IRI (mutually exclusive with `lang`)
    pub datatype: Option<String>,

    /// Language tag
    pub lang: Option<String>,
}

impl Literal {
    /// Plain literal
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            lang: Some(lang.into()),
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, xsd::STRING)
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd::INTEGER)
    }

    pub fn g_year(value: impl Into<String>) -> Self {
        Self::typed(value, xsd::G_YEAR)
    }
}

/// RDF term carried by a graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(String),

    /// Anonymous node, numbered per graph
    Blank(usize),

    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(id) => write!(f, "_:b{id}"),
            Self::Literal(lit) => match (&lit.datatype, &lit.lang) {
                (_, Some(lang)) => write!(f, "\"{}\"@{lang}", lit.value),
                (Some(dt), None) => write!(f, "\"{}\"^^<{dt}>", lit.value),
                (None, None) => write!(f, "\"{}\"", lit.value),
            },
        }
    }
}

/// Node in an RDF graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub term: Term,
}

/// Edge in an RDF graph: the predicate IRI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub predicate: String,
}

/// In-memory RDF graph fragment
///
/// IRIs and blank nodes are unique nodes; literals get one node per triple.
/// Adding an identical triple twice is a no-op.
pub struct RdfGraph {
    /// Directed graph (subject -> object, labelled with the predicate)
    pub graph: DiGraph<GraphNode, GraphEdge>,

    /// IRI -> NodeIndex mapping for fast lookup
    pub iri_index: HashMap<String, NodeIndex>,

    /// Prefix -> namespace, in declaration order
    pub prefixes: IndexMap<String, String>,

    next_blank: usize,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            iri_index: HashMap::new(),
            prefixes: IndexMap::new(),
            next_blank: 0,
        }
    }

    /// Declare a namespace prefix used when serializing
    pub fn set_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Get or create the node for an IRI
    pub fn iri(&mut self, iri: &str) -> NodeIndex {
        if let Some(&idx) = self.iri_index.get(iri) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            term: Term::Iri(iri.to_string()),
        });
        self.iri_index.insert(iri.to_string(), idx);
        idx
    }

    /// Create a fresh blank node
    pub fn blank(&mut self) -> NodeIndex {
        let id = self.next_blank;
        self.next_blank += 1;
        self.graph.add_node(GraphNode {
            term: Term::Blank(id),
        })
    }

    /// Link two existing nodes
    pub fn add_edge(&mut self, from: NodeIndex, predicate: &str, to: NodeIndex) -> EdgeIndex {
        if let Some(existing) = self
            .graph
            .edges(from)
            .find(|e| e.target() == to && e.weight().predicate == predicate)
        {
            return existing.id();
        }
        self.graph.add_edge(
            from,
            to,
            GraphEdge {
                predicate: predicate.to_string(),
            },
        )
    }

    /// Add `subject predicate <object>`
    pub fn add_iri(&mut self, subject: NodeIndex, predicate: &str, object: &str) -> NodeIndex {
        let to = self.iri(object);
        self.add_edge(subject, predicate, to);
        to
    }

    /// Add `subject predicate "literal"`
    pub fn add_literal(&mut self, subject: NodeIndex, predicate: &str, literal: Literal) {
        let term = Term::Literal(literal);
        let exists = self.graph.edges(subject).any(|e| {
            e.weight().predicate == predicate && self.graph[e.target()].term == term
        });
        if exists {
            return;
        }
        let to = self.graph.add_node(GraphNode { term });
        self.add_edge(subject, predicate, to);
    }

    /// Add `subject rdf:type <class>`
    pub fn add_type(&mut self, subject: NodeIndex, class: &str) {
        self.add_iri(subject, crate::vocab::rdf::TYPE, class);
    }

    /// Find node by IRI
    pub fn find_iri(&self, iri: &str) -> Option<NodeIndex> {
        self.iri_index.get(iri).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge (triple) count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for RdfGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RdfGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdfGraph")
            .field("nodes", &self.node_count())
            .field("triples", &self.edge_count())
            .field("prefixes", &self.prefixes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_nodes_are_shared() {
        let mut graph = RdfGraph::new();
        let a = graph.iri("http://example.org/a");
        let again = graph.iri("http://example.org/a");
        assert_eq!(a, again);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_duplicate_triples_are_ignored() {
        let mut graph = RdfGraph::new();
        let s = graph.iri("http://example.org/s");
        graph.add_iri(s, "http://example.org/p", "http://example.org/o");
        graph.add_iri(s, "http://example.org/p", "http://example.org/o");
        graph.add_literal(s, "http://example.org/label", Literal::lang("x", "en"));
        graph.add_literal(s, "http://example.org/label", Literal::lang("x", "en"));
        graph.add_literal(s, "http://example.org/label", Literal::lang("x", "fr"));

        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_blank_nodes_are_distinct() {
        let mut graph = RdfGraph::new();
        let b1 = graph.blank();
        let b2 = graph.blank();
        assert_ne!(b1, b2);
        assert_eq!(graph.get_node(b2).unwrap().term, Term::Blank(1));
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::Iri("http://x/y".into()).to_string(), "<http://x/y>");
        assert_eq!(
            Term::Literal(Literal::integer(42)).to_string(),
            format!("\"42\"^^<{}>", xsd::INTEGER)
        );
        assert_eq!(Term::Literal(Literal::lang("Alpha", "en")).to_string(), "\"Alpha\"@en");
    }
}
