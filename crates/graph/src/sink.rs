//! Graph persistence: the `GraphSink` seam and Turtle output through oxigraph.

use crate::error::{GraphError, Result};
use crate::types::{Literal, RdfGraph, Term};
use indexmap::IndexMap;
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model as ox;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::path::{Path, PathBuf};

/// Accepts a built graph and persists it under a destination name
pub trait GraphSink {
    fn write(&mut self, graph: &RdfGraph, destination: &str) -> Result<()>;
}

/// Writes `{dir}/{destination}.ttl`
#[derive(Debug, Clone)]
pub struct TurtleSink {
    dir: PathBuf,
}

impl TurtleSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.dir.join(format!("{destination}.ttl"))
    }
}

impl GraphSink for TurtleSink {
    fn write(&mut self, graph: &RdfGraph, destination: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let turtle = render_turtle(graph)?;
        let path = self.path_for(destination);
        std::fs::write(&path, turtle)?;
        log::info!("Wrote {} ({} triples)", path.display(), graph.edge_count());
        Ok(())
    }
}

/// Keeps rendered documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: IndexMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, destination: &str) -> Option<&str> {
        self.documents.get(destination).map(String::as_str)
    }
}

impl GraphSink for MemorySink {
    fn write(&mut self, graph: &RdfGraph, destination: &str) -> Result<()> {
        let turtle = render_turtle(graph)?;
        self.documents.insert(destination.to_string(), turtle);
        Ok(())
    }
}

/// Render a graph as Turtle
///
/// Subjects come in node order, predicates in first-use order per subject.
/// Terms that are not valid RDF (an IRI with a space, a bad language tag)
/// fail the whole document.
pub fn render_turtle(graph: &RdfGraph) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
    for (prefix, ns) in &graph.prefixes {
        serializer = serializer
            .with_prefix(prefix.as_str(), ns.as_str())
            .map_err(|e| GraphError::invalid_term(ns.as_str(), e))?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for (idx, node) in graph.subjects() {
        let subject: ox::NamedOrBlankNode = match &node.term {
            Term::Iri(iri) => named_node(iri)?.into(),
            Term::Blank(id) => blank_node(*id)?.into(),
            Term::Literal(_) => continue,
        };

        let mut grouped: IndexMap<&str, Vec<NodeIndex>> = IndexMap::new();
        for (predicate, target) in ordered_edges(graph, idx) {
            grouped.entry(predicate).or_default().push(target);
        }

        for (predicate, targets) in grouped {
            let predicate = named_node(predicate)?;
            for target in targets {
                let object = to_ox_term(&graph.graph[target].term)?;
                let triple = ox::Triple::new(subject.clone(), predicate.clone(), object);
                writer.serialize_triple(&triple)?;
            }
        }
    }

    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(|e| GraphError::Io(std::io::Error::other(e)))
}

fn ordered_edges(graph: &RdfGraph, idx: NodeIndex) -> Vec<(&str, NodeIndex)> {
    let mut edges: Vec<_> = graph.graph.edges(idx).collect();
    edges.sort_by_key(|e| e.id().index());
    edges
        .into_iter()
        .map(|e| (e.weight().predicate.as_str(), e.target()))
        .collect()
}

fn named_node(iri: &str) -> Result<ox::NamedNode> {
    ox::NamedNode::new(iri).map_err(|e| GraphError::invalid_term(iri, e))
}

fn blank_node(id: usize) -> Result<ox::BlankNode> {
    let id = format!("b{id}");
    ox::BlankNode::new(id.as_str()).map_err(|e| GraphError::invalid_term(id, e))
}

fn to_ox_term(term: &Term) -> Result<ox::Term> {
    Ok(match term {
        Term::Iri(iri) => named_node(iri)?.into(),
        Term::Blank(id) => blank_node(*id)?.into(),
        Term::Literal(literal) => to_ox_literal(literal)?.into(),
    })
}

fn to_ox_literal(literal: &Literal) -> Result<ox::Literal> {
    match (&literal.lang, &literal.datatype) {
        (Some(lang), _) => {
            ox::Literal::new_language_tagged_literal(literal.value.as_str(), lang.as_str())
                .map_err(|e| GraphError::invalid_term(lang.as_str(), e))
        }
        (None, Some(datatype)) => Ok(ox::Literal::new_typed_literal(
            literal.value.as_str(),
            named_node(datatype)?,
        )),
        (None, None) => Ok(ox::Literal::new_simple_literal(literal.value.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{rdf, skos, xsd};
    use oxigraph::io::RdfParser;
    use pretty_assertions::assert_eq;

    fn sample() -> RdfGraph {
        let mut graph = RdfGraph::new();
        graph.set_prefix("skos", skos::NS);
        graph.set_prefix("xsd", xsd::NS);
        let scheme = graph.iri("http://example.org/codes/sex");
        graph.add_type(scheme, skos::CONCEPT_SCHEME);
        graph.add_literal(scheme, skos::PREF_LABEL, Literal::lang("Sex \"code\"", "en"));
        graph.add_literal(scheme, skos::NOTATION, Literal::string("sex"));
        let f = graph.iri("http://example.org/codes/sex/F");
        graph.add_type(f, skos::CONCEPT);
        graph.add_iri(f, skos::IN_SCHEME, "http://example.org/codes/sex");
        graph
    }

    fn parse(turtle: &str) -> Vec<ox::Triple> {
        RdfParser::from_format(RdfFormat::Turtle)
            .for_reader(turtle.as_bytes())
            .map(|quad| ox::Triple::from(quad.unwrap()))
            .collect()
    }

    #[test]
    fn test_render_turtle_parses_back() {
        let turtle = render_turtle(&sample()).unwrap();
        assert!(turtle.starts_with("@prefix skos: <http://www.w3.org/2004/02/skos/core#> ."));

        let triples = parse(&turtle);
        assert_eq!(triples.len(), 5);

        let scheme = ox::NamedNode::new("http://example.org/codes/sex").unwrap();
        let label = ox::Literal::new_language_tagged_literal("Sex \"code\"", "en").unwrap();
        assert!(triples.contains(&ox::Triple::new(
            scheme.clone(),
            ox::NamedNode::new(skos::PREF_LABEL).unwrap(),
            label,
        )));
        assert!(triples.contains(&ox::Triple::new(
            scheme,
            ox::NamedNode::new(rdf::TYPE).unwrap(),
            ox::NamedNode::new(skos::CONCEPT_SCHEME).unwrap(),
        )));
    }

    #[test]
    fn test_blank_nodes_and_shared_predicates() {
        let mut graph = RdfGraph::new();
        let s = graph.iri("http://example.org/s");
        graph.add_iri(s, "http://example.org/p", "http://example.org/a");
        graph.add_iri(s, "http://example.org/p", "http://example.org/b");
        let b = graph.blank();
        graph.add_edge(s, "http://example.org/q", b);
        graph.add_literal(b, "http://example.org/r", Literal::integer(7));

        let triples = parse(&render_turtle(&graph).unwrap());
        assert_eq!(triples.len(), 4);
        let blank_objects = triples
            .iter()
            .filter(|t| matches!(t.object, ox::Term::BlankNode(_)))
            .count();
        assert_eq!(blank_objects, 1);
    }

    #[test]
    fn test_invalid_iri_is_rejected() {
        let mut graph = RdfGraph::new();
        let scheme = graph.iri("http://example.org/codes/nuts");
        graph.add_iri(scheme, skos::NARROWER, "http://example.org/codes/nuts/FR 10");

        let err = render_turtle(&graph).unwrap_err();
        assert!(matches!(err, GraphError::InvalidTerm { .. }));
        assert!(err.to_string().contains("FR 10"));
    }

    #[test]
    fn test_invalid_language_tag_is_rejected() {
        let mut graph = RdfGraph::new();
        let s = graph.iri("http://example.org/s");
        graph.add_literal(s, skos::PREF_LABEL, Literal::lang("x", "not a tag"));
        assert!(matches!(
            render_turtle(&graph),
            Err(GraphError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_turtle_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TurtleSink::new(dir.path().join("out"));
        sink.write(&sample(), "cl-sex").unwrap();

        let written = std::fs::read_to_string(dir.path().join("out/cl-sex.ttl")).unwrap();
        assert_eq!(written, render_turtle(&sample()).unwrap());
    }

    #[test]
    fn test_turtle_sink_leaves_no_file_on_invalid_graph() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = RdfGraph::new();
        let s = graph.iri("http://example.org/s p");
        graph.add_type(s, skos::CONCEPT);

        let mut sink = TurtleSink::new(dir.path());
        assert!(sink.write(&graph, "cl-bad").is_err());
        assert!(!sink.path_for("cl-bad").exists());
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write(&sample(), "cl-sex").unwrap();
        assert!(sink.get("cl-sex").unwrap().contains("inScheme"));
        assert_eq!(sink.get("cl-other"), None);
    }
}
