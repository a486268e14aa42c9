//! # LOS Graph
//!
//! Linked code lists and Data Cube observations built from tabular reference
//! data.
//!
//! ## Features
//!
//! - **Hierarchy inference** - levels and parents from indentation-encoded rows
//! - **SKOS code lists** - concept schemes with broader/narrower links
//! - **Structure definitions** - dimensions, attributes and measures of a record layout
//! - **Observation assembly** - raw records tagged with code list references
//!
//! ## Architecture
//!
//! ```text
//! TabularSource rows
//!     │
//!     ├──> Scheme Builder
//!     │      ├─ Resolve each row's level (first filled code column)
//!     │      ├─ Track the current ancestor per level
//!     │      └─ Emit Concept nodes + broader/narrower edges
//!     │
//!     ├──> Focus transforms (optional, post-build)
//!     │
//!     ├──> Structure Definition
//!     │      └─ Components: Dimension | Attribute | Measure | Temporal
//!     │
//!     ├──> Observation Assembler
//!     │      ├─ Look up each component in the record
//!     │      ├─ Coded values -> code list item references
//!     │      └─ Skip and count records that cannot be assembled
//!     │
//!     └──> RdfGraph (petgraph) -> GraphSink (Turtle)
//! ```

mod assembler;
mod builder;
mod config;
mod error;
mod focus;
mod graph;
mod scheme;
mod sink;
mod structure;
mod types;
pub mod vocab;

pub use assembler::{
    filter_measure, AssembledBatch, AssemblyStats, DatasetRef, Observation, ObservationAssembler,
    ObservationValue,
};
pub use builder::{is_code_list_sheet, SchemeBuilder};
pub use config::{
    capitalize, dataset_id, dataset_name, normalize_tag, AssemblerConfig, ObservationIdentity,
    UriConfig, DEFAULT_BASE_URI,
};
pub use error::{GraphError, Result};
pub use focus::{
    apply_focus, FocusScope, FocusSpec, FocusTransform, NaceGroupFocus, PrefixFocus,
    NACE_R2_GROUPS_BASE, NUTS_BASE,
};
pub use scheme::{Concept, ConceptScheme};
pub use sink::{render_turtle, GraphSink, MemorySink, TurtleSink};
pub use structure::{
    Attachment, CodeListRegistry, Component, ComponentRole, ComponentSpec, MeasureSpec,
    StructureDefinition,
};
pub use types::{GraphEdge, GraphNode, Literal, RdfGraph, Term};
