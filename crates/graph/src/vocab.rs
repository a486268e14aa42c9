//! Vocabulary IRIs used by the generated graphs.
//!
//! Covers the parts of RDF, RDFS, OWL, SKOS, FOAF, Dublin Core, XSD, the SDMX
//! dimension vocabulary and the W3C Data Cube vocabulary that the builders emit.

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
}

pub mod owl {
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
}

pub mod skos {
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
    pub const NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
}

pub mod foaf {
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";
    pub const FOCUS: &str = "http://xmlns.com/foaf/0.1/focus";
}

pub mod dc {
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";
    pub const DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";
}

pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
}

pub mod sdmx_dimension {
    pub const NS: &str = "http://purl.org/linked-data/sdmx/2009/dimension#";
    pub const TIME_PERIOD: &str = "http://purl.org/linked-data/sdmx/2009/dimension#timePeriod";
}

/// W3C Data Cube vocabulary
pub mod qb {
    pub const NS: &str = "http://purl.org/linked-data/cube#";

    pub const ATTRIBUTE_PROPERTY: &str = "http://purl.org/linked-data/cube#AttributeProperty";
    pub const CODED_PROPERTY: &str = "http://purl.org/linked-data/cube#CodedProperty";
    pub const COMPONENT_SPECIFICATION: &str =
        "http://purl.org/linked-data/cube#ComponentSpecification";
    pub const DATA_SET: &str = "http://purl.org/linked-data/cube#DataSet";
    pub const DATA_STRUCTURE_DEFINITION: &str =
        "http://purl.org/linked-data/cube#DataStructureDefinition";
    pub const DIMENSION_PROPERTY: &str = "http://purl.org/linked-data/cube#DimensionProperty";
    pub const MEASURE_PROPERTY: &str = "http://purl.org/linked-data/cube#MeasureProperty";
    pub const OBSERVATION: &str = "http://purl.org/linked-data/cube#Observation";

    pub const ATTRIBUTE: &str = "http://purl.org/linked-data/cube#attribute";
    pub const CODE_LIST: &str = "http://purl.org/linked-data/cube#codeList";
    pub const COMPONENT: &str = "http://purl.org/linked-data/cube#component";
    pub const COMPONENT_ATTACHMENT: &str = "http://purl.org/linked-data/cube#componentAttachment";
    pub const CONCEPT: &str = "http://purl.org/linked-data/cube#concept";
    pub const DATA_SET_PROPERTY: &str = "http://purl.org/linked-data/cube#dataSet";
    pub const DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
    pub const MEASURE: &str = "http://purl.org/linked-data/cube#measure";
    pub const STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
}
