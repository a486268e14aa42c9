use los_tabular::TabularError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// A code list row cannot be placed in the hierarchy
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// A record lacks a field required by a component
    #[error("Record at line {line} is missing field '{field}'")]
    MissingField { line: usize, field: String },

    /// The measure value is not numeric
    #[error("Record at line {line}: measure '{field}' value '{value}' is not an integer")]
    MeasureParse {
        line: usize,
        field: String,
        value: String,
    },

    /// A structure definition points at a code list that was never built
    #[error("Component '{component}' references unknown code list '{code_list}'")]
    UnresolvedComponent { component: String, code_list: String },

    /// An IRI, blank node or language tag cannot be written as RDF
    #[error("Invalid RDF term '{term}': {reason}")]
    InvalidTerm { term: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tabular source error: {0}")]
    Tabular(#[from] TabularError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub fn malformed_row(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            reason: reason.into(),
        }
    }

    pub fn invalid_term(term: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidTerm {
            term: term.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Record-level errors reject one record; everything else aborts the run
    pub const fn is_record_level(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::MeasureParse { .. })
    }

    /// Short stable label used when counting skipped records
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRow { .. } => "malformed_row",
            Self::MissingField { .. } => "missing_field",
            Self::MeasureParse { .. } => "measure_parse",
            Self::UnresolvedComponent { .. } => "unresolved_component",
            Self::InvalidTerm { .. } => "invalid_term",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Tabular(_) => "tabular",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
