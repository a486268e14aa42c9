use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_BASE_URI: &str = "http://id.linked-open-statistics.org/";

/// URI layout of every generated resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UriConfig {
    /// Root for datasets, observations and structure definitions
    pub base: String,

    /// Root for concept schemes and their concepts
    pub codes_base: String,

    /// Root for concept classes and ad-hoc concepts
    pub concepts_base: String,

    /// Root for component properties (`{meta}/{type}/{code}`)
    pub meta_base: String,

    /// Language tag put on labels
    pub label_lang: String,
}

impl Default for UriConfig {
    fn default() -> Self {
        Self::with_base(DEFAULT_BASE_URI)
    }
}

impl UriConfig {
    /// Derive every base from a single root
    pub fn with_base(base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        Self {
            codes_base: format!("{base}codes/"),
            concepts_base: format!("{base}concepts/"),
            meta_base: format!("{base}meta/"),
            base,
            label_lang: "en".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base", &self.base),
            ("codes_base", &self.codes_base),
            ("concepts_base", &self.concepts_base),
            ("meta_base", &self.meta_base),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(GraphError::invalid_config(format!(
                    "{name} must be an absolute http(s) URI, got '{value}'"
                )));
            }
            if !value.ends_with('/') {
                return Err(GraphError::invalid_config(format!(
                    "{name} must end with '/', got '{value}'"
                )));
            }
        }

        if self.label_lang.trim().is_empty() {
            return Err(GraphError::invalid_config("label_lang must not be empty"));
        }

        Ok(())
    }

    pub fn scheme_uri(&self, tag: &str) -> String {
        format!("{}{}", self.codes_base, tag.to_lowercase())
    }

    pub fn code_item_uri(&self, tag: &str, code: &str) -> String {
        format!("{}{}/{}", self.codes_base, tag.to_lowercase(), code)
    }

    /// Root concept class of a scheme
    pub fn concept_class_uri(&self, name: &str) -> String {
        format!("{}{}", self.concepts_base, capitalize(name))
    }

    /// Ad-hoc concept declared by a structure definition
    pub fn concept_uri(&self, code: &str) -> String {
        format!("{}{}", self.concepts_base, code)
    }

    pub fn component_uri(&self, component_type: &str, code: &str) -> String {
        format!("{}{}/{}", self.meta_base, component_type, code.to_lowercase())
    }

    pub fn dataset_uri(&self, dataset_id: &str) -> String {
        format!("{}dataSet/{}", self.base, dataset_id)
    }

    pub fn observation_uri(&self, key: &str) -> String {
        format!("{}observation/{}", self.base, key)
    }

    pub fn dsd_uri(&self, dsd_id: &str) -> String {
        format!("{}dsd/{}", self.base, dsd_id)
    }
}

/// How an observation's identifier is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationIdentity {
    /// Raw measure value, as in the legacy datasets. Distinct records sharing a
    /// value collide on the same observation.
    #[default]
    MeasureValue,

    /// Hash of the dataset id and every non-measure component value
    DimensionHash,
}

/// Field conventions of observation records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub identity: ObservationIdentity,

    /// Field selecting which measure a line carries
    pub measure_field: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            identity: ObservationIdentity::MeasureValue,
            measure_field: "MEASURE".to_string(),
        }
    }
}

/// Upper-case the first character
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn a sheet name into a code list tag: trimmed, lowercased, spaces become
/// dashes, accents are stripped after canonical decomposition, other non-ASCII
/// is dropped
pub fn normalize_tag(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .nfd()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

/// Dataset id for one (dataset family, measure) run: `tourism-degurba-occarr`
pub fn dataset_id(family: &str, dataset_type: &str, measure: &str) -> String {
    format!("{family}-{}", dataset_name(dataset_type, measure))
}

/// `{type}-{measure lowercased, without underscores}`, shared by DSD and
/// dataset file names
pub fn dataset_name(dataset_type: &str, measure: &str) -> String {
    format!("{dataset_type}-{}", measure.replace('_', "").to_lowercase())
}
