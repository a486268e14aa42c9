//! Post-build `foaf:focus` links from concepts to external resources.
//!
//! A transform maps a code to the IRI of the thing it denotes. Transforms run
//! after the hierarchy is built and never see rows or levels.

use crate::scheme::ConceptScheme;
use serde::{Deserialize, Serialize};

pub const NACE_R2_GROUPS_BASE: &str = "http://id.insee.fr/codes/nafr2/groupes/";
pub const NUTS_BASE: &str = "http://ec.europa.eu/nuts/";

/// Code -> external resource IRI
pub trait FocusTransform: Send + Sync {
    fn focus_for(&self, code: &str) -> Option<String>;
}

/// NACE Rev. 2 groups: `I551` -> `{base}55.1`
///
/// The section letter is dropped, the division (two digits) and the group
/// digit are joined with a dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaceGroupFocus {
    pub base: String,
}

impl Default for NaceGroupFocus {
    fn default() -> Self {
        Self {
            base: NACE_R2_GROUPS_BASE.to_string(),
        }
    }
}

impl FocusTransform for NaceGroupFocus {
    fn focus_for(&self, code: &str) -> Option<String> {
        let digits: Vec<char> = code.chars().skip(1).take(3).collect();
        if digits.len() < 3 {
            return None;
        }
        let group = format!("{}{}.{}", digits[0], digits[1], digits[2]);
        Some(format!("{}{}", self.base, group.to_lowercase()))
    }
}

/// `{base}{code}`, optionally lowercased: NUTS `FR10` -> `{base}fr10`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFocus {
    pub base: String,
    pub lowercase: bool,
}

impl FocusTransform for PrefixFocus {
    fn focus_for(&self, code: &str) -> Option<String> {
        if code.is_empty() {
            return None;
        }
        let local = if self.lowercase {
            code.to_lowercase()
        } else {
            code.to_string()
        };
        Some(format!("{}{}", self.base, local))
    }
}

/// Which concepts receive a focus link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusScope {
    /// Concepts with a parent
    NonRoot,

    /// Every concept
    All,
}

/// Serializable choice of transform, as written in batch configs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusSpec {
    NaceGroup {
        #[serde(default)]
        base: Option<String>,
    },
    Prefix {
        base: String,
        #[serde(default)]
        lowercase: bool,
    },
}

impl FocusSpec {
    pub fn into_transform(self) -> Box<dyn FocusTransform> {
        match self {
            Self::NaceGroup { base } => Box::new(NaceGroupFocus {
                base: base.unwrap_or_else(|| NACE_R2_GROUPS_BASE.to_string()),
            }),
            Self::Prefix { base, lowercase } => Box::new(PrefixFocus { base, lowercase }),
        }
    }
}

/// Set `focus` on the concepts in scope, returning how many were linked
pub fn apply_focus(
    scheme: &mut ConceptScheme,
    transform: &dyn FocusTransform,
    scope: FocusScope,
) -> usize {
    let mut linked = 0;
    for concept in &mut scheme.concepts {
        if scope == FocusScope::NonRoot && concept.broader.is_none() {
            continue;
        }
        match transform.focus_for(&concept.code) {
            Some(iri) => {
                concept.focus = Some(iri);
                linked += 1;
            }
            None => log::warn!("{}: no focus for code '{}'", scheme.tag, concept.code),
        }
    }

    log::debug!("{}: {} focus links", scheme.tag, linked);
    linked
}
