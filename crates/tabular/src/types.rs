use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One positional row: cell `i` is column `i`, `None` when blank or missing
pub type Row = Vec<Option<String>>;

/// A sequence of rows whose first row is a header
pub trait TabularSource {
    /// Human readable name (file path, `file#sheet`, ...)
    fn name(&self) -> &str;

    /// All rows, header included
    fn rows(&self) -> Result<Vec<Row>>;
}

/// Trim a raw cell, mapping whitespace-only content to `None`
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Header-keyed view of one data line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based line number in the source (header is line 1)
    pub line: usize,

    /// Field name -> raw value, in header order
    pub fields: IndexMap<String, String>,
}

impl Record {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: IndexMap::new(),
        }
    }

    /// Builder: add a field
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Exact field lookup
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field lookup ignoring ASCII case, exact match preferred
    pub fn get_ignore_case(&self, field: &str) -> Option<&str> {
        self.get(field).or_else(|| {
            self.fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(field))
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Distinct non-blank values of `column`, header excluded, sorted
pub fn distinct_column(source: &dyn TabularSource, column: usize) -> Result<BTreeSet<String>> {
    let rows = source.rows()?;
    let values: BTreeSet<String> = rows
        .into_iter()
        .skip(1)
        .filter_map(|row| row.into_iter().nth(column).flatten())
        .collect();

    log::debug!(
        "{}: {} distinct values in column {}",
        source.name(),
        values.len(),
        column
    );

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Row>);

    impl TabularSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn rows(&self) -> Result<Vec<Row>> {
            Ok(self.0.clone())
        }
    }

    fn cell(v: &str) -> Option<String> {
        normalize_cell(v)
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("  FR10 "), Some("FR10".to_string()));
        assert_eq!(normalize_cell("   "), None);
        assert_eq!(normalize_cell(""), None);
    }

    #[test]
    fn test_record_lookup_ignores_case() {
        let record = Record::new(2).with("Nuts", "FR10").with("OBS_VALUE", "42");

        assert_eq!(record.get("NUTS"), None);
        assert_eq!(record.get_ignore_case("NUTS"), Some("FR10"));
        assert_eq!(record.get_ignore_case("obs_value"), Some("42"));
        assert_eq!(record.get_ignore_case("UNIT"), None);
    }

    #[test]
    fn test_distinct_column_skips_header_and_blanks() {
        let source = Fixed(vec![
            vec![cell("A"), cell("B"), cell("GEO")],
            vec![cell("x"), None, cell("FR10")],
            vec![cell("y"), None, cell("FR10")],
            vec![cell("z"), None, None],
            vec![cell("w")],
            vec![cell("v"), None, cell("DE")],
        ]);

        let values = distinct_column(&source, 2).unwrap();
        let values: Vec<_> = values.into_iter().collect();
        assert_eq!(values, vec!["DE".to_string(), "FR10".to_string()]);
    }
}
