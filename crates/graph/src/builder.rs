use crate::config::UriConfig;
use crate::error::{GraphError, Result};
use crate::scheme::{Concept, ConceptScheme};
use los_tabular::Row;

/// Builds concept schemes from indentation-encoded rows
///
/// Level `k` of the hierarchy lives in columns `(2k, 2k + 1)` = `(code, label)`.
/// A row belongs to the first level whose code cell is filled; its parent is
/// the most recent row seen one level up.
pub struct SchemeBuilder {
    config: UriConfig,
}

impl SchemeBuilder {
    pub fn new(config: UriConfig) -> Self {
        Self { config }
    }

    /// Build a scheme; the first row is a header and is skipped
    ///
    /// Fails on the first row that cannot be placed at a level below
    /// `level_count`, in which case nothing is returned.
    pub fn build(&self, tag: &str, rows: &[Row], level_count: usize) -> Result<ConceptScheme> {
        if level_count == 0 {
            return Err(GraphError::invalid_config("level count must be at least 1"));
        }

        let mut scheme = ConceptScheme::new(tag, level_count, &self.config);
        let mut parent_at: Box<[Option<usize>]> = vec![None; level_count].into_boxed_slice();

        for (offset, row) in rows.iter().enumerate().skip(1) {
            let line = offset + 1;

            if row.iter().all(Option::is_none) {
                log::debug!("{tag}: skipping blank row {line}");
                continue;
            }

            let Some(level) = resolve_level(row, level_count) else {
                return Err(GraphError::malformed_row(
                    line,
                    format!("no code cell in the first {level_count} level(s)"),
                ));
            };

            let code = cell(row, level * 2).unwrap_or_default().to_string();
            let label = cell(row, level * 2 + 1).map(str::to_string);

            let concept = Concept {
                uri: self.config.code_item_uri(tag, &code),
                code,
                label,
                level,
                broader: None,
                narrower: Vec::new(),
                top_concept: level == 0 && level_count > 1,
                focus: None,
            };
            let idx = scheme.push(concept);

            if level > 0 {
                let parent = parent_at[level - 1].ok_or_else(|| {
                    GraphError::malformed_row(
                        line,
                        format!("level {level} code has no level {} ancestor", level - 1),
                    )
                })?;
                scheme.link(parent, idx);
            }

            parent_at[level] = Some(idx);
            parent_at[level + 1..].fill(None);
        }

        log::info!(
            "Built concept scheme '{}': {} concepts, {} levels",
            tag,
            scheme.len(),
            level_count
        );

        Ok(scheme)
    }

    /// Build a single-level scheme from bare codes, sorted
    pub fn build_flat<I>(&self, tag: &str, codes: I) -> ConceptScheme
    where
        I: IntoIterator<Item = String>,
    {
        let mut codes: Vec<String> = codes.into_iter().filter(|c| !c.trim().is_empty()).collect();
        codes.sort();
        codes.dedup();

        let mut scheme = ConceptScheme::new(tag, 1, &self.config);
        for code in codes {
            scheme.push(Concept {
                uri: self.config.code_item_uri(tag, &code),
                code,
                label: None,
                level: 0,
                broader: None,
                narrower: Vec::new(),
                top_concept: false,
                focus: None,
            });
        }

        log::info!("Built flat concept scheme '{}': {} concepts", tag, scheme.len());
        scheme
    }
}

/// Whether a workbook sheet holds a plain code list
///
/// Scope and structure sheets are excluded; only `(code, label)` sheets with a
/// two-cell header are picked up automatically.
pub fn is_code_list_sheet(tag: &str, header_width: usize) -> bool {
    !(tag.contains("scope") || tag.contains("dsd")) && header_width == 2
}

/// Lowest level whose code cell is filled
fn resolve_level(row: &Row, level_count: usize) -> Option<usize> {
    (0..level_count).find(|&level| cell(row, level * 2).is_some())
}

fn cell(row: &Row, column: usize) -> Option<&str> {
    row.get(column)
        .and_then(Option::as_deref)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    fn header(levels: usize) -> Row {
        (0..levels * 2).map(|i| Some(format!("col{i}"))).collect()
    }

    fn builder() -> SchemeBuilder {
        SchemeBuilder::new(UriConfig::default())
    }

    #[test]
    fn test_two_level_example() {
        let rows = vec![
            header(2),
            row(&["A", "Alpha", "", ""]),
            row(&["", "", "A1", "Alpha One"]),
        ];
        let scheme = builder().build("demo", &rows, 2).unwrap();

        let a = scheme.find("A").unwrap();
        let a1 = scheme.find("A1").unwrap();
        assert_eq!(a.level, 0);
        assert!(a.top_concept);
        assert_eq!(a.broader, None);
        assert_eq!(a1.level, 1);
        assert_eq!(scheme.parent_of(a1).unwrap().code, "A");
        assert_eq!(a1.label.as_deref(), Some("Alpha One"));
        assert_eq!(
            a1.uri,
            "http://id.linked-open-statistics.org/codes/demo/A1"
        );
    }

    #[test]
    fn test_deeper_rows_attach_to_latest_ancestor() {
        let rows = vec![
            header(3),
            row(&["EU", "Europe"]),
            row(&["", "", "FR", "France"]),
            row(&["", "", "", "", "FR1", "Ile-de-France"]),
            row(&["", "", "DE", "Germany"]),
            row(&["", "", "", "", "DE1", "Baden"]),
            row(&["W", "World"]),
            row(&["", "", "US", "United States"]),
        ];
        let scheme = builder().build("partner", &rows, 3).unwrap();

        assert_eq!(
            scheme.flatten(),
            vec![
                ("EU".to_string(), 0, None),
                ("FR".to_string(), 1, Some("EU".to_string())),
                ("FR1".to_string(), 2, Some("FR".to_string())),
                ("DE".to_string(), 1, Some("EU".to_string())),
                ("DE1".to_string(), 2, Some("DE".to_string())),
                ("W".to_string(), 0, None),
                ("US".to_string(), 1, Some("W".to_string())),
            ]
        );
        let eu = scheme.find("EU").unwrap();
        assert_eq!(eu.narrower.len(), 2);
    }

    #[test]
    fn test_missing_label_is_tolerated() {
        let rows = vec![header(2), row(&["A"]), row(&["", "", "A1"])];
        let scheme = builder().build("demo", &rows, 2).unwrap();
        assert_eq!(scheme.find("A").unwrap().label, None);
        assert_eq!(scheme.find("A1").unwrap().label, None);
    }

    #[test]
    fn test_single_level_has_no_hierarchy() {
        let rows = vec![header(1), row(&["F", "Female"]), row(&["M", "Male"])];
        let scheme = builder().build("sex", &rows, 1).unwrap();

        assert_eq!(scheme.len(), 2);
        for concept in &scheme.concepts {
            assert_eq!(concept.broader, None);
            assert!(concept.narrower.is_empty());
            assert!(!concept.top_concept);
        }
    }

    #[test]
    fn test_row_beyond_level_count_is_malformed() {
        let rows = vec![header(2), row(&["A", "Alpha"]), row(&["", "", "", "", "X", "Deep"])];
        let err = builder().build("demo", &rows, 2).unwrap_err();
        assert!(matches!(err, GraphError::MalformedRow { row: 3, .. }));
    }

    #[test]
    fn test_orphan_row_is_malformed() {
        let rows = vec![header(2), row(&["", "", "A1", "Orphan"])];
        let err = builder().build("demo", &rows, 2).unwrap_err();
        assert!(matches!(err, GraphError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn test_skipped_level_under_new_top_concept_is_malformed() {
        let rows = vec![
            header(3),
            row(&["EU", "Europe"]),
            row(&["", "", "FR", "France"]),
            row(&["", "", "", "", "FR1", "Ile-de-France"]),
            row(&["W", "World"]),
            row(&["", "", "", "", "X9", "Nowhere"]),
        ];
        let err = builder().build("partner", &rows, 3).unwrap_err();
        assert!(matches!(err, GraphError::MalformedRow { row: 6, .. }));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let rows = vec![header(1), row(&["A", "Alpha"]), row(&["", ""]), row(&["B", "Beta"])];
        let scheme = builder().build("demo", &rows, 1).unwrap();
        assert_eq!(scheme.len(), 2);
    }

    #[test]
    fn test_code_list_sheet_selection() {
        assert!(is_code_list_sheet("unit", 2));
        assert!(!is_code_list_sheet("unit", 4));
        assert!(!is_code_list_sheet("scope", 2));
        assert!(!is_code_list_sheet("dsd-occni", 2));
    }

    #[test]
    fn test_zero_levels_rejected() {
        let err = builder().build("demo", &[header(1)], 0).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig(_)));
    }

    #[test]
    fn test_flat_scheme_sorted_and_deduplicated() {
        let scheme = builder().build_flat(
            "nuts",
            vec!["FR10".to_string(), "DE".to_string(), "FR10".to_string(), " ".to_string()],
        );
        let codes: Vec<_> = scheme.concepts.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["DE", "FR10"]);
        assert!(scheme.concepts.iter().all(|c| c.level == 0 && !c.top_concept));
    }
}
