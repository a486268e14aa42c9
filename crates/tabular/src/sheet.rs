use crate::error::{Result, TabularError};
use crate::types::{normalize_cell, Row, TabularSource};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Spreadsheet workbook (.xls, .xlsx, .ods)
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|e| {
            TabularError::workbook(format!("Failed to open {}: {e}", path.display()))
        })?;
        Ok(Self { path, sheets })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Materialize one sheet
    pub fn sheet(&mut self, name: &str) -> Result<SheetSource> {
        if !self.sheet_names().iter().any(|s| s == name) {
            return Err(TabularError::SheetNotFound(name.to_string()));
        }

        let range = self.sheets.worksheet_range(name).map_err(|e| {
            TabularError::workbook(format!("Failed to read sheet '{name}': {e}"))
        })?;

        Ok(SheetSource {
            name: format!("{}#{}", self.path.display(), name),
            sheet: name.to_string(),
            rows: range_to_rows(&range),
        })
    }
}

/// Rows of one workbook sheet
#[derive(Debug, Clone)]
pub struct SheetSource {
    name: String,
    sheet: String,
    rows: Vec<Row>,
}

impl SheetSource {
    /// Build from already extracted rows
    pub fn from_rows(sheet: impl Into<String>, rows: Vec<Row>) -> Self {
        let sheet = sheet.into();
        Self {
            name: sheet.clone(),
            sheet,
            rows,
        }
    }

    /// Sheet name as stored in the workbook
    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Number of cells in the header row, trailing blanks excluded
    pub fn header_width(&self) -> usize {
        self.rows
            .first()
            .map(|header| {
                header
                    .iter()
                    .rposition(Option::is_some)
                    .map_or(0, |last| last + 1)
            })
            .unwrap_or(0)
    }
}

impl TabularSource for SheetSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }
}

/// Convert a calamine range into positional rows
///
/// calamine ranges start at the first used cell; leading empty columns are
/// padded back so column indexes match the sheet.
fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let leading = range.start().map_or(0, |(_, col)| col as usize);

    range
        .rows()
        .map(|cells| {
            let mut row: Row = vec![None; leading];
            row.extend(cells.iter().map(data_to_cell));
            row
        })
        .collect()
}

fn data_to_cell(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => normalize_cell(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(format_float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => normalize_cell(s),
        Data::Error(e) => {
            log::warn!("Cell error {e:?} read as blank");
            None
        }
    }
}

/// Integral floats print without a fractional part ("10", not "10.0")
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(10.0), "10");
        assert_eq!(format_float(-3.0), "-3");
        assert_eq!(format_float(2.5), "2.5");
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Empty), None);
        assert_eq!(data_to_cell(&Data::String("  ".into())), None);
        assert_eq!(data_to_cell(&Data::String(" I55 ".into())), Some("I55".into()));
        assert_eq!(data_to_cell(&Data::Int(7)), Some("7".into()));
        assert_eq!(data_to_cell(&Data::Float(551.0)), Some("551".into()));
    }

    #[test]
    fn test_range_padding_restores_column_offsets() {
        let mut range = Range::new((0, 2), (1, 3));
        range.set_value((0, 2), Data::String("code".into()));
        range.set_value((0, 3), Data::String("label".into()));
        range.set_value((1, 2), Data::String("A1".into()));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], None);
        assert_eq!(rows[1][1], None);
        assert_eq!(rows[1][2].as_deref(), Some("A1"));
        assert_eq!(rows[1][3], None);
    }

    #[test]
    fn test_header_width() {
        let sheet = SheetSource::from_rows(
            "SEX",
            vec![
                vec![Some("code".into()), Some("label".into()), None],
                vec![Some("F".into()), Some("Female".into())],
            ],
        );
        assert_eq!(sheet.header_width(), 2);
        assert_eq!(sheet.sheet_name(), "SEX");
    }

    #[test]
    fn test_open_missing_workbook_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workbook::open(dir.path().join("missing.xls"));
        assert!(matches!(result, Err(TabularError::Workbook(_))));
    }
}
