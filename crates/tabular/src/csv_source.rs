use crate::error::Result;
use crate::types::{normalize_cell, Record, Row, TabularSource};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::{Path, PathBuf};

/// Delimited text source
#[derive(Debug, Clone)]
pub struct CsvSource {
    name: String,
    content: String,
    delimiter: u8,
}

impl CsvSource {
    /// Read a comma-delimited file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        Ok(Self {
            name: path.display().to_string(),
            content,
            delimiter: b',',
        })
    }

    /// Wrap in-memory content
    pub fn from_string(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            delimiter: b',',
        }
    }

    /// Builder: set the field delimiter
    #[must_use]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn reader(&self, has_headers: bool) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(self.content.as_bytes())
    }

    /// Header-keyed records, one per data line
    ///
    /// Lines shorter than the header simply lack the trailing fields.
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut reader = self.reader(true);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let raw: StringRecord = result?;
            let mut record = Record::new(idx + 2);
            for (name, value) in headers.iter().zip(raw.iter()) {
                record.fields.insert(name.clone(), value.to_string());
            }
            records.push(record);
        }

        log::debug!("{}: read {} records", self.name, records.len());
        Ok(records)
    }
}

impl TabularSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> Result<Vec<Row>> {
        let mut reader = self.reader(false);
        let mut rows = Vec::new();
        for result in reader.records() {
            let raw = result?;
            rows.push(raw.iter().map(normalize_cell).collect());
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOURISM: &str = "\
MEASURE,NUTS,NACE_R2,TIME_PERIOD,OBS_VALUE
occ_arr,FR10,I551,2016,42
occ_ni,FR10,I551,2016,118
occ_arr,FR21,I552
";

    #[test]
    fn test_rows_keep_header_and_blank_cells() {
        let source = CsvSource::from_string("codes.csv", "code,label,code2,label2\nA,Alpha,,\n,,A1, Alpha One \n");
        let rows = source.rows().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            vec![Some("A".to_string()), Some("Alpha".to_string()), None, None]
        );
        assert_eq!(
            rows[2],
            vec![None, None, Some("A1".to_string()), Some("Alpha One".to_string())]
        );
    }

    #[test]
    fn test_records_are_header_keyed() {
        let source = CsvSource::from_string("tourism.csv", TOURISM);
        let records = source.records().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].get("NUTS"), Some("FR10"));
        assert_eq!(records[1].get("OBS_VALUE"), Some("118"));
        // short line: trailing fields absent
        assert_eq!(records[2].get("NACE_R2"), Some("I552"));
        assert_eq!(records[2].get("OBS_VALUE"), None);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let source = CsvSource::from_string("semi.csv", "A;B\n1;2\n").delimiter(b';');
        let records = source.records().unwrap();
        assert_eq!(records[0].get("B"), Some("2"));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, TOURISM).unwrap();

        let source = CsvSource::from_path(&path).unwrap();
        assert!(source.name().ends_with("data.csv"));
        assert_eq!(source.rows().unwrap().len(), 4);
    }
}
