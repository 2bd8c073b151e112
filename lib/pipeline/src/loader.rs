//! CSV ingestion.
//!
//! The loader guarantees the pipeline an ordered sequence of
//! (structure, optional name) rows. Headers are matched case-insensitively
//! after trimming; the structure column is required and its absence is a
//! configuration error raised before any processing starts. Rows with an
//! empty structure cell are dropped, mirroring upstream data-cleaning
//! behavior.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Column accepted as the structure column.
const STRUCTURE_COLUMN: &str = "smiles";

/// Columns accepted as the display-name column, first match wins.
const NAME_COLUMNS: &[&str] = &["name", "label", "nama", "nama_kontrol"];

/// One input row: the structure string is the row's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub structure: String,
    pub name: Option<String>,
}

/// Load candidate or reference rows from a CSV file.
pub fn load_structures(path: &Path) -> Result<Vec<InputRow>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let structure_idx = normalized
        .iter()
        .position(|h| h == STRUCTURE_COLUMN)
        .ok_or_else(|| PipelineError::MissingColumn {
            path: path.to_path_buf(),
            column: "smiles",
        })?;

    let name_idx = NAME_COLUMNS
        .iter()
        .find_map(|candidate| normalized.iter().position(|h| h == candidate));

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let structure = record
            .get(structure_idx)
            .map(str::trim)
            .unwrap_or_default();
        if structure.is_empty() {
            dropped += 1;
            continue;
        }
        let name = name_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        rows.push(InputRow {
            structure: structure.to_string(),
            name,
        });
    }

    if dropped > 0 {
        debug!(path = %path.display(), dropped, "dropped rows with empty structure");
    }
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput(path.to_path_buf()));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_order() {
        let file = csv_file("smiles,name\nCCO,ethanol\nc1ccccc1,benzene\n");
        let rows = load_structures(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].structure, "CCO");
        assert_eq!(rows[0].name.as_deref(), Some("ethanol"));
        assert_eq!(rows[1].structure, "c1ccccc1");
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let file = csv_file(" SMILES ,Name\nCCO,ethanol\n");
        let rows = load_structures(file.path()).unwrap();
        assert_eq!(rows[0].structure, "CCO");
    }

    #[test]
    fn missing_structure_column_is_config_error() {
        let file = csv_file("structure,name\nCCO,ethanol\n");
        let err = load_structures(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn empty_structure_rows_are_dropped() {
        let file = csv_file("smiles\nCCO\n\nc1ccccc1\n,\n");
        let rows = load_structures(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn all_empty_is_an_error() {
        let file = csv_file("smiles\n\n\n");
        let err = load_structures(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput(_)));
    }

    #[test]
    fn name_column_is_optional() {
        let file = csv_file("smiles\nCCO\n");
        let rows = load_structures(file.path()).unwrap();
        assert!(rows[0].name.is_none());
    }

    #[test]
    fn alternate_name_headers_are_recognized() {
        let file = csv_file("smiles,nama_kontrol\nCCO,kontrol_a\n");
        let rows = load_structures(file.path()).unwrap();
        assert_eq!(rows[0].name.as_deref(), Some("kontrol_a"));
    }
}
