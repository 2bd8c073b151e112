//! Row normalization: structure strings into molecules, failures into
//! per-row markers.

use molscreen_chem::{parse_smiles, Molecule};

use crate::loader::InputRow;

/// One normalized input row. `molecule` is present iff parsing succeeded;
/// otherwise `parse_error` captures the reason. Either way the row keeps
/// its place in the batch.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub identity: String,
    pub name: Option<String>,
    pub molecule: Option<Molecule>,
    pub parse_error: Option<String>,
}

impl ParsedInput {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.molecule.is_some()
    }
}

/// Normalize one row. Total: every input produces a `ParsedInput`, never a
/// panic or an early return, so one bad row cannot abort a batch.
pub fn normalize_row(row: &InputRow) -> ParsedInput {
    match parse_smiles(&row.structure) {
        Ok(molecule) => ParsedInput {
            identity: row.structure.clone(),
            name: row.name.clone(),
            molecule: Some(molecule),
            parse_error: None,
        },
        Err(e) => ParsedInput {
            identity: row.structure.clone(),
            name: row.name.clone(),
            molecule: None,
            parse_error: Some(e.to_string()),
        },
    }
}

/// Normalize a slice of rows, preserving order.
pub fn normalize_rows(rows: &[InputRow]) -> Vec<ParsedInput> {
    rows.iter().map(normalize_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(structure: &str) -> InputRow {
        InputRow {
            structure: structure.to_string(),
            name: None,
        }
    }

    #[test]
    fn valid_row_carries_molecule() {
        let parsed = normalize_row(&row("CCO"));
        assert!(parsed.is_valid());
        assert!(parsed.parse_error.is_none());
        assert_eq!(parsed.identity, "CCO");
    }

    #[test]
    fn invalid_row_carries_reason_not_panic() {
        let parsed = normalize_row(&row("not_a_smiles(("));
        assert!(!parsed.is_valid());
        assert!(parsed.parse_error.is_some());
    }

    #[test]
    fn mixed_batch_preserves_order_and_count() {
        let rows = vec![row("CCO"), row("][invalid"), row("c1ccccc1")];
        let parsed = normalize_rows(&rows);
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_valid());
        assert!(!parsed[1].is_valid());
        assert!(parsed[2].is_valid());
        assert_eq!(parsed[1].identity, "][invalid");
    }
}
