//! The result table.
//!
//! One row per candidate, in input order, every column present in every
//! row. Column semantics:
//!
//! - `SMILES`, `Name` - the row's identity and optional display name
//! - `Valid` - whether the structure parsed
//! - `MW`, `LogP`, `HBD`, `HBA`, `TPSA`, `RotB`, `QED`, `Fsp3`, `Rings`,
//!   `AromaticRings` - descriptor profile (empty for invalid rows)
//! - `RuleCompliant`, `Violations` - extended Rule-of-Five outcome
//! - `Tanimoto_<ref>`, `Maccs_<ref>`, `Cosine_<ref>` - per-reference
//!   similarity in each space, rounded to three decimals
//! - `Tanimoto_Best`, `Tanimoto_BestRef`, `Tanimoto_Mean` (and the same
//!   for `Maccs`/`Cosine`) - the per-candidate reductions
//! - `DTI_Score` - external predictor score, when available
//! - `Error` - the row's failure reason, empty when everything succeeded
//!
//! Unavailable values are empty cells, never zeros.

use std::path::Path;

use csv::Writer;
use molscreen_similarity::SimilarityResult;

use crate::aggregate::CompoundRecord;
use crate::error::Result;

const SPACE_LABELS: [&str; 3] = ["Tanimoto", "Maccs", "Cosine"];

/// Write the final table as CSV.
pub fn write_table(
    path: &Path,
    records: &[CompoundRecord],
    reference_names: &[String],
) -> Result<()> {
    let mut writer = Writer::from_path(path).map_err(|source| crate::error::PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    writer
        .write_record(header(reference_names))
        .map_err(|source| crate::error::PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    for record in records {
        writer
            .write_record(row(record, reference_names.len()))
            .map_err(|source| crate::error::PipelineError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush()?;
    Ok(())
}

fn header(reference_names: &[String]) -> Vec<String> {
    let mut columns = vec![
        "SMILES".to_string(),
        "Name".to_string(),
        "Valid".to_string(),
        "MW".to_string(),
        "LogP".to_string(),
        "HBD".to_string(),
        "HBA".to_string(),
        "TPSA".to_string(),
        "RotB".to_string(),
        "QED".to_string(),
        "Fsp3".to_string(),
        "Rings".to_string(),
        "AromaticRings".to_string(),
        "RuleCompliant".to_string(),
        "Violations".to_string(),
    ];
    for label in SPACE_LABELS {
        for name in reference_names {
            columns.push(format!("{label}_{name}"));
        }
    }
    for label in SPACE_LABELS {
        columns.push(format!("{label}_Best"));
        columns.push(format!("{label}_BestRef"));
        columns.push(format!("{label}_Mean"));
    }
    columns.push("DTI_Score".to_string());
    columns.push("Error".to_string());
    columns
}

fn row(record: &CompoundRecord, n_references: usize) -> Vec<String> {
    let mut cells = vec![
        record.identity.clone(),
        record.name.clone().unwrap_or_default(),
        record.valid.to_string(),
    ];

    match &record.properties {
        Some(p) => {
            cells.push(format!("{:.2}", p.molecular_weight));
            cells.push(format!("{:.2}", p.logp));
            cells.push(p.hbd.to_string());
            cells.push(p.hba.to_string());
            cells.push(format!("{:.2}", p.tpsa));
            cells.push(p.rotatable_bonds.to_string());
            cells.push(format!("{:.3}", p.qed));
            cells.push(format!("{:.3}", p.fraction_csp3));
            cells.push(p.ring_count.to_string());
            cells.push(p.aromatic_ring_count.to_string());
            cells.push(p.compliant.to_string());
            cells.push(p.violations.to_string());
        }
        None => cells.extend(std::iter::repeat(String::new()).take(12)),
    }

    for result in [&record.morgan, &record.maccs, &record.embedding] {
        cells.extend(per_reference_cells(result, n_references));
    }
    for result in [&record.morgan, &record.maccs, &record.embedding] {
        cells.extend(summary_cells(result));
    }

    cells.push(
        record
            .dti_score
            .map(|s| format!("{s:.3}"))
            .unwrap_or_default(),
    );
    cells.push(record.error.clone().unwrap_or_default());
    cells
}

fn per_reference_cells(result: &Option<SimilarityResult>, n_references: usize) -> Vec<String> {
    match result {
        Some(r) => r
            .per_reference
            .iter()
            .map(|score| format!("{score:.3}"))
            .collect(),
        None => vec![String::new(); n_references],
    }
}

fn summary_cells(result: &Option<SimilarityResult>) -> Vec<String> {
    match result {
        Some(r) => vec![
            format!("{:.3}", r.best_score),
            r.best_reference.clone(),
            format!("{:.3}", r.mean_score),
        ],
        None => vec![String::new(); 3],
    }
}
