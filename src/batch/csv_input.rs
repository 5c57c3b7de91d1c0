// src/batch/csv_input.rs
//! Reads patient rows for batch scoring. The first line is a header; feature
//! columns are the first 32 columns other than the optional patient-id column.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::utils::constants::EXPECTED_FEATURES;

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRow {
    pub row_index: usize,
    pub patient_id: Option<String>,
    /// Parsed feature values, or the reason the row cannot be scored.
    pub features: Result<Vec<f64>, String>,
}

#[derive(Debug, Clone)]
pub struct PatientTable {
    pub feature_columns: Vec<String>,
    pub rows: Vec<PatientRow>,
}

pub fn read_patient_file(path: &Path, patient_id_col: Option<&str>) -> Result<PatientTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Error loading file {}", path.display()))?;
    parse_patient_csv(&text, patient_id_col)
}

pub fn parse_patient_csv(text: &str, patient_id_col: Option<&str>) -> Result<PatientTable> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = match lines.next() {
        Some(line) => split_csv_line(line),
        None => bail!("Input file is empty"),
    };

    let id_index = match patient_id_col {
        Some(name) => Some(
            header
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Patient ID column '{}' not found in header", name))?,
        ),
        None => None,
    };

    let feature_indices: Vec<usize> = (0..header.len())
        .filter(|i| Some(*i) != id_index)
        .take(EXPECTED_FEATURES)
        .collect();
    if feature_indices.len() < EXPECTED_FEATURES {
        bail!(
            "Input file must have at least {} feature columns (found {})",
            EXPECTED_FEATURES,
            feature_indices.len()
        );
    }
    let feature_columns = feature_indices.iter().map(|i| header[*i].clone()).collect();

    let rows = lines
        .enumerate()
        .map(|(row_index, line)| {
            let cells = split_csv_line(line);
            let patient_id = id_index
                .and_then(|i| cells.get(i))
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty());
            let features = feature_indices
                .iter()
                .map(|i| parse_cell(&header[*i], cells.get(*i)))
                .collect::<Result<Vec<f64>, String>>();
            PatientRow {
                row_index,
                patient_id,
                features,
            }
        })
        .collect();

    Ok(PatientTable {
        feature_columns,
        rows,
    })
}

fn parse_cell(column: &str, cell: Option<&String>) -> Result<f64, String> {
    let raw = match cell {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(format!("Missing value for column '{}'", column)),
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Column '{}' has non-numeric value '{}'", column, raw)),
    }
}

/// Splits one CSV record, honouring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
