//! Reference nutrition dataset loading.
//!
//! Training consumes a tabular CSV with one row per food item: the 13
//! canonical nutrient columns (any order) plus a free-text `Description`
//! column. Cells that are empty or unparsable are kept as missing; the
//! model drops incomplete rows at training time, so the loader reports
//! counts instead of failing on them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{NutriScanError, Result};
use crate::nutrition::attribute::{NUM_ATTRS, NutrientAttr};

/// Column name of the free-text item description.
const DESCRIPTION_COLUMN: &str = "Description";

/// One reference food item, values possibly missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    description: String,
    values: [Option<f64>; NUM_ATTRS],
}

impl ReferenceRow {
    /// Create a row from a description and per-attribute values in
    /// canonical order.
    pub fn new(description: String, values: [Option<f64>; NUM_ATTRS]) -> Self {
        Self {
            description,
            values,
        }
    }

    /// The free-text item description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The value for an attribute, if present.
    pub fn get(&self, attr: NutrientAttr) -> Option<f64> {
        self.values[attr.index()]
    }

    /// All 13 values when none is missing, in canonical order.
    pub fn complete_values(&self) -> Option<[f64; NUM_ATTRS]> {
        let mut out = [0.0; NUM_ATTRS];
        for (slot, value) in out.iter_mut().zip(self.values.iter()) {
            *slot = (*value)?;
        }
        Some(out)
    }
}

/// An in-memory reference dataset.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    rows: Vec<ReferenceRow>,
}

impl ReferenceDataset {
    /// Build a dataset from rows already in memory.
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    /// Load a dataset from a CSV file.
    ///
    /// The header must contain all 13 canonical columns and
    /// `Description`; extra columns are ignored.
    pub fn load_csv(path: &Path) -> Result<ReferenceDataset> {
        Self::load_csv_inner(path, None)
    }

    /// Load at most `limit` rows, for smoke runs over large files.
    pub fn load_csv_sample(path: &Path, limit: usize) -> Result<ReferenceDataset> {
        Self::load_csv_inner(path, Some(limit))
    }

    fn load_csv_inner(path: &Path, limit: Option<usize>) -> Result<ReferenceDataset> {
        let file = File::open(path).map_err(|e| {
            NutriScanError::dataset(format!("cannot open {}: {e}", path.display()))
        })?;
        let mut lines = BufReader::new(file).lines();

        let header_line = lines
            .next()
            .ok_or_else(|| NutriScanError::dataset("dataset file is empty"))??;
        let header = split_csv_line(&header_line);

        // Map each canonical attribute and the description to its column.
        let mut attr_columns = [usize::MAX; NUM_ATTRS];
        let mut description_column = None;
        for (col, name) in header.iter().enumerate() {
            let trimmed = name.trim();
            if trimmed.eq_ignore_ascii_case(DESCRIPTION_COLUMN) {
                description_column = Some(col);
            } else if let Ok(attr) = NutrientAttr::parse(trimmed) {
                attr_columns[attr.index()] = col;
            }
        }
        if let Some(missing) = NutrientAttr::ALL
            .iter()
            .find(|attr| attr_columns[attr.index()] == usize::MAX)
        {
            return Err(NutriScanError::dataset(format!(
                "required column missing from header: {missing}"
            )));
        }
        let description_column = description_column.ok_or_else(|| {
            NutriScanError::dataset(format!(
                "required column missing from header: {DESCRIPTION_COLUMN}"
            ))
        })?;

        let mut rows = Vec::new();
        for line in lines {
            if let Some(limit) = limit {
                if rows.len() >= limit {
                    break;
                }
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_csv_line(&line);

            let description = fields
                .get(description_column)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let mut values = [None; NUM_ATTRS];
            for attr in NutrientAttr::ALL {
                let col = attr_columns[attr.index()];
                values[attr.index()] = fields
                    .get(col)
                    .and_then(|cell| cell.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite());
            }
            rows.push(ReferenceRow::new(description, values));
        }

        Ok(ReferenceDataset { rows })
    }

    /// All loaded rows.
    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Total row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with all 13 attributes present.
    pub fn complete_len(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.complete_values().is_some())
            .count()
    }
}

/// Split one CSV line into fields, honoring double-quoted cells with
/// embedded commas and doubled-quote escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
}
