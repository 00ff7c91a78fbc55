//! Standard feature scaler.
//!
//! Per-feature standardization (subtract mean, divide by standard
//! deviation), fit on the training split only and applied identically at
//! training and inference time. The fitted statistics persist inside the
//! model artifact so the scaler and model never drift apart.

use serde::{Deserialize, Serialize};

use crate::error::{NutriScanError, Result};
use crate::nutrition::attribute::NUM_ATTRS;

/// A fitted per-feature standard scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: [f64; NUM_ATTRS],
    stds: [f64; NUM_ATTRS],
}

impl StandardScaler {
    /// Fit scaler statistics on a set of feature rows.
    ///
    /// Features with zero variance scale by 1.0 instead of dividing by
    /// zero.
    pub fn fit(rows: &[[f64; NUM_ATTRS]]) -> Result<StandardScaler> {
        if rows.is_empty() {
            return Err(NutriScanError::invalid_argument(
                "cannot fit scaler on an empty feature matrix",
            ));
        }

        let n = rows.len() as f64;
        let mut means = [0.0; NUM_ATTRS];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row.iter()) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = [0.0; NUM_ATTRS];
        for row in rows {
            for i in 0..NUM_ATTRS {
                let diff = row[i] - means[i];
                stds[i] += diff * diff;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        Ok(StandardScaler { means, stds })
    }

    /// Scale one feature row in place.
    pub fn transform(&self, row: &mut [f64; NUM_ATTRS]) {
        for i in 0..NUM_ATTRS {
            row[i] = (row[i] - self.means[i]) / self.stds[i];
        }
    }

    /// Scale a batch of rows, returning the scaled copy.
    pub fn transform_all(&self, rows: &[[f64; NUM_ATTRS]]) -> Vec<[f64; NUM_ATTRS]> {
        rows.iter()
            .map(|row| {
                let mut scaled = *row;
                self.transform(&mut scaled);
                scaled
            })
            .collect()
    }
}
