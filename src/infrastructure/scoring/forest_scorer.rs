use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::ports::scorer::{HealthEstimate, HealthScorer, ScoreError};
use crate::domain::ports::store::AttributeRow;

use super::isolation_forest::IsolationForest;

/// Confidence saturates once this many attribute rows back the score.
const CONFIDENCE_SATURATION_ROWS: usize = 100;

/// Refits an isolation forest on a device's recent history every call.
///
/// Stateless between invocations: the score only ever reflects the queried
/// window, and there is no model state to go stale or corrupt.
pub struct IsolationForestScorer {
    trees: usize,
    contamination: f64,
    seed: u64,
}

impl IsolationForestScorer {
    #[must_use]
    pub const fn new(trees: usize, contamination: f64, seed: u64) -> Self {
        Self {
            trees,
            contamination,
            seed,
        }
    }
}

impl Default for IsolationForestScorer {
    fn default() -> Self {
        Self::new(100, 0.1, 42)
    }
}

impl HealthScorer for IsolationForestScorer {
    #[allow(clippy::cast_precision_loss)]
    fn score(&self, history: &[AttributeRow]) -> Result<HealthEstimate, ScoreError> {
        if history.is_empty() {
            // Optimistic default with zero confidence: "insufficiently
            // observed", not "healthy".
            return Ok(HealthEstimate {
                health_score: 1.0,
                confidence: 0.0,
            });
        }

        let table = pivot(history);
        let forest = IsolationForest::fit(&table, self.trees, self.seed);
        let scores = forest.anomaly_scores(&table);

        // Rows strictly above the (1 - contamination) quantile are
        // anomalous; ties classify normal, so a no-variance history with
        // uniform scores comes out fully healthy.
        let threshold = percentile(&scores, 1.0 - self.contamination);
        let normal = scores.iter().filter(|&&s| s <= threshold).count();
        let health_score = normal as f64 / scores.len() as f64;

        let confidence = (history.len() as f64 / CONFIDENCE_SATURATION_ROWS as f64).min(1.0);

        Ok(HealthEstimate {
            health_score,
            confidence,
        })
    }
}

/// Reshape attribute rows into a dense table: one row per distinct
/// timestamp, one column per distinct attribute name (sorted for
/// determinism). Cells absent from the history are imputed with the
/// column's median so they carry no isolation signal of their own.
#[allow(clippy::cast_precision_loss)]
fn pivot(history: &[AttributeRow]) -> Vec<Vec<f64>> {
    let names: BTreeSet<&str> = history.iter().map(|r| r.name.as_str()).collect();
    let column_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i))
        .collect();

    let mut row_of: HashMap<DateTime<Utc>, usize> = HashMap::new();
    let mut cells: Vec<Vec<Option<f64>>> = Vec::new();
    for row in history {
        let index = *row_of.entry(row.timestamp).or_insert_with(|| {
            cells.push(vec![None; column_of.len()]);
            cells.len() - 1
        });
        if let Some(&column) = column_of.get(row.name.as_str()) {
            cells[index][column] = Some(row.value as f64);
        }
    }

    for column in 0..column_of.len() {
        let fill = median(cells.iter().filter_map(|row| row[column]));
        for row in &mut cells {
            if row[column].is_none() {
                row[column] = Some(fill);
            }
        }
    }

    cells
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(0.0)).collect())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Linear-interpolated quantile of `values` at `q` in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        (rank - lo as f64).mul_add(sorted[hi] - sorted[lo], sorted[lo])
    }
}
