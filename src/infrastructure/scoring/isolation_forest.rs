use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Subsample size per tree, per the original isolation forest paper.
const MAX_SUBSAMPLE: usize = 256;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Isolation forest fitted on a dense numeric table.
///
/// Anomalous rows are isolated by fewer random splits than normal rows,
/// so their average path length across trees is shorter. The fit is fully
/// deterministic for a given seed.
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit `n_trees` isolation trees on `data` (rows × features).
    ///
    /// Rows must all have the same width. Constant columns are never
    /// selected for splitting; fully constant data produces single-leaf
    /// trees rather than an error.
    #[must_use]
    pub fn fit(data: &[Vec<f64>], n_trees: usize, seed: u64) -> Self {
        let n = data.len();
        let sample_size = n.min(MAX_SUBSAMPLE);
        let max_depth = depth_limit(sample_size);
        let mut rng = StdRng::seed_from_u64(seed);

        let trees = (0..n_trees)
            .map(|_| {
                let indices: Vec<usize> = if n <= sample_size {
                    (0..n).collect()
                } else {
                    rand::seq::index::sample(&mut rng, n, sample_size).into_vec()
                };
                build_node(data, &indices, 0, max_depth, &mut rng)
            })
            .collect();

        Self { trees, sample_size }
    }

    /// Anomaly score per row, in `(0, 1)`; higher means more anomalous.
    ///
    /// Rows the forest cannot discriminate (single-row fits) score 0.5.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn anomaly_scores(&self, data: &[Vec<f64>]) -> Vec<f64> {
        let denom = average_path_length(self.sample_size);
        data.iter()
            .map(|row| {
                if denom <= 0.0 {
                    return 0.5;
                }
                let total: f64 = self
                    .trees
                    .iter()
                    .map(|tree| path_length(tree, row, 0))
                    .sum();
                let mean_path = total / self.trees.len() as f64;
                2.0_f64.powf(-mean_path / denom)
            })
            .collect()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn depth_limit(sample_size: usize) -> usize {
    if sample_size <= 2 {
        1
    } else {
        (sample_size as f64).log2().ceil() as usize
    }
}

fn build_node(
    data: &[Vec<f64>],
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= max_depth || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features with spread over this node's rows are splittable.
    let dims = data[indices[0]].len();
    let mut candidates: Vec<(usize, f64, f64)> = Vec::new();
    for feature in 0..dims {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &i in indices {
            let v = data[i][feature];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi > lo {
            candidates.push((feature, lo, hi));
        }
    }
    if candidates.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(lo..hi);

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| data[i][feature] < threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(data, &left_idx, depth + 1, max_depth, rng)),
        right: Box::new(build_node(data, &right_idx, depth + 1, max_depth, rng)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn path_length(node: &Node, row: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] < *threshold {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` items —
/// the normalisation constant c(n) from the isolation forest paper.
#[allow(clippy::cast_precision_loss)]
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0_f64.mul_add((n - 1.0).ln() + EULER_MASCHERONI, -(2.0 * (n - 1.0) / n))
        }
    }
}
