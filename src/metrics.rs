//! External validation metrics for clusterings.
//!
//! Compare a predicted labeling against ground truth. Both functions are
//! label-permutation invariant: renumbering clusters does not change the
//! score.
//!
//! | Metric | Range | Best | Notes |
//! |--------|-------|------|-------|
//! | [`purity`] | [0, 1] | 1 | Simple; biased toward many clusters |
//! | [`ari`] | [-1, 1] | 1 | Adjusted Rand Index, chance-corrected |

use std::collections::HashMap;

/// Purity: fraction of items whose cluster's majority class matches their
/// own class. Returns 0.0 on empty or mismatched inputs.
pub fn purity(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut per_cluster: HashMap<usize, HashMap<usize, usize>> = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth.iter()) {
        *per_cluster.entry(p).or_default().entry(t).or_insert(0) += 1;
    }

    let majority_sum: usize = per_cluster
        .values()
        .map(|counts| counts.values().copied().max().unwrap_or(0))
        .sum();

    majority_sum as f64 / pred.len() as f64
}

/// Adjusted Rand Index between two clusterings.
///
/// Counts pairwise agreements between the clusterings, corrected for the
/// agreement expected by chance (Hubert & Arabie, 1985). Returns 0.0 on
/// empty or mismatched inputs; 1.0 means identical partitions up to label
/// permutation.
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let n = pred.len();

    let mut joint: HashMap<(usize, usize), usize> = HashMap::new();
    let mut pred_counts: HashMap<usize, usize> = HashMap::new();
    let mut truth_counts: HashMap<usize, usize> = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth.iter()) {
        *joint.entry((p, t)).or_insert(0) += 1;
        *pred_counts.entry(p).or_insert(0) += 1;
        *truth_counts.entry(t).or_insert(0) += 1;
    }

    fn choose2(c: usize) -> f64 {
        (c * c.saturating_sub(1)) as f64 / 2.0
    }

    let sum_joint: f64 = joint.values().map(|&c| choose2(c)).sum();
    let sum_pred: f64 = pred_counts.values().map(|&c| choose2(c)).sum();
    let sum_truth: f64 = truth_counts.values().map(|&c| choose2(c)).sum();
    let total = choose2(n);

    let expected = sum_pred * sum_truth / total;
    let max_index = (sum_pred + sum_truth) / 2.0;
    if (max_index - expected).abs() < f64::EPSILON {
        // Both partitions degenerate (all singletons or a single cluster).
        return if (sum_joint - expected).abs() < f64::EPSILON { 1.0 } else { 0.0 };
    }

    (sum_joint - expected) / (max_index - expected)
}
