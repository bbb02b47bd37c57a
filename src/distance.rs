//! Base distance functions over raw items.
//!
//! These seed the initial pairwise [`DistanceMatrix`](crate::DistanceMatrix);
//! after seeding, the merge loop never touches raw attributes again — every
//! later distance comes from a Lance–Williams recurrence over existing
//! matrix entries.

/// A pairwise distance over raw items.
///
/// Must be non-negative and symmetric. Supplied once at engine
/// configuration time and invoked only while seeding the matrix.
pub type DistanceFn = fn(&[f32], &[f32]) -> f64;

/// Squared Euclidean distance (the default).
///
/// Skipping the square root keeps seeding cheap and does not change merge
/// order for monotone linkages; Ward's recurrence in particular expects
/// squared distances.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let dx = *x as f64 - *y as f64;
            dx * dx
        })
        .sum()
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    squared_euclidean(a, b).sqrt()
}
