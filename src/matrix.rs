//! Lower-triangular pairwise distance matrix over live clusters.
//!
//! The matrix is an arena of rows indexed by cluster id: ids `0..n-1` are
//! the singleton rows built from the base distance function, and every
//! merge appends one new row computed by the active linkage recurrence.
//! Rows of merged clusters are *retired* (marked dead, kept in place)
//! rather than physically removed, so historical ids stay stable and
//! nothing ever shifts.
//!
//! Only the strict lower triangle is stored: `d(a, b)` with `a > b` lives
//! at `rows[a][b]`, and [`DistanceMatrix::get`] normalizes argument order.

use crate::error::{Error, Result};

/// Pairwise distances between live clusters, stored as a strict lower
/// triangle with explicit row retirement.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    /// `rows[a]` has length `a` and holds `d(a, b)` at index `b < a`.
    /// Slots for retired columns keep their stale values; liveness is
    /// tracked separately and checked on every access.
    rows: Vec<Vec<f64>>,
    /// Liveness mask, indexed by cluster id.
    live: Vec<bool>,
    /// Number of live clusters.
    n_live: usize,
}

impl DistanceMatrix {
    /// Build the initial `n * (n - 1) / 2`-entry matrix by evaluating
    /// `seed` on every unordered pair of item indices `(a, b)` with
    /// `a > b`.
    ///
    /// Fails with [`Error::TooFewItems`] if `n < 2`.
    pub fn build<F>(n: usize, seed: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        if n < 2 {
            return Err(Error::TooFewItems { found: n });
        }

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|a| (0..a).map(|b| seed(a, b)).collect())
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|a| (0..a).map(|b| seed(a, b)).collect())
            .collect();

        Ok(Self {
            rows,
            live: vec![true; n],
            n_live: n,
        })
    }

    /// Number of live clusters.
    pub fn n_live(&self) -> usize {
        self.n_live
    }

    /// Whether `id` refers to a live cluster.
    pub fn is_live(&self, id: usize) -> bool {
        self.live.get(id).copied().unwrap_or(false)
    }

    /// Distance between two live clusters.
    ///
    /// Argument order is irrelevant; the pair is normalized to `(max, min)`
    /// internally. Fails with [`Error::RetiredCluster`] if either id is not
    /// live.
    pub fn get(&self, a: usize, b: usize) -> Result<f64> {
        if !self.is_live(a) {
            return Err(Error::RetiredCluster { id: a });
        }
        if !self.is_live(b) {
            return Err(Error::RetiredCluster { id: b });
        }
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        Ok(self.rows[hi][lo])
    }

    /// Scan all live unordered pairs and return the closest one as
    /// `(a, b, distance)` with `a > b`.
    ///
    /// Tie-break is deterministic: strict `<` comparison during an
    /// ascending (row, column) scan, so the first-encountered minimum
    /// always wins.
    pub(crate) fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for a in 0..self.rows.len() {
            if !self.live[a] {
                continue;
            }
            for b in 0..a {
                if !self.live[b] {
                    continue;
                }
                let d = self.rows[a][b];
                if best.is_none_or(|(_, _, bd)| d < bd) {
                    best = Some((a, b, d));
                }
            }
        }
        best
    }

    /// Install the row for a newly merged cluster and retire the two
    /// clusters it consumed.
    ///
    /// `row` must have length equal to the new id (one slot per lower id);
    /// slots for dead ids are never read back.
    pub(crate) fn install_row(&mut self, row: Vec<f64>, consumed_a: usize, consumed_b: usize) {
        debug_assert_eq!(row.len(), self.rows.len());
        debug_assert!(self.live[consumed_a] && self.live[consumed_b]);
        self.rows.push(row);
        self.live.push(true);
        self.live[consumed_a] = false;
        self.live[consumed_b] = false;
        self.n_live -= 1;
    }
}
