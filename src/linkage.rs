//! Linkage recurrences: distance from a cluster to a freshly merged pair.
//!
//! Every variant is a Lance–Williams style recurrence — it derives
//! `d(cx, ci ∪ cj)` purely from existing matrix entries (and cluster
//! cardinalities), never from raw attributes. That is what lets the merge
//! loop run on a shrinking triangular matrix without ever revisiting the
//! data.
//!
//! | Variant | `d(cx, ci ∪ cj)` | Effect |
//! |---------|------------------|--------|
//! | Single | `min(d(cx,ci), d(cx,cj))` | Chaining; elongated clusters |
//! | Complete | `max(d(cx,ci), d(cx,cj))` | Compact clusters |
//! | Average | `(d(cx,ci) + d(cx,cj)) / 2` | Balanced compromise |
//! | Median | `d(cx,ci)/2 + d(cx,cj)/2 - d(ci,cj)/4` | Gower's median |
//! | Ward | size-weighted variance increase | Equal-sized clusters |
//! | Centroid | size-weighted centroid distance | Geometric centers |

use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::partition::ClusterMap;

/// Linkage variant for agglomerative clustering.
///
/// A closed set: each variant maps to exactly one recurrence in
/// [`Linkage::distance_to_merged`], selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Linkage {
    /// Minimum distance between clusters.
    Single,
    /// Maximum distance between clusters.
    Complete,
    /// Unweighted mean of the two cluster distances.
    ///
    /// Note: this is the plain `(d1 + d2) / 2` mean and ignores cluster
    /// cardinality, which differs from size-weighted UPGMA. Kept as-is;
    /// downstream numeric expectations depend on the unweighted form.
    Average,
    /// Gower's median (weighted centroid) linkage.
    Median,
    /// Ward's method: minimize within-cluster variance. Pair with squared
    /// Euclidean seeding.
    Ward,
    /// Centroid linkage: distance between cluster centroids, expressed as
    /// a recurrence over existing entries.
    Centroid,
}

impl Linkage {
    /// Distance from live cluster `cx` to the union of `ci` and `cj`,
    /// using only stored matrix entries.
    ///
    /// Cardinalities are read from `map`, which must still reflect the
    /// pre-merge state (`ci` and `cj` live).
    pub fn distance_to_merged(
        &self,
        matrix: &DistanceMatrix,
        map: &ClusterMap,
        cx: usize,
        ci: usize,
        cj: usize,
    ) -> Result<f64> {
        let dxi = matrix.get(cx, ci)?;
        let dxj = matrix.get(cx, cj)?;
        Ok(match self {
            Linkage::Single => dxi.min(dxj),
            Linkage::Complete => dxi.max(dxj),
            Linkage::Average => (dxi + dxj) / 2.0,
            Linkage::Median => {
                let dij = matrix.get(ci, cj)?;
                dxi / 2.0 + dxj / 2.0 - dij / 4.0
            }
            Linkage::Ward => {
                let dij = matrix.get(ci, cj)?;
                let nx = map.size(cx)? as f64;
                let ni = map.size(ci)? as f64;
                let nj = map.size(cj)? as f64;
                ((nx + ni) * dxi + (nx + nj) * dxj - nx * dij) / (nx + ni + nj)
            }
            Linkage::Centroid => {
                let dij = matrix.get(ci, cj)?;
                let ni = map.size(ci)? as f64;
                let nj = map.size(cj)? as f64;
                (ni * dxi + nj * dxj) / (ni + nj) - (ni * nj * dij) / (ni + nj).powi(2)
            }
        })
    }

    /// Whether a clusterer built with this variant can classify new items
    /// afterwards.
    ///
    /// Only `Single` and `Complete` keep a meaningful item-to-cluster
    /// distance after build (fold the base distance over members with the
    /// variant's own combinator). The size-weighted recurrences are
    /// build-once: their cluster distances have no item-level counterpart
    /// without rebuilding.
    pub fn supports_eval(&self) -> bool {
        matches!(self, Linkage::Single | Linkage::Complete)
    }

    /// Variant name, for error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Median => "median",
            Linkage::Ward => "ward",
            Linkage::Centroid => "centroid",
        }
    }
}
