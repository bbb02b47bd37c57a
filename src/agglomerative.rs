//! Agglomerative (hierarchical) clustering engine.
//!
//! Bottom-up clustering: start with every item as its own cluster,
//! repeatedly merge the two closest clusters, stop when the requested
//! cluster count is reached. "Closest" is defined by the configured
//! [`Linkage`] recurrence, which only ever reads previously computed
//! matrix entries — the raw attributes are touched exactly once, while
//! seeding the initial matrix with the base distance function.
//!
//! The whole run is deterministic: the minimum scan breaks ties by
//! first-encountered pair in ascending (row, column) order, so identical
//! input and configuration always reproduce the same merge sequence.
//!
//! # Complexity
//!
//! Exactly `n - k` merges; each merge scans the live triangle and
//! recomputes one row, making the run O(n²)–O(n³) overall with O(n²)
//! memory for the matrix arena. No I/O, no suspension points: a run
//! either completes or fails fast on invalid input.

use crate::distance::{squared_euclidean, DistanceFn};
use crate::error::{Error, Result};
use crate::linkage::Linkage;
use crate::matrix::DistanceMatrix;
use crate::partition::{ClusterMap, ClusterTree, Partition};
use crate::traits::Clustering;
use crate::tree::TreeRecorder;

/// How much merge history [`Agglomerative::fit`] retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recording {
    /// Final partition only (the default).
    Off,
    /// Every intermediate partition.
    Full,
    /// Only the partitions produced by the final `d` merges.
    Depth(usize),
}

/// Agglomerative clustering configuration and engine.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage variant.
    linkage: Linkage,
    /// Base distance used to seed the matrix.
    distance: DistanceFn,
    /// Cluster-tree recording policy.
    recording: Recording,
}

impl Agglomerative {
    /// Create a new engine targeting `n_clusters` clusters.
    ///
    /// Defaults: average linkage, squared Euclidean seeding, no tree
    /// recording.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
            distance: squared_euclidean,
            recording: Recording::Off,
        }
    }

    /// Set the linkage variant.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Replace the base distance function used to seed the matrix.
    ///
    /// Must be non-negative and symmetric; it is invoked only during
    /// initialization, once per unordered item pair.
    pub fn with_distance(mut self, distance: DistanceFn) -> Self {
        self.distance = distance;
        self
    }

    /// Record every intermediate partition into the cluster tree.
    pub fn with_tree(mut self) -> Self {
        self.recording = Recording::Full;
        self
    }

    /// Record only the partitions produced by the final `depth` merges
    /// (the ones closest to the root). `depth = 0` keeps the root
    /// partition only.
    pub fn with_tree_depth(mut self, depth: usize) -> Self {
        self.recording = Recording::Depth(depth);
        self
    }

    /// Run the merge loop and return the fitted clusterer.
    ///
    /// Fails with [`Error::EmptyInput`] / [`Error::TooFewItems`] on
    /// insufficient data, [`Error::InvalidClusterCount`] when the target
    /// is outside `[1, n]`, and [`Error::DimensionMismatch`] on ragged
    /// items. Nothing caller-visible is mutated on failure.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<Agglomeration> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = data.len();
        if n < 2 {
            return Err(Error::TooFewItems { found: n });
        }
        if self.n_clusters < 1 || self.n_clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: n,
            });
        }
        let dim = data[0].len();
        if let Some(bad) = data.iter().find(|p| p.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }

        let mut matrix = DistanceMatrix::build(n, |a, b| (self.distance)(&data[a], &data[b]))?;
        let mut map = ClusterMap::singletons(n);

        let total_merges = n - self.n_clusters;
        let mut recorder = match self.recording {
            Recording::Off => None,
            Recording::Full => Some(TreeRecorder::new(None, total_merges)),
            Recording::Depth(d) => Some(TreeRecorder::new(Some(d), total_merges)),
        };

        // Merge ids: singletons occupy 0..n-1, each merge takes the next.
        let mut next_id = n;

        for step in 1..=total_merges {
            // Scan order fixes tie-breaking, so this is fully deterministic.
            let (id_a, id_b, _) = matrix
                .closest_pair()
                .expect("live pair must exist while above target count");

            if let Some(rec) = recorder.as_mut() {
                rec.record(step, map.partition());
            }

            // New row first: the recurrences need pre-merge cardinalities.
            let mut row = vec![f64::INFINITY; next_id];
            for cx in map.ids() {
                if cx == id_a || cx == id_b {
                    continue;
                }
                row[cx] = self.linkage.distance_to_merged(&matrix, &map, cx, id_a, id_b)?;
            }

            map.merge(id_a, id_b, next_id)?;
            matrix.install_row(row, id_a, id_b);
            next_id += 1;
        }

        debug_assert_eq!(map.len(), self.n_clusters);
        debug_assert_eq!(matrix.n_live(), self.n_clusters);

        let partition = map.partition();
        let tree = recorder.map(|rec| rec.finish(partition.clone()));

        Ok(Agglomeration {
            partition,
            tree,
            linkage: self.linkage,
            distance: self.distance,
            items: data.to_vec(),
        })
    }

    /// `fit` over the rows of an `ndarray` matrix.
    #[cfg(feature = "ndarray")]
    pub fn fit_array(&self, data: &ndarray::Array2<f32>) -> Result<Agglomeration> {
        let rows: Vec<Vec<f32>> = data.rows().into_iter().map(|r| r.to_vec()).collect();
        self.fit(&rows)
    }
}

impl Clustering for Agglomerative {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let fitted = self.fit(data)?;
        Ok(fitted.labels())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

/// A fitted agglomerative clusterer: the final partition plus, when
/// recording was enabled, the root-first cluster tree.
#[derive(Debug, Clone)]
pub struct Agglomeration {
    partition: Partition,
    tree: Option<ClusterTree>,
    linkage: Linkage,
    distance: DistanceFn,
    /// Retained for `eval` on capable linkages.
    items: Vec<Vec<f32>>,
}

impl Agglomeration {
    /// The final partition: clusters of original item indices, disjoint
    /// and exhaustive over `0..n`.
    pub fn clusters(&self) -> &Partition {
        &self.partition
    }

    /// Root-first sequence of recorded partitions.
    ///
    /// Empty unless tree recording was enabled on the engine; index 0 is
    /// always the coarsest (final) partition when present.
    pub fn cluster_tree(&self) -> &[Partition] {
        self.tree.as_deref().unwrap_or(&[])
    }

    /// The linkage variant this clusterer was built with.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Per-item cluster labels (label = position of the cluster in
    /// [`Agglomeration::clusters`]).
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0usize; self.items.len()];
        for (ci, cluster) in self.partition.iter().enumerate() {
            for &idx in cluster {
                labels[idx] = ci;
            }
        }
        labels
    }

    /// Whether [`Agglomeration::eval`] can classify new items.
    pub fn supports_eval(&self) -> bool {
        self.linkage.supports_eval()
    }

    /// Classify a new item: index of the closest cluster under the same
    /// linkage rule used during the build.
    ///
    /// The item-to-cluster distance folds the base distance over the
    /// cluster's members with the variant's combinator (min for single,
    /// max for complete). Ties resolve to the first-encountered cluster.
    ///
    /// Fails with [`Error::UnsupportedEval`] on build-once variants and
    /// [`Error::DimensionMismatch`] on a wrong-sized item.
    pub fn eval(&self, item: &[f32]) -> Result<usize> {
        if !self.supports_eval() {
            return Err(Error::UnsupportedEval {
                linkage: self.linkage.name(),
            });
        }
        let dim = self.items.first().map_or(0, Vec::len);
        if item.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: item.len(),
            });
        }

        let mut best = 0usize;
        let mut best_dist = f64::INFINITY;
        for (ci, cluster) in self.partition.iter().enumerate() {
            let dist = cluster
                .iter()
                .map(|&idx| (self.distance)(item, &self.items[idx]))
                .fold(None, |acc: Option<f64>, d| {
                    Some(match (acc, self.linkage) {
                        (None, _) => d,
                        (Some(a), Linkage::Complete) => a.max(d),
                        (Some(a), _) => a.min(d),
                    })
                })
                .unwrap_or(f64::INFINITY);
            if dist < best_dist {
                best_dist = dist;
                best = ci;
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ]
    }

    #[test]
    fn test_agglomerative_basic() {
        let fitted = Agglomerative::new(2).fit(&two_blobs()).unwrap();
        let labels = fitted.labels();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_all_linkages_agree_on_separated_blobs() {
        for linkage in [
            Linkage::Single,
            Linkage::Complete,
            Linkage::Average,
            Linkage::Median,
            Linkage::Ward,
            Linkage::Centroid,
        ] {
            let labels = Agglomerative::new(2)
                .with_linkage(linkage)
                .fit_predict(&two_blobs())
                .unwrap();
            assert_eq!(labels[0], labels[1], "{linkage:?}");
            assert_eq!(labels[2], labels[3], "{linkage:?}");
            assert_ne!(labels[0], labels[2], "{linkage:?}");
        }
    }

    #[test]
    fn test_final_partition_is_a_partition() {
        let data: Vec<Vec<f32>> = (0..20)
            .map(|i| vec![(i % 7) as f32, (i % 3) as f32 * 2.5])
            .collect();
        let fitted = Agglomerative::new(4)
            .with_linkage(Linkage::Ward)
            .fit(&data)
            .unwrap();

        let mut seen: Vec<usize> = fitted.clusters().iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
        assert_eq!(fitted.clusters().len(), 4);
    }

    #[test]
    fn test_deterministic_merge_order() {
        let data: Vec<Vec<f32>> = (0..15).map(|i| vec![(i * i % 11) as f32]).collect();
        let engine = Agglomerative::new(3).with_linkage(Linkage::Complete).with_tree();

        let a = engine.fit(&data).unwrap();
        let b = engine.fit(&data).unwrap();
        assert_eq!(a.clusters(), b.clusters());
        assert_eq!(a.cluster_tree(), b.cluster_tree());
    }

    #[test]
    fn test_target_equals_n_performs_zero_merges() {
        let data = two_blobs();
        let fitted = Agglomerative::new(4).fit(&data).unwrap();
        let singles: Partition = (0..4).map(|i| vec![i]).collect();
        assert_eq!(fitted.clusters(), &singles);
    }

    #[test]
    fn test_tree_depth_budget() {
        let data: Vec<Vec<f32>> = (0..12).map(|i| vec![i as f32, (i * 3 % 5) as f32]).collect();

        // depth = 0: root partition only.
        let fitted = Agglomerative::new(1).with_tree_depth(0).fit(&data).unwrap();
        assert_eq!(fitted.cluster_tree().len(), 1);
        assert_eq!(fitted.cluster_tree()[0].len(), 1);

        // Unlimited: one partition per cluster count, n down to 1.
        let fitted = Agglomerative::new(1).with_tree().fit(&data).unwrap();
        let tree = fitted.cluster_tree();
        assert_eq!(tree.len(), 12);
        for (i, partition) in tree.iter().enumerate() {
            assert_eq!(partition.len(), i + 1);
        }
    }

    #[test]
    fn test_tree_partial_depth() {
        let data: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32]).collect();
        let fitted = Agglomerative::new(2).with_tree_depth(3).fit(&data).unwrap();
        // Final partition plus the 3 merges nearest the root.
        let tree = fitted.cluster_tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].len(), 2);
        assert_eq!(tree[3].len(), 5);
    }

    #[test]
    fn test_no_recording_by_default() {
        let fitted = Agglomerative::new(2).fit(&two_blobs()).unwrap();
        assert!(fitted.cluster_tree().is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let empty: Vec<Vec<f32>> = vec![];
        assert_eq!(
            Agglomerative::new(1).fit(&empty).unwrap_err(),
            Error::EmptyInput
        );
        assert_eq!(
            Agglomerative::new(1).fit(&[vec![1.0]]).unwrap_err(),
            Error::TooFewItems { found: 1 }
        );
        assert_eq!(
            Agglomerative::new(0).fit(&two_blobs()).unwrap_err(),
            Error::InvalidClusterCount {
                requested: 0,
                n_items: 4
            }
        );
        assert_eq!(
            Agglomerative::new(5).fit(&two_blobs()).unwrap_err(),
            Error::InvalidClusterCount {
                requested: 5,
                n_items: 4
            }
        );
        assert_eq!(
            Agglomerative::new(2)
                .fit(&[vec![1.0, 2.0], vec![3.0]])
                .unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_eval_on_supported_linkage() {
        let fitted = Agglomerative::new(2)
            .with_linkage(Linkage::Single)
            .fit(&two_blobs())
            .unwrap();
        assert!(fitted.supports_eval());

        let near_origin = fitted.eval(&[0.2, 0.2]).unwrap();
        let near_far = fitted.eval(&[9.9, 9.9]).unwrap();
        assert_ne!(near_origin, near_far);
        assert_eq!(near_origin, fitted.labels()[0]);
        assert_eq!(near_far, fitted.labels()[2]);
    }

    #[test]
    fn test_eval_unsupported_fails() {
        for linkage in [Linkage::Average, Linkage::Median, Linkage::Ward, Linkage::Centroid] {
            let fitted = Agglomerative::new(2)
                .with_linkage(linkage)
                .fit(&two_blobs())
                .unwrap();
            assert!(!fitted.supports_eval());
            assert_eq!(
                fitted.eval(&[0.0, 0.0]).unwrap_err(),
                Error::UnsupportedEval {
                    linkage: linkage.name()
                }
            );
        }
    }

    #[test]
    fn test_eval_dimension_check() {
        let fitted = Agglomerative::new(2)
            .with_linkage(Linkage::Complete)
            .fit(&two_blobs())
            .unwrap();
        assert_eq!(
            fitted.eval(&[1.0]).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_random_data_partition_and_tree_size() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<Vec<f32>> = (0..40)
            .map(|_| vec![rng.random::<f32>() * 10.0, rng.random::<f32>() * 10.0])
            .collect();

        for k in [1, 5, 40] {
            let fitted = Agglomerative::new(k)
                .with_linkage(Linkage::Ward)
                .with_tree()
                .fit(&data)
                .unwrap();
            assert_eq!(fitted.clusters().len(), k);

            let mut seen: Vec<usize> = fitted.clusters().iter().flatten().copied().collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..40).collect::<Vec<_>>());

            // One recorded partition per cluster count from n down to k.
            assert_eq!(fitted.cluster_tree().len(), 40 - k + 1);
        }
    }

    #[test]
    fn test_recovers_ground_truth_blobs() {
        let labels = Agglomerative::new(2)
            .with_linkage(Linkage::Average)
            .fit_predict(&two_blobs())
            .unwrap();
        let truth = [0, 0, 1, 1];
        assert!((crate::metrics::ari(&labels, &truth) - 1.0).abs() < 1e-12);
        assert!((crate::metrics::purity(&labels, &truth) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_distance_function() {
        fn manhattan(a: &[f32], b: &[f32]) -> f64 {
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| (*x as f64 - *y as f64).abs())
                .sum()
        }

        let labels = Agglomerative::new(2)
            .with_distance(manhattan)
            .with_linkage(Linkage::Single)
            .fit_predict(&two_blobs())
            .unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
    }
}
