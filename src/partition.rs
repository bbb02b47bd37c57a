//! The index-cluster map: which original items each live cluster holds.
//!
//! This is the unit the matrix and linkage recurrences operate on, and the
//! only state the tree recorder snapshots. A `BTreeMap` keyed by cluster id
//! keeps iteration ascending, which makes partition order (and therefore
//! everything downstream) deterministic.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A grouping of all item indices into disjoint, exhaustive clusters,
/// ordered by the cluster id that produced them.
pub type Partition = Vec<Vec<usize>>;

/// Root-to-leaves sequence of partitions recorded during merging:
/// index 0 is the coarsest (final) partition, later indices are finer.
pub type ClusterTree = Vec<Partition>;

/// Mapping from live cluster id to the ordered item indices it contains.
#[derive(Debug, Clone)]
pub struct ClusterMap {
    clusters: BTreeMap<usize, Vec<usize>>,
}

impl ClusterMap {
    /// The singleton partition: cluster `i` holds exactly item `i`.
    pub fn singletons(n: usize) -> Self {
        Self {
            clusters: (0..n).map(|i| (i, vec![i])).collect(),
        }
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the map holds no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cardinality of a live cluster.
    pub fn size(&self, id: usize) -> Result<usize> {
        self.clusters
            .get(&id)
            .map(Vec::len)
            .ok_or(Error::RetiredCluster { id })
    }

    /// Item indices of a live cluster.
    pub fn members(&self, id: usize) -> Result<&[usize]> {
        self.clusters
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(Error::RetiredCluster { id })
    }

    /// Live cluster ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.clusters.keys().copied()
    }

    /// Retire `id_a` and `id_b` and insert `new_id` holding the union of
    /// their members, lower-id members first.
    ///
    /// Fails with [`Error::RetiredCluster`] if either id is not live.
    pub(crate) fn merge(&mut self, id_a: usize, id_b: usize, new_id: usize) -> Result<()> {
        let (lo, hi) = if id_a < id_b { (id_a, id_b) } else { (id_b, id_a) };
        if !self.clusters.contains_key(&hi) {
            return Err(Error::RetiredCluster { id: hi });
        }
        let mut merged = self
            .clusters
            .remove(&lo)
            .ok_or(Error::RetiredCluster { id: lo })?;
        let mut tail = self.clusters.remove(&hi).unwrap_or_default();
        merged.append(&mut tail);
        self.clusters.insert(new_id, merged);
        Ok(())
    }

    /// Snapshot the current partition as plain nested index vectors,
    /// clusters in ascending id order.
    pub fn partition(&self) -> Partition {
        self.clusters.values().cloned().collect()
    }
}
