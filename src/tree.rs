//! Depth-limited recording of intermediate partitions during merging.
//!
//! The recorder snapshots the index-cluster map *before* each merge is
//! applied, bounded by a depth budget, then reassembles everything into
//! root-to-leaves order: index 0 is the coarsest (final) partition and
//! increasing indices move toward finer ones. The build is two-phase —
//! accumulate forward while merging, reverse once at the end — which keeps
//! the merge loop oblivious to the output ordering.
//!
//! Depth semantics: `None` records every intermediate partition; `Some(d)`
//! records only the partitions produced during the final `d` merges (the
//! ones closest to the root). `Some(0)` keeps the root partition only,
//! trading all dendrogram resolution for constant memory.

use crate::partition::{ClusterTree, Partition};

/// Forward accumulator for partition snapshots.
#[derive(Debug, Clone)]
pub(crate) struct TreeRecorder {
    depth: Option<usize>,
    total_merges: usize,
    partitions: Vec<Partition>,
}

impl TreeRecorder {
    pub(crate) fn new(depth: Option<usize>, total_merges: usize) -> Self {
        let capacity = match depth {
            Some(d) => d.min(total_merges),
            None => total_merges,
        };
        Self {
            depth,
            total_merges,
            partitions: Vec::with_capacity(capacity + 1),
        }
    }

    /// Offer the pre-merge partition for merge `step` (1-indexed).
    /// Snapshots outside the depth window are dropped.
    pub(crate) fn record(&mut self, step: usize, partition: Partition) {
        let keep = match self.depth {
            None => true,
            Some(d) => step > self.total_merges - d.min(self.total_merges),
        };
        if keep {
            self.partitions.push(partition);
        }
    }

    /// Append the final partition and reverse into root-first order.
    pub(crate) fn finish(mut self, final_partition: Partition) -> ClusterTree {
        self.partitions.push(final_partition);
        self.partitions.reverse();
        self.partitions
    }
}
