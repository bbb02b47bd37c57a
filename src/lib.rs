//! # aglo
//!
//! Agglomerative (hierarchical) clustering with exact Lance–Williams
//! recurrences, deterministic tie-breaking, and optional depth-limited
//! cluster trees.
//!
//! The engine seeds a triangular distance matrix once from a pluggable
//! base distance (default: squared Euclidean), then repeatedly merges the
//! closest pair of clusters, deriving every new distance from existing
//! matrix entries via the configured [`Linkage`] recurrence — raw
//! attributes are never revisited.
//!
//! ```rust
//! use aglo::{Agglomerative, Linkage};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let fitted = Agglomerative::new(2)
//!     .with_linkage(Linkage::Ward)
//!     .with_tree()
//!     .fit(&data)
//!     .unwrap();
//!
//! assert_eq!(fitted.clusters().len(), 2);
//! // Root-first: index 0 is the final (coarsest) partition.
//! assert_eq!(fitted.cluster_tree()[0].len(), 2);
//! ```

pub mod agglomerative;
pub mod distance;
/// Error types used across `aglo`.
pub mod error;
pub mod linkage;
pub mod matrix;
pub mod metrics;
pub mod partition;
pub mod traits;

mod tree;

pub use agglomerative::{Agglomerative, Agglomeration};
pub use distance::{euclidean, squared_euclidean, DistanceFn};
pub use error::{Error, Result};
pub use linkage::Linkage;
pub use matrix::DistanceMatrix;
pub use metrics::{ari, purity};
pub use partition::{ClusterMap, ClusterTree, Partition};
pub use traits::Clustering;
