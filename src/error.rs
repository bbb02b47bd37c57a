use core::fmt;

/// Result alias for `aglo`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Fewer items than the minimum the algorithm can cluster.
    TooFewItems {
        /// Number of items provided.
        found: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Item dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A retired (already merged) cluster id was referenced.
    RetiredCluster {
        /// The offending cluster id.
        id: usize,
    },

    /// `eval` called on a linkage variant that cannot classify after build.
    UnsupportedEval {
        /// Name of the linkage variant.
        linkage: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::TooFewItems { found } => {
                write!(f, "need at least 2 items to cluster, found {found}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::RetiredCluster { id } => {
                write!(f, "cluster {id} is retired (already merged)")
            }
            Error::UnsupportedEval { linkage } => {
                write!(f, "{linkage} linkage does not support eval after build")
            }
        }
    }
}

impl std::error::Error for Error {}
