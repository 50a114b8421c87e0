use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountsError {
    #[error("score bins must be a non-empty ascending sequence")]
    InvalidBins,

    #[error(
        "cluster counts are missing or stale for cluster '{0}'; re-run the cluster-count pass"
    )]
    StaleClusterCounts(String),

    #[error("unsupported cluster comparison: {0} vs {1}")]
    InvalidComparison(String, String),
}
