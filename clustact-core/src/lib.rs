//! Core data model for cluster-resolved promoter contact analysis.
//!
//! This crate provides the two leaf entities of the analysis:
//!
//! - [`Promoter`]: an annotated genomic element carrying a mutable cluster
//!   label, owned by an id-keyed [`PromoterSet`] registry
//! - [`Tad`]: a topologically associating domain owning sparse bin→promoter
//!   associations, with derived density and cluster-specificity statistics
//!   computed over a [`TadSet`]
//!
//! The contact aggregation engine that consumes these types lives in the
//! `clustact-counts` crate.
//!
//! # Example
//!
//! ```no_run
//! use clustact_core::models::{PromoterSet, TadSet};
//!
//! let mut promoters = PromoterSet::new();
//! promoters.load_bed("cluster1A.bed", "cluster1A").unwrap();
//!
//! let mut tads = TadSet::new(vec!["Bin0".into(), "Bin1".into(), "Bin2".into()]);
//! tads.load_bed("tads.bed").unwrap();
//! tads.categorize_densities();
//! ```

pub mod errors;
pub mod models;
pub mod utils;

// re-exports for cleaner imports
pub use models::promoter::{Promoter, Strand};
pub use models::promoter_set::{ClusterScheme, PromoterSet};
pub use models::tad::{DensityCategory, Tad};
pub use models::tad_set::TadSet;
