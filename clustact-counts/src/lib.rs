//! Contact aggregation engine: cluster-pair interaction counting over
//! score bins.
//!
//! A [`Contact`] is a scored pairing between two promoter-id lists. The
//! engine precomputes per-cluster side counts ([`ContactSet::calculate_cluster_features`]),
//! partitions contacts into score bins ([`ContactSet::group_by_score_bins`]),
//! and accumulates combinatorial pair counts per (cluster pair, bin) into
//! a [`CountsTable`] ([`ContactSet::count_interactions`]).
//!
//! # Example
//!
//! ```
//! use clustact_core::models::{Promoter, PromoterSet, Strand};
//! use clustact_counts::{Contact, ContactSet, ClusterSelector, CountsTable};
//!
//! let mut promoters = PromoterSet::new();
//! for (id, cluster) in [("p1", "c1"), ("p2", "c2")] {
//!     promoters
//!         .register(Promoter::new(id, "chr1", 0, 10, Strand::Forward, cluster))
//!         .unwrap();
//! }
//!
//! let clusters = vec!["c1".to_string(), "c2".to_string()];
//! let mut contacts = ContactSet::new();
//! contacts.push(Contact::new(vec!["p1".into()], vec!["p2".into()], 3.5));
//! contacts.calculate_cluster_features(&promoters, &clusters);
//!
//! let bins = vec![0.0, 2.0, 5.0];
//! let comparisons = vec![(ClusterSelector::All, ClusterSelector::All)];
//! let mut table = CountsTable::new(&bins, &comparisons);
//! contacts.count_interactions(&bins, &comparisons, &mut table).unwrap();
//! assert_eq!(table.get(2.0, "all", "all"), 1);
//! ```

pub mod comparisons;
pub mod contact;
pub mod contact_set;
pub mod context;
pub mod counts_table;
pub mod errors;

// re-exports
pub use comparisons::{ClusterSelector, Comparison, parse_comparisons};
pub use contact::Contact;
pub use contact_set::ContactSet;
pub use context::AnalysisContext;
pub use counts_table::{CountsRow, CountsTable};
pub use errors::CountsError;
