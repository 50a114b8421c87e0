use clustact_core::models::PromoterSet;

use crate::comparisons::{ClusterSelector, Comparison};
use crate::contact::Contact;
use crate::counts_table::CountsTable;
use crate::errors::CountsError;

///
/// ContactSet, the append-only ordered collection of a run's contacts.
///
/// Typically rebuilt per analysis pass; [`ContactSet::reset`] empties it
/// between repeated permutation trials.
///
#[derive(Debug, Clone, Default)]
pub struct ContactSet {
    contacts: Vec<Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// Empty the collection.
    pub fn reset(&mut self) {
        self.contacts.clear();
    }

    /// Precompute per-cluster side counts for every contact.
    ///
    /// Must run after the cluster set is final and re-run after any
    /// cluster reassignment; counting against stale caches fails with
    /// [`CountsError::StaleClusterCounts`].
    pub fn calculate_cluster_features(&mut self, promoters: &PromoterSet, clusters: &[String]) {
        for contact in &mut self.contacts {
            contact.compute_cluster_counts(promoters, clusters);
        }
    }

    /// Drop every contact's cached cluster counts.
    pub fn invalidate_cluster_counts(&mut self) {
        for contact in &mut self.contacts {
            contact.invalidate_cluster_counts();
        }
    }

    /// Partition contacts into score bins.
    ///
    /// For interior thresholds the membership test is strict on both
    /// edges: a contact lands in bin `b_i` iff `b_i < score < b_{i+1}`,
    /// so a score exactly equal to an interior threshold lands in no
    /// interior bin. The final bin collects `score >= b_last`, ties
    /// included. This boundary asymmetry is load-bearing for downstream
    /// consumers and is pinned by test.
    ///
    /// Returns one `(lower_threshold, contacts)` group per bin, in bin
    /// order. Bins must be non-empty and strictly ascending.
    pub fn group_by_score_bins(
        &self,
        bins: &[f64],
    ) -> Result<Vec<(f64, Vec<&Contact>)>, CountsError> {
        validate_bins(bins)?;

        let mut groups: Vec<(f64, Vec<&Contact>)> = Vec::with_capacity(bins.len());
        for window in bins.windows(2) {
            let (lower, upper) = (window[0], window[1]);
            let members = self
                .contacts
                .iter()
                .filter(|c| lower < c.score() && c.score() < upper)
                .collect();
            groups.push((lower, members));
        }

        let last = bins[bins.len() - 1];
        let members = self.contacts.iter().filter(|c| c.score() >= last).collect();
        groups.push((last, members));

        Ok(groups)
    }

    /// Aggregate weighted pair counts per (comparison, score bin) into
    /// `table`.
    ///
    /// For every comparison and every bin, the per-contact weights are
    /// summed and ADDED into the table row at (bin, clusterA, clusterB),
    /// so repeated calls accumulate.
    pub fn count_interactions(
        &self,
        bins: &[f64],
        comparisons: &[Comparison],
        table: &mut CountsTable,
    ) -> Result<(), CountsError> {
        let groups = self.group_by_score_bins(bins)?;

        for (cluster_a, cluster_b) in comparisons {
            for (bin, contacts) in &groups {
                let mut total: u64 = 0;
                for contact in contacts {
                    total += pair_weight(contact, cluster_a, cluster_b)?;
                }
                table.add(*bin, cluster_a, cluster_b, total);
            }
        }
        Ok(())
    }
}

/// Weighted pair count of one contact for one comparison.
///
/// Four cases:
/// - `all,all`: every possible pairing, `|side_a| * |side_b|`
/// - `A,rest`: cross terms between in-A and not-in-A,
///   `a1*(|b| - b1) + (|a| - a1)*b1`
/// - `A,A`: same-cluster product, `a1 * a2`
/// - `A,B`: cross terms, `a1*b2 + b1*a2`
fn pair_weight(
    contact: &Contact,
    cluster_a: &ClusterSelector,
    cluster_b: &ClusterSelector,
) -> Result<u64, CountsError> {
    let len_a = contact.side_a().len() as u64;
    let len_b = contact.side_b().len() as u64;

    match (cluster_a, cluster_b) {
        (ClusterSelector::All, ClusterSelector::All) => Ok(len_a * len_b),

        (ClusterSelector::Named(name), ClusterSelector::Rest) => {
            let in_a = contact.count_a(name)? as u64;
            let in_b = contact.count_b(name)? as u64;
            Ok(in_a * (len_b - in_b) + (len_a - in_a) * in_b)
        }

        (ClusterSelector::Named(a), ClusterSelector::Named(b)) if a == b => {
            let a1 = contact.count_a(a)? as u64;
            let a2 = contact.count_b(a)? as u64;
            Ok(a1 * a2)
        }

        (ClusterSelector::Named(a), ClusterSelector::Named(b)) => {
            let a1 = contact.count_a(a)? as u64;
            let b1 = contact.count_a(b)? as u64;
            let a2 = contact.count_b(a)? as u64;
            let b2 = contact.count_b(b)? as u64;
            Ok(a1 * b2 + b1 * a2)
        }

        (a, b) => Err(CountsError::InvalidComparison(a.to_string(), b.to_string())),
    }
}

fn validate_bins(bins: &[f64]) -> Result<(), CountsError> {
    if bins.is_empty() || bins.windows(2).any(|w| w[0] >= w[1]) {
        return Err(CountsError::InvalidBins);
    }
    Ok(())
}
