use clustact_core::models::{PromoterSet, TadSet};

use crate::comparisons::Comparison;
use crate::contact_set::ContactSet;
use crate::counts_table::CountsTable;
use crate::errors::CountsError;

///
/// AnalysisContext, the explicit per-run state bundle.
///
/// Holds the promoter registry, TAD index, contact collection, the
/// finalized cluster list, score-bin thresholds, comparison list, and the
/// counts accumulator. Constructed once per run and passed by reference,
/// so several independent analyses can coexist in one process.
///
/// Ordering contract: promoter removal and cluster reassignment must
/// happen before [`AnalysisContext::compute_cluster_counts`], which must
/// happen before [`AnalysisContext::count_interactions`]. Reassigning
/// clusters leaves the cached per-contact counts stale until the
/// cluster-count pass is re-run.
///
#[derive(Debug)]
pub struct AnalysisContext {
    pub promoters: PromoterSet,
    pub tads: TadSet,
    pub contacts: ContactSet,

    clusters: Vec<String>,
    score_bins: Vec<f64>,
    comparisons: Vec<Comparison>,
    counts: CountsTable,
}

impl AnalysisContext {
    pub fn new(
        promoters: PromoterSet,
        tads: TadSet,
        clusters: Vec<String>,
        score_bins: Vec<f64>,
        comparisons: Vec<Comparison>,
    ) -> Result<Self, CountsError> {
        if score_bins.is_empty() || score_bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CountsError::InvalidBins);
        }
        let counts = CountsTable::new(&score_bins, &comparisons);
        Ok(AnalysisContext {
            promoters,
            tads,
            contacts: ContactSet::new(),
            clusters,
            score_bins,
            comparisons,
            counts,
        })
    }

    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    pub fn score_bins(&self) -> &[f64] {
        &self.score_bins
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn counts(&self) -> &CountsTable {
        &self.counts
    }

    /// Precompute per-contact cluster counts against the current labels.
    pub fn compute_cluster_counts(&mut self) {
        self.contacts
            .calculate_cluster_features(&self.promoters, &self.clusters);
    }

    /// Aggregate the current contacts into the counts table (additive).
    pub fn count_interactions(&mut self) -> Result<(), CountsError> {
        self.contacts
            .count_interactions(&self.score_bins, &self.comparisons, &mut self.counts)
    }

    /// Empty the contact collection between passes.
    pub fn reset_contacts(&mut self) {
        self.contacts.reset();
    }

    /// Reset the accumulator to zero, keeping its key set.
    pub fn zero_counts(&mut self) {
        self.counts.zero();
    }
}
