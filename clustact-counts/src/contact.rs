use clustact_core::models::PromoterSet;
use fxhash::FxHashMap;

use crate::errors::CountsError;

///
/// Contact struct, a scored pairing between two promoter-id lists.
///
/// Sides are immutable after creation; the per-cluster side counts are a
/// derived cache that must be recomputed whenever cluster labels change.
///
#[derive(Debug, Clone)]
pub struct Contact {
    side_a: Vec<String>,
    side_b: Vec<String>,
    score: f64,

    counts_a: Option<FxHashMap<String, u32>>,
    counts_b: Option<FxHashMap<String, u32>>,
}

impl Contact {
    pub fn new(side_a: Vec<String>, side_b: Vec<String>, score: f64) -> Self {
        Contact {
            side_a,
            side_b,
            score,
            counts_a: None,
            counts_b: None,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn side_a(&self) -> &[String] {
        &self.side_a
    }

    pub fn side_b(&self) -> &[String] {
        &self.side_b
    }

    /// Count, for every configured cluster, how many promoters of each
    /// side belong to it. Ids that no longer resolve against the registry
    /// contribute to side length but to no cluster.
    pub fn compute_cluster_counts(&mut self, promoters: &PromoterSet, clusters: &[String]) {
        self.counts_a = Some(count_side(&self.side_a, promoters, clusters));
        self.counts_b = Some(count_side(&self.side_b, promoters, clusters));
    }

    /// Drop the cached cluster counts. Counting against an invalidated
    /// contact fails with [`CountsError::StaleClusterCounts`].
    pub fn invalidate_cluster_counts(&mut self) {
        self.counts_a = None;
        self.counts_b = None;
    }

    pub fn has_cluster_counts(&self) -> bool {
        self.counts_a.is_some() && self.counts_b.is_some()
    }

    pub(crate) fn count_a(&self, cluster: &str) -> Result<u32, CountsError> {
        lookup(&self.counts_a, cluster)
    }

    pub(crate) fn count_b(&self, cluster: &str) -> Result<u32, CountsError> {
        lookup(&self.counts_b, cluster)
    }
}

fn count_side(side: &[String], promoters: &PromoterSet, clusters: &[String]) -> FxHashMap<String, u32> {
    clusters
        .iter()
        .map(|cluster| {
            let n = side
                .iter()
                .filter(|id| {
                    promoters
                        .get(id)
                        .map(|p| &p.cluster == cluster)
                        .unwrap_or(false)
                })
                .count() as u32;
            (cluster.clone(), n)
        })
        .collect()
}

fn lookup(counts: &Option<FxHashMap<String, u32>>, cluster: &str) -> Result<u32, CountsError> {
    counts
        .as_ref()
        .and_then(|map| map.get(cluster))
        .copied()
        .ok_or_else(|| CountsError::StaleClusterCounts(cluster.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use clustact_core::models::{Promoter, Strand};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn registry() -> PromoterSet {
        let mut set = PromoterSet::new();
        for (id, cluster) in [("p1", "c1"), ("p2", "c1"), ("p3", "c2")] {
            set.register(Promoter::new(id, "chr1", 0, 10, Strand::Forward, cluster))
                .unwrap();
        }
        set
    }

    #[rstest]
    fn test_compute_cluster_counts() {
        let promoters = registry();
        let clusters = vec!["c1".to_string(), "c2".to_string()];

        let mut contact = Contact::new(
            vec!["p1".into(), "p2".into()],
            vec!["p3".into()],
            1.0,
        );
        contact.compute_cluster_counts(&promoters, &clusters);

        assert_eq!(contact.count_a("c1").unwrap(), 2);
        assert_eq!(contact.count_a("c2").unwrap(), 0);
        assert_eq!(contact.count_b("c2").unwrap(), 1);
    }

    #[rstest]
    fn test_unresolvable_id_counts_to_no_cluster() {
        let promoters = registry();
        let clusters = vec!["c1".to_string(), "c2".to_string()];

        let mut contact = Contact::new(vec!["p1".into(), "ghost".into()], vec![], 1.0);
        contact.compute_cluster_counts(&promoters, &clusters);

        assert_eq!(contact.side_a().len(), 2);
        assert_eq!(contact.count_a("c1").unwrap(), 1);
        assert_eq!(contact.count_a("c2").unwrap(), 0);
    }

    #[rstest]
    fn test_stale_counts_fail_loudly() {
        let promoters = registry();
        let clusters = vec!["c1".to_string()];

        let mut contact = Contact::new(vec!["p1".into()], vec!["p3".into()], 1.0);
        // uncomputed cache
        assert!(matches!(
            contact.count_a("c1"),
            Err(CountsError::StaleClusterCounts(_))
        ));

        contact.compute_cluster_counts(&promoters, &clusters);
        // cluster missing from the configured set at compute time
        assert!(matches!(
            contact.count_a("c2"),
            Err(CountsError::StaleClusterCounts(_))
        ));

        contact.invalidate_cluster_counts();
        assert!(!contact.has_cluster_counts());
        assert!(contact.count_a("c1").is_err());
    }
}
