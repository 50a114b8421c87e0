use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::errors::TadSetError;
use crate::models::promoter_set::PromoterSet;

/// Density tertile of a TAD, assigned by a corpus-wide categorization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DensityCategory {
    Low,
    Medium,
    High,
}

impl Display for DensityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityCategory::Low => write!(f, "LD"),
            DensityCategory::Medium => write!(f, "MD"),
            DensityCategory::High => write!(f, "HD"),
        }
    }
}

///
/// Tad struct, one topologically associating domain owning sparse
/// bin -> promoter-id associations.
///
/// The bin-name set is fixed at construction and shared by every TAD of a
/// [`crate::models::TadSet`]. Promoter references are non-owning ids
/// resolved against the [`PromoterSet`] registry.
///
#[derive(Debug, Clone)]
pub struct Tad {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub compartment: String,
    pub id: String,

    /// Interval length in megabases; positive because start < end is
    /// enforced at load time.
    pub length_mb: f64,

    /// Bin name -> promoter ids, in the shared bin order.
    promoters_by_bin: Vec<(String, Vec<String>)>,

    /// Promoters per megabase; meaningful after `calculate_density`.
    pub density: f64,
    /// Tertile label; set by the corpus-wide categorization pass.
    pub density_category: Option<DensityCategory>,
    /// Cluster -> fraction of this TAD's promoters in that cluster.
    pub specificity: HashMap<String, f64>,
}

impl Tad {
    pub fn new(
        chr: impl Into<String>,
        start: u32,
        end: u32,
        compartment: impl Into<String>,
        bins: &[String],
    ) -> Self {
        let id = format!("TAD{}-{}", start, end);
        Tad {
            chr: chr.into(),
            start,
            end,
            compartment: compartment.into(),
            id,
            length_mb: (end - start) as f64 / 1_000_000.0,
            promoters_by_bin: bins.iter().map(|b| (b.clone(), Vec::new())).collect(),
            density: 0.0,
            density_category: None,
            specificity: HashMap::new(),
        }
    }

    /// Append a promoter id to the named bin, unless that bin already
    /// holds it. A promoter may still appear in several bins of the same
    /// TAD; the union views deduplicate.
    pub fn load_promoter(&mut self, promoter_id: &str, bin: &str) -> Result<(), TadSetError> {
        let Some((_, ids)) = self.promoters_by_bin.iter_mut().find(|(b, _)| b == bin) else {
            return Err(TadSetError::UnknownBin {
                tad: self.id.clone(),
                bin: bin.to_string(),
            });
        };
        if !ids.iter().any(|id| id == promoter_id) {
            ids.push(promoter_id.to_string());
        }
        Ok(())
    }

    /// Deduplicated union of all bin lists, in first-seen bin order.
    pub fn promoter_ids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (_, ids) in &self.promoters_by_bin {
            for id in ids {
                if !seen.contains(&id.as_str()) {
                    seen.push(id);
                }
            }
        }
        seen
    }

    pub fn promoter_count(&self) -> usize {
        self.promoter_ids().len()
    }

    ///
    /// Promoters per megabase of this TAD.
    ///
    pub fn calculate_density(&mut self) {
        self.density = self.promoter_count() as f64 / self.length_mb;
    }

    /// For each cluster, the fraction of this TAD's resolvable promoters
    /// belonging to it. All-zero when the TAD holds no promoters from the
    /// listed clusters; otherwise the fractions sum to 1.
    pub fn calculate_specificity(&mut self, promoters: &PromoterSet, clusters: &[String]) {
        let members: Vec<&str> = self
            .promoter_ids()
            .into_iter()
            .filter(|id| promoters.get(id).is_some())
            .collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for cluster in clusters {
            let n = members
                .iter()
                .filter(|id| promoters.get(id).map(|p| &p.cluster == cluster).unwrap_or(false))
                .count();
            counts.insert(cluster.clone(), n);
        }

        let total: usize = counts.values().sum();
        self.specificity = clusters
            .iter()
            .map(|cluster| {
                let fraction = if total != 0 {
                    counts[cluster] as f64 / total as f64
                } else {
                    0.0
                };
                (cluster.clone(), fraction)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::promoter::{Promoter, Strand};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn bins() -> Vec<String> {
        vec!["Bin0".into(), "Bin1".into(), "Bin2".into()]
    }

    #[rstest]
    fn test_identifier_and_length() {
        let tad = Tad::new("chr1", 500_000, 2_500_000, "A", &bins());
        assert_eq!(tad.id, "TAD500000-2500000");
        assert_eq!(tad.length_mb, 2.0);
    }

    #[rstest]
    fn test_load_promoter_dedup_within_bin() {
        let mut tad = Tad::new("chr1", 0, 1_000_000, "A", &bins());
        tad.load_promoter("p1", "Bin1").unwrap();
        tad.load_promoter("p1", "Bin1").unwrap();
        tad.load_promoter("p1", "Bin2").unwrap();
        tad.load_promoter("p2", "Bin2").unwrap();

        // p1 sits in two bins but is listed once
        assert_eq!(tad.promoter_ids(), vec!["p1", "p2"]);
        assert_eq!(tad.promoter_count(), 2);
    }

    #[rstest]
    fn test_load_promoter_unknown_bin() {
        let mut tad = Tad::new("chr1", 0, 1_000_000, "A", &bins());
        let err = tad.load_promoter("p1", "Bin9").unwrap_err();
        assert!(matches!(err, TadSetError::UnknownBin { .. }));
    }

    #[rstest]
    fn test_density() {
        let mut tad = Tad::new("chr1", 0, 2_000_000, "B", &bins());
        tad.load_promoter("p1", "Bin1").unwrap();
        tad.load_promoter("p2", "Bin1").unwrap();
        tad.load_promoter("p3", "Bin2").unwrap();
        tad.calculate_density();
        assert_eq!(tad.density, 1.5);
    }

    #[rstest]
    fn test_specificity_sums_to_one() {
        let mut promoters = PromoterSet::new();
        for (id, cluster) in [("p1", "c1"), ("p2", "c1"), ("p3", "c2")] {
            promoters
                .register(Promoter::new(id, "chr1", 0, 10, Strand::Forward, cluster))
                .unwrap();
        }

        let clusters = vec!["c1".to_string(), "c2".to_string()];
        let mut tad = Tad::new("chr1", 0, 1_000_000, "A", &bins());
        for id in ["p1", "p2", "p3"] {
            tad.load_promoter(id, "Bin1").unwrap();
        }
        tad.calculate_specificity(&promoters, &clusters);

        let total: f64 = tad.specificity.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(tad.specificity["c1"], 2.0 / 3.0);
        assert_eq!(tad.specificity["c2"], 1.0 / 3.0);
    }

    #[rstest]
    fn test_specificity_empty_tad_is_all_zero() {
        let promoters = PromoterSet::new();
        let clusters = vec!["c1".to_string(), "c2".to_string()];
        let mut tad = Tad::new("chr1", 0, 1_000_000, "A", &bins());
        tad.calculate_specificity(&promoters, &clusters);

        assert_eq!(tad.specificity.len(), 2);
        assert!(tad.specificity.values().all(|&f| f == 0.0));
    }
}
