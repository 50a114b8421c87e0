use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use crate::errors::TadSetError;
use crate::models::promoter_set::PromoterSet;
use crate::models::tad::{DensityCategory, Tad};
use crate::utils::read_tsv_lines;

///
/// TadSet, the registry of all TADs of a run.
///
/// Owns the shared bin-name set that every member TAD is constructed
/// with, and hosts the corpus-wide derived statistics (density tertiles,
/// cluster specificity).
///
#[derive(Debug, Clone)]
pub struct TadSet {
    tads: Vec<Tad>,
    bins: Vec<String>,
    index: HashMap<String, usize>,
}

impl TadSet {
    /// Create an empty set with a fixed bin-name list shared by all TADs.
    pub fn new(bins: Vec<String>) -> Self {
        TadSet {
            tads: Vec::new(),
            bins,
            index: HashMap::new(),
        }
    }

    pub fn bins(&self) -> &[String] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.tads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tad> {
        self.tads.iter()
    }

    fn key(chr: &str, id: &str) -> String {
        format!("{}:{}", chr, id)
    }

    /// Add a TAD for the given interval. A repeated (chromosome, id) pair
    /// replaces the earlier entry.
    pub fn add(
        &mut self,
        chr: &str,
        start: u32,
        end: u32,
        compartment: &str,
    ) -> Result<&mut Tad, TadSetError> {
        if start >= end {
            return Err(TadSetError::ParseError(format!(
                "TAD interval must satisfy start < end, got {}..{}",
                start, end
            )));
        }

        let tad = Tad::new(chr, start, end, compartment, &self.bins);
        let key = Self::key(chr, &tad.id);
        match self.index.get(&key) {
            Some(&i) => {
                self.tads[i] = tad;
                Ok(&mut self.tads[i])
            }
            None => {
                self.index.insert(key, self.tads.len());
                self.tads.push(tad);
                Ok(self.tads.last_mut().unwrap())
            }
        }
    }

    pub fn get(&self, chr: &str, id: &str) -> Option<&Tad> {
        self.index.get(&Self::key(chr, id)).map(|&i| &self.tads[i])
    }

    pub fn get_mut(&mut self, chr: &str, id: &str) -> Option<&mut Tad> {
        self.index
            .get(&Self::key(chr, id))
            .map(|&i| &mut self.tads[i])
    }

    ///
    /// Iterate TADs located on a specific chromosome.
    ///
    pub fn by_chromosome<'a>(&'a self, chr: &'a str) -> impl Iterator<Item = &'a Tad> {
        self.tads.iter().filter(move |t| t.chr == chr)
    }

    ///
    /// Load TADs from a BED file.
    ///
    /// Expected columns (tab-separated): 0 chromosome, 1 start, 2 end,
    /// 3 compartment. Malformed records are fatal.
    ///
    /// Returns the number of TADs loaded.
    ///
    pub fn load_bed<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, TadSetError> {
        let mut loaded = 0usize;
        for line in read_tsv_lines(path.as_ref())? {
            let columns: Vec<&str> = line.trim_end().split('\t').collect();
            if columns.len() < 4 {
                return Err(TadSetError::ParseError(format!(
                    "expected at least 4 tab-separated columns, got {}: '{}'",
                    columns.len(),
                    line
                )));
            }

            let start: u32 = columns[1].parse().map_err(|_| {
                TadSetError::ParseError(format!("invalid start '{}'", columns[1]))
            })?;
            let end: u32 = columns[2].parse().map_err(|_| {
                TadSetError::ParseError(format!("invalid end '{}'", columns[2]))
            })?;

            self.add(columns[0], start, end, columns[3])?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Assign density tertiles across the whole set.
    ///
    /// Densities are recomputed, TADs are stable-sorted by
    /// (density, current category) ascending with registry order breaking
    /// ties, and split into contiguous chunks of `ceil(n / 3)`, labeled
    /// LD, MD, HD in order. When n is not divisible by 3 the last chunk
    /// is smaller.
    pub fn categorize_densities(&mut self) {
        for tad in &mut self.tads {
            tad.calculate_density();
        }

        let mut order: Vec<usize> = (0..self.tads.len()).collect();
        order.sort_by(|&a, &b| {
            let (ta, tb) = (&self.tads[a], &self.tads[b]);
            ta.density
                .partial_cmp(&tb.density)
                .unwrap_or(Ordering::Equal)
                .then(ta.density_category.cmp(&tb.density_category))
        });

        let chunk_size = (self.tads.len() + 2) / 3;
        if chunk_size == 0 {
            return;
        }
        let categories = [
            DensityCategory::Low,
            DensityCategory::Medium,
            DensityCategory::High,
        ];
        for (chunk, category) in order.chunks(chunk_size).zip(categories) {
            for &i in chunk {
                self.tads[i].density_category = Some(category);
            }
        }
    }

    /// Compute per-cluster specificity fractions for every TAD.
    pub fn calculate_specificities(&mut self, promoters: &PromoterSet, clusters: &[String]) {
        for tad in &mut self.tads {
            tad.calculate_specificity(promoters, clusters);
        }
    }
}
