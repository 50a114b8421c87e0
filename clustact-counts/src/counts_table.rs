use std::io::Write;

use serde::Serialize;

use crate::comparisons::{ClusterSelector, Comparison};

/// One accumulator row, keyed by (score bin, clusterA, clusterB).
#[derive(Debug, Clone, Serialize)]
pub struct CountsRow {
    pub score_bin: f64,
    pub cluster_a: String,
    pub cluster_b: String,
    pub counts: u64,
}

///
/// CountsTable, the external accumulator the counting engine writes into.
///
/// Rows are keyed by the (score bin, clusterA, clusterB) triple with
/// exact-match lookup; updates are additive, so repeated counting passes
/// (e.g. permutation trials) accumulate into the same rows.
///
#[derive(Debug, Clone, Default, Serialize)]
pub struct CountsTable {
    rows: Vec<CountsRow>,
}

impl CountsTable {
    /// Create a table pre-populated with a zero row for every
    /// (bin, comparison) key, so even empty passes report explicit zeros.
    pub fn new(bins: &[f64], comparisons: &[Comparison]) -> Self {
        let mut table = CountsTable { rows: Vec::new() };
        for (a, b) in comparisons {
            for &bin in bins {
                table.rows.push(CountsRow {
                    score_bin: bin,
                    cluster_a: a.to_string(),
                    cluster_b: b.to_string(),
                    counts: 0,
                });
            }
        }
        table
    }

    pub fn rows(&self) -> &[CountsRow] {
        &self.rows
    }

    fn position(&self, bin: f64, cluster_a: &str, cluster_b: &str) -> Option<usize> {
        self.rows.iter().position(|r| {
            r.score_bin.to_bits() == bin.to_bits()
                && r.cluster_a == cluster_a
                && r.cluster_b == cluster_b
        })
    }

    /// Add `n` into the row at (bin, clusterA, clusterB), creating the
    /// row when absent.
    pub fn add(&mut self, bin: f64, cluster_a: &ClusterSelector, cluster_b: &ClusterSelector, n: u64) {
        let (a, b) = (cluster_a.to_string(), cluster_b.to_string());
        match self.position(bin, &a, &b) {
            Some(i) => self.rows[i].counts += n,
            None => self.rows.push(CountsRow {
                score_bin: bin,
                cluster_a: a,
                cluster_b: b,
                counts: n,
            }),
        }
    }

    /// Exact-match lookup; absent keys read as zero.
    pub fn get(&self, bin: f64, cluster_a: &str, cluster_b: &str) -> u64 {
        self.position(bin, cluster_a, cluster_b)
            .map(|i| self.rows[i].counts)
            .unwrap_or(0)
    }

    /// Reset every row to zero, keeping the key set.
    pub fn zero(&mut self) {
        for row in &mut self.rows {
            row.counts = 0;
        }
    }

    ///
    /// Write the table as tab-separated rows with a header line.
    ///
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "Score\tClusterA\tClusterB\tCounts")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                row.score_bin, row.cluster_a, row.cluster_b, row.counts
            )?;
        }
        Ok(())
    }
}
