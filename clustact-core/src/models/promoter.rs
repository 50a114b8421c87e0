use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Sentinel bin name marking a promoter associated with no spatial bin.
pub const UNBINNED: &str = "Bin0";

/// Strand of a genomic feature.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl FromStr for Strand {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Ok(Strand::Unknown),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

///
/// Promoter struct, one annotated regulatory element with a cluster label.
///
/// Identity fields (`id`, `chr`, `start`, `end`, `strand`) are fixed once
/// constructed; `cluster` is mutable to support randomized-cluster trials.
///
#[derive(Debug, Clone)]
pub struct Promoter {
    pub id: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub cluster: String,

    /// TAD id -> spatial bins this promoter occupies within that TAD.
    pub tads: HashMap<String, Vec<String>>,
}

impl Promoter {
    pub fn new(
        id: impl Into<String>,
        chr: impl Into<String>,
        start: u32,
        end: u32,
        strand: Strand,
        cluster: impl Into<String>,
    ) -> Self {
        Promoter {
            id: id.into(),
            chr: chr.into(),
            start,
            end,
            strand,
            cluster: cluster.into(),
            tads: HashMap::new(),
        }
    }

    ///
    /// Get length of the promoter
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Record that this promoter falls in `bin` of the TAD `tad_id`.
    ///
    /// The `Bin0`/`Bin0` pair is the unbinned sentinel: the promoter is
    /// associated with no TAD bin and the association is recorded once
    /// under the `Bin0` key.
    pub fn load_tad(&mut self, tad_id: &str, bin: &str) {
        if tad_id == UNBINNED && bin == UNBINNED {
            self.tads
                .insert(UNBINNED.to_string(), vec![UNBINNED.to_string()]);
        } else {
            self.tads
                .entry(tad_id.to_string())
                .or_default()
                .push(bin.to_string());
        }
    }
}

impl Display for Promoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.id, self.strand, self.cluster
        )
    }
}
