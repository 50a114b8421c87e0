use std::fmt::{self, Display};
use std::str::FromStr;

/// One side of a cluster-pair comparison.
///
/// `all` ignores cluster membership entirely; `rest` is the complement of
/// the cluster named on the other side and is only valid as the second
/// element of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClusterSelector {
    All,
    Rest,
    Named(String),
}

impl FromStr for ClusterSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ClusterSelector::All),
            "rest" => Ok(ClusterSelector::Rest),
            name => Ok(ClusterSelector::Named(name.to_string())),
        }
    }
}

impl Display for ClusterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterSelector::All => write!(f, "all"),
            ClusterSelector::Rest => write!(f, "rest"),
            ClusterSelector::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A (clusterA, clusterB) comparison pair.
pub type Comparison = (ClusterSelector, ClusterSelector);

/// Parse a comma-separated comparison list of `A:B` pairs, e.g.
/// `"all:all,cluster1:rest,cluster1:cluster2"`.
pub fn parse_comparisons(spec: &str) -> Result<Vec<Comparison>, String> {
    let mut comparisons = Vec::new();
    for pair in spec.split(',').filter(|p| !p.trim().is_empty()) {
        let Some((a, b)) = pair.split_once(':') else {
            return Err(format!("comparison '{}' is not of the form A:B", pair));
        };
        let a: ClusterSelector = a.trim().parse().unwrap();
        let b: ClusterSelector = b.trim().parse().unwrap();
        comparisons.push((a, b));
    }
    if comparisons.is_empty() {
        return Err("comparison list is empty".to_string());
    }
    Ok(comparisons)
}
