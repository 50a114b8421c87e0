use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use clustact_core::models::{ClusterScheme, PromoterSet, TadSet};
use clustact_core::utils::read_tsv_lines;
use clustact_counts::{AnalysisContext, Contact, parse_comparisons};

pub fn run_count(matches: &ArgMatches) -> Result<()> {
    let promoter_args: Vec<&String> = matches
        .get_many::<String>("promoters")
        .expect("--promoters is required")
        .collect();
    let contacts_path = matches
        .get_one::<String>("contacts")
        .expect("--contacts is required");
    let bins = parse_bins(matches.get_one::<String>("bins").unwrap())?;
    let comparisons = parse_comparisons(matches.get_one::<String>("comparisons").unwrap())
        .map_err(|e| anyhow::anyhow!("invalid --comparisons: {}", e))?;
    let shuffles: usize = matches
        .get_one::<String>("shuffles")
        .unwrap()
        .parse()
        .context("--shuffles must be a non-negative integer")?;
    let seed: u64 = matches
        .get_one::<String>("seed")
        .unwrap()
        .parse()
        .context("--seed must be an integer")?;
    let merged = matches.get_flag("merged-cluster1");
    let output_path = matches.get_one::<String>("output");
    let as_json = matches.get_flag("json");

    // Load promoters, one BED per cluster label
    let mut promoters = PromoterSet::new();
    for spec in promoter_args {
        let (cluster, path) = spec
            .split_once('=')
            .with_context(|| format!("--promoters '{}' is not of the form cluster=path", spec))?;
        let loaded = promoters
            .load_bed(path, cluster)
            .with_context(|| format!("Failed to load promoter BED '{}'", path))?;
        println!("Loaded {} promoters for cluster {}", loaded, cluster);
    }
    let scheme = if merged {
        ClusterScheme::Merged
    } else {
        ClusterScheme::Split
    };
    if merged {
        promoters.restore_original_clusters(ClusterScheme::Merged);
    }

    let clusters = promoters.clusters();
    let contacts = load_contacts(Path::new(contacts_path))
        .with_context(|| format!("Failed to load contacts '{}'", contacts_path))?;
    println!("Loaded {} contacts", contacts.len());

    let mut ctx = AnalysisContext::new(
        promoters,
        TadSet::new(Vec::new()),
        clusters,
        bins,
        comparisons,
    )?;
    for contact in contacts {
        ctx.contacts.push(contact);
    }

    if shuffles == 0 {
        ctx.compute_cluster_counts();
        ctx.count_interactions()?;
    } else {
        // accumulate the null distribution over seeded trials
        let sizes = ctx.promoters.cluster_sizes();
        let mut rng = StdRng::seed_from_u64(seed);
        let pb = ProgressBar::new(shuffles as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials")
                .unwrap(),
        );
        for _ in 0..shuffles {
            ctx.promoters.reassign_clusters(&sizes, &mut rng)?;
            ctx.compute_cluster_counts();
            ctx.count_interactions()?;
            pb.inc(1);
        }
        pb.finish_with_message("shuffled trials complete");
        ctx.promoters.restore_original_clusters(scheme);
    }

    write_output(&ctx, output_path.map(|s| s.as_str()), as_json)?;
    Ok(())
}

fn parse_bins(spec: &str) -> Result<Vec<f64>> {
    let bins = spec
        .split(',')
        .map(|t| {
            t.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid bin threshold '{}'", t))
        })
        .collect::<Result<Vec<f64>>>()?;
    if bins.is_empty() {
        bail!("--bins must name at least one threshold");
    }
    Ok(bins)
}

/// Contacts file: three tab-separated columns, comma-separated side-A
/// promoter ids, comma-separated side-B ids, numeric score.
fn load_contacts(path: &Path) -> Result<Vec<Contact>> {
    let mut contacts = Vec::new();
    for line in read_tsv_lines(path)? {
        let columns: Vec<&str> = line.trim_end().split('\t').collect();
        if columns.len() < 3 {
            bail!(
                "expected 3 tab-separated columns, got {}: '{}'",
                columns.len(),
                line
            );
        }
        let side_a = split_ids(columns[0]);
        let side_b = split_ids(columns[1]);
        let score: f64 = columns[2]
            .parse()
            .with_context(|| format!("invalid contact score '{}'", columns[2]))?;
        contacts.push(Contact::new(side_a, side_b, score));
    }
    Ok(contacts)
}

fn split_ids(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_output(ctx: &AnalysisContext, output: Option<&str>, as_json: bool) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("Failed to create '{}'", path))?),
        None => Box::new(io::stdout()),
    };

    if as_json {
        serde_json::to_writer_pretty(&mut writer, ctx.counts())?;
        writeln!(writer)?;
    } else {
        ctx.counts().write_tsv(&mut writer)?;
    }
    Ok(())
}
