use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use clustact_core::models::{PromoterSet, TadSet};
use clustact_core::utils::read_tsv_lines;

pub fn run_tads(matches: &ArgMatches) -> Result<()> {
    let tads_path = matches
        .get_one::<String>("tads")
        .expect("--tads is required");
    let promoter_args: Vec<&String> = matches
        .get_many::<String>("promoters")
        .expect("--promoters is required")
        .collect();
    let assignments_path = matches.get_one::<String>("assignments");
    let bin_names: Vec<String> = matches
        .get_one::<String>("tad-bins")
        .unwrap()
        .split(',')
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();
    let output_path = matches.get_one::<String>("output");

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

    let mut tads = TadSet::new(bin_names);
    let loaded = tads
        .load_bed(tads_path)
        .with_context(|| format!("Failed to load TAD BED '{}'", tads_path))?;
    println!("Loaded {} TADs", loaded);

    if let Some(path) = assignments_path {
        apply_assignments(Path::new(path), &mut tads, &mut promoters)
            .with_context(|| format!("Failed to apply assignments '{}'", path))?;
    }

    let clusters = promoters.clusters();
    tads.categorize_densities();
    tads.calculate_specificities(&promoters, &clusters);

    let mut writer: Box<dyn Write> = match output_path {
        Some(path) => {
            Box::new(File::create(path).with_context(|| format!("Failed to create '{}'", path))?)
        }
        None => Box::new(io::stdout()),
    };
    write_summary(&tads, &clusters, &mut writer)?;
    Ok(())
}

/// Placement file: chromosome, TAD id, promoter id, bin. One row per
/// promoter-in-bin association.
fn apply_assignments(
    path: &Path,
    tads: &mut TadSet,
    promoters: &mut PromoterSet,
) -> Result<()> {
    for line in read_tsv_lines(path)? {
        let columns: Vec<&str> = line.trim_end().split('\t').collect();
        if columns.len() < 4 {
            bail!(
                "expected 4 tab-separated columns, got {}: '{}'",
                columns.len(),
                line
            );
        }
        let (chr, tad_id, promoter_id, bin) = (columns[0], columns[1], columns[2], columns[3]);

        let tad = tads
            .get_mut(chr, tad_id)
            .with_context(|| format!("unknown TAD {} on {}", tad_id, chr))?;
        tad.load_promoter(promoter_id, bin)?;

        if let Some(promoter) = promoters.get_mut(promoter_id) {
            promoter.load_tad(tad_id, bin);
        }
    }
    Ok(())
}

fn write_summary<W: Write>(tads: &TadSet, clusters: &[String], writer: &mut W) -> Result<()> {
    write!(writer, "Chr\tStart\tEnd\tId\tCompartment\tPromoters\tDensity\tCategory")?;
    for cluster in clusters {
        write!(writer, "\t{}", cluster)?;
    }
    writeln!(writer)?;

    for tad in tads.iter() {
        let category = tad
            .density_category
            .map(|c| c.to_string())
            .unwrap_or_else(|| ".".to_string());
        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{}",
            tad.chr, tad.start, tad.end, tad.id, tad.compartment,
            tad.promoter_count(), tad.density, category
        )?;
        for cluster in clusters {
            let fraction = tad.specificity.get(cluster).copied().unwrap_or(0.0);
            write!(writer, "\t{:.4}", fraction)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
