use clap::{Arg, ArgAction, Command, arg};

pub const TADS_CMD: &str = "tads";

pub fn create_tads_cli() -> Command {
    Command::new(TADS_CMD)
        .about("Summarize TAD promoter density tertiles and cluster specificity.")
        .arg(
            arg!(--tads <BED>)
                .required(true)
                .help("TAD BED file: chromosome, start, end, compartment"),
        )
        .arg(
            Arg::new("promoters")
                .long("promoters")
                .required(true)
                .action(ArgAction::Append)
                .help("Promoter BED file as cluster=path (repeatable)"),
        )
        .arg(
            arg!(--assignments <TSV>)
                .required(false)
                .help("Promoter placement file: chromosome, TAD id, promoter id, bin"),
        )
        .arg(
            Arg::new("tad-bins")
                .long("tad-bins")
                .required(false)
                .default_value("Bin0,Bin1,Bin2,Bin3,Bin4")
                .help("Shared bin-name set for all TADs, comma-separated"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output TSV path (default: stdout)"),
        )
}
