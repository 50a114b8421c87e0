use clap::{Arg, ArgAction, Command, arg};

pub const COUNT_CMD: &str = "count";

pub fn create_count_cli() -> Command {
    Command::new(COUNT_CMD)
        .about("Count cluster-pair promoter interactions per score bin.")
        .arg(
            Arg::new("promoters")
                .long("promoters")
                .required(true)
                .action(ArgAction::Append)
                .help("Promoter BED file as cluster=path (repeatable)"),
        )
        .arg(
            arg!(--contacts <TSV>)
                .required(true)
                .help("Contacts file: side-A ids, side-B ids (comma-separated), score"),
        )
        .arg(
            arg!(--bins <BINS>)
                .required(true)
                .help("Ascending score-bin thresholds, comma-separated (e.g. 0,2,5)"),
        )
        .arg(
            arg!(--comparisons <PAIRS>)
                .required(true)
                .help("Cluster comparisons as A:B pairs, comma-separated (e.g. all:all,cluster1:rest)"),
        )
        .arg(
            arg!(--shuffles <N>)
                .required(false)
                .default_value("0")
                .help("Number of randomized-cluster trials; 0 counts the observed labels"),
        )
        .arg(
            arg!(--seed <SEED>)
                .required(false)
                .default_value("42")
                .help("Random seed for the shuffled trials"),
        )
        .arg(
            Arg::new("merged-cluster1")
                .long("merged-cluster1")
                .action(ArgAction::SetTrue)
                .help("Analyze the split cluster1A/cluster1B labels merged as cluster1"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output TSV path (default: stdout)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit the counts table as JSON instead of TSV"),
        )
}
