mod count;
mod tads;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "clustact";
    pub const BIN_NAME: &str = "clustact";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Interaction statistics between promoter clusters over score-binned contacts, with TAD density and specificity summaries.")
        .subcommand_required(true)
        .subcommand(count::cli::create_count_cli())
        .subcommand(tads::cli::create_tads_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // COUNT
        //
        Some((count::cli::COUNT_CMD, matches)) => {
            count::handlers::run_count(matches)?;
        }

        //
        // TADS
        //
        Some((tads::cli::TADS_CMD, matches)) => {
            tads::handlers::run_tads(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
