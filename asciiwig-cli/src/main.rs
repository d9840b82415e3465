mod chroms;
mod profile;

use anyhow::Result;
use clap::{ArgAction, ArgMatches, Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "asciiwig";
    pub const AUTHOR: &str = "asciiwig developers";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author(consts::AUTHOR)
        .about("Draw quantitative genomic tracks (bigWig, TDF, bedGraph) as text profiles in the terminal.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "More logging, repeat for even more")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(profile::cli::create_profile_cli())
        .subcommand(chroms::cli::create_chroms_cli())
}

///
/// Warnings by default, `-v` for info, `-vv` for debug. `RUST_LOG` wins.
///
fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(&matches);

    match matches.subcommand() {
        //
        // PROFILE
        //
        Some((profile::cli::PROFILE_CMD, matches)) => {
            profile::handlers::run_profile(matches)?;
        }

        //
        // CHROMOSOME NAMES
        //
        Some((chroms::cli::CHROMS_CMD, matches)) => {
            chroms::handlers::run_chroms(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
