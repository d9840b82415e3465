use clap::{Arg, Command};

pub const CHROMS_CMD: &str = "chroms";

pub fn create_chroms_cli() -> Command {
    Command::new(CHROMS_CMD)
        .about("List the chromosomes a track has data for.")
        .arg_required_else_help(true)
        .arg(Arg::new("track").required(true).help("bigWig, TDF or bedGraph file"))
}
