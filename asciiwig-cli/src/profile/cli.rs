use clap::{Arg, Command, arg, value_parser};

pub const PROFILE_CMD: &str = "profile";

pub const DEFAULT_WIDTH: &str = "80";
pub const DEFAULT_ROWS: &str = "10";
pub const DEFAULT_COLUMN: &str = "4";

pub fn create_profile_cli() -> Command {
    Command::new(PROFILE_CMD)
        .about("Draw the signal of a track over a genomic region.")
        .arg_required_else_help(true)
        .arg(Arg::new("track").required(true).help("bigWig, TDF or bedGraph file"))
        .arg(
            arg!(-r --region <REGION>)
                .required(true)
                .help("Region to show, e.g. chr1:10000-20000"),
        )
        .arg(
            arg!(-w --width <WIDTH>)
                .required(false)
                .default_value(DEFAULT_WIDTH)
                .value_parser(value_parser!(usize))
                .help("Number of terminal columns"),
        )
        .arg(
            arg!(--rows <ROWS>)
                .required(false)
                .default_value(DEFAULT_ROWS)
                .value_parser(value_parser!(usize))
                .help("Height of the profile in lines"),
        )
        .arg(
            arg!(-c --column <COLUMN>)
                .required(false)
                .default_value(DEFAULT_COLUMN)
                .value_parser(value_parser!(usize))
                .help("bedGraph column (1-based, 4 or more) holding the values"),
        )
        .arg(arg!(--rpm "Show TDF coverage as reads per million"))
        .arg(
            arg!(--ymin <YMIN>)
                .required(false)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f32))
                .help("Lower y limit (default: from the data)"),
        )
        .arg(
            arg!(--ymax <YMAX>)
                .required(false)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f32))
                .help("Upper y limit (default: from the data)"),
        )
        .arg(
            arg!(--style <STYLE>)
                .required(false)
                .help("TOML file with the characters to draw with"),
        )
        .arg(arg!(--"no-title" "Do not print the title line"))
}
