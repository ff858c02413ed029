//! Argument definitions

use clap::{value_parser, Arg, ArgAction, Command};
use seedtrace_schedule::MAX_WINDOW_DAYS;
use std::path::PathBuf;

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn reference_arg() -> Arg {
    Arg::new("reference")
        .long("reference")
        .value_name("YYYY-MM-DD")
        .help("Reference day (defaults to today)")
}

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Top-level `seedtrace` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("seedtrace")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Seed-to-sale lifecycle history and compliance calendar")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Projector config (.toml or .json)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("classify")
                .about("Classify lifecycle events into a history table")
                .arg(file_arg("events", "JSON array of lifecycle events"))
                .arg(json_flag())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_parser(["licensing", "operator"])
                        .help("Show only one category"),
                )
                .arg(
                    Arg::new("batch")
                        .long("batch")
                        .value_name("ID")
                        .help("Show only batches whose id contains this text"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .value_name("TEXT")
                        .help("Free-text filter over type, origin and responsible"),
                ),
        )
        .subcommand(
            Command::new("cultivation")
                .about("Project harvest, transplant and drying-check dates")
                .arg(file_arg("plants", "JSON array of plant records"))
                .arg(file_arg("harvests", "JSON array of harvest records"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("audit")
                .about("Show the audit and compliance calendar")
                .arg(reference_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("window")
                .about("List everything scheduled over the next N days")
                .arg(file_arg("plants", "JSON array of plant records"))
                .arg(file_arg("harvests", "JSON array of harvest records"))
                .arg(reference_arg())
                .arg(
                    Arg::new("days")
                        .long("days")
                        .default_value("7")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64).range(..=MAX_WINDOW_DAYS))
                        .help("Number of days to show"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("month")
                .about("Render a Sunday-first month calendar")
                .arg(file_arg("plants", "JSON array of plant records"))
                .arg(file_arg("harvests", "JSON array of harvest records"))
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_name("YYYY-MM")
                        .help("Month to render (defaults to the current month)"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("turnaround")
                .about("Report lab turnaround per submission")
                .arg(file_arg("events", "JSON array of lifecycle events"))
                .arg(json_flag()),
        )
}
