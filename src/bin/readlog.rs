//! Command-line interface for readlog
//! Parses reading-log files (or single lines) into item records and prints them.
//!
//! Usage:
//!   readlog parse `<path>` [--config `<yaml>`] [--format json|yaml] [--catch-all]  - Parse a log file
//!   readlog line `<text>`...  [--config `<yaml>`] [--format json|yaml]             - Parse lines given as arguments
//!   readlog config [--config `<yaml>`]                                              - Print the effective configuration

use clap::{Arg, ArgAction, ArgMatches, Command};
use readlog::readlog::config::{Config, Loader};
use readlog::{Item, LineError, LogParser};
use std::process;
use tracing_subscriber::EnvFilter;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("YAML configuration layered over the built-in defaults")
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["json", "yaml"])
        .default_value("json")
}

fn main() {
    init_logging();

    let matches = Command::new("readlog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing pipe-delimited reading logs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a reading-log file")
                .arg(
                    Arg::new("path")
                        .help("Path to the reading log")
                        .required(true)
                        .index(1),
                )
                .arg(config_arg())
                .arg(format_arg())
                .arg(
                    Arg::new("catch-all")
                        .long("catch-all")
                        .help("Report unexpected failures as generic per-line errors")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("line")
                .about("Parse reading-log lines given on the command line")
                .arg(
                    Arg::new("text")
                        .help("Lines to parse, in order")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(config_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration")
                .arg(config_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = required(parse_matches, "path");
            let format = required(parse_matches, "format");
            let config = load_config(parse_matches, parse_matches.get_flag("catch-all"));
            handle_parse_command(path, format, config);
        }
        Some(("line", line_matches)) => {
            let lines: Vec<&String> = line_matches
                .get_many::<String>("text")
                .map(|values| values.collect())
                .unwrap_or_default();
            let format = required(line_matches, "format");
            let config = load_config(line_matches, false);
            handle_line_command(&lines, format, config);
        }
        Some(("config", config_matches)) => {
            let config = load_config(config_matches, false);
            print_output(&config, "yaml");
        }
        _ => unreachable!(),
    }
}

/// Install the stderr subscriber, filtered by `READLOG_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("READLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    match matches.get_one::<String>(id) {
        Some(value) => value,
        None => {
            eprintln!("Error: missing argument {id}");
            process::exit(2);
        }
    }
}

fn load_config(matches: &ArgMatches, catch_all: bool) -> Config {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let loader = if catch_all {
        loader.set_override("catch_all_errors", true)
    } else {
        Ok(loader)
    };
    loader.and_then(Loader::build).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    })
}

fn new_parser(config: Config) -> LogParser {
    LogParser::new(config).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, config: Config) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        process::exit(1);
    });

    let report = new_parser(config).parse_str(&source);
    print_output(&report.items, format);
    report_errors(path, &report.errors);
}

/// Handle the line command
fn handle_line_command(lines: &[&String], format: &str, config: Config) {
    let mut parser = new_parser(config);
    let mut items: Vec<Item> = Vec::new();
    let mut errors = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        match parser.parse_line(line) {
            Ok(parsed) => items.extend(parsed),
            Err(error) => errors.push(LineError {
                line_number: index + 1,
                line: line.to_string(),
                error,
            }),
        }
    }
    print_output(&items, format);
    report_errors("<args>", &errors);
}

fn print_output<T: serde::Serialize>(value: &T, format: &str) {
    let rendered = match format {
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(value)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            process::exit(1);
        }
    }
}

fn report_errors(origin: &str, errors: &[LineError]) {
    if errors.is_empty() {
        return;
    }
    for error in errors {
        eprintln!("{origin}: {error}");
        eprintln!("    {}", error.line);
    }
    process::exit(1);
}
