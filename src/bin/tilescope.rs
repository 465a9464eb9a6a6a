//! Command-line interface for tilescope
//! Prints ck_tile values and types the way the debugger integration does, without a debugger.
//!
//! Usage:
//!   tilescope print [`<type>`] [--snapshot `<file>`]     - Print a value (live snapshot or type only)
//!   tilescope type-print [`<type>`]                     - Print a type alias with no storage
//!   tilescope mermaid [`<type>`] [--snapshot `<file>`]   - Transform flow graph as Mermaid
//!   tilescope pipeline [`<type>`] [--format text|json]  - Recovered transform pipeline
//!   tilescope parse-rendered [`<file>`]                 - Re-read a rendered descriptor block
//!   tilescope list-printers                           - Show the dispatch table
//!
//! A missing `<type>` or `<file>` argument is read from stdin.
//! `--config <file>` and `--max-sane-value <n>` adjust the printer limits for any subcommand.

use clap::{Arg, ArgMatches, Command};
use std::io::Read;
use tilescope::cktile::commands;
use tilescope::cktile::config::{Loader, PrinterConfig};
use tilescope::cktile::printers;
use tilescope::cktile::value::{SnapshotValue, ValueSource};
use tracing_subscriber::EnvFilter;

fn type_arg() -> Arg {
    Arg::new("type")
        .help("Type string as reported by the debugger (read from stdin when omitted)")
        .index(1)
}

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .short('s')
        .help("JSON or YAML snapshot of a live value; its type replaces <type>")
}

fn main() {
    init_tracing();

    let matches = Command::new("tilescope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Readable views of ck_tile tensor types")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file overriding the default printer limits"),
        )
        .arg(
            Arg::new("max_sane_value")
                .long("max-sane-value")
                .global(true)
                .value_parser(clap::value_parser!(u64))
                .help("Largest value read from memory that is still believed"),
        )
        .subcommand(
            Command::new("print")
                .about("Print a value through the printer dispatch table")
                .arg(type_arg())
                .arg(snapshot_arg()),
        )
        .subcommand(
            Command::new("type-print")
                .about("Print a type alias that has no runtime storage")
                .arg(type_arg()),
        )
        .subcommand(
            Command::new("mermaid")
                .about("Generate a Mermaid diagram of a descriptor or adaptor")
                .arg(type_arg())
                .arg(snapshot_arg()),
        )
        .subcommand(
            Command::new("pipeline")
                .about("Show the transform pipeline recovered from a descriptor or adaptor")
                .arg(type_arg())
                .arg(snapshot_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("parse-rendered")
                .about("Rebuild a pipeline from a rendered descriptor or adaptor block")
                .arg(
                    Arg::new("path")
                        .help("File holding the rendered text (read from stdin when omitted)")
                        .index(1),
                ),
        )
        .subcommand(Command::new("list-printers").about("List the printer dispatch table"))
        .get_matches();

    let config = load_config(
        matches.get_one::<String>("config"),
        matches.get_one::<u64>("max_sane_value").copied(),
    );

    match matches.subcommand() {
        Some(("print", print_matches)) => {
            with_source(print_matches, |source| {
                println!("{}", commands::print_value(source, &config));
            });
        }
        Some(("type-print", type_matches)) => {
            let type_str = type_input(type_matches);
            println!("{}", commands::type_print(&type_str, &config));
        }
        Some(("mermaid", mermaid_matches)) => {
            with_source(mermaid_matches, |source| {
                let diagram = commands::generate_mermaid(source, &config).unwrap_or_else(|e| fail(e));
                println!("{}", diagram);
            });
        }
        Some(("pipeline", pipeline_matches)) => {
            let format = pipeline_matches.get_one::<String>("format").unwrap();
            with_source(pipeline_matches, |source| {
                handle_pipeline_command(source, &config, format);
            });
        }
        Some(("parse-rendered", parse_matches)) => {
            let text = match parse_matches.get_one::<String>("path") {
                Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
                    eprintln!("Error reading file: {}", e);
                    std::process::exit(1);
                }),
                None => read_stdin(),
            };
            let json = commands::parse_rendered_json(&text).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
        Some(("list-printers", _)) => {
            println!("{}", printers::describe_table());
        }
        _ => unreachable!(),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&String>, max_sane_value: Option<u64>) -> PrinterConfig {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let loaded = match max_sane_value {
        Some(bound) => loader
            .set_override("limits.max_sane_value", i64::try_from(bound).unwrap_or(i64::MAX))
            .and_then(Loader::build),
        None => loader.build(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    })
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

fn read_stdin() -> String {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .unwrap_or_else(|e| {
            eprintln!("Error reading stdin: {}", e);
            std::process::exit(1);
        });
    input
}

fn type_input(matches: &ArgMatches) -> String {
    match matches.get_one::<String>("type") {
        Some(type_str) => type_str.clone(),
        None => read_stdin().trim().to_string(),
    }
}

/// Run `action` on the snapshot value when one is given, otherwise on the bare type
fn with_source(matches: &ArgMatches, action: impl FnOnce(&ValueSource)) {
    match matches.get_one::<String>("snapshot") {
        Some(path) => {
            let snapshot = SnapshotValue::from_path(path).unwrap_or_else(|e| fail(e));
            action(&ValueSource::live(&snapshot));
        }
        None => action(&ValueSource::type_only(type_input(matches))),
    }
}

fn handle_pipeline_command(source: &ValueSource, config: &PrinterConfig, format: &str) {
    let report = commands::pipeline_report(source, config).unwrap_or_else(|e| fail(e));
    let output = match format {
        "json" => report.to_json().unwrap_or_else(|e| fail(e)),
        _ => report.to_text(),
    };
    println!("{}", output);
}
