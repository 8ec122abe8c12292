pub mod handlers;

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("casework")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect patient case files: status, validation, pledge identifiers, notes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file layered over the global config"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print machine-readable JSON"),
        )
        .subcommand(cmd_status())
        .subcommand(cmd_validate())
        .subcommand(cmd_identifier())
        .subcommand(cmd_note())
}

fn case_file_arg() -> Arg {
    Arg::new("case_file")
        .required(true)
        .value_name("CASE_FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Path to a JSON case file")
}

fn cmd_status() -> Command {
    Command::new("status")
        .about("Show the derived case status")
        .arg(case_file_arg())
        .arg(
            Arg::new("key")
                .long("key")
                .action(ArgAction::SetTrue)
                .help("Print the machine key (e.g. needs_appt) instead of the label"),
        )
}

fn cmd_validate() -> Command {
    Command::new("validate")
        .about("Check the case for missing or inconsistent fields")
        .arg(case_file_arg())
}

fn cmd_identifier() -> Command {
    Command::new("identifier")
        .about("Print the pledge identifier")
        .arg(case_file_arg())
}

fn cmd_note() -> Command {
    Command::new("note")
        .about("Preview the most recent note")
        .arg(case_file_arg())
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("CHARS")
                .value_parser(value_parser!(u16).range(1..))
                .help("Preview width in characters (defaults to the configured width)"),
        )
}
