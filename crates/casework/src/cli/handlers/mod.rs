use std::path::PathBuf;

use anyhow::Result;
use casework_core::Config;
use clap::ArgMatches;

use crate::{
    case_file::CaseFile,
    commands::{self, CommandOutput, OutputFormat},
    error::CliError,
};

pub async fn dispatch(matches: &ArgMatches) -> Result<()> {
    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .map_err(CliError::from)?;

    match matches.subcommand() {
        Some(("status", sub_m)) => handle_status(sub_m, format).await,
        Some(("validate", sub_m)) => handle_validate(sub_m, &config, format).await,
        Some(("identifier", sub_m)) => handle_identifier(sub_m, format).await,
        Some(("note", sub_m)) => handle_note(sub_m, &config, format).await,
        _ => anyhow::bail!("Unknown command. Run 'casework --help' for usage."),
    }
}

async fn load_case(matches: &ArgMatches) -> Result<CaseFile> {
    let Some(path) = matches.get_one::<PathBuf>("case_file") else {
        anyhow::bail!("missing case file argument");
    };
    Ok(CaseFile::read(path).await?)
}

fn emit(output: &CommandOutput, format: OutputFormat) {
    println!("{}", output.render(format));
}

async fn handle_status(matches: &ArgMatches, format: OutputFormat) -> Result<()> {
    let file = load_case(matches).await?;
    emit(&commands::status::run(&file, matches.get_flag("key")), format);
    Ok(())
}

async fn handle_validate(matches: &ArgMatches, config: &Config, format: OutputFormat) -> Result<()> {
    let file = load_case(matches).await?;
    let report = commands::validate::run(&file, config);
    emit(&report.output(&file), format);

    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::InvalidCase {
            count: report.errors.len(),
        }
        .into())
    }
}

async fn handle_identifier(matches: &ArgMatches, format: OutputFormat) -> Result<()> {
    let file = load_case(matches).await?;
    emit(&commands::identifier::run(&file)?, format);
    Ok(())
}

async fn handle_note(matches: &ArgMatches, config: &Config, format: OutputFormat) -> Result<()> {
    let file = load_case(matches).await?;
    let width = matches
        .get_one::<u16>("width")
        .map_or(config.note_preview_chars, |width| usize::from(*width));
    emit(&commands::note::run(&file, width), format);
    Ok(())
}
