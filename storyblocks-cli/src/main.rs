use std::{path::Path, time::Instant};

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;
use storyblocks_domain::{segment, IssueKey};

mod adapter;
mod cli_args;
mod telemetry;
mod types;
mod worker;

use crate::{
    adapter::{into_report, load_client, read_description},
    cli_args::{Cli, Command},
    types::FetchReport,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging();

    match cli.command {
        Command::Fetch { issues } => run_fetch(cli.config.as_deref(), &issues),
        Command::Segment { file } => run_segment(file.as_deref()),
        Command::Key { input } => {
            println!("{}", IssueKey::resolve(&input));
            Ok(())
        }
    }
}

fn run_fetch(config_path: Option<&Path>, inputs: &[String]) -> Result<()> {
    let client = load_client(config_path)?;
    let mut reports = worker::fetch_all(&client, inputs)
        .into_iter()
        .map(|outcome| into_report(&client, outcome))
        .collect::<Vec<_>>();

    if reports.len() == 1 {
        return match reports.remove(0) {
            FetchReport::Story(story) => print_json(&story),
            FetchReport::Failure(failure) => {
                bail!("failed to fetch {}: {}", failure.input, failure.error)
            }
        };
    }

    print_json(&reports)?;

    for report in &reports {
        if let FetchReport::Failure(failure) = report {
            eprintln!("{}: {}", failure.input, failure.error);
        }
    }

    let failed = reports.iter().filter(|report| report.is_failure()).count();
    if failed > 0 {
        bail!("{} of {} issues could not be fetched", failed, reports.len());
    }
    Ok(())
}

fn run_segment(file: Option<&Path>) -> Result<()> {
    let text = read_description(file)?;
    let started = Instant::now();
    let blocks = segment(&text);
    telemetry::emit_success("segment", None, started.elapsed());
    print_json(&blocks)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
