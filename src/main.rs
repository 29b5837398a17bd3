//! Probe suite for a locally running meeting app, driven over CDP.

mod browser;
mod models;
mod probe;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{ProbeKind, ProbeReport, ProbeTargets};

#[derive(Parser)]
#[command(name = "meeting-probe")]
#[command(about = "Headless-browser probes against a locally running meeting app")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output JSON reports (for pipeline consumption)
    #[arg(long, global = true)]
    json: bool,

    /// Run the browser in headed mode (visible)
    #[arg(long, global = true)]
    headed: bool,

    /// Meeting app URL (app and room probes)
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    app_url: String,

    /// Landing page URL
    #[arg(long, global = true, default_value = "http://localhost:3001")]
    landing_url: String,

    /// Directory screenshots are written into
    #[arg(long, global = true, default_value = "verification")]
    out_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the meeting app loads and reports a title
    App,
    /// Check the landing page renders its name input and create button
    Landing,
    /// Drive the create-meeting flow into the room view
    Room,
    /// Run all three probes in sequence
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("meeting_probe=info,chromiumoxide=warn"),
        ))
        .init();

    let targets = ProbeTargets {
        app_url: cli.app_url,
        landing_url: cli.landing_url,
        out_dir: cli.out_dir,
    };
    let headless = !cli.headed;

    let probes: &[ProbeKind] = match cli.command {
        Commands::App => &[ProbeKind::App],
        Commands::Landing => &[ProbeKind::Landing],
        Commands::Room => &[ProbeKind::Room],
        Commands::All => &[ProbeKind::App, ProbeKind::Landing, ProbeKind::Room],
    };

    let mut reports = Vec::with_capacity(probes.len());
    for &kind in probes {
        let report = probe::run(kind, &targets, headless).await?;
        if !cli.json {
            print_report(&report);
        }
        reports.push(report);
    }

    if cli.json {
        if reports.len() == 1 {
            println!("{}", serde_json::to_string_pretty(&reports[0])?);
        } else {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    if reports.iter().any(|r| !r.ok) {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(report: &ProbeReport) {
    if let Some(title) = &report.title {
        println!("{}", title);
    }
    match (&report.screenshot, &report.error) {
        (Some(path), None) => println!("Screenshot saved to {}", path),
        (_, Some(error)) => eprintln!("Error: {}", error),
        _ => {}
    }
}
