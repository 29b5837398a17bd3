//! Probe Suite Quickstart
//!
//! Runs the full probe suite against a locally running meeting app.
//!
//! # Prerequisites
//! - Chrome/Chromium installed
//! - Meeting app serving on :3000 and its landing page on :3001
//!
//! # Running
//! ```bash
//! cargo run --example quickstart
//! ```

use std::process::Command;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Meeting Probe Quickstart");
    println!("========================\n");

    println!("1. App-readiness probe (:3000)...");
    run_probe("app")?;

    println!("2. Landing UI probe (:3001)...");
    run_probe("landing")?;

    println!("3. Meeting-room flow probe (:3000)...");
    run_probe("room")?;

    println!("Done! Screenshots are under verification/.");
    println!("\nTry more:");
    println!("  meeting-probe all --json          # machine-readable reports");
    println!("  meeting-probe app --out-dir /tmp  # write evidence elsewhere");

    Ok(())
}

fn run_probe(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let status = Command::new(env!("CARGO"))
        .args(["run", "--quiet", "--", name])
        .status()?;
    println!("   exit: {}\n", status);
    Ok(())
}
