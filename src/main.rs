mod cli;
mod config;
mod graph;
mod lockfile;
mod manifest;
mod report;
mod version;

use clap::Parser;
use cli::Cli;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_check(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_check(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration for default paths; CLI flags win
    let config = config::Config::load()?;

    let packages_path = cli
        .packages
        .or(config.packages)
        .unwrap_or_else(|| PathBuf::from("packages_list.txt"));
    let manifest_path = cli
        .manifest
        .or(config.manifest)
        .unwrap_or_else(|| PathBuf::from("package.json"));
    let lockfile_path = cli
        .lockfile
        .or(config.lockfile)
        .unwrap_or_else(|| PathBuf::from("package-lock.json"));
    let output_path = cli
        .output
        .or(config.output)
        .unwrap_or_else(|| PathBuf::from("dependency-check-results.json"));

    // All inputs are read once up front; any unreadable input is fatal.
    let queries = cli::load_package_list(&packages_path)?;
    let direct = manifest::load_direct_dependencies(&manifest_path)?;
    let graph = lockfile::load(&lockfile_path)?;

    if !cli.json {
        println!("Checking packages...\n");
    }

    let report = report::check_packages(&queries, &direct, &graph);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        report::render(&report, queries.len());
    }

    // Not-found packages and version mismatches are reported, never fatal.
    report.save(&output_path)?;
    if !cli.json {
        println!("Results saved to: {}\n", output_path.display());
    }

    Ok(())
}
