//! MinLib CLI
//!
//! Extracts the headers and libraries a C/C++ library actually uses and
//! copies them into vendoring directories.

mod params;

use anyhow::{bail, Result};
use clap::Parser;
use minlib_bundle::{bundle_library, BundleReport};
use minlib_core::paths::absolutize;
use minlib_core::BundleConfig;
use minlib_parser::preprocessor::run_preprocessor;
use minlib_parser::{extract_manifest_from_file, ScopeRoots};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minlib")]
#[command(author, version, about = "Bundle the minimal set of files a C/C++ library depends on", long_about = None)]
struct Cli {
    /// Config file name and/or key=value parameters
    #[arg(value_name = "ARGS")]
    args: Vec<String>,

    /// Print a configuration file template and exit
    #[arg(long = "config", conflicts_with_all = ["args", "preprocessed"])]
    config_template: bool,

    /// Parse an existing preprocessor output file instead of running the compiler
    #[arg(long, value_name = "FILE")]
    preprocessed: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.config_template {
        print!("{}", params::CONFIG_TEMPLATE);
        return Ok(());
    }

    cmd_bundle(&cli)
}

fn cmd_bundle(cli: &Cli) -> Result<()> {
    if cli.args.is_empty() && cli.preprocessed.is_none() {
        bail!(
            "no arguments were passed, nothing to do\n\n\
             USAGE:\n    minlib [CONFIG_FILE | --config] [key=value ...]"
        );
    }

    let pairs = params::collect(&cli.args)?;
    let config = params::builder_from(pairs)?
        .require_preprocessor(cli.preprocessed.is_none())
        .build()?;

    let output = match &cli.preprocessed {
        Some(file) => absolutize(file, &std::env::current_dir()?),
        None => run_preprocessor(&config)?,
    };

    let roots = ScopeRoots::new(config.include_dirs());
    let manifest = extract_manifest_from_file(&output, &roots)?;
    let report = bundle_library(&config, manifest.clone())?;

    match cli.format.as_str() {
        "json" => {
            let result = serde_json::json!({
                "preprocessor_output": output,
                "manifest": manifest,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "text" => print_summary(&report, &config),
        other => bail!("unknown format: {}", other),
    }

    Ok(())
}

fn print_summary(report: &BundleReport, config: &BundleConfig) {
    println!("📦 Bundle summary:");
    println!(
        "   Headers: {} -> {}",
        report.headers.len(),
        config.include_out_dir().display()
    );
    println!(
        "   Libraries: {} of {} -> {}",
        report.libraries.len(),
        report.libraries.len() + report.missing_libraries.len() + report.shadowed_libraries.len(),
        config.lib_out_dir().display()
    );

    if !report.missing_libraries.is_empty() {
        println!("   Not found:");
        for lib in &report.missing_libraries {
            println!("     {}", lib);
        }
    }

    if !report.shadowed_libraries.is_empty() {
        println!("   Skipped (file name already staged):");
        for lib in &report.shadowed_libraries {
            println!("     {}", lib);
        }
    }

    for op in &report.copies {
        println!("   Copied {} -> {}", op.source.display(), op.destination.display());
    }
}
