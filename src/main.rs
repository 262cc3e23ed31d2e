mod config;
mod discovery;
mod error;
mod io;
mod logging;
mod models;
mod utils;

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

use crate::config::*;
use crate::discovery::*;
use crate::error::DumpError;
use crate::io::*;
use crate::models::{ExcludePatterns, WriteSummary};
use crate::utils::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match DumpConfig::from_args(&args).await {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    // Compiled before the initializer so a bad pattern never truncates the output.
    let exclude = match ExcludePatterns::new(&config.exclude) {
        Ok(exclude) => exclude,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    if run(&config, exclude).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs initializer, enumerator and aggregator in order. Every stage that can
/// run does; returns false if any of them failed.
async fn run(config: &DumpConfig, exclude: ExcludePatterns) -> bool {
    let start_time = Instant::now();
    let mut ok = true;

    info!(root = %config.root.display(), output = %config.output.display(), "starting dump");

    if config.append {
        info!("append mode, keeping existing output");
    } else {
        match create_output(&config.output).await {
            Ok(()) => println!("File '{}' created successfully.", config.output.display()),
            Err(err) => {
                report(&err);
                ok = false;
            }
        }
    }

    // Built after the initializer so the output exists and can be recognised.
    let options = WalkOptions::from_config(config, exclude);

    let files = match find_files(&config.root, &options) {
        Ok(files) => files,
        Err(err) => {
            report(&err);
            ok = false;
            Vec::new()
        }
    };
    println!("Found {} files", files.len());

    let summary = match write_records(&files, &config.output).await {
        Ok(summary) => {
            println!("Code written to '{}' successfully.", config.output.display());
            summary
        }
        Err(err) => {
            report(&err);
            ok = false;
            WriteSummary::default()
        }
    };

    println!(
        "\n🏁 Done! {} records ({} unreadable), {} in {}",
        summary.records,
        summary.unreadable,
        format_size(summary.bytes),
        format_duration(start_time.elapsed().as_secs_f64())
    );

    ok
}

fn report(err: &DumpError) {
    error!(kind = err.kind(), "{}", err);
    println!("An error occurred: {}", err);
}
