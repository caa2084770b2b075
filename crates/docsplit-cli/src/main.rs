// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docsplit: split PDFs along their chapter headings
//
// Entry point. Parses arguments, initialises logging, builds the processing
// configuration, and dispatches to the requested feature.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docsplit_core::ProcessingConfig;
use docsplit_core::error::Result;
use docsplit_core::human_errors::humanize_error;
use docsplit_document::materialize::split_file_name;
use docsplit_document::pipeline::base_name;
use docsplit_document::{PdfSource, Pipeline};

#[derive(Parser)]
#[command(name = "docsplit")]
#[command(about = "Split PDFs along chapter headings and strip running headers and footers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file; flags below override its fields
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for produced files (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Heading regex, e.g. "(?i)^(Part|Appendix)\s+\w+"
    #[arg(long, global = true, value_name = "REGEX")]
    pattern: Option<String>,

    /// Number of consecutive headings per split
    #[arg(long, global = true, value_name = "N")]
    group_size: Option<usize>,

    /// Leading component of split file names
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List detected headings
    Headings { input: PathBuf },
    /// Show the planned splits without writing them
    Plan { input: PathBuf },
    /// Write one PDF per heading group
    Split { input: PathBuf },
    /// Write the text with running headers and footers removed
    Clean { input: PathBuf },
    /// Save embedded images
    Images { input: PathBuf },
    /// Run every enabled feature and package the results
    Process { input: PathBuf },
    /// Write the effective configuration as JSON
    WriteConfig { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "Command failed");
            eprintln!("error: {}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let out_dir = cli.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    if let Command::WriteConfig { path } = &cli.command {
        config.save(path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let pipeline = Pipeline::new(config)?;

    match &cli.command {
        Command::Headings { input } => {
            let source = PdfSource::open(input)?;
            let anchors = pipeline.headings(&source)?;
            if anchors.is_empty() {
                eprintln!("No headings found.");
            }
            for anchor in anchors {
                println!("{}\t{}", anchor.page_index + 1, anchor.title);
            }
        }
        Command::Plan { input } => {
            let source = PdfSource::open(input)?;
            let anchors = pipeline.headings(&source)?;
            let segments = pipeline.plan(&source, &anchors)?;
            if segments.is_empty() {
                eprintln!("No headings found, nothing to split.");
            }
            let config = pipeline.config();
            for (index, segment) in segments.iter().enumerate() {
                let name = split_file_name(
                    &config.name_prefix,
                    index,
                    &segment.label,
                    config.max_title_length,
                );
                println!("{name}\t{segment}");
            }
        }
        Command::Split { input } => {
            let source = PdfSource::open(input)?;
            std::fs::create_dir_all(&out_dir)?;
            let anchors = pipeline.headings(&source)?;
            if anchors.is_empty() {
                eprintln!("No headings found, nothing to split.");
                return Ok(());
            }
            print_paths(&pipeline.split(&source, &anchors, &out_dir)?);
        }
        Command::Clean { input } => {
            let source = PdfSource::open(input)?;
            std::fs::create_dir_all(&out_dir)?;
            let path = pipeline.clean(&source, &base_name(input), &out_dir)?;
            println!("{}", path.display());
        }
        Command::Images { input } => {
            let source = PdfSource::open(input)?;
            std::fs::create_dir_all(&out_dir)?;
            let paths = pipeline.images(&source, &base_name(input), &out_dir)?;
            if paths.is_empty() {
                eprintln!("No images found.");
            }
            print_paths(&paths);
        }
        Command::Process { input } => {
            let report = pipeline.run(input, &out_dir)?;
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            print_paths(&report.delivered());
        }
        Command::WriteConfig { .. } => {}
    }
    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn build_config(cli: &Cli) -> Result<ProcessingConfig> {
    let mut config = match &cli.config {
        Some(path) => ProcessingConfig::load(path)?,
        None => ProcessingConfig::default(),
    };
    if let Some(pattern) = &cli.pattern {
        config.heading_pattern = pattern.clone();
    }
    if let Some(group_size) = cli.group_size {
        config.group_size = group_size;
    }
    if let Some(prefix) = &cli.prefix {
        config.name_prefix = prefix.clone();
    }
    config.validate()?;
    Ok(config)
}

fn print_paths(paths: &[impl AsRef<Path>]) {
    for path in paths {
        println!("{}", path.as_ref().display());
    }
}
