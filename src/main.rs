// SPDX-License-Identifier: PMPL-1.0-or-later
//! Wcagbot CLI - Consolidated WCAG Accessibility Report Generator
//!
//! Part of the gitbot-fleet ecosystem.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wcagbot::chart::SvgChartRenderer;
use wcagbot::config::ReportConfig;
use wcagbot::model::WcagLevel;
use wcagbot::pipeline;
use wcagbot::report::{generate_summary, SummaryFormat};
use wcagbot::store::{document_name, FsResultStore};

/// Consolidated WCAG accessibility report generator for gitbot-fleet
#[derive(Parser)]
#[command(name = "wcagbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML report and charts from a run manifest
    Generate {
        /// Run manifest (TOML)
        manifest: PathBuf,

        /// Directory for the report and charts
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Domain label shown in the report header
        #[arg(long)]
        domain: Option<String>,

        /// Skip missing or malformed result documents
        #[arg(long)]
        allow_partial: bool,
    },

    /// Print the violation summary without writing files
    Summary {
        /// Run manifest (TOML)
        manifest: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Skip missing or malformed result documents
        #[arg(long)]
        allow_partial: bool,
    },

    /// Print the result document name for a page and level
    Name {
        /// WCAG conformance level
        level: WcagLevelArg,

        /// Audited page URL
        page_url: String,
    },
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Summary format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable table
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for SummaryFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => SummaryFormat::Text,
            FormatArg::Json => SummaryFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("wcagbot=debug")
    } else {
        EnvFilter::new("wcagbot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(manifest: &Path) -> anyhow::Result<ReportConfig> {
    ReportConfig::load(manifest)
        .with_context(|| format!("failed to load manifest {}", manifest.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            manifest,
            output_dir,
            domain,
            allow_partial,
        } => {
            let mut config = load_config(&manifest)?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if domain.is_some() {
                config.domain = domain;
            }
            config.allow_partial |= allow_partial;

            let store = FsResultStore::new(&config.results_dir);
            let generated = pipeline::generate_report(&config, &store, &SvgChartRenderer)
                .context("report generation failed")?;

            for skipped in &generated.skipped {
                eprintln!("Skipped result document: {}", skipped);
            }
            if generated.summary.unclassified_total() > 0 {
                eprintln!(
                    "Warning: {} violation(s) with an unrecognized impact",
                    generated.summary.unclassified_total()
                );
            }
            println!("{}", generated.report_path.display());
        }

        Commands::Summary {
            manifest,
            format,
            allow_partial,
        } => {
            let mut config = load_config(&manifest)?;
            config.allow_partial |= allow_partial;

            let store = FsResultStore::new(&config.results_dir);
            let analysis = pipeline::analyze(&config, &store).context("analysis failed")?;
            println!("{}", generate_summary(&analysis.summary, format.into()));
        }

        Commands::Name { level, page_url } => {
            println!("{}", document_name(level.into(), &page_url));
        }
    }

    Ok(())
}
