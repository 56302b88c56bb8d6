//! CLI for building 13F holdings snapshots from EDGAR.

mod commands;
mod interrupt;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use thirteenf_core::config;
use thirteenf_core::identifiers::Cik;
use thirteenf_core::locator::FilingPeriod;

use commands::{run_completions, run_locate, run_man, run_resolve, run_snapshot, SnapshotArgs};

/// Top-level CLI for thirteenf.
#[derive(Debug, Parser)]
#[command(name = "thirteenf")]
#[command(about = "thirteenf: latest 13F-HR holdings for an institutional investor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve, locate, fetch and decode a 13F-HR into CSV (and optional summary JSON).
    #[command(group(ArgGroup::new("investor").required(true).args(["manager", "cik"])))]
    Snapshot {
        /// Investor name as registered with EDGAR.
        #[arg(long)]
        manager: Option<String>,
        /// Investor CIK (1-10 digits).
        #[arg(long)]
        cik: Option<Cik>,
        /// Only consider filings made in this month (YYYY-MM).
        #[arg(long, value_name = "YYYY-MM")]
        filing_date: Option<FilingPeriod>,
        /// CSV output path.
        #[arg(long)]
        out: PathBuf,
        /// Also write summary statistics as JSON to this path.
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Override the configured User-Agent.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Print the CIK EDGAR's company search returns for a name.
    Resolve {
        /// Investor name.
        name: String,
        /// Override the configured User-Agent.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Print the target 13F-HR filing for a CIK.
    Locate {
        /// Investor CIK (1-10 digits).
        #[arg(long)]
        cik: Cik,
        /// Only consider filings made in this month (YYYY-MM).
        #[arg(long, value_name = "YYYY-MM")]
        filing_date: Option<FilingPeriod>,
        /// Override the configured User-Agent.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Generate shell completions on stdout.
    Completions {
        shell: Shell,
    },

    /// Render the man page (roff) on stdout.
    Man,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Offline commands need no config.
        match &cli.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Snapshot {
                manager,
                cik,
                filing_date,
                out,
                summary,
                user_agent,
            } => run_snapshot(
                &cfg,
                SnapshotArgs {
                    manager,
                    cik,
                    filing_date,
                    out,
                    summary,
                    user_agent,
                },
            )?,
            CliCommand::Resolve { name, user_agent } => {
                run_resolve(&cfg, &name, user_agent.as_deref())?
            }
            CliCommand::Locate {
                cik,
                filing_date,
                user_agent,
            } => run_locate(&cfg, &cik, filing_date.as_ref(), user_agent.as_deref())?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
