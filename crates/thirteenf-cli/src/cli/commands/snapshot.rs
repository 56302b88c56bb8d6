//! `thirteenf snapshot` – full pipeline to CSV and optional summary JSON.

use anyhow::{Context, Result};
use std::path::PathBuf;
use thirteenf_core::config::ThirteenfConfig;
use thirteenf_core::identifiers::Cik;
use thirteenf_core::locator::FilingPeriod;
use thirteenf_core::output::{write_csv, write_json};
use thirteenf_core::pipeline::{InvestorQuery, Snapshotter};

use super::edgar_transport;

#[derive(Debug)]
pub struct SnapshotArgs {
    pub manager: Option<String>,
    pub cik: Option<Cik>,
    pub filing_date: Option<FilingPeriod>,
    pub out: PathBuf,
    pub summary: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl SnapshotArgs {
    /// `--cik` wins when both are somehow present; clap rejects that anyway.
    fn query(&self) -> Result<InvestorQuery> {
        match (&self.cik, &self.manager) {
            (Some(cik), _) => Ok(InvestorQuery::Cik(*cik)),
            (None, Some(name)) => Ok(InvestorQuery::Name(name.clone())),
            (None, None) => anyhow::bail!("one of --manager or --cik is required"),
        }
    }
}

pub fn run_snapshot(cfg: &ThirteenfConfig, args: SnapshotArgs) -> Result<()> {
    let query = args.query()?;
    let transport = edgar_transport(cfg, args.user_agent.as_deref());
    let endpoints = cfg.endpoints();

    let snapshot = Snapshotter::new(&transport, &endpoints)
        .run(&query, args.filing_date.as_ref().map(FilingPeriod::as_str))?;

    let n = write_csv(&args.out, &snapshot.meta, &snapshot.rows)
        .with_context(|| format!("writing {}", args.out.display()))?;
    println!(
        "Wrote {} rows for {} ({}) filed {} to {}",
        n,
        snapshot.meta.manager_name,
        snapshot.meta.cik,
        snapshot.meta.filing_date,
        args.out.display()
    );

    if let Some(path) = &args.summary {
        write_json(path, &snapshot.summary())?;
        println!("Wrote summary to {}", path.display());
    }
    Ok(())
}
