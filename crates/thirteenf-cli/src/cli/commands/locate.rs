//! `thirteenf locate --cik <cik>` – show the filing a snapshot would use.

use anyhow::{anyhow, Result};
use thirteenf_core::config::ThirteenfConfig;
use thirteenf_core::identifiers::Cik;
use thirteenf_core::locator::{FilingLocator, FilingPeriod};

use super::edgar_transport;

pub fn run_locate(
    cfg: &ThirteenfConfig,
    cik: &Cik,
    period: Option<&FilingPeriod>,
    user_agent: Option<&str>,
) -> Result<()> {
    let transport = edgar_transport(cfg, user_agent);
    let endpoints = cfg.endpoints();
    let period = period.map(FilingPeriod::as_str);
    let located = FilingLocator::new(&transport, &endpoints)
        .latest_filing(cik, period)?
        .ok_or_else(|| anyhow!("no 13F-HR filing for CIK {}", cik))?;

    let f = &located.filing;
    let period_end = if f.report_date.is_empty() {
        "-"
    } else {
        f.report_date.as_str()
    };
    println!("{:<22} {:<12} {:<12} {}", "ACCESSION", "FILED", "PERIOD", "INVESTOR");
    println!(
        "{:<22} {:<12} {:<12} {}",
        f.accession, f.filing_date, period_end, located.investor_name
    );
    Ok(())
}
