//! `thirteenf resolve <name>` – print the CIK for an investor name.

use anyhow::{bail, Result};
use thirteenf_core::config::ThirteenfConfig;
use thirteenf_core::identity::CompanySearch;

use super::edgar_transport;

pub fn run_resolve(cfg: &ThirteenfConfig, name: &str, user_agent: Option<&str>) -> Result<()> {
    let transport = edgar_transport(cfg, user_agent);
    let endpoints = cfg.endpoints();
    match CompanySearch::new(&transport, &endpoints).resolve(name)? {
        Some(cik) => println!("{}", cik.padded()),
        None => bail!("no CIK found for investor `{}`", name),
    }
    Ok(())
}
