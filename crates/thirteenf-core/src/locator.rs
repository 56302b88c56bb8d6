//! Filing history lookup and target-filing selection.
//!
//! The submissions document lists recent filings as parallel arrays aligned
//! by position (`form[i]`, `accessionNumber[i]`, `filingDate[i]`, ...). The
//! arrays are taken to be newest-first as served; no sort is applied, so the
//! first matching position is "latest" only as far as that ordering holds.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::Endpoints;
use crate::identifiers::{Accession, Cik};
use crate::transport::{Fetch, TransportError};

/// Form type of a quarterly holdings report.
pub const TARGET_FORM: &str = "13F-HR";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submissions {
    /// Investor display name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filings: Filings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Filings {
    #[serde(default)]
    pub recent: RecentFilings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    /// Period end per filing; may be absent or shorter than the others.
    #[serde(default)]
    pub report_date: Vec<String>,
}

/// One resolved filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRef {
    pub accession: Accession,
    pub filing_date: String,
    pub form: String,
    /// Period end at the same position in the history, or empty.
    pub report_date: String,
}

impl Submissions {
    /// First 13F-HR in history order, optionally restricted to filing dates
    /// starting with `period` (`YYYY-MM`). An empty period filters nothing.
    pub fn latest_13f(&self, period: Option<&str>) -> Option<FilingRef> {
        let recent = &self.filings.recent;
        let period = period.filter(|p| !p.is_empty());
        recent
            .form
            .iter()
            .zip(&recent.accession_number)
            .zip(&recent.filing_date)
            .enumerate()
            .find(|(_, ((form, _), date))| {
                form.as_str() == TARGET_FORM && period.map_or(true, |p| date.starts_with(p))
            })
            .map(|(i, ((form, acc), date))| FilingRef {
                accession: Accession::new(acc.as_str()),
                filing_date: date.clone(),
                form: form.clone(),
                report_date: recent.report_date.get(i).cloned().unwrap_or_default(),
            })
    }
}

/// A `YYYY-MM` filing-date filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingPeriod(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("filing period must look like YYYY-MM, got `{0}`")]
pub struct PeriodError(String);

impl FilingPeriod {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FilingPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let ok = match s.split_once('-') {
            Some((year, month)) => {
                year.len() == 4
                    && month.len() == 2
                    && year.bytes().all(|b| b.is_ascii_digit())
                    && matches!(month.parse::<u8>(), Ok(1..=12))
            }
            None => false,
        };
        if ok {
            Ok(Self(s.to_string()))
        } else {
            Err(PeriodError(s.to_string()))
        }
    }
}

impl fmt::Display for FilingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("filing history at {url} is not valid JSON")]
    Decode {
        url: String,
        #[source]
        cause: serde_json::Error,
    },
}

/// The target filing plus history-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFiling {
    pub filing: FilingRef,
    pub investor_name: String,
}

pub struct FilingLocator<'a> {
    fetch: &'a dyn Fetch,
    endpoints: &'a Endpoints,
}

impl<'a> FilingLocator<'a> {
    pub fn new(fetch: &'a dyn Fetch, endpoints: &'a Endpoints) -> Self {
        Self { fetch, endpoints }
    }

    pub fn history_url(&self, cik: &Cik) -> String {
        format!(
            "{}/submissions/CIK{}.json",
            self.endpoints.data_base.trim_end_matches('/'),
            cik.padded()
        )
    }

    pub fn load_history(&self, cik: &Cik) -> Result<Submissions, LocateError> {
        let url = self.history_url(cik);
        let body = self.fetch.fetch(&url)?;
        serde_json::from_str(&body).map_err(|cause| LocateError::Decode { url, cause })
    }

    /// Latest 13F-HR for `cik`; `Ok(None)` when the history has no match.
    pub fn latest_filing(
        &self,
        cik: &Cik,
        period: Option<&str>,
    ) -> Result<Option<LocatedFiling>, LocateError> {
        let history = self.load_history(cik)?;
        let found = history.latest_13f(period);
        match &found {
            Some(f) => tracing::info!(
                cik = %cik,
                accession = %f.accession,
                filing_date = %f.filing_date,
                "located 13F filing"
            ),
            None => tracing::info!(cik = %cik, ?period, "no 13F-HR in filing history"),
        }
        Ok(found.map(|filing| LocatedFiling {
            filing,
            investor_name: history.name,
        }))
    }
}
