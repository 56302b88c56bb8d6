//! End-to-end snapshot: investor -> latest 13F-HR -> decoded holdings.

use serde::Serialize;

use crate::config::Endpoints;
use crate::identifiers::{Accession, Cik};
use crate::identity::CompanySearch;
use crate::infotable::{parse_information_table, DecodeError, HoldingRow};
use crate::listing::DirectoryResolver;
use crate::locator::{FilingLocator, LocateError};
use crate::retrieve::{HoldingsRetriever, RetrievalError};
use crate::summary::{summarize, Summary};
use crate::transport::{Fetch, TransportError};

/// Who to snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestorQuery {
    /// Free-text name, resolved through the company search.
    Name(String),
    Cik(Cik),
}

/// Filing-level columns attached to every output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingMeta {
    pub cik: Cik,
    pub manager_name: String,
    pub accession: Accession,
    pub filing_date: String,
    /// Report period end; empty when the history does not carry one.
    pub period_end: String,
    pub source_url: String,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub meta: FilingMeta,
    pub rows: Vec<HoldingRow>,
}

/// Summary statistics tagged with the filing they describe.
#[derive(Debug, Serialize)]
pub struct SnapshotSummary {
    pub cik: String,
    pub manager_name: String,
    pub period_end: String,
    #[serde(flatten)]
    pub stats: Summary,
}

impl Snapshot {
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            cik: self.meta.cik.padded(),
            manager_name: self.meta.manager_name.clone(),
            period_end: self.meta.period_end.clone(),
            stats: summarize(&self.rows),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no CIK found for investor `{0}`")]
    InvestorNotFound(String),
    #[error("no 13F-HR filing for CIK {cik}{}", filed_in(.period))]
    NoFiling { cik: Cik, period: Option<String> },
    #[error("investor lookup failed")]
    Transport(#[from] TransportError),
    #[error("filing history lookup failed")]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error("could not decode {url}")]
    Decode {
        url: String,
        #[source]
        cause: DecodeError,
    },
}

fn filed_in(period: &Option<String>) -> String {
    period.as_deref().map(|p| format!(" filed in {p}")).unwrap_or_default()
}

pub struct Snapshotter<'a> {
    fetch: &'a dyn Fetch,
    endpoints: &'a Endpoints,
}

impl<'a> Snapshotter<'a> {
    pub fn new(fetch: &'a dyn Fetch, endpoints: &'a Endpoints) -> Self {
        Self { fetch, endpoints }
    }

    fn cik_for(&self, query: &InvestorQuery) -> Result<Cik, PipelineError> {
        match query {
            InvestorQuery::Cik(cik) => Ok(*cik),
            InvestorQuery::Name(name) => CompanySearch::new(self.fetch, self.endpoints)
                .resolve(name)?
                .ok_or_else(|| PipelineError::InvestorNotFound(name.clone())),
        }
    }

    /// Run every stage for `query`. `period` restricts the filing date to a
    /// `YYYY-MM` month.
    pub fn run(&self, query: &InvestorQuery, period: Option<&str>) -> Result<Snapshot, PipelineError> {
        let cik = self.cik_for(query)?;

        let located = FilingLocator::new(self.fetch, self.endpoints)
            .latest_filing(&cik, period)?
            .ok_or_else(|| PipelineError::NoFiling {
                cik,
                period: period.filter(|p| !p.is_empty()).map(str::to_string),
            })?;

        let resolver = DirectoryResolver::new(self.fetch, self.endpoints);
        let doc = HoldingsRetriever::new(self.fetch, resolver)
            .fetch_holdings_document(&cik, &located.filing.accession)?;

        let rows = parse_information_table(&doc.text).map_err(|cause| PipelineError::Decode {
            url: doc.url.clone(),
            cause,
        })?;
        tracing::info!(cik = %cik, rows = rows.len(), "decoded information table");

        let manager_name = match (query, located.investor_name.is_empty()) {
            (InvestorQuery::Name(name), true) => name.clone(),
            _ => located.investor_name,
        };
        Ok(Snapshot {
            meta: FilingMeta {
                cik,
                manager_name,
                accession: located.filing.accession,
                filing_date: located.filing.filing_date,
                period_end: located.filing.report_date,
                source_url: doc.url,
            },
            rows,
        })
    }
}
