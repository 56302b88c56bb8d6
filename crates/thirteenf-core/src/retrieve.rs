//! Retrieval orchestration across candidate archive directories.
//!
//! A filing's directory may sit under the investor's own CIK or under the
//! CIK of the agent that submitted it (the leading component of the
//! accession number). Each rule is an [`OwnerRule`]; the orchestrator turns
//! them into an ordered, de-duplicated list of [`ArchiveDir`]s and returns
//! the first document it can actually fetch. A failing candidate is logged
//! and skipped; only running out of candidates is an error.

use crate::identifiers::{Accession, Cik};
use crate::listing::{ArchiveDir, DirectoryResolver, LookupError};
use crate::select::select_information_table;
use crate::transport::{Fetch, TransportError};

/// Proposes the CIK that owns a filing's archive directory.
pub trait OwnerRule {
    fn name(&self) -> &'static str;
    fn owner(&self, investor: &Cik, accession: &Accession) -> Option<Cik>;
}

/// The reporting investor's own archive tree.
pub struct InvestorOwned;

impl OwnerRule for InvestorOwned {
    fn name(&self) -> &'static str {
        "investor"
    }

    fn owner(&self, investor: &Cik, _accession: &Accession) -> Option<Cik> {
        Some(*investor)
    }
}

/// The filer agent embedded as the accession number's leading component.
pub struct AccessionPrefixOwned;

impl OwnerRule for AccessionPrefixOwned {
    fn name(&self) -> &'static str {
        "accession prefix"
    }

    fn owner(&self, _investor: &Cik, accession: &Accession) -> Option<Cik> {
        accession.prefix_cik()
    }
}

pub fn default_owner_rules() -> Vec<Box<dyn OwnerRule>> {
    vec![Box::new(InvestorOwned), Box::new(AccessionPrefixOwned)]
}

/// Ordered candidate directories; an owner already proposed is not repeated.
pub fn candidate_dirs(
    rules: &[Box<dyn OwnerRule>],
    investor: &Cik,
    accession: &Accession,
) -> Vec<ArchiveDir> {
    let no_dashes = accession.no_dashes();
    let mut dirs: Vec<ArchiveDir> = Vec::new();
    for rule in rules {
        let Some(owner) = rule.owner(investor, accession) else {
            continue;
        };
        if dirs.iter().all(|d| d.owner != owner) {
            dirs.push(ArchiveDir::new(owner, no_dashes.clone()));
        }
    }
    dirs
}

/// Raw document text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedDocument {
    pub text: String,
    pub url: String,
    pub dir: ArchiveDir,
    pub file_name: String,
}

/// Why a single candidate directory was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum CandidateFailure {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("no information table in {dir}")]
    NoDocument { dir: String },
    #[error(transparent)]
    Fetch(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
#[error("could not fetch information table for accession {accession}")]
pub struct RetrievalError {
    pub accession: String,
    pub candidates_tried: usize,
    #[source]
    pub last: Option<CandidateFailure>,
}

pub struct HoldingsRetriever<'a> {
    fetch: &'a dyn Fetch,
    resolver: DirectoryResolver<'a>,
    owner_rules: Vec<Box<dyn OwnerRule>>,
}

impl<'a> HoldingsRetriever<'a> {
    pub fn new(fetch: &'a dyn Fetch, resolver: DirectoryResolver<'a>) -> Self {
        Self {
            fetch,
            resolver,
            owner_rules: default_owner_rules(),
        }
    }

    pub fn with_owner_rules(mut self, rules: Vec<Box<dyn OwnerRule>>) -> Self {
        self.owner_rules = rules;
        self
    }

    fn try_candidate(&self, dir: &ArchiveDir) -> Result<RetrievedDocument, CandidateFailure> {
        let listing = self.resolver.list(dir)?;
        let file_name = select_information_table(&listing)
            .ok_or_else(|| CandidateFailure::NoDocument {
                dir: dir.to_string(),
            })?
            .to_string();
        let url = dir.file_url(self.resolver.endpoints(), &file_name);
        let text = self.fetch.fetch(&url)?;
        Ok(RetrievedDocument {
            text,
            url,
            dir: dir.clone(),
            file_name,
        })
    }

    /// Fetch the holdings document for `accession`, trying each candidate
    /// directory in order.
    pub fn fetch_holdings_document(
        &self,
        investor: &Cik,
        accession: &Accession,
    ) -> Result<RetrievedDocument, RetrievalError> {
        let dirs = candidate_dirs(&self.owner_rules, investor, accession);
        let mut last = None;
        for dir in &dirs {
            match self.try_candidate(dir) {
                Ok(doc) => {
                    tracing::info!(url = %doc.url, bytes = doc.text.len(), "fetched information table");
                    return Ok(doc);
                }
                Err(e) => {
                    tracing::warn!(%dir, "candidate directory failed: {}", e);
                    last = Some(e);
                }
            }
        }
        Err(RetrievalError {
            accession: accession.to_string(),
            candidates_tried: dirs.len(),
            last,
        })
    }
}
