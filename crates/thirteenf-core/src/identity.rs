//! Investor name -> CIK via the EDGAR company search feed.
//!
//! The Atom feed returned by `browse-edgar` links every hit with a `CIK=`
//! query parameter. There is no disambiguation: the first CIK in the body
//! wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::Endpoints;
use crate::identifiers::Cik;
use crate::transport::{Fetch, TransportError};

static CIK_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CIK=(\d{1,10})").expect("static pattern"));

/// First `CIK=<digits>` occurrence in a search response.
pub fn first_cik_in(body: &str) -> Option<Cik> {
    CIK_PARAM
        .captures_iter(body)
        .find_map(|c| c.get(1)?.as_str().parse().ok())
}

pub struct CompanySearch<'a> {
    fetch: &'a dyn Fetch,
    endpoints: &'a Endpoints,
}

impl<'a> CompanySearch<'a> {
    pub fn new(fetch: &'a dyn Fetch, endpoints: &'a Endpoints) -> Self {
        Self { fetch, endpoints }
    }

    pub fn search_url(&self, name: &str) -> String {
        let company: String = url::form_urlencoded::byte_serialize(name.trim().as_bytes()).collect();
        format!(
            "{}/cgi-bin/browse-edgar?company={}&owner=exclude&action=getcompany&output=atom",
            self.endpoints.www_base.trim_end_matches('/'),
            company
        )
    }

    /// Resolve a free-text investor name. `Ok(None)` means the search ran
    /// but nothing in the response looked like a CIK.
    pub fn resolve(&self, name: &str) -> Result<Option<Cik>, TransportError> {
        let body = self.fetch.fetch(&self.search_url(name))?;
        let cik = first_cik_in(&body);
        match &cik {
            Some(c) => tracing::info!(name, cik = %c, "resolved investor name"),
            None => tracing::info!(name, "company search returned no CIK"),
        }
        Ok(cik)
    }
}
