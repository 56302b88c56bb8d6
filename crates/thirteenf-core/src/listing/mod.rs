//! Archive directory listing.
//!
//! A filing's documents live under `<archives>/<owner>/<accession-no-dashes>/`.
//! The archive exposes that directory three ways, none of them reliably:
//! an `index.json` sidecar, a per-filing `-index.html` page, and the bare
//! directory page. Each is a [`ListingStrategy`]; [`DirectoryResolver`]
//! tries them in order and returns the first listing produced.

mod html;
mod json;

pub use html::{href_filenames, HtmlDirectoryPage, HtmlIndexPage};
pub use json::JsonIndex;

use std::collections::HashSet;
use std::fmt;

use crate::config::Endpoints;
use crate::identifiers::Cik;
use crate::transport::{Fetch, TransportError};

/// One candidate archive directory for a filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDir {
    /// CIK whose archive tree holds the directory.
    pub owner: Cik,
    pub accession_no_dashes: String,
}

impl ArchiveDir {
    pub fn new(owner: Cik, accession_no_dashes: impl Into<String>) -> Self {
        Self {
            owner,
            accession_no_dashes: accession_no_dashes.into(),
        }
    }

    /// Directory URL with a trailing slash.
    pub fn url(&self, endpoints: &Endpoints) -> String {
        format!(
            "{}/{}/{}/",
            endpoints.archives_base.trim_end_matches('/'),
            self.owner.raw(),
            self.accession_no_dashes
        )
    }

    pub fn file_url(&self, endpoints: &Endpoints, name: &str) -> String {
        format!("{}{}", self.url(endpoints), name)
    }
}

impl fmt::Display for ArchiveDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner.raw(), self.accession_no_dashes)
    }
}

/// File names in one archive directory: case preserved, duplicates and
/// empty names dropped, first-seen order kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    files: Vec<String>,
}

impl DirectoryListing {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let files = names
            .into_iter()
            .map(Into::into)
            .filter(|n: &String| !n.is_empty())
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Self { files }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Why one strategy produced no listing.
#[derive(Debug, thiserror::Error)]
pub enum ListingFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{url} is not a directory index: {cause}")]
    Json {
        url: String,
        #[source]
        cause: serde_json::Error,
    },
    #[error("{url} lists no files")]
    Empty { url: String },
}

/// Raised when every strategy failed for a directory.
#[derive(Debug, thiserror::Error)]
#[error("could not list files for {dir} via JSON or HTML")]
pub struct LookupError {
    pub dir: String,
    #[source]
    pub last: Option<ListingFailure>,
}

/// One way of listing an archive directory.
pub trait ListingStrategy {
    fn name(&self) -> &'static str;

    /// `dir_url` is the directory URL with a trailing slash.
    fn list(
        &self,
        fetch: &dyn Fetch,
        dir: &ArchiveDir,
        dir_url: &str,
    ) -> Result<DirectoryListing, ListingFailure>;
}

/// JSON first, then the per-filing HTML index, then the bare directory page.
pub fn default_strategies() -> Vec<Box<dyn ListingStrategy>> {
    vec![
        Box::new(JsonIndex),
        Box::new(HtmlIndexPage),
        Box::new(HtmlDirectoryPage),
    ]
}

pub struct DirectoryResolver<'a> {
    fetch: &'a dyn Fetch,
    endpoints: &'a Endpoints,
    strategies: Vec<Box<dyn ListingStrategy>>,
}

impl<'a> DirectoryResolver<'a> {
    pub fn new(fetch: &'a dyn Fetch, endpoints: &'a Endpoints) -> Self {
        Self::with_strategies(fetch, endpoints, default_strategies())
    }

    pub fn with_strategies(
        fetch: &'a dyn Fetch,
        endpoints: &'a Endpoints,
        strategies: Vec<Box<dyn ListingStrategy>>,
    ) -> Self {
        Self {
            fetch,
            endpoints,
            strategies,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.endpoints
    }

    /// First listing any strategy produces, in strategy order.
    pub fn list(&self, dir: &ArchiveDir) -> Result<DirectoryListing, LookupError> {
        let dir_url = dir.url(self.endpoints);
        let mut last = None;
        for strategy in &self.strategies {
            match strategy.list(self.fetch, dir, &dir_url) {
                Ok(listing) => {
                    tracing::debug!(
                        %dir,
                        strategy = strategy.name(),
                        files = listing.len(),
                        "listed archive directory"
                    );
                    return Ok(listing);
                }
                Err(e) => {
                    tracing::debug!(%dir, strategy = strategy.name(), "listing failed: {}", e);
                    last = Some(e);
                }
            }
        }
        Err(LookupError {
            dir: dir.to_string(),
            last,
        })
    }
}
