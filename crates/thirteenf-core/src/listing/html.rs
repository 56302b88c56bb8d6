//! HTML listings: the per-filing index page and the bare directory page.

use scraper::{Html, Selector};

use super::{ArchiveDir, DirectoryListing, ListingFailure, ListingStrategy};
use crate::identifiers::index_page_name;
use crate::transport::Fetch;

/// Bare file names of every `<a href>` in `html`, first-seen order.
///
/// Query strings, fragments and path prefixes are stripped; empty, `.` and
/// `..` targets are dropped.
pub fn href_filenames(html: &str) -> DirectoryListing {
    let doc = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return DirectoryListing::default();
    };

    let names = doc.select(&anchors).filter_map(|a| {
        let href = a.value().attr("href")?;
        let path = href.split(['?', '#']).next().unwrap_or("");
        let name = path.rsplit('/').next().unwrap_or("").trim();
        match name {
            "" | "." | ".." => None,
            n => Some(n.to_string()),
        }
    });
    DirectoryListing::from_names(names)
}

fn list_page(fetch: &dyn Fetch, url: String) -> Result<DirectoryListing, ListingFailure> {
    let body = fetch.fetch(&url)?;
    let listing = href_filenames(&body);
    if listing.is_empty() {
        return Err(ListingFailure::Empty { url });
    }
    Ok(listing)
}

/// `<accession-with-dashes>-index.html` inside the directory.
pub struct HtmlIndexPage;

impl ListingStrategy for HtmlIndexPage {
    fn name(&self) -> &'static str {
        "index.html"
    }

    fn list(
        &self,
        fetch: &dyn Fetch,
        dir: &ArchiveDir,
        dir_url: &str,
    ) -> Result<DirectoryListing, ListingFailure> {
        let page = index_page_name(&dir.accession_no_dashes);
        list_page(fetch, format!("{dir_url}{page}"))
    }
}

/// The directory URL itself (server-generated listing).
pub struct HtmlDirectoryPage;

impl ListingStrategy for HtmlDirectoryPage {
    fn name(&self) -> &'static str {
        "directory page"
    }

    fn list(
        &self,
        fetch: &dyn Fetch,
        _dir: &ArchiveDir,
        dir_url: &str,
    ) -> Result<DirectoryListing, ListingFailure> {
        list_page(fetch, dir_url.to_string())
    }
}
