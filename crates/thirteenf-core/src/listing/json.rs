//! `index.json` sidecar listing.

use serde::Deserialize;

use super::{ArchiveDir, DirectoryListing, ListingFailure, ListingStrategy};
use crate::transport::Fetch;

#[derive(Debug, Deserialize)]
struct IndexJson {
    directory: IndexDirectory,
}

#[derive(Debug, Deserialize)]
struct IndexDirectory {
    item: Vec<IndexItem>,
}

#[derive(Debug, Deserialize)]
struct IndexItem {
    #[serde(default)]
    name: String,
}

/// Parse an archive `index.json` body. A body that parses but lists no
/// items is still a valid (empty) listing.
pub(crate) fn parse_index_json(body: &str) -> Result<DirectoryListing, serde_json::Error> {
    let index: IndexJson = serde_json::from_str(body)?;
    Ok(DirectoryListing::from_names(
        index.directory.item.into_iter().map(|it| it.name),
    ))
}

pub struct JsonIndex;

impl ListingStrategy for JsonIndex {
    fn name(&self) -> &'static str {
        "index.json"
    }

    fn list(
        &self,
        fetch: &dyn Fetch,
        _dir: &ArchiveDir,
        dir_url: &str,
    ) -> Result<DirectoryListing, ListingFailure> {
        let url = format!("{dir_url}index.json");
        let body = fetch.fetch(&url)?;
        parse_index_json(&body).map_err(|cause| ListingFailure::Json { url, cause })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_names_in_order() {
        let l = parse_index_json(
            r#"{"directory": {"item": [
                {"name": "0000950123-24-001234-index.html", "type": "text.gif", "size": ""},
                {"name": "infotable.xml", "type": "text.gif", "size": "81234"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(l.files(), ["0000950123-24-001234-index.html", "infotable.xml"]);
    }

    #[test]
    fn empty_item_list_is_valid() {
        let l = parse_index_json(r#"{"directory": {"item": []}}"#).unwrap();
        assert!(l.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(parse_index_json(r#"{"error": "not found"}"#).is_err());
        assert!(parse_index_json("<html></html>").is_err());
    }
}
