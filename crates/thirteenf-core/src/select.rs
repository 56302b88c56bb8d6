//! Pick the information-table document out of a directory listing.
//!
//! Filers do not name the holdings table consistently, so the choice is an
//! ordered heuristic over lower-cased names:
//! 1. an `.xml` whose name contains `informationtable`, `infotable` or
//!    `form13finfo`;
//! 2. any other `.xml` except `primary_doc.xml`;
//! 3. `primary_doc.xml` (some filers embed the table there).
//!
//! The returned name keeps the listing's original case.

use crate::listing::DirectoryListing;

const PRIMARY_DOC: &str = "primary_doc.xml";
const TABLE_MARKERS: [&str; 3] = ["informationtable", "infotable", "form13finfo"];

fn is_xml(lower: &str) -> bool {
    lower.ends_with(".xml")
}

fn rank(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    if !is_xml(&lower) {
        return None;
    }
    if TABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(0)
    } else if lower != PRIMARY_DOC {
        Some(1)
    } else {
        Some(2)
    }
}

/// Best candidate for the holdings table, or `None` if the listing has no XML.
pub fn select_information_table(listing: &DirectoryListing) -> Option<&str> {
    listing
        .files()
        .iter()
        .filter_map(|name| rank(name).map(|r| (r, name.as_str())))
        // min_by_key keeps the first of equal ranks, so listing order breaks ties.
        .min_by_key(|(r, _)| *r)
        .map(|(_, name)| name)
}
