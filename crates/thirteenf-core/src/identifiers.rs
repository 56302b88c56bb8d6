//! Investor (CIK) and filing (accession) identifiers.
//!
//! EDGAR uses the same CIK in two spellings: zero-padded to ten digits in the
//! submissions API, and without leading zeros in archive paths. `Cik` stores
//! the numeric value once and renders either form on demand.

use std::fmt;
use std::str::FromStr;

/// Width of the canonical, zero-padded CIK.
pub const CIK_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("CIK must be 1-{CIK_WIDTH} ASCII digits, got `{0}`")]
    InvalidCik(String),
}

/// Central Index Key of a filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cik(u64);

impl Cik {
    pub fn new(value: u64) -> Result<Self, IdentifierError> {
        if value > 9_999_999_999 {
            return Err(IdentifierError::InvalidCik(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Ten-digit form used by `data.sec.gov/submissions`.
    pub fn padded(&self) -> String {
        format!("{:0width$}", self.0, width = CIK_WIDTH)
    }

    /// Unpadded form used in `Archives/edgar/data/<cik>/...` paths.
    pub fn raw(&self) -> String {
        self.0.to_string()
    }
}

impl FromStr for Cik {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.is_empty()
            || digits.len() > CIK_WIDTH
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(IdentifierError::InvalidCik(s.to_string()));
        }
        digits
            .parse::<u64>()
            .map_err(|_| IdentifierError::InvalidCik(s.to_string()))
            .and_then(Cik::new)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.padded())
    }
}

/// Left-pads a CIK string with zeros to ten characters.
///
/// Strings already ten characters or longer are returned unchanged, so
/// `pad_cik(&pad_cik(x)) == pad_cik(x)`.
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>width$}", cik, width = CIK_WIDTH)
}

/// Accession number of a single filing, kept in its dashed form
/// (`0000950123-24-001234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accession(String);

impl Accession {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token with every `-` removed; this is the archive directory name.
    pub fn no_dashes(&self) -> String {
        self.0.replace('-', "")
    }

    /// CIK embedded as the leading component of the token (the filer agent
    /// that submitted it). `None` when that component is not a valid CIK.
    pub fn prefix_cik(&self) -> Option<Cik> {
        let head = self.0.split('-').next()?;
        head.parse().ok()
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File name of the per-filing HTML index inside an archive directory:
/// dashes are reinserted at offsets 10 and 12 of the dash-less token.
pub fn index_page_name(no_dashes: &str) -> String {
    match (
        no_dashes.get(..10),
        no_dashes.get(10..12),
        no_dashes.get(12..),
    ) {
        (Some(head), Some(mid), Some(tail)) => format!("{head}-{mid}-{tail}-index.html"),
        _ => format!("{no_dashes}-index.html"),
    }
}
