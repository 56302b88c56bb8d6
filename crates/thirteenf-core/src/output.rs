//! CSV and JSON output files.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::infotable::HoldingRow;
use crate::pipeline::FilingMeta;

pub const CSV_HEADERS: [&str; 13] = [
    "cik",
    "manager_name",
    "period_end",
    "issuer_name",
    "cusip",
    "value_usd_thousands",
    "shares",
    "share_type",
    "put_call",
    "discretion",
    "voting_sole",
    "voting_shared",
    "voting_none",
];

/// One CSV line; field order matches `CSV_HEADERS`.
#[derive(Serialize)]
struct CsvRecord<'a> {
    cik: &'a str,
    manager_name: &'a str,
    period_end: &'a str,
    issuer_name: &'a str,
    cusip: &'a str,
    value_usd_thousands: i64,
    shares: i64,
    share_type: &'a str,
    put_call: &'a str,
    discretion: &'a str,
    voting_sole: i64,
    voting_shared: i64,
    voting_none: i64,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write one line per holding, tagged with the filing metadata. The header
/// is written even when there are no rows. Returns the number of rows.
pub fn write_csv(path: &Path, meta: &FilingMeta, rows: &[HoldingRow]) -> Result<usize> {
    ensure_parent(path)?;
    let cik = meta.cik.padded();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(CSV_HEADERS)?;
    for r in rows {
        wtr.serialize(CsvRecord {
            cik: &cik,
            manager_name: &meta.manager_name,
            period_end: &meta.period_end,
            issuer_name: &r.issuer_name,
            cusip: &r.cusip,
            value_usd_thousands: r.value_usd_thousands,
            shares: r.shares,
            share_type: &r.share_type,
            put_call: &r.put_call,
            discretion: &r.discretion,
            voting_sole: r.voting_sole,
            voting_shared: r.voting_shared,
            voting_none: r.voting_none,
        })
        .with_context(|| format!("write {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(rows.len())
}

/// Pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
