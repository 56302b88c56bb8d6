//! 13F information-table decoder.
//!
//! Elements are matched by local name, so documents using the
//! `thirteenf/informationtable` namespace (under any prefix) and documents
//! with no namespace decode the same way. Malformed XML is an error.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Serialize;
use std::collections::HashMap;

const ROW_ELEMENT: &str = "infoTable";

/// One holding as reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HoldingRow {
    pub issuer_name: String,
    pub cusip: String,
    /// Reported market value (thousands of USD for pre-2023 filings).
    pub value_usd_thousands: i64,
    pub shares: i64,
    pub share_type: String,
    pub put_call: String,
    pub discretion: String,
    pub voting_sole: i64,
    pub voting_shared: i64,
    pub voting_none: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid XML at byte {position}: {cause}")]
    Xml {
        position: u64,
        #[source]
        cause: quick_xml::Error,
    },
    #[error("invalid XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
}

/// Integer field: thousands separators removed, 0 when unparseable.
fn as_int(s: &str) -> i64 {
    s.replace(',', "").trim().parse().unwrap_or(0)
}

fn local(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Field text keyed by path relative to the row element
/// (e.g. `shrsOrPrnAmt/sshPrnamt`). First occurrence wins.
#[derive(Default)]
struct RowFields(HashMap<String, String>);

impl RowFields {
    fn get(&self, path: &str) -> &str {
        self.0.get(path).map(|s| s.trim()).unwrap_or("")
    }

    fn into_row(self) -> HoldingRow {
        HoldingRow {
            issuer_name: self.get("nameOfIssuer").to_string(),
            cusip: self.get("cusip").to_string(),
            value_usd_thousands: as_int(self.get("value")),
            shares: as_int(self.get("shrsOrPrnAmt/sshPrnamt")),
            share_type: self.get("shrsOrPrnAmt/sshPrnamtType").to_string(),
            put_call: self.get("putCall").to_string(),
            discretion: self.get("investmentDiscretion").to_string(),
            voting_sole: as_int(self.get("votingAuthority/Sole")),
            voting_shared: as_int(self.get("votingAuthority/Shared")),
            voting_none: as_int(self.get("votingAuthority/None")),
        }
    }
}

/// Decode every `infoTable` element in `xml`, in document order.
pub fn parse_information_table(xml: &str) -> Result<Vec<HoldingRow>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;
    // Stack depth of the open row element, its fields, and the field path
    // currently collecting text.
    let mut row: Option<(usize, RowFields)> = None;
    let mut active: Option<String> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|cause| DecodeError::Xml { position, cause })?;
        match event {
            Event::Start(e) => {
                saw_root = true;
                let name = local(e.local_name().as_ref());
                stack.push(name.clone());
                if let Some((depth, fields)) = row.as_mut() {
                    let path = stack[*depth..].join("/");
                    active = if fields.0.contains_key(&path) {
                        None
                    } else {
                        fields.0.insert(path.clone(), String::new());
                        Some(path)
                    };
                } else if name == ROW_ELEMENT {
                    row = Some((stack.len(), RowFields::default()));
                }
            }
            Event::Empty(e) => {
                saw_root = true;
                let name = local(e.local_name().as_ref());
                if let Some((depth, fields)) = row.as_mut() {
                    let mut path = stack[*depth..].to_vec();
                    path.push(name);
                    fields.0.entry(path.join("/")).or_default();
                } else if name == ROW_ELEMENT {
                    rows.push(RowFields::default().into_row());
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| DecodeError::Malformed {
                    position,
                    message: e.to_string(),
                })?;
                append(&mut row, active.as_deref(), &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append(&mut row, active.as_deref(), &text);
            }
            Event::End(_) => {
                active = None;
                let closing_depth = stack.len();
                stack.pop();
                if matches!(&row, Some((depth, _)) if *depth == closing_depth) {
                    if let Some((_, fields)) = row.take() {
                        rows.push(fields.into_row());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let position = reader.buffer_position() as u64;
    if !saw_root {
        return Err(DecodeError::Malformed {
            position,
            message: "no element found".to_string(),
        });
    }
    if let Some(open) = stack.last() {
        return Err(DecodeError::Malformed {
            position,
            message: format!("unclosed element `{open}`"),
        });
    }
    Ok(rows)
}

fn append(row: &mut Option<(usize, RowFields)>, active: Option<&str>, text: &str) {
    if let (Some((_, fields)), Some(path)) = (row.as_mut(), active) {
        if let Some(buf) = fields.0.get_mut(path) {
            buf.push_str(text);
        }
    }
}
