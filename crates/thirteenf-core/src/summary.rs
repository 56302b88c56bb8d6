//! Portfolio-level statistics over decoded holdings.

use serde::Serialize;

use crate::infotable::HoldingRow;

const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPosition {
    pub issuer: String,
    /// Position value in billions of USD.
    pub value_b: f64,
    /// Share of the total reported value.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub num_positions: usize,
    pub sum_value_usd_b: f64,
    /// Share of total value held in the ten largest positions.
    pub top_10_concentration: f64,
    pub top_positions: Vec<TopPosition>,
}

/// Round to `places` decimals, ties to even (0.03125 -> 0.0312).
fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round_ties_even() / f
}

/// Values are reported in thousands of USD; billions = thousands / 1e6.
fn billions(thousands: i64) -> f64 {
    round_to(thousands as f64 / 1_000_000.0, 3)
}

fn share(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(part as f64 / total as f64, 4)
    }
}

pub fn summarize(rows: &[HoldingRow]) -> Summary {
    let total: i64 = rows.iter().map(|r| r.value_usd_thousands).sum();

    let mut by_value: Vec<&HoldingRow> = rows.iter().collect();
    by_value.sort_by(|a, b| b.value_usd_thousands.cmp(&a.value_usd_thousands));
    by_value.truncate(TOP_N);

    let top_sum: i64 = by_value.iter().map(|r| r.value_usd_thousands).sum();
    let top_positions = by_value
        .iter()
        .map(|r| TopPosition {
            issuer: r.issuer_name.clone(),
            value_b: billions(r.value_usd_thousands),
            weight: share(r.value_usd_thousands, total),
        })
        .collect();

    Summary {
        num_positions: rows.len(),
        sum_value_usd_b: billions(total),
        top_10_concentration: share(top_sum, total),
        top_positions,
    }
}
