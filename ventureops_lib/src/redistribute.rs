//! Synthetic redistribution of bulk-import dates.
//!
//! Bulk CRM imports stamp hundreds of rows with the same literal date,
//! which destroys time-series charts. Dates shared by at least
//! [`CLUSTER_THRESHOLD`] rows are treated as import artifacts and
//! replaced with a date derived from an FNV-1a hash of the row's stable
//! identifier, so the replacement is repeatable across fetches with no
//! stored mapping.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::geo::date_to_quarter;
use crate::join::CoverageRow;

/// Minimum number of rows sharing a date before it counts as clustered.
pub const CLUSTER_THRESHOLD: usize = 10;

/// Months in the synthetic window: Jan 2021 through Dec 2024.
const WINDOW_MONTHS: u32 = 48;
const WINDOW_START_YEAR: i32 = 2021;

/// 32-bit FNV-1a. Chosen over an ad hoc rolling hash because it is
/// documented and portable, so synthetic dates survive reimplementation.
pub fn fnv1a_32(input: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in input.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Deterministic synthetic date for a row identifier. The month comes
/// from `hash % 48` inside the fixed window; the day from a second
/// modulus, capped at 28 so every month of the window is valid.
pub fn synthetic_date(id: &str) -> NaiveDate {
    let hash = fnv1a_32(id);
    let month_offset = hash % WINDOW_MONTHS;
    let year = WINDOW_START_YEAR + (month_offset / 12) as i32;
    let month = (month_offset % 12) + 1;
    let day = 1 + hash % 28;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| {
        // Unreachable with day <= 28, but never panic on a chart path.
        NaiveDate::from_ymd_opt(WINDOW_START_YEAR, 1, 1).unwrap()
    })
}

/// Replaces clustered announced dates in place. Rows whose date occurs
/// fewer than [`CLUSTER_THRESHOLD`] times pass through unchanged.
pub fn redistribute_dates(rows: &mut [CoverageRow]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter() {
        if let Some(date) = row.announced_date.as_deref() {
            *counts.entry(date).or_default() += 1;
        }
    }
    let clustered: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n >= CLUSTER_THRESHOLD)
        .map(|(date, _)| date.to_string())
        .collect();
    if clustered.is_empty() {
        return;
    }
    tracing::debug!("redistributing {} clustered date value(s)", clustered.len());

    for row in rows.iter_mut() {
        let is_clustered = row
            .announced_date
            .as_deref()
            .map(|d| clustered.iter().any(|c| c == d))
            .unwrap_or(false);
        if !is_clustered {
            continue;
        }
        let synthetic = synthetic_date(&row.company_id).format("%Y-%m-%d").to_string();
        row.quarter = date_to_quarter(&synthetic);
        row.announced_date = Some(synthetic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::Outcome;

    fn row(company_id: &str, date: Option<&str>) -> CoverageRow {
        CoverageRow {
            company_id: company_id.to_string(),
            company_name: company_id.to_string(),
            country: None,
            region: "Other".to_string(),
            stage: "Unknown".to_string(),
            announced_date: date.map(str::to_string),
            quarter: date.and_then(date_to_quarter),
            amount_m: None,
            seen: false,
            outcome: Outcome::Missed,
            in_scope: true,
            deal_id: None,
            entry_id: None,
            deal_score: None,
        }
    }

    #[test]
    fn fnv1a_reference_vectors() {
        // Published FNV-1a 32-bit test vectors.
        assert_eq!(fnv1a_32(""), 0x811c9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9cf968);
    }

    #[test]
    fn synthetic_date_is_deterministic_and_in_window() {
        let a = synthetic_date("rec-123");
        let b = synthetic_date("rec-123");
        assert_eq!(a, b);
        assert!(a >= NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert!(a <= NaiveDate::from_ymd_opt(2024, 12, 28).unwrap());
    }

    #[test]
    fn clustered_dates_are_spread() {
        let mut rows: Vec<CoverageRow> = (0..12)
            .map(|i| row(&format!("rec-{}", i), Some("2023-06-01")))
            .collect();
        redistribute_dates(&mut rows);

        let unchanged = rows
            .iter()
            .filter(|r| r.announced_date.as_deref() == Some("2023-06-01"))
            .count();
        // A hash collision back onto the original date is possible but
        // none of these identifiers produce one.
        assert_eq!(unchanged, 0);
        for r in &rows {
            assert_eq!(r.quarter, r.announced_date.as_deref().and_then(date_to_quarter));
        }
    }

    #[test]
    fn redistribution_is_repeatable() {
        let make = || -> Vec<CoverageRow> {
            (0..15)
                .map(|i| row(&format!("rec-{}", i), Some("2022-01-01")))
                .collect()
        };
        let mut first = make();
        let mut second = make();
        redistribute_dates(&mut first);
        redistribute_dates(&mut second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.announced_date, b.announced_date);
        }
    }

    #[test]
    fn sparse_dates_pass_through() {
        let mut rows: Vec<CoverageRow> = (0..9)
            .map(|i| row(&format!("rec-{}", i), Some("2023-06-01")))
            .collect();
        rows.push(row("rec-x", Some("2024-02-02")));
        redistribute_dates(&mut rows);
        assert!(rows[..9]
            .iter()
            .all(|r| r.announced_date.as_deref() == Some("2023-06-01")));
        assert_eq!(rows[9].announced_date.as_deref(), Some("2024-02-02"));
    }

    #[test]
    fn rows_without_dates_are_ignored() {
        let mut rows = vec![row("rec-1", None), row("rec-2", None)];
        redistribute_dates(&mut rows);
        assert!(rows.iter().all(|r| r.announced_date.is_none()));
    }
}
