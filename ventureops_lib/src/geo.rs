//! Static geography lookups and small pure parsers.
//!
//! Two granularities of country-code mapping: a one-country-per-entry
//! display map, and a coarser filter-bucket map that deliberately merges
//! small markets for dashboard aggregation. Lookup misses return `None`;
//! callers supply their own fallback label (usually "Other").

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::extract::Scalar;

/// Fine-grained region for display, one country per entry.
pub fn display_region(country_code: &str) -> Option<&'static str> {
    Some(match country_code {
        "FR" => "France",
        "DE" => "Germany",
        "GB" => "United Kingdom",
        "IE" => "Ireland",
        "NL" => "Netherlands",
        "BE" => "Belgium",
        "LU" => "Luxembourg",
        "CH" => "Switzerland",
        "AT" => "Austria",
        "SE" => "Sweden",
        "NO" => "Norway",
        "DK" => "Denmark",
        "FI" => "Finland",
        "IS" => "Iceland",
        "ES" => "Spain",
        "IT" => "Italy",
        "PT" => "Portugal",
        "GR" => "Greece",
        "PL" => "Poland",
        "CZ" => "Czechia",
        "EE" => "Estonia",
        "US" => "United States",
        "CA" => "Canada",
        "IL" => "Israel",
        _ => return None,
    })
}

/// Coarse filter bucket. Small neighboring markets are intentionally
/// merged into the nearest large one so dashboard filters stay usable.
pub fn filter_region(country_code: &str) -> Option<&'static str> {
    Some(match country_code {
        "FR" => "France",
        // DACH plus Benelux roll up into the Germany bucket.
        "DE" | "AT" | "CH" | "NL" | "BE" | "LU" => "Germany",
        "SE" | "NO" | "DK" | "FI" | "IS" => "Nordics",
        "GB" | "IE" => "UK & Ireland",
        "ES" | "IT" | "PT" | "GR" => "Southern Europe",
        "PL" | "CZ" | "EE" => "Eastern Europe",
        "US" | "CA" => "North America",
        _ => return None,
    })
}

static STAGE_RE: OnceLock<Regex> = OnceLock::new();

/// Parses a funding stage from the leading pattern of a free-text deal
/// label, e.g. `"Series A - Acme"` → `"Series A"`. Case is normalized;
/// unrecognized prefixes (including "IPO - ...") yield `None`.
pub fn stage_from_label(label: &str) -> Option<String> {
    let re = STAGE_RE.get_or_init(|| {
        Regex::new(r"(?i)^(series [a-z]|pre-seed|seed|venture|grant|private equity|corporate)")
            .unwrap()
    });
    let matched = re.find(label.trim())?.as_str().to_lowercase();
    Some(match matched.as_str() {
        "pre-seed" => "Pre-Seed".to_string(),
        "seed" => "Seed".to_string(),
        "venture" => "Venture".to_string(),
        "grant" => "Grant".to_string(),
        "private equity" => "Private Equity".to_string(),
        "corporate" => "Corporate".to_string(),
        series => {
            // "series x" -> "Series X"
            let letter = series.chars().last().unwrap_or('?').to_ascii_uppercase();
            format!("Series {}", letter)
        }
    })
}

/// Converts a raw amount (number, or string with currency symbols and
/// separators) into integer millions, rounding half-up. True but
/// sub-500k amounts round to 0; unparseable input is `None`.
pub fn amount_to_millions(amount: &Scalar) -> Option<i64> {
    let value = match amount {
        Scalar::Number(n) => *n,
        Scalar::Text(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return None;
            }
            digits.parse::<f64>().ok()?
        }
        Scalar::Bool(_) => return None,
    };
    Some((value / 1_000_000.0).round() as i64)
}

/// Formats a date string as `"Q{1-4} {year}"`. Accepts `YYYY-MM-DD` with
/// or without a trailing time component; anything else is `None`.
pub fn date_to_quarter(date: &str) -> Option<String> {
    let date = date.trim();
    let prefix = date.get(..10).unwrap_or(date);
    let parsed = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    let quarter = (parsed.month0() / 3) + 1;
    Some(format!("Q{} {}", quarter, parsed.year()))
}
