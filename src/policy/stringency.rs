//! Stringency value resolution.
//!
//! The provider reports the index under `stringency_actual` for most dates and
//! only under `stringency` for some. Lookups try the two known keys in order
//! and stop there.

use super::types::StringencyValues;

/// Reported when neither key holds a value.
pub const UNKNOWN_STRINGENCY: f64 = -1.0;

/// Keys the provider stores the index under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringencyKey {
    /// `stringency_actual`
    Actual,
    /// `stringency`
    Index,
}

/// Lookup order.
pub const FALLBACK_ORDER: [StringencyKey; 2] = [StringencyKey::Actual, StringencyKey::Index];

/// Resolve the index from an entry, `None` when unknown.
pub fn resolve(values: Option<&StringencyValues>) -> Option<f64> {
    let values = values?;
    FALLBACK_ORDER.iter().find_map(|&key| values.get(key))
}

/// Change between two resolved values.
///
/// An unknown end value gives a flat trend. An unknown start value counts as
/// the sentinel, matching the published figures.
pub fn trend(start: Option<f64>, end: Option<f64>) -> f64 {
    match end {
        None => 0.0,
        Some(end) => end - start.unwrap_or(UNKNOWN_STRINGENCY),
    }
}
