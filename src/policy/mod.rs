//! Policy-stringency provider.
//!
//! This module handles:
//! - Country name to alpha-3 resolution via the metadata provider
//! - Latest and date-range stringency lookups
//! - The bounded two-key fallback used to read index values

pub mod client;
pub mod stringency;
pub mod types;

pub use client::{reference_date, PolicyClient};
pub use stringency::UNKNOWN_STRINGENCY;
pub use types::{CountryCode, StringencyInfo};
