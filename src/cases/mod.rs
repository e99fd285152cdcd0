//! Case-statistics provider.
//!
//! This module handles:
//! - Upstream payload types for the total and history endpoints
//! - Derivation of the normalized [`CaseInfo`] record
//! - The HTTP client that resolves a country + scope into a record

pub mod client;
pub mod types;

pub use client::CaseClient;
pub use types::{population_percentage, CaseInfo};
