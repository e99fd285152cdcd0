//! COVID-19 case and policy aggregation service.
//!
//! Every request fans out to two public providers, a case-statistics API and a
//! policy-stringency API, and reshapes their ragged JSON into a stable local
//! schema:
//!
//! ```text
//! GET /corona/v1/country/norway?scope=2020-03-01-2020-03-03
//!   -> mmediagroup /history?country=Norway&status=Confirmed
//!   <- {"country":"Norway","continent":"Europe","scope":"2020-03-01-2020-03-03",
//!       "confirmed":31,"recovered":0,"population_percentage":"0.00"}
//! ```
//!
//! Nothing is cached or stored: every call re-fetches upstream.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: Provider identity, outbound fetch and JSON decoding
//! - [`cases`]: Case-statistics client and case resolver
//! - [`policy`]: Policy client and stringency resolver
//! - [`scope`]: Date window shared by both resolvers
//! - [`api`]: HTTP routes, handlers and request parameter parsing
//! - [`metrics`]: Upstream and request metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod cases;
pub mod config;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod scope;
pub mod upstream;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError, UpstreamError};
pub use scope::DateScope;
