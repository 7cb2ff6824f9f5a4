//! Deterministic loan-eligibility evaluation over banking customer records.
//!
//! The `lending` module holds the whole pipeline: a provider trait for
//! customer data, signal derivation, the fixed 11-rule evaluation, the
//! threshold decision map, and the decision-record store. `config`,
//! `telemetry`, and `error` carry the service plumbing shared with the API
//! binary.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
