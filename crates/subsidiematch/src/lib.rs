//! SubsidieMatch core: the subsidy rule corpus, its search indexes, and the
//! eligibility scoring rubric.
//!
//! The corpus is loaded once at startup and immutable afterwards; every query
//! and every evaluation is a read-only, deterministic operation over that
//! snapshot. The HTTP surface lives in the `subsidiematch-api` service crate.

pub mod config;
pub mod error;
pub mod subsidies;
pub mod telemetry;
