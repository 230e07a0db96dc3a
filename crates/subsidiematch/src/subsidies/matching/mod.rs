//! Company/project eligibility matching against the generic rule set.
//!
//! `rules` holds the fixed 100-point rubric, `service` scores a request
//! against every loaded rule and ranks the results, `router` exposes the
//! HTTP endpoint. The scorer is a pure function of its inputs; no state
//! survives between evaluations.

pub mod domain;
pub mod router;
pub(crate) mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CompanyProfile, CompanySize, MatchRequest, MatchResponse, MatchScore, ProjectProfile,
    SubsidyCategory, SubsidyMatch, SubsidyRule,
};
pub use router::match_router;
pub use service::MatchService;
