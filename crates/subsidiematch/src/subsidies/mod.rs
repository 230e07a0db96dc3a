//! Subsidy rule corpus, search indexes, and eligibility matching.
//!
//! `loader` reads the per-family snapshot files, `index` builds the immutable
//! in-memory store, `query` exposes the read-only lookups over it, and
//! `matching` scores company/project profiles against the generic rule set.
//! `equipment` matches extracted quote line items against the scheme corpus.

pub mod domain;
pub mod equipment;
pub mod index;
pub mod keywords;
pub mod loader;
pub mod matching;
pub mod query;

pub use domain::{
    EiaCode, IsdeCategory, IsdeMeldcode, MiaVamilCode, SchemeRuleRef, SubsidyScheme,
    MIA_PERCENTAGE_TIERS,
};
pub use equipment::{match_equipment, Equipment, EquipmentCategory, EquipmentMatch, SubsidyCalculation};
pub use index::{IntegrityWarning, SubsidyStore};
pub use keywords::extract_keywords;
pub use loader::{load_corpus, load_rules, CorpusSnapshot, FamilyStatus, LoadReport, RuleFamily};
pub use query::CorpusStats;
