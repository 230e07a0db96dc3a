use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use super::domain::{EiaCode, IsdeCategory, IsdeMeldcode, MiaVamilCode, SubsidyScheme};
use super::keywords::extract_keywords;
use super::loader::{load_corpus, CorpusSnapshot, LoadReport};

/// Duplicate id within a rule family. The later record wins in the primary
/// key index, but the collision is surfaced rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    pub scheme: SubsidyScheme,
    pub id: String,
}

/// Immutable in-memory corpus store.
///
/// Built exactly once over the full snapshot; every index holds positions
/// into the owned record vectors, in load order. A refresh is a new store
/// swapped in behind an `Arc`, never an in-place mutation, so concurrent
/// readers need no locking.
#[derive(Debug, Default)]
pub struct SubsidyStore {
    pub(super) eia_codes: Vec<EiaCode>,
    pub(super) isde_entries: Vec<IsdeMeldcode>,
    pub(super) mia_vamil_codes: Vec<MiaVamilCode>,

    pub(super) eia_by_code: HashMap<String, usize>,
    pub(super) eia_by_chapter: BTreeMap<String, Vec<usize>>,
    pub(super) eia_by_keyword: HashMap<String, Vec<usize>>,

    pub(super) isde_by_meldcode: HashMap<String, usize>,
    // BTreeMap keeps brand iteration deterministic for the fuzzy path.
    pub(super) isde_by_brand: BTreeMap<String, Vec<usize>>,
    pub(super) isde_by_category: BTreeMap<IsdeCategory, Vec<usize>>,

    pub(super) mia_by_code: HashMap<String, usize>,
    pub(super) mia_by_keyword: HashMap<String, Vec<usize>>,
    pub(super) mia_by_percentage: BTreeMap<u8, Vec<usize>>,

    report: LoadReport,
    warnings: Vec<IntegrityWarning>,
}

impl SubsidyStore {
    /// Load the snapshot files under `dir` and build all indexes.
    pub fn load(dir: &Path) -> Self {
        let (snapshot, report) = load_corpus(dir);
        Self::build(snapshot, report)
    }

    /// Build the index set over an already-loaded snapshot.
    pub fn build(snapshot: CorpusSnapshot, report: LoadReport) -> Self {
        let mut store = Self {
            isde_entries: snapshot.isde_union(),
            eia_codes: snapshot.eia_codes,
            mia_vamil_codes: snapshot.mia_vamil_codes,
            report,
            ..Self::default()
        };

        store.index_eia();
        store.index_isde();
        store.index_mia();

        for warning in &store.warnings {
            warn!(
                scheme = warning.scheme.label(),
                id = %warning.id,
                "duplicate rule id, keeping the last-loaded record"
            );
        }

        store
    }

    fn index_eia(&mut self) {
        for (position, code) in self.eia_codes.iter().enumerate() {
            if self.eia_by_code.insert(code.code.clone(), position).is_some() {
                self.warnings.push(IntegrityWarning {
                    scheme: SubsidyScheme::Eia,
                    id: code.code.clone(),
                });
            }

            if let Some(chapter) = &code.chapter {
                self.eia_by_chapter
                    .entry(chapter.to_lowercase())
                    .or_default()
                    .push(position);
            }

            for keyword in extract_keywords(&code.search_text()) {
                self.eia_by_keyword.entry(keyword).or_default().push(position);
            }
        }
    }

    fn index_isde(&mut self) {
        for (position, entry) in self.isde_entries.iter().enumerate() {
            if self
                .isde_by_meldcode
                .insert(entry.meldcode.clone(), position)
                .is_some()
            {
                self.warnings.push(IntegrityWarning {
                    scheme: SubsidyScheme::Isde,
                    id: entry.meldcode.clone(),
                });
            }

            self.isde_by_category
                .entry(entry.category)
                .or_default()
                .push(position);

            if let Some(manufacturer) = &entry.manufacturer {
                let normalized = manufacturer.trim().to_lowercase();
                if !normalized.is_empty() {
                    self.isde_by_brand.entry(normalized).or_default().push(position);
                }
            }
        }
    }

    fn index_mia(&mut self) {
        for (position, code) in self.mia_vamil_codes.iter().enumerate() {
            if self.mia_by_code.insert(code.code.clone(), position).is_some() {
                self.warnings.push(IntegrityWarning {
                    scheme: SubsidyScheme::Mia,
                    id: code.code.clone(),
                });
            }

            if let Some(tier) = code.mia_percentage {
                self.mia_by_percentage.entry(tier).or_default().push(position);
            }

            for keyword in extract_keywords(&code.search_text()) {
                self.mia_by_keyword.entry(keyword).or_default().push(position);
            }
        }
    }

    /// Per-family load outcomes captured at build time.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Duplicate-id findings from index construction.
    pub fn integrity_warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsidies::query::tests::{eia, isde, mia, snapshot};

    #[test]
    fn duplicate_ids_are_surfaced_not_silent() {
        let snapshot = CorpusSnapshot {
            eia_codes: vec![
                eia("211102", "Warmtepompboiler", Some("Verwarmen")),
                eia("211102", "Warmtepompboiler v2", Some("Verwarmen")),
            ],
            ..CorpusSnapshot::default()
        };
        let store = SubsidyStore::build(snapshot, LoadReport::default());

        assert_eq!(
            store.integrity_warnings(),
            &[IntegrityWarning {
                scheme: SubsidyScheme::Eia,
                id: "211102".to_string(),
            }]
        );
        // Last record wins in the primary key index.
        let hit = store.eia_by_code("211102").expect("code resolves");
        assert_eq!(hit.title, "Warmtepompboiler v2");
    }

    #[test]
    fn record_indexed_once_per_keyword() {
        let snapshot = CorpusSnapshot {
            eia_codes: vec![eia(
                "220101",
                "Warmtepomp warmtepomp WARMTEPOMP",
                None,
            )],
            ..CorpusSnapshot::default()
        };
        let store = SubsidyStore::build(snapshot, LoadReport::default());
        assert_eq!(store.eia_by_keyword["warmtepomp"], vec![0]);
    }

    #[test]
    fn brand_index_normalizes_and_groups() {
        let snapshot = CorpusSnapshot {
            isde_warmtepompen: vec![
                isde("KA01205", "  Daikin ", "Altherma 3H 16kW", 5775.0),
                isde("KA01206", "daikin", "Altherma 3H 18kW", 6300.0),
            ],
            ..CorpusSnapshot::default()
        };
        let store = SubsidyStore::build(snapshot, LoadReport::default());
        assert_eq!(store.isde_by_brand["daikin"].len(), 2);
    }

    #[test]
    fn percentage_tiers_group_in_load_order() {
        let snapshot = CorpusSnapshot {
            mia_vamil_codes: vec![
                mia("F 1200", "Apparatuur A", 45),
                mia("A 1300", "Apparatuur B", 36),
                mia("F 1400", "Apparatuur C", 45),
            ],
            ..CorpusSnapshot::default()
        };
        let store = SubsidyStore::build(snapshot, LoadReport::default());
        assert_eq!(store.mia_by_percentage[&45], vec![0, 2]);
        assert_eq!(store.mia_by_percentage[&36], vec![1]);
    }

    #[test]
    fn full_snapshot_indexes_every_family() {
        let store = SubsidyStore::build(snapshot(), LoadReport::default());
        assert!(store.integrity_warnings().is_empty());
        assert!(!store.eia_by_code.is_empty());
        assert!(!store.isde_by_meldcode.is_empty());
        assert!(!store.mia_by_code.is_empty());
    }
}
