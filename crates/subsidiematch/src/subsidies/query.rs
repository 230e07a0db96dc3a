use std::collections::HashMap;

use serde::Serialize;

use super::domain::{EiaCode, IsdeCategory, IsdeMeldcode, MiaVamilCode};
use super::index::SubsidyStore;
use super::loader::RuleFamily;

/// Record counts per family, exposed through the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub eia_codes: usize,
    pub isde_warmtepompen: usize,
    pub isde_isolatie: usize,
    pub isde_glas: usize,
    pub isde_zonneboilers: usize,
    pub isde_total: usize,
    pub mia_vamil_codes: usize,
    pub total_entries: usize,
}

impl SubsidyStore {
    /// O(1) exact lookup; a miss is `None`, never an error.
    pub fn eia_by_code(&self, code: &str) -> Option<&EiaCode> {
        self.eia_by_code.get(code).map(|&position| &self.eia_codes[position])
    }

    pub fn isde_by_meldcode(&self, meldcode: &str) -> Option<&IsdeMeldcode> {
        self.isde_by_meldcode
            .get(meldcode)
            .map(|&position| &self.isde_entries[position])
    }

    pub fn mia_by_code(&self, code: &str) -> Option<&MiaVamilCode> {
        self.mia_by_code
            .get(code)
            .map(|&position| &self.mia_vamil_codes[position])
    }

    /// Rank EIA codes by how many of the query keywords hit them.
    ///
    /// Each keyword is lowercased and looked up independently; candidates
    /// keep the order in which they first appeared in a posting list, so
    /// ties are deterministic. An empty keyword list yields no results.
    pub fn search_eia_by_keywords(&self, keywords: &[String], min_matches: usize) -> Vec<&EiaCode> {
        keyword_hits(&self.eia_by_keyword, keywords, min_matches)
            .into_iter()
            .map(|(position, _)| &self.eia_codes[position])
            .collect()
    }

    /// Like [`Self::search_eia_by_keywords`], with ties broken by the MIA
    /// percentage tier, descending.
    pub fn search_mia_by_keywords(
        &self,
        keywords: &[String],
        min_matches: usize,
    ) -> Vec<&MiaVamilCode> {
        let mut hits = keyword_hits(&self.mia_by_keyword, keywords, min_matches);
        hits.sort_by(|a, b| {
            let tier = |position: usize| self.mia_vamil_codes[position].mia_percentage.unwrap_or(0);
            b.1.cmp(&a.1).then_with(|| tier(b.0).cmp(&tier(a.0)))
        });
        hits.into_iter()
            .map(|(position, _)| &self.mia_vamil_codes[position])
            .collect()
    }

    /// Case-insensitive exact chapter lookup; no fuzzy matching.
    pub fn search_eia_by_chapter(&self, chapter: &str) -> Vec<&EiaCode> {
        self.eia_by_chapter
            .get(&chapter.to_lowercase())
            .map(|positions| positions.iter().map(|&p| &self.eia_codes[p]).collect())
            .unwrap_or_default()
    }

    /// Fuzzy brand search: a bucket matches when the normalized query
    /// contains the indexed brand or vice versa. Entries appearing under
    /// several matching buckets are returned once per bucket; callers that
    /// need uniqueness dedupe by meldcode. A blank query normalizes to the
    /// empty string, which every indexed brand contains, so it returns the
    /// whole brand index.
    pub fn search_isde_by_brand(&self, brand: &str) -> Vec<&IsdeMeldcode> {
        let query = brand.trim().to_lowercase();

        let mut results = Vec::new();
        for (indexed, positions) in &self.isde_by_brand {
            if indexed.contains(&query) || query.contains(indexed.as_str()) {
                results.extend(positions.iter().map(|&p| &self.isde_entries[p]));
            }
        }
        results
    }

    /// Brand + model lookup, the primary path for quote line items.
    ///
    /// Returns the FIRST fuzzy-brand candidate whose model contains the
    /// query model, case-insensitively, optionally restricted to one ISDE
    /// category. First-match rather than best-match is a known precision
    /// limitation of the matching pipeline; changing it would change
    /// observable output and needs product sign-off. Blank inputs follow
    /// the substring rule: a blank model matches the first candidate that
    /// has any model at all.
    pub fn search_isde_by_model(
        &self,
        brand: &str,
        model: &str,
        category: Option<IsdeCategory>,
    ) -> Option<&IsdeMeldcode> {
        let model_query = model.trim().to_lowercase();

        self.search_isde_by_brand(brand)
            .into_iter()
            .filter(|entry| category.map_or(true, |wanted| entry.category == wanted))
            .find(|entry| {
                entry
                    .model
                    .as_ref()
                    .is_some_and(|m| m.to_lowercase().contains(&model_query))
            })
    }

    pub fn isde_by_category(&self, category: IsdeCategory) -> Vec<&IsdeMeldcode> {
        self.isde_by_category
            .get(&category)
            .map(|positions| positions.iter().map(|&p| &self.isde_entries[p]).collect())
            .unwrap_or_default()
    }

    /// Exact closed-tier lookup (13, 27, 36, or 45).
    pub fn mia_by_percentage(&self, tier: u8) -> Vec<&MiaVamilCode> {
        self.mia_by_percentage
            .get(&tier)
            .map(|positions| positions.iter().map(|&p| &self.mia_vamil_codes[p]).collect())
            .unwrap_or_default()
    }

    pub fn all_eia_codes(&self) -> &[EiaCode] {
        &self.eia_codes
    }

    pub fn all_mia_codes(&self) -> &[MiaVamilCode] {
        &self.mia_vamil_codes
    }

    pub fn stats(&self) -> CorpusStats {
        let report = self.load_report();
        let isde_total = self.isde_entries.len();
        CorpusStats {
            eia_codes: self.eia_codes.len(),
            isde_warmtepompen: report.records(RuleFamily::IsdeWarmtepompen),
            isde_isolatie: report.records(RuleFamily::IsdeIsolatie),
            isde_glas: report.records(RuleFamily::IsdeGlas),
            isde_zonneboilers: report.records(RuleFamily::IsdeZonneboilers),
            isde_total,
            mia_vamil_codes: self.mia_vamil_codes.len(),
            total_entries: self.eia_codes.len() + isde_total + self.mia_vamil_codes.len(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.eia_codes.is_empty() || !self.isde_entries.is_empty()
    }
}

/// Accumulate distinct-keyword hit counts per record position, preserving
/// first-seen order, then stable-sort descending by count.
fn keyword_hits(
    index: &HashMap<String, Vec<usize>>,
    keywords: &[String],
    min_matches: usize,
) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = Vec::new();
    let mut counts: HashMap<usize, usize> = HashMap::new();

    for keyword in keywords {
        let key = keyword.trim().to_lowercase();
        if let Some(positions) = index.get(&key) {
            for &position in positions {
                let count = counts.entry(position).or_insert_with(|| {
                    order.push(position);
                    0
                });
                *count += 1;
            }
        }
    }

    let mut hits: Vec<(usize, usize)> = order
        .into_iter()
        .map(|position| (position, counts[&position]))
        .filter(|&(_, count)| count >= min_matches)
        .collect();
    hits.sort_by(|a, b| b.1.cmp(&a.1));
    hits
}
