use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{IsdeCategory, SubsidyScheme};
use super::index::SubsidyStore;

/// Quantity × unit price drift tolerated before the total is corrected.
const TOTAL_PRICE_EPSILON: f64 = 0.01;

fn default_quantity() -> u32 {
    1
}

/// Equipment categories assigned during quote extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Warmtepomp,
    Isolatie,
    Glas,
    Zonneboiler,
    CncMachine,
    LedVerlichting,
    Koeling,
    Ventilatie,
    ElektrischVoertuig,
    Other,
}

impl EquipmentCategory {
    /// The ISDE sub-category this equipment category maps onto, if any.
    pub const fn isde_category(self) -> Option<IsdeCategory> {
        match self {
            EquipmentCategory::Warmtepomp => Some(IsdeCategory::Warmtepomp),
            EquipmentCategory::Isolatie => Some(IsdeCategory::Isolatie),
            EquipmentCategory::Glas => Some(IsdeCategory::Glas),
            EquipmentCategory::Zonneboiler => Some(IsdeCategory::Zonneboiler),
            _ => None,
        }
    }
}

/// One equipment line item extracted from a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub specs: BTreeMap<String, Value>,
    #[serde(default)]
    pub category: Option<EquipmentCategory>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub line_number: Option<u32>,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

impl Equipment {
    /// The invariant total = quantity × unit price, enforced by correction.
    /// Extraction output drifts occasionally; a drifted total is replaced by
    /// the product rather than rejected.
    pub fn reconcile_total(&mut self) {
        let expected = f64::from(self.quantity) * self.unit_price;
        if (self.total_price - expected).abs() > TOTAL_PRICE_EPSILON {
            self.total_price = expected;
        }
    }
}

/// One calculated subsidy for an equipment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyCalculation {
    pub scheme: SubsidyScheme,
    pub code: String,
    pub title: String,
    pub investment_amount: f64,
    pub subsidy_amount: f64,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub rules_applied: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Match result for a single equipment item.
///
/// `best_combination` and `total_subsidy` are an extension point: the
/// mutual-exclusivity rules between schemes that a combination optimizer
/// would need are still an open business question, so nothing populates
/// them yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentMatch {
    pub equipment: Equipment,
    #[serde(default)]
    pub eia_matches: Vec<SubsidyCalculation>,
    #[serde(default)]
    pub isde_matches: Vec<SubsidyCalculation>,
    #[serde(default)]
    pub mia_matches: Vec<SubsidyCalculation>,
    #[serde(default)]
    pub vamil_matches: Vec<SubsidyCalculation>,
    #[serde(default)]
    pub best_combination: Vec<SubsidyCalculation>,
    #[serde(default)]
    pub total_subsidy: f64,
    pub confidence: f64,
    #[serde(default)]
    pub match_notes: Vec<String>,
}

/// Candidates considered per keyword-ranked scheme.
const KEYWORD_CANDIDATES: usize = 3;

/// Match one equipment item against the scheme corpus.
pub fn match_equipment(store: &SubsidyStore, equipment: &Equipment) -> EquipmentMatch {
    let mut equipment = equipment.clone();
    equipment.reconcile_total();
    let investment = equipment.total_price;

    let mut notes = Vec::new();
    let mut isde_matches = Vec::new();

    if let (Some(brand), Some(model)) = (&equipment.brand, &equipment.model) {
        let category = equipment.category.and_then(EquipmentCategory::isde_category);
        if let Some(entry) = store.search_isde_by_model(brand, model, category) {
            if let Some(amount) = entry.amount_eur {
                isde_matches.push(SubsidyCalculation {
                    scheme: SubsidyScheme::Isde,
                    code: entry.meldcode.clone(),
                    title: entry.display_name(),
                    investment_amount: investment,
                    subsidy_amount: amount,
                    percentage: None,
                    rules_applied: vec!["fixed amount per meldcode".to_string()],
                    warnings: Vec::new(),
                });
                notes.push(format!("Exact ISDE model match ({})", entry.meldcode));
            }
        }
    }

    let min_matches = if equipment.keywords.len() >= 2 { 2 } else { 1 };

    let mut eia_matches = Vec::new();
    for code in store
        .search_eia_by_keywords(&equipment.keywords, min_matches)
        .into_iter()
        .take(KEYWORD_CANDIDATES)
    {
        let mut rules_applied = vec![format!(
            "{:.0}% investment deduction",
            code.subsidy_percentage * 100.0
        )];
        let mut warnings = Vec::new();

        let eligible_investment = match code.max_investment_per_unit {
            Some(cap) => {
                let capped = investment.min(cap * f64::from(equipment.quantity));
                if capped < investment {
                    rules_applied.push(format!("investment capped at EUR {cap:.2} per unit"));
                }
                capped
            }
            None => investment,
        };
        if investment < code.min_investment {
            warnings.push(format!(
                "investment below EIA minimum of EUR {:.2}",
                code.min_investment
            ));
        }

        eia_matches.push(SubsidyCalculation {
            scheme: SubsidyScheme::Eia,
            code: code.code.clone(),
            title: code.title.clone(),
            investment_amount: investment,
            subsidy_amount: eligible_investment * code.subsidy_percentage,
            percentage: Some(code.subsidy_percentage),
            rules_applied,
            warnings,
        });
    }

    let mut mia_matches = Vec::new();
    let mut vamil_matches = Vec::new();
    for code in store
        .search_mia_by_keywords(&equipment.keywords, min_matches)
        .into_iter()
        .take(KEYWORD_CANDIDATES)
    {
        if let Some(tier) = code.mia_percentage {
            mia_matches.push(SubsidyCalculation {
                scheme: SubsidyScheme::Mia,
                code: code.code.clone(),
                title: code.title.clone(),
                investment_amount: investment,
                subsidy_amount: investment * f64::from(tier) / 100.0,
                percentage: Some(f64::from(tier) / 100.0),
                rules_applied: vec![format!("{tier}% environmental investment deduction")],
                warnings: Vec::new(),
            });
        }
        if let Some(vamil) = code.vamil_percentage {
            vamil_matches.push(SubsidyCalculation {
                scheme: SubsidyScheme::Vamil,
                code: code.code.clone(),
                title: code.title.clone(),
                investment_amount: investment,
                subsidy_amount: investment * f64::from(vamil) / 100.0,
                percentage: Some(f64::from(vamil) / 100.0),
                rules_applied: vec![format!("{vamil}% accelerated depreciation base")],
                warnings: vec![
                    "Vamil amount is a depreciation base, not a cash subsidy".to_string()
                ],
            });
        }
    }

    let confidence = if !isde_matches.is_empty() {
        0.95
    } else if !eia_matches.is_empty() || !mia_matches.is_empty() {
        0.6
    } else {
        0.2
    };

    if isde_matches.is_empty() && eia_matches.is_empty() && mia_matches.is_empty() {
        notes.push("No scheme matched this equipment".to_string());
    } else if isde_matches.is_empty() {
        notes.push("Keyword matches only; no exact model match".to_string());
    }

    EquipmentMatch {
        equipment,
        eia_matches,
        isde_matches,
        mia_matches,
        vamil_matches,
        best_combination: Vec::new(),
        total_subsidy: 0.0,
        confidence,
        match_notes: notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsidies::index::SubsidyStore;
    use crate::subsidies::loader::LoadReport;
    use crate::subsidies::query::tests::snapshot;

    fn store() -> SubsidyStore {
        SubsidyStore::build(snapshot(), LoadReport::default())
    }

    fn heat_pump() -> Equipment {
        Equipment {
            description: "Daikin Altherma 3H warmtepomp 16kW".to_string(),
            brand: Some("Daikin".to_string()),
            model: Some("Altherma 3H 16kW".to_string()),
            quantity: 1,
            unit_price: 12_000.0,
            total_price: 12_000.0,
            specs: BTreeMap::new(),
            category: Some(EquipmentCategory::Warmtepomp),
            keywords: vec!["warmtepomp".to_string(), "lucht".to_string()],
            line_number: Some(1),
            extracted_text: None,
        }
    }

    #[test]
    fn drifted_total_is_corrected_to_product() {
        let mut equipment = heat_pump();
        equipment.quantity = 2;
        equipment.total_price = 12_000.0;
        equipment.reconcile_total();
        assert_eq!(equipment.total_price, 24_000.0);
    }

    #[test]
    fn rounding_noise_within_epsilon_is_kept() {
        let mut equipment = heat_pump();
        equipment.total_price = 12_000.005;
        equipment.reconcile_total();
        assert_eq!(equipment.total_price, 12_000.005);
    }

    #[test]
    fn exact_model_match_yields_isde_calculation() {
        let result = match_equipment(&store(), &heat_pump());
        assert_eq!(result.isde_matches.len(), 1);
        let calculation = &result.isde_matches[0];
        assert_eq!(calculation.code, "KA01205");
        assert_eq!(calculation.subsidy_amount, 5775.0);
        assert_eq!(result.confidence, 0.95);
        assert!(result
            .match_notes
            .iter()
            .any(|note| note.contains("KA01205")));
    }

    #[test]
    fn keyword_matches_yield_eia_calculations() {
        let result = match_equipment(&store(), &heat_pump());
        assert!(!result.eia_matches.is_empty());
        let calculation = &result.eia_matches[0];
        assert_eq!(calculation.percentage, Some(0.40));
        assert_eq!(calculation.subsidy_amount, 12_000.0 * 0.40);
    }

    #[test]
    fn unmatched_equipment_gets_floor_confidence() {
        let equipment = Equipment {
            description: "Koffiemachine".to_string(),
            brand: None,
            model: None,
            quantity: 1,
            unit_price: 800.0,
            total_price: 800.0,
            specs: BTreeMap::new(),
            category: Some(EquipmentCategory::Other),
            keywords: vec!["koffie".to_string()],
            line_number: None,
            extracted_text: None,
        };
        let result = match_equipment(&store(), &equipment);
        assert!(result.isde_matches.is_empty());
        assert!(result.eia_matches.is_empty());
        assert_eq!(result.confidence, 0.2);
    }

    #[test]
    fn best_combination_stays_empty() {
        // No agreed policy yet for combining mutually exclusive schemes;
        // the fields exist but nothing computes them.
        let result = match_equipment(&store(), &heat_pump());
        assert!(result.best_combination.is_empty());
        assert_eq!(result.total_subsidy, 0.0);
    }

    #[test]
    fn vamil_entries_carry_depreciation_warning() {
        let equipment = Equipment {
            description: "Grondstofbesparende verpakkingsmachine".to_string(),
            brand: None,
            model: None,
            quantity: 1,
            unit_price: 50_000.0,
            total_price: 50_000.0,
            specs: BTreeMap::new(),
            category: Some(EquipmentCategory::CncMachine),
            keywords: vec!["grondstofbesparende".to_string()],
            line_number: None,
            extracted_text: None,
        };
        let result = match_equipment(&store(), &equipment);
        assert!(!result.mia_matches.is_empty());
        assert_eq!(result.mia_matches.len(), result.vamil_matches.len());
        assert!(result.vamil_matches[0].warnings[0].contains("depreciation"));
    }
}
