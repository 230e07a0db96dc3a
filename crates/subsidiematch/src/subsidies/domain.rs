use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named subsidy schemes covered by the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsidyScheme {
    #[serde(rename = "EIA")]
    Eia,
    #[serde(rename = "ISDE")]
    Isde,
    #[serde(rename = "MIA")]
    Mia,
    #[serde(rename = "Vamil")]
    Vamil,
}

impl SubsidyScheme {
    pub const fn label(self) -> &'static str {
        match self {
            SubsidyScheme::Eia => "EIA",
            SubsidyScheme::Isde => "ISDE",
            SubsidyScheme::Mia => "MIA",
            SubsidyScheme::Vamil => "Vamil",
        }
    }
}

/// The closed set of MIA deduction tiers. Records carrying any other
/// percentage are rejected at load time.
pub const MIA_PERCENTAGE_TIERS: [u8; 4] = [13, 27, 36, 45];

/// ISDE sub-categories, one snapshot file each. The alias spellings appear in
/// older extraction runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsdeCategory {
    Warmtepomp,
    #[serde(alias = "isolatiematerialen")]
    Isolatie,
    #[serde(alias = "hoogrendementsglas")]
    Glas,
    Zonneboiler,
}

impl IsdeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            IsdeCategory::Warmtepomp => "warmtepomp",
            IsdeCategory::Isolatie => "isolatie",
            IsdeCategory::Glas => "glas",
            IsdeCategory::Zonneboiler => "zonneboiler",
        }
    }
}

fn default_eia_percentage() -> f64 {
    0.40
}

fn default_min_investment() -> f64 {
    2500.0
}

/// EIA (Energie-investeringsaftrek) code: a fixed percentage-of-investment
/// tax deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EiaCode {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category letter from the brochure.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default = "default_eia_percentage")]
    pub subsidy_percentage: f64,
    #[serde(default = "default_min_investment")]
    pub min_investment: f64,
    #[serde(default)]
    pub max_investment_per_unit: Option<f64>,
    /// Page number in the source brochure.
    #[serde(default)]
    pub page: Option<u32>,
}

impl EiaCode {
    /// Title plus description, the text the keyword index is built from.
    pub fn search_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }
}

/// ISDE meldcode: one approved manufacturer/model with a fixed subsidy
/// amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsdeMeldcode {
    pub category: IsdeCategory,
    pub meldcode: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Fixed amount in EUR (warmtepomp, zonneboiler).
    #[serde(default)]
    pub amount_eur: Option<f64>,
    /// Amounts keyed by housing type (isolatie, glas).
    #[serde(default)]
    pub amounts: Option<BTreeMap<String, Option<f64>>>,
    /// Free-form technical attributes from the extraction run.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub source: Option<BTreeMap<String, String>>,
}

impl IsdeMeldcode {
    pub fn display_name(&self) -> String {
        match (&self.manufacturer, &self.model) {
            (Some(manufacturer), Some(model)) => format!("{manufacturer} {model}"),
            (Some(manufacturer), None) => manufacturer.clone(),
            (None, Some(model)) => model.clone(),
            (None, None) => self.meldcode.clone(),
        }
    }
}

/// MIA/Vamil code: an environmental investment deduction at one of four
/// closed MIA tiers, usually paired with 75% Vamil depreciation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiaVamilCode {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub chapter: String,
    #[serde(default)]
    pub mia_percentage: Option<u8>,
    #[serde(default)]
    pub vamil_percentage: Option<u8>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl MiaVamilCode {
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// True when the MIA percentage is absent or one of the closed tiers.
    pub fn has_valid_tier(&self) -> bool {
        match self.mia_percentage {
            Some(tier) => MIA_PERCENTAGE_TIERS.contains(&tier),
            None => true,
        }
    }
}

/// Borrowed view over any record in the scheme corpus, so callers can handle
/// the three families uniformly where it matters (detail endpoints, notes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemeRuleRef<'a> {
    Eia(&'a EiaCode),
    Isde(&'a IsdeMeldcode),
    MiaVamil(&'a MiaVamilCode),
}

impl<'a> SchemeRuleRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            SchemeRuleRef::Eia(code) => &code.code,
            SchemeRuleRef::Isde(entry) => &entry.meldcode,
            SchemeRuleRef::MiaVamil(code) => &code.code,
        }
    }

    pub fn title(&self) -> String {
        match self {
            SchemeRuleRef::Eia(code) => code.title.clone(),
            SchemeRuleRef::Isde(entry) => entry.display_name(),
            SchemeRuleRef::MiaVamil(code) => code.title.clone(),
        }
    }

    pub fn scheme(&self) -> SubsidyScheme {
        match self {
            SchemeRuleRef::Eia(_) => SubsidyScheme::Eia,
            SchemeRuleRef::Isde(_) => SubsidyScheme::Isde,
            SchemeRuleRef::MiaVamil(_) => SubsidyScheme::Mia,
        }
    }
}
