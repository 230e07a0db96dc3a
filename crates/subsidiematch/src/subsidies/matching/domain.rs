use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Company size tiers, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub const fn label(self) -> &'static str {
        match self {
            CompanySize::Micro => "micro",
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
        }
    }
}

/// Fixed project/rule categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsidyCategory {
    Innovation,
    Sustainability,
    Internationalization,
    Digitalization,
    Training,
    Other,
}

impl SubsidyCategory {
    pub const fn label(self) -> &'static str {
        match self {
            SubsidyCategory::Innovation => "innovation",
            SubsidyCategory::Sustainability => "sustainability",
            SubsidyCategory::Internationalization => "internationalization",
            SubsidyCategory::Digitalization => "digitalization",
            SubsidyCategory::Training => "training",
            SubsidyCategory::Other => "other",
        }
    }
}

/// Company facts supplied by the caller, owned per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    /// KVK registration number.
    #[serde(default)]
    pub kvk_number: Option<String>,
    pub size: CompanySize,
    pub industry: String,
    pub employees: u32,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    /// City or province.
    pub location: String,
}

/// Project facts supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProfile {
    pub title: String,
    pub description: String,
    pub category: SubsidyCategory,
    /// Budget in EUR.
    pub budget: f64,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    pub duration_months: u32,
}

/// One generic subsidy rule: eligibility constraints plus presentation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SubsidyCategory,
    pub provider: String,
    #[serde(default)]
    pub min_budget: Option<f64>,
    #[serde(default)]
    pub max_budget: Option<f64>,
    pub eligible_company_sizes: Vec<CompanySize>,
    #[serde(default)]
    pub eligible_industries: Option<Vec<String>>,
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Score breakdown for one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// 0..=100.
    pub score: f64,
    /// Input completeness, 0..=1; independent of match quality.
    pub confidence: f64,
    pub reasons: Vec<String>,
}

/// One evaluated (company, project, rule) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyMatch {
    pub subsidy: SubsidyRule,
    pub match_score: MatchScore,
    pub eligible: bool,
    #[serde(default)]
    pub missing_requirements: Vec<String>,
}

/// Request boundary for the match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub company: CompanyProfile,
    pub project: ProjectProfile,
    #[serde(default)]
    pub additional_info: Option<BTreeMap<String, Value>>,
}

/// Response boundary: matches ranked by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<SubsidyMatch>,
    pub total_matches: usize,
    pub analysis_timestamp: DateTime<Utc>,
}
