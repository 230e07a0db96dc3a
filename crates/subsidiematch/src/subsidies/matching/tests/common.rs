use crate::subsidies::matching::domain::{
    CompanyProfile, CompanySize, MatchRequest, ProjectProfile, SubsidyCategory, SubsidyRule,
};

pub(super) fn company() -> CompanyProfile {
    CompanyProfile {
        name: "Groentech BV".to_string(),
        kvk_number: Some("12345678".to_string()),
        size: CompanySize::Small,
        industry: "retail".to_string(),
        employees: 18,
        annual_revenue: Some(2_400_000.0),
        location: "Utrecht".to_string(),
    }
}

pub(super) fn project() -> ProjectProfile {
    ProjectProfile {
        title: "Warmtepomp installatie".to_string(),
        description: "Vervanging gasketel door lucht-water warmtepomp".to_string(),
        category: SubsidyCategory::Sustainability,
        budget: 12_000.0,
        start_date: None,
        duration_months: 6,
    }
}

/// Sustainability rule with a 5,000 EUR floor and no industry or region
/// restriction: the concrete full-score scenario.
pub(super) fn rule() -> SubsidyRule {
    SubsidyRule {
        id: "SUB-GREEN-1".to_string(),
        name: "Verduurzaming MKB".to_string(),
        description: "Subsidie voor verduurzaming van bedrijfspanden".to_string(),
        category: SubsidyCategory::Sustainability,
        provider: "RVO".to_string(),
        min_budget: Some(5_000.0),
        max_budget: None,
        eligible_company_sizes: vec![CompanySize::Small, CompanySize::Medium],
        eligible_industries: None,
        regions: None,
        requirements: vec!["Eigen bedrijfspand".to_string()],
        url: None,
    }
}

pub(super) fn request() -> MatchRequest {
    MatchRequest {
        company: company(),
        project: project(),
        additional_info: None,
    }
}
