use super::common::{company, project, rule};
use crate::subsidies::matching::domain::{CompanySize, SubsidyCategory};
use crate::subsidies::matching::rules::{calculate_confidence, score_rule};

#[test]
fn full_match_scores_one_hundred() {
    let scored = score_rule(&company(), &project(), &rule());

    // 20 size + 30 category + 20 budget + 15 industry + 15 region.
    assert_eq!(scored.score, 100.0);
    assert!(scored.eligible);
    assert_eq!(scored.reasons.len(), 5);
    assert!(scored.missing_requirements.is_empty());
}

#[test]
fn budget_below_minimum_hard_fails() {
    let mut project = project();
    project.budget = 2_000.0;

    let scored = score_rule(&company(), &project, &rule());

    assert!(!scored.eligible);
    assert_eq!(scored.score, 80.0);
    assert!(scored
        .missing_requirements
        .iter()
        .any(|requirement| requirement.contains("5,000")));
}

#[test]
fn budget_above_maximum_hard_fails() {
    let mut rule = rule();
    rule.max_budget = Some(10_000.0);

    let scored = score_rule(&company(), &project(), &rule);

    assert!(!scored.eligible);
    assert!(scored
        .missing_requirements
        .iter()
        .any(|requirement| requirement.contains("must not exceed")));
}

#[test]
fn zero_max_budget_is_not_a_ceiling() {
    let mut rule = rule();
    rule.max_budget = Some(0.0);

    let scored = score_rule(&company(), &project(), &rule);

    assert!(scored.eligible);
    assert_eq!(scored.score, 100.0);
}

#[test]
fn ineligible_company_size_hard_fails() {
    let mut company = company();
    company.size = CompanySize::Large;

    let scored = score_rule(&company, &project(), &rule());

    assert!(!scored.eligible);
    assert!(!scored.missing_requirements.is_empty());
    assert!(scored.missing_requirements[0].contains("small, medium"));
    // The 20 size points are excluded.
    assert_eq!(scored.score, 80.0);
}

#[test]
fn category_mismatch_degrades_without_failing() {
    let mut project = project();
    project.category = SubsidyCategory::Innovation;

    let scored = score_rule(&company(), &project, &rule());

    assert!(scored.eligible);
    // 30 category points drop to the partial 10.
    assert_eq!(scored.score, 80.0);
    assert!(scored
        .reasons
        .iter()
        .any(|reason| reason.contains("doesn't perfectly match")));
}

#[test]
fn restricted_industry_not_listed_degrades_to_five() {
    let mut rule = rule();
    rule.eligible_industries = Some(vec!["agriculture".to_string()]);

    let scored = score_rule(&company(), &project(), &rule);

    assert!(scored.eligible);
    assert_eq!(scored.score, 90.0);
}

#[test]
fn region_match_is_case_insensitive_substring() {
    let mut rule = rule();
    rule.regions = Some(vec!["utrecht".to_string()]);
    let mut company = company();
    company.location = "Utrecht Science Park".to_string();

    let scored = score_rule(&company, &project(), &rule);

    assert!(scored.eligible);
    assert_eq!(scored.score, 100.0);
}

#[test]
fn region_restriction_hard_fails_outside_regions() {
    let mut rule = rule();
    rule.regions = Some(vec!["Groningen".to_string(), "Friesland".to_string()]);

    let scored = score_rule(&company(), &project(), &rule);

    assert!(!scored.eligible);
    assert_eq!(scored.score, 85.0);
    assert!(scored
        .missing_requirements
        .iter()
        .any(|requirement| requirement.contains("Groningen, Friesland")));
}

#[test]
fn score_stays_within_bounds() {
    let scored = score_rule(&company(), &project(), &rule());
    assert!((0.0..=100.0).contains(&scored.score));

    let mut company = company();
    company.size = CompanySize::Large;
    let mut project = project();
    project.budget = 0.0;
    project.category = SubsidyCategory::Other;
    let scored = score_rule(&company, &project, &rule());
    assert!((0.0..=100.0).contains(&scored.score));
}

#[test]
fn confidence_measures_completeness_not_quality() {
    let confidence = calculate_confidence(&company(), &project());
    assert_eq!(confidence, 1.0);

    let mut sparse = company();
    sparse.kvk_number = None;
    let confidence = calculate_confidence(&sparse, &project());
    assert_eq!(confidence, 0.9);
}

#[test]
fn confidence_strictly_increases_when_field_filled() {
    let mut company = company();
    company.kvk_number = None;
    let before = calculate_confidence(&company, &project());

    company.kvk_number = Some("87654321".to_string());
    let after = calculate_confidence(&company, &project());

    assert!(after > before);
}

#[test]
fn confidence_stays_within_unit_interval() {
    let mut company = company();
    company.name = String::new();
    company.kvk_number = None;
    company.industry = String::new();
    company.location = String::new();
    let mut project = project();
    project.title = String::new();
    project.description = String::new();
    project.budget = 0.0;
    project.duration_months = 0;

    let confidence = calculate_confidence(&company, &project);
    assert!((0.0..=1.0).contains(&confidence));
    // Size and category are always present on a parsed profile.
    assert_eq!(confidence, 0.2);
}

#[test]
fn evaluation_is_deterministic() {
    let first = score_rule(&company(), &project(), &rule());
    let second = score_rule(&company(), &project(), &rule());

    assert_eq!(first.score, second.score);
    assert_eq!(first.eligible, second.eligible);
    assert_eq!(first.reasons, second.reasons);
    assert_eq!(first.missing_requirements, second.missing_requirements);
}
