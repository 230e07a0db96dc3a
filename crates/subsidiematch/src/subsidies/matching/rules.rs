use super::domain::{CompanyProfile, CompanySize, ProjectProfile, SubsidyRule};

const MAX_SCORE: f64 = 100.0;

pub(crate) struct ScoredRule {
    pub score: f64,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub missing_requirements: Vec<String>,
}

/// Apply the fixed 100-point rubric to one (company, project, rule) triple.
///
/// Criteria 1 (size), 3 (budget), and 5 (region) are hard constraints: a
/// violation flips `eligible` and records a missing requirement. Criteria 2
/// (category) and 4 (industry) only degrade the score.
pub(crate) fn score_rule(
    company: &CompanyProfile,
    project: &ProjectProfile,
    rule: &SubsidyRule,
) -> ScoredRule {
    let mut score: f64 = 0.0;
    let mut eligible = true;
    let mut reasons = Vec::new();
    let mut missing_requirements = Vec::new();

    // Company size (20 points, hard).
    if rule.eligible_company_sizes.contains(&company.size) {
        score += 20.0;
        reasons.push(format!(
            "Company size ({}) is eligible",
            company.size.label()
        ));
    } else {
        eligible = false;
        missing_requirements.push(format!(
            "Company size must be one of: {}",
            join_sizes(&rule.eligible_company_sizes)
        ));
    }

    // Project category (30 points, soft: 10 on mismatch).
    if project.category == rule.category {
        score += 30.0;
        reasons.push(format!(
            "Project category matches ({})",
            rule.category.label()
        ));
    } else {
        score += 10.0;
        reasons.push("Project category doesn't perfectly match".to_string());
    }

    // Budget bounds (20 points, hard; each bound optional).
    if rule
        .min_budget
        .is_some_and(|minimum| project.budget < minimum)
    {
        eligible = false;
        missing_requirements.push(format!(
            "Project budget must be at least {}",
            format_eur(rule.min_budget.unwrap_or_default())
        ));
    } else if rule
        .max_budget
        // A zero ceiling in the published rule files means no ceiling.
        .is_some_and(|maximum| maximum > 0.0 && project.budget > maximum)
    {
        eligible = false;
        missing_requirements.push(format!(
            "Project budget must not exceed {}",
            format_eur(rule.max_budget.unwrap_or_default())
        ));
    } else {
        score += 20.0;
        reasons.push("Project budget meets requirements".to_string());
    }

    // Industry (15 points, soft: 5 when restricted but not listed).
    match &rule.eligible_industries {
        Some(industries) => {
            if industries.contains(&company.industry) {
                score += 15.0;
                reasons.push("Company industry is eligible".to_string());
            } else {
                score += 5.0;
                reasons.push("Company industry may not be primary target".to_string());
            }
        }
        None => {
            score += 15.0;
            reasons.push("No industry restrictions".to_string());
        }
    }

    // Region (15 points, hard when restricted).
    match &rule.regions {
        Some(regions) => {
            let location = company.location.to_lowercase();
            if regions
                .iter()
                .any(|region| location.contains(&region.to_lowercase()))
            {
                score += 15.0;
                reasons.push("Company location is eligible".to_string());
            } else {
                eligible = false;
                missing_requirements.push(format!(
                    "Company must be located in: {}",
                    regions.join(", ")
                ));
            }
        }
        None => {
            score += 15.0;
            reasons.push("No regional restrictions".to_string());
        }
    }

    ScoredRule {
        score: score.min(MAX_SCORE),
        eligible,
        reasons,
        missing_requirements,
    }
}

/// Fraction of filled fields over a fixed set of five company and five
/// project fields. Measures input completeness, not match quality.
pub(crate) fn calculate_confidence(company: &CompanyProfile, project: &ProjectProfile) -> f64 {
    let filled = [
        !company.name.is_empty(),
        company.kvk_number.as_ref().is_some_and(|kvk| !kvk.is_empty()),
        true, // size is always present on a parsed profile
        !company.industry.is_empty(),
        !company.location.is_empty(),
        !project.title.is_empty(),
        !project.description.is_empty(),
        true, // category likewise
        project.budget > 0.0,
        project.duration_months > 0,
    ];

    let count = filled.iter().filter(|&&field| field).count();
    count as f64 / filled.len() as f64
}

fn join_sizes(sizes: &[CompanySize]) -> String {
    sizes
        .iter()
        .map(|size| size.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// EUR amount with thousands separators, e.g. `€5,000.00`.
fn format_eur(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let frac = (cents % 100).abs();
    let whole = (cents / 100).abs();

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if cents < 0 { "-" } else { "" };
    format!("€{sign}{grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eur_formatting_groups_thousands() {
        assert_eq!(format_eur(5000.0), "€5,000.00");
        assert_eq!(format_eur(1_234_567.89), "€1,234,567.89");
        assert_eq!(format_eur(999.5), "€999.50");
        assert_eq!(format_eur(0.0), "€0.00");
    }
}
