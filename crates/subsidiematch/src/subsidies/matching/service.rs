use std::sync::Arc;

use chrono::Utc;

use super::domain::{MatchRequest, MatchResponse, MatchScore, SubsidyMatch, SubsidyRule};
use super::rules::{calculate_confidence, score_rule};

/// Scores a request against every loaded rule and ranks the results.
///
/// Constructed once at startup with the loaded rule list and shared by
/// handle; the rules are immutable for the life of the service, so
/// evaluation is lock-free and freely parallelizable. A corpus refresh is a
/// new service behind a new `Arc`, swapped by the caller.
pub struct MatchService {
    rules: Arc<Vec<SubsidyRule>>,
}

impl MatchService {
    pub fn new(rules: Vec<SubsidyRule>) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule against the request and rank by descending score.
    ///
    /// Confidence depends only on the request, so it is computed once and
    /// attached to every match.
    pub fn evaluate(&self, request: &MatchRequest) -> MatchResponse {
        let confidence = calculate_confidence(&request.company, &request.project);

        let mut matches: Vec<SubsidyMatch> = self
            .rules
            .iter()
            .map(|rule| {
                let scored = score_rule(&request.company, &request.project, rule);
                SubsidyMatch {
                    subsidy: rule.clone(),
                    match_score: MatchScore {
                        score: scored.score,
                        confidence,
                        reasons: scored.reasons,
                    },
                    eligible: scored.eligible,
                    missing_requirements: scored.missing_requirements,
                }
            })
            .collect();

        rank_matches(&mut matches);

        MatchResponse {
            total_matches: matches.len(),
            matches,
            analysis_timestamp: Utc::now(),
        }
    }
}

/// Order a batch of scored matches by descending score. The sort is stable,
/// so equal scores keep rule load order.
pub fn rank_matches(matches: &mut [SubsidyMatch]) {
    matches.sort_by(|a, b| b.match_score.score.total_cmp(&a.match_score.score));
}
