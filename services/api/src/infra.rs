use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use subsidiematch::subsidies::SubsidyStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<SubsidyStore>,
}

/// Split a comma-separated query value into non-empty keywords.
pub(crate) fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_keywords() {
        assert_eq!(
            split_keywords("warmtepomp, lucht ,,water"),
            vec!["warmtepomp", "lucht", "water"]
        );
        assert!(split_keywords("").is_empty());
        assert!(split_keywords(" , ").is_empty());
    }
}
