use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{EiaCode, IsdeMeldcode, MiaVamilCode};
use crate::subsidies::matching::SubsidyRule;

/// One logical rule family, one snapshot file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    Eia,
    IsdeWarmtepompen,
    IsdeIsolatie,
    IsdeGlas,
    IsdeZonneboilers,
    MiaVamil,
}

impl RuleFamily {
    pub const ALL: [RuleFamily; 6] = [
        RuleFamily::Eia,
        RuleFamily::IsdeWarmtepompen,
        RuleFamily::IsdeIsolatie,
        RuleFamily::IsdeGlas,
        RuleFamily::IsdeZonneboilers,
        RuleFamily::MiaVamil,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            RuleFamily::Eia => "eia_2025.json",
            RuleFamily::IsdeWarmtepompen => "isde_warmtepompen.json",
            RuleFamily::IsdeIsolatie => "isde_isolatiematerialen.json",
            RuleFamily::IsdeGlas => "isde_hoogrendementsglas.json",
            RuleFamily::IsdeZonneboilers => "isde_zonneboilers.json",
            RuleFamily::MiaVamil => "mia_vamil_2025.json",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RuleFamily::Eia => "eia_codes",
            RuleFamily::IsdeWarmtepompen => "isde_warmtepompen",
            RuleFamily::IsdeIsolatie => "isde_isolatie",
            RuleFamily::IsdeGlas => "isde_glas",
            RuleFamily::IsdeZonneboilers => "isde_zonneboilers",
            RuleFamily::MiaVamil => "mia_vamil_codes",
        }
    }
}

/// Failure to load one family's snapshot file. Never aborts the whole load.
#[derive(Debug, thiserror::Error)]
pub enum CorpusFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Load outcome for one family, surfaced through the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyStatus {
    pub family: RuleFamily,
    pub loaded: bool,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-family load outcomes for the whole corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub families: Vec<FamilyStatus>,
}

impl LoadReport {
    pub fn family(&self, family: RuleFamily) -> Option<&FamilyStatus> {
        self.families.iter().find(|status| status.family == family)
    }

    pub fn records(&self, family: RuleFamily) -> usize {
        self.family(family).map_or(0, |status| status.records)
    }

    pub fn total_records(&self) -> usize {
        self.families.iter().map(|status| status.records).sum()
    }

    pub fn all_loaded(&self) -> bool {
        self.families.iter().all(|status| status.loaded)
    }

    fn push(&mut self, family: RuleFamily, outcome: &FamilyOutcome) {
        let (loaded, records, error) = match outcome {
            FamilyOutcome::Loaded(count) => (true, *count, None),
            FamilyOutcome::Absent => (false, 0, None),
            FamilyOutcome::Failed(message) => (false, 0, Some(message.clone())),
        };
        self.families.push(FamilyStatus {
            family,
            loaded,
            records,
            error,
        });
    }
}

enum FamilyOutcome {
    Loaded(usize),
    Absent,
    Failed(String),
}

/// Scheme metadata wrapper used by the EIA and MIA/Vamil snapshots.
#[derive(Debug, Deserialize)]
struct CodeSheet<T> {
    codes: Vec<T>,
    #[serde(default)]
    #[allow(dead_code)]
    version: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    total_budget: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    last_updated: Option<String>,
}

/// The raw record lists of every family that loaded, before indexing.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    pub eia_codes: Vec<EiaCode>,
    pub isde_warmtepompen: Vec<IsdeMeldcode>,
    pub isde_isolatie: Vec<IsdeMeldcode>,
    pub isde_glas: Vec<IsdeMeldcode>,
    pub isde_zonneboilers: Vec<IsdeMeldcode>,
    pub mia_vamil_codes: Vec<MiaVamilCode>,
}

impl CorpusSnapshot {
    /// ISDE sub-categories in load order, the order the indexes preserve.
    pub fn isde_union(&self) -> Vec<IsdeMeldcode> {
        let mut union = Vec::with_capacity(
            self.isde_warmtepompen.len()
                + self.isde_isolatie.len()
                + self.isde_glas.len()
                + self.isde_zonneboilers.len(),
        );
        union.extend(self.isde_warmtepompen.iter().cloned());
        union.extend(self.isde_isolatie.iter().cloned());
        union.extend(self.isde_glas.iter().cloned());
        union.extend(self.isde_zonneboilers.iter().cloned());
        union
    }
}

fn read_file<T: DeserializeOwned>(
    path: &Path,
    parse: fn(&str, &Path) -> Result<Vec<T>, CorpusFileError>,
) -> Result<Option<Vec<T>>, CorpusFileError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| CorpusFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&contents, path).map(Some)
}

fn parse_array<T: DeserializeOwned>(contents: &str, path: &Path) -> Result<Vec<T>, CorpusFileError> {
    serde_json::from_str(contents).map_err(|source| CorpusFileError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn parse_code_sheet<T: DeserializeOwned>(
    contents: &str,
    path: &Path,
) -> Result<Vec<T>, CorpusFileError> {
    serde_json::from_str::<CodeSheet<T>>(contents)
        .map(|sheet| sheet.codes)
        .map_err(|source| CorpusFileError::Parse {
            path: path.display().to_string(),
            source,
        })
}

fn load_family<T: DeserializeOwned>(
    dir: &Path,
    family: RuleFamily,
    parse: fn(&str, &Path) -> Result<Vec<T>, CorpusFileError>,
) -> (Vec<T>, FamilyOutcome) {
    let path = dir.join(family.file_name());
    match read_file(&path, parse) {
        Ok(Some(records)) => {
            let outcome = FamilyOutcome::Loaded(records.len());
            (records, outcome)
        }
        Ok(None) => (Vec::new(), FamilyOutcome::Absent),
        Err(err) => {
            warn!(family = family.label(), %err, "skipping rule family");
            (Vec::new(), FamilyOutcome::Failed(err.to_string()))
        }
    }
}

/// Load every recognized snapshot file under `dir`.
///
/// A missing or malformed file never prevents the other families from
/// loading; the report records what happened to each one.
pub fn load_corpus(dir: &Path) -> (CorpusSnapshot, LoadReport) {
    let mut report = LoadReport::default();

    let (eia_codes, outcome) = load_family(dir, RuleFamily::Eia, parse_code_sheet::<EiaCode>);
    report.push(RuleFamily::Eia, &outcome);

    let (isde_warmtepompen, outcome) = load_family(
        dir,
        RuleFamily::IsdeWarmtepompen,
        parse_array::<IsdeMeldcode>,
    );
    report.push(RuleFamily::IsdeWarmtepompen, &outcome);

    let (isde_isolatie, outcome) =
        load_family(dir, RuleFamily::IsdeIsolatie, parse_array::<IsdeMeldcode>);
    report.push(RuleFamily::IsdeIsolatie, &outcome);

    let (isde_glas, outcome) = load_family(dir, RuleFamily::IsdeGlas, parse_array::<IsdeMeldcode>);
    report.push(RuleFamily::IsdeGlas, &outcome);

    let (isde_zonneboilers, outcome) = load_family(
        dir,
        RuleFamily::IsdeZonneboilers,
        parse_array::<IsdeMeldcode>,
    );
    report.push(RuleFamily::IsdeZonneboilers, &outcome);

    let (mia_vamil_codes, outcome) =
        load_family(dir, RuleFamily::MiaVamil, parse_code_sheet::<MiaVamilCode>);
    report.push(RuleFamily::MiaVamil, &outcome);

    let mia_vamil_codes = drop_invalid_tiers(mia_vamil_codes);

    (
        CorpusSnapshot {
            eia_codes,
            isde_warmtepompen,
            isde_isolatie,
            isde_glas,
            isde_zonneboilers,
            mia_vamil_codes,
        },
        report,
    )
}

fn drop_invalid_tiers(codes: Vec<MiaVamilCode>) -> Vec<MiaVamilCode> {
    codes
        .into_iter()
        .filter(|code| {
            if code.has_valid_tier() {
                true
            } else {
                warn!(
                    code = %code.code,
                    tier = ?code.mia_percentage,
                    "dropping MIA record outside the closed percentage tiers"
                );
                false
            }
        })
        .collect()
}

/// Load the generic matcher rules: every `*.json` file under `dir`, each
/// holding either a bare array of rules or a single rule object. Files are
/// visited in name order so the resulting list is deterministic; a file that
/// fails to parse is logged and skipped.
pub fn load_rules(dir: &Path) -> Vec<SubsidyRule> {
    let mut rules = Vec::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), %err, "rules directory unavailable");
            return rules;
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable rule file");
                continue;
            }
        };
        match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(serde_json::Value::Array(items)) => {
                for item in items {
                    match serde_json::from_value::<SubsidyRule>(item) {
                        Ok(rule) => rules.push(rule),
                        Err(err) => {
                            warn!(path = %path.display(), %err, "skipping malformed rule record");
                        }
                    }
                }
            }
            Ok(value) => match serde_json::from_value::<SubsidyRule>(value) {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping malformed rule file");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unparsable rule file");
            }
        }
    }

    rules
}
