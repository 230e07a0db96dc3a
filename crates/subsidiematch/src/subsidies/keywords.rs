use std::collections::BTreeSet;

/// Dutch function words excluded from the keyword index.
const STOPWORDS: &[&str] = &[
    "de", "het", "een", "en", "van", "voor", "met", "aan", "op", "in", "te", "door", "bij", "uit",
    "tot", "of", "als", "naar", "om", "bestemd", "zijn", "wordt", "worden", "heeft", "hebben",
];

/// Normalize free text into the set of significant tokens.
///
/// Lowercases, treats every non-alphanumeric character as a separator, and
/// drops tokens of two characters or fewer plus the stopword list. The same
/// function is applied to rule text at index time and to query text, which is
/// what keeps keyword matching symmetric.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 2 && !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}
