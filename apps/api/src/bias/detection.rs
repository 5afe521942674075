//! Pure bias detection and mitigation over text. Everything here is
//! deterministic string work; the LLM classifier in `classifier.rs` only
//! ever adds findings on top of these.

use crate::bias::lexicon::{BIASED_REQUIREMENT_PHRASES, BIASED_TERMS, PROTECTED_ATTRIBUTE_TERMS};
use crate::bias::models::{BiasFinding, ChangeRecord};

/// Per-finding weights for the continuous job bias score.
const TERM_WEIGHT: f64 = 0.15;
const REQUIREMENT_WEIGHT: f64 = 0.20;
/// Debiasing runs once the score reports bias at all.
pub const MITIGATION_THRESHOLD: f64 = 0.3;

/// Context window (bytes each side) captured around a matched phrase.
const CONTEXT_WINDOW: usize = 40;

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Finds `term` in `text` case-insensitively at word boundaries, returning
/// the byte offset of the first occurrence.
fn find_term(text: &str, term: &str) -> Option<usize> {
    let haystack = text.to_ascii_lowercase();
    let needle = term.to_ascii_lowercase();
    let bytes = haystack.as_bytes();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let bounded_left = start == 0 || !is_word_byte(bytes[start - 1]);
        let bounded_right = end == bytes.len() || !is_word_byte(bytes[end]);
        if bounded_left && bounded_right {
            return Some(start);
        }
        from = start + 1;
    }
    None
}

/// True when `term` occurs in `text` as a whole word/phrase.
pub fn contains_term(text: &str, term: &str) -> bool {
    find_term(text, term).is_some()
}

/// Snippet surrounding a match, trimmed to char boundaries.
fn context_around(text: &str, start: usize, len: usize) -> String {
    let mut lo = start.saturating_sub(CONTEXT_WINDOW);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (start + len + CONTEXT_WINDOW).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    text[lo..hi].trim().to_string()
}

/// Scans for references to protected attribute classes.
pub fn detect_protected_attributes(text: &str) -> Vec<BiasFinding> {
    let mut findings = Vec::new();
    for (attribute, phrases) in PROTECTED_ATTRIBUTE_TERMS {
        for phrase in *phrases {
            if let Some(pos) = find_term(text, phrase) {
                findings.push(BiasFinding::ProtectedAttribute {
                    attribute: (*attribute).to_string(),
                    context: context_around(text, pos, phrase.len()),
                });
                // One finding per attribute class keeps summaries readable.
                break;
            }
        }
    }
    findings
}

/// Scans for loaded-language terms.
pub fn detect_biased_language(text: &str) -> Vec<BiasFinding> {
    let mut findings = Vec::new();
    for (term, _) in BIASED_TERMS {
        if let Some(pos) = find_term(text, term) {
            findings.push(BiasFinding::BiasedLanguage {
                term: (*term).to_string(),
                context: context_around(text, pos, term.len()),
            });
        }
    }
    findings
}

/// Scans job text for requirement phrasings that encode a protected
/// attribute. Returns the matched phrases.
pub fn detect_biased_requirements(text: &str) -> Vec<String> {
    BIASED_REQUIREMENT_PHRASES
        .iter()
        .filter(|(phrase, _)| contains_term(text, phrase))
        .map(|(phrase, _)| (*phrase).to_string())
        .collect()
}

/// Continuous bias score for a job description: fixed weight per flagged
/// term and per biased requirement, capped at 1.0. Length-independent so
/// identical text always scores the same.
pub fn job_bias_score(term_count: usize, requirement_count: usize) -> f64 {
    (TERM_WEIGHT * term_count as f64 + REQUIREMENT_WEIGHT * requirement_count as f64).min(1.0)
}

/// Human-readable level for a bias score.
pub fn bias_level(score: f64) -> &'static str {
    if score < 0.3 {
        "Low"
    } else if score < 0.6 {
        "Medium"
    } else {
        "High"
    }
}

/// Significant-bias cutoff shared by job audits and reporting.
pub fn has_bias(score: f64) -> bool {
    score >= 0.3
}

/// Case-insensitive whole-word replacement. Returns the rewritten text and
/// the number of substitutions.
fn replace_term(text: &str, term: &str, replacement: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut count = 0;
    while let Some(pos) = find_term(rest, term) {
        out.push_str(&rest[..pos]);
        out.push_str(replacement);
        rest = &rest[pos + term.len()..];
        count += 1;
    }
    out.push_str(rest);
    (out, count)
}

/// Rewrites flagged terms and requirement phrases to their neutral
/// replacements. Idempotent: replacements are never themselves in the
/// lexicon, so a second pass detects nothing and changes nothing.
pub fn debias_text(text: &str) -> (String, Vec<ChangeRecord>) {
    let mut current = text.to_string();
    let mut changes = Vec::new();
    // Requirement phrases first: they are longer and may contain terms.
    for (term, replacement) in BIASED_REQUIREMENT_PHRASES.iter().chain(BIASED_TERMS.iter()) {
        let (rewritten, count) = replace_term(&current, term, replacement);
        if count > 0 {
            changes.push(ChangeRecord {
                original: (*term).to_string(),
                replacement: (*replacement).to_string(),
                occurrences: count,
            });
            current = rewritten;
        }
    }
    (current, changes)
}

/// Recommendation strings for a job audit, one per problem class.
pub fn build_recommendations(
    term_findings: &[BiasFinding],
    biased_requirements: &[String],
    score: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if !term_findings.is_empty() {
        let terms: Vec<&str> = term_findings
            .iter()
            .filter_map(|f| match f {
                BiasFinding::BiasedLanguage { term, .. } => Some(term.as_str()),
                BiasFinding::ProtectedAttribute { .. } => None,
            })
            .collect();
        recommendations.push(format!(
            "Replace loaded language with neutral wording: {}.",
            terms.join(", ")
        ));
    }
    if !biased_requirements.is_empty() {
        recommendations.push(format!(
            "Reframe requirements that can exclude protected groups: {}.",
            biased_requirements.join(", ")
        ));
    }
    if has_bias(score) {
        recommendations.push(
            "Review the generated debiased version before publishing this posting.".to_string(),
        );
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_term_respects_word_boundaries() {
        // "male" must not match inside "female"
        assert!(!contains_term("all female applicants", "male"));
        assert!(contains_term("male applicants preferred", "male"));
        assert!(!contains_term("management skills", "male"));
    }

    #[test]
    fn test_find_term_is_case_insensitive() {
        assert!(contains_term("Looking for a Rockstar developer", "rockstar"));
    }

    #[test]
    fn test_detect_protected_attributes_groups_by_class() {
        let text = "We want young, energetic applicants; must be a native speaker.";
        let findings = detect_protected_attributes(text);
        let attrs: Vec<&str> = findings
            .iter()
            .map(|f| match f {
                BiasFinding::ProtectedAttribute { attribute, .. } => attribute.as_str(),
                BiasFinding::BiasedLanguage { .. } => panic!("unexpected finding type"),
            })
            .collect();
        assert!(attrs.contains(&"age"));
        assert!(attrs.contains(&"nationality"));
    }

    #[test]
    fn test_one_finding_per_attribute_class() {
        let text = "young, youthful, recent graduate";
        let findings = detect_protected_attributes(text);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_detect_biased_language_captures_context() {
        let findings = detect_biased_language("Seeking a coding ninja for our team");
        assert_eq!(findings.len(), 1);
        match &findings[0] {
            BiasFinding::BiasedLanguage { term, context } => {
                assert_eq!(term, "ninja");
                assert!(context.contains("ninja"));
            }
            BiasFinding::ProtectedAttribute { .. } => panic!("wrong finding type"),
        }
    }

    #[test]
    fn test_clean_text_yields_no_findings() {
        let text = "We are hiring a software engineer with Rust experience.";
        assert!(detect_protected_attributes(text).is_empty());
        assert!(detect_biased_language(text).is_empty());
        assert!(detect_biased_requirements(text).is_empty());
    }

    #[test]
    fn test_job_bias_score_two_terms_is_medium_boundary() {
        let score = job_bias_score(2, 0);
        assert!((score - 0.3).abs() < 1e-9);
        assert!(has_bias(score));
        assert_eq!(bias_level(score), "Medium");
    }

    #[test]
    fn test_job_bias_score_caps_at_one() {
        assert_eq!(job_bias_score(10, 10), 1.0);
    }

    #[test]
    fn test_bias_level_thresholds() {
        assert_eq!(bias_level(0.0), "Low");
        assert_eq!(bias_level(0.29), "Low");
        assert_eq!(bias_level(0.3), "Medium");
        assert_eq!(bias_level(0.59), "Medium");
        assert_eq!(bias_level(0.6), "High");
        assert_eq!(bias_level(1.0), "High");
    }

    #[test]
    fn test_has_bias_boundary() {
        assert!(!has_bias(0.29));
        assert!(has_bias(0.3));
    }

    #[test]
    fn test_debias_replaces_and_records_changes() {
        let text = "Rockstar wanted; must be a native english speaker.";
        let (rewritten, changes) = debias_text(text);
        assert!(rewritten.contains("skilled professional"));
        assert!(rewritten.contains("fluent in english"));
        assert!(!contains_term(&rewritten, "rockstar"));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_debias_counts_occurrences() {
        let (_, changes) = debias_text("ninja here, another ninja there");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].occurrences, 2);
    }

    #[test]
    fn test_debias_is_idempotent() {
        let text = "We need a rockstar ninja, young and energetic, a cultural fit.";
        let (first_pass, first_changes) = debias_text(text);
        assert!(!first_changes.is_empty());

        let (second_pass, second_changes) = debias_text(&first_pass);
        assert_eq!(second_pass, first_pass);
        assert!(second_changes.is_empty(), "second pass changed: {second_changes:?}");
        assert!(detect_biased_language(&first_pass).is_empty());
        assert!(detect_biased_requirements(&first_pass).is_empty());
    }

    #[test]
    fn test_recommendations_nonempty_when_biased() {
        let findings = detect_biased_language("hire a rockstar guru");
        let score = job_bias_score(findings.len(), 0);
        let recs = build_recommendations(&findings, &[], score);
        assert!(!recs.is_empty());
        assert!(recs[0].contains("rockstar"));
    }

    #[test]
    fn test_recommendations_empty_for_clean_text() {
        let recs = build_recommendations(&[], &[], 0.0);
        assert!(recs.is_empty());
    }
}
