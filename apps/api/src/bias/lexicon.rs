//! Fixed vocabulary for lexicon-based bias detection.
//!
//! Three lists, all ASCII and matched case-insensitively at word boundaries:
//! protected-attribute phrases grouped by attribute class, loaded-language
//! terms with neutral replacements, and requirement phrases with neutral
//! replacements. Replacements must never themselves appear in any list —
//! that property is what makes debiasing idempotent, and the tests in
//! `detection.rs` pin it.

/// Phrases that reference a protected attribute class.
pub const PROTECTED_ATTRIBUTE_TERMS: &[(&str, &[&str])] = &[
    (
        "age",
        &[
            "young",
            "youthful",
            "recent graduate",
            "digital native",
            "years old",
            "over 40",
            "under 30",
        ],
    ),
    (
        "gender",
        &["male", "female", "he/him", "she/her", "pregnant", "maternity"],
    ),
    ("race", &["race", "ethnic", "ethnicity", "skin color"]),
    (
        "religion",
        &["religion", "religious", "church", "christian", "muslim", "jewish"],
    ),
    (
        "disability",
        &["disability", "disabled", "able-bodied", "physically fit"],
    ),
    (
        "family_status",
        &["married", "unmarried", "single mother", "single father", "childcare"],
    ),
    (
        "nationality",
        &["nationality", "citizen", "native speaker", "visa status"],
    ),
];

/// Loaded or exclusionary terms and their neutral replacements.
pub const BIASED_TERMS: &[(&str, &str)] = &[
    ("rockstar", "skilled professional"),
    ("ninja", "expert"),
    ("guru", "specialist"),
    ("wizard", "specialist"),
    ("salesman", "salesperson"),
    ("chairman", "chairperson"),
    ("manpower", "workforce"),
    ("man-hours", "work hours"),
    ("aggressive", "ambitious"),
    ("dominant", "leading"),
    ("fearless", "confident"),
    ("work hard play hard", "results-oriented"),
];

/// Requirement phrasings that encode a protected attribute, with neutral
/// replacements. Longer phrases listed first so they win over substrings.
pub const BIASED_REQUIREMENT_PHRASES: &[(&str, &str)] = &[
    ("native english speaker", "fluent in english"),
    ("young and energetic", "motivated"),
    ("recent graduate", "early-career professional"),
    ("digital native", "comfortable with modern tooling"),
    ("cultural fit", "team fit"),
    ("able-bodied", "capable of performing the role"),
    ("physically fit", "able to meet the role's demands"),
    ("no visa sponsorship", "authorized to work"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_terms() -> Vec<&'static str> {
        let mut terms: Vec<&str> = BIASED_TERMS.iter().map(|(t, _)| *t).collect();
        terms.extend(BIASED_REQUIREMENT_PHRASES.iter().map(|(t, _)| *t));
        terms.extend(
            PROTECTED_ATTRIBUTE_TERMS
                .iter()
                .flat_map(|(_, phrases)| phrases.iter().copied()),
        );
        terms
    }

    #[test]
    fn test_replacements_are_not_themselves_flagged() {
        // Debiasing is only idempotent if no replacement reintroduces a
        // listed term.
        let terms = all_terms();
        let replacements = BIASED_TERMS
            .iter()
            .chain(BIASED_REQUIREMENT_PHRASES.iter())
            .map(|(_, r)| *r);
        for replacement in replacements {
            for term in &terms {
                assert!(
                    !crate::bias::detection::contains_term(replacement, term),
                    "replacement '{replacement}' contains flagged term '{term}'"
                );
            }
        }
    }

    #[test]
    fn test_lexicon_is_lowercase() {
        for term in all_terms() {
            assert_eq!(term, term.to_ascii_lowercase(), "'{term}' must be lowercase");
        }
    }
}
