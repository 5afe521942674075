// Prompt constants for LLM-backed bias classification. Extraction prompt
// templates live in the registry (versioned, bias-evaluated rows); only the
// classifier's fixed prompts are code constants.

/// System prompt for bias classification — enforces JSON-only output.
pub const CLASSIFY_SYSTEM: &str =
    "You are a hiring-compliance analyst reviewing text for demographic and \
    linguistic bias. You MUST respond with valid JSON only — a JSON array of \
    finding objects. Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Classification prompt template. Replace `{text}` before sending.
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Review the following text for bias.

Return a JSON array where each element has this EXACT schema:
{
  "type": "protected_attribute" | "biased_language",
  "attribute": "age" (only for protected_attribute findings),
  "term": "young" (only for biased_language findings),
  "context": "the sentence fragment where the issue appears"
}

PROTECTED ATTRIBUTES: age, gender, race, ethnicity, religion, disability,
marital or family status, nationality. Flag any reference that could reveal
or select on one of these.

BIASED LANGUAGE: gendered job titles ("salesman"), culture-coded terms
("rockstar", "ninja"), and exclusionary phrasing ("young and energetic").

Return [] when the text is clean.

TEXT:
{text}"#;
