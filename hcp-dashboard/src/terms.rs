//! Query-term derivation: keyword tokens, condition matching against the
//! fixed vocabulary, and the type-ahead suggestion list.

/// Condition terms matched against free-text queries.
pub const CONDITION_TERMS: [&str; 11] = [
    "diabetes",
    "hypertension",
    "heart failure",
    "cancer",
    "stroke",
    "depression",
    "anxiety",
    "asthma",
    "copd",
    "arthritis",
    "obesity",
];

/// Phrases offered as suggestions at the search prompt.
pub const SEARCH_SUGGESTIONS: [&str; 24] = [
    "heart failure treatment",
    "diabetes management",
    "hypertension guidelines",
    "cancer screening protocols",
    "pediatric vaccines",
    "mental health assessment",
    "stroke prevention",
    "chronic pain management",
    "infectious disease control",
    "cardiovascular risk factors",
    "oncology treatment options",
    "neurological disorders",
    "respiratory conditions",
    "gastrointestinal diseases",
    "endocrine disorders",
    "autoimmune diseases",
    "genetic disorders",
    "emergency medicine protocols",
    "surgical procedures",
    "pharmacological treatments",
    "diagnostic imaging",
    "laboratory tests",
    "patient monitoring",
    "quality of life measures",
];

/// Keyword tokens: whitespace-split words longer than two characters.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|word| word.len() > 2)
        .map(|word| word.to_string())
        .collect()
}

/// Case-insensitive substring match of the query against the condition
/// vocabulary.
pub fn match_conditions(query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    CONDITION_TERMS
        .iter()
        .filter(|term| query.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

/// Up to five suggestions once at least two characters are typed.
pub fn suggest(input: &str) -> Vec<String> {
    if input.len() < 2 {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    SEARCH_SUGGESTIONS
        .iter()
        .filter(|phrase| phrase.to_lowercase().contains(&needle))
        .take(5)
        .map(|phrase| phrase.to_string())
        .collect()
}
