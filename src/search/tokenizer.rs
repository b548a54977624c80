/// One-way rewrites applied to query strings before matching. Pairs listed in both directions
/// make the rewrite symmetric.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("o2", "oxygen"),
    ("oxygen", "o2"),
    ("er", "emergency"),
    ("emergency", "er"),
    ("casualty", "emergency"),
    ("heart", "cardio"),
    ("kidney", "nephro"),
    ("lungs", "pulmo"),
    ("cancer", "onco"),
    ("xray", "x-ray"),
    ("scan", "diagnostics"),
];

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whitespace tokens of at least two characters, stripped of surrounding punctuation.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|word| word.chars().count() >= 2)
        .collect()
}

/// Builds the set of strings a field is matched against.
///
/// Starts from the normalized query and its tokens; every synonym key found inside one of
/// those base strings adds the base string with the key replaced. Empty for a blank query.
pub fn effective_queries(raw: &str) -> Vec<String> {
    let query = normalize(raw);
    if query.is_empty() {
        return Vec::new();
    }

    let mut base = vec![query.clone()];
    for token in tokenize_query(&query) {
        if !base.contains(&token) {
            base.push(token);
        }
    }

    let mut effective = base.clone();
    for text in &base {
        for (key, replacement) in SYNONYMS {
            if text.contains(key) {
                let variant = text.replace(key, replacement);
                if !effective.contains(&variant) {
                    effective.push(variant);
                }
            }
        }
    }
    effective
}
