use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Canonical form of one skill tag: NFKC fold, lowercase, single-spaced.
pub fn normalize_skill_tag(tag: &str) -> String {
    tag.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a tag list, dropping empties and duplicates while keeping the
/// insertion order of the first occurrence.
pub fn normalize_skill_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for tag in tags {
        let canonical = normalize_skill_tag(tag);
        if canonical.is_empty() {
            continue;
        }
        if seen.insert(canonical.clone()) {
            normalized.push(canonical);
        }
    }

    normalized
}
