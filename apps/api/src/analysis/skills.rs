//! Skill extraction and text normalization.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::vocabulary::{is_token_char, SkillSet, SkillVocabulary};

lazy_static! {
    static ref WORD_PATTERN: Regex = Regex::new(r"\w+").unwrap();
}

/// Lowercases `text` and replaces every character that cannot be part of a
/// skill token with a space. `c++` and `ci/cd` survive intact.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || is_token_char(c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Extracts the subset of `vocabulary` present in `text` as whole words.
pub fn extract_skills(vocabulary: &SkillVocabulary, text: &str) -> SkillSet {
    vocabulary.find_in_normalized(&normalize_text(text))
}

/// Distinct word tokens of the normalized text. Used for the overlap fallback
/// when a job description names no vocabulary skills.
pub fn word_set(text: &str) -> BTreeSet<String> {
    let normalized = normalize_text(text);
    WORD_PATTERN
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}
