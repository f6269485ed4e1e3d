//! Skill Vocabulary: the fixed list of canonical skill tokens, compiled once
//! into a single Aho-Corasick automaton.
//!
//! The vocabulary is read-only configuration. It is injected into the engine
//! as constructor data so tests can run against small custom lists.

use std::collections::BTreeSet;

use aho_corasick::AhoCorasick;
use thiserror::Error;

/// Canonical lowercase skill tokens recognized by default.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "react",
    "angular",
    "node",
    "express",
    "django",
    "flask",
    "sql",
    "postgres",
    "mysql",
    "mongodb",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "rest",
    "api",
    "nlp",
    "tensorflow",
    "pytorch",
    "git",
    "ci/cd",
    "linux",
    "bash",
    "html",
    "css",
    "keras",
    "spark",
    "hadoop",
];

/// Substrings that count as evidence of soft skills in a resume.
/// `collaborat` deliberately covers collaborate / collaboration / collaborative.
pub const SOFT_SKILL_MARKERS: &[&str] = &["communication", "team", "leadership", "collaborat"];

/// A set of canonical skill tokens. Sorted so reports are deterministic.
pub type SkillSet = BTreeSet<String>;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Skill vocabulary is empty")]
    Empty,

    #[error("Skill token '{0}' contains characters removed by text normalization")]
    UnmatchableToken(String),

    #[error("Failed to build skill matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

/// Immutable skill vocabulary with a precompiled combined matcher.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    tokens: Vec<String>,
    matcher: AhoCorasick,
}

impl SkillVocabulary {
    /// Builds a vocabulary from raw tokens. Tokens are lowercased and deduplicated.
    ///
    /// Every token must survive `normalize_text` unchanged, otherwise it could
    /// never be found in normalized input.
    pub fn new<I, S>(tokens: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if unique.is_empty() {
            return Err(VocabularyError::Empty);
        }

        if let Some(bad) = unique
            .iter()
            .find(|t| t.chars().any(|c| c.is_whitespace() || !is_token_char(c)))
        {
            return Err(VocabularyError::UnmatchableToken(bad.clone()));
        }

        let tokens: Vec<String> = unique.into_iter().collect();
        let matcher = AhoCorasick::new(&tokens)?;

        Ok(Self { tokens, matcher })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.binary_search_by(|t| t.as_str().cmp(token)).is_ok()
    }

    /// Returns every vocabulary token that occurs as a whole word in `normalized`.
    ///
    /// `normalized` must already be the output of `normalize_text`. A token is a
    /// whole word when neither neighbour of the occurrence is a word character.
    pub fn find_in_normalized(&self, normalized: &str) -> SkillSet {
        let mut found = SkillSet::new();

        for m in self.matcher.find_overlapping_iter(normalized) {
            let before = normalized[..m.start()].chars().next_back();
            let after = normalized[m.end()..].chars().next();

            if before.map_or(true, |c| !is_word_char(c)) && after.map_or(true, |c| !is_word_char(c))
            {
                found.insert(self.tokens[m.pattern().as_usize()].clone());
            }
        }

        found
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied()).expect("built-in skill vocabulary must compile")
    }
}

/// Characters kept by `normalize_text` besides whitespace.
pub(crate) fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | '+' | '-')
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if any soft-skill marker occurs in `text` (case-insensitive).
pub fn mentions_soft_skills(text: &str) -> bool {
    let lower = text.to_lowercase();
    SOFT_SKILL_MARKERS.iter().any(|m| lower.contains(m))
}
