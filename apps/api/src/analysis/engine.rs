//! Match Engine: orchestrates segmentation, skill extraction, similarity and
//! feedback into a single `MatchReport`.
//!
//! Flow: segment both texts → pick skill-search text → extract skill sets →
//!       summary lines → feedback rules → match percentage → detailed report.
//!
//! The engine holds only read-only configuration (headers and vocabulary), so
//! one instance is shared across all requests behind an `Arc`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::feedback::{generate_feedback, Feedback, RuleContext};
use crate::analysis::sections::{
    experience_body, joined_bodies, section_body, SectionMap, SectionName, SectionSegmenter,
};
use crate::analysis::similarity::ratio;
use crate::analysis::skills::{extract_skills, word_set};
use crate::analysis::vocabulary::{mentions_soft_skills, SkillSet, SkillVocabulary};

lazy_static! {
    static ref YEARS_PATTERN: Regex = Regex::new(r"(\d{1,2})\+?\s+years").unwrap();
}

/// Project similarity above this is a good match.
const GOOD_PROJECT_MATCH: f64 = 0.35;
/// Project similarity above this (and not good) is a partial match.
const PARTIAL_PROJECT_MATCH: f64 = 0.1;

/// Project bodies are compared on at most this many leading characters.
pub const PROJECT_COMPARE_CHARS: usize = 4000;

const SUMMARY_SKILL_LIMIT: usize = 6;
const DETAIL_SKILL_LIMIT: usize = 8;
const EDUCATION_ECHO_CHARS: usize = 80;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Coarse banding of the match percentage for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Moderate,
    Weak,
}

impl MatchStrength {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            MatchStrength::Strong
        } else if percentage >= 50.0 {
            MatchStrength::Moderate
        } else {
            MatchStrength::Weak
        }
    }
}

/// Strengths / weaknesses / suggestions narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Full comparison result for one resume / job description pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_percentage: f64, // 0 to 100, two decimals
    pub match_strength: MatchStrength,
    pub summary: Vec<String>,
    pub feedback: Feedback,
    pub detailed_report: DetailedReport,
    pub resume_skills: SkillSet,
    pub jd_skills: SkillSet,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume_sections: SectionMap,
    pub jd_sections: SectionMap,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    segmenter: SectionSegmenter,
    vocabulary: SkillVocabulary,
}

impl MatchEngine {
    pub fn new(segmenter: SectionSegmenter, vocabulary: SkillVocabulary) -> Self {
        Self {
            segmenter,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn segment(&self, text: &str) -> SectionMap {
        self.segmenter.segment(text)
    }

    /// Compares `resume_text` against `jd_text`. Total over all inputs.
    pub fn analyze(&self, resume_text: &str, jd_text: &str) -> MatchReport {
        let resume_sections = self.segmenter.segment(resume_text);
        let jd_sections = self.segmenter.segment(jd_text);

        let resume_skills = extract_skills(
            &self.vocabulary,
            skill_search_text(&resume_sections, resume_text),
        );
        let jd_skills = extract_skills(&self.vocabulary, skill_search_text(&jd_sections, jd_text));

        debug!(
            resume_sections = resume_sections.len(),
            jd_sections = jd_sections.len(),
            resume_skills = resume_skills.len(),
            jd_skills = jd_skills.len(),
            "documents segmented"
        );

        let matched_skills: Vec<String> = jd_skills.intersection(&resume_skills).cloned().collect();
        let missing_skills: Vec<String> = jd_skills.difference(&resume_skills).cloned().collect();

        let summary = build_summary(
            &resume_sections,
            &jd_sections,
            &resume_skills,
            &jd_skills,
            &matched_skills,
            &missing_skills,
        );

        let feedback = generate_feedback(&RuleContext {
            resume_sections: &resume_sections,
            jd_sections: &jd_sections,
            resume_skills: &resume_skills,
            jd_skills: &jd_skills,
        });

        let match_percentage = if jd_skills.is_empty() {
            word_overlap_percentage(resume_text, jd_text)
        } else {
            round2(100.0 * matched_skills.len() as f64 / jd_skills.len() as f64)
        };

        let detailed_report =
            build_detailed_report(&resume_sections, &jd_skills, &matched_skills);

        info!(
            match_percentage,
            rating = feedback.rating,
            "analysis complete"
        );

        MatchReport {
            match_percentage,
            match_strength: MatchStrength::from_percentage(match_percentage),
            summary,
            feedback,
            detailed_report,
            resume_skills,
            jd_skills,
            matched_skills,
            missing_skills,
            resume_sections,
            jd_sections,
        }
    }
}

/// The "Skills" body when present, otherwise the whole document.
fn skill_search_text<'a>(sections: &'a SectionMap, full_text: &'a str) -> &'a str {
    section_body(sections, SectionName::Skills).unwrap_or(full_text)
}

/// 100 × |resume words ∩ jd words| / max(|jd words|, 1), two decimals.
fn word_overlap_percentage(resume_text: &str, jd_text: &str) -> f64 {
    let resume_words = word_set(resume_text);
    let jd_words = word_set(jd_text);
    let overlap = jd_words.intersection(&resume_words).count();
    round2(100.0 * overlap as f64 / jd_words.len().max(1) as f64)
}

/// Two decimals, exact halves to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Similarity of two project bodies, each cut to `PROJECT_COMPARE_CHARS`.
fn project_similarity(resume: &str, jd: &str) -> f64 {
    ratio(
        leading_chars(resume, PROJECT_COMPARE_CHARS),
        leading_chars(jd, PROJECT_COMPARE_CHARS),
    )
}

fn leading_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn first_n(items: impl IntoIterator<Item = impl AsRef<str>>, n: usize) -> String {
    items
        .into_iter()
        .take(n)
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Summary lines
// ────────────────────────────────────────────────────────────────────────────

fn build_summary(
    resume_sections: &SectionMap,
    jd_sections: &SectionMap,
    resume_skills: &SkillSet,
    jd_skills: &SkillSet,
    matched_skills: &[String],
    missing_skills: &[String],
) -> Vec<String> {
    let mut lines = vec![
        projects_line(resume_sections, jd_sections),
        education_line(resume_sections, jd_sections),
    ];
    lines.extend(skill_lines(resume_skills, jd_skills, matched_skills, missing_skills));
    lines.push(experience_line(resume_sections));
    lines.push(soft_skills_line(resume_sections));
    lines
}

fn projects_line(resume_sections: &SectionMap, jd_sections: &SectionMap) -> String {
    let resume_projects = section_body(resume_sections, SectionName::Projects);
    let jd_projects = section_body(jd_sections, SectionName::Projects);

    match (resume_projects, jd_projects) {
        (Some(resume), Some(jd)) => {
            let similarity = project_similarity(resume, jd);
            debug!(similarity, "project sections compared");
            if similarity > GOOD_PROJECT_MATCH {
                "Projects: Matches JD-relevant work (good match)".to_string()
            } else if similarity > PARTIAL_PROJECT_MATCH {
                "Projects: Partial match to JD projects".to_string()
            } else {
                "Projects: Present but not aligned to JD specifics".to_string()
            }
        }
        (Some(_), None) => "Projects: Listed (add more JD-relevant details)".to_string(),
        (None, _) => "Projects: Not listed".to_string(),
    }
}

fn education_line(resume_sections: &SectionMap, jd_sections: &SectionMap) -> String {
    let resume_edu = section_body(resume_sections, SectionName::Education);
    let jd_edu = section_body(jd_sections, SectionName::Education);

    match (resume_edu, jd_edu) {
        (Some(resume), Some(_)) => {
            let first_line: String = resume
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(EDUCATION_ECHO_CHARS)
                .collect();
            format!("Education: {first_line} (matches JD expectation)")
        }
        (Some(_), None) => "Education: Listed (confirm it meets JD requirement)".to_string(),
        (None, _) => "Education: Not listed".to_string(),
    }
}

fn skill_lines(
    resume_skills: &SkillSet,
    jd_skills: &SkillSet,
    matched_skills: &[String],
    missing_skills: &[String],
) -> Vec<String> {
    if !jd_skills.is_empty() {
        let mut lines = vec![format!(
            "Skills: Matched {}/{} JD skills",
            matched_skills.len(),
            jd_skills.len()
        )];
        if !missing_skills.is_empty() {
            lines.push(format!(
                "Skills - Missing: {}",
                first_n(missing_skills, SUMMARY_SKILL_LIMIT)
            ));
        }
        lines
    } else if !resume_skills.is_empty() {
        vec![format!(
            "Skills: Found {}",
            first_n(resume_skills, SUMMARY_SKILL_LIMIT)
        )]
    } else {
        vec!["Skills: Not listed".to_string()]
    }
}

fn experience_line(resume_sections: &SectionMap) -> String {
    match experience_body(resume_sections) {
        Some(body) => match YEARS_PATTERN.captures(&body.to_lowercase()) {
            Some(caps) => format!("Experience: {} years (mentioned)", &caps[1]),
            None => "Experience: Listed (years not explicitly mentioned)".to_string(),
        },
        None => "Experience: Not listed".to_string(),
    }
}

fn soft_skills_line(resume_sections: &SectionMap) -> String {
    if mentions_soft_skills(&joined_bodies(resume_sections)) {
        "Soft skills: Mentioned (communication / teamwork)".to_string()
    } else {
        "Soft skills: Not clearly highlighted".to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Detailed report
// ────────────────────────────────────────────────────────────────────────────

fn build_detailed_report(
    resume_sections: &SectionMap,
    jd_skills: &SkillSet,
    matched_skills: &[String],
) -> DetailedReport {
    let mut report = DetailedReport::default();
    let has_projects = section_body(resume_sections, SectionName::Projects).is_some();

    if !matched_skills.is_empty() {
        report.strengths.push(format!(
            "Has job-relevant technical skills: {}",
            first_n(matched_skills, DETAIL_SKILL_LIMIT)
        ));
    }
    if has_projects {
        report
            .strengths
            .push("Includes projects that demonstrate applied skills.".to_string());
    }

    if !jd_skills.is_empty() && matched_skills.is_empty() {
        report.weaknesses.push(format!(
            "Does not include key technical skills required by the JD: {}",
            first_n(jd_skills, DETAIL_SKILL_LIMIT)
        ));
    }
    if !has_projects {
        report
            .weaknesses
            .push("Missing project descriptions demonstrating impact and tools used.".to_string());
    }
    if experience_body(resume_sections).is_none() {
        report
            .weaknesses
            .push("Limited or no work experience described.".to_string());
    }

    if report.weaknesses.is_empty() {
        report.suggestions.push(
            "Good match; polish formatting and quantify achievements for stronger impact."
                .to_string(),
        );
    } else {
        report.suggestions.push(
            "Add/expand skills and include specific technologies from the job description."
                .to_string(),
        );
        report.suggestions.push(
            "Add measurable outcomes to projects/experience (e.g., reduced X by Y%).".to_string(),
        );
    }

    report
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
