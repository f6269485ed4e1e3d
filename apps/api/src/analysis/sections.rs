//! Section Segmenter: splits raw document text into named sections using a
//! fixed list of header labels.
//!
//! Segmentation is a two-state machine (no section / in section) driven line by
//! line. Lines before the first recognized header are dropped. A repeated
//! header replaces the earlier body for that section.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::vocabulary::is_word_char;

/// Canonical section names. Serialized as the title-cased header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionName {
    Summary,
    Objective,
    Skills,
    Projects,
    Experience,
    #[serde(rename = "Work Experience")]
    WorkExperience,
    #[serde(rename = "Professional Experience")]
    ProfessionalExperience,
    Education,
    Certification,
    Awards,
}

impl SectionName {
    /// All recognized headers, in detection order.
    pub const ALL: [SectionName; 10] = [
        SectionName::Summary,
        SectionName::Objective,
        SectionName::Skills,
        SectionName::Projects,
        SectionName::Experience,
        SectionName::WorkExperience,
        SectionName::ProfessionalExperience,
        SectionName::Education,
        SectionName::Certification,
        SectionName::Awards,
    ];

    /// Headers whose body counts as work experience.
    pub const EXPERIENCE: [SectionName; 3] = [
        SectionName::Experience,
        SectionName::WorkExperience,
        SectionName::ProfessionalExperience,
    ];

    /// Lowercase label a header line must start with.
    pub fn label(self) -> &'static str {
        match self {
            SectionName::Summary => "summary",
            SectionName::Objective => "objective",
            SectionName::Skills => "skills",
            SectionName::Projects => "projects",
            SectionName::Experience => "experience",
            SectionName::WorkExperience => "work experience",
            SectionName::ProfessionalExperience => "professional experience",
            SectionName::Education => "education",
            SectionName::Certification => "certification",
            SectionName::Awards => "awards",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionName::Summary => "Summary",
            SectionName::Objective => "Objective",
            SectionName::Skills => "Skills",
            SectionName::Projects => "Projects",
            SectionName::Experience => "Experience",
            SectionName::WorkExperience => "Work Experience",
            SectionName::ProfessionalExperience => "Professional Experience",
            SectionName::Education => "Education",
            SectionName::Certification => "Certification",
            SectionName::Awards => "Awards",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Section name → trimmed section body. A body may be empty when a header was
/// followed only by blank lines.
pub type SectionMap = BTreeMap<SectionName, String>;

/// Returns the body of `name` if present and non-empty.
pub fn section_body(sections: &SectionMap, name: SectionName) -> Option<&str> {
    sections
        .get(&name)
        .map(String::as_str)
        .filter(|body| !body.is_empty())
}

/// First non-empty body among the experience headers.
pub fn experience_body(sections: &SectionMap) -> Option<&str> {
    SectionName::EXPERIENCE
        .iter()
        .find_map(|name| section_body(sections, *name))
}

/// All section bodies joined by a single space.
pub fn joined_bodies(sections: &SectionMap) -> String {
    sections.values().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Header-driven segmenter. The header list is constructor data.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    headers: Vec<SectionName>,
}

impl SectionSegmenter {
    pub fn new(headers: Vec<SectionName>) -> Self {
        Self { headers }
    }

    pub fn segment(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::new();
        let mut current: Option<SectionName> = None;
        let mut buffer: Vec<&str> = Vec::new();

        for line in text.lines() {
            match self.detect_header(line) {
                Some(header) => {
                    flush(&mut sections, current, &buffer);
                    current = Some(header);
                    buffer.clear();
                }
                None if current.is_some() => buffer.push(line),
                None => {}
            }
        }
        flush(&mut sections, current, &buffer);

        sections
    }

    /// A header line starts (after trim + lowercase) with a label followed by a
    /// word boundary. Trailing text on the header line is not part of the body.
    fn detect_header(&self, line: &str) -> Option<SectionName> {
        let normalized = line.trim().to_lowercase();
        self.headers.iter().copied().find(|header| {
            normalized
                .strip_prefix(header.label())
                .map_or(false, |rest| rest.chars().next().map_or(true, |c| !is_word_char(c)))
        })
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new(SectionName::ALL.to_vec())
    }
}

fn flush(sections: &mut SectionMap, current: Option<SectionName>, buffer: &[&str]) {
    if let Some(name) = current {
        if !buffer.is_empty() {
            sections.insert(name, buffer.join("\n").trim().to_string());
        }
    }
}
