//! Feedback Generator: an ordered rule table that narrates gaps between a
//! resume and a job description and derives a bounded rating from 1 to 5.
//!
//! Each rule inspects the same `RuleContext` and may produce one `Finding`
//! (a bullet plus a rating penalty). Rules run in table order; bullet order in
//! the output follows that order.

use serde::{Deserialize, Serialize};

use crate::analysis::sections::{experience_body, joined_bodies, section_body, SectionMap, SectionName};
use crate::analysis::vocabulary::{mentions_soft_skills, SkillSet};

pub const MAX_RATING: u8 = 5;
pub const MIN_RATING: u8 = 1;

/// Upper bound on the penalty from missing skills, however many are missing.
const MAX_SKILL_PENALTY: usize = 2;

const POSITIVE_FIT: &str = "Good fit for the job requirements";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub resume_sections: &'a SectionMap,
    pub jd_sections: &'a SectionMap,
    pub resume_skills: &'a SkillSet,
    pub jd_skills: &'a SkillSet,
}

/// A triggered rule: the bullet to show and how much it costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub message: String,
    pub penalty: u8,
}

/// One row of the rule table.
pub struct FeedbackRule {
    pub name: &'static str,
    pub check: fn(&RuleContext<'_>) -> Option<Finding>,
}

/// Rating plus ordered feedback bullets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: u8,
    pub bullets: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

pub const FEEDBACK_RULES: &[FeedbackRule] = &[
    FeedbackRule {
        name: "missing_skills",
        check: missing_skills,
    },
    FeedbackRule {
        name: "projects_gap",
        check: projects_gap,
    },
    FeedbackRule {
        name: "education_gap",
        check: education_gap,
    },
    FeedbackRule {
        name: "experience_gap",
        check: experience_gap,
    },
    FeedbackRule {
        name: "soft_skills_advisory",
        check: soft_skills_advisory,
    },
];

fn missing_skills(ctx: &RuleContext<'_>) -> Option<Finding> {
    let missing: Vec<&str> = ctx
        .jd_skills
        .difference(ctx.resume_skills)
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(Finding {
        message: format!("Add missing skills: {}", missing.join(", ")),
        penalty: missing.len().min(MAX_SKILL_PENALTY) as u8,
    })
}

fn projects_gap(ctx: &RuleContext<'_>) -> Option<Finding> {
    section_gap(ctx, SectionName::Projects).then(|| Finding {
        message: "Add projects relevant to the job description".to_string(),
        penalty: 1,
    })
}

fn education_gap(ctx: &RuleContext<'_>) -> Option<Finding> {
    section_gap(ctx, SectionName::Education).then(|| Finding {
        message: "Educational background does not match JD or is missing".to_string(),
        penalty: 1,
    })
}

fn experience_gap(ctx: &RuleContext<'_>) -> Option<Finding> {
    let jd_wants_experience = section_body(ctx.jd_sections, SectionName::Experience).is_some()
        || joined_bodies(ctx.jd_sections)
            .to_lowercase()
            .contains("experience");
    let resume_has_experience = experience_body(ctx.resume_sections).is_some();

    (jd_wants_experience && !resume_has_experience).then(|| Finding {
        message: "Work experience not aligned with job requirements".to_string(),
        penalty: 1,
    })
}

fn soft_skills_advisory(ctx: &RuleContext<'_>) -> Option<Finding> {
    (!mentions_soft_skills(&joined_bodies(ctx.resume_sections))).then(|| Finding {
        message: "Consider highlighting soft skills (communication, teamwork, leadership) with brief examples"
            .to_string(),
        penalty: 0,
    })
}

/// The JD has content for `name` and the resume does not.
fn section_gap(ctx: &RuleContext<'_>, name: SectionName) -> bool {
    section_body(ctx.jd_sections, name).is_some()
        && section_body(ctx.resume_sections, name).is_none()
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Runs the default rule table.
pub fn generate_feedback(ctx: &RuleContext<'_>) -> Feedback {
    evaluate_rules(FEEDBACK_RULES, ctx)
}

/// Runs `rules` in order starting from `MAX_RATING`, clamping the result to
/// `MIN_RATING`. Emits a single positive bullet when nothing triggered.
pub fn evaluate_rules(rules: &[FeedbackRule], ctx: &RuleContext<'_>) -> Feedback {
    let mut rating = MAX_RATING;
    let mut bullets = Vec::new();

    for rule in rules {
        if let Some(finding) = (rule.check)(ctx) {
            tracing::debug!(rule = rule.name, penalty = finding.penalty, "feedback rule triggered");
            rating = rating.saturating_sub(finding.penalty);
            bullets.push(finding.message);
        }
    }

    if bullets.is_empty() {
        bullets.push(POSITIVE_FIT.to_string());
    }

    Feedback {
        rating: rating.clamp(MIN_RATING, MAX_RATING),
        bullets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skills(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sections(items: &[(SectionName, &str)]) -> SectionMap {
        items.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    fn run(
        resume_sections: &SectionMap,
        jd_sections: &SectionMap,
        resume_skills: &SkillSet,
        jd_skills: &SkillSet,
    ) -> Feedback {
        generate_feedback(&RuleContext {
            resume_sections,
            jd_sections,
            resume_skills,
            jd_skills,
        })
    }

    #[test]
    fn test_rule_table_order_is_fixed() {
        let names: Vec<&str> = FEEDBACK_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "missing_skills",
                "projects_gap",
                "education_gap",
                "experience_gap",
                "soft_skills_advisory"
            ]
        );
    }

    #[test]
    fn test_single_missing_skill_costs_one() {
        let resume = sections(&[(SectionName::Skills, "python, sql, teamwork")]);
        let jd = sections(&[(SectionName::Skills, "python, aws")]);
        let fb = run(&resume, &jd, &skills(&["python", "sql"]), &skills(&["python", "aws"]));
        assert_eq!(fb.rating, 4);
        assert_eq!(fb.bullets, vec!["Add missing skills: aws".to_string()]);
    }

    #[test]
    fn test_missing_skill_penalty_capped_at_two() {
        let resume = sections(&[(SectionName::Summary, "team player")]);
        let fb = run(
            &resume,
            &SectionMap::new(),
            &SkillSet::new(),
            &skills(&["aws", "docker", "git", "rust"]),
        );
        assert_eq!(fb.rating, 3);
        assert_eq!(fb.bullets[0], "Add missing skills: aws, docker, git, rust");
    }

    #[test]
    fn test_subset_skills_never_fire_missing_rule() {
        let resume = sections(&[(SectionName::Summary, "team player")]);
        let fb = run(
            &resume,
            &SectionMap::new(),
            &skills(&["aws", "python"]),
            &skills(&["python"]),
        );
        assert_eq!(fb.rating, 5);
        assert_eq!(fb.bullets, vec![POSITIVE_FIT.to_string()]);
    }

    #[test]
    fn test_projects_and_education_gaps() {
        let resume = sections(&[(SectionName::Summary, "collaborative engineer")]);
        let jd = sections(&[
            (SectionName::Projects, "build pipelines"),
            (SectionName::Education, "BS in CS"),
        ]);
        let fb = run(&resume, &jd, &SkillSet::new(), &SkillSet::new());
        assert_eq!(fb.rating, 3);
        assert_eq!(
            fb.bullets,
            vec![
                "Add projects relevant to the job description".to_string(),
                "Educational background does not match JD or is missing".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_jd_section_does_not_trigger_gap() {
        let resume = sections(&[(SectionName::Summary, "team")]);
        let jd = sections(&[(SectionName::Projects, "")]);
        let fb = run(&resume, &jd, &SkillSet::new(), &SkillSet::new());
        assert_eq!(fb.rating, 5);
    }

    #[test]
    fn test_experience_implied_by_jd_text() {
        let resume = sections(&[(SectionName::Summary, "leadership")]);
        let jd = sections(&[(SectionName::Skills, "3+ years of Experience with rust")]);
        let fb = run(&resume, &jd, &SkillSet::new(), &SkillSet::new());
        assert_eq!(fb.rating, 4);
        assert!(fb.bullets[0].contains("Work experience"));
    }

    #[test]
    fn test_work_experience_satisfies_experience_rule() {
        let resume = sections(&[(SectionName::WorkExperience, "Acme, team lead")]);
        let jd = sections(&[(SectionName::Experience, "5 years backend")]);
        let fb = run(&resume, &jd, &SkillSet::new(), &SkillSet::new());
        assert_eq!(fb.rating, 5);
        assert_eq!(fb.bullets, vec![POSITIVE_FIT.to_string()]);
    }

    #[test]
    fn test_soft_skill_advisory_does_not_change_rating() {
        let fb = run(
            &SectionMap::new(),
            &SectionMap::new(),
            &SkillSet::new(),
            &SkillSet::new(),
        );
        assert_eq!(fb.rating, 5);
        assert_eq!(fb.bullets.len(), 1);
        assert!(fb.bullets[0].starts_with("Consider highlighting soft skills"));
    }

    #[test]
    fn test_rating_clamped_to_one() {
        let jd = sections(&[
            (SectionName::Projects, "p"),
            (SectionName::Education, "e"),
            (SectionName::Experience, "x"),
        ]);
        let fb = run(
            &SectionMap::new(),
            &jd,
            &SkillSet::new(),
            &skills(&["aws", "git", "rust"]),
        );
        assert_eq!(fb.rating, MIN_RATING);
        assert_eq!(fb.bullets.len(), 5);
    }

    #[test]
    fn test_custom_rule_table() {
        fn always(_: &RuleContext<'_>) -> Option<Finding> {
            Some(Finding {
                message: "always".to_string(),
                penalty: 9,
            })
        }
        let rules = [FeedbackRule {
            name: "always",
            check: always,
        }];
        let empty = SectionMap::new();
        let none = SkillSet::new();
        let fb = evaluate_rules(
            &rules,
            &RuleContext {
                resume_sections: &empty,
                jd_sections: &empty,
                resume_skills: &none,
                jd_skills: &none,
            },
        );
        assert_eq!(fb.rating, MIN_RATING);
        assert_eq!(fb.bullets, vec!["always".to_string()]);
    }

    proptest! {
        /// Property: rating stays in [1, 5] for any skill sets
        #[test]
        fn rating_always_bounded(
            resume in proptest::collection::btree_set("[a-f]{1,3}", 0..10),
            jd in proptest::collection::btree_set("[a-f]{1,3}", 0..10),
            resume_body in "[a-z ]{0,40}",
            jd_body in "[a-z ]{0,40}",
        ) {
            let resume_sections = sections(&[(SectionName::Skills, resume_body.as_str())]);
            let jd_sections = sections(&[
                (SectionName::Projects, jd_body.as_str()),
                (SectionName::Education, jd_body.as_str()),
            ]);
            let fb = run(&resume_sections, &jd_sections, &resume, &jd);
            prop_assert!((MIN_RATING..=MAX_RATING).contains(&fb.rating));
            prop_assert!(!fb.bullets.is_empty());
        }
    }
}
