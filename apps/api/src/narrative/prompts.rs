// LLM prompt constants for the narrative report.

/// System prompt for the narrative reviewer.
pub const NARRATIVE_SYSTEM: &str = "You are a professional career coach and resume reviewer. \
    Write plain markdown. No emojis, no filler. \
    Only reference content that appears in the resume or job description you are given.";

/// Narrative prompt template. Replace `{resume_sections}`, `{jd_sections}`,
/// `{resume_text}` and `{jd_text}` before sending.
pub const NARRATIVE_PROMPT_TEMPLATE: &str = r#"Compare the candidate resume against the job description.

Candidate resume (sections extracted):
{resume_sections}

Job description (sections extracted):
{jd_sections}

Full resume text:
{resume_text}

Full job description text:
{jd_text}

Task:
- Identify missing or weak points in the resume.
- Suggest specific modifications that improve alignment with the job description.
- Write section-wise feedback as clear bullet points.
- End with a short actionable summary.

Use exactly these headings, in this order:

### Skills
- What to keep
- What to add / change

### Projects
- What to keep
- What to add / change

### Experience
- What to keep
- What to add / change

### Education
- What to keep
- What to add / change

### Certifications
- What to keep
- What to add / change

### Soft Skills
- What to keep
- What to add / change

### Final Summary
- 3 to 4 crisp, actionable lines for the candidate.
"#;

