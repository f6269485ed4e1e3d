//! Narrative Report: optional free-text, section-by-section review produced
//! by an external generator.
//!
//! `AppState` holds an `Option<Arc<dyn NarrativeGenerator>>`: `None` when no
//! backend is configured. Generator failures never propagate to the caller;
//! `narrate_or_inline_error` turns them into a readable message instead.

pub mod prompts;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::sections::SectionMap;
use crate::llm_client::{LlmClient, LlmError};
use crate::narrative::prompts::{NARRATIVE_PROMPT_TEMPLATE, NARRATIVE_SYSTEM};

const NOT_CONFIGURED: &str = "Narrative report unavailable: no narrative backend is configured.";
const FAILURE_PREFIX: &str = "Could not generate narrative report.";

/// Everything a generator gets to see about one comparison.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeRequest<'a> {
    pub resume_text: &'a str,
    pub jd_text: &'a str,
    pub resume_sections: &'a SectionMap,
    pub jd_sections: &'a SectionMap,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Produces an opaque markdown narrative. Implement this to swap backends
/// without touching handlers.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, request: &NarrativeRequest<'_>) -> Result<String, LlmError>;

    /// Short backend name reported to clients.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmNarrativeGenerator
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmNarrativeGenerator(pub LlmClient);

#[async_trait]
impl NarrativeGenerator for LlmNarrativeGenerator {
    async fn generate(&self, request: &NarrativeRequest<'_>) -> Result<String, LlmError> {
        let prompt = build_prompt(request);
        self.0.call_text(&prompt, NARRATIVE_SYSTEM).await
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Fills the narrative template.
pub fn build_prompt(request: &NarrativeRequest<'_>) -> String {
    NARRATIVE_PROMPT_TEMPLATE
        .replace("{resume_sections}", &format_sections(request.resume_sections))
        .replace("{jd_sections}", &format_sections(request.jd_sections))
        .replace("{resume_text}", request.resume_text)
        .replace("{jd_text}", request.jd_text)
}

/// `Title:` followed by the body for every non-empty section, blank-line separated.
fn format_sections(sections: &SectionMap) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .filter(|(_, body)| !body.trim().is_empty())
        .map(|(name, body)| format!("{}:\n{}", name.title(), body))
        .collect();

    if blocks.is_empty() {
        "(no recognized sections)".to_string()
    } else {
        blocks.join("\n\n")
    }
}

/// Runs `generator` if present. Never fails: a missing backend or a failed
/// call becomes inline error text.
pub async fn narrate_or_inline_error(
    generator: Option<&dyn NarrativeGenerator>,
    request: &NarrativeRequest<'_>,
) -> String {
    let Some(generator) = generator else {
        return NOT_CONFIGURED.to_string();
    };

    match generator.generate(request).await {
        Ok(narrative) => {
            info!(backend = generator.backend(), "narrative generated");
            narrative
        }
        Err(e) => {
            warn!(backend = generator.backend(), "narrative generation failed: {e}");
            format!("{FAILURE_PREFIX}\n\nError: {e}")
        }
    }
}
