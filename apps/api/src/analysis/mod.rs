// Resume / job description comparison engine.
// Implements: section segmentation, skill extraction, similarity scoring, rule-based feedback.
// Everything here is synchronous and total; only handlers.rs touches I/O.

pub mod engine;
pub mod feedback;
pub mod handlers;
pub mod render;
pub mod sections;
pub mod similarity;
pub mod skills;
pub mod vocabulary;

// Re-export the engine consumed by state and main.
pub use engine::MatchEngine;
