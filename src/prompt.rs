//! Instruction text sent to the generation service.

/// Which step of the map-then-reduce pipeline a prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// One group of raw chat lines, summarized independently.
    Passage,
    /// Partial summaries (or a single small chat) reduced to the final summary.
    Consolidate,
}

pub const PASSAGE_INSTRUCTIONS: &str = "Please provide a concise summary of the following passage. \
Focus on the main topics discussed, key events, and important interactions between participants.";

pub const CONSOLIDATE_INSTRUCTIONS: &str = "Below are summaries of different passages of a story, \
please provide a combined summary. \
Focus on the main topics discussed, key events, and important interactions between participants.";

pub const CLOSING_DIRECTIVE: &str =
    "Please summarize. Your response should include nothing but the summary, with no additional commentary.";

/// Builds the full prompt for `phase` over `content`.
///
/// `word_limit` only applies to [`Phase::Consolidate`]; passage summaries feed
/// the reduction step and are left unconstrained.
#[must_use]
pub fn build_prompt(phase: Phase, content: &str, word_limit: usize) -> String {
    let instructions = match phase {
        Phase::Passage => PASSAGE_INSTRUCTIONS,
        Phase::Consolidate => CONSOLIDATE_INSTRUCTIONS,
    };

    let word_clause = match phase {
        Phase::Consolidate if word_limit > 0 => {
            format!(" Generate roughly {word_limit} words.")
        }
        _ => String::new(),
    };

    format!("{instructions}{word_clause}\n\nChat conversation:\n{content}\n\n{CLOSING_DIRECTIVE}")
}
