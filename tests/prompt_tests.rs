use chat_summarizer::prompt::{
    CLOSING_DIRECTIVE, CONSOLIDATE_INSTRUCTIONS, PASSAGE_INSTRUCTIONS, Phase, build_prompt,
};

#[test]
fn test_passage_prompt_ignores_word_limit() {
    let prompt = build_prompt(Phase::Passage, "**Ann**: hello", 250);

    assert!(prompt.starts_with(PASSAGE_INSTRUCTIONS));
    assert!(prompt.contains("**Ann**: hello"));
    assert!(!prompt.contains("250"));
    assert!(!prompt.contains("words"));
    assert!(prompt.ends_with(CLOSING_DIRECTIVE));
}

#[test]
fn test_consolidate_prompt_requests_word_count() {
    let prompt = build_prompt(Phase::Consolidate, "part one\npart two", 400);

    assert!(prompt.starts_with(CONSOLIDATE_INSTRUCTIONS));
    assert!(prompt.contains("roughly 400 words"));
    assert!(prompt.contains("part one\npart two"));
    assert!(prompt.ends_with(CLOSING_DIRECTIVE));
}

#[test]
fn test_consolidate_prompt_without_word_limit() {
    let prompt = build_prompt(Phase::Consolidate, "text", 0);
    assert!(!prompt.contains("roughly"));
}

#[test]
fn test_content_comes_before_closing_directive() {
    let prompt = build_prompt(Phase::Passage, "UNIQUE-CONTENT", 0);
    let content_at = prompt.find("UNIQUE-CONTENT").unwrap();
    let closing_at = prompt.find(CLOSING_DIRECTIVE).unwrap();
    assert!(content_at < closing_at);
}

#[test]
fn test_instructions_focus_on_participants() {
    for phase in [Phase::Passage, Phase::Consolidate] {
        let prompt = build_prompt(phase, "x", 0);
        assert!(prompt.contains("key events"));
        assert!(prompt.contains("interactions between participants"));
    }
    assert!(CONSOLIDATE_INSTRUCTIONS.contains("summaries of different passages"));
}
