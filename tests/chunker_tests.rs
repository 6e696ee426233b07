use chat_summarizer::chunker::{Group, chunk_messages};

fn by_length(text: &str) -> usize {
    text.len()
}

/// Deterministic message lists with lengths between 1 and `max_len`.
fn sample_chats(count: usize, max_len: usize) -> Vec<Vec<String>> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    (0..count)
        .map(|chat| {
            let len = 1 + next() % 40;
            (0..len)
                .map(|i| {
                    let size = 1 + next() % max_len;
                    format!("{chat}-{i}:{}", "x".repeat(size))
                })
                .collect()
        })
        .collect()
}

fn flatten<'a>(groups: &[Group<'a>]) -> Vec<&'a str> {
    groups.iter().flat_map(|g| g.messages().iter().copied()).collect()
}

#[test]
fn test_groups_reconstruct_input() {
    for budget in [1, 7, 25, 60, 500] {
        for chat in sample_chats(30, 50) {
            let groups = chunk_messages(&chat, budget, &by_length);
            let original: Vec<&str> = chat.iter().map(String::as_str).collect();
            assert_eq!(flatten(&groups), original, "budget {budget}");
            assert!(groups.iter().all(|g| !g.is_empty()));
        }
    }
}

#[test]
fn test_groups_respect_budget() {
    for budget in [5, 30, 80] {
        for chat in sample_chats(30, 60) {
            for group in chunk_messages(&chat, budget, &by_length) {
                let sum: usize = group.messages().iter().map(|m| m.len()).sum();
                assert_eq!(sum, group.tokens());
                assert!(
                    sum <= budget || (group.len() == 1 && sum > budget),
                    "group of {} messages totals {sum} over budget {budget}",
                    group.len()
                );
            }
        }
    }
}

#[test]
fn test_groups_are_maximal() {
    // A group is only closed when the next message would not have fit.
    for chat in sample_chats(20, 30) {
        let groups = chunk_messages(&chat, 50, &by_length);
        for pair in groups.windows(2) {
            let next_first = pair[1].messages()[0].len();
            assert!(pair[0].tokens() + next_first > 50);
        }
    }
}

#[test]
fn test_whole_input_within_budget_is_one_group() {
    let chat = ["Hello", "World"];
    let groups = chunk_messages(&chat, 10, &|_: &str| 1usize);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].tokens(), 2);
}

#[test]
fn test_each_message_over_half_budget_is_isolated() {
    let chat = ["a".repeat(60), "b".repeat(60), "c".repeat(60)];
    let groups = chunk_messages(&chat, 100, &by_length);
    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g.len() == 1));
}

#[test]
fn test_chunking_is_deterministic() {
    let chats = sample_chats(1, 40);
    let chat = &chats[0];
    assert_eq!(
        chunk_messages(chat, 45, &by_length),
        chunk_messages(chat, 45, &by_length)
    );
}
