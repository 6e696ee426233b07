//! Greedy, order-preserving partitioning of chat lines into token-bounded groups.

use crate::ai::TokenCounter;

/// Separator placed between messages when a group is sent as one passage.
pub const GROUP_JOINER: &str = "\n";

/// A contiguous run of input messages that fits one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    messages: Vec<&'a str>,
    tokens: usize,
}

impl<'a> Group<'a> {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            tokens: 0,
        }
    }

    fn push(&mut self, message: &'a str, tokens: usize) {
        self.messages.push(message);
        self.tokens += tokens;
    }

    #[must_use]
    pub fn messages(&self) -> &[&'a str] {
        &self.messages
    }

    /// Sum of the token counts of the messages in this group.
    #[must_use]
    pub fn tokens(&self) -> usize {
        self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The passage text for this group.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.messages.join(GROUP_JOINER)
    }
}

/// Splits `messages` into groups whose summed token count stays within `budget`.
///
/// A group is closed only when adding the next message would push it strictly
/// above `budget`, so a group that lands exactly on the budget is kept. A
/// single message larger than `budget` is never split; it becomes a group of
/// its own. Empty input yields no groups.
pub fn chunk_messages<'a, S, C>(messages: &'a [S], budget: usize, counter: &C) -> Vec<Group<'a>>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    let mut groups = Vec::new();
    let mut current = Group::new();

    for message in messages {
        let text = message.as_ref();
        let tokens = counter.count(text);

        if current.tokens + tokens > budget && !current.is_empty() {
            groups.push(std::mem::replace(&mut current, Group::new()));
        }
        current.push(text, tokens);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
