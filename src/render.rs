//! Rendering of stored chat turns into the plain text the summarizer reads.

use crate::core::models::ChatMessage;

/// Horizontal rule written after every rendered turn.
pub const TURN_SEPARATOR: &str = "\n\n---\n\n";

/// Renders one turn, or `None` if it has no speaker or no body.
#[must_use]
pub fn render_message(message: &ChatMessage) -> Option<String> {
    if message.name.is_empty() || message.message.is_empty() {
        return None;
    }

    let user_suffix = if message.is_user { " (User)" } else { "" };
    Some(format!(
        "**{}**{}: {}{}",
        message.name, user_suffix, message.message, TURN_SEPARATOR
    ))
}

/// Renders a chat as one line per turn, in chat order, ready for chunking.
#[must_use]
pub fn render_messages_for_summary(messages: &[ChatMessage]) -> Vec<String> {
    messages.iter().filter_map(render_message).collect()
}
