//! Plain-text rendering of the conversation log

use crate::conversation::ConversationState;
use std::fmt::Write;

const WAITING_INDICATOR: &str = "...";

/// Render a state as the two-party log shown to the user.
///
/// An error replaces the conversation entirely.
pub fn render_state(state: &ConversationState) -> String {
    let mut out = String::new();
    match state {
        ConversationState::Initial => {}
        ConversationState::Active { messages, pending } => {
            for message in messages {
                let _ = writeln!(out, "{}:", message.author().display_name());
                let _ = writeln!(out, "{}", message.text());
                out.push('\n');
            }
            if *pending {
                let _ = writeln!(out, "{WAITING_INDICATOR}");
            }
        }
        ConversationState::Error { error_text, .. } => {
            let _ = writeln!(out, "Error: {error_text}");
        }
    }
    out
}
