//! Prompt templates and canned replies.
//!
//! The persona is a bored, unbeatable hero who happens to know a lot about
//! anime. Every string a user can see lives here, including the fallback
//! replies used when the model endpoint is unreachable.

use crate::error::FailureKind;
use crate::types::Category;

/// System instruction for free-form conversation.
pub const SYSTEM_PROMPT: &str = "\
You are a hero so strong that nothing excites you anymore, except good anime. \
You recommend anime in a flat, deadpan voice. Keep answers short and plain. \
When asked for recommendations, give two or three titles with a one-line \
reason each. Never use flowery language. If the question has nothing to do \
with anime, answer it anyway, briefly and without enthusiasm.";

/// System instruction for the popular-titles category.
const POPULAR_PROMPT: &str = "\
You are a bored hero listing currently popular anime. Give five titles, \
each with year, a 10-point rating, and one flat sentence on why people \
watch it. No hype.";

/// System instruction for the new-season category.
const NEW_PROMPT: &str = "\
You are a bored hero listing notable anime from the current season. Give \
five titles, each with a one-line deadpan summary. Mention the studio only \
if it matters.";

/// System instruction for the classics category.
const CLASSIC_PROMPT: &str = "\
You are a bored hero listing classic anime everyone should have seen \
already. Give five titles with year and one unimpressed sentence on why \
each one still holds up.";

/// Reply for a category string the assistant does not recognize.
pub const UNKNOWN_CATEGORY_REPLY: &str = "Hm. Never heard of that category.";

/// Reply rendered in place of an empty recommendation list.
pub const EMPTY_LIST_REPLY: &str = "Hm. Found nothing.";

/// System prompt and synthetic user line for a category request.
pub fn category_prompt(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Popular => (POPULAR_PROMPT, "Show me what everyone is watching"),
        Category::New => (NEW_PROMPT, "Show me this season's new anime"),
        Category::Classic => (CLASSIC_PROMPT, "Show me the classics"),
    }
}

/// In-character fallback reply for a failed request.
///
/// Short, no technical detail, no error codes. The taxonomy mapping is
/// chosen by [`AnikiError::reply_kind`](crate::AnikiError::reply_kind).
pub fn error_reply(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Network => "Hm. The internet broke. Try again.",
        FailureKind::Timeout => "Okay, this is taking too long. Give it a minute.",
        FailureKind::RateLimit => "Too many questions at once. Wait a bit.",
        FailureKind::Generic => "Hm. Something went wrong. Try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prompts_are_distinct() {
        let (popular, _) = category_prompt(Category::Popular);
        let (new, _) = category_prompt(Category::New);
        let (classic, _) = category_prompt(Category::Classic);
        assert_ne!(popular, new);
        assert_ne!(new, classic);
        assert_ne!(popular, classic);
    }

    #[test]
    fn error_replies_carry_no_technical_detail() {
        for kind in [
            FailureKind::Network,
            FailureKind::Timeout,
            FailureKind::RateLimit,
            FailureKind::Generic,
        ] {
            let reply = error_reply(kind);
            assert!(!reply.contains("error"));
            assert!(!reply.contains("HTTP"));
        }
    }
}
