//! Normalization of chat message text before parsing.
//!
//! Chat platforms deliver message text as HTML fragments: the bot mention is
//! wrapped in `<at>` tags, paragraphs in `<p>`, and spaces around mentions are
//! often `&nbsp;`. Parsing works on plain text, so this module flattens the
//! markup and drops the leading bot mention.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<at(?:\s[^>]*)?>[^<]*</at>").expect("mention pattern is valid")
});

/// Flattens a chat message into plain command text.
///
/// Steps, in order:
/// 1. Drop a leading `<at>...</at>` mention element, whatever name it shows
/// 2. Strip every remaining markup tag (`<p>`, ...), keeping inner text
/// 3. Replace `&nbsp;` with a plain space
/// 4. Trim surrounding whitespace
/// 5. Strip a leading plain-text mention of `bot_name` (with or without `@`)
///
/// # Examples
///
/// ```
/// use teams_jira_bridge::commands::normalize_message;
///
/// let text = "<p><at>JT-Agent</at>&nbsp;assign OPS-1 to @jane</p>";
/// assert_eq!(normalize_message(text, "JT-Agent"), "assign OPS-1 to @jane");
/// ```
pub fn normalize_message(text: &str, bot_name: &str) -> String {
    let without_mention = strip_leading_mention_element(text);
    let without_tags = TAG.replace_all(&without_mention, "");
    let spaced = without_tags.replace("&nbsp;", " ");
    strip_leading_mention(spaced.trim(), bot_name).to_string()
}

/// Removes the first `<at>` element if only markup and whitespace precede it.
fn strip_leading_mention_element(text: &str) -> String {
    let Some(mention) = MENTION.find(text) else {
        return text.to_string();
    };
    let before = TAG.replace_all(&text[..mention.start()], "");
    if !before.replace("&nbsp;", " ").trim().is_empty() {
        return text.to_string();
    }
    format!("{}{}", &text[..mention.start()], &text[mention.end()..])
}

/// Removes `bot_name` or `@bot_name` from the start of `text` (case-insensitive).
///
/// The mention must be followed by whitespace or the end of the text, so a
/// bot called `jt` does not eat the start of `jtx create ...`.
fn strip_leading_mention<'a>(text: &'a str, bot_name: &str) -> &'a str {
    if bot_name.is_empty() {
        return text;
    }
    let rest = text.strip_prefix('@').unwrap_or(text);
    // `get` returns None if the length lands inside a multi-byte character.
    match rest.get(..bot_name.len()) {
        Some(head) if head.eq_ignore_ascii_case(bot_name) => {
            let after = &rest[bot_name.len()..];
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                after.trim_start()
            } else {
                text
            }
        }
        _ => text,
    }
}
