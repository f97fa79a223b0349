//! Parser for chat commands.
//!
//! This module provides a pure parser that maps normalized chat text to a
//! structured [`Action`]. Grammars are tried in a fixed order and the first
//! match wins; text matching none of them is not an error, it simply yields
//! `None`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{IssueKey, ProjectKey};

use super::types::Action;

static CREATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^create ticket in (\w+): "([^"]+)"(?: priority (\w+))?(?: assignee (@\w+))?(?: AC: (.+))?"#,
    )
    .expect("create pattern is valid")
});

static ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^assign (\w+-\d+) to (@\w+)").expect("assign pattern is valid")
});

static TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^update (\w+-\d+): status (.+)").expect("transition pattern is valid")
});

static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^comment (\w+-\d+): "([^"]+)""#).expect("comment pattern is valid")
});

static UPDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^my updates since (.+?) in (\w+)(?: for @(\w+))?")
        .expect("updates pattern is valid")
});

/// `my updates since <expr>[ for @<handle>]`, used only when a default project is known.
static UPDATES_NO_PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^my updates since (.+?)(?: for @(\w+))?\s*$")
        .expect("updates pattern is valid")
});

type Matcher = fn(&str) -> Option<Action>;

/// Grammars in priority order.
const MATCHERS: [Matcher; 5] = [
    match_create,
    match_assign,
    match_transition,
    match_comment,
    match_updates,
];

/// Parses a chat message into an [`Action`].
///
/// # Parsing Rules
///
/// - Matching is case-insensitive and anchored at the start of the text
/// - Grammars are tried in order: create, assign, update, comment, updates
/// - Quoted strings use literal double quotes; escaping is not supported
/// - Optional parts absent from the text are `None`, never empty strings
/// - Returns `None` if no grammar matches
///
/// # Examples
///
/// ```
/// use teams_jira_bridge::commands::parse_action;
///
/// let action = parse_action(r#"create ticket in OPS: "Fix login bug""#).unwrap();
/// assert_eq!(action.kind(), "create");
///
/// let action = parse_action("assign OPS-12 to @jane").unwrap();
/// assert_eq!(action.project().as_str(), "OPS");
///
/// assert_eq!(parse_action("hello there"), None);
/// ```
pub fn parse_action(text: &str) -> Option<Action> {
    MATCHERS.iter().find_map(|matcher| matcher(text))
}

/// Like [`parse_action`], but `my updates since <expr>` may omit `in <PROJECT>`
/// when a default project is supplied.
pub fn parse_action_with_default(text: &str, default_project: Option<&ProjectKey>) -> Option<Action> {
    parse_action(text).or_else(|| {
        let project = default_project?;
        let caps = UPDATES_NO_PROJECT.captures(text)?;
        Some(Action::QueryUpdates {
            project: project.clone(),
            since: caps[1].trim().to_string(),
            user: optional(&caps, 2),
        })
    })
}

fn match_create(text: &str) -> Option<Action> {
    let caps = CREATE.captures(text)?;
    Some(Action::Create {
        project: ProjectKey::new(&caps[1]),
        summary: caps[2].to_string(),
        priority: optional(&caps, 3),
        assignee: optional(&caps, 4),
        acceptance_criteria: caps
            .get(5)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

fn match_assign(text: &str) -> Option<Action> {
    let caps = ASSIGN.captures(text)?;
    let issue = IssueKey::parse(&caps[1]).ok()?;
    Some(Action::Assign {
        project: issue.project(),
        issue,
        assignee: caps[2].to_string(),
    })
}

fn match_transition(text: &str) -> Option<Action> {
    let caps = TRANSITION.captures(text)?;
    let issue = IssueKey::parse(&caps[1]).ok()?;
    let status = caps[2].trim();
    if status.is_empty() {
        return None;
    }
    Some(Action::Transition {
        project: issue.project(),
        issue,
        status: status.to_string(),
    })
}

fn match_comment(text: &str) -> Option<Action> {
    let caps = COMMENT.captures(text)?;
    let issue = IssueKey::parse(&caps[1]).ok()?;
    Some(Action::Comment {
        project: issue.project(),
        issue,
        text: caps[2].to_string(),
    })
}

fn match_updates(text: &str) -> Option<Action> {
    let caps = UPDATES.captures(text)?;
    Some(Action::QueryUpdates {
        project: ProjectKey::new(&caps[2]),
        since: caps[1].trim().to_string(),
        user: optional(&caps, 3),
    })
}

/// Returns an optional capture group as an owned string.
fn optional(caps: &Captures<'_>, group: usize) -> Option<String> {
    caps.get(group).map(|m| m.as_str().to_string())
}
