//! Action types for chat commands.
//!
//! These actions are parsed from chat messages sent to the bot's webhook.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{IssueKey, ProjectKey};

/// A parsed chat command, ready to be dispatched to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Creates an issue:
    /// `create ticket in OPS: "Summary" priority High assignee @jane AC: ...`
    Create {
        project: ProjectKey,
        summary: String,
        priority: Option<String>,
        /// Handle as written in chat, including the leading `@`.
        assignee: Option<String>,
        acceptance_criteria: Option<String>,
    },

    /// Assigns an issue: `assign OPS-12 to @jane`
    Assign {
        project: ProjectKey,
        issue: IssueKey,
        /// Handle as written in chat, including the leading `@`.
        assignee: String,
    },

    /// Moves an issue through a named transition: `update OPS-12: status In Progress`
    Transition {
        project: ProjectKey,
        issue: IssueKey,
        status: String,
    },

    /// Comments on an issue: `comment OPS-12: "Looks good"`
    Comment {
        project: ProjectKey,
        issue: IssueKey,
        text: String,
    },

    /// Queries recently updated issues: `my updates since -7d in OPS for @jane`
    QueryUpdates {
        project: ProjectKey,
        /// A tracker query time expression such as `-7d` or `startOfDay()`.
        since: String,
        /// Handle without the leading `@`; `None` means the authenticated user.
        user: Option<String>,
    },
}

impl Action {
    /// Short name of the action, used in webhook responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::Assign { .. } => "assign",
            Action::Transition { .. } => "transition",
            Action::Comment { .. } => "comment",
            Action::QueryUpdates { .. } => "updates",
        }
    }

    /// The project the action targets.
    pub fn project(&self) -> &ProjectKey {
        match self {
            Action::Create { project, .. }
            | Action::Assign { project, .. }
            | Action::Transition { project, .. }
            | Action::Comment { project, .. }
            | Action::QueryUpdates { project, .. } => project,
        }
    }
}

/// Renders the action back to its canonical command text.
///
/// Parsing the rendered text yields an equal action.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create {
                project,
                summary,
                priority,
                assignee,
                acceptance_criteria,
            } => {
                write!(f, "create ticket in {}: \"{}\"", project, summary)?;
                if let Some(priority) = priority {
                    write!(f, " priority {}", priority)?;
                }
                if let Some(assignee) = assignee {
                    write!(f, " assignee @{}", assignee.trim_start_matches('@'))?;
                }
                if let Some(ac) = acceptance_criteria {
                    write!(f, " AC: {}", ac)?;
                }
                Ok(())
            }
            Action::Assign {
                issue, assignee, ..
            } => write!(f, "assign {} to @{}", issue, assignee.trim_start_matches('@')),
            Action::Transition { issue, status, .. } => {
                write!(f, "update {}: status {}", issue, status)
            }
            Action::Comment { issue, text, .. } => write!(f, "comment {}: \"{}\"", issue, text),
            Action::QueryUpdates {
                project,
                since,
                user,
            } => {
                write!(f, "my updates since {} in {}", since, project)?;
                if let Some(user) = user {
                    write!(f, " for @{}", user)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(s: &str) -> IssueKey {
        IssueKey::parse(s).unwrap()
    }

    #[test]
    fn kinds() {
        let assign = Action::Assign {
            project: "OPS".into(),
            issue: issue("OPS-1"),
            assignee: "@jane".into(),
        };
        assert_eq!(assign.kind(), "assign");
        assert_eq!(assign.project().as_str(), "OPS");

        let updates = Action::QueryUpdates {
            project: "OPS".into(),
            since: "-1d".into(),
            user: None,
        };
        assert_eq!(updates.kind(), "updates");
    }

    #[test]
    fn renders_create_with_all_options() {
        let action = Action::Create {
            project: "OPS".into(),
            summary: "Fix login bug".into(),
            priority: Some("High".into()),
            assignee: Some("@jane".into()),
            acceptance_criteria: Some("Must handle expired sessions".into()),
        };
        assert_eq!(
            action.to_string(),
            "create ticket in OPS: \"Fix login bug\" priority High assignee @jane AC: Must handle expired sessions"
        );
    }

    #[test]
    fn renders_issue_commands() {
        let transition = Action::Transition {
            project: "OPS".into(),
            issue: issue("OPS-9"),
            status: "In Progress".into(),
        };
        assert_eq!(transition.to_string(), "update OPS-9: status In Progress");

        let comment = Action::Comment {
            project: "OPS".into(),
            issue: issue("OPS-9"),
            text: "ship it".into(),
        };
        assert_eq!(comment.to_string(), "comment OPS-9: \"ship it\"");
    }

    #[test]
    fn serializes_with_type_tag() {
        let action = Action::QueryUpdates {
            project: "OPS".into(),
            since: "-7d".into(),
            user: Some("jane".into()),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "query_updates");
        assert_eq!(json["user"], "jane");
    }
}
