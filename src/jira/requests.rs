//! Request and response payloads for the Jira REST API (v3).
//!
//! Payload construction is kept pure here so the wire shapes can be tested
//! without a server; the client only sends what these functions build.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::ProjectKey;

/// Issue type used for every created issue.
pub const ISSUE_TYPE: &str = "Task";

/// Story point estimate set on every created issue.
pub const STORY_POINTS: u32 = 1;

/// Calendar days between creation and the due date.
pub const DUE_IN_DAYS: u64 = 3;

/// The fields of an issue to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project: ProjectKey,
    pub summary: String,
    pub priority: Option<String>,
    /// Chat handle; a leading `@` is stripped before sending.
    pub assignee: Option<String>,
    /// Sent as the issue description.
    pub acceptance_criteria: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueBody<'a> {
    fields: CreateIssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct CreateIssueFields<'a> {
    project: KeyRef<'a>,
    summary: &'a str,
    issuetype: NameRef<'a>,
    duedate: String,
    #[serde(rename = "customfield_10016")]
    story_points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<NameRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<NameRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameRef<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DoTransitionBody<'a> {
    transition: TransitionId<'a>,
}

#[derive(Debug, Serialize)]
struct TransitionId<'a> {
    id: &'a str,
}

/// The list returned by `GET /issue/{key}/transitions`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransitionList {
    #[serde(default)]
    pub transitions: Vec<AvailableTransition>,
}

/// A transition available on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct AvailableTransition {
    pub id: String,
    pub name: String,
}

impl TransitionList {
    /// Finds the transition whose display name matches `status`, ignoring case.
    pub fn find(&self, status: &str) -> Option<&AvailableTransition> {
        let wanted = status.to_lowercase();
        self.transitions
            .iter()
            .find(|t| t.name.to_lowercase() == wanted)
    }
}

/// Strips one leading `@` from a chat handle.
pub fn strip_handle(handle: &str) -> &str {
    handle.strip_prefix('@').unwrap_or(handle)
}

/// Due date for an issue created on `today` (UTC calendar date).
pub fn due_date(today: NaiveDate) -> NaiveDate {
    today + Days::new(DUE_IN_DAYS)
}

pub(crate) fn create_issue_body(issue: &NewIssue, today: NaiveDate) -> CreateIssueBody<'_> {
    CreateIssueBody {
        fields: CreateIssueFields {
            project: KeyRef {
                key: issue.project.as_str(),
            },
            summary: &issue.summary,
            issuetype: NameRef { name: ISSUE_TYPE },
            duedate: due_date(today).format("%Y-%m-%d").to_string(),
            story_points: STORY_POINTS,
            priority: issue.priority.as_deref().map(|name| NameRef { name }),
            assignee: issue.assignee.as_deref().map(|a| NameRef {
                name: strip_handle(a),
            }),
            description: issue.acceptance_criteria.as_deref(),
        },
    }
}

pub(crate) fn assignee_body(assignee: &str) -> NameRef<'_> {
    NameRef {
        name: strip_handle(assignee),
    }
}

pub(crate) fn comment_body(text: &str) -> CommentBody<'_> {
    CommentBody { body: text }
}

pub(crate) fn do_transition_body(id: &str) -> DoTransitionBody<'_> {
    DoTransitionBody {
        transition: TransitionId { id },
    }
}

/// Builds the search filter for "issues updated since" queries.
///
/// Without a user, the filter targets the authenticated account.
pub fn updates_jql(project: &ProjectKey, since: &str, user: Option<&str>) -> String {
    let assignee = match user {
        Some(user) => format!("\"{}\"", user),
        None => "currentUser()".to_string(),
    };
    format!(
        "project = {} AND updated >= {} AND assignee = {}",
        project, since, assignee
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_is_three_calendar_days_later() {
        assert_eq!(due_date(date(2024, 1, 15)), date(2024, 1, 18));
        assert_eq!(due_date(date(2024, 2, 27)), date(2024, 3, 1));
        assert_eq!(due_date(date(2023, 12, 30)), date(2024, 1, 2));
    }

    #[test]
    fn create_body_minimal() {
        let issue = NewIssue {
            project: "OPS".into(),
            summary: "Fix login bug".into(),
            priority: None,
            assignee: None,
            acceptance_criteria: None,
        };
        let body = serde_json::to_value(create_issue_body(&issue, date(2024, 1, 15))).unwrap();
        assert_eq!(
            body,
            json!({
                "fields": {
                    "project": {"key": "OPS"},
                    "summary": "Fix login bug",
                    "issuetype": {"name": "Task"},
                    "duedate": "2024-01-18",
                    "customfield_10016": 1
                }
            })
        );
    }

    #[test]
    fn create_body_with_options_strips_handle() {
        let issue = NewIssue {
            project: "OPS".into(),
            summary: "Fix login bug".into(),
            priority: Some("High".into()),
            assignee: Some("@jane".into()),
            acceptance_criteria: Some("Must handle expired sessions".into()),
        };
        let body = serde_json::to_value(create_issue_body(&issue, date(2024, 1, 15))).unwrap();
        let fields = &body["fields"];
        assert_eq!(fields["priority"], json!({"name": "High"}));
        assert_eq!(fields["assignee"], json!({"name": "jane"}));
        assert_eq!(fields["description"], "Must handle expired sessions");
    }

    #[test]
    fn strip_handle_removes_one_at() {
        assert_eq!(strip_handle("@jane"), "jane");
        assert_eq!(strip_handle("jane"), "jane");
        assert_eq!(strip_handle("@@jane"), "@jane");
    }

    #[test]
    fn other_bodies() {
        assert_eq!(
            serde_json::to_value(assignee_body("@bob")).unwrap(),
            json!({"name": "bob"})
        );
        assert_eq!(
            serde_json::to_value(comment_body("hi")).unwrap(),
            json!({"body": "hi"})
        );
        assert_eq!(
            serde_json::to_value(do_transition_body("31")).unwrap(),
            json!({"transition": {"id": "31"}})
        );
    }

    #[test]
    fn jql_for_named_user() {
        assert_eq!(
            updates_jql(&"OPS".into(), "-7d", Some("jane")),
            r#"project = OPS AND updated >= -7d AND assignee = "jane""#
        );
    }

    #[test]
    fn jql_for_current_user() {
        assert_eq!(
            updates_jql(&"OPS".into(), "-1d", None),
            "project = OPS AND updated >= -1d AND assignee = currentUser()"
        );
    }

    #[test]
    fn transition_lookup_ignores_case() {
        let list: TransitionList = serde_json::from_value(json!({
            "transitions": [
                {"id": "11", "name": "To Do"},
                {"id": "21", "name": "In Progress"},
                {"id": "31", "name": "Done"}
            ]
        }))
        .unwrap();
        assert_eq!(list.find("in progress").map(|t| t.id.as_str()), Some("21"));
        assert_eq!(list.find("DONE").map(|t| t.id.as_str()), Some("31"));
        assert!(list.find("Shipped").is_none());
    }

    #[test]
    fn missing_transitions_field_is_empty() {
        let list: TransitionList = serde_json::from_value(json!({})).unwrap();
        assert!(list.transitions.is_empty());
    }
}
