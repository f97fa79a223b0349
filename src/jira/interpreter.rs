//! Executes parsed chat actions against the tracker.

use crate::commands::Action;

use super::client::{JiraClient, JiraResponse};
use super::error::JiraApiError;
use super::requests::NewIssue;

/// Routes an [`Action`] to the matching [`JiraClient`] operation.
///
/// The client already records each attempt and its outcome, so callers that
/// only need fire-and-log semantics can drop the returned `Result`.
pub async fn interpret_action(
    client: &JiraClient,
    action: &Action,
) -> Result<JiraResponse, JiraApiError> {
    match action {
        Action::Create {
            project,
            summary,
            priority,
            assignee,
            acceptance_criteria,
        } => {
            let issue = NewIssue {
                project: project.clone(),
                summary: summary.clone(),
                priority: priority.clone(),
                assignee: assignee.clone(),
                acceptance_criteria: acceptance_criteria.clone(),
            };
            client.create_issue(&issue).await
        }
        Action::Assign {
            issue, assignee, ..
        } => client.assign_issue(issue, assignee).await,
        Action::Transition { issue, status, .. } => client.transition_issue(issue, status).await,
        Action::Comment { issue, text, .. } => client.comment_on_issue(issue, text).await,
        Action::QueryUpdates {
            project,
            since,
            user,
        } => client.query_updates(project, since, user.as_deref()).await,
    }
}
