//! Jira API client and action interpreter.
//!
//! This module implements the tracker side of the bridge: authenticated REST
//! calls for creating, assigning, transitioning, commenting on and searching
//! issues, plus the routing from a parsed [`Action`](crate::commands::Action)
//! to those calls.
//!
//! Key properties:
//! - Basic authentication (`user:token`) and JSON on every request
//! - One call per operation, two for transitions (resolve id, then execute)
//! - Failures are returned as [`JiraApiError`] values and never retried

mod client;
mod error;
mod interpreter;
mod requests;

pub use client::{JiraClient, JiraConfig, JiraResponse};
pub use error::JiraApiError;
pub use interpreter::interpret_action;
pub use requests::{NewIssue, due_date, strip_handle, updates_jql};
