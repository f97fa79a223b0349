//! Core domain types for the bridge.

pub mod ids;

pub use ids::{InvalidIssueKey, IssueKey, ProjectKey};
