//! Command parsing for chat messages.
//!
//! This module provides types and parsing for the commands that users send
//! to the bot from a chat channel.
//!
//! # Supported Commands
//!
//! - `create ticket in <PROJECT>: "<summary>"[ priority <word>][ assignee @<handle>][ AC: <text>]`
//! - `assign <PROJECT>-<N> to @<handle>`
//! - `update <PROJECT>-<N>: status <status name>`
//! - `comment <PROJECT>-<N>: "<text>"`
//! - `my updates since <time expression> in <PROJECT>[ for @<handle>]`
//!
//! # Example
//!
//! ```
//! use teams_jira_bridge::commands::{Action, normalize_message, parse_action};
//!
//! let raw = "<at>JT-Agent</at>&nbsp;my updates since -7d in OPS for @jane";
//! let text = normalize_message(raw, "JT-Agent");
//! assert_eq!(
//!     parse_action(&text),
//!     Some(Action::QueryUpdates {
//!         project: "OPS".into(),
//!         since: "-7d".into(),
//!         user: Some("jane".into()),
//!     })
//! );
//! ```

mod normalize;
mod parser;
mod types;

pub use normalize::normalize_message;
pub use parser::{parse_action, parse_action_with_default};
pub use types::Action;
