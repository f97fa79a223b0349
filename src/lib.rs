//! Teams/Jira bridge - turns chat commands into Jira REST calls.
//!
//! This library provides the command parser, the Jira client, the chat
//! notifier and the HTTP server that ties them together.

pub mod commands;
pub mod config;
pub mod jira;
pub mod server;
pub mod teams;
pub mod types;
pub mod webhooks;
