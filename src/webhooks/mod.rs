//! Inbound webhook authorization.

pub mod secret;

pub use secret::{
    HEADER_JIRA_SECRET, HEADER_TEAMS_SECRET, SecretQuery, provided_secret, verify_secret,
};
