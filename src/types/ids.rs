//! Newtype wrappers for tracker identifiers.
//!
//! These types prevent accidental mixing of project keys and issue keys, and
//! make the `<PROJECT>-<number>` shape of an issue key a construction-time
//! guarantee rather than something every caller re-checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A tracker project key, e.g. `OPS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(pub String);

impl ProjectKey {
    pub fn new(s: impl Into<String>) -> Self {
        ProjectKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectKey {
    fn from(s: &str) -> Self {
        ProjectKey(s.to_string())
    }
}

/// Error returned when a string is not of the form `<PROJECT>-<number>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid issue key: {0:?}")]
pub struct InvalidIssueKey(pub String);

/// A tracker issue key, e.g. `OPS-42`.
///
/// Always of the form `<PROJECT>-<number>`, where the project part is a
/// non-empty run of word characters and the number part is non-empty ASCII
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Parses an issue key, rejecting anything not shaped `<PROJECT>-<number>`.
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidIssueKey> {
        let s = s.into();
        let valid = match s.split_once('-') {
            Some((project, number)) => {
                !project.is_empty()
                    && project.chars().all(|c| c.is_alphanumeric() || c == '_')
                    && !number.is_empty()
                    && number.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        };
        if valid {
            Ok(IssueKey(s))
        } else {
            Err(InvalidIssueKey(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the project key this issue belongs to (the part before `-`).
    pub fn project(&self) -> ProjectKey {
        // Construction guarantees exactly one '-'.
        let (project, _) = self.0.split_once('-').unwrap_or((&self.0, ""));
        ProjectKey::new(project)
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for IssueKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IssueKey::parse(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod issue_key {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn project_is_prefix(project in "[A-Z][A-Z0-9]{0,9}", n in 1u32..100_000) {
                let key = IssueKey::parse(format!("{}-{}", project, n)).unwrap();
                prop_assert_eq!(key.project(), ProjectKey::new(project));
            }

            #[test]
            fn parse_never_panics(s: String) {
                let _ = IssueKey::parse(s);
            }
        }

        #[test]
        fn derives_project() {
            let key = IssueKey::parse("ABC-123").unwrap();
            assert_eq!(key.project().as_str(), "ABC");
            assert_eq!(key.to_string(), "ABC-123");
        }

        #[test]
        fn rejects_malformed() {
            for bad in ["ABC", "ABC-", "-123", "ABC-12a", "AB C-1", "ABC-1-2", ""] {
                assert!(IssueKey::parse(bad).is_err(), "{bad:?} should be rejected");
            }
        }

        #[test]
        fn deserialize_validates() {
            let ok: IssueKey = serde_json::from_str("\"OPS-7\"").unwrap();
            assert_eq!(ok.as_str(), "OPS-7");
            assert!(serde_json::from_str::<IssueKey>("\"OPS\"").is_err());
        }
    }

    #[test]
    fn project_key_display() {
        assert_eq!(ProjectKey::from("OPS").to_string(), "OPS");
    }
}
