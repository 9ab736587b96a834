//! Handles for externally executed long-running jobs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure reported by the job service for a terminal job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(code {}) {}", self.code, self.message)
    }
}

/// Reference to an operation running on the video job service.
///
/// The orchestrator owns a handle exclusively for the duration of polling and
/// replaces it with the fresh handle returned by each poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Operation name, used to re-query status.
    pub name: String,
    /// True once the job reached a terminal state.
    pub done: bool,
    /// Result URIs, populated once done.
    #[serde(default)]
    pub result_uris: Vec<String>,
    /// Failure indication, populated once done if the job failed.
    #[serde(default)]
    pub failure: Option<JobFailure>,
}

impl JobHandle {
    /// Handle for a freshly submitted, still running job.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            result_uris: Vec::new(),
            failure: None,
        }
    }

    /// Terminal handle carrying result URIs.
    pub fn succeeded(name: impl Into<String>, result_uris: Vec<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            result_uris,
            failure: None,
        }
    }

    /// Terminal handle carrying a failure.
    pub fn failed(name: impl Into<String>, failure: JobFailure) -> Self {
        Self {
            name: name.into(),
            done: true,
            result_uris: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Check if this is a terminal state (no more polling is meaningful).
    pub fn is_terminal(&self) -> bool {
        self.done
    }

    /// First result URI, if the job produced one.
    pub fn first_result(&self) -> Option<&str> {
        self.result_uris.first().map(String::as_str)
    }
}
