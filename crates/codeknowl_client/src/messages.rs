//! HTTP message types for the CodeKnowl backend. Client ↔ server JSON.

use serde::{Deserialize, Serialize};

/// Client → server: `POST /qa/ask` body.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

impl<'a> AskRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self { question }
    }
}

/// Server → client: a reference into the indexed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Citation {
    /// `:<start>-<end>` when both bounds are known, otherwise nothing.
    /// Line `0` counts as known, unlike the truthiness check the editor extension used.
    pub fn line_range(&self) -> Option<String> {
        match (self.start_line, self.end_line) {
            (Some(start), Some(end)) => Some(format!(":{}-{}", start, end)),
            _ => None,
        }
    }
}

/// Server → client: `POST /qa/ask` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

impl AskResponse {
    /// Citations in backend order; empty when the field was absent.
    pub fn citations(&self) -> &[Citation] {
        self.citations.as_deref().unwrap_or(&[])
    }
}

/// Server → client: `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
