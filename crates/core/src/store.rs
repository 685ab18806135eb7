//! Persistence port for projects and the team roster.
//!
//! The concrete collaborator lives outside `core` (see `projectdesk-client`
//! for the HTTP one). This module owns the trait, its error type, and the
//! response envelope every collaborator endpoint shares.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::project::ProjectRecord;
use crate::roster::{NewMember, TeamMember};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The collaborator answered with a structured failure.
    #[error("{message}")]
    Rejected { message: String },

    /// The call never produced a usable answer (network, timeout, 5xx).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The answer could not be understood.
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

impl StoreError {
    /// Message to show the operator. Only collaborator-authored rejection
    /// text is shown verbatim; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StoreError::Rejected { message } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// The persistence collaborator.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Current roster.
    async fn fetch_roster(&self) -> Result<Vec<TeamMember>, StoreError>;

    /// Add already-validated members. Returns the members created.
    async fn add_roster_batch(&self, members: &[NewMember]) -> Result<Vec<TeamMember>, StoreError>;

    /// Persist a new or edited project, including any pending logo upload.
    /// Returns the record as stored.
    async fn submit_project(&self, record: &ProjectRecord) -> Result<ProjectRecord, StoreError>;

    /// Every committed project.
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// One entry of a structured `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

/// Shape shared by every collaborator response:
/// `{success, data}`, `{success: false, message}`,
/// `{success: false, errors: [{msg}]}`, or `{error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorItem>>,
}

impl<T> Envelope<T> {
    /// Collapse the envelope into its payload or a [`StoreError`].
    ///
    /// `success` may be omitted (the project list omits it); a response is a
    /// failure when `success` is `false` or when it carries an error without
    /// data.
    pub fn into_result(self) -> Result<Option<T>, StoreError> {
        let failed = self.success == Some(false)
            || (self.data.is_none() && (self.error.is_some() || self.errors.is_some()));
        if failed {
            return Err(StoreError::Rejected {
                message: self.failure_message(),
            });
        }
        Ok(self.data)
    }

    /// Best available failure text: joined `errors[].msg`, then `message`,
    /// then `error`.
    pub fn failure_message(&self) -> String {
        if let Some(items) = self.errors.as_ref().filter(|items| !items.is_empty()) {
            return items
                .iter()
                .map(|e| e.msg.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
