//! Confirmation port.
//!
//! Destructive steps (discarding a dirty draft, deleting a project) ask the
//! embedding UI for an explicit yes/no through [`ConfirmationPort`] and wait
//! for the answer.

use async_trait::async_trait;

/// What the operator is being asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    /// Close a draft that has unsaved changes.
    DiscardChanges,
    /// Remove a project from the catalog.
    DeleteProject { project_name: String },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            Self::DiscardChanges => {
                "Are you sure you want to close? All unsaved changes will be lost.".to_string()
            }
            Self::DeleteProject { project_name } if project_name.trim().is_empty() => {
                "Are you sure you want to delete this project?".to_string()
            }
            Self::DeleteProject { project_name } => {
                format!("Are you sure you want to delete the project \"{project_name}\"?")
            }
        }
    }
}

#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Resolve to `true` only on an explicit yes.
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}

/// Answers every prompt the same way. Used by non-interactive front ends.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmationPort for FixedAnswer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        tracing::debug!(prompt = %prompt.message(), answer = self.0, "Auto-answered confirmation");
        self.0
    }
}
