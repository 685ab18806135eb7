use projectdesk_core::error::CoreError;
use projectdesk_core::upload::LogoRejection;

/// Errors from driving the draft controller in a way its current state does
/// not allow.
///
/// Collaborator failures are not represented here: they are reported as
/// notifications and returned as outcome data.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A domain-level error from `projectdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The operation needs an open draft.
    #[error("No draft is open")]
    NoDraft,

    /// A submit for this controller has not finished yet.
    #[error("A submit is already in progress")]
    SubmitInFlight,

    /// The picked logo file was refused.
    #[error(transparent)]
    Logo(#[from] LogoRejection),
}

/// Convenience alias for controller results.
pub type SessionResult<T> = Result<T, SessionError>;
