//! `projectdesk-session` library crate.
//!
//! The stateful half of the project desk: the draft lifecycle controller,
//! the shared roster cache, the confirmation port, and the operator
//! notification log. The `projectdesk` binary entrypoint lives in `main.rs`.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod notify;
pub mod roster_cache;

pub use controller::{CommitOutcome, DraftController, DraftMode, MemberBatchOutcome};
pub use error::{SessionError, SessionResult};
