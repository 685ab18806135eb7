//! REST client for the project backend.
//!
//! Provides [`api::ProjectDeskApi`], an implementation of
//! [`projectdesk_core::store::ProjectStore`] over HTTP.

pub mod api;

pub use api::{ApiError, ProjectDeskApi};
