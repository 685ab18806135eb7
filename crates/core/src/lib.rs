//! Domain logic for registering and browsing projects.
//!
//! Pure functions and plain data only: no I/O, no runtime. The persistence
//! collaborator is reached through the [`store::ProjectStore`] trait.

pub mod catalog;
pub mod error;
pub mod project;
pub mod roster;
pub mod status;
pub mod store;
pub mod types;
pub mod upload;
pub mod validation;
