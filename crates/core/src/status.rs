//! Derived project lifecycle status.
//!
//! A project's status is never stored. It is computed from its date window
//! and the current calendar day every time it is needed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Status enumeration
// ---------------------------------------------------------------------------

/// Lifecycle state of a project relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Upcoming,
    Active,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Upcoming, Self::Active, Self::Completed];

    /// Parse a status label as shown in the status filter.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Upcoming" => Ok(Self::Upcoming),
            "Active" => Ok(Self::Active),
            "Completed" => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: Upcoming, Active, Completed"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve the status of a `[start, end]` window on day `now`.
///
/// Both bounds are inclusive for `Active`: a project is active on its first
/// and on its last day.
pub fn resolve(now: Date, start: Date, end: Date) -> ProjectStatus {
    if now < start {
        ProjectStatus::Upcoming
    } else if now > end {
        ProjectStatus::Completed
    } else {
        ProjectStatus::Active
    }
}

/// Resolve with possibly missing bounds. A missing bound is open-ended.
pub fn resolve_open(now: Date, start: Option<Date>, end: Option<Date>) -> ProjectStatus {
    match (start, end) {
        (Some(start), _) if now < start => ProjectStatus::Upcoming,
        (_, Some(end)) if now > end => ProjectStatus::Completed,
        _ => ProjectStatus::Active,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
