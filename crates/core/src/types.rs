use std::fmt;

use serde::{Deserialize, Serialize};

/// Project dates are calendar days without a time component.
pub type Date = chrono::NaiveDate;

/// Opaque team member identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current calendar day (UTC). The single "now" used when deriving statuses.
pub fn today() -> Date {
    chrono::Utc::now().date_naive()
}
