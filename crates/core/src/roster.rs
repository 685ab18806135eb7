//! Team roster types and batch deduplication.
//!
//! New members are always added in batches. A batch is checked against
//! itself and against the current roster before anything is sent to the
//! persistence collaborator, and it is accepted or rejected as a whole.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::MemberId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A committed roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id", alias = "id")]
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
}

impl TeamMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A roster entry as typed into the add-members form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
}

impl NewMember {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    fn trimmed(&self) -> NewMember {
        NewMember::new(self.first_name.trim(), self.last_name.trim())
    }
}

/// Case-insensitive identity of a person on the roster.
///
/// Kept as a pair rather than a joined string so that no name content can
/// collide with a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey(String, String);

impl DedupeKey {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self(
            first_name.trim().to_lowercase(),
            last_name.trim().to_lowercase(),
        )
    }
}

// ---------------------------------------------------------------------------
// Batch validation
// ---------------------------------------------------------------------------

/// Outcome of validating a batch of new members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchValidation {
    /// Trimmed entries to forward. Empty whenever `errors` is non-empty.
    pub accepted: Vec<NewMember>,
    /// Every violation, in entry order.
    pub errors: Vec<String>,
}

impl BatchValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors joined for a single notification.
    pub fn summary(&self) -> String {
        self.errors.join(", ")
    }
}

/// Validate `entries` against each other and against `existing`.
///
/// Per entry (1-based `N`), in this order:
/// - `Member N: First Name is required`
/// - `Member N: Last Name is required`
/// - `Member N: Duplicate name in form` for the second and later occurrence
///   of a key within the batch
/// - `Member N: Already exists in database` for a key already on the roster
pub fn validate_batch(entries: &[NewMember], existing: &[TeamMember]) -> BatchValidation {
    let roster: HashSet<DedupeKey> = existing
        .iter()
        .map(|m| DedupeKey::new(&m.first_name, &m.last_name))
        .collect();

    let mut seen: HashSet<DedupeKey> = HashSet::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;

        if entry.first_name.trim().is_empty() {
            errors.push(format!("Member {n}: First Name is required"));
        }
        if entry.last_name.trim().is_empty() {
            errors.push(format!("Member {n}: Last Name is required"));
        }

        let key = DedupeKey::new(&entry.first_name, &entry.last_name);
        if !seen.insert(key.clone()) {
            errors.push(format!("Member {n}: Duplicate name in form"));
        }
        if roster.contains(&key) {
            errors.push(format!("Member {n}: Already exists in database"));
        }
    }

    if !errors.is_empty() {
        return BatchValidation {
            accepted: Vec::new(),
            errors,
        };
    }

    let accepted = entries
        .iter()
        .map(NewMember::trimmed)
        .filter(|m| !m.first_name.is_empty() && !m.last_name.is_empty())
        .collect();

    BatchValidation {
        accepted,
        errors,
    }
}

/// Display names of the selected ids, skipping ids not on the roster.
pub fn selected_names(ids: &[MemberId], roster: &[TeamMember]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| roster.iter().find(|m| m.id == *id))
        .map(TeamMember::full_name)
        .collect()
}

/// Ids from `ids` that do not reference any roster member.
pub fn unknown_member_ids<'a>(ids: &'a [MemberId], roster: &[TeamMember]) -> Vec<&'a MemberId> {
    ids.iter()
        .filter(|id| !roster.iter().any(|m| m.id == **id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
