//! Project record model and its closed enumerations.
//!
//! [`ProjectRecord`] doubles as the draft shape edited in the form: text
//! fields hold exactly what was typed, dates are optional until picked, and
//! billing hours stay a raw string until validation parses them. Serde keys
//! follow the persistence collaborator's camelCase wire names.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::status::{self, ProjectStatus};
use crate::types::{Date, MemberId};

// ---------------------------------------------------------------------------
// Project type
// ---------------------------------------------------------------------------

/// Kind of engagement a project represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectType {
    #[default]
    BasedOnClient,
    InternalProject,
    ResearchAndDevelopment,
    Maintenance,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        Self::BasedOnClient,
        Self::InternalProject,
        Self::ResearchAndDevelopment,
        Self::Maintenance,
    ];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid project type '{s}'")))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasedOnClient => "Based on client",
            Self::InternalProject => "Internal project",
            Self::ResearchAndDevelopment => "Research & Development",
            Self::Maintenance => "Maintenance",
        }
    }
}

// ---------------------------------------------------------------------------
// Project manager
// ---------------------------------------------------------------------------

/// Known project managers. `Unselected` is the blank-form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectManager {
    #[default]
    Unselected,
    PrajwalSalunkhe,
    SachinT,
    RahulPS,
    TusharR,
}

impl ProjectManager {
    /// Selectable managers, excluding `Unselected`.
    pub const ALL: [ProjectManager; 4] = [
        Self::PrajwalSalunkhe,
        Self::SachinT,
        Self::RahulPS,
        Self::TusharR,
    ];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() {
            return Ok(Self::Unselected);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid project manager '{s}'")))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unselected => "",
            Self::PrajwalSalunkhe => "Prajwal Salunkhe",
            Self::SachinT => "Sachin T",
            Self::RahulPS => "Rahul P S",
            Self::TusharR => "Tushar R",
        }
    }
}

// ---------------------------------------------------------------------------
// Department
// ---------------------------------------------------------------------------

/// Owning department. `Unselected` is the "Select Department" sentinel and is
/// never a valid value for a committed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Department {
    #[default]
    Unselected,
    It,
    Marketing,
    Sales,
    Hr,
    Finance,
}

impl Department {
    /// Selectable departments, excluding `Unselected`.
    pub const ALL: [Department; 5] = [
        Self::It,
        Self::Marketing,
        Self::Sales,
        Self::Hr,
        Self::Finance,
    ];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() {
            return Ok(Self::Unselected);
        }
        Self::ALL.into_iter().find(|d| d.as_str() == s).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid department '{s}'. Must be one of: IT, Marketing, Sales, HR, Finance"
            ))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unselected => "",
            Self::It => "IT",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
            Self::Hr => "HR",
            Self::Finance => "Finance",
        }
    }

    pub fn is_selected(&self) -> bool {
        *self != Self::Unselected
    }
}

macro_rules! label_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = CoreError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

label_conversions!(ProjectType, ProjectManager, Department);

// ---------------------------------------------------------------------------
// Company logo
// ---------------------------------------------------------------------------

/// A logo picked locally and not yet transmitted.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for LogoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Reference to a project's company logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoRef {
    /// Bytes waiting to travel with the next submit.
    Upload(LogoUpload),
    /// Location returned by the collaborator for a stored logo.
    Remote(String),
}

impl Serialize for LogoRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogoRef::Upload(upload) => serializer.serialize_str(&upload.file_name),
            LogoRef::Remote(url) => serializer.serialize_str(url),
        }
    }
}

impl<'de> Deserialize<'de> for LogoRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(LogoRef::Remote)
    }
}

// ---------------------------------------------------------------------------
// Project record
// ---------------------------------------------------------------------------

/// A project as held in the catalog, or a draft being edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Identifier assigned by the collaborator; `None` until first persisted.
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub client_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<LogoRef>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(rename = "typeOfProject", default)]
    pub project_type: ProjectType,
    #[serde(rename = "pvProjectManager", default)]
    pub project_manager: ProjectManager,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub end_date: Option<Date>,
    #[serde(default, deserialize_with = "wire::lenient_hours")]
    pub allotted_billing_hours: String,
    #[serde(default)]
    pub department: Department,
    #[serde(rename = "teamMembers", default, deserialize_with = "wire::member_refs")]
    pub team_member_ids: Vec<MemberId>,
}

impl ProjectRecord {
    /// A record with every field at its blank/default value.
    pub fn blank() -> Self {
        Self::default()
    }

    /// True when no scalar field differs from its blank value and no team
    /// member is selected. Whitespace-only text counts as blank.
    pub fn is_blank(&self) -> bool {
        self.client_code.trim().is_empty()
            && self.company_logo.is_none()
            && self.company_name.trim().is_empty()
            && self.project_name.trim().is_empty()
            && self.project_type == ProjectType::default()
            && self.project_manager == ProjectManager::default()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.allotted_billing_hours.trim().is_empty()
            && self.department == Department::default()
            && self.team_member_ids.is_empty()
    }

    /// Select `id` if it is not assigned yet, otherwise unselect it.
    pub fn toggle_team_member(&mut self, id: MemberId) {
        if let Some(pos) = self.team_member_ids.iter().position(|m| *m == id) {
            self.team_member_ids.remove(pos);
        } else {
            self.team_member_ids.push(id);
        }
    }

    /// Lifecycle status of this record on day `today`.
    pub fn status_at(&self, today: Date) -> ProjectStatus {
        status::resolve_open(today, self.start_date, self.end_date)
    }
}

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

mod wire {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    use crate::types::{Date, MemberId};

    /// Accepts `null`, `""`, `YYYY-MM-DD`, or an RFC 3339 timestamp.
    pub fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = Date::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|ts| Some(ts.date_naive()))
            .map_err(|e| D::Error::custom(format!("invalid date '{raw}': {e}")))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hours {
        Text(String),
        Number(serde_json::Number),
    }

    /// Billing hours arrive as either a JSON string or a JSON number.
    pub fn lenient_hours<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Option::<Hours>::deserialize(d)? {
            Some(Hours::Text(s)) => s,
            Some(Hours::Number(n)) => n.to_string(),
            None => String::new(),
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MemberRef {
        Id(MemberId),
        Populated {
            #[serde(rename = "_id", alias = "id")]
            id: MemberId,
        },
    }

    /// Team members arrive as bare ids or as populated member objects.
    /// Repeated ids collapse to their first occurrence.
    pub fn member_refs<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<MemberId>, D::Error> {
        let refs = Option::<Vec<MemberRef>>::deserialize(d)?.unwrap_or_default();
        let mut ids: Vec<MemberId> = Vec::with_capacity(refs.len());
        for r in refs {
            let id = match r {
                MemberRef::Id(id) | MemberRef::Populated { id } => id,
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
