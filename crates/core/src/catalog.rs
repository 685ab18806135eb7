//! Catalog filtering, search, and sorting.
//!
//! Everything here is a pure function over a borrowed slice of records.
//! Statuses are derived on the fly from a single "today" captured once per
//! query, so every row in one result is judged against the same day.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::{Department, ProjectRecord};
use crate::status::ProjectStatus;
use crate::types::{self, Date};

// ---------------------------------------------------------------------------
// Sort specification
// ---------------------------------------------------------------------------

/// Record fields the catalog can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    ProjectName,
    CompanyName,
    ClientCode,
    Department,
    #[serde(rename = "typeOfProject")]
    ProjectType,
    #[serde(rename = "pvProjectManager")]
    ProjectManager,
    AllottedBillingHours,
    StartDate,
    EndDate,
}

impl SortField {
    /// Parse a camelCase record field name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "projectName" => Ok(Self::ProjectName),
            "companyName" => Ok(Self::CompanyName),
            "clientCode" => Ok(Self::ClientCode),
            "department" => Ok(Self::Department),
            "typeOfProject" => Ok(Self::ProjectType),
            "pvProjectManager" => Ok(Self::ProjectManager),
            "allottedBillingHours" => Ok(Self::AllottedBillingHours),
            "startDate" => Ok(Self::StartDate),
            "endDate" => Ok(Self::EndDate),
            _ => Err(CoreError::Validation(format!("Cannot sort by unknown field '{s}'"))),
        }
    }

    /// Compare two records on this field, ascending.
    ///
    /// Date fields compare as days (a missing date sorts first); every other
    /// field compares its stored text byte-wise, so case matters.
    fn compare(self, a: &ProjectRecord, b: &ProjectRecord) -> Ordering {
        match self {
            Self::StartDate => a.start_date.cmp(&b.start_date),
            Self::EndDate => a.end_date.cmp(&b.end_date),
            Self::ProjectName => a.project_name.cmp(&b.project_name),
            Self::CompanyName => a.company_name.cmp(&b.company_name),
            Self::ClientCode => a.client_code.cmp(&b.client_code),
            Self::Department => a.department.as_str().cmp(b.department.as_str()),
            Self::ProjectType => a.project_type.as_str().cmp(b.project_type.as_str()),
            Self::ProjectManager => a.project_manager.as_str().cmp(b.project_manager.as_str()),
            Self::AllottedBillingHours => a.allotted_billing_hours.cmp(&b.allotted_billing_hours),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active ordering of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Select a column: the same field flips direction, a new field starts
    /// ascending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusion filters. Every `None` matches all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub department: Option<Department>,
    pub status: Option<ProjectStatus>,
}

impl FilterCriteria {
    /// Build criteria from raw filter inputs where `""` means "any".
    pub fn from_raw(search: &str, department: &str, status: &str) -> Result<Self, CoreError> {
        let search_text = (!search.is_empty()).then(|| search.to_string());
        let department = Some(Department::parse(department)?).filter(Department::is_selected);
        let status = if status.is_empty() {
            None
        } else {
            Some(ProjectStatus::parse(status)?)
        };
        Ok(Self {
            search_text,
            department,
            status,
        })
    }

    fn matches(&self, record: &ProjectRecord, today: Date) -> bool {
        if let Some(term) = self.search_text.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = [&record.project_name, &record.company_name, &record.client_code]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(department) = self.department.filter(Department::is_selected) {
            if record.department != department {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status_at(today) != status {
                return false;
            }
        }

        true
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Catalog indices of the records that pass `criteria`, ordered by `sort`.
///
/// The sort is stable in both directions: records with equal keys keep
/// their catalog order.
pub fn query_indices_at(
    records: &[ProjectRecord],
    criteria: &FilterCriteria,
    sort: SortSpec,
    today: Date,
) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r, today))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        let ord = sort.field.compare(&records[a], &records[b]);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    indices
}

/// Filtered and sorted view of `records`, judged against `today`.
pub fn query_at<'a>(
    records: &'a [ProjectRecord],
    criteria: &FilterCriteria,
    sort: SortSpec,
    today: Date,
) -> Vec<&'a ProjectRecord> {
    query_indices_at(records, criteria, sort, today)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Filtered and sorted view of `records` as of the current day.
pub fn query<'a>(
    records: &'a [ProjectRecord],
    criteria: &FilterCriteria,
    sort: SortSpec,
) -> Vec<&'a ProjectRecord> {
    query_at(records, criteria, sort, types::today())
}

/// Distinct selected departments present in the catalog, first-seen order.
pub fn departments(records: &[ProjectRecord]) -> Vec<Department> {
    let mut seen = Vec::new();
    for department in records.iter().map(|r| r.department) {
        if department.is_selected() && !seen.contains(&department) {
            seen.push(department);
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Human-readable length of a project window.
///
/// Under 30 days in days, under a year in 30-day months, otherwise in
/// 365-day years. Month and year counts are rounded to nearest.
pub fn format_duration(start: Date, end: Date) -> String {
    let days = (end - start).num_days().unsigned_abs();
    if days < 30 {
        format!("{days} days")
    } else if days < 365 {
        format!("{} months", (days as f64 / 30.0).round() as u64)
    } else {
        format!("{} years", (days as f64 / 365.0).round() as u64)
    }
}

/// Short display form of a date, e.g. `Jan 5, 2024`.
pub fn format_date(date: Date) -> String {
    date.format("%b %-d, %Y").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
