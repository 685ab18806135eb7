//! Draft validation and the per-field error report.
//!
//! Validation runs on submit only. Between submits, editing a field clears
//! that field's error slot and leaves every other slot untouched.

use serde::Serialize;

use crate::project::{Department, LogoRef, ProjectManager, ProjectRecord, ProjectType};
use crate::types::{Date, MemberId};

// ---------------------------------------------------------------------------
// Message constants
// ---------------------------------------------------------------------------

pub const MSG_CLIENT_CODE_REQUIRED: &str = "Client Code is required";
pub const MSG_COMPANY_NAME_REQUIRED: &str = "Company Name is required";
pub const MSG_PROJECT_NAME_REQUIRED: &str = "Project Name is required";
pub const MSG_START_DATE_REQUIRED: &str = "Start Date is required";
pub const MSG_END_DATE_REQUIRED: &str = "End Date is required";
pub const MSG_END_BEFORE_START: &str = "End Date must be after Start Date";
pub const MSG_HOURS_REQUIRED: &str = "Allotted Billing Hours is required";
pub const MSG_HOURS_INVALID: &str = "Please enter a valid number greater than 0";
pub const MSG_DEPARTMENT_REQUIRED: &str = "Department is required";

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// Fields that carry a validation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    ClientCode,
    CompanyName,
    ProjectName,
    StartDate,
    EndDate,
    AllottedBillingHours,
    Department,
}

impl FormField {
    pub const COUNT: usize = 7;

    pub const ALL: [FormField; Self::COUNT] = [
        Self::ClientCode,
        Self::CompanyName,
        Self::ProjectName,
        Self::StartDate,
        Self::EndDate,
        Self::AllottedBillingHours,
        Self::Department,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientCode => "clientCode",
            Self::CompanyName => "companyName",
            Self::ProjectName => "projectName",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::AllottedBillingHours => "allottedBillingHours",
            Self::Department => "department",
        }
    }
}

// ---------------------------------------------------------------------------
// Error report
// ---------------------------------------------------------------------------

/// One optional message per [`FormField`]. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    slots: [Option<String>; FormField::COUNT],
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.is_valid()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.slots[field.slot()].as_deref()
    }

    pub fn set(&mut self, field: FormField, message: impl Into<String>) {
        self.slots[field.slot()] = Some(message.into());
    }

    pub fn clear(&mut self, field: FormField) {
        self.slots[field.slot()] = None;
    }

    /// Errors in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|msg| (f, msg)))
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, msg) in self.iter() {
            map.serialize_entry(field.as_str(), msg)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Evaluate every rule against `draft`.
pub fn validate(draft: &ProjectRecord) -> ErrorReport {
    let mut report = ErrorReport::new();

    if draft.client_code.trim().is_empty() {
        report.set(FormField::ClientCode, MSG_CLIENT_CODE_REQUIRED);
    }
    if draft.company_name.trim().is_empty() {
        report.set(FormField::CompanyName, MSG_COMPANY_NAME_REQUIRED);
    }
    if draft.project_name.trim().is_empty() {
        report.set(FormField::ProjectName, MSG_PROJECT_NAME_REQUIRED);
    }

    if draft.start_date.is_none() {
        report.set(FormField::StartDate, MSG_START_DATE_REQUIRED);
    }
    if draft.end_date.is_none() {
        report.set(FormField::EndDate, MSG_END_DATE_REQUIRED);
    }
    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if start >= end {
            report.set(FormField::EndDate, MSG_END_BEFORE_START);
        }
    }

    let hours = draft.allotted_billing_hours.trim();
    if hours.is_empty() {
        report.set(FormField::AllottedBillingHours, MSG_HOURS_REQUIRED);
    } else if parse_billing_hours(hours).is_none() {
        report.set(FormField::AllottedBillingHours, MSG_HOURS_INVALID);
    }

    if !draft.department.is_selected() {
        report.set(FormField::Department, MSG_DEPARTMENT_REQUIRED);
    }

    report
}

/// Parse billing hours as a finite number strictly greater than zero.
pub fn parse_billing_hours(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h > 0.0)
}

// ---------------------------------------------------------------------------
// Draft form
// ---------------------------------------------------------------------------

/// A single-field edit applied to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    ClientCode(String),
    CompanyLogo(Option<LogoRef>),
    CompanyName(String),
    ProjectName(String),
    ProjectType(ProjectType),
    ProjectManager(ProjectManager),
    StartDate(Option<Date>),
    EndDate(Option<Date>),
    AllottedBillingHours(String),
    Department(Department),
    ToggleTeamMember(MemberId),
}

impl FieldEdit {
    /// The validation slot this edit touches, if any.
    pub fn field(&self) -> Option<FormField> {
        match self {
            Self::ClientCode(_) => Some(FormField::ClientCode),
            Self::CompanyName(_) => Some(FormField::CompanyName),
            Self::ProjectName(_) => Some(FormField::ProjectName),
            Self::StartDate(_) => Some(FormField::StartDate),
            Self::EndDate(_) => Some(FormField::EndDate),
            Self::AllottedBillingHours(_) => Some(FormField::AllottedBillingHours),
            Self::Department(_) => Some(FormField::Department),
            Self::CompanyLogo(_)
            | Self::ProjectType(_)
            | Self::ProjectManager(_)
            | Self::ToggleTeamMember(_) => None,
        }
    }
}

/// A draft record together with the report from the last submit attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftForm {
    record: ProjectRecord,
    errors: ErrorReport,
}

impl DraftForm {
    pub fn new(record: ProjectRecord) -> Self {
        Self {
            record,
            errors: ErrorReport::new(),
        }
    }

    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorReport {
        &self.errors
    }

    pub fn into_record(self) -> ProjectRecord {
        self.record
    }

    /// Apply one edit and clear only the touched field's error.
    pub fn apply(&mut self, edit: FieldEdit) {
        if let Some(field) = edit.field() {
            self.errors.clear(field);
        }

        let r = &mut self.record;
        match edit {
            FieldEdit::ClientCode(v) => r.client_code = v,
            FieldEdit::CompanyLogo(v) => r.company_logo = v,
            FieldEdit::CompanyName(v) => r.company_name = v,
            FieldEdit::ProjectName(v) => r.project_name = v,
            FieldEdit::ProjectType(v) => r.project_type = v,
            FieldEdit::ProjectManager(v) => r.project_manager = v,
            FieldEdit::StartDate(v) => r.start_date = v,
            FieldEdit::EndDate(v) => r.end_date = v,
            FieldEdit::AllottedBillingHours(v) => r.allotted_billing_hours = v,
            FieldEdit::Department(v) => r.department = v,
            FieldEdit::ToggleTeamMember(id) => r.toggle_team_member(id),
        }
    }

    /// Re-evaluate every rule, store the report, and return whether it passed.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.record);
        self.errors.is_valid()
    }

    /// Reset to a blank record with no errors.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn valid_draft() -> ProjectRecord {
        ProjectRecord {
            client_code: "AC-1".into(),
            company_name: "Acme".into(),
            project_name: "Portal".into(),
            start_date: Some(d(2024, 1, 10)),
            end_date: Some(d(2024, 1, 20)),
            allotted_billing_hours: "40.5".into(),
            department: Department::It,
            ..ProjectRecord::blank()
        }
    }

    #[test]
    fn complete_draft_is_valid() {
        assert!(validate(&valid_draft()).is_valid());
    }

    #[test]
    fn blank_draft_reports_every_required_field() {
        let report = validate(&ProjectRecord::blank());
        assert_eq!(report.len(), 7);
        assert_eq!(report.get(FormField::ClientCode), Some(MSG_CLIENT_CODE_REQUIRED));
        assert_eq!(report.get(FormField::EndDate), Some(MSG_END_DATE_REQUIRED));
        assert_eq!(report.get(FormField::AllottedBillingHours), Some(MSG_HOURS_REQUIRED));
        assert_eq!(report.get(FormField::Department), Some(MSG_DEPARTMENT_REQUIRED));
    }

    #[test]
    fn whitespace_names_are_rejected() {
        let draft = ProjectRecord {
            company_name: "  \t".into(),
            ..valid_draft()
        };
        let report = validate(&draft);
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(FormField::CompanyName), Some(MSG_COMPANY_NAME_REQUIRED));
    }

    #[test]
    fn equal_dates_attach_error_to_end_date() {
        let draft = ProjectRecord {
            end_date: Some(d(2024, 1, 10)),
            ..valid_draft()
        };
        let report = validate(&draft);
        assert_eq!(report.get(FormField::StartDate), None);
        assert_eq!(report.get(FormField::EndDate), Some(MSG_END_BEFORE_START));
    }

    #[test]
    fn reversed_dates_attach_error_to_end_date() {
        let draft = ProjectRecord {
            start_date: Some(d(2024, 2, 1)),
            ..valid_draft()
        };
        assert_eq!(validate(&draft).get(FormField::EndDate), Some(MSG_END_BEFORE_START));
    }

    #[test]
    fn billing_hours_must_be_positive_number() {
        for bad in ["0", "-3", "abc", "NaN", "inf", "12h"] {
            let draft = ProjectRecord {
                allotted_billing_hours: bad.into(),
                ..valid_draft()
            };
            assert_eq!(
                validate(&draft).get(FormField::AllottedBillingHours),
                Some(MSG_HOURS_INVALID),
                "{bad} should be rejected"
            );
        }
        assert_eq!(parse_billing_hours(" 0.25 "), Some(0.25));
    }

    #[test]
    fn report_iterates_in_declaration_order() {
        let mut report = ErrorReport::new();
        report.set(FormField::Department, "d");
        report.set(FormField::ClientCode, "c");
        let fields: Vec<_> = report.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![FormField::ClientCode, FormField::Department]);
    }

    #[test]
    fn report_serializes_as_field_map() {
        let mut report = ErrorReport::new();
        report.set(FormField::EndDate, MSG_END_BEFORE_START);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value, serde_json::json!({ "endDate": MSG_END_BEFORE_START }));
    }

    #[test]
    fn editing_clears_only_the_touched_field() {
        let mut form = DraftForm::new(ProjectRecord::blank());
        assert!(!form.validate());
        assert_eq!(form.errors().len(), 7);

        form.apply(FieldEdit::ClientCode("X".into()));
        assert_eq!(form.errors().get(FormField::ClientCode), None);
        assert_eq!(form.errors().len(), 6);

        // Clearing is not re-validation: an invalid value still clears its slot.
        form.apply(FieldEdit::AllottedBillingHours("-1".into()));
        assert_eq!(form.errors().get(FormField::AllottedBillingHours), None);
        assert_eq!(form.errors().len(), 5);
    }

    #[test]
    fn edits_without_a_slot_keep_the_report() {
        let mut form = DraftForm::new(ProjectRecord::blank());
        form.validate();
        form.apply(FieldEdit::ProjectType(ProjectType::Maintenance));
        form.apply(FieldEdit::ToggleTeamMember(MemberId::new("m1")));
        assert_eq!(form.errors().len(), 7);
        assert_eq!(form.record().team_member_ids, vec![MemberId::new("m1")]);
    }

    #[test]
    fn validate_then_clear_resets_everything() {
        let mut form = DraftForm::new(valid_draft());
        assert!(form.validate());
        form.clear();
        assert!(form.record().is_blank());
        assert!(form.errors().is_valid());
    }
}
