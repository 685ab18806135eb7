//! Command-line arguments for the `projectdesk` binary and the plain-text
//! row format it prints.

use clap::Parser;

use projectdesk_core::catalog::{format_date, format_duration, FilterCriteria, SortField, SortSpec};
use projectdesk_core::project::Department;
use projectdesk_core::status::ProjectStatus;

use crate::controller::CatalogRow;

/// Print the project catalog, filtered and sorted.
#[derive(Debug, Clone, Parser)]
#[command(name = "projectdesk")]
pub struct CliArgs {
    /// Case-insensitive text matched against project name, company name and
    /// client code.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Only show one department (IT, Marketing, Sales, HR, Finance).
    #[arg(long, value_parser = Department::parse)]
    pub department: Option<Department>,

    /// Only show one status (Upcoming, Active, Completed).
    #[arg(long, value_parser = ProjectStatus::parse)]
    pub status: Option<ProjectStatus>,

    /// Sort field, e.g. `projectName` or `endDate`. May repeat; naming the
    /// same field twice in a row flips its direction.
    #[arg(long, value_parser = SortField::parse)]
    pub sort: Vec<SortField>,
}

impl CliArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_text: (!self.search.is_empty()).then(|| self.search.clone()),
            department: self.department.filter(Department::is_selected),
            status: self.status,
        }
    }

    /// Apply each `--sort` in order to the default ordering.
    pub fn sort_spec(&self) -> SortSpec {
        let mut spec = SortSpec::default();
        for field in &self.sort {
            spec.select(*field);
        }
        spec
    }
}

/// `name | company | department | status | start → end | duration`
pub fn format_row(row: &CatalogRow<'_>) -> String {
    let r = row.record;
    let window = match (r.start_date, r.end_date) {
        (Some(start), Some(end)) => format!(
            "{} → {} | {}",
            format_date(start),
            format_date(end),
            format_duration(start, end)
        ),
        (Some(start), None) => format!("{} → ? | -", format_date(start)),
        (None, Some(end)) => format!("? → {} | -", format_date(end)),
        (None, None) => "? → ? | -".to_string(),
    };
    format!(
        "{} | {} | {} | {} | {}",
        r.project_name, r.company_name, r.department, row.status, window
    )
}
