//! HTTP implementation of the project persistence collaborator.
//!
//! Talks to the project backend's REST endpoints using [`reqwest`]:
//!
//! | Operation          | Request                                      |
//! |--------------------|----------------------------------------------|
//! | fetch roster       | `GET  {base}/team-members`                   |
//! | add roster batch   | `POST {base}/team-members/batch` (JSON)      |
//! | submit project     | `POST {base}/projects` (multipart/form-data) |
//! | list projects      | `GET  {base}/projects`                       |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use projectdesk_core::project::{LogoRef, ProjectRecord};
use projectdesk_core::roster::{NewMember, TeamMember};
use projectdesk_core::store::{Envelope, ProjectStore, StoreError};
use projectdesk_core::types::Date;

/// HTTP client for one project backend.
pub struct ProjectDeskApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the REST layer, before they are mapped onto [`StoreError`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body
    /// decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Project API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) if e.is_decode() => StoreError::Unexpected(e.to_string()),
            ApiError::Request(e) => StoreError::Transport(e.to_string()),
            ApiError::ApiError { status, body } => {
                // Error responses usually carry the same envelope as
                // successes; prefer its message when there is one.
                let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                    .map(|env| env.failure_message())
                    .unwrap_or_default();
                if message.trim().is_empty() {
                    StoreError::Transport(format!("status {status}: {body}"))
                } else {
                    StoreError::Rejected { message }
                }
            }
        }
    }
}

impl ProjectDeskApi {
    /// Create a client for `base_url` (e.g. `http://localhost:5000/api`)
    /// with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // ---- raw endpoints ----

    /// `GET /team-members`.
    pub async fn get_team_members(&self) -> Result<Envelope<Vec<TeamMember>>, ApiError> {
        let response = self.client.get(self.url("team-members")).send().await?;
        Self::parse_response(response).await
    }

    /// `POST /team-members/batch` with `{ "members": [...] }`.
    pub async fn post_team_members_batch(
        &self,
        members: &[NewMember],
    ) -> Result<Envelope<Vec<TeamMember>>, ApiError> {
        let body = serde_json::json!({ "members": members });
        let response = self
            .client
            .post(self.url("team-members/batch"))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `POST /projects` as multipart form data.
    pub async fn post_project(
        &self,
        record: &ProjectRecord,
    ) -> Result<Envelope<ProjectRecord>, ApiError> {
        let form = project_form(record)?;
        let response = self
            .client
            .post(self.url("projects"))
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `GET /projects`. Rows stay raw so one bad row cannot sink the list;
    /// see [`decode_project_rows`].
    pub async fn get_projects(&self) -> Result<Envelope<Vec<serde_json::Value>>, ApiError> {
        let response = self.client.get(self.url("projects")).send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or capture status and
    /// body text as an [`ApiError::ApiError`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Decode catalog rows one at a time, dropping rows that do not decode.
pub fn decode_project_rows(rows: Vec<serde_json::Value>) -> Vec<ProjectRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(row, value)| match serde_json::from_value::<ProjectRecord>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(row, error = %err, "Skipping undecodable project row");
                None
            }
        })
        .collect()
}

/// Text fields of the project submit form, in submission order.
///
/// Dates travel as `YYYY-MM-DD` (empty when unset) and team members as a
/// JSON-encoded id array. The logo is not included; see [`project_form`].
pub fn form_fields(record: &ProjectRecord) -> Vec<(&'static str, String)> {
    let date = |d: Option<Date>| {
        d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    };
    let ids: Vec<&str> = record.team_member_ids.iter().map(|id| id.as_str()).collect();

    let mut fields = Vec::with_capacity(11);
    if let Some(id) = &record.id {
        fields.push(("_id", id.clone()));
    }
    fields.extend([
        ("clientCode", record.client_code.clone()),
        ("companyName", record.company_name.clone()),
        ("projectName", record.project_name.clone()),
        ("typeOfProject", record.project_type.as_str().to_string()),
        ("pvProjectManager", record.project_manager.as_str().to_string()),
        ("startDate", date(record.start_date)),
        ("endDate", date(record.end_date)),
        ("allottedBillingHours", record.allotted_billing_hours.clone()),
        ("department", record.department.as_str().to_string()),
        (
            "teamMembers",
            serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string()),
        ),
    ]);
    fields
}

/// Build the multipart body. A pending logo upload becomes the
/// `companyLogo` file part; an already-stored logo is left out.
fn project_form(record: &ProjectRecord) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in form_fields(record) {
        form = form.text(name, value);
    }
    if let Some(LogoRef::Upload(upload)) = &record.company_logo {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)?;
        form = form.part("companyLogo", part);
    }
    Ok(form)
}

#[async_trait]
impl ProjectStore for ProjectDeskApi {
    async fn fetch_roster(&self) -> Result<Vec<TeamMember>, StoreError> {
        let envelope = self.get_team_members().await?;
        let members = envelope.into_result()?.unwrap_or_default();
        tracing::debug!(count = members.len(), "Fetched team roster");
        Ok(members)
    }

    async fn add_roster_batch(&self, members: &[NewMember]) -> Result<Vec<TeamMember>, StoreError> {
        let envelope = self.post_team_members_batch(members).await?;
        let created = envelope.into_result()?.unwrap_or_default();
        tracing::info!(
            requested = members.len(),
            created = created.len(),
            "Added team members",
        );
        Ok(created)
    }

    async fn submit_project(&self, record: &ProjectRecord) -> Result<ProjectRecord, StoreError> {
        let envelope = self.post_project(record).await?;
        let stored = match envelope.into_result()? {
            Some(stored) => stored,
            // Some backends acknowledge without echoing the record.
            None => {
                let mut stored = record.clone();
                if matches!(stored.company_logo, Some(LogoRef::Upload(_))) {
                    stored.company_logo = None;
                }
                stored
            }
        };
        tracing::info!(
            project_id = stored.id.as_deref().unwrap_or("-"),
            project_name = %stored.project_name,
            "Project saved",
        );
        Ok(stored)
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let envelope = self.get_projects().await?;
        let rows = envelope.into_result()?.unwrap_or_default();
        let received = rows.len();
        let projects = decode_project_rows(rows);
        tracing::debug!(count = projects.len(), received, "Listed projects");
        Ok(projects)
    }
}
