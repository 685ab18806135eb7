//! Draft lifecycle controller.
//!
//! Owns the in-memory project catalog and at most one open draft. A draft is
//! either a new record (`Creating`) or a snapshot of `catalog[index]`
//! (`Editing`). Nothing in the catalog changes until a draft passes
//! validation and the store accepts it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use projectdesk_core::catalog::{query_indices_at, FilterCriteria, SortSpec};
use projectdesk_core::error::CoreError;
use projectdesk_core::project::{LogoRef, LogoUpload, ProjectRecord};
use projectdesk_core::roster::{unknown_member_ids, validate_batch, NewMember, TeamMember};
use projectdesk_core::status::ProjectStatus;
use projectdesk_core::store::{ProjectStore, StoreError};
use projectdesk_core::types::{self, Date, MemberId};
use projectdesk_core::upload::LogoPolicy;
use projectdesk_core::validation::{DraftForm, ErrorReport, FieldEdit};

use crate::confirm::{ConfirmPrompt, ConfirmationPort};
use crate::error::{SessionError, SessionResult};
use crate::notify::{Notification, Notifications};
use crate::roster_cache::{self, RosterCache};

pub const MSG_PROJECT_SAVED: &str = "Project saved successfully!";
pub const MSG_PROJECT_DELETED: &str = "Project deleted";
pub const MSG_FIX_FIELDS: &str = "Please fill in all required fields correctly";
pub const MSG_SAVE_IN_PROGRESS: &str = "A save is already in progress";
pub const MSG_SAVE_FAILED: &str = "Failed to save project. Please try again.";
pub const MSG_NO_MEMBERS: &str = "Please enter at least one team member";
pub const MSG_ADD_MEMBERS_FAILED: &str = "Failed to add team members. Please try again.";
pub const MSG_FETCH_ROSTER_FAILED: &str = "Failed to fetch team members";
pub const MSG_LOAD_PROJECTS_FAILED: &str = "Failed to load projects. Please try again later.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Which draft, if any, is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Browsing,
    Creating,
    Editing(usize),
}

#[derive(Debug)]
enum DraftState {
    Browsing,
    Creating(DraftForm),
    Editing { index: usize, form: DraftForm },
}

impl DraftState {
    fn form(&self) -> Option<&DraftForm> {
        match self {
            Self::Browsing => None,
            Self::Creating(form) | Self::Editing { form, .. } => Some(form),
        }
    }

    fn form_mut(&mut self) -> Option<&mut DraftForm> {
        match self {
            Self::Browsing => None,
            Self::Creating(form) | Self::Editing { form, .. } => Some(form),
        }
    }
}

/// Result of a [`DraftController::commit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The store accepted the draft; it now lives at `catalog[index]`.
    Saved { index: usize },
    /// Local validation failed. The draft stays open with this report.
    Invalid(ErrorReport),
    /// The draft selects members the roster no longer contains.
    UnknownMembers(Vec<MemberId>),
    /// The store call failed. The draft stays open.
    Failed(StoreError),
}

/// Result of a [`DraftController::add_members`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberBatchOutcome {
    /// The batch failed local validation and was not sent.
    Invalid(Vec<String>),
    /// The store created `created`; `requested` entries were sent.
    Added {
        created: Vec<TeamMember>,
        requested: usize,
    },
    /// The store call failed.
    Failed(StoreError),
}

/// One visible catalog row: the record, its catalog index, and its status
/// as of the query's "today".
#[derive(Debug, Clone, Copy)]
pub struct CatalogRow<'a> {
    pub index: usize,
    pub record: &'a ProjectRecord,
    pub status: ProjectStatus,
}

// ---------------------------------------------------------------------------
// Submit flag
// ---------------------------------------------------------------------------

/// Observable "submit outstanding" flag. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SubmitFlag(Arc<AtomicBool>);

impl SubmitFlag {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Option<SubmitGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmitGuard(Arc::clone(&self.0)))
    }
}

/// Clears the flag when the submit finishes or its future is dropped.
struct SubmitGuard(Arc<AtomicBool>);

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct DraftController {
    store: Arc<dyn ProjectStore>,
    confirm: Arc<dyn ConfirmationPort>,
    roster: Arc<RosterCache>,
    logo_policy: LogoPolicy,
    catalog: Vec<ProjectRecord>,
    state: DraftState,
    submitting: SubmitFlag,
    notifications: Notifications,
}

impl DraftController {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        confirm: Arc<dyn ConfirmationPort>,
        roster: Arc<RosterCache>,
        logo_policy: LogoPolicy,
    ) -> Self {
        Self {
            store,
            confirm,
            roster,
            logo_policy,
            catalog: Vec::new(),
            state: DraftState::Browsing,
            submitting: SubmitFlag::default(),
            notifications: Notifications::default(),
        }
    }

    /// Start from an already loaded catalog.
    pub fn with_catalog(mut self, catalog: Vec<ProjectRecord>) -> Self {
        self.catalog = catalog;
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn catalog(&self) -> &[ProjectRecord] {
        &self.catalog
    }

    pub fn mode(&self) -> DraftMode {
        match &self.state {
            DraftState::Browsing => DraftMode::Browsing,
            DraftState::Creating(_) => DraftMode::Creating,
            DraftState::Editing { index, .. } => DraftMode::Editing(*index),
        }
    }

    pub fn draft(&self) -> Option<&DraftForm> {
        self.state.form()
    }

    pub fn roster(&self) -> &Arc<RosterCache> {
        &self.roster
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    /// Handle a UI can poll while a commit is awaiting the store.
    pub fn submit_flag(&self) -> SubmitFlag {
        self.submitting.clone()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Whether the open draft holds anything worth asking about before it is
    /// thrown away.
    pub fn is_dirty(&self) -> bool {
        self.state.form().is_some_and(|f| !f.record().is_blank())
    }

    /// Visible rows for `criteria`, ordered by `sort`, as of today.
    pub fn rows(&self, criteria: &FilterCriteria, sort: SortSpec) -> Vec<CatalogRow<'_>> {
        self.rows_at(criteria, sort, types::today())
    }

    pub fn rows_at(
        &self,
        criteria: &FilterCriteria,
        sort: SortSpec,
        today: Date,
    ) -> Vec<CatalogRow<'_>> {
        query_indices_at(&self.catalog, criteria, sort, today)
            .into_iter()
            .map(|index| {
                let record = &self.catalog[index];
                CatalogRow {
                    index,
                    record,
                    status: record.status_at(today),
                }
            })
            .collect()
    }

    // -- draft lifecycle ----------------------------------------------------

    /// Open a blank draft.
    pub fn start_create(&mut self) -> SessionResult<()> {
        self.ensure_replaceable()?;
        self.state = DraftState::Creating(DraftForm::new(ProjectRecord::blank()));
        tracing::debug!("Draft opened for a new project");
        Ok(())
    }

    /// Open a draft holding a copy of `catalog[index]`.
    pub fn start_edit(&mut self, index: usize) -> SessionResult<()> {
        let record = self.record_at(index)?.clone();
        self.ensure_replaceable()?;
        self.state = DraftState::Editing {
            index,
            form: DraftForm::new(record),
        };
        tracing::debug!(index, "Draft opened for an existing project");
        Ok(())
    }

    /// Apply one field edit to the open draft.
    pub fn edit(&mut self, edit: FieldEdit) -> SessionResult<()> {
        self.state.form_mut().ok_or(SessionError::NoDraft)?.apply(edit);
        Ok(())
    }

    /// Check a picked logo file and put it on the draft if it is allowed.
    ///
    /// A refused file is reported as an error notification and never
    /// reaches the draft.
    pub fn attach_logo(
        &mut self,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> SessionResult<()> {
        let form = self.state.form_mut().ok_or(SessionError::NoDraft)?;
        let upload = LogoUpload {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        };
        match self.logo_policy.admit(upload) {
            Ok(upload) => {
                tracing::debug!(file_name = %upload.file_name, len = upload.bytes.len(), "Logo attached");
                form.apply(FieldEdit::CompanyLogo(Some(LogoRef::Upload(upload))));
                Ok(())
            }
            Err(rejection) => {
                self.notifications.push(Notification::error(rejection.to_string()));
                Err(rejection.into())
            }
        }
    }

    pub fn remove_logo(&mut self) -> SessionResult<()> {
        self.edit(FieldEdit::CompanyLogo(None))
    }

    /// Close the open draft, asking first if it is dirty.
    ///
    /// Returns `false` when the operator declined and the draft stays open.
    pub async fn cancel(&mut self) -> bool {
        if matches!(self.state, DraftState::Browsing) {
            return true;
        }
        if self.is_dirty() && !self.confirm.confirm(ConfirmPrompt::DiscardChanges).await {
            tracing::debug!("Discard declined, draft kept");
            return false;
        }
        self.state = DraftState::Browsing;
        tracing::debug!("Draft discarded");
        true
    }

    /// Validate the open draft and hand it to the store.
    ///
    /// On success the stored record is appended (new draft) or replaces the
    /// edited entry, and the controller returns to browsing. Every other
    /// outcome leaves the draft open and the catalog untouched.
    pub async fn commit(&mut self) -> SessionResult<CommitOutcome> {
        if self.submitting.is_active() {
            self.notifications.push(Notification::error(MSG_SAVE_IN_PROGRESS));
            return Err(SessionError::SubmitInFlight);
        }

        let (form, target) = match &mut self.state {
            DraftState::Browsing => return Err(SessionError::NoDraft),
            DraftState::Creating(form) => (form, None),
            DraftState::Editing { index, form } => (form, Some(*index)),
        };

        if !form.validate() {
            let report = form.errors().clone();
            tracing::debug!(errors = report.len(), "Draft failed validation");
            self.notifications.push(Notification::error(MSG_FIX_FIELDS));
            return Ok(CommitOutcome::Invalid(report));
        }

        if self.roster.is_loaded().await {
            let roster = self.roster.members().await;
            let unknown: Vec<MemberId> =
                unknown_member_ids(&form.record().team_member_ids, &roster)
                    .into_iter()
                    .cloned()
                    .collect();
            if !unknown.is_empty() {
                let ids: Vec<&str> = unknown.iter().map(MemberId::as_str).collect();
                self.notifications.push(Notification::error(format!(
                    "Selected team members no longer exist: {}",
                    ids.join(", ")
                )));
                return Ok(CommitOutcome::UnknownMembers(unknown));
            }
        }

        let Some(guard) = self.submitting.begin() else {
            self.notifications.push(Notification::error(MSG_SAVE_IN_PROGRESS));
            return Err(SessionError::SubmitInFlight);
        };
        tracing::info!(project = %form.record().project_name, editing = ?target, "Submitting project");
        let result = self.store.submit_project(form.record()).await;
        drop(guard);

        let stored = match result {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "Project submit failed");
                self.notifications
                    .push(Notification::error(err.user_message(MSG_SAVE_FAILED)));
                return Ok(CommitOutcome::Failed(err));
            }
        };

        let index = match target {
            Some(index) => {
                let slot = self
                    .catalog
                    .get_mut(index)
                    .ok_or(CoreError::NotFound { entity: "project", index })?;
                *slot = stored;
                index
            }
            None => {
                self.catalog.push(stored);
                self.catalog.len() - 1
            }
        };
        self.state = DraftState::Browsing;
        self.notifications.push(Notification::success(MSG_PROJECT_SAVED));
        tracing::info!(index, total = self.catalog.len(), "Project saved");
        Ok(CommitOutcome::Saved { index })
    }

    /// Remove `catalog[index]` after the operator confirms.
    ///
    /// Returns `false` when the operator declined.
    pub async fn delete(&mut self, index: usize) -> SessionResult<bool> {
        let project_name = self.record_at(index)?.project_name.clone();
        let confirmed = self
            .confirm
            .confirm(ConfirmPrompt::DeleteProject { project_name })
            .await;
        if !confirmed {
            return Ok(false);
        }

        let removed = self.catalog.remove(index);
        let edited_removed = match &mut self.state {
            DraftState::Editing { index: editing, .. } if *editing == index => true,
            DraftState::Editing { index: editing, .. } => {
                if *editing > index {
                    *editing -= 1;
                }
                false
            }
            _ => false,
        };
        if edited_removed {
            self.state = DraftState::Browsing;
        }
        self.notifications.push(Notification::info(MSG_PROJECT_DELETED));
        tracing::info!(index, project = %removed.project_name, "Project deleted");
        Ok(true)
    }

    // -- collaborator refreshes ----------------------------------------------

    /// Replace the catalog with the store's project list.
    ///
    /// Refused while an edit draft is open, since its index would no longer
    /// refer to the same record.
    pub async fn load_catalog(&mut self) -> SessionResult<bool> {
        if matches!(self.state, DraftState::Editing { .. }) {
            return Err(CoreError::Conflict(
                "Cannot reload projects while one is being edited".into(),
            )
            .into());
        }
        match self.store.list_projects().await {
            Ok(projects) => {
                tracing::info!(count = projects.len(), "Catalog loaded");
                self.catalog = projects;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Catalog load failed");
                self.notifications
                    .push(Notification::error(MSG_LOAD_PROJECTS_FAILED));
                Ok(false)
            }
        }
    }

    /// Refetch the roster into the shared cache.
    ///
    /// Returns whether this refresh's result was installed.
    pub async fn refresh_roster(&mut self) -> bool {
        match roster_cache::refresh(self.store.as_ref(), &self.roster).await {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(error = %err, "Roster fetch failed");
                self.notifications
                    .push(Notification::error(MSG_FETCH_ROSTER_FAILED));
                false
            }
        }
    }

    /// Validate a batch of new members against itself and the roster, send
    /// it if clean, then refetch the roster.
    ///
    /// A roster that was never loaded is fetched first; if that fetch fails
    /// nothing is sent.
    pub async fn add_members(&mut self, batch: &[NewMember]) -> MemberBatchOutcome {
        if batch.is_empty() {
            self.notifications.push(Notification::error(MSG_NO_MEMBERS));
            return MemberBatchOutcome::Invalid(vec![MSG_NO_MEMBERS.to_string()]);
        }
        // Duplicate checks need the roster; never check against an unloaded one.
        if !self.roster.is_loaded().await {
            if let Err(err) = roster_cache::refresh(self.store.as_ref(), &self.roster).await {
                tracing::warn!(error = %err, "Roster fetch failed before member batch");
                self.notifications
                    .push(Notification::error(MSG_FETCH_ROSTER_FAILED));
                return MemberBatchOutcome::Failed(err);
            }
        }
        let existing = self.roster.members().await;
        let validation = validate_batch(batch, &existing);
        if !validation.is_valid() {
            self.notifications
                .push(Notification::error(validation.summary()));
            return MemberBatchOutcome::Invalid(validation.errors);
        }

        let requested = validation.accepted.len();
        tracing::info!(requested, "Adding team members");
        let result = self.store.add_roster_batch(&validation.accepted).await;
        // The store may have created some members even when it reports failure.
        self.refresh_roster().await;

        match result {
            Ok(created) => {
                self.notifications.push(Notification::success(format!(
                    "{} team member(s) added successfully!",
                    created.len()
                )));
                if created.len() < requested {
                    self.notifications.push(Notification::info(format!(
                        "{} of {requested} team member(s) were not added",
                        requested - created.len()
                    )));
                }
                MemberBatchOutcome::Added { created, requested }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Team member batch failed");
                self.notifications
                    .push(Notification::error(err.user_message(MSG_ADD_MEMBERS_FAILED)));
                MemberBatchOutcome::Failed(err)
            }
        }
    }

    // -- helpers --------------------------------------------------------------

    fn record_at(&self, index: usize) -> Result<&ProjectRecord, CoreError> {
        self.catalog.get(index).ok_or(CoreError::NotFound {
            entity: "project",
            index,
        })
    }

    /// A clean draft may be replaced silently; a dirty one must be cancelled
    /// first.
    fn ensure_replaceable(&self) -> SessionResult<()> {
        if self.submitting.is_active() {
            return Err(SessionError::SubmitInFlight);
        }
        if self.is_dirty() {
            return Err(CoreError::Conflict(
                "The open draft has unsaved changes; cancel it first".into(),
            )
            .into());
        }
        Ok(())
    }
}
