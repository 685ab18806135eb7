#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use projectdesk_core::project::{Department, LogoRef, ProjectRecord};
use projectdesk_core::roster::{NewMember, TeamMember};
use projectdesk_core::store::{ProjectStore, StoreError};
use projectdesk_core::types::{Date, MemberId};
use projectdesk_core::upload::LogoPolicy;
use projectdesk_core::validation::FieldEdit;
use projectdesk_session::confirm::{ConfirmPrompt, ConfirmationPort};
use projectdesk_session::roster_cache::RosterCache;
use projectdesk_session::DraftController;

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    roster: Vec<TeamMember>,
    projects: Vec<ProjectRecord>,
    submitted: Vec<ProjectRecord>,
    batches: Vec<Vec<NewMember>>,
    failures: VecDeque<StoreError>,
    batch_limit: Option<usize>,
    submit_gate: Option<oneshot::Receiver<()>>,
    next_id: usize,
}

/// `ProjectStore` fake that keeps everything in memory.
///
/// Queued failures are consumed one per call, in call order.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_roster(members: Vec<TeamMember>) -> Arc<Self> {
        let store = Self::default();
        store.state.lock().unwrap().roster = members;
        Arc::new(store)
    }

    pub fn set_projects(&self, projects: Vec<ProjectRecord>) {
        self.state.lock().unwrap().projects = projects;
    }

    pub fn fail_next(&self, err: StoreError) {
        self.state.lock().unwrap().failures.push_back(err);
    }

    /// Accept at most `limit` members per batch.
    pub fn limit_batches(&self, limit: usize) {
        self.state.lock().unwrap().batch_limit = Some(limit);
    }

    /// Hold the next submit until the returned sender fires.
    pub fn gate_submit(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().submit_gate = Some(rx);
        tx
    }

    pub fn submitted(&self) -> Vec<ProjectRecord> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn batches(&self) -> Vec<Vec<NewMember>> {
        self.state.lock().unwrap().batches.clone()
    }

    fn take_failure(&self) -> Result<(), StoreError> {
        match self.state.lock().unwrap().failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn fetch_roster(&self) -> Result<Vec<TeamMember>, StoreError> {
        self.take_failure()?;
        Ok(self.state.lock().unwrap().roster.clone())
    }

    async fn add_roster_batch(&self, members: &[NewMember]) -> Result<Vec<TeamMember>, StoreError> {
        self.take_failure()?;
        let mut state = self.state.lock().unwrap();
        state.batches.push(members.to_vec());
        let take = state.batch_limit.unwrap_or(members.len()).min(members.len());
        let mut created = Vec::with_capacity(take);
        for member in &members[..take] {
            state.next_id += 1;
            let id = MemberId::new(format!("m{}", state.next_id));
            created.push(TeamMember {
                id,
                first_name: member.first_name.clone(),
                last_name: member.last_name.clone(),
            });
        }
        state.roster.extend(created.iter().cloned());
        Ok(created)
    }

    async fn submit_project(&self, record: &ProjectRecord) -> Result<ProjectRecord, StoreError> {
        let gate = self.state.lock().unwrap().submit_gate.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.take_failure()?;

        let mut state = self.state.lock().unwrap();
        let mut stored = record.clone();
        if stored.id.is_none() {
            state.next_id += 1;
            stored.id = Some(format!("p{}", state.next_id));
        }
        if let Some(LogoRef::Upload(upload)) = &stored.company_logo {
            stored.company_logo = Some(LogoRef::Remote(format!("/uploads/{}", upload.file_name)));
        }
        state.submitted.push(stored.clone());
        Ok(stored)
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        self.take_failure()?;
        Ok(self.state.lock().unwrap().projects.clone())
    }
}

// ---------------------------------------------------------------------------
// Scripted confirmation
// ---------------------------------------------------------------------------

/// Answers prompts from a queue; answers "no" once the queue is empty.
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirm {
    pub fn answering(answers: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::default(),
        })
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt);
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn controller(store: Arc<MemoryStore>, confirm: Arc<ScriptedConfirm>) -> DraftController {
    DraftController::new(
        store,
        confirm,
        Arc::new(RosterCache::new()),
        LogoPolicy::default(),
    )
}

pub fn member(id: &str, first: &str, last: &str) -> TeamMember {
    TeamMember {
        id: MemberId::new(id),
        first_name: first.into(),
        last_name: last.into(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

/// Edits that turn a blank draft into a valid one.
pub fn valid_edits(project_name: &str) -> Vec<FieldEdit> {
    vec![
        FieldEdit::ClientCode("AC-1".into()),
        FieldEdit::CompanyName("Acme".into()),
        FieldEdit::ProjectName(project_name.into()),
        FieldEdit::StartDate(Some(date(2024, 1, 10))),
        FieldEdit::EndDate(Some(date(2024, 1, 20))),
        FieldEdit::AllottedBillingHours("40".into()),
        FieldEdit::Department(Department::It),
    ]
}

pub fn project(id: &str, name: &str) -> ProjectRecord {
    ProjectRecord {
        id: Some(id.into()),
        client_code: format!("C-{id}"),
        company_name: "Acme".into(),
        project_name: name.into(),
        start_date: Some(date(2024, 1, 10)),
        end_date: Some(date(2024, 3, 10)),
        allotted_billing_hours: "80".into(),
        department: Department::Sales,
        ..ProjectRecord::blank()
    }
}
