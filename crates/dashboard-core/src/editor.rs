//! The schedule editor: one project's cronograma, its candidate lists and the
//! transient UI state around it.
//!
//! Every mutation follows the same contract: validate locally, issue exactly
//! one write, and on success re-read the whole schedule and replace the local
//! snapshot with it. Nothing is applied optimistically; a failed write leaves
//! the snapshot untouched.

use anyhow::Result;
use common::writes::{
    AddMember, ConfigItemTarget, PhaseTarget, RemoveMember, RemoveTask, RequirementTarget,
};
use common::{
    ConfigItemEntry, ConfigurationItem, EntityId, MemberLink, Phase, Requirement,
    RequirementLink, Role, Schedule, ScheduleWrite, Task, TeamMember,
};
use common::forms::require;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::ScheduleApi;
use crate::forms::{PhaseDraft, Rejection, TaskDraft};
use crate::notification::{Notification, ScheduleAction};
use crate::selection::{self, Category, Selection, SelectionSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    Loading,
    Ready,
    Mutating,
}

/// Choices offered by the editor's pickers, fetched once on open.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Candidates {
    pub phases: Vec<Phase>,
    pub roles: Vec<Role>,
    pub requirements: Vec<Requirement>,
    pub members: Vec<TeamMember>,
}

/// The "add configuration item" dialog for one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigItemPicker {
    pub phase_id: EntityId,
    pub candidates: Vec<ConfigurationItem>,
}

pub struct ScheduleEditor<A> {
    api: A,
    project_id: EntityId,
    state: EditorState,
    schedule: Option<Schedule>,
    candidates: Candidates,
    /// Methodology (if any) of the last candidate fetch in which every list
    /// arrived; `None` while the candidates are incomplete.
    candidates_for: Option<Option<EntityId>>,
    selection: Selection,
    picker: Option<ConfigItemPicker>,
    task_draft: TaskDraft,
    editing_task: Option<EntityId>,
    notification: Option<Notification>,
}

impl<A: ScheduleApi> ScheduleEditor<A> {
    pub fn new(api: A, project_id: impl Into<EntityId>) -> Self {
        Self {
            api,
            project_id: project_id.into(),
            state: EditorState::Loading,
            schedule: None,
            candidates: Candidates::default(),
            candidates_for: None,
            selection: Selection::default(),
            picker: None,
            task_draft: TaskDraft::default(),
            editing_task: None,
            notification: None,
        }
    }

    /// Creates the editor and performs the initial load.
    pub async fn open(api: A, project_id: impl Into<EntityId>) -> Self {
        let mut editor = Self::new(api, project_id);
        editor.load().await;
        editor
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn picker(&self) -> Option<&ConfigItemPicker> {
        self.picker.as_ref()
    }

    pub fn task_draft(&self) -> &TaskDraft {
        &self.task_draft
    }

    pub fn editing_task(&self) -> Option<&EntityId> {
        self.editing_task.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Reads the schedule and every candidate list. A failed schedule read
    /// keeps whatever snapshot was shown before.
    pub async fn load(&mut self) -> Notification {
        self.state = EditorState::Loading;
        let notification = match self.api.fetch_schedule(&self.project_id).await {
            Ok(snapshot) => {
                self.replace_snapshot(snapshot);
                Notification::success(ScheduleAction::LoadSchedule.success_message())
            }
            Err(err) => {
                warn!(project_id = %self.project_id, error = %format!("{err:#}"), "failed to load schedule");
                Notification::failure(ScheduleAction::LoadSchedule.failure_message())
            }
        };
        self.load_candidates().await;
        self.state = EditorState::Ready;
        self.publish(notification)
    }

    /// Re-reads the schedule. Candidates are fetched again only when the last
    /// fetch was incomplete or the methodology changed.
    pub async fn refresh(&mut self) -> Notification {
        self.state = EditorState::Loading;
        let notification = match self.api.fetch_schedule(&self.project_id).await {
            Ok(snapshot) => {
                self.replace_snapshot(snapshot);
                let current = self.methodology_id();
                if self.candidates_for.as_ref().map(|loaded| loaded.as_deref()) != Some(current) {
                    self.load_candidates().await;
                }
                Notification::success(ScheduleAction::LoadSchedule.success_message())
            }
            Err(err) => {
                warn!(project_id = %self.project_id, error = %format!("{err:#}"), "failed to refresh schedule");
                Notification::failure(ScheduleAction::LoadSchedule.failure_message())
            }
        };
        self.state = EditorState::Ready;
        self.publish(notification)
    }

    pub async fn add_phase(&mut self, draft: &PhaseDraft) -> Notification {
        match draft.to_write() {
            Ok(write) => {
                self.run(ScheduleAction::AddPhase, ScheduleWrite::AddPhase(write))
                    .await
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    pub async fn remove_phase(&mut self, phase_id: &str) -> Notification {
        if let Err(err) = require("phase", phase_id) {
            return self.reject(err.into());
        }
        let write = ScheduleWrite::RemovePhase(PhaseTarget {
            phase_id: phase_id.to_string(),
        });
        self.run(ScheduleAction::RemovePhase, write).await
    }

    /// Opens the "add configuration item" dialog for a phase and fetches its
    /// candidates. A failed fetch leaves the list empty and is only logged.
    pub async fn open_config_item_picker(&mut self, phase_id: &str) -> &[ConfigurationItem] {
        let candidates = match self.schedule.as_ref().map(|s| s.methodology.id.clone()) {
            Some(methodology_id) => {
                let fetched = self
                    .api
                    .phase_config_items(&methodology_id, phase_id)
                    .await;
                or_empty("configuration items", fetched)
            }
            None => {
                debug!(phase_id, "no schedule loaded; configuration item picker stays empty");
                Vec::new()
            }
        };

        let picker = self.picker.insert(ConfigItemPicker {
            phase_id: phase_id.to_string(),
            candidates,
        });
        &picker.candidates
    }

    pub fn close_config_item_picker(&mut self) {
        self.picker = None;
    }

    pub async fn add_config_item(&mut self, config_item_id: &str) -> Notification {
        let Some(phase_id) = self.picker.as_ref().map(|picker| picker.phase_id.clone()) else {
            return self.reject(Rejection::PickerClosed);
        };
        if let Err(err) = require("configuration item", config_item_id) {
            return self.reject(err.into());
        }

        let write = ScheduleWrite::AddConfigItem(ConfigItemTarget {
            phase_id,
            config_item_id: config_item_id.to_string(),
        });
        let notification = self.run(ScheduleAction::AddConfigItem, write).await;
        if notification.is_success() {
            self.picker = None;
        }
        notification
    }

    pub async fn remove_config_item(
        &mut self,
        phase_id: &str,
        config_item_id: &str,
    ) -> Notification {
        if let Err(err) =
            require("phase", phase_id).and_then(|()| require("configuration item", config_item_id))
        {
            return self.reject(err.into());
        }
        let write = ScheduleWrite::RemoveConfigItem(ConfigItemTarget {
            phase_id: phase_id.to_string(),
            config_item_id: config_item_id.to_string(),
        });
        self.run(ScheduleAction::RemoveConfigItem, write).await
    }

    /// Points one category's slot at a configuration item. The other slots
    /// keep their targets.
    pub fn select(&mut self, category: Category, phase_id: &str, config_item_id: &str) {
        self.selection
            .select(category, SelectionSlot::new(phase_id, config_item_id));
    }

    pub fn clear_selection(&mut self, category: Category) {
        self.selection.clear(category);
    }

    pub fn requirements(&self) -> &[RequirementLink] {
        selection::rows(
            self.schedule.as_ref(),
            self.selection.slot(Category::Requirements),
            |item| item.requirements.as_slice(),
        )
    }

    pub fn members(&self) -> &[MemberLink] {
        selection::rows(
            self.schedule.as_ref(),
            self.selection.slot(Category::Members),
            |item| item.members.as_slice(),
        )
    }

    pub fn tasks(&self) -> &[Task] {
        selection::rows(
            self.schedule.as_ref(),
            self.selection.slot(Category::Tasks),
            |item| item.tasks.as_slice(),
        )
    }

    pub async fn add_requirement(&mut self, requirement_id: &str) -> Notification {
        let Some(slot) = self.selection.requirements.clone() else {
            return self.reject(Rejection::NoSelection(Category::Requirements));
        };
        if let Err(err) = require("requirement", requirement_id) {
            return self.reject(err.into());
        }
        let write = ScheduleWrite::AddRequirement(RequirementTarget {
            phase_id: slot.phase_id,
            config_item_id: slot.config_item_id,
            requirement_id: requirement_id.to_string(),
        });
        self.run(ScheduleAction::AddRequirement, write).await
    }

    pub async fn remove_requirement(&mut self, link_id: &str) -> Notification {
        let slot = match self.target_of(Category::Requirements, link_id) {
            Ok(slot) => slot,
            Err(rejection) => return self.reject(rejection),
        };
        let write = ScheduleWrite::RemoveRequirement(RequirementTarget {
            phase_id: slot.phase_id,
            config_item_id: slot.config_item_id,
            requirement_id: link_id.to_string(),
        });
        self.run(ScheduleAction::RemoveRequirement, write).await
    }

    pub async fn add_member(&mut self, role_id: &str, member_id: &str) -> Notification {
        let Some(slot) = self.selection.members.clone() else {
            return self.reject(Rejection::NoSelection(Category::Members));
        };
        if let Err(err) = require("role", role_id).and_then(|()| require("member", member_id)) {
            return self.reject(err.into());
        }
        let write = ScheduleWrite::AddMember(AddMember {
            phase_id: slot.phase_id,
            config_item_id: slot.config_item_id,
            role_id: role_id.to_string(),
            member_id: member_id.to_string(),
        });
        self.run(ScheduleAction::AddMember, write).await
    }

    pub async fn remove_member(&mut self, link_id: &str) -> Notification {
        let slot = match self.target_of(Category::Members, link_id) {
            Ok(slot) => slot,
            Err(rejection) => return self.reject(rejection),
        };
        let write = ScheduleWrite::RemoveMember(RemoveMember {
            phase_id: slot.phase_id,
            config_item_id: slot.config_item_id,
            member_link_id: link_id.to_string(),
        });
        self.run(ScheduleAction::RemoveMember, write).await
    }

    pub fn set_task_draft(&mut self, draft: TaskDraft) {
        self.task_draft = draft;
    }

    /// Loads an existing task into the form; the next save edits it.
    pub fn begin_task_edit(&mut self, task_id: &str) -> Result<(), Rejection> {
        let located = self.locate(Category::Tasks, task_id);
        let task = self.schedule.as_ref().and_then(|schedule| schedule.task(task_id));
        let (Some(slot), Some(task)) = (located, task) else {
            let rejection = Rejection::UnknownTask(task_id.to_string());
            self.reject(rejection.clone());
            return Err(rejection);
        };

        self.task_draft = TaskDraft::from_task(task);
        self.editing_task = Some(task_id.to_string());
        self.selection.select(Category::Tasks, slot);
        Ok(())
    }

    pub fn cancel_task_edit(&mut self) {
        self.task_draft = TaskDraft::default();
        self.editing_task = None;
    }

    /// Submits the task form: a create, or an edit while one is in progress.
    pub async fn save_task(&mut self) -> Notification {
        let Some(slot) = self.selection.tasks.clone() else {
            return self.reject(Rejection::NoSelection(Category::Tasks));
        };
        let write = match self.task_draft.to_write(&slot, self.editing_task.as_ref()) {
            Ok(write) => write,
            Err(rejection) => return self.reject(rejection),
        };
        let action = if self.editing_task.is_some() {
            ScheduleAction::EditTask
        } else {
            ScheduleAction::AddTask
        };

        let notification = self.run(action, ScheduleWrite::SaveTask(write)).await;
        if notification.is_success() {
            self.cancel_task_edit();
        }
        notification
    }

    pub async fn remove_task(&mut self, task_id: &str) -> Notification {
        let slot = match self.target_of(Category::Tasks, task_id) {
            Ok(slot) => slot,
            Err(rejection) => return self.reject(rejection),
        };
        let write = ScheduleWrite::RemoveTask(RemoveTask {
            phase_id: slot.phase_id,
            config_item_id: slot.config_item_id,
            task_id: task_id.to_string(),
        });
        let notification = self.run(ScheduleAction::RemoveTask, write).await;
        if notification.is_success() && self.editing_task.as_deref() == Some(task_id) {
            self.cancel_task_edit();
        }
        notification
    }

    async fn run(&mut self, action: ScheduleAction, write: ScheduleWrite) -> Notification {
        let Some(schedule_id) = self.schedule.as_ref().map(|schedule| schedule.id.clone()) else {
            return self.reject(Rejection::NotLoaded);
        };

        self.state = EditorState::Mutating;
        let written = self
            .api
            .write_schedule(&self.project_id, &schedule_id, &write)
            .await;

        let notification = match written {
            Err(err) => {
                warn!(
                    project_id = %self.project_id,
                    action = ?action,
                    phase_id = write.phase_id(),
                    error = %format!("{err:#}"),
                    "schedule write failed"
                );
                Notification::failure(action.failure_message())
            }
            Ok(()) => match self.api.fetch_schedule(&self.project_id).await {
                Ok(snapshot) => {
                    self.replace_snapshot(snapshot);
                    info!(
                        project_id = %self.project_id,
                        action = ?action,
                        phase_id = write.phase_id(),
                        "schedule updated"
                    );
                    Notification::success(action.success_message())
                }
                Err(err) => {
                    warn!(
                        project_id = %self.project_id,
                        action = ?action,
                        error = %format!("{err:#}"),
                        "schedule reload after write failed"
                    );
                    Notification::failure(format!(
                        "{}, but reloading the schedule failed",
                        action.success_message()
                    ))
                }
            },
        };

        self.state = EditorState::Ready;
        self.publish(notification)
    }

    fn methodology_id(&self) -> Option<&str> {
        self.schedule
            .as_ref()
            .map(|schedule| schedule.methodology.id.as_str())
    }

    async fn load_candidates(&mut self) {
        let methodology_id = self.methodology_id().map(str::to_string);
        let api = &self.api;
        let project_id = self.project_id.as_str();

        let (phases, roles, requirements, members) = tokio::join!(
            async {
                match methodology_id.as_deref() {
                    Some(methodology_id) => api.methodology_phases(methodology_id).await,
                    None => Ok(Vec::new()),
                }
            },
            api.roles(),
            api.project_requirements(project_id),
            api.project_team(project_id),
        );

        let complete = phases.is_ok() && roles.is_ok() && requirements.is_ok() && members.is_ok();
        self.candidates_for = complete.then_some(methodology_id);
        self.candidates = Candidates {
            phases: or_empty("phases", phases),
            roles: or_empty("roles", roles),
            requirements: or_empty("requirements", requirements),
            members: or_empty("project members", members),
        };
    }

    /// A missing payload empties the phase list but keeps the schedule's
    /// identity so later writes still have a target.
    fn replace_snapshot(&mut self, snapshot: Option<Schedule>) {
        match (snapshot, self.schedule.as_mut()) {
            (Some(snapshot), _) => self.schedule = Some(snapshot),
            (None, Some(current)) => current.phases.clear(),
            (None, None) => {
                debug!(project_id = %self.project_id, "project has no schedule");
            }
        }
    }

    /// Where a link or task lives: found in the snapshot, or else assumed to
    /// be in the category's selected configuration item.
    fn target_of(&self, category: Category, id: &str) -> Result<SelectionSlot, Rejection> {
        if let Err(err) = require(category.label(), id) {
            return Err(err.into());
        }
        self.locate(category, id)
            .or_else(|| self.selection.slot(category).cloned())
            .ok_or(Rejection::NoSelection(category))
    }

    fn locate(&self, category: Category, id: &str) -> Option<SelectionSlot> {
        let schedule = self.schedule.as_ref()?;
        schedule.phases.iter().find_map(|phase| {
            let phase_id = phase.phase_id()?;
            phase
                .config_items
                .iter()
                .find(|item| contains(item, category, id))
                .map(|item| SelectionSlot::new(phase_id, item.config_item.id.as_str()))
        })
    }

    fn reject(&mut self, rejection: Rejection) -> Notification {
        debug!(project_id = %self.project_id, reason = %rejection, "operation rejected");
        self.publish(Notification::validation(rejection.to_string()))
    }

    fn publish(&mut self, notification: Notification) -> Notification {
        self.notification = Some(notification.clone());
        notification
    }
}

fn contains(item: &ConfigItemEntry, category: Category, id: &str) -> bool {
    match category {
        Category::Requirements => item.requirements.iter().any(|link| link.id == id),
        Category::Members => item.members.iter().any(|link| link.id == id),
        Category::Tasks => item.tasks.iter().any(|task| task.id == id),
    }
}

fn or_empty<T>(what: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(candidates = what, error = %format!("{err:#}"), "failed to fetch candidates");
        Vec::new()
    })
}
