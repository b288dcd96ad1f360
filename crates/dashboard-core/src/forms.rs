use common::forms::{require, require_day};
use common::writes::{AddPhase, SaveTask};
use common::{EntityId, FormError, Task, dates};
use serde::{Deserialize, Serialize};

use crate::selection::{Category, SelectionSlot};

/// Why an editor operation was refused without contacting the API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("the schedule has not been loaded")]
    NotLoaded,
    #[error("choose a configuration item to view its {} first", .0.label())]
    NoSelection(Category),
    #[error("open the configuration item picker for a phase first")]
    PickerClosed,
    #[error("task {0} is not in the schedule")]
    UnknownTask(EntityId),
}

/// The "add phase" row: which phase definition and its dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDraft {
    #[serde(default)]
    pub phase_id: EntityId,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl PhaseDraft {
    pub fn new(
        phase_id: impl Into<EntityId>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            phase_id: phase_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn to_write(&self) -> Result<AddPhase, Rejection> {
        require("phase", &self.phase_id)?;
        require_day("start date", &self.start_date)?;
        require_day("end date", &self.end_date)?;
        Ok(AddPhase {
            phase_id: self.phase_id.trim().to_string(),
            start_date: dates::calendar_day(&self.start_date).to_string(),
            end_date: dates::calendar_day(&self.end_date).to_string(),
        })
    }
}

/// The task form. Whether it creates or edits is tracked by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub member_id: EntityId,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl TaskDraft {
    /// Pre-fills the form from an existing task, dates cut to the day.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            member_id: task
                .assignee
                .as_ref()
                .map(|member| member.id.clone())
                .unwrap_or_default(),
            start_date: dates::calendar_day(&task.start_date).to_string(),
            end_date: dates::calendar_day(&task.end_date).to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("member", &self.member_id)?;
        require_day("start date", &self.start_date)?;
        require_day("end date", &self.end_date)
    }

    pub fn to_write(
        &self,
        slot: &SelectionSlot,
        task_id: Option<&EntityId>,
    ) -> Result<SaveTask, Rejection> {
        self.validate()?;
        Ok(SaveTask {
            phase_id: slot.phase_id.clone(),
            config_item_id: slot.config_item_id.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            member_id: self.member_id.clone(),
            start_date: dates::calendar_day(&self.start_date).to_string(),
            end_date: dates::calendar_day(&self.end_date).to_string(),
            task_id: task_id.cloned(),
        })
    }
}
