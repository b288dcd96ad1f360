use common::EntityId;
use serde::Deserialize;

use crate::api::ScheduleApi;
use crate::editor::ScheduleEditor;
use crate::forms::{PhaseDraft, TaskDraft};
use crate::notification::Notification;
use crate::selection::Category;

/// One user interaction with the schedule screen, as sent by the web page
/// (`{"action": "add_phase", ...}`) or built from CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorCommand {
    Refresh,
    AddPhase(PhaseDraft),
    RemovePhase {
        phase_id: EntityId,
    },
    OpenConfigItemPicker {
        phase_id: EntityId,
    },
    ClosePicker,
    AddConfigItem {
        config_item_id: EntityId,
    },
    RemoveConfigItem {
        phase_id: EntityId,
        config_item_id: EntityId,
    },
    Select {
        category: Category,
        phase_id: EntityId,
        config_item_id: EntityId,
    },
    ClearSelection {
        category: Category,
    },
    AddRequirement {
        requirement_id: EntityId,
    },
    RemoveRequirement {
        link_id: EntityId,
    },
    AddMember {
        role_id: EntityId,
        member_id: EntityId,
    },
    RemoveMember {
        link_id: EntityId,
    },
    BeginTaskEdit {
        task_id: EntityId,
    },
    CancelTaskEdit,
    SaveTask(TaskDraft),
    RemoveTask {
        task_id: EntityId,
    },
    DismissNotification,
}

impl EditorCommand {
    /// Runs the command. UI-only commands produce no notification.
    pub async fn apply<A: ScheduleApi>(self, editor: &mut ScheduleEditor<A>) -> Option<Notification> {
        match self {
            Self::Refresh => Some(editor.refresh().await),
            Self::AddPhase(draft) => Some(editor.add_phase(&draft).await),
            Self::RemovePhase { phase_id } => Some(editor.remove_phase(&phase_id).await),
            Self::OpenConfigItemPicker { phase_id } => {
                editor.open_config_item_picker(&phase_id).await;
                None
            }
            Self::ClosePicker => {
                editor.close_config_item_picker();
                None
            }
            Self::AddConfigItem { config_item_id } => {
                Some(editor.add_config_item(&config_item_id).await)
            }
            Self::RemoveConfigItem {
                phase_id,
                config_item_id,
            } => Some(editor.remove_config_item(&phase_id, &config_item_id).await),
            Self::Select {
                category,
                phase_id,
                config_item_id,
            } => {
                editor.select(category, &phase_id, &config_item_id);
                None
            }
            Self::ClearSelection { category } => {
                editor.clear_selection(category);
                None
            }
            Self::AddRequirement { requirement_id } => {
                Some(editor.add_requirement(&requirement_id).await)
            }
            Self::RemoveRequirement { link_id } => Some(editor.remove_requirement(&link_id).await),
            Self::AddMember { role_id, member_id } => {
                Some(editor.add_member(&role_id, &member_id).await)
            }
            Self::RemoveMember { link_id } => Some(editor.remove_member(&link_id).await),
            Self::BeginTaskEdit { task_id } => {
                editor.begin_task_edit(&task_id).err()?;
                editor.notification().cloned()
            }
            Self::CancelTaskEdit => {
                editor.cancel_task_edit();
                None
            }
            Self::SaveTask(draft) => {
                editor.set_task_draft(draft);
                Some(editor.save_task().await)
            }
            Self::RemoveTask { task_id } => Some(editor.remove_task(&task_id).await),
            Self::DismissNotification => {
                editor.dismiss_notification();
                None
            }
        }
    }
}
