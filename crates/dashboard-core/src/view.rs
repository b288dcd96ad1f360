use common::{EntityId, MemberLink, RequirementLink, Schedule, Task};
use serde::Serialize;

use crate::api::ScheduleApi;
use crate::editor::{Candidates, ConfigItemPicker, EditorState, ScheduleEditor};
use crate::forms::TaskDraft;
use crate::notification::Notification;
use crate::selection::Selection;

/// Everything a renderer needs to draw the schedule screen.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub project_id: EntityId,
    pub state: EditorState,
    pub schedule: Option<Schedule>,
    pub candidates: Candidates,
    pub selection: Selection,
    pub requirements: Vec<RequirementLink>,
    pub members: Vec<MemberLink>,
    pub tasks: Vec<Task>,
    pub picker: Option<ConfigItemPicker>,
    pub task_draft: TaskDraft,
    pub editing_task: Option<EntityId>,
    pub notification: Option<Notification>,
}

impl EditorView {
    pub fn of<A: ScheduleApi>(editor: &ScheduleEditor<A>) -> Self {
        Self {
            project_id: editor.project_id().to_string(),
            state: editor.state(),
            schedule: editor.schedule().cloned(),
            candidates: editor.candidates().clone(),
            selection: editor.selection().clone(),
            requirements: editor.requirements().to_vec(),
            members: editor.members().to_vec(),
            tasks: editor.tasks().to_vec(),
            picker: editor.picker().cloned(),
            task_draft: editor.task_draft().clone(),
            editing_task: editor.editing_task().cloned(),
            notification: editor.notification().cloned(),
        }
    }
}
