use serde::{Deserialize, Serialize};

use crate::EntityId;

/// A partial update of a schedule, as sent to
/// `PATCH /proyecto/{project}/cronograma/{schedule}{suffix}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScheduleWrite {
    AddPhase(AddPhase),
    RemovePhase(PhaseTarget),
    AddConfigItem(ConfigItemTarget),
    RemoveConfigItem(ConfigItemTarget),
    AddRequirement(RequirementTarget),
    RemoveRequirement(RequirementTarget),
    AddMember(AddMember),
    RemoveMember(RemoveMember),
    SaveTask(SaveTask),
    RemoveTask(RemoveTask),
}

impl ScheduleWrite {
    pub fn path_suffix(&self) -> &'static str {
        match self {
            Self::AddPhase(_) => "",
            Self::RemovePhase(_) => "/quitar-fase",
            Self::AddConfigItem(_) => "/agregar-ecs",
            Self::RemoveConfigItem(_) => "/quitar-ecs",
            Self::AddRequirement(_) => "/agregar-requerimiento-ecs",
            Self::RemoveRequirement(_) => "/quitar-requerimiento",
            Self::AddMember(_) => "/agregar-miembro-ecs",
            Self::RemoveMember(_) => "/quitar-miembro",
            Self::SaveTask(_) => "/agregar-tarea-ecs",
            Self::RemoveTask(_) => "/quitar-tarea",
        }
    }

    pub fn phase_id(&self) -> &str {
        match self {
            Self::AddPhase(write) => &write.phase_id,
            Self::RemovePhase(write) => &write.phase_id,
            Self::AddConfigItem(write) | Self::RemoveConfigItem(write) => &write.phase_id,
            Self::AddRequirement(write) | Self::RemoveRequirement(write) => &write.phase_id,
            Self::AddMember(write) => &write.phase_id,
            Self::RemoveMember(write) => &write.phase_id,
            Self::SaveTask(write) => &write.phase_id,
            Self::RemoveTask(write) => &write.phase_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPhase {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "fechaInicio")]
    pub start_date: String,
    #[serde(rename = "fechaFin")]
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTarget {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItemTarget {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
}

/// For removals `requirement_id` carries the requirement-link id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementTarget {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
    #[serde(rename = "requerimientoId")]
    pub requirement_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMember {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
    #[serde(rename = "rolId")]
    pub role_id: EntityId,
    #[serde(rename = "miembroId")]
    pub member_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveMember {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
    #[serde(rename = "miembroId")]
    pub member_link_id: EntityId,
}

/// Creates a task, or edits one when `task_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveTask {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "equipoMiembroId")]
    pub member_id: EntityId,
    #[serde(rename = "fechaInicio")]
    pub start_date: String,
    #[serde(rename = "fechaFin")]
    pub end_date: String,
    #[serde(rename = "tarea_id", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveTask {
    #[serde(rename = "faseId")]
    pub phase_id: EntityId,
    #[serde(rename = "ecsId")]
    pub config_item_id: EntityId,
    #[serde(rename = "tarea_id")]
    pub task_id: EntityId,
}
