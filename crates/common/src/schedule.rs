use serde::{Deserialize, Serialize};

use crate::{EntityId, default_true, nullable};

/// A populated reference such as `{"_id": "...", "nombre": "Design"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamedRef {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserRef {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}

/// A project-team membership as embedded in schedule entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TeamMemberRef {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "user_id"), default, deserialize_with = "nullable")]
    pub user: UserRef,
}

/// The cronograma: a project's phases with their configuration items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Schedule {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "metodologia_id"))]
    pub methodology: NamedRef,
    #[serde(
        rename(deserialize = "cronogramaFase"),
        default,
        deserialize_with = "nullable"
    )]
    pub phases: Vec<PhaseEntry>,
}

impl Schedule {
    pub fn phase(&self, phase_id: &str) -> Option<&PhaseEntry> {
        self.phases
            .iter()
            .find(|entry| entry.phase_id() == Some(phase_id))
    }

    pub fn config_item(&self, phase_id: &str, config_item_id: &str) -> Option<&ConfigItemEntry> {
        self.phase(phase_id)?
            .config_items
            .iter()
            .find(|entry| entry.config_item.id == config_item_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.phases
            .iter()
            .flat_map(|phase| phase.config_items.iter())
            .flat_map(|item| item.tasks.iter())
            .find(|task| task.id == task_id)
    }

    pub fn task_count(&self) -> usize {
        self.phases.iter().map(PhaseEntry::task_count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PhaseEntry {
    #[serde(rename(deserialize = "_id"), default, deserialize_with = "nullable")]
    pub id: EntityId,
    #[serde(rename(deserialize = "fase_id"), default)]
    pub phase: Option<NamedRef>,
    #[serde(rename(deserialize = "fechaInicio"), default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(rename(deserialize = "fechaFin"), default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(rename(deserialize = "progresoInicio"), default, deserialize_with = "nullable")]
    pub progress_start: f64,
    #[serde(rename(deserialize = "progresoFin"), default, deserialize_with = "nullable")]
    pub progress_end: f64,
    #[serde(
        rename(deserialize = "cronogramaEcs"),
        default,
        deserialize_with = "nullable"
    )]
    pub config_items: Vec<ConfigItemEntry>,
}

impl PhaseEntry {
    pub fn phase_id(&self) -> Option<&str> {
        self.phase.as_ref().map(|phase| phase.id.as_str())
    }

    pub fn phase_name(&self) -> &str {
        self.phase
            .as_ref()
            .map(|phase| phase.name.as_str())
            .unwrap_or("(no phase)")
    }

    pub fn task_count(&self) -> usize {
        self.config_items.iter().map(|item| item.tasks.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigItemEntry {
    #[serde(rename(deserialize = "_id"), default, deserialize_with = "nullable")]
    pub id: EntityId,
    #[serde(rename(deserialize = "ecs_id"))]
    pub config_item: NamedRef,
    #[serde(rename(deserialize = "progresoInicio"), default, deserialize_with = "nullable")]
    pub progress_start: f64,
    #[serde(rename(deserialize = "progresoFin"), default, deserialize_with = "nullable")]
    pub progress_end: f64,
    #[serde(
        rename(deserialize = "requerimientos"),
        default,
        deserialize_with = "nullable"
    )]
    pub requirements: Vec<RequirementLink>,
    #[serde(rename(deserialize = "miembros"), default, deserialize_with = "nullable")]
    pub members: Vec<MemberLink>,
    #[serde(rename(deserialize = "tareas"), default, deserialize_with = "nullable")]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RequirementLink {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "requerimiento_id"))]
    pub requirement: NamedRef,
    #[serde(rename(deserialize = "user_id"), default, deserialize_with = "nullable")]
    pub assigned_user: UserRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MemberLink {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "equipoProyecto_id"))]
    pub team_member: TeamMemberRef,
    #[serde(rename(deserialize = "rol_id"), default, deserialize_with = "nullable")]
    pub role: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "titulo"), default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename(deserialize = "equipoProyecto_id"), default)]
    pub assignee: Option<TeamMemberRef>,
    #[serde(rename(deserialize = "fechaInicio"), default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(rename(deserialize = "fechaFin"), default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(rename(deserialize = "progresoInicio"), default, deserialize_with = "nullable")]
    pub progress_start: f64,
    #[serde(rename(deserialize = "progresoFin"), default, deserialize_with = "nullable")]
    pub progress_end: f64,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(rename(deserialize = "revisor"), default)]
    pub reviewer: Option<serde_json::Value>,
    #[serde(rename(deserialize = "aprobador"), default)]
    pub approver: Option<serde_json::Value>,
}

impl Task {
    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map(|member| member.user.name.as_str())
            .unwrap_or("")
    }

    pub fn has_reviewer(&self) -> bool {
        is_present(self.reviewer.as_ref())
    }

    pub fn has_approver(&self) -> bool {
        is_present(self.approver.as_ref())
    }
}

fn is_present(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
        Some(serde_json::Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
