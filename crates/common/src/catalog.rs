use serde::{Deserialize, Serialize};

use crate::schedule::{NamedRef, Task, UserRef};
use crate::{EntityId, default_true, nullable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Methodology {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
}

/// An ECS definition as registered under a methodology phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationItem {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename(deserialize = "fechaInicio"), default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(rename(deserialize = "fechaFin"), default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
    #[serde(rename(deserialize = "tipoEcs"), default)]
    pub item_type: Option<serde_json::Value>,
    #[serde(rename(deserialize = "tipoTecnologia"), default)]
    pub technology_type: Option<serde_json::Value>,
    #[serde(rename(deserialize = "estado_id"), default)]
    pub state: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementModule {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename(deserialize = "requerimientoModulo_id"), default)]
    pub module: Option<serde_json::Value>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename(deserialize = "descripcion"), default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename(deserialize = "metodologia_id"), default)]
    pub methodology: Option<serde_json::Value>,
    #[serde(rename(deserialize = "fechaInicio"), default, deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(rename(deserialize = "fechaFin"), default, deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A user's membership in a project team, with the team role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "user_id"), default, deserialize_with = "nullable")]
    pub user: UserRef,
    #[serde(rename(deserialize = "rolEquipo_id"), default, deserialize_with = "nullable")]
    pub team_role: NamedRef,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl TeamMember {
    /// `Ana - Developer`, the way member pickers label entries.
    pub fn label(&self) -> String {
        if self.team_role.name.is_empty() {
            self.user.name.clone()
        } else {
            format!("{} - {}", self.user.name, self.team_role.name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
}

/// Lifecycle state an ECS can be registered with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(rename(deserialize = "nombre"), default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    #[serde(rename(deserialize = "_id"))]
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub role: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// One phase of the signed-in user's task calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignedPhase {
    #[serde(rename(deserialize = "faseDetalles"), default, deserialize_with = "nullable")]
    pub phase: NamedRef,
    #[serde(rename(deserialize = "cronogramaEcs"), default, deserialize_with = "nullable")]
    pub config_item: AssignedConfigItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssignedConfigItem {
    #[serde(rename(deserialize = "tareas"), default, deserialize_with = "nullable")]
    pub tasks: Vec<Task>,
}
