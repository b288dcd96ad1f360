use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "jefe proyecto")]
    ProjectLead,
    #[serde(rename = "user")]
    User,
}

impl UserRole {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProjectLead => "jefe proyecto",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "jefe proyecto" | "jefe-proyecto" | "project-lead" => Ok(Self::ProjectLead),
            "user" => Ok(Self::User),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// The signed-in user, as returned by `/usuario/informacion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
}

/// Who is looking at a screen and which project they are working in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub role: UserRole,
    pub selected_project: Option<EntityId>,
    pub team_role: Option<String>,
    pub committee_id: Option<EntityId>,
}

impl SessionContext {
    pub fn new(role: UserRole) -> Self {
        Self {
            role,
            selected_project: None,
            team_role: None,
            committee_id: None,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<EntityId>) -> Self {
        self.selected_project = Some(project_id.into());
        self
    }

    pub fn with_team_role(mut self, team_role: impl Into<String>) -> Self {
        self.team_role = Some(team_role.into());
        self
    }

    pub fn with_committee(mut self, committee_id: impl Into<EntityId>) -> Self {
        self.committee_id = Some(committee_id.into());
        self
    }

    /// Plain users must pick a project (or hold a committee seat with a team
    /// role) before the dashboard is usable.
    pub fn requires_project_selection(&self) -> bool {
        match self.role {
            UserRole::Admin | UserRole::ProjectLead => false,
            UserRole::User => {
                let committee_seat = self.committee_id.is_some() && self.team_role.is_some();
                self.selected_project.is_none() && !committee_seat
            }
        }
    }

    /// Forgets the project selection, as "select project" and logout do.
    pub fn clear_project(&mut self) {
        self.selected_project = None;
        self.team_role = None;
        self.committee_id = None;
    }
}
