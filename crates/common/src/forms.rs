//! Registration and edit forms for the catalog screens.
//!
//! Field names serialize to what the API expects; `validate` runs before any
//! request is issued.

use serde::Serialize;

use crate::EntityId;
use crate::dates::parse_day;
use crate::session::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a date in YYYY-MM-DD form, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} '{value}' is not valid")]
    Invalid { field: &'static str, value: String },
}

pub fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(())
}

pub fn require_day(field: &'static str, value: &str) -> Result<(), FormError> {
    require(field, value)?;
    if parse_day(value).is_none() {
        return Err(FormError::InvalidDate {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub trait Form: Serialize + Send + Sync {
    fn validate(&self) -> Result<(), FormError>;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MethodologyForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl Form for MethodologyForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl Form for PhaseForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigurationItemForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fechaInicio")]
    pub start_date: String,
    #[serde(rename = "fechaFin")]
    pub end_date: String,
    pub version: String,
    #[serde(rename = "tipoEcs")]
    pub item_type: EntityId,
    #[serde(rename = "tipoTecnologia")]
    pub technology_type: EntityId,
    #[serde(rename = "estado_id")]
    pub state_id: EntityId,
}

impl Form for ConfigurationItemForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require_day("start date", &self.start_date)?;
        require_day("end date", &self.end_date)?;
        require("version", &self.version)?;
        require("ECS type", &self.item_type)?;
        require("technology type", &self.technology_type)?;
        require("state", &self.state_id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequirementModuleForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl Form for RequirementModuleForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequirementForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "requerimientoModulo_id")]
    pub module_id: EntityId,
}

impl Form for RequirementForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("requirement module", &self.module_id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "metodologia_id")]
    pub methodology_id: EntityId,
    #[serde(rename = "fechaInicio")]
    pub start_date: String,
    #[serde(rename = "fechaFin")]
    pub end_date: String,
}

impl Form for ProjectForm {
    fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("methodology", &self.methodology_id)?;
        require_day("start date", &self.start_date)?;
        require_day("end date", &self.end_date)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamMemberForm {
    pub user_id: EntityId,
    #[serde(rename = "rolEquipo_id")]
    pub team_role_id: EntityId,
}

impl Form for TeamMemberForm {
    fn validate(&self) -> Result<(), FormError> {
        require("user", &self.user_id)?;
        require("team role", &self.team_role_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserForm {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: UserRole,
}

impl Form for UserForm {
    fn validate(&self) -> Result<(), FormError> {
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(FormError::Invalid {
                field: "email",
                value: self.email.trim().to_string(),
            });
        }
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)
    }
}
