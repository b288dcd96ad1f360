use serde::{Deserialize, Deserializer};

pub mod catalog;
pub mod dates;
pub mod forms;
pub mod schedule;
pub mod session;
pub mod writes;

pub use catalog::{
    AssignedPhase, ConfigurationItem, Methodology, Phase, Project, Requirement,
    RequirementModule, Role, State, TeamMember, UserAccount,
};
pub use forms::FormError;
pub use schedule::{
    ConfigItemEntry, MemberLink, NamedRef, PhaseEntry, RequirementLink, Schedule, Task,
    TeamMemberRef, UserRef,
};
pub use session::{SessionContext, UserInfo, UserRole};
pub use writes::ScheduleWrite;

/// Server-assigned identifier (a Mongo object id on the wire).
pub type EntityId = String;

/// Every API response is wrapped as `{ "status": ..., "data": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            status: None,
            data: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Missing payloads and non-success statuses both read as "nothing".
    pub fn into_data(self) -> Option<T> {
        match self.status.as_deref() {
            Some(status) if status != "success" => None,
            _ => self.data,
        }
    }
}

impl<T: Default> Envelope<T> {
    pub fn into_data_or_default(self) -> T {
        self.into_data().unwrap_or_default()
    }
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn default_true() -> bool {
    true
}
