use anyhow::Result;
use async_trait::async_trait;
use common::{
    ConfigurationItem, EntityId, Phase, Requirement, Role, Schedule, ScheduleWrite, TeamMember,
};

/// Everything the schedule editor needs from the remote API.
///
/// Reads return `Ok` with an empty value when the response carries no
/// payload; only transport and status failures are errors.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_schedule(&self, project_id: &str) -> Result<Option<Schedule>>;

    async fn methodology_phases(&self, methodology_id: &str) -> Result<Vec<Phase>>;

    async fn phase_config_items(
        &self,
        methodology_id: &str,
        phase_id: &str,
    ) -> Result<Vec<ConfigurationItem>>;

    async fn roles(&self) -> Result<Vec<Role>>;

    async fn project_requirements(&self, project_id: &str) -> Result<Vec<Requirement>>;

    async fn project_team(&self, project_id: &str) -> Result<Vec<TeamMember>>;

    async fn write_schedule(
        &self,
        project_id: &str,
        schedule_id: &EntityId,
        write: &ScheduleWrite,
    ) -> Result<()>;
}
