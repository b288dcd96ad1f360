use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use common::{
    ConfigItemEntry, ConfigurationItem, EntityId, MemberLink, NamedRef, Phase, PhaseEntry,
    Requirement, RequirementLink, Role, Schedule, ScheduleWrite, Task, TeamMember, TeamMemberRef,
    UserRef,
};

use crate::api::ScheduleApi;

/// In-memory API that applies writes to its own schedule, records every call
/// by name and fails the calls it is told to.
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub schedule: Option<Schedule>,
    pub phases: Vec<Phase>,
    pub config_items: Vec<ConfigurationItem>,
    pub roles: Vec<Role>,
    pub requirements: Vec<Requirement>,
    pub team: Vec<TeamMember>,
    pub calls: Vec<&'static str>,
    pub writes: Vec<ScheduleWrite>,
    pub failing: HashSet<&'static str>,
    pub empty_reload: bool,
    next_id: usize,
}

impl FakeApi {
    pub fn new(schedule: Schedule) -> Self {
        let state = FakeState {
            schedule: Some(schedule),
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// A project with the RUP methodology, one "Design" phase holding the
    /// "Auth Module" item, and the catalogs the pickers read.
    pub fn seeded() -> Self {
        let api = Self::new(sample_schedule());
        {
            let mut state = api.state();
            state.phases = vec![phase("f1", "Design"), phase("f2", "Build")];
            state.config_items = vec![config_item("e1", "Auth Module"), config_item("e2", "Billing")];
            state.roles = vec![role("r1", "Developer"), role("r2", "Tester")];
            state.requirements = vec![requirement("rq1", "Login"), requirement("rq2", "Logout")];
            state.team = vec![team_member("tm1", "Ana"), team_member("tm2", "Luis")];
        }
        api
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, call: &'static str) {
        self.state().failing.insert(call);
    }

    pub fn recover(&self, call: &'static str) {
        self.state().failing.remove(call);
    }

    pub fn count(&self, call: &str) -> usize {
        self.state().calls.iter().filter(|name| **name == call).count()
    }

    pub fn total_calls(&self) -> usize {
        self.state().calls.len()
    }

    pub fn writes(&self) -> Vec<ScheduleWrite> {
        self.state().writes.clone()
    }

    fn record(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        if state.failing.contains(call) {
            bail!("{call}: 500 Internal Server Error");
        }
        Ok(state)
    }
}

#[async_trait]
impl ScheduleApi for FakeApi {
    async fn fetch_schedule(&self, _project_id: &str) -> Result<Option<Schedule>> {
        let state = self.record("fetch_schedule")?;
        if state.empty_reload {
            return Ok(None);
        }
        Ok(state.schedule.clone())
    }

    async fn methodology_phases(&self, _methodology_id: &str) -> Result<Vec<Phase>> {
        Ok(self.record("methodology_phases")?.phases.clone())
    }

    async fn phase_config_items(
        &self,
        _methodology_id: &str,
        _phase_id: &str,
    ) -> Result<Vec<ConfigurationItem>> {
        Ok(self.record("phase_config_items")?.config_items.clone())
    }

    async fn roles(&self) -> Result<Vec<Role>> {
        Ok(self.record("roles")?.roles.clone())
    }

    async fn project_requirements(&self, _project_id: &str) -> Result<Vec<Requirement>> {
        Ok(self.record("project_requirements")?.requirements.clone())
    }

    async fn project_team(&self, _project_id: &str) -> Result<Vec<TeamMember>> {
        Ok(self.record("project_team")?.team.clone())
    }

    async fn write_schedule(
        &self,
        _project_id: &str,
        schedule_id: &EntityId,
        write: &ScheduleWrite,
    ) -> Result<()> {
        let mut state = self.record("write_schedule")?;
        if state.schedule.as_ref().map(|schedule| &schedule.id) != Some(schedule_id) {
            bail!("unknown schedule {schedule_id}");
        }
        state.writes.push(write.clone());
        state.apply(write);
        Ok(())
    }
}

impl FakeState {
    fn fresh_id(&mut self, prefix: &str) -> EntityId {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn apply(&mut self, write: &ScheduleWrite) {
        match write {
            ScheduleWrite::AddPhase(add) => {
                let name = lookup(&self.phases, &add.phase_id, |phase| (&phase.id, &phase.name));
                let id = self.fresh_id("cf");
                if let Some(schedule) = self.schedule.as_mut() {
                    schedule.phases.push(PhaseEntry {
                        id,
                        phase: Some(named(&add.phase_id, &name)),
                        start_date: format!("{}T00:00:00.000Z", add.start_date),
                        end_date: format!("{}T00:00:00.000Z", add.end_date),
                        ..PhaseEntry::default()
                    });
                }
            }
            ScheduleWrite::RemovePhase(target) => {
                if let Some(schedule) = self.schedule.as_mut() {
                    schedule
                        .phases
                        .retain(|phase| phase.phase_id() != Some(target.phase_id.as_str()));
                }
            }
            ScheduleWrite::AddConfigItem(target) => {
                let name = lookup(&self.config_items, &target.config_item_id, |item| {
                    (&item.id, &item.name)
                });
                if let Some(phase) = self.phase_mut(&target.phase_id) {
                    phase.config_items.push(ConfigItemEntry {
                        config_item: named(&target.config_item_id, &name),
                        ..ConfigItemEntry::default()
                    });
                }
            }
            ScheduleWrite::RemoveConfigItem(target) => {
                if let Some(phase) = self.phase_mut(&target.phase_id) {
                    phase
                        .config_items
                        .retain(|item| item.config_item.id != target.config_item_id);
                }
            }
            ScheduleWrite::AddRequirement(target) => {
                let name = lookup(&self.requirements, &target.requirement_id, |requirement| {
                    (&requirement.id, &requirement.name)
                });
                let id = self.fresh_id("rl");
                if let Some(item) = self.item_mut(&target.phase_id, &target.config_item_id) {
                    item.requirements.push(RequirementLink {
                        id,
                        requirement: named(&target.requirement_id, &name),
                        assigned_user: UserRef::default(),
                    });
                }
            }
            ScheduleWrite::RemoveRequirement(target) => {
                if let Some(item) = self.item_mut(&target.phase_id, &target.config_item_id) {
                    item.requirements
                        .retain(|link| link.id != target.requirement_id);
                }
            }
            ScheduleWrite::AddMember(add) => {
                let member = self
                    .team
                    .iter()
                    .find(|member| member.id == add.member_id)
                    .map(|member| member.user.clone())
                    .unwrap_or_default();
                let role = lookup(&self.roles, &add.role_id, |role| (&role.id, &role.name));
                let id = self.fresh_id("ml");
                if let Some(item) = self.item_mut(&add.phase_id, &add.config_item_id) {
                    item.members.push(MemberLink {
                        id,
                        team_member: TeamMemberRef {
                            id: add.member_id.clone(),
                            user: member,
                        },
                        role: named(&add.role_id, &role),
                    });
                }
            }
            ScheduleWrite::RemoveMember(remove) => {
                if let Some(item) = self.item_mut(&remove.phase_id, &remove.config_item_id) {
                    item.members.retain(|link| link.id != remove.member_link_id);
                }
            }
            ScheduleWrite::SaveTask(save) => {
                let id = match &save.task_id {
                    Some(id) => id.clone(),
                    None => self.fresh_id("t"),
                };
                let assignee = TeamMemberRef {
                    id: save.member_id.clone(),
                    user: UserRef::default(),
                };
                if let Some(item) = self.item_mut(&save.phase_id, &save.config_item_id) {
                    let task = Task {
                        id: id.clone(),
                        title: save.title.clone(),
                        description: save.description.clone(),
                        assignee: Some(assignee),
                        start_date: save.start_date.clone(),
                        end_date: save.end_date.clone(),
                        progress_start: 0.0,
                        progress_end: 0.0,
                        active: true,
                        reviewer: None,
                        approver: None,
                    };
                    match item.tasks.iter_mut().find(|existing| existing.id == id) {
                        Some(existing) => *existing = task,
                        None => item.tasks.push(task),
                    }
                }
            }
            ScheduleWrite::RemoveTask(remove) => {
                if let Some(item) = self.item_mut(&remove.phase_id, &remove.config_item_id) {
                    item.tasks.retain(|task| task.id != remove.task_id);
                }
            }
        }
    }

    fn phase_mut(&mut self, phase_id: &str) -> Option<&mut PhaseEntry> {
        self.schedule
            .as_mut()?
            .phases
            .iter_mut()
            .find(|phase| phase.phase_id() == Some(phase_id))
    }

    fn item_mut(&mut self, phase_id: &str, config_item_id: &str) -> Option<&mut ConfigItemEntry> {
        self.phase_mut(phase_id)?
            .config_items
            .iter_mut()
            .find(|item| item.config_item.id == config_item_id)
    }
}

fn lookup<T>(entries: &[T], id: &str, key: impl Fn(&T) -> (&EntityId, &String)) -> String {
    entries
        .iter()
        .map(key)
        .find(|(entry_id, _)| entry_id.as_str() == id)
        .map(|(_, name)| name.clone())
        .unwrap_or_default()
}

fn named(id: &str, name: &str) -> NamedRef {
    NamedRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub(crate) fn sample_schedule() -> Schedule {
    serde_json::from_value(serde_json::json!({
        "_id": "cr1",
        "metodologia_id": {"_id": "m1", "nombre": "RUP"},
        "cronogramaFase": [{
            "_id": "cf1",
            "fase_id": {"_id": "f1", "nombre": "Design"},
            "fechaInicio": "2024-03-01T00:00:00.000Z",
            "fechaFin": "2024-04-01T00:00:00.000Z",
            "cronogramaEcs": [{
                "ecs_id": {"_id": "e1", "nombre": "Auth Module"},
                "requerimientos": [{
                    "_id": "rl1",
                    "requerimiento_id": {"_id": "rq1", "nombre": "Login"}
                }],
                "miembros": [{
                    "_id": "ml1",
                    "equipoProyecto_id": {"_id": "tm1", "user_id": {"_id": "u1", "name": "Ana"}},
                    "rol_id": {"_id": "r1", "nombre": "Developer"}
                }],
                "tareas": [{
                    "_id": "t1",
                    "titulo": "Draft API",
                    "descripcion": "First cut",
                    "equipoProyecto_id": {"_id": "tm1", "user_id": {"_id": "u1", "name": "Ana"}},
                    "fechaInicio": "2024-03-02T00:00:00.000Z",
                    "fechaFin": "2024-03-09T00:00:00.000Z"
                }]
            }]
        }]
    }))
    .unwrap()
}

fn phase(id: &str, name: &str) -> Phase {
    Phase {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
    }
}

fn config_item(id: &str, name: &str) -> ConfigurationItem {
    serde_json::from_value(serde_json::json!({"_id": id, "nombre": name, "version": "1.0"}))
        .unwrap()
}

fn role(id: &str, name: &str) -> Role {
    Role {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn requirement(id: &str, name: &str) -> Requirement {
    serde_json::from_value(serde_json::json!({"_id": id, "nombre": name})).unwrap()
}

fn team_member(id: &str, name: &str) -> TeamMember {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "user_id": {"_id": format!("u-{id}"), "name": name},
        "rolEquipo_id": {"_id": "tr1", "nombre": "Developer"}
    }))
    .unwrap()
}
