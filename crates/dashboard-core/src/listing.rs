//! The list/search/paginate screen, once, for every catalog entity.

use std::fmt::Write as _;

use anyhow::Result;
use async_trait::async_trait;
use common::{
    ConfigurationItem, EntityId, Methodology, NamedRef, Phase, Project, Requirement,
    RequirementModule, Role, SessionContext, State, TeamMember, UserAccount, UserRole, dates,
};
use serde::de::DeserializeOwned;
use tracing::warn;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SORT: &str = "createdAt";
const SEARCH_PARAM: &str = "or[0][0][nombre][regex]";

/// A server-side collection and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Methodologies,
    Phases {
        methodology_id: EntityId,
    },
    ConfigurationItems {
        methodology_id: EntityId,
        phase_id: EntityId,
    },
    ConfigItemTypes {
        methodology_id: EntityId,
        phase_id: EntityId,
    },
    TechnologyTypes {
        methodology_id: EntityId,
        phase_id: EntityId,
    },
    RequirementModules,
    Requirements {
        project_id: EntityId,
    },
    Projects,
    ProjectTeam {
        project_id: EntityId,
    },
    Users,
    Roles,
    States,
}

impl Collection {
    pub fn path(&self) -> String {
        match self {
            Self::Methodologies => "/metodologia".to_string(),
            Self::Phases { methodology_id } => format!("/metodologia/{methodology_id}/fases"),
            Self::ConfigurationItems {
                methodology_id,
                phase_id,
            } => format!("/metodologia/{methodology_id}/fases/{phase_id}/ecs"),
            Self::ConfigItemTypes {
                methodology_id,
                phase_id,
            } => format!("/metodologia/{methodology_id}/fases/{phase_id}/ecs/listar-tipos-ecs"),
            Self::TechnologyTypes {
                methodology_id,
                phase_id,
            } => format!(
                "/metodologia/{methodology_id}/fases/{phase_id}/ecs/listar-tipos-tecnologia"
            ),
            Self::RequirementModules => "/moduloRequerimiento".to_string(),
            Self::Requirements { project_id } => format!("/proyecto/{project_id}/requerimiento"),
            Self::Projects => "/proyecto".to_string(),
            Self::ProjectTeam { project_id } => format!("/proyecto/{project_id}/equipoProyecto"),
            Self::Users => "/usuario/obtenerUsuarios".to_string(),
            Self::Roles => "/rol".to_string(),
            Self::States => "/estado".to_string(),
        }
    }

    /// Where registrations are posted; a few collections use a verb route.
    pub fn create_path(&self) -> String {
        match self {
            Self::Methodologies => "/metodologia/registrar".to_string(),
            Self::Users => "/usuario/registrarUsuario".to_string(),
            other => other.path(),
        }
    }

    pub fn item_path(&self, id: &str) -> String {
        match self {
            Self::Users => format!("/usuario/{id}"),
            other => format!("{}/{id}", other.path()),
        }
    }
}

/// Paging, sorting and search state of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: String,
    pub search: String,
    pub active: Option<bool>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: DEFAULT_SORT.to_string(),
            search: String::new(),
            active: None,
        }
    }
}

impl ListQuery {
    /// Plain users only ever see active entries.
    pub fn for_session(session: &SessionContext) -> Self {
        let active = match session.role {
            UserRole::User => Some(true),
            UserRole::Admin | UserRole::ProjectLead => None,
        };
        Self {
            active,
            ..Self::default()
        }
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sort".to_string(), self.sort.clone()),
        ];
        if !self.search.trim().is_empty() {
            params.push((SEARCH_PARAM.to_string(), self.search.trim().to_string()));
        }
        if let Some(active) = self.active {
            params.push(("active".to_string(), active.to_string()));
        }
        params
    }
}

#[async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch_list<T>(&self, collection: &Collection, query: &ListQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static;
}

/// How an entity shows up as a table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row_id(&self) -> &str;

    fn cells(&self) -> Vec<String>;
}

pub struct ListResource<T> {
    collection: Collection,
    query: ListQuery,
    rows: Vec<T>,
}

impl<T> ListResource<T>
where
    T: TableRow + DeserializeOwned + Send + 'static,
{
    pub fn new(collection: Collection, session: &SessionContext) -> Self {
        Self {
            collection,
            query: ListQuery::for_session(session),
            rows: Vec::new(),
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.query.limit = limit.max(1);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort: impl Into<String>) {
        self.query.sort = sort.into();
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    /// Re-fetches the current page. Failures show as an empty table.
    pub async fn refresh<S: ListSource>(&mut self, source: &S) -> &[T] {
        self.rows = match source.fetch_list::<T>(&self.collection, &self.query).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    collection = %self.collection.path(),
                    error = %format!("{err:#}"),
                    "failed to fetch list"
                );
                Vec::new()
            }
        };
        &self.rows
    }

    pub fn render(&self) -> String {
        render_table(T::HEADERS, self.rows.iter().map(TableRow::cells))
    }
}

/// Left-aligned plain-text table with an id column first.
pub fn render_table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, &rule, &widths);
    if rows.is_empty() {
        out.push_str("(no entries)\n");
    }
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

impl TableRow for Methodology {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "DESCRIPTION", "ACTIVE"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            yes_no(self.active),
        ]
    }
}

impl TableRow for Phase {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "DESCRIPTION"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.description.clone()]
    }
}

impl TableRow for ConfigurationItem {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "VERSION", "START", "END"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.version.clone(),
            dates::display_day(&self.start_date),
            dates::display_day(&self.end_date),
        ]
    }
}

impl TableRow for RequirementModule {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "DESCRIPTION"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.description.clone()]
    }
}

impl TableRow for Requirement {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "DESCRIPTION", "ACTIVE"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            yes_no(self.active),
        ]
    }
}

impl TableRow for Project {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "START", "END", "ACTIVE"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            dates::display_day(&self.start_date),
            dates::display_day(&self.end_date),
            yes_no(self.active),
        ]
    }
}

impl TableRow for TeamMember {
    const HEADERS: &'static [&'static str] = &["ID", "USER", "TEAM ROLE", "ACTIVE"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.name.clone(),
            self.team_role.name.clone(),
            yes_no(self.active),
        ]
    }
}

impl TableRow for Role {
    const HEADERS: &'static [&'static str] = &["ID", "NAME"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl TableRow for State {
    const HEADERS: &'static [&'static str] = &["ID", "NAME"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

/// ECS and technology types are bare `{_id, nombre}` entries.
impl TableRow for NamedRef {
    const HEADERS: &'static [&'static str] = &["ID", "NAME"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl TableRow for UserAccount {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE", "ACTIVE"];

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.role.clone(),
            yes_no(self.active),
        ]
    }
}
