use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use common::forms::Form;
use common::{
    AssignedPhase, ConfigurationItem, EntityId, Envelope, Phase, Requirement, Role, Schedule,
    ScheduleWrite, SessionContext, Task, TeamMember, UserInfo,
};
use dashboard_core::{Collection, ListQuery, ListSource, ScheduleApi};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Where the API lives and which session to present to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// A `name=value` cookie string, as printed by `pms session verify-token`.
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            session_cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Reads `PMS_API_URL` and `PMS_SESSION_COOKIE`.
    pub fn from_env() -> Self {
        let api_url = std::env::var("PMS_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_cookie = std::env::var("PMS_SESSION_COOKIE")
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self {
            api_url,
            session_cookie,
        }
    }
}

/// HTTP client for every endpoint the dashboard consumes. Cookies set by the
/// API (the session in particular) are kept and sent back on every request.
#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
    cookies: Arc<Jar>,
}

#[derive(Debug, Deserialize)]
struct Verification {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct Created {
    #[serde(rename = "_id")]
    id: EntityId,
}

impl DashboardClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        let cookies = Arc::new(Jar::default());
        if let Some(cookie) = config.session_cookie.as_deref() {
            let url = Url::parse(&base_url)
                .with_context(|| format!("invalid API url {base_url}"))?;
            cookies.add_cookie_str(cookie, &url);
        }
        let http = Client::builder()
            .cookie_provider(cookies.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cookies currently held for the API, as one `Cookie` header value.
    pub fn session_cookie(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        let header = self.cookies.cookies(&url)?;
        header.to_str().ok().map(str::to_string)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        request
            .send()
            .await
            .with_context(|| format!("failed to call {what}"))?
            .error_for_status()
            .with_context(|| format!("server rejected {what}"))?
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response of {what}"))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<T>> {
        debug!(path, "GET");
        let request = self.request(Method::GET, path).query(query);
        let envelope: Envelope<T> = self.send(request, &format!("GET {path}")).await?;
        Ok(envelope.into_data())
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        Ok(self.get_data(path, &[]).await?.unwrap_or_default())
    }

    /// Sends a write and accepts any 2xx reply. The body is decoded only when
    /// there is one; an empty or non-JSON body reads as an empty envelope.
    async fn send_write(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<Envelope<serde_json::Value>> {
        let body = request
            .send()
            .await
            .with_context(|| format!("failed to call {what}"))?
            .error_for_status()
            .with_context(|| format!("server rejected {what}"))?
            .text()
            .await
            .with_context(|| format!("failed to read response of {what}"))?;
        Ok(write_envelope(&body, what))
    }

    async fn send_body<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Envelope<serde_json::Value>> {
        debug!(path, method = %method, "write");
        let what = format!("{method} {path}");
        let request = self.request(method, path).json(body);
        self.send_write(request, &what).await
    }

    pub async fn schedule(&self, project_id: &str) -> Result<Option<Schedule>> {
        self.get_data(&format!("/proyecto/{project_id}/cronograma"), &[])
            .await
    }

    /// One page of any collection, as the list screens show it.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        query: &ListQuery,
    ) -> Result<Vec<T>> {
        Ok(self
            .get_data(&collection.path(), &query.params())
            .await?
            .unwrap_or_default())
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        id: &str,
    ) -> Result<Option<T>> {
        self.get_data(&collection.item_path(id), &[]).await
    }

    /// Registers an entity. Returns the new id when the API reports one.
    pub async fn create<F: Form>(&self, collection: &Collection, form: &F) -> Result<Option<EntityId>> {
        form.validate()?;
        let envelope = self
            .send_body(Method::POST, &collection.create_path(), form)
            .await?;
        Ok(envelope
            .into_data()
            .and_then(|data| serde_json::from_value::<Created>(data).ok())
            .map(|created| created.id))
    }

    pub async fn update<F: Form>(&self, collection: &Collection, id: &str, form: &F) -> Result<()> {
        form.validate()?;
        self.send_body(Method::PATCH, &collection.item_path(id), form)
            .await?;
        Ok(())
    }

    pub async fn add_project_leader(&self, project_id: &str, user_id: &str) -> Result<()> {
        let path = format!("/proyecto/{project_id}/equipoProyecto/add-project-manager");
        self.send_body(Method::POST, &path, &serde_json::json!({ "user_id": user_id }))
            .await?;
        Ok(())
    }

    pub async fn remove_project_leader(&self, project_id: &str, leader_id: &str) -> Result<()> {
        let path = format!("/proyecto/{project_id}/equipoProyecto/{leader_id}");
        self.send_write(self.request(Method::DELETE, &path), &format!("DELETE {path}"))
            .await?;
        Ok(())
    }

    /// Exchanges a login token for a session cookie. `false` means the API
    /// refused the token.
    pub async fn verify_token(&self, token: &str) -> Result<bool> {
        let request = self
            .request(Method::GET, "/auth/verification")
            .query(&[("token", token)]);
        let verification: Verification = self.send(request, "token verification").await?;
        Ok(verification.success)
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        self.get_data("/usuario/informacion", &[])
            .await?
            .ok_or_else(|| anyhow!("no user information in response; is the session valid?"))
    }

    pub async fn logout(&self) -> Result<()> {
        self.send_write(self.request(Method::GET, "/auth/logout"), "logout")
            .await?;
        Ok(())
    }

    /// The signed-in user's phases with their tasks.
    pub async fn assigned_tasks(&self, session: &SessionContext) -> Result<Vec<AssignedPhase>> {
        let query = session_params(session, None);
        Ok(self.get_data("/tareas", &query).await?.unwrap_or_default())
    }

    pub async fn task_detail(&self, session: &SessionContext, task_id: &str) -> Result<Option<Task>> {
        let query = session_params(session, Some(task_id));
        self.get_data("/tareas/obtener", &query).await
    }
}

fn write_envelope(body: &str, what: &str) -> Envelope<serde_json::Value> {
    if body.trim().is_empty() {
        return Envelope::default();
    }
    match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!(what, error = %err, "write reply is not an envelope");
            Envelope::default()
        }
    }
}

fn session_params(session: &SessionContext, task_id: Option<&str>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(project) = &session.selected_project {
        params.push(("selectedProject".to_string(), project.clone()));
    }
    match task_id {
        Some(task_id) => params.push(("tareaId".to_string(), task_id.to_string())),
        None => {
            if let Some(team_role) = &session.team_role {
                params.push(("teamRole".to_string(), team_role.clone()));
            }
        }
    }
    params
}

#[async_trait]
impl ScheduleApi for DashboardClient {
    async fn fetch_schedule(&self, project_id: &str) -> Result<Option<Schedule>> {
        self.schedule(project_id).await
    }

    async fn methodology_phases(&self, methodology_id: &str) -> Result<Vec<Phase>> {
        self.get_list(&format!("/metodologia/{methodology_id}/fases"))
            .await
    }

    async fn phase_config_items(
        &self,
        methodology_id: &str,
        phase_id: &str,
    ) -> Result<Vec<ConfigurationItem>> {
        self.get_list(&format!("/metodologia/{methodology_id}/fases/{phase_id}/ecs"))
            .await
    }

    async fn roles(&self) -> Result<Vec<Role>> {
        self.get_list("/rol").await
    }

    async fn project_requirements(&self, project_id: &str) -> Result<Vec<Requirement>> {
        self.get_list(&format!("/proyecto/{project_id}/requerimiento"))
            .await
    }

    async fn project_team(&self, project_id: &str) -> Result<Vec<TeamMember>> {
        self.get_list(&format!("/proyecto/{project_id}/equipoProyecto"))
            .await
    }

    async fn write_schedule(
        &self,
        project_id: &str,
        schedule_id: &EntityId,
        write: &ScheduleWrite,
    ) -> Result<()> {
        let path = format!(
            "/proyecto/{project_id}/cronograma/{schedule_id}{}",
            write.path_suffix()
        );
        self.send_body(Method::PATCH, &path, write).await?;
        Ok(())
    }
}

#[async_trait]
impl ListSource for DashboardClient {
    async fn fetch_list<T>(&self, collection: &Collection, query: &ListQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.list(collection, query).await
    }
}
