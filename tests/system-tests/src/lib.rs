#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::process::Stdio;
    use std::sync::{Arc, Mutex, OnceLock};
    use std::time::Duration;

    use anyhow::{Context, Result, bail};
    use axum::extract::{Path, Query, State};
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use client_sdk::{ClientConfig, DashboardClient};
    use common::forms::MethodologyForm;
    use common::{Methodology, Requirement, SessionContext, UserRole};
    use dashboard_core::{
        Category, Collection, EditorCommand, ListQuery, ListResource, PhaseDraft, ScheduleEditor,
        TaskDraft,
    };
    use serde_json::{Value, json};
    use tokio::process::{Child, Command};
    use tokio::time::sleep;

    #[tokio::test]
    async fn client_reads_schedule_through_the_envelope() -> Result<()> {
        let api = FakeApi::start().await?;
        let client = api.client()?;

        let schedule = client
            .schedule("p1")
            .await?
            .context("schedule missing")?;
        assert_eq!(schedule.id, "cr1");
        assert_eq!(schedule.methodology.name, "RUP");
        assert_eq!(schedule.phases.len(), 1);
        assert_eq!(schedule.phases[0].config_items[0].config_item.name, "Auth Module");

        api.set_schedule(Value::Null);
        assert!(client.schedule("p1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn editor_writes_once_and_reloads_against_live_api() -> Result<()> {
        let api = FakeApi::start().await?;
        let mut editor = ScheduleEditor::open(api.client()?, "p1").await;
        assert_eq!(api.total_calls(), 5);
        assert_eq!(editor.candidates().phases.len(), 2);
        assert_eq!(editor.candidates().members.len(), 2);

        let notification = editor
            .add_phase(&PhaseDraft::new("f2", "2024-04-01", "2024-04-30"))
            .await;
        assert!(notification.is_success(), "{notification}");
        assert_eq!(api.count("write"), 1);
        assert_eq!(api.count("schedule"), 2);

        let written = api.writes();
        assert_eq!(written[0].0, "");
        assert_eq!(written[0].1["faseId"], "f2");
        assert_eq!(written[0].1["fechaInicio"], "2024-04-01");

        let schedule = editor.schedule().context("schedule missing")?;
        assert_eq!(schedule.phases.len(), 2);
        assert_eq!(schedule.phases[1].phase_name(), "Build");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_api() -> Result<()> {
        let api = FakeApi::start().await?;
        let mut editor = ScheduleEditor::open(api.client()?, "p1").await;
        let before = api.total_calls();

        let notification = editor.add_phase(&PhaseDraft::new("f2", "", "")).await;
        assert!(!notification.is_success());

        editor.select(Category::Tasks, "f1", "e1");
        editor.set_task_draft(TaskDraft {
            title: "   ".to_string(),
            ..TaskDraft::default()
        });
        let notification = editor.save_task().await;
        assert_eq!(notification.message, "title is required");

        assert_eq!(api.total_calls(), before);
        Ok(())
    }

    #[tokio::test]
    async fn config_item_picker_and_task_flow_against_live_api() -> Result<()> {
        let api = FakeApi::start().await?;
        let mut editor = ScheduleEditor::open(api.client()?, "p1").await;

        let candidates = editor.open_config_item_picker("f1").await.to_vec();
        assert_eq!(candidates.len(), 2);
        assert_eq!(api.count("config_items"), 1);

        let notification = EditorCommand::AddConfigItem {
            config_item_id: "e2".to_string(),
        }
        .apply(&mut editor)
        .await
        .context("adding an item reports an outcome")?;
        assert!(notification.is_success(), "{notification}");
        assert!(editor.picker().is_none());

        editor.select(Category::Tasks, "f1", "e2");
        editor.set_task_draft(TaskDraft {
            title: "Invoice export".to_string(),
            description: "CSV first".to_string(),
            member_id: "tm2".to_string(),
            start_date: "2024-03-04".to_string(),
            end_date: "2024-03-08".to_string(),
        });
        let notification = editor.save_task().await;
        assert!(notification.is_success(), "{notification}");

        let (suffix, body) = api.writes().pop().context("no task write")?;
        assert_eq!(suffix, "/agregar-tarea-ecs");
        assert_eq!(body["ecsId"], "e2");
        assert_eq!(body["equipoMiembroId"], "tm2");
        assert!(body.get("tarea_id").is_none());

        assert_eq!(editor.tasks().len(), 1);
        assert_eq!(editor.tasks()[0].title, "Invoice export");
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_keeps_the_snapshot() -> Result<()> {
        let api = FakeApi::start().await?;
        let mut editor = ScheduleEditor::open(api.client()?, "p1").await;
        let before = editor.schedule().cloned();

        api.fail_writes();
        let notification = editor.remove_phase("f1").await;
        assert!(!notification.is_success());
        assert_eq!(editor.schedule().cloned(), before);
        assert_eq!(api.count("schedule"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn write_answered_without_content_still_reloads() -> Result<()> {
        let api = FakeApi::start().await?;
        api.answer_writes_with_no_content();
        let mut editor = ScheduleEditor::open(api.client()?, "p1").await;

        let notification = editor
            .add_phase(&PhaseDraft::new("f2", "2024-04-01", "2024-04-30"))
            .await;
        assert!(notification.is_success(), "{notification}");
        assert_eq!(api.count("write"), 1);
        assert_eq!(api.count("schedule"), 2);
        assert_eq!(editor.schedule().context("schedule missing")?.phases.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_query_reaches_the_api_with_paging_and_search() -> Result<()> {
        let api = FakeApi::start().await?;
        let client = api.client()?;

        let session = SessionContext::new(UserRole::User).with_project("p1");
        let mut list = ListResource::<Requirement>::new(
            Collection::Requirements {
                project_id: "p1".to_string(),
            },
            &session,
        );
        list.set_search("Log");
        list.refresh(&client).await;

        assert_eq!(list.rows().len(), 2);
        let query = api.last_query("requirements").context("no list query")?;
        assert_eq!(query.get("page").map(String::as_str), Some("1"));
        assert_eq!(query.get("limit").map(String::as_str), Some("10"));
        assert_eq!(query.get("active").map(String::as_str), Some("true"));
        assert_eq!(
            query.get("or[0][0][nombre][regex]").map(String::as_str),
            Some("Log")
        );

        let rows: Vec<Methodology> = client
            .list(&Collection::Methodologies, &ListQuery::default())
            .await?;
        assert_eq!(rows[0].name, "RUP");
        Ok(())
    }

    #[tokio::test]
    async fn create_validates_before_posting() -> Result<()> {
        let api = FakeApi::start().await?;
        let client = api.client()?;

        let incomplete = MethodologyForm {
            name: "Scrum".to_string(),
            description: String::new(),
        };
        assert!(client.create(&Collection::Methodologies, &incomplete).await.is_err());
        assert_eq!(api.count("register"), 0);

        let form = MethodologyForm {
            name: "Scrum".to_string(),
            description: "Sprints".to_string(),
        };
        let id = client.create(&Collection::Methodologies, &form).await?;
        assert_eq!(id.as_deref(), Some("m9"));
        assert_eq!(api.count("register"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn verified_token_leaves_a_session_cookie() -> Result<()> {
        let api = FakeApi::start().await?;
        let client = api.client()?;

        assert!(!client.verify_token("bad").await?);
        assert!(client.verify_token("good").await?);
        assert_eq!(client.session_cookie().as_deref(), Some("token=session-1"));

        let user = client.user_info().await?;
        assert_eq!(user.role, UserRole::ProjectLead);
        assert_eq!(api.last_cookie().as_deref(), Some("token=session-1"));
        Ok(())
    }

    #[tokio::test]
    async fn cli_shows_and_edits_the_schedule() -> Result<()> {
        let api = FakeApi::start().await?;
        let api_url = api.url();

        let output = run_cli(&["--api-url", &api_url, "--project", "p1", "schedule", "show"]).await?;
        assert!(output.contains("schedule cr1 (methodology RUP)"));
        assert!(output.contains("Auth Module [e1]"));

        let output = run_cli(&[
            "--api-url",
            &api_url,
            "--project",
            "p1",
            "schedule",
            "add-phase",
            "f2",
            "2024-04-01",
            "2024-04-30",
        ])
        .await?;
        assert!(output.contains("Build [f2]"));
        assert_eq!(api.count("write"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn cli_rejects_invalid_task_without_writing() -> Result<()> {
        let api = FakeApi::start().await?;
        let api_url = api.url();

        let result = run_cli(&[
            "--api-url",
            &api_url,
            "--project",
            "p1",
            "schedule",
            "add-task",
            "f1",
            "e1",
            "--member",
            "tm1",
        ])
        .await;
        let err = result.err().context("task without title was accepted")?;
        assert!(format!("{err:#}").contains("title is required"));
        assert_eq!(api.count("write"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn cli_lists_methodologies_as_json() -> Result<()> {
        let api = FakeApi::start().await?;
        let api_url = api.url();

        let output = run_cli(&[
            "--api-url",
            &api_url,
            "--role",
            "admin",
            "--json",
            "list",
            "methodologies",
        ])
        .await?;
        let rows: Value = serde_json::from_str(&output).context("list output is not JSON")?;
        assert_eq!(rows[0]["name"], "RUP");

        let query = api.last_query("methodologies").context("no list query")?;
        assert!(!query.contains_key("active"));
        Ok(())
    }

    #[tokio::test]
    async fn cli_web_interface_ping() -> Result<()> {
        let api = FakeApi::start().await?;
        let bind = "127.0.0.1:19181";
        let mut web = start_cli_web(&api.url(), bind).await?;

        let ping: Value = reqwest::get(format!("http://{bind}/api/ping"))
            .await
            .context("failed to call web ping")?
            .json()
            .await?;
        assert_eq!(ping["service"], "pms-web");

        let view: Value = reqwest::get(format!("http://{bind}/api/projects/p1/schedule"))
            .await
            .context("failed to fetch schedule view")?
            .json()
            .await?;
        assert_eq!(view["state"], "ready");
        assert_eq!(view["schedule"]["id"], "cr1");

        stop_process(&mut web).await;
        Ok(())
    }

    #[tokio::test]
    async fn cli_web_actions_return_the_new_view() -> Result<()> {
        let api = FakeApi::start().await?;
        let bind = "127.0.0.1:19182";
        let mut web = start_cli_web(&api.url(), bind).await?;
        let http = reqwest::Client::new();

        let payload: Value = http
            .post(format!("http://{bind}/api/projects/p1/actions"))
            .json(&json!({ "action": "remove_phase", "phase_id": "f1" }))
            .send()
            .await
            .context("failed to post action")?
            .json()
            .await?;
        assert_eq!(payload["notification"]["kind"], "success");
        assert_eq!(payload["view"]["schedule"]["phases"], json!([]));
        assert_eq!(api.writes()[0].0, "/quitar-fase");

        let report: Value = http
            .get(format!("http://{bind}/api/projects/p1/report"))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(report["summary"]["total"], 0);

        stop_process(&mut web).await;
        Ok(())
    }

    #[derive(Default)]
    struct Backend {
        schedule: Value,
        calls: HashMap<&'static str, usize>,
        queries: HashMap<&'static str, HashMap<String, String>>,
        writes: Vec<(String, Value)>,
        fail_writes: bool,
        empty_write_replies: bool,
        last_cookie: Option<String>,
        next_id: usize,
    }

    type Shared = Arc<Mutex<Backend>>;

    /// An in-process stand-in for the dashboard API, answering with the same
    /// envelopes and field names the real one uses.
    struct FakeApi {
        addr: SocketAddr,
        backend: Shared,
    }

    impl FakeApi {
        async fn start() -> Result<Self> {
            let backend = Arc::new(Mutex::new(Backend {
                schedule: seeded_schedule(),
                ..Backend::default()
            }));

            let app = Router::new()
                .route("/api/proyecto/{project}/cronograma", get(fake_schedule))
                .route("/api/proyecto/{project}/cronograma/{schedule}", patch(fake_add_phase))
                .route(
                    "/api/proyecto/{project}/cronograma/{schedule}/{action}",
                    patch(fake_write),
                )
                .route("/api/metodologia", get(fake_methodologies))
                .route("/api/metodologia/registrar", post(fake_register))
                .route("/api/metodologia/{methodology}/fases", get(fake_phases))
                .route(
                    "/api/metodologia/{methodology}/fases/{phase}/ecs",
                    get(fake_config_items),
                )
                .route("/api/rol", get(fake_roles))
                .route("/api/proyecto/{project}/requerimiento", get(fake_requirements))
                .route("/api/proyecto/{project}/equipoProyecto", get(fake_team))
                .route("/api/auth/verification", get(fake_verification))
                .route("/api/usuario/informacion", get(fake_user_info))
                .with_state(backend.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .context("failed to bind fake API")?;
            let addr = listener.local_addr()?;
            tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });

            Ok(Self { addr, backend })
        }

        fn url(&self) -> String {
            format!("http://{}/api", self.addr)
        }

        fn client(&self) -> Result<DashboardClient> {
            DashboardClient::new(&ClientConfig::new(self.url()))
        }

        fn with<R>(&self, f: impl FnOnce(&mut Backend) -> R) -> R {
            let mut backend = self.backend.lock().unwrap();
            f(&mut backend)
        }

        fn set_schedule(&self, schedule: Value) {
            self.with(|backend| backend.schedule = schedule);
        }

        fn fail_writes(&self) {
            self.with(|backend| backend.fail_writes = true);
        }

        fn answer_writes_with_no_content(&self) {
            self.with(|backend| backend.empty_write_replies = true);
        }

        fn count(&self, call: &str) -> usize {
            self.with(|backend| backend.calls.get(call).copied().unwrap_or(0))
        }

        fn total_calls(&self) -> usize {
            self.with(|backend| backend.calls.values().sum())
        }

        fn writes(&self) -> Vec<(String, Value)> {
            self.with(|backend| backend.writes.clone())
        }

        fn last_query(&self, call: &str) -> Option<HashMap<String, String>> {
            self.with(|backend| backend.queries.get(call).cloned())
        }

        fn last_cookie(&self) -> Option<String> {
            self.with(|backend| backend.last_cookie.clone())
        }
    }

    fn hit(backend: &Shared, call: &'static str) {
        *backend.lock().unwrap().calls.entry(call).or_default() += 1;
    }

    fn ok(data: Value) -> Json<Value> {
        Json(json!({ "status": "success", "data": data }))
    }

    fn seeded_phases() -> Value {
        json!([
            { "_id": "f1", "nombre": "Design" },
            { "_id": "f2", "nombre": "Build" }
        ])
    }

    fn seeded_items() -> Value {
        json!([
            { "_id": "e1", "nombre": "Auth Module" },
            { "_id": "e2", "nombre": "Billing" }
        ])
    }

    fn seeded_team() -> Value {
        json!([
            {
                "_id": "tm1",
                "user_id": { "_id": "u1", "nombre": "Ana" },
                "rolEquipo_id": { "_id": "r1", "nombre": "Developer" }
            },
            {
                "_id": "tm2",
                "user_id": { "_id": "u2", "nombre": "Luis" },
                "rolEquipo_id": { "_id": "r1", "nombre": "Developer" }
            }
        ])
    }

    fn seeded_schedule() -> Value {
        json!({
            "_id": "cr1",
            "metodologia_id": { "_id": "m1", "nombre": "RUP" },
            "cronogramaFase": [{
                "_id": "cf1",
                "fase_id": { "_id": "f1", "nombre": "Design" },
                "fechaInicio": "2024-03-01T00:00:00.000Z",
                "fechaFin": "2024-03-31T00:00:00.000Z",
                "cronogramaEcs": [{
                    "_id": "ce1",
                    "ecs_id": { "_id": "e1", "nombre": "Auth Module" },
                    "requerimientos": [],
                    "miembros": [],
                    "tareas": []
                }]
            }]
        })
    }

    fn named(list: &Value, id: &str) -> Value {
        list.as_array()
            .and_then(|entries| entries.iter().find(|entry| entry["_id"] == id))
            .cloned()
            .unwrap_or_else(|| json!({ "_id": id, "nombre": id }))
    }

    async fn fake_schedule(State(backend): State<Shared>) -> impl IntoResponse {
        hit(&backend, "schedule");
        let schedule = backend.lock().unwrap().schedule.clone();
        ok(schedule)
    }

    async fn fake_add_phase(
        State(backend): State<Shared>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        record_write(&backend, "", body)
    }

    async fn fake_write(
        State(backend): State<Shared>,
        Path((_project, _schedule, action)): Path<(String, String, String)>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        record_write(&backend, &format!("/{action}"), body)
    }

    fn record_write(backend: &Shared, suffix: &str, body: Value) -> axum::response::Response {
        hit(backend, "write");
        let mut backend = backend.lock().unwrap();
        if backend.fail_writes {
            return (StatusCode::INTERNAL_SERVER_ERROR, ok(Value::Null)).into_response();
        }
        backend.writes.push((suffix.to_string(), body.clone()));
        backend.next_id += 1;
        let id = backend.next_id;
        apply_write(&mut backend.schedule, suffix, &body, id);
        if backend.empty_write_replies {
            return StatusCode::NO_CONTENT.into_response();
        }
        ok(json!({})).into_response()
    }

    fn apply_write(schedule: &mut Value, suffix: &str, body: &Value, id: usize) {
        let Some(phases) = schedule["cronogramaFase"].as_array_mut() else {
            return;
        };
        let phase_id = body["faseId"].clone();
        match suffix {
            "" => phases.push(json!({
                "_id": format!("cf-{id}"),
                "fase_id": named(&seeded_phases(), phase_id.as_str().unwrap_or_default()),
                "fechaInicio": body["fechaInicio"],
                "fechaFin": body["fechaFin"],
                "cronogramaEcs": []
            })),
            "/quitar-fase" => phases.retain(|phase| phase["fase_id"]["_id"] != phase_id),
            "/agregar-ecs" | "/agregar-tarea-ecs" => {
                let Some(phase) = phases
                    .iter_mut()
                    .find(|phase| phase["fase_id"]["_id"] == phase_id)
                else {
                    return;
                };
                let item_id = body["ecsId"].as_str().unwrap_or_default().to_string();
                let Some(items) = phase["cronogramaEcs"].as_array_mut() else {
                    return;
                };
                if suffix == "/agregar-ecs" {
                    items.push(json!({
                        "_id": format!("ce-{id}"),
                        "ecs_id": named(&seeded_items(), &item_id),
                        "tareas": []
                    }));
                } else if let Some(item) = items
                    .iter_mut()
                    .find(|item| item["ecs_id"]["_id"] == item_id.as_str())
                    && let Some(tasks) = item["tareas"].as_array_mut()
                {
                    tasks.push(json!({
                        "_id": format!("t-{id}"),
                        "titulo": body["titulo"],
                        "descripcion": body["descripcion"],
                        "equipoProyecto_id": named(&seeded_team(), body["equipoMiembroId"].as_str().unwrap_or_default()),
                        "fechaInicio": body["fechaInicio"],
                        "fechaFin": body["fechaFin"]
                    }));
                }
            }
            _ => {}
        }
    }

    async fn fake_methodologies(
        State(backend): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        hit(&backend, "methodologies");
        backend.lock().unwrap().queries.insert("methodologies", query);
        ok(json!([{ "_id": "m1", "nombre": "RUP", "descripcion": "Unified process" }]))
    }

    async fn fake_register(
        State(backend): State<Shared>,
        Json(_body): Json<Value>,
    ) -> impl IntoResponse {
        hit(&backend, "register");
        ok(json!({ "_id": "m9" }))
    }

    async fn fake_phases(State(backend): State<Shared>) -> impl IntoResponse {
        hit(&backend, "phases");
        ok(seeded_phases())
    }

    async fn fake_config_items(State(backend): State<Shared>) -> impl IntoResponse {
        hit(&backend, "config_items");
        ok(seeded_items())
    }

    async fn fake_roles(State(backend): State<Shared>) -> impl IntoResponse {
        hit(&backend, "roles");
        ok(json!([
            { "_id": "r1", "nombre": "Developer" },
            { "_id": "r2", "nombre": "Tester" }
        ]))
    }

    async fn fake_requirements(
        State(backend): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        hit(&backend, "requirements");
        backend.lock().unwrap().queries.insert("requirements", query);
        ok(json!([
            { "_id": "rq1", "nombre": "Login" },
            { "_id": "rq2", "nombre": "Logout" }
        ]))
    }

    async fn fake_team(State(backend): State<Shared>) -> impl IntoResponse {
        hit(&backend, "team");
        ok(seeded_team())
    }

    async fn fake_verification(
        State(backend): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        hit(&backend, "verification");
        if query.get("token").map(String::as_str) == Some("good") {
            (
                [(header::SET_COOKIE, "token=session-1; Path=/")],
                Json(json!({ "success": true })),
            )
                .into_response()
        } else {
            Json(json!({ "success": false })).into_response()
        }
    }

    async fn fake_user_info(
        State(backend): State<Shared>,
        headers: axum::http::HeaderMap,
    ) -> impl IntoResponse {
        hit(&backend, "user_info");
        backend.lock().unwrap().last_cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        ok(json!({ "name": "Ana", "email": "ana@example.com", "role": "jefe proyecto" }))
    }

    async fn run_cli(args: &[&str]) -> Result<String> {
        let cli_bin = binary_path("pms")?;
        let output = Command::new(cli_bin)
            .args(args)
            .env_remove("PMS_SESSION_COOKIE")
            .env_remove("PMS_USER_ROLE")
            .output()
            .await
            .context("failed to execute pms")?;

        if !output.status.success() {
            bail!("pms failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn start_cli_web(api_url: &str, bind: &str) -> Result<Child> {
        let cli_bin = binary_path("pms")?;

        let child = Command::new(cli_bin)
            .arg("--api-url")
            .arg(api_url)
            .arg("serve-web")
            .arg("--bind")
            .arg(bind)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("failed to spawn pms serve-web")?;

        wait_for_url_status(&format!("http://{bind}/api/ping"), StatusCode::OK, 40).await?;
        Ok(child)
    }

    async fn wait_for_url_status(url: &str, expected: StatusCode, retries: usize) -> Result<()> {
        let http = reqwest::Client::new();

        for _ in 0..retries {
            if let Ok(resp) = http.get(url).send().await
                && resp.status().as_u16() == expected.as_u16()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }

        bail!("service did not return {expected} at {url}");
    }

    async fn stop_process(child: &mut Child) {
        let _ = child.kill().await;
        let _ = child.wait().await;
    }

    fn binary_path(name: &str) -> Result<PathBuf> {
        let workspace_root = workspace_root()?;
        ensure_binaries_built(&workspace_root)?;
        let mut filename = OsString::from(name);
        filename.push(std::env::consts::EXE_SUFFIX);
        let path = workspace_root.join("target").join("debug").join(filename);

        if !path.exists() {
            bail!("expected binary does not exist: {}", path.display());
        }

        Ok(path)
    }

    fn workspace_root() -> Result<PathBuf> {
        let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        crate_dir
            .parent()
            .and_then(|p| p.parent())
            .map(PathBuf::from)
            .context("failed to resolve workspace root")
    }

    fn build_required_binaries(workspace_root: &PathBuf) -> Result<()> {
        let status = std::process::Command::new("cargo")
            .arg("build")
            .arg("-p")
            .arg("cli-client")
            .current_dir(workspace_root)
            .status()
            .context("failed to run cargo build for system test binaries")?;

        if !status.success() {
            bail!("cargo build for system test binaries failed");
        }

        Ok(())
    }

    fn ensure_binaries_built(workspace_root: &PathBuf) -> Result<()> {
        static BUILD_RESULT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

        let result = BUILD_RESULT.get_or_init(|| {
            build_required_binaries(workspace_root).map_err(|err| err.to_string())
        });

        if let Err(message) = result {
            bail!("failed to build required binaries: {message}");
        }

        Ok(())
    }
}
