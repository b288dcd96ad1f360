//! HTTP bridge between the browser page and the schedule editor.
//!
//! One editor is kept per project; commands for the same project run one at
//! a time behind that editor's lock.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use client_sdk::DashboardClient;
use common::{EntityId, UserRole};
use dashboard_core::{EditorCommand, EditorView, ScheduleEditor, StatusReport, menu_for};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

type SharedEditor = Arc<Mutex<ScheduleEditor<DashboardClient>>>;

#[derive(Clone)]
struct WebState {
    client: DashboardClient,
    editors: Arc<Mutex<HashMap<EntityId, SharedEditor>>>,
}

impl WebState {
    /// The project's editor, opened (and loaded) on first use.
    async fn editor(&self, project_id: &str) -> SharedEditor {
        let mut editors = self.editors.lock().await;
        if let Some(editor) = editors.get(project_id) {
            return editor.clone();
        }
        let editor = Arc::new(Mutex::new(ScheduleEditor::new(
            self.client.clone(),
            project_id,
        )));
        let mut opening = editor.clone().lock_owned().await;
        editors.insert(project_id.to_string(), editor.clone());
        drop(editors);

        opening.load().await;
        editor
    }
}

#[derive(Debug, Deserialize)]
struct MenuQuery {
    role: UserRole,
}

pub fn router(client: DashboardClient) -> Router {
    let state = WebState {
        client,
        editors: Arc::new(Mutex::new(HashMap::new())),
    };

    Router::new()
        .route("/", get(|| async { Html(web_ui::app_html()) }))
        .route("/api/projects/{project_id}/schedule", get(web_schedule))
        .route("/api/projects/{project_id}/actions", post(web_action))
        .route("/api/projects/{project_id}/report", get(web_report))
        .route("/api/menu", get(web_menu))
        .route(
            "/api/ping",
            get(|| async {
                Json(serde_json::json!({
                    "ok": true,
                    "service": "pms-web"
                }))
            }),
        )
        .with_state(state)
}

pub async fn serve(client: DashboardClient, bind: &str) -> Result<()> {
    let bind_addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let app = router(client);

    info!(%bind_addr, "serving web interface");
    println!("web interface at http://{bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

async fn web_schedule(
    State(state): State<WebState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    let editor = state.editor(&project_id).await;
    let editor = editor.lock().await;
    Json(EditorView::of(&*editor))
}

async fn web_action(
    State(state): State<WebState>,
    Path(project_id): Path<String>,
    Json(command): Json<EditorCommand>,
) -> impl IntoResponse {
    let editor = state.editor(&project_id).await;
    let mut editor = editor.lock().await;
    let notification = command.apply(&mut *editor).await;
    Json(serde_json::json!({
        "notification": notification,
        "view": EditorView::of(&*editor),
    }))
}

async fn web_report(
    State(state): State<WebState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    match state.client.schedule(&project_id).await {
        Ok(schedule) => {
            let report = StatusReport::from_schedule(schedule.as_ref());
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "summary": report.summary,
                    "categories": report.categories(),
                    "text": report.render(),
                })),
            )
                .into_response()
        }
        Err(err) => {
            warn!(project_id = %project_id, error = %format!("{err:#}"), "failed to fetch schedule for report");
            error_response(StatusCode::BAD_GATEWAY, format!("{err:#}"))
        }
    }
}

async fn web_menu(Query(query): Query<MenuQuery>) -> impl IntoResponse {
    Json(menu_for(query.role))
}
