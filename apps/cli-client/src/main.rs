mod render;
mod web;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client_sdk::{ClientConfig, DEFAULT_API_URL, DashboardClient};
use common::forms::{
    ConfigurationItemForm, Form, MethodologyForm, PhaseForm, ProjectForm, RequirementForm,
    RequirementModuleForm, TeamMemberForm, UserForm,
};
use common::{
    ConfigurationItem, EntityId, Methodology, NamedRef, Phase, Project, Requirement,
    RequirementModule, Role, SessionContext, State, TeamMember, UserAccount, UserRole,
};
use dashboard_core::{
    Category, Collection, EditorCommand, ListResource, PhaseDraft, ReportCategory,
    ScheduleEditor, StatusReport, TableRow, TaskDraft, menu_for,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pms")]
#[command(about = "Command-line client for the project-tracking dashboard")]
struct Cli {
    #[arg(long, env = "PMS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Session cookie (`name=value`), as printed by `session verify-token`.
    #[arg(long, env = "PMS_SESSION_COOKIE", hide_env_values = true)]
    session_cookie: Option<String>,
    /// Acting role; asked from the API when not given.
    #[arg(long, env = "PMS_USER_ROLE")]
    role: Option<UserRole>,
    #[arg(long, env = "PMS_PROJECT")]
    project: Option<EntityId>,
    #[arg(long, env = "PMS_TEAM_ROLE")]
    team_role: Option<String>,
    #[arg(long, env = "PMS_COMMITTEE")]
    committee: Option<EntityId>,
    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand)]
    Session(SessionCommand),
    List(ListArgs),
    #[command(subcommand)]
    Register(FormCommand),
    Update {
        id: EntityId,
        #[command(subcommand)]
        form: FormCommand,
    },
    #[command(subcommand)]
    Leader(LeaderCommand),
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    Report {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    #[command(subcommand)]
    Tasks(TaskCommand),
    ServeWeb {
        #[arg(long, default_value = "127.0.0.1:8081")]
        bind: String,
    },
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    /// Exchanges a login token for a session cookie and prints it.
    VerifyToken { token: String },
    Whoami,
    Logout,
    Menu,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, global = true)]
    search: Option<String>,
    #[arg(long, global = true)]
    limit: Option<u32>,
    #[arg(long, global = true, default_value_t = 1)]
    page: u32,
    #[arg(long, global = true)]
    sort: Option<String>,
    #[command(subcommand)]
    collection: CollectionArg,
}

#[derive(Debug, Subcommand)]
enum CollectionArg {
    Methodologies,
    Phases { methodology: EntityId },
    ConfigItems { methodology: EntityId, phase: EntityId },
    ConfigItemTypes { methodology: EntityId, phase: EntityId },
    TechnologyTypes { methodology: EntityId, phase: EntityId },
    RequirementModules,
    Requirements,
    Projects,
    Team,
    Users,
    Roles,
    States,
}

#[derive(Debug, Subcommand)]
enum FormCommand {
    Methodology {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
    },
    Phase {
        methodology: EntityId,
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
    },
    ConfigItem {
        methodology: EntityId,
        phase: EntityId,
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
        #[arg(long, default_value_t)]
        start: String,
        #[arg(long, default_value_t)]
        end: String,
        #[arg(long, default_value_t)]
        version: String,
        #[arg(long, default_value_t)]
        item_type: EntityId,
        #[arg(long, default_value_t)]
        technology_type: EntityId,
        #[arg(long, default_value_t)]
        state: EntityId,
    },
    RequirementModule {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
    },
    Requirement {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
        #[arg(long, default_value_t)]
        module: EntityId,
    },
    Project {
        #[arg(long, default_value_t)]
        name: String,
        #[arg(long, default_value_t)]
        description: String,
        #[arg(long, default_value_t)]
        methodology: EntityId,
        #[arg(long, default_value_t)]
        start: String,
        #[arg(long, default_value_t)]
        end: String,
    },
    TeamMember {
        #[arg(long, default_value_t)]
        user: EntityId,
        #[arg(long = "team-role-id", default_value_t)]
        team_role: EntityId,
    },
    User {
        #[arg(long, default_value_t)]
        email: String,
        #[arg(long, default_value_t)]
        first_name: String,
        #[arg(long, default_value_t)]
        last_name: String,
        #[arg(long = "user-role", default_value = "user")]
        role: UserRole,
    },
}

#[derive(Debug, Subcommand)]
enum LeaderCommand {
    Add { user: EntityId },
    Remove { leader: EntityId },
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    Show,
    AddPhase {
        phase: EntityId,
        start: String,
        end: String,
    },
    RemovePhase {
        phase: EntityId,
    },
    /// Lists the configuration items a phase can take.
    Candidates {
        phase: EntityId,
    },
    AddItem {
        phase: EntityId,
        item: EntityId,
    },
    RemoveItem {
        phase: EntityId,
        item: EntityId,
    },
    Requirements {
        phase: EntityId,
        item: EntityId,
    },
    AddRequirement {
        phase: EntityId,
        item: EntityId,
        requirement: EntityId,
    },
    RemoveRequirement {
        link: EntityId,
    },
    Members {
        phase: EntityId,
        item: EntityId,
    },
    AddMember {
        phase: EntityId,
        item: EntityId,
        #[arg(long)]
        role: EntityId,
        #[arg(long)]
        member: EntityId,
    },
    RemoveMember {
        link: EntityId,
    },
    Tasks {
        phase: EntityId,
        item: EntityId,
    },
    AddTask {
        phase: EntityId,
        item: EntityId,
        #[command(flatten)]
        fields: TaskFields,
    },
    EditTask {
        task: EntityId,
        #[command(flatten)]
        fields: TaskFields,
    },
    RemoveTask {
        task: EntityId,
    },
}

#[derive(Debug, Args)]
struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    member: Option<EntityId>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
}

impl TaskFields {
    fn apply_to(self, mut draft: TaskDraft) -> TaskDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(member) = self.member {
            draft.member_id = member;
        }
        if let Some(start) = self.start {
            draft.start_date = start;
        }
        if let Some(end) = self.end {
            draft.end_date = end;
        }
        draft
    }
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// The signed-in user's tasks, grouped by phase.
    Calendar,
    Show { task: EntityId },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    NotStarted,
    Accepted,
    InProgress,
    Implemented,
    Rejected,
    Overall,
    Histogram,
    Members,
}

impl From<CategoryArg> for ReportCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::NotStarted => Self::NotStarted,
            CategoryArg::Accepted => Self::Accepted,
            CategoryArg::InProgress => Self::InProgress,
            CategoryArg::Implemented => Self::Implemented,
            CategoryArg::Rejected => Self::Rejected,
            CategoryArg::Overall => Self::OverallProgress,
            CategoryArg::Histogram => Self::ProgressHistogram,
            CategoryArg::Members => Self::MemberDistribution,
        }
    }
}

struct App {
    client: DashboardClient,
    role: Option<UserRole>,
    project: Option<EntityId>,
    team_role: Option<String>,
    committee: Option<EntityId>,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new(&cli.api_url);
    config.session_cookie = cli.session_cookie.clone();
    let app = App {
        client: DashboardClient::new(&config)?,
        role: cli.role,
        project: cli.project,
        team_role: cli.team_role,
        committee: cli.committee,
        json: cli.json,
    };

    match cli.command {
        Commands::Session(command) => app.session(command).await,
        Commands::List(args) => app.list(args).await,
        Commands::Register(form) => app.submit(form, None).await,
        Commands::Update { id, form } => app.submit(form, Some(&id)).await,
        Commands::Leader(command) => app.leader(command).await,
        Commands::Schedule(command) => app.schedule(command).await,
        Commands::Report { category } => app.report(category).await,
        Commands::Tasks(command) => app.tasks(command).await,
        Commands::ServeWeb { bind } => web::serve(app.client, &bind).await,
    }
}

impl App {
    fn project(&self) -> Result<&str> {
        self.project
            .as_deref()
            .ok_or_else(|| anyhow!("no project selected; pass --project or set PMS_PROJECT"))
    }

    async fn session_context(&self) -> Result<SessionContext> {
        let role = match self.role {
            Some(role) => role,
            None => self.client.user_info().await?.role,
        };
        let mut session = SessionContext::new(role);
        session.selected_project = self.project.clone();
        session.team_role = self.team_role.clone();
        session.committee_id = self.committee.clone();
        Ok(session)
    }

    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    async fn session(&self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::VerifyToken { token } => {
                if !self.client.verify_token(&token).await? {
                    bail!("the API rejected the login token");
                }
                match self.client.session_cookie() {
                    Some(cookie) => println!("export PMS_SESSION_COOKIE='{cookie}'"),
                    None => println!("token accepted, but the API set no session cookie"),
                }
            }
            SessionCommand::Whoami => {
                let user = self.client.user_info().await?;
                self.print(&user, || {
                    format!("{} <{}> ({})\n", user.name, user.email, user.role)
                })?;
                let session = self.session_context().await?;
                if !self.json && session.requires_project_selection() {
                    println!("select a project first: pass --project and --team-role");
                }
            }
            SessionCommand::Logout => {
                self.client.logout().await?;
                println!("logged out");
            }
            SessionCommand::Menu => {
                let session = self.session_context().await?;
                let menu = menu_for(session.role);
                self.print(&menu, || render::menu(&menu))?;
            }
        }
        Ok(())
    }

    async fn list(&self, args: ListArgs) -> Result<()> {
        match &args.collection {
            CollectionArg::Methodologies => {
                self.show_list::<Methodology>(Collection::Methodologies, &args)
                    .await
            }
            CollectionArg::Phases { methodology } => {
                let collection = Collection::Phases {
                    methodology_id: methodology.clone(),
                };
                self.show_list::<Phase>(collection, &args).await
            }
            CollectionArg::ConfigItems { methodology, phase } => {
                let collection = Collection::ConfigurationItems {
                    methodology_id: methodology.clone(),
                    phase_id: phase.clone(),
                };
                self.show_list::<ConfigurationItem>(collection, &args).await
            }
            CollectionArg::ConfigItemTypes { methodology, phase } => {
                let collection = Collection::ConfigItemTypes {
                    methodology_id: methodology.clone(),
                    phase_id: phase.clone(),
                };
                self.show_list::<NamedRef>(collection, &args).await
            }
            CollectionArg::TechnologyTypes { methodology, phase } => {
                let collection = Collection::TechnologyTypes {
                    methodology_id: methodology.clone(),
                    phase_id: phase.clone(),
                };
                self.show_list::<NamedRef>(collection, &args).await
            }
            CollectionArg::RequirementModules => {
                self.show_list::<RequirementModule>(Collection::RequirementModules, &args)
                    .await
            }
            CollectionArg::Requirements => {
                let collection = Collection::Requirements {
                    project_id: self.project()?.to_string(),
                };
                self.show_list::<Requirement>(collection, &args).await
            }
            CollectionArg::Projects => self.show_list::<Project>(Collection::Projects, &args).await,
            CollectionArg::Team => {
                let collection = Collection::ProjectTeam {
                    project_id: self.project()?.to_string(),
                };
                self.show_list::<TeamMember>(collection, &args).await
            }
            CollectionArg::Users => self.show_list::<UserAccount>(Collection::Users, &args).await,
            CollectionArg::Roles => self.show_list::<Role>(Collection::Roles, &args).await,
            CollectionArg::States => self.show_list::<State>(Collection::States, &args).await,
        }
    }

    async fn show_list<T>(&self, collection: Collection, args: &ListArgs) -> Result<()>
    where
        T: TableRow + DeserializeOwned + Serialize + Send + 'static,
    {
        let session = self.session_context().await?;
        let mut list = ListResource::<T>::new(collection, &session);
        if let Some(search) = &args.search {
            list.set_search(search.clone());
        }
        if let Some(limit) = args.limit {
            list.set_limit(limit);
        }
        if let Some(sort) = &args.sort {
            list.set_sort(sort.clone());
        }
        list.set_page(args.page);

        list.refresh(&self.client).await;
        self.print(&list.rows(), || list.render())
    }

    async fn submit(&self, form: FormCommand, id: Option<&str>) -> Result<()> {
        match form {
            FormCommand::Methodology { name, description } => {
                let form = MethodologyForm { name, description };
                self.send_form(Collection::Methodologies, &form, id).await
            }
            FormCommand::Phase {
                methodology,
                name,
                description,
            } => {
                let collection = Collection::Phases {
                    methodology_id: methodology,
                };
                self.send_form(collection, &PhaseForm { name, description }, id)
                    .await
            }
            FormCommand::ConfigItem {
                methodology,
                phase,
                name,
                description,
                start,
                end,
                version,
                item_type,
                technology_type,
                state,
            } => {
                let collection = Collection::ConfigurationItems {
                    methodology_id: methodology,
                    phase_id: phase,
                };
                let form = ConfigurationItemForm {
                    name,
                    description,
                    start_date: start,
                    end_date: end,
                    version,
                    item_type,
                    technology_type,
                    state_id: state,
                };
                self.send_form(collection, &form, id).await
            }
            FormCommand::RequirementModule { name, description } => {
                let form = RequirementModuleForm { name, description };
                self.send_form(Collection::RequirementModules, &form, id)
                    .await
            }
            FormCommand::Requirement {
                name,
                description,
                module,
            } => {
                let collection = Collection::Requirements {
                    project_id: self.project()?.to_string(),
                };
                let form = RequirementForm {
                    name,
                    description,
                    module_id: module,
                };
                self.send_form(collection, &form, id).await
            }
            FormCommand::Project {
                name,
                description,
                methodology,
                start,
                end,
            } => {
                let form = ProjectForm {
                    name,
                    description,
                    methodology_id: methodology,
                    start_date: start,
                    end_date: end,
                };
                self.send_form(Collection::Projects, &form, id).await
            }
            FormCommand::TeamMember { user, team_role } => {
                let collection = Collection::ProjectTeam {
                    project_id: self.project()?.to_string(),
                };
                let form = TeamMemberForm {
                    user_id: user,
                    team_role_id: team_role,
                };
                self.send_form(collection, &form, id).await
            }
            FormCommand::User {
                email,
                first_name,
                last_name,
                role,
            } => {
                if id.is_some() {
                    bail!("user accounts can only be registered, not updated");
                }
                let form = UserForm {
                    email,
                    first_name,
                    last_name,
                    role,
                };
                self.send_form(Collection::Users, &form, None).await
            }
        }
    }

    async fn send_form<F: Form>(
        &self,
        collection: Collection,
        form: &F,
        id: Option<&str>,
    ) -> Result<()> {
        match id {
            Some(id) => {
                self.client.update(&collection, id, form).await?;
                println!("updated {id}");
            }
            None => match self.client.create(&collection, form).await? {
                Some(id) => println!("created {id}"),
                None => println!("created"),
            },
        }
        Ok(())
    }

    async fn leader(&self, command: LeaderCommand) -> Result<()> {
        let project = self.project()?;
        match command {
            LeaderCommand::Add { user } => {
                self.client.add_project_leader(project, &user).await?;
                println!("added project leader {user}");
            }
            LeaderCommand::Remove { leader } => {
                self.client.remove_project_leader(project, &leader).await?;
                println!("removed project leader {leader}");
            }
        }
        Ok(())
    }

    async fn schedule(&self, command: ScheduleCommand) -> Result<()> {
        let mut editor = ScheduleEditor::open(self.client.clone(), self.project()?).await;
        if let Some(notification) = editor.notification()
            && !notification.is_success()
        {
            bail!("{}", render::notification(notification));
        }

        let commands = match command {
            ScheduleCommand::Show => Vec::new(),
            ScheduleCommand::AddPhase { phase, start, end } => {
                vec![EditorCommand::AddPhase(PhaseDraft::new(phase, start, end))]
            }
            ScheduleCommand::RemovePhase { phase } => {
                vec![EditorCommand::RemovePhase { phase_id: phase }]
            }
            ScheduleCommand::Candidates { phase } => {
                let candidates = editor.open_config_item_picker(&phase).await.to_vec();
                return self.print(&candidates, || {
                    dashboard_core::render_table(
                        ConfigurationItem::HEADERS,
                        candidates.iter().map(TableRow::cells),
                    )
                });
            }
            ScheduleCommand::AddItem { phase, item } => vec![
                EditorCommand::OpenConfigItemPicker { phase_id: phase },
                EditorCommand::AddConfigItem {
                    config_item_id: item,
                },
            ],
            ScheduleCommand::RemoveItem { phase, item } => vec![EditorCommand::RemoveConfigItem {
                phase_id: phase,
                config_item_id: item,
            }],
            ScheduleCommand::Requirements { phase, item } => {
                editor.select(Category::Requirements, &phase, &item);
                let rows = editor.requirements();
                return self.print(&rows, || render::requirements(rows));
            }
            ScheduleCommand::AddRequirement {
                phase,
                item,
                requirement,
            } => vec![
                select(Category::Requirements, phase, item),
                EditorCommand::AddRequirement {
                    requirement_id: requirement,
                },
            ],
            ScheduleCommand::RemoveRequirement { link } => {
                vec![EditorCommand::RemoveRequirement { link_id: link }]
            }
            ScheduleCommand::Members { phase, item } => {
                editor.select(Category::Members, &phase, &item);
                let rows = editor.members();
                return self.print(&rows, || render::members(rows));
            }
            ScheduleCommand::AddMember {
                phase,
                item,
                role,
                member,
            } => vec![
                select(Category::Members, phase, item),
                EditorCommand::AddMember {
                    role_id: role,
                    member_id: member,
                },
            ],
            ScheduleCommand::RemoveMember { link } => {
                vec![EditorCommand::RemoveMember { link_id: link }]
            }
            ScheduleCommand::Tasks { phase, item } => {
                editor.select(Category::Tasks, &phase, &item);
                let rows = editor.tasks();
                return self.print(&rows, || render::tasks(rows));
            }
            ScheduleCommand::AddTask {
                phase,
                item,
                fields,
            } => vec![
                select(Category::Tasks, phase, item),
                EditorCommand::SaveTask(fields.apply_to(TaskDraft::default())),
            ],
            ScheduleCommand::EditTask { task, fields } => {
                editor.begin_task_edit(&task)?;
                let draft = fields.apply_to(editor.task_draft().clone());
                vec![EditorCommand::SaveTask(draft)]
            }
            ScheduleCommand::RemoveTask { task } => {
                vec![EditorCommand::RemoveTask { task_id: task }]
            }
        };

        for command in commands {
            if let Some(notification) = command.apply(&mut editor).await {
                if !notification.is_success() {
                    bail!("{}", render::notification(&notification));
                }
                eprintln!("{}", render::notification(&notification));
            }
        }

        self.print(&editor.schedule(), || render::schedule(editor.schedule()))
    }

    async fn report(&self, category: Option<CategoryArg>) -> Result<()> {
        let project = self.project()?;
        let schedule = self
            .client
            .schedule(project)
            .await
            .with_context(|| format!("failed to load the schedule of project {project}"))?;
        let report = StatusReport::from_schedule(schedule.as_ref());

        match category {
            Some(category) => {
                let category = report.category(category.into());
                self.print(&category, || render::tasks_of_category(&category))
            }
            None => self.print(&report, || report.render()),
        }
    }

    async fn tasks(&self, command: TaskCommand) -> Result<()> {
        let session = self.session_context().await?;
        if session.requires_project_selection() {
            bail!("select a project first: pass --project and --team-role");
        }
        match command {
            TaskCommand::Calendar => {
                let phases = self.client.assigned_tasks(&session).await?;
                self.print(&phases, || render::calendar(&phases))
            }
            TaskCommand::Show { task } => match self.client.task_detail(&session, &task).await? {
                Some(detail) => self.print(&detail, || render::task_detail(&detail)),
                None => bail!("task {task} was not found"),
            },
        }
    }
}

fn select(category: Category, phase_id: EntityId, config_item_id: EntityId) -> EditorCommand {
    EditorCommand::Select {
        category,
        phase_id,
        config_item_id,
    }
}
