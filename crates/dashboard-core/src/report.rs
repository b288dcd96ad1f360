//! Status report: a schedule pivoted into task categories, chart datasets and
//! a summary.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use common::{EntityId, Schedule};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    Line,
    Pie,
    Radar,
    PolarArea,
    Scatter,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    NotStarted,
    Accepted,
    InProgress,
    Implemented,
    Rejected,
    OverallProgress,
    ProgressHistogram,
    MemberDistribution,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 8] = [
        Self::NotStarted,
        Self::Accepted,
        Self::InProgress,
        Self::Implemented,
        Self::Rejected,
        Self::OverallProgress,
        Self::ProgressHistogram,
        Self::MemberDistribution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::Accepted => "Accepted",
            Self::InProgress => "In progress",
            Self::Implemented => "Implemented",
            Self::Rejected => "Rejected",
            Self::OverallProgress => "Overall progress",
            Self::ProgressHistogram => "Progress histogram",
            Self::MemberDistribution => "Member distribution",
        }
    }

    pub fn chart(self) -> ChartKind {
        match self {
            Self::NotStarted => ChartKind::Bar,
            Self::Accepted => ChartKind::Doughnut,
            Self::InProgress => ChartKind::Line,
            Self::Implemented => ChartKind::Pie,
            Self::Rejected => ChartKind::Radar,
            Self::OverallProgress => ChartKind::PolarArea,
            Self::ProgressHistogram => ChartKind::Scatter,
            Self::MemberDistribution => ChartKind::Bubble,
        }
    }

    fn includes(self, task: &ReportTask) -> bool {
        match self {
            Self::NotStarted => task.progress == 0.0,
            Self::Accepted => task.reviewed && task.progress == 100.0,
            Self::InProgress => task.reviewed && task.progress < 100.0,
            Self::Implemented => task.approved && task.active,
            Self::Rejected => task.approved && !task.active,
            Self::OverallProgress | Self::ProgressHistogram | Self::MemberDistribution => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMember {
    pub name: String,
    pub role: String,
}

/// A task together with where it sits and who works on its item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTask {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub phase: String,
    pub config_item: String,
    pub members: Vec<ReportMember>,
    pub progress: f64,
    pub reviewed: bool,
    pub approved: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub category: ReportCategory,
    pub label: &'static str,
    pub tasks: Vec<ReportTask>,
    pub chart: ChartData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub members: usize,
    pub tasks_per_phase: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    pub tasks: Vec<ReportTask>,
    pub summary: ReportSummary,
}

impl StatusReport {
    /// Builds the report; a missing schedule gives an empty one.
    pub fn from_schedule(schedule: Option<&Schedule>) -> Self {
        let Some(schedule) = schedule else {
            return Self::default();
        };

        let mut tasks = Vec::new();
        for phase in &schedule.phases {
            for item in &phase.config_items {
                let members: Vec<ReportMember> = item
                    .members
                    .iter()
                    .map(|link| ReportMember {
                        name: link.team_member.user.name.clone(),
                        role: link.role.name.clone(),
                    })
                    .collect();
                tasks.extend(item.tasks.iter().map(|task| ReportTask {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    description: task.description.clone(),
                    phase: phase.phase_name().to_string(),
                    config_item: item.config_item.name.clone(),
                    members: members.clone(),
                    progress: task.progress_start,
                    reviewed: task.has_reviewer(),
                    approved: task.has_approver(),
                    active: task.active,
                }));
            }
        }

        let members: BTreeSet<&str> = tasks
            .iter()
            .flat_map(|task| task.members.iter().map(|member| member.name.as_str()))
            .collect();
        let summary = ReportSummary {
            total: tasks.len(),
            started: tasks.iter().filter(|task| task.progress > 0.0).count(),
            in_progress: tasks
                .iter()
                .filter(|task| task.progress > 0.0 && task.progress < 100.0)
                .count(),
            completed: tasks.iter().filter(|task| task.progress == 100.0).count(),
            members: members.len(),
            tasks_per_phase: schedule
                .phases
                .iter()
                .map(|phase| (phase.phase_name().to_string(), phase.task_count()))
                .collect(),
        };

        Self { tasks, summary }
    }

    pub fn category(&self, category: ReportCategory) -> CategoryReport {
        let tasks: Vec<ReportTask> = self
            .tasks
            .iter()
            .filter(|task| category.includes(task))
            .cloned()
            .collect();
        let chart = ChartData {
            kind: category.chart(),
            labels: tasks.iter().map(|task| task.title.clone()).collect(),
            data: tasks.iter().map(|task| task.progress).collect(),
        };
        CategoryReport {
            category,
            label: category.label(),
            tasks,
            chart,
        }
    }

    pub fn categories(&self) -> Vec<CategoryReport> {
        ReportCategory::ALL
            .iter()
            .map(|category| self.category(*category))
            .collect()
    }

    /// Plain-text rendering of the summary and each category's tasks.
    pub fn render(&self) -> String {
        let summary = &self.summary;
        let mut out = String::new();
        let _ = writeln!(out, "Total tasks:       {}", summary.total);
        let _ = writeln!(out, "Started:           {}", summary.started);
        let _ = writeln!(out, "In progress:       {}", summary.in_progress);
        let _ = writeln!(out, "Completed:         {}", summary.completed);
        let _ = writeln!(out, "Members:           {}", summary.members);
        let _ = writeln!(out, "Tasks per phase:");
        for (phase, count) in &summary.tasks_per_phase {
            let _ = writeln!(out, "  {phase}: {count}");
        }
        for category in self.categories() {
            let _ = writeln!(out, "\n{} ({})", category.label, category.tasks.len());
            for task in &category.tasks {
                let _ = writeln!(
                    out,
                    "  {} [{} / {}] {}%",
                    task.title, task.phase, task.config_item, task.progress
                );
            }
        }
        out
    }
}
