//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use common::{AssignedPhase, MemberLink, RequirementLink, Schedule, Task, dates};
use dashboard_core::report::CategoryReport;
use dashboard_core::{MenuEntry, MenuTarget, Notification, NotificationKind, render_table};

pub fn schedule(schedule: Option<&Schedule>) -> String {
    let Some(schedule) = schedule else {
        return "(project has no schedule)\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "schedule {} (methodology {})",
        schedule.id, schedule.methodology.name
    );
    if schedule.phases.is_empty() {
        out.push_str("  (no phases)\n");
    }
    for phase in &schedule.phases {
        let _ = writeln!(
            out,
            "\n{} [{}]  {} - {}  progress {}% - {}%",
            phase.phase_name(),
            phase.phase_id().unwrap_or("-"),
            dates::display_day(&phase.start_date),
            dates::display_day(&phase.end_date),
            phase.progress_start,
            phase.progress_end
        );
        if phase.config_items.is_empty() {
            out.push_str("  (no configuration items)\n");
        }
        for item in &phase.config_items {
            let _ = writeln!(
                out,
                "  {} [{}]  requirements {}  members {}  tasks {}",
                item.config_item.name,
                item.config_item.id,
                item.requirements.len(),
                item.members.len(),
                item.tasks.len()
            );
        }
    }
    out
}

pub fn requirements(links: &[RequirementLink]) -> String {
    render_table(
        &["LINK", "REQUIREMENT", "ASSIGNED"],
        links.iter().map(|link| {
            vec![
                link.id.clone(),
                link.requirement.name.clone(),
                link.assigned_user.name.clone(),
            ]
        }),
    )
}

pub fn members(links: &[MemberLink]) -> String {
    render_table(
        &["LINK", "MEMBER", "ROLE"],
        links.iter().map(|link| {
            vec![
                link.id.clone(),
                link.team_member.user.name.clone(),
                link.role.name.clone(),
            ]
        }),
    )
}

pub fn tasks(tasks: &[Task]) -> String {
    render_table(
        &["ID", "TITLE", "ASSIGNEE", "START", "END", "PROGRESS"],
        tasks.iter().map(task_row),
    )
}

fn task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.clone(),
        task.title.clone(),
        task.assignee_name().to_string(),
        dates::display_day(&task.start_date),
        dates::display_day(&task.end_date),
        format!("{}%", task.progress_start),
    ]
}

pub fn tasks_of_category(category: &CategoryReport) -> String {
    let mut out = format!(
        "{} ({} tasks, {:?} chart)\n",
        category.label,
        category.tasks.len(),
        category.chart.kind
    );
    out.push_str(&render_table(
        &["ID", "TITLE", "PHASE", "ITEM", "PROGRESS", "MEMBERS"],
        category.tasks.iter().map(|task| {
            vec![
                task.id.clone(),
                task.title.clone(),
                task.phase.clone(),
                task.config_item.clone(),
                format!("{}%", task.progress),
                task.members
                    .iter()
                    .map(|member| member.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        }),
    ));
    out
}

pub fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", task.title, task.id);
    if !task.description.is_empty() {
        let _ = writeln!(out, "  {}", task.description);
    }
    let _ = writeln!(out, "  assignee: {}", task.assignee_name());
    let _ = writeln!(
        out,
        "  {} - {}, progress {}% - {}%",
        dates::display_day(&task.start_date),
        dates::display_day(&task.end_date),
        task.progress_start,
        task.progress_end
    );
    out
}

pub fn calendar(phases: &[AssignedPhase]) -> String {
    if phases.is_empty() {
        return "(no assigned tasks)\n".to_string();
    }
    let mut out = String::new();
    for phase in phases {
        let _ = writeln!(out, "{}", phase.phase.name);
        for task in &phase.config_item.tasks {
            let _ = writeln!(
                out,
                "  {} - {}  {} [{}]",
                dates::display_day(&task.start_date),
                dates::display_day(&task.end_date),
                task.title,
                task.id
            );
        }
    }
    out
}

pub fn menu(entries: &[MenuEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        push_menu_entry(&mut out, entry, 0);
    }
    out
}

fn push_menu_entry(out: &mut String, entry: &MenuEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = match entry.target {
        MenuTarget::Route(route) => writeln!(out, "{indent}{}  ({route})", entry.label),
        MenuTarget::Group | MenuTarget::SelectProject | MenuTarget::Logout => {
            writeln!(out, "{indent}{}", entry.label)
        }
    };
    for child in &entry.children {
        push_menu_entry(out, child, depth + 1);
    }
}

pub fn notification(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Validation => "invalid",
        NotificationKind::Failure => "error",
    };
    format!("{marker}: {notification}")
}
