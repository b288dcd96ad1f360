use common::UserRole;
use serde::Serialize;

/// What activating a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "snake_case")]
pub enum MenuTarget {
    Route(&'static str),
    /// Expands or collapses the entry's children.
    Group,
    SelectProject,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: &'static str,
    pub target: MenuTarget,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    fn route(label: &'static str, route: &'static str) -> Self {
        Self {
            label,
            target: MenuTarget::Route(route),
            children: Vec::new(),
        }
    }

    fn action(label: &'static str, target: MenuTarget) -> Self {
        Self {
            label,
            target,
            children: Vec::new(),
        }
    }

    fn group(label: &'static str, children: Vec<MenuEntry>) -> Self {
        Self {
            label,
            target: MenuTarget::Group,
            children,
        }
    }

    /// Depth-first walk over this entry and its children.
    pub fn flatten(&self) -> Vec<&MenuEntry> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// The sidebar for a role.
pub fn menu_for(role: UserRole) -> Vec<MenuEntry> {
    let (select_project, maintenance, project_management) = match role {
        UserRole::User => (true, false, false),
        UserRole::Admin => (false, true, false),
        UserRole::ProjectLead => (false, true, true),
    };

    let mut menu = vec![MenuEntry::route("Dashboard", "/dashboard")];
    if select_project {
        menu.push(MenuEntry::action("Select Project", MenuTarget::SelectProject));
    }
    if maintenance {
        menu.push(MenuEntry::group(
            "Maintenance",
            vec![
                MenuEntry::route("Users", "/dashboard/user-management"),
                MenuEntry::route("Methodologies", "/dashboard/methodology-management"),
                MenuEntry::route("Requirement Modules", "/dashboard/module-requirement"),
            ],
        ));
    }

    let mut project_children = Vec::new();
    if project_management {
        project_children.push(MenuEntry::route(
            "Project Management",
            "/dashboard/project-management",
        ));
    }
    menu.push(MenuEntry::group("Project", project_children));
    menu.push(MenuEntry::route("Security", "/dashboard/security"));
    menu.push(MenuEntry::route("Change Control", "/dashboard/change-control"));
    menu.push(MenuEntry::action("Log out", MenuTarget::Logout));
    menu
}
