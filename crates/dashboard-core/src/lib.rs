//! Screen logic for the project-tracking dashboard: the schedule editor,
//! list screens, role-derived navigation and the status report.
//!
//! Nothing here talks HTTP directly; the editor and list screens reach the
//! API through the [`ScheduleApi`] and [`ListSource`] seams.

pub mod api;
pub mod command;
pub mod editor;
pub mod forms;
pub mod listing;
pub mod navigation;
pub mod notification;
pub mod report;
pub mod selection;
pub mod view;

#[cfg(test)]
mod fake_api;

pub use api::ScheduleApi;
pub use command::EditorCommand;
pub use editor::{Candidates, ConfigItemPicker, EditorState, ScheduleEditor};
pub use forms::{PhaseDraft, Rejection, TaskDraft};
pub use listing::{Collection, ListQuery, ListResource, ListSource, TableRow, render_table};
pub use navigation::{MenuEntry, MenuTarget, menu_for};
pub use notification::{Notification, NotificationKind, ScheduleAction};
pub use report::{ChartKind, ReportCategory, StatusReport};
pub use selection::{Category, Selection, SelectionSlot};
pub use view::EditorView;
