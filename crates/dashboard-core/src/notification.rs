use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    /// Input was rejected before any request went out.
    Validation,
    Failure,
}

/// The transient message a screen shows after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Validation,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleAction {
    LoadSchedule,
    AddPhase,
    RemovePhase,
    AddConfigItem,
    RemoveConfigItem,
    AddRequirement,
    RemoveRequirement,
    AddMember,
    RemoveMember,
    AddTask,
    EditTask,
    RemoveTask,
}

impl ScheduleAction {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::LoadSchedule => "schedule loaded",
            Self::AddPhase => "phase added",
            Self::RemovePhase => "phase removed",
            Self::AddConfigItem => "configuration item added",
            Self::RemoveConfigItem => "configuration item removed",
            Self::AddRequirement => "requirement added",
            Self::RemoveRequirement => "requirement removed",
            Self::AddMember => "member added",
            Self::RemoveMember => "member removed",
            Self::AddTask => "task added",
            Self::EditTask => "task updated",
            Self::RemoveTask => "task removed",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::LoadSchedule => "error loading schedule",
            Self::AddPhase => "error adding phase",
            Self::RemovePhase => "error removing phase",
            Self::AddConfigItem => "error adding configuration item",
            Self::RemoveConfigItem => "error removing configuration item",
            Self::AddRequirement => "error adding requirement",
            Self::RemoveRequirement => "error removing requirement",
            Self::AddMember => "error adding member",
            Self::RemoveMember => "error removing member",
            Self::AddTask => "error adding task",
            Self::EditTask => "error updating task",
            Self::RemoveTask => "error removing task",
        }
    }
}
