use common::{EntityId, Schedule};
use serde::{Deserialize, Serialize};

/// Which nested collection of a configuration item a slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Requirements,
    Members,
    Tasks,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Members => "members",
            Self::Tasks => "tasks",
        }
    }
}

/// "Show category X for configuration item Y within phase Z."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSlot {
    pub phase_id: EntityId,
    pub config_item_id: EntityId,
}

impl SelectionSlot {
    pub fn new(phase_id: impl Into<EntityId>, config_item_id: impl Into<EntityId>) -> Self {
        Self {
            phase_id: phase_id.into(),
            config_item_id: config_item_id.into(),
        }
    }
}

/// Three independent slots; choosing one never touches the others, and a
/// schedule reload leaves all of them in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub requirements: Option<SelectionSlot>,
    pub members: Option<SelectionSlot>,
    pub tasks: Option<SelectionSlot>,
}

impl Selection {
    pub fn select(&mut self, category: Category, slot: SelectionSlot) {
        *self.slot_mut(category) = Some(slot);
    }

    pub fn clear(&mut self, category: Category) {
        *self.slot_mut(category) = None;
    }

    pub fn slot(&self, category: Category) -> Option<&SelectionSlot> {
        match category {
            Category::Requirements => self.requirements.as_ref(),
            Category::Members => self.members.as_ref(),
            Category::Tasks => self.tasks.as_ref(),
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<SelectionSlot> {
        match category {
            Category::Requirements => &mut self.requirements,
            Category::Members => &mut self.members,
            Category::Tasks => &mut self.tasks,
        }
    }
}

/// Rows for a slot, derived from whatever snapshot is current. A slot whose
/// target no longer exists yields no rows.
pub fn rows<'a, T>(
    schedule: Option<&'a Schedule>,
    slot: Option<&SelectionSlot>,
    pick: impl Fn(&'a common::ConfigItemEntry) -> &'a [T],
) -> &'a [T] {
    let (Some(schedule), Some(slot)) = (schedule, slot) else {
        return &[];
    };
    schedule
        .config_item(&slot.phase_id, &slot.config_item_id)
        .map(pick)
        .unwrap_or(&[])
}
