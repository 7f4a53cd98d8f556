use std::collections::BTreeSet;

use formats::GroupRef;
use serde::Serialize;

/// Per-marker flags derived from the selection.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerFlags {
    pub selected: bool,
    pub in_group: bool,
}

/// The single source of truth for what is selected on the map.
///
/// At most one item is selected. At most one group (story or row) is active,
/// and its resolved member ids are stored alongside it. Marker state is read
/// from here; nothing is cached per marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
    group: Option<GroupRef>,
    members: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.group = None;
        self.members.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.group.is_none()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn group(&self) -> Option<&GroupRef> {
        self.group.as_ref()
    }

    /// Member ids of the active group, in ascending id order.
    pub fn members(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(String::as_str)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn in_group(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn flags(&self, id: &str) -> MarkerFlags {
        MarkerFlags {
            selected: self.is_selected(id),
            in_group: self.in_group(id),
        }
    }

    /// Clears every flag, then selects `id` alone.
    pub fn select_only(&mut self, id: impl Into<String>) {
        self.clear();
        self.selected = Some(id.into());
    }

    /// Selects `id` while keeping the active group.
    pub fn select_in_group(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Clears every flag, then marks `members` as the active group.
    pub fn highlight_group<I, S>(&mut self, group: GroupRef, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear();
        self.group = Some(group);
        self.members = members.into_iter().map(Into::into).collect();
    }

    /// Drops the selected item; the active group stays.
    pub fn clear_selected(&mut self) -> Option<String> {
        self.selected.take()
    }
}
