#![forbid(unsafe_code)]

//! Placeholder tracking: which insertion marker is armed.
//!
//! A drag shows at most one marker: either an item-level marker inside a row
//! or a row-level marker between rows (standing in for a row that does not
//! exist yet). The tracker holds that marker as a single enum value, so
//! arming one kind replaces the other and markers never accumulate.

use serde::{Deserialize, Serialize};

use crate::resolve::ResolvedTarget;

/// Which side of the anchor row a row-level marker sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSide {
    Before,
    After,
}

/// Currently armed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum Placeholder {
    /// Nothing armed.
    #[default]
    Hidden,
    /// Item marker inside `row` at item position `slot`.
    Item { row: usize, slot: usize },
    /// Row marker on `side` of row `anchor`.
    Row { anchor: usize, side: RowSide },
}

impl Placeholder {
    /// Drop target this marker stands for.
    #[must_use]
    pub const fn target(&self) -> Option<ResolvedTarget> {
        match *self {
            Self::Hidden => None,
            Self::Item { row, slot } => Some(ResolvedTarget::InsideRow { row, index: slot }),
            Self::Row {
                anchor,
                side: RowSide::Before,
            } => Some(ResolvedTarget::BeforeRow(anchor)),
            Self::Row {
                anchor,
                side: RowSide::After,
            } => Some(ResolvedTarget::AfterRow(anchor)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl From<ResolvedTarget> for Placeholder {
    fn from(target: ResolvedTarget) -> Self {
        match target {
            ResolvedTarget::BeforeRow(anchor) => Self::Row {
                anchor,
                side: RowSide::Before,
            },
            ResolvedTarget::AfterRow(anchor) => Self::Row {
                anchor,
                side: RowSide::After,
            },
            ResolvedTarget::InsideRow { row, index } => Self::Item { row, slot: index },
        }
    }
}

/// Ephemeral marker state for one drag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderTracker {
    current: Placeholder,
}

impl PlaceholderTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn current(&self) -> Placeholder {
        self.current
    }

    #[inline]
    #[must_use]
    pub const fn target(&self) -> Option<ResolvedTarget> {
        self.current.target()
    }

    /// Arm the item marker; disarms any row marker. Returns whether the
    /// marker moved.
    pub fn arm_item(&mut self, row: usize, slot: usize) -> bool {
        self.set(Placeholder::Item { row, slot })
    }

    /// Arm the row marker; disarms any item marker. Returns whether the
    /// marker moved.
    pub fn arm_row(&mut self, anchor: usize, side: RowSide) -> bool {
        self.set(Placeholder::Row { anchor, side })
    }

    /// Disarm both markers. Returns whether anything was armed.
    pub fn disarm(&mut self) -> bool {
        self.set(Placeholder::Hidden)
    }

    /// Arm the marker matching `target`, or disarm when there is none.
    pub fn track(&mut self, target: Option<ResolvedTarget>) -> bool {
        self.set(target.map_or(Placeholder::Hidden, Placeholder::from))
    }

    fn set(&mut self, next: Placeholder) -> bool {
        let changed = self.current != next;
        self.current = next;
        changed
    }
}
