#![forbid(unsafe_code)]

//! Error types.
//!
//! None of these are fatal: the controller turns every [`DropError`] into an
//! ignored drop with the grid left as it was.

use thiserror::Error;

use crate::id::ItemId;
use crate::resolve::ResolvedTarget;

/// Structural invariant violations of a [`Grid`](crate::model::Grid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row {row} has no items")]
    EmptyRow { row: usize },
    #[error("item id {id} appears more than once")]
    DuplicateItem { id: ItemId },
}

/// Reasons a drop was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    /// The dragged id is no longer in the grid (changed by another mechanism).
    #[error("dragged item {id} is not in the grid")]
    ItemNotFound { id: ItemId },
    /// The target does not address a row of the layout it was resolved against.
    #[error("target {target:?} does not fit a grid of {rows} rows")]
    InvalidTarget { target: ResolvedTarget, rows: usize },
    /// Drop delivered with no active drag session.
    #[error("drop without an active drag session")]
    DegenerateDrop,
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("edge band {band} must be a finite fraction in 0.0..=0.5")]
    InvalidEdgeBand { band: f64 },
}
