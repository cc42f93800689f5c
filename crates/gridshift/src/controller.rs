#![forbid(unsafe_code)]

//! Drag-and-drop controller for one grid.
//!
//! [`DragDropGrid`] owns the grid and the [`DragSession`] and routes host
//! gesture events through them:
//!
//! | Host event          | Controller call                 |
//! |---------------------|---------------------------------|
//! | drag start on item  | [`begin_drag`](DragDropGrid::begin_drag) |
//! | pointer move        | [`drag_over`](DragDropGrid::drag_over)   |
//! | pointer leaves grid | [`drag_leave`](DragDropGrid::drag_leave) |
//! | release             | [`drop_item`](DragDropGrid::drop_item)   |
//! | drag end            | [`end_drag`](DragDropGrid::end_drag)     |
//!
//! A committed drop replaces the grid with the engine's result and then
//! notifies every observer once. Cancelled and ignored drops leave the grid
//! untouched and notify nobody.
//!
//! Hosts that prefer scoped cleanup can use [`DragDropGrid::gesture`], which
//! returns a guard that cancels the drag if it is dropped unfinished.

use std::fmt;

use crate::engine::{self, CommitOutcome};
use crate::error::{ConfigError, DropError, GridError};
use crate::geometry::{GeometryProvider, Point};
use crate::id::ItemId;
use crate::model::{Grid, ItemPosition};
use crate::render::ItemVisuals;
use crate::session::{CancelReason, DragConfig, DragEffect, DragSession, DragTransition};

/// Receives the grid after every committed drop.
pub trait GridObserver {
    fn on_grid_changed(&mut self, grid: &Grid);
}

impl<F: FnMut(&Grid)> GridObserver for F {
    fn on_grid_changed(&mut self, grid: &Grid) {
        self(grid);
    }
}

/// Result of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Grid changed; `placed` is the item's new position.
    Committed { item: ItemId, placed: ItemPosition },
    /// Gesture ended without a target.
    Cancelled { reason: CancelReason },
    /// Drop could not be applied; grid unchanged.
    Ignored { error: DropError },
}

impl DropOutcome {
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Grid plus the drag session operating on it.
pub struct DragDropGrid {
    grid: Grid,
    session: DragSession,
    observers: Vec<Box<dyn GridObserver>>,
}

impl fmt::Debug for DragDropGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropGrid")
            .field("grid", &self.grid)
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl DragDropGrid {
    /// Wrap `grid`. Items become draggable once registered through
    /// [`sync_handles`](Self::sync_handles).
    pub fn new(grid: Grid, config: DragConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            grid,
            session: DragSession::new(config)?,
            observers: Vec::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Register an observer for committed changes.
    pub fn subscribe(&mut self, observer: impl GridObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Register newly rendered items as draggable. Returns the ids whose
    /// visuals need drag listeners attached.
    pub fn sync_handles(&mut self) -> Vec<ItemId> {
        self.session.sync_handles(&self.grid)
    }

    /// Start dragging `item`, hiding its visual when the drag is armed.
    pub fn begin_drag(&mut self, item: &ItemId, visuals: &mut dyn ItemVisuals) -> DragTransition {
        let transition = self.session.start(&self.grid, item);
        if let DragEffect::Armed { item, .. } = &transition.effect {
            visuals.set_hidden(item, true);
        }
        transition
    }

    /// Pointer moved over the grid.
    pub fn drag_over<G>(&mut self, pointer: Point, geometry: &G) -> DragTransition
    where
        G: GeometryProvider + ?Sized,
    {
        self.session.pointer_move(pointer, geometry)
    }

    /// Pointer left the grid.
    pub fn drag_leave(&mut self) -> DragTransition {
        self.session.pointer_leave()
    }

    /// Release: commit the armed target, if any.
    pub fn drop_item(&mut self, visuals: &mut dyn ItemVisuals) -> DropOutcome {
        let transition = self.session.release();
        restore(&transition, visuals);
        match transition.effect {
            DragEffect::Committed { instruction } => {
                match engine::commit(&self.grid, &instruction) {
                    Ok(outcome) => self.apply(outcome, instruction.item),
                    Err(error) => {
                        tracing::warn!(item = %instruction.item, error = %error, "drop ignored");
                        DropOutcome::Ignored { error }
                    }
                }
            }
            DragEffect::Cancelled { reason, .. } => DropOutcome::Cancelled { reason },
            _ => {
                tracing::warn!(error = %DropError::DegenerateDrop, "drop ignored");
                DropOutcome::Ignored {
                    error: DropError::DegenerateDrop,
                }
            }
        }
    }

    /// Abort the active drag. The grid is left untouched.
    pub fn cancel(
        &mut self,
        reason: CancelReason,
        visuals: &mut dyn ItemVisuals,
    ) -> DragTransition {
        let transition = self.session.cancel(reason);
        restore(&transition, visuals);
        transition
    }

    /// End-of-gesture cleanup. A no-op when the drag already finished.
    pub fn end_drag(&mut self, visuals: &mut dyn ItemVisuals) -> Option<DragTransition> {
        let transition = self.session.force_cancel()?;
        restore(&transition, visuals);
        Some(transition)
    }

    /// Replace the grid from outside (for example after loading a new form).
    /// An active drag is cancelled and its visual restored; observers are not
    /// notified.
    pub fn replace_grid(
        &mut self,
        grid: Grid,
        visuals: &mut dyn ItemVisuals,
    ) -> Result<Option<DragTransition>, GridError> {
        grid.check_invariants()?;
        let cancelled = self.end_drag(visuals);
        self.grid = grid;
        Ok(cancelled)
    }

    /// Start a scoped gesture. `None` when the drag could not be armed.
    pub fn gesture<'a>(
        &'a mut self,
        item: &ItemId,
        visuals: &'a mut dyn ItemVisuals,
    ) -> Option<Gesture<'a>> {
        let transition = self.begin_drag(item, &mut *visuals);
        if matches!(transition.effect, DragEffect::Armed { .. }) {
            Some(Gesture {
                grid: self,
                visuals,
            })
        } else {
            None
        }
    }

    fn apply(&mut self, outcome: CommitOutcome, item: ItemId) -> DropOutcome {
        let CommitOutcome {
            grid,
            placed,
            removed_row,
            created_row,
        } = outcome;
        self.grid = grid;
        tracing::info!(
            item = %item,
            row = placed.row,
            index = placed.index,
            removed_row = ?removed_row,
            created_row,
            "drop committed"
        );
        for observer in &mut self.observers {
            observer.on_grid_changed(&self.grid);
        }
        DropOutcome::Committed { item, placed }
    }
}

fn restore(transition: &DragTransition, visuals: &mut dyn ItemVisuals) {
    if let Some(item) = transition.effect.restore() {
        visuals.set_hidden(item, false);
    }
}

/// An armed drag that is cancelled when dropped unfinished.
pub struct Gesture<'a> {
    grid: &'a mut DragDropGrid,
    visuals: &'a mut dyn ItemVisuals,
}

impl fmt::Debug for Gesture<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gesture")
            .field("state", self.grid.session.state())
            .finish_non_exhaustive()
    }
}

impl Gesture<'_> {
    pub fn over<G>(&mut self, pointer: Point, geometry: &G) -> DragTransition
    where
        G: GeometryProvider + ?Sized,
    {
        self.grid.drag_over(pointer, geometry)
    }

    pub fn leave(&mut self) -> DragTransition {
        self.grid.drag_leave()
    }

    /// Release and finish the gesture.
    pub fn release(mut self) -> DropOutcome {
        self.grid.drop_item(&mut *self.visuals)
    }

    /// Cancel and finish the gesture.
    pub fn cancel(mut self, reason: CancelReason) -> DragTransition {
        self.grid.cancel(reason, &mut *self.visuals)
    }
}

impl Drop for Gesture<'_> {
    fn drop(&mut self) {
        self.grid.end_drag(&mut *self.visuals);
    }
}
