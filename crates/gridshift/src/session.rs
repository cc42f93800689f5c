#![forbid(unsafe_code)]

//! Drag session: lifecycle of one reordering gesture.
//!
//! ```text
//! Idle -> Armed -> Resolving -> (Committed | Cancelled) -> Idle
//!           \-------------------> Cancelled -> Idle
//! ```
//!
//! `Committed` and `Cancelled` are reported as transition effects; by the
//! time a call returns the machine is already back in `Idle`, with the
//! dragged item, target and placeholder cleared.
//!
//! # Invariants
//!
//! 1. At most one drag is active; a second `start` is a no-op.
//! 2. `Resolving` always carries the target the placeholder currently shows.
//! 3. Every exit from an active state goes through the same cleanup and
//!    reports the item whose visual must be restored.
//! 4. A release yields `Committed` only from `Resolving`.
//!
//! # Failure Modes
//!
//! - Release with no armed target (pointer left the grid, zero rows):
//!   `Cancelled { reason: NoTarget }`, nothing to apply.
//! - Release while idle: `Noop { reason: DegenerateDrop }`.
//! - Gesture abandoned without a release: the owner calls
//!   [`DragSession::force_cancel`].

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::engine::MoveInstruction;
use crate::error::ConfigError;
use crate::geometry::{GeometryProvider, Point};
use crate::id::ItemId;
use crate::model::{Grid, ItemPosition};
use crate::placeholder::{Placeholder, PlaceholderTracker};
use crate::resolve::{DropResolver, ResolvedTarget, ResolverConfig};

/// Session tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl DragConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Armed {
        item: ItemId,
        source: ItemPosition,
    },
    Resolving {
        item: ItemId,
        source: ItemPosition,
        target: ResolvedTarget,
    },
}

impl DragState {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::Resolving { .. } => "resolving",
        }
    }

    /// Dragged item and its captured source, when active.
    #[must_use]
    pub fn dragged(&self) -> Option<(&ItemId, ItemPosition)> {
        match self {
            Self::Idle => None,
            Self::Armed { item, source } | Self::Resolving { item, source, .. } => {
                Some((item, *source))
            }
        }
    }
}

/// Why a gesture ended without a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Released with no target armed.
    NoTarget,
    EscapeKey,
    PointerCancel,
    FocusLost,
    /// Cleanup after abnormal termination or an external model change.
    Programmatic,
}

/// Explicit diagnostics for inputs that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    /// Gesture started on something that is not a registered item.
    NotDraggable,
    /// Release with no active session.
    DegenerateDrop,
}

/// Effect emitted by one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    /// Drag began; the host hides or dims `item`'s visual.
    Armed { item: ItemId, source: ItemPosition },
    /// Pointer moved; `moved` tells whether the placeholder changed.
    TargetUpdated {
        target: Option<ResolvedTarget>,
        placeholder: Placeholder,
        moved: bool,
    },
    /// Drop accepted; apply `instruction` with the mutation engine.
    Committed { instruction: MoveInstruction },
    Cancelled { item: ItemId, reason: CancelReason },
    Noop { reason: DragNoopReason },
}

impl DragEffect {
    /// Item whose visual must be shown again, for effects that end a gesture.
    #[must_use]
    pub fn restore(&self) -> Option<&ItemId> {
        match self {
            Self::Committed { instruction } => Some(&instruction.item),
            Self::Cancelled { item, .. } => Some(item),
            _ => None,
        }
    }
}

/// One state-machine step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Draggable ids, registered once each.
///
/// The host attaches drag listeners to the visuals of the ids returned by
/// [`sync`](HandleRegistry::sync); ids already registered are never returned
/// again, so listeners are attached exactly once per item.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    attached: AHashSet<ItemId>,
}

impl HandleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the grid's new ids (returned in display order) and forget
    /// ids that left the grid.
    pub fn sync(&mut self, grid: &Grid) -> Vec<ItemId> {
        let present: AHashSet<&ItemId> = grid.item_ids().collect();
        self.attached.retain(|id| present.contains(id));
        grid.item_ids()
            .filter(|id| self.attached.insert((*id).clone()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_registered(&self, id: &ItemId) -> bool {
        self.attached.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

/// State machine for one drag at a time.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
    resolver: DropResolver,
    placeholder: PlaceholderTracker,
    handles: HandleRegistry,
    transition_counter: u64,
}

impl DragSession {
    /// Session with a validated `config`.
    pub fn new(config: DragConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            resolver: DropResolver::new(config.resolver),
            ..Self::default()
        })
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> Placeholder {
        self.placeholder.current()
    }

    #[must_use]
    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    /// See [`HandleRegistry::sync`].
    pub fn sync_handles(&mut self, grid: &Grid) -> Vec<ItemId> {
        self.handles.sync(grid)
    }

    #[must_use]
    pub fn resolver(&self) -> &DropResolver {
        &self.resolver
    }

    /// Begin dragging `item`. Captures its current position in `grid`.
    pub fn start(&mut self, grid: &Grid, item: &ItemId) -> DragTransition {
        let from = self.state.clone();
        if self.is_active() {
            return self.noop(from, DragNoopReason::ActiveDragAlreadyInProgress);
        }
        let source = match grid.locate(item) {
            Some(source) if self.handles.is_registered(item) => source,
            _ => return self.noop(from, DragNoopReason::NotDraggable),
        };
        self.state = DragState::Armed {
            item: item.clone(),
            source,
        };
        self.record(
            from,
            DragEffect::Armed {
                item: item.clone(),
                source,
            },
        )
    }

    /// Re-resolve the target for `pointer` and move the placeholder.
    pub fn pointer_move<G>(&mut self, pointer: Point, geometry: &G) -> DragTransition
    where
        G: GeometryProvider + ?Sized,
    {
        let from = self.state.clone();
        let Some((item, source)) = self.state.dragged() else {
            return self.noop(from, DragNoopReason::IdleWithoutActiveDrag);
        };
        let item = item.clone();
        let target = self.resolver.resolve(pointer, geometry, &item);
        self.state = match target {
            Some(target) => DragState::Resolving {
                item,
                source,
                target,
            },
            None => DragState::Armed { item, source },
        };
        let moved = self.placeholder.track(target);
        self.record(
            from,
            DragEffect::TargetUpdated {
                target,
                placeholder: self.placeholder.current(),
                moved,
            },
        )
    }

    /// Pointer left the tracked surface: disarm the target.
    pub fn pointer_leave(&mut self) -> DragTransition {
        let from = self.state.clone();
        let Some((item, source)) = self.state.dragged() else {
            return self.noop(from, DragNoopReason::IdleWithoutActiveDrag);
        };
        self.state = DragState::Armed {
            item: item.clone(),
            source,
        };
        let moved = self.placeholder.disarm();
        self.record(
            from,
            DragEffect::TargetUpdated {
                target: None,
                placeholder: Placeholder::Hidden,
                moved,
            },
        )
    }

    /// Pointer released: freeze the armed target into a [`MoveInstruction`].
    pub fn release(&mut self) -> DragTransition {
        let from = self.state.clone();
        match &self.state {
            DragState::Idle => self.noop(from, DragNoopReason::DegenerateDrop),
            DragState::Armed { item, .. } => {
                let item = item.clone();
                self.reset();
                self.record(
                    from,
                    DragEffect::Cancelled {
                        item,
                        reason: CancelReason::NoTarget,
                    },
                )
            }
            DragState::Resolving {
                item,
                source,
                target,
            } => {
                debug_assert_eq!(self.placeholder.target(), Some(*target));
                let instruction = MoveInstruction {
                    item: item.clone(),
                    source: *source,
                    target: self.placeholder.target().unwrap_or(*target),
                };
                self.reset();
                self.record(from, DragEffect::Committed { instruction })
            }
        }
    }

    /// End the gesture without committing.
    pub fn cancel(&mut self, reason: CancelReason) -> DragTransition {
        let from = self.state.clone();
        let Some((item, _)) = self.state.dragged() else {
            return self.noop(from, DragNoopReason::IdleWithoutActiveDrag);
        };
        let item = item.clone();
        self.reset();
        self.record(from, DragEffect::Cancelled { item, reason })
    }

    /// Unconditionally return to `Idle`. `None` when already idle.
    ///
    /// For cleanup paths where no regular input is available (gesture
    /// abandoned, guard dropped, model replaced underneath the drag).
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        self.is_active().then(|| self.cancel(CancelReason::Programmatic))
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.placeholder.disarm();
    }

    fn noop(&mut self, from: DragState, reason: DragNoopReason) -> DragTransition {
        self.record(from, DragEffect::Noop { reason })
    }

    fn record(&mut self, from: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        tracing::debug!(
            transition_id = self.transition_counter,
            from = from.name(),
            to = self.state.name(),
            effect = ?effect,
            "drag transition"
        );
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.clone(),
            effect,
        }
    }
}
