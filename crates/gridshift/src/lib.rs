#![forbid(unsafe_code)]

//! Drag-and-drop reordering for grids of rows and items.
//!
//! # Role
//! `gridshift` decides where a dragged item lands in an ordered grid and
//! applies the move. It owns no rendering: the host reports geometry through
//! [`GeometryProvider`], shows or hides visuals through [`ItemVisuals`] and
//! redraws from [`render_grid`] after observers learn of a committed change.
//!
//! # Pipeline
//! - **resolve**: pointer position plus row/item boxes to a [`ResolvedTarget`]
//!   (before a row, after a row, or inside a row at an item slot).
//! - **session**: one [`DragSession`] per grid tracks the dragged item,
//!   current target and placeholder through `Idle → Armed → Resolving`.
//! - **engine**: [`commit`] applies a [`MoveInstruction`] to a copy of the
//!   grid, deleting a row the move emptied and creating rows for between-row
//!   targets.
//! - **controller**: [`DragDropGrid`] wires the three together and notifies
//!   [`GridObserver`]s once per committed drop.
//!
//! ```
//! use gridshift::{
//!     CellMetrics, DragConfig, DragDropGrid, DropOutcome, Grid, HiddenItems, Item, Point,
//!     UniformLayout,
//! };
//!
//! let grid = Grid::from_rows(vec![
//!     vec![Item::with_id("a"), Item::with_id("b")],
//!     vec![Item::with_id("c")],
//! ])
//! .unwrap();
//! let mut ctl = DragDropGrid::new(grid, DragConfig::default()).unwrap();
//! ctl.sync_handles();
//!
//! let geometry = UniformLayout::from_grid(ctl.grid(), CellMetrics::default());
//! let mut visuals = HiddenItems::new();
//! ctl.begin_drag(&"a".into(), &mut visuals);
//! ctl.drag_over(Point::new(10.0, 70.0), &geometry);
//! assert!(matches!(ctl.drop_item(&mut visuals), DropOutcome::Committed { .. }));
//! assert_eq!(ctl.grid().id_layout(), vec![vec!["b"], vec!["a", "c"]]);
//! ```

pub mod controller;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod placeholder;
pub mod render;
pub mod resolve;
pub mod session;

pub use controller::{DragDropGrid, DropOutcome, Gesture, GridObserver};
pub use engine::{CommitOutcome, MoveInstruction, commit};
pub use error::{ConfigError, DropError, GridError};
pub use geometry::{
    CellMetrics, GeometryProvider, ItemBounds, Point, RowBounds, StaticGeometry, UniformLayout,
};
pub use id::{IdGenerator, ItemId};
pub use model::{Grid, Item, ItemPosition, Row};
pub use placeholder::{Placeholder, PlaceholderTracker, RowSide};
pub use render::{
    DragHandle, GlyphHandle, HandleVisual, HiddenItems, IconHandle, ItemVisual, ItemVisuals,
    render_grid, render_item,
};
pub use resolve::{
    DEFAULT_EDGE_BAND, DropResolver, ResolvedTarget, ResolverConfig, RowDrop, RowPosition,
    resolve_item_slot, resolve_row,
};
pub use session::{
    CancelReason, DragConfig, DragEffect, DragNoopReason, DragSession, DragState,
    DragTransition, HandleRegistry,
};
