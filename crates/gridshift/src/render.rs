#![forbid(unsafe_code)]

//! Render collaborator contract.
//!
//! The crate never draws anything itself. It tells the host which item
//! visuals to hide while they are dragged ([`ItemVisuals`]) and describes what
//! each item visual should contain ([`ItemVisual`]), with the drag handle
//! supplied by a pluggable [`DragHandle`] strategy.

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::model::{Grid, Item};

/// Default icon shown on drag handles.
pub const DEFAULT_HANDLE_ICON: &str = "/shared/icons/burgerMenu.svg";
/// Default icon edge length in pixels.
pub const DEFAULT_HANDLE_SIZE: u16 = 20;

/// Host-side visuals the session shows and hides.
pub trait ItemVisuals {
    /// Hide (`true`) or restore (`false`) the visual of `item`.
    fn set_hidden(&mut self, item: &ItemId, hidden: bool);
}

/// Ids currently hidden. Suitable for hosts that redraw from state.
#[derive(Debug, Clone, Default)]
pub struct HiddenItems {
    hidden: AHashSet<ItemId>,
}

impl HiddenItems {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_hidden(&self, item: &ItemId) -> bool {
        self.hidden.contains(item)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }
}

impl ItemVisuals for HiddenItems {
    fn set_hidden(&mut self, item: &ItemId, hidden: bool) {
        if hidden {
            self.hidden.insert(item.clone());
        } else {
            self.hidden.remove(item);
        }
    }
}

/// What a drag handle looks like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandleVisual {
    /// Image handle: source path and square size in pixels.
    Icon { src: String, size: u16 },
    /// Text glyph handle.
    Glyph { glyph: String },
}

impl fmt::Display for HandleVisual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Icon { src, size } => write!(f, "[{src} {size}px]"),
            Self::Glyph { glyph } => f.write_str(glyph),
        }
    }
}

/// Strategy for drawing the handle on every item visual.
pub trait DragHandle {
    fn visual(&self) -> HandleVisual;
}

/// Image handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconHandle {
    pub src: String,
    pub size: u16,
}

impl Default for IconHandle {
    fn default() -> Self {
        Self {
            src: DEFAULT_HANDLE_ICON.to_owned(),
            size: DEFAULT_HANDLE_SIZE,
        }
    }
}

impl DragHandle for IconHandle {
    fn visual(&self) -> HandleVisual {
        HandleVisual::Icon {
            src: self.src.clone(),
            size: self.size,
        }
    }
}

/// Text glyph handle, for hosts without images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphHandle {
    pub glyph: String,
}

impl Default for GlyphHandle {
    fn default() -> Self {
        Self {
            glyph: "\u{2261}".to_owned(),
        }
    }
}

impl DragHandle for GlyphHandle {
    fn visual(&self) -> HandleVisual {
        HandleVisual::Glyph {
            glyph: self.glyph.clone(),
        }
    }
}

/// Description of one item's visual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVisual {
    pub id: ItemId,
    pub draggable: bool,
    pub handle: HandleVisual,
    pub label: String,
}

impl fmt::Display for ItemVisual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.handle, self.label)
    }
}

/// Describe a draggable visual for `item`.
#[must_use]
pub fn render_item(item: &Item, handle: &dyn DragHandle) -> ItemVisual {
    ItemVisual {
        id: item.id().clone(),
        draggable: true,
        handle: handle.visual(),
        label: item.label(),
    }
}

/// Describe every item visual, row by row. Used for the re-render pass that
/// follows a committed grid change.
#[must_use]
pub fn render_grid(grid: &Grid, handle: &dyn DragHandle) -> Vec<Vec<ItemVisual>> {
    grid.rows()
        .iter()
        .map(|row| row.items().iter().map(|item| render_item(item, handle)).collect())
        .collect()
}
