#![forbid(unsafe_code)]

//! Geometric primitives reported by the host's geometry provider.
//!
//! Coordinates are host pixels (origin top-left, `y` grows downward). Only the
//! vertical extent of rows and the horizontal extent of items take part in
//! drop resolution, so the boxes carry exactly those fields.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::model::Grid;

/// Pointer position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of one row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RowBounds {
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Height as reported by the host (normally `bottom - top`).
    pub height: f64,
}

impl RowBounds {
    /// Create bounds from a top edge and height.
    #[inline]
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    /// Vertical centre.
    #[inline]
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Horizontal extent of one item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemBounds {
    /// Left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
}

impl ItemBounds {
    #[inline]
    #[must_use]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Horizontal midpoint.
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Source of row and item bounding boxes, queried on every pointer move.
///
/// Rows are reported in display order. Item boxes for a row are reported in
/// display order and tagged with the id of the item they belong to, so the
/// resolver can leave the dragged item out.
pub trait GeometryProvider {
    /// Bounding boxes of all rows, in display order.
    fn row_bounds(&self) -> Vec<RowBounds>;

    /// Bounding boxes of the items of `row`, in display order.
    ///
    /// An out-of-range row yields an empty list.
    fn item_bounds(&self, row: usize) -> Vec<(ItemId, ItemBounds)>;
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn row_bounds(&self) -> Vec<RowBounds> {
        (**self).row_bounds()
    }

    fn item_bounds(&self, row: usize) -> Vec<(ItemId, ItemBounds)> {
        (**self).item_bounds(row)
    }
}

/// Geometry snapshot with explicit boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticGeometry {
    rows: Vec<RowBounds>,
    items: Vec<Vec<(ItemId, ItemBounds)>>,
}

impl StaticGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row with its item boxes.
    #[must_use]
    pub fn with_row(mut self, bounds: RowBounds, items: Vec<(ItemId, ItemBounds)>) -> Self {
        self.rows.push(bounds);
        self.items.push(items);
        self
    }
}

impl GeometryProvider for StaticGeometry {
    fn row_bounds(&self) -> Vec<RowBounds> {
        self.rows.clone()
    }

    fn item_bounds(&self, row: usize) -> Vec<(ItemId, ItemBounds)> {
        self.items.get(row).cloned().unwrap_or_default()
    }
}

/// Fixed-size cell layout derived from a grid.
///
/// Rows are stacked from `origin.y` with `row_gap` between them; items are laid
/// out left to right from `origin.x` with `item_gap` between them. Useful for
/// hosts that render a regular grid and for deterministic tests.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLayout {
    rows: Vec<RowBounds>,
    items: Vec<Vec<(ItemId, ItemBounds)>>,
}

/// Cell metrics for [`UniformLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub origin: Point,
    pub row_height: f64,
    pub row_gap: f64,
    pub item_width: f64,
    pub item_gap: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            row_height: 40.0,
            row_gap: 10.0,
            item_width: 100.0,
            item_gap: 10.0,
        }
    }
}

impl UniformLayout {
    /// Lay out `grid` with the given metrics.
    #[must_use]
    pub fn from_grid(grid: &Grid, metrics: CellMetrics) -> Self {
        let mut rows = Vec::with_capacity(grid.row_count());
        let mut items = Vec::with_capacity(grid.row_count());
        let mut top = metrics.origin.y;
        for row in grid.rows() {
            rows.push(RowBounds::new(top, metrics.row_height));
            let mut left = metrics.origin.x;
            let boxes = row
                .items()
                .iter()
                .map(|item| {
                    let bounds = ItemBounds::new(left, metrics.item_width);
                    left += metrics.item_width + metrics.item_gap;
                    (item.id().clone(), bounds)
                })
                .collect();
            items.push(boxes);
            top += metrics.row_height + metrics.row_gap;
        }
        Self { rows, items }
    }
}

impl GeometryProvider for UniformLayout {
    fn row_bounds(&self) -> Vec<RowBounds> {
        self.rows.clone()
    }

    fn item_bounds(&self, row: usize) -> Vec<(ItemId, ItemBounds)> {
        self.items.get(row).cloned().unwrap_or_default()
    }
}
