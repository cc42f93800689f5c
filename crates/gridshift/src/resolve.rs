#![forbid(unsafe_code)]

//! Drop position resolution: pointer geometry to an insertion target.
//!
//! Resolution happens in two stages. [`resolve_row`] classifies the pointer's
//! vertical position against the row boxes into *before a row*, *after a
//! row*, or *inside a row*. When the pointer is inside a row,
//! [`resolve_item_slot`] picks the insertion index from the horizontal
//! position against that row's item boxes (dragged item excluded).
//!
//! # Row precedence
//!
//! With `band = edge_band` (0.25 by default), first match wins:
//!
//! 1. `y < first.top + band * first.height` → before the first row.
//! 2. `y` in `[cur.bottom + band * cur.height, next.top + band * next.height]`
//!    for an adjacent pair → before `next`.
//! 3. `y > last.bottom - band * last.height` → after the last row.
//! 4. Otherwise inside the row whose vertical centre is closest to `y`
//!    (first occurrence wins ties).
//!
//! The bands make edges resolve to a between-rows target rather than an
//! ambiguous inside target, and rule 4 guarantees a row is always chosen
//! when at least one row exists.
//!
//! Both functions are pure; identical input yields identical output.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{GeometryProvider, ItemBounds, Point, RowBounds};
use crate::id::ItemId;

/// Default fraction of a row's height treated as a between-rows zone.
pub const DEFAULT_EDGE_BAND: f64 = 0.25;

/// Tuning for the row classifier. Deserialisation validates the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResolverConfig")]
pub struct ResolverConfig {
    /// Fraction of row height that counts as the edge band (default: 0.25).
    pub edge_band: f64,
}

#[derive(Deserialize)]
struct RawResolverConfig {
    #[serde(default = "default_edge_band")]
    edge_band: f64,
}

impl TryFrom<RawResolverConfig> for ResolverConfig {
    type Error = ConfigError;

    fn try_from(raw: RawResolverConfig) -> Result<Self, Self::Error> {
        Self::new(raw.edge_band)
    }
}

fn default_edge_band() -> f64 {
    DEFAULT_EDGE_BAND
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            edge_band: DEFAULT_EDGE_BAND,
        }
    }
}

impl ResolverConfig {
    /// Construct a config with an explicit edge band.
    pub fn new(edge_band: f64) -> Result<Self, ConfigError> {
        let config = Self { edge_band };
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite bands and bands wider than half a row.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edge_band.is_finite() && (0.0..=0.5).contains(&self.edge_band) {
            Ok(())
        } else {
            Err(ConfigError::InvalidEdgeBand {
                band: self.edge_band,
            })
        }
    }
}

/// Row-level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPosition {
    Before,
    After,
    Inside,
}

/// Output of [`resolve_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowDrop {
    pub row: usize,
    pub position: RowPosition,
}

impl RowDrop {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, position: RowPosition) -> Self {
        Self { row, position }
    }
}

/// Classified insertion point.
///
/// Row indices refer to the layout the geometry provider reported, which
/// still contains the dragged item's row. `index` in [`InsideRow`] counts
/// positions among the row's items with the dragged item left out.
///
/// [`InsideRow`]: ResolvedTarget::InsideRow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedTarget {
    /// New row directly above `row`.
    BeforeRow(usize),
    /// New row directly below `row`.
    AfterRow(usize),
    /// Existing `row`, at item position `index`.
    InsideRow { row: usize, index: usize },
}

impl ResolvedTarget {
    /// Row index the target refers to.
    #[must_use]
    pub const fn row(&self) -> usize {
        match *self {
            Self::BeforeRow(row) | Self::AfterRow(row) | Self::InsideRow { row, .. } => row,
        }
    }

    /// Whether dropping here creates a new row.
    #[must_use]
    pub const fn creates_row(&self) -> bool {
        matches!(self, Self::BeforeRow(_) | Self::AfterRow(_))
    }

    /// Gap index (`0..=rows`) where a new row would be inserted. `None` for
    /// inside-row targets and for an after-row target past `usize::MAX`.
    #[must_use]
    pub const fn gap(&self) -> Option<usize> {
        match *self {
            Self::BeforeRow(row) => Some(row),
            Self::AfterRow(row) => row.checked_add(1),
            Self::InsideRow { .. } => None,
        }
    }
}

/// Classify `y` against `rows`. Returns `None` only when `rows` is empty.
#[must_use]
pub fn resolve_row(config: &ResolverConfig, y: f64, rows: &[RowBounds]) -> Option<RowDrop> {
    let first = rows.first()?;
    let last = rows.last()?;
    let band = config.edge_band;

    if y < first.top + first.height * band {
        return Some(RowDrop::new(0, RowPosition::Before));
    }

    for (i, pair) in rows.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        if y >= current.bottom + current.height * band && y <= next.top + next.height * band {
            return Some(RowDrop::new(i + 1, RowPosition::Before));
        }
    }

    if y > last.bottom - last.height * band {
        return Some(RowDrop::new(rows.len() - 1, RowPosition::After));
    }

    let mut closest = 0;
    let mut closest_distance = f64::INFINITY;
    for (i, row) in rows.iter().enumerate() {
        let distance = (y - row.center_y()).abs();
        if distance < closest_distance {
            closest_distance = distance;
            closest = i;
        }
    }
    Some(RowDrop::new(closest, RowPosition::Inside))
}

/// Insertion index for `x` among `items` (dragged item already excluded).
///
/// An empty list yields `0` (end of row). Otherwise the item with the
/// closest horizontal centre decides: left of its midpoint inserts before
/// it, right of or on the midpoint inserts after it.
#[must_use]
pub fn resolve_item_slot(x: f64, items: &[ItemBounds]) -> usize {
    let mut closest: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let distance = (x - item.center_x()).abs();
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((i, distance));
        }
    }
    match closest {
        None => items.len(),
        Some((k, _)) if x < items[k].center_x() => k,
        Some((k, _)) => k + 1,
    }
}

/// Both resolution stages over a [`GeometryProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropResolver {
    config: ResolverConfig,
}

impl DropResolver {
    #[must_use]
    pub const fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `pointer` to a target, leaving `dragged` out of slot
    /// computation. `None` when the geometry reports no rows.
    pub fn resolve<G>(
        &self,
        pointer: Point,
        geometry: &G,
        dragged: &ItemId,
    ) -> Option<ResolvedTarget>
    where
        G: GeometryProvider + ?Sized,
    {
        let rows = geometry.row_bounds();
        let drop = resolve_row(&self.config, pointer.y, &rows)?;
        let target = match drop.position {
            RowPosition::Before => ResolvedTarget::BeforeRow(drop.row),
            RowPosition::After => ResolvedTarget::AfterRow(drop.row),
            RowPosition::Inside => {
                let items: Vec<ItemBounds> = geometry
                    .item_bounds(drop.row)
                    .into_iter()
                    .filter(|(id, _)| id != dragged)
                    .map(|(_, bounds)| bounds)
                    .collect();
                ResolvedTarget::InsideRow {
                    row: drop.row,
                    index: resolve_item_slot(pointer.x, &items),
                }
            }
        };
        tracing::trace!(
            x = pointer.x,
            y = pointer.y,
            rows = rows.len(),
            resolved = ?target,
            "drop position resolved"
        );
        Some(target)
    }
}
