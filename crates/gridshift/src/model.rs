#![forbid(unsafe_code)]

//! Grid model: ordered rows of ordered items.
//!
//! # Invariants
//!
//! 1. Every row of a committed grid holds at least one item.
//! 2. Item ids are unique across the whole grid.
//! 3. Row order and item order are the displayed order and are only changed
//!    by the mutation engine.
//!
//! [`Grid::check_invariants`] reports the first violation found. Grids built
//! through [`Grid::from_rows`] are checked on construction; grids obtained by
//! deserialisation should be checked by the caller.

use std::collections::BTreeMap;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::id::{IdGenerator, ItemId};

/// Attribute key for an item's display name.
pub const ATTR_NAME: &str = "name";
/// Attribute key for an item's display text.
pub const ATTR_TEXT: &str = "text";

/// One uniquely identified unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl Item {
    /// Item with a caller-supplied id and no attributes.
    #[must_use]
    pub fn with_id(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Named field with a freshly issued id.
    #[must_use]
    pub fn field(name: impl Into<String>, text: impl Into<String>, ids: &mut IdGenerator) -> Self {
        Self::with_id(ids.next_id())
            .with_attribute(ATTR_NAME, name)
            .with_attribute(ATTR_TEXT, text)
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Display label: `"{name} - {text}"`, falling back to the id when the
    /// item carries neither attribute.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.attribute(ATTR_NAME), self.attribute(ATTR_TEXT)) {
            (Some(name), Some(text)) => format!("{name} - {text}"),
            (Some(only), None) | (None, Some(only)) => only.to_owned(),
            (None, None) => self.id.to_string(),
        }
    }
}

/// Location of an item: row index and index within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemPosition {
    pub row: usize,
    pub index: usize,
}

impl ItemPosition {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, index: usize) -> Self {
        Self { row, index }
    }
}

/// Ordered sequence of items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    items: Vec<Item>,
}

impl Row {
    pub(crate) fn single(item: Item) -> Self {
        Self { items: vec![item] }
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item with `id` in this row.
    #[must_use]
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub(crate) fn insert_clamped(&mut self, index: usize, item: Item) -> usize {
        let at = index.min(self.items.len());
        self.items.insert(at, item);
        at
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

/// Ordered sequence of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from nested item lists, checking every invariant.
    pub fn from_rows(rows: Vec<Vec<Item>>) -> Result<Self, GridError> {
        let grid = Self {
            rows: rows.into_iter().map(|items| Row { items }).collect(),
        };
        grid.check_invariants()?;
        Ok(grid)
    }

    /// Verify non-empty rows and id uniqueness.
    pub fn check_invariants(&self) -> Result<(), GridError> {
        let mut seen = AHashSet::with_capacity(self.item_count());
        for (row_index, row) in self.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(GridError::EmptyRow { row: row_index });
            }
            for item in &row.items {
                if !seen.insert(item.id()) {
                    return Err(GridError::DuplicateItem {
                        id: item.id().clone(),
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the position of the item with `id`.
    #[must_use]
    pub fn locate(&self, id: &ItemId) -> Option<ItemPosition> {
        self.rows.iter().enumerate().find_map(|(row, items)| {
            items
                .position_of(id)
                .map(|index| ItemPosition::new(row, index))
        })
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.rows
            .iter()
            .flat_map(|row| row.items.iter())
            .find(|item| item.id() == id)
    }

    /// Item at a position, if any.
    #[must_use]
    pub fn item_at(&self, pos: ItemPosition) -> Option<&Item> {
        self.rows.get(pos.row).and_then(|row| row.items.get(pos.index))
    }

    /// All ids in display order (row-major).
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.items.iter().map(Item::id))
    }

    /// Ids grouped by row, for compact comparisons.
    #[must_use]
    pub fn id_layout(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.items.iter().map(|item| item.id().as_str()).collect())
            .collect()
    }

    /// Append a new row holding only `item`.
    ///
    /// This is also how the first row of an empty grid is created, since an
    /// empty grid offers no drop target.
    pub fn push_row(&mut self, item: Item) -> Result<ItemPosition, GridError> {
        self.insert_new_row(self.rows.len(), item)
    }

    /// Insert a new row holding only `item` above every existing row.
    pub fn insert_first_row(&mut self, item: Item) -> Result<ItemPosition, GridError> {
        self.insert_new_row(0, item)
    }

    fn insert_new_row(&mut self, at: usize, item: Item) -> Result<ItemPosition, GridError> {
        if self.locate(item.id()).is_some() {
            return Err(GridError::DuplicateItem {
                id: item.id().clone(),
            });
        }
        let row = self.insert_row(at, Row::single(item));
        Ok(ItemPosition::new(row, 0))
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub(crate) fn insert_row(&mut self, at: usize, row: Row) -> usize {
        let at = at.min(self.rows.len());
        self.rows.insert(at, row);
        at
    }

    pub(crate) fn remove_row(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }
}
