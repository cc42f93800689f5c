#![forbid(unsafe_code)]

//! Mutation engine: applies one committed drop to the grid.
//!
//! [`commit`] never touches the caller's grid. It works on a copy and hands
//! the finished grid back, so a drop is either fully applied or not applied
//! at all.
//!
//! # Steps
//!
//! 1. Locate the dragged item by id.
//! 2. [`detach`] it from its row, then [`prune_emptied_row`] deletes that row
//!    if it is now empty.
//! 3. [`attach`] it at the target. Target indices were resolved against the
//!    layout *before* removal, so when step 2 deleted a row every row index
//!    after it is shifted down by one before it is interpreted.
//!
//! Removal always happens before the destination is interpreted.

use serde::{Deserialize, Serialize};

use crate::error::DropError;
use crate::id::ItemId;
use crate::model::{Grid, Item, ItemPosition, Row};
use crate::resolve::ResolvedTarget;

/// Frozen description of one drop: what moves, from where, to where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstruction {
    pub item: ItemId,
    /// Position captured when the drag started.
    pub source: ItemPosition,
    pub target: ResolvedTarget,
}

/// Result of a successful [`commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The updated grid.
    pub grid: Grid,
    /// Where the item landed in the updated grid.
    pub placed: ItemPosition,
    /// Row deleted because the move emptied it (pre-removal index).
    pub removed_row: Option<usize>,
    /// Whether the item was placed in a newly created row.
    pub created_row: bool,
}

/// Apply `instruction` to a copy of `grid`.
pub fn commit(grid: &Grid, instruction: &MoveInstruction) -> Result<CommitOutcome, DropError> {
    let source = locate_source(grid, instruction)?;

    let rows_before = grid.row_count();
    if instruction.target.row() >= rows_before {
        return Err(DropError::InvalidTarget {
            target: instruction.target,
            rows: rows_before,
        });
    }

    let mut next = grid.clone();
    let item = detach(&mut next, source).ok_or_else(|| DropError::ItemNotFound {
        id: instruction.item.clone(),
    })?;
    let removed_row = prune_emptied_row(&mut next, source.row);
    let (placed, created_row) = attach(&mut next, item, instruction.target, removed_row).ok_or(
        DropError::InvalidTarget {
            target: instruction.target,
            rows: rows_before,
        },
    )?;
    debug_assert_eq!(next.check_invariants(), Ok(()));

    tracing::debug!(
        item = %instruction.item,
        from_row = source.row,
        from_index = source.index,
        to_row = placed.row,
        to_index = placed.index,
        removed_row = ?removed_row,
        created_row,
        "drop applied"
    );

    Ok(CommitOutcome {
        grid: next,
        placed,
        removed_row,
        created_row,
    })
}

/// The recorded source position wins when it still holds the item;
/// otherwise the item is looked up by id.
fn locate_source(grid: &Grid, instruction: &MoveInstruction) -> Result<ItemPosition, DropError> {
    if grid
        .item_at(instruction.source)
        .is_some_and(|item| item.id() == &instruction.item)
    {
        return Ok(instruction.source);
    }
    match grid.locate(&instruction.item) {
        Some(found) => {
            tracing::warn!(
                item = %instruction.item,
                recorded_row = instruction.source.row,
                recorded_index = instruction.source.index,
                row = found.row,
                index = found.index,
                "stale drag source; using current position"
            );
            Ok(found)
        }
        None => Err(DropError::ItemNotFound {
            id: instruction.item.clone(),
        }),
    }
}

/// Remove the item at `at`. May leave its row empty.
pub(crate) fn detach(grid: &mut Grid, at: ItemPosition) -> Option<Item> {
    grid.row_mut(at.row)?.remove(at.index)
}

/// Delete row `row` if it holds no items. Returns the deleted index.
///
/// Afterwards no row of the grid is empty, provided only `row` could have
/// been emptied.
pub(crate) fn prune_emptied_row(grid: &mut Grid, row: usize) -> Option<usize> {
    let emptied = grid.row(row).is_some_and(Row::is_empty);
    let removed = if emptied {
        grid.remove_row(row).map(|_| row)
    } else {
        None
    };
    debug_assert!(grid.rows().iter().all(|r| !r.is_empty()));
    removed
}

/// Insert `item` at `target`, shifting pre-removal row indices past
/// `removed_row`. Returns the placed position and whether a row was created.
pub(crate) fn attach(
    grid: &mut Grid,
    item: Item,
    target: ResolvedTarget,
    removed_row: Option<usize>,
) -> Option<(ItemPosition, bool)> {
    let shift = |index: usize| match removed_row {
        Some(removed) if removed < index => index - 1,
        _ => index,
    };

    match target {
        ResolvedTarget::BeforeRow(_) | ResolvedTarget::AfterRow(_) => {
            let gap = shift(target.gap()?);
            Some((new_row(grid, gap, item), true))
        }
        // The item was the sole occupant of the row it is dropped into: the
        // row is gone, so it comes back as a new row in the same place.
        ResolvedTarget::InsideRow { row, .. } if removed_row == Some(row) => {
            Some((new_row(grid, row, item), true))
        }
        ResolvedTarget::InsideRow { row, index } => {
            let row = shift(row);
            let at = grid.row_mut(row)?.insert_clamped(index, item);
            Some((ItemPosition::new(row, at), false))
        }
    }
}

fn new_row(grid: &mut Grid, gap: usize, item: Item) -> ItemPosition {
    let row = grid.insert_row(gap, Row::single(item));
    ItemPosition::new(row, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(layout: &[&[&str]]) -> Grid {
        Grid::from_rows(
            layout
                .iter()
                .map(|row| row.iter().map(|id| Item::with_id(*id)).collect())
                .collect(),
        )
        .unwrap()
    }

    fn mv(g: &Grid, id: &str, target: ResolvedTarget) -> Result<CommitOutcome, DropError> {
        let item = ItemId::from(id);
        let source = g.locate(&item).unwrap_or(ItemPosition::new(0, 0));
        commit(
            g,
            &MoveInstruction {
                item,
                source,
                target,
            },
        )
    }

    #[test]
    fn scenario_a_move_into_next_row() {
        let g = grid(&[&["A", "B"], &["C"]]);
        let out = mv(&g, "A", ResolvedTarget::InsideRow { row: 1, index: 0 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["B"], vec!["A", "C"]]);
        assert_eq!(out.placed, ItemPosition::new(1, 0));
        assert_eq!(out.removed_row, None);
        assert!(!out.created_row);
    }

    #[test]
    fn scenario_b_delete_then_create_row() {
        let g = grid(&[&["A"], &["B"]]);
        let out = mv(&g, "A", ResolvedTarget::BeforeRow(1)).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["A"], vec!["B"]]);
        assert_eq!(out.removed_row, Some(0));
        assert!(out.created_row);
        assert_eq!(out.placed, ItemPosition::new(0, 0));
    }

    #[test]
    fn scenario_c_reorder_within_row() {
        let g = grid(&[&["A", "B", "C"]]);
        let out = mv(&g, "C", ResolvedTarget::InsideRow { row: 0, index: 0 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["C", "A", "B"]]);
    }

    #[test]
    fn scenario_d_self_drop_after_own_row() {
        let g = grid(&[&["A"]]);
        let out = mv(&g, "A", ResolvedTarget::AfterRow(0)).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["A"]]);
        assert_eq!(out.removed_row, Some(0));
        assert!(out.created_row);
    }

    #[test]
    fn sole_item_shifts_later_inside_target() {
        // Row 1 in the pre-removal layout is [C]; after deleting row 0 it is row 0.
        let g = grid(&[&["A"], &["C"], &["D"]]);
        let out = mv(&g, "A", ResolvedTarget::InsideRow { row: 1, index: 1 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["C", "A"], vec!["D"]]);
        assert_eq!(out.placed, ItemPosition::new(0, 1));
    }

    #[test]
    fn sole_item_shifts_later_new_row_targets() {
        let g = grid(&[&["A"], &["B"], &["C"]]);
        let after_b = mv(&g, "A", ResolvedTarget::AfterRow(1)).unwrap();
        assert_eq!(after_b.grid.id_layout(), vec![vec!["B"], vec!["A"], vec!["C"]]);

        let after_last = mv(&g, "A", ResolvedTarget::AfterRow(2)).unwrap();
        assert_eq!(after_last.grid.id_layout(), vec![vec!["B"], vec!["C"], vec!["A"]]);

        let before_c = mv(&g, "A", ResolvedTarget::BeforeRow(2)).unwrap();
        assert_eq!(before_c.grid.id_layout(), vec![vec!["B"], vec!["A"], vec!["C"]]);
    }

    #[test]
    fn earlier_targets_are_not_shifted() {
        let g = grid(&[&["A"], &["B"], &["C"]]);
        let out = mv(&g, "C", ResolvedTarget::InsideRow { row: 0, index: 1 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["A", "C"], vec!["B"]]);

        let out = mv(&g, "C", ResolvedTarget::BeforeRow(0)).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["C"], vec!["A"], vec!["B"]]);
    }

    #[test]
    fn inside_own_deleted_row_recreates_it_in_place() {
        let g = grid(&[&["A", "B"], &["C"], &["D"]]);
        let out = mv(&g, "C", ResolvedTarget::InsideRow { row: 1, index: 0 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["A", "B"], vec!["C"], vec!["D"]]);
        assert!(out.created_row);
    }

    #[test]
    fn insertion_index_is_clamped() {
        let g = grid(&[&["A", "B"], &["C"]]);
        let out = mv(&g, "A", ResolvedTarget::InsideRow { row: 1, index: 99 }).unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["B"], vec!["C", "A"]]);
        assert_eq!(out.placed, ItemPosition::new(1, 1));
    }

    #[test]
    fn missing_item_is_not_found_and_grid_untouched() {
        let g = grid(&[&["A"]]);
        let err = mv(&g, "Z", ResolvedTarget::AfterRow(0)).unwrap_err();
        assert_eq!(err, DropError::ItemNotFound { id: "Z".into() });
        assert_eq!(g.id_layout(), vec![vec!["A"]]);
    }

    #[test]
    fn target_beyond_layout_is_invalid() {
        let g = grid(&[&["A"], &["B"]]);
        let err = mv(&g, "A", ResolvedTarget::InsideRow { row: 2, index: 0 }).unwrap_err();
        assert_eq!(
            err,
            DropError::InvalidTarget {
                target: ResolvedTarget::InsideRow { row: 2, index: 0 },
                rows: 2
            }
        );
        assert!(mv(&g, "A", ResolvedTarget::AfterRow(5)).is_err());
    }

    #[test]
    fn stale_source_falls_back_to_lookup() {
        let g = grid(&[&["A", "B"], &["C"]]);
        let out = commit(
            &g,
            &MoveInstruction {
                item: "B".into(),
                source: ItemPosition::new(1, 0),
                target: ResolvedTarget::BeforeRow(0),
            },
        )
        .unwrap();
        assert_eq!(out.grid.id_layout(), vec![vec!["B"], vec!["A"], vec!["C"]]);
    }

    #[test]
    fn input_grid_is_never_mutated() {
        let g = grid(&[&["A", "B"], &["C"]]);
        let before = g.clone();
        mv(&g, "C", ResolvedTarget::InsideRow { row: 0, index: 1 }).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn prune_only_deletes_empty_rows() {
        let mut g = grid(&[&["A", "B"], &["C"]]);
        assert_eq!(prune_emptied_row(&mut g, 0), None);

        detach(&mut g, ItemPosition::new(1, 0)).unwrap();
        assert_eq!(prune_emptied_row(&mut g, 1), Some(1));
        assert_eq!(g.id_layout(), vec![vec!["A", "B"]]);
        assert_eq!(prune_emptied_row(&mut g, 7), None);
    }

    #[test]
    fn attach_into_empty_grid_creates_first_row() {
        let mut g = grid(&[&["A"]]);
        let item = detach(&mut g, ItemPosition::new(0, 0)).unwrap();
        let removed = prune_emptied_row(&mut g, 0);
        assert!(g.is_empty());
        let (placed, created) =
            attach(&mut g, item, ResolvedTarget::BeforeRow(0), removed).unwrap();
        assert_eq!(placed, ItemPosition::new(0, 0));
        assert!(created);
        assert_eq!(g.id_layout(), vec![vec!["A"]]);
    }

    #[test]
    fn after_row_at_index_limit_is_rejected_without_overflow() {
        let mut g = grid(&[&["A", "B"]]);
        let item = detach(&mut g, ItemPosition::new(0, 0)).unwrap();
        let removed = prune_emptied_row(&mut g, 0);
        assert_eq!(
            attach(&mut g, item, ResolvedTarget::AfterRow(usize::MAX), removed),
            None
        );
        assert_eq!(g.id_layout(), vec![vec!["B"]]);

        let g = grid(&[&["A", "B"]]);
        assert!(matches!(
            mv(&g, "A", ResolvedTarget::AfterRow(usize::MAX)),
            Err(DropError::InvalidTarget { rows: 1, .. })
        ));
    }
}
