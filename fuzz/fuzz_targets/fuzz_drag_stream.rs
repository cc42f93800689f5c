#![no_main]

use arbitrary::Arbitrary;
use gridshift::{
    CancelReason, CellMetrics, DragConfig, DragDropGrid, DropOutcome, Grid, HiddenItems, Item,
    ItemId, Point, UniformLayout,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Begin(u8),
    Over(i16, i16),
    Leave,
    Release,
    Cancel,
    End,
}

#[derive(Debug, Arbitrary)]
struct Input {
    shape: Vec<u8>,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    // Up to 8 rows of 1..=6 items.
    let rows: Vec<Vec<Item>> = input
        .shape
        .iter()
        .take(8)
        .enumerate()
        .map(|(r, len)| {
            (0..usize::from(len % 6) + 1)
                .map(|i| Item::with_id(format!("r{r}i{i}")))
                .collect()
        })
        .collect();
    if rows.is_empty() {
        return;
    }
    let grid = Grid::from_rows(rows).expect("generated grid is valid");
    let total = grid.item_count();

    let mut ctl =
        DragDropGrid::new(grid, DragConfig::default()).expect("default config is valid");
    ctl.sync_handles();
    let mut visuals = HiddenItems::new();

    for step in input.steps.into_iter().take(256) {
        let geometry = UniformLayout::from_grid(ctl.grid(), CellMetrics::default());
        match step {
            Step::Begin(pick) => {
                let ids: Vec<ItemId> = ctl.grid().item_ids().cloned().collect();
                let id = ids[usize::from(pick) % ids.len()].clone();
                ctl.begin_drag(&id, &mut visuals);
            }
            Step::Over(x, y) => {
                ctl.drag_over(Point::new(f64::from(x), f64::from(y)), &geometry);
            }
            Step::Leave => {
                ctl.drag_leave();
            }
            Step::Release => {
                if let DropOutcome::Ignored { error } = ctl.drop_item(&mut visuals) {
                    assert_eq!(error, gridshift::DropError::DegenerateDrop);
                }
            }
            Step::Cancel => {
                ctl.cancel(CancelReason::EscapeKey, &mut visuals);
            }
            Step::End => {
                ctl.end_drag(&mut visuals);
            }
        }

        // Post-conditions that must always hold:
        assert_eq!(ctl.grid().check_invariants(), Ok(()));
        assert_eq!(ctl.grid().item_count(), total, "item lost or duplicated");
        if !ctl.session().is_active() {
            assert!(visuals.is_empty(), "visual left hidden after drag ended");
        }
    }
});
