#![forbid(unsafe_code)]

//! End-to-end drag scenarios through [`DragDropGrid`].
//!
//! Geometry comes from [`UniformLayout`] with default metrics: 40px rows with
//! 10px gaps (row `r` spans `50r..50r+40`) and 100px items with 10px gaps.

use std::cell::RefCell;
use std::rc::Rc;

use gridshift::{
    CancelReason, CellMetrics, DragConfig, DragDropGrid, DropOutcome, GlyphHandle, Grid,
    HiddenItems, IdGenerator, Item, ItemBounds, ItemId, ItemPosition, Point, RowBounds,
    StaticGeometry, UniformLayout, render_grid,
};

struct Harness {
    ctl: DragDropGrid,
    visuals: HiddenItems,
    notifications: Rc<RefCell<usize>>,
}

impl Harness {
    fn new(rows: &[&[&str]]) -> Self {
        let grid = Grid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|id| Item::with_id(*id)).collect())
                .collect(),
        )
        .unwrap();
        let mut ctl = DragDropGrid::new(grid, DragConfig::default()).unwrap();
        ctl.sync_handles();
        let notifications = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&notifications);
        ctl.subscribe(move |_: &Grid| *sink.borrow_mut() += 1);
        Self {
            ctl,
            visuals: HiddenItems::new(),
            notifications,
        }
    }

    /// Drag `id`, move over each pointer in turn, release.
    fn drag(&mut self, id: &str, path: &[(f64, f64)]) -> DropOutcome {
        let geometry = UniformLayout::from_grid(self.ctl.grid(), CellMetrics::default());
        self.ctl.begin_drag(&ItemId::from(id), &mut self.visuals);
        for &(x, y) in path {
            self.ctl.drag_over(Point::new(x, y), &geometry);
        }
        let outcome = self.ctl.drop_item(&mut self.visuals);
        self.ctl.end_drag(&mut self.visuals);
        outcome
    }

    fn layout(&self) -> Vec<Vec<&str>> {
        self.ctl.grid().id_layout()
    }

    fn notified(&self) -> usize {
        *self.notifications.borrow()
    }
}

#[test]
fn move_into_next_row_front() {
    let mut h = Harness::new(&[&["A", "B"], &["C"]]);
    let outcome = h.drag("A", &[(10.0, 70.0)]);
    assert_eq!(
        outcome,
        DropOutcome::Committed {
            item: "A".into(),
            placed: ItemPosition::new(1, 0)
        }
    );
    assert_eq!(h.layout(), vec![vec!["B"], vec!["A", "C"]]);
    assert_eq!(h.notified(), 1);
    assert!(h.visuals.is_empty());
}

#[test]
fn sole_item_before_next_row_stays_put() {
    let mut h = Harness::new(&[&["A"], &["B"]]);
    // y = 55 lies in the band above row 1.
    let outcome = h.drag("A", &[(10.0, 55.0)]);
    assert_eq!(
        outcome,
        DropOutcome::Committed {
            item: "A".into(),
            placed: ItemPosition::new(0, 0)
        }
    );
    assert_eq!(h.layout(), vec![vec!["A"], vec!["B"]]);
    assert_eq!(h.notified(), 1);
}

#[test]
fn last_item_to_front_of_row() {
    let mut h = Harness::new(&[&["A", "B", "C"]]);
    h.drag("C", &[(5.0, 20.0)]);
    assert_eq!(h.layout(), vec![vec!["C", "A", "B"]]);
}

#[test]
fn sole_item_after_its_own_row() {
    let mut h = Harness::new(&[&["A"]]);
    let outcome = h.drag("A", &[(10.0, 35.0)]);
    assert!(outcome.is_committed());
    assert_eq!(h.layout(), vec![vec!["A"]]);
}

#[test]
fn release_without_target_changes_nothing() {
    let mut h = Harness::new(&[&["A", "B"], &["C"]]);
    let outcome = h.drag("B", &[]);
    assert_eq!(
        outcome,
        DropOutcome::Cancelled {
            reason: CancelReason::NoTarget
        }
    );
    assert_eq!(h.layout(), vec![vec!["A", "B"], vec!["C"]]);
    assert_eq!(h.notified(), 0);
    assert!(h.visuals.is_empty());
}

#[test]
fn leaving_the_grid_before_release_cancels() {
    let mut h = Harness::new(&[&["A", "B"], &["C"]]);
    let geometry = UniformLayout::from_grid(h.ctl.grid(), CellMetrics::default());
    h.ctl.begin_drag(&"A".into(), &mut h.visuals);
    h.ctl.drag_over(Point::new(10.0, 70.0), &geometry);
    h.ctl.drag_leave();
    let outcome = h.ctl.drop_item(&mut h.visuals);
    assert!(matches!(outcome, DropOutcome::Cancelled { .. }));
    assert_eq!(h.notified(), 0);
}

#[test]
fn escape_cancels_and_restores_visual() {
    let mut h = Harness::new(&[&["A", "B"]]);
    let geometry = UniformLayout::from_grid(h.ctl.grid(), CellMetrics::default());
    h.ctl.begin_drag(&"B".into(), &mut h.visuals);
    assert!(h.visuals.is_hidden(&"B".into()));
    h.ctl.drag_over(Point::new(5.0, 20.0), &geometry);
    h.ctl.cancel(CancelReason::EscapeKey, &mut h.visuals);
    assert!(h.visuals.is_empty());
    assert!(!h.ctl.session().is_active());
    assert_eq!(h.layout(), vec![vec!["A", "B"]]);
}

#[test]
fn middle_row_emptied_then_target_below_shifts_up() {
    let mut h = Harness::new(&[&["A"], &["B"], &["C", "D"]]);
    // Inside row 2, right of D's midpoint.
    h.drag("B", &[(200.0, 120.0)]);
    assert_eq!(h.layout(), vec![vec!["A"], vec!["C", "D", "B"]]);
}

#[test]
fn after_last_row_appends_a_row() {
    let mut h = Harness::new(&[&["A", "B"], &["C"]]);
    h.drag("A", &[(10.0, 89.0)]);
    assert_eq!(h.layout(), vec![vec!["B"], vec!["C"], vec!["A"]]);
}

#[test]
fn only_latest_move_counts() {
    let mut h = Harness::new(&[&["A", "B"], &["C"]]);
    h.drag("C", &[(10.0, 70.0), (10.0, -5.0), (150.0, 20.0)]);
    // Last move: inside row 0, just left of B's midpoint (160), so slot 1.
    assert_eq!(h.layout(), vec![vec!["A", "C", "B"]]);
}

#[test]
fn consecutive_drags_keep_every_item() {
    let mut h = Harness::new(&[&["A", "B", "C"], &["D"]]);
    h.drag("A", &[(10.0, 70.0)]);
    h.drag("D", &[(10.0, -5.0)]);
    h.drag("B", &[(500.0, 200.0)]);
    let mut ids: Vec<&str> = h.layout().into_iter().flatten().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert_eq!(h.notified(), 3);
    h.ctl.grid().check_invariants().unwrap();
}

#[test]
fn explicit_geometry_with_uneven_boxes() {
    let grid = Grid::from_rows(vec![
        vec![Item::with_id("wide"), Item::with_id("narrow")],
        vec![Item::with_id("x")],
    ])
    .unwrap();
    let geometry = StaticGeometry::new()
        .with_row(
            RowBounds::new(0.0, 60.0),
            vec![
                ("wide".into(), ItemBounds::new(0.0, 300.0)),
                ("narrow".into(), ItemBounds::new(300.0, 40.0)),
            ],
        )
        .with_row(
            RowBounds::new(80.0, 60.0),
            vec![("x".into(), ItemBounds::new(0.0, 100.0))],
        );
    let mut ctl = DragDropGrid::new(grid, DragConfig::default()).unwrap();
    ctl.sync_handles();
    let mut visuals = HiddenItems::new();

    ctl.begin_drag(&"x".into(), &mut visuals);
    // Closest centre is narrow (320); left of it inserts before narrow.
    ctl.drag_over(Point::new(310.0, 30.0), &geometry);
    assert!(ctl.drop_item(&mut visuals).is_committed());
    assert_eq!(ctl.grid().id_layout(), vec![vec!["wide", "x", "narrow"]]);
}

#[test]
fn observers_can_rerender_from_committed_grid() {
    let mut ids = IdGenerator::new();
    let name = Item::field("Name", "Ivan", &mut ids);
    let city = Item::field("City", "Oslo", &mut ids);
    let name_id = name.id().clone();
    let grid = Grid::from_rows(vec![vec![name, city]]).unwrap();

    let mut ctl = DragDropGrid::new(grid, DragConfig::default()).unwrap();
    ctl.sync_handles();
    let labels = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&labels);
    ctl.subscribe(move |grid: &Grid| {
        let rendered = render_grid(grid, &GlyphHandle::default());
        *sink.borrow_mut() = rendered
            .iter()
            .map(|row| row.iter().map(|v| v.label.clone()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
    });

    let geometry = UniformLayout::from_grid(ctl.grid(), CellMetrics::default());
    let mut visuals = HiddenItems::new();
    ctl.begin_drag(&name_id, &mut visuals);
    ctl.drag_over(Point::new(10.0, 45.0), &geometry);
    assert!(ctl.drop_item(&mut visuals).is_committed());

    assert_eq!(
        *labels.borrow(),
        vec![vec!["City - Oslo".to_owned()], vec!["Name - Ivan".to_owned()]]
    );
}
