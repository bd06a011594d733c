use gridwall::{GridConfig, GridState, Palette, Phase, RecordingSurface, Viewport};

fn build(w: f64, h: f64) -> GridState {
    let cfg = GridConfig {
        cell_size: 200.0,
        ..GridConfig::default()
    };
    GridState::initialize(cfg, Palette::default(), 42, Viewport::new(w, h)).unwrap()
}

#[test]
fn grid_dimensions_cover_the_viewport() {
    let grid = build(1000.0, 600.0);
    assert_eq!((grid.cols(), grid.rows()), (5, 3));
    assert_eq!(grid.tiles().len(), 15);

    // Non-multiple viewports round up so the wall always covers the screen.
    let grid = build(1001.0, 601.0);
    assert_eq!((grid.cols(), grid.rows()), (6, 4));
    let cell = grid.config().cell_size;
    assert!(f64::from(grid.cols()) * cell >= 1001.0);
    assert!(f64::from(grid.rows()) * cell >= 601.0);
}

#[test]
fn every_new_tile_starts_holding() {
    let grid = build(1000.0, 600.0);
    assert!(grid.tiles().iter().all(|t| t.phase() == Phase::Hold));
    assert!(grid.tiles().iter().all(|t| t.next().is_none()));
}

#[test]
fn resize_discards_and_rebuilds_wholesale() {
    let mut grid = build(1000.0, 600.0);
    let mut rec = RecordingSurface::new();
    for f in 0..10 {
        grid.render_frame(&mut rec, f as f64 / 60.0);
        rec.take();
    }

    grid.on_resize(Viewport::new(400.0, 400.0));
    assert_eq!((grid.cols(), grid.rows()), (2, 2));
    assert_eq!(grid.tiles().len(), 4);
    // Rebuilt tiles are brand new: all holding, none mid-fade.
    assert!(grid.tiles().iter().all(|t| t.phase() == Phase::Hold));
}

#[test]
fn resize_to_degenerate_then_back() {
    let mut grid = build(1000.0, 600.0);
    grid.on_resize(Viewport::new(0.0, 600.0));
    assert!(grid.tiles().is_empty());

    let mut rec = RecordingSurface::new();
    grid.render_frame(&mut rec, 0.0);
    assert_eq!(rec.take().len(), 1); // just the clear

    grid.on_resize(Viewport::new(1000.0, 600.0));
    assert_eq!(grid.tiles().len(), 15);
}

#[test]
fn per_tile_seeds_are_distinct() {
    let grid = build(1000.0, 600.0);
    let mut seeds: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
    seeds.sort_by(f64::total_cmp);
    seeds.dedup();
    assert_eq!(seeds.len(), grid.tiles().len());
}

#[test]
fn fixed_module_params_survive_a_long_run() {
    let mut grid = build(600.0, 400.0);
    let originals: Vec<_> = grid
        .tiles()
        .iter()
        .map(|t| (t.seed(), t.current().clone()))
        .collect();

    let mut rec = RecordingSurface::new();
    // Stay inside the initial hold (hold 100 − jitter 10 plus desync offset).
    for f in 0..60u64 {
        grid.render_frame(&mut rec, f as f64 / 60.0);
        rec.take();
    }

    for (tile, (seed, current)) in grid.tiles().iter().zip(&originals) {
        assert_eq!(tile.seed(), *seed);
        assert_eq!(tile.current(), current);
    }
}
