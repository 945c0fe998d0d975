//! End-to-end properties of the search engine on small grids.

use skypath_core::{
    octile_distance, BoundaryPolicy, Coord, GridModel, Position, SearchConfig, SearchEngine,
    SearchError,
};
use std::sync::Arc;

const EPS: f32 = 1e-4;

fn flat(width: usize, height: usize) -> GridModel {
    GridModel::new(width, height, 1.0, Position::default())
}

/// 4x4 grid with a tall column at x = 2, open only at (2, 3).
fn column_grid() -> GridModel {
    let mut grid = flat(4, 4);
    for y in 0..3 {
        grid.set_height(Coord::new(2, y), 100.0).unwrap();
    }
    grid
}

fn bumpy_grid() -> GridModel {
    let mut grid = GridModel::new(10, 8, 2.0, Position::new(-10.0, 0.0, -8.0));
    grid.sample_terrain(&|x: f32, z: f32| ((x * 0.7).sin() + (z * 0.4).cos()) * 12.0);
    for (x, y) in [(3, 1), (3, 2), (3, 3), (6, 4), (6, 5), (6, 6), (7, 6)] {
        grid.set_walkable(Coord::new(x, y), false).unwrap();
    }
    grid
}

#[test]
fn heuristic_never_overestimates_on_flat_grid() {
    let grid = Arc::new(flat(6, 6));
    let mut engine = SearchEngine::new(grid.clone());
    for a in 0..grid.cell_count() {
        for b in 0..grid.cell_count() {
            let (a, b) = (grid.coord(a), grid.coord(b));
            let path = engine.find_path(a, b, 1.0).unwrap();
            let estimate = octile_distance(a, b, grid.cell_size());
            assert!(
                estimate <= path.total_cost() + EPS,
                "h({a}, {b}) = {estimate} > {}",
                path.total_cost()
            );
        }
    }
}

#[test]
fn start_equals_end_yields_one_node() {
    let mut engine = SearchEngine::new(Arc::new(bumpy_grid()));
    let path = engine.find_path(Coord::new(5, 5), Coord::new(5, 5), 3.0).unwrap();
    assert_eq!(path.cells(), &[Coord::new(5, 5)]);
    assert_eq!(path.total_cost(), 0.0);
}

#[test]
fn unwalkable_endpoints_are_rejected() {
    let mut engine = SearchEngine::new(Arc::new(bumpy_grid()));
    for _ in 0..2 {
        assert_eq!(
            engine.find_path(Coord::new(3, 2), Coord::new(0, 0), 1.0),
            Err(SearchError::InvalidEndpoint {
                coord: Coord::new(3, 2)
            })
        );
        assert_eq!(
            engine.find_path(Coord::new(0, 0), Coord::new(6, 5), 1.0),
            Err(SearchError::InvalidEndpoint {
                coord: Coord::new(6, 5)
            })
        );
    }
}

#[test]
fn consecutive_cells_are_adjacent() {
    let grid = Arc::new(bumpy_grid());
    let mut engine = SearchEngine::new(grid.clone());
    let pairs = [
        (Coord::new(0, 0), Coord::new(9, 7)),
        (Coord::new(0, 7), Coord::new(9, 0)),
        (Coord::new(2, 2), Coord::new(8, 5)),
        (Coord::new(9, 3), Coord::new(1, 4)),
    ];
    for (start, end) in pairs {
        let path = engine.find_path(start, end, 2.0).unwrap();
        assert_eq!(path.start(), Some(start));
        assert_eq!(path.end(), Some(end));
        for pair in path.cells().windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(grid.is_walkable(pair[1]));
        }
    }
}

#[test]
fn cost_does_not_decrease_with_multiplier() {
    let mut engine = SearchEngine::new(Arc::new(column_grid()));
    let mut previous = 0.0f32;
    for multiplier in [0.0, 0.001, 0.01, 0.1, 1.0, 10.0, 100.0] {
        let path = engine
            .find_path(Coord::new(0, 0), Coord::new(3, 0), multiplier)
            .unwrap();
        assert!(
            path.total_cost() + EPS >= previous,
            "multiplier {multiplier}: {} < {previous}",
            path.total_cost()
        );
        previous = path.total_cost();
    }
}

#[test]
fn cost_does_not_decrease_with_multiplier_on_rough_terrain() {
    let mut engine = SearchEngine::new(Arc::new(bumpy_grid()));
    let pairs = [
        (Coord::new(0, 0), Coord::new(9, 7)),
        (Coord::new(0, 7), Coord::new(9, 0)),
        (Coord::new(2, 2), Coord::new(8, 5)),
        (Coord::new(9, 3), Coord::new(1, 4)),
        (Coord::new(4, 0), Coord::new(5, 7)),
    ];
    for (start, end) in pairs {
        let mut previous = 0.0f32;
        for multiplier in [0.0, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 20.0, 100.0] {
            let path = engine.find_path(start, end, multiplier).unwrap();
            assert!(
                path.total_cost() + EPS * previous.max(1.0) >= previous,
                "{start} -> {end} at {multiplier}: {} < {previous}",
                path.total_cost()
            );
            previous = path.total_cost();
        }
    }
}

#[test]
fn identical_requests_give_identical_paths() {
    let grid = Arc::new(bumpy_grid());
    let mut first = SearchEngine::new(grid.clone());
    let mut second = SearchEngine::new(grid);

    let a = first.find_path(Coord::new(0, 3), Coord::new(9, 6), 4.0).unwrap();
    let b = second.find_path(Coord::new(0, 3), Coord::new(9, 6), 4.0).unwrap();
    let _ = first.find_path(Coord::new(9, 7), Coord::new(0, 0), 0.5).unwrap();
    let c = first.find_path(Coord::new(0, 3), Coord::new(9, 6), 4.0).unwrap();

    assert_eq!(a.cells(), b.cells());
    assert_eq!(a.cells(), c.cells());
    assert_eq!(a.total_cost(), c.total_cost());
}

#[test]
fn flat_diagonal_scenario() {
    let mut engine = SearchEngine::new(Arc::new(flat(4, 4)));
    let path = engine.find_path(Coord::new(0, 0), Coord::new(3, 3), 1.0).unwrap();
    assert_eq!(
        path.cells(),
        &[
            Coord::new(0, 0),
            Coord::new(1, 1),
            Coord::new(2, 2),
            Coord::new(3, 3)
        ]
    );
    assert!((path.total_cost() - 4.243).abs() < 1e-3);
}

#[test]
fn routes_around_tall_column() {
    let mut engine = SearchEngine::new(Arc::new(column_grid()));
    let path = engine
        .find_path(Coord::new(0, 0), Coord::new(3, 0), 10.0)
        .unwrap();

    assert!(path.cells().contains(&Coord::new(2, 3)));
    assert!(path.cells().iter().all(|c| c.x != 2 || c.y == 3));
    assert!(path.total_cost() < 100.0);
}

#[test]
fn clamping_resolver_accepts_out_of_range_start() {
    let grid = Arc::new(flat(4, 4));
    let requested = Coord::new(-1, -1);

    let clamping = grid.resolver().with_policy(BoundaryPolicy::Clamp);
    let start = clamping.resolve(requested);
    assert_eq!(start, Coord::new(0, 0));
    let mut engine = SearchEngine::new(grid.clone());
    assert!(engine.find_path(start, Coord::new(3, 3), 1.0).is_ok());

    let strict = grid.resolver().with_policy(BoundaryPolicy::Reject);
    assert!(!strict.is_valid(strict.resolve(requested)));
    assert_eq!(
        engine.find_path(requested, Coord::new(3, 3), 1.0),
        Err(SearchError::InvalidEndpoint { coord: requested })
    );

    let config = SearchConfig {
        boundary: BoundaryPolicy::Clamp,
        ..SearchConfig::default()
    };
    let mut clamping_engine = SearchEngine::with_config(grid, config);
    let path = clamping_engine
        .find_path(requested, Coord::new(3, 3), 1.0)
        .unwrap();
    assert_eq!(path.start(), Some(Coord::new(0, 0)));
}

#[test]
fn path_maps_to_cell_centers() {
    let grid = GridModel::new(3, 3, 10.0, Position::new(100.0, 5.0, 200.0));
    let resolver = grid.resolver();
    let mut engine = SearchEngine::new(Arc::new(grid));
    let path = engine.find_path(Coord::new(0, 0), Coord::new(2, 0), 0.0).unwrap();
    let world = path.to_world(&resolver, 30.0);
    assert_eq!(world.first(), Some(&Position::new(105.0, 35.0, 205.0)));
    assert_eq!(world.last(), Some(&Position::new(125.0, 35.0, 205.0)));
}
