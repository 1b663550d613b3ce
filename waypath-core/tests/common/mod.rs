#![allow(dead_code)]

use geo::{Distance, Haversine, Point};
use waypath_core::loading::EdgeRecord;
use waypath_core::prelude::*;

/// Spacing between grid nodes in degrees
pub const GRID_STEP: f64 = 0.001;

pub fn segment(id: i64, source: i64, target: i64, cost: f64, reverse: Option<f64>) -> EdgeRecord {
    EdgeRecord {
        id,
        source,
        target,
        cost,
        reverse_cost: reverse,
        length: cost,
    }
}

pub fn grid_id(row: usize, col: usize, size: usize) -> i64 {
    i64::try_from(row * size + col).unwrap() + 1
}

pub fn grid_point(row: usize, col: usize) -> Point<f64> {
    Point::new(col as f64 * GRID_STEP, row as f64 * GRID_STEP)
}

/// `size` x `size` grid of two-way streets in every mode, lengths are the
/// great-circle distances and costs equal the lengths
pub fn grid_source(size: usize) -> InMemorySource {
    let mut source = InMemorySource::new();
    for row in 0..size {
        for col in 0..size {
            let point = grid_point(row, col);
            source = source.with_node(grid_id(row, col, size), point.y(), point.x());
        }
    }

    let mut next_edge = 1;
    for row in 0..size {
        for col in 0..size {
            let neighbours = [(row + 1, col), (row, col + 1)];
            for (other_row, other_col) in neighbours {
                if other_row >= size || other_col >= size {
                    continue;
                }
                let length =
                    Haversine.distance(grid_point(row, col), grid_point(other_row, other_col));
                let record = EdgeRecord {
                    id: next_edge,
                    source: grid_id(row, col, size),
                    target: grid_id(other_row, other_col, size),
                    cost: length,
                    reverse_cost: Some(length),
                    length,
                };
                next_edge += 1;
                for mode in Mode::ALL {
                    source = source.with_edge(mode, record.clone());
                }
            }
        }
    }
    source
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
