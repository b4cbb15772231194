//! Serialization round trips through the text format, snapshots and
//! `serde_json`.

use approx::assert_relative_eq;
use triangulation3::prelude::*;

type Tr = Triangulation3<FastKernel<f64>>;

fn sample() -> Tr {
    let mut tr = Tr::default();
    tr.insert_points([
        Point::new([0.0, 0.0, 0.0]),
        Point::new([1.5, 0.0, 0.0]),
        Point::new([0.0, 1.25, 0.0]),
        Point::new([0.0, 0.0, 2.0]),
        Point::new([0.3, 0.3, 0.3]),
        Point::new([-1.0, 2.0, 0.5]),
    ])
    .unwrap();
    tr
}

#[test]
fn test_json_round_trip_preserves_structure() {
    let tr = sample();
    let json = serde_json::to_string(&tr).unwrap();
    let back: Tr = serde_json::from_str(&json).unwrap();
    assert!(back.is_valid(true));
    assert_eq!(back.number_of_vertices(), tr.number_of_vertices());
    assert_eq!(back.number_of_cells(), tr.number_of_cells());
    assert!(back == tr);
}

#[test]
fn test_snapshot_points_survive_json() {
    let tr = sample();
    let snapshot = tr.snapshot();
    assert_eq!(snapshot.dimension, 3);
    assert_eq!(snapshot.points.len(), tr.number_of_vertices());
    assert_eq!(snapshot.cells.len(), tr.number_of_cells());

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: TriangulationSnapshot<Point<f64, 3>> = serde_json::from_str(&json).unwrap();
    for (p, q) in snapshot.points.iter().zip(&back.points) {
        for axis in 0..3 {
            assert_relative_eq!(p.coords()[axis], q.coords()[axis]);
        }
    }
    let rebuilt = Tr::from_snapshot(FastKernel::new(), back).unwrap();
    assert!(rebuilt == tr);
}

#[test]
fn test_text_round_trip_in_every_dimension() {
    let points = [
        Point::new([0.0, 0.0, 0.0]),
        Point::new([1.0, 0.0, 0.0]),
        Point::new([0.0, 1.0, 0.0]),
        Point::new([0.0, 0.0, 1.0]),
    ];
    let mut tr = Tr::default();
    for p in points {
        let mut text = Vec::new();
        tr.write_text(&mut text).unwrap();
        let back = Tr::read_text(text.as_slice(), FastKernel::new()).unwrap();
        assert_eq!(back.dimension(), tr.dimension());
        assert!(back == tr);
        tr.insert(p, None).unwrap();
    }
}

#[test]
fn test_corrupted_neighbors_are_rejected() {
    let tr = sample();
    let mut snapshot = tr.snapshot();
    let first = snapshot.neighbors[0][0];
    snapshot.neighbors[0][0] = snapshot.neighbors[0][1];
    snapshot.neighbors[0][1] = first;
    assert!(Tr::from_snapshot(FastKernel::new(), snapshot).is_err());
}

#[test]
fn test_truncated_text_is_rejected() {
    let mut text = Vec::new();
    sample().write_text(&mut text).unwrap();
    let truncated = &text[..text.len() / 2];
    assert!(Tr::read_text(truncated, FastKernel::new()).is_err());
}
