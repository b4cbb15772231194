use crate::core::triangulation_data_structure::{CellKey, VertexKey};
use slotmap::SparseSecondaryMap;

/// Sparse side table keyed by [`CellKey`].
///
/// Used for per-call scratch state such as conflict flags, so the permanent
/// cell record never carries transient data.
///
/// ```rust
/// use triangulation3::core::collections::CellSecondaryMap;
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// tr.insert(Point::new([0.0, 0.0, 0.0]), None).unwrap();
/// let mut visited: CellSecondaryMap<bool> = CellSecondaryMap::new();
/// for cell in tr.cells() {
///     visited.insert(cell, true);
/// }
/// assert_eq!(visited.len(), tr.number_of_cells());
/// ```
pub type CellSecondaryMap<V> = SparseSecondaryMap<CellKey, V>;

/// Sparse side table keyed by [`VertexKey`].
pub type VertexSecondaryMap<V> = SparseSecondaryMap<VertexKey, V>;
