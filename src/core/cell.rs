//! Cell records stored in the triangulation data structure.
//!
//! A [`Cell`] has four vertex slots and four neighbor slots. Only the slots
//! `0..=dimension` of the owning triangulation are meaningful; the others hold
//! null keys. `neighbor(i)` is the cell sharing every vertex of this cell
//! except `vertex(i)`.
//!
//! Cells are plain key tuples: no geometry, no scratch state.

#![forbid(unsafe_code)]

use super::collections::MAX_CELL_SLOTS;
use super::triangulation_data_structure::{CellKey, VertexKey};
use slotmap::Key;

/// A maximal simplex of the current dimension.
///
/// # Examples
///
/// ```rust
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// tr.insert(Point::new([0.0, 0.0, 0.0]), None).unwrap();
/// tr.insert(Point::new([1.0, 0.0, 0.0]), None).unwrap();
/// for key in tr.cells() {
///     let cell = tr.tds().cell(key).unwrap();
///     // Dimension 1: slots 0 and 1 are in use.
///     assert!(cell.index_of_neighbor(cell.neighbor(0)).is_some());
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    vertices: [VertexKey; MAX_CELL_SLOTS],
    neighbors: [CellKey; MAX_CELL_SLOTS],
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            vertices: [VertexKey::null(); MAX_CELL_SLOTS],
            neighbors: [CellKey::null(); MAX_CELL_SLOTS],
        }
    }
}

impl Cell {
    /// A cell over `vertices`, with no neighbors yet.
    #[must_use]
    pub fn new(vertices: [VertexKey; MAX_CELL_SLOTS]) -> Self {
        Self {
            vertices,
            neighbors: [CellKey::null(); MAX_CELL_SLOTS],
        }
    }

    /// Vertex at slot `i`.
    #[inline]
    #[must_use]
    pub const fn vertex(&self, i: usize) -> VertexKey {
        self.vertices[i]
    }

    /// All four vertex slots, unused ones null.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[VertexKey; MAX_CELL_SLOTS] {
        &self.vertices
    }

    /// Neighbor opposite slot `i`.
    #[inline]
    #[must_use]
    pub const fn neighbor(&self, i: usize) -> CellKey {
        self.neighbors[i]
    }

    /// All four neighbor slots, unused ones null.
    #[inline]
    #[must_use]
    pub const fn neighbors(&self) -> &[CellKey; MAX_CELL_SLOTS] {
        &self.neighbors
    }

    /// Slot holding `v`, if any.
    #[must_use]
    pub fn index_of(&self, v: VertexKey) -> Option<usize> {
        if v.is_null() {
            return None;
        }
        self.vertices.iter().position(|&w| w == v)
    }

    /// True when `v` occupies one of the slots.
    #[must_use]
    pub fn has_vertex(&self, v: VertexKey) -> bool {
        self.index_of(v).is_some()
    }

    /// Slot whose neighbor is `n`, if any.
    #[must_use]
    pub fn index_of_neighbor(&self, n: CellKey) -> Option<usize> {
        if n.is_null() {
            return None;
        }
        self.neighbors.iter().position(|&m| m == n)
    }

    pub(crate) fn set_vertex(&mut self, i: usize, v: VertexKey) {
        self.vertices[i] = v;
    }

    pub(crate) fn set_neighbor(&mut self, i: usize, n: CellKey) {
        self.neighbors[i] = n;
    }

    /// Swaps slots 0 and 1 of both the vertices and the neighbors, reversing
    /// the combinatorial orientation.
    pub(crate) fn change_orientation(&mut self) {
        self.vertices.swap(0, 1);
        self.neighbors.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DenseSlotMap;

    #[test]
    fn cell_slot_lookup_ignores_null() {
        let mut keys: DenseSlotMap<VertexKey, ()> = DenseSlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let cell = Cell::new([a, b, VertexKey::null(), VertexKey::null()]);
        assert_eq!(cell.index_of(b), Some(1));
        assert_eq!(cell.index_of(VertexKey::null()), None);
        assert!(!cell.has_vertex(VertexKey::null()));
        assert_eq!(cell.index_of_neighbor(CellKey::null()), None);
    }

    #[test]
    fn change_orientation_swaps_first_two_slots() {
        let mut vkeys: DenseSlotMap<VertexKey, ()> = DenseSlotMap::with_key();
        let mut ckeys: DenseSlotMap<CellKey, ()> = DenseSlotMap::with_key();
        let v: Vec<_> = (0..4).map(|_| vkeys.insert(())).collect();
        let n: Vec<_> = (0..4).map(|_| ckeys.insert(())).collect();
        let mut cell = Cell::new([v[0], v[1], v[2], v[3]]);
        for (i, &k) in n.iter().enumerate() {
            cell.set_neighbor(i, k);
        }
        cell.change_orientation();
        assert_eq!(cell.vertex(0), v[1]);
        assert_eq!(cell.vertex(1), v[0]);
        assert_eq!(cell.neighbor(0), n[1]);
        assert_eq!(cell.neighbor(3), n[3]);
    }
}
