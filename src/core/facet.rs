//! Facet and edge views.
//!
//! A [`Facet`] is a cell plus the slot of the vertex opposite it; an [`Edge`]
//! is a cell plus two slots. Both are `Copy` handles computed on demand and
//! never stored, following CGAL's `Facet` / `Edge` pairs. Resolving them to
//! vertex keys needs the owning [`Tds`].

#![forbid(unsafe_code)]

use super::triangulation_data_structure::{CellKey, Tds, VertexKey};
use super::util::{make_canonical, vertex_triple_index};

/// The face of `cell` opposite its slot `index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Facet {
    /// Cell containing the facet.
    pub cell: CellKey,
    /// Slot of the vertex opposite the facet.
    pub index: usize,
}

impl Facet {
    /// A facet handle.
    #[inline]
    #[must_use]
    pub const fn new(cell: CellKey, index: usize) -> Self {
        Self { cell, index }
    }

    /// The same facet seen from the neighboring cell.
    ///
    /// Returns `None` if the cell is stale or its neighbor does not point
    /// back.
    #[must_use]
    pub fn mirror<P>(&self, tds: &Tds<P>) -> Option<Self> {
        let neighbor = tds.cell(self.cell)?.neighbor(self.index);
        let index = tds.mirror_index(self.cell, self.index).ok()?;
        Some(Self::new(neighbor, index))
    }

    /// Vertex keys of a 3D facet, ordered so that the triple followed by the
    /// opposite vertex is positively oriented.
    #[must_use]
    pub fn vertex_triple<P>(&self, tds: &Tds<P>) -> Option<[VertexKey; 3]> {
        let cell = tds.cell(self.cell)?;
        Some([0, 1, 2].map(|j| cell.vertex(vertex_triple_index(self.index, j))))
    }

    /// [`vertex_triple`](Self::vertex_triple) rotated to canonical form.
    #[must_use]
    pub fn canonical_triple<P>(&self, tds: &Tds<P>) -> Option<[VertexKey; 3]> {
        self.vertex_triple(tds).map(make_canonical)
    }
}

/// The edge of `cell` joining slots `i` and `j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Cell containing the edge.
    pub cell: CellKey,
    /// First endpoint slot.
    pub i: usize,
    /// Second endpoint slot.
    pub j: usize,
}

impl Edge {
    /// An edge handle.
    #[inline]
    #[must_use]
    pub const fn new(cell: CellKey, i: usize, j: usize) -> Self {
        Self { cell, i, j }
    }

    /// The two endpoint keys.
    #[must_use]
    pub fn vertices<P>(&self, tds: &Tds<P>) -> Option<(VertexKey, VertexKey)> {
        let cell = tds.cell(self.cell)?;
        Some((cell.vertex(self.i), cell.vertex(self.j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_mirror_round_trip() {
        let mut tds: Tds<u32> = Tds::new();
        tds.insert_increase_dimension(0).unwrap();
        tds.insert_increase_dimension(1).unwrap();
        for cell in tds.cell_keys().collect::<Vec<_>>() {
            for i in 0..=1 {
                let facet = Facet::new(cell, i);
                let mirror = facet.mirror(&tds).unwrap();
                assert_eq!(mirror.mirror(&tds), Some(facet));
            }
        }
    }
}
