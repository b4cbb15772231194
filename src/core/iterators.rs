//! Traversal of vertices, cells, facets and edges.
//!
//! Every traversal comes in an "all" flavor, which includes the infinite
//! vertex and the simplices touching it, and a `finite_*` flavor, which
//! skips them. Facets and edges are reported once each, through one of the
//! cells containing them.

use crate::core::collections::{CellKeyBuffer, FastHashSet, VertexKeyBuffer};
use crate::core::facet::{Edge, Facet};
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, TdsError, VertexKey};
use crate::core::util::{ccw, cw, next_around_edge};
use crate::geometry::kernel::Kernel;

impl<K: Kernel> Triangulation3<K> {
    /// All vertices, the infinite vertex included.
    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.tds.vertex_keys()
    }

    /// Vertices carrying a point.
    pub fn finite_vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        let inf = self.infinite_vertex();
        self.tds.vertex_keys().filter(move |&v| v != inf)
    }

    /// All cells, infinite ones included.
    pub fn cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.tds.cell_keys()
    }

    /// Cells not incident to the infinite vertex. Empty below dimension 1.
    pub fn finite_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        let live = self.dimension() >= 1;
        self.tds
            .cell_keys()
            .filter(move |&c| live && !self.tds.is_infinite_cell(c))
    }

    /// Every facet once.
    ///
    /// In dimension 2 the facets are the faces, reported with index 3. In
    /// dimension 3 a facet shared by `c` and `n` is reported from the smaller
    /// key. Empty below dimension 2.
    pub fn facets(&self) -> impl Iterator<Item = Facet> + '_ {
        let dimension = self.dimension();
        self.tds.cells().flat_map(move |(c, cell)| {
            let slots: &[usize] = match dimension {
                2 => &[3],
                3 => &[0, 1, 2, 3],
                _ => &[],
            };
            slots
                .iter()
                .filter(move |&&i| dimension == 2 || c < cell.neighbor(i))
                .map(move |&i| Facet::new(c, i))
        })
    }

    /// Facets whose vertices are all finite.
    pub fn finite_facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.facets().filter(|facet| self.is_finite_facet(*facet))
    }

    fn is_finite_facet(&self, facet: Facet) -> bool {
        let inf = self.infinite_vertex();
        self.tds.cell(facet.cell).is_some_and(|cell| {
            cell.vertices()[..self.tds.arity()]
                .iter()
                .enumerate()
                .all(|(k, &v)| k == facet.index || v != inf)
        })
    }

    /// Every edge once. Empty below dimension 1.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let dimension = self.dimension();
        let mut edges = Vec::new();
        match dimension {
            1 => edges.extend(self.tds.cell_keys().map(|c| Edge::new(c, 0, 1))),
            2 => {
                for (c, cell) in self.tds.cells() {
                    for i in 0..3 {
                        if c < cell.neighbor(i) {
                            edges.push(Edge::new(c, ccw(i), cw(i)));
                        }
                    }
                }
            }
            3 => {
                let mut seen: FastHashSet<(VertexKey, VertexKey)> = FastHashSet::default();
                for (c, cell) in self.tds.cells() {
                    for i in 0..4 {
                        for j in (i + 1)..4 {
                            let (a, b) = (cell.vertex(i), cell.vertex(j));
                            if seen.insert((a.min(b), a.max(b))) {
                                edges.push(Edge::new(c, i, j));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        edges.into_iter()
    }

    /// Edges whose endpoints are both finite.
    pub fn finite_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let inf = self.infinite_vertex();
        self.edges().filter(move |edge| {
            edge.vertices(&self.tds)
                .is_some_and(|(a, b)| a != inf && b != inf)
        })
    }

    /// Cells containing `v`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownVertex`] for a stale key.
    pub fn incident_cells(&self, v: VertexKey) -> Result<CellKeyBuffer, TdsError> {
        self.tds.incident_cells(v)
    }

    /// Vertices adjacent to `v`, the infinite vertex included.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownVertex`] for a stale key.
    pub fn incident_vertices(&self, v: VertexKey) -> Result<VertexKeyBuffer, TdsError> {
        self.tds.incident_vertices(v)
    }

    /// Cells around a 3D edge, in turning order.
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3 or for a stale edge.
    pub fn cells_around_edge(&self, edge: Edge) -> Result<CellKeyBuffer, TdsError> {
        self.tds.cells_around_edge(edge.cell, edge.i, edge.j)
    }

    /// Facets containing a 3D edge, in turning order. The `k`-th facet
    /// separates the `k`-th cell of
    /// [`cells_around_edge`](Self::cells_around_edge) from the next one.
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3 or for a stale edge.
    pub fn facets_around_edge(&self, edge: Edge) -> Result<Vec<Facet>, TdsError> {
        let (a, b) = edge.vertices(&self.tds).ok_or(TdsError::UnknownCell(edge.cell))?;
        self.cells_around_edge(edge)?
            .into_iter()
            .map(|c| {
                let i = self.tds.index_of(c, a)?;
                let j = self.tds.index_of(c, b)?;
                Ok(Facet::new(c, next_around_edge(i, j)))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::kernel::FastKernel;
    use crate::geometry::point::Point;
    use crate::geometry::traits::coordinate::Coordinate;

    type Tr = Triangulation3<FastKernel<f64>>;

    fn pt(x: f64, y: f64, z: f64) -> Point<f64, 3> {
        Point::new([x, y, z])
    }

    fn tetrahedron() -> Tr {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        tr
    }

    #[test]
    fn test_counts_on_a_tetrahedron() {
        let tr = tetrahedron();
        assert_eq!(tr.vertices().count(), 5);
        assert_eq!(tr.finite_vertices().count(), 4);
        assert_eq!(tr.cells().count(), 5);
        assert_eq!(tr.finite_cells().count(), 1);
        // The boundary of a 4-simplex: 10 triangles, 10 edges.
        assert_eq!(tr.facets().count(), 10);
        assert_eq!(tr.finite_facets().count(), 4);
        assert_eq!(tr.edges().count(), 10);
        assert_eq!(tr.finite_edges().count(), 6);
    }

    #[test]
    fn test_counts_in_the_plane() {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(1.0, 1.0, 0.0)])
            .unwrap();
        assert_eq!(tr.dimension(), 2);
        assert_eq!(tr.finite_facets().count(), 2);
        assert_eq!(tr.facets().count(), tr.number_of_cells());
        // Four hull edges and one diagonal.
        assert_eq!(tr.finite_edges().count(), 5);
        assert_eq!(tr.edges().count(), 9);
    }

    #[test]
    fn test_counts_on_a_line() {
        let mut tr = Tr::default();
        tr.insert_points([0.0, 1.0, 2.0].map(|x| pt(x, 0.0, 0.0))).unwrap();
        assert_eq!(tr.edges().count(), 4);
        assert_eq!(tr.finite_edges().count(), 2);
        assert_eq!(tr.facets().count(), 0);
    }

    #[test]
    fn test_finite_cells_empty_below_dimension_one() {
        let mut tr = Tr::default();
        assert_eq!(tr.finite_cells().count(), 0);
        tr.insert(pt(1.0, 2.0, 3.0), None).unwrap();
        assert_eq!(tr.finite_cells().count(), 0);
        assert_eq!(tr.cells().count(), 2);
    }

    #[test]
    fn test_around_edge() {
        let tr = tetrahedron();
        let edge = tr.finite_edges().next().unwrap();
        let ring = tr.cells_around_edge(edge).unwrap();
        // One finite cell and the two infinite cells on the hull triangles.
        assert_eq!(ring.len(), 3);
        let facets = tr.facets_around_edge(edge).unwrap();
        assert_eq!(facets.len(), 3);
        let (a, b) = edge.vertices(tr.tds()).unwrap();
        for (k, facet) in facets.iter().enumerate() {
            assert_eq!(facet.cell, ring[k]);
            let triple = facet.vertex_triple(tr.tds()).unwrap();
            assert!(triple.contains(&a) && triple.contains(&b));
        }
    }

    #[test]
    fn test_incident_queries() {
        let tr = tetrahedron();
        let v = tr.finite_vertices().next().unwrap();
        assert_eq!(tr.incident_cells(v).unwrap().len(), 4);
        assert_eq!(tr.incident_vertices(v).unwrap().len(), 4);
    }
}
