//! Vertex removal.
//!
//! Removing a vertex deletes its star and fills the hole it leaves:
//!
//! - when every other point lies in a lower-dimensional affine hull, the
//!   dimension drops by one and the cells on the infinite side are kept;
//! - in dimension 1 the two edges at the vertex are merged;
//! - in dimension 2 the polygonal hole is filled by peeling ears, preferring
//!   the candidate apex inside the circumcircle of the current best;
//! - in dimension 3 the cells of a Delaunay triangulation of the link
//!   vertices are grafted onto the link, growing from its facets.
//!
//! Every fill is planned as a list of vertex tuples and applied with a
//! single [`rewrite_region`](crate::core::triangulation_data_structure::Tds::rewrite_region),
//! so a hole that cannot be filled leaves the triangulation unchanged.

use std::collections::{BTreeSet, VecDeque};

use crate::core::algorithms::conflict::{HiddenPointVisitor, NoHiddenPoints};
use crate::core::collections::{
    CellKeyBuffer, FastHashMap, FastHashSet, MAX_CELL_SLOTS, SmallBuffer,
};
use crate::core::delaunay_triangulation::DelaunayTriangulation3;
use crate::core::facet::Facet;
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, TdsError, VertexKey, cell_tuple};
use crate::core::util::{ccw, cw, make_canonical, reversed_triple, vertex_triple_index};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::{BoundedSide, Orientation};

/// Error during removal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalError {
    /// The infinite vertex is never removed.
    #[error("The infinite vertex cannot be removed")]
    InfiniteVertex,

    /// The key does not refer to a live vertex.
    #[error("Vertex {0:?} is not in this triangulation")]
    UnknownVertex(VertexKey),

    /// No filling of the hole was found; the triangulation is unchanged.
    #[error("The hole left by the vertex cannot be retriangulated: {reason}")]
    HoleNotRetriangulable {
        /// What went wrong.
        reason: String,
    },

    /// A topology primitive refused the operation.
    #[error(transparent)]
    Tds(#[from] TdsError),
}

fn not_retriangulable(reason: impl Into<String>) -> RemovalError {
    RemovalError::HoleNotRetriangulable {
        reason: reason.into(),
    }
}

/// A hole boundary edge, oriented with the hole on its left.
type HoleEdge = (VertexKey, VertexKey);

impl<K: Kernel> Triangulation3<K> {
    /// Removes the finite vertex `v` and returns its point.
    ///
    /// The hole is filled from the Delaunay triangulation of the link of
    /// `v`, which closes up only when the star of `v` is itself Delaunay.
    /// The public entry point is therefore
    /// [`DelaunayTriangulation3::remove`].
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex and stale keys. Returns
    /// [`RemovalError::HoleNotRetriangulable`], without modifying the
    /// triangulation, when the hole cannot be filled.
    pub(crate) fn remove(&mut self, v: VertexKey) -> Result<K::Point, RemovalError> {
        self.remove_with_visitor(v, &mut NoHiddenPoints)
    }

    /// [`remove`](Self::remove), reporting the deleted cells and the cells
    /// filling the hole to `visitor`.
    pub(crate) fn remove_with_visitor<V>(
        &mut self,
        v: VertexKey,
        visitor: &mut V,
    ) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        if v == self.infinite_vertex() {
            return Err(RemovalError::InfiniteVertex);
        }
        if !self.tds.contains_vertex(v) {
            return Err(RemovalError::UnknownVertex(v));
        }
        let point = if self.test_dim_down(v)? {
            self.remove_dim_down(v, visitor)?
        } else {
            match self.dimension() {
                1 => self.remove_1d(v, visitor)?,
                2 => self.remove_2d(v, visitor)?,
                3 => self.remove_3d(v, visitor)?,
                actual => {
                    return Err(TdsError::WrongDimension {
                        required: "1..=3",
                        actual,
                    }
                    .into());
                }
            }
        };
        tracing::debug!(
            vertex = ?v,
            dimension = self.dimension(),
            vertices = self.number_of_vertices(),
            "removed vertex"
        );
        self.after_mutation("remove");
        Ok(point)
    }

    /// True when removing `v` lowers the dimension: `v` belongs to every
    /// finite cell and the other vertices span one dimension less.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex and stale keys.
    pub(crate) fn test_dim_down(&self, v: VertexKey) -> Result<bool, RemovalError> {
        if v == self.infinite_vertex() {
            return Err(RemovalError::InfiniteVertex);
        }
        if !self.tds.contains_vertex(v) {
            return Err(RemovalError::UnknownVertex(v));
        }
        let dimension = self.dimension();
        // A lone simplex always collapses.
        let simplex = usize::try_from(dimension + 1).unwrap_or(0);
        if dimension < 2 || self.number_of_vertices() == simplex {
            return Ok(self.number_of_vertices() == simplex);
        }

        let arity = self.tds.arity();
        let mut finite = self.finite_cells();
        let Some(first) = finite.next() else {
            return Ok(false);
        };
        let cell = self.tds.checked_cell(first)?;
        if !cell.has_vertex(v) {
            return Ok(false);
        }
        let reference: SmallBuffer<VertexKey, 3> = cell.vertices()[..arity]
            .iter()
            .copied()
            .filter(|&w| w != v)
            .collect();
        let base: Vec<&K::Point> = reference.iter().filter_map(|&w| self.tds.point(w)).collect();
        let [p1, p2, rest @ ..] = &base[..] else {
            return Err(TdsError::InfiniteVertex.into());
        };

        for c in finite {
            let cell = self.tds.checked_cell(c)?;
            if !cell.has_vertex(v) {
                return Ok(false);
            }
            for &w in &cell.vertices()[..arity] {
                if w == v || reference.contains(&w) {
                    continue;
                }
                let p = self.tds.point(w).ok_or(TdsError::InfiniteVertex)?;
                let spans_less = match rest {
                    [p3] => self.kernel.coplanar(p1, p2, p3, p),
                    _ => self.kernel.collinear(p1, p2, p),
                };
                if !spans_less {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn remove_dim_down<V>(&mut self, v: VertexKey, visitor: &mut V) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        let cells: CellKeyBuffer = self.tds.cell_keys().collect();
        visitor.process_cells_in_conflict(self, &cells);
        let point = self.tds.remove_decrease_dimension(v)?;
        if self.dimension() == 2 {
            let negative = self.finite_cells().next().is_some_and(|c| {
                self.cell_points(c).is_some_and(|pts| match pts {
                    [Some(p0), Some(p1), Some(p2), _] => {
                        self.kernel.coplanar_orientation(p0, p1, p2) == Orientation::NEGATIVE
                    }
                    _ => false,
                })
            });
            if negative {
                self.tds.reorient();
            }
        }
        let cells: CellKeyBuffer = self.tds.cell_keys().collect();
        visitor.reinsert_in_cells(self, &cells);
        Ok(point)
    }

    fn remove_1d<V>(&mut self, v: VertexKey, visitor: &mut V) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        let star = self.tds.incident_cells(v)?;
        let link = self.tds.incident_vertices(v)?;
        visitor.process_cells_in_conflict(self, &star);
        let point = self.tds.remove_from_maximal_dimension_simplex(v)?;
        if let [a, b] = link[..]
            && let Some(edge) = self.tds.is_edge(a, b)
        {
            visitor.reinsert_in_cells(self, &[edge.cell]);
        }
        Ok(point)
    }

    // -------------------------------------------------------------------------
    // Dimension 2
    // -------------------------------------------------------------------------

    fn remove_2d<V>(&mut self, v: VertexKey, visitor: &mut V) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        let (star, hole) = self.make_hole_2d(v)?;
        let faces = self.fill_hole_2d(hole)?;
        for face in &faces {
            if let [Some(p0), Some(p1), Some(p2)] = [0, 1, 2].map(|k| self.tds.point(face[k]))
                && self.kernel.coplanar_orientation(p0, p1, p2) != Orientation::POSITIVE
            {
                return Err(not_retriangulable("a filling face is not positively oriented"));
            }
        }
        visitor.process_cells_in_conflict(self, &star);
        self.apply_fill(v, &star, &faces, visitor)
    }

    /// The faces around `v` and the ring of edges opposite `v`, in
    /// counterclockwise order.
    fn make_hole_2d(&self, v: VertexKey) -> Result<(CellKeyBuffer, VecDeque<HoleEdge>), RemovalError> {
        let start = self.tds.checked_vertex(v)?.cell();
        let mut star = CellKeyBuffer::new();
        let mut hole = VecDeque::new();
        let mut f = start;
        loop {
            let cell = self.tds.checked_cell(f)?;
            let i = cell.index_of(v).ok_or(TdsError::UnknownVertex(v))?;
            star.push(f);
            hole.push_back((cell.vertex(ccw(i)), cell.vertex(cw(i))));
            f = cell.neighbor(ccw(i));
            if f == start {
                break;
            }
            if star.len() > self.number_of_cells() {
                return Err(TdsError::BrokenCycle(start).into());
            }
        }
        Ok((star, hole))
    }

    /// Greedy ear filling of a counterclockwise hole.
    ///
    /// The first finite edge `(v0, v1)` is closed with the visible apex that
    /// lies inside the circumcircle of every other visible candidate, or
    /// with the infinite vertex when none is visible. The rest of the hole
    /// either stays one polygon or splits in two at the apex.
    fn fill_hole_2d(&self, first: VecDeque<HoleEdge>) -> Result<Vec<[VertexKey; MAX_CELL_SLOTS]>, RemovalError> {
        let inf = self.infinite_vertex();
        let mut faces = Vec::new();
        let mut holes = vec![first];

        while let Some(mut hole) = holes.pop() {
            if hole.len() < 3 {
                return Err(not_retriangulable("a hole has fewer than three edges"));
            }
            if hole.len() == 3 {
                let (a, b) = hole[0];
                let (_, c) = hole[1];
                faces.push(cell_tuple(&[a, b, c]));
                continue;
            }

            let mut turns = 0;
            while hole.front().is_some_and(|&(s, t)| s == inf || t == inf) {
                hole.rotate_left(1);
                turns += 1;
                if turns > hole.len() {
                    return Err(not_retriangulable("the hole has no finite edge"));
                }
            }
            let Some((v0, v1)) = hole.pop_front() else {
                return Err(not_retriangulable("empty hole"));
            };
            let p0 = self.tds.point(v0).ok_or(TdsError::InfiniteVertex)?;
            let p1 = self.tds.point(v1).ok_or(TdsError::InfiniteVertex)?;

            let mut v2 = inf;
            let mut p2: Option<&K::Point> = None;
            let mut cut_after = 0;
            // The last edge ends at v0.
            for (k, &(_, vv)) in hole.iter().enumerate().take(hole.len() - 1) {
                let Some(p) = self.tds.point(vv) else {
                    if v2 == inf {
                        cut_after = k;
                    }
                    continue;
                };
                if self.kernel.coplanar_orientation(p0, p1, p) != Orientation::POSITIVE {
                    continue;
                }
                let better = p2.is_none_or(|q| {
                    self.kernel.coplanar_side_of_bounded_circle(p0, p1, q, p) == BoundedSide::INSIDE
                });
                if better {
                    v2 = vv;
                    p2 = Some(p);
                    cut_after = k;
                }
            }
            if v2 == inf && !hole.iter().any(|&(s, _)| s == inf) {
                return Err(not_retriangulable("no visible apex for a hole edge"));
            }
            faces.push(cell_tuple(&[v0, v1, v2]));

            if hole.front().is_some_and(|&(s, t)| s == v1 && t == v2) {
                hole.pop_front();
                hole.push_front((v0, v2));
            } else if hole.back().is_some_and(|&(s, t)| s == v2 && t == v0) {
                hole.pop_back();
                hole.push_back((v2, v1));
            } else {
                let mut split: VecDeque<HoleEdge> = hole.drain(..=cut_after).collect();
                split.push_front((v2, v1));
                hole.push_front((v0, v2));
                holes.push(split);
            }
            holes.push(hole);
        }
        Ok(faces)
    }

    // -------------------------------------------------------------------------
    // Dimension 3
    // -------------------------------------------------------------------------

    fn remove_3d<V>(&mut self, v: VertexKey, visitor: &mut V) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        if self.number_of_vertices() <= 4 {
            return Err(not_retriangulable("too few vertices remain to span three dimensions"));
        }
        let star = self.tds.incident_cells(v)?;
        let cells = self.plan_fill_3d(v, &star)?;
        let inf = self.infinite_vertex();
        let kept = self.finite_cells().any(|c| !star.contains(&c));
        if !kept && !cells.iter().any(|tuple| !tuple.contains(&inf)) {
            return Err(not_retriangulable("no finite cell would remain"));
        }
        visitor.process_cells_in_conflict(self, &star);
        self.apply_fill(v, &star, &cells, visitor)
    }

    /// Cells filling the hole of `v`, taken from a Delaunay triangulation of
    /// the link vertices.
    fn plan_fill_3d(&self, v: VertexKey, star: &[CellKey]) -> Result<Vec<[VertexKey; MAX_CELL_SLOTS]>, RemovalError> {
        let inf = self.infinite_vertex();

        // Link facets, seen from outside the hole.
        let mut open: BTreeSet<[VertexKey; 3]> = BTreeSet::new();
        for &c in star {
            let i = self.tds.index_of(c, v)?;
            let outer = Facet::new(c, i)
                .mirror(&self.tds)
                .and_then(|f| f.canonical_triple(&self.tds))
                .ok_or(TdsError::UnknownCell(c))?;
            open.insert(outer);
        }

        // Auxiliary triangulation of the link, with its vertices mapped back.
        let mut aux = DelaunayTriangulation3::new(self.kernel.clone());
        let mut to_main: FastHashMap<VertexKey, VertexKey> = FastHashMap::default();
        let mut on_hull = false;
        let mut hint = None;
        for w in self.tds.incident_vertices(v)? {
            let Some(p) = self.tds.point(w) else {
                on_hull = true;
                continue;
            };
            let a = aux
                .insert(p.clone(), hint)
                .map_err(|err| not_retriangulable(format!("link triangulation failed: {err}")))?;
            hint = aux.tds().vertex(a).map(|vertex| vertex.cell());
            to_main.insert(a, w);
        }
        if aux.dimension() == 2 {
            let p = self.tds.point(v).ok_or(TdsError::InfiniteVertex)?;
            let fake = aux
                .insert(p.clone(), None)
                .map_err(|err| not_retriangulable(format!("link triangulation failed: {err}")))?;
            to_main.insert(fake, inf);
        } else if on_hull {
            to_main.insert(aux.tds().infinite_vertex(), inf);
        }
        if aux.dimension() != 3 {
            return Err(not_retriangulable("the link does not span three dimensions"));
        }

        // Cells of the auxiliary triangulation, keyed by each facet as seen
        // from the other side.
        let mut inner: FastHashMap<[VertexKey; 3], (CellKey, [VertexKey; MAX_CELL_SLOTS])> = FastHashMap::default();
        for (key, cell) in aux.tds().cells() {
            let mapped = cell.vertices().map(|a| to_main.get(&a).copied());
            let [Some(m0), Some(m1), Some(m2), Some(m3)] = mapped else {
                continue;
            };
            let tuple = [m0, m1, m2, m3];
            for i in 0..4 {
                let triple = [0, 1, 2].map(|k| tuple[vertex_triple_index(i, k)]);
                inner.insert(make_canonical(reversed_triple(triple)), (key, tuple));
            }
        }

        // Graft cells until every open facet is matched.
        let mut selected = Vec::new();
        let mut used: FastHashSet<CellKey> = FastHashSet::default();
        while let Some(key) = open
            .iter()
            .find(|t| !t.contains(&inf))
            .or_else(|| open.iter().next())
            .copied()
        {
            open.remove(&key);
            let &(aux_cell, tuple) = inner
                .get(&key)
                .ok_or_else(|| not_retriangulable("a link facet is missing from the link triangulation"))?;
            if !used.insert(aux_cell) {
                return Err(not_retriangulable("the graft does not close up"));
            }
            selected.push(tuple);
            for i in 0..4 {
                let own = make_canonical([0, 1, 2].map(|k| tuple[vertex_triple_index(i, k)]));
                let other_side = reversed_triple(own);
                if other_side == key {
                    continue;
                }
                if !open.remove(&other_side) {
                    open.insert(own);
                }
            }
        }

        for tuple in &selected {
            if let [Some(p0), Some(p1), Some(p2), Some(p3)] = tuple.map(|w| self.tds.point(w))
                && self.kernel.orientation(p0, p1, p2, p3) != Orientation::POSITIVE
            {
                return Err(not_retriangulable("a grafted cell is not positively oriented"));
            }
        }
        Ok(selected)
    }

    /// Replaces the star of `v` by `cells` and returns the point of `v`.
    fn apply_fill<V>(
        &mut self,
        v: VertexKey,
        star: &[CellKey],
        cells: &[[VertexKey; MAX_CELL_SLOTS]],
        visitor: &mut V,
    ) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        let rewrite = self.tds.rewrite_region(star, cells).map_err(|err| {
            tracing::debug!(vertex = ?v, error = %err, "hole filling rejected");
            match err {
                TdsError::RegionMismatch { reason } => RemovalError::HoleNotRetriangulable { reason },
                other => other.into(),
            }
        })?;
        visitor.reinsert_in_cells(self, &rewrite.new_cells);
        rewrite
            .removed_vertices
            .into_iter()
            .find_map(|(w, point)| (w == v).then_some(point))
            .ok_or_else(|| not_retriangulable("the removed vertex is still referenced"))
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

    fn find(tr: &Tr, p: &Point<f64, 3>) -> VertexKey {
        tr.finite_vertices().find(|&v| tr.point(v) == Some(p)).unwrap()
    }

    #[test]
    fn test_infinite_and_stale_vertices_rejected() {
        let mut tr = Tr::default();
        let v = tr.insert(pt(0.0, 0.0, 0.0), None).unwrap();
        let inf = tr.infinite_vertex();
        assert_eq!(tr.remove(inf), Err(RemovalError::InfiniteVertex));
        tr.remove(v).unwrap();
        assert_eq!(tr.remove(v), Err(RemovalError::UnknownVertex(v)));
        assert_eq!(tr.dimension(), -1);
    }

    #[test]
    fn test_dimension_collapses_step_by_step() {
        let mut tr = Tr::default();
        let keys = tr
            .insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        for (k, &v) in keys.iter().enumerate().rev() {
            assert!(tr.test_dim_down(v).unwrap());
            tr.remove(v).unwrap();
            assert_eq!(tr.dimension(), i32::try_from(k).unwrap() - 1);
            assert!(tr.is_valid(true));
        }
        assert_eq!(tr.number_of_cells(), 1);
    }

    #[test]
    fn test_any_corner_of_a_lone_tetrahedron_collapses() {
        let points = [pt(1.0, 2.0, 3.0), pt(4.0, -1.0, 0.5), pt(-2.0, 3.0, 1.0), pt(0.3, 0.2, -4.0)];
        for first in 0..4 {
            let mut tr = Tr::default();
            let keys = tr.insert_points(points).unwrap();
            assert!(keys.iter().all(|&v| tr.test_dim_down(v).unwrap()));
            tr.remove(keys[first]).unwrap();
            assert_eq!(tr.dimension(), 2);
            assert_eq!(tr.number_of_vertices(), 3);
            assert!(tr.is_valid(true));
        }
    }

    #[test]
    fn test_dim_down_needs_every_finite_cell() {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        let interior = tr.insert(pt(0.2, 0.2, 0.2), None).unwrap();
        assert!(!tr.test_dim_down(interior).unwrap());
        assert!(!tr.test_dim_down(find(&tr, &pt(0.0, 0.0, 0.0))).unwrap());

        // A pyramid: the apex is in every finite cell and the base is planar.
        let mut pyramid = Tr::default();
        pyramid
            .insert_points([
                pt(0.0, 0.0, 0.0),
                pt(2.0, 0.0, 0.0),
                pt(2.0, 2.0, 0.0),
                pt(0.0, 2.0, 0.0),
                pt(1.0, 1.0, 3.0),
            ])
            .unwrap();
        let apex = find(&pyramid, &pt(1.0, 1.0, 3.0));
        assert!(pyramid.test_dim_down(apex).unwrap());
        pyramid.remove(apex).unwrap();
        assert_eq!(pyramid.dimension(), 2);
        assert_eq!(pyramid.number_of_vertices(), 4);
        assert!(pyramid.is_valid(true));
    }

    #[test]
    fn test_space_fill_refuses_a_lone_tetrahedron() {
        let mut tr = Tr::default();
        let keys = tr
            .insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        let before = tr.clone();
        assert!(matches!(
            tr.remove_3d(keys[1], &mut NoHiddenPoints),
            Err(RemovalError::HoleNotRetriangulable { .. })
        ));
        assert!(tr == before);
    }

    #[test]
    fn test_line_splice() {
        let mut tr = Tr::default();
        tr.insert_points([0.0, 1.0, 2.0, 3.0].map(|x| pt(x, 0.0, 0.0))).unwrap();
        let v = find(&tr, &pt(1.0, 0.0, 0.0));
        assert!(!tr.test_dim_down(v).unwrap());
        tr.remove(v).unwrap();
        assert_eq!(tr.number_of_vertices(), 3);
        assert_eq!(tr.number_of_finite_cells(), 2);
        assert!(tr.is_valid(true));
        let end = find(&tr, &pt(3.0, 0.0, 0.0));
        tr.remove(end).unwrap();
        assert_eq!(tr.number_of_finite_cells(), 1);
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_planar_interior_and_hull_removal() {
        let mut tr = Tr::default();
        tr.insert_points([
            pt(0.0, 0.0, 0.0),
            pt(4.0, 0.0, 0.0),
            pt(4.0, 3.0, 0.0),
            pt(0.0, 3.0, 0.0),
            pt(1.9, 1.4, 0.0),
            pt(2.6, 1.7, 0.0),
            pt(2.0, -1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(tr.dimension(), 2);
        let interior = find(&tr, &pt(1.9, 1.4, 0.0));
        tr.remove(interior).unwrap();
        assert!(tr.is_valid(true));
        let hull = find(&tr, &pt(2.0, -1.0, 0.0));
        tr.remove(hull).unwrap();
        assert!(tr.is_valid(true));
        assert_eq!(tr.number_of_vertices(), 5);
        // Rectangle plus one interior point: four triangles.
        assert_eq!(tr.number_of_finite_cells(), 4);
    }

    #[test]
    fn test_remove_last_inserted_interior_vertex() {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        let before = tr.clone();
        let v = tr.insert(pt(0.2, 0.2, 0.2), None).unwrap();
        assert_eq!(tr.remove(v).unwrap(), pt(0.2, 0.2, 0.2));
        assert!(tr.is_valid(true));
        assert_eq!(tr.number_of_cells(), 5);
        assert!(tr == before);
    }

    #[test]
    fn test_remove_hull_vertex_in_space() {
        let mut tr = Tr::default();
        tr.insert_points([
            pt(0.0, 0.0, 0.0),
            pt(1.0, 0.0, 0.0),
            pt(0.0, 1.0, 0.0),
            pt(0.0, 0.0, 1.0),
            pt(1.0, 1.0, 1.0),
        ])
        .unwrap();
        let apex = find(&tr, &pt(1.0, 1.0, 1.0));
        tr.remove(apex).unwrap();
        assert!(tr.is_valid(true));
        assert_eq!(tr.number_of_finite_cells(), 1);
        assert_eq!(tr.number_of_cells(), 5);
    }

    #[derive(Default)]
    struct Counter {
        removed: usize,
        created: usize,
    }

    impl HiddenPointVisitor<FastKernel<f64>> for Counter {
        fn process_cells_in_conflict(&mut self, _tr: &Tr, cells: &[CellKey]) {
            self.removed += cells.len();
        }
        fn reinsert_in_cells(&mut self, _tr: &Tr, cells: &[CellKey]) {
            self.created += cells.len();
        }
    }

    #[test]
    fn test_visitor_sees_hole_and_fill() {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)])
            .unwrap();
        let v = tr.insert(pt(0.2, 0.2, 0.2), None).unwrap();
        let mut counter = Counter::default();
        tr.remove_with_visitor(v, &mut counter).unwrap();
        assert_eq!(counter.removed, 4);
        assert_eq!(counter.created, 1);
    }
}
