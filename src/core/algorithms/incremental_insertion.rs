//! Incremental point insertion.
//!
//! A point is located first, then inserted according to where it fell:
//!
//! | Location | Action |
//! |---|---|
//! | on a vertex | nothing, the existing vertex is returned |
//! | in a cell, facet or edge | the simplex (and the cells around it) is split |
//! | outside the convex hull | the cells whose finite facet sees the point are replaced by its star |
//! | outside the affine hull | the dimension goes up by one |
//!
//! [`Triangulation3::insert_in_conflict`] is the generic form used by
//! higher layers: the cells to replace are given by a [`ConflictTester`] and
//! points left without a vertex are reported to a [`HiddenPointVisitor`].

use std::cmp::Ordering;

use crate::core::algorithms::conflict::{
    ConflictError, ConflictTester, HiddenPointVisitor, HullConflictTester, NoHiddenPoints,
};
use crate::core::algorithms::locate::{LocateError, LocateType, Location};
use crate::core::collections::CellKeyBuffer;
use crate::core::facet::Facet;
use crate::core::triangulation::{Triangulation3, TriangulationConfig};
use crate::core::triangulation_data_structure::{CellKey, RegionRewrite, TdsError, VertexKey};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::{BoundedSide, CollinearPosition, Orientation};

/// Error during insertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertionError {
    /// A checked split was asked for a simplex that does not strictly
    /// contain the point.
    #[error("Point is not strictly inside the given {0}")]
    PointNotInside(&'static str),

    /// The conflict test left the point without a vertex.
    #[error("The point was hidden instead of inserted")]
    PointHidden,

    /// Point location failed.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// A topology primitive refused the operation.
    #[error(transparent)]
    Tds(#[from] TdsError),

    /// The conflict region could not be built.
    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

impl<K: Kernel> Triangulation3<K> {
    /// Builds a triangulation of `points`.
    ///
    /// # Errors
    ///
    /// Returns the first insertion error.
    pub fn from_points<I>(kernel: K, points: I) -> Result<Self, InsertionError>
    where
        I: IntoIterator<Item = K::Point>,
    {
        let mut tr = Self::with_config(kernel, TriangulationConfig::default());
        tr.insert_points(points)?;
        Ok(tr)
    }

    /// Inserts `point`, starting the walk at `hint`, and returns its vertex.
    /// A point equal to an existing vertex returns that vertex.
    ///
    /// # Errors
    ///
    /// Returns [`InsertionError::Locate`] for a stale hint; the other
    /// variants signal an inconsistent kernel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use triangulation3::prelude::*;
    ///
    /// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
    /// let a = tr.insert(Point::new([0.0, 0.0, 0.0]), None).unwrap();
    /// assert_eq!(tr.dimension(), 0);
    /// assert_eq!(tr.insert(Point::new([0.0, 0.0, 0.0]), None).unwrap(), a);
    /// assert_eq!(tr.number_of_vertices(), 1);
    /// ```
    pub fn insert(&mut self, point: K::Point, hint: Option<CellKey>) -> Result<VertexKey, InsertionError> {
        let location = self.locate(&point, hint)?;
        let v = self.insert_located(point, location)?;
        self.after_mutation("insert");
        Ok(v)
    }

    /// Inserts every point, using the last new vertex as the next hint.
    /// Returns the vertex of each point, in input order.
    ///
    /// # Errors
    ///
    /// Stops at the first insertion error.
    pub fn insert_points<I>(&mut self, points: I) -> Result<Vec<VertexKey>, InsertionError>
    where
        I: IntoIterator<Item = K::Point>,
    {
        let points = points.into_iter();
        let mut keys = Vec::with_capacity(points.size_hint().0);
        let mut hint = None;
        for point in points {
            let v = self.insert(point, hint)?;
            hint = self.tds.vertex(v).map(|vertex| vertex.cell());
            keys.push(v);
        }
        tracing::debug!(
            inserted = keys.len(),
            vertices = self.number_of_vertices(),
            "bulk insertion finished"
        );
        Ok(keys)
    }

    /// Inserts `point` at a location computed by [`locate`](Self::locate).
    ///
    /// # Errors
    ///
    /// Returns an error when `location` does not come from the current
    /// state of the triangulation.
    pub fn insert_located(&mut self, point: K::Point, location: Location) -> Result<VertexKey, InsertionError> {
        let Location { cell: c, kind, li, lj } = location;
        match kind {
            LocateType::Vertex => Ok(self.tds.checked_cell(c)?.vertex(li)),
            LocateType::Cell => Ok(self.tds.insert_in_cell(c, point)?),
            LocateType::Facet => Ok(self.tds.insert_in_facet(c, li, point)?),
            LocateType::Edge => Ok(self.tds.insert_in_edge(c, li, lj, point)?),
            LocateType::OutsideConvexHull => self.insert_outside_convex_hull(point, c),
            LocateType::OutsideAffineHull => self.insert_outside_affine_hull(point),
        }
    }

    /// Inserts a point seen by the infinite cell `c`.
    fn insert_outside_convex_hull(&mut self, point: K::Point, c: CellKey) -> Result<VertexKey, InsertionError> {
        match self.dimension() {
            1 => Ok(self.tds.insert_in_edge(c, 0, 1, point)?),
            2 | 3 => {
                let region = self.find_conflicts(c, &HullConflictTester::<K>::new(&point))?;
                let boundary = first_boundary(&region.boundary_facets)?;
                let (v, _) = self.tds.insert_in_hole(point, &region.cells, boundary)?;
                Ok(v)
            }
            actual => Err(TdsError::WrongDimension {
                required: "1..=3",
                actual,
            }
            .into()),
        }
    }

    /// Raises the dimension with a point outside the affine hull, keeping
    /// the new finite cells positive.
    fn insert_outside_affine_hull(&mut self, point: K::Point) -> Result<VertexKey, InsertionError> {
        let reorient = match self.dimension() {
            1 => {
                let [p0, p1, ..] = self.finite_neighbor_points()?;
                self.kernel.coplanar_orientation(p0, p1, &point) == Orientation::NEGATIVE
            }
            2 => {
                let [p0, p1, p2, _] = self.finite_neighbor_points()?;
                self.kernel.orientation(p0, p1, p2, &point) == Orientation::NEGATIVE
            }
            _ => false,
        };
        let v = self.tds.insert_increase_dimension(point)?;
        if reorient {
            self.tds.reorient();
        }
        tracing::debug!(dimension = self.dimension(), reorient, "point outside the affine hull");
        Ok(v)
    }

    /// Points of the finite cell across the infinite vertex from its cell.
    /// Unused slots repeat slot 0.
    fn finite_neighbor_points(&self) -> Result<[&K::Point; 4], TdsError> {
        let star = self.infinite_cell();
        let i = self.tds.index_of(star, self.infinite_vertex())?;
        let n = self.tds.checked_cell(star)?.neighbor(i);
        let cell = self.tds.checked_cell(n)?;
        let arity = self.tds.arity();
        let first = self.tds.point(cell.vertex(0)).ok_or(TdsError::InfiniteVertex)?;
        let mut out = [first; 4];
        for (slot, point) in out.iter_mut().enumerate().take(arity) {
            *point = self.tds.point(cell.vertex(slot)).ok_or(TdsError::InfiniteVertex)?;
        }
        Ok(out)
    }

    // -------------------------------------------------------------------------
    // Checked splits
    // -------------------------------------------------------------------------

    /// Splits the finite cell `c` of a 3D triangulation at `point`, which
    /// must lie strictly inside it.
    ///
    /// # Errors
    ///
    /// Returns [`InsertionError::PointNotInside`] when the point is not
    /// strictly inside `c`, and key or dimension errors.
    pub fn insert_in_cell(&mut self, point: K::Point, c: CellKey) -> Result<VertexKey, InsertionError> {
        if self.is_infinite_cell(c) {
            return Err(InsertionError::PointNotInside("cell"));
        }
        let side = self.side_of_cell(&point, c)?;
        if side.side != BoundedSide::INSIDE {
            return Err(InsertionError::PointNotInside("cell"));
        }
        let v = self.tds.insert_in_cell(c, point)?;
        self.after_mutation("insert_in_cell");
        Ok(v)
    }

    /// Splits the facet `(c, i)` at `point`, which must lie strictly inside
    /// it. In dimension 2, `i` must be 3 and the face finite.
    ///
    /// # Errors
    ///
    /// Returns [`InsertionError::PointNotInside`] when the point is not
    /// strictly inside the facet, and key or dimension errors.
    pub fn insert_in_facet(&mut self, point: K::Point, c: CellKey, i: usize) -> Result<VertexKey, InsertionError> {
        let inside = match self.dimension() {
            3 => {
                self.tds.check_slot(i)?;
                let facet = Facet::new(c, i);
                let facet = if self.is_infinite_cell(c) {
                    facet.mirror(&self.tds).ok_or(TdsError::UnknownCell(c))?
                } else {
                    facet
                };
                !self.is_infinite_cell(facet.cell) && {
                    let side = self.side_of_cell(&point, facet.cell)?;
                    side.side == BoundedSide::BOUNDARY
                        && side.kind == Some(LocateType::Facet)
                        && side.li == facet.index
                }
            }
            2 => {
                !self.is_infinite_cell(c)
                    && self.side_of_facet(&point, c, i)?.side == BoundedSide::INSIDE
            }
            actual => {
                return Err(TdsError::WrongDimension {
                    required: "2..=3",
                    actual,
                }
                .into());
            }
        };
        if !inside {
            return Err(InsertionError::PointNotInside("facet"));
        }
        let v = self.tds.insert_in_facet(c, i, point)?;
        self.after_mutation("insert_in_facet");
        Ok(v)
    }

    /// Splits the edge `(c, i, j)` at `point`, which must lie strictly
    /// between its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`InsertionError::PointNotInside`] when the point is not
    /// strictly inside a finite edge, and key or dimension errors.
    pub fn insert_in_edge(
        &mut self,
        point: K::Point,
        c: CellKey,
        i: usize,
        j: usize,
    ) -> Result<VertexKey, InsertionError> {
        self.tds.check_slot(i)?;
        self.tds.check_slot(j)?;
        let cell = self.tds.checked_cell(c)?;
        let (Some(a), Some(b)) = (self.tds.point(cell.vertex(i)), self.tds.point(cell.vertex(j))) else {
            return Err(InsertionError::PointNotInside("edge"));
        };
        if i == j
            || !self.kernel.collinear(a, b, &point)
            || self.kernel.collinear_position(a, &point, b) != CollinearPosition::MIDDLE
        {
            return Err(InsertionError::PointNotInside("edge"));
        }
        let v = self.tds.insert_in_edge(c, i, j, point)?;
        self.after_mutation("insert_in_edge");
        Ok(v)
    }

    // -------------------------------------------------------------------------
    // Generic insertion
    // -------------------------------------------------------------------------

    /// Inserts `point` replacing the cells `tester` puts in conflict.
    ///
    /// `location` must come from [`locate`](Self::locate) for `point`.
    /// Returns `Ok(None)` when the point ends up hidden (its initial cell is
    /// not in conflict, or it loses the weight comparison against the vertex
    /// it falls on); the visitor has then received it through
    /// [`hide_point`](HiddenPointVisitor::hide_point). Vertices left without
    /// cells by the insertion are removed and reported the same way.
    ///
    /// In dimension 1 the region is scanned along the chain in both
    /// directions; in dimension 0 a heavier point replaces the vertex it
    /// falls on.
    ///
    /// # Errors
    ///
    /// Returns an error when `location` is stale or the conflict region is
    /// not a ball.
    pub fn insert_in_conflict<T, V>(
        &mut self,
        point: K::Point,
        location: Location,
        tester: &T,
        visitor: &mut V,
    ) -> Result<Option<VertexKey>, InsertionError>
    where
        T: ConflictTester<K> + ?Sized,
        V: HiddenPointVisitor<K> + ?Sized,
    {
        let Location { cell: c, kind, li, .. } = location;
        if kind == LocateType::OutsideAffineHull {
            let v = self.insert_outside_affine_hull(point)?;
            self.after_mutation("insert_in_conflict");
            return Ok(Some(v));
        }

        if kind == LocateType::Vertex {
            let existing = self.tds.checked_cell(c)?.vertex(li);
            let order = {
                let q = self.tds.point(existing).ok_or(TdsError::InfiniteVertex)?;
                tester.compare_weight(&point, q)
            };
            match (order, self.dimension()) {
                (Ordering::Equal, _) => return Ok(Some(existing)),
                (Ordering::Less, 0) => {
                    visitor.hide_point(c, point);
                    return Ok(None);
                }
                (Ordering::Greater, 0) => {
                    visitor.replace_vertex(c, li, &point);
                    if let Some(old) = self.tds.replace_point(existing, point)? {
                        visitor.hide_point(c, old);
                    }
                    self.after_mutation("insert_in_conflict");
                    return Ok(Some(existing));
                }
                _ => {}
            }
        }

        if !tester.test_initial_cell(self, c) {
            visitor.hide_point(c, point);
            return Ok(None);
        }

        let (cells, boundary) = match self.dimension() {
            2 | 3 => {
                let region = self.find_conflicts(c, tester)?;
                let boundary = first_boundary(&region.boundary_facets)?;
                (region.cells, boundary)
            }
            1 => self.conflict_chain(c, tester)?,
            actual => {
                return Err(TdsError::WrongDimension {
                    required: "1..=3",
                    actual,
                }
                .into());
            }
        };
        visitor.process_cells_in_conflict(self, &cells);
        let (v, rewrite) = self.tds.insert_in_hole(point, &cells, boundary)?;
        self.hide_removed(v, rewrite, visitor);
        visitor.reinsert_vertices(self, v);
        self.after_mutation("insert_in_conflict");
        Ok(Some(v))
    }

    /// The run of 1D cells in conflict around `c`, and the facet closing it
    /// on the `neighbor(0)` side.
    fn conflict_chain<T>(&self, c: CellKey, tester: &T) -> Result<(CellKeyBuffer, Facet), InsertionError>
    where
        T: ConflictTester<K> + ?Sized,
    {
        let mut chain = CellKeyBuffer::new();
        chain.push(c);
        let mut ends = [c, c];
        for (side, end) in ends.iter_mut().enumerate() {
            loop {
                let n = self.tds.checked_cell(*end)?.neighbor(side);
                if chain.contains(&n) || !tester.in_conflict(self, n) {
                    break;
                }
                chain.push(n);
                *end = n;
            }
        }
        let forward_end = ends[0];
        if chain.contains(&self.tds.checked_cell(forward_end)?.neighbor(0)) {
            return Err(TdsError::RegionMismatch {
                reason: "every edge of the line is in conflict".to_string(),
            }
            .into());
        }
        Ok((chain, Facet::new(forward_end, 0)))
    }

    /// Reports vertices removed by an insertion as hidden in the star of `v`.
    fn hide_removed<V>(&self, v: VertexKey, rewrite: RegionRewrite<K::Point>, visitor: &mut V)
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        if rewrite.removed_vertices.is_empty() {
            return;
        }
        let cell = self.tds.vertex(v).map(|vertex| vertex.cell()).unwrap_or_default();
        for (key, point) in rewrite.removed_vertices {
            tracing::debug!(vertex = ?key, "vertex hidden by insertion");
            visitor.hide_point(cell, point);
        }
    }

    /// [`insert_in_conflict`](Self::insert_in_conflict) with no visitor.
    ///
    /// # Errors
    ///
    /// See [`insert_in_conflict`](Self::insert_in_conflict).
    pub fn insert_with_tester<T>(
        &mut self,
        point: K::Point,
        hint: Option<CellKey>,
        tester: &T,
    ) -> Result<Option<VertexKey>, InsertionError>
    where
        T: ConflictTester<K> + ?Sized,
    {
        let location = self.locate(&point, hint)?;
        self.insert_in_conflict(point, location, tester, &mut NoHiddenPoints)
    }
}

fn first_boundary(facets: &[Facet]) -> Result<Facet, TdsError> {
    facets.first().copied().ok_or(TdsError::RegionMismatch {
        reason: "the conflict region has no boundary".to_string(),
    })
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

    #[derive(Default)]
    struct Recorder {
        hidden: Vec<Point<f64, 3>>,
        processed: usize,
        reinserted: usize,
        replaced: usize,
    }

    impl HiddenPointVisitor<FastKernel<f64>> for Recorder {
        fn hide_point(&mut self, _cell: CellKey, point: Point<f64, 3>) {
            self.hidden.push(point);
        }
        fn process_cells_in_conflict(&mut self, _tr: &Tr, cells: &[CellKey]) {
            self.processed += cells.len();
        }
        fn reinsert_vertices(&mut self, _tr: &Tr, _v: VertexKey) {
            self.reinserted += 1;
        }
        fn replace_vertex(&mut self, _cell: CellKey, _index: usize, _point: &Point<f64, 3>) {
            self.replaced += 1;
        }
    }

    #[test]
    fn test_dimension_grows_and_stays_valid() {
        let mut tr = Tr::default();
        let points = [
            pt(0.0, 0.0, 0.0),
            pt(1.0, 0.0, 0.0),
            pt(0.0, 1.0, 0.0),
            pt(0.0, 0.0, 1.0),
        ];
        for (i, p) in points.into_iter().enumerate() {
            tr.insert(p, None).unwrap();
            assert_eq!(tr.dimension(), i32::try_from(i).unwrap());
            assert!(tr.is_valid(true));
        }
        assert_eq!(tr.number_of_cells(), 5);
    }

    #[test]
    fn test_reorientation_on_dimension_change() {
        // Clockwise third point and a point below the plane both need a
        // global reorientation.
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.5, -1.0, 0.0)])
            .unwrap();
        assert!(tr.is_valid(true));
        tr.insert(pt(0.3, -0.3, -1.0), None).unwrap();
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_line_extends_in_both_directions() {
        let mut tr = Tr::default();
        for x in [0.0, 1.0, -1.0, 3.0, 2.0, -4.0] {
            tr.insert(pt(x, 0.0, 0.0), None).unwrap();
            assert!(tr.is_valid(true));
        }
        assert_eq!(tr.dimension(), 1);
        assert_eq!(tr.number_of_vertices(), 6);
        assert_eq!(tr.number_of_finite_cells(), 5);
    }

    #[test]
    fn test_hull_growth_in_plane_and_space() {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0)])
            .unwrap();
        tr.insert(pt(2.0, 2.0, 0.0), None).unwrap();
        tr.insert(pt(-1.0, 0.5, 0.0), None).unwrap();
        assert_eq!(tr.dimension(), 2);
        assert!(tr.is_valid(true));
        tr.insert(pt(0.2, 0.2, 1.0), None).unwrap();
        tr.insert(pt(0.2, 0.2, -3.0), None).unwrap();
        tr.insert(pt(5.0, 5.0, 5.0), None).unwrap();
        assert_eq!(tr.dimension(), 3);
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_checked_splits_reject_outside_points() {
        let mut tr = Tr::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let c = tr.finite_cells().next().unwrap();
        assert_eq!(
            tr.insert_in_cell(pt(2.0, 2.0, 2.0), c),
            Err(InsertionError::PointNotInside("cell"))
        );
        assert_eq!(
            tr.insert_in_facet(pt(0.1, 0.1, 0.1), c, 0),
            Err(InsertionError::PointNotInside("facet"))
        );
        assert_eq!(
            tr.insert_in_edge(pt(0.1, 0.1, 0.1), c, 0, 1),
            Err(InsertionError::PointNotInside("edge"))
        );
        let v = tr.insert_in_cell(pt(0.1, 0.1, 0.1), c).unwrap();
        assert_eq!(tr.tds().degree(v).unwrap(), 4);
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_checked_facet_and_edge_splits() {
        let mut tr = Tr::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let c = tr.finite_cells().next().unwrap();
        let origin = tr
            .tds()
            .cell(c)
            .unwrap()
            .index_of(tr.vertices().find(|&v| tr.point(v) == Some(&pt(0.0, 0.0, 0.0))).unwrap())
            .unwrap();
        // The facet opposite the origin is the slanted one.
        tr.insert_in_facet(pt(0.25, 0.25, 0.5), c, origin).unwrap();
        assert_eq!(tr.number_of_finite_cells(), 3);
        assert!(tr.is_valid(true));

        let loc = tr.locate(&pt(0.5, 0.0, 0.0), None).unwrap();
        assert_eq!(loc.kind, LocateType::Edge);
        tr.insert_in_edge(pt(0.5, 0.0, 0.0), loc.cell, loc.li, loc.lj).unwrap();
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_rejecting_tester_hides_point() {
        let mut tr = Tr::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let p = pt(0.1, 0.1, 0.1);
        let loc = tr.locate(&p, None).unwrap();
        let mut recorder = Recorder::default();
        let never = |_: &Tr, _: CellKey| false;
        let result = tr.insert_in_conflict(p.clone(), loc, &never, &mut recorder).unwrap();
        assert_eq!(result, None);
        assert_eq!(recorder.hidden, vec![p]);
        assert_eq!(tr.number_of_vertices(), 4);
    }

    #[test]
    fn test_conflict_insertion_reports_cells() {
        let mut tr = Tr::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let p = pt(0.1, 0.1, 0.1);
        let loc = tr.locate(&p, None).unwrap();
        let finite = |t: &Tr, c: CellKey| !t.is_infinite_cell(c);
        let mut recorder = Recorder::default();
        let v = tr.insert_in_conflict(p, loc, &finite, &mut recorder).unwrap();
        assert!(v.is_some());
        assert_eq!(recorder.processed, 1);
        assert_eq!(recorder.reinserted, 1);
        assert_eq!(tr.number_of_finite_cells(), 4);
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_conflict_insertion_removes_covered_vertex() {
        // Conflict with the whole star of the interior vertex hides it.
        let mut tr = Tr::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let center = tr.insert(pt(0.1, 0.1, 0.1), None).unwrap();
        let p = pt(0.25, 0.2, 0.15);
        let loc = tr.locate(&p, None).unwrap();
        let star = |t: &Tr, c: CellKey| t.tds().has_vertex(c, center) && !t.is_infinite_cell(c);
        let mut recorder = Recorder::default();
        let v = tr.insert_in_conflict(p, loc, &star, &mut recorder).unwrap();
        assert!(v.is_some());
        assert_eq!(recorder.hidden, vec![pt(0.1, 0.1, 0.1)]);
        assert!(!tr.tds().contains_vertex(center));
        assert_eq!(tr.number_of_vertices(), 5);
        assert!(tr.is_valid(true));
    }

    #[test]
    fn test_zero_dimensional_weight_comparison() {
        struct Heavier;
        impl ConflictTester<FastKernel<f64>> for Heavier {
            fn in_conflict(&self, _tr: &Tr, _cell: CellKey) -> bool {
                true
            }
            fn compare_weight(&self, _new: &Point<f64, 3>, _existing: &Point<f64, 3>) -> Ordering {
                Ordering::Greater
            }
        }
        let mut tr = Tr::default();
        let v = tr.insert(pt(1.0, 1.0, 1.0), None).unwrap();
        let p = pt(1.0, 1.0, 1.0);
        let loc = tr.locate(&p, None).unwrap();
        let mut recorder = Recorder::default();
        let w = tr.insert_in_conflict(p, loc, &Heavier, &mut recorder).unwrap();
        assert_eq!(w, Some(v));
        assert_eq!(recorder.replaced, 1);
        assert_eq!(recorder.hidden.len(), 1);
    }

    #[test]
    fn test_one_dimensional_conflict_chain() {
        let mut tr = Tr::from_points(FastKernel::new(), [0.0, 1.0, 2.0, 3.0].map(|x| pt(x, 0.0, 0.0))).unwrap();
        let p = pt(1.5, 0.0, 0.0);
        let loc = tr.locate(&p, None).unwrap();
        // Edges touching x in [1, 2] conflict: (0,1), (1,2), (2,3).
        let near = |t: &Tr, c: CellKey| {
            !t.is_infinite_cell(c)
                && t.tds().cell(c).unwrap().vertices()[..2]
                    .iter()
                    .any(|&v| t.point(v).is_some_and(|q| (1.0..=2.0).contains(&q.coords()[0])))
        };
        let mut recorder = Recorder::default();
        tr.insert_in_conflict(p, loc, &near, &mut recorder).unwrap();
        assert_eq!(recorder.processed, 3);
        assert_eq!(recorder.hidden.len(), 2);
        assert_eq!(tr.number_of_vertices(), 3);
        assert!(tr.is_valid(true));
    }
}
