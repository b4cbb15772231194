//! Delaunay triangulation layer.
//!
//! [`DelaunayTriangulation3`] wraps a [`Triangulation3`] and inserts through
//! [`insert_in_conflict`](Triangulation3::insert_in_conflict) with the
//! empty-sphere conflict test, following CGAL's layering of
//! `Delaunay_triangulation_3` over `Triangulation_3`. Removal delegates to
//! the base engine, whose hole filling is already Delaunay in every
//! dimension.

use crate::core::algorithms::conflict::{ConflictTester, HiddenPointVisitor, NoHiddenPoints};
use crate::core::algorithms::incremental_insertion::InsertionError;
use crate::core::algorithms::locate::{LocateError, LocateType, Location};
use crate::core::algorithms::removal::RemovalError;
use crate::core::triangulation::{Triangulation3, TriangulationConfig, ValidationError};
use crate::core::triangulation_data_structure::{CellKey, Tds, VertexKey};
use crate::core::util::{ccw, cw};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::{BoundedSide, CollinearPosition, Orientation};

/// Error from [`DelaunayTriangulation3::validate_delaunay`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelaunayError {
    /// The underlying triangulation is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A vertex lies strictly inside the circumsphere (or circumcircle) of a
    /// neighboring finite cell.
    #[error("Vertex {vertex:?} lies inside the circumsphere of cell {cell:?}")]
    NotDelaunay {
        /// The finite cell.
        cell: CellKey,
        /// The vertex of the neighbor across one of its facets.
        vertex: VertexKey,
    },
}

/// The empty-sphere conflict test for one point.
///
/// A finite cell conflicts when the point is strictly inside its
/// circumsphere (circumcircle in dimension 2). An infinite cell conflicts
/// when the point is strictly beyond its finite facet, or on the facet's
/// plane (line) and strictly inside the facet.
#[derive(Clone, Debug)]
pub struct DelaunayConflictTester<K: Kernel> {
    point: K::Point,
}

impl<K: Kernel> DelaunayConflictTester<K> {
    /// Tester for `point`.
    #[must_use]
    pub const fn new(point: K::Point) -> Self {
        Self { point }
    }

    fn conflict_3d(&self, tr: &Triangulation3<K>, cell: CellKey) -> Option<bool> {
        let k = tr.kernel();
        let p = &self.point;
        let pts = tr.cell_points(cell)?;
        let Some(inf) = pts.iter().position(Option::is_none) else {
            let [Some(p0), Some(p1), Some(p2), Some(p3)] = pts else {
                return None;
            };
            return Some(k.side_of_oriented_sphere(p0, p1, p2, p3, p) == Orientation::POSITIVE);
        };
        let mut filled = pts;
        filled[inf] = Some(p);
        let [Some(q0), Some(q1), Some(q2), Some(q3)] = filled else {
            return None;
        };
        Some(match k.orientation(q0, q1, q2, q3) {
            Orientation::POSITIVE => true,
            Orientation::NEGATIVE => false,
            Orientation::DEGENERATE => {
                let facet: Vec<&K::Point> = pts.iter().flatten().copied().collect();
                let [a, b, c] = facet[..] else {
                    return None;
                };
                k.coplanar_side_of_bounded_circle(a, b, c, p) == BoundedSide::INSIDE
            }
        })
    }

    fn conflict_2d(&self, tr: &Triangulation3<K>, cell: CellKey) -> Option<bool> {
        let k = tr.kernel();
        let p = &self.point;
        let pts = tr.cell_points(cell)?;
        let Some(inf) = pts[..3].iter().position(Option::is_none) else {
            let [Some(p0), Some(p1), Some(p2), _] = pts else {
                return None;
            };
            return Some(k.coplanar_side_of_bounded_circle(p0, p1, p2, p) == BoundedSide::INSIDE);
        };
        let (a, b) = (pts[ccw(inf)]?, pts[cw(inf)]?);
        Some(match k.coplanar_orientation(a, b, p) {
            Orientation::POSITIVE => true,
            Orientation::NEGATIVE => false,
            Orientation::DEGENERATE => k.collinear_position(a, p, b) == CollinearPosition::MIDDLE,
        })
    }
}

impl<K: Kernel> ConflictTester<K> for DelaunayConflictTester<K> {
    fn in_conflict(&self, tr: &Triangulation3<K>, cell: CellKey) -> bool {
        let verdict = match tr.dimension() {
            3 => self.conflict_3d(tr, cell),
            2 => self.conflict_2d(tr, cell),
            _ => None,
        };
        verdict.unwrap_or(false)
    }
}

/// A Delaunay triangulation in dimension `-1..=3`.
///
/// # Examples
///
/// ```rust
/// use triangulation3::prelude::*;
///
/// let mut dt = DelaunayTriangulation3::new(FastKernel::<f64>::new());
/// for p in [
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 1.0],
///     [0.9, 0.9, 0.9],
/// ] {
///     dt.insert(Point::new(p), None).unwrap();
/// }
/// assert!(dt.is_delaunay());
///
/// let v = dt.triangulation().finite_vertices().next().unwrap();
/// dt.remove(v).unwrap();
/// assert_eq!(dt.number_of_vertices(), 4);
/// assert!(dt.is_delaunay());
/// ```
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation3<K: Kernel> {
    tr: Triangulation3<K>,
}

impl<K: Kernel + Default> Default for DelaunayTriangulation3<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: Kernel> PartialEq for DelaunayTriangulation3<K> {
    fn eq(&self, other: &Self) -> bool {
        self.tr == other.tr
    }
}

impl<K: Kernel> DelaunayTriangulation3<K> {
    /// An empty Delaunay triangulation using `kernel`.
    #[must_use]
    pub fn new(kernel: K) -> Self {
        Self::with_config(kernel, TriangulationConfig::default())
    }

    /// An empty Delaunay triangulation with explicit options.
    #[must_use]
    pub fn with_config(kernel: K, config: TriangulationConfig) -> Self {
        Self {
            tr: Triangulation3::with_config(kernel, config),
        }
    }

    /// The Delaunay triangulation of `points`.
    ///
    /// # Errors
    ///
    /// Returns the first insertion error.
    pub fn from_points<I>(kernel: K, points: I) -> Result<Self, InsertionError>
    where
        I: IntoIterator<Item = K::Point>,
    {
        let mut dt = Self::new(kernel);
        dt.insert_points(points)?;
        Ok(dt)
    }

    /// The underlying triangulation.
    #[inline]
    #[must_use]
    pub const fn triangulation(&self) -> &Triangulation3<K> {
        &self.tr
    }

    /// Unwraps the underlying triangulation.
    #[must_use]
    pub fn into_triangulation(self) -> Triangulation3<K> {
        self.tr
    }

    /// The combinatorial store.
    #[inline]
    #[must_use]
    pub const fn tds(&self) -> &Tds<K::Point> {
        self.tr.tds()
    }

    /// Current dimension.
    #[must_use]
    pub const fn dimension(&self) -> i32 {
        self.tr.dimension()
    }

    /// Number of finite vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.tr.number_of_vertices()
    }

    /// Number of cells, infinite ones included.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.tr.number_of_cells()
    }

    /// The infinite vertex.
    #[must_use]
    pub const fn infinite_vertex(&self) -> VertexKey {
        self.tr.infinite_vertex()
    }

    /// Locates `point`; see [`Triangulation3::locate`].
    ///
    /// # Errors
    ///
    /// See [`Triangulation3::locate`].
    pub fn locate(&self, point: &K::Point, hint: Option<CellKey>) -> Result<Location, LocateError> {
        self.tr.locate(point, hint)
    }

    /// Inserts `point`, keeping the empty-sphere property, and returns its
    /// vertex (the existing one for a duplicate point).
    ///
    /// # Errors
    ///
    /// Returns an error for a stale hint or when the conflict region cannot
    /// be replaced.
    pub fn insert(&mut self, point: K::Point, hint: Option<CellKey>) -> Result<VertexKey, InsertionError> {
        let location = self.tr.locate(&point, hint)?;
        if self.tr.dimension() < 2 || location.kind == LocateType::OutsideAffineHull {
            return self.tr.insert_located(point, location);
        }
        let tester = DelaunayConflictTester::new(point.clone());
        self.tr
            .insert_in_conflict(point, location, &tester, &mut NoHiddenPoints)?
            .ok_or(InsertionError::PointHidden)
    }

    /// Inserts every point, threading the last vertex's cell as the next
    /// hint.
    ///
    /// # Errors
    ///
    /// Returns the first insertion error.
    pub fn insert_points<I>(&mut self, points: I) -> Result<Vec<VertexKey>, InsertionError>
    where
        I: IntoIterator<Item = K::Point>,
    {
        let mut keys = Vec::new();
        let mut hint = None;
        for point in points {
            let v = self.insert(point, hint)?;
            hint = self.tr.tds().vertex(v).map(|vertex| vertex.cell());
            keys.push(v);
        }
        tracing::debug!(
            inserted = keys.len(),
            dimension = self.dimension(),
            "bulk Delaunay insertion finished"
        );
        Ok(keys)
    }

    /// Removes the finite vertex `v` and returns its point.
    ///
    /// The triangulation stays Delaunay. When every other point lies in a
    /// plane (or on a line), the dimension drops by one.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex ([`RemovalError::InfiniteVertex`]) and
    /// stale keys ([`RemovalError::UnknownVertex`]). Returns
    /// [`RemovalError::HoleNotRetriangulable`], leaving the triangulation
    /// unchanged, when degenerate input defeats the hole filling.
    pub fn remove(&mut self, v: VertexKey) -> Result<K::Point, RemovalError> {
        self.tr.remove(v)
    }

    /// [`remove`](Self::remove), reporting the cells of the star of `v`
    /// and the cells filling the hole to `visitor`.
    ///
    /// # Errors
    ///
    /// See [`remove`](Self::remove).
    pub fn remove_with_visitor<V>(&mut self, v: VertexKey, visitor: &mut V) -> Result<K::Point, RemovalError>
    where
        V: HiddenPointVisitor<K> + ?Sized,
    {
        self.tr.remove_with_visitor(v, visitor)
    }

    /// True when removing `v` lowers the dimension.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex and stale keys.
    pub fn test_dim_down(&self, v: VertexKey) -> Result<bool, RemovalError> {
        self.tr.test_dim_down(v)
    }

    /// Structural and geometric validity; see [`Triangulation3::is_valid`].
    #[must_use]
    pub fn is_valid(&self, verbose: bool) -> bool {
        self.tr.is_valid(verbose)
    }

    /// True when [`validate_delaunay`](Self::validate_delaunay) passes.
    #[must_use]
    pub fn is_delaunay(&self) -> bool {
        self.validate_delaunay().is_ok()
    }

    /// Runs the validator, then checks that no finite vertex of a neighbor
    /// lies strictly inside the circumsphere of a finite cell. The local
    /// test implies the global empty-sphere property.
    ///
    /// # Errors
    ///
    /// Returns the first failure found.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayError> {
        self.tr.validate()?;
        let dimension = self.dimension();
        if dimension < 2 {
            return Ok(());
        }
        let arity = self.tds().arity();
        let k = self.tr.kernel();
        for c in self.tr.finite_cells() {
            let Some(pts) = self.tr.cell_points(c) else {
                continue;
            };
            for i in 0..arity {
                let Ok(m) = self.tds().mirror_vertex(c, i) else {
                    continue;
                };
                let Some(q) = self.tr.point(m) else {
                    continue;
                };
                let inside = match pts {
                    [Some(p0), Some(p1), Some(p2), Some(p3)] if dimension == 3 => {
                        k.side_of_oriented_sphere(p0, p1, p2, p3, q) == Orientation::POSITIVE
                    }
                    [Some(p0), Some(p1), Some(p2), _] if dimension == 2 => {
                        k.coplanar_side_of_bounded_circle(p0, p1, p2, q) == BoundedSide::INSIDE
                    }
                    _ => false,
                };
                if inside {
                    return Err(DelaunayError::NotDelaunay { cell: c, vertex: m });
                }
            }
        }
        Ok(())
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
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    type Dt = DelaunayTriangulation3<FastKernel<f64>>;

    fn pt(x: f64, y: f64, z: f64) -> Point<f64, 3> {
        Point::new([x, y, z])
    }

    #[test]
    fn test_delaunay_triangulation_is_order_independent() {
        // No four of these corners are cocircular.
        let corners = [pt(0.0, 0.0, 0.0), pt(3.0, 0.0, 0.0), pt(3.0, 1.0, 0.0), pt(0.0, 1.2, 0.0)];
        let a = Dt::from_points(FastKernel::new(), corners.clone()).unwrap();
        let mut reversed = corners;
        reversed.reverse();
        let b = Dt::from_points(FastKernel::new(), reversed).unwrap();
        assert!(a.is_delaunay());
        assert!(b.is_delaunay());
        assert!(a == b);
    }

    #[test]
    fn test_plain_insertion_is_not_always_delaunay() {
        let mut tr = Triangulation3::new(FastKernel::<f64>::new());
        // Thin triangle first, then a point that the hull-only fill connects
        // badly.
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0), pt(2.0, 0.2, 0.0), pt(2.0, -0.2, 0.0)])
            .unwrap();
        let plain = DelaunayTriangulation3 { tr };
        assert!(matches!(
            plain.validate_delaunay(),
            Err(DelaunayError::NotDelaunay { .. })
        ));

        let dt = Dt::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0), pt(2.0, 0.2, 0.0), pt(2.0, -0.2, 0.0)],
        )
        .unwrap();
        assert!(dt.is_delaunay());
    }

    #[test]
    fn test_duplicate_point_returns_existing_vertex() {
        let mut dt = Dt::default();
        let points = [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)];
        let keys = dt.insert_points(points.clone()).unwrap();
        assert_eq!(dt.insert(points[2].clone(), None).unwrap(), keys[2]);
        assert_eq!(dt.number_of_vertices(), 4);
    }

    #[test]
    fn test_jittered_grid_insert_and_remove() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut points = Vec::new();
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..2 {
                    points.push(pt(
                        f64::from(x) + rng.random_range(-0.2..0.2),
                        f64::from(y) + rng.random_range(-0.2..0.2),
                        f64::from(z) + rng.random_range(-0.2..0.2),
                    ));
                }
            }
        }
        let mut dt = Dt::from_points(FastKernel::new(), points.clone()).unwrap();
        assert!(dt.is_delaunay());
        assert_eq!(dt.number_of_vertices(), points.len());

        let keys: Vec<VertexKey> = dt.triangulation().finite_vertices().collect();
        for (k, v) in keys.into_iter().enumerate() {
            dt.remove(v).unwrap();
            assert!(dt.is_delaunay(), "after removing vertex {k}");
        }
        assert_eq!(dt.dimension(), -1);
    }

    #[test]
    fn test_tester_on_infinite_cells() {
        let dt = Dt::from_points(
            FastKernel::new(),
            [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let tr = dt.triangulation();
        let beyond = DelaunayConflictTester::<FastKernel<f64>>::new(pt(0.6, 0.6, 0.6));
        let conflicting: Vec<CellKey> = tr.cells().filter(|&c| beyond.in_conflict(tr, c)).collect();
        // The finite cell (its circumsphere contains the point) and the
        // infinite cell behind the slanted facet.
        assert_eq!(conflicting.len(), 2);

        let on_plane = DelaunayConflictTester::<FastKernel<f64>>::new(pt(0.2, 0.2, 0.0));
        let touching = tr
            .cells()
            .filter(|&c| tr.is_infinite_cell(c) && on_plane.in_conflict(tr, c))
            .count();
        assert_eq!(touching, 1);
    }
}
