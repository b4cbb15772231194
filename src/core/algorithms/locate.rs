//! Point location.
//!
//! Finds the simplex containing a query point with a remembering stochastic
//! walk: from the current cell, test the facets in a random cyclic order
//! (skipping the one just crossed) and cross the first facet that separates
//! the cell from the point. Each dimension has its own walk: orientation
//! tests in 3D, coplanar orientation against edges in 2D, and collinear
//! position along the chain in 1D.
//!
//! The module also provides the `side_of_*` queries, which classify a point
//! against a single simplex with the same conventions.
//!
//! # References
//!
//! - O. Devillers, S. Pion, and M. Teillaud, "Walking in a Triangulation",
//!   International Journal of Foundations of Computer Science, 2002.
//! - CGAL Triangulation_3 documentation

use rand::Rng;
use slotmap::Key;

use crate::core::cell::Cell;
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, TdsError};
use crate::core::util::{ccw, cw, vertex_triple_index};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::{BoundedSide, CollinearPosition, Orientation};

/// Kind of simplex a located point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocateType {
    /// On an existing vertex: `li` is its slot in the cell.
    Vertex,
    /// On an edge: `li` and `lj` are the slots of its endpoints.
    Edge,
    /// On a facet: `li` is the slot opposite it (3 for a 2D face).
    Facet,
    /// Strictly inside a finite cell.
    Cell,
    /// Outside the convex hull, inside the affine hull: the cell is an
    /// infinite cell whose finite facet sees the point, `li` is the slot of
    /// the infinite vertex.
    OutsideConvexHull,
    /// Outside the affine hull of the current vertices.
    OutsideAffineHull,
}

/// Result of [`locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// The cell the point was found in.
    pub cell: CellKey,
    /// Which face of `cell` contains the point.
    pub kind: LocateType,
    /// First local index (meaning depends on `kind`).
    pub li: usize,
    /// Second local index, used by [`LocateType::Edge`].
    pub lj: usize,
}

impl Location {
    const fn new(cell: CellKey, kind: LocateType, li: usize, lj: usize) -> Self {
        Self { cell, kind, li, lj }
    }
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// The hint key does not refer to a live cell.
    #[error("Hint {0:?} is not a cell of this triangulation")]
    InvalidHint(CellKey),

    /// The walk exceeded its step budget (numerically inconsistent kernel).
    #[error("Walk did not terminate after {steps} steps")]
    WalkDidNotTerminate {
        /// Number of cells visited.
        steps: usize,
    },

    /// The structure was inconsistent along the walk.
    #[error(transparent)]
    Tds(#[from] TdsError),
}

/// Classification of a point against one simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideOf {
    /// Inside, on the boundary, or outside the simplex.
    pub side: BoundedSide,
    /// The face containing the point; `None` when outside.
    pub kind: Option<LocateType>,
    /// First local index.
    pub li: usize,
    /// Second local index.
    pub lj: usize,
}

impl SideOf {
    const OUTSIDE: Self = Self {
        side: BoundedSide::OUTSIDE,
        kind: None,
        li: 0,
        lj: 0,
    };

    const fn on(side: BoundedSide, kind: LocateType, li: usize, lj: usize) -> Self {
        Self {
            side,
            kind: Some(kind),
            li,
            lj,
        }
    }
}

// =============================================================================
// SIMPLEX CLASSIFICATION
// =============================================================================

/// Slots of a sign vector that are not degenerate.
fn nonzero_slots<const N: usize>(o: &[Orientation; N]) -> impl Iterator<Item = usize> + '_ {
    (0..N).filter(move |&i| o[i] != Orientation::DEGENERATE)
}

/// Classifies from the orientations of `p` against each facet of a
/// tetrahedron (`o[i]` for the facet opposite slot `i`).
fn classify_tetrahedron(o: &[Orientation; 4]) -> SideOf {
    if o.contains(&Orientation::NEGATIVE) {
        return SideOf::OUTSIDE;
    }
    let mut positive = nonzero_slots(o);
    match o.iter().filter(|&&s| s == Orientation::DEGENERATE).count() {
        0 => SideOf::on(BoundedSide::INSIDE, LocateType::Cell, 0, 0),
        1 => {
            let li = (0..4).find(|&i| o[i] == Orientation::DEGENERATE).unwrap_or(0);
            SideOf::on(BoundedSide::BOUNDARY, LocateType::Facet, li, 0)
        }
        2 => {
            let li = positive.next().unwrap_or(0);
            let lj = positive.next().unwrap_or(0);
            SideOf::on(BoundedSide::BOUNDARY, LocateType::Edge, li, lj)
        }
        _ => {
            let li = positive.next().unwrap_or(0);
            SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, li, 0)
        }
    }
}

/// Same for a triangle: `o[i]` is the side of `p` against the edge opposite
/// slot `i`.
fn classify_triangle(o: &[Orientation; 3]) -> SideOf {
    if o.contains(&Orientation::NEGATIVE) {
        return SideOf::OUTSIDE;
    }
    match o.iter().filter(|&&s| s == Orientation::DEGENERATE).count() {
        0 => SideOf::on(BoundedSide::INSIDE, LocateType::Facet, 3, 0),
        1 => {
            let k = (0..3).find(|&i| o[i] == Orientation::DEGENERATE).unwrap_or(0);
            SideOf::on(BoundedSide::BOUNDARY, LocateType::Edge, ccw(k), cw(k))
        }
        _ => {
            let li = nonzero_slots(o).next().unwrap_or(0);
            SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, li, 0)
        }
    }
}

fn tetrahedron_signs<K: Kernel>(kernel: &K, p: &K::Point, pts: [&K::Point; 4]) -> [Orientation; 4] {
    [0, 1, 2, 3].map(|i| {
        let mut q = pts;
        q[i] = p;
        kernel.orientation(q[0], q[1], q[2], q[3])
    })
}

fn triangle_signs<K: Kernel>(kernel: &K, p: &K::Point, pts: [&K::Point; 3]) -> [Orientation; 3] {
    [0, 1, 2].map(|i| kernel.coplanar_orientation(pts[ccw(i)], pts[cw(i)], p))
}

/// Position of `p` relative to the positively oriented tetrahedron `pts`.
///
/// # Examples
///
/// ```rust
/// use triangulation3::core::algorithms::locate::{LocateType, side_of_tetrahedron};
/// use triangulation3::prelude::*;
///
/// let kernel = FastKernel::<f64>::new();
/// let tet = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let pts = [&tet[0], &tet[1], &tet[2], &tet[3]];
/// let inside = side_of_tetrahedron(&kernel, &Point::new([0.1, 0.1, 0.1]), pts);
/// assert_eq!(inside.kind, Some(LocateType::Cell));
/// let corner = side_of_tetrahedron(&kernel, &Point::new([1.0, 0.0, 0.0]), pts);
/// assert_eq!((corner.kind, corner.li), (Some(LocateType::Vertex), 1));
/// ```
#[must_use]
pub fn side_of_tetrahedron<K: Kernel>(kernel: &K, p: &K::Point, pts: [&K::Point; 4]) -> SideOf {
    classify_tetrahedron(&tetrahedron_signs(kernel, p, pts))
}

/// Position of the coplanar point `p` relative to the triangle `pts`, of
/// either orientation in the plane. A point inside reports
/// [`LocateType::Facet`] with `li == 3`.
#[must_use]
pub fn side_of_triangle<K: Kernel>(kernel: &K, p: &K::Point, pts: [&K::Point; 3]) -> SideOf {
    let reference = kernel.coplanar_orientation(pts[0], pts[1], pts[2]);
    if reference == Orientation::DEGENERATE {
        return SideOf::OUTSIDE;
    }
    let signs = triangle_signs(kernel, p, pts).map(|o| o.times(reference));
    classify_triangle(&signs)
}

/// Position of the collinear point `p` relative to the segment `p0, p1`.
#[must_use]
pub fn side_of_segment<K: Kernel>(kernel: &K, p: &K::Point, p0: &K::Point, p1: &K::Point) -> SideOf {
    match kernel.collinear_position(p0, p, p1) {
        CollinearPosition::MIDDLE => SideOf::on(BoundedSide::INSIDE, LocateType::Edge, 0, 1),
        CollinearPosition::SOURCE => SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, 0, 0),
        CollinearPosition::TARGET => SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, 1, 0),
        CollinearPosition::BEFORE | CollinearPosition::AFTER => SideOf::OUTSIDE,
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Points of the first `N` slots of a cell known to be finite.
fn finite_points<'a, K: Kernel, const N: usize>(
    tr: &'a Triangulation3<K>,
    cell: &Cell,
) -> Result<[&'a K::Point; N], LocateError> {
    let mut out: [Option<&K::Point>; N] = [None; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = Some(tr.tds.point(cell.vertex(i)).ok_or(TdsError::InfiniteVertex)?);
    }
    // Every slot was filled above.
    let first = out[0].ok_or(TdsError::InfiniteVertex)?;
    Ok(out.map(|p| p.unwrap_or(first)))
}

/// Slot of the infinite vertex in `c`, if `c` is infinite.
fn infinite_slot<K: Kernel>(tr: &Triangulation3<K>, c: CellKey) -> Option<usize> {
    let arity = tr.tds.arity();
    tr.tds
        .cell(c)?
        .vertices()[..arity]
        .iter()
        .position(|&v| v == tr.infinite_vertex())
}

/// Upper bound on walk length; the stochastic walk visits each cell a
/// bounded number of times in practice.
fn walk_budget<K: Kernel>(tr: &Triangulation3<K>) -> usize {
    tr.number_of_cells().saturating_mul(8).max(64)
}

/// The starting cell: the hint or the infinite vertex's cell, moved off the
/// infinite vertex to its finite neighbor.
fn start_cell<K: Kernel>(tr: &Triangulation3<K>, hint: Option<CellKey>) -> Result<CellKey, LocateError> {
    let start = match hint {
        Some(h) if !tr.tds.contains_cell(h) => return Err(LocateError::InvalidHint(h)),
        Some(h) => h,
        None => tr.infinite_cell(),
    };
    Ok(match infinite_slot(tr, start) {
        Some(i) => tr.tds.checked_cell(start)?.neighbor(i),
        None => start,
    })
}

fn outside_convex_hull<K: Kernel>(tr: &Triangulation3<K>, next: CellKey) -> Location {
    let li = infinite_slot(tr, next).unwrap_or(0);
    Location::new(next, LocateType::OutsideConvexHull, li, 0)
}

// =============================================================================
// WALKS
// =============================================================================

/// Locates `point`, starting from `hint` when given.
///
/// # Errors
///
/// Returns [`LocateError::InvalidHint`] for a stale hint and
/// [`LocateError::WalkDidNotTerminate`] when the kernel is inconsistent
/// enough to make the walk cycle.
///
/// # Examples
///
/// ```rust
/// use triangulation3::core::algorithms::locate::LocateType;
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
///     tr.insert(Point::new(p), None).unwrap();
/// }
/// let loc = tr.locate(&Point::new([0.2, 0.2, 0.2]), None).unwrap();
/// assert_eq!(loc.kind, LocateType::Cell);
/// let loc = tr.locate(&Point::new([2.0, 2.0, 2.0]), None).unwrap();
/// assert_eq!(loc.kind, LocateType::OutsideConvexHull);
/// assert!(tr.is_infinite_cell(loc.cell));
/// ```
pub fn locate<K: Kernel>(
    tr: &Triangulation3<K>,
    point: &K::Point,
    hint: Option<CellKey>,
) -> Result<Location, LocateError> {
    match tr.dimension() {
        3 => walk_3d(tr, point, start_cell(tr, hint)?),
        2 => walk_2d(tr, point, start_cell(tr, hint)?),
        1 => walk_1d(tr, point, start_cell(tr, hint)?),
        0 => locate_0d(tr, point, hint),
        _ => {
            if let Some(h) = hint.filter(|&h| !tr.tds.contains_cell(h)) {
                return Err(LocateError::InvalidHint(h));
            }
            Ok(Location::new(
                tr.infinite_cell(),
                LocateType::OutsideAffineHull,
                0,
                0,
            ))
        }
    }
}

fn walk_3d<K: Kernel>(tr: &Triangulation3<K>, p: &K::Point, start: CellKey) -> Result<Location, LocateError> {
    let mut rng = tr.walk_rng();
    let mut previous = CellKey::null();
    let mut c = start;
    let budget = walk_budget(tr);

    'walk: for steps in 0..budget {
        let cell = tr.tds.checked_cell(c)?;
        let pts: [&K::Point; 4] = finite_points(tr, cell)?;
        let first: usize = rng.random_range(0..4);
        for k in 0..4 {
            let i = (first + k) % 4;
            let next = cell.neighbor(i);
            if next == previous {
                continue;
            }
            let mut q = pts;
            q[i] = p;
            if tr.kernel.orientation(q[0], q[1], q[2], q[3]) != Orientation::NEGATIVE {
                continue;
            }
            if tr.is_infinite_cell(next) {
                tracing::trace!(steps, "walk left the convex hull");
                return Ok(outside_convex_hull(tr, next));
            }
            previous = c;
            c = next;
            continue 'walk;
        }
        tracing::trace!(steps, "walk reached its cell");
        let mut signs = tetrahedron_signs(&tr.kernel, p, pts);
        // The facet just crossed is known to face the point.
        for o in &mut signs {
            if *o == Orientation::NEGATIVE {
                *o = Orientation::POSITIVE;
            }
        }
        let side = classify_tetrahedron(&signs);
        return Ok(Location::new(
            c,
            side.kind.unwrap_or(LocateType::Cell),
            side.li,
            side.lj,
        ));
    }
    Err(LocateError::WalkDidNotTerminate { steps: budget })
}

fn walk_2d<K: Kernel>(tr: &Triangulation3<K>, p: &K::Point, start: CellKey) -> Result<Location, LocateError> {
    {
        let cell = tr.tds.checked_cell(start)?;
        let [p0, p1, p2] = finite_points::<K, 3>(tr, cell)?;
        if !tr.kernel.coplanar(p0, p1, p2, p) {
            return Ok(Location::new(start, LocateType::OutsideAffineHull, 0, 0));
        }
    }

    let mut rng = tr.walk_rng();
    let mut previous = CellKey::null();
    let mut c = start;
    let budget = walk_budget(tr);

    'walk: for steps in 0..budget {
        let cell = tr.tds.checked_cell(c)?;
        let pts: [&K::Point; 3] = finite_points(tr, cell)?;
        let first: usize = rng.random_range(0..3);
        for k in 0..3 {
            let i = (first + k) % 3;
            let next = cell.neighbor(i);
            if next == previous {
                continue;
            }
            if tr.kernel.coplanar_orientation(pts[ccw(i)], pts[cw(i)], p) != Orientation::NEGATIVE {
                continue;
            }
            if tr.is_infinite_cell(next) {
                tracing::trace!(steps, "walk left the convex hull");
                return Ok(outside_convex_hull(tr, next));
            }
            previous = c;
            c = next;
            continue 'walk;
        }
        tracing::trace!(steps, "walk reached its face");
        let signs = triangle_signs(&tr.kernel, p, pts).map(|o| match o {
            Orientation::NEGATIVE => Orientation::POSITIVE,
            other => other,
        });
        let side = classify_triangle(&signs);
        return Ok(Location::new(
            c,
            side.kind.unwrap_or(LocateType::Facet),
            side.li,
            side.lj,
        ));
    }
    Err(LocateError::WalkDidNotTerminate { steps: budget })
}

fn walk_1d<K: Kernel>(tr: &Triangulation3<K>, p: &K::Point, start: CellKey) -> Result<Location, LocateError> {
    {
        let cell = tr.tds.checked_cell(start)?;
        let [p0, p1] = finite_points::<K, 2>(tr, cell)?;
        if !tr.kernel.collinear(p0, p1, p) {
            return Ok(Location::new(start, LocateType::OutsideAffineHull, 0, 0));
        }
    }

    let mut c = start;
    let budget = walk_budget(tr);
    for _ in 0..budget {
        let cell = tr.tds.checked_cell(c)?;
        let [p0, p1] = finite_points::<K, 2>(tr, cell)?;
        let next = match tr.kernel.collinear_position(p0, p, p1) {
            CollinearPosition::SOURCE => return Ok(Location::new(c, LocateType::Vertex, 0, 0)),
            CollinearPosition::TARGET => return Ok(Location::new(c, LocateType::Vertex, 1, 0)),
            CollinearPosition::MIDDLE => return Ok(Location::new(c, LocateType::Edge, 0, 1)),
            CollinearPosition::BEFORE => cell.neighbor(1),
            CollinearPosition::AFTER => cell.neighbor(0),
        };
        if tr.is_infinite_cell(next) {
            return Ok(outside_convex_hull(tr, next));
        }
        c = next;
    }
    Err(LocateError::WalkDidNotTerminate { steps: budget })
}

fn locate_0d<K: Kernel>(
    tr: &Triangulation3<K>,
    p: &K::Point,
    hint: Option<CellKey>,
) -> Result<Location, LocateError> {
    if let Some(h) = hint.filter(|&h| !tr.tds.contains_cell(h)) {
        return Err(LocateError::InvalidHint(h));
    }
    let star = tr.infinite_cell();
    let finite = tr.tds.checked_cell(star)?.neighbor(0);
    let v = tr.tds.checked_cell(finite)?.vertex(0);
    let q = tr.tds.point(v).ok_or(TdsError::InfiniteVertex)?;
    if tr.kernel.equal(p, q) {
        Ok(Location::new(finite, LocateType::Vertex, 0, 0))
    } else {
        Ok(Location::new(star, LocateType::OutsideAffineHull, 0, 0))
    }
}

// =============================================================================
// TRIANGULATION API
// =============================================================================

impl<K: Kernel> Triangulation3<K> {
    /// Locates `point`; see [`locate`].
    ///
    /// # Errors
    ///
    /// See [`locate`].
    pub fn locate(&self, point: &K::Point, hint: Option<CellKey>) -> Result<Location, LocateError> {
        locate(self, point, hint)
    }

    /// Position of `p` relative to the cell `c` of a 3D triangulation.
    ///
    /// For an infinite cell, the inside is the open half-space beyond its
    /// finite facet; a point in the plane of that facet is on the boundary
    /// when it lies in the closed triangle.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::WrongDimension`] outside dimension 3 and
    /// [`TdsError::UnknownCell`] for a stale key.
    pub fn side_of_cell(&self, p: &K::Point, c: CellKey) -> Result<SideOf, LocateError> {
        if self.dimension() != 3 {
            return Err(TdsError::WrongDimension {
                required: "3",
                actual: self.dimension(),
            }
            .into());
        }
        let cell = self.tds.checked_cell(c)?;
        let Some(i) = infinite_slot(self, c) else {
            return Ok(side_of_tetrahedron(&self.kernel, p, finite_points(self, cell)?));
        };
        let triple = [0, 1, 2].map(|k| vertex_triple_index(i, k));
        let facet = triple.map(|k| self.tds.point(cell.vertex(k)));
        let [Some(p0), Some(p1), Some(p2)] = facet else {
            return Err(TdsError::InfiniteVertex.into());
        };
        // Slot i replaced by p, written in vertex-triple order.
        match self.kernel.orientation(p0, p1, p2, p) {
            Orientation::POSITIVE => Ok(SideOf::on(BoundedSide::INSIDE, LocateType::Cell, 0, 0)),
            Orientation::NEGATIVE => Ok(SideOf::OUTSIDE),
            Orientation::DEGENERATE => {
                let side = side_of_triangle(&self.kernel, p, [p0, p1, p2]);
                Ok(match side.kind {
                    None => SideOf::OUTSIDE,
                    Some(LocateType::Facet) => SideOf::on(BoundedSide::BOUNDARY, LocateType::Facet, i, 0),
                    Some(kind) => SideOf::on(BoundedSide::BOUNDARY, kind, triple[side.li], triple[side.lj]),
                })
            }
        }
    }

    /// Position of the coplanar point `p` relative to the face `c` of a 2D
    /// triangulation (`i` must be 3).
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::WrongDimension`] outside dimension 2,
    /// [`TdsError::IndexOutOfRange`] for `i != 3`, and key errors.
    pub fn side_of_facet(&self, p: &K::Point, c: CellKey, i: usize) -> Result<SideOf, LocateError> {
        if self.dimension() != 2 {
            return Err(TdsError::WrongDimension {
                required: "2",
                actual: self.dimension(),
            }
            .into());
        }
        if i != 3 {
            return Err(TdsError::IndexOutOfRange { index: i, dimension: 2 }.into());
        }
        let cell = self.tds.checked_cell(c)?;
        let Some(inf) = infinite_slot(self, c) else {
            let pts: [&K::Point; 3] = finite_points(self, cell)?;
            return Ok(classify_triangle(&triangle_signs(&self.kernel, p, pts)));
        };
        let (a, b) = (ccw(inf), cw(inf));
        let (Some(pa), Some(pb)) = (self.tds.point(cell.vertex(a)), self.tds.point(cell.vertex(b))) else {
            return Err(TdsError::InfiniteVertex.into());
        };
        match self.kernel.coplanar_orientation(pa, pb, p) {
            Orientation::POSITIVE => Ok(SideOf::on(BoundedSide::INSIDE, LocateType::Facet, 3, 0)),
            Orientation::NEGATIVE => Ok(SideOf::OUTSIDE),
            Orientation::DEGENERATE => {
                let side = side_of_segment(&self.kernel, p, pa, pb);
                Ok(match side.kind {
                    None => SideOf::OUTSIDE,
                    Some(LocateType::Vertex) => {
                        let li = if side.li == 0 { a } else { b };
                        SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, li, 0)
                    }
                    Some(_) => SideOf::on(BoundedSide::BOUNDARY, LocateType::Edge, a, b),
                })
            }
        }
    }

    /// Position of the collinear point `p` relative to the edge `c` of a 1D
    /// triangulation. An infinite edge covers the open ray beyond its finite
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::WrongDimension`] outside dimension 1 and key
    /// errors.
    pub fn side_of_edge(&self, p: &K::Point, c: CellKey) -> Result<SideOf, LocateError> {
        if self.dimension() != 1 {
            return Err(TdsError::WrongDimension {
                required: "1",
                actual: self.dimension(),
            }
            .into());
        }
        let cell = self.tds.checked_cell(c)?;
        let Some(inf) = infinite_slot(self, c) else {
            let [p0, p1] = finite_points::<K, 2>(self, cell)?;
            return Ok(side_of_segment(&self.kernel, p, p0, p1));
        };
        let end = 1 - inf;
        let a = cell.vertex(end);
        let n = self.tds.checked_cell(cell.neighbor(inf))?;
        let b = if n.vertex(0) == a { n.vertex(1) } else { n.vertex(0) };
        let (Some(pa), Some(pb)) = (self.tds.point(a), self.tds.point(b)) else {
            return Err(TdsError::InfiniteVertex.into());
        };
        Ok(match self.kernel.collinear_position(pb, p, pa) {
            CollinearPosition::AFTER => SideOf::on(BoundedSide::INSIDE, LocateType::Edge, 0, 1),
            CollinearPosition::TARGET => SideOf::on(BoundedSide::BOUNDARY, LocateType::Vertex, end, 0),
            _ => SideOf::OUTSIDE,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::kernel::{FastKernel, RobustKernel};
    use crate::geometry::point::Point;
    use crate::geometry::traits::coordinate::Coordinate;

    fn build<K: Kernel<Point = Point<f64, 3>>>(kernel: K, points: &[[f64; 3]]) -> Triangulation3<K> {
        let mut tr = Triangulation3::new(kernel);
        for &p in points {
            tr.insert(Point::new(p), None).unwrap();
        }
        tr
    }

    const TETRAHEDRON: [[f64; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];

    #[test]
    fn test_locate_empty_is_outside_affine_hull() {
        let tr = Triangulation3::new(FastKernel::<f64>::new());
        let loc = tr.locate(&Point::new([0.0, 0.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideAffineHull);
    }

    #[test]
    fn test_locate_0d() {
        let tr = build(FastKernel::new(), &[[1.0, 2.0, 3.0]]);
        let loc = tr.locate(&Point::new([1.0, 2.0, 3.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::Vertex);
        let loc = tr.locate(&Point::new([0.0, 2.0, 3.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideAffineHull);
    }

    #[test]
    fn test_locate_1d() {
        let tr = build(FastKernel::new(), &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(tr.dimension(), 1);
        let loc = tr.locate(&Point::new([1.5, 0.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::Edge);
        let loc = tr.locate(&Point::new([1.0, 0.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::Vertex);
        let cell = tr.tds().cell(loc.cell).unwrap();
        assert_eq!(tr.point(cell.vertex(loc.li)), Some(&Point::new([1.0, 0.0, 0.0])));
        let loc = tr.locate(&Point::new([-1.0, 0.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideConvexHull);
        assert!(tr.is_infinite_cell(loc.cell));
        let loc = tr.locate(&Point::new([0.5, 1.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideAffineHull);
    }

    #[test]
    fn test_locate_2d() {
        let tr = build(
            FastKernel::new(),
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        );
        assert_eq!(tr.dimension(), 2);
        let loc = tr.locate(&Point::new([0.2, 0.3, 0.0]), None).unwrap();
        assert_eq!((loc.kind, loc.li), (LocateType::Facet, 3));
        let loc = tr.locate(&Point::new([0.5, 0.0, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::Edge);
        let loc = tr.locate(&Point::new([3.0, 0.5, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideConvexHull);
        let loc = tr.locate(&Point::new([0.2, 0.2, 1.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::OutsideAffineHull);
    }

    #[test]
    fn test_locate_3d_faces() {
        let tr = build(FastKernel::new(), &TETRAHEDRON);
        let cases = [
            ([0.1, 0.1, 0.1], LocateType::Cell),
            ([0.3, 0.3, 0.0], LocateType::Facet),
            ([0.5, 0.0, 0.0], LocateType::Edge),
            ([0.0, 0.0, 1.0], LocateType::Vertex),
            ([1.0, 1.0, 1.0], LocateType::OutsideConvexHull),
        ];
        for (p, kind) in cases {
            let loc = tr.locate(&Point::new(p), None).unwrap();
            assert_eq!(loc.kind, kind, "point {p:?}");
        }
    }

    #[test]
    fn test_locate_edge_indices_are_endpoints() {
        let tr = build(RobustKernel::new(), &TETRAHEDRON);
        let loc = tr.locate(&Point::new([0.5, 0.5, 0.0]), None).unwrap();
        assert_eq!(loc.kind, LocateType::Edge);
        let cell = tr.tds().cell(loc.cell).unwrap();
        let mut ends = [cell.vertex(loc.li), cell.vertex(loc.lj)].map(|v| tr.point(v).cloned());
        ends.sort();
        assert_eq!(
            ends,
            [Some(Point::new([0.0, 1.0, 0.0])), Some(Point::new([1.0, 0.0, 0.0]))]
        );
    }

    #[test]
    fn test_stale_hint_is_rejected() {
        let mut tr = build(FastKernel::new(), &TETRAHEDRON);
        let hint = tr.cells().next().unwrap();
        tr.insert(Point::new([0.1, 0.1, 0.1]), None).unwrap();
        if !tr.tds().contains_cell(hint) {
            assert_eq!(
                tr.locate(&Point::new([0.1, 0.1, 0.1]), Some(hint)),
                Err(LocateError::InvalidHint(hint))
            );
        }
        let live = tr.cells().next().unwrap();
        assert!(tr.locate(&Point::new([0.1, 0.1, 0.1]), Some(live)).is_ok());
    }

    #[test]
    fn test_side_of_cell_infinite() {
        let tr = build(FastKernel::new(), &TETRAHEDRON);
        let far = Point::new([-1.0, 0.2, 0.2]);
        let visible = tr
            .cells()
            .filter(|&c| tr.is_infinite_cell(c))
            .filter(|&c| tr.side_of_cell(&far, c).unwrap().side == BoundedSide::INSIDE)
            .count();
        // Only the facet x = 0 faces the point.
        assert_eq!(visible, 1);
        let on_plane = Point::new([0.0, 0.2, 0.2]);
        let boundary = tr
            .cells()
            .filter(|&c| tr.is_infinite_cell(c))
            .map(|c| tr.side_of_cell(&on_plane, c).unwrap())
            .filter(|s| s.side == BoundedSide::BOUNDARY)
            .collect::<Vec<_>>();
        assert_eq!(boundary.len(), 1);
        assert_eq!(boundary[0].kind, Some(LocateType::Facet));
    }

    #[test]
    fn test_side_of_segment_positions() {
        let kernel = FastKernel::<f64>::new();
        let a = Point::new([0.0, 0.0, 0.0]);
        let b = Point::new([2.0, 0.0, 0.0]);
        let mid = side_of_segment(&kernel, &Point::new([1.0, 0.0, 0.0]), &a, &b);
        assert_eq!(mid.side, BoundedSide::INSIDE);
        let end = side_of_segment(&kernel, &b, &a, &b);
        assert_eq!((end.side, end.li), (BoundedSide::BOUNDARY, 1));
        let out = side_of_segment(&kernel, &Point::new([3.0, 0.0, 0.0]), &a, &b);
        assert_eq!(out, SideOf::OUTSIDE);
    }

    #[test]
    fn test_side_of_triangle_either_orientation() {
        let kernel = FastKernel::<f64>::new();
        let pts = [
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
        ];
        let p = Point::new([0.2, 0.2, 0.0]);
        let ccw_side = side_of_triangle(&kernel, &p, [&pts[0], &pts[1], &pts[2]]);
        let cw_side = side_of_triangle(&kernel, &p, [&pts[0], &pts[2], &pts[1]]);
        assert_eq!(ccw_side.side, BoundedSide::INSIDE);
        assert_eq!(cw_side.side, BoundedSide::INSIDE);
    }

    #[test]
    fn test_side_of_facet_and_edge_dimensions() {
        let tr = build(FastKernel::new(), &TETRAHEDRON);
        let c = tr.cells().next().unwrap();
        let p = Point::new([0.0, 0.0, 0.0]);
        assert!(matches!(
            tr.side_of_facet(&p, c, 3),
            Err(LocateError::Tds(TdsError::WrongDimension { .. }))
        ));
        assert!(tr.side_of_edge(&p, c).is_err());

        let line = build(FastKernel::new(), &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let beyond = Point::new([5.0, 0.0, 0.0]);
        let inside = line
            .cells()
            .filter(|&c| line.side_of_edge(&beyond, c).unwrap().side == BoundedSide::INSIDE)
            .count();
        assert_eq!(inside, 1);
    }
}
