//! Conflict regions and the hooks higher layers plug into insertion.
//!
//! A conflict region is the connected set of cells, containing a seed, whose
//! members satisfy a [`ConflictTester`]. Insertion replaces it by the star
//! of the new vertex. The plain triangulation uses [`HullConflictTester`] for
//! points outside the convex hull; the Delaunay layer plugs in its
//! empty-sphere test.
//!
//! Per-cell conflict state lives in a side table owned by the call, so the
//! cells themselves carry no scratch fields.

use std::cmp::Ordering;

use crate::core::collections::{CellKeyBuffer, CellSecondaryMap, FacetBuffer};
use crate::core::facet::Facet;
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, VertexKey};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::BoundedSide;

// =============================================================================
// TRAITS
// =============================================================================

/// Decides which cells a point being inserted conflicts with.
///
/// Any `Fn(&Triangulation3<K>, CellKey) -> bool` closure is a tester.
pub trait ConflictTester<K: Kernel> {
    /// True when `cell` must be removed to insert the point.
    fn in_conflict(&self, tr: &Triangulation3<K>, cell: CellKey) -> bool;

    /// Orders the new point against an existing vertex at the same place.
    ///
    /// `Greater` replaces the vertex, `Less` hides the new point, `Equal`
    /// (the default) keeps the existing vertex.
    fn compare_weight(&self, _new: &K::Point, _existing: &K::Point) -> Ordering {
        Ordering::Equal
    }

    /// Test applied to the located cell before flooding. When it fails the
    /// new point is hidden.
    fn test_initial_cell(&self, tr: &Triangulation3<K>, cell: CellKey) -> bool {
        self.in_conflict(tr, cell)
    }
}

impl<K, F> ConflictTester<K> for F
where
    K: Kernel,
    F: Fn(&Triangulation3<K>, CellKey) -> bool,
{
    fn in_conflict(&self, tr: &Triangulation3<K>, cell: CellKey) -> bool {
        self(tr, cell)
    }
}

/// Observer of points that end up without a vertex.
///
/// Regular-triangulation layers use it to keep hidden points attached to the
/// cells covering them. Every method defaults to doing nothing.
pub trait HiddenPointVisitor<K: Kernel> {
    /// A point was hidden inside `cell`: either the point being inserted or
    /// the point of a vertex that lost all its cells.
    fn hide_point(&mut self, _cell: CellKey, _point: K::Point) {}

    /// `cells` are about to be deleted.
    fn process_cells_in_conflict(&mut self, _tr: &Triangulation3<K>, _cells: &[CellKey]) {}

    /// The star of the new vertex `v` was just created.
    fn reinsert_vertices(&mut self, _tr: &Triangulation3<K>, _v: VertexKey) {}

    /// The vertex at `index` of `cell` is about to get `point`.
    fn replace_vertex(&mut self, _cell: CellKey, _index: usize, _point: &K::Point) {}

    /// Removal created `cells` to fill the hole.
    fn reinsert_in_cells(&mut self, _tr: &Triangulation3<K>, _cells: &[CellKey]) {}
}

/// The visitor used by the plain entry points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoHiddenPoints;

impl<K: Kernel> HiddenPointVisitor<K> for NoHiddenPoints {}

/// Conflict test for a point outside the convex hull: an infinite cell is in
/// conflict when its finite facet sees the point.
#[derive(Debug)]
pub struct HullConflictTester<'a, K: Kernel> {
    point: &'a K::Point,
}

impl<'a, K: Kernel> HullConflictTester<'a, K> {
    /// Tester for `point`.
    #[must_use]
    pub const fn new(point: &'a K::Point) -> Self {
        Self { point }
    }
}

impl<K: Kernel> ConflictTester<K> for HullConflictTester<'_, K> {
    fn in_conflict(&self, tr: &Triangulation3<K>, cell: CellKey) -> bool {
        let side = match tr.dimension() {
            3 => tr.side_of_cell(self.point, cell),
            2 => tr.side_of_facet(self.point, cell, 3),
            _ => return false,
        };
        side.is_ok_and(|s| s.side == BoundedSide::INSIDE)
    }
}

// =============================================================================
// REGION
// =============================================================================

/// Conflict state of a visited cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConflictFlag {
    InConflict,
    Boundary,
}

/// Result of [`find_conflicts`].
#[derive(Clone, Debug, Default)]
pub struct ConflictRegion {
    /// Cells in conflict, seed first.
    pub cells: CellKeyBuffer,
    /// Facets of conflict cells whose neighbor is not in conflict, seen from
    /// the conflict side.
    pub boundary_facets: FacetBuffer,
    /// Facets shared by two conflict cells, each reported once.
    pub internal_facets: FacetBuffer,
}

/// Error from [`find_conflicts`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    /// Conflict regions are only defined in dimensions 2 and 3.
    #[error("Conflict regions need dimension 2 or 3, got {0}")]
    WrongDimension(i32),

    /// The seed is not a live cell.
    #[error("Seed {0:?} is not a cell of this triangulation")]
    InvalidSeed(CellKey),

    /// The seed does not satisfy the tester.
    #[error("Seed {0:?} is not in conflict")]
    SeedNotInConflict(CellKey),
}

/// Floods the conflict region containing `seed`.
///
/// # Errors
///
/// Returns an error below dimension 2, for a stale seed, or for a seed that
/// fails the tester.
///
/// # Examples
///
/// ```rust
/// use triangulation3::core::algorithms::conflict::{HullConflictTester, find_conflicts};
/// use triangulation3::core::algorithms::locate::LocateType;
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
///     tr.insert(Point::new(p), None).unwrap();
/// }
/// let p = Point::new([1.0, 1.0, 1.0]);
/// let loc = tr.locate(&p, None).unwrap();
/// assert_eq!(loc.kind, LocateType::OutsideConvexHull);
/// let region = find_conflicts(&tr, loc.cell, &HullConflictTester::<FastKernel<f64>>::new(&p)).unwrap();
/// // Only the slanted facet is visible.
/// assert_eq!(region.cells.len(), 1);
/// assert_eq!(region.boundary_facets.len(), 4);
/// ```
pub fn find_conflicts<K, T>(
    tr: &Triangulation3<K>,
    seed: CellKey,
    tester: &T,
) -> Result<ConflictRegion, ConflictError>
where
    K: Kernel,
    T: ConflictTester<K> + ?Sized,
{
    let dimension = tr.dimension();
    if !(2..=3).contains(&dimension) {
        return Err(ConflictError::WrongDimension(dimension));
    }
    if !tr.tds().contains_cell(seed) {
        return Err(ConflictError::InvalidSeed(seed));
    }
    if !tester.in_conflict(tr, seed) {
        return Err(ConflictError::SeedNotInConflict(seed));
    }

    let arity = tr.tds().arity();
    let mut flags: CellSecondaryMap<ConflictFlag> = CellSecondaryMap::new();
    let mut region = ConflictRegion::default();
    let mut stack = vec![seed];
    flags.insert(seed, ConflictFlag::InConflict);

    while let Some(c) = stack.pop() {
        region.cells.push(c);
        let Some(cell) = tr.tds().cell(c) else {
            continue;
        };
        for i in 0..arity {
            let n = cell.neighbor(i);
            let flag = if let Some(&flag) = flags.get(n) {
                flag
            } else {
                let flag = if tester.in_conflict(tr, n) {
                    stack.push(n);
                    ConflictFlag::InConflict
                } else {
                    ConflictFlag::Boundary
                };
                flags.insert(n, flag);
                flag
            };
            match flag {
                ConflictFlag::InConflict if c < n => region.internal_facets.push(Facet::new(c, i)),
                ConflictFlag::InConflict => {}
                ConflictFlag::Boundary => region.boundary_facets.push(Facet::new(c, i)),
            }
        }
    }
    tracing::trace!(
        cells = region.cells.len(),
        boundary = region.boundary_facets.len(),
        "conflict region"
    );
    Ok(region)
}

impl<K: Kernel> Triangulation3<K> {
    /// Floods the conflict region of `tester` from `seed`; see
    /// [`find_conflicts`].
    ///
    /// # Errors
    ///
    /// See [`find_conflicts`].
    pub fn find_conflicts<T>(&self, seed: CellKey, tester: &T) -> Result<ConflictRegion, ConflictError>
    where
        T: ConflictTester<K> + ?Sized,
    {
        find_conflicts(self, seed, tester)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::FastHashSet;
    use crate::geometry::kernel::FastKernel;
    use crate::geometry::point::Point;
    use crate::geometry::traits::coordinate::Coordinate;

    fn cube() -> Triangulation3<FastKernel<f64>> {
        let mut tr = Triangulation3::new(FastKernel::new());
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    tr.insert(Point::new([x, y, z]), None).unwrap();
                }
            }
        }
        tr
    }

    #[test]
    fn test_whole_triangulation_region() {
        let tr = cube();
        let seed = tr.cells().next().unwrap();
        let everything = |_: &Triangulation3<FastKernel<f64>>, _: CellKey| true;
        let region = find_conflicts(&tr, seed, &everything).unwrap();
        assert_eq!(region.cells.len(), tr.number_of_cells());
        assert!(region.boundary_facets.is_empty());
        // Every facet is shared by two cells.
        assert_eq!(region.internal_facets.len(), tr.number_of_cells() * 4 / 2);
        let unique: FastHashSet<_> = region.cells.iter().collect();
        assert_eq!(unique.len(), region.cells.len());
    }

    #[test]
    fn test_finite_region_is_bounded_by_hull() {
        let tr = cube();
        let seed = tr.finite_cells().next().unwrap();
        let finite = |t: &Triangulation3<FastKernel<f64>>, c: CellKey| !t.is_infinite_cell(c);
        let region = tr.find_conflicts(seed, &finite).unwrap();
        assert_eq!(region.cells.len(), tr.number_of_finite_cells());
        // Twelve hull triangles on the six square faces.
        assert_eq!(region.boundary_facets.len(), 12);
        for facet in &region.boundary_facets {
            let n = tr.tds().cell(facet.cell).unwrap().neighbor(facet.index);
            assert!(tr.is_infinite_cell(n));
        }
    }

    #[test]
    fn test_seed_must_conflict() {
        let tr = cube();
        let seed = tr.cells().next().unwrap();
        let nothing = |_: &Triangulation3<FastKernel<f64>>, _: CellKey| false;
        assert_eq!(
            find_conflicts(&tr, seed, &nothing).unwrap_err(),
            ConflictError::SeedNotInConflict(seed)
        );
    }

    #[test]
    fn test_low_dimension_rejected() {
        let mut tr = Triangulation3::new(FastKernel::<f64>::new());
        tr.insert(Point::new([0.0, 0.0, 0.0]), None).unwrap();
        tr.insert(Point::new([1.0, 0.0, 0.0]), None).unwrap();
        let seed = tr.cells().next().unwrap();
        let everything = |_: &Triangulation3<FastKernel<f64>>, _: CellKey| true;
        assert_eq!(
            find_conflicts(&tr, seed, &everything).unwrap_err(),
            ConflictError::WrongDimension(1)
        );
    }
}
