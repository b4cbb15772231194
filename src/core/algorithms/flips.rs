//! Bistellar flips in dimension 3.
//!
//! - 2-3: the two cells sharing a facet become three cells around the edge
//!   joining their opposite vertices.
//! - 3-2: the three cells around an edge of degree 3 become two cells sharing
//!   the triangle of their other vertices.
//!
//! [`flip`](Triangulation3::flip) and [`flip_edge`](Triangulation3::flip_edge)
//! answer `Ok(false)` when the move would break the triangulation (an
//! infinite cell is involved, the edge or triangle already exists, or a new
//! cell is not positively oriented). The `flip_flippable*` variants turn
//! that answer into [`FlipError::NotFlippable`].

use crate::core::collections::MAX_CELL_SLOTS;
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, TdsError, VertexKey};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::Orientation;

/// Error during a flip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlipError {
    /// Flips are only defined in dimension 3.
    #[error("Flips need dimension 3, got {0}")]
    WrongDimension(i32),

    /// The cell key is stale.
    #[error("Cell {0:?} is not in this triangulation")]
    UnknownCell(CellKey),

    /// A vertex index is not in `0..4`, or the two edge indices coincide.
    #[error("Index {index} is not a valid slot for this flip")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
    },

    /// The checked variant was called on a configuration that cannot flip.
    #[error("Not flippable: {0}")]
    NotFlippable(&'static str),

    /// A topology primitive refused the operation.
    #[error(transparent)]
    Tds(#[from] TdsError),
}

/// Outcome of checking a flip before mutating.
enum FlipPlan {
    Ready(Vec<CellKey>, Vec<[VertexKey; MAX_CELL_SLOTS]>),
    Refused(&'static str),
}

impl<K: Kernel> Triangulation3<K> {
    fn check_flip_args(&self, c: CellKey, slots: &[usize]) -> Result<(), FlipError> {
        let dimension = self.dimension();
        if dimension != 3 {
            return Err(FlipError::WrongDimension(dimension));
        }
        if !self.tds.contains_cell(c) {
            return Err(FlipError::UnknownCell(c));
        }
        if let Some(&index) = slots.iter().find(|&&i| i >= 4) {
            return Err(FlipError::IndexOutOfRange { index });
        }
        if let [i, j] = slots
            && i == j
        {
            return Err(FlipError::IndexOutOfRange { index: *j });
        }
        Ok(())
    }

    /// True when every tuple is a finite, positively oriented tetrahedron.
    fn all_positive(&self, tuples: &[[VertexKey; MAX_CELL_SLOTS]]) -> bool {
        tuples.iter().all(|tuple| {
            matches!(
                tuple.map(|v| self.tds.point(v)),
                [Some(p0), Some(p1), Some(p2), Some(p3)]
                    if self.kernel.orientation(p0, p1, p2, p3) == Orientation::POSITIVE
            )
        })
    }

    fn plan_facet_flip(&self, c: CellKey, i: usize) -> Result<FlipPlan, FlipError> {
        self.check_flip_args(c, &[i])?;
        let n = self.tds.checked_cell(c)?.neighbor(i);
        if self.is_infinite_cell(c) || self.is_infinite_cell(n) {
            return Ok(FlipPlan::Refused("an infinite cell shares the facet"));
        }
        let (n, tuples) = match self.tds.plan_flip_2_3(c, i) {
            Ok(plan) => plan,
            Err(TdsError::NotFlippable { reason }) => return Ok(FlipPlan::Refused(reason)),
            Err(err) => return Err(err.into()),
        };
        if !self.all_positive(&tuples) {
            return Ok(FlipPlan::Refused("a new cell would not be positively oriented"));
        }
        Ok(FlipPlan::Ready(vec![c, n], tuples.to_vec()))
    }

    fn plan_edge_flip(&self, c: CellKey, i: usize, j: usize) -> Result<FlipPlan, FlipError> {
        self.check_flip_args(c, &[i, j])?;
        let (ring, tuples) = match self.tds.plan_flip_3_2(c, i, j) {
            Ok(plan) => plan,
            Err(TdsError::NotFlippable { reason }) => return Ok(FlipPlan::Refused(reason)),
            Err(err) => return Err(err.into()),
        };
        if ring.iter().any(|&r| self.is_infinite_cell(r)) {
            return Ok(FlipPlan::Refused("an infinite cell surrounds the edge"));
        }
        if !self.all_positive(&tuples) {
            return Ok(FlipPlan::Refused("a new cell would not be positively oriented"));
        }
        Ok(FlipPlan::Ready(ring.to_vec(), tuples.to_vec()))
    }

    fn apply_flip(&mut self, plan: FlipPlan, operation: &'static str) -> Result<bool, FlipError> {
        match plan {
            FlipPlan::Ready(old, tuples) => {
                let rewrite = self.tds.rewrite_region(&old, &tuples)?;
                tracing::trace!(operation, created = rewrite.new_cells.len(), "flipped");
                self.after_mutation(operation);
                Ok(true)
            }
            FlipPlan::Refused(reason) => {
                tracing::trace!(operation, reason, "flip refused");
                Ok(false)
            }
        }
    }

    /// 2-3 flip of the facet opposite vertex `i` of `c`.
    ///
    /// Returns `Ok(false)`, leaving the triangulation untouched, when the
    /// flip is not possible.
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3, for a stale cell or for
    /// `i >= 4`.
    pub fn flip(&mut self, c: CellKey, i: usize) -> Result<bool, FlipError> {
        let plan = self.plan_facet_flip(c, i)?;
        self.apply_flip(plan, "flip")
    }

    /// 3-2 flip of the edge joining vertices `i` and `j` of `c`.
    ///
    /// Returns `Ok(false)`, leaving the triangulation untouched, when the
    /// flip is not possible.
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3, for a stale cell or for bad
    /// indices.
    pub fn flip_edge(&mut self, c: CellKey, i: usize, j: usize) -> Result<bool, FlipError> {
        let plan = self.plan_edge_flip(c, i, j)?;
        self.apply_flip(plan, "flip_edge")
    }

    /// [`flip`](Self::flip) for a facet the caller knows to be flippable.
    ///
    /// # Errors
    ///
    /// Returns [`FlipError::NotFlippable`] when it is not, plus the errors of
    /// [`flip`](Self::flip).
    pub fn flip_flippable(&mut self, c: CellKey, i: usize) -> Result<(), FlipError> {
        match self.plan_facet_flip(c, i)? {
            FlipPlan::Refused(reason) => Err(FlipError::NotFlippable(reason)),
            plan => self.apply_flip(plan, "flip_flippable").map(|_| ()),
        }
    }

    /// [`flip_edge`](Self::flip_edge) for an edge the caller knows to be
    /// flippable.
    ///
    /// # Errors
    ///
    /// Returns [`FlipError::NotFlippable`] when it is not, plus the errors of
    /// [`flip_edge`](Self::flip_edge).
    pub fn flip_flippable_edge(&mut self, c: CellKey, i: usize, j: usize) -> Result<(), FlipError> {
        match self.plan_edge_flip(c, i, j)? {
            FlipPlan::Refused(reason) => Err(FlipError::NotFlippable(reason)),
            plan => self.apply_flip(plan, "flip_flippable_edge").map(|_| ()),
        }
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

    /// Two tetrahedra glued on the triangle `z = 0`, apexes at `top` and
    /// `bottom`.
    fn bipyramid(top: Point<f64, 3>, bottom: Point<f64, 3>) -> (Tr, VertexKey, VertexKey) {
        let mut tr = Tr::default();
        tr.insert_points([pt(0.0, 0.0, 0.0), pt(2.0, 0.0, 0.0), pt(0.0, 2.0, 0.0)])
            .unwrap();
        let a = tr.insert(top, None).unwrap();
        let b = tr.insert(bottom, None).unwrap();
        assert_eq!(tr.number_of_finite_cells(), 2);
        (tr, a, b)
    }

    fn shared_facet(tr: &Tr, apex: VertexKey) -> (CellKey, usize) {
        let c = tr
            .finite_cells()
            .find(|&c| tr.tds().has_vertex(c, apex))
            .unwrap();
        (c, tr.tds().index_of(c, apex).unwrap())
    }

    #[test]
    fn test_flip_and_flip_back() {
        let (mut tr, a, b) = bipyramid(pt(0.5, 0.5, 1.0), pt(0.5, 0.5, -1.0));
        let before = tr.clone();
        let (c, i) = shared_facet(&tr, a);
        assert!(tr.flip(c, i).unwrap());
        assert_eq!(tr.number_of_finite_cells(), 3);
        assert!(tr.is_valid(true));

        let edge = tr.tds().is_edge(a, b).unwrap();
        assert_eq!(tr.tds().cells_around_edge(edge.cell, edge.i, edge.j).unwrap().len(), 3);
        assert!(tr.flip_edge(edge.cell, edge.i, edge.j).unwrap());
        assert!(tr.is_valid(true));
        assert!(tr == before);
    }

    #[test]
    fn test_non_convex_pair_is_refused() {
        let (mut tr, a, _) = bipyramid(pt(3.0, 3.0, 1.0), pt(3.0, 3.0, -1.0));
        let before = tr.clone();
        let (c, i) = shared_facet(&tr, a);
        assert!(!tr.flip(c, i).unwrap());
        assert!(tr == before);
        assert!(matches!(tr.flip_flippable(c, i), Err(FlipError::NotFlippable(_))));
    }

    #[test]
    fn test_infinite_neighbor_is_refused() {
        let (mut tr, _, _) = bipyramid(pt(0.5, 0.5, 1.0), pt(0.5, 0.5, -1.0));
        let before = tr.clone();
        let c = tr.finite_cells().next().unwrap();
        let hull_slot = (0..4)
            .find(|&k| tr.is_infinite_cell(tr.tds().cell(c).unwrap().neighbor(k)))
            .unwrap();
        assert!(!tr.flip(c, hull_slot).unwrap());
        assert!(tr == before);
    }

    #[test]
    fn test_edge_of_wrong_degree() {
        let (mut tr, a, _) = bipyramid(pt(0.5, 0.5, 1.0), pt(0.5, 0.5, -1.0));
        let (c, i) = shared_facet(&tr, a);
        let j = (i + 1) % 4;
        assert!(!tr.flip_edge(c, i, j).unwrap());
        assert!(matches!(
            tr.flip_flippable_edge(c, i, j),
            Err(FlipError::NotFlippable(_))
        ));
    }

    #[test]
    fn test_bad_arguments() {
        let (mut tr, a, _) = bipyramid(pt(0.5, 0.5, 1.0), pt(0.5, 0.5, -1.0));
        let (c, _) = shared_facet(&tr, a);
        assert_eq!(tr.flip(c, 4), Err(FlipError::IndexOutOfRange { index: 4 }));
        assert_eq!(tr.flip_edge(c, 1, 1), Err(FlipError::IndexOutOfRange { index: 1 }));

        let mut flat = Tr::default();
        flat.insert_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0)])
            .unwrap();
        let f = flat.finite_cells().next().unwrap();
        assert_eq!(flat.flip(f, 0), Err(FlipError::WrongDimension(2)));

        tr.clear();
        assert_eq!(tr.flip(c, 0), Err(FlipError::WrongDimension(-1)));
    }
}
