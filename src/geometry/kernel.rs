//! Geometric kernel abstraction following CGAL's design.
//!
//! The [`Kernel`] trait is the predicate capability injected into a
//! triangulation at construction time. The triangulation data structure stays
//! purely combinatorial; every geometric decision goes through the kernel.
//!
//! Two reference kernels over [`Point<T, 3>`] are provided:
//! [`FastKernel`] (plain floating-point signs) and [`RobustKernel`]
//! (magnitude-scaled zero band, see [`RobustPredicateConfig`]).

use core::marker::PhantomData;
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::geometry::point::Point;
use crate::geometry::predicates::{BoundedSide, CollinearPosition, Orientation, triangle_normal};
use crate::geometry::robust_predicates::{
    RobustPredicateConfig, config_presets, robust_collinear, robust_coplanar_orientation,
    robust_insphere, robust_orientation,
};
use crate::geometry::traits::coordinate::{Coordinate, CoordinateScalar};

/// Geometric predicates consumed by the triangulation.
///
/// All predicates are sign-valued. A zero result ([`Orientation::DEGENERATE`],
/// [`BoundedSide::BOUNDARY`]) means degenerate or on-boundary input.
///
/// # Examples
///
/// ```
/// use triangulation3::geometry::kernel::{FastKernel, Kernel};
/// use triangulation3::geometry::point::Point;
/// use triangulation3::geometry::predicates::Orientation;
/// use triangulation3::geometry::traits::coordinate::Coordinate;
///
/// let kernel = FastKernel::<f64>::new();
/// let p = Point::new([0.0, 0.0, 0.0]);
/// let q = Point::new([1.0, 0.0, 0.0]);
/// let r = Point::new([0.0, 1.0, 0.0]);
/// let s = Point::new([0.0, 0.0, 1.0]);
/// assert_eq!(kernel.orientation(&p, &q, &r, &s), Orientation::POSITIVE);
/// assert!(kernel.coplanar(&p, &q, &r, &Point::new([3.0, 4.0, 0.0])));
/// ```
pub trait Kernel: Clone + Debug + Send + Sync {
    /// The point type stored in finite vertices.
    type Point: Clone + Debug + PartialEq + Send + Sync;

    /// Orientation of the tetrahedron `p, q, r, s`.
    fn orientation(
        &self,
        p: &Self::Point,
        q: &Self::Point,
        r: &Self::Point,
        s: &Self::Point,
    ) -> Orientation;

    /// Orientation of the coplanar triangle `p, q, r` under an orientation of
    /// their common plane that is consistent for all triples of that plane.
    fn coplanar_orientation(&self, p: &Self::Point, q: &Self::Point, r: &Self::Point)
    -> Orientation;

    /// True when `p, q, r` lie on one line.
    fn collinear(&self, p: &Self::Point, q: &Self::Point, r: &Self::Point) -> bool;

    /// Lexicographic comparison.
    fn compare_xyz(&self, p: &Self::Point, q: &Self::Point) -> Ordering;

    /// Sign of the in-sphere test; positive when `t` is inside the sphere
    /// through the positively oriented `p, q, r, s`.
    fn side_of_oriented_sphere(
        &self,
        p: &Self::Point,
        q: &Self::Point,
        r: &Self::Point,
        s: &Self::Point,
        t: &Self::Point,
    ) -> Orientation;

    /// Position of `t` relative to the circumcircle of the coplanar triangle
    /// `p, q, r`, for `t` in the same plane.
    fn coplanar_side_of_bounded_circle(
        &self,
        p: &Self::Point,
        q: &Self::Point,
        r: &Self::Point,
        t: &Self::Point,
    ) -> BoundedSide;

    /// True when `p, q, r, s` lie in one plane.
    fn coplanar(&self, p: &Self::Point, q: &Self::Point, r: &Self::Point, s: &Self::Point) -> bool {
        self.orientation(p, q, r, s) == Orientation::DEGENERATE
    }

    /// Point equality under the kernel's comparison.
    fn equal(&self, p: &Self::Point, q: &Self::Point) -> bool {
        self.compare_xyz(p, q) == Ordering::Equal
    }

    /// Position of `p` on the line `s, t` (all three collinear).
    fn collinear_position(
        &self,
        s: &Self::Point,
        p: &Self::Point,
        t: &Self::Point,
    ) -> CollinearPosition {
        let ps = self.compare_xyz(p, s);
        if ps == Ordering::Equal {
            return CollinearPosition::SOURCE;
        }
        let st = self.compare_xyz(s, t);
        if ps == st {
            return CollinearPosition::BEFORE;
        }
        let pt = self.compare_xyz(p, t);
        if pt == Ordering::Equal {
            return CollinearPosition::TARGET;
        }
        if pt == st {
            return CollinearPosition::MIDDLE;
        }
        CollinearPosition::AFTER
    }

    /// Position of `t` relative to the sphere through `p, q, r, s`,
    /// regardless of their orientation.
    fn side_of_bounded_sphere(
        &self,
        p: &Self::Point,
        q: &Self::Point,
        r: &Self::Point,
        s: &Self::Point,
        t: &Self::Point,
    ) -> BoundedSide {
        let signed = self
            .side_of_oriented_sphere(p, q, r, s, t)
            .times(self.orientation(p, q, r, s));
        match signed {
            Orientation::POSITIVE => BoundedSide::INSIDE,
            Orientation::DEGENERATE => BoundedSide::BOUNDARY,
            Orientation::NEGATIVE => BoundedSide::OUTSIDE,
        }
    }
}

// =============================================================================
// REFERENCE KERNELS
// =============================================================================

/// Fast floating-point kernel.
///
/// Signs are taken directly from the floating-point determinants. Exact for
/// small integer coordinates; may misclassify nearly-degenerate input.
/// Repeated points always yield [`Orientation::DEGENERATE`].
///
/// # Examples
///
/// ```
/// use triangulation3::geometry::kernel::{FastKernel, Kernel};
/// use triangulation3::geometry::point::Point;
/// use triangulation3::geometry::predicates::BoundedSide;
/// use triangulation3::geometry::traits::coordinate::Coordinate;
///
/// let kernel = FastKernel::<f64>::new();
/// let p = Point::new([0.0, 0.0, 0.0]);
/// let q = Point::new([2.0, 0.0, 0.0]);
/// let r = Point::new([0.0, 2.0, 0.0]);
/// let t = Point::new([0.5, 0.5, 0.0]);
/// assert_eq!(kernel.coplanar_side_of_bounded_circle(&p, &q, &r, &t), BoundedSide::INSIDE);
/// ```
#[derive(Clone, Default, Debug)]
pub struct FastKernel<T: CoordinateScalar> {
    _phantom: PhantomData<T>,
}

impl<T: CoordinateScalar> FastKernel<T> {
    /// Create a new fast kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    #[inline]
    fn predicate_config(&self) -> RobustPredicateConfig<T> {
        config_presets::exact()
    }
}

/// Robust kernel with a magnitude-scaled zero band.
///
/// # Examples
///
/// ```
/// use triangulation3::geometry::kernel::{Kernel, RobustKernel};
/// use triangulation3::geometry::point::Point;
/// use triangulation3::geometry::predicates::Orientation;
/// use triangulation3::geometry::robust_predicates::config_presets;
/// use triangulation3::geometry::traits::coordinate::Coordinate;
///
/// let kernel = RobustKernel::with_config(config_presets::degenerate_robust::<f64>());
/// let p = Point::new([0.0, 0.0, 0.0]);
/// let q = Point::new([1.0, 0.0, 0.0]);
/// let r = Point::new([0.0, 1.0, 0.0]);
/// let s = Point::new([0.2, 0.2, 1e-14]);
/// assert_eq!(kernel.orientation(&p, &q, &r, &s), Orientation::DEGENERATE);
/// ```
#[derive(Clone, Debug)]
pub struct RobustKernel<T: CoordinateScalar> {
    config: RobustPredicateConfig<T>,
}

impl<T: CoordinateScalar> RobustKernel<T> {
    /// Robust kernel using [`config_presets::general_triangulation`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: config_presets::general_triangulation(),
        }
    }

    /// Robust kernel with a custom configuration.
    #[must_use]
    pub const fn with_config(config: RobustPredicateConfig<T>) -> Self {
        Self { config }
    }

    /// The active tolerance configuration.
    #[must_use]
    pub const fn config(&self) -> &RobustPredicateConfig<T> {
        &self.config
    }

    #[inline]
    fn predicate_config(&self) -> RobustPredicateConfig<T> {
        self.config
    }
}

impl<T: CoordinateScalar> Default for RobustKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_tolerance_kernel {
    ($kernel:ident) => {
        impl<T: CoordinateScalar> Kernel for $kernel<T> {
            type Point = Point<T, 3>;

            fn orientation(
                &self,
                p: &Self::Point,
                q: &Self::Point,
                r: &Self::Point,
                s: &Self::Point,
            ) -> Orientation {
                robust_orientation([p, q, r, s], &self.predicate_config())
            }

            fn coplanar_orientation(
                &self,
                p: &Self::Point,
                q: &Self::Point,
                r: &Self::Point,
            ) -> Orientation {
                robust_coplanar_orientation([p, q, r], &self.predicate_config())
            }

            fn collinear(&self, p: &Self::Point, q: &Self::Point, r: &Self::Point) -> bool {
                robust_collinear([p, q, r], &self.predicate_config())
            }

            fn compare_xyz(&self, p: &Self::Point, q: &Self::Point) -> Ordering {
                p.cmp(q)
            }

            fn side_of_oriented_sphere(
                &self,
                p: &Self::Point,
                q: &Self::Point,
                r: &Self::Point,
                s: &Self::Point,
                t: &Self::Point,
            ) -> Orientation {
                robust_insphere([p, q, r, s, t], &self.predicate_config())
            }

            fn coplanar_side_of_bounded_circle(
                &self,
                p: &Self::Point,
                q: &Self::Point,
                r: &Self::Point,
                t: &Self::Point,
            ) -> BoundedSide {
                // Any sphere through p, q, r centred on the circle's axis cuts
                // the plane in the circumcircle; lift one point along the normal.
                let normal = triangle_normal(p, q, r);
                let base = p.coords();
                let apex = Point::new([
                    base[0] + normal[0],
                    base[1] + normal[1],
                    base[2] + normal[2],
                ]);
                match self.side_of_oriented_sphere(p, q, r, &apex, t) {
                    Orientation::POSITIVE => BoundedSide::INSIDE,
                    Orientation::DEGENERATE => BoundedSide::BOUNDARY,
                    Orientation::NEGATIVE => BoundedSide::OUTSIDE,
                }
            }
        }
    };
}

impl_tolerance_kernel!(FastKernel);
impl_tolerance_kernel!(RobustKernel);

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, z: f64) -> Point<f64, 3> {
        Point::new([x, y, z])
    }

    #[test]
    fn test_fast_kernel_orientation_3d() {
        let kernel = FastKernel::<f64>::new();
        let (p, q, r, s) = (
            pt(0.0, 0.0, 0.0),
            pt(1.0, 0.0, 0.0),
            pt(0.0, 1.0, 0.0),
            pt(0.0, 0.0, 1.0),
        );
        assert_eq!(kernel.orientation(&p, &q, &r, &s), Orientation::POSITIVE);
        assert_eq!(kernel.orientation(&q, &p, &r, &s), Orientation::NEGATIVE);
        assert!(kernel.coplanar(&p, &q, &r, &pt(5.0, -2.0, 0.0)));
    }

    #[test]
    fn test_coplanar_orientation_consistent_in_vertical_plane() {
        let kernel = FastKernel::<f64>::new();
        // Plane x = 1 projects to a line in xy, so yz decides.
        let p = pt(1.0, 0.0, 0.0);
        let q = pt(1.0, 1.0, 0.0);
        let r = pt(1.0, 0.0, 1.0);
        assert_eq!(kernel.coplanar_orientation(&p, &q, &r), Orientation::POSITIVE);
        assert_eq!(kernel.coplanar_orientation(&q, &p, &r), Orientation::NEGATIVE);
        assert_eq!(
            kernel.coplanar_orientation(&p, &q, &pt(1.0, 2.0, 0.0)),
            Orientation::DEGENERATE
        );
    }

    #[test]
    fn test_collinear_position() {
        let kernel = FastKernel::<f64>::new();
        let s = pt(0.0, 0.0, 0.0);
        let t = pt(2.0, 2.0, 2.0);
        assert_eq!(
            kernel.collinear_position(&s, &pt(-1.0, -1.0, -1.0), &t),
            CollinearPosition::BEFORE
        );
        assert_eq!(kernel.collinear_position(&s, &s, &t), CollinearPosition::SOURCE);
        assert_eq!(
            kernel.collinear_position(&s, &pt(1.0, 1.0, 1.0), &t),
            CollinearPosition::MIDDLE
        );
        assert_eq!(kernel.collinear_position(&s, &t, &t), CollinearPosition::TARGET);
        assert_eq!(
            kernel.collinear_position(&s, &pt(3.0, 3.0, 3.0), &t),
            CollinearPosition::AFTER
        );
        // Reversed segment direction.
        assert_eq!(
            kernel.collinear_position(&t, &pt(3.0, 3.0, 3.0), &s),
            CollinearPosition::BEFORE
        );
    }

    #[test]
    fn test_side_of_bounded_sphere_ignores_orientation() {
        let kernel = FastKernel::<f64>::new();
        let (p, q, r, s) = (
            pt(0.0, 0.0, 0.0),
            pt(1.0, 0.0, 0.0),
            pt(0.0, 1.0, 0.0),
            pt(0.0, 0.0, 1.0),
        );
        let inside = pt(0.25, 0.25, 0.25);
        assert_eq!(
            kernel.side_of_bounded_sphere(&p, &q, &r, &s, &inside),
            BoundedSide::INSIDE
        );
        assert_eq!(
            kernel.side_of_bounded_sphere(&q, &p, &r, &s, &inside),
            BoundedSide::INSIDE
        );
        assert_eq!(
            kernel.side_of_bounded_sphere(&p, &q, &r, &s, &pt(1.0, 1.0, 0.0)),
            BoundedSide::BOUNDARY
        );
    }

    #[test]
    fn test_coplanar_circle() {
        let kernel = RobustKernel::<f64>::new();
        let p = pt(0.0, 0.0, 1.0);
        let q = pt(2.0, 0.0, 1.0);
        let r = pt(0.0, 2.0, 1.0);
        assert_eq!(
            kernel.coplanar_side_of_bounded_circle(&p, &q, &r, &pt(1.0, 1.0, 1.0)),
            BoundedSide::INSIDE
        );
        assert_eq!(
            kernel.coplanar_side_of_bounded_circle(&p, &q, &r, &pt(2.0, 2.0, 1.0)),
            BoundedSide::BOUNDARY
        );
        assert_eq!(
            kernel.coplanar_side_of_bounded_circle(&p, &q, &r, &pt(5.0, 5.0, 1.0)),
            BoundedSide::OUTSIDE
        );
        // Reversed triangle gives the same answer.
        assert_eq!(
            kernel.coplanar_side_of_bounded_circle(&q, &p, &r, &pt(1.0, 1.0, 1.0)),
            BoundedSide::INSIDE
        );
    }

    #[test]
    fn test_repeated_points_are_degenerate_in_every_predicate() {
        let fast = FastKernel::<f64>::new();
        let (p, q, r, s) = (
            pt(1.0, 2.0, 3.0),
            pt(4.0, -1.0, 0.5),
            pt(-2.0, 3.0, 1.0),
            pt(0.3, 0.2, -4.0),
        );
        assert_eq!(fast.orientation(&p, &q, &r, &r), Orientation::DEGENERATE);
        assert_eq!(fast.orientation(&r, &q, &r, &s), Orientation::DEGENERATE);
        assert!(fast.coplanar(&p, &q, &r, &q));
        assert_eq!(fast.coplanar_orientation(&p, &q, &p), Orientation::DEGENERATE);
        assert!(fast.collinear(&p, &r, &r));
        assert_eq!(
            fast.side_of_bounded_sphere(&p, &q, &r, &s, &r),
            BoundedSide::BOUNDARY
        );

        // The axis points of a planar triangulation are coplanar with
        // themselves.
        let (a, b, c) = (
            pt(-63.498, 0.0, 0.0),
            pt(0.0, 0.0, 48.47),
            pt(0.0, 50.48, 0.0),
        );
        for point in [&a, &b, &c] {
            assert!(fast.coplanar(&a, &b, &c, point));
            assert_eq!(
                fast.coplanar_side_of_bounded_circle(&a, &b, &c, point),
                BoundedSide::BOUNDARY
            );
        }
    }

    #[test]
    fn test_kernel_consistency_fast_vs_robust() {
        let fast = FastKernel::<f64>::new();
        let robust = RobustKernel::<f64>::new();
        let (p, q, r, s) = (
            pt(0.0, 0.0, 0.0),
            pt(1.0, 0.0, 0.0),
            pt(0.5, 1.0, 0.0),
            pt(0.3, 0.3, 0.9),
        );
        assert_eq!(fast.orientation(&p, &q, &r, &s), robust.orientation(&p, &q, &r, &s));
        let t = pt(0.4, 0.4, 0.3);
        assert_eq!(
            fast.side_of_bounded_sphere(&p, &q, &r, &s, &t),
            robust.side_of_bounded_sphere(&p, &q, &r, &s, &t)
        );
    }
}
