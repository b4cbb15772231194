//! Sign-valued geometric predicates on 3D points.
//!
//! All determinants are evaluated directly in the coordinate scalar type.
//! The sign conventions are:
//!
//! - `orientation(p, q, r, s)` is the sign of `det[q - p, r - p, s - p]`, so
//!   `(0,0,0), (1,0,0), (0,1,0), (0,0,1)` is [`Orientation::POSITIVE`].
//! - `coplanar_orientation(p, q, r)` is the 2D orientation of the first
//!   non-degenerate axis-aligned projection (xy, then yz, then xz). It is
//!   consistent for all triples lying in one plane.
//! - `side_of_oriented_sphere(p, q, r, s, t)` is positive when `t` is inside
//!   the sphere through a positively oriented `p, q, r, s`.

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use std::cmp::Ordering;

/// Sign of an orientation determinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Negative determinant.
    NEGATIVE,
    /// Zero determinant: coplanar / collinear input.
    DEGENERATE,
    /// Positive determinant.
    POSITIVE,
}

impl Orientation {
    /// The opposite sign.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::NEGATIVE => Self::POSITIVE,
            Self::DEGENERATE => Self::DEGENERATE,
            Self::POSITIVE => Self::NEGATIVE,
        }
    }

    /// Product of two signs.
    #[must_use]
    pub const fn times(self, other: Self) -> Self {
        match (self, other) {
            (Self::DEGENERATE, _) | (_, Self::DEGENERATE) => Self::DEGENERATE,
            (Self::POSITIVE, Self::POSITIVE) | (Self::NEGATIVE, Self::NEGATIVE) => Self::POSITIVE,
            _ => Self::NEGATIVE,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Position of a point relative to a bounded region (simplex, circle, sphere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundedSide {
    /// Strictly inside.
    INSIDE,
    /// On the boundary.
    BOUNDARY,
    /// Strictly outside.
    OUTSIDE,
}

impl std::fmt::Display for BoundedSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::INSIDE => write!(f, "INSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::OUTSIDE => write!(f, "OUTSIDE"),
        }
    }
}

/// Position of `p` on the line through `s` and `t`, for collinear input.
///
/// ```text
/// ---------- s ---------- t ----------
///  BEFORE  SOURCE MIDDLE TARGET AFTER
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollinearPosition {
    /// Beyond `s`, away from `t`.
    BEFORE,
    /// Equal to `s`.
    SOURCE,
    /// Strictly between `s` and `t`.
    MIDDLE,
    /// Equal to `t`.
    TARGET,
    /// Beyond `t`, away from `s`.
    AFTER,
}

// =============================================================================
// RAW DETERMINANTS
// =============================================================================

#[inline]
fn sub<T: CoordinateScalar>(a: &Point<T, 3>, b: &Point<T, 3>) -> [T; 3] {
    let a = a.coords();
    let b = b.coords();
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross<T: CoordinateScalar>(u: [T; 3], v: [T; 3]) -> [T; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

#[inline]
fn dot<T: CoordinateScalar>(u: [T; 3], v: [T; 3]) -> T {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

#[inline]
fn det3<T: CoordinateScalar>(a: [T; 3], b: [T; 3], c: [T; 3]) -> T {
    dot(a, cross(b, c))
}

/// True when two of `points` are equal.
pub fn has_coincident_points<T: CoordinateScalar>(points: &[&Point<T, 3>]) -> bool {
    points
        .iter()
        .enumerate()
        .any(|(i, p)| points[i + 1..].contains(p))
}

/// `points` in lexicographic order, and whether the sorting permutation is
/// odd.
fn lexicographic_order<T: CoordinateScalar, const N: usize>(
    mut points: [&Point<T, 3>; N],
) -> ([&Point<T, 3>; N], bool) {
    let mut odd = false;
    for i in 1..N {
        let mut j = i;
        while j > 0 && points[j - 1] > points[j] {
            points.swap(j - 1, j);
            odd = !odd;
            j -= 1;
        }
    }
    (points, odd)
}

/// `det[q - p, r - p, s - p]`.
///
/// Exactly zero when two of the points are equal. The determinant is
/// evaluated on the points in lexicographic order, so every permutation of
/// the same four points yields the same magnitude and the permutation's
/// sign.
pub fn orient3d_det<T: CoordinateScalar>(
    p: &Point<T, 3>,
    q: &Point<T, 3>,
    r: &Point<T, 3>,
    s: &Point<T, 3>,
) -> T {
    // Two equal rows leave a rounding residue instead of zero.
    if has_coincident_points(&[p, q, r, s]) {
        return T::zero();
    }
    let ([a, b, c, d], odd) = lexicographic_order([p, q, r, s]);
    let det = det3(sub(b, a), sub(c, a), sub(d, a));
    if odd { -det } else { det }
}

/// 2D orientation determinant of the projection on axes `(i, j)`.
///
/// Exactly zero when two of the points are equal, and antisymmetric under
/// any permutation of the points.
pub fn orient2d_det<T: CoordinateScalar>(
    p: &Point<T, 3>,
    q: &Point<T, 3>,
    r: &Point<T, 3>,
    axes: (usize, usize),
) -> T {
    if has_coincident_points(&[p, q, r]) {
        return T::zero();
    }
    let (i, j) = axes;
    let ([p, q, r], odd) = lexicographic_order([p, q, r]);
    let (p, q, r) = (p.coords(), q.coords(), r.coords());
    let det = (q[i] - p[i]) * (r[j] - p[j]) - (q[j] - p[j]) * (r[i] - p[i]);
    if odd { -det } else { det }
}

/// The three projection planes tried by `coplanar_orientation`, in order.
pub const PROJECTION_AXES: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// Cross product of `q - p` and `r - p`.
pub fn triangle_normal<T: CoordinateScalar>(
    p: &Point<T, 3>,
    q: &Point<T, 3>,
    r: &Point<T, 3>,
) -> [T; 3] {
    cross(sub(q, p), sub(r, p))
}

/// Lifted in-sphere determinant, negated so that the value is positive when
/// `t` lies inside the sphere through the positively oriented `p, q, r, s`.
///
/// Exactly zero when two of the five points are equal.
pub fn insphere_det<T: CoordinateScalar>(
    p: &Point<T, 3>,
    q: &Point<T, 3>,
    r: &Point<T, 3>,
    s: &Point<T, 3>,
    t: &Point<T, 3>,
) -> T {
    // A point of the sphere, or a sphere through a repeated point.
    if has_coincident_points(&[p, q, r, s, t]) {
        return T::zero();
    }
    let rows = [sub(p, t), sub(q, t), sub(r, t), sub(s, t)];
    let lifted = rows.map(|v| dot(v, v));
    // Cofactor expansion along the lifted column.
    let minor = |skip: usize| {
        let mut m = [[T::zero(); 3]; 3];
        let mut k = 0;
        for (i, row) in rows.iter().enumerate() {
            if i != skip {
                m[k] = *row;
                k += 1;
            }
        }
        det3(m[0], m[1], m[2])
    };
    // det of the 4x4 [rows | lifted] expanded along column 3:
    // sum_i (-1)^(i+3) * lifted[i] * minor(i)
    let det = -lifted[0] * minor(0) + lifted[1] * minor(1) - lifted[2] * minor(2)
        + lifted[3] * minor(3);
    -det
}

/// Largest absolute coordinate difference between `points` and the first
/// point, used to scale tolerances.
pub fn coordinate_scale<T: CoordinateScalar>(points: &[&Point<T, 3>]) -> T {
    let Some(first) = points.first() else {
        return T::zero();
    };
    let mut scale = T::zero();
    for p in &points[1..] {
        for v in sub(p, first) {
            scale = scale.max(v.abs());
        }
    }
    scale
}

/// Classifies `value` with a symmetric zero band of width `tolerance`.
#[inline]
pub fn sign_with_tolerance<T: CoordinateScalar>(value: T, tolerance: T) -> Orientation {
    if value > tolerance {
        Orientation::POSITIVE
    } else if value < -tolerance {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Lexicographic comparison of two points.
pub fn compare_xyz<T: CoordinateScalar>(p: &Point<T, 3>, q: &Point<T, 3>) -> Ordering {
    p.cmp(q)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::traits::coordinate::Coordinate;
    use approx::assert_relative_eq;

    fn unit_tetrahedron() -> [Point<f64, 3>; 4] {
        [
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_orient3d_sign_convention() {
        let [p, q, r, s] = unit_tetrahedron();
        assert_relative_eq!(orient3d_det(&p, &q, &r, &s), 1.0);
        assert_relative_eq!(orient3d_det(&q, &p, &r, &s), -1.0);
    }

    /// Coordinates for which the rounded cofactor expansion of two equal
    /// rows is not zero.
    fn skewed_tetrahedron() -> [Point<f64, 3>; 4] {
        [
            Point::new([1.0, 2.0, 3.0]),
            Point::new([4.0, -1.0, 0.5]),
            Point::new([-2.0, 3.0, 1.0]),
            Point::new([0.3, 0.2, -4.0]),
        ]
    }

    #[test]
    fn test_orient3d_coincident_points_are_degenerate() {
        let base = skewed_tetrahedron();
        for i in 0..4 {
            for j in (0..4).filter(|&j| j != i) {
                let mut pts = base;
                pts[j] = pts[i];
                let det = orient3d_det(&pts[0], &pts[1], &pts[2], &pts[3]);
                assert_eq!(
                    sign_with_tolerance(det, 0.0),
                    Orientation::DEGENERATE,
                    "point {i} repeated at {j}"
                );
            }
        }
    }

    #[test]
    fn test_orient3d_is_antisymmetric() {
        let [p, q, r, s] = skewed_tetrahedron();
        let det = orient3d_det(&p, &q, &r, &s);
        assert_eq!(orient3d_det(&q, &p, &r, &s).to_bits(), (-det).to_bits());
        assert_eq!(orient3d_det(&p, &r, &s, &q).to_bits(), det.to_bits());
        assert_eq!(orient3d_det(&s, &r, &q, &p).to_bits(), det.to_bits());
    }

    #[test]
    fn test_orient2d_coincident_points_are_degenerate() {
        let [p, q, r, _] = skewed_tetrahedron();
        for axes in PROJECTION_AXES {
            for (a, b, c) in [(&p, &q, &p), (&p, &q, &q), (&r, &r, &q)] {
                let det = orient2d_det(a, b, c, axes);
                assert_eq!(sign_with_tolerance(det, 0.0), Orientation::DEGENERATE);
            }
            let det = orient2d_det(&p, &q, &r, axes);
            assert_eq!(orient2d_det(&q, &p, &r, axes).to_bits(), (-det).to_bits());
        }
    }

    #[test]
    fn test_insphere_coincident_points_are_degenerate() {
        let [p, q, r, s] = skewed_tetrahedron();
        for t in [&p, &q, &r, &s] {
            let det = insphere_det(&p, &q, &r, &s, t);
            assert_eq!(sign_with_tolerance(det, 0.0), Orientation::DEGENERATE);
        }
        let det = insphere_det(&p, &q, &q, &s, &Point::new([0.0, 0.0, 0.0]));
        assert_eq!(sign_with_tolerance(det, 0.0), Orientation::DEGENERATE);
    }

    #[test]
    fn test_has_coincident_points() {
        let [p, q, r, _] = skewed_tetrahedron();
        assert!(!has_coincident_points(&[&p, &q, &r]));
        assert!(has_coincident_points(&[&p, &q, &r, &q]));
        assert!(!has_coincident_points::<f64>(&[]));
    }

    #[test]
    fn test_insphere_det_inside_and_outside() {
        let [p, q, r, s] = unit_tetrahedron();
        let inside = Point::new([0.25, 0.25, 0.25]);
        let outside = Point::new([10.0, 10.0, 10.0]);
        assert!(insphere_det(&p, &q, &r, &s, &inside) > 0.0);
        assert!(insphere_det(&p, &q, &r, &s, &outside) < 0.0);
        // Vertex of the tetrahedron lies on the sphere.
        assert_relative_eq!(insphere_det(&p, &q, &r, &s, &q), 0.0);
    }

    #[test]
    fn test_orient2d_projection() {
        let p = Point::new([0.0, 0.0, 5.0]);
        let q = Point::new([1.0, 0.0, 5.0]);
        let r = Point::new([0.0, 1.0, 5.0]);
        assert_relative_eq!(orient2d_det(&p, &q, &r, (0, 1)), 1.0);
        assert_relative_eq!(orient2d_det(&p, &q, &r, (1, 2)), 0.0);
    }

    #[test]
    fn test_sign_helpers() {
        assert_eq!(sign_with_tolerance(1e-20, 1e-15), Orientation::DEGENERATE);
        assert_eq!(sign_with_tolerance(-1.0, 0.0), Orientation::NEGATIVE);
        assert_eq!(
            Orientation::NEGATIVE.times(Orientation::NEGATIVE),
            Orientation::POSITIVE
        );
        assert_eq!(Orientation::POSITIVE.reversed(), Orientation::NEGATIVE);
    }

    #[test]
    fn test_coordinate_scale() {
        let [p, q, r, s] = unit_tetrahedron();
        assert_relative_eq!(coordinate_scale(&[&p, &q, &r, &s]), 1.0);
        assert_relative_eq!(coordinate_scale::<f64>(&[]), 0.0);
    }
}
