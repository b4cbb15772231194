//! Tolerance-aware variants of the predicates in [`crate::geometry::predicates`].
//!
//! Each determinant is compared against a zero band that grows with the
//! magnitude of the operands, so nearly-degenerate input is classified as
//! degenerate instead of receiving an arbitrary sign.

use crate::geometry::point::Point;
use crate::geometry::predicates::{
    Orientation, PROJECTION_AXES, coordinate_scale, insphere_det, orient2d_det, orient3d_det,
    sign_with_tolerance, triangle_normal,
};
use crate::geometry::traits::coordinate::CoordinateScalar;
use num_traits::cast;

/// Configuration for robust geometric predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustPredicateConfig<T> {
    /// Base tolerance for degenerate case detection
    pub base_tolerance: T,
    /// Relative tolerance factor (multiplied by the operand magnitude raised
    /// to the degree of the determinant)
    pub relative_tolerance_factor: T,
}

impl<T: CoordinateScalar> Default for RobustPredicateConfig<T> {
    fn default() -> Self {
        config_presets::general_triangulation()
    }
}

impl<T: CoordinateScalar> RobustPredicateConfig<T> {
    /// Zero band for a determinant of polynomial `degree` over operands of
    /// magnitude `scale`.
    #[must_use]
    pub fn tolerance(&self, scale: T, degree: i32) -> T {
        self.base_tolerance + self.relative_tolerance_factor * scale.powi(degree)
    }
}

/// Orientation of `p, q, r, s` with an adaptive zero band.
pub fn robust_orientation<T: CoordinateScalar>(
    points: [&Point<T, 3>; 4],
    config: &RobustPredicateConfig<T>,
) -> Orientation {
    let [p, q, r, s] = points;
    let scale = coordinate_scale(&[p, q, r, s]);
    sign_with_tolerance(orient3d_det(p, q, r, s), config.tolerance(scale, 3))
}

/// Projected 2D orientation on `axes` with an adaptive zero band.
pub fn robust_orientation_2d<T: CoordinateScalar>(
    points: [&Point<T, 3>; 3],
    axes: (usize, usize),
    config: &RobustPredicateConfig<T>,
) -> Orientation {
    let [p, q, r] = points;
    let scale = coordinate_scale(&[p, q, r]);
    sign_with_tolerance(orient2d_det(p, q, r, axes), config.tolerance(scale, 2))
}

/// Orientation of the coplanar triangle `p, q, r`, taken from the first
/// axis-aligned projection that is not degenerate.
pub fn robust_coplanar_orientation<T: CoordinateScalar>(
    points: [&Point<T, 3>; 3],
    config: &RobustPredicateConfig<T>,
) -> Orientation {
    PROJECTION_AXES
        .into_iter()
        .map(|axes| robust_orientation_2d(points, axes, config))
        .find(|&sign| sign != Orientation::DEGENERATE)
        .unwrap_or(Orientation::DEGENERATE)
}

/// In-sphere sign (positive inside) with an adaptive zero band.
pub fn robust_insphere<T: CoordinateScalar>(
    points: [&Point<T, 3>; 5],
    config: &RobustPredicateConfig<T>,
) -> Orientation {
    let [p, q, r, s, t] = points;
    let scale = coordinate_scale(&[p, q, r, s, t]);
    sign_with_tolerance(insphere_det(p, q, r, s, t), config.tolerance(scale, 5))
}

/// True when every component of the triangle normal lies in the zero band.
pub fn robust_collinear<T: CoordinateScalar>(
    points: [&Point<T, 3>; 3],
    config: &RobustPredicateConfig<T>,
) -> bool {
    let [p, q, r] = points;
    let tolerance = config.tolerance(coordinate_scale(&[p, q, r]), 2);
    triangle_normal(p, q, r)
        .iter()
        .all(|c| c.abs() <= tolerance)
}

/// Predefined configurations for common use cases.
pub mod config_presets {
    use super::{CoordinateScalar, RobustPredicateConfig, cast};

    /// No zero band: signs are taken directly from the determinants.
    #[must_use]
    pub fn exact<T: CoordinateScalar>() -> RobustPredicateConfig<T> {
        RobustPredicateConfig {
            base_tolerance: T::zero(),
            relative_tolerance_factor: T::zero(),
        }
    }

    /// Configuration for general-purpose triangulation.
    #[must_use]
    pub fn general_triangulation<T: CoordinateScalar>() -> RobustPredicateConfig<T> {
        RobustPredicateConfig {
            base_tolerance: T::default_tolerance(),
            relative_tolerance_factor: cast(1e-12).unwrap_or_else(T::default_tolerance),
        }
    }

    /// Stricter tolerances.
    #[must_use]
    pub fn high_precision<T: CoordinateScalar>() -> RobustPredicateConfig<T> {
        let base_tol = T::default_tolerance();
        RobustPredicateConfig {
            base_tolerance: base_tol / cast(100.0).unwrap_or_else(T::one),
            relative_tolerance_factor: cast(1e-14).unwrap_or(base_tol),
        }
    }

    /// More lenient tolerances for heavily degenerate input.
    #[must_use]
    pub fn degenerate_robust<T: CoordinateScalar>() -> RobustPredicateConfig<T> {
        let base_tol = T::default_tolerance();
        RobustPredicateConfig {
            base_tolerance: base_tol * cast(100.0).unwrap_or_else(T::one),
            relative_tolerance_factor: cast(1e-10).unwrap_or(base_tol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::traits::coordinate::Coordinate;

    #[test]
    fn test_robust_orientation_nearly_coplanar_is_degenerate() {
        let config = config_presets::degenerate_robust::<f64>();
        let p = Point::new([0.0, 0.0, 0.0]);
        let q = Point::new([1.0, 0.0, 0.0]);
        let r = Point::new([0.0, 1.0, 0.0]);
        let s = Point::new([0.3, 0.3, 1e-14]);
        assert_eq!(robust_orientation([&p, &q, &r, &s], &config), Orientation::DEGENERATE);

        let lifted = Point::new([0.3, 0.3, 1.0]);
        assert_eq!(
            robust_orientation([&p, &q, &r, &lifted], &config),
            Orientation::POSITIVE
        );
    }

    #[test]
    fn test_robust_insphere_general() {
        let config = config_presets::general_triangulation::<f64>();
        let p = Point::new([0.0, 0.0, 0.0]);
        let q = Point::new([1.0, 0.0, 0.0]);
        let r = Point::new([0.0, 1.0, 0.0]);
        let s = Point::new([0.0, 0.0, 1.0]);
        let inside = Point::new([0.25, 0.25, 0.25]);
        let outside = Point::new([2.0, 2.0, 2.0]);
        assert_eq!(
            robust_insphere([&p, &q, &r, &s, &inside], &config),
            Orientation::POSITIVE
        );
        assert_eq!(
            robust_insphere([&p, &q, &r, &s, &outside], &config),
            Orientation::NEGATIVE
        );
    }

    #[test]
    fn test_robust_collinear() {
        let config = config_presets::general_triangulation::<f64>();
        let p = Point::new([0.0, 0.0, 0.0]);
        let q = Point::new([1.0, 1.0, 1.0]);
        let r = Point::new([2.0, 2.0, 2.0]);
        let off = Point::new([2.0, 2.0, 2.5]);
        assert!(robust_collinear([&p, &q, &r], &config));
        assert!(!robust_collinear([&p, &q, &off], &config));
    }

    #[test]
    fn test_exact_config_repeated_vertex() {
        let config = config_presets::exact::<f64>();
        let p = Point::new([1.0, 2.0, 3.0]);
        let q = Point::new([4.0, -1.0, 0.5]);
        let r = Point::new([-2.0, 3.0, 1.0]);
        assert_eq!(robust_orientation([&p, &q, &r, &q], &config), Orientation::DEGENERATE);
        assert_eq!(robust_coplanar_orientation([&p, &r, &p], &config), Orientation::DEGENERATE);
        assert!(robust_collinear([&p, &q, &q], &config));
        assert_eq!(
            robust_coplanar_orientation([&p, &q, &r], &config),
            robust_coplanar_orientation([&q, &r, &p], &config)
        );
    }

    #[test]
    fn test_presets_are_ordered_by_strictness() {
        let strict = config_presets::high_precision::<f64>();
        let lenient = config_presets::degenerate_robust::<f64>();
        assert!(strict.tolerance(1.0, 3) < lenient.tolerance(1.0, 3));
    }
}
