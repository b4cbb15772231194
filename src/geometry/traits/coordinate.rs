//! Coordinate abstraction shared by points and predicates.
//!
//! The [`CoordinateScalar`] trait bundles the numeric, ordering, hashing and
//! serialization requirements that the triangulation places on a coordinate
//! type. [`Coordinate`] is the storage-side view implemented by
//! [`Point`](crate::geometry::point::Point).

use num_traits::Float;
use ordered_float::OrderedFloat;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

/// Errors that can occur during coordinate validation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateValidationError {
    /// A coordinate value is invalid (NaN or infinite).
    #[error(
        "Invalid coordinate at index {coordinate_index} in dimension {dimension}: {coordinate_value}"
    )]
    InvalidCoordinate {
        /// Index of the invalid coordinate.
        coordinate_index: usize,
        /// Value of the invalid coordinate, as a string.
        coordinate_value: String,
        /// The dimensionality of the coordinate system.
        dimension: usize,
    },
}

/// Default tolerance for f32 floating-point comparisons.
pub const DEFAULT_TOLERANCE_F32: f32 = 1e-6;

/// Default tolerance for f64 floating-point comparisons.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-15;

// =============================================================================
// SUPPORTING TRAITS
// =============================================================================

/// Helper trait for checking finiteness of coordinates.
///
/// # Examples
///
/// ```
/// use triangulation3::geometry::traits::coordinate::FiniteCheck;
///
/// assert!(3.5f64.is_finite_generic());
/// assert!(!f64::NAN.is_finite_generic());
/// assert!(!f64::INFINITY.is_finite_generic());
/// ```
pub trait FiniteCheck {
    /// Returns true if the value is finite (not NaN or infinite).
    fn is_finite_generic(&self) -> bool;
}

macro_rules! impl_finite_check {
    (float: $($t:ty),*) => {
        $(
            impl FiniteCheck for $t {
                #[inline(always)]
                fn is_finite_generic(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_finite_check!(float: f32, f64);

/// Total-order equality and comparison for floating-point scalars.
///
/// NaN compares equal to itself, which lets points act as map keys.
///
/// # Examples
///
/// ```
/// use triangulation3::geometry::traits::coordinate::OrderedEq;
/// use std::cmp::Ordering;
///
/// assert!(f64::NAN.ordered_eq(&f64::NAN));
/// assert!(0.0f64.ordered_eq(&(-0.0f64)));
/// assert_eq!(1.0f64.ordered_cmp(&2.0), Ordering::Less);
/// ```
pub trait OrderedEq {
    /// Compares two values for equality using ordered comparison semantics.
    fn ordered_eq(&self, other: &Self) -> bool;

    /// Total ordering of two values.
    fn ordered_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_ordered_eq {
    (float: $($t:ty),*) => {
        $(
            impl OrderedEq for $t {
                #[inline(always)]
                fn ordered_eq(&self, other: &Self) -> bool {
                    OrderedFloat(*self) == OrderedFloat(*other)
                }

                #[inline(always)]
                fn ordered_cmp(&self, other: &Self) -> Ordering {
                    OrderedFloat(*self).cmp(&OrderedFloat(*other))
                }
            }
        )*
    };
}

impl_ordered_eq!(float: f32, f64);

/// Consistent hashing of floating-point scalars (NaN hashes to one value).
pub trait HashCoordinate {
    /// Feeds the scalar into `state`.
    fn hash_scalar<H: Hasher>(&self, state: &mut H);
}

macro_rules! impl_hash_coordinate {
    (float: $($t:ty),*) => {
        $(
            impl HashCoordinate for $t {
                #[inline(always)]
                fn hash_scalar<H: Hasher>(&self, state: &mut H) {
                    OrderedFloat(*self).hash(state);
                }
            }
        )*
    };
}

impl_hash_coordinate!(float: f32, f64);

// =============================================================================
// COORDINATE SCALAR
// =============================================================================

/// Scalar type usable as a point coordinate.
///
/// Implemented for `f32` and `f64`.
pub trait CoordinateScalar:
    Float
    + OrderedEq
    + HashCoordinate
    + FiniteCheck
    + Default
    + Debug
    + Display
    + FromStr
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Returns the default tolerance for this scalar type.
    ///
    /// # Examples
    ///
    /// ```
    /// use triangulation3::geometry::traits::coordinate::CoordinateScalar;
    ///
    /// assert_eq!(f32::default_tolerance(), 1e-6_f32);
    /// assert_eq!(f64::default_tolerance(), 1e-15_f64);
    /// ```
    fn default_tolerance() -> Self;
}

impl CoordinateScalar for f32 {
    fn default_tolerance() -> Self {
        DEFAULT_TOLERANCE_F32
    }
}

impl CoordinateScalar for f64 {
    fn default_tolerance() -> Self {
        DEFAULT_TOLERANCE_F64
    }
}

// =============================================================================
// COORDINATE TRAIT
// =============================================================================

/// Storage abstraction for a fixed-size coordinate tuple.
pub trait Coordinate<T, const D: usize>
where
    T: CoordinateScalar,
    Self: Sized,
{
    /// Creates a value from an array of coordinates.
    fn new(coords: [T; D]) -> Self;

    /// Checks that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateValidationError::InvalidCoordinate`] for the first
    /// NaN or infinite coordinate.
    fn validate(&self) -> Result<(), CoordinateValidationError>;

    /// Hashes the coordinates with [`HashCoordinate`] semantics.
    fn hash_coordinate<H: Hasher>(&self, state: &mut H);

    /// Coordinate-wise [`OrderedEq`] equality.
    fn ordered_equals(&self, other: &Self) -> bool;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[test]
    fn test_ordered_eq_treats_nan_as_equal() {
        assert!(f64::NAN.ordered_eq(&f64::NAN));
        assert!(f32::NAN.ordered_eq(&f32::NAN));
        assert!(!1.0f64.ordered_eq(&2.0f64));
    }

    #[test]
    fn test_ordered_cmp_is_total() {
        assert_eq!(1.0f64.ordered_cmp(&1.0), Ordering::Equal);
        assert_eq!((-1.0f64).ordered_cmp(&1.0), Ordering::Less);
        assert_eq!(f64::INFINITY.ordered_cmp(&1.0), Ordering::Greater);
    }

    #[test]
    fn test_hash_scalar_consistent_for_nan() {
        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        f64::NAN.hash_scalar(&mut h1);
        f64::NAN.hash_scalar(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_finite_check() {
        assert!(0.0f32.is_finite_generic());
        assert!(!f32::NEG_INFINITY.is_finite_generic());
    }
}
