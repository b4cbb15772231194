//! Fixed-dimension points with total-order equality.
//!
//! # Special Floating-Point Equality Semantics
//!
//! `NaN` coordinates compare equal to themselves so that `Point` satisfies
//! `Eq` and `Hash`. Compare raw coordinates when IEEE 754 semantics are
//! needed.

#![forbid(unsafe_code)]

use crate::geometry::traits::coordinate::{
    Coordinate, CoordinateScalar, CoordinateValidationError,
};
use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in `D`-dimensional space with coordinates of type `T`.
///
/// Points are immutable once created.
///
/// # Examples
///
/// ```rust
/// use triangulation3::geometry::point::Point;
/// use triangulation3::geometry::traits::coordinate::Coordinate;
///
/// let p = Point::new([1.0, 2.0, 3.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Point<T, const D: usize>
where
    T: CoordinateScalar,
{
    coords: [T; D],
}

/// Error produced when parsing a point from its text form.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum PointParseError {
    /// Wrong number of whitespace-separated fields.
    #[error("Expected {expected} coordinates, found {found}")]
    WrongArity {
        /// Number of coordinates required.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
    /// A field did not parse as a scalar.
    #[error("Invalid coordinate '{token}'")]
    InvalidScalar {
        /// The offending token.
        token: String,
    },
    /// A field parsed to NaN or an infinity.
    #[error(transparent)]
    NonFinite(#[from] CoordinateValidationError),
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl<T, const D: usize> Point<T, D>
where
    T: CoordinateScalar,
{
    /// Read-only access to the coordinate array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[T; D] {
        &self.coords
    }
}

impl<T, const D: usize> Coordinate<T, D> for Point<T, D>
where
    T: CoordinateScalar,
{
    #[inline]
    fn new(coords: [T; D]) -> Self {
        Self { coords }
    }

    fn validate(&self) -> Result<(), CoordinateValidationError> {
        for (index, &coord) in self.coords.iter().enumerate() {
            if !coord.is_finite_generic() {
                return Err(CoordinateValidationError::InvalidCoordinate {
                    coordinate_index: index,
                    coordinate_value: format!("{coord:?}"),
                    dimension: D,
                });
            }
        }
        Ok(())
    }

    fn hash_coordinate<H: Hasher>(&self, state: &mut H) {
        for &coord in &self.coords {
            coord.hash_scalar(state);
        }
    }

    fn ordered_equals(&self, other: &Self) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| a.ordered_eq(b))
    }
}

// =============================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// =============================================================================

impl<T, const D: usize> Hash for Point<T, D>
where
    T: CoordinateScalar,
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_coordinate(state);
    }
}

impl<T, const D: usize> PartialEq for Point<T, D>
where
    T: CoordinateScalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.ordered_equals(other)
    }
}

impl<T, const D: usize> Eq for Point<T, D> where T: CoordinateScalar {}

impl<T, const D: usize> PartialOrd for Point<T, D>
where
    T: CoordinateScalar,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic order (x, then y, then z), matching `compare_xyz`.
impl<T, const D: usize> Ord for Point<T, D>
where
    T: CoordinateScalar,
{
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.coords.iter().zip(other.coords.iter()) {
            match a.ordered_cmp(b) {
                Ordering::Equal => {}
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

impl<T, const D: usize> Default for Point<T, D>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self {
            coords: [T::default(); D],
        }
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D>
where
    T: CoordinateScalar,
{
    fn from(coords: [T; D]) -> Self {
        Self { coords }
    }
}

impl<T, const D: usize> From<Point<T, D>> for [T; D]
where
    T: CoordinateScalar,
{
    fn from(point: Point<T, D>) -> [T; D] {
        point.coords
    }
}

/// Space-separated coordinates, the per-vertex payload of the text format.
impl<T, const D: usize> fmt::Display for Point<T, D>
where
    T: CoordinateScalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coord) in self.coords.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{coord}")?;
        }
        Ok(())
    }
}

impl<T, const D: usize> FromStr for Point<T, D>
where
    T: CoordinateScalar,
{
    type Err = PointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != D {
            return Err(PointParseError::WrongArity {
                expected: D,
                found: tokens.len(),
            });
        }
        let mut coords = [T::default(); D];
        for (slot, token) in coords.iter_mut().zip(tokens) {
            *slot = token
                .parse::<T>()
                .map_err(|_| PointParseError::InvalidScalar {
                    token: token.to_string(),
                })?;
        }
        let point = Self { coords };
        point.validate()?;
        Ok(point)
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl<T, const D: usize> Serialize for Point<T, D>
where
    T: CoordinateScalar,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(D)?;
        for coord in &self.coords {
            tuple.serialize_element(coord)?;
        }
        tuple.end()
    }
}

impl<'de, T, const D: usize> Deserialize<'de> for Point<T, D>
where
    T: CoordinateScalar,
{
    fn deserialize<DE>(deserializer: DE) -> Result<Self, DE::Error>
    where
        DE: serde::Deserializer<'de>,
    {
        struct ArrayVisitor<T, const D: usize>(PhantomData<T>);

        impl<'de, T, const D: usize> Visitor<'de> for ArrayVisitor<T, D>
        where
            T: CoordinateScalar,
        {
            type Value = Point<T, D>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an array of {D} coordinates")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut coords = [T::default(); D];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| A::Error::invalid_length(i, &self))?;
                }
                Ok(Point { coords })
            }
        }

        deserializer.deserialize_tuple(D, ArrayVisitor::<T, D>(PhantomData))
    }
}

// =============================================================================
// TESTS
// =============================================================================
