//! Vertex records stored in the triangulation data structure.
//!
//! A [`Vertex`] owns its embedding point and remembers one incident cell,
//! which is the re-entry point for every star and link traversal. Exactly one
//! vertex per triangulation carries no point: the infinite vertex that closes
//! the triangulation into a combinatorial sphere.
//!
//! # Examples
//!
//! ```rust
//! use triangulation3::core::vertex::Vertex;
//! use triangulation3::geometry::point::Point;
//! use triangulation3::geometry::traits::coordinate::Coordinate;
//!
//! let finite = Vertex::new(Point::new([1.0, 2.0, 3.0]));
//! assert!(!finite.is_infinite());
//! assert_eq!(finite.point(), Some(&Point::new([1.0, 2.0, 3.0])));
//!
//! let infinite: Vertex<Point<f64, 3>> = Vertex::infinite();
//! assert!(infinite.is_infinite());
//! ```

#![forbid(unsafe_code)]

use super::triangulation_data_structure::CellKey;
use slotmap::Key;

/// A vertex of the triangulation.
///
/// The incident cell is a null key until the vertex is attached to a cell by
/// one of the [`Tds`](super::triangulation_data_structure::Tds) primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex<P> {
    /// Embedding point; `None` only for the infinite vertex.
    point: Option<P>,

    /// One cell containing this vertex.
    pub(crate) cell: CellKey,
}

impl<P> Vertex<P> {
    /// A finite vertex at `point`, not yet attached to a cell.
    #[must_use]
    pub fn new(point: P) -> Self {
        Self {
            point: Some(point),
            cell: CellKey::null(),
        }
    }

    /// The infinite vertex.
    #[must_use]
    pub fn infinite() -> Self {
        Self {
            point: None,
            cell: CellKey::null(),
        }
    }

    /// The embedding point, or `None` for the infinite vertex.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Option<&P> {
        self.point.as_ref()
    }

    /// Replaces the embedding point and returns the previous one.
    pub(crate) fn replace_point(&mut self, point: P) -> Option<P> {
        self.point.replace(point)
    }

    /// Takes the point out of a vertex that is being discarded.
    pub(crate) fn into_point(self) -> Option<P> {
        self.point
    }

    /// True for the infinite vertex.
    #[inline]
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.point.is_none()
    }

    /// One incident cell (null while the vertex is detached).
    #[inline]
    #[must_use]
    pub const fn cell(&self) -> CellKey {
        self.cell
    }
}
