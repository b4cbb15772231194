//! # triangulation3
//!
//! A triangulation engine for point sets in 3D space, inspired by
//! [CGAL](https://www.cgal.org)'s `Triangulation_3`.
//!
//! The triangulation adapts its dimension to the points it holds: it is
//! empty (`-1`), a single point (`0`), a polyline (`1`), a planar
//! triangulation (`2`) or a tetrahedralization (`3`). An *infinite vertex*
//! is joined to every convex-hull facet, so that the cells form a
//! triangulation of a topological sphere and every cell has exactly
//! `dimension + 1` neighbors.
//!
//! # Features
//!
//! - Point location by a visibility walk, with a classification of the result
//!   (vertex, edge, facet, cell, outside the convex hull or the affine hull)
//! - Incremental insertion, including dimension growth
//! - Vertex removal, including dimension collapse
//! - 2-3 and 3-2 bistellar flips
//! - A Delaunay layer built on the generic conflict-region insertion
//! - Text and [serde](https://serde.rs) I/O, and equality up to relabeling
//!
//! # Basic Usage
//!
//! ```rust
//! use triangulation3::prelude::*;
//!
//! let mut tr: Triangulation3<FastKernel<f64>> = Triangulation3::default();
//! tr.insert_points([
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//! ])
//! .unwrap();
//! assert_eq!(tr.dimension(), 2);
//!
//! tr.insert(Point::new([0.0, 0.0, 1.0]), None).unwrap();
//! assert_eq!(tr.dimension(), 3);
//! assert_eq!(tr.number_of_finite_cells(), 1);
//! assert!(tr.is_valid(false));
//! ```
//!
//! Vertex removal is provided by the Delaunay layer:
//!
//! ```rust
//! use triangulation3::prelude::*;
//!
//! let mut dt: DelaunayTriangulation3<FastKernel<f64>> = DelaunayTriangulation3::default();
//! let keys = dt
//!     .insert_points([
//!         Point::new([0.0, 0.0, 0.0]),
//!         Point::new([1.0, 0.0, 0.0]),
//!         Point::new([0.0, 1.0, 0.0]),
//!         Point::new([0.0, 0.0, 1.0]),
//!     ])
//!     .unwrap();
//! dt.remove(keys[3]).unwrap();
//! assert_eq!(dt.dimension(), 2);
//! assert_eq!(dt.number_of_vertices(), 3);
//! ```
//!
//! # Triangulation Invariants
//!
//! [`Triangulation3::is_valid`](core::triangulation::Triangulation3::is_valid)
//! checks the **combinatorial** invariants of the data structure and the
//! **geometric** invariants of the embedding:
//!
//! - **Neighbor symmetry**: if `c` sees `n` across slot `i`, then `n` sees
//!   `c` across its mirror slot, and the two cells share exactly the facet.
//! - **Vertex anchors**: every vertex points to a live cell containing it.
//! - **Orientation**: the vertices of every cell are ordered consistently,
//!   and every finite cell is positively oriented.
//! - **Counts**: there are enough vertices for the dimension, and exactly
//!   `n + 1` edges on a line.
//! - **Affine hull**: a planar triangulation keeps every point in its plane,
//!   and the edges of a line follow each other in order.
//!
//! The Delaunay layer additionally checks the empty-sphere property with
//! [`DelaunayTriangulation3::is_delaunay`](core::delaunay_triangulation::DelaunayTriangulation3::is_delaunay).

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the triangulation data structure, the
/// geometric triangulation layered on it and the algorithms that query and
/// modify it.
pub mod core {
    /// Point location, insertion, removal and flips
    pub mod algorithms {
        pub mod conflict;
        pub mod flips;
        pub mod incremental_insertion;
        pub mod locate;
        pub mod removal;
    }
    pub mod cell;
    /// High-performance collection types
    pub mod collections;
    pub mod delaunay_triangulation;
    pub mod facet;
    pub mod io;
    pub mod isomorphism;
    pub mod iterators;
    pub mod triangulation;
    pub mod triangulation_data_structure;
    pub mod util;
    pub mod vertex;

    pub use cell::*;
    pub use delaunay_triangulation::*;
    pub use facet::*;
    pub use triangulation::*;
    pub use triangulation_data_structure::*;
    pub use vertex::*;
}

/// Contains geometric types: points, the kernel of geometric predicates and
/// the floating-point primitives behind them.
pub mod geometry {
    pub mod kernel;
    pub mod point;
    pub mod predicates;
    pub mod robust_predicates;
    /// Traits describing coordinate scalars and points
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use kernel::*;
    pub use point::*;
    pub use predicates::*;
    pub use traits::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    pub use crate::core::{
        algorithms::{
            conflict::{ConflictError, ConflictTester, HiddenPointVisitor, HullConflictTester, NoHiddenPoints},
            flips::FlipError,
            incremental_insertion::InsertionError,
            locate::{LocateError, LocateType, Location, SideOf},
            removal::RemovalError,
        },
        delaunay_triangulation::{DelaunayConflictTester, DelaunayError, DelaunayTriangulation3},
        facet::{Edge, Facet},
        io::{ReadError, TriangulationSnapshot},
        triangulation::{Triangulation3, TriangulationConfig, TriangulationConfigBuilder, ValidationError},
        triangulation_data_structure::{CellKey, Tds, TdsError, TdsValidationError, VertexKey},
    };

    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity, fast_hash_set_with_capacity,
    };

    pub use crate::geometry::{
        kernel::{FastKernel, Kernel, RobustKernel},
        point::Point,
        predicates::{BoundedSide, CollinearPosition, Orientation},
        traits::coordinate::{Coordinate, CoordinateScalar},
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
