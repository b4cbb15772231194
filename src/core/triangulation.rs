//! Geometric triangulation combining a kernel and the combinatorial store.
//!
//! Following CGAL's architecture, [`Triangulation3`] pairs:
//! - a geometric [`Kernel`] injected at construction, used for every
//!   predicate;
//! - a purely combinatorial [`Tds`] holding the cells and vertices.
//!
//! This module owns construction, configuration, accessors and the
//! validator. The operations live next to their algorithms:
//!
//! | Operation | Module |
//! |---|---|
//! | `locate`, `side_of_*` | [`algorithms::locate`](crate::core::algorithms::locate) |
//! | `find_conflicts` | [`algorithms::conflict`](crate::core::algorithms::conflict) |
//! | `insert*` | [`algorithms::incremental_insertion`](crate::core::algorithms::incremental_insertion) |
//! | `remove*` | [`algorithms::removal`](crate::core::algorithms::removal) |
//! | `flip*` | [`algorithms::flips`](crate::core::algorithms::flips) |
//! | traversal | [`iterators`](crate::core::iterators) |
//! | `==` | [`isomorphism`](crate::core::isomorphism) |
//! | text and serde I/O | [`io`](crate::core::io) |

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::triangulation_data_structure::{CellKey, Tds, TdsValidationError, VertexKey};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::{CollinearPosition, Orientation};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Runtime options of a triangulation.
///
/// # Examples
///
/// ```rust
/// use triangulation3::core::triangulation::TriangulationConfigBuilder;
///
/// let config = TriangulationConfigBuilder::default()
///     .walk_seed(7_u64)
///     .validate_after_mutation(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.walk_seed, 7);
/// assert!(config.validate_after_mutation);
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[builder(default)]
pub struct TriangulationConfig {
    /// Seed of the random start index used by the stochastic walk.
    #[builder(setter(into))]
    pub walk_seed: u64,

    /// Run the validator after every public mutation and log failures.
    pub validate_after_mutation: bool,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            walk_seed: 0x5EED_CAFE,
            validate_after_mutation: false,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure found by [`Triangulation3::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The combinatorial structure is broken.
    #[error(transparent)]
    Tds(#[from] TdsValidationError),
    /// A finite cell does not have positive orientation.
    #[error("Finite cell {cell:?} has orientation {orientation}")]
    BadOrientation {
        /// The cell.
        cell: CellKey,
        /// Its orientation under the kernel.
        orientation: Orientation,
    },
    /// A finite vertex lies outside the affine hull of the triangulation.
    #[error("Vertex {vertex:?} is not in the affine hull of dimension {dimension}")]
    OutsideAffineHull {
        /// The vertex.
        vertex: VertexKey,
        /// Current dimension.
        dimension: i32,
    },
    /// Two consecutive edges of a 1D triangulation overlap or turn back.
    #[error("Edges {cell:?} and {next:?} are not consecutive along the line")]
    MisorderedEdges {
        /// The edge.
        cell: CellKey,
        /// Its successor across slot 0.
        next: CellKey,
    },
    /// Two finite vertices share a point.
    #[error("Vertices {first:?} and {second:?} have equal points")]
    DuplicatePoint {
        /// First vertex.
        first: VertexKey,
        /// Second vertex.
        second: VertexKey,
    },
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// A triangulation of a point set of dimension `-1..=3`.
///
/// # Examples
///
/// ```rust
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// assert_eq!(tr.dimension(), -1);
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
///     tr.insert(Point::new(p), None).unwrap();
/// }
/// assert_eq!(tr.dimension(), 3);
/// assert_eq!(tr.number_of_finite_cells(), 1);
/// assert_eq!(tr.number_of_cells(), 5);
/// assert!(tr.is_valid(true));
/// ```
#[derive(Debug)]
pub struct Triangulation3<K: Kernel> {
    pub(crate) kernel: K,
    pub(crate) tds: Tds<K::Point>,
    pub(crate) config: TriangulationConfig,
    walk_counter: AtomicU64,
}

impl<K: Kernel> Clone for Triangulation3<K> {
    fn clone(&self) -> Self {
        Self {
            kernel: self.kernel.clone(),
            tds: self.tds.clone(),
            config: self.config.clone(),
            walk_counter: AtomicU64::new(self.walk_counter.load(AtomicOrdering::Relaxed)),
        }
    }
}

impl<K: Kernel + Default> Default for Triangulation3<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: Kernel> Triangulation3<K> {
    /// An empty triangulation (dimension -1) using `kernel`.
    #[must_use]
    pub fn new(kernel: K) -> Self {
        Self::with_config(kernel, TriangulationConfig::default())
    }

    /// An empty triangulation with explicit options.
    #[must_use]
    pub fn with_config(kernel: K, config: TriangulationConfig) -> Self {
        Self::from_parts(kernel, Tds::new(), config)
    }

    pub(crate) fn from_parts(kernel: K, tds: Tds<K::Point>, config: TriangulationConfig) -> Self {
        Self {
            kernel,
            tds,
            config,
            walk_counter: AtomicU64::new(0),
        }
    }

    /// The geometric kernel.
    #[inline]
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The combinatorial store.
    #[inline]
    #[must_use]
    pub const fn tds(&self) -> &Tds<K::Point> {
        &self.tds
    }

    /// The runtime options.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// Current dimension, in `-1..=3`.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> i32 {
        self.tds.dimension()
    }

    /// Number of finite vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.tds.number_of_vertices()
    }

    /// Number of cells, infinite ones included.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.tds.number_of_cells()
    }

    /// Number of cells not incident to the infinite vertex.
    ///
    /// Below dimension 1 there are no finite cells in CGAL's sense; the
    /// single vertex cell of dimension 0 is not counted.
    #[must_use]
    pub fn number_of_finite_cells(&self) -> usize {
        if self.dimension() < 1 {
            return 0;
        }
        self.tds
            .cell_keys()
            .filter(|&c| !self.tds.is_infinite_cell(c))
            .count()
    }

    /// The infinite vertex.
    #[inline]
    #[must_use]
    pub const fn infinite_vertex(&self) -> VertexKey {
        self.tds.infinite_vertex()
    }

    /// One cell incident to the infinite vertex.
    #[must_use]
    pub fn infinite_cell(&self) -> CellKey {
        self.tds
            .vertex(self.infinite_vertex())
            .map(|v| v.cell())
            .unwrap_or_default()
    }

    /// True for the infinite vertex.
    #[inline]
    #[must_use]
    pub fn is_infinite_vertex(&self, v: VertexKey) -> bool {
        v == self.infinite_vertex()
    }

    /// True when `c` is incident to the infinite vertex.
    #[must_use]
    pub fn is_infinite_cell(&self, c: CellKey) -> bool {
        self.tds.is_infinite_cell(c)
    }

    /// The point of a finite vertex.
    #[must_use]
    pub fn point(&self, v: VertexKey) -> Option<&K::Point> {
        self.tds.point(v)
    }

    /// Resets to the empty triangulation, keeping kernel and options.
    pub fn clear(&mut self) {
        self.tds = Tds::new();
        self.walk_counter.store(0, AtomicOrdering::Relaxed);
    }

    /// Fresh walk RNG: the configured seed mixed with a call counter, so
    /// location stays `&self` and reproducible for a given call sequence.
    pub(crate) fn walk_rng(&self) -> StdRng {
        let round = self.walk_counter.fetch_add(1, AtomicOrdering::Relaxed);
        StdRng::seed_from_u64(
            self.config
                .walk_seed
                .wrapping_add(round.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        )
    }

    /// Points of the used slots of `c`; `None` in place of the infinite
    /// vertex.
    pub(crate) fn cell_points(&self, c: CellKey) -> Option<[Option<&K::Point>; 4]> {
        let cell = self.tds.cell(c)?;
        Some(cell.vertices().map(|v| self.tds.point(v)))
    }

    /// Runs the validator when `validate_after_mutation` is on.
    pub(crate) fn after_mutation(&self, operation: &'static str) {
        if !self.config.validate_after_mutation {
            return;
        }
        if let Err(err) = self.validate() {
            tracing::warn!(operation, error = %err, "triangulation invalid after mutation");
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Boolean form of [`validate`](Self::validate). With `verbose`, the first
    /// failure is logged at `warn` level.
    #[must_use]
    pub fn is_valid(&self, verbose: bool) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(err) => {
                if verbose {
                    tracing::warn!(error = %err, "triangulation validation failed");
                }
                false
            }
        }
    }

    /// Checks the combinatorial invariants, then the geometric ones for the
    /// current dimension.
    ///
    /// # Errors
    ///
    /// Returns the first failure found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tds.is_valid()?;
        match self.dimension() {
            3 => self.validate_3d(),
            2 => self.validate_2d(),
            1 => self.validate_1d(),
            _ => Ok(()),
        }
    }

    fn finite_cell_points(&self) -> impl Iterator<Item = (CellKey, [&K::Point; 4])> + '_ {
        let arity = self.tds.arity();
        self.tds.cells().filter_map(move |(c, cell)| {
            let mut points = [None; 4];
            for (slot, &v) in cell.vertices()[..arity].iter().enumerate() {
                points[slot] = Some(self.tds.point(v)?);
            }
            // Unused slots repeat the first point.
            let first = points[0]?;
            Some((c, points.map(|p| p.unwrap_or(first))))
        })
    }

    fn validate_3d(&self) -> Result<(), ValidationError> {
        for (cell, [p, q, r, s]) in self.finite_cell_points() {
            let orientation = self.kernel.orientation(p, q, r, s);
            if orientation != Orientation::POSITIVE {
                return Err(ValidationError::BadOrientation { cell, orientation });
            }
        }
        Ok(())
    }

    fn validate_2d(&self) -> Result<(), ValidationError> {
        let mut plane: Option<[&K::Point; 3]> = None;
        for (cell, [p, q, r, _]) in self.finite_cell_points() {
            let orientation = self.kernel.coplanar_orientation(p, q, r);
            if orientation != Orientation::POSITIVE {
                return Err(ValidationError::BadOrientation { cell, orientation });
            }
            plane.get_or_insert([p, q, r]);
        }
        if let Some([p, q, r]) = plane {
            for v in self.tds.vertex_keys() {
                if let Some(s) = self.tds.point(v)
                    && !self.kernel.coplanar(p, q, r, s)
                {
                    return Err(ValidationError::OutsideAffineHull {
                        vertex: v,
                        dimension: 2,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_1d(&self) -> Result<(), ValidationError> {
        for (cell, [p, q, _, _]) in self.finite_cell_points() {
            if self.kernel.equal(p, q) {
                let pair = self.tds.cell(cell).map(|c| (c.vertex(0), c.vertex(1)));
                let (first, second) = pair.unwrap_or_default();
                return Err(ValidationError::DuplicatePoint { first, second });
            }
            let Some(next) = self.tds.cell(cell).map(|c| c.neighbor(0)) else {
                continue;
            };
            if self.tds.is_infinite_cell(next) {
                continue;
            }
            let Some(r) = self
                .tds
                .cell(next)
                .and_then(|n| self.tds.point(n.vertex(1)))
            else {
                continue;
            };
            if !self.kernel.collinear(p, q, r)
                || self.kernel.collinear_position(p, q, r) != CollinearPosition::MIDDLE
            {
                return Err(ValidationError::MisorderedEdges { cell, next });
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
