//! Combinatorial triangulation data structure.
//!
//! [`Tds`] stores the cells and vertices of a triangulation of dimension
//! `-1..=3`, following the design of
//! [CGAL's 3D TDS](https://doc.cgal.org/latest/TDS_3/index.html). It knows
//! nothing about coordinates: points are an opaque payload `P`, and every
//! geometric decision is made by the layer above it.
//!
//! # Structure
//!
//! - An arena of [`Vertex`] records and an arena of [`Cell`] records, addressed
//!   by generation-checked [`VertexKey`] / [`CellKey`] handles.
//! - One infinite vertex, created with the structure and never removed. Cells
//!   containing it tile the unbounded exterior, so every facet is shared by
//!   exactly two cells and the structure is a combinatorial sphere of the
//!   current dimension.
//! - A `dimension` counter, the single source of truth for how many slots of
//!   each cell are in use.
//!
//! # Topological Invariants
//!
//! | Invariant | Checked by |
//! |---|---|
//! | Every vertex points to a live cell containing it | [`Tds::is_valid`] |
//! | Used slots hold distinct live vertices, unused slots are null | [`Tds::is_valid`] |
//! | Neighbor relations are symmetric and share the facet | [`Tds::is_valid`] |
//! | Neighbors traverse their shared facet in opposite orders | [`Tds::is_valid`] |
//!
//! All mutating primitives re-establish these invariants before returning.
//! The multi-cell rewrites ([`Tds::rewrite_region`] and everything built on
//! it) plan every link before touching the arenas, so a rejected rewrite
//! leaves the structure unchanged.
//!
//! # Examples
//!
//! ```rust
//! use triangulation3::core::triangulation_data_structure::Tds;
//!
//! let mut tds: Tds<&str> = Tds::new();
//! assert_eq!(tds.dimension(), -1);
//! tds.insert_increase_dimension("a").unwrap();
//! tds.insert_increase_dimension("b").unwrap();
//! assert_eq!(tds.dimension(), 1);
//! assert_eq!(tds.number_of_vertices(), 2);
//! // Two finite vertices on a line: one finite edge, two infinite ones.
//! assert_eq!(tds.number_of_cells(), 3);
//! assert!(tds.is_valid().is_ok());
//! ```

#![forbid(unsafe_code)]

use super::cell::Cell;
use super::collections::{
    CellKeyBuffer, FastHashMap, FastHashSet, MAX_CELL_SLOTS, SimplexKey, SmallBuffer,
    StorageMap, VertexKeyBuffer, fast_hash_map_with_capacity, fast_hash_set_with_capacity,
};
use super::facet::{Edge, Facet};
use super::util::{ccw, cw, make_canonical, next_around_edge, reversed_triple, vertex_triple_index};
use super::vertex::Vertex;
use slotmap::{Key, new_key_type};
use thiserror::Error;

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key of a vertex in the vertex arena.
    ///
    /// Keys are generation-checked: a key of a deleted vertex never resolves
    /// to a vertex created later.
    pub struct VertexKey;
}

new_key_type! {
    /// Key of a cell in the cell arena.
    pub struct CellKey;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the topology primitives.
///
/// These signal precondition violations; a primitive returning an error has
/// not modified the structure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TdsError {
    /// A vertex key does not refer to a live vertex.
    #[error("Vertex key {0:?} does not refer to a live vertex")]
    UnknownVertex(VertexKey),
    /// A cell key does not refer to a live cell.
    #[error("Cell key {0:?} does not refer to a live cell")]
    UnknownCell(CellKey),
    /// A local slot index is outside `0..=dimension`.
    #[error("Slot {index} is out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// The offending slot.
        index: usize,
        /// Current dimension.
        dimension: i32,
    },
    /// The operation is not defined at the current dimension.
    #[error("Operation requires dimension {required}, current dimension is {actual}")]
    WrongDimension {
        /// Accepted dimensions.
        required: &'static str,
        /// Current dimension.
        actual: i32,
    },
    /// The infinite vertex was passed where a finite vertex is required.
    #[error("The infinite vertex cannot be used here")]
    InfiniteVertex,
    /// Two cells expected to be adjacent are not.
    #[error("Cell {cell:?} is not a neighbor of {neighbor:?}")]
    NotNeighbors {
        /// Cell whose neighbor slot was followed.
        cell: CellKey,
        /// The cell that does not point back.
        neighbor: CellKey,
    },
    /// The facet handed to `insert_in_hole` does not separate the hole from
    /// the rest of the triangulation.
    #[error("Facet {0:?} is not on the boundary of the hole")]
    NotBoundaryFacet(Facet),
    /// A planned multi-cell rewrite does not close up.
    #[error("Region rewrite rejected: {reason}")]
    RegionMismatch {
        /// Which check failed.
        reason: String,
    },
    /// A flip precondition does not hold combinatorially.
    #[error("Flip rejected: {reason}")]
    NotFlippable {
        /// Which check failed.
        reason: &'static str,
    },
    /// A circulation did not return to its start.
    #[error("Traversal around an edge of {0:?} did not close")]
    BrokenCycle(CellKey),
}

/// Structural corruption found by [`Tds::is_valid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TdsValidationError {
    /// The dimension counter is outside `-1..=3`.
    #[error("Invalid dimension {0}")]
    InvalidDimension(i32),
    /// The infinite vertex is missing or carries a point.
    #[error("Infinite vertex {0:?} is missing or finite")]
    InfiniteVertex(VertexKey),
    /// A second vertex without a point exists.
    #[error("Vertex {0:?} has no point but is not the infinite vertex")]
    ExtraInfiniteVertex(VertexKey),
    /// Fewer finite vertices than the dimension requires.
    #[error("Dimension {dimension} needs at least {required} finite vertices, found {found}")]
    TooFewVertices {
        /// Current dimension.
        dimension: i32,
        /// Minimum number of finite vertices.
        required: usize,
        /// Actual number of finite vertices.
        found: usize,
    },
    /// A vertex points to a cell that does not exist or does not contain it.
    #[error("Vertex {vertex:?} has an invalid incident cell {cell:?}")]
    VertexCell {
        /// The vertex.
        vertex: VertexKey,
        /// Its recorded incident cell.
        cell: CellKey,
    },
    /// A used vertex slot is null, stale or repeated, or an unused slot is set.
    #[error("Cell {cell:?} has an invalid vertex in slot {slot}")]
    CellVertex {
        /// The cell.
        cell: CellKey,
        /// The slot.
        slot: usize,
    },
    /// A used neighbor slot is null or stale, or an unused slot is set.
    #[error("Cell {cell:?} has an invalid neighbor in slot {slot}")]
    CellNeighbor {
        /// The cell.
        cell: CellKey,
        /// The slot.
        slot: usize,
    },
    /// The neighbor does not point back.
    #[error("Neighbor of {cell:?} across slot {slot} does not point back")]
    NeighborAsymmetry {
        /// The cell.
        cell: CellKey,
        /// The slot.
        slot: usize,
    },
    /// The neighbor does not share the facet opposite the slot.
    #[error("Neighbor of {cell:?} across slot {slot} does not share the facet")]
    FacetMismatch {
        /// The cell.
        cell: CellKey,
        /// The slot.
        slot: usize,
    },
    /// The neighbor traverses the shared facet in the same order.
    #[error("Neighbor of {cell:?} across slot {slot} is inconsistently oriented")]
    InconsistentOrientation {
        /// The cell.
        cell: CellKey,
        /// The slot.
        slot: usize,
    },
    /// The number of cells does not match the dimension.
    #[error("Dimension {dimension} requires {expected} cells, found {found}")]
    CellCount {
        /// Current dimension.
        dimension: i32,
        /// Expected number of cells.
        expected: usize,
        /// Actual number of cells.
        found: usize,
    },
}

// =============================================================================
// REWRITE RESULT
// =============================================================================

/// Outcome of a successful [`Tds::rewrite_region`].
#[derive(Clone, Debug)]
pub struct RegionRewrite<P> {
    /// Keys of the created cells, in the order of the planned tuples.
    pub new_cells: CellKeyBuffer,
    /// Vertices that belonged to the old region only; they were removed from
    /// the structure and their points handed back.
    pub removed_vertices: Vec<(VertexKey, P)>,
}

/// One planned neighbor link of a region rewrite.
#[derive(Clone, Copy, Debug)]
enum PlannedLink {
    /// Two new cells (tuple index, slot) glued together.
    Inner((usize, usize), (usize, usize)),
    /// A new cell glued to a cell outside the region.
    Outer((usize, usize), (CellKey, usize)),
}

// =============================================================================
// TDS
// =============================================================================

/// The triangulation data structure.
///
/// Generic over the point payload `P`; the infinite vertex carries none.
#[derive(Clone, Debug)]
pub struct Tds<P> {
    vertices: StorageMap<VertexKey, Vertex<P>>,
    cells: StorageMap<CellKey, Cell>,
    infinite: VertexKey,
    dimension: i32,
}

impl<P> Default for Tds<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted keys of the facet of `vertices` opposite `skip`.
fn facet_key(vertices: &[VertexKey; MAX_CELL_SLOTS], skip: usize, arity: usize) -> SimplexKey {
    let mut key: SimplexKey = (0..arity)
        .filter(|&k| k != skip)
        .map(|k| vertices[k])
        .collect();
    key.sort_unstable();
    key
}

/// True when `a` (across slot `i`) and `b` (across slot `j`) traverse their
/// shared facet in opposite orders.
fn opposite_facets(
    a: &[VertexKey; MAX_CELL_SLOTS],
    i: usize,
    b: &[VertexKey; MAX_CELL_SLOTS],
    j: usize,
    dimension: i32,
) -> bool {
    match dimension {
        1 => i + j == 1,
        2 => a[ccw(i)] == b[cw(j)] && a[cw(i)] == b[ccw(j)],
        3 => {
            let ta = make_canonical([0, 1, 2].map(|k| a[vertex_triple_index(i, k)]));
            let tb = make_canonical([0, 1, 2].map(|k| b[vertex_triple_index(j, k)]));
            ta == reversed_triple(tb)
        }
        _ => true,
    }
}

impl<P> Tds<P> {
    /// The empty structure: dimension -1, the infinite vertex and its cell.
    #[must_use]
    pub fn new() -> Self {
        let mut vertices = StorageMap::with_key();
        let mut cells = StorageMap::with_key();
        let infinite = vertices.insert(Vertex::infinite());
        let mut slots = [VertexKey::null(); MAX_CELL_SLOTS];
        slots[0] = infinite;
        let cell = cells.insert(Cell::new(slots));
        vertices[infinite].cell = cell;
        Self {
            vertices,
            cells,
            infinite,
            dimension: -1,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current dimension, in `-1..=3`.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> i32 {
        self.dimension
    }

    /// Number of slots in use per cell (`dimension + 1`, at least 1).
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        usize::try_from(self.dimension + 1).unwrap_or(0).max(1)
    }

    /// The infinite vertex.
    #[inline]
    #[must_use]
    pub const fn infinite_vertex(&self) -> VertexKey {
        self.infinite
    }

    /// Number of finite vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Number of cells, infinite ones included.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// The vertex record for `v`.
    #[must_use]
    pub fn vertex(&self, v: VertexKey) -> Option<&Vertex<P>> {
        self.vertices.get(v)
    }

    /// The cell record for `c`.
    #[must_use]
    pub fn cell(&self, c: CellKey) -> Option<&Cell> {
        self.cells.get(c)
    }

    /// The point of `v`; `None` for the infinite vertex or a stale key.
    #[must_use]
    pub fn point(&self, v: VertexKey) -> Option<&P> {
        self.vertices.get(v).and_then(Vertex::point)
    }

    /// All vertex keys, the infinite vertex included.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    /// All cell keys.
    pub fn cell_keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys()
    }

    /// All cells with their keys.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &Cell)> + '_ {
        self.cells.iter()
    }

    /// True when `v` is a live vertex.
    #[must_use]
    pub fn contains_vertex(&self, v: VertexKey) -> bool {
        self.vertices.contains_key(v)
    }

    /// True when `c` is a live cell.
    #[must_use]
    pub fn contains_cell(&self, c: CellKey) -> bool {
        self.cells.contains_key(c)
    }

    /// True when `c` has the infinite vertex among its used slots.
    #[must_use]
    pub fn is_infinite_cell(&self, c: CellKey) -> bool {
        self.cells
            .get(c)
            .is_some_and(|cell| cell.vertices()[..self.arity()].contains(&self.infinite))
    }

    pub(crate) fn checked_cell(&self, c: CellKey) -> Result<&Cell, TdsError> {
        self.cells.get(c).ok_or(TdsError::UnknownCell(c))
    }

    pub(crate) fn checked_vertex(&self, v: VertexKey) -> Result<&Vertex<P>, TdsError> {
        self.vertices.get(v).ok_or(TdsError::UnknownVertex(v))
    }

    pub(crate) fn check_slot(&self, index: usize) -> Result<(), TdsError> {
        if index < self.arity() && self.dimension >= 0 {
            Ok(())
        } else {
            Err(TdsError::IndexOutOfRange {
                index,
                dimension: self.dimension,
            })
        }
    }

    // -------------------------------------------------------------------------
    // Local queries
    // -------------------------------------------------------------------------

    /// Slot of `c` in its neighbor across slot `i`.
    ///
    /// # Errors
    ///
    /// Returns an error for a stale key, an out-of-range slot, or a neighbor
    /// that does not point back.
    pub fn mirror_index(&self, c: CellKey, i: usize) -> Result<usize, TdsError> {
        self.check_slot(i)?;
        let neighbor = self.checked_cell(c)?.neighbor(i);
        self.checked_cell(neighbor)?
            .index_of_neighbor(c)
            .ok_or(TdsError::NotNeighbors { cell: c, neighbor })
    }

    /// Vertex of the neighbor across slot `i` that is not in `c`.
    ///
    /// # Errors
    ///
    /// Same as [`mirror_index`](Self::mirror_index).
    pub fn mirror_vertex(&self, c: CellKey, i: usize) -> Result<VertexKey, TdsError> {
        let j = self.mirror_index(c, i)?;
        let neighbor = self.checked_cell(c)?.neighbor(i);
        Ok(self.checked_cell(neighbor)?.vertex(j))
    }

    /// Slot of `v` in `c`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownCell`] for a stale cell and
    /// [`TdsError::UnknownVertex`] if `v` is not in `c`.
    pub fn index_of(&self, c: CellKey, v: VertexKey) -> Result<usize, TdsError> {
        self.checked_cell(c)?
            .index_of(v)
            .ok_or(TdsError::UnknownVertex(v))
    }

    /// True when `c` is live and contains `v`.
    #[must_use]
    pub fn has_vertex(&self, c: CellKey, v: VertexKey) -> bool {
        self.cells.get(c).is_some_and(|cell| cell.has_vertex(v))
    }

    /// All cells containing `v`, found by flooding its star from
    /// `v.cell()`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownVertex`] for a stale key.
    pub fn incident_cells(&self, v: VertexKey) -> Result<CellKeyBuffer, TdsError> {
        let start = self.checked_vertex(v)?.cell();
        self.checked_cell(start)?;
        let arity = self.arity();
        let mut star = CellKeyBuffer::new();
        let mut seen: FastHashSet<CellKey> = fast_hash_set_with_capacity(32);
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(c) = stack.pop() {
            star.push(c);
            let cell = &self.cells[c];
            if self.dimension < 1 {
                continue;
            }
            for i in 0..arity {
                if cell.vertex(i) == v {
                    continue;
                }
                let n = cell.neighbor(i);
                if self.has_vertex(n, v) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        Ok(star)
    }

    /// All vertices adjacent to `v`, the infinite vertex included.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownVertex`] for a stale key.
    pub fn incident_vertices(&self, v: VertexKey) -> Result<VertexKeyBuffer, TdsError> {
        let arity = self.arity();
        let mut link = VertexKeyBuffer::new();
        for c in self.incident_cells(v)? {
            for &w in &self.cells[c].vertices()[..arity] {
                if w != v && !link.contains(&w) {
                    link.push(w);
                }
            }
        }
        Ok(link)
    }

    /// Number of vertices adjacent to `v`, the infinite vertex included.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::UnknownVertex`] for a stale key.
    pub fn degree(&self, v: VertexKey) -> Result<usize, TdsError> {
        Ok(self.incident_vertices(v)?.len())
    }

    /// The cells around the edge `(c, i, j)` of a 3D triangulation, starting
    /// with `c` and turning in the direction of
    /// [`next_around_edge`](super::util::next_around_edge).
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3, for a stale key, for `i == j`,
    /// or when the ring does not close.
    pub fn cells_around_edge(
        &self,
        c: CellKey,
        i: usize,
        j: usize,
    ) -> Result<CellKeyBuffer, TdsError> {
        if self.dimension != 3 {
            return Err(TdsError::WrongDimension {
                required: "3",
                actual: self.dimension,
            });
        }
        self.check_slot(i)?;
        self.check_slot(j)?;
        if i == j {
            return Err(TdsError::IndexOutOfRange {
                index: j,
                dimension: self.dimension,
            });
        }
        let first = self.checked_cell(c)?;
        let (a, b) = (first.vertex(i), first.vertex(j));
        let mut ring = CellKeyBuffer::new();
        let (mut current, mut ci, mut cj) = (c, i, j);
        loop {
            ring.push(current);
            if ring.len() > self.cells.len() {
                return Err(TdsError::BrokenCycle(c));
            }
            let next = self.checked_cell(current)?.neighbor(next_around_edge(ci, cj));
            if next == c {
                return Ok(ring);
            }
            let cell = self.checked_cell(next)?;
            match (cell.index_of(a), cell.index_of(b)) {
                (Some(ni), Some(nj)) => {
                    current = next;
                    ci = ni;
                    cj = nj;
                }
                _ => return Err(TdsError::BrokenCycle(c)),
            }
        }
    }

    /// True when `v` is a live vertex.
    #[must_use]
    pub fn is_vertex(&self, v: VertexKey) -> bool {
        self.contains_vertex(v)
    }

    /// The edge `(u, v)`, if it exists (dimension at least 1).
    #[must_use]
    pub fn is_edge(&self, u: VertexKey, v: VertexKey) -> Option<Edge> {
        if self.dimension < 1 || u == v {
            return None;
        }
        let star = self.incident_cells(u).ok()?;
        star.into_iter().find_map(|c| {
            let cell = &self.cells[c];
            Some(Edge::new(c, cell.index_of(u)?, cell.index_of(v)?))
        })
    }

    /// The facet `(u, v, w)`, if it exists (dimension at least 2).
    ///
    /// In dimension 2 the facet is the face itself and the returned index is
    /// 3, as in CGAL.
    #[must_use]
    pub fn is_facet(&self, u: VertexKey, v: VertexKey, w: VertexKey) -> Option<Facet> {
        if self.dimension < 2 || u == v || v == w || u == w {
            return None;
        }
        let star = self.incident_cells(u).ok()?;
        star.into_iter().find_map(|c| {
            let cell = &self.cells[c];
            let slots = [cell.index_of(u)?, cell.index_of(v)?, cell.index_of(w)?];
            let index = if self.dimension == 2 {
                3
            } else {
                6 - slots.iter().sum::<usize>()
            };
            Some(Facet::new(c, index))
        })
    }

    /// The cell with vertex set `{u, v, w, x}`, if it exists (dimension 3).
    #[must_use]
    pub fn is_cell(&self, u: VertexKey, v: VertexKey, w: VertexKey, x: VertexKey) -> Option<CellKey> {
        if self.dimension != 3 {
            return None;
        }
        let star = self.incident_cells(u).ok()?;
        star.into_iter().find(|&c| {
            let cell = &self.cells[c];
            cell.has_vertex(v) && cell.has_vertex(w) && cell.has_vertex(x)
        })
    }

    // -------------------------------------------------------------------------
    // Low-level primitives
    // -------------------------------------------------------------------------

    /// Adds a detached finite vertex.
    ///
    /// The vertex must be attached to a cell before the structure is valid
    /// again.
    pub fn create_vertex(&mut self, point: P) -> VertexKey {
        self.vertices.insert(Vertex::new(point))
    }

    /// Adds a cell over `vertices`, with no neighbors.
    pub fn create_cell(&mut self, vertices: [VertexKey; MAX_CELL_SLOTS]) -> CellKey {
        self.cells.insert(Cell::new(vertices))
    }

    /// Removes a cell. Neighbors still pointing to it must be relinked.
    pub fn delete_cell(&mut self, c: CellKey) -> Option<Cell> {
        self.cells.remove(c)
    }

    /// Removes a group of cells.
    pub fn delete_cells(&mut self, cells: &[CellKey]) {
        for &c in cells {
            self.cells.remove(c);
        }
    }

    /// Removes a finite vertex and returns its record.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex and stale keys.
    pub fn delete_vertex(&mut self, v: VertexKey) -> Result<Vertex<P>, TdsError> {
        if v == self.infinite {
            return Err(TdsError::InfiniteVertex);
        }
        self.vertices.remove(v).ok_or(TdsError::UnknownVertex(v))
    }

    /// Makes `c0` (across `i0`) and `c1` (across `i1`) neighbors.
    ///
    /// # Errors
    ///
    /// Returns an error for stale keys or out-of-range slots.
    pub fn set_adjacency(
        &mut self,
        c0: CellKey,
        i0: usize,
        c1: CellKey,
        i1: usize,
    ) -> Result<(), TdsError> {
        if i0 >= MAX_CELL_SLOTS || i1 >= MAX_CELL_SLOTS {
            return Err(TdsError::IndexOutOfRange {
                index: i0.max(i1),
                dimension: self.dimension,
            });
        }
        self.checked_cell(c0)?;
        self.checked_cell(c1)?;
        self.cells[c0].set_neighbor(i0, c1);
        self.cells[c1].set_neighbor(i1, c0);
        Ok(())
    }

    /// Records `c` as the incident cell of `v`.
    ///
    /// # Errors
    ///
    /// Returns an error for stale keys.
    pub fn set_vertex_cell(&mut self, v: VertexKey, c: CellKey) -> Result<(), TdsError> {
        self.checked_cell(c)?;
        self.vertices
            .get_mut(v)
            .ok_or(TdsError::UnknownVertex(v))?
            .cell = c;
        Ok(())
    }

    /// Overwrites the point of a finite vertex, returning the previous one.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex and stale keys.
    pub fn replace_point(&mut self, v: VertexKey, point: P) -> Result<Option<P>, TdsError> {
        if v == self.infinite {
            return Err(TdsError::InfiniteVertex);
        }
        Ok(self
            .vertices
            .get_mut(v)
            .ok_or(TdsError::UnknownVertex(v))?
            .replace_point(point))
    }

    pub(crate) fn set_dimension(&mut self, dimension: i32) {
        self.dimension = dimension;
    }

    /// Reverses the combinatorial orientation of every cell.
    pub fn reorient(&mut self) {
        for cell in self.cells.values_mut() {
            cell.change_orientation();
        }
    }

    // -------------------------------------------------------------------------
    // Region rewrite
    // -------------------------------------------------------------------------

    /// Replaces the cells `old_cells` by cells over the vertex tuples
    /// `new_cells`.
    ///
    /// Every facet of a new cell must either be shared with exactly one other
    /// new cell or coincide with exactly one facet on the boundary of the old
    /// region, and every boundary facet must be covered. All links are planned
    /// from sorted facet keys before the arenas are touched. Vertices found
    /// only in the old region are removed and returned.
    ///
    /// Tuples use slots `0..=dimension`; the remaining slots must be null.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::RegionMismatch`] (and leaves the structure
    /// untouched) when the plan does not close up, when a new cell would
    /// traverse a shared facet in the same order as its neighbor, or when the
    /// infinite vertex would be dropped.
    pub fn rewrite_region(
        &mut self,
        old_cells: &[CellKey],
        new_cells: &[[VertexKey; MAX_CELL_SLOTS]],
    ) -> Result<RegionRewrite<P>, TdsError> {
        if self.dimension < 1 {
            return Err(TdsError::WrongDimension {
                required: "1..=3",
                actual: self.dimension,
            });
        }
        let links = self.plan_rewrite(old_cells, new_cells)?;
        let arity = self.arity();

        let mut orphans: FastHashSet<VertexKey> = FastHashSet::default();
        for &c in old_cells {
            orphans.extend(self.cells[c].vertices()[..arity].iter().copied());
        }
        for tuple in new_cells {
            for v in &tuple[..arity] {
                orphans.remove(v);
            }
        }
        if orphans.contains(&self.infinite) {
            return Err(TdsError::RegionMismatch {
                reason: "the infinite vertex would lose every cell".to_string(),
            });
        }

        self.delete_cells(old_cells);
        let created: CellKeyBuffer = new_cells
            .iter()
            .map(|tuple| self.cells.insert(Cell::new(*tuple)))
            .collect();
        for link in links {
            match link {
                PlannedLink::Inner((ta, ia), (tb, ib)) => {
                    self.cells[created[ta]].set_neighbor(ia, created[tb]);
                    self.cells[created[tb]].set_neighbor(ib, created[ta]);
                }
                PlannedLink::Outer((t, i), (outer, j)) => {
                    self.cells[created[t]].set_neighbor(i, outer);
                    self.cells[outer].set_neighbor(j, created[t]);
                }
            }
        }
        for (&c, tuple) in created.iter().zip(new_cells) {
            for &v in &tuple[..arity] {
                self.vertices[v].cell = c;
            }
        }

        let mut removed_vertices = Vec::with_capacity(orphans.len());
        for v in orphans {
            if let Some(point) = self.vertices.remove(v).and_then(Vertex::into_point) {
                removed_vertices.push((v, point));
            }
        }
        Ok(RegionRewrite {
            new_cells: created,
            removed_vertices,
        })
    }

    /// Validates a rewrite and computes its links without mutating.
    fn plan_rewrite(
        &self,
        old_cells: &[CellKey],
        new_cells: &[[VertexKey; MAX_CELL_SLOTS]],
    ) -> Result<Vec<PlannedLink>, TdsError> {
        let mismatch = |reason: &str| TdsError::RegionMismatch {
            reason: reason.to_string(),
        };
        let arity = self.arity();

        let mut region: FastHashSet<CellKey> = fast_hash_set_with_capacity(old_cells.len());
        for &c in old_cells {
            self.checked_cell(c)?;
            if !region.insert(c) {
                return Err(mismatch("a cell is listed twice"));
            }
        }
        for tuple in new_cells {
            for (slot, &v) in tuple.iter().enumerate() {
                if slot >= arity {
                    if !v.is_null() {
                        return Err(mismatch("a tuple uses a slot above the dimension"));
                    }
                    continue;
                }
                self.checked_vertex(v)?;
                if tuple[..slot].contains(&v) {
                    return Err(mismatch("a tuple repeats a vertex"));
                }
            }
        }

        let mut outer: FastHashMap<SimplexKey, (CellKey, usize)> =
            fast_hash_map_with_capacity(old_cells.len() * arity);
        for &c in old_cells {
            let cell = &self.cells[c];
            for i in 0..arity {
                let n = cell.neighbor(i);
                if region.contains(&n) {
                    continue;
                }
                let j = self.mirror_index(c, i)?;
                if outer
                    .insert(facet_key(cell.vertices(), i, arity), (n, j))
                    .is_some()
                {
                    return Err(mismatch("a boundary facet appears twice"));
                }
            }
        }

        let mut sides: FastHashMap<SimplexKey, SmallBuffer<(usize, usize), 2>> =
            fast_hash_map_with_capacity(new_cells.len() * arity);
        for (t, tuple) in new_cells.iter().enumerate() {
            for i in 0..arity {
                let entry = sides.entry(facet_key(tuple, i, arity)).or_default();
                entry.push((t, i));
                if entry.len() > 2 {
                    return Err(mismatch("a facet is shared by more than two new cells"));
                }
            }
        }

        let mut links = Vec::with_capacity(sides.len());
        for (key, slots) in sides {
            match slots.as_slice() {
                &[a, b] => {
                    if outer.contains_key(&key) {
                        return Err(mismatch("an inner facet also lies on the boundary"));
                    }
                    if !opposite_facets(&new_cells[a.0], a.1, &new_cells[b.0], b.1, self.dimension) {
                        return Err(mismatch("two new cells disagree on orientation"));
                    }
                    links.push(PlannedLink::Inner(a, b));
                }
                &[a] => {
                    let Some((n, j)) = outer.remove(&key) else {
                        return Err(mismatch("a new facet matches nothing"));
                    };
                    if !opposite_facets(
                        &new_cells[a.0],
                        a.1,
                        self.cells[n].vertices(),
                        j,
                        self.dimension,
                    ) {
                        return Err(mismatch("a new cell disagrees with the boundary orientation"));
                    }
                    links.push(PlannedLink::Outer(a, (n, j)));
                }
                _ => return Err(mismatch("empty facet record")),
            }
        }
        if !outer.is_empty() {
            return Err(mismatch("a boundary facet is left uncovered"));
        }
        Ok(links)
    }

    // -------------------------------------------------------------------------
    // Star insertion
    // -------------------------------------------------------------------------

    /// Replaces the connected region `cells` by the star of a new vertex over
    /// the region's boundary.
    ///
    /// `boundary` must be a facet of a region cell whose neighbor lies
    /// outside the region. Returns the new vertex together with the rewrite
    /// record (vertices interior to the region are removed and reported).
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NotBoundaryFacet`] for a bad `boundary`, and any
    /// [`rewrite_region`](Self::rewrite_region) error when the region is not a
    /// ball; the structure is unchanged in both cases.
    pub fn insert_in_hole(
        &mut self,
        point: P,
        cells: &[CellKey],
        boundary: Facet,
    ) -> Result<(VertexKey, RegionRewrite<P>), TdsError> {
        let arity = self.arity();
        let region: FastHashSet<CellKey> = cells.iter().copied().collect();
        self.check_slot(boundary.index)?;
        let on_boundary = region.contains(&boundary.cell)
            && !region.contains(&self.checked_cell(boundary.cell)?.neighbor(boundary.index));
        if !on_boundary {
            return Err(TdsError::NotBoundaryFacet(boundary));
        }

        let v = self.create_vertex(point);
        let mut tuples = Vec::with_capacity(cells.len() * 2);
        for &c in cells {
            let Some(cell) = self.cells.get(c) else {
                self.vertices.remove(v);
                return Err(TdsError::UnknownCell(c));
            };
            for i in 0..arity {
                if !region.contains(&cell.neighbor(i)) {
                    let mut tuple = *cell.vertices();
                    tuple[i] = v;
                    tuples.push(tuple);
                }
            }
        }
        match self.rewrite_region(cells, &tuples) {
            Ok(rewrite) => Ok((v, rewrite)),
            Err(err) => {
                self.vertices.remove(v);
                Err(err)
            }
        }
    }

    /// Splits the cell `c` of a 3D triangulation into four.
    ///
    /// # Errors
    ///
    /// Returns an error outside dimension 3 or for a stale key.
    pub fn insert_in_cell(&mut self, c: CellKey, point: P) -> Result<VertexKey, TdsError> {
        if self.dimension != 3 {
            return Err(TdsError::WrongDimension {
                required: "3",
                actual: self.dimension,
            });
        }
        self.checked_cell(c)?;
        Ok(self.insert_in_hole(point, &[c], Facet::new(c, 0))?.0)
    }

    /// Splits the facet `(c, i)`: the two cells sharing it in dimension 3, or
    /// the face `c` itself in dimension 2 (where `i` must be 3).
    ///
    /// # Errors
    ///
    /// Returns an error below dimension 2, for a stale key or a bad index.
    pub fn insert_in_facet(&mut self, c: CellKey, i: usize, point: P) -> Result<VertexKey, TdsError> {
        let cell = self.checked_cell(c)?;
        match self.dimension {
            3 => {
                self.check_slot(i)?;
                let n = cell.neighbor(i);
                let boundary = Facet::new(c, (i + 1) % 4);
                Ok(self.insert_in_hole(point, &[c, n], boundary)?.0)
            }
            2 => {
                if i != 3 {
                    return Err(TdsError::IndexOutOfRange {
                        index: i,
                        dimension: self.dimension,
                    });
                }
                Ok(self.insert_in_hole(point, &[c], Facet::new(c, 0))?.0)
            }
            actual => Err(TdsError::WrongDimension {
                required: "2..=3",
                actual,
            }),
        }
    }

    /// Splits the edge `(c, i, j)` and every cell around it.
    ///
    /// # Errors
    ///
    /// Returns an error below dimension 1, for a stale key or bad indices.
    pub fn insert_in_edge(
        &mut self,
        c: CellKey,
        i: usize,
        j: usize,
        point: P,
    ) -> Result<VertexKey, TdsError> {
        self.check_slot(i)?;
        self.check_slot(j)?;
        if i == j {
            return Err(TdsError::IndexOutOfRange {
                index: j,
                dimension: self.dimension,
            });
        }
        let cell = self.checked_cell(c)?;
        let hole: CellKeyBuffer = match self.dimension {
            3 => self.cells_around_edge(c, i, j)?,
            2 => [c, cell.neighbor(3 - i - j)].into_iter().collect(),
            1 => [c].into_iter().collect(),
            actual => {
                return Err(TdsError::WrongDimension {
                    required: "1..=3",
                    actual,
                });
            }
        };
        Ok(self.insert_in_hole(point, &hole, Facet::new(c, i))?.0)
    }

    // -------------------------------------------------------------------------
    // Dimension changes
    // -------------------------------------------------------------------------

    /// Adds a vertex outside the affine hull, raising the dimension by one.
    ///
    /// The new vertex is joined to every existing cell, and every finite cell
    /// is joined to the infinite vertex with its first two slots swapped. The
    /// caller decides afterwards whether the new finite cells need a global
    /// [`reorient`](Self::reorient).
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::WrongDimension`] at dimension 3.
    pub fn insert_increase_dimension(&mut self, point: P) -> Result<VertexKey, TdsError> {
        let inf = self.infinite;
        let star = self.vertices[inf].cell();
        match self.dimension {
            -1 => {
                let v = self.create_vertex(point);
                let d = self.create_cell([v, VertexKey::null(), VertexKey::null(), VertexKey::null()]);
                self.set_adjacency(star, 0, d, 0)?;
                self.vertices[v].cell = d;
                self.dimension = 0;
                Ok(v)
            }
            0 => {
                let v = self.create_vertex(point);
                let d = self.checked_cell(star)?.neighbor(0);
                let w = self.checked_cell(d)?.vertex(0);
                self.cells[star].set_vertex(1, w);
                self.cells[d].set_vertex(1, v);
                let e = self.create_cell([v, inf, VertexKey::null(), VertexKey::null()]);
                self.set_adjacency(e, 0, star, 1)?;
                self.set_adjacency(e, 1, d, 0)?;
                self.set_adjacency(d, 1, star, 0)?;
                self.vertices[v].cell = e;
                self.dimension = 1;
                Ok(v)
            }
            d @ 1..=2 => {
                let top = usize::try_from(d).unwrap_or(0) + 1;
                let old: Vec<CellKey> = self.cells.keys().collect();
                let v = self.create_vertex(point);
                let swap01 = |i: usize| match i {
                    0 => 1,
                    1 => 0,
                    other => other,
                };

                // Finite cells get a twin on the infinite side.
                let mut twins: FastHashMap<CellKey, CellKey> = fast_hash_map_with_capacity(old.len());
                for &c in &old {
                    let cell = &self.cells[c];
                    if cell.has_vertex(inf) {
                        continue;
                    }
                    let mut tuple = *cell.vertices();
                    tuple.swap(0, 1);
                    tuple[top] = inf;
                    let twin = self.cells.insert(Cell::new(tuple));
                    twins.insert(c, twin);
                }
                for &c in &old {
                    self.cells[c].set_vertex(top, v);
                }
                for &c in &old {
                    let Some(&twin) = twins.get(&c) else {
                        continue;
                    };
                    self.set_adjacency(c, top, twin, top)?;
                    for i in 0..top {
                        let n = self.cells[c].neighbor(i);
                        if let Some(&n_twin) = twins.get(&n) {
                            self.cells[twin].set_neighbor(swap01(i), n_twin);
                        } else {
                            // `n` is infinite: its facet opposite `v` is the
                            // cone of this twin's facet.
                            self.set_adjacency(twin, swap01(i), n, top)?;
                        }
                    }
                }
                self.vertices[v].cell = old[0];
                self.dimension = d + 1;
                tracing::debug!(dimension = self.dimension, "raised triangulation dimension");
                Ok(v)
            }
            actual => Err(TdsError::WrongDimension {
                required: "-1..=2",
                actual,
            }),
        }
    }

    /// Removes `v` and lowers the dimension by one.
    ///
    /// The triangulation must be the join of `v` with a triangulation of the
    /// other vertices (every finite cell contains `v`). Cells containing the
    /// infinite vertex are kept and lose one slot; all others are deleted.
    /// Returns the point of `v`.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex, stale keys and dimension -1.
    pub fn remove_decrease_dimension(&mut self, v: VertexKey) -> Result<P, TdsError> {
        if v == self.infinite {
            return Err(TdsError::InfiniteVertex);
        }
        let vcell = self.checked_vertex(v)?.cell();
        let inf = self.infinite;
        match self.dimension {
            0 => {
                let n = self.checked_cell(vcell)?.neighbor(0);
                self.cells.remove(vcell);
                if let Some(cell) = self.cells.get_mut(n) {
                    cell.set_neighbor(0, CellKey::null());
                }
            }
            d @ 1..=3 => {
                let top = usize::try_from(d).unwrap_or(0);
                let (keep, drop): (Vec<CellKey>, Vec<CellKey>) = self
                    .cells
                    .keys()
                    .partition(|&k| self.cells[k].has_vertex(inf));
                for &f in &keep {
                    let cell = &mut self.cells[f];
                    let Some(j) = cell.index_of(inf) else {
                        continue;
                    };
                    if let Some(k) = cell.index_of(v) {
                        cell.set_vertex(k, inf);
                    }
                    if j != top {
                        let (vd, nd) = (cell.vertex(top), cell.neighbor(top));
                        cell.set_vertex(j, vd);
                        cell.set_neighbor(j, nd);
                        cell.change_orientation();
                    }
                    cell.set_vertex(top, VertexKey::null());
                    cell.set_neighbor(top, CellKey::null());
                    let slots: SmallBuffer<VertexKey, MAX_CELL_SLOTS> =
                        cell.vertices()[..top].iter().copied().collect();
                    for w in slots {
                        self.vertices[w].cell = f;
                    }
                }
                self.delete_cells(&drop);
            }
            actual => {
                return Err(TdsError::WrongDimension {
                    required: "0..=3",
                    actual,
                });
            }
        }
        let removed = self.delete_vertex(v)?;
        self.dimension -= 1;
        tracing::debug!(dimension = self.dimension, "lowered triangulation dimension");
        removed.into_point().ok_or(TdsError::InfiniteVertex)
    }

    /// Splices a vertex of degree 2 out of a 1D triangulation, merging its
    /// two edges into one. Returns the point of `v`.
    ///
    /// # Errors
    ///
    /// Refuses the infinite vertex, stale keys, dimensions other than 1, and
    /// chains with fewer than three finite vertices.
    pub fn remove_from_maximal_dimension_simplex(&mut self, v: VertexKey) -> Result<P, TdsError> {
        if self.dimension != 1 {
            return Err(TdsError::WrongDimension {
                required: "1",
                actual: self.dimension,
            });
        }
        if v == self.infinite {
            return Err(TdsError::InfiniteVertex);
        }
        if self.number_of_vertices() < 3 {
            return Err(TdsError::RegionMismatch {
                reason: "a line needs two finite vertices after removal".to_string(),
            });
        }
        let c = self.checked_vertex(v)?.cell();
        let i = self.index_of(c, v)?;
        // left = (x, v), right = (v, y)
        let (left, right) = if i == 1 {
            (c, self.cells[c].neighbor(0))
        } else {
            (self.cells[c].neighbor(1), c)
        };
        let x = self.checked_cell(left)?.vertex(0);
        let y = self.checked_cell(right)?.vertex(1);
        let tuple = [x, y, VertexKey::null(), VertexKey::null()];
        let mut rewrite = self.rewrite_region(&[left, right], &[tuple])?;
        rewrite
            .removed_vertices
            .pop()
            .map(|(_, point)| point)
            .ok_or(TdsError::RegionMismatch {
                reason: "the spliced vertex was not removed".to_string(),
            })
    }

    // -------------------------------------------------------------------------
    // Flips
    // -------------------------------------------------------------------------

    /// Replaces the two tetrahedra sharing facet `(c, i)` by three tetrahedra
    /// around the edge joining their opposite vertices.
    ///
    /// Only combinatorial preconditions are checked; orientation is the
    /// caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NotFlippable`] when the new edge already exists,
    /// and the usual key and dimension errors.
    pub fn flip_2_3(&mut self, c: CellKey, i: usize) -> Result<CellKeyBuffer, TdsError> {
        let (n, tuples) = self.plan_flip_2_3(c, i)?;
        Ok(self.rewrite_region(&[c, n], &tuples)?.new_cells)
    }

    /// The neighbor across `(c, i)` and the three cells a 2-3 flip creates.
    pub(crate) fn plan_flip_2_3(
        &self,
        c: CellKey,
        i: usize,
    ) -> Result<(CellKey, [[VertexKey; MAX_CELL_SLOTS]; 3]), TdsError> {
        if self.dimension != 3 {
            return Err(TdsError::WrongDimension {
                required: "3",
                actual: self.dimension,
            });
        }
        self.check_slot(i)?;
        let cell = self.checked_cell(c)?;
        let n = cell.neighbor(i);
        let a = cell.vertex(i);
        let b = self.mirror_vertex(c, i)?;
        if self.is_edge(a, b).is_some() {
            return Err(TdsError::NotFlippable {
                reason: "the opposite vertices are already joined by an edge",
            });
        }
        let t = [0, 1, 2].map(|k| cell.vertex(vertex_triple_index(i, k)));
        let tuples = [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])].map(|(x, y)| [x, y, b, a]);
        Ok((n, tuples))
    }

    /// Replaces the three tetrahedra around the edge `(c, i, j)` by two
    /// tetrahedra sharing the triangle of their other vertices.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NotFlippable`] when the edge degree is not 3 or
    /// the new triangle already exists, and the usual key and dimension
    /// errors.
    pub fn flip_3_2(&mut self, c: CellKey, i: usize, j: usize) -> Result<CellKeyBuffer, TdsError> {
        let (ring, tuples) = self.plan_flip_3_2(c, i, j)?;
        Ok(self.rewrite_region(&ring, &tuples)?.new_cells)
    }

    /// The ring around `(c, i, j)` and the two cells a 3-2 flip creates.
    pub(crate) fn plan_flip_3_2(
        &self,
        c: CellKey,
        i: usize,
        j: usize,
    ) -> Result<(CellKeyBuffer, [[VertexKey; MAX_CELL_SLOTS]; 2]), TdsError> {
        let ring = self.cells_around_edge(c, i, j)?;
        if ring.len() != 3 {
            return Err(TdsError::NotFlippable {
                reason: "the edge does not have degree 3",
            });
        }
        let cell = self.checked_cell(c)?;
        let k = next_around_edge(i, j);
        let (s, t) = (cell.vertex(i), cell.vertex(j));
        let p = cell.vertex(k);
        let q = cell.vertex(next_around_edge(j, i));
        let r = self.mirror_vertex(c, k)?;
        if self.is_facet(p, q, r).is_some() {
            return Err(TdsError::NotFlippable {
                reason: "the triangle of the link already exists",
            });
        }
        Ok((ring, [[p, q, r, t], [q, p, r, s]]))
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Checks the combinatorial invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TdsValidationError> {
        if !(-1..=3).contains(&self.dimension) {
            return Err(TdsValidationError::InvalidDimension(self.dimension));
        }
        if !self
            .vertices
            .get(self.infinite)
            .is_some_and(Vertex::is_infinite)
        {
            return Err(TdsValidationError::InfiniteVertex(self.infinite));
        }
        let required = usize::try_from(self.dimension + 1).unwrap_or(0);
        if self.number_of_vertices() < required {
            return Err(TdsValidationError::TooFewVertices {
                dimension: self.dimension,
                required,
                found: self.number_of_vertices(),
            });
        }
        let expected_cells = match self.dimension {
            -1 => Some(1),
            0 => Some(2),
            1 => Some(self.number_of_vertices() + 1),
            _ => None,
        };
        if let Some(expected) = expected_cells
            && expected != self.cells.len()
        {
            return Err(TdsValidationError::CellCount {
                dimension: self.dimension,
                expected,
                found: self.cells.len(),
            });
        }

        let arity = self.arity();
        for (key, vertex) in &self.vertices {
            if vertex.is_infinite() && key != self.infinite {
                return Err(TdsValidationError::ExtraInfiniteVertex(key));
            }
            if !self.has_vertex(vertex.cell(), key) {
                return Err(TdsValidationError::VertexCell {
                    vertex: key,
                    cell: vertex.cell(),
                });
            }
        }

        for (key, cell) in &self.cells {
            for slot in 0..MAX_CELL_SLOTS {
                let v = cell.vertex(slot);
                let bad_vertex = if slot < arity {
                    !self.vertices.contains_key(v) || cell.vertices()[..slot].contains(&v)
                } else {
                    !v.is_null()
                };
                if bad_vertex {
                    return Err(TdsValidationError::CellVertex { cell: key, slot });
                }
                let n = cell.neighbor(slot);
                let neighbors_used = self.dimension >= 0 && slot < arity;
                let bad_neighbor = if neighbors_used {
                    !self.cells.contains_key(n) || n == key
                } else {
                    !n.is_null()
                };
                if bad_neighbor {
                    return Err(TdsValidationError::CellNeighbor { cell: key, slot });
                }
            }
            if self.dimension < 0 {
                continue;
            }
            for slot in 0..arity {
                let n = cell.neighbor(slot);
                let neighbor = &self.cells[n];
                let Some(mirror) = neighbor.index_of_neighbor(key) else {
                    return Err(TdsValidationError::NeighborAsymmetry { cell: key, slot });
                };
                if self.dimension >= 1
                    && facet_key(cell.vertices(), slot, arity)
                        != facet_key(neighbor.vertices(), mirror, arity)
                {
                    return Err(TdsValidationError::FacetMismatch { cell: key, slot });
                }
                if !opposite_facets(
                    cell.vertices(),
                    slot,
                    neighbor.vertices(),
                    mirror,
                    self.dimension,
                ) {
                    return Err(TdsValidationError::InconsistentOrientation { cell: key, slot });
                }
            }
        }
        Ok(())
    }
}

/// Builds a vertex tuple from the used slots, padding with null keys.
///
/// ```rust
/// use triangulation3::core::triangulation_data_structure::{VertexKey, cell_tuple};
/// use slotmap::Key;
///
/// let tuple = cell_tuple(&[VertexKey::null(); 2]);
/// assert!(tuple.iter().all(|k| k.is_null()));
/// ```
#[must_use]
pub fn cell_tuple(vertices: &[VertexKey]) -> [VertexKey; MAX_CELL_SLOTS] {
    let mut tuple = [VertexKey::null(); MAX_CELL_SLOTS];
    for (slot, &v) in tuple.iter_mut().zip(vertices) {
        *slot = v;
    }
    tuple
}

// =============================================================================
// TESTS
// =============================================================================
