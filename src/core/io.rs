//! Text and serde round trips.
//!
//! Both forms share one indexed layout, [`TriangulationSnapshot`]: index 0
//! is the infinite vertex, finite vertices follow, and every cell lists
//! `dimension + 1` vertex indices and as many neighbor indices. The text
//! form is
//!
//! ```text
//! <dimension>
//! <number of finite vertices>
//! <x y z>                one line per finite vertex
//! <number of cells>
//! <vertex indices>       one line per cell
//! <neighbor indices>     one line per cell
//! ```
//!
//! The empty triangulation is written as dimension -1 with no vertices and
//! no cells. Reading rebuilds the store and runs the combinatorial validator
//! before handing it out.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slotmap::Key;

use crate::core::collections::{MAX_CELL_SLOTS, VertexSecondaryMap, fast_hash_map_with_capacity};
use crate::core::triangulation::{Triangulation3, TriangulationConfig};
use crate::core::triangulation_data_structure::{CellKey, Tds, TdsError, TdsValidationError, VertexKey};
use crate::geometry::kernel::Kernel;

/// Error while reading a triangulation.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The input ended early.
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    /// A token could not be parsed.
    #[error("Line {line}: cannot parse {what} from {text:?}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was being read.
        what: &'static str,
        /// The offending text.
        text: String,
    },

    /// The layout is inconsistent (wrong counts, bad indices, one-sided
    /// adjacency).
    #[error("Malformed triangulation: {0}")]
    Malformed(String),

    /// The rebuilt store is not a valid triangulation.
    #[error(transparent)]
    Invalid(#[from] TdsValidationError),

    /// A topology primitive refused the rebuilt data.
    #[error(transparent)]
    Tds(#[from] TdsError),
}

fn malformed(message: impl Into<String>) -> ReadError {
    ReadError::Malformed(message.into())
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Indexed copy of a triangulation.
///
/// # Examples
///
/// ```rust
/// use triangulation3::prelude::*;
///
/// let mut tr = Triangulation3::new(FastKernel::<f64>::new());
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
///     tr.insert(Point::new(p), None).unwrap();
/// }
/// let snapshot = tr.snapshot();
/// assert_eq!(snapshot.dimension, 2);
/// assert_eq!(snapshot.points.len(), 3);
/// // One triangle and one infinite face per hull edge.
/// assert_eq!(snapshot.cells.len(), 4);
///
/// let back = Triangulation3::from_snapshot(FastKernel::new(), snapshot).unwrap();
/// assert!(back == tr);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangulationSnapshot<P> {
    /// Dimension, in `-1..=3`.
    pub dimension: i32,
    /// Finite points; point `k` has vertex index `k + 1`.
    pub points: Vec<P>,
    /// Vertex indices of every cell.
    pub cells: Vec<Vec<usize>>,
    /// Neighbor (cell) indices of every cell, slot by slot.
    pub neighbors: Vec<Vec<usize>>,
}

impl<K: Kernel> Triangulation3<K> {
    /// Indexed copy of the triangulation.
    #[must_use]
    pub fn snapshot(&self) -> TriangulationSnapshot<K::Point> {
        let dimension = self.dimension();
        if dimension < 0 {
            return TriangulationSnapshot {
                dimension,
                points: Vec::new(),
                cells: Vec::new(),
                neighbors: Vec::new(),
            };
        }
        let arity = self.tds.arity();

        let mut vertex_index: VertexSecondaryMap<usize> = VertexSecondaryMap::new();
        vertex_index.insert(self.infinite_vertex(), 0);
        let mut points = Vec::with_capacity(self.number_of_vertices());
        for v in self.finite_vertices() {
            if let Some(p) = self.point(v) {
                points.push(p.clone());
                vertex_index.insert(v, points.len());
            }
        }

        let keys: Vec<CellKey> = self.cells().collect();
        let mut cell_index = fast_hash_map_with_capacity(keys.len());
        for (k, &c) in keys.iter().enumerate() {
            cell_index.insert(c, k);
        }

        let mut cells = Vec::with_capacity(keys.len());
        let mut neighbors = Vec::with_capacity(keys.len());
        for (_, cell) in self.tds.cells() {
            cells.push(
                cell.vertices()[..arity]
                    .iter()
                    .map(|&v| vertex_index.get(v).copied().unwrap_or_default())
                    .collect(),
            );
            neighbors.push(
                cell.neighbors()[..arity]
                    .iter()
                    .map(|n| cell_index.get(n).copied().unwrap_or_default())
                    .collect(),
            );
        }
        TriangulationSnapshot {
            dimension,
            points,
            cells,
            neighbors,
        }
    }

    /// Rebuilds a triangulation from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Malformed`] for inconsistent counts, indices or
    /// adjacency, and [`ReadError::Invalid`] when the result fails the
    /// combinatorial validator.
    pub fn from_snapshot(kernel: K, snapshot: TriangulationSnapshot<K::Point>) -> Result<Self, ReadError> {
        let tds = build_tds(snapshot)?;
        tds.is_valid()?;
        tracing::debug!(
            dimension = tds.dimension(),
            vertices = tds.number_of_vertices(),
            cells = tds.number_of_cells(),
            "rebuilt triangulation"
        );
        Ok(Self::from_parts(kernel, tds, TriangulationConfig::default()))
    }

    /// Writes the text form.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()>
    where
        K::Point: Display,
    {
        let snapshot = self.snapshot();
        writeln!(out, "{}", snapshot.dimension)?;
        writeln!(out, "{}", snapshot.points.len())?;
        for p in &snapshot.points {
            writeln!(out, "{p}")?;
        }
        writeln!(out, "{}", snapshot.cells.len())?;
        for row in snapshot.cells.iter().chain(&snapshot.neighbors) {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
        Ok(())
    }

    /// Reads the text form written by [`write_text`](Self::write_text).
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] for I/O failures, unparsable or truncated input
    /// and invalid triangulations.
    pub fn read_text<R: BufRead>(reader: R, kernel: K) -> Result<Self, ReadError>
    where
        K::Point: FromStr,
    {
        let mut lines = TextLines::new(reader)?;
        let dimension: i32 = lines.scalar("dimension")?;
        if !(-1..=3).contains(&dimension) {
            return Err(malformed(format!("dimension {dimension} is outside -1..=3")));
        }
        let n: usize = lines.scalar("vertex count")?;
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            points.push(lines.scalar::<K::Point>("point")?);
        }
        let m: usize = lines.scalar("cell count")?;
        let mut cells = Vec::with_capacity(m);
        for _ in 0..m {
            cells.push(lines.indices("vertex indices")?);
        }
        let mut neighbors = Vec::with_capacity(m);
        for _ in 0..m {
            neighbors.push(lines.indices("neighbor indices")?);
        }
        Self::from_snapshot(
            kernel,
            TriangulationSnapshot {
                dimension,
                points,
                cells,
                neighbors,
            },
        )
    }
}

fn build_tds<P>(snapshot: TriangulationSnapshot<P>) -> Result<Tds<P>, ReadError> {
    let TriangulationSnapshot {
        dimension,
        points,
        cells,
        neighbors,
    } = snapshot;
    let mut tds = Tds::new();
    if dimension < 0 {
        if !points.is_empty() || !cells.is_empty() {
            return Err(malformed("an empty triangulation has no vertices or cells"));
        }
        return Ok(tds);
    }
    if cells.len() != neighbors.len() {
        return Err(malformed("vertex and neighbor lists differ in length"));
    }

    let initial: Vec<CellKey> = tds.cell_keys().collect();
    tds.delete_cells(&initial);
    tds.set_dimension(dimension);
    let arity = tds.arity();

    let mut vertex_keys = Vec::with_capacity(points.len() + 1);
    vertex_keys.push(tds.infinite_vertex());
    vertex_keys.extend(points.into_iter().map(|p| tds.create_vertex(p)));

    let mut cell_keys = Vec::with_capacity(cells.len());
    for (k, row) in cells.iter().enumerate() {
        if row.len() != arity {
            return Err(malformed(format!("cell {k} lists {} vertices, expected {arity}", row.len())));
        }
        let mut tuple = [VertexKey::null(); MAX_CELL_SLOTS];
        for (slot, &index) in tuple.iter_mut().zip(row) {
            *slot = *vertex_keys
                .get(index)
                .ok_or_else(|| malformed(format!("cell {k} refers to vertex {index}")))?;
        }
        cell_keys.push(tds.create_cell(tuple));
    }

    for (k, row) in neighbors.iter().enumerate() {
        if row.len() != arity {
            return Err(malformed(format!("cell {k} lists {} neighbors, expected {arity}", row.len())));
        }
        for (i, &n) in row.iter().enumerate() {
            let back = neighbors
                .get(n)
                .and_then(|other| other.iter().position(|&x| x == k))
                .ok_or_else(|| malformed(format!("cell {k} and cell {n} are not mutual neighbors")))?;
            tds.set_adjacency(cell_keys[k], i, cell_keys[n], back)?;
        }
        for &index in &cells[k] {
            tds.set_vertex_cell(vertex_keys[index], cell_keys[k])?;
        }
    }
    Ok(tds)
}

/// Non-empty lines of a text triangulation, with their line numbers.
struct TextLines {
    lines: std::vec::IntoIter<(usize, String)>,
}

impl TextLines {
    fn new<R: BufRead>(reader: R) -> Result<Self, ReadError> {
        let mut lines = Vec::new();
        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push((k + 1, line));
            }
        }
        Ok(Self {
            lines: lines.into_iter(),
        })
    }

    fn next(&mut self, what: &'static str) -> Result<(usize, String), ReadError> {
        self.lines.next().ok_or(ReadError::UnexpectedEnd(what))
    }

    fn scalar<T: FromStr>(&mut self, what: &'static str) -> Result<T, ReadError> {
        let (line, text) = self.next(what)?;
        text.trim().parse().map_err(|_| ReadError::Parse { line, what, text })
    }

    fn indices(&mut self, what: &'static str) -> Result<Vec<usize>, ReadError> {
        let (line, text) = self.next(what)?;
        text.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|_| ReadError::Parse { line, what, text })
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl<K> Serialize for Triangulation3<K>
where
    K: Kernel,
    K::Point: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for Triangulation3<K>
where
    K: Kernel + Default,
    K::Point: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = TriangulationSnapshot::<K::Point>::deserialize(deserializer)?;
        Self::from_snapshot(K::default(), snapshot).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================
