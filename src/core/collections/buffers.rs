use super::{MAX_CELL_SLOTS, SmallBuffer};
use crate::core::facet::Facet;
use crate::core::triangulation_data_structure::{CellKey, VertexKey};

/// Inline capacity for per-operation cell lists (conflict regions, stars).
pub const CELL_OPERATION_BUFFER_SIZE: usize = 32;

/// Cell keys gathered by one local operation (stars, conflict regions, rings
/// around an edge).
pub type CellKeyBuffer = SmallBuffer<CellKey, CELL_OPERATION_BUFFER_SIZE>;

/// Vertex keys gathered by one local operation (links, orphaned vertices).
pub type VertexKeyBuffer = SmallBuffer<VertexKey, CELL_OPERATION_BUFFER_SIZE>;

/// Facets gathered by one local operation (conflict boundaries).
pub type FacetBuffer = SmallBuffer<Facet, CELL_OPERATION_BUFFER_SIZE>;

/// The vertex keys of one cell or facet, sorted when used as a map key.
pub type SimplexKey = SmallBuffer<VertexKey, MAX_CELL_SLOTS>;
