//! Local index arithmetic shared by every cell-level algorithm.
//!
//! Cells store their vertices in slots `0..=dimension`. The helpers here give
//! the fixed tables used to walk around faces and edges without touching
//! coordinates:
//!
//! - [`ccw`] / [`cw`] turn inside a triangle (2D cells and 3D facets);
//! - [`vertex_triple_index`] lists the facet opposite a slot of a tetrahedron
//!   so that the triple followed by the opposite vertex is positively oriented;
//! - [`next_around_edge`] selects the facet crossed when turning around an
//!   oriented edge of a tetrahedron.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::VertexKey;

/// Facet triples of a tetrahedron, one per opposite slot.
const VERTEX_TRIPLE_INDEX: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

/// Sentinel stored on the diagonal of [`NEXT_AROUND_EDGE`].
const NO_EDGE: usize = 5;

const NEXT_AROUND_EDGE: [[usize; 4]; 4] = [
    [NO_EDGE, 2, 3, 1],
    [3, NO_EDGE, 0, 2],
    [1, 3, NO_EDGE, 0],
    [2, 0, 1, NO_EDGE],
];

/// Counter-clockwise successor of `i` in a triangle.
///
/// ```rust
/// use triangulation3::core::util::{ccw, cw};
///
/// assert_eq!(ccw(2), 0);
/// assert_eq!(cw(0), 2);
/// assert_eq!(ccw(cw(1)), 1);
/// ```
#[inline]
#[must_use]
pub const fn ccw(i: usize) -> usize {
    (i + 1) % 3
}

/// Clockwise successor of `i` in a triangle.
#[inline]
#[must_use]
pub const fn cw(i: usize) -> usize {
    (i + 2) % 3
}

/// Slot of the `j`-th vertex of the facet opposite slot `i` in a tetrahedron.
///
/// For every `i`, `(v[t0], v[t1], v[t2], v[i])` has the same orientation as
/// `(v[0], v[1], v[2], v[3])`, where `tk = vertex_triple_index(i, k)`.
#[inline]
#[must_use]
pub const fn vertex_triple_index(i: usize, j: usize) -> usize {
    VERTEX_TRIPLE_INDEX[i][j]
}

/// Slot `k` of a tetrahedron such that `neighbor(k)` is the next cell when
/// turning around the oriented edge `(i, j)`.
///
/// `i` and `j` must be distinct slots in `0..4`.
#[inline]
#[must_use]
pub const fn next_around_edge(i: usize, j: usize) -> usize {
    NEXT_AROUND_EDGE[i][j]
}

/// Rotates a vertex triple so that its smallest key comes first, keeping the
/// cyclic order (and therefore the orientation) of the triple.
///
/// ```rust
/// use triangulation3::core::util::make_canonical;
/// use triangulation3::core::triangulation_data_structure::VertexKey;
/// use slotmap::{DenseSlotMap, Key};
///
/// let mut keys: DenseSlotMap<VertexKey, ()> = DenseSlotMap::with_key();
/// let a = keys.insert(());
/// let b = keys.insert(());
/// let c = keys.insert(());
/// assert_eq!(make_canonical([c, a, b]), [a, b, c]);
/// assert_eq!(make_canonical([b, c, a]), [a, b, c]);
/// assert_ne!(make_canonical([a, c, b]), [a, b, c]);
/// assert!(!a.is_null());
/// ```
#[must_use]
pub fn make_canonical(triple: [VertexKey; 3]) -> [VertexKey; 3] {
    let [a, b, c] = triple;
    if a < b && a < c {
        [a, b, c]
    } else if b < a && b < c {
        [b, c, a]
    } else {
        [c, a, b]
    }
}

/// The same triple traversed in the opposite direction, still canonical when
/// the input was.
#[inline]
#[must_use]
pub const fn reversed_triple(triple: [VertexKey; 3]) -> [VertexKey; 3] {
    [triple[0], triple[2], triple[1]]
}

/// Parity of the permutation that sorts `slots`; `true` when even.
///
/// Used to compare the orientation of two cells listing the same vertices.
#[must_use]
pub fn is_even_permutation(slots: &[usize]) -> bool {
    let mut inversions = 0usize;
    for (i, a) in slots.iter().enumerate() {
        inversions += slots[i + 1..].iter().filter(|b| *b < a).count();
    }
    inversions % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DenseSlotMap;

    #[test]
    fn test_vertex_triple_index_is_even_with_opposite_vertex() {
        for i in 0..4 {
            let mut slots: Vec<usize> = (0..3).map(|j| vertex_triple_index(i, j)).collect();
            assert!(!slots.contains(&i));
            slots.push(i);
            assert!(is_even_permutation(&slots), "facet {i} is misoriented");
        }
    }

    #[test]
    fn test_next_around_edge_is_off_edge() {
        for i in 0..4 {
            for j in 0..4 {
                if i == j {
                    continue;
                }
                let k = next_around_edge(i, j);
                assert!(k < 4 && k != i && k != j);
                // Turning the other way crosses the remaining facet.
                let l = next_around_edge(j, i);
                assert!(l != k && l != i && l != j);
            }
        }
    }

    #[test]
    fn test_permutation_parity() {
        assert!(is_even_permutation(&[0, 1, 2, 3]));
        assert!(!is_even_permutation(&[1, 0, 2, 3]));
        assert!(is_even_permutation(&[1, 2, 0]));
        assert!(is_even_permutation(&[]));
    }

    #[test]
    fn test_canonical_triple_keeps_orientation() {
        let mut keys: DenseSlotMap<VertexKey, ()> = DenseSlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let c = keys.insert(());
        let forward = make_canonical([b, c, a]);
        let backward = make_canonical([b, a, c]);
        assert_eq!(forward, [a, b, c]);
        assert_eq!(backward, [a, c, b]);
        assert_eq!(reversed_triple(forward), backward);
    }
}
