//! Equality of triangulations up to relabeling.
//!
//! Two triangulations are equal when a bijection between their vertices,
//! sending the infinite vertex to the infinite vertex and every finite vertex
//! to one with an equal point, carries cells onto cells and neighbors onto
//! neighbors. The bijection is grown from one infinite cell, matched by its
//! points, by walking across facets.

use std::collections::VecDeque;

use crate::core::collections::{CellSecondaryMap, VertexSecondaryMap};
use crate::core::triangulation::Triangulation3;
use crate::core::triangulation_data_structure::{CellKey, VertexKey};
use crate::core::util::is_even_permutation;
use crate::geometry::kernel::Kernel;

impl<K: Kernel> PartialEq for Triangulation3<K> {
    fn eq(&self, other: &Self) -> bool {
        self.dimension() == other.dimension()
            && self.number_of_vertices() == other.number_of_vertices()
            && self.number_of_cells() == other.number_of_cells()
            && Matcher::new(self, other).run().is_some()
    }
}

/// Partial bijection between two triangulations.
struct Matcher<'a, K: Kernel> {
    left: &'a Triangulation3<K>,
    right: &'a Triangulation3<K>,
    vertices: VertexSecondaryMap<VertexKey>,
    used: VertexSecondaryMap<()>,
    cells: CellSecondaryMap<CellKey>,
}

impl<'a, K: Kernel> Matcher<'a, K> {
    fn new(left: &'a Triangulation3<K>, right: &'a Triangulation3<K>) -> Self {
        let mut matcher = Self {
            left,
            right,
            vertices: VertexSecondaryMap::new(),
            used: VertexSecondaryMap::new(),
            cells: CellSecondaryMap::new(),
        };
        matcher.vertices.insert(left.infinite_vertex(), right.infinite_vertex());
        matcher.used.insert(right.infinite_vertex(), ());
        matcher
    }

    /// Maps `a` to `b`, or checks an existing mapping.
    fn bind(&mut self, a: VertexKey, b: VertexKey) -> Option<()> {
        if let Some(&mapped) = self.vertices.get(a) {
            return (mapped == b).then_some(());
        }
        if self.used.contains_key(b) {
            return None;
        }
        let (p, q) = (self.left.point(a)?, self.right.point(b)?);
        if !self.left.kernel().equal(p, q) {
            return None;
        }
        self.vertices.insert(a, b);
        self.used.insert(b, ());
        Some(())
    }

    /// The right vertex with the same point as `a`.
    fn find_by_point(&self, a: VertexKey) -> Option<VertexKey> {
        let p = self.left.point(a)?;
        self.right
            .finite_vertices()
            .find(|&b| self.right.point(b).is_some_and(|q| self.left.kernel().equal(p, q)))
    }

    /// Pairs an infinite cell of `left` with the right cell on the same
    /// points.
    fn anchor(&mut self) -> Option<(CellKey, CellKey)> {
        let arity = self.left.tds().arity();
        let c1 = self.left.tds().vertex(self.left.infinite_vertex())?.cell();
        let left_cell = self.left.tds().cell(c1)?;
        let mut images = Vec::with_capacity(arity);
        for &a in &left_cell.vertices()[..arity] {
            let b = if a == self.left.infinite_vertex() {
                self.right.infinite_vertex()
            } else {
                self.find_by_point(a)?
            };
            images.push(b);
        }
        let c2 = self
            .right
            .incident_cells(self.right.infinite_vertex())
            .ok()?
            .into_iter()
            .find(|&c| images.iter().all(|&b| self.right.tds().has_vertex(c, b)))?;
        for (&a, &b) in left_cell.vertices()[..arity].iter().zip(&images) {
            self.bind(a, b)?;
        }
        Some((c1, c2))
    }

    /// Checks that `c2` lists the images of `c1`'s vertices with the same
    /// orientation, and returns the slot permutation.
    fn slots(&self, c1: CellKey, c2: CellKey) -> Option<Vec<usize>> {
        let arity = self.left.tds().arity();
        let left_cell = self.left.tds().cell(c1)?;
        let right_cell = self.right.tds().cell(c2)?;
        let slots = left_cell.vertices()[..arity]
            .iter()
            .map(|&a| right_cell.index_of(*self.vertices.get(a)?))
            .collect::<Option<Vec<usize>>>()?;
        // A line has no preferred direction.
        let oriented = self.left.dimension() < 2 || is_even_permutation(&slots);
        oriented.then_some(slots)
    }

    fn run(mut self) -> Option<()> {
        if self.left.dimension() < 0 {
            return Some(());
        }
        let (c1, c2) = self.anchor()?;
        self.cells.insert(c1, c2);
        let mut queue = VecDeque::from([(c1, c2)]);
        while let Some((c1, c2)) = queue.pop_front() {
            let slots = self.slots(c1, c2)?;
            for (i, &j) in slots.iter().enumerate() {
                let n1 = self.left.tds().cell(c1)?.neighbor(i);
                let n2 = self.right.tds().cell(c2)?.neighbor(j);
                if let Some(&mapped) = self.cells.get(n1) {
                    if mapped != n2 {
                        return None;
                    }
                    continue;
                }
                let m1 = self.left.tds().mirror_vertex(c1, i).ok()?;
                let m2 = self.right.tds().mirror_vertex(c2, j).ok()?;
                self.bind(m1, m2)?;
                self.cells.insert(n1, n2);
                queue.push_back((n1, n2));
            }
        }
        (self.cells.len() == self.left.number_of_cells()).then_some(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
