//! # Ring Module
//!
//! The fixed circular topology underlying one layer.
//!
//! Vertices live in an arena addressed by index; `next(i) = (i + 1) mod N` and
//! `previous(i) = (i + N - 1) mod N`. The topology never changes after construction.

use crate::errors::{NebulaError, Result};
use crate::vertex::Vertex;

/// Smallest vertex count that forms a closed polygon.
pub const MIN_VERTICES: usize = 3;

/// A circular doubly-linked ring of vertices.
#[derive(Clone, Debug)]
pub struct VertexRing {
    vertices: Vec<Vertex>,
}

impl VertexRing {
    /// Creates a ring of `vertex_count` vertices indexed `0..vertex_count`.
    ///
    /// Fails with [`NebulaError::InvalidVertexCount`] when fewer than three vertices are requested.
    pub fn new(vertex_count: usize) -> Result<Self> {
        if vertex_count < MIN_VERTICES {
            return Err(NebulaError::InvalidVertexCount(vertex_count));
        }
        Ok(Self {
            vertices: (0..vertex_count).map(Vertex::new).collect(),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Index of the vertex following `index`.
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.vertices.len()
    }

    /// Index of the vertex preceding `index`.
    pub fn previous(&self, index: usize) -> usize {
        let n = self.vertices.len();
        (index + n - 1) % n
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn vertex_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Forward traversal over all vertices, starting at vertex 0.
    pub fn iter(&self) -> std::slice::Iter<'_, Vertex> {
        self.vertices.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vertex> {
        self.vertices.iter_mut()
    }

    /// Backward traversal following `previous` links: `0, N-1, N-2, ..., 1`.
    pub fn iter_backward(&self) -> Backward<'_> {
        Backward {
            ring: self,
            current: 0,
            remaining: self.vertices.len(),
        }
    }
}

impl<'a> IntoIterator for &'a VertexRing {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`VertexRing::iter_backward`].
pub struct Backward<'a> {
    ring: &'a VertexRing,
    current: usize,
    remaining: usize,
}

impl<'a> Iterator for Backward<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let vertex = self.ring.vertex(self.current);
        self.current = self.ring.previous(self.current);
        self.remaining -= 1;
        Some(vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Backward<'_> {}
