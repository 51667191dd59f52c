//! Frame-rebuilt quadtree.
//!
//! The quadtree is the public face of the index: it validates configuration,
//! applies the root acceptance rule and keeps per-generation counters. A
//! generation runs from one [`Quadtree::clear`] to the next.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::QuadtreeError;
use crate::node::{Entry, QuadNode};
use crate::Rect;

/// Largest accepted `max_depth`.
///
/// At depth 24 a 4096-wide region is already below `f32` precision at
/// typical screen coordinates.
pub const MAX_DEPTH_LIMIT: u8 = 24;

/// Configuration for the quadtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadtreeConfig {
    /// Region covered by the root
    pub bounds: Rect,
    /// Entries a region holds before it subdivides
    pub capacity: usize,
    /// Deepest level a region may subdivide to
    pub max_depth: u8,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 1280.0, 720.0),
            capacity: 10,
            max_depth: 12,
        }
    }
}

impl QuadtreeConfig {
    /// Check the configuration for values the tree cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError`] for a zero capacity, empty or non-finite
    /// bounds, or a depth cap above [`MAX_DEPTH_LIMIT`].
    pub fn validate(&self) -> Result<(), QuadtreeError> {
        if self.capacity == 0 {
            return Err(QuadtreeError::ZeroCapacity);
        }
        if !self.bounds.is_valid() {
            return Err(QuadtreeError::InvalidBounds(self.bounds));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadtreeError::DepthTooLarge {
                depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        Ok(())
    }
}

/// Adaptive quadtree over `(id, bounds, payload)` entries.
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    /// Root region
    root: QuadNode<T>,
    /// Configuration
    config: QuadtreeConfig,
    /// Entries stored in the current generation
    len: usize,
    /// Entries dropped in the current generation
    dropped: usize,
}

impl<T> Quadtree<T> {
    /// Create a new quadtree.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError`] if the configuration is invalid.
    pub fn new(config: QuadtreeConfig) -> Result<Self, QuadtreeError> {
        config.validate()?;
        Ok(Self {
            root: QuadNode::new(config.bounds, 0),
            config,
            len: 0,
            dropped: 0,
        })
    }

    /// Create a quadtree with the default depth cap.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError`] if the bounds or capacity are invalid.
    pub fn with_bounds(bounds: Rect, capacity: usize) -> Result<Self, QuadtreeError> {
        Self::new(QuadtreeConfig {
            bounds,
            capacity,
            ..Default::default()
        })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Region covered by the root.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.config.bounds
    }

    /// Get the root region.
    #[must_use]
    pub fn root(&self) -> &QuadNode<T> {
        &self.root
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entry.
    ///
    /// Returns `false` without touching the tree when `bounds` misses the root
    /// region. Returns `false` and drops the entry when no region can take it
    /// without exceeding its capacity. Callers treat a dropped entry as absent
    /// for the rest of the generation.
    pub fn insert(&mut self, id: u64, bounds: Rect, payload: T) -> bool {
        if !self.root.bounds.intersects(&bounds) {
            return false;
        }

        let entry = Entry {
            id,
            bounds,
            payload,
        };
        match self
            .root
            .insert(entry, self.config.capacity, self.config.max_depth)
        {
            Ok(()) => {
                self.len += 1;
                true
            }
            Err(rejected) => {
                self.dropped += 1;
                trace!(id = rejected.id, bounds = ?rejected.bounds, "quadtree dropped entry");
                false
            }
        }
    }

    /// Collect every entry whose bounds intersect `rect`.
    ///
    /// Result order is unspecified.
    #[must_use]
    pub fn query(&self, rect: &Rect) -> Vec<Entry<T>>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.root.query_into(rect, &mut out);
        out
    }

    /// Like [`Quadtree::query`], appending into a caller-owned buffer.
    pub fn query_into(&self, rect: &Rect, out: &mut Vec<Entry<T>>)
    where
        T: Clone,
    {
        self.root.query_into(rect, out);
    }

    /// True when at least one entry intersects `rect`.
    #[must_use]
    pub fn any_intersecting(&self, rect: &Rect) -> bool
    where
        T: Clone,
    {
        !self.query(rect).is_empty()
    }

    /// Empty the tree, keeping its subdivision for the next generation.
    pub fn clear(&mut self) {
        self.root.clear();
        self.len = 0;
        self.dropped = 0;
    }

    /// Get statistics.
    #[must_use]
    pub fn stats(&self) -> QuadtreeStats {
        QuadtreeStats {
            node_count: self.root.node_count(),
            item_count: self.len,
            dropped: self.dropped,
            deepest: self.root.deepest(),
        }
    }
}

/// Statistics about the quadtree structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadtreeStats {
    /// Total number of regions
    pub node_count: usize,
    /// Entries stored this generation
    pub item_count: usize,
    /// Entries dropped this generation
    pub dropped: usize,
    /// Deepest subdivision level reached
    pub deepest: u8,
}
