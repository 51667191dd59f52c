//! Quadtree region node.
//!
//! A node owns a bucket of entries and, once its bucket has overflowed, four
//! child regions. Children are never discarded; clearing only empties buckets.

use serde::{Deserialize, Serialize};

use crate::Rect;

/// One of the four child regions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Top-left
    NorthWest,
    /// Top-right
    NorthEast,
    /// Bottom-left
    SouthWest,
    /// Bottom-right
    SouthEast,
}

impl Quadrant {
    /// All quadrants in insertion-probe order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];
}

/// An item stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Caller-assigned identifier
    pub id: u64,
    /// Bounding box at insertion time
    pub bounds: Rect,
    /// Opaque payload handed back by queries
    pub payload: T,
}

/// A region of the quadtree.
#[derive(Debug, Clone)]
pub struct QuadNode<T> {
    /// Spatial bounds of this region
    pub bounds: Rect,
    /// Depth in the tree (0 = root)
    pub depth: u8,
    items: Vec<Entry<T>>,
    children: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T> QuadNode<T> {
    /// Create a new empty region.
    #[must_use]
    pub fn new(bounds: Rect, depth: u8) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    /// Entries held directly by this region.
    #[must_use]
    pub fn items(&self) -> &[Entry<T>] {
        &self.items
    }

    /// Child regions, once the region has subdivided.
    #[must_use]
    pub fn children(&self) -> Option<&[QuadNode<T>; 4]> {
        self.children.as_deref()
    }

    /// Get a single child region.
    #[must_use]
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode<T>> {
        let index = Quadrant::ALL.iter().position(|q| *q == quadrant)?;
        self.children.as_deref().map(|children| &children[index])
    }

    /// Check if this region has subdivided.
    #[must_use]
    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Create the four child regions if they do not exist yet.
    pub fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        let bounds = self.bounds;
        let depth = self.depth + 1;
        self.children = Some(Box::new(
            Quadrant::ALL.map(|q| QuadNode::new(bounds.quadrant(q), depth)),
        ));
    }

    /// Place an entry in this region or below it.
    ///
    /// The caller has already checked that the entry belongs to this region.
    /// On failure the entry is handed back untouched.
    pub(crate) fn insert(
        &mut self,
        entry: Entry<T>,
        capacity: usize,
        max_depth: u8,
    ) -> Result<(), Entry<T>> {
        if self.items.len() < capacity {
            self.items.push(entry);
            return Ok(());
        }

        if !self.is_subdivided() {
            if self.depth >= max_depth {
                // Nowhere to push existing items, so the bucket cannot shrink.
                return Err(entry);
            }
            self.subdivide();
        }

        let entry = match self.insert_into_children(entry, capacity, max_depth) {
            Ok(()) => return Ok(()),
            Err(entry) => entry,
        };

        // The entry straddles quadrants: it can only live here. Push what we
        // can further down, then keep it only if the bucket has room.
        self.rebalance(capacity, max_depth);
        if self.items.len() < capacity {
            self.items.push(entry);
            Ok(())
        } else {
            Err(entry)
        }
    }

    /// Offer an entry to the children in fixed order; first acceptor wins.
    ///
    /// A child only accepts entries it fully contains, so every entry lives in
    /// the deepest region that encloses it.
    fn insert_into_children(
        &mut self,
        entry: Entry<T>,
        capacity: usize,
        max_depth: u8,
    ) -> Result<(), Entry<T>> {
        let Some(children) = self.children.as_deref_mut() else {
            return Err(entry);
        };

        let mut entry = entry;
        for child in children.iter_mut() {
            if !child.bounds.contains_rect(&entry.bounds) {
                continue;
            }
            match child.insert(entry, capacity, max_depth) {
                Ok(()) => return Ok(()),
                Err(rejected) => entry = rejected,
            }
        }
        Err(entry)
    }

    /// Move every bucket entry that fits a child down into it.
    fn rebalance(&mut self, capacity: usize, max_depth: u8) {
        let pending = std::mem::take(&mut self.items);
        for entry in pending {
            if let Err(entry) = self.insert_into_children(entry, capacity, max_depth) {
                self.items.push(entry);
            }
        }
    }

    /// Collect every entry intersecting `rect` in this region and below.
    pub(crate) fn query_into(&self, rect: &Rect, out: &mut Vec<Entry<T>>)
    where
        T: Clone,
    {
        if !self.bounds.intersects(rect) {
            return;
        }

        out.extend(
            self.items
                .iter()
                .filter(|entry| entry.bounds.intersects(rect))
                .cloned(),
        );

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query_into(rect, out);
            }
        }
    }

    /// Empty every bucket, keeping the subdivision.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.clear();
            }
        }
    }

    /// Number of entries in this region and below.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .as_deref()
                .map_or(0, |children| children.iter().map(QuadNode::item_count).sum())
    }

    /// Number of regions in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |children| children.iter().map(QuadNode::node_count).sum())
    }

    /// Deepest subdivision level in this subtree.
    #[must_use]
    pub fn deepest(&self) -> u8 {
        self.children.as_deref().map_or(self.depth, |children| {
            children
                .iter()
                .map(QuadNode::deepest)
                .max()
                .unwrap_or(self.depth)
        })
    }
}
