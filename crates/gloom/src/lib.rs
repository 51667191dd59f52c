//! # Gloom
//!
//! Adaptive quadtree broad-phase index for 2-D scenes that are rebuilt every
//! frame.
//!
//! Gloom stores `(id, bounding box, payload)` entries in a tree of rectangular
//! regions. Regions subdivide lazily into four quadrants when their bucket
//! overflows, and the subdivision survives [`Quadtree::clear`] so a scene can
//! be repopulated frame after frame without reallocating nodes.
//!
//! - **Capacity-driven subdivision**: sparse areas stay shallow, clusters go deep
//! - **Rebalance on overflow**: items too large for any quadrant stay in the parent
//! - **Lossy by contract**: an item that cannot be placed is dropped, not stored
//!
//! ## Quick Start
//!
//! ```
//! use gloom::{Quadtree, QuadtreeConfig, Rect};
//!
//! let mut tree = Quadtree::new(QuadtreeConfig {
//!     bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
//!     ..Default::default()
//! })
//! .expect("valid config");
//!
//! assert!(tree.insert(7, Rect::new(10.0, 10.0, 32.0, 32.0), 'a'));
//! let hits = tree.query(&Rect::new(0.0, 0.0, 20.0, 20.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod node;
pub mod quadtree;

use glam::Vec2;
use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use error::QuadtreeError;
pub use node::{Entry, QuadNode, Quadrant};
pub use quadtree::{Quadtree, QuadtreeConfig, QuadtreeStats};

/// Axis-aligned rectangle with a top-left origin.
///
/// Edges are half-open: two rectangles that only share an edge do not
/// intersect, and a point on the right or bottom edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size vector.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Create the square that circumscribes a circle.
    #[must_use]
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True when the rectangle has a positive, finite area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Check if a point lies inside the rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if `other` lies completely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    /// Check if the two rectangles overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink the rectangle by `margin` on every side.
    ///
    /// Returns `None` when nothing is left.
    #[must_use]
    pub fn inset(&self, margin: f32) -> Option<Self> {
        let inner = Self::new(
            self.x + margin,
            self.y + margin,
            self.width - margin * 2.0,
            self.height - margin * 2.0,
        );
        inner.is_valid().then_some(inner)
    }

    /// Get the bounds of a child quadrant.
    #[must_use]
    pub fn quadrant(&self, quadrant: Quadrant) -> Self {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        match quadrant {
            Quadrant::NorthWest => Self::new(self.x, self.y, half_w, half_h),
            Quadrant::NorthEast => Self::new(self.x + half_w, self.y, half_w, half_h),
            Quadrant::SouthWest => Self::new(self.x, self.y + half_h, half_w, half_h),
            Quadrant::SouthEast => Self::new(self.x + half_w, self.y + half_h, half_w, half_h),
        }
    }
}
