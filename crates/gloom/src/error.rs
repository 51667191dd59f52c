//! Errors raised while configuring a quadtree.

use thiserror::Error;

use crate::Rect;

/// Invalid quadtree configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadtreeError {
    /// A region must be able to hold at least one item, or subdivision never stops.
    #[error("region capacity must be at least 1")]
    ZeroCapacity,
    /// Bounds must have a positive, finite area.
    #[error("bounds {0:?} must have a positive, finite area")]
    InvalidBounds(Rect),
    /// Depth cap above what `f32` quadrant sizes can represent.
    #[error("max depth {depth} exceeds the limit of {limit}")]
    DepthTooLarge {
        /// Requested depth
        depth: u8,
        /// Largest accepted depth
        limit: u8,
    },
}
