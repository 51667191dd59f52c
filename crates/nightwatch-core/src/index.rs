//! Double-buffered spatial index.
//!
//! Two quadtree generations live side by side. At the top of every frame
//! they swap and the new `current` is cleared, so `previous` holds where
//! everything was at the end of last frame while `current` fills with this
//! frame's positions as the pipeline runs.
//!
//! Enemies melee soldiers through `previous`, which keeps damage independent
//! of the order soldiers are processed in. Everything else reads `current`.

use gloom::{Entry, Quadtree, QuadtreeError, Rect};
use tracing::info;

use crate::config::IndexConfig;
use crate::entity::{EntityId, EntityTag};

/// An index hit: id, bounds at insertion and kind.
pub type Hit = Entry<EntityTag>;

/// The two alternating index generations.
#[derive(Debug, Clone)]
pub struct FrameIndex {
    previous: Quadtree<EntityTag>,
    current: Quadtree<EntityTag>,
}

impl FrameIndex {
    /// Build two empty generations covering `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError`] for unusable bounds or tuning.
    pub fn new(bounds: Rect, config: &IndexConfig) -> Result<Self, QuadtreeError> {
        Ok(Self {
            previous: Quadtree::new(config.quadtree(bounds))?,
            current: Quadtree::new(config.quadtree(bounds))?,
        })
    }

    /// Start a frame: current becomes previous and the new current is empty.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
    }

    /// Last frame's finished generation.
    #[must_use]
    pub fn previous(&self) -> &Quadtree<EntityTag> {
        &self.previous
    }

    /// This frame's generation.
    #[must_use]
    pub fn current(&self) -> &Quadtree<EntityTag> {
        &self.current
    }

    /// Insert into the current generation.
    ///
    /// Returns `false` when the entry was dropped; the entity then takes no
    /// part in this frame's collisions.
    pub fn insert(&mut self, id: EntityId, bounds: Rect, tag: EntityTag) -> bool {
        self.current.insert(id.as_u64(), bounds, tag)
    }

    /// Current-generation entries intersecting `rect`.
    #[must_use]
    pub fn query_current(&self, rect: &Rect) -> Vec<Hit> {
        self.current.query(rect)
    }

    /// Previous-generation entries intersecting `rect`.
    #[must_use]
    pub fn query_previous(&self, rect: &Rect) -> Vec<Hit> {
        self.previous.query(rect)
    }

    /// Replace both generations with empty trees over `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadtreeError`] and leaves the index untouched when the new
    /// bounds are unusable.
    pub fn rebuild(&mut self, bounds: Rect) -> Result<(), QuadtreeError> {
        let mut config = self.current.config().clone();
        config.bounds = bounds;
        let previous = Quadtree::new(config.clone())?;
        let current = Quadtree::new(config)?;
        self.previous = previous;
        self.current = current;
        info!(?bounds, "spatial index rebuilt");
        Ok(())
    }

    /// Empty both generations.
    pub fn clear(&mut self) {
        self.previous.clear();
        self.current.clear();
    }
}

/// Entity id of a hit.
#[must_use]
pub fn hit_id(hit: &Hit) -> EntityId {
    EntityId::new(hit.id)
}
