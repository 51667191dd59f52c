//! Per-frame input signals.
//!
//! The host polls devices and debounces; the core only sees one
//! [`FrameInput`] per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::ConsumableKind;

/// Everything the host reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Pointer click position, if the pointer was pressed this frame
    pub click: Option<Vec2>,
    /// Pause key pressed this frame
    pub toggle_pause: bool,
    /// Consumable slot chosen this frame
    pub select: Option<ConsumableKind>,
    /// Quick-buy key pressed this frame
    pub buy: Option<ConsumableKind>,
}

impl FrameInput {
    /// A frame with no signals besides elapsed time.
    #[must_use]
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }

    /// Add a pointer click.
    #[must_use]
    pub fn with_click(mut self, position: Vec2) -> Self {
        self.click = Some(position);
        self
    }

    /// Add a pause toggle.
    #[must_use]
    pub fn with_pause_toggle(mut self) -> Self {
        self.toggle_pause = true;
        self
    }

    /// Add a slot selection.
    #[must_use]
    pub fn with_select(mut self, kind: ConsumableKind) -> Self {
        self.select = Some(kind);
        self
    }

    /// Add a quick-buy.
    #[must_use]
    pub fn with_buy(mut self, kind: ConsumableKind) -> Self {
        self.buy = Some(kind);
        self
    }
}
