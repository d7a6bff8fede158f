//! Complication slot overlays
//!
//! A [`ComplicationSlotsOption`](crate::ComplicationSlotsOption) carries a list
//! of overlays. Selecting the option reconfigures the watch face's
//! complication slots: each overlay replaces only the fields it sets, every
//! other slot keeps its base configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Bounds of a complication slot in unit square coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl SlotBounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Partial reconfiguration of one complication slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplicationSlotOverlay {
    /// Slot being reconfigured
    pub complication_slot_id: i32,
    /// Overrides whether the slot is shown
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Overrides the slot bounds
    #[serde(default)]
    pub bounds: Option<SlotBounds>,
    /// Overrides the accessibility traversal order
    #[serde(default)]
    pub accessibility_traversal_index: Option<i32>,
}

impl ComplicationSlotOverlay {
    /// Overlay that changes nothing yet
    pub fn new(complication_slot_id: i32) -> Self {
        Self {
            complication_slot_id,
            enabled: None,
            bounds: None,
            accessibility_traversal_index: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_bounds(mut self, bounds: SlotBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_accessibility_traversal_index(mut self, index: i32) -> Self {
        self.accessibility_traversal_index = Some(index);
        self
    }
}

/// Effective configuration of a complication slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplicationSlotState {
    pub id: i32,
    pub enabled: bool,
    pub bounds: SlotBounds,
    pub accessibility_traversal_index: i32,
}

/// Apply overlays to the watch face's base slot configuration.
///
/// Overlays for slots missing from `base` are ignored.
pub fn apply_complication_overlays(
    base: &[ComplicationSlotState],
    overlays: &[ComplicationSlotOverlay],
) -> Vec<ComplicationSlotState> {
    for overlay in overlays {
        if !base.iter().any(|s| s.id == overlay.complication_slot_id) {
            warn!(
                "ignoring overlay for unknown complication slot {}",
                overlay.complication_slot_id
            );
        }
    }

    base.iter()
        .map(|slot| {
            let mut slot = slot.clone();
            if let Some(overlay) = overlays
                .iter()
                .find(|o| o.complication_slot_id == slot.id)
            {
                if let Some(enabled) = overlay.enabled {
                    slot.enabled = enabled;
                }
                if let Some(bounds) = overlay.bounds {
                    slot.bounds = bounds;
                }
                if let Some(index) = overlay.accessibility_traversal_index {
                    slot.accessibility_traversal_index = index;
                }
            }
            slot
        })
        .collect()
}
