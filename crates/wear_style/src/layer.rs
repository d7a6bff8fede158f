//! Watch face rendering layers affected by a setting

use serde::{Deserialize, Serialize};

/// A rendering layer of a watch face.
///
/// Settings declare the set of layers they affect so renderers can skip
/// redrawing layers a style change cannot touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchFaceLayer {
    /// Everything except complications and the overlay
    Base,
    /// The complication slots
    Complications,
    /// Content drawn above complications (e.g. watch hands)
    ComplicationsOverlay,
}

impl WatchFaceLayer {
    /// All layers in canonical order
    pub const ALL: [WatchFaceLayer; 3] = [
        WatchFaceLayer::Base,
        WatchFaceLayer::Complications,
        WatchFaceLayer::ComplicationsOverlay,
    ];

    /// Stable tag used in digest encoding
    pub(crate) fn tag(self) -> u8 {
        match self {
            WatchFaceLayer::Base => 0,
            WatchFaceLayer::Complications => 1,
            WatchFaceLayer::ComplicationsOverlay => 2,
        }
    }
}

/// Sort and deduplicate a layer list so it behaves as a set
pub(crate) fn canonical_layers(layers: &[WatchFaceLayer]) -> Vec<WatchFaceLayer> {
    let mut sorted = layers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
