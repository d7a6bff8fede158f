//! Wear Style
//!
//! User-configurable appearance settings for watch faces.
//!
//! # Overview
//!
//! - **Settings**: typed axes of configuration (boolean, list, double/long
//!   range, complication slots, custom value), each with validated options
//! - **Schema**: every setting of a watch face, including settings revealed
//!   by selecting an option of a parent setting
//! - **Styles**: a selection of one option per setting, resolved from a
//!   compact wire format with fallback to defaults
//! - **Digest**: a stable fingerprint of a schema for cache keys
//! - **Repository / editor**: the observable current style and staged edits
//!
//! # Quick Start
//!
//! ```rust
//! use wear_style::{
//!     OptionId, SettingId, UserStyle, UserStyleData, UserStyleSchema, UserStyleSetting,
//!     WatchFaceLayer,
//! };
//!
//! let hand_length = UserStyleSetting::double_range(
//!     SettingId::new("hand_length").unwrap(),
//!     "Hand length",
//!     "Length of the minute hand",
//!     [WatchFaceLayer::ComplicationsOverlay],
//!     0.0,
//!     1.0,
//!     0.75,
//! )
//! .unwrap();
//! let schema = UserStyleSchema::new(vec![hand_length]).unwrap();
//!
//! let mut data = UserStyleData::new();
//! data.insert("hand_length", "not a number");
//! let style = UserStyle::from_data(&data, &schema);
//!
//! let id = SettingId::new("hand_length").unwrap();
//! assert_eq!(style.get(&id).unwrap().as_f64(), Some(0.75));
//! ```
//!
//! # Errors
//!
//! Constructing settings and schemas validates eagerly and returns
//! [`StyleError`]. Resolving persisted data never fails.

pub mod complication;
pub mod digest;
pub mod editor;
pub mod error;
pub mod id;
pub mod layer;
pub mod repository;
pub mod schema;
pub mod setting;
pub mod style;

pub use complication::{
    apply_complication_overlays, ComplicationSlotOverlay, ComplicationSlotState, SlotBounds,
};
pub use digest::DigestHash;
pub use editor::EditorSession;
pub use error::{Result, StyleError};
pub use id::{OptionId, SettingId};
pub use layer::WatchFaceLayer;
pub use repository::{CurrentUserStyleRepository, SubscriptionId};
pub use schema::UserStyleSchema;
pub use setting::{
    ComplicationSlotsOption, ListOption, OptionValue, SettingKind, StyleOption, UserStyleSetting,
    CUSTOM_VALUE_SETTING_ID,
};
pub use style::{MutableUserStyle, UserStyle, UserStyleData};
