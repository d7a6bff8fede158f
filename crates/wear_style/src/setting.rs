//! User style settings and their options
//!
//! A [`UserStyleSetting`] is one user-configurable axis of a watch face's
//! appearance (a colour theme, whether ticks are shown, a hand length...).
//! Each setting owns an ordered list of [`StyleOption`]s, one of which is the
//! default.
//!
//! Settings and options compare and hash by id only: two settings with the
//! same id but different display text are equal.
//!
//! # Example
//!
//! ```rust
//! use wear_style::{ListOption, OptionId, SettingId, StyleOption, UserStyleSetting, WatchFaceLayer};
//!
//! let colors = UserStyleSetting::list(
//!     SettingId::new("color").unwrap(),
//!     "Colour",
//!     "Watch face colour",
//!     [WatchFaceLayer::Base],
//!     vec![
//!         StyleOption::list(OptionId::from_name("red").unwrap(), ListOption::new("Red")),
//!         StyleOption::list(OptionId::from_name("blue").unwrap(), ListOption::new("Blue")),
//!     ],
//!     0,
//! )
//! .unwrap();
//!
//! let unknown = OptionId::from_name("green").unwrap();
//! assert_eq!(colors.option_for_id(&unknown).id().as_bytes(), b"red");
//! ```

use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complication::ComplicationSlotOverlay;
use crate::error::{Result, StyleError};
use crate::id::{OptionId, SettingId};
use crate::layer::WatchFaceLayer;

/// Fixed id of the custom value setting
pub const CUSTOM_VALUE_SETTING_ID: &str = "CustomValue";

// ============================================================================
// Options
// ============================================================================

/// Payload of a list option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListOption {
    pub display_name: String,
    #[serde(default)]
    pub icon: Option<Vec<u8>>,
    /// Settings revealed when this option is selected
    #[serde(default)]
    pub child_settings: Vec<SettingId>,
}

impl ListOption {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            icon: None,
            child_settings: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_child_settings(mut self, children: impl IntoIterator<Item = SettingId>) -> Self {
        self.child_settings = children.into_iter().collect();
        self
    }
}

/// Payload of a complication slots option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplicationSlotsOption {
    pub display_name: String,
    #[serde(default)]
    pub icon: Option<Vec<u8>>,
    /// Slot reconfigurations applied while this option is selected
    #[serde(default)]
    pub overlays: Vec<ComplicationSlotOverlay>,
    /// Settings revealed when this option is selected
    #[serde(default)]
    pub child_settings: Vec<SettingId>,
}

impl ComplicationSlotsOption {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            icon: None,
            overlays: Vec::new(),
            child_settings: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_overlays(mut self, overlays: impl IntoIterator<Item = ComplicationSlotOverlay>) -> Self {
        self.overlays = overlays.into_iter().collect();
        self
    }

    pub fn with_child_settings(mut self, children: impl IntoIterator<Item = SettingId>) -> Self {
        self.child_settings = children.into_iter().collect();
        self
    }
}

/// Value carried by an option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionValue {
    Boolean(bool),
    List(ListOption),
    DoubleRange(f64),
    LongRange(i64),
    ComplicationSlots(ComplicationSlotsOption),
    /// The value is the option id's bytes
    CustomValue,
}

/// One selectable value of a setting
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StyleOption {
    id: OptionId,
    value: OptionValue,
}

impl StyleOption {
    pub fn new(id: OptionId, value: OptionValue) -> Self {
        Self { id, value }
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(OptionId::from_bool(value), OptionValue::Boolean(value))
    }

    pub fn list(id: OptionId, option: ListOption) -> Self {
        Self::new(id, OptionValue::List(option))
    }

    pub fn double_range(value: f64) -> Self {
        Self::new(OptionId::from_f64(value), OptionValue::DoubleRange(value))
    }

    pub fn long_range(value: i64) -> Self {
        Self::new(OptionId::from_i64(value), OptionValue::LongRange(value))
    }

    pub fn complication_slots(id: OptionId, option: ComplicationSlotsOption) -> Self {
        Self::new(id, OptionValue::ComplicationSlots(option))
    }

    pub fn custom_value(value: OptionId) -> Self {
        Self::new(value, OptionValue::CustomValue)
    }

    pub fn id(&self) -> &OptionId {
        &self.id
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            OptionValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            OptionValue::DoubleRange(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            OptionValue::LongRange(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListOption> {
        match &self.value {
            OptionValue::List(option) => Some(option),
            _ => None,
        }
    }

    pub fn as_complication_slots(&self) -> Option<&ComplicationSlotsOption> {
        match &self.value {
            OptionValue::ComplicationSlots(option) => Some(option),
            _ => None,
        }
    }

    pub fn as_custom_value(&self) -> Option<&[u8]> {
        match self.value {
            OptionValue::CustomValue => Some(self.id.as_bytes()),
            _ => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match &self.value {
            OptionValue::List(option) => Some(&option.display_name),
            OptionValue::ComplicationSlots(option) => Some(&option.display_name),
            _ => None,
        }
    }

    /// Settings revealed by selecting this option
    pub fn child_settings(&self) -> &[SettingId] {
        match &self.value {
            OptionValue::List(option) => &option.child_settings,
            OptionValue::ComplicationSlots(option) => &option.child_settings,
            _ => &[],
        }
    }
}

impl PartialEq for StyleOption {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StyleOption {}

impl Hash for StyleOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// Settings
// ============================================================================

/// The type of a setting, with the bounds of range settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingKind {
    Boolean,
    List,
    DoubleRange { min: f64, max: f64, default: f64 },
    LongRange { min: i64, max: i64, default: i64 },
    ComplicationSlots,
    CustomValue,
}

impl SettingKind {
    /// Stable tag used in digest encoding
    pub(crate) fn tag(&self) -> u8 {
        match self {
            SettingKind::Boolean => 0,
            SettingKind::List => 1,
            SettingKind::DoubleRange { .. } => 2,
            SettingKind::LongRange { .. } => 3,
            SettingKind::ComplicationSlots => 4,
            SettingKind::CustomValue => 5,
        }
    }

    fn accepts(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (SettingKind::Boolean, OptionValue::Boolean(_))
                | (SettingKind::List, OptionValue::List(_))
                | (SettingKind::DoubleRange { .. }, OptionValue::DoubleRange(_))
                | (SettingKind::LongRange { .. }, OptionValue::LongRange(_))
                | (SettingKind::ComplicationSlots, OptionValue::ComplicationSlots(_))
                | (SettingKind::CustomValue, OptionValue::CustomValue)
        )
    }
}

/// A user-configurable axis of a watch face's appearance
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "UnvalidatedSetting")]
pub struct UserStyleSetting {
    id: SettingId,
    display_name: String,
    description: String,
    icon: Option<Vec<u8>>,
    affected_layers: Vec<WatchFaceLayer>,
    kind: SettingKind,
    options: Vec<StyleOption>,
    default_option_index: usize,
}

/// Deserialization mirror of [`UserStyleSetting`], validated on conversion
#[derive(Deserialize)]
struct UnvalidatedSetting {
    id: SettingId,
    display_name: String,
    description: String,
    #[serde(default)]
    icon: Option<Vec<u8>>,
    affected_layers: Vec<WatchFaceLayer>,
    kind: SettingKind,
    options: Vec<StyleOption>,
    default_option_index: usize,
}

impl TryFrom<UnvalidatedSetting> for UserStyleSetting {
    type Error = StyleError;

    fn try_from(raw: UnvalidatedSetting) -> Result<Self> {
        let setting = UserStyleSetting {
            id: raw.id,
            display_name: raw.display_name,
            description: raw.description,
            icon: raw.icon,
            affected_layers: raw.affected_layers,
            kind: raw.kind,
            options: raw.options,
            default_option_index: raw.default_option_index,
        };
        setting.validate()?;
        Ok(setting)
    }
}

impl UserStyleSetting {
    fn build(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        kind: SettingKind,
        options: Vec<StyleOption>,
        default_option_index: usize,
    ) -> Result<Self> {
        let setting = Self {
            id,
            display_name: display_name.into(),
            description: description.into(),
            icon: None,
            affected_layers: affected_layers.into_iter().collect(),
            kind,
            options,
            default_option_index,
        };
        setting.validate()?;
        Ok(setting)
    }

    /// A two-option on/off setting
    pub fn boolean(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        default: bool,
    ) -> Result<Self> {
        let options = vec![StyleOption::boolean(true), StyleOption::boolean(false)];
        let default_index = if default { 0 } else { 1 };
        Self::build(
            id,
            display_name,
            description,
            affected_layers,
            SettingKind::Boolean,
            options,
            default_index,
        )
    }

    /// A setting choosing one of a list of named options
    pub fn list(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        options: Vec<StyleOption>,
        default_index: usize,
    ) -> Result<Self> {
        Self::build(
            id,
            display_name,
            description,
            affected_layers,
            SettingKind::List,
            options,
            default_index,
        )
    }

    /// A setting choosing a value in `[min, max]`
    pub fn double_range(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        min: f64,
        max: f64,
        default: f64,
    ) -> Result<Self> {
        if !(min <= default && default <= max) {
            return Err(StyleError::InvalidRange(id));
        }
        let (options, default_index) = range_options(min, max, default, StyleOption::double_range);
        Self::build(
            id,
            display_name,
            description,
            affected_layers,
            SettingKind::DoubleRange { min, max, default },
            options,
            default_index,
        )
    }

    /// A setting choosing an integer in `[min, max]`
    pub fn long_range(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        min: i64,
        max: i64,
        default: i64,
    ) -> Result<Self> {
        if !(min <= default && default <= max) {
            return Err(StyleError::InvalidRange(id));
        }
        let (options, default_index) = range_options(min, max, default, StyleOption::long_range);
        Self::build(
            id,
            display_name,
            description,
            affected_layers,
            SettingKind::LongRange { min, max, default },
            options,
            default_index,
        )
    }

    /// A setting whose options reconfigure complication slots
    pub fn complication_slots(
        id: SettingId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        affected_layers: impl IntoIterator<Item = WatchFaceLayer>,
        options: Vec<StyleOption>,
        default_index: usize,
    ) -> Result<Self> {
        Self::build(
            id,
            display_name,
            description,
            affected_layers,
            SettingKind::ComplicationSlots,
            options,
            default_index,
        )
    }

    /// An opaque blob of watch-face-defined data.
    ///
    /// The id is always [`CUSTOM_VALUE_SETTING_ID`] and every layer is affected.
    pub fn custom_value(default_value: OptionId) -> Result<Self> {
        Self::custom_value_with_id(SettingId::new(CUSTOM_VALUE_SETTING_ID)?, default_value)
    }

    /// A custom value setting under a caller-chosen id
    pub fn custom_value_with_id(id: SettingId, default_value: OptionId) -> Result<Self> {
        Self::build(
            id,
            "",
            "",
            WatchFaceLayer::ALL,
            SettingKind::CustomValue,
            vec![StyleOption::custom_value(default_value)],
            0,
        )
    }

    /// Attach an icon shown by editors
    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn id(&self) -> &SettingId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> Option<&[u8]> {
        self.icon.as_deref()
    }

    pub fn affected_layers(&self) -> &[WatchFaceLayer] {
        &self.affected_layers
    }

    pub fn kind(&self) -> &SettingKind {
        &self.kind
    }

    pub fn options(&self) -> &[StyleOption] {
        &self.options
    }

    pub fn default_option_index(&self) -> usize {
        self.default_option_index
    }

    pub fn default_option(&self) -> &StyleOption {
        &self.options[self.default_option_index]
    }

    pub fn is_complication_slots(&self) -> bool {
        matches!(self.kind, SettingKind::ComplicationSlots)
    }

    pub fn is_custom_value(&self) -> bool {
        matches!(self.kind, SettingKind::CustomValue)
    }

    /// Resolve an option id read from persisted or remote style data.
    ///
    /// Never fails: ids this setting cannot interpret resolve to the default
    /// option. Range settings decode the id as a big-endian number and fall
    /// back when it is malformed or out of range. Custom value settings accept
    /// any id.
    pub fn option_for_id(&self, id: &OptionId) -> StyleOption {
        if let Some(option) = self.options.iter().find(|o| o.id == *id) {
            return option.clone();
        }

        let resolved = match self.kind {
            SettingKind::DoubleRange { min, max, .. } => id
                .to_f64()
                .filter(|v| *v >= min && *v <= max)
                .map(StyleOption::double_range),
            SettingKind::LongRange { min, max, .. } => id
                .to_i64()
                .filter(|v| *v >= min && *v <= max)
                .map(StyleOption::long_range),
            SettingKind::CustomValue => Some(StyleOption::custom_value(id.clone())),
            SettingKind::Boolean | SettingKind::List | SettingKind::ComplicationSlots => None,
        };

        resolved.unwrap_or_else(|| {
            debug!(
                "setting {}: option {} not recognised, using default {}",
                self.id,
                id,
                self.default_option().id
            );
            self.default_option().clone()
        })
    }

    /// Whether `option` can be selected for this setting.
    ///
    /// Declared options must match in payload as well as id, so an option taken
    /// from another setting is rejected even when the ids collide.
    pub fn owns_option(&self, option: &StyleOption) -> bool {
        match (&self.kind, &option.value) {
            (SettingKind::DoubleRange { min, max, .. }, OptionValue::DoubleRange(v)) => {
                *v >= *min && *v <= *max && option.id == OptionId::from_f64(*v)
            }
            (SettingKind::LongRange { min, max, .. }, OptionValue::LongRange(v)) => {
                *v >= *min && *v <= *max && option.id == OptionId::from_i64(*v)
            }
            (SettingKind::CustomValue, OptionValue::CustomValue) => true,
            (kind, value) if kind.accepts(value) => self
                .options
                .iter()
                .any(|o| o.id == option.id && o.value == option.value),
            _ => false,
        }
    }

    /// Re-run construction checks (used after deserialization)
    pub fn validate(&self) -> Result<()> {
        if self.options.is_empty() {
            return Err(StyleError::NoOptions(self.id.clone()));
        }
        if self.default_option_index >= self.options.len() {
            return Err(StyleError::DefaultOutOfRange {
                setting: self.id.clone(),
                index: self.default_option_index,
                count: self.options.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for option in &self.options {
            if !seen.insert(&option.id) {
                return Err(StyleError::DuplicateOptionId {
                    setting: self.id.clone(),
                    option: option.id.clone(),
                });
            }
            if !self.kind.accepts(&option.value) {
                return Err(StyleError::OptionKindMismatch {
                    setting: self.id.clone(),
                    option: option.id.clone(),
                });
            }
            let encoded = match option.value {
                OptionValue::DoubleRange(v) => Some(OptionId::from_f64(v)),
                OptionValue::LongRange(v) => Some(OptionId::from_i64(v)),
                _ => None,
            };
            if encoded.is_some_and(|id| id != option.id) {
                return Err(StyleError::RangeOptionIdMismatch {
                    setting: self.id.clone(),
                    option: option.id.clone(),
                });
            }
            if let OptionValue::ComplicationSlots(slots) = &option.value {
                let mut slot_ids = FxHashSet::default();
                for overlay in &slots.overlays {
                    if !slot_ids.insert(overlay.complication_slot_id) {
                        return Err(StyleError::DuplicateComplicationSlotOverlay {
                            setting: self.id.clone(),
                            option: option.id.clone(),
                            slot: overlay.complication_slot_id,
                        });
                    }
                }
            }
        }

        let in_range = match self.kind {
            SettingKind::DoubleRange { min, max, default } => {
                min <= default
                    && default <= max
                    && self
                        .options
                        .iter()
                        .filter_map(StyleOption::as_f64)
                        .all(|v| v >= min && v <= max)
            }
            SettingKind::LongRange { min, max, default } => {
                min <= default
                    && default <= max
                    && self
                        .options
                        .iter()
                        .filter_map(StyleOption::as_i64)
                        .all(|v| v >= min && v <= max)
            }
            _ => true,
        };
        if !in_range {
            return Err(StyleError::InvalidRange(self.id.clone()));
        }
        Ok(())
    }
}

impl PartialEq for UserStyleSetting {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserStyleSetting {}

impl Hash for UserStyleSetting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Options `min`, `default`, `max` with duplicates removed, and the default's index
fn range_options<T: PartialEq + Copy>(
    min: T,
    max: T,
    default: T,
    make: fn(T) -> StyleOption,
) -> (Vec<StyleOption>, usize) {
    let mut values = vec![min];
    if default != min {
        values.push(default);
    }
    if max != default && max != min {
        values.push(max);
    }
    let default_index = values.iter().position(|v| *v == default).unwrap_or(0);
    (values.into_iter().map(make).collect(), default_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(id: &str) -> SettingId {
        SettingId::new(id).unwrap()
    }

    fn oid(id: &str) -> OptionId {
        OptionId::from_name(id).unwrap()
    }

    fn opacity() -> UserStyleSetting {
        UserStyleSetting::double_range(
            sid("opacity"),
            "Opacity",
            "Hand opacity",
            [WatchFaceLayer::ComplicationsOverlay],
            0.0,
            1.0,
            0.75,
        )
        .unwrap()
    }

    #[test]
    fn test_double_range_fallbacks() {
        let setting = opacity();
        assert_eq!(setting.options().len(), 3);
        assert_eq!(setting.default_option().as_f64(), Some(0.75));

        assert_eq!(setting.option_for_id(&oid("not a number")).as_f64(), Some(0.75));
        assert_eq!(setting.option_for_id(&oid("-1")).as_f64(), Some(0.75));
        assert_eq!(
            setting.option_for_id(&OptionId::from_f64(-1.0)).as_f64(),
            Some(0.75)
        );
        assert_eq!(
            setting.option_for_id(&OptionId::from_f64(f64::NAN)).as_f64(),
            Some(0.75)
        );
        assert_eq!(
            setting.option_for_id(&OptionId::from_f64(0.5)).as_f64(),
            Some(0.5)
        );
    }

    #[test]
    fn test_long_range_fallbacks() {
        let setting = UserStyleSetting::long_range(
            sid("ticks"),
            "Ticks",
            "",
            [WatchFaceLayer::Base],
            1,
            12,
            12,
        )
        .unwrap();
        // default == max collapses to two options
        assert_eq!(setting.options().len(), 2);
        assert_eq!(setting.option_for_id(&OptionId::from_i64(4)).as_i64(), Some(4));
        assert_eq!(setting.option_for_id(&OptionId::from_i64(13)).as_i64(), Some(12));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = UserStyleSetting::double_range(sid("x"), "", "", [], 1.0, 0.0, 0.5);
        assert_eq!(result.unwrap_err(), StyleError::InvalidRange(sid("x")));
    }

    #[test]
    fn test_duplicate_option_ids_rejected() {
        let result = UserStyleSetting::list(
            sid("color"),
            "Colour",
            "",
            [WatchFaceLayer::Base],
            vec![
                StyleOption::list(oid("red"), ListOption::new("Red")),
                StyleOption::list(oid("red"), ListOption::new("Also red")),
            ],
            0,
        );
        assert_eq!(
            result.unwrap_err(),
            StyleError::DuplicateOptionId {
                setting: sid("color"),
                option: oid("red"),
            }
        );
    }

    #[test]
    fn test_option_kind_mismatch_rejected() {
        let result = UserStyleSetting::list(
            sid("color"),
            "",
            "",
            [],
            vec![StyleOption::boolean(true)],
            0,
        );
        assert!(matches!(result, Err(StyleError::OptionKindMismatch { .. })));
    }

    #[test]
    fn test_duplicate_overlays_rejected() {
        let option = ComplicationSlotsOption::new("Both").with_overlays([
            ComplicationSlotOverlay::new(1).with_enabled(false),
            ComplicationSlotOverlay::new(1).with_enabled(true),
        ]);
        let result = UserStyleSetting::complication_slots(
            sid("slots"),
            "",
            "",
            [WatchFaceLayer::Complications],
            vec![StyleOption::complication_slots(oid("both"), option)],
            0,
        );
        assert!(matches!(
            result,
            Err(StyleError::DuplicateComplicationSlotOverlay { slot: 1, .. })
        ));
    }

    #[test]
    fn test_list_fallback_prefers_explicit_default() {
        let setting = UserStyleSetting::list(
            sid("color"),
            "",
            "",
            [],
            vec![
                StyleOption::list(oid("red"), ListOption::new("Red")),
                StyleOption::list(oid("blue"), ListOption::new("Blue")),
            ],
            1,
        )
        .unwrap();
        assert_eq!(setting.option_for_id(&oid("green")).id(), &oid("blue"));
    }

    #[test]
    fn test_boolean_options() {
        let setting = UserStyleSetting::boolean(sid("ticks"), "", "", [], false).unwrap();
        assert_eq!(setting.default_option().as_bool(), Some(false));
        assert_eq!(
            setting.option_for_id(&OptionId::from_bool(true)).as_bool(),
            Some(true)
        );
        assert_eq!(setting.option_for_id(&oid("yes")).as_bool(), Some(false));
    }

    #[test]
    fn test_custom_value_accepts_any_bytes() {
        let setting = UserStyleSetting::custom_value(oid("default")).unwrap();
        assert_eq!(setting.id().as_str(), CUSTOM_VALUE_SETTING_ID);
        let option = setting.option_for_id(&oid("anything"));
        assert_eq!(option.as_custom_value(), Some(&b"anything"[..]));
        assert!(setting.owns_option(&option));
    }

    #[test]
    fn test_owns_option_checks_payload() {
        let a = UserStyleSetting::list(
            sid("a"),
            "",
            "",
            [],
            vec![StyleOption::list(oid("x"), ListOption::new("From A"))],
            0,
        )
        .unwrap();
        let foreign = StyleOption::list(oid("x"), ListOption::new("From B"));

        // Equal by id, but not an option of `a`.
        assert_eq!(&foreign, a.default_option());
        assert!(!a.owns_option(&foreign));
        assert!(a.owns_option(a.default_option()));
        assert!(!opacity().owns_option(&StyleOption::double_range(2.0)));
        assert!(opacity().owns_option(&StyleOption::double_range(0.1)));
    }

    #[test]
    fn test_equality_by_id() {
        let a = UserStyleSetting::boolean(sid("ticks"), "Ticks", "", [], true).unwrap();
        let b = UserStyleSetting::boolean(sid("ticks"), "Other name", "", [], false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_validates() {
        let setting = opacity();
        let json = serde_json::to_string(&setting).unwrap();
        let back: UserStyleSetting = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), setting.kind());

        let broken = json.replace("\"default_option_index\":2", "\"default_option_index\":7");
        let broken = broken.replace("\"default_option_index\":1", "\"default_option_index\":7");
        assert!(serde_json::from_str::<UserStyleSetting>(&broken).is_err());
    }

    #[test]
    fn test_deserialize_rejects_range_id_not_encoding_value() {
        let mut json = serde_json::to_value(opacity()).unwrap();
        json["options"][0]["value"] = serde_json::json!({ "double_range": 0.5 });
        let err = serde_json::from_value::<UserStyleSetting>(json).unwrap_err();
        assert!(err.to_string().contains("does not encode its range value"), "{}", err);

        let hours = UserStyleSetting::long_range(sid("hours"), "Hours", "", [], 1, 12, 6).unwrap();
        let mut json = serde_json::to_value(&hours).unwrap();
        json["options"][0]["id"] = serde_json::to_value(OptionId::from_i64(7)).unwrap();
        assert!(serde_json::from_value::<UserStyleSetting>(json).is_err());

        let intact = serde_json::to_value(&hours).unwrap();
        assert!(serde_json::from_value::<UserStyleSetting>(intact).is_ok());
    }
}
