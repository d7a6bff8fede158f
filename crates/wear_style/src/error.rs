//! Style error types

use thiserror::Error;

use crate::id::{OptionId, SettingId};

/// Errors raised while constructing or editing style schemas.
///
/// These are programmer or schema-author mistakes and are raised eagerly.
/// Mismatches found while resolving a persisted style are never errors;
/// they fall back to the setting's default option instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// A setting id longer than [`SettingId::MAX_LENGTH`] bytes
    #[error("setting id is {len} bytes, at most {max} allowed")]
    SettingIdTooLong { len: usize, max: usize },

    /// An option id longer than [`OptionId::MAX_LENGTH`] bytes
    #[error("option id is {len} bytes, at most {max} allowed")]
    OptionIdTooLong { len: usize, max: usize },

    /// Two options of one setting share an id
    #[error("setting {setting} has duplicate option id {option}")]
    DuplicateOptionId { setting: SettingId, option: OptionId },

    /// Two settings of one schema share an id
    #[error("duplicate setting id {0}")]
    DuplicateSettingId(SettingId),

    /// A setting was declared without options
    #[error("setting {0} has no options")]
    NoOptions(SettingId),

    /// The default option index is outside the option list
    #[error("setting {setting} default index {index} is out of range for {count} options")]
    DefaultOutOfRange {
        setting: SettingId,
        index: usize,
        count: usize,
    },

    /// An option whose payload kind does not match its setting
    #[error("setting {setting} cannot hold option {option} of a different kind")]
    OptionKindMismatch { setting: SettingId, option: OptionId },

    /// A range option whose id is not the encoding of its value
    #[error("setting {setting} option {option} does not encode its range value")]
    RangeOptionIdMismatch { setting: SettingId, option: OptionId },

    /// A range setting whose bounds do not contain its default
    #[error("setting {0} requires minimum <= default <= maximum")]
    InvalidRange(SettingId),

    /// One complication slots option overlays the same slot twice
    #[error("setting {setting} option {option} overlays complication slot {slot} more than once")]
    DuplicateComplicationSlotOverlay {
        setting: SettingId,
        option: OptionId,
        slot: i32,
    },

    /// An option references a child setting the schema does not contain
    #[error("setting {parent} references unknown child setting {child}")]
    UnknownChildSetting { parent: SettingId, child: SettingId },

    /// A setting cannot be reached from any root (the hierarchy has a cycle)
    #[error("setting {0} is not reachable from a root setting")]
    CyclicHierarchy(SettingId),

    /// More than one custom value setting in a schema
    #[error("at most one CustomValueUserStyleSetting is allowed, found {0}")]
    MultipleCustomValueSettings(usize),

    /// More than one complication slots setting can be active at once
    #[error("at most one ComplicationSlotsUserStyleSetting may be active in any style, found {0}")]
    ConflictingComplicationSlotsSettings(usize),

    /// The setting is not part of the schema the style was created from
    #[error("unknown setting {0}")]
    UnknownSetting(SettingId),

    /// The option cannot be selected for the setting
    #[error("option {option} does not belong to setting {setting}")]
    OptionNotInSetting { setting: SettingId, option: OptionId },

    /// The editor session was already closed
    #[error("editor session is closed")]
    SessionClosed,
}

/// Result type for style operations
pub type Result<T> = std::result::Result<T, StyleError>;
