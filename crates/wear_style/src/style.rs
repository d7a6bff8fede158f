//! Resolved user styles and their wire format
//!
//! [`UserStyleData`] is what gets persisted and sent between the editor and
//! the watch face: setting ids mapped to raw option id bytes. A [`UserStyle`]
//! is that data resolved against a [`UserStyleSchema`], with a selected option
//! for every setting. Resolution never fails; anything the schema cannot
//! interpret falls back to defaults so older and newer schema versions can
//! exchange styles.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StyleError};
use crate::id::{OptionId, SettingId};
use crate::schema::UserStyleSchema;
use crate::setting::{StyleOption, UserStyleSetting};

/// Wire format of a user style: setting id -> option id bytes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserStyleData(BTreeMap<String, Vec<u8>>);

impl UserStyleData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, setting_id: impl Into<String>, option_id: impl Into<Vec<u8>>) {
        self.0.insert(setting_id.into(), option_id.into());
    }

    pub fn get(&self, setting_id: &str) -> Option<&[u8]> {
        self.0.get(setting_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<u8>)> for UserStyleData {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolve raw bytes against a setting, falling back to its default
fn resolve(setting: &UserStyleSetting, raw: &[u8]) -> StyleOption {
    match OptionId::new(raw) {
        Ok(id) => setting.option_for_id(&id),
        Err(err) => {
            debug!("setting {}: {}, using default", setting.id(), err);
            setting.default_option().clone()
        }
    }
}

/// An immutable selection of one option per setting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserStyle {
    selected: IndexMap<SettingId, StyleOption>,
}

impl UserStyle {
    /// Every setting at its default option
    pub fn default_for(schema: &UserStyleSchema) -> Self {
        Self {
            selected: schema
                .settings()
                .map(|s| (s.id().clone(), s.default_option().clone()))
                .collect(),
        }
    }

    /// Resolve wire data against `schema`.
    ///
    /// Settings absent from `data`, or whose bytes match no option, take their
    /// default. Entries for settings the schema does not know are skipped.
    pub fn from_data(data: &UserStyleData, schema: &UserStyleSchema) -> Self {
        for (key, _) in data.iter() {
            let known = SettingId::new(key).is_ok_and(|id| schema.contains(&id));
            if !known {
                debug!("UserStyle::from_data - skipping unknown setting {}", key);
            }
        }

        let selected = schema
            .settings()
            .map(|setting| {
                let option = match data.get(setting.id().as_str()) {
                    Some(raw) => resolve(setting, raw),
                    None => setting.default_option().clone(),
                };
                (setting.id().clone(), option)
            })
            .collect();
        Self { selected }
    }

    pub fn get(&self, setting: &SettingId) -> Option<&StyleOption> {
        self.selected.get(setting)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SettingId, &StyleOption)> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Convert back to the wire format
    pub fn to_data(&self) -> UserStyleData {
        self.selected
            .iter()
            .map(|(id, option)| (id.as_str().to_owned(), option.id().as_bytes().to_vec()))
            .collect()
    }

    /// Overlay `other` onto this style.
    ///
    /// Returns `None` when the overlay changes nothing, so callers can detect
    /// no-op edits without comparing whole styles. Settings of `other` that
    /// this style does not contain are ignored.
    pub fn merge(&self, other: &UserStyle) -> Option<UserStyle> {
        self.merge_options(other.iter().map(|(id, option)| (id.clone(), option.clone())))
    }

    /// Like [`merge`](Self::merge) for an overlay in wire format
    pub fn merge_data(&self, data: &UserStyleData, schema: &UserStyleSchema) -> Option<UserStyle> {
        let overlay = data.iter().filter_map(|(key, raw)| {
            let id = SettingId::new(key).ok()?;
            let setting = schema.get(&id)?;
            Some((id, resolve(setting, raw)))
        });
        self.merge_options(overlay)
    }

    fn merge_options(
        &self,
        overlay: impl Iterator<Item = (SettingId, StyleOption)>,
    ) -> Option<UserStyle> {
        let mut merged = self.selected.clone();
        let mut changed = false;
        for (id, option) in overlay {
            if let Some(current) = merged.get_mut(&id) {
                if current.id() != option.id() {
                    *current = option;
                    changed = true;
                }
            }
        }
        changed.then_some(UserStyle { selected: merged })
    }

    /// Start a staged edit of this style
    pub fn to_mutable(&self, schema: Arc<UserStyleSchema>) -> MutableUserStyle {
        MutableUserStyle {
            schema,
            selected: self.selected.clone(),
        }
    }
}

impl fmt::Display for UserStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (id, option)) in self.selected.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} -> {}", id, option.id())?;
        }
        f.write_str("]")
    }
}

/// A staged, validated edit of a [`UserStyle`]
#[derive(Clone, Debug)]
pub struct MutableUserStyle {
    schema: Arc<UserStyleSchema>,
    selected: IndexMap<SettingId, StyleOption>,
}

impl MutableUserStyle {
    /// Select `option` for `setting`.
    ///
    /// Fails if the setting is not part of the originating schema or the option
    /// is not one of the setting's options.
    pub fn set(&mut self, setting: &SettingId, option: StyleOption) -> Result<()> {
        let declared = self.declared(setting)?;
        if !declared.owns_option(&option) {
            return Err(StyleError::OptionNotInSetting {
                setting: setting.clone(),
                option: option.id().clone(),
            });
        }
        self.selected.insert(setting.clone(), option);
        Ok(())
    }

    /// Select the option of `setting` identified by `option`
    pub fn set_by_id(&mut self, setting: &SettingId, option: &OptionId) -> Result<()> {
        let resolved = self.declared(setting)?.option_for_id(option);
        if resolved.id() != option {
            return Err(StyleError::OptionNotInSetting {
                setting: setting.clone(),
                option: option.clone(),
            });
        }
        self.set(setting, resolved)
    }

    pub fn get(&self, setting: &SettingId) -> Option<&StyleOption> {
        self.selected.get(setting)
    }

    pub fn schema(&self) -> &Arc<UserStyleSchema> {
        &self.schema
    }

    /// Snapshot the staged selection
    pub fn to_user_style(&self) -> UserStyle {
        UserStyle {
            selected: self.selected.clone(),
        }
    }

    fn declared(&self, setting: &SettingId) -> Result<&UserStyleSetting> {
        if !self.selected.contains_key(setting) {
            return Err(StyleError::UnknownSetting(setting.clone()));
        }
        self.schema
            .get(setting)
            .ok_or_else(|| StyleError::UnknownSetting(setting.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::WatchFaceLayer;
    use crate::setting::ListOption;

    fn sid(id: &str) -> SettingId {
        SettingId::new(id).unwrap()
    }

    fn oid(id: &str) -> OptionId {
        OptionId::from_name(id).unwrap()
    }

    fn schema() -> Arc<UserStyleSchema> {
        let color = UserStyleSetting::list(
            sid("color"),
            "Colour",
            "",
            [WatchFaceLayer::Base],
            vec![
                StyleOption::list(oid("red"), ListOption::new("Red")),
                StyleOption::list(oid("blue"), ListOption::new("Blue")),
            ],
            0,
        )
        .unwrap();
        let ticks = UserStyleSetting::boolean(sid("ticks"), "Ticks", "", [], true).unwrap();
        UserStyleSchema::new(vec![color, ticks]).unwrap().into_shared()
    }

    #[test]
    fn test_from_data_defaults_and_skips() {
        let schema = schema();
        let mut data = UserStyleData::new();
        data.insert("color", "blue");
        data.insert("unknown", "whatever");

        let style = UserStyle::from_data(&data, &schema);
        assert_eq!(style.len(), 2);
        assert_eq!(style.get(&sid("color")).unwrap().id(), &oid("blue"));
        assert_eq!(style.get(&sid("ticks")).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_oversized_bytes_fall_back() {
        let schema = schema();
        let mut data = UserStyleData::new();
        data.insert("color", vec![b'x'; OptionId::MAX_LENGTH + 1]);
        let style = UserStyle::from_data(&data, &schema);
        assert_eq!(style.get(&sid("color")).unwrap().id(), &oid("red"));
    }

    #[test]
    fn test_to_data_round_trip() {
        let schema = schema();
        let mut data = UserStyleData::new();
        data.insert("color", "blue");
        let style = UserStyle::from_data(&data, &schema);
        assert_eq!(UserStyle::from_data(&style.to_data(), &schema), style);
    }

    #[test]
    fn test_mutable_rejects_unknown_setting() {
        let schema = schema();
        let mut edit = schema.default_style().to_mutable(schema.clone());
        assert_eq!(
            edit.set(&sid("nope"), StyleOption::boolean(true)),
            Err(StyleError::UnknownSetting(sid("nope")))
        );
    }

    #[test]
    fn test_mutable_rejects_foreign_option() {
        let schema = schema();
        let mut edit = schema.default_style().to_mutable(schema.clone());
        let result = edit.set(&sid("color"), StyleOption::boolean(false));
        assert!(matches!(result, Err(StyleError::OptionNotInSetting { .. })));

        let result = edit.set_by_id(&sid("color"), &oid("green"));
        assert!(matches!(result, Err(StyleError::OptionNotInSetting { .. })));

        edit.set_by_id(&sid("color"), &oid("blue")).unwrap();
        assert_eq!(
            edit.to_user_style().get(&sid("color")).unwrap().id(),
            &oid("blue")
        );
    }

    #[test]
    fn test_display() {
        let style = schema().default_style();
        assert_eq!(style.to_string(), "[color -> red, ticks -> 0x01]");
    }
}
