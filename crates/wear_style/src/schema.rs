//! User style schema
//!
//! The schema owns every setting of a watch face, including settings that are
//! only revealed by selecting an option of another setting. Settings are kept
//! in an arena keyed by id; options refer to their child settings by id, so
//! the hierarchy is discovered once here and never stored as back-references.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::digest::{digest_settings, DigestHash};
use crate::error::{Result, StyleError};
use crate::id::SettingId;
use crate::setting::{ComplicationSlotsOption, UserStyleSetting};
use crate::style::UserStyle;

/// The complete set of user style settings of a watch face
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<UserStyleSetting>", into = "Vec<UserStyleSetting>")]
pub struct UserStyleSchema {
    /// All settings, in declaration order
    settings: IndexMap<SettingId, UserStyleSetting>,
    /// Settings no option refers to, in declaration order
    roots: Vec<SettingId>,
    /// Settings referenced as a child by at least one option
    with_parent: FxHashSet<SettingId>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl UserStyleSchema {
    /// Build and validate a schema.
    ///
    /// `settings` lists every setting, roots and children alike.
    pub fn new(settings: Vec<UserStyleSetting>) -> Result<Self> {
        let mut arena = IndexMap::with_capacity(settings.len());
        for setting in settings {
            let id = setting.id().clone();
            if arena.insert(id.clone(), setting).is_some() {
                return Err(StyleError::DuplicateSettingId(id));
            }
        }

        let mut with_parent = FxHashSet::default();
        for setting in arena.values() {
            for option in setting.options() {
                for child in option.child_settings() {
                    if !arena.contains_key(child) {
                        return Err(StyleError::UnknownChildSetting {
                            parent: setting.id().clone(),
                            child: child.clone(),
                        });
                    }
                    with_parent.insert(child.clone());
                }
            }
        }

        let roots: Vec<SettingId> = arena
            .keys()
            .filter(|id| !with_parent.contains(*id))
            .cloned()
            .collect();

        let schema = Self {
            settings: arena,
            roots,
            with_parent,
        };
        schema.check_hierarchy()?;
        schema.check_custom_values()?;
        schema.check_complication_settings()?;

        debug!(
            "UserStyleSchema: {} settings, {} roots",
            schema.settings.len(),
            schema.roots.len()
        );
        Ok(schema)
    }

    /// Every setting must be reachable from a root without revisiting itself
    fn check_hierarchy(&self) -> Result<()> {
        let mut state: FxHashMap<&SettingId, Visit> = FxHashMap::default();
        for root in &self.roots {
            self.visit(root, &mut state)?;
        }
        match self.settings.keys().find(|id| !state.contains_key(id)) {
            Some(unreachable) => Err(StyleError::CyclicHierarchy(unreachable.clone())),
            None => Ok(()),
        }
    }

    fn visit<'a>(
        &'a self,
        id: &'a SettingId,
        state: &mut FxHashMap<&'a SettingId, Visit>,
    ) -> Result<()> {
        match state.get(id) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => return Err(StyleError::CyclicHierarchy(id.clone())),
            None => {}
        }
        state.insert(id, Visit::InProgress);
        if let Some(setting) = self.settings.get(id) {
            for option in setting.options() {
                for child in option.child_settings() {
                    self.visit(child, state)?;
                }
            }
        }
        state.insert(id, Visit::Done);
        Ok(())
    }

    fn check_custom_values(&self) -> Result<()> {
        let count = self
            .settings
            .values()
            .filter(|s| s.is_custom_value())
            .count();
        if count > 1 {
            return Err(StyleError::MultipleCustomValueSettings(count));
        }
        Ok(())
    }

    /// At most one complication slots setting may be active in any style
    fn check_complication_settings(&self) -> Result<()> {
        let mut memo = FxHashMap::default();
        let count: usize = self
            .roots
            .iter()
            .map(|id| self.max_active_complication_settings(id, &mut memo))
            .sum();
        if count > 1 {
            return Err(StyleError::ConflictingComplicationSlotsSettings(count));
        }
        Ok(())
    }

    /// Largest number of complication slots settings active at once in the
    /// subtree of `id`: the setting itself plus, for the worst option, all of
    /// that option's children (which are active simultaneously).
    fn max_active_complication_settings<'a>(
        &'a self,
        id: &'a SettingId,
        memo: &mut FxHashMap<&'a SettingId, usize>,
    ) -> usize {
        if let Some(count) = memo.get(id) {
            return *count;
        }
        let Some(setting) = self.settings.get(id) else {
            return 0;
        };
        let own = usize::from(setting.is_complication_slots());
        let worst_option = setting
            .options()
            .iter()
            .map(|option| {
                option
                    .child_settings()
                    .iter()
                    .map(|child| self.max_active_complication_settings(child, memo))
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0);
        memo.insert(id, own + worst_option);
        own + worst_option
    }

    /// All settings in declaration order
    pub fn settings(&self) -> impl Iterator<Item = &UserStyleSetting> {
        self.settings.values()
    }

    /// Top-level settings in declaration order
    pub fn root_settings(&self) -> impl Iterator<Item = &UserStyleSetting> {
        self.roots.iter().filter_map(|id| self.settings.get(id))
    }

    pub fn get(&self, id: &SettingId) -> Option<&UserStyleSetting> {
        self.settings.get(id)
    }

    pub fn contains(&self, id: &SettingId) -> bool {
        self.settings.contains_key(id)
    }

    /// Whether some option reveals this setting
    pub fn has_parent(&self, id: &SettingId) -> bool {
        self.with_parent.contains(id)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// The style selecting every setting's default option
    pub fn default_style(&self) -> UserStyle {
        UserStyle::default_for(self)
    }

    /// Find the complication slots option selected by `style`.
    ///
    /// Walks depth-first from the roots, following the selected option of each
    /// setting into its child settings. Returns `None` when no selected path
    /// reaches a complication slots setting; settings missing from `style` end
    /// their path.
    pub fn find_complication_slots_option_for_user_style(
        &self,
        style: &UserStyle,
    ) -> Option<&ComplicationSlotsOption> {
        self.find_complication_slots_option(&self.roots, style)
    }

    fn find_complication_slots_option<'a>(
        &'a self,
        ids: &[SettingId],
        style: &UserStyle,
    ) -> Option<&'a ComplicationSlotsOption> {
        for id in ids {
            let (Some(setting), Some(selected)) = (self.settings.get(id), style.get(id)) else {
                continue;
            };
            let Some(option) = setting.options().iter().find(|o| o.id() == selected.id()) else {
                continue;
            };
            if let Some(slots) = option.as_complication_slots() {
                return Some(slots);
            }
            if let Some(found) = self.find_complication_slots_option(option.child_settings(), style) {
                return Some(found);
            }
        }
        None
    }

    /// Stable fingerprint of the schema's content.
    ///
    /// Covers setting ids, display names, descriptions, affected layers (as a
    /// set), option ids, option display names and child references. Icons are
    /// not covered, so schemas differing only in icons share a digest.
    pub fn digest_hash(&self) -> DigestHash {
        digest_settings(self.settings.values())
    }

    /// Wrap in an `Arc` for sharing with styles and repositories
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl TryFrom<Vec<UserStyleSetting>> for UserStyleSchema {
    type Error = StyleError;

    fn try_from(settings: Vec<UserStyleSetting>) -> Result<Self> {
        Self::new(settings)
    }
}

impl From<UserStyleSchema> for Vec<UserStyleSetting> {
    fn from(schema: UserStyleSchema) -> Self {
        schema.settings.into_values().collect()
    }
}
