//! Watch face editor session
//!
//! An editor session stages style edits and previews them live through the
//! repository. Closing the session either keeps the edits or restores the
//! style the session was opened with. A session dropped without being closed
//! restores the original style.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{Result, StyleError};
use crate::id::{OptionId, SettingId};
use crate::repository::CurrentUserStyleRepository;
use crate::schema::UserStyleSchema;
use crate::setting::{ComplicationSlotsOption, StyleOption};
use crate::style::{MutableUserStyle, UserStyle};

/// A staged editing session over a [`CurrentUserStyleRepository`]
pub struct EditorSession {
    repository: Rc<CurrentUserStyleRepository>,
    initial: UserStyle,
    staged: MutableUserStyle,
    closed: bool,
}

impl EditorSession {
    pub fn open(repository: Rc<CurrentUserStyleRepository>) -> Self {
        let initial = repository.current();
        let staged = initial.to_mutable(repository.schema().clone());
        debug!("EditorSession::open - {}", initial);
        Self {
            repository,
            initial,
            staged,
            closed: false,
        }
    }

    pub fn schema(&self) -> &UserStyleSchema {
        self.repository.schema()
    }

    /// The style the session was opened with
    pub fn initial_style(&self) -> &UserStyle {
        &self.initial
    }

    /// The staged style, including uncommitted edits
    pub fn user_style(&self) -> UserStyle {
        self.staged.to_user_style()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stage an option and preview it through the repository
    pub fn set_option(&mut self, setting: &SettingId, option: StyleOption) -> Result<()> {
        self.ensure_open()?;
        self.staged.set(setting, option)?;
        self.repository.update(&self.staged.to_user_style())?;
        Ok(())
    }

    /// Stage an option by id and preview it through the repository
    pub fn set_option_by_id(&mut self, setting: &SettingId, option: &OptionId) -> Result<()> {
        self.ensure_open()?;
        self.staged.set_by_id(setting, option)?;
        self.repository.update(&self.staged.to_user_style())?;
        Ok(())
    }

    /// Complication slot overlays the staged style would apply
    pub fn complication_slots_option(&self) -> Option<ComplicationSlotsOption> {
        self.schema()
            .find_complication_slots_option_for_user_style(&self.staged.to_user_style())
            .cloned()
    }

    /// End the session, keeping the edits if `commit` is true.
    ///
    /// Returns the repository's style after closing.
    pub fn close(&mut self, commit: bool) -> Result<UserStyle> {
        self.ensure_open()?;
        self.closed = true;
        if !commit {
            self.repository.update(&self.initial)?;
        }
        debug!("EditorSession::close - commit={}", commit);
        Ok(self.repository.current())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(StyleError::SessionClosed);
        }
        Ok(())
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.close(false) {
                warn!("EditorSession dropped while open, revert failed: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::UserStyleSetting;

    fn ticks() -> SettingId {
        SettingId::new("ticks").unwrap()
    }

    fn repository() -> Rc<CurrentUserStyleRepository> {
        let setting = UserStyleSetting::boolean(ticks(), "", "", [], true).unwrap();
        let schema = UserStyleSchema::new(vec![setting]).unwrap().into_shared();
        Rc::new(CurrentUserStyleRepository::new(schema))
    }

    #[test]
    fn test_edits_preview_then_revert() {
        let repo = repository();
        let mut session = EditorSession::open(repo.clone());
        session
            .set_option(&ticks(), StyleOption::boolean(false))
            .unwrap();
        assert_eq!(repo.current().get(&ticks()).unwrap().as_bool(), Some(false));

        let after = session.close(false).unwrap();
        assert_eq!(after.get(&ticks()).unwrap().as_bool(), Some(true));
        assert_eq!(session.close(true), Err(StyleError::SessionClosed));
    }

    #[test]
    fn test_commit_keeps_edits() {
        let repo = repository();
        let mut session = EditorSession::open(repo.clone());
        session
            .set_option(&ticks(), StyleOption::boolean(false))
            .unwrap();
        let after = session.close(true).unwrap();
        assert_eq!(after.get(&ticks()).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_drop_reverts() {
        let repo = repository();
        {
            let mut session = EditorSession::open(repo.clone());
            session
                .set_option(&ticks(), StyleOption::boolean(false))
                .unwrap();
        }
        assert_eq!(repo.current().get(&ticks()).unwrap().as_bool(), Some(true));
    }
}
