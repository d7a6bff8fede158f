//! Current user style holder
//!
//! The repository owns the watch face's schema and its current [`UserStyle`].
//! Renderers and complication managers subscribe to it; edits go through
//! [`CurrentUserStyleRepository::update`], the single write entry point.
//!
//! The repository is passed to its consumers explicitly. It is meant to live
//! on the UI thread and is therefore neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::{Result, StyleError};
use crate::schema::UserStyleSchema;
use crate::style::{UserStyle, UserStyleData};

new_key_type! {
    /// Handle returned by [`CurrentUserStyleRepository::subscribe`]
    pub struct SubscriptionId;
}

type Listener = Rc<dyn Fn(&UserStyle)>;

/// Observable holder of the current user style
pub struct CurrentUserStyleRepository {
    schema: Arc<UserStyleSchema>,
    style: RefCell<UserStyle>,
    listeners: RefCell<SlotMap<SubscriptionId, Listener>>,
}

impl CurrentUserStyleRepository {
    /// Create a repository holding the schema's default style
    pub fn new(schema: Arc<UserStyleSchema>) -> Self {
        let style = schema.default_style();
        Self {
            schema,
            style: RefCell::new(style),
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Create a repository starting from persisted style data
    pub fn with_data(schema: Arc<UserStyleSchema>, data: &UserStyleData) -> Self {
        let style = UserStyle::from_data(data, &schema);
        Self {
            schema,
            style: RefCell::new(style),
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn schema(&self) -> &Arc<UserStyleSchema> {
        &self.schema
    }

    /// Snapshot of the current style
    pub fn current(&self) -> UserStyle {
        self.style.borrow().clone()
    }

    /// Observe style changes.
    ///
    /// The callback runs immediately with the current style, then after every
    /// effective update.
    pub fn subscribe(&self, listener: impl Fn(&UserStyle) + 'static) -> SubscriptionId {
        let listener: Listener = Rc::new(listener);
        let id = self.listeners.borrow_mut().insert(listener.clone());
        let current = self.current();
        listener(&current);
        id
    }

    /// Stop observing. Returns false if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(id).is_some()
    }

    /// Replace the current style.
    ///
    /// Settings missing from `style` keep their current option. Fails without
    /// changing anything if `style` selects a setting or option foreign to the
    /// schema. Returns whether the style changed; listeners are only notified
    /// when it did.
    pub fn update(&self, style: &UserStyle) -> Result<bool> {
        let mut next = self.current().to_mutable(self.schema.clone());
        for (id, option) in style.iter() {
            if !self.schema.contains(id) {
                return Err(StyleError::UnknownSetting(id.clone()));
            }
            next.set(id, option.clone())?;
        }
        let next = next.to_user_style();

        if *self.style.borrow() == next {
            return Ok(false);
        }
        debug!("CurrentUserStyleRepository::update - {}", next);
        *self.style.borrow_mut() = next.clone();

        // Listeners may subscribe, unsubscribe or read the style re-entrantly.
        let listeners: Vec<Listener> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(&next);
        }
        Ok(true)
    }

    /// Resolve wire data against the schema and apply it as an overlay
    pub fn update_from_data(&self, data: &UserStyleData) -> Result<bool> {
        match self.current().merge_data(data, &self.schema) {
            Some(merged) => self.update(&merged),
            None => Ok(false),
        }
    }
}
