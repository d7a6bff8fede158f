//! Click actions

use std::cell::RefCell;

use tracing::debug;

use crate::proto::{Action, Clickable};

/// A click handler bound to a view or a text range
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickAction {
    pub clickable_id: String,
    pub action: Action,
}

impl From<&Clickable> for ClickAction {
    fn from(clickable: &Clickable) -> Self {
        Self {
            clickable_id: clickable.id.clone(),
            action: clickable.on_click.clone(),
        }
    }
}

/// Host hook that carries out click actions
pub trait ActionDispatcher {
    fn dispatch(&self, click: &ClickAction);
}

/// Dispatcher that remembers every action it receives
#[derive(Default)]
pub struct RecordingDispatcher {
    dispatched: RefCell<Vec<ClickAction>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<ClickAction> {
        self.dispatched.borrow().clone()
    }

    pub fn take(&self) -> Vec<ClickAction> {
        std::mem::take(&mut *self.dispatched.borrow_mut())
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&self, click: &ClickAction) {
        debug!("RecordingDispatcher::dispatch - {}", click.clickable_id);
        self.dispatched.borrow_mut().push(click.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_recording() {
        let dispatcher = RecordingDispatcher::new();
        let click = ClickAction::from(&Clickable {
            id: "refresh".to_string(),
            on_click: Action::Load {
                state: BTreeMap::new(),
            },
        });
        dispatcher.dispatch(&click);
        assert_eq!(dispatcher.dispatched(), vec![click]);
        assert_eq!(dispatcher.take().len(), 1);
        assert!(dispatcher.dispatched().is_empty());
    }
}
