//! In-memory state store.

use std::cell::RefCell;

use tbrun_core::FlowError;
use tbrun_core::flow::state::StateStore;

/// A state store holding the record in memory.
///
/// Records every save so tests can assert when and with what the flow
/// persisted its selection.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    current: RefCell<Option<String>>,
    /// Every value passed to `save`, in order.
    pub saves: RefCell<Vec<String>>,
}

impl MemoryStateStore {
    /// An empty store: no previous selection recorded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a previous selection.
    pub fn with_previous(test: &str) -> Self {
        Self {
            current: RefCell::new(Some(test.to_string())),
            saves: RefCell::new(Vec::new()),
        }
    }

    /// The currently recorded selection.
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<String>, FlowError> {
        Ok(self.current.borrow().clone())
    }

    fn save(&self, test: &str) -> Result<(), FlowError> {
        *self.current.borrow_mut() = Some(test.to_string());
        self.saves.borrow_mut().push(test.to_string());
        Ok(())
    }
}
