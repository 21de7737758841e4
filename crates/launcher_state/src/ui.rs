use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory view state. Never persisted; every start begins closed.
#[derive(Debug, Default)]
pub struct UiFlags {
    drawer_open: AtomicBool,
}

impl UiFlags {
    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open.load(Ordering::Relaxed)
    }

    pub fn set_drawer_open(&self, open: bool) {
        self.drawer_open.store(open, Ordering::Relaxed);
    }

    /// Returns the new state.
    pub fn toggle_drawer(&self) -> bool {
        !self.drawer_open.fetch_xor(true, Ordering::Relaxed)
    }
}
