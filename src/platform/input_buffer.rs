//=========================================================================
// Input Buffer
//
// Holds input collected between two polls of the window.
//
// - discrete: key/button events in arrival order; an event identical to
//   the one just before it is dropped (OS key repeat)
// - continuous: latest value per kind (one MouseMoved at most)
//
// Drained once per frame by `WinitWindow::poll_events`.
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashSet;

//=== Internal Modules ====================================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

#[derive(Debug)]
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(64),
            continuous: HashSet::with_capacity(4),
        }
    }

    /// Routes `event` to the discrete or continuous store.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_discrete() {
            if self.discrete.last() != Some(&event) {
                self.discrete.push(event);
            }
        } else if !matches!(event, InputEvent::Unidentified) {
            self.continuous.replace(event);
        }
    }

    /// Returns `(discrete, continuous)` and leaves the buffer empty.
    pub(crate) fn drain(&mut self) -> (Vec<InputEvent>, Vec<InputEvent>) {
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.drain().collect();
        (discrete, continuous)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
