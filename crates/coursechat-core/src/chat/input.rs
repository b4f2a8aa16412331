//! Input affordance state shared by the controllers and the surface.
//!
//! The gate is closed while the current request is in flight and opened when
//! that request settles or the session is reset. Surfaces watch it to decide
//! whether a submitted line may start a new turn.

use std::sync::Arc;

use tokio::sync::watch;

/// Enabled/disabled flag for the chat input, observable through `watch`.
///
/// Cloning produces a shared view of the same flag.
#[derive(Debug, Clone)]
pub struct InputGate {
    state: Arc<watch::Sender<bool>>,
}

impl InputGate {
    /// Create an open gate.
    pub fn new() -> Self {
        let (state, _) = watch::channel(true);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn enable(&self) {
        self.state.send_replace(true);
    }

    pub fn disable(&self) {
        self.state.send_replace(false);
    }

    pub fn is_enabled(&self) -> bool {
        *self.state.borrow()
    }

    /// Watch for enable/disable transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}
