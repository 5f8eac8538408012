use std::sync::mpsc::{self, Receiver, Sender};

use super::Scene;

/// Deferred scene mutation, run on the render thread at the start of a frame.
pub type Action = Box<dyn FnOnce(&mut Scene) + Send + 'static>;

/// Cloneable, thread-safe handle for queueing actions onto a scene.
#[derive(Clone)]
pub struct ActionSender {
    tx: Sender<Action>,
}

impl ActionSender {
    /// Queues `action`. Returns `false` if the scene has been dropped.
    pub fn send(&self, action: impl FnOnce(&mut Scene) + Send + 'static) -> bool {
        self.tx.send(Box::new(action)).is_ok()
    }
}

impl std::fmt::Debug for ActionSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSender").finish_non_exhaustive()
    }
}

/// FIFO of pending actions.
pub(crate) struct ActionQueue {
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl ActionQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> ActionSender {
        ActionSender { tx: self.tx.clone() }
    }

    pub(crate) fn push(&self, action: Action) {
        // The receiver lives as long as `self`, so this cannot fail.
        let _ = self.tx.send(action);
    }

    /// Everything queued so far, oldest first. Actions queued while the batch
    /// runs land in the next batch.
    pub(crate) fn take_batch(&self) -> Vec<Action> {
        self.rx.try_iter().collect()
    }
}
