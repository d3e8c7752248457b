//! Validation wakeups.
//!
//! A field's driver validates off the caller's stack, so hosts that render
//! errors need to hear about it. After every validation the field sends its
//! [`FieldId`] on the installed channel; the host drains the ids and redraws
//! those fields.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::field::FieldId;

/// Sender half of the wakeup channel.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<FieldId>,
}

impl WakeupSender {
    /// Report that `id` was validated.
    ///
    /// Non-blocking. A full or closed channel drops the signal; the next
    /// drain will still see the field's latest state.
    pub fn send(&self, id: FieldId) {
        let _ = self.tx.try_send(id);
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<FieldId>,
}

impl WakeupReceiver {
    /// Wait for the next validated field.
    pub async fn recv(&mut self) -> Option<FieldId> {
        self.rx.recv().await
    }

    /// Drain all buffered ids, collapsing repeats of the same field.
    pub fn drain(&mut self) -> Vec<FieldId> {
        let mut ids = Vec::new();
        while let Ok(id) = self.rx.try_recv() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Create a new wakeup channel pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(64);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Slot a field holds for an optional wakeup sender.
///
/// Fields are usually created before the host wires up its channel, so the
/// sender is installed later.
#[derive(Debug, Default, Clone)]
pub struct WakeupHandle {
    inner: Arc<Mutex<Option<WakeupSender>>>,
}

impl WakeupHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a sender, replacing any previous one.
    pub fn install(&self, sender: WakeupSender) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(sender);
        }
    }

    /// Signal `id` if a sender is installed.
    pub fn send(&self, id: FieldId) {
        if let Ok(guard) = self.inner.lock()
            && let Some(sender) = guard.as_ref()
        {
            sender.send(id);
        }
    }
}
