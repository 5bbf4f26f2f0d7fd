// SPDX-License-Identifier: MIT OR Apache-2.0

//! Light/dark appearance shared across the process.
//!
//! The app samples the system preference every frame and publishes it here;
//! renderers hold an [`AppearanceSubscription`] and only hear about actual
//! changes. Dropping a subscription unregisters it.

use std::sync::{Arc, Weak};

use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

/// Color scheme in effect. Affects colors only, never geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Appearance::Dark
        } else {
            Appearance::Light
        }
    }
}

static GLOBAL: Lazy<Arc<AppearanceHub>> = Lazy::new(|| AppearanceHub::new(Appearance::default()));

struct HubInner {
    current: Appearance,
    next_id: u64,
    subscribers: Vec<(u64, Sender<Appearance>)>,
}

/// Holds the current appearance and fans out changes
pub struct AppearanceHub {
    inner: Mutex<HubInner>,
}

impl AppearanceHub {
    pub fn new(initial: Appearance) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(HubInner {
                current: initial,
                next_id: 0,
                subscribers: Vec::new(),
            }),
        })
    }

    /// Process-wide instance
    pub fn global() -> &'static Arc<AppearanceHub> {
        &GLOBAL
    }

    pub fn current(&self) -> Appearance {
        self.inner.lock().current
    }

    /// Register for change notifications
    pub fn subscribe(self: &Arc<Self>) -> AppearanceSubscription {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));

        AppearanceSubscription {
            id,
            hub: Arc::downgrade(self),
            rx,
            current: inner.current,
        }
    }

    /// Set the appearance. Subscribers are notified only when it changed;
    /// returns whether it did.
    pub fn publish(&self, appearance: Appearance) -> bool {
        let mut inner = self.inner.lock();
        if inner.current == appearance {
            return false;
        }
        inner.current = appearance;
        inner
            .subscribers
            .retain(|(_, tx)| tx.send(appearance).is_ok());
        debug!(?appearance, subscribers = inner.subscribers.len(), "Appearance changed");
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner.lock().subscribers.retain(|(sid, _)| *sid != id);
    }
}

/// Live view of the hub's appearance
pub struct AppearanceSubscription {
    id: u64,
    hub: Weak<AppearanceHub>,
    rx: Receiver<Appearance>,
    current: Appearance,
}

impl AppearanceSubscription {
    /// Latest appearance, applying any pending notifications
    pub fn latest(&mut self) -> Appearance {
        while let Ok(appearance) = self.rx.try_recv() {
            self.current = appearance;
        }
        self.current
    }

    /// Whether a change arrived since the last call to [`latest`](Self::latest)
    pub fn has_pending(&self) -> bool {
        !self.rx.is_empty()
    }
}

impl Drop for AppearanceSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for AppearanceSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppearanceSubscription")
            .field("id", &self.id)
            .field("current", &self.current)
            .finish()
    }
}
