use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{Level, event};

type Hook = Box<dyn Fn() + Send + Sync>;

/// Session-expired notification, de-duplicated so concurrent rejections surface to the
/// user at most once per session. Re-armed when new credentials are installed.
#[derive(Default)]
pub struct SessionExpiredSignal {
    notified: AtomicBool,
    hook: Mutex<Option<Hook>>,
}

impl SessionExpiredSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, hook: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.hook.lock() {
            *slot = Some(Box::new(hook));
        }
    }

    /// Raises the signal; only the first call per session notifies.
    pub fn raise(&self, path: &str) {
        if self.notified.swap(true, Ordering::SeqCst) {
            return;
        }
        event!(Level::WARN, path = %path, "session.expired");
        if let Ok(slot) = self.hook.lock()
            && let Some(hook) = slot.as_ref()
        {
            hook();
        }
    }

    pub fn reset(&self) {
        self.notified.store(false, Ordering::SeqCst);
    }

    pub fn was_raised(&self) -> bool {
        self.notified.load(Ordering::SeqCst)
    }
}
