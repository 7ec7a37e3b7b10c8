//! Scoped idle-hide timer.

use tokio::sync::mpsc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Delivered when a session's hide timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideElapsed {
    pub session: u64,
    pub generation: u64,
}

/// Pending hide timer. Dropping the handle cancels it.
#[derive(Debug)]
pub(crate) struct HideTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl HideTimer {
    /// `None` outside a tokio runtime; the overlay then stays up until the
    /// host hides it.
    pub(crate) fn start(
        delay: Duration,
        session: u64,
        generation: u64,
        events: mpsc::UnboundedSender<HideElapsed>,
    ) -> Option<Self> {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Viewer {}: no runtime for the hide timer: {}", session, e);
                return None;
            }
        };
        let handle = runtime.spawn(async move {
            sleep(delay).await;
            if events.send(HideElapsed { session, generation }).is_err() {
                tracing::debug!("Hide timer fired after the host went away");
            }
        });
        Some(Self { generation, handle })
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for HideTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
