//! Manual-intervention pause.
//!
//! When the site throws up a CAPTCHA the run stops until someone outside the
//! engine says it may continue. The engine side holds a [`SuspensionPoint`];
//! whoever can talk to a human holds the matching [`SuspensionControl`].

use std::sync::Arc;

use tokio::sync::{mpsc, Notify};
use tracing::warn;

use crate::app::{GleanerError, Result};

/// Why the run is waiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspended {
    pub reason: String,
    pub keyword: Option<String>,
}

/// Create a connected suspension point and controller
pub fn suspension_channel() -> (SuspensionPoint, SuspensionControl) {
    let (tx, rx) = mpsc::unbounded_channel();
    let resume = Arc::new(Notify::new());
    (
        SuspensionPoint {
            notices: tx,
            resume: resume.clone(),
        },
        SuspensionControl {
            notices: rx,
            resume,
        },
    )
}

#[derive(Clone)]
pub struct SuspensionPoint {
    notices: mpsc::UnboundedSender<Suspended>,
    resume: Arc<Notify>,
}

impl SuspensionPoint {
    /// Announce the suspension and wait, without a timeout, for a resume.
    ///
    /// Fails only when no controller is left to ever resume the run.
    pub async fn suspend(&self, notice: Suspended) -> Result<()> {
        warn!("Run suspended: {}", notice.reason);

        // Registered before the notice goes out, so a resume that follows it can't be missed
        let resumed = self.resume.notified();
        tokio::pin!(resumed);
        resumed.as_mut().enable();

        self.notices.send(notice).map_err(|_| {
            GleanerError::Suspension("no controller is listening for suspensions".to_string())
        })?;
        resumed.await;
        Ok(())
    }
}

pub struct SuspensionControl {
    notices: mpsc::UnboundedReceiver<Suspended>,
    resume: Arc<Notify>,
}

impl SuspensionControl {
    /// Wait for the next suspension; `None` once every point is gone
    pub async fn next_suspension(&mut self) -> Option<Suspended> {
        self.notices.recv().await
    }

    /// Let the suspended run continue. Has no effect when nothing is suspended.
    pub fn resume(&self) {
        self.resume.notify_waiters();
    }
}
