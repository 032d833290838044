//! Runtime for driving a session against a live transport
//!
//! The session itself is synchronous. The runtime gives it a single task of
//! its own, runs accepted requests through the transport, and exposes a
//! cloneable [`SessionHandle`] for the UI layer.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::session::SessionSnapshot;
use crate::transport::Attachment;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// Commands sent from the UI to the runtime
#[derive(Debug)]
pub enum Command {
    Submit {
        text: String,
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Attach {
        files: Vec<Attachment>,
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Detach {
        index: usize,
        reply: oneshot::Sender<SessionSnapshot>,
    },
    SetDraft {
        text: String,
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Session runtime has stopped")]
    Stopped,
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        snapshot_rx: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self {
            command_tx,
            snapshot_rx,
        }
    }

    /// Submit text (and any pending attachments).
    ///
    /// Returns the snapshot right after the submission was accepted or
    /// refused; `busy` tells which.
    pub async fn submit(&self, text: impl Into<String>) -> Result<SessionSnapshot, RuntimeError> {
        let text = text.into();
        self.request(|reply| Command::Submit { text, reply }).await
    }

    pub async fn attach(&self, files: Vec<Attachment>) -> Result<SessionSnapshot, RuntimeError> {
        self.request(|reply| Command::Attach { files, reply }).await
    }

    pub async fn detach(&self, index: usize) -> Result<SessionSnapshot, RuntimeError> {
        self.request(|reply| Command::Detach { index, reply }).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<SessionSnapshot, RuntimeError> {
        let text = text.into();
        self.request(|reply| Command::SetDraft { text, reply }).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until no request is in flight
    pub async fn settled(&self) -> Result<SessionSnapshot, RuntimeError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| !s.busy)
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        Ok(snapshot.clone())
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<SessionSnapshot>) -> Command,
    ) -> Result<SessionSnapshot, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)
    }
}
