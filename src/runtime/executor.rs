//! Session runtime executor

use super::{Command, SessionHandle};
use crate::session::{Request, Session, SessionSnapshot};
use crate::transport::{Answer, RequestError, Transport};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

type Outcome = Result<Answer, RequestError>;

/// Drives one session: applies commands, runs its transport calls and
/// publishes snapshots. All session mutation happens on this task.
pub struct SessionRuntime<T>
where
    T: Transport + 'static,
{
    session: Session,
    transport: Arc<T>,
    command_rx: mpsc::Receiver<Command>,
    outcome_tx: mpsc::Sender<Outcome>,
    outcome_rx: mpsc::Receiver<Outcome>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl<T> SessionRuntime<T>
where
    T: Transport + 'static,
{
    /// Start the runtime on the current tokio runtime and return its handle
    pub fn spawn(session: Session, transport: T) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (outcome_tx, outcome_rx) = mpsc::channel(1);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let runtime = Self {
            session,
            transport: Arc::new(transport),
            command_rx,
            outcome_tx,
            outcome_rx,
            snapshot_tx,
        };
        tokio::spawn(runtime.run());

        SessionHandle::new(command_tx, snapshot_rx)
    }

    async fn run(mut self) {
        let session_id = self.session.id();
        tracing::info!(session = %session_id, "Starting session runtime");

        let mut commands_open = true;
        loop {
            tokio::select! {
                command = self.command_rx.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_open = false,
                },
                Some(outcome) = self.outcome_rx.recv() => {
                    self.session.resolve(outcome);
                    self.publish();
                }
            }

            // Once every handle is gone, finish the outstanding call and stop
            if !commands_open && !self.session.is_busy() {
                break;
            }
        }

        tracing::info!(session = %session_id, "Session runtime stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let reply = match command {
            Command::Submit { text, reply } => {
                if let Some(request) = self.session.submit(&text) {
                    self.dispatch(request);
                }
                reply
            }
            Command::Attach { files, reply } => {
                self.session.attach(files);
                reply
            }
            Command::Detach { index, reply } => {
                self.session.detach(index);
                reply
            }
            Command::SetDraft { text, reply } => {
                self.session.set_draft(text);
                reply
            }
        };

        let snapshot = self.publish();
        // The caller may have stopped waiting; the snapshot is on the watch channel anyway
        let _ = reply.send(snapshot);
    }

    /// Run the transport call off this task and feed the outcome back
    fn dispatch(&self, request: Request) {
        let transport = self.transport.clone();
        let token = self.session.token().to_string();
        let outcome_tx = self.outcome_tx.clone();
        let session_id = self.session.id();

        tracing::info!(session = %session_id, route = request.route_name(), "Dispatching request");

        tokio::spawn(async move {
            let outcome = match request {
                Request::Query { text } => transport.send_query(&token, &text).await,
                Request::Attachments { files, text } => {
                    transport
                        .send_attachments(&token, &files, text.as_deref())
                        .await
                }
            };

            if outcome_tx.send(outcome).await.is_err() {
                tracing::warn!(session = %session_id, "Runtime gone before outcome was delivered");
            }
        });
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
