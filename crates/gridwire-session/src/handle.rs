//! Running a client as a task and driving it with commands.
//!
//! [`Client::spawn`] moves the client into its own Tokio task. The task
//! races two things with `tokio::select!`: the next host command, and
//! (while logged in) the next packet from the server. Only the *read*
//! is ever raced (it is cancel-safe) while packet handlers and command
//! execution always run to completion before the next event is picked.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{Client, ClientError, ClientState};

/// A request for the client task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect, then sign in with the configured mode and `name`.
    Connect {
        host: String,
        port: String,
        name: String,
    },
    /// Claim a cell.
    SetField { x: u32, y: u32 },
    /// Close the connection from our side.
    Close,
}

/// Handle to a running client task. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    sender: mpsc::Sender<Command>,
}

impl ClientHandle {
    /// Queues a command.
    pub async fn send(&self, command: Command) -> Result<(), ClientError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| ClientError::Unavailable)
    }

    /// Queues a connect + sign-in.
    pub async fn connect(
        &self,
        host: impl Into<String>,
        port: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(Command::Connect {
            host: host.into(),
            port: port.into(),
            name: name.into(),
        })
        .await
    }

    /// Queues a cell claim.
    pub async fn set_field(&self, x: u32, y: u32) -> Result<(), ClientError> {
        self.send(Command::SetField { x, y }).await
    }

    /// Queues a local close.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.send(Command::Close).await
    }
}

/// One turn of the task loop.
enum Step {
    Command(Option<Command>),
    Packet(Result<gridwire_protocol::Packet, ClientError>),
}

impl Client {
    /// Moves the client into a new Tokio task.
    ///
    /// The task ends, returning the client, once every [`ClientHandle`]
    /// has been dropped.
    pub fn spawn(self) -> (ClientHandle, JoinHandle<Client>) {
        let (sender, receiver) = mpsc::channel(self.config().command_queue.max(1));
        let task = tokio::spawn(self.run(receiver));
        (ClientHandle { sender }, task)
    }

    /// The task loop behind [`spawn`](Self::spawn).
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Client {
        tracing::debug!("client task started");

        loop {
            let step = if self.is_logged_in() {
                tokio::select! {
                    command = commands.recv() => Step::Command(command),
                    packet = self.recv_packet() => Step::Packet(packet),
                }
            } else {
                Step::Command(commands.recv().await)
            };

            match step {
                Step::Command(Some(command)) => self.execute(command).await,
                Step::Command(None) => break,
                Step::Packet(Ok(packet)) => {
                    self.dispatch(packet).await;
                }
                Step::Packet(Err(e)) => {
                    tracing::debug!(error = %e, "listen loop ended");
                }
            }
        }

        tracing::debug!(state = %self.state(), "client task finished");
        self
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Connect { host, port, name } => {
                if let Err(e) = self.connect(&host, &port).await {
                    tracing::debug!(error = %e, "connect command failed");
                    return;
                }
                let mode = self.config().mode;
                if let Err(e) = self.sign_in(mode, &name).await {
                    tracing::warn!(error = %e, "sign in failed");
                }
            }
            Command::SetField { x, y } => {
                if let Err(e) = self.set_field(x, y).await {
                    tracing::debug!(x, y, error = %e, "set field failed");
                }
            }
            Command::Close => {
                if self.state() != ClientState::Disconnected {
                    self.close().await;
                }
            }
        }
    }
}
