//! Controller worker thread
//!
//! The PulseAudio connection handle wraps a non-thread-safe mainloop and
//! cannot be shared with the async HTTP handlers directly. A dedicated worker
//! thread owns the controller; handlers talk to it through a cloneable
//! [`ControllerHandle`] that sends one typed command per operation and awaits
//! the reply. The command channel serializes every access to the shared
//! handle, including the read-then-write inside step operations.

use std::sync::mpsc;
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::controller::{VolumeController, VolumeReading};
use crate::error::{Error, Result};
use crate::sink::SinkBackend;

/// One command per controller operation, carrying its reply channel
enum Command {
    Get(oneshot::Sender<VolumeReading>),
    Set(i64, oneshot::Sender<bool>),
    StepUp(oneshot::Sender<bool>),
    StepDown(oneshot::Sender<bool>),
    ToggleMute(oneshot::Sender<bool>),
}

const UNAVAILABLE: &str = "Volume controller unavailable";

/// Cloneable handle to the controller worker thread
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    /// Spawn the worker thread. `make` builds the controller on the worker
    /// thread itself, since the production backend cannot be sent across
    /// threads.
    pub fn spawn<B, F>(make: F) -> Result<Self>
    where
        B: SinkBackend,
        F: FnOnce() -> VolumeController<B> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>();
        thread::Builder::new()
            .name("volume-controller".to_string())
            .spawn(move || run_worker(make(), rx))
            .map_err(|e| Error::Internal(format!("Failed to spawn controller worker: {}", e)))?;
        Ok(Self { tx })
    }

    /// Current reading; degrades to an error reading if the worker is gone.
    pub async fn current_volume(&self) -> VolumeReading {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(Command::Get(reply_tx)).is_err() {
            error!("{}", UNAVAILABLE);
            return VolumeReading::error(UNAVAILABLE);
        }
        reply_rx
            .await
            .unwrap_or_else(|_| VolumeReading::error(UNAVAILABLE))
    }

    /// Set absolute volume percent; false if the worker is gone.
    pub async fn set_volume(&self, target: i64) -> bool {
        self.send_command(|reply| Command::Set(target, reply)).await
    }

    /// Step the volume up; false if the worker is gone.
    pub async fn volume_up(&self) -> bool {
        self.send_command(Command::StepUp).await
    }

    /// Step the volume down; false if the worker is gone.
    pub async fn volume_down(&self) -> bool {
        self.send_command(Command::StepDown).await
    }

    /// Toggle mute; false if the worker is gone.
    pub async fn toggle_mute(&self) -> bool {
        self.send_command(Command::ToggleMute).await
    }

    async fn send_command(&self, command: impl FnOnce(oneshot::Sender<bool>) -> Command) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(command(reply_tx)).is_err() {
            error!("{}", UNAVAILABLE);
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }
}

fn run_worker<B: SinkBackend>(controller: VolumeController<B>, rx: mpsc::Receiver<Command>) {
    debug!("Volume controller worker started");
    while let Ok(command) = rx.recv() {
        // A dropped reply receiver only means the HTTP client went away
        match command {
            Command::Get(reply) => {
                let _ = reply.send(controller.current_volume());
            }
            Command::Set(target, reply) => {
                let _ = reply.send(controller.set_volume(target));
            }
            Command::StepUp(reply) => {
                let _ = reply.send(controller.volume_up());
            }
            Command::StepDown(reply) => {
                let _ = reply.send(controller.volume_down());
            }
            Command::ToggleMute(reply) => {
                let _ = reply.send(controller.toggle_mute());
            }
        }
    }
    debug!("Volume controller worker stopped, command channel closed");
}
