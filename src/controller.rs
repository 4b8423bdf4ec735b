//! Volume controller
//!
//! Translates percentage-based volume intents into calls against the audio
//! server's current default output sink, and normalizes results and errors
//! into a uniform reading. Every failure degrades to an error reading or
//! `false`; no operation panics or surfaces a fault to the caller.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::sink::{Sink, SinkBackend};

/// Default step for volume_up / volume_down, in percent
pub const DEFAULT_STEP: u8 = 5;

/// Reading outcome, serialized lowercase ("success" / "error")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Success,
    Error,
}

/// Snapshot of the default sink's state, constructed fresh on every read
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReading {
    /// Volume percent, clamped to 0-100
    pub volume: u8,
    pub is_muted: bool,
    pub status: ReadingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink_name: Option<String>,
}

impl VolumeReading {
    fn success(volume: u8, is_muted: bool, sink_name: String) -> Self {
        Self {
            volume,
            is_muted,
            status: ReadingStatus::Success,
            error: None,
            sink_name: Some(sink_name),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            volume: 0,
            is_muted: false,
            status: ReadingStatus::Error,
            error: Some(message.into()),
            sink_name: None,
        }
    }

    /// True when the reading reflects an actual sink state
    pub fn is_success(&self) -> bool {
        self.status == ReadingStatus::Success
    }
}

/// Volume controller over a [`SinkBackend`].
///
/// Holds no sink state of its own: the default sink is resolved fresh on
/// every operation because it may change externally at any time. All access
/// to the backend handle is serialized through one mutex.
pub struct VolumeController<B> {
    backend: Mutex<B>,
    step: u8,
}

impl<B: SinkBackend> VolumeController<B> {
    /// Create a controller with the given step (percent) for up/down
    pub fn new(backend: B, step: u8) -> Self {
        Self {
            backend: Mutex::new(backend),
            step: step.min(100),
        }
    }

    fn lock_backend(&self) -> MutexGuard<'_, B> {
        // A poisoned lock means a previous caller panicked mid-operation; the
        // backend revalidates its connection on entry, so keep serving.
        self.backend.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read the default sink's current volume and mute state.
    pub fn current_volume(&self) -> VolumeReading {
        let mut backend = self.lock_backend();
        match resolve_default_sink(&mut *backend) {
            Ok(Some(sink)) => VolumeReading::success(
                (sink.volume * 100.0).round() as u8,
                sink.muted,
                sink.name,
            ),
            Ok(None) => VolumeReading::error("No audio sink found"),
            Err(e) => {
                warn!("Failed to read volume: {}", e);
                VolumeReading::error(format!("Failed to get volume: {}", e))
            }
        }
    }

    /// Set the default sink's volume to `target` percent, clamped to 0-100.
    pub fn set_volume(&self, target: i64) -> bool {
        let target = target.clamp(0, 100) as u8;
        let mut backend = self.lock_backend();
        let sink = match resolve_default_sink(&mut *backend) {
            Ok(Some(sink)) => sink,
            Ok(None) => {
                warn!("Cannot set volume: no audio sink found");
                return false;
            }
            Err(e) => {
                warn!("Cannot set volume: {}", e);
                return false;
            }
        };
        match backend.set_sink_volume(&sink.name, f64::from(target) / 100.0) {
            Ok(()) => {
                debug!("Volume set to {}% on sink {}", target, sink.name);
                true
            }
            Err(e) => {
                warn!("Failed to set volume on sink {}: {}", sink.name, e);
                false
            }
        }
    }

    /// Raise the volume by one step, saturating at 100.
    pub fn volume_up(&self) -> bool {
        self.step_volume(|current, step| (current + i64::from(step)).min(100))
    }

    /// Lower the volume by one step, saturating at 0.
    pub fn volume_down(&self) -> bool {
        self.step_volume(|current, step| (current - i64::from(step)).max(0))
    }

    /// Read-then-write. The read and the write each take the backend lock
    /// independently; callers that need the pair to be uninterruptible
    /// serialize at a higher level, as the controller worker does.
    fn step_volume(&self, apply: impl Fn(i64, u8) -> i64) -> bool {
        let reading = self.current_volume();
        if !reading.is_success() {
            return false;
        }
        self.set_volume(apply(i64::from(reading.volume), self.step))
    }

    /// Flip the default sink's mute flag.
    pub fn toggle_mute(&self) -> bool {
        let mut backend = self.lock_backend();
        let sink = match resolve_default_sink(&mut *backend) {
            Ok(Some(sink)) => sink,
            Ok(None) => {
                warn!("Cannot toggle mute: no audio sink found");
                return false;
            }
            Err(e) => {
                warn!("Cannot toggle mute: {}", e);
                return false;
            }
        };
        match backend.set_sink_mute(&sink.name, !sink.muted) {
            Ok(()) => {
                debug!("Sink {} mute set to {}", sink.name, !sink.muted);
                true
            }
            Err(e) => {
                warn!("Failed to toggle mute on sink {}: {}", sink.name, e);
                false
            }
        }
    }
}

/// Resolve the sink control commands should target.
///
/// Prefers the server's configured default sink. The configured name can
/// reference a sink that has since disappeared (unplugged device), in which
/// case the first listed sink is used instead of hard-failing on the stale
/// name. `None` only when the server reports no sinks at all.
fn resolve_default_sink<B: SinkBackend>(backend: &mut B) -> Result<Option<Sink>> {
    let default_name = backend.default_sink_name()?;
    let mut sinks = backend.list_sinks()?;
    if sinks.is_empty() {
        return Ok(None);
    }
    if let Some(name) = default_name {
        if let Some(pos) = sinks.iter().position(|s| s.name == name) {
            return Ok(Some(sinks.swap_remove(pos)));
        }
        debug!(
            "Default sink {} not in sink list, falling back to first sink",
            name
        );
    }
    Ok(Some(sinks.swap_remove(0)))
}
