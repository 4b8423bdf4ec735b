//! PulseAudio backend
//!
//! Production [`SinkBackend`] implementation over pulsectl. The connection
//! handle wraps a non-thread-safe PulseAudio mainloop, so a backend instance
//! lives on the controller worker thread and never crosses threads.

use libpulse_binding::volume::Volume;
use pulsectl::controllers::types::DeviceInfo;
use pulsectl::controllers::{DeviceControl, SinkController};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sink::{Sink, SinkBackend};

/// PulseAudio 100% volume in raw units (PA_VOLUME_NORM)
const VOLUME_NORM: u32 = 0x10000;

/// Connection to the local PulseAudio server.
///
/// `conn` is the connection state machine: `None` is Disconnected, `Some` is
/// Connected. Each operation entry makes a single connect attempt when
/// Disconnected, and any failed server interaction drops the handle back to
/// Disconnected so the next operation revalidates the connection.
pub struct PulseBackend {
    conn: Option<SinkController>,
}

impl PulseBackend {
    /// Create a backend in the Disconnected state. The first operation
    /// connects lazily.
    pub fn new() -> Self {
        Self { conn: None }
    }

    fn ensure_connected(&mut self) -> Result<&mut SinkController> {
        if self.conn.is_none() {
            debug!("Connecting to PulseAudio server");
            let conn = SinkController::create()
                .map_err(|e| Error::Connection(format!("{:?}", e)))?;
            self.conn = Some(conn);
        }
        self.conn
            .as_mut()
            .ok_or_else(|| Error::Connection("not connected".to_string()))
    }

    /// Drop the handle so the next operation reconnects.
    fn disconnect(&mut self, context: &str) {
        warn!("Dropping PulseAudio connection after failed {}", context);
        self.conn = None;
    }
}

impl Default for PulseBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a device's per-channel volume to a single scalar in 0.0-1.0.
///
/// Volume is applied uniformly across channels, so the first channel is
/// representative. Boosted sinks (raw above PA_VOLUME_NORM) clamp to 1.0.
fn volume_fraction(device: &DeviceInfo) -> f64 {
    match device.volume.get().first() {
        Some(v) => (f64::from(v.0) / f64::from(VOLUME_NORM)).clamp(0.0, 1.0),
        None => 0.0,
    }
}

impl SinkBackend for PulseBackend {
    fn default_sink_name(&mut self) -> Result<Option<String>> {
        let conn = self.ensure_connected()?;
        match conn.get_server_info() {
            Ok(info) => Ok(info.default_sink_name),
            Err(e) => {
                self.disconnect("get_server_info");
                Err(Error::Command(format!("{:?}", e)))
            }
        }
    }

    fn list_sinks(&mut self) -> Result<Vec<Sink>> {
        let conn = self.ensure_connected()?;
        let devices = match conn.list_devices() {
            Ok(devices) => devices,
            Err(e) => {
                self.disconnect("list_devices");
                return Err(Error::Command(format!("{:?}", e)));
            }
        };
        Ok(devices
            .iter()
            .map(|device| Sink {
                name: device.name.clone().unwrap_or_default(),
                description: device.description.clone().unwrap_or_default(),
                volume: volume_fraction(device),
                muted: device.mute,
            })
            .collect())
    }

    fn set_sink_volume(&mut self, name: &str, volume: f64) -> Result<()> {
        let target_raw = (volume.clamp(0.0, 1.0) * f64::from(VOLUME_NORM)).round() as u32;
        let conn = self.ensure_connected()?;
        let mut device = match conn.get_device_by_name(name) {
            Ok(device) => device,
            Err(e) => {
                self.disconnect("get_device_by_name");
                return Err(Error::Command(format!("{:?}", e)));
            }
        };

        // pulsectl exposes no absolute setter, so shift the device's current
        // ChannelVolumes by the delta to the target. The shift applies to all
        // channels uniformly.
        let current_raw = device
            .volume
            .get()
            .first()
            .map(|v| v.0)
            .unwrap_or(VOLUME_NORM);
        let adjusted = if target_raw >= current_raw {
            device.volume.increase(Volume(target_raw - current_raw))
        } else {
            device.volume.decrease(Volume(current_raw - target_raw))
        };
        let Some(volumes) = adjusted else {
            return Err(Error::Command(format!(
                "Volume arithmetic failed for sink {}",
                name
            )));
        };
        conn.set_device_volume_by_name(name, volumes);
        debug!("Set sink {} volume to {:.0}%", name, volume * 100.0);
        Ok(())
    }

    fn set_sink_mute(&mut self, name: &str, mute: bool) -> Result<()> {
        let conn = self.ensure_connected()?;
        conn.set_device_mute_by_name(name, mute);
        debug!("Set sink {} mute to {}", name, mute);
        Ok(())
    }
}
