//! Sink types and the audio-server control boundary

use crate::error::Result;

/// A single audio output sink as reported by the audio server.
///
/// Snapshot only. The default sink or its state may change externally at any
/// time, so callers fetch a fresh value per operation and never cache one
/// across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Sink {
    /// Server-side identifier, e.g. `alsa_output.pci-0000_00_1f.3.analog-stereo`
    pub name: String,
    /// Human-readable description, e.g. `Built-in Audio Analog Stereo`
    pub description: String,
    /// Volume flattened across channels to a single scalar, 0.0-1.0
    pub volume: f64,
    /// Mute flag
    pub muted: bool,
}

/// Control boundary to the system audio server.
///
/// The four operations the server must provide: default sink name, sink
/// listing, absolute volume set (all channels), and mute set. Implemented by
/// [`PulseBackend`](crate::pulse::PulseBackend) in production and by
/// in-memory fakes in tests.
pub trait SinkBackend {
    /// Name of the globally configured default sink, if the server has one.
    fn default_sink_name(&mut self) -> Result<Option<String>>;

    /// All output sinks currently known to the server.
    fn list_sinks(&mut self) -> Result<Vec<Sink>>;

    /// Set the volume of the named sink on all channels. `volume` is a
    /// fraction in 0.0-1.0.
    fn set_sink_volume(&mut self, name: &str, volume: f64) -> Result<()>;

    /// Set the mute flag of the named sink.
    fn set_sink_mute(&mut self, name: &str, mute: bool) -> Result<()>;
}
