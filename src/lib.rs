//! # volumed
//!
//! HTTP volume control service for the local PulseAudio server.
//!
//! **Purpose:** expose the default output sink's volume and mute state over a
//! small REST API (get, step up, step down, toggle mute, set absolute) so the
//! system volume can be adjusted from a browser on the LAN.
//!
//! **Architecture:** an Axum HTTP layer forwards each request to a
//! [`VolumeController`] running on a dedicated worker thread. The controller
//! resolves the current default sink per operation through a
//! [`sink::SinkBackend`] and issues a single control command against it via
//! pulsectl. The worker thread owns the PulseAudio connection handle, which
//! cannot cross threads; see [`worker::ControllerHandle`].

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod pulse;
pub mod sink;
pub mod worker;

pub use controller::{VolumeController, VolumeReading};
pub use error::{Error, Result};
