//! Boot, engine polling, and resize handling for the dashboard, on virtual time.
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod event;

pub use config::{DashConfig, TimingConfig, load_config_from_path};
pub use controller::{Controller, ControllerState, ControllerStats};
pub use event::{Event, EventEnvelope, EventQueue};
