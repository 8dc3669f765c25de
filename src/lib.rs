//! statuswatch - Live status board for a service status API
//!
//! This library polls a JSON status endpoint, classifies each service's
//! status code, and renders the result onto a [`render::Surface`] with a
//! stepped history chart per service.

pub mod board;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod poller;
pub mod render;
pub mod status;
