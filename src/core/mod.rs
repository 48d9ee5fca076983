//! Core orchestration pieces: settings, version negotiation, errors, logging.

pub mod error;
pub mod logging;
pub mod settings;
pub mod types;
pub mod version;
