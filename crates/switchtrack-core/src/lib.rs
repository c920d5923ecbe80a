//! switchtrack-core - Shared functionality for the switchtrack tools
//!
//! Configuration, standard paths, and the formatting helpers used to render
//! session times.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, CueKind};
pub use paths::Paths;
