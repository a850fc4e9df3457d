//! # strategos-settings
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`StrategosSettings::default()`]
//! 2. **User file**: `~/.strategos/settings.json` or an explicit path (deep-merged over defaults)
//! 3. **Environment variables**: `STRATEGOS_*` and a few legacy names (highest priority)
//!
//! API keys never live in the settings file. The file names the environment
//! variables to read them from, see [`secrets`].

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod secrets;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{overlay, load_settings, load_settings_from_path, settings_path};
pub use secrets::read_secret;
pub use types::*;
