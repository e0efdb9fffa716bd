//! Catalog and configuration files for replanet.
//!
//! Catalog tables (`materials`, `environments`, `facilities`, `recipes`) are
//! found by base name in a directory and may each be RON, JSON or TOML.
//! Configurations are read and written in the format their extension names.

pub mod loader;
pub mod schema;
pub mod template;

pub use loader::{DataLoadError, Format, detect_format, load_catalog};
pub use template::{default_output_path, load_configuration, save_configuration};
