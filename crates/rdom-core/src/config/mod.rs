//! Configuration for model construction and syntax emission
//!
//! ## Configuration Files
//!
//! TOML, JSON and YAML are accepted; the format follows the extension.
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, the loader searches for one of
//! [`CONFIG_FILE_NAMES`] starting from the current directory and moving up
//! the directory tree. With nothing found, defaults apply.
//!
//! ## Example Configuration
//!
//! ```toml
//! [emit]
//! indentStyle = "spaces"
//! indentSize = 4
//! newline = "lf"
//! emitComments = true
//! emitBlankLines = true
//!
//! [model]
//! strict = false
//! ```

pub mod loader;
pub mod rdom_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use rdom_config::{
    EmitConfiguration, IndentStyle, ModelConfiguration, NewlineStyle, RdomConfig,
};
