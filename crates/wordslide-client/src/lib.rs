//! wordslide-client: Experiment backend integration.
//!
//! Implements the `WordSource` trait over the backend's REST endpoints and
//! loads client configuration.

pub mod config;
pub mod http;

pub use config::{create_source, load_config_from, WordslideConfig};
pub use http::HttpWordSource;
