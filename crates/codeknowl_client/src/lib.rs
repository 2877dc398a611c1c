//! CodeKnowl backend client library (config, HTTP wire types, ask/health calls).
//! Used by the `codeknowl_ext` command host and its terminal binary.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{ask_backend, Client, ClientError};
pub use config::{
    get_backend_base_url, read_backend_config, BackendConfig, CodeKnowlSection, Config,
    ConfigError, ConfigSource, FileConfigSource,
};
pub use messages::{AskRequest, AskResponse, Citation, HealthStatus};
