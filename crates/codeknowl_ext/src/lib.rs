//! CodeKnowl command host: activation, the ask and health commands, and a
//! terminal implementation of the host capabilities.
//! Host services are injected, so the commands run without an editor.

pub mod commands;
pub mod extension;
pub mod host;
pub mod telemetry;
pub mod terminal;

pub use commands::{
    CommandContext, CommandError, CommandOutcome, ASK_COMMAND_ID, HEALTH_COMMAND_ID,
};
pub use extension::{activate, Extension};
pub use host::{HostWindow, InputBoxOptions, OutputSink};
