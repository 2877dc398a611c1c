//! Capabilities the editor (or any other host) supplies to the commands.
//!
//! Settings come through [`codeknowl_client::ConfigSource`]; prompting,
//! notifications and output channels come through [`HostWindow`].

use std::sync::Arc;

/// Options for a free-text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBoxOptions {
    pub title: String,
    pub prompt: String,
    /// Keep the prompt open when focus moves elsewhere.
    pub ignore_focus_out: bool,
}

/// Append-only text channel shown to the user.
///
/// Shared between concurrent command invocations; lines from different
/// invocations may interleave.
pub trait OutputSink: Send + Sync {
    fn append_line(&self, line: &str);

    /// Bring the channel to the foreground.
    fn show(&self, preserve_focus: bool);

    /// Release the channel. Lines appended afterwards are dropped.
    fn dispose(&self);
}

/// Prompting, notifications and output channel creation.
pub trait HostWindow: Send + Sync {
    /// Blocking prompt. `None` when the user dismissed it.
    fn show_input_box(&self, options: &InputBoxOptions) -> Option<String>;

    /// Transient error notification.
    fn show_error_message(&self, message: &str);

    fn create_output_channel(&self, name: &str) -> Arc<dyn OutputSink>;
}
