//! Activation entry point and the command registry.
//!
//! [`activate`] creates the output channel and registers every command;
//! the returned [`Extension`] owns both and releases them when deactivated
//! or dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use codeknowl_client::{Client, ConfigSource};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tracing::debug;

use crate::commands::{
    self, CommandContext, CommandError, CommandOutcome, ASK_COMMAND_ID, HEALTH_COMMAND_ID,
    OUTPUT_CHANNEL_NAME,
};
use crate::host::HostWindow;

type CommandHandler =
    Box<dyn Fn(CommandContext) -> BoxFuture<'static, CommandOutcome> + Send + Sync>;

/// An activated extension.
pub struct Extension {
    context: CommandContext,
    commands: BTreeMap<&'static str, CommandHandler>,
}

/// Create the output channel and register the commands.
pub fn activate(
    window: Arc<dyn HostWindow>,
    config: Arc<dyn ConfigSource>,
) -> Result<Extension, CommandError> {
    let client = Client::new()?;
    let output = window.create_output_channel(OUTPUT_CHANNEL_NAME);

    let mut ext = Extension {
        context: CommandContext {
            window,
            config,
            output,
            client,
        },
        commands: BTreeMap::new(),
    };
    ext.register(ASK_COMMAND_ID, |ctx| {
        async move { commands::run_ask(&ctx).await }.boxed()
    });
    ext.register(HEALTH_COMMAND_ID, |ctx| {
        async move { commands::run_health(&ctx).await }.boxed()
    });
    debug!(commands = ?ext.command_ids(), "extension activated");
    Ok(ext)
}

impl Extension {
    fn register<F>(&mut self, id: &'static str, handler: F)
    where
        F: Fn(CommandContext) -> BoxFuture<'static, CommandOutcome> + Send + Sync + 'static,
    {
        self.commands.insert(id, Box::new(handler));
    }

    /// Registered command identifiers, sorted.
    pub fn command_ids(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Run the command registered under `id`.
    ///
    /// The returned future does not borrow the extension, so several
    /// invocations may run at once.
    pub fn execute_command(
        &self,
        id: &str,
    ) -> Result<BoxFuture<'static, CommandOutcome>, CommandError> {
        let handler = self
            .commands
            .get(id)
            .ok_or_else(|| CommandError::UnknownCommand(id.to_string()))?;
        debug!(command = id, "executing command");
        Ok(handler(self.context.clone()))
    }

    /// Nothing to do beyond the disposal that dropping performs.
    pub fn deactivate(self) {}
}

impl Drop for Extension {
    fn drop(&mut self) {
        self.commands.clear();
        self.context.output.dispose();
        debug!("extension disposed");
    }
}
