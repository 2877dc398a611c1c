//! Command handlers: ask orchestration and backend health check.
//! Each invocation is independent: settings are read fresh, nothing is retried,
//! and every failure is reported once, here, to the user.

use std::sync::Arc;

use codeknowl_client::{
    read_backend_config, AskResponse, Citation, Client, ClientError, ConfigSource,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::host::{HostWindow, InputBoxOptions, OutputSink};

pub const ASK_COMMAND_ID: &str = "codeknowl.ask";
pub const HEALTH_COMMAND_ID: &str = "codeknowl.health";

/// Name of the output channel created at activation.
pub const OUTPUT_CHANNEL_NAME: &str = "CodeKnowl";

/// Prefix of every user-facing notification.
pub const NOTIFICATION_PREFIX: &str = "CodeKnowl";

/// How one command invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Prompt dismissed or left blank. Nothing was sent or written.
    Cancelled,
    Completed,
    /// Failed; carries the message shown to the user.
    Failed(String),
}

/// Errors outside a single invocation (activation, dispatch).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command '{0}' not found")]
    UnknownCommand(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Host services and owned resources handed to every invocation.
#[derive(Clone)]
pub struct CommandContext {
    pub window: Arc<dyn HostWindow>,
    pub config: Arc<dyn ConfigSource>,
    pub output: Arc<dyn OutputSink>,
    pub client: Client,
}

pub fn ask_input_options() -> InputBoxOptions {
    InputBoxOptions {
        title: "CodeKnowl: Ask".into(),
        prompt: "Ask a question about the currently indexed repository".into(),
        ignore_focus_out: true,
    }
}

/// Prompt → call → render. Never returns an error: failures are rendered and
/// reported as [`CommandOutcome::Failed`].
#[instrument(skip_all)]
pub async fn run_ask(ctx: &CommandContext) -> CommandOutcome {
    let Some(raw) = ctx.window.show_input_box(&ask_input_options()) else {
        return CommandOutcome::Cancelled;
    };
    let question = raw.trim();
    if question.is_empty() {
        return CommandOutcome::Cancelled;
    }

    let backend = read_backend_config(ctx.config.as_ref());
    info!(base_url = %backend.base_url, "asking backend");
    ctx.output.append_line(&format!("[ask] baseUrl={}", backend.base_url));
    ctx.output.append_line(&format!("[ask] question={}", question));
    ctx.output.show(true);

    match ctx.client.ask(&backend, question).await {
        Ok(resp) => {
            render_answer(ctx.output.as_ref(), &resp);
            CommandOutcome::Completed
        }
        Err(e) => report_failure(ctx, &e),
    }
}

/// `GET /health` against the configured backend.
#[instrument(skip_all)]
pub async fn run_health(ctx: &CommandContext) -> CommandOutcome {
    let backend = read_backend_config(ctx.config.as_ref());
    ctx.output.append_line(&format!("[health] baseUrl={}", backend.base_url));
    ctx.output.show(true);

    match ctx.client.health(&backend).await {
        Ok(health) => {
            ctx.output.append_line(&format!("[health] status={}", health.status));
            CommandOutcome::Completed
        }
        Err(e) => report_failure(ctx, &e),
    }
}

/// Blank line and answer, then the citation block when there is one.
pub fn render_answer(output: &dyn OutputSink, resp: &AskResponse) {
    output.append_line("");
    output.append_line(&resp.answer);

    let citations = resp.citations();
    if citations.is_empty() {
        return;
    }
    output.append_line("");
    output.append_line("Citations:");
    for c in citations {
        output.append_line(&format_citation(c));
    }
}

/// `- <file_path>` with `:<start>-<end>` only when both bounds are present.
pub fn format_citation(c: &Citation) -> String {
    format!("- {}{}", c.file_path, c.line_range().unwrap_or_default())
}

fn report_failure(ctx: &CommandContext, err: &ClientError) -> CommandOutcome {
    let message = err.to_string();
    warn!(error = %message, "backend call failed");
    ctx.window.show_error_message(&format!("{}: {}", NOTIFICATION_PREFIX, message));
    ctx.output.append_line("");
    ctx.output.append_line(&format!("[error] {}", message));
    CommandOutcome::Failed(message)
}
