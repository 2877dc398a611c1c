//! Terminal host: prompts on stdin, notifications on stderr, output channel on stdout.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::host::{HostWindow, InputBoxOptions, OutputSink};

/// [`HostWindow`] backed by the process's standard streams.
pub struct TerminalWindow {
    /// Answer for the first prompt, e.g. a question given on the command line.
    preset: Mutex<Option<String>>,
}

impl TerminalWindow {
    pub fn new(preset: Option<String>) -> Self {
        Self {
            preset: Mutex::new(preset),
        }
    }

    fn take_preset(&self) -> Option<String> {
        self.preset.lock().ok().and_then(|mut p| p.take())
    }
}

impl HostWindow for TerminalWindow {
    fn show_input_box(&self, options: &InputBoxOptions) -> Option<String> {
        if let Some(answer) = self.take_preset() {
            return Some(answer);
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            let mut err = io::stderr().lock();
            let _ = write!(err, "{}\n{}: ", options.title, options.prompt);
            let _ = err.flush();
        }
        // EOF or an unreadable stdin counts as a dismissed prompt.
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn show_error_message(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn create_output_channel(&self, name: &str) -> Arc<dyn OutputSink> {
        Arc::new(ConsoleOutputChannel::new(name))
    }
}

/// Output channel printing each line to stdout.
pub struct ConsoleOutputChannel {
    name: String,
    disposed: AtomicBool,
}

impl ConsoleOutputChannel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            disposed: AtomicBool::new(false),
        }
    }
}

impl OutputSink for ConsoleOutputChannel {
    fn append_line(&self, line: &str) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
    }

    // stdout is always in view; just make sure nothing is held back.
    fn show(&self, _preserve_focus: bool) {
        let _ = io::stdout().flush();
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            let _ = io::stdout().flush();
            debug!(channel = %self.name, "output channel disposed");
        }
    }
}
