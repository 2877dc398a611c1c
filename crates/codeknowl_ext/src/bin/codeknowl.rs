//! codeknowl: terminal host for the CodeKnowl commands.
//! Reads config, runs one command against the backend, prints the output
//! channel to stdout and notifications to stderr.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use codeknowl_client::config::{self, FileConfigSource};
use codeknowl_client::read_backend_config;
use codeknowl_ext::terminal::TerminalWindow;
use codeknowl_ext::{telemetry, CommandOutcome, ASK_COMMAND_ID, HEALTH_COMMAND_ID};

#[derive(Debug, Parser)]
#[command(name = "codeknowl", version, about = "Ask questions about an indexed code repository")]
struct Cli {
    /// Config file (default: $CODEKNOWL_CONFIG, then ~/.codeknowl/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a question; read from stdin when none is given
    Ask {
        #[arg(trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Check that the backend is up
    Health,
    /// Inspect or edit the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the config path and effective settings
    Show,
    /// Persist codeknowl.backendBaseUrl
    SetBaseUrl { url: String },
}

fn main() {
    let cli = Cli::parse();
    telemetry::init(telemetry::default_directives(cli.verbose));

    let config_path = config::resolve_config_path(cli.config.as_deref()).unwrap_or_else(|| {
        eprintln!("Error: unable to determine config path (set --config or CODEKNOWL_CONFIG)");
        process::exit(1);
    });
    let source = FileConfigSource::new(config_path);

    let (command_id, preset) = match cli.command {
        Command::Config { action } => process::exit(run_config(&source, action)),
        Command::Health => (HEALTH_COMMAND_ID, None),
        Command::Ask { question } => {
            let preset = (!question.is_empty()).then(|| question.join(" "));
            (ASK_COMMAND_ID, preset)
        }
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    let outcome = rt.block_on(async {
        let window = Arc::new(TerminalWindow::new(preset));
        let ext = match codeknowl_ext::activate(window, Arc::new(source)) {
            Ok(ext) => ext,
            Err(e) => {
                eprintln!("Error: activation failed: {}", e);
                process::exit(1);
            }
        };
        let outcome = match ext.execute_command(command_id) {
            Ok(run) => run.await,
            Err(e) => CommandOutcome::Failed(e.to_string()),
        };
        ext.deactivate();
        outcome
    });

    if let CommandOutcome::Failed(_) = outcome {
        process::exit(1);
    }
}

fn run_config(source: &FileConfigSource, action: ConfigAction) -> i32 {
    match action {
        ConfigAction::Show => {
            let backend = read_backend_config(source);
            println!("config: {}", source.path().display());
            println!(
                "{}.{}: {}",
                config::NAMESPACE,
                config::BACKEND_BASE_URL_KEY,
                backend.base_url
            );
            match backend.request_timeout {
                Some(t) => println!(
                    "{}.{}: {}",
                    config::NAMESPACE,
                    config::REQUEST_TIMEOUT_KEY,
                    t.as_secs()
                ),
                None => println!("{}.{}: none", config::NAMESPACE, config::REQUEST_TIMEOUT_KEY),
            }
            0
        }
        ConfigAction::SetBaseUrl { url } => {
            let mut cfg = match source.load() {
                Ok(c) => c,
                Err(e) => {
                    eprintln!(
                        "Error: failed to load config from {}: {}",
                        source.path().display(),
                        e
                    );
                    return 1;
                }
            };
            cfg.codeknowl.backend_base_url = Some(url);
            if let Err(e) = config::save(source.path(), &cfg) {
                eprintln!(
                    "Error: failed to save config to {}: {}",
                    source.path().display(),
                    e
                );
                return 1;
            }
            println!("saved {}", source.path().display());
            0
        }
    }
}
