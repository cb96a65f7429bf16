use clap::Parser;
use hal::chat::Thread;
use hal::core::config::{self, CliOverrides};
use hal::editor::CommandEditor;
use hal::shell::{self, CrosstermTerminal, PromptError, StdTerminal};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hal", about = "Modal shell and text editor driven by natural language")]
struct Args {
    /// Editor for Ctrl-E (defaults to $EDITOR, then vim)
    #[arg(long)]
    editor: Option<String>,

    /// File to write logs to
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("hal: {e}, using defaults");
        config::HalConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            editor: args.editor.as_deref(),
            log_file: args.log_file.as_deref(),
            log_level: args.log_level.as_deref(),
        },
    );

    // The terminal is in raw mode while we run, so logs go to a file.
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("HAL starting up with editor: {}", resolved.editor);

    let mut thread = Thread::new(resolved.thread_name.clone(), resolved.system_prompt.clone());
    let mut editor = CommandEditor::new(resolved.editor.clone());
    let mut terminal = CrosstermTerminal;

    let Err(err) = shell::start_prompt(StdTerminal::new(), &mut terminal, &mut editor, &mut thread);

    match serde_json::to_string(&thread) {
        Ok(json) => log::debug!("Thread at exit: {}", json),
        Err(e) => log::warn!("Failed to serialize thread: {}", e),
    }

    match err {
        PromptError::Interrupted { .. } => {
            log::info!("Exiting after user interrupt");
            ExitCode::from(1)
        }
        other => {
            log::error!("Fatal: {}", other);
            eprintln!("hal: {other}");
            ExitCode::from(2)
        }
    }
}
