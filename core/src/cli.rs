use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::parser::semantic_validator::{validate_program, ValidationError};
use crate::parser::{compile, compile_report};
use crate::preview::Preview;
use crate::runtime::{Intent, Runtime, SessionError};
use crate::types::{Turn, ENTRY_FLOW};

#[derive(Parser)]
#[command(name = "fluxo")]
#[command(about = "Fluxo - compile and run chatbot flows", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a flow file and report problems
    Check {
        /// Flow source file
        file: PathBuf,
    },

    /// Print the compiled program as JSON
    Compile {
        /// Flow source file
        file: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Chat with a flow file in the terminal, reloading it when it changes
    Chat {
        /// Flow source file
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    // Load config before anything else so errors show up first
    let config = Config::builder()
        .config_path(cli.config)
        .build()
        .context("Failed to load configuration")?;
    init_logging(&config.logging.level);

    match cli.command {
        Commands::Check { file } => {
            let errors = check_file(&file)?;
            for error in &errors {
                println!("{}", error);
            }

            let error_count = errors.iter().filter(|e| e.is_error()).count();
            let warning_count = errors.len() - error_count;
            println!(
                "{}: {} error(s), {} warning(s)",
                file.display(),
                error_count,
                warning_count
            );
            if error_count > 0 {
                anyhow::bail!("{} has {} error(s)", file.display(), error_count);
            }
        }

        Commands::Compile { file, pretty } => {
            let program = compile(&read_source(&file)?);
            let json = if pretty {
                serde_json::to_string_pretty(&program)?
            } else {
                serde_json::to_string(&program)?
            };
            println!("{}", json);
        }

        Commands::Chat { file } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            chat(&file, &config, stdin.lock(), stdout.lock())?;
        }

        Commands::Config => {
            let text = toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{}", text);
        }
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Already installed when the CLI runs more than once in a process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Compile and validate a flow file
pub fn check_file(path: &Path) -> Result<Vec<ValidationError>> {
    let source = read_source(path)?;
    Ok(validate_program(&compile_report(&source)))
}

/* ===================== Chat ===================== */

/// Interactive session over any line-based input and output.
///
/// The file is re-read before every input and hot-swapped into the session
/// when it changed.
///
/// A number presses the matching button of the latest message, `/restart`
/// starts over, `/quit` (or end of input) leaves, anything else is sent as text.
pub fn chat<R: BufRead, W: Write>(
    path: &Path,
    config: &Config,
    input: R,
    mut output: W,
) -> Result<()> {
    let mut preview = Preview::new(&read_source(path)?, config.runtime_options());

    writeln!(output, "== {} ==", config.display.business_name)?;
    if !preview.runtime().has_entry() {
        writeln!(output, "(no '{}' flow found, nothing to show)", ENTRY_FLOW)?;
    }
    render(&mut output, preview.runtime().transcript().turns())?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        match fs::read_to_string(path) {
            Ok(source) => {
                if preview.update_source(&source) {
                    writeln!(
                        output,
                        "(program reloaded, {} problem(s))",
                        preview.diagnostics().len()
                    )?;
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "could not re-read flow file"),
        }

        let intent = parse_intent(preview.runtime(), line);
        match preview.runtime_mut().dispatch(intent) {
            Ok(turns) => render(&mut output, turns)?,
            Err(SessionError::EmptyText) => continue,
        }
    }

    Ok(())
}

fn parse_intent(runtime: &Runtime, line: &str) -> Intent {
    if line == "/restart" {
        return Intent::Restart;
    }
    if !runtime.awaiting_free_text() {
        let buttons = runtime
            .transcript()
            .turns()
            .iter()
            .rev()
            .find_map(|t| t.buttons.as_ref());
        let choice = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
        if let (Some(buttons), Some(idx)) = (buttons, choice) {
            if let Some(button) = buttons.get(idx) {
                return Intent::Press(button.target_flow.clone());
            }
        }
    }
    Intent::Text(line.to_string())
}

/// Print bot turns with numbered buttons; user turns are already on screen
fn render<W: Write>(output: &mut W, turns: &[Turn]) -> io::Result<()> {
    for turn in turns.iter().filter(|t| t.is_bot()) {
        for line in turn.text.lines() {
            writeln!(output, "bot: {}", line)?;
        }
        for (idx, button) in turn.buttons().iter().enumerate() {
            writeln!(output, "  [{}] {}", idx + 1, button.label)?;
        }
    }
    output.flush()
}
