//! Latch script runner
//!
//! Runs each script file in order, stopping at the first failure. With no
//! files it opens an interactive prompt instead.

mod repl;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use latch_console::Console;
use latch_script::ScriptRuntime;
use settings::{Overrides, Settings};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "latch-runjs", version, about = "Run JavaScript files, or start a REPL")]
struct Cli {
    /// Script files to run, in order
    files: Vec<PathBuf>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Nesting limit when reading script values into host data
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Text printed before every console line
    #[arg(long, value_name = "TEXT")]
    prefix: Option<String>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_depth: self.max_depth,
            prefix: self.prefix.clone(),
            no_color: self.no_color,
        }
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Latch script runner v{}", latch_script::VERSION);

    let settings = Settings::resolve(cli.config.as_deref(), &cli.overrides())?;
    let runtime = ScriptRuntime::with_settings(&settings.script)?;
    tracing::info!(max_read_depth = runtime.max_read_depth(), "script runtime ready");

    let console = Console::stdio(settings.console);
    runtime.with(|ctx| console.inject(&ctx))?;

    if cli.files.is_empty() {
        return repl::run(&runtime, console.config().colorize);
    }

    for file in &cli.files {
        tracing::info!(file = %file.display(), "running script");
        if let Err(err) = runtime.execute_file(file) {
            if let Some(stack) = err.stack() {
                tracing::info!("script stack:\n{stack}");
            }
            return Err(err).with_context(|| format!("script {} failed", file.display()));
        }
    }

    Ok(())
}
