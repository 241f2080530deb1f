//! Interactive prompt

use anyhow::Result;
use latch_script::ScriptRuntime;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "> ";

/// Read, evaluate and print until end of input.
pub fn run(runtime: &ScriptRuntime, colorize: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    tracing::debug!("entering REPL");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if let Some(output) = respond(runtime, &line, colorize) {
                    editor.add_history_entry(line.as_str())?;
                    println!("{output}");
                }
            }
            // Ctrl-C abandons the current line only.
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Text printed for one input line; blank lines print nothing.
fn respond(runtime: &ScriptRuntime, line: &str, colorize: bool) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let err = match runtime.eval_to_string(line) {
        Ok(result) => return Some(result),
        Err(err) => err,
    };
    if let Some(stack) = err.stack() {
        tracing::info!("script stack:\n{stack}");
    }

    Some(if colorize {
        err.to_string().red().to_string()
    } else {
        err.to_string()
    })
}
