//! Latch Console
//!
//! Installs a `console` global into a script context, backed by host writers:
//!
//! - `console.log`, `console.info`: one line on the standard writer
//! - `console.warn`, `console.error`: one line on the error writer, tagged
//!   with the caller's `[file:line]`
//!
//! Every line starts with the configured prefix. With colours enabled, warn
//! lines are yellow and error lines red. Injecting again replaces the
//! previous console, e.g. to change the prefix.

mod sink;

pub use sink::Level;

use latch_script::EngineError;
use rquickjs::{Ctx, Function, Object};
use serde::{Deserialize, Serialize};
use sink::Sink;
use std::io::Write;
use std::rc::Rc;
use thiserror::Error;

/// Builds the console object around the native `write(level, location, message)`.
const CONSOLE_FACTORY: &str = r#"
(function (write) {
    const format = (args) => args.map((arg) => String(arg)).join(" ");
    const caller = () => {
        const frames = String(new Error().stack).split("\n");
        const frame = /\((.*?):(\d+)(?::\d+)?\)/.exec(frames[2] || "");
        if (!frame) {
            return "<unknown>";
        }
        // Sources evaluated from strings are named "eval_script" by rquickjs.
        const file = frame[1] === "eval_script" ? "<input>" : frame[1];
        return file + ":" + frame[2];
    };
    return {
        log: (...args) => write(0, "", format(args)),
        info: (...args) => write(1, "", format(args)),
        warn: (...args) => write(2, caller(), format(args)),
        error: (...args) => write(3, caller(), format(args)),
    };
})
"#;

/// Console appearance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Text written at the start of every line.
    pub prefix: String,
    /// Colour warn and error lines with ANSI escapes.
    pub colorize: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            colorize: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("failed to install console: {0}")]
    Install(#[from] EngineError),
}

/// A console bound to a pair of writers, ready to be injected.
pub struct Console {
    sink: Rc<Sink>,
}

impl Console {
    pub fn new(
        config: ConsoleConfig,
        stdout: impl Write + 'static,
        stderr: impl Write + 'static,
    ) -> Self {
        Self {
            sink: Rc::new(Sink::new(config, Box::new(stdout), Box::new(stderr))),
        }
    }

    /// Console writing to the process' stdout and stderr.
    pub fn stdio(config: ConsoleConfig) -> Self {
        Self::new(config, std::io::stdout(), std::io::stderr())
    }

    pub fn config(&self) -> &ConsoleConfig {
        self.sink.config()
    }

    /// Install this console as the context's global `console`.
    pub fn inject(&self, ctx: &Ctx<'_>) -> Result<(), ConsoleError> {
        let engine = |err| EngineError::from_js(ctx, err);

        let sink = Rc::clone(&self.sink);
        let write = Function::new(
            ctx.clone(),
            move |level: u32, location: String, message: String| {
                sink.write(Level::from_code(level), &location, &message);
            },
        )
        .map_err(engine)?;

        let factory: Function = ctx.eval(CONSOLE_FACTORY).map_err(engine)?;
        let console: Object = factory.call((write,)).map_err(engine)?;
        ctx.globals().set("console", console).map_err(engine)?;

        tracing::debug!(prefix = %self.sink.config().prefix, "console injected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_script::ScriptRuntime;
    use std::cell::RefCell;
    use std::io;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn plain(prefix: &str) -> ConsoleConfig {
        ConsoleConfig {
            prefix: prefix.to_string(),
            colorize: false,
        }
    }

    fn install(
        runtime: &ScriptRuntime,
        config: ConsoleConfig,
    ) -> (SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let console = Console::new(config, out.clone(), err.clone());
        runtime.with(|ctx| console.inject(&ctx)).unwrap();
        (out, err)
    }

    #[test]
    fn log_and_info_go_to_stdout() {
        let runtime = ScriptRuntime::new().unwrap();
        let (out, err) = install(&runtime, plain("> "));

        runtime
            .execute("console.log('hi there'); console.info('info 4 u');")
            .unwrap();

        assert_eq!(out.contents(), "> hi there\n> info 4 u\n");
        assert_eq!(err.contents(), "");
    }

    #[test]
    fn warn_and_error_go_to_stderr_with_location() {
        let runtime = ScriptRuntime::new().unwrap();
        let (out, err) = install(&runtime, plain("> "));

        runtime
            .execute("console.warn(\"Where's mah bucket?\");\nconsole.error(\"Oh noes!\");")
            .unwrap();

        assert_eq!(
            err.contents(),
            "> [<input>:1] Where's mah bucket?\n> [<input>:2] Oh noes!\n"
        );
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn script_files_report_their_own_name() {
        let dir = std::env::temp_dir().join(format!("latch_console_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("filename.js");
        std::fs::write(
            &path,
            "// Say hello\nconsole.log(\"hi there\");\n\nconsole.warn(\"Where's mah bucket?\");\n",
        )
        .unwrap();

        let runtime = ScriptRuntime::new().unwrap();
        let (out, err) = install(&runtime, plain("> "));
        runtime.execute_file(&path).unwrap();

        assert_eq!(out.contents(), "> hi there\n");
        assert_eq!(err.contents(), "> [filename.js:4] Where's mah bucket?\n");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn nested_callers_are_located() {
        let runtime = ScriptRuntime::new().unwrap();
        let (_, err) = install(&runtime, plain(""));

        runtime
            .execute("function complain() {\n  console.error('deep');\n}\ncomplain();")
            .unwrap();

        assert_eq!(err.contents(), "[<input>:2] deep\n");
    }

    #[test]
    fn arguments_are_joined_with_spaces() {
        let runtime = ScriptRuntime::new().unwrap();
        let (out, _) = install(&runtime, plain(""));

        runtime
            .execute("console.log('a', 1, true, null, undefined, [1, 2], new Error('x'));")
            .unwrap();

        assert_eq!(out.contents(), "a 1 true null undefined 1,2 Error: x\n");
    }

    #[test]
    fn reinjecting_replaces_the_console() {
        let runtime = ScriptRuntime::new().unwrap();
        let (first, _) = install(&runtime, plain("> "));
        runtime.execute("console.log('before');").unwrap();

        let (second, _) = install(&runtime, plain(":-> "));
        runtime.execute("console.log(\"I'm so happy\");").unwrap();

        assert_eq!(first.contents(), "> before\n");
        assert_eq!(second.contents(), ":-> I'm so happy\n");
    }

    #[test]
    fn colours_mark_warnings_and_errors() {
        let runtime = ScriptRuntime::new().unwrap();
        let config = ConsoleConfig {
            prefix: String::new(),
            colorize: true,
        };
        let (out, err) = install(&runtime, config);

        runtime
            .execute("console.log('calm'); console.warn('careful'); console.error('broken');")
            .unwrap();

        assert_eq!(out.contents(), "calm\n");
        let output = err.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("\u{1b}[33m"), "{:?}", lines[0]);
        assert!(lines[0].contains("careful"));
        assert!(lines[1].contains("\u{1b}[31m"), "{:?}", lines[1]);
        assert!(lines[1].contains("broken"));
    }

    #[test]
    fn config_defaults_to_colour_without_prefix() {
        let config: ConsoleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert!(config.colorize);
        assert!(config.prefix.is_empty());

        let console = Console::new(plain("js> "), io::sink(), io::sink());
        assert_eq!(console.config(), &plain("js> "));
    }
}
