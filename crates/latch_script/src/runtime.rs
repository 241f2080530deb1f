//! Script runtime management
//!
//! Owns a QuickJS runtime and one full context. Every evaluation goes through
//! the same context, so callers get a single script world per runtime.

use crate::error::{EngineError, ScriptError};
use crate::read::{Decode, Reader};
use crate::settings::ScriptSettings;
use rquickjs::convert::Coerced;
use rquickjs::{Context, Ctx, Function, Runtime, Value};
use std::io;
use std::path::Path;

/// Script execution context
pub struct ScriptRuntime {
    #[allow(dead_code)] // Kept alive for context lifetime
    runtime: Runtime,
    context: Context,
    max_read_depth: usize,
    max_sequence_length: Option<usize>,
}

impl ScriptRuntime {
    pub fn new() -> Result<Self, ScriptError> {
        Self::with_settings(&ScriptSettings::default())
    }

    pub fn with_settings(settings: &ScriptSettings) -> Result<Self, ScriptError> {
        let runtime = Runtime::new().map_err(EngineError::from)?;
        if let Some(limit) = settings.memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(limit) = settings.max_stack_size {
            runtime.set_max_stack_size(limit);
        }
        let context = Context::full(&runtime).map_err(EngineError::from)?;

        tracing::debug!(
            max_read_depth = settings.max_read_depth,
            memory_limit = ?settings.memory_limit,
            max_sequence_length = ?settings.max_sequence_length,
            "script runtime created"
        );

        Ok(Self {
            runtime,
            context,
            max_read_depth: settings.max_read_depth,
            max_sequence_length: settings.max_sequence_length,
        })
    }

    /// Depth budget used by [`eval_into`](Self::eval_into).
    pub fn max_read_depth(&self) -> usize {
        self.max_read_depth
    }

    /// Run `f` with the context locked, for collaborators that install globals.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: for<'js> FnOnce(Ctx<'js>) -> R,
    {
        self.context.with(f)
    }

    /// Evaluate a script file under its file name, which is what stack
    /// traces and console locations report.
    pub fn execute_file(&self, path: &Path) -> Result<(), ScriptError> {
        let io_error = |source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        };
        if path.file_name().is_none() {
            return Err(io_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path does not name a file",
            )));
        }

        tracing::debug!(path = %path.display(), "executing script file");
        self.context.with(|ctx| {
            ctx.eval_file::<(), _>(path).map_err(|err| match err {
                rquickjs::Error::Io(source) => io_error(source),
                err => EngineError::from_js(&ctx, err).into(),
            })
        })
    }

    pub fn execute(&self, source: &str) -> Result<(), ScriptError> {
        self.context.with(|ctx| {
            ctx.eval::<(), _>(source)
                .map_err(|err| EngineError::from_js(&ctx, err))?;
            Ok(())
        })
    }

    /// Evaluate `source` and render the completion value with `ToString`.
    pub fn eval_to_string(&self, source: &str) -> Result<String, ScriptError> {
        self.context.with(|ctx| {
            let rendered = ctx
                .eval::<Coerced<String>, _>(source)
                .map_err(|err| EngineError::from_js(&ctx, err))?;
            Ok(rendered.0)
        })
    }

    /// Evaluate `source` and read its completion value into `dst`.
    pub fn eval_into<T: Decode>(&self, source: &str, dst: &mut T) -> Result<(), ScriptError> {
        self.context.with(|ctx| {
            let value: Value = ctx
                .eval(source)
                .map_err(|err| EngineError::from_js(&ctx, err))?;
            Reader::new(ctx.clone(), self.max_read_depth)
                .with_max_length(self.max_sequence_length)
                .read_root(dst, &value)?;
            Ok(())
        })
    }

    /// Call a JavaScript function by name with no arguments.
    pub fn call_function(&self, name: &str) -> Result<(), ScriptError> {
        self.context.with(|ctx| {
            let globals = ctx.globals();
            let func: Function = globals
                .get(name)
                .map_err(|err| EngineError::from_js(&ctx, err))?;
            func.call::<_, ()>(())
                .map_err(|err| EngineError::from_js(&ctx, err))?;
            Ok(())
        })
    }
}
