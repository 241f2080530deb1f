//! Error types shared by the script runtime and the value reader

use crate::read::ReadError;
use rquickjs::convert::Coerced;
use rquickjs::Ctx;
use std::path::PathBuf;
use thiserror::Error;

/// A failure reported by the QuickJS engine itself.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A script threw. `message` is the thrown value's string form.
    #[error("{message}")]
    Exception {
        message: String,
        stack: Option<String>,
    },

    #[error(transparent)]
    Js(#[from] rquickjs::Error),
}

impl EngineError {
    /// Convert an `rquickjs` error, pulling the pending exception out of the
    /// context when the engine reports one.
    pub fn from_js(ctx: &Ctx<'_>, err: rquickjs::Error) -> Self {
        if !matches!(err, rquickjs::Error::Exception) {
            return Self::Js(err);
        }

        let thrown = ctx.catch();
        let message = thrown
            .get::<Coerced<String>>()
            .map(|text| text.0)
            .unwrap_or_else(|_| "uncaught exception".to_string());
        let stack = thrown
            .as_object()
            .and_then(|obj| obj.get::<_, Option<String>>("stack").ok().flatten());

        Self::Exception { message, stack }
    }

    /// JavaScript stack trace, when the thrown value carried one.
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Exception { stack, .. } => stack.as_deref(),
            Self::Js(_) => None,
        }
    }
}

/// Errors surfaced by [`ScriptRuntime`](crate::runtime::ScriptRuntime).
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("failed to read script '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    /// JavaScript stack trace of a thrown exception.
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Engine(err) => err.stack(),
            Self::Read(_) | Self::Io { .. } => None,
        }
    }
}
