//! Latch Scripting System
//!
//! JavaScript execution via QuickJS, plus the bridge that reads script values
//! back into typed Rust data.
//!
//! ## Architecture
//!
//! - **Runtime:** [`ScriptRuntime`] owns one QuickJS runtime and context
//! - **Reading:** [`read_into`] converts any script value into a Rust
//!   destination that implements [`Decode`], guided by its declared shape
//! - **Structs:** [`define_aggregate!`] registers a struct's field table
//!
//! ```ignore
//! #[derive(Default)]
//! struct Spawn { kind: String, count: u32 }
//! latch_script::define_aggregate!(Spawn { kind, count });
//!
//! let runtime = ScriptRuntime::new()?;
//! let mut spawn = Spawn::default();
//! runtime.eval_into("({ kind: 'crate', count: 3 })", &mut spawn)?;
//! ```

pub mod error;
pub mod read;
pub mod runtime;
pub mod settings;

pub use error::{EngineError, ScriptError};
pub use read::{read_into, Decode, Json, RawJson, ReadError, ReadErrorKind};
pub use runtime::ScriptRuntime;
pub use settings::ScriptSettings;

pub use rquickjs;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
