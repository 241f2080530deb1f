//! Script runtime settings

use serde::{Deserialize, Serialize};

/// Default depth budget for reading script values.
pub const DEFAULT_MAX_READ_DEPTH: usize = 32;

/// Script runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Deepest path allowed when reading a script value into Rust.
    pub max_read_depth: usize,
    /// QuickJS heap limit in bytes.
    pub memory_limit: Option<usize>,
    /// QuickJS stack limit in bytes.
    pub max_stack_size: Option<usize>,
    /// Longest sequence accepted when reading; unlimited when unset.
    pub max_sequence_length: Option<usize>,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            max_read_depth: DEFAULT_MAX_READ_DEPTH,
            memory_limit: None,
            max_stack_size: None,
            max_sequence_length: None,
        }
    }
}
