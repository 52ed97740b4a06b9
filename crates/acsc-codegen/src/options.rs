//! Compile options that affect the produced object file.

use acsc_bytecode::ObjectFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Wire encoding of opcodes and arguments.
    pub format: ObjectFormat,
    /// Write STRE instead of STRL.
    pub encrypt_strings: bool,
}

impl CompileOptions {
    pub fn new(format: ObjectFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_encrypted_strings(mut self, encrypt: bool) -> Self {
        self.encrypt_strings = encrypt;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
