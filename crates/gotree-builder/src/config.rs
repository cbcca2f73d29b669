//! Builder configuration.

/// Prefix of temporaries introduced by synthesized statements.
pub const DEFAULT_TEMP_PREFIX: &str = "_autoGo_";

/// Prefix of methods that implement operators on named types.
pub const DEFAULT_OPERATOR_PREFIX: &str = "Gop_";

/// Size of `int`, `uint`, `uintptr` and pointers on the default target.
pub const DEFAULT_WORD_SIZE: u32 = 8;

/// Settings shared by every builder of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    temp_prefix: String,
    operator_prefix: String,
    word_size: u32,
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self {
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            operator_prefix: DEFAULT_OPERATOR_PREFIX.to_string(),
            word_size: DEFAULT_WORD_SIZE,
        }
    }

    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    pub fn with_operator_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.operator_prefix = prefix.into();
        self
    }

    /// Word size in bytes.
    ///
    /// # Panics
    ///
    /// Unless `bytes` is 4 or 8.
    pub fn with_word_size(mut self, bytes: u32) -> Self {
        assert!(
            bytes == 4 || bytes == 8,
            "word size must be 4 or 8 bytes, got {bytes}"
        );
        self.word_size = bytes;
        self
    }

    pub fn temp_prefix(&self) -> &str {
        &self.temp_prefix
    }

    pub fn operator_prefix(&self) -> &str {
        &self.operator_prefix
    }

    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    /// Method name implementing an operator, e.g. `Gop_Add`.
    pub fn operator_method(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.operator_prefix)
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}
