//! Compiler configuration

use std::path::Path;

use serde::Deserialize;

use crate::error::{CompileError, CompileResult};

/// Compiler settings, as read from a TOML or JSON file.
///
/// ```toml
/// dialect = "postgres"
/// log_sql = true
/// use_table_alias = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Dialect name or alias, resolved when the compiler is built
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Emit a debug event for every compiled fragment
    #[serde(default)]
    pub log_sql: bool,

    /// Qualify columns with the table alias rather than the table name
    #[serde(default = "default_true")]
    pub use_table_alias: bool,
}

fn default_dialect() -> String {
    "standard".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            log_sql: false,
            use_table_alias: true,
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration builder
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::default()
    }

    pub fn from_toml(text: &str) -> CompileResult<Self> {
        toml::from_str(text).map_err(|e| CompileError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> CompileResult<Self> {
        serde_json::from_str(text).map_err(|e| CompileError::Config(e.to_string()))
    }

    /// Load from a file; `.json` is read as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> CompileResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_toml(&text),
        }
    }
}

/// Builder for CompilerConfig
#[derive(Debug, Default)]
pub struct CompilerConfigBuilder {
    config: CompilerConfig,
}

impl CompilerConfigBuilder {
    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.config.dialect = name.into();
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.config.log_sql = enabled;
        self
    }

    pub fn use_table_alias(mut self, enabled: bool) -> Self {
        self.config.use_table_alias = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CompilerConfig {
        self.config
    }
}
