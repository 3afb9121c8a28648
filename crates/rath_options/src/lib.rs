//! rath_options: rath.json parsing and compiler options.
//!
//! A `rath.json` file names the sources to compile and the options to
//! compile them with. Every field is optional; command-line flags take
//! precedence over the file.

use rath_ast::Grammar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "rath.json";

/// Compiler options, matching the `compilerOptions` object of rath.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerOptions {
    /// Run the constant folder after parsing. Defaults to true.
    pub fold: Option<bool>,
    /// Print the token stream instead of the tree.
    pub print_tokens: Option<bool>,
    /// Print the tree one list element per line.
    pub pretty: Option<bool>,
    /// Replacement keyword and operator tables.
    pub grammar: Option<Grammar>,
}

impl CompilerOptions {
    pub fn fold_enabled(&self) -> bool {
        self.fold.unwrap_or(true)
    }

    pub fn print_tokens_enabled(&self) -> bool {
        self.print_tokens.unwrap_or(false)
    }

    pub fn pretty_enabled(&self) -> bool {
        self.pretty.unwrap_or(false)
    }

    /// Overlay `other` on top of `self`: every field `other` sets wins.
    pub fn merge(mut self, other: CompilerOptions) -> CompilerOptions {
        if other.fold.is_some() {
            self.fold = other.fold;
        }
        if other.print_tokens.is_some() {
            self.print_tokens = other.print_tokens;
        }
        if other.pretty.is_some() {
            self.pretty = other.pretty;
        }
        if other.grammar.is_some() {
            self.grammar = other.grammar;
        }
        self
    }
}

/// The rath.json file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RathConfig {
    pub compiler_options: Option<CompilerOptions>,
    pub files: Option<Vec<String>>,
}

impl RathConfig {
    /// The configured options, or the defaults when the file has none.
    pub fn options(&self) -> CompilerOptions {
        self.compiler_options.clone().unwrap_or_default()
    }
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a rath.json file from a string.
pub fn parse_config(content: &str) -> Result<RathConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a rath.json file from a path.
pub fn parse_config_file(path: &str) -> Result<RathConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content)
}
