use serde::{Deserialize, Serialize};

use crate::lexer::HasNextPolicy;

/// How the interpreter reacts to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the error, recover and keep going
    #[default]
    Collect,
    /// Abort the program at the first error
    FailFast,
}

/// Interpreter session settings
///
/// ```
/// use dfascript::{ErrorPolicy, InterpreterConfig};
///
/// let config = InterpreterConfig::from_json(r#"{ "error_policy": "fail_fast" }"#).unwrap();
/// assert_eq!(config.error_policy, ErrorPolicy::FailFast);
/// assert!(config.keep_bindings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub error_policy: ErrorPolicy,
    /// Keep the environment from one `compile` call to the next
    pub keep_bindings: bool,
    /// Drop `COMMENT` tokens before they reach the grammar
    pub skip_comments: bool,
    /// When the token source reports it has run dry
    pub has_next: HasNextPolicy,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            error_policy: ErrorPolicy::Collect,
            keep_bindings: true,
            skip_comments: true,
            has_next: HasNextPolicy::UntilEof,
        }
    }
}

impl InterpreterConfig {
    /// Parses a configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn fail_fast() -> Self {
        InterpreterConfig {
            error_policy: ErrorPolicy::FailFast,
            ..Self::default()
        }
    }
}
