//! Compiler options.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when options cannot be loaded.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The JSON text was not a valid options object
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Switches changing how the lexer and the parser accept their input.
///
/// Every option defaults to `false`; a JSON object only needs to list the
/// options it turns on.
///
/// # Examples
///
/// ```
/// use core_types::Options;
///
/// let options = Options::from_json(r#"{ "extended_operators": true }"#).unwrap();
/// assert!(options.extended_operators);
/// assert!(!options.strict);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Accept the `with` statement
    pub allow_with: bool,
    /// Accept binary literals
    pub binary: bool,
    /// Compile debug code
    pub debug: bool,
    /// Trace every token read by the lexer
    pub debug_lexer: bool,
    /// Accept escape sequences such as `\e`
    pub extended_escape_sequences: bool,
    /// Accept `<>`, `:=`, `**`, `<?`, `>?`, `<%`, `>%`, `~=`, `!~`, `~~` and `<=>`
    pub extended_operators: bool,
    /// Accept `goto` and friends
    pub extended_statements: bool,
    /// Read JSON instead of a program
    pub json: bool,
    /// Accept octal literals such as `0777`
    pub octal: bool,
    /// Strict mode; overrides the extended escape sequences and octal
    pub strict: bool,
    /// Generate trace code
    pub trace: bool,
    /// Let the optimizer apply transformations which are not IEEE-754 safe
    pub unsafe_math: bool,
}

impl Options {
    /// Load options from a JSON object.
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Options used to read JSON data.
    pub fn json() -> Self {
        Options {
            json: true,
            ..Options::default()
        }
    }

    /// Whether octal literals are accepted.
    pub fn octal_enabled(&self) -> bool {
        self.octal && !self.strict
    }

    /// Whether the extended escape sequences are accepted.
    pub fn extended_escapes_enabled(&self) -> bool {
        self.extended_escape_sequences && !self.strict
    }
}
