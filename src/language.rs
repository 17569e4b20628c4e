use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// The closed set of language families the harness can execute.
///
/// `C` and `Cpp` are distinct tags but share one native sandbox family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cpp,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ExecError;

    // Aliases such as `py` or `python3` are not part of the closed set and
    // reject like any other unknown token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Language::Python),
            "c" => Ok(Language::C),
            "cpp" => Ok(Language::Cpp),
            _ => Err(ExecError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// A piece of submitted source text tagged with its language.
///
/// Immutable once captured for a run; the harness synthesizer produces new
/// units rather than editing one in place.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub language: Language,
    pub text: String,
}

impl SourceUnit {
    pub fn new(language: Language, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }
}
