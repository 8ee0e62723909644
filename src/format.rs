//! @ai:module:intent Select the surface syntax a TextGrid is read with
//! @ai:module:layer domain
//! @ai:module:public_api TextGridFormat, Syntax, detect_syntax
//! @ai:module:depends_on lexer
//! @ai:module:stateless true

use crate::lexer::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// @ai:intent Caller-facing format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextGridFormat {
    #[default]
    Full,
    #[serde(alias = "minimal")]
    Short,
    Auto,
}

/// @ai:intent A concrete surface syntax; what the grammar tables are keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Full,
    Short,
}

impl TextGridFormat {
    /// @ai:intent Resolve the selector to a concrete syntax, sniffing tokens for Auto
    /// @ai:effects pure
    pub fn resolve(self, tokens: &[Token]) -> Syntax {
        match self {
            TextGridFormat::Full => Syntax::Full,
            TextGridFormat::Short => Syntax::Short,
            TextGridFormat::Auto => detect_syntax(tokens),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextGridFormat::Full => "full",
            TextGridFormat::Short => "short",
            TextGridFormat::Auto => "auto",
        }
    }
}

impl fmt::Display for TextGridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextGridFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(TextGridFormat::Full),
            "short" | "minimal" => Ok(TextGridFormat::Short),
            "auto" => Ok(TextGridFormat::Auto),
            other => Err(format!(
                "unknown TextGrid format `{other}` (expected full, short, minimal or auto)"
            )),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Full => f.write_str("full"),
            Syntax::Short => f.write_str("short"),
        }
    }
}

/// @ai:intent Guess the syntax from the first token after the two header strings
/// @ai:post Ident selects Full, Number selects Short, anything else falls back to Full
/// @ai:effects pure
pub fn detect_syntax(tokens: &[Token]) -> Syntax {
    let after_header = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t.kind, TokenKind::Str(_)))
        .nth(1)
        .map(|(idx, _)| idx + 1);

    let syntax = match after_header.and_then(|idx| tokens.get(idx)).map(|t| &t.kind) {
        Some(TokenKind::Number(_)) => Syntax::Short,
        _ => Syntax::Full,
    };
    tracing::debug!(%syntax, "auto-detected TextGrid syntax");
    syntax
}
