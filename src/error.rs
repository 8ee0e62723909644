//! @ai:module:intent Define error types for the TextGrid parser
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result, Position, ConsistencyError, Violation
//! @ai:module:stateless true

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent 1-based line/column location of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// @ai:intent Unified error type for all TextGrid parser operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lex error at {position}: unexpected {text:?}")]
    Lex { position: Position, text: String },

    #[error("Parse error at {position}: found {found}, expected {}", .expected.join(" or "))]
    Parse {
        position: Position,
        found: String,
        expected: Vec<String>,
    },

    #[error("Format error: unsupported {field} {found:?}")]
    Format { field: &'static str, found: String },

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// @ai:intent Source position of the fault, when the error has one
    /// @ai:effects pure
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex { position, .. } | Error::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub(crate) fn parse(
        position: Position,
        found: impl Into<String>,
        expected: impl IntoIterator<Item = String>,
    ) -> Self {
        Error::Parse {
            position,
            found: found.into(),
            expected: expected.into_iter().collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// @ai:intent A temporal-ordering or coverage violation located by tier and item
/// @ai:invariant tier_name is Some exactly when tier_index is Some
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("Consistency error in {}: {violation}", location(.tier_index, .tier_name, .item_index))]
pub struct ConsistencyError {
    /// 0-based; rendered 1-based to match `item [i]`. `None` for the TextGrid itself
    pub tier_index: Option<usize>,
    pub tier_name: Option<String>,
    /// 0-based; `None` for tier-level and grid-level violations
    pub item_index: Option<usize>,
    pub violation: Violation,
}

impl ConsistencyError {
    pub(crate) fn grid(violation: Violation) -> Self {
        Self {
            tier_index: None,
            tier_name: None,
            item_index: None,
            violation,
        }
    }
}

fn location(
    tier_index: &Option<usize>,
    tier_name: &Option<String>,
    item_index: &Option<usize>,
) -> String {
    let (Some(tier), Some(name)) = (tier_index, tier_name) else {
        return "TextGrid".to_string();
    };
    match item_index {
        Some(idx) => format!("tier {} ({name:?}), item {}", tier + 1, idx + 1),
        None => format!("tier {} ({name:?})", tier + 1),
    }
}

/// @ai:intent Nature of a consistency violation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Gap { expected: f64, found: f64 },
    Overlap { expected: f64, found: f64 },
    Inverted { xmin: f64, xmax: f64 },
    OutOfOrder { previous: f64, found: f64 },
    OutOfBounds { value: f64, xmin: f64, xmax: f64 },
    StartMismatch { expected: f64, found: f64 },
    EndMismatch { expected: f64, found: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Gap { expected, found } => {
                write!(f, "gap: interval starts at {found}, previous ends at {expected}")
            }
            Violation::Overlap { expected, found } => {
                write!(f, "overlap: interval starts at {found}, previous ends at {expected}")
            }
            Violation::Inverted { xmin, xmax } => {
                write!(f, "xmin {xmin} is greater than xmax {xmax}")
            }
            Violation::OutOfOrder { previous, found } => {
                write!(f, "out of order: point at {found} does not follow {previous}")
            }
            Violation::OutOfBounds { value, xmin, xmax } => {
                write!(f, "out of bounds: {value} outside [{xmin}, {xmax}]")
            }
            Violation::StartMismatch { expected, found } => {
                write!(f, "coverage starts at {found}, tier starts at {expected}")
            }
            Violation::EndMismatch { expected, found } => {
                write!(f, "coverage ends at {found}, tier ends at {expected}")
            }
        }
    }
}
