use core::fmt;

use thiserror::Error;

/// Zero-based location in the query text. Rendered one-based.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Position {
    pub line: usize,
    pub char: usize,
}

impl Position {
    pub fn new(line: usize, char: usize) -> Self {
        Position { line, char }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, char {}", self.line + 1, self.char + 1)
    }
}

#[derive(Clone, PartialEq, Debug, Error)]
#[error("{kind} at {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

impl ParseError {
    pub fn unexpected(found: String, expected: &'static [&'static str], position: Position) -> Self {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken { found, expected },
            position,
        }
    }

    pub fn not_allowed(capability: Capability, position: Position) -> Self {
        ParseError {
            kind: ParseErrorKind::CapabilityViolation(capability),
            position,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: String,
        expected: &'static [&'static str],
    },
    CapabilityViolation(Capability),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "found {found}, expected {}", expected.join(", "))?
            }
            ParseErrorKind::CapabilityViolation(capability) => {
                write!(f, "{capability} not allowed")?
            }
        }

        Ok(())
    }
}

/// Grammar features that only some statements may use in their WHERE clause.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Capability {
    LogicalOr,
    Between,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::LogicalOr => f.write_str("OR"),
            Capability::Between => f.write_str("BETWEEN"),
        }
    }
}
