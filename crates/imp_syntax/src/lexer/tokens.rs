//! Token and lexical-error types for the Imp lexer.
//!
//! Tokens carry the *name* of the pattern that matched them alongside the token
//! category (`class`) the pattern's actions assigned. The parser matches on both.

use std::fmt;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Category assigned to a token by its pattern's `class` action.
///
/// The well-known categories get their own variants so the parser and linter can
/// match on them without string comparisons; anything else a pattern file invents
/// is carried through as [`TokenClass::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Operation,
    /// Matched but never emitted (whitespace, comments).
    Skip,
    Other(String),
}

impl TokenClass {
    /// Resolve a `class` action value to a category.
    pub fn parse(name: &str) -> Self {
        match name {
            "keyword" => TokenClass::Keyword,
            "identifier" => TokenClass::Identifier,
            "literal" => TokenClass::Literal,
            "operation" => TokenClass::Operation,
            "skip" => TokenClass::Skip,
            other => TokenClass::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Identifier => "identifier",
            TokenClass::Literal => "literal",
            TokenClass::Operation => "operation",
            TokenClass::Skip => "skip",
            TokenClass::Other(name) => name,
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value derived from a lexeme by a pattern's `value` action.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Text(String),
    Number(f64),
}

impl TokenValue {
    /// The textual form, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Text(s) => f.write_str(s),
            // Whole numbers print without a trailing ".0" to match the lexemes
            // they came from.
            TokenValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            TokenValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A token produced by the lexical analyzer. Immutable once produced.
///
/// `line` and `position` are 1-based and point at the start of the lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Name of the pattern that matched.
    pub name: String,
    pub class: TokenClass,
    pub line: u32,
    pub position: u32,
    pub value: Option<TokenValue>,
}

// ============================================================================
// LEXICAL ERRORS
// ============================================================================

/// A maximal contiguous run of input that matched no pattern.
///
/// The span stays open (`to_line`/`to_position` unset) until the next successful
/// match, or the end of input, closes it.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub description: String,
    /// The unrecognized text span.
    pub value: String,
    pub from_line: u32,
    pub from_position: u32,
    pub to_line: Option<u32>,
    pub to_position: Option<u32>,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, position {}: {:?}",
            self.description, self.from_line, self.from_position, self.value
        )
    }
}

impl LexError {
    pub(crate) fn open(value: String, line: u32, position: u32) -> Self {
        Self {
            description: "couldn't parse tokens".to_string(),
            value,
            from_line: line,
            from_position: position,
            to_line: None,
            to_position: None,
        }
    }

    pub(crate) fn close(&mut self, line: u32, position: u32) {
        self.to_line = Some(line);
        self.to_position = Some(position);
    }
}
