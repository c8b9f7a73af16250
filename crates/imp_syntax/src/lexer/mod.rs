//! Lexical analyzer for Imp source text.
//!
//! Scans character by character against a [`PatternTable`], emitting tokens by
//! maximal munch:
//!
//! - The buffer grows while at least one pattern matches it in full.
//! - The first character that makes every pattern reject closes the longest
//!   match: the remembered token is emitted and scanning restarts at the
//!   rejected character (one-step backtrack).
//! - Multiple simultaneous matches resolve to the `keyword`-class pattern; with
//!   no keyword among them the table is ambiguous and analysis aborts.
//! - Skip-class lexemes (blanks, newlines) are discarded but still advance the
//!   line/position bookkeeping.
//! - Characters no pattern accepts accumulate into maximal [`LexError`] spans;
//!   analysis continues past them.
//!
//! A match still open when the input runs out is flushed as the final lexeme;
//! no terminator is appended, so only characters of the source itself ever
//! reach the patterns.

pub mod tokens;

pub use tokens::{LexError, Token, TokenClass, TokenValue};

use thiserror::Error;

use crate::patterns::{Pattern, PatternTable};

/// Configuration fault: several patterns matched the same buffer and none of
/// them is a keyword to break the tie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("patterns {candidates:?} all match {lexeme:?} and none is a keyword")]
pub struct AmbiguousMatch {
    pub lexeme: String,
    pub candidates: Vec<String>,
}

/// Everything the analyzer produces for one input: tokens in input order plus
/// the unrecognized spans it recovered past.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// The lexical analyzer. Owns its pattern table; the table is immutable for the
/// analyzer's lifetime.
pub struct LexicalAnalyzer {
    patterns: PatternTable,
}

impl LexicalAnalyzer {
    pub fn new(patterns: PatternTable) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Tokenize `source`.
    ///
    /// Lexical errors are data, returned alongside the tokens; the only fatal
    /// outcome is an ambiguous pattern table.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn analyze(&self, source: &str) -> Result<Analysis, AmbiguousMatch> {
        let chars: Vec<char> = source.chars().collect();

        let mut analysis = Analysis::default();
        let mut open_error: Option<LexError> = None;
        let mut line: u32 = 1;
        let mut position: u32 = 1;
        let mut start = 0;

        while start < chars.len() {
            match self.longest_match(&chars[start..])? {
                Some((len, pattern)) => {
                    let lexeme: String = chars[start..start + len].iter().collect();
                    if let Some(error) = open_error.take() {
                        analysis.errors.push(closed(error, line, position));
                    }
                    if pattern.class() != Some(&TokenClass::Skip) {
                        if let Some(token) = pattern.token(&lexeme, line, position) {
                            analysis.tokens.push(token);
                        }
                    }
                    if lexeme == "\n" {
                        line += 1;
                        position = 1;
                    } else {
                        position += len as u32;
                    }
                    start += len;
                }
                None => {
                    // Unmatched character: extend the open error span or start one.
                    let rejected = chars[start];
                    match open_error.as_mut() {
                        Some(error) => error.value.push(rejected),
                        None => open_error = Some(LexError::open(rejected.to_string(), line, position)),
                    }
                    position += 1;
                    start += 1;
                }
            }
        }

        if let Some(error) = open_error.take() {
            analysis.errors.push(closed(error, line, position));
        }

        tracing::debug!(
            tokens = analysis.tokens.len(),
            errors = analysis.errors.len(),
            "analysis finished"
        );
        Ok(analysis)
    }

    /// Grow a buffer from `input[0]` and return the longest prefix some pattern
    /// accepts, with the pattern that won it.
    fn longest_match<'a>(
        &'a self,
        input: &[char],
    ) -> Result<Option<(usize, &'a Pattern)>, AmbiguousMatch> {
        let mut buffer = String::new();
        let mut last: Option<(usize, &Pattern)> = None;
        for (offset, &c) in input.iter().enumerate() {
            buffer.push(c);
            match self.exact_match(&buffer)? {
                Some(pattern) => last = Some((offset + 1, pattern)),
                // The extension killed every pattern: the previous buffer held
                // the longest match (or there was none at all).
                None => break,
            }
        }
        Ok(last)
    }

    /// All usable patterns matching the whole buffer, reduced to one by the
    /// keyword tie-break.
    fn exact_match<'a>(&'a self, buffer: &str) -> Result<Option<&'a Pattern>, AmbiguousMatch> {
        let mut matched: Vec<&Pattern> = self
            .patterns
            .iter()
            .filter(|p| p.class().is_some() && p.matches(buffer))
            .collect();
        if matched.len() <= 1 {
            return Ok(matched.pop());
        }
        matched
            .iter()
            .find(|p| p.class() == Some(&TokenClass::Keyword))
            .copied()
            .map(Some)
            .ok_or_else(|| AmbiguousMatch {
                lexeme: buffer.to_string(),
                candidates: matched.iter().map(|p| p.name().to_string()).collect(),
            })
    }
}

fn closed(mut error: LexError, line: u32, position: u32) -> LexError {
    error.close(line, position);
    error
}

// ============================================================================
// TESTS
// ============================================================================
