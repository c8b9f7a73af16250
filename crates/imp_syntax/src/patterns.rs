//! Pattern table for the lexical analyzer.
//!
//! A pattern definition is a JSON object mapping pattern names to entries:
//!
//! ```json
//! {
//!   "math": {
//!     "regex": ["\\+", "-"],
//!     "actions": "class:operation, value:match",
//!     "matches": { "+": "ADD", "-": "SUB" }
//!   }
//! }
//! ```
//!
//! - `regex` sub-sources are combined by alternation and anchored, so a pattern
//!   matches a buffer only when the *entire* buffer matches.
//! - `actions` assign the token category (`class:…`, required for the pattern to
//!   ever be emitted) and how the token value is derived (`value:match`,
//!   `value:string` or `value:number`).
//! - `matches` is the lexeme → normalized value table used by `value:match`.
//!
//! Validation is deliberately minimal: the loader only checks the shape above.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value as Json;
use thiserror::Error;

use crate::lexer::tokens::{Token, TokenClass, TokenValue};

/// Errors raised while loading a pattern definition. Always fatal: a broken
/// pattern file cannot be partially used.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The top level is not an object-of-objects, or an entry lacks a `regex`
    /// array of strings.
    #[error("invalid patterns file")]
    InvalidFile,
    #[error("invalid regex in pattern {name:?}: {source}")]
    BadRegex {
        name: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("invalid action {action:?} in pattern {name:?}")]
    BadAction { name: String, action: String },
}

/// How a pattern derives the emitted token's value from the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEffect {
    /// Look the lexeme up in the pattern's `matches` table.
    Match,
    /// Keep the raw lexeme.
    String,
    /// Parse the lexeme as a number.
    Number,
}

/// A named token pattern: anchored matcher plus its compiled actions.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    matcher: Regex,
    class: Option<TokenClass>,
    value_effect: Option<ValueEffect>,
    value_table: HashMap<String, String>,
}

impl Pattern {
    fn from_entry(name: &str, entry: &Json) -> Result<Self, PatternError> {
        let object = entry.as_object().ok_or(PatternError::InvalidFile)?;
        let sources = object
            .get("regex")
            .and_then(Json::as_array)
            .ok_or(PatternError::InvalidFile)?;
        let mut alternatives = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.as_str().ok_or(PatternError::InvalidFile)?;
            alternatives.push(format!("(?:{source})"));
        }
        if alternatives.is_empty() {
            return Err(PatternError::InvalidFile);
        }
        let matcher = Regex::new(&format!("^(?:{})$", alternatives.join("|"))).map_err(|e| {
            PatternError::BadRegex {
                name: name.to_string(),
                source: Box::new(e),
            }
        })?;

        let (class, value_effect) = match object.get("actions").and_then(Json::as_str) {
            Some(actions) => parse_actions(name, actions)?,
            None => (None, None),
        };

        let mut value_table = HashMap::new();
        if let Some(matches) = object.get("matches").and_then(Json::as_object) {
            for (lexeme, normalized) in matches {
                if let Some(normalized) = normalized.as_str() {
                    value_table.insert(lexeme.clone(), normalized.to_string());
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            matcher,
            class,
            value_effect,
            value_table,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category this pattern's `class` action assigns, if any. A pattern
    /// without one is unusable and is never matched by the analyzer.
    pub fn class(&self) -> Option<&TokenClass> {
        self.class.as_ref()
    }

    /// Whether the whole lexeme matches this pattern.
    pub fn matches(&self, lexeme: &str) -> bool {
        self.matcher.is_match(lexeme)
    }

    /// Build the token this pattern emits for `lexeme`, or `None` if the
    /// pattern has no `class` action.
    pub fn token(&self, lexeme: &str, line: u32, position: u32) -> Option<Token> {
        let class = self.class.clone()?;
        Some(Token {
            name: self.name.clone(),
            class,
            line,
            position,
            value: self.derive_value(lexeme),
        })
    }

    fn derive_value(&self, lexeme: &str) -> Option<TokenValue> {
        match self.value_effect? {
            ValueEffect::Match => self.value_table.get(lexeme).cloned().map(TokenValue::Text),
            ValueEffect::String => Some(TokenValue::Text(lexeme.to_string())),
            ValueEffect::Number => lexeme.parse::<f64>().ok().map(TokenValue::Number),
        }
    }
}

/// Parse an `"attribute:effect, …"` action list.
///
/// Unknown attributes are ignored so pattern files can carry annotations this
/// analyzer does not interpret; a malformed pair or an unknown `value` effect is
/// an error.
fn parse_actions(
    pattern: &str,
    actions: &str,
) -> Result<(Option<TokenClass>, Option<ValueEffect>), PatternError> {
    let mut class = None;
    let mut value_effect = None;
    for action in actions.split(',') {
        let action = action.trim();
        if action.is_empty() {
            continue;
        }
        let (attribute, effect) = action.split_once(':').ok_or_else(|| PatternError::BadAction {
            name: pattern.to_string(),
            action: action.to_string(),
        })?;
        match (attribute.trim(), effect.trim()) {
            ("class", category) => class = Some(TokenClass::parse(category)),
            ("value", "match") => value_effect = Some(ValueEffect::Match),
            ("value", "string") => value_effect = Some(ValueEffect::String),
            ("value", "number") => value_effect = Some(ValueEffect::Number),
            ("value", _) => {
                return Err(PatternError::BadAction {
                    name: pattern.to_string(),
                    action: action.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok((class, value_effect))
}

/// The full set of patterns the analyzer scans against. Loaded once, read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    /// Parse a pattern definition from its JSON text.
    ///
    /// ## Errors
    /// [`PatternError::InvalidFile`] if the top level is not an object-of-objects
    /// or an entry lacks a `regex` array of strings; [`PatternError::BadRegex`] /
    /// [`PatternError::BadAction`] for entries that fail to compile.
    pub fn from_json_str(text: &str) -> Result<Self, PatternError> {
        let root: Json = serde_json::from_str(text).map_err(|_| PatternError::InvalidFile)?;
        let entries = root.as_object().ok_or(PatternError::InvalidFile)?;
        let mut patterns = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            patterns.push(Pattern::from_entry(name, entry)?);
        }
        Ok(Self { patterns })
    }

    /// The built-in pattern table for the Imp language itself: `int`/`while`/
    /// `do`/`end` keywords, identifiers, number literals, assignment, relational
    /// and arithmetic operations, and skip patterns for blanks and newlines.
    pub fn builtin() -> Self {
        Self::from_json_str(include_str!("patterns/imp.json"))
            .expect("INVARIANT: built-in pattern table is valid")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_pattern_entry() {
        let table = PatternTable::from_json_str(
            r#"{
                "math": {
                    "regex": ["a"],
                    "actions": "class:operation, value:match",
                    "matches": { "a": "A" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        let pattern = table.iter().next().unwrap();
        assert_eq!(pattern.name(), "math");
        assert_eq!(pattern.class(), Some(&TokenClass::Operation));
        assert!(pattern.matches("a"));
        assert!(!pattern.matches("b"));

        let token = pattern.token("a", 1, 1).unwrap();
        assert_eq!(token.value, Some(TokenValue::Text("A".to_string())));
    }

    #[test]
    fn matcher_covers_the_whole_lexeme_only() {
        let table = PatternTable::from_json_str(
            r#"{ "id": { "regex": ["[a-z]+"], "actions": "class:identifier" } }"#,
        )
        .unwrap();
        let pattern = table.iter().next().unwrap();
        assert!(pattern.matches("abc"));
        assert!(!pattern.matches("abc "));
        assert!(!pattern.matches("1abc"));
    }

    #[test]
    fn alternated_sub_patterns_form_one_matcher() {
        let table = PatternTable::from_json_str(
            r#"{ "relop": { "regex": ["<", "<=", ">"], "actions": "class:operation" } }"#,
        )
        .unwrap();
        let pattern = table.iter().next().unwrap();
        assert!(pattern.matches("<"));
        assert!(pattern.matches("<="));
        assert!(pattern.matches(">"));
        assert!(!pattern.matches("<>"));
    }

    #[test]
    fn value_effects() {
        let table = PatternTable::from_json_str(
            r#"{
                "word": { "regex": ["[a-z]+"], "actions": "class:identifier, value:string" },
                "num": { "regex": ["[0-9]+"], "actions": "class:literal, value:number" },
                "bare": { "regex": ["_"], "actions": "class:operation" }
            }"#,
        )
        .unwrap();
        let find = |name: &str| table.iter().find(|p| p.name() == name).unwrap();
        let word = find("word");
        let num = find("num");
        let bare = find("bare");

        assert_eq!(
            word.token("abc", 1, 1).unwrap().value,
            Some(TokenValue::Text("abc".to_string()))
        );
        assert_eq!(
            num.token("42", 1, 1).unwrap().value,
            Some(TokenValue::Number(42.0))
        );
        assert_eq!(bare.token("_", 1, 1).unwrap().value, None);
    }

    #[test]
    fn pattern_without_class_action_emits_nothing() {
        let table =
            PatternTable::from_json_str(r#"{ "stray": { "regex": ["x"], "actions": "value:string" } }"#)
                .unwrap();
        let pattern = table.iter().next().unwrap();
        assert_eq!(pattern.class(), None);
        assert!(pattern.token("x", 1, 1).is_none());
    }

    #[test]
    fn rejects_malformed_files() {
        for text in [
            "[]",
            "42",
            "not json",
            r#"{ "p": [] }"#,
            r#"{ "p": {} }"#,
            r#"{ "p": { "regex": "a" } }"#,
            r#"{ "p": { "regex": [1] } }"#,
            r#"{ "p": { "regex": [] } }"#,
        ] {
            assert!(
                matches!(PatternTable::from_json_str(text), Err(PatternError::InvalidFile)),
                "expected invalid patterns file for {text:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_regex_and_bad_actions() {
        assert!(matches!(
            PatternTable::from_json_str(r#"{ "p": { "regex": ["("] } }"#),
            Err(PatternError::BadRegex { .. })
        ));
        assert!(matches!(
            PatternTable::from_json_str(
                r#"{ "p": { "regex": ["a"], "actions": "class" } }"#
            ),
            Err(PatternError::BadAction { .. })
        ));
        assert!(matches!(
            PatternTable::from_json_str(
                r#"{ "p": { "regex": ["a"], "actions": "value:banana" } }"#
            ),
            Err(PatternError::BadAction { .. })
        ));
    }

    #[test]
    fn builtin_table_loads() {
        let table = PatternTable::builtin();
        assert!(!table.is_empty());
        assert!(table.iter().any(|p| p.name() == "identifier"));
        assert!(table.iter().any(|p| p.class() == Some(&TokenClass::Skip)));
    }
}
