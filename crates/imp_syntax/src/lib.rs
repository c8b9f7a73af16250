//! Syntax frontend for the Imp toy language: pattern table, lexer, parse tree, parser.
//!
//! This crate is dependency-light and intended for reuse across the CLI and future
//! tooling.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not do declaration checking
//!   (see the `imp_semantics` crate) and performs no I/O; the pattern definition is
//!   handed in as a JSON string.
//! - The pipeline is text → [`lexer::LexicalAnalyzer`] → tokens → [`parser::parse`] →
//!   one [`tree::ParseNode`] root.
//!
//! ## Examples
//! ```rust
//! use imp_syntax::lexer::LexicalAnalyzer;
//! use imp_syntax::patterns::PatternTable;
//! use imp_syntax::parser;
//!
//! let analyzer = LexicalAnalyzer::new(PatternTable::builtin());
//! let analysis = analyzer.analyze("int a = 1").unwrap();
//! assert!(analysis.errors.is_empty());
//! let root = parser::parse(analysis.tokens).unwrap();
//! assert_eq!(root.name, "assign");
//! ```

pub mod lexer;
pub mod parser;
pub mod patterns;
pub mod tree;

pub use lexer::{Analysis, LexicalAnalyzer};
pub use lexer::tokens::{LexError, Token, TokenClass, TokenValue};
pub use parser::{ParseError, parse};
pub use patterns::{PatternError, PatternTable};
pub use tree::{NodeClass, ParseNode, RuleName};
