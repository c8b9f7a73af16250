#![forbid(unsafe_code)]
//! Imp Language Checker
//!
//! A front end for the Imp toy imperative language: a pattern-driven lexical
//! analyzer, a shift-reduce parser and a declaration linter, plus a small
//! regular-grammar/automaton toolkit for exploring the token patterns as
//! finite automata.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a checker bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod automata;
pub mod cli;

pub use imp_semantics as semantics;
pub use imp_syntax as syntax;

pub use automata::{Automaton, RegularGrammar};
