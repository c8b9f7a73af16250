//! Regular grammars, NFAs and subset-construction determinization.

pub mod automaton;
pub mod grammar;

pub use automaton::Automaton;
pub use grammar::{GrammarError, RegularGrammar};
