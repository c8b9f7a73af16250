//! Regular grammars and their conversion to finite automata.
//!
//! A right-linear grammar (every production is a lone terminal or a terminal
//! followed by one nonterminal) maps directly onto an NFA: nonterminals become
//! states, terminal-only productions jump to a shared accepting state.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::automata::Automaton;

/// Name of the synthesized accepting state terminal-only productions enter.
const FINAL_STATE: &str = "N";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    #[error("production {nonterminal} -> {production} is not right-linear")]
    NotRegular {
        nonterminal: String,
        production: String,
    },
}

/// A grammar with single-character terminals and single-character nonterminal
/// names.
#[derive(Debug, Clone)]
pub struct RegularGrammar {
    terminals: BTreeSet<char>,
    non_terminals: BTreeSet<char>,
    start: char,
    /// `(nonterminal, production)` pairs; a production is a terminal optionally
    /// followed by a nonterminal.
    rules: Vec<(char, String)>,
    /// Derivation depth cap for [`RegularGrammar::derives`].
    max_rounds: usize,
}

impl RegularGrammar {
    pub fn new(
        terminals: impl IntoIterator<Item = char>,
        non_terminals: impl IntoIterator<Item = char>,
        start: char,
        rules: impl IntoIterator<Item = (char, &'static str)>,
    ) -> Self {
        Self {
            terminals: terminals.into_iter().collect(),
            non_terminals: non_terminals.into_iter().collect(),
            start,
            rules: rules
                .into_iter()
                .map(|(nt, production)| (nt, production.to_string()))
                .collect(),
            max_rounds: 30,
        }
    }

    /// The worked example grammar over `{a, b, c}`.
    pub fn demo() -> Self {
        Self::new(
            ['a', 'b', 'c'],
            ['S', 'A', 'B', 'C'],
            'S',
            [
                ('S', "aA"),
                ('S', "bB"),
                ('S', "aC"),
                ('A', "bA"),
                ('A', "bB"),
                ('A', "c"),
                ('B', "aA"),
                ('B', "cC"),
                ('B', "b"),
                ('C', "bB"),
                ('C', "bC"),
                ('C', "a"),
            ],
        )
    }

    pub fn start(&self) -> char {
        self.start
    }

    /// Every production is a terminal, or a terminal followed by a
    /// nonterminal.
    pub fn is_regular(&self) -> bool {
        self.rules.iter().all(|(_, production)| {
            let mut chars = production.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(t), None, _) => self.terminals.contains(&t),
                (Some(t), Some(nt), None) => {
                    self.terminals.contains(&t) && self.non_terminals.contains(&nt)
                }
                _ => false,
            }
        })
    }

    /// Whether the grammar derives `input`, by direct rule expansion.
    ///
    /// Bounded by `max_rounds` expansions as a guard against inputs longer
    /// than any derivation the grammar supports.
    pub fn derives(&self, input: &str) -> bool {
        self.derive_from(self.start, input, 0)
    }

    fn derive_from(&self, nonterminal: char, rest: &str, round: usize) -> bool {
        if round > self.max_rounds {
            return false;
        }
        let mut chars = rest.chars();
        let Some(next) = chars.next() else {
            return false;
        };
        let tail = chars.as_str();
        self.rules
            .iter()
            .filter(|(nt, _)| *nt == nonterminal)
            .any(|(_, production)| {
                let mut symbols = production.chars();
                match (symbols.next(), symbols.next()) {
                    (Some(t), None) => t == next && tail.is_empty(),
                    (Some(t), Some(nt)) => t == next && self.derive_from(nt, tail, round + 1),
                    _ => false,
                }
            })
    }

    /// Builds the NFA recognizing the grammar's language.
    pub fn to_automaton(&self) -> Result<Automaton, GrammarError> {
        let mut automaton = Automaton::new(self.start.to_string());
        for (nonterminal, production) in &self.rules {
            let mut symbols = production.chars();
            match (symbols.next(), symbols.next(), symbols.next()) {
                (Some(t), None, _) if self.terminals.contains(&t) => {
                    automaton.add_transition(nonterminal.to_string(), t, FINAL_STATE);
                }
                (Some(t), Some(nt), None)
                    if self.terminals.contains(&t) && self.non_terminals.contains(&nt) =>
                {
                    automaton.add_transition(nonterminal.to_string(), t, nt.to_string());
                }
                _ => {
                    return Err(GrammarError::NotRegular {
                        nonterminal: nonterminal.to_string(),
                        production: production.clone(),
                    });
                }
            }
        }
        automaton.mark_accepting(FINAL_STATE);
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_demo_grammar_is_regular() {
        assert!(RegularGrammar::demo().is_regular());
    }

    #[test]
    fn a_left_linear_production_is_rejected() {
        let grammar = RegularGrammar::new(['a'], ['S'], 'S', [('S', "Sa")]);
        assert!(!grammar.is_regular());
        assert_eq!(
            grammar.to_automaton().unwrap_err(),
            GrammarError::NotRegular {
                nonterminal: "S".to_string(),
                production: "Sa".to_string(),
            }
        );
    }

    #[test]
    fn the_automaton_accepts_derived_strings() {
        let nfa = RegularGrammar::demo().to_automaton().unwrap();
        for input in ["ac", "bb", "aa", "abc", "abbc", "babc"] {
            assert!(nfa.accepts(input), "expected {input:?} to be accepted");
        }
    }

    #[test]
    fn the_automaton_rejects_underived_strings() {
        let nfa = RegularGrammar::demo().to_automaton().unwrap();
        for input in ["", "a", "b", "ab", "ca", "cc"] {
            assert!(!nfa.accepts(input), "expected {input:?} to be rejected");
        }
    }

    #[test]
    fn derivation_agrees_with_the_automaton() {
        let grammar = RegularGrammar::demo();
        let nfa = grammar.to_automaton().unwrap();
        for input in ["", "a", "ac", "ab", "abc", "bb", "bab", "babc", "aa"] {
            assert_eq!(
                grammar.derives(input),
                nfa.accepts(input),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn the_determinized_demo_keeps_the_language() {
        let nfa = RegularGrammar::demo().to_automaton().unwrap();
        let dfa = nfa.to_deterministic();
        assert!(dfa.is_deterministic());
        for input in ["ac", "bb", "aa", "abc", "", "a", "ab", "cc"] {
            assert_eq!(nfa.accepts(input), dfa.accepts(input), "input {input:?}");
        }
    }
}
