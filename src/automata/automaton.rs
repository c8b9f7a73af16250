//! Finite automata over named states.
//!
//! An [`Automaton`] is nondeterministic in general: a state can fan out to any
//! number of targets on one symbol. [`Automaton::to_deterministic`] builds the
//! equivalent DFA by subset construction, naming each composite state after
//! its sorted members.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A finite automaton with string-named states.
///
/// Ordered collections keep state listings and composite-state names stable
/// across runs.
#[derive(Debug, Clone)]
pub struct Automaton {
    start: String,
    accepting: BTreeSet<String>,
    symbols: BTreeSet<char>,
    transitions: BTreeMap<String, BTreeMap<char, BTreeSet<String>>>,
}

impl Automaton {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            accepting: BTreeSet::new(),
            symbols: BTreeSet::new(),
            transitions: BTreeMap::new(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn accepting(&self) -> &BTreeSet<String> {
        &self.accepting
    }

    pub fn add_transition(
        &mut self,
        from: impl Into<String>,
        symbol: char,
        to: impl Into<String>,
    ) {
        self.symbols.insert(symbol);
        self.transitions
            .entry(from.into())
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to.into());
    }

    pub fn mark_accepting(&mut self, state: impl Into<String>) {
        self.accepting.insert(state.into());
    }

    /// All states mentioned anywhere: sources, targets, start, accepting.
    pub fn states(&self) -> BTreeSet<String> {
        let mut states: BTreeSet<String> = self.transitions.keys().cloned().collect();
        for targets in self.transitions.values() {
            for set in targets.values() {
                states.extend(set.iter().cloned());
            }
        }
        states.insert(self.start.clone());
        states.extend(self.accepting.iter().cloned());
        states
    }

    fn next_states(&self, from: &str, symbol: char) -> BTreeSet<String> {
        self.transitions
            .get(from)
            .and_then(|targets| targets.get(&symbol))
            .cloned()
            .unwrap_or_default()
    }

    /// Every transition as a flat `(from, symbol, targets)` listing.
    pub fn transition_rows(&self) -> Vec<(String, char, Vec<String>)> {
        self.transitions
            .iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(|(symbol, set)| {
                    (from.clone(), *symbol, set.iter().cloned().collect())
                })
            })
            .collect()
    }

    /// No state fans out to more than one target on any symbol.
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .values()
            .all(|targets| targets.values().all(|set| set.len() <= 1))
    }

    /// Simulates the automaton on `input`, tracking the full set of states it
    /// could be in.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = BTreeSet::from([self.start.clone()]);
        for symbol in input.chars() {
            let mut next = BTreeSet::new();
            for state in &current {
                next.extend(self.next_states(state, symbol));
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.iter().any(|state| self.accepting.contains(state))
    }

    /// Subset construction. Each reachable state set becomes one DFA state
    /// named by joining its sorted members; a composite is accepting when any
    /// member is.
    pub fn to_deterministic(&self) -> Automaton {
        let start_set = BTreeSet::from([self.start.clone()]);
        let mut dfa = Automaton::new(join(&start_set));
        let mut seen = BTreeSet::from([start_set.clone()]);
        let mut queue = VecDeque::from([start_set]);

        while let Some(current) = queue.pop_front() {
            let name = join(&current);
            if current.iter().any(|state| self.accepting.contains(state)) {
                dfa.mark_accepting(name.clone());
            }
            for &symbol in &self.symbols {
                let mut target = BTreeSet::new();
                for state in &current {
                    target.extend(self.next_states(state, symbol));
                }
                if target.is_empty() {
                    continue;
                }
                dfa.add_transition(name.clone(), symbol, join(&target));
                if seen.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }
        dfa
    }
}

/// Composite state name: members in sorted order, concatenated.
fn join(states: &BTreeSet<String>) -> String {
    states.iter().map(String::as_str).collect()
}
