// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The nondeterministic finite automaton arena.
//!
//! An `Nfa` owns every state it creates and addresses them by `StateId`.
//! States do not refer to one another through language references;
//! transition tables store sets of state ids, which keeps the graph safe
//! to traverse and rewrite in the presence of cycles (epsilon loops from
//! repetition patterns are the common case).
//!
//! A `Fragment` identifies one automaton within the arena: the state at
//! which a scan of that automaton begins and the set of states at which
//! it accepts. Several fragments can share one arena and be merged with
//! [`combine`].
//!
//! [`combine`]: struct.Nfa.html#method.combine

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;

/// The identity of a state within its owning `Nfa` arena.
///
/// A `StateId` is handed out by [`add_state`] and is only meaningful to
/// the arena that created it. Ids are unique within one arena; distinct
/// arenas reuse the same ids.
///
/// [`add_state`]: struct.Nfa.html#method.add_state
pub type StateId = usize;

/// A transition symbol.
///
/// Every key in a state's transition table is either the epsilon marker
/// or a literal input character. Multi-character literals are expressed
/// as chains of single-character transitions by the pattern compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A transition that consumes no input.
    Epsilon,
    /// A transition on exactly the given character.
    Literal(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Epsilon => f.write_str("ε"),
            Symbol::Literal(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct State {
    transitions: BTreeMap<Symbol, BTreeSet<StateId>>,
}

/// An automaton fragment: a start state and the set of states at which
/// the fragment accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    start: StateId,
    finals: BTreeSet<StateId>,
}

impl Fragment {
    /// Create a new `Fragment` for a given start state and final states.
    pub fn new(start: StateId, finals: BTreeSet<StateId>) -> Fragment {
        Fragment { start, finals }
    }

    /// The state at which a scan of this fragment begins.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The states at which this fragment accepts.
    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }
}

/// An arena of NFA states and the operations that build and rewrite the
/// transition graph between them.
///
/// All `StateId` arguments to the methods of `Nfa` must have been handed
/// out by [`add_state`] on the same arena; the methods index the arena
/// directly and will panic on ids from elsewhere.
///
/// [`add_state`]: #method.add_state
#[derive(Clone, Debug, Default)]
pub struct Nfa {
    states: Vec<State>,
}

impl Nfa {
    /// Create a new, empty arena.
    pub fn new() -> Nfa {
        Nfa { states: Vec::new() }
    }

    /// Allocate a fresh state with no transitions.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// The number of states allocated in this arena.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Record a transition from `from` to `to` on `symbol`.
    ///
    /// The destination is inserted into the set keyed by `symbol`,
    /// creating the set if it is absent. Re-adding an existing
    /// transition is a no-op.
    pub fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from]
            .transitions
            .entry(symbol)
            .or_insert_with(BTreeSet::new)
            .insert(to);
    }

    /// The set of states reachable from `state` on exactly the literal
    /// character `symbol`.
    ///
    /// Returns the empty set if no such transition is registered. This
    /// is the only read primitive a scan loop needs once
    /// [`subset_construction`] has run.
    ///
    /// [`subset_construction`]: #method.subset_construction
    pub fn delta(&self, state: StateId, symbol: char) -> BTreeSet<StateId> {
        self.states[state]
            .transitions
            .get(&Symbol::Literal(symbol))
            .cloned()
            .unwrap_or_default()
    }

    /// The transitive closure of `state` over epsilon edges, including
    /// `state` itself.
    ///
    /// Epsilon cycles are tolerated; each state enters the closure once.
    pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut pending = vec![state];

        while let Some(next) = pending.pop() {
            if !closure.insert(next) {
                continue;
            }
            if let Some(dests) = self.states[next].transitions.get(&Symbol::Epsilon) {
                pending.extend(dests.iter().filter(|d| !closure.contains(*d)));
            }
        }

        closure
    }

    /// Resolve `state` against a set of candidate final states.
    ///
    /// Returns the matching final state: `state` itself when it is a
    /// member of `finals`, otherwise the first member of `finals`
    /// reachable from `state` through epsilon edges alone. Returns
    /// `None` when neither holds. Preserving *which* final state matched
    /// lets a caller that tracks per-pattern final sets recover the
    /// pattern that accepted.
    pub fn is_final_state(&self, state: StateId, finals: &BTreeSet<StateId>) -> Option<StateId> {
        if finals.contains(&state) {
            return Some(state);
        }
        self.epsilon_closure(state)
            .into_iter()
            .find(|s| finals.contains(s))
    }

    /// Collapse epsilon-reachable literal transitions onto every state
    /// reachable from `start`.
    ///
    /// For each reachable state, every literal transition registered on
    /// a member of that state's epsilon-closure is copied directly onto
    /// the state. The original epsilon edges are left in place. After
    /// the rewrite a scan loop can follow [`delta`] alone, while
    /// acceptance still tolerates epsilon tails via [`is_final_state`].
    ///
    /// A shared visited set keyed by state index guarantees each state
    /// is rewritten exactly once, even in the presence of cycles, and
    /// makes the operation idempotent under the set semantics of the
    /// transition tables.
    ///
    /// [`delta`]: #method.delta
    /// [`is_final_state`]: #method.is_final_state
    pub fn subset_construction(&mut self, start: StateId) {
        let mut visited = vec![false; self.states.len()];
        let mut pending = vec![start];

        while let Some(state) = pending.pop() {
            if visited[state] {
                continue;
            }
            visited[state] = true;

            let mut copied = Vec::new();
            for member in self.epsilon_closure(state) {
                if member == state {
                    continue;
                }
                for (&symbol, dests) in &self.states[member].transitions {
                    if symbol == Symbol::Epsilon {
                        continue;
                    }
                    copied.extend(dests.iter().map(|&d| (symbol, d)));
                }
            }
            for (symbol, dest) in copied {
                self.add_transition(state, symbol, dest);
            }

            for dests in self.states[state].transitions.values() {
                pending.extend(dests.iter().filter(|&&d| !visited[d]));
            }
        }
    }

    /// Merge `fragments` into a single automaton.
    ///
    /// Builds one fresh start state with an epsilon transition to the
    /// start of each supplied fragment and unions the fragments' final
    /// sets. This is how the per-pattern fragments of a lexer become one
    /// automaton with a single entry point.
    pub fn combine<I>(&mut self, fragments: I) -> Fragment
    where
        I: IntoIterator<Item = Fragment>,
    {
        let start = self.add_state();
        let mut finals = BTreeSet::new();

        for fragment in fragments {
            self.add_transition(start, Symbol::Epsilon, fragment.start());
            finals.extend(fragment.finals().iter().cloned());
        }

        Fragment::new(start, finals)
    }

    /// Every edge reachable from `start`, each listed once.
    ///
    /// Uses the same visited-set pattern as [`subset_construction`] to
    /// deduplicate shared and cyclic structure.
    ///
    /// [`subset_construction`]: #method.subset_construction
    pub fn edges(&self, start: StateId) -> Vec<(StateId, Symbol, StateId)> {
        let mut visited = vec![false; self.states.len()];
        let mut pending = vec![start];
        let mut edges = Vec::new();

        while let Some(state) = pending.pop() {
            if visited[state] {
                continue;
            }
            visited[state] = true;

            for (&symbol, dests) in &self.states[state].transitions {
                for &dest in dests {
                    edges.push((state, symbol, dest));
                    if !visited[dest] {
                        pending.push(dest);
                    }
                }
            }
        }

        edges
    }

    /// A displayable view of every edge reachable from `start`.
    pub fn display(&self, start: StateId) -> NfaDisplay {
        NfaDisplay { nfa: self, start }
    }
}

/// Debugging aid returned by [`Nfa::display`]: formats one line per
/// reachable edge, in sorted order.
///
/// [`Nfa::display`]: struct.Nfa.html#method.display
pub struct NfaDisplay<'a> {
    nfa: &'a Nfa,
    start: StateId,
}

impl<'a> fmt::Display for NfaDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (from, symbol, to) in self.nfa.edges(self.start).into_iter().sorted() {
            writeln!(f, "{} -{}-> {}", from, symbol, to)?;
        }
        Ok(())
    }
}
