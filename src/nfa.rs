// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The `Scan` implementation backed by a runtime constructed NFA.
//!
//! `NfaScanner` compiles one automaton fragment per pattern, merges the
//! fragments under a single start state, and collapses epsilon-reachable
//! literal transitions so that scanning can follow single-character
//! transitions while keeping true NFA branching (a *set* of live states
//! per record).
//!
//! A constructed `NfaScanner` is read-only. Several `Lexer` instances,
//! each with its own cursor, can scan with a shared reference to one
//! scanner.

use std::collections::BTreeSet;
use std::iter;

use scan::{Lexer, MatchRecord, Scan};
use token::Rule;
use tyndale_nfa::{self, compile_patterns, Nfa, StateId};

/// A scanner that finds candidate matches by walking a runtime
/// constructed NFA.
pub struct NfaScanner {
    nfa: Nfa,
    start: StateId,
    finals: Vec<BTreeSet<StateId>>,
}

impl NfaScanner {
    /// Compile `patterns` into a combined automaton.
    ///
    /// Pattern order is significant: it is the order used to break ties
    /// between patterns that accept equally long matches.
    ///
    /// # Errors
    ///
    /// Fails when any pattern does not compile to an NFA fragment; see
    /// the error conditions of [`compile_pattern`].
    ///
    /// [`compile_pattern`]: ../../tyndale_nfa/compile/fn.compile_pattern.html
    pub fn new<'a, I>(patterns: I) -> tyndale_nfa::Result<NfaScanner>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut nfa = Nfa::new();

        let fragments = compile_patterns(&mut nfa, patterns)?;
        let finals = fragments.iter().map(|f| f.finals().clone()).collect();

        let combined = nfa.combine(fragments);
        nfa.subset_construction(combined.start());

        Ok(NfaScanner {
            nfa,
            start: combined.start(),
            finals,
        })
    }
}

impl Scan for NfaScanner {
    type State = BTreeSet<StateId>;

    fn pattern_count(&self) -> usize {
        self.finals.len()
    }

    fn find_records(&self, source: &str, position: usize) -> Vec<MatchRecord<Self::State>> {
        let mut records = Vec::new();
        let mut current: BTreeSet<StateId> = iter::once(self.start).collect();

        for (offset, c) in source[position..].char_indices() {
            let mut next = BTreeSet::new();
            for &state in &current {
                next.extend(self.nfa.delta(state, c));
            }

            let end = position + offset + c.len_utf8();
            records.push(MatchRecord::new(position, end, next.clone()));

            if next.is_empty() {
                break;
            }
            current = next;
        }

        records
    }

    fn successful_id(&self, state: &Self::State) -> Option<usize> {
        self.finals.iter().position(|finals| {
            state
                .iter()
                .any(|&s| self.nfa.is_final_state(s, finals).is_some())
        })
    }

    fn is_failure(&self, state: &Self::State) -> bool {
        state.is_empty()
    }
}

impl<V> Lexer<NfaScanner, V> {
    /// Create a lexer directly from a list of rules.
    ///
    /// This compiles each rule's pattern into one shared automaton and
    /// pairs it with the rule's tokenize function. Rule order is
    /// significant in the same way pattern order is for
    /// [`NfaScanner::new`].
    ///
    /// [`NfaScanner::new`]: struct.NfaScanner.html#method.new
    pub fn from_rules<I>(rules: I) -> tyndale_nfa::Result<Lexer<NfaScanner, V>>
    where
        I: IntoIterator<Item = Rule<V>>,
    {
        let (patterns, tokenizers): (Vec<_>, Vec<_>) =
            rules.into_iter().map(Rule::into_parts).unzip();
        let scanner = NfaScanner::new(patterns.iter().map(|p| p.as_str()))?;

        // The rule list supplied both sides, so the counts agree by
        // construction.
        Ok(Lexer::assemble(scanner, tokenizers))
    }
}
