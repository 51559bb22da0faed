// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A library for constructing nondeterministic finite automata from
//! regular expressions.
//!
//! The automata built by this library are intended to drive a
//! longest-match lexer. Each regular expression is compiled to an NFA
//! fragment by Thompson construction, the fragments for a set of token
//! patterns are combined under a single start state, and the combined
//! graph is then rewritten by a partial subset construction that copies
//! every literal transition reachable through an epsilon-closure directly
//! onto the closure's root. The rewritten graph can be walked one literal
//! character at a time while still tolerating true NFA branching.
//!
//! The motivating use for this library is the [tyndale] crate, but it
//! may have additional uses.
//!
//! [tyndale]: https://crates.io/crates/tyndale

#![deny(missing_docs)]

extern crate failure;
extern crate itertools;
extern crate regex_syntax;

#[cfg(test)]
#[macro_use]
extern crate proptest;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

pub mod compile;
pub mod nfa;

pub use compile::{compile_pattern, compile_patterns, Error, Result};
pub use nfa::{Fragment, Nfa, NfaDisplay, StateId, Symbol};
