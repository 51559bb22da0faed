// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A library for lexing a source string into a stream of typed tokens.
//!
//! The motivating case for this crate is a list of `Rule`'s, each
//! pairing a regular-expression pattern with a tokenize function. The
//! rules are compiled into a single nondeterministic finite automaton
//! (through the [tyndale-nfa] crate) and the resulting `Lexer` is a
//! fallible iterator over `Span<Token<V>>`: at each position it emits
//! the longest match among the patterns, with rule order breaking ties.
//!
//! A tokenize function may suppress its matches (see `discard`), which
//! is how whitespace and comments are matched without being emitted.
//!
//! The scanning driver is generic over the `Scan` trait, so automaton
//! representations other than the provided `NfaScanner` can drive it.
//!
//! [tyndale-nfa]: https://crates.io/crates/tyndale-nfa

#![deny(missing_docs)]

#[macro_use]
extern crate failure;

extern crate encode_unicode;
extern crate tyndale_nfa;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

mod error;
mod nfa;
mod scan;
mod source;
mod span;
mod token;

pub use error::{LexError, Result};
pub use nfa::NfaScanner;
pub use scan::{Lexer, MatchRecord, Scan};
pub use source::Utf8Source;
pub use span::{Location, Span};
pub use token::{discard, emit, emit_with, Rule, Token, Tokenize};
