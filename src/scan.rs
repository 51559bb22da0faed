// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The scanning driver that turns a `Scan` implementation plus a list
//! of tokenize functions into a lazy token iterator.

use std::fmt;
use std::io;
use std::io::prelude::*;

use error::{LexError, Result};
use source::Utf8Source;
use span::{Location, Span};
use token::{Token, Tokenize};

/// A candidate match found by a scanner at one scan position.
///
/// A record runs from `start` to `end` (byte offsets into the source)
/// and carries the scanner-specific state the automaton was in after
/// consuming the recorded input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord<S> {
    start: usize,
    end: usize,
    state: S,
}

impl<S> MatchRecord<S> {
    /// Create a new `MatchRecord` for the given offsets and state.
    pub fn new(start: usize, end: usize, state: S) -> MatchRecord<S> {
        MatchRecord { start, end, state }
    }

    /// The byte offset at which the candidate match starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The byte offset one past the end of the candidate match.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The scanner-specific state for this record.
    pub fn state(&self) -> &S {
        &self.state
    }
}

/// The interface a concrete scanner implements against its automaton
/// representation.
///
/// None of the operations have default implementations: a type that
/// does not know how to scan does not implement `Scan`, rather than
/// silently scanning nothing.
pub trait Scan {
    /// The scanner-specific state attached to each `MatchRecord`.
    type State;

    /// The number of patterns this scanner was built over.
    ///
    /// Tokenize-function lists are checked against this at lexer
    /// construction time.
    fn pattern_count(&self) -> usize;

    /// The candidate match records at `position` in `source`, ordered
    /// by increasing match length.
    fn find_records(&self, source: &str, position: usize) -> Vec<MatchRecord<Self::State>>;

    /// The index of the pattern that accepts in `state`, if any.
    ///
    /// When more than one pattern accepts, the lowest index wins; this
    /// is how pattern order breaks ties between equally long matches.
    fn successful_id(&self, state: &Self::State) -> Option<usize>;

    /// Whether `state` is a failure state from which no pattern can
    /// match or go on matching.
    fn is_failure(&self, state: &Self::State) -> bool;
}

// A constructed automaton is read-only while scanning, so a shared
// reference to a scanner is itself a scanner. This lets several lexers,
// each with independent cursor state, share one automaton.
impl<'a, S: Scan> Scan for &'a S {
    type State = S::State;

    fn pattern_count(&self) -> usize {
        (**self).pattern_count()
    }

    fn find_records(&self, source: &str, position: usize) -> Vec<MatchRecord<Self::State>> {
        (**self).find_records(source, position)
    }

    fn successful_id(&self, state: &Self::State) -> Option<usize> {
        (**self).successful_id(state)
    }

    fn is_failure(&self, state: &Self::State) -> bool {
        (**self).is_failure(state)
    }
}

/// The iterator that lexes a source string into a token iterator.
///
/// The generic type `S` is the scanner driving the match search and `V`
/// is the computed-value type of the tokens.
///
/// `Lexer` performs a maximal-munch lex: at each position it selects
/// the longest candidate record whose state accepts, advances past the
/// matched lexeme, and applies the accepted pattern's tokenize
/// function. Suppressed matches (tokenize functions returning `None`)
/// restart the search at the new position without yielding.
///
/// The iterator is fallible. An unmatched position yields a
/// [`LexError::NoMatch`] item and ends the stream; the cursor never
/// moves backwards and never stalls.
///
/// A `Lexer` owns its source and cursor for the duration of one scan
/// session and is re-entrant per call of [`set_source`], which resets
/// the session.
///
/// [`LexError::NoMatch`]: enum.LexError.html#variant.NoMatch
/// [`set_source`]: #method.set_source
pub struct Lexer<S: Scan, V> {
    scanner: S,
    tokenizers: Vec<Tokenize<V>>,
    source: String,
    position: usize,
    failed: bool,
}

impl<S: Scan, V> fmt::Debug for Lexer<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("tokenizers", &self.tokenizers.len())
            .field("source", &self.source)
            .field("position", &self.position)
            .field("failed", &self.failed)
            .finish()
    }
}

impl<S: Scan, V> Lexer<S, V> {
    /// Create a new `Lexer` from a scanner and the tokenize functions
    /// for its patterns, in pattern order.
    ///
    /// # Errors
    ///
    /// Fails with [`LexError::Configuration`] when the number of
    /// tokenize functions differs from the scanner's pattern count.
    ///
    /// [`LexError::Configuration`]: enum.LexError.html#variant.Configuration
    pub fn new(scanner: S, tokenizers: Vec<Tokenize<V>>) -> Result<Lexer<S, V>> {
        if scanner.pattern_count() != tokenizers.len() {
            return Err(LexError::Configuration {
                patterns: scanner.pattern_count(),
                tokenizers: tokenizers.len(),
            });
        }

        Ok(Self::assemble(scanner, tokenizers))
    }

    pub(crate) fn assemble(scanner: S, tokenizers: Vec<Tokenize<V>>) -> Lexer<S, V> {
        Lexer {
            scanner,
            tokenizers,
            source: String::new(),
            position: 0,
            failed: false,
        }
    }

    /// Start a new scan session over `source`.
    ///
    /// The cursor is reset to the start of the new source; any previous
    /// session, including one that ended in a lexical error, is
    /// discarded.
    pub fn set_source<T: Into<String>>(&mut self, source: T) {
        self.source = source.into();
        self.position = 0;
        self.failed = false;
    }

    /// Start a new scan session by decoding `reader` as utf8.
    ///
    /// # Errors
    ///
    /// Any error from the reader or from utf8 decoding is returned and
    /// the previous session is left in place.
    pub fn set_source_utf8<R: Read>(&mut self, reader: R) -> io::Result<()> {
        let source = reader.read_source()?;
        self.set_source(source);
        Ok(())
    }

    /// The current cursor position within the scan session.
    pub fn position(&self) -> Location {
        self.position.into()
    }

    /// Non-destructive lookahead: the `n`-th upcoming token.
    ///
    /// Runs the same scanning and accepting logic as iteration and then
    /// restores the cursor, so the externally observable position is
    /// unchanged. Suppressed matches do not count towards `n`, exactly
    /// as they are not produced by iteration.
    ///
    /// Returns `None` when fewer than `n` tokens remain before the end
    /// of the source or before a position with no lexical match.
    pub fn peek(&mut self, n: usize) -> Option<Span<Token<V>>> {
        let saved_position = self.position;
        let saved_failed = self.failed;

        let mut found = None;
        for _ in 0..n {
            match self.next() {
                Some(Ok(span)) => found = Some(span),
                _ => {
                    found = None;
                    break;
                }
            }
        }

        self.position = saved_position;
        self.failed = saved_failed;
        found
    }
}

impl<S: Scan, V> Iterator for Lexer<S, V> {
    type Item = Result<Span<Token<V>>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed || self.position >= self.source.len() {
                return None;
            }

            let records = self.scanner.find_records(&self.source, self.position);

            // Records arrive ordered by increasing length; scanning them
            // in reverse selects the longest accepting one.
            let accepted = records
                .iter()
                .rev()
                .filter(|r| !self.scanner.is_failure(r.state()))
                .filter_map(|r| self.scanner.successful_id(r.state()).map(|id| (r, id)))
                .next();

            let (start, end, id) = match accepted {
                Some((record, id)) if record.end() > self.position => {
                    (record.start(), record.end(), id)
                }
                // No accepting record, or one that fails to advance the
                // cursor: surface the position and end the stream.
                _ => {
                    self.failed = true;
                    return Some(Err(LexError::NoMatch {
                        position: self.position,
                    }));
                }
            };

            let token = (self.tokenizers[id])(&self.source[start..end]);
            self.position = end;

            if let Some(token) = token {
                return Some(Ok(Span::new(start.into(), end.into(), token)));
            }
        }
    }
}
