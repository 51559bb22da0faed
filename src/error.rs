// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::result;

/// The error type for lexers driven by the `Lexer` iterator.
#[derive(Debug, Fail, PartialEq, Eq)]
pub enum LexError {
    /// The lexer was constructed with a tokenize-function list whose
    /// length does not match the number of patterns the scanner was
    /// built over. This error occurs at construction time, before any
    /// scanning starts.
    #[fail(
        display = "The lexer was configured with {} patterns but {} tokenize functions.",
        patterns, tokenizers
    )]
    Configuration {
        /// The number of patterns the scanner was built over.
        patterns: usize,
        /// The number of tokenize functions supplied.
        tokenizers: usize,
    },

    /// No pattern produced an accepting match at the given position of
    /// the source. The position is a byte offset into the source for
    /// the current scan session.
    #[fail(display = "The lexer found no match for the input at position {}.", position)]
    NoMatch {
        /// The byte offset at which no pattern matched.
        position: usize,
    },
}

/// A specialized Result type for lexer operations.
pub type Result<T> = result::Result<T, LexError>;
