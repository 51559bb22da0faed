// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Token value objects and the tokenize functions that produce them.
//!
//! A `Token` pairs the identifier of the pattern that matched with the
//! matched lexeme and an optional computed value. Tokens are plain
//! values with structural equality; once constructed they are never
//! mutated.
//!
//! Tokenize functions are the binding point between "a pattern matched
//! this text" and "here is the semantic value for that match". All
//! type-specific parsing of lexeme text is isolated in these small
//! per-pattern functions, supplied by the grammar author through the
//! factories in this module.

/// A token produced by the lexer.
///
/// The generic type `V` is the computed-value type shared by all tokens
/// of one lexer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token<V> {
    identifier: String,
    lexeme: String,
    value: Option<V>,
}

impl<V> Token<V> {
    /// Create a new `Token` for a given identifier, lexeme and value.
    pub fn new<I, L>(identifier: I, lexeme: L, value: Option<V>) -> Token<V>
    where
        I: Into<String>,
        L: Into<String>,
    {
        Token {
            identifier: identifier.into(),
            lexeme: lexeme.into(),
            value,
        }
    }

    /// The identifier of the pattern that produced this token.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The exact substring of the source that matched.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The computed value for this token, if the tokenize function
    /// supplied one.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Consumes the `Token` and returns its computed value.
    pub fn into_value(self) -> Option<V> {
        self.value
    }
}

/// A tokenize function: maps a matched lexeme to a token, or to `None`
/// to suppress the match (skip tokens such as whitespace).
pub type Tokenize<V> = Box<dyn Fn(&str) -> Option<Token<V>>>;

/// A tokenize function that emits a token with no computed value.
pub fn emit<V: 'static>(identifier: &str) -> Tokenize<V> {
    let identifier = identifier.to_string();
    Box::new(move |lexeme| Some(Token::new(identifier.as_str(), lexeme, None)))
}

/// A tokenize function that emits a token whose value is computed from
/// the lexeme by `process`.
pub fn emit_with<V, F>(identifier: &str, process: F) -> Tokenize<V>
where
    V: 'static,
    F: Fn(&str) -> V + 'static,
{
    let identifier = identifier.to_string();
    Box::new(move |lexeme| {
        Some(Token::new(
            identifier.as_str(),
            lexeme,
            Some(process(lexeme)),
        ))
    })
}

/// A tokenize function that suppresses every match.
///
/// Use this for token kinds, such as whitespace, that should be matched
/// but never emitted.
pub fn discard<V: 'static>() -> Tokenize<V> {
    Box::new(|_| None)
}

/// A lexical rule: a regular-expression pattern paired with the
/// tokenize function for its matches.
pub struct Rule<V> {
    pattern: String,
    tokenize: Tokenize<V>,
}

impl<V> Rule<V> {
    /// Create a new `Rule` for a given pattern and tokenize function.
    pub fn new<P: Into<String>>(pattern: P, tokenize: Tokenize<V>) -> Rule<V> {
        Rule {
            pattern: pattern.into(),
            tokenize,
        }
    }

    /// The regular-expression pattern of this rule.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn into_parts(self) -> (String, Tokenize<V>) {
        (self.pattern, self.tokenize)
    }
}
