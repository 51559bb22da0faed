// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Compilation of regular expressions into NFA fragments.
//!
//! Patterns are parsed with `regex_syntax` and the resulting `Hir` is
//! folded bottom-up into Thompson-construction fragments allocated in a
//! caller supplied [`Nfa`] arena. Character classes are expanded into one
//! literal transition per member character, which is why classes beyond
//! a fixed size are rejected rather than expanded.
//!
//! [`Nfa`]: ../nfa/struct.Nfa.html

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::iter;

use failure::Fail;
use nfa::{Fragment, Nfa, StateId, Symbol};
use regex_syntax::{
    self, hir::{self, visit, ClassUnicode, Hir, Visitor}, Parser,
};

// Upper bound on the total number of characters a class may expand to.
// Large enough for the unicode decimal digit class, small enough to keep
// a pathological class from exploding the transition tables.
const MAX_CLASS_SIZE: usize = 1024;

/// Compile a single regular expression into a fragment in `nfa`.
///
/// The returned fragment has exactly one final state. Patterns that can
/// match the empty string are rejected: a zero-width match would keep a
/// lexer from making progress.
pub fn compile_pattern(nfa: &mut Nfa, pattern: &str) -> Result<Fragment> {
    let hir = parse_pattern_to_hir(pattern)?;
    let frag = visit(&hir, FragmentVisitor::new(pattern, nfa))?;
    let fragment = Fragment::new(frag.start, iter::once(frag.accept).collect());

    if nfa.is_final_state(fragment.start(), fragment.finals()).is_some() {
        return Err(Error::matches_empty(pattern));
    }

    Ok(fragment)
}

/// Compile each pattern in `patterns` into its own fragment in `nfa`.
///
/// The fragments are returned in the order the patterns were supplied,
/// which is the order a lexer uses to break ties between patterns.
pub fn compile_patterns<'a, I>(nfa: &mut Nfa, patterns: I) -> Result<Vec<Fragment>>
where
    I: IntoIterator<Item = &'a str>,
{
    patterns
        .into_iter()
        .map(|pattern| compile_pattern(nfa, pattern))
        .collect()
}

/// The error type for compiling regular expressions into NFA fragments.
#[derive(Debug)]
pub struct Error {
    pattern: String,
    message: &'static str,
    cause: Option<regex_syntax::Error>,
}

impl Error {
    fn parse(pattern: &str, cause: regex_syntax::Error) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "unable to parse",
            cause: Some(cause),
        }
    }

    fn invalid_unicode(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "pattern can match invalid unicode char's",
            cause: None,
        }
    }

    fn unexpected_end(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "compiler unexpectedly reached the end of the pattern",
            cause: None,
        }
    }

    fn anchor_unsupported(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "anchored patterns are not supported",
            cause: None,
        }
    }

    fn word_boundary_unsupported(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "patterns with word boundaries are not supported",
            cause: None,
        }
    }

    fn non_greedy_unsupported(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "patterns with non-greedy repetition are not supported",
            cause: None,
        }
    }

    fn class_too_large(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "character class is too large to expand",
            cause: None,
        }
    }

    fn matches_empty(pattern: &str) -> Error {
        Error {
            pattern: pattern.to_string(),
            message: "pattern matches the empty string",
            cause: None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid lexical pattern (\"{}\"): {}",
            self.pattern, self.message
        )
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        match self.cause {
            Some(ref cause) => Some(cause),
            None => None,
        }
    }
}

/// A specialized `Result` type for compiling patterns.
pub type Result<T> = ::std::result::Result<T, Error>;

fn parse_pattern_to_hir(pattern: &str) -> Result<Hir> {
    Parser::new()
        .parse(pattern)
        .map_err(|err| Error::parse(pattern, err))
}

// A fragment under construction: Thompson fragments have exactly one
// accept state until they are published as a `Fragment`.
#[derive(Clone, Copy)]
struct Frag {
    start: StateId,
    accept: StateId,
}

struct FragmentVisitor<'a, 'b> {
    pattern: &'b str,
    nfa: &'a mut Nfa,
    stack: Vec<Frag>,
}

impl<'a, 'b> FragmentVisitor<'a, 'b> {
    fn new(pattern: &'b str, nfa: &'a mut Nfa) -> FragmentVisitor<'a, 'b> {
        FragmentVisitor {
            pattern,
            nfa,
            stack: Vec::new(),
        }
    }

    fn pop(&mut self) -> Result<Frag> {
        self.stack
            .pop()
            .ok_or_else(|| Error::unexpected_end(self.pattern))
    }

    fn leaf(&mut self) -> Frag {
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();
        Frag { start, accept }
    }

    fn empty_fragment(&mut self) -> Frag {
        let frag = self.leaf();
        self.nfa.add_transition(frag.start, Symbol::Epsilon, frag.accept);
        frag
    }

    fn push_literal(&mut self, c: char) {
        let frag = self.leaf();
        self.nfa.add_transition(frag.start, Symbol::Literal(c), frag.accept);
        self.stack.push(frag);
    }

    fn push_class(&mut self, class: &ClassUnicode) -> Result<()> {
        let mut size = 0usize;
        for range in class.iter() {
            size += (range.end() as u32 - range.start() as u32) as usize + 1;
            if size > MAX_CLASS_SIZE {
                return Err(Error::class_too_large(self.pattern));
            }
        }

        let frag = self.leaf();
        for range in class.iter() {
            for point in (range.start() as u32)..(range.end() as u32 + 1) {
                if let Some(c) = ::std::char::from_u32(point) {
                    self.nfa.add_transition(frag.start, Symbol::Literal(c), frag.accept);
                }
            }
        }
        self.stack.push(frag);

        Ok(())
    }

    // Joins two fragments in sequence with an epsilon edge.
    fn link(&mut self, head: Frag, tail: Frag) -> Frag {
        self.nfa.add_transition(head.accept, Symbol::Epsilon, tail.start);
        Frag {
            start: head.start,
            accept: tail.accept,
        }
    }

    fn optional(&mut self, body: Frag) -> Frag {
        let frag = self.leaf();
        self.nfa.add_transition(frag.start, Symbol::Epsilon, body.start);
        self.nfa.add_transition(body.accept, Symbol::Epsilon, frag.accept);
        self.nfa.add_transition(frag.start, Symbol::Epsilon, frag.accept);
        frag
    }

    fn star(&mut self, body: Frag) -> Frag {
        let frag = self.optional(body);
        self.nfa.add_transition(body.accept, Symbol::Epsilon, body.start);
        frag
    }

    fn plus(&mut self, body: Frag) -> Frag {
        let frag = self.leaf();
        self.nfa.add_transition(frag.start, Symbol::Epsilon, body.start);
        self.nfa.add_transition(body.accept, Symbol::Epsilon, frag.accept);
        self.nfa.add_transition(body.accept, Symbol::Epsilon, body.start);
        frag
    }

    // Copies the subgraph of `frag` into fresh states so that repetition
    // counts can repeat a body without aliasing its transitions. All
    // copies must be taken before the original is linked into a larger
    // fragment, or the copy would pick up the links as well.
    fn duplicate(&mut self, frag: Frag) -> Frag {
        let edges = self.nfa.edges(frag.start);

        let mut map = BTreeMap::new();
        map.insert(frag.start, self.nfa.add_state());
        for &(from, _, to) in &edges {
            if !map.contains_key(&from) {
                let fresh = self.nfa.add_state();
                map.insert(from, fresh);
            }
            if !map.contains_key(&to) {
                let fresh = self.nfa.add_state();
                map.insert(to, fresh);
            }
        }
        if !map.contains_key(&frag.accept) {
            let fresh = self.nfa.add_state();
            map.insert(frag.accept, fresh);
        }

        for &(from, symbol, to) in &edges {
            self.nfa.add_transition(map[&from], symbol, map[&to]);
        }

        Frag {
            start: map[&frag.start],
            accept: map[&frag.accept],
        }
    }

    fn exactly(&mut self, body: Frag, count: u32) -> Frag {
        if count == 0 {
            return self.empty_fragment();
        }

        let mut copies = Vec::new();
        for _ in 1..count {
            copies.push(self.duplicate(body));
        }

        let mut result = body;
        for copy in copies {
            result = self.link(result, copy);
        }
        result
    }

    fn make_repetition(&mut self, kind: &hir::RepetitionKind) -> Result<()> {
        use self::hir::RepetitionKind::*;
        use self::hir::RepetitionRange::*;

        let body = self.pop()?;
        let frag = match *kind {
            ZeroOrOne => self.optional(body),
            ZeroOrMore => self.star(body),
            OneOrMore => self.plus(body),
            Range(Exactly(count)) => self.exactly(body, count),
            Range(AtLeast(count)) => {
                let copy = self.duplicate(body);
                let head = self.exactly(body, count);
                let tail = self.star(copy);
                self.link(head, tail)
            }
            Range(Bounded(min, max)) => {
                let mut options = Vec::new();
                for _ in min..max {
                    options.push(self.duplicate(body));
                }
                let mut result = self.exactly(body, min);
                for option in options {
                    let option = self.optional(option);
                    result = self.link(result, option);
                }
                result
            }
        };
        self.stack.push(frag);

        Ok(())
    }

    fn fold_concat(&mut self, count: usize) -> Result<()> {
        let mut tail = self.pop()?;
        for _ in 0..(count - 1) {
            let head = self.pop()?;
            tail = self.link(head, tail);
        }
        self.stack.push(tail);
        Ok(())
    }

    fn fold_alternation(&mut self, count: usize) -> Result<()> {
        let frag = self.leaf();
        for _ in 0..count {
            let branch = self.pop()?;
            self.nfa.add_transition(frag.start, Symbol::Epsilon, branch.start);
            self.nfa.add_transition(branch.accept, Symbol::Epsilon, frag.accept);
        }
        self.stack.push(frag);
        Ok(())
    }
}

impl<'a, 'b> Visitor for FragmentVisitor<'a, 'b> {
    type Output = Frag;
    type Err = Error;

    fn finish(mut self) -> Result<Frag> {
        self.pop()
    }

    fn visit_post(&mut self, hir: &Hir) -> Result<()> {
        use self::hir::Class;
        use self::hir::HirKind::*;
        use self::hir::Literal;
        use self::hir::Repetition;

        match hir.kind() {
            Empty => {
                let frag = self.empty_fragment();
                self.stack.push(frag);
            }
            Literal(Literal::Byte(_)) => return Err(Error::invalid_unicode(self.pattern)),
            Literal(Literal::Unicode(c)) => self.push_literal(*c),
            Class(Class::Bytes(_)) => return Err(Error::invalid_unicode(self.pattern)),
            Class(Class::Unicode(class)) => self.push_class(class)?,
            Anchor(_) => return Err(Error::anchor_unsupported(self.pattern)),
            WordBoundary(_) => return Err(Error::word_boundary_unsupported(self.pattern)),
            Repetition(Repetition { greedy: false, .. }) => {
                return Err(Error::non_greedy_unsupported(self.pattern))
            }
            Repetition(Repetition { kind, .. }) => self.make_repetition(kind)?,
            Group(_) => {} // treats all GroupKind's the same
            Concat(elements) => self.fold_concat(elements.len())?,
            Alternation(elements) => self.fold_alternation(elements.len())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeSet;

    fn build(pattern: &str) -> (Nfa, Fragment) {
        let mut nfa = Nfa::new();
        let fragment = compile_pattern(&mut nfa, pattern)
            .expect("Unexpected error compiling the pattern.");
        nfa.subset_construction(fragment.start());
        (nfa, fragment)
    }

    fn accepts(nfa: &Nfa, fragment: &Fragment, input: &str) -> bool {
        let mut current: BTreeSet<StateId> = iter::once(fragment.start()).collect();
        for c in input.chars() {
            let mut next = BTreeSet::new();
            for &state in &current {
                next.extend(nfa.delta(state, c));
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current
            .iter()
            .any(|&state| nfa.is_final_state(state, fragment.finals()).is_some())
    }

    #[test]
    fn literal_pattern_accepts_only_that_char() {
        let (nfa, fragment) = build("a");

        assert!(accepts(&nfa, &fragment, "a"));
        assert!(!accepts(&nfa, &fragment, "b"));
        assert!(!accepts(&nfa, &fragment, "aa"));
    }

    #[test]
    fn multi_byte_literal_pattern_accepts_that_char() {
        let (nfa, fragment) = build("é");

        assert!(accepts(&nfa, &fragment, "é"));
        assert!(!accepts(&nfa, &fragment, "e"));
    }

    #[test]
    fn concat_pattern_accepts_the_sequence() {
        let (nfa, fragment) = build("ab");

        assert!(accepts(&nfa, &fragment, "ab"));
        assert!(!accepts(&nfa, &fragment, "a"));
        assert!(!accepts(&nfa, &fragment, "ba"));
    }

    #[test]
    fn alternation_pattern_accepts_either_branch() {
        let (nfa, fragment) = build("a|b");

        assert!(accepts(&nfa, &fragment, "a"));
        assert!(accepts(&nfa, &fragment, "b"));
        assert!(!accepts(&nfa, &fragment, "ab"));
    }

    #[test]
    fn plus_pattern_accepts_repeats_but_not_empty() {
        let (nfa, fragment) = build("a+");

        assert!(accepts(&nfa, &fragment, "a"));
        assert!(accepts(&nfa, &fragment, "aaaa"));
        assert!(!accepts(&nfa, &fragment, ""));
        assert!(!accepts(&nfa, &fragment, "ab"));
    }

    #[test]
    fn nested_star_pattern_accepts_zero_inner_repeats() {
        let (nfa, fragment) = build("ab*c");

        assert!(accepts(&nfa, &fragment, "ac"));
        assert!(accepts(&nfa, &fragment, "abbbc"));
        assert!(!accepts(&nfa, &fragment, "bc"));
    }

    #[test]
    fn optional_pattern_accepts_presence_and_absence() {
        let (nfa, fragment) = build("ab?");

        assert!(accepts(&nfa, &fragment, "a"));
        assert!(accepts(&nfa, &fragment, "ab"));
        assert!(!accepts(&nfa, &fragment, "abb"));
    }

    #[test]
    fn class_pattern_accepts_each_member() {
        let (nfa, fragment) = build("[a-c]+");

        assert!(accepts(&nfa, &fragment, "abc"));
        assert!(accepts(&nfa, &fragment, "cab"));
        assert!(!accepts(&nfa, &fragment, "abd"));
    }

    #[test]
    fn digit_class_pattern_accepts_digits() {
        let (nfa, fragment) = build("[0-9]+");

        assert!(accepts(&nfa, &fragment, "042"));
        assert!(!accepts(&nfa, &fragment, "x"));
    }

    #[test]
    fn exact_repetition_accepts_only_the_count() {
        let (nfa, fragment) = build("a{2}");

        assert!(accepts(&nfa, &fragment, "aa"));
        assert!(!accepts(&nfa, &fragment, "a"));
        assert!(!accepts(&nfa, &fragment, "aaa"));
    }

    #[test]
    fn at_least_repetition_accepts_the_count_and_up() {
        let (nfa, fragment) = build("a{2,}");

        assert!(!accepts(&nfa, &fragment, "a"));
        assert!(accepts(&nfa, &fragment, "aa"));
        assert!(accepts(&nfa, &fragment, "aaaaa"));
    }

    #[test]
    fn bounded_repetition_accepts_the_range() {
        let (nfa, fragment) = build("a{2,4}");

        assert!(!accepts(&nfa, &fragment, "a"));
        assert!(accepts(&nfa, &fragment, "aa"));
        assert!(accepts(&nfa, &fragment, "aaa"));
        assert!(accepts(&nfa, &fragment, "aaaa"));
        assert!(!accepts(&nfa, &fragment, "aaaaa"));
    }

    #[test]
    fn escaped_metacharacter_is_a_literal() {
        let (nfa, fragment) = build(r"\+");

        assert!(accepts(&nfa, &fragment, "+"));
        assert!(!accepts(&nfa, &fragment, "a"));
    }

    #[test]
    fn grouping_is_transparent() {
        let (nfa, fragment) = build("(ab)+");

        assert!(accepts(&nfa, &fragment, "ab"));
        assert!(accepts(&nfa, &fragment, "abab"));
        assert!(!accepts(&nfa, &fragment, "aba"));
    }

    #[test]
    fn compile_patterns_keeps_supplied_order() {
        let mut nfa = Nfa::new();

        let result = compile_patterns(&mut nfa, vec!["if", "[a-z]+"])
            .expect("Unexpected error compiling the patterns.");

        assert_eq!(result.len(), 2);
        nfa.subset_construction(result[0].start());
        nfa.subset_construction(result[1].start());
        assert!(accepts(&nfa, &result[0], "if"));
        assert!(!accepts(&nfa, &result[0], "ix"));
        assert!(accepts(&nfa, &result[1], "ix"));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn nullable_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "a*");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn unparsable_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "(a");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn anchored_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "^a");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn word_boundary_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, r"\ba");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn non_greedy_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "a+?");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn oversized_class_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, r"\w+");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn dot_pattern_is_rejected() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, ".");

        assert_matches!(result, Err(_));
    }

    #[test]
    fn error_display_names_the_pattern() {
        let mut nfa = Nfa::new();

        let result = compile_pattern(&mut nfa, "^a");

        let message = result.expect_err("Expected a compile error.").to_string();
        assert!(message.contains("^a"));
    }
}
