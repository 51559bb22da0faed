// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate quickcheck;
extern crate regex;
extern crate tyndale;

use tyndale::{discard, emit, emit_with, LexError, Lexer, NfaScanner, Rule, Scan, Token};

lazy_static! {
    // One automaton shared by every lexer instance that scans digits;
    // a constructed scanner is read-only during scanning.
    static ref DIGIT_SCANNER: NfaScanner = NfaScanner::new(vec!["[0-9]+", " +"])
        .expect("Unexpected error compiling the shared scanner.");
}

fn number_lexer() -> Lexer<NfaScanner, i64> {
    Lexer::from_rules(vec![
        Rule::new(
            "[0-9]+",
            emit_with("NUM", |lexeme: &str| {
                lexeme.parse::<i64>().unwrap_or_default()
            }),
        ),
        Rule::new(r"\s+", discard()),
    ]).expect("Unexpected error building the number lexer.")
}

fn keyword_lexer() -> Lexer<NfaScanner, i64> {
    Lexer::from_rules(vec![
        Rule::new("if", emit("IF")),
        Rule::new("[a-z]+", emit("ID")),
        Rule::new(" +", discard()),
    ]).expect("Unexpected error building the keyword lexer.")
}

fn shared_digit_lexer() -> Lexer<&'static NfaScanner, i64> {
    Lexer::new(
        &*DIGIT_SCANNER,
        vec![
            emit_with("NUM", |lexeme: &str| {
                lexeme.parse::<i64>().unwrap_or_default()
            }),
            discard(),
        ],
    ).expect("Unexpected error building the shared-scanner lexer.")
}

fn tokens<S: Scan>(lexer: &mut Lexer<S, i64>) -> Vec<Token<i64>> {
    lexer
        .by_ref()
        .map(|r| r.expect("Unexpected lexer error.").into_inner())
        .collect()
}

#[test]
fn lexer_round_trips_numbers_and_suppresses_whitespace() {
    let mut sut = number_lexer();
    sut.set_source("12 34");

    let result = tokens(&mut sut);

    assert_eq!(
        result,
        vec![
            Token::new("NUM", "12", Some(12)),
            Token::new("NUM", "34", Some(34)),
        ]
    );
}

#[test]
fn lexer_on_empty_source_yields_no_tokens() {
    let mut sut = number_lexer();
    sut.set_source("");

    let result = tokens(&mut sut);

    assert!(result.is_empty());
}

#[test]
fn lexer_reports_no_match_and_terminates() {
    let mut sut = number_lexer();
    sut.set_source("12 !");

    let first = sut.next();
    let second = sut.next();
    let third = sut.next();

    assert_matches!(first, Some(Ok(ref span)) if span.value_ref().lexeme() == "12");
    assert_matches!(second, Some(Err(LexError::NoMatch { position: 3 })));
    assert!(third.is_none());
    assert_eq!(sut.position(), 3.into());
}

#[test]
fn lexer_prefers_the_longest_match_over_a_keyword() {
    let mut sut = keyword_lexer();
    sut.set_source("ifx if");

    let result = tokens(&mut sut);

    assert_eq!(
        result,
        vec![
            Token::new("ID", "ifx", None),
            Token::new("IF", "if", None),
        ]
    );
}

#[test]
fn lexer_prefers_the_earlier_rule_on_equal_length() {
    let mut sut = keyword_lexer();
    sut.set_source("if");

    let result = tokens(&mut sut);

    assert_eq!(result, vec![Token::new("IF", "if", None)]);
}

#[test]
fn peek_is_idempotent_and_preserves_the_position() {
    let mut sut = number_lexer();
    sut.set_source("12 34");
    let before = sut.position();

    let first = sut.peek(1);
    let second = sut.peek(1);

    assert_eq!(first, second);
    assert_eq!(sut.position(), before);
    assert_matches!(first, Some(ref span) if span.value_ref().lexeme() == "12");
}

#[test]
fn peek_skips_suppressed_tokens() {
    let mut sut = number_lexer();
    sut.set_source(" 12");

    let result = sut.peek(1);

    assert_matches!(result, Some(ref span) if span.value_ref().lexeme() == "12");
}

#[test]
fn peek_finds_the_nth_token() {
    let mut sut = number_lexer();
    sut.set_source("12 34");

    let result = sut.peek(2);

    assert_matches!(result, Some(ref span) if span.value_ref().lexeme() == "34");
}

#[test]
fn peek_beyond_the_last_token_is_none() {
    let mut sut = number_lexer();
    sut.set_source("12 34");

    assert!(sut.peek(3).is_none());
}

#[test]
fn peek_then_iteration_yields_every_token() {
    let mut sut = number_lexer();
    sut.set_source("12 34");

    sut.peek(2);
    let result = tokens(&mut sut);

    assert_eq!(result.len(), 2);
}

#[test]
fn set_source_restarts_the_lexer() {
    let mut sut = number_lexer();
    sut.set_source("12");
    tokens(&mut sut);

    sut.set_source("7");
    let result = tokens(&mut sut);

    assert_eq!(result, vec![Token::new("NUM", "7", Some(7))]);
}

#[test]
fn set_source_utf8_decodes_a_byte_reader() {
    let mut sut = number_lexer();

    sut.set_source_utf8(&b"12 34"[..])
        .expect("Unexpected error decoding the source.");
    let result = tokens(&mut sut);

    assert_eq!(result.len(), 2);
}

#[test]
fn independent_lexers_share_one_scanner() {
    let mut one = shared_digit_lexer();
    let mut two = shared_digit_lexer();
    one.set_source("12 34");
    two.set_source("5");

    let first_of_one = one.next();
    let first_of_two = two.next();
    let second_of_one = one.next();

    assert_matches!(first_of_one, Some(Ok(ref span)) if span.value_ref().lexeme() == "12");
    assert_matches!(first_of_two, Some(Ok(ref span)) if span.value_ref().lexeme() == "5");
    assert_matches!(second_of_one, Some(Ok(ref span)) if span.value_ref().lexeme() == "34");
}

#[test]
fn token_spans_cover_the_lexemes() {
    let mut sut = number_lexer();
    sut.set_source("12 34");

    let spans: Vec<_> = sut.by_ref()
        .map(|r| r.expect("Unexpected lexer error."))
        .collect();

    assert_eq!(spans[0].start(), 0.into());
    assert_eq!(spans[0].end(), 2.into());
    assert_eq!(spans[1].start(), 3.into());
    assert_eq!(spans[1].end(), 5.into());
}

#[test]
fn nfa_longest_match_agrees_with_the_regex_crate() {
    let re = regex::Regex::new("^[a-z]+").expect("Unexpected error parsing the regex.");
    let scanner =
        NfaScanner::new(vec!["[a-z]+"]).expect("Unexpected error compiling the pattern.");

    for input in &["abc", "abc123", "a", "xyzzy!", "abcXYZ", "123", ""] {
        let expected = re.find(input).map(|m| m.end());

        let records = scanner.find_records(input, 0);
        let result = records
            .iter()
            .rev()
            .find(|r| {
                !scanner.is_failure(r.state()) && scanner.successful_id(r.state()).is_some()
            })
            .map(|r| r.end());

        assert_eq!(result, expected, "disagreement on input {:?}", input);
    }
}

quickcheck! {
    fn prop_digit_runs_round_trip(seed: Vec<u8>) -> bool {
        let input: String = seed.iter()
            .map(|b| match b % 4 {
                0 => ' ',
                _ => char::from(b'0' + (b % 10)),
            })
            .collect();

        let mut lexer = shared_digit_lexer();
        lexer.set_source(input.as_str());
        let result: Result<Vec<_>, _> = lexer
            .map(|r| r.map(|span| span.into_inner().lexeme().to_string()))
            .collect();

        let lexemes = match result {
            Ok(lexemes) => lexemes,
            Err(_) => return false,
        };
        let expected: Vec<String> = input
            .split(' ')
            .filter(|run| !run.is_empty())
            .map(|run| run.to_string())
            .collect();

        lexemes == expected
    }
}
