// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Decoding UTF-8 input into the source string for a scan session.
//!
//! The lexer owns one source string per scan session. This module
//! decodes a byte reader into such a string one utf8 encoded `char` at
//! a time so that malformed input is reported precisely instead of
//! being discovered mid-scan.

use encode_unicode::{U8UtfExt, Utf8Char};
use std::io;
use std::io::prelude::*;

/// Extension trait for readers to decode them into a lexer source.
///
/// Although there is a default implementation for every reader, there
/// will likely be bad performance on any unbuffered readers because the
/// decoding will use many single-byte reads.
pub trait Utf8Source: Read + Sized {
    /// Decode the whole reader as utf8 into a source string.
    ///
    /// # Errors
    /// In addition to errors from the underlying reader the decoding
    /// produces the following errors:
    ///
    /// - `ErrorKind::UnexpectedEof`: the reader ended in the middle of a
    /// multibyte utf8 `char`
    /// - `ErrorKind::InvalidData`: a byte or byte sequence from the
    /// reader was not a valid utf8 encoded `char`
    fn read_source(self) -> io::Result<String>;
}

impl<R: Read> Utf8Source for R {
    fn read_source(self) -> io::Result<String> {
        let mut bytes = self.bytes();
        let mut source = String::new();

        while let Some(first) = bytes.next() {
            source.push(decode_utf8_char(first?, &mut bytes)?);
        }

        Ok(source)
    }
}

fn decode_utf8_char<I>(first: u8, iter: &mut I) -> io::Result<char>
where
    I: Iterator<Item = io::Result<u8>>,
{
    let count = first.extra_utf8_bytes().map_err(map_invalid_data)?;

    let mut buffer = [first, 0, 0, 0];
    for index in 1..(count + 1) {
        buffer[index] = decode_continuation_byte(iter)?;
    }

    Utf8Char::from_array(buffer)
        .map_err(map_invalid_data)
        .map(|c| c.to_char())
}

fn map_invalid_data<E>(error: E) -> io::Error
where
    E: Into<Box<::std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}

fn decode_continuation_byte<I>(iter: &mut I) -> io::Result<u8>
where
    I: Iterator<Item = io::Result<u8>>,
{
    use std::io::{Error, ErrorKind};

    match iter.next() {
        None => Err(Error::new(
            ErrorKind::UnexpectedEof,
            "Too few bytes for utf8 character.",
        )),
        Some(Err(e)) => Err(e),
        Some(Ok(byte)) => Ok(byte),
    }
}
