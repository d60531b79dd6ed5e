// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT tokenizer using nom
//!
//! Splits the text into a tree of [`Element`]s. Leaf tokens (keywords,
//! numbers, dates) are recognized with nom combinators; bracket and quote
//! matching is driven by the [`Symbols`] table so that error offsets point
//! at the offending character. All offsets are byte offsets in the UTF-8
//! source text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::element::{Child, Element, Value};
use crate::error::{Error, Result};
use crate::symbols::{Locale, Symbols};

/// Parse keyword: GEOGCS, AXIS, Ext1
fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

/// Recognize date: 1858-11-17, 1858-11-17T00:00:00.0Z, 2000-01-01T12:00:00+01:00
fn date_literal(input: &str) -> IResult<&str, &str> {
    let digits = |n: usize| take_while_m_n(n, n, |c: char| c.is_ascii_digit());
    recognize(tuple((
        digits(4),
        char('-'),
        digits(2),
        char('-'),
        digits(2),
        opt(tuple((
            one_of("Tt"),
            take_while1(|c: char| c.is_ascii_digit() || c == ':' || c == '.'),
            opt(alt((
                tag("Z"),
                tag("z"),
                recognize(tuple((one_of("+-"), digit1, opt(pair(char(':'), digit1))))),
            ))),
        ))),
    )))(input)
}

/// Recognize number: 6378137, -20.0, 4.84813681109536e-06, .5, 2.
/// The decimal separator comes from the locale.
fn number(decimal: char) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input: &str| {
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char(decimal), digit0)))),
                recognize(pair(char(decimal), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        )))(input)
    }
}

/// Parse an ISO 8601 date or date-time, assuming UTC when no offset is given
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    let naive = text.trim_end_matches(['Z', 'z']);
    if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Convert a recognized numeric literal to f64
fn parse_number(literal: &str, decimal: char) -> Option<f64> {
    let literal = literal.strip_prefix('+').unwrap_or(literal);
    // Integer fast path (codes, ORDER, datum types)
    if literal.len() < 16 && literal.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        if let Ok(n) = lexical_core::parse::<i64>(literal.as_bytes()) {
            return Some(n as f64);
        }
    }
    if decimal == '.' {
        fast_float::parse(literal).ok()
    } else {
        fast_float::parse(literal.replace(decimal, ".")).ok()
    }
}

/// Recursive bracket matcher over one source text
struct Tokenizer<'a> {
    text: &'a str,
    symbols: &'a Symbols,
    locale: &'a Locale,
}

impl<'a> Tokenizer<'a> {
    #[inline]
    fn offset(&self, rest: &str) -> usize {
        self.text.len() - rest.len()
    }

    #[inline]
    fn skip_ws(&self, pos: usize) -> usize {
        match ws(&self.text[pos..]) {
            Ok((rest, _)) => self.offset(rest),
            Err(_) => pos,
        }
    }

    #[inline]
    fn peek(&self, pos: usize) -> Option<char> {
        self.text[pos..].chars().next()
    }

    /// Parse `KEYWORD[child, child, ...]` starting at `pos`
    fn element(&self, pos: usize) -> Result<(Element, usize)> {
        let (after_keyword, name) = keyword(&self.text[pos..])
            .map_err(|_| Error::syntax(pos, "expected an element keyword"))?;
        let open_pos = self.skip_ws(self.offset(after_keyword));
        let open = self.peek(open_pos);
        let close = open
            .and_then(|c| self.symbols.closing_bracket(c))
            .ok_or_else(|| {
                Error::syntax(open_pos, format!("expected an opening bracket after {}", name))
            })?;
        let unmatched = || Error::syntax(open_pos, format!("unmatched bracket in {}", name));

        let mut cursor = open_pos + open.map_or(1, char::len_utf8);
        let mut children = Vec::new();
        loop {
            cursor = self.skip_ws(cursor);
            match self.peek(cursor) {
                None => return Err(unmatched()),
                Some(c) if c == close && children.is_empty() => {
                    cursor += c.len_utf8();
                    break;
                }
                _ => {}
            }
            let (child, next) = self.value(cursor)?;
            children.push(child);
            cursor = self.skip_ws(next);
            match self.peek(cursor) {
                None => return Err(unmatched()),
                Some(c) if c == self.symbols.separator => cursor += c.len_utf8(),
                Some(c) if c == close => {
                    cursor += c.len_utf8();
                    break;
                }
                Some(c) if self.symbols.is_close_bracket(c) => {
                    return Err(Error::syntax(
                        cursor,
                        format!("expected '{}' to close {} but found '{}'", close, name, c),
                    ));
                }
                Some(c) => {
                    return Err(Error::syntax(cursor, format!("unexpected character '{}'", c)));
                }
            }
        }
        Ok((Element::new(name, pos, cursor, children), cursor))
    }

    /// Parse one child value starting at `pos`
    fn value(&self, pos: usize) -> Result<(Child, usize)> {
        let rest = &self.text[pos..];
        let first = rest
            .chars()
            .next()
            .ok_or_else(|| Error::syntax(pos, "unexpected end of text"))?;

        if let Some(close) = self.symbols.closing_quote(first) {
            let (text, next) = self.quoted(pos, first, close)?;
            return Ok((child(Value::Text(text), pos), next));
        }

        if first.is_alphabetic() || first == '_' {
            let (after, word) = keyword(rest).map_err(|_| Error::syntax(pos, "invalid word"))?;
            let lookahead = self.skip_ws(self.offset(after));
            if self
                .peek(lookahead)
                .is_some_and(|c| self.symbols.closing_bracket(c).is_some())
            {
                let (element, next) = self.element(pos)?;
                return Ok((child(Value::Element(element), pos), next));
            }
            return Ok((child(Value::Word(word.to_string()), pos), self.offset(after)));
        }

        if let Ok((after, literal)) = date_literal(rest) {
            let date = parse_date(literal)
                .ok_or_else(|| Error::syntax(pos, format!("invalid date “{}”", literal)))?;
            return Ok((child(Value::Date(date), pos), self.offset(after)));
        }

        let decimal = self.locale.decimal_separator;
        if let Ok((after, literal)) = number(decimal)(rest) {
            let n = parse_number(literal, decimal)
                .ok_or_else(|| Error::syntax(pos, format!("invalid number “{}”", literal)))?;
            return Ok((child(Value::Number(n), pos), self.offset(after)));
        }

        Err(Error::syntax(pos, format!("unexpected character '{}'", first)))
    }

    /// Parse a quoted string; a doubled closing quote stands for one quote character
    fn quoted(&self, pos: usize, open: char, close: char) -> Result<(String, usize)> {
        let mut buf = [0u8; 4];
        let needle = close.encode_utf8(&mut buf).as_bytes().to_vec();
        let mut cursor = pos + open.len_utf8();
        let mut text = String::new();
        loop {
            let haystack = &self.text.as_bytes()[cursor..];
            let found = if needle.len() == 1 {
                memchr::memchr(needle[0], haystack)
            } else {
                memchr::memmem::find(haystack, &needle)
            };
            let Some(found) = found else {
                return Err(Error::syntax(pos, "unterminated quoted string"));
            };
            text.push_str(&self.text[cursor..cursor + found]);
            cursor += found + needle.len();
            if self.text[cursor..].starts_with(close) && open == close {
                text.push(close);
                cursor += needle.len();
                continue;
            }
            return Ok((text, cursor));
        }
    }
}

#[inline]
fn child(value: Value, offset: usize) -> Child {
    Child { value, offset }
}

/// Tokenize the element starting at `start` (leading whitespace allowed).
/// Returns the element and the offset just after its closing bracket.
pub fn tokenize(
    text: &str,
    start: usize,
    symbols: &Symbols,
    locale: &Locale,
) -> Result<(Element, usize)> {
    if start > text.len() || !text.is_char_boundary(start) {
        return Err(Error::syntax(start, "start position out of range"));
    }
    let tokenizer = Tokenizer {
        text,
        symbols,
        locale,
    };
    let pos = tokenizer.skip_ws(start);
    if pos >= text.len() {
        return Err(Error::syntax(pos, "no element to parse"));
    }
    tokenizer.element(pos)
}

/// Skip whitespace and `;` separators between consecutive definitions
pub fn skip_separators(text: &str, pos: usize) -> usize {
    let rest = &text[pos.min(text.len())..];
    let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
    text.len() - trimmed.len()
}

/// Sequential scanner over a text holding several WKT definitions
pub struct ElementScanner<'a> {
    content: &'a str,
    position: usize,
    symbols: Symbols,
    locale: Locale,
}

impl<'a> ElementScanner<'a> {
    /// Create a new scanner with default symbols and root locale
    pub fn new(content: &'a str) -> Self {
        Self::with_symbols(content, Symbols::default(), Locale::ROOT)
    }

    pub fn with_symbols(content: &'a str, symbols: Symbols, locale: Locale) -> Self {
        Self {
            content,
            position: 0,
            symbols,
            locale,
        }
    }

    /// Offset where the next scan starts
    pub fn position(&self) -> usize {
        self.position
    }

    /// Tokenize the next definition. After an error the scanner is exhausted.
    pub fn next_element(&mut self) -> Option<Result<Element>> {
        let start = skip_separators(self.content, self.position);
        if start >= self.content.len() {
            self.position = self.content.len();
            return None;
        }
        match tokenize(self.content, start, &self.symbols, &self.locale) {
            Ok((element, end)) => {
                self.position = end;
                Some(Ok(element))
            }
            Err(e) => {
                self.position = self.content.len();
                Some(Err(e))
            }
        }
    }
}
