// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element tree node
//!
//! One bracketed clause of the source text: a keyword, the ordered child
//! values and the source offsets. Handlers consume children with the
//! `pull_*` methods; whatever is still present when the element is
//! [closed](Element::close) is reported to the warnings collector.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::warnings::{Notice, Warnings};

/// A child value of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string, quotes removed
    Text(String),
    /// Numeric literal
    Number(f64),
    /// Unquoted date literal such as `1858-11-17T00:00:00Z`
    Date(DateTime<Utc>),
    /// Unquoted word such as `EAST` or `Cartesian`
    Word(String),
    /// Nested element
    Element(Element),
}

impl Value {
    /// Short textual form used in warnings
    fn describe(&self) -> String {
        match self {
            Value::Text(s) | Value::Word(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Date(d) => d.to_rfc3339(),
            Value::Element(e) => e.keyword.clone(),
        }
    }
}

/// A child value with the offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub value: Value,
    pub offset: usize,
}

/// Parsed-but-not-interpreted bracketed clause
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Keyword as written in the source
    pub keyword: String,
    /// Offset of the first keyword character
    pub start: usize,
    /// Offset just after the closing bracket
    pub end: usize,
    /// Children in source order; consumed children become `None`
    children: Vec<Option<Child>>,
}

impl Element {
    pub fn new(keyword: impl Into<String>, start: usize, end: usize, children: Vec<Child>) -> Self {
        Self {
            keyword: keyword.into(),
            start,
            end,
            children: children.into_iter().map(Some).collect(),
        }
    }

    /// Case-insensitive keyword test
    #[inline]
    pub fn is(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| k.eq_ignore_ascii_case(&self.keyword))
    }

    /// Number of children not yet consumed
    pub fn remaining(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    /// Take the first remaining child accepted by `select`
    fn take_first<T>(&mut self, mut select: impl FnMut(&Value) -> Option<T>) -> Option<(T, usize)> {
        for slot in self.children.iter_mut() {
            let found = match slot {
                Some(child) => select(&child.value).map(|v| (v, child.offset)),
                None => None,
            };
            if found.is_some() {
                *slot = None;
                return found;
            }
        }
        None
    }

    /// Take the first remaining nested element accepted by `select`
    fn take_element(&mut self, mut select: impl FnMut(&Element) -> bool) -> Option<Element> {
        let index = self.children.iter().position(|slot| match slot {
            Some(Child {
                value: Value::Element(e),
                ..
            }) => select(e),
            _ => false,
        })?;
        match self.children[index].take() {
            Some(Child {
                value: Value::Element(e),
                ..
            }) => Some(e),
            _ => None,
        }
    }

    /// Pull the next quoted string
    pub fn pull_text(&mut self, what: &str) -> Result<String> {
        self.pull_optional_text()
            .ok_or_else(|| Error::missing(what, &self.keyword, self.start))
    }

    pub fn pull_optional_text(&mut self) -> Option<String> {
        self.take_first(|v| match v {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        })
        .map(|(s, _)| s)
    }

    /// First remaining quoted string, without consuming it
    pub fn name_hint(&self) -> Option<&str> {
        self.children.iter().flatten().find_map(|c| match &c.value {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Pull every remaining number
    pub fn pull_numbers(&mut self) -> Vec<f64> {
        let mut out = Vec::new();
        while let Some(n) = self.pull_optional_number() {
            out.push(n);
        }
        out
    }

    /// Pull the next number
    pub fn pull_number(&mut self, what: &str) -> Result<f64> {
        self.pull_optional_number()
            .ok_or_else(|| Error::missing(what, &self.keyword, self.start))
    }

    pub fn pull_optional_number(&mut self) -> Option<f64> {
        self.take_first(|v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .map(|(n, _)| n)
    }

    /// Pull the next number, which must be an integer
    pub fn pull_integer(&mut self, what: &str) -> Result<i64> {
        let (n, offset) = self
            .take_first(|v| match v {
                Value::Number(n) => Some(*n),
                _ => None,
            })
            .ok_or_else(|| Error::missing(what, &self.keyword, self.start))?;
        if n.fract() != 0.0 || !n.is_finite() {
            return Err(Error::unparsable(
                &self.keyword,
                offset,
                format!("{} must be an integer, got {}", what, n),
            ));
        }
        Ok(n as i64)
    }

    /// Pull the next unquoted word with its offset
    pub fn pull_word(&mut self) -> Option<(String, usize)> {
        self.take_first(|v| match v {
            Value::Word(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Pull an identifier code, written either as text, number or word
    pub fn pull_code(&mut self, what: &str) -> Result<String> {
        self.take_first(|v| match v {
            Value::Text(s) | Value::Word(s) => Some(s.clone()),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .map(|(s, _)| s)
        .ok_or_else(|| Error::missing(what, &self.keyword, self.start))
    }

    /// Pull a date, either as an unquoted date literal or a quoted ISO 8601 string
    pub fn pull_date(&mut self, what: &str) -> Result<DateTime<Utc>> {
        let keyword = self.keyword.clone();
        let (value, offset) = self
            .take_first(|v| match v {
                Value::Date(_) | Value::Text(_) => Some(v.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::missing(what, &keyword, self.start))?;
        match value {
            Value::Date(d) => Ok(d),
            Value::Text(s) => crate::parser::parse_date(&s)
                .ok_or_else(|| Error::unparsable(keyword, offset, format!("invalid date “{}”", s))),
            _ => Err(Error::missing(what, keyword, self.start)),
        }
    }

    /// Pull the first nested element whose keyword is one of `keywords`
    pub fn pull_element(&mut self, keywords: &[&str]) -> Option<Element> {
        self.take_element(|e| e.is(keywords))
    }

    /// Same as [`pull_element`](Self::pull_element) but the element is mandatory
    pub fn require_element(&mut self, keywords: &[&str]) -> Result<Element> {
        self.pull_element(keywords).ok_or_else(|| {
            Error::missing(
                keywords.first().copied().unwrap_or("?"),
                &self.keyword,
                self.start,
            )
        })
    }

    /// Pull every nested element whose keyword is one of `keywords`
    pub fn pull_all(&mut self, keywords: &[&str]) -> Vec<Element> {
        let mut out = Vec::new();
        while let Some(e) = self.pull_element(keywords) {
            out.push(e);
        }
        out
    }

    /// Pull the first nested element accepted by the predicate on its keyword
    pub fn pull_element_where(&mut self, mut accept: impl FnMut(&str) -> bool) -> Option<Element> {
        self.take_element(|e| accept(&e.keyword))
    }

    /// Report the children that nobody consumed
    pub fn close(self, warnings: &mut Warnings) {
        for child in self.children.into_iter().flatten() {
            match child.value {
                Value::Element(e) => warnings.add_unknown_element(&e.keyword, &self.keyword),
                other => warnings.add_notice(Notice::UnexpectedValue {
                    value: other.describe(),
                    element: self.keyword.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(value: Value) -> Child {
        Child { value, offset: 0 }
    }

    fn sample() -> Element {
        Element::new(
            "PRIMEM",
            0,
            30,
            vec![
                child(Value::Text("Greenwich".into())),
                child(Value::Number(0.0)),
                child(Value::Element(Element::new("Intruder", 20, 29, vec![]))),
                child(Value::Element(Element::new("AUTHORITY", 10, 19, vec![]))),
            ],
        )
    }

    #[test]
    fn test_pull_by_type() {
        let mut e = sample();
        assert_eq!(e.pull_number("longitude").unwrap(), 0.0);
        assert_eq!(e.pull_text("name").unwrap(), "Greenwich");
        assert!(e.pull_optional_text().is_none());
        assert!(e.pull_element(&["authority"]).is_some());
        assert_eq!(e.remaining(), 1);
    }

    #[test]
    fn test_missing_element() {
        let mut e = sample();
        let err = e.require_element(&["UNIT"]).unwrap_err();
        assert_eq!(
            err,
            Error::MissingElement {
                keyword: "UNIT".into(),
                parent: "PRIMEM".into(),
                offset: 0
            }
        );
    }

    #[test]
    fn test_close_reports_leftovers() {
        let mut e = sample();
        e.pull_text("name").unwrap();
        e.pull_number("longitude").unwrap();
        e.pull_element(&["AUTHORITY"]);
        let mut warnings = Warnings::new();
        e.close(&mut warnings);
        assert_eq!(warnings.unknown_elements(), vec!["Intruder"]);
        assert!(warnings.notices().is_empty());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let mut e = Element::new("ORDER", 5, 13, vec![child(Value::Number(1.5))]);
        assert!(matches!(
            e.pull_integer("order"),
            Err(Error::UnparsableObject { .. })
        ));
    }

    #[test]
    fn test_code_from_number() {
        let mut e = Element::new("ID", 0, 10, vec![child(Value::Number(4326.0))]);
        assert_eq!(e.pull_code("code").unwrap(), "4326");
    }
}
