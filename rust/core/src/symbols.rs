// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symbol table and locale
//!
//! Brackets, quotes and the separator are data so that the tokenizer and
//! the formatter can share one grammar description. The first bracket pair
//! and the first quote pair are the ones used for output.

use smallvec::{smallvec, SmallVec};

/// Bracket, quote and separator characters of a WKT dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    /// Accepted (open, close) bracket pairs
    pub brackets: SmallVec<[(char, char); 2]>,
    /// Accepted (open, close) quote pairs
    pub quotes: SmallVec<[(char, char); 2]>,
    /// Argument separator
    pub separator: char,
}

impl Default for Symbols {
    /// Square and round brackets, straight and curly quotes, comma separator
    fn default() -> Self {
        Self {
            brackets: smallvec![('[', ']'), ('(', ')')],
            quotes: smallvec![('"', '"'), ('“', '”')],
            separator: ',',
        }
    }
}

impl Symbols {
    /// Same as default but output uses curly quotes
    pub fn curly_quotes() -> Self {
        Self {
            quotes: smallvec![('“', '”'), ('"', '"')],
            ..Self::default()
        }
    }

    /// Only square brackets are accepted
    pub fn square_brackets() -> Self {
        Self {
            brackets: smallvec![('[', ']')],
            ..Self::default()
        }
    }

    /// Replace the argument separator (needed when the locale uses ',' as decimal separator)
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Closing bracket matching the given opening bracket
    #[inline]
    pub fn closing_bracket(&self, open: char) -> Option<char> {
        self.brackets.iter().find(|(o, _)| *o == open).map(|(_, c)| *c)
    }

    /// Closing quote matching the given opening quote
    #[inline]
    pub fn closing_quote(&self, open: char) -> Option<char> {
        self.quotes.iter().find(|(o, _)| *o == open).map(|(_, c)| *c)
    }

    #[inline]
    pub fn is_close_bracket(&self, c: char) -> bool {
        self.brackets.iter().any(|(_, close)| *close == c)
    }

    /// Brackets used when formatting
    #[inline]
    pub fn output_brackets(&self) -> (char, char) {
        self.brackets[0]
    }

    /// Quotes used when formatting
    #[inline]
    pub fn output_quotes(&self) -> (char, char) {
        self.quotes[0]
    }
}

/// Language of human-readable reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

/// Number formatting conventions of the authoring locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub decimal_separator: char,
    pub language: Language,
}

impl Locale {
    /// Locale-neutral conventions mandated by the WKT standards
    pub const ROOT: Locale = Locale {
        decimal_separator: '.',
        language: Language::English,
    };

    /// French conventions (comma decimal separator)
    pub const FRENCH: Locale = Locale {
        decimal_separator: ',',
        language: Language::French,
    };
}

impl Default for Locale {
    fn default() -> Self {
        Locale::ROOT
    }
}
