// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for WKT parsing
//!
//! Every fatal error carries the character offset where parsing stopped.
//! Unknown elements are not errors: they are collected in
//! [`Warnings`](crate::warnings::Warnings) instead.

use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the parsing of a WKT object
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed bracket or quote structure
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A mandatory child element is absent
    #[error("Missing {keyword} element in {parent} (offset {offset})")]
    MissingElement {
        keyword: String,
        parent: String,
        offset: usize,
    },

    /// Unrecognized keyword or value of the wrong type
    #[error("Can not parse {element} at offset {offset}: {message}")]
    UnparsableObject {
        element: String,
        offset: usize,
        message: String,
    },

    /// A unit can not be converted to the unit required by a field
    #[error("Ambiguous or lossy conversion in {element} at offset {offset}: {message}")]
    AmbiguousOrLossyConversion {
        element: String,
        offset: usize,
        message: String,
    },

    /// Any of the above, raised while parsing the named root element
    #[error("Can not parse “{root}”: {source}")]
    InRoot {
        root: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a syntax error
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create a missing element error
    pub fn missing(keyword: impl Into<String>, parent: impl Into<String>, offset: usize) -> Self {
        Error::MissingElement {
            keyword: keyword.into(),
            parent: parent.into(),
            offset,
        }
    }

    /// Create an unparsable object error
    pub fn unparsable(element: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Error::UnparsableObject {
            element: element.into(),
            offset,
            message: message.into(),
        }
    }

    /// Create a unit conversion error
    pub fn lossy(element: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Error::AmbiguousOrLossyConversion {
            element: element.into(),
            offset,
            message: message.into(),
        }
    }

    /// Attach the name of the root element being parsed
    pub fn in_root(self, root: Option<&str>) -> Self {
        match root {
            Some(root) if !matches!(self, Error::InRoot { .. }) => Error::InRoot {
                root: root.to_string(),
                source: Box::new(self),
            },
            _ => self,
        }
    }

    /// Character offset of the failure in the source text
    pub fn offset(&self) -> usize {
        match self {
            Error::Syntax { offset, .. }
            | Error::MissingElement { offset, .. }
            | Error::UnparsableObject { offset, .. }
            | Error::AmbiguousOrLossyConversion { offset, .. } => *offset,
            Error::InRoot { source, .. } => source.offset(),
        }
    }

    /// Name of the root element, if known when the failure occurred
    pub fn root_element(&self) -> Option<&str> {
        match self {
            Error::InRoot { root, .. } => Some(root),
            _ => None,
        }
    }

    /// The error without its root element context
    pub fn kind(&self) -> &Error {
        match self {
            Error::InRoot { source, .. } => source.kind(),
            other => other,
        }
    }
}
