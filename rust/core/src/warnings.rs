// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Warnings collector
//!
//! Accumulates the non-fatal problems found while parsing one object:
//! unknown elements (with the keywords of the elements that enclosed them)
//! and other recoverable anomalies. A fresh collector is created for each
//! `parse_object` call and threaded through the handlers.

use std::fmt;

use crate::symbols::Language;

/// A recoverable anomaly other than an unknown element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A scalar value that no handler consumed
    UnexpectedValue { value: String, element: String },
    /// Projection or operation method absent from the parameter registry
    UnknownMethod { name: String },
    /// Parameter not declared by the operation method
    UnknownParameter { name: String, method: String },
}

impl Notice {
    fn render(&self, language: Language) -> String {
        match (self, language) {
            (Notice::UnexpectedValue { value, element }, Language::English) => {
                format!("Unexpected value “{}” in {}.", value, element)
            }
            (Notice::UnexpectedValue { value, element }, Language::French) => {
                format!("Valeur inattendue « {} » dans {}.", value, element)
            }
            (Notice::UnknownMethod { name }, Language::English) => {
                format!("Unknown operation method “{}”.", name)
            }
            (Notice::UnknownMethod { name }, Language::French) => {
                format!("Méthode d’opération inconnue « {} ».", name)
            }
            (Notice::UnknownParameter { name, method }, Language::English) => {
                format!("Unknown parameter “{}” for method “{}”.", name, method)
            }
            (Notice::UnknownParameter { name, method }, Language::French) => {
                format!("Paramètre « {} » inconnu pour la méthode « {} ».", name, method)
            }
        }
    }
}

/// Non-fatal problems found while parsing one object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    root_element: Option<String>,
    /// Unknown keyword -> enclosing element keywords, both in order of discovery
    unknown: Vec<(String, Vec<String>)>,
    notices: Vec<Notice>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the name of the root element (first one wins)
    pub fn set_root_element(&mut self, name: &str) {
        if self.root_element.is_none() {
            self.root_element = Some(name.to_string());
        }
    }

    /// Record an element that the enclosing handler did not recognize
    pub fn add_unknown_element(&mut self, keyword: &str, parent: &str) {
        tracing::debug!(keyword, parent, "ignoring unknown WKT element");
        match self.unknown.iter_mut().find(|(k, _)| k == keyword) {
            Some((_, parents)) => {
                if !parents.iter().any(|p| p == parent) {
                    parents.push(parent.to_string());
                }
            }
            None => self
                .unknown
                .push((keyword.to_string(), vec![parent.to_string()])),
        }
    }

    pub fn add_notice(&mut self, notice: Notice) {
        tracing::debug!(?notice, "WKT parsing notice");
        self.notices.push(notice);
    }

    /// True if nothing was recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.unknown.is_empty() && self.notices.is_empty()
    }

    /// Name of the root element, if it had one
    pub fn root_element(&self) -> Option<&str> {
        self.root_element.as_deref()
    }

    /// Keywords of unknown elements in order of discovery
    pub fn unknown_elements(&self) -> Vec<&str> {
        self.unknown.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Keywords of the elements that contained the given unknown element
    pub fn unknown_element_locations(&self, keyword: &str) -> Option<&[String]> {
        self.unknown
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, parents)| parents.as_slice())
    }

    /// Anomalies other than unknown elements
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// `None` if empty, so that callers get a report only when there is something to say
    pub(crate) fn into_report(self) -> Option<Warnings> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Multi-line report in the given language
    pub fn to_string_in(&self, language: Language) -> String {
        let mut out = String::new();
        match (&self.root_element, language) {
            (Some(root), Language::English) => out.push_str(&format!(
                "Parsing of “{}” done, but some elements were ignored.\n",
                root
            )),
            (None, Language::English) => {
                out.push_str("Parsing done, but some elements were ignored.\n")
            }
            (Some(root), Language::French) => out.push_str(&format!(
                "La lecture de « {} » a été faite, mais en ignorant certains éléments.\n",
                root
            )),
            (None, Language::French) => {
                out.push_str("La lecture a été faite, mais en ignorant certains éléments.\n")
            }
        }
        if !self.unknown.is_empty() {
            out.push_str(match language {
                Language::English => " • The text contains unknown elements:\n",
                Language::French => " • Le texte contient des éléments inconnus :\n",
            });
            for (keyword, parents) in &self.unknown {
                let parents = parents.join(", ");
                out.push_str(&match language {
                    Language::English => format!("    ‣ “{}” in {}.\n", keyword, parents),
                    Language::French => format!("    ‣ « {} » dans {}.\n", keyword, parents),
                });
            }
        }
        for notice in &self.notices {
            out.push_str(" • ");
            out.push_str(&notice.render(language));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_in(Language::English))
    }
}
