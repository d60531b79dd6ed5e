// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser and formatter configuration

use std::fmt;
use std::str::FromStr;

use crate::symbols::{Locale, Symbols};

/// WKT grammar generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// OGC 01-009 and derived formats
    Wkt1,
    /// ISO 19162
    Wkt2,
}

/// What to do with AXIS elements in WKT 1 text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisHandling {
    /// Axes declare order and direction
    Honor,
    /// Axes are parsed but replaced by the default (longitude, latitude) order
    Ignore,
}

/// Grammar dialect and compatibility quirks, chosen once per parser or formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Convention {
    pub dialect: Dialect,
    pub axis_handling: AxisHandling,
    /// PRIMEM and angular PARAMETER values in degrees, linear PARAMETER values
    /// in metres, whatever the enclosing UNIT says (GDAL behaviour)
    pub legacy_units: bool,
}

impl Convention {
    pub const WKT2: Convention = Convention {
        dialect: Dialect::Wkt2,
        axis_handling: AxisHandling::Honor,
        legacy_units: false,
    };

    pub const WKT1: Convention = Convention {
        dialect: Dialect::Wkt1,
        axis_handling: AxisHandling::Honor,
        legacy_units: false,
    };

    pub const WKT1_COMMON_UNITS: Convention = Convention {
        dialect: Dialect::Wkt1,
        axis_handling: AxisHandling::Honor,
        legacy_units: true,
    };

    pub const WKT1_IGNORE_AXES: Convention = Convention {
        dialect: Dialect::Wkt1,
        axis_handling: AxisHandling::Ignore,
        legacy_units: true,
    };

    #[inline]
    pub fn ignores_axes(&self) -> bool {
        self.axis_handling == AxisHandling::Ignore
    }

    #[inline]
    pub fn is_wkt1(&self) -> bool {
        self.dialect == Dialect::Wkt1
    }
}

impl Default for Convention {
    fn default() -> Self {
        Convention::WKT2
    }
}

/// Error returned when a convention name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown WKT convention “{0}”")]
pub struct UnknownConvention(pub String);

impl FromStr for Convention {
    type Err = UnknownConvention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "wkt2" | "wkt_2" => Ok(Convention::WKT2),
            "wkt1" | "wkt_1" => Ok(Convention::WKT1),
            "wkt1_common_units" => Ok(Convention::WKT1_COMMON_UNITS),
            "wkt1_ignore_axes" => Ok(Convention::WKT1_IGNORE_AXES),
            _ => Err(UnknownConvention(s.to_string())),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.dialect, self.axis_handling, self.legacy_units) {
            (Dialect::Wkt2, _, _) => "wkt2",
            (Dialect::Wkt1, AxisHandling::Ignore, _) => "wkt1_ignore_axes",
            (Dialect::Wkt1, AxisHandling::Honor, true) => "wkt1_common_units",
            (Dialect::Wkt1, AxisHandling::Honor, false) => "wkt1",
        };
        f.write_str(name)
    }
}

/// Parser and formatter configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub convention: Convention,
    pub symbols: Symbols,
    pub locale: Locale,
    /// Spaces per nesting level when formatting, 0 for single-line output
    pub indentation: usize,
}

impl Config {
    pub fn new(convention: Convention) -> Self {
        Self {
            convention,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `WKT_CONVENTION` selects the convention (`wkt2`, `wkt1`,
    /// `wkt1_common_units`, `wkt1_ignore_axes`) and `WKT_INDENT` the
    /// indentation. Invalid values fall back to the defaults.
    pub fn from_env() -> Self {
        let convention = std::env::var("WKT_CONVENTION")
            .ok()
            .and_then(|value| match value.parse() {
                Ok(convention) => Some(convention),
                Err(err) => {
                    tracing::warn!(%err, "ignoring WKT_CONVENTION");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            convention,
            indentation: std::env::var("WKT_INDENT")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .unwrap_or(0),
            ..Self::default()
        }
    }

    pub fn with_symbols(mut self, symbols: Symbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Use the given locale; the argument separator becomes ';' when the
    /// locale's decimal separator is ','
    pub fn with_locale(mut self, locale: Locale) -> Self {
        if locale.decimal_separator == self.symbols.separator {
            self.symbols = self.symbols.with_separator(';');
        }
        self.locale = locale;
        self
    }

    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_names() {
        for convention in [
            Convention::WKT2,
            Convention::WKT1,
            Convention::WKT1_COMMON_UNITS,
            Convention::WKT1_IGNORE_AXES,
        ] {
            assert_eq!(convention.to_string().parse::<Convention>(), Ok(convention));
        }
        assert_eq!("WKT1-Ignore-Axes".parse(), Ok(Convention::WKT1_IGNORE_AXES));
        assert!("wkt3".parse::<Convention>().is_err());
    }

    #[test]
    fn test_french_locale_changes_separator() {
        let config = Config::default().with_locale(Locale::FRENCH);
        assert_eq!(config.symbols.separator, ';');
        assert_eq!(config.locale.decimal_separator, ',');
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.convention, Convention::WKT2);
        assert!(!config.convention.ignores_axes());
        assert_eq!(config.indentation, 0);
    }
}
