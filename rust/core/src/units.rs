// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Units of measurement and the unit registry
//!
//! WKT declares units as a name plus a conversion factor to the SI base
//! unit (metre, radian, second) or to unity. The registry maps those pairs
//! to canonical units so that `UNIT["Degrees", 0.0174532925199433]` and
//! `ANGLEUNIT["degree", 0.017453292519943295]` are the same unit.

use std::borrow::Cow;
use std::f64::consts::PI;

use rustc_hash::FxHashMap;

/// Physical quantity measured by a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitKind {
    Length,
    Angle,
    Scale,
    Time,
    Parametric,
}

impl UnitKind {
    /// WKT 2 keyword for units of this kind
    pub fn wkt2_keyword(self) -> &'static str {
        match self {
            UnitKind::Length => "LENGTHUNIT",
            UnitKind::Angle => "ANGLEUNIT",
            UnitKind::Scale => "SCALEUNIT",
            UnitKind::Time => "TIMEUNIT",
            UnitKind::Parametric => "PARAMETRICUNIT",
        }
    }

    /// Kind implied by a WKT 2 unit keyword, `None` for the generic `UNIT`
    pub fn from_keyword(keyword: &str) -> Option<UnitKind> {
        match keyword.to_ascii_uppercase().as_str() {
            "LENGTHUNIT" => Some(UnitKind::Length),
            "ANGLEUNIT" => Some(UnitKind::Angle),
            "SCALEUNIT" => Some(UnitKind::Scale),
            "TIMEUNIT" | "TEMPORALQUANTITY" => Some(UnitKind::Time),
            "PARAMETRICUNIT" => Some(UnitKind::Parametric),
            _ => None,
        }
    }
}

/// Keywords of all unit elements
pub const UNIT_KEYWORDS: &[&str] = &[
    "UNIT",
    "LENGTHUNIT",
    "ANGLEUNIT",
    "SCALEUNIT",
    "TIMEUNIT",
    "TEMPORALQUANTITY",
    "PARAMETRICUNIT",
];

/// A unit of measurement
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub name: Cow<'static, str>,
    pub kind: UnitKind,
    /// Multiply a value by this factor to get metres, radians, seconds or unity
    pub factor: f64,
}

const fn unit(name: &'static str, kind: UnitKind, factor: f64) -> Unit {
    Unit {
        name: Cow::Borrowed(name),
        kind,
        factor,
    }
}

impl Unit {
    pub const METRE: Unit = unit("metre", UnitKind::Length, 1.0);
    pub const KILOMETRE: Unit = unit("kilometre", UnitKind::Length, 1000.0);
    pub const CENTIMETRE: Unit = unit("centimetre", UnitKind::Length, 0.01);
    pub const MILLIMETRE: Unit = unit("millimetre", UnitKind::Length, 0.001);
    pub const FOOT: Unit = unit("foot", UnitKind::Length, 0.3048);
    pub const US_SURVEY_FOOT: Unit = unit("US survey foot", UnitKind::Length, 1200.0 / 3937.0);
    pub const RADIAN: Unit = unit("radian", UnitKind::Angle, 1.0);
    pub const DEGREE: Unit = unit("degree", UnitKind::Angle, PI / 180.0);
    pub const GRAD: Unit = unit("grad", UnitKind::Angle, PI / 200.0);
    pub const ARC_MINUTE: Unit = unit("arc-minute", UnitKind::Angle, PI / 10800.0);
    pub const ARC_SECOND: Unit = unit("arc-second", UnitKind::Angle, PI / 648000.0);
    pub const MICRORADIAN: Unit = unit("microradian", UnitKind::Angle, 1e-6);
    pub const UNITY: Unit = unit("unity", UnitKind::Scale, 1.0);
    pub const PPM: Unit = unit("parts per million", UnitKind::Scale, 1e-6);
    pub const SECOND: Unit = unit("second", UnitKind::Time, 1.0);
    pub const MINUTE: Unit = unit("minute", UnitKind::Time, 60.0);
    pub const HOUR: Unit = unit("hour", UnitKind::Time, 3600.0);
    pub const DAY: Unit = unit("day", UnitKind::Time, 86400.0);
    pub const YEAR: Unit = unit("year", UnitKind::Time, 31556925.445);

    /// Custom unit
    pub fn new(name: impl Into<String>, kind: UnitKind, factor: f64) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            kind,
            factor,
        }
    }

    #[inline]
    pub fn is_angular(&self) -> bool {
        self.kind == UnitKind::Angle
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.kind == UnitKind::Length
    }

    /// Convert a value in this unit to the target unit, `None` if the kinds differ
    #[inline]
    pub fn convert_to(&self, value: f64, target: &Unit) -> Option<f64> {
        if self.kind != target.kind {
            return None;
        }
        if self.factor == target.factor {
            return Some(value);
        }
        Some(value * self.factor / target.factor)
    }

    /// Convert a value in degrees to this (angular) unit
    #[inline]
    pub fn from_degrees(&self, degrees: f64) -> Option<f64> {
        Unit::DEGREE.convert_to(degrees, self)
    }
}

const CANONICAL: &[Unit] = &[
    Unit::METRE,
    Unit::KILOMETRE,
    Unit::CENTIMETRE,
    Unit::MILLIMETRE,
    Unit::FOOT,
    Unit::US_SURVEY_FOOT,
    Unit::RADIAN,
    Unit::DEGREE,
    Unit::GRAD,
    Unit::ARC_MINUTE,
    Unit::ARC_SECOND,
    Unit::MICRORADIAN,
    Unit::UNITY,
    Unit::PPM,
    Unit::SECOND,
    Unit::MINUTE,
    Unit::HOUR,
    Unit::DAY,
    Unit::YEAR,
];

const ALIASES: &[(&str, Unit)] = &[
    ("metre", Unit::METRE),
    ("meter", Unit::METRE),
    ("metres", Unit::METRE),
    ("meters", Unit::METRE),
    ("m", Unit::METRE),
    ("kilometre", Unit::KILOMETRE),
    ("kilometer", Unit::KILOMETRE),
    ("km", Unit::KILOMETRE),
    ("centimetre", Unit::CENTIMETRE),
    ("cm", Unit::CENTIMETRE),
    ("millimetre", Unit::MILLIMETRE),
    ("mm", Unit::MILLIMETRE),
    ("foot", Unit::FOOT),
    ("feet", Unit::FOOT),
    ("ft", Unit::FOOT),
    ("footus", Unit::US_SURVEY_FOOT),
    ("ussurveyfoot", Unit::US_SURVEY_FOOT),
    ("radian", Unit::RADIAN),
    ("radians", Unit::RADIAN),
    ("rad", Unit::RADIAN),
    ("degree", Unit::DEGREE),
    ("degrees", Unit::DEGREE),
    ("deg", Unit::DEGREE),
    ("decimaldegree", Unit::DEGREE),
    ("grad", Unit::GRAD),
    ("grade", Unit::GRAD),
    ("grads", Unit::GRAD),
    ("gon", Unit::GRAD),
    ("arcminute", Unit::ARC_MINUTE),
    ("arcsecond", Unit::ARC_SECOND),
    ("microradian", Unit::MICRORADIAN),
    ("unity", Unit::UNITY),
    ("unit", Unit::UNITY),
    ("partspermillion", Unit::PPM),
    ("ppm", Unit::PPM),
    ("second", Unit::SECOND),
    ("seconds", Unit::SECOND),
    ("s", Unit::SECOND),
    ("minute", Unit::MINUTE),
    ("hour", Unit::HOUR),
    ("hours", Unit::HOUR),
    ("h", Unit::HOUR),
    ("day", Unit::DAY),
    ("days", Unit::DAY),
    ("d", Unit::DAY),
    ("year", Unit::YEAR),
    ("a", Unit::YEAR),
];

/// Relative tolerance when the unit name is recognized
const NAMED_TOLERANCE: f64 = 1e-6;
/// Relative tolerance when matching on the conversion factor alone
const FACTOR_TOLERANCE: f64 = 1e-12;

/// SI prefix multipliers for unit names such as "millimetre"
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "atto" => 1e-18,
        "femto" => 1e-15,
        "pico" => 1e-12,
        "nano" => 1e-9,
        "micro" => 1e-6,
        "milli" => 1e-3,
        "centi" => 1e-2,
        "deci" => 1e-1,
        "deca" | "deka" => 1e1,
        "hecto" => 1e2,
        "kilo" => 1e3,
        "mega" => 1e6,
        "giga" => 1e9,
        "tera" => 1e12,
        "peta" => 1e15,
        "exa" => 1e18,
        _ => 1.0, // No prefix or unknown = base unit
    }
}

const SI_PREFIXES: &[&str] = &[
    "atto", "femto", "pico", "nano", "micro", "milli", "centi", "deci", "deca", "deka", "hecto",
    "kilo", "mega", "giga", "tera", "peta", "exa",
];

/// Lower-case the name and drop everything but letters and digits
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[inline]
fn close_to(a: f64, b: f64, tolerance: f64) -> bool {
    a == b || (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

/// Resolves unit names and conversion factors to canonical units
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    aliases: FxHashMap<String, Unit>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        let mut aliases = FxHashMap::default();
        for (alias, unit) in ALIASES {
            aliases.insert((*alias).to_string(), unit.clone());
        }
        Self { aliases }
    }
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional alias
    pub fn register(&mut self, alias: &str, unit: Unit) {
        self.aliases.insert(normalize(alias), unit);
    }

    /// Resolve a unit from its WKT name and conversion factor.
    ///
    /// `kind` is the quantity expected by the context (for example angular
    /// inside GEOGCS), or `None` when the context does not tell.
    /// `factor` is `None` when the WKT omitted it. Returns `None` when the
    /// factor is omitted and the name is not recognized.
    pub fn resolve(&self, name: &str, factor: Option<f64>, kind: Option<UnitKind>) -> Option<Unit> {
        let key = normalize(name);
        // A recognized name wins over the kind expected by the context
        if let Some(unit) = self.aliases.get(&key) {
            if factor.map_or(true, |f| close_to(f, unit.factor, NAMED_TOLERANCE)) {
                return Some(unit.clone());
            }
        }
        let kind = kind.or_else(|| self.aliases.get(&key).map(|u| u.kind));
        let Some(factor) = factor else {
            return self.resolve_by_prefix(name, &key);
        };
        let by_factor = CANONICAL.iter().filter(|u| {
            kind.map_or(true, |k| k == u.kind) && close_to(factor, u.factor, FACTOR_TOLERANCE)
        });
        let mut matches = by_factor.cloned();
        if let Some(unit) = matches.next() {
            // Without a kind, factor 1 matches metre, radian, unity and second
            if kind.is_some() || matches.next().is_none() {
                return Some(unit);
            }
        }
        Some(Unit::new(name, kind.unwrap_or_else(|| guess_kind(&key)), factor))
    }

    /// Unit written without factor: SI prefix + known base name, nothing else
    fn resolve_by_prefix(&self, name: &str, key: &str) -> Option<Unit> {
        SI_PREFIXES.iter().find_map(|prefix| {
            let base_unit = self.aliases.get(key.strip_prefix(prefix)?)?;
            let factor = base_unit.factor * get_si_prefix_multiplier(prefix);
            Some(Unit::new(name, base_unit.kind, factor))
        })
    }
}

/// Best guess for an unknown unit name
fn guess_kind(key: &str) -> UnitKind {
    if key.contains("metre") || key.contains("meter") || key.contains("foot") || key.contains("feet") {
        UnitKind::Length
    } else if key.contains("degree") || key.contains("radian") || key.contains("grad") {
        UnitKind::Angle
    } else if key.contains("second") || key.contains("day") || key.contains("hour") {
        UnitKind::Time
    } else {
        UnitKind::Scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_prefix_multipliers() {
        assert_eq!(get_si_prefix_multiplier("milli"), 0.001);
        assert_eq!(get_si_prefix_multiplier("centi"), 0.01);
        assert_eq!(get_si_prefix_multiplier("kilo"), 1000.0);
        assert_eq!(get_si_prefix_multiplier(""), 1.0);
        assert_eq!(get_si_prefix_multiplier("unknown"), 1.0);
    }

    #[test]
    fn test_resolve_by_name() {
        let registry = UnitRegistry::new();
        let resolve = |name, factor| registry.resolve(name, factor, None).unwrap();
        assert_eq!(resolve("Degrees", Some(0.0174532925199433)), Unit::DEGREE);
        assert_eq!(resolve("degree", Some(0.01745329)), Unit::DEGREE);
        assert_eq!(resolve("Meter", Some(1.0)), Unit::METRE);
        assert_eq!(resolve("km", Some(1000.0)), Unit::KILOMETRE);
        assert_eq!(resolve("grade", Some(0.015707963267948967)), Unit::GRAD);
        assert_eq!(resolve("hour", Some(3600.0)), Unit::HOUR);
        assert_eq!(resolve("metre", None), Unit::METRE);
    }

    #[test]
    fn test_resolve_by_factor() {
        let registry = UnitRegistry::new();
        // Name says metre but factor says kilometre
        assert_eq!(registry.resolve("metre", Some(1000.0), None), Some(Unit::KILOMETRE));
        assert_eq!(
            registry.resolve("Decimal_Second", Some(4.84813681109536e-06), Some(UnitKind::Angle)),
            Some(Unit::ARC_SECOND)
        );
        assert_eq!(registry.resolve("day", Some(86400.0), Some(UnitKind::Time)), Some(Unit::DAY));
    }

    #[test]
    fn test_custom_unit() {
        let registry = UnitRegistry::new();
        let unit = registry.resolve("link", Some(0.201168), Some(UnitKind::Length)).unwrap();
        assert_eq!(unit.name, "link");
        assert_eq!(unit.factor, 0.201168);
        let unit = registry
            .resolve("hectopascal", Some(100.0), Some(UnitKind::Parametric))
            .unwrap();
        assert_eq!(unit.kind, UnitKind::Parametric);
        let unit = registry.resolve("decametre", None, None).unwrap();
        assert_eq!(unit.factor, 10.0);
        assert_eq!(unit.kind, UnitKind::Length);
    }

    #[test]
    fn test_unknown_unit_without_factor() {
        let registry = UnitRegistry::new();
        assert_eq!(registry.resolve("league", None, Some(UnitKind::Length)), None);
        assert_eq!(registry.resolve("foo", None, Some(UnitKind::Angle)), None);
        assert_eq!(registry.resolve("kilofoo", None, None), None);
    }

    #[test]
    fn test_convert() {
        assert_eq!(Unit::KILOMETRE.convert_to(0.6, &Unit::METRE), Some(600.0));
        assert!(Unit::DEGREE.convert_to(1.0, &Unit::METRE).is_none());
        let grads = Unit::GRAD.from_degrees(180.0).unwrap();
        assert!((grads - 200.0).abs() < 1e-9);
        let seconds = Unit::ARC_SECOND.from_degrees(180.0).unwrap();
        assert!((seconds - 648000.0).abs() < 1e-6);
    }
}
