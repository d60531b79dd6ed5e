// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis resolution
//!
//! Maps WKT 1 direction enumerants and WKT 2 free-text directions to
//! [`AxisDirection`], normalizes vendor axis names to ISO names, picks
//! abbreviations and derives bounds in the axis unit.

use std::fmt;

use crate::model::{Axis, CsKind, Properties};
use crate::units::{Unit, UnitKind};

/// Whether axis bounds are hard limits or wrap around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeMeaning {
    Exact,
    Wraparound,
}

/// Pole toward which a meridian-relative axis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pole {
    North,
    South,
}

/// Canonical axis direction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Up,
    Down,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    Future,
    Past,
    ColumnPositive,
    ColumnNegative,
    RowPositive,
    RowNegative,
    DisplayRight,
    DisplayLeft,
    DisplayUp,
    DisplayDown,
    Clockwise,
    CounterClockwise,
    Towards,
    AwayFrom,
    Unspecified,
    Other,
    /// Toward a pole along the meridian at the given longitude (degrees east)
    AlongMeridian { toward: Pole, meridian: f64 },
}

const DIRECTIONS: &[(&str, AxisDirection)] = &[
    ("north", AxisDirection::North),
    ("northeast", AxisDirection::NorthEast),
    ("east", AxisDirection::East),
    ("southeast", AxisDirection::SouthEast),
    ("south", AxisDirection::South),
    ("southwest", AxisDirection::SouthWest),
    ("west", AxisDirection::West),
    ("northwest", AxisDirection::NorthWest),
    ("up", AxisDirection::Up),
    ("down", AxisDirection::Down),
    ("geocentricX", AxisDirection::GeocentricX),
    ("geocentricY", AxisDirection::GeocentricY),
    ("geocentricZ", AxisDirection::GeocentricZ),
    ("future", AxisDirection::Future),
    ("past", AxisDirection::Past),
    ("columnPositive", AxisDirection::ColumnPositive),
    ("columnNegative", AxisDirection::ColumnNegative),
    ("rowPositive", AxisDirection::RowPositive),
    ("rowNegative", AxisDirection::RowNegative),
    ("displayRight", AxisDirection::DisplayRight),
    ("displayLeft", AxisDirection::DisplayLeft),
    ("displayUp", AxisDirection::DisplayUp),
    ("displayDown", AxisDirection::DisplayDown),
    ("clockwise", AxisDirection::Clockwise),
    ("counterClockwise", AxisDirection::CounterClockwise),
    ("towards", AxisDirection::Towards),
    ("awayFrom", AxisDirection::AwayFrom),
    ("unspecified", AxisDirection::Unspecified),
    ("other", AxisDirection::Other),
];

impl AxisDirection {
    /// WKT 2 spelling (camel case)
    pub fn wkt2_name(&self) -> &'static str {
        match self {
            AxisDirection::AlongMeridian { toward: Pole::North, .. } => "north",
            AxisDirection::AlongMeridian { toward: Pole::South, .. } => "south",
            other => DIRECTIONS
                .iter()
                .find(|(_, d)| d == other)
                .map_or("unspecified", |(name, _)| name),
        }
    }

    /// WKT 1 enumerant, `None` when OGC 01-009 has no equivalent
    pub fn wkt1_name(&self) -> Option<&'static str> {
        match self {
            AxisDirection::North => Some("NORTH"),
            AxisDirection::South => Some("SOUTH"),
            AxisDirection::East => Some("EAST"),
            AxisDirection::West => Some("WEST"),
            AxisDirection::Up => Some("UP"),
            AxisDirection::Down => Some("DOWN"),
            AxisDirection::Future => Some("FUTURE"),
            AxisDirection::Past => Some("PAST"),
            // Legacy geocentric axes are OTHER, EAST, NORTH
            AxisDirection::GeocentricX | AxisDirection::Other => Some("OTHER"),
            AxisDirection::GeocentricY => Some("EAST"),
            AxisDirection::GeocentricZ => Some("NORTH"),
            _ => None,
        }
    }

    /// Direction pointing the other way, if the direction has one
    pub fn opposite(&self) -> Option<AxisDirection> {
        use AxisDirection::*;
        let pairs = [
            (North, South),
            (NorthEast, SouthWest),
            (East, West),
            (SouthEast, NorthWest),
            (Up, Down),
            (Future, Past),
            (ColumnPositive, ColumnNegative),
            (RowPositive, RowNegative),
            (DisplayRight, DisplayLeft),
            (DisplayUp, DisplayDown),
            (Clockwise, CounterClockwise),
            (Towards, AwayFrom),
        ];
        pairs.iter().find_map(|(a, b)| {
            if a == self {
                Some(*b)
            } else if b == self {
                Some(*a)
            } else {
                None
            }
        })
    }

    #[inline]
    fn is_east_west(&self) -> bool {
        matches!(self, AxisDirection::East | AxisDirection::West)
    }

    #[inline]
    fn is_north_south(&self) -> bool {
        matches!(self, AxisDirection::North | AxisDirection::South)
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisDirection::AlongMeridian { toward, meridian } => {
                let pole = match toward {
                    Pole::North => "North",
                    Pole::South => "South",
                };
                let (value, hemisphere) = if *meridian < 0.0 {
                    (-meridian, 'W')
                } else {
                    (*meridian, 'E')
                };
                write!(f, "{} along {}°{}", pole, value, hemisphere)
            }
            other => f.write_str(other.wkt2_name()),
        }
    }
}

/// Parse a direction word, case insensitive. Accepts the WKT 1 enumeration,
/// the WKT 2 camel case names and the meridian form "South along 90°E".
pub fn parse_direction(word: &str) -> Option<AxisDirection> {
    let lower = word.trim().to_lowercase();
    if let Some(direction) = parse_along_meridian(&lower) {
        return Some(direction);
    }
    let key: String = lower.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    DIRECTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&key))
        .map(|(_, d)| *d)
}

fn parse_along_meridian(lower: &str) -> Option<AxisDirection> {
    let (toward, rest) = if let Some(rest) = lower.strip_prefix("north along") {
        (Pole::North, rest)
    } else if let Some(rest) = lower.strip_prefix("south along") {
        (Pole::South, rest)
    } else {
        return None;
    };
    let rest = rest.trim();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(rest.len());
    let mut meridian: f64 = fast_float::parse(&rest[..end]).ok()?;
    let suffix = rest[end..].trim_start_matches(|c: char| c == '°' || c.is_whitespace());
    let suffix = suffix.strip_prefix("deg").unwrap_or(suffix).trim();
    match suffix {
        "w" | "west" => meridian = -meridian,
        "" | "e" | "east" => {}
        _ => return None,
    }
    Some(AxisDirection::AlongMeridian { toward, meridian })
}

/// Split `"easting (X)"` into the name and the abbreviation
pub fn split_abbreviation(text: &str) -> (String, Option<String>) {
    let trimmed = text.trim();
    if let Some(body) = trimmed.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let name = body[..open].trim().to_string();
            let abbreviation = body[open + 1..].trim().to_string();
            if !abbreviation.is_empty() {
                return (name, Some(abbreviation));
            }
        }
    }
    (trimmed.to_string(), None)
}

/// ISO display name for common vendor spellings; other names are kept as written
pub fn normalize_name(name: &str) -> String {
    let key: String = name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    let canonical = match key.as_str() {
        "lat" | "latitude" => "Latitude",
        "lon" | "long" | "longitude" => "Longitude",
        "geodeticlatitude" => "Geodetic latitude",
        "geodeticlongitude" => "Geodetic longitude",
        "ellipsoidalheight" => "Ellipsoidal height",
        "gravityrelatedheight" => "Gravity-related height",
        "depth" => "Depth",
        "easting" => "Easting",
        "northing" => "Northing",
        "westing" => "Westing",
        "southing" => "Southing",
        "time" => "Time",
        "geocentricx" => "Geocentric X",
        "geocentricy" => "Geocentric Y",
        "geocentricz" => "Geocentric Z",
        _ => return name.to_string(),
    };
    canonical.to_string()
}

/// Default abbreviation for an axis that does not declare one
pub fn default_abbreviation(name: &str, direction: &AxisDirection) -> String {
    let abbreviation = match name {
        "Latitude" | "Geodetic latitude" => "φ",
        "Longitude" | "Geodetic longitude" => "λ",
        "Ellipsoidal height" => "h",
        "Gravity-related height" => "H",
        "Depth" => "D",
        "Easting" => "E",
        "Northing" => "N",
        "Westing" => "W",
        "Southing" => "S",
        "Time" => "t",
        "Geocentric X" => "X",
        "Geocentric Y" => "Y",
        "Geocentric Z" => "Z",
        _ => match direction {
            AxisDirection::GeocentricX => "X",
            AxisDirection::GeocentricY => "Y",
            AxisDirection::GeocentricZ => "Z",
            AxisDirection::Future | AxisDirection::Past => "t",
            _ => return name.chars().next().map(String::from).unwrap_or_default(),
        },
    };
    abbreviation.to_string()
}

/// Bounds and range meaning derived from the axis semantic class, in `unit`
pub fn bounds(name: &str, direction: &AxisDirection, unit: &Unit) -> (f64, f64, Option<RangeMeaning>) {
    let longitude_like = matches!(name, "Longitude" | "Geodetic longitude")
        || (unit.is_angular() && direction.is_east_west());
    let latitude_like = matches!(name, "Latitude" | "Geodetic latitude")
        || (unit.is_angular() && direction.is_north_south());
    if unit.is_angular() && longitude_like {
        let limit = unit.from_degrees(180.0).unwrap_or(f64::INFINITY);
        (-limit, limit, Some(RangeMeaning::Wraparound))
    } else if unit.is_angular() && latitude_like {
        let limit = unit.from_degrees(90.0).unwrap_or(f64::INFINITY);
        (-limit, limit, Some(RangeMeaning::Exact))
    } else {
        (f64::NEG_INFINITY, f64::INFINITY, None)
    }
}

/// Unit to use for a standalone axis declaring none
pub fn default_unit(name: &str, direction: &AxisDirection) -> Unit {
    match (name, direction) {
        ("Latitude" | "Longitude" | "Geodetic latitude" | "Geodetic longitude", _) => Unit::DEGREE,
        (_, AxisDirection::Future | AxisDirection::Past) => Unit::SECOND,
        _ => Unit::METRE,
    }
}

/// Build an axis from its written name (possibly `"name (abbr)"`), direction and unit
pub fn resolve_axis(text: &str, direction: AxisDirection, unit: Unit) -> Axis {
    let (raw_name, abbreviation) = split_abbreviation(text);
    let name = if raw_name.is_empty() {
        abbreviation.clone().unwrap_or_default()
    } else {
        normalize_name(&raw_name)
    };
    let abbreviation = abbreviation.unwrap_or_else(|| default_abbreviation(&name, &direction));
    make_axis(name, abbreviation, direction, unit)
}

fn make_axis(name: String, abbreviation: String, direction: AxisDirection, unit: Unit) -> Axis {
    let (minimum, maximum, range_meaning) = bounds(&name, &direction, &unit);
    Axis {
        properties: Properties::named(name),
        abbreviation,
        direction,
        unit,
        minimum,
        maximum,
        range_meaning,
    }
}

/// Coordinate system context that triggers axis rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsContext {
    Ellipsoidal,
    Geocentric,
    Engineering,
    Other,
}

/// Rewrite axes whose meaning depends on the enclosing coordinate system
pub fn apply_context(axes: &mut [Axis], context: CsContext) {
    match context {
        CsContext::Ellipsoidal => {
            for axis in axes.iter_mut() {
                let renamed = match axis.properties.name.as_str() {
                    "Latitude" => "Geodetic latitude",
                    "Longitude" => "Geodetic longitude",
                    _ => continue,
                };
                axis.properties.name = renamed.to_string();
            }
        }
        CsContext::Geocentric => {
            let legacy = [AxisDirection::Other, AxisDirection::East, AxisDirection::North];
            let is_legacy = axes.len() == 3
                && axes.iter().zip(legacy.iter()).all(|(a, d)| a.direction == *d);
            if is_legacy {
                let canonical = [
                    ("Geocentric X", "X", AxisDirection::GeocentricX),
                    ("Geocentric Y", "Y", AxisDirection::GeocentricY),
                    ("Geocentric Z", "Z", AxisDirection::GeocentricZ),
                ];
                for (axis, (name, abbreviation, direction)) in axes.iter_mut().zip(canonical) {
                    *axis = make_axis(
                        name.to_string(),
                        abbreviation.to_string(),
                        direction,
                        axis.unit.clone(),
                    );
                }
            }
        }
        CsContext::Engineering => {
            for axis in axes.iter_mut() {
                let name = &axis.properties.name;
                if name.chars().count() != 1 {
                    continue;
                }
                let renamed = match axis.direction {
                    AxisDirection::East => "Easting",
                    AxisDirection::North => "Northing",
                    _ => continue,
                };
                axis.abbreviation = name.clone();
                axis.properties.name = renamed.to_string();
            }
        }
        CsContext::Other => {}
    }
}

/// Axes implied by a coordinate system kind when the text declares none.
///
/// Ellipsoidal axes need an angular unit; their bounds are expressed in it.
pub fn implicit_axes(kind: CsKind, unit: &Unit, dimension: usize) -> Result<Vec<Axis>, String> {
    let axis = |name: &str, abbr: &str, direction, unit: &Unit| {
        make_axis(name.to_string(), abbr.to_string(), direction, unit.clone())
    };
    let axes = match kind {
        CsKind::Ellipsoidal => {
            if unit.kind != UnitKind::Angle {
                return Err(format!(
                    "unit “{}” is not angular, can not build implicit longitude and latitude axes",
                    unit.name
                ));
            }
            let mut axes = vec![
                axis("Geodetic longitude", "λ", AxisDirection::East, unit),
                axis("Geodetic latitude", "φ", AxisDirection::North, unit),
            ];
            if dimension == 3 {
                axes.push(axis("Ellipsoidal height", "h", AxisDirection::Up, &Unit::METRE));
            }
            axes
        }
        CsKind::Cartesian if dimension == 3 => vec![
            axis("Geocentric X", "X", AxisDirection::GeocentricX, unit),
            axis("Geocentric Y", "Y", AxisDirection::GeocentricY, unit),
            axis("Geocentric Z", "Z", AxisDirection::GeocentricZ, unit),
        ],
        CsKind::Cartesian => vec![
            axis("Easting", "E", AxisDirection::East, unit),
            axis("Northing", "N", AxisDirection::North, unit),
        ],
        CsKind::Vertical => vec![axis("Gravity-related height", "H", AxisDirection::Up, unit)],
        CsKind::Temporal => vec![axis("Time", "t", AxisDirection::Future, unit)],
        other => {
            return Err(format!(
                "no implicit axes for {} coordinate systems",
                other.wkt_name()
            ))
        }
    };
    Ok(axes)
}

/// Sort axes by their explicit `ORDER[n]`; axes without order keep their
/// relative position after the ordered ones
pub fn sort_by_order(mut axes: Vec<(Option<i64>, Axis)>) -> Vec<Axis> {
    if axes.iter().any(|(order, _)| order.is_some()) {
        axes.sort_by_key(|(order, _)| order.unwrap_or(i64::MAX));
    }
    axes.into_iter().map(|(_, axis)| axis).collect()
}
