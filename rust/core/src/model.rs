// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geodetic object model
//!
//! Immutable domain objects produced by the parser and consumed by the
//! formatter. Every CRS kind is a variant of the closed [`Crs`] enum and
//! every named object implements [`IdentifiedObject`].

use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use crate::axis::{AxisDirection, RangeMeaning};
use crate::registry::{normalize_name, MethodDescriptor, ParameterDescriptor};
use crate::units::Unit;

/// Authority code such as `EPSG:4326`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    pub authority: String,
    pub code: String,
    pub version: Option<String>,
}

impl Identifier {
    pub fn new(authority: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            code: code.into(),
            version: None,
        }
    }
}

/// Name, identifiers and free text shared by all identified objects
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Properties {
    pub name: String,
    pub identifiers: SmallVec<[Identifier; 1]>,
    pub remarks: Option<String>,
    pub scope: Option<String>,
    pub area: Option<String>,
}

impl Properties {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifiers.push(identifier);
        self
    }
}

/// Capabilities shared by every named object
pub trait IdentifiedObject {
    fn properties(&self) -> &Properties;

    fn name(&self) -> &str {
        &self.properties().name
    }

    fn identifiers(&self) -> &[Identifier] {
        &self.properties().identifiers
    }

    fn remarks(&self) -> Option<&str> {
        self.properties().remarks.as_deref()
    }
}

macro_rules! identified {
    ($($t:ty),* $(,)?) => {
        $(impl IdentifiedObject for $t {
            #[inline]
            fn properties(&self) -> &Properties {
                &self.properties
            }
        })*
    };
}

identified!(
    Ellipsoid,
    PrimeMeridian,
    GeodeticDatum,
    VerticalDatum,
    TemporalDatum,
    EngineeringDatum,
    ParametricDatum,
    Axis,
    OperationMethod,
    ParameterValue,
    Conversion,
    GeodeticCrs,
    ProjectedCrs,
    VerticalCrs,
    TemporalCrs,
    EngineeringCrs,
    ParametricCrs,
    CompoundCrs,
);

// ============================================================================
// Datum components
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    pub properties: Properties,
    pub semi_major: f64,
    /// Infinite for a sphere
    pub inverse_flattening: f64,
    pub unit: Unit,
}

impl Ellipsoid {
    #[inline]
    pub fn is_sphere(&self) -> bool {
        self.inverse_flattening.is_infinite()
    }

    pub fn semi_minor(&self) -> f64 {
        if self.is_sphere() {
            self.semi_major
        } else {
            self.semi_major * (1.0 - 1.0 / self.inverse_flattening)
        }
    }

    /// Semi-major axis in metres
    pub fn semi_major_metres(&self) -> f64 {
        self.semi_major * self.unit.factor
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimeMeridian {
    pub properties: Properties,
    pub greenwich_longitude: f64,
    pub angular_unit: Unit,
}

impl PrimeMeridian {
    pub fn greenwich() -> Self {
        Self {
            properties: Properties::named("Greenwich"),
            greenwich_longitude: 0.0,
            angular_unit: Unit::DEGREE,
        }
    }

    /// Longitude converted to another angular unit
    pub fn greenwich_longitude_in(&self, unit: &Unit) -> Option<f64> {
        self.angular_unit.convert_to(self.greenwich_longitude, unit)
    }
}

/// Seven-parameter transformation to WGS 84 (`TOWGS84`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BursaWolfParameters {
    /// Translations in metres
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations in arc-seconds
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale difference in parts per million
    pub ds: f64,
}

impl BursaWolfParameters {
    /// Build from 3 or 7 values, `None` for any other count
    pub fn from_values(values: &[f64]) -> Option<Self> {
        match *values {
            [tx, ty, tz] => Some(Self {
                tx,
                ty,
                tz,
                ..Self::default()
            }),
            [tx, ty, tz, rx, ry, rz, ds] => Some(Self {
                tx,
                ty,
                tz,
                rx,
                ry,
                rz,
                ds,
            }),
            _ => None,
        }
    }

    #[inline]
    pub fn is_translation(&self) -> bool {
        self.rx == 0.0 && self.ry == 0.0 && self.rz == 0.0 && self.ds == 0.0
    }

    /// The 3 translations, or all 7 values if there is a rotation or scale
    pub fn values(&self) -> SmallVec<[f64; 7]> {
        let mut out: SmallVec<[f64; 7]> = SmallVec::new();
        out.extend_from_slice(&[self.tx, self.ty, self.tz]);
        if !self.is_translation() {
            out.extend_from_slice(&[self.rx, self.ry, self.rz, self.ds]);
        }
        out
    }
}

// ============================================================================
// Datums
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticDatum {
    pub properties: Properties,
    pub ellipsoid: Ellipsoid,
    pub prime_meridian: PrimeMeridian,
    pub anchor: Option<String>,
    pub bursa_wolf: Option<BursaWolfParameters>,
}

/// Vertical datum. `datum_type` is the WKT 1 type code; WKT 2 has no slot
/// for it, so it does not take part in equality.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerticalDatum {
    pub properties: Properties,
    pub anchor: Option<String>,
    pub datum_type: i64,
}

impl VerticalDatum {
    /// Orthometric (geoid-based) heights
    pub const DEFAULT_TYPE: i64 = 2005;
}

impl PartialEq for VerticalDatum {
    fn eq(&self, other: &Self) -> bool {
        self.properties == other.properties && self.anchor == other.anchor
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalDatum {
    pub properties: Properties,
    pub origin: DateTime<Utc>,
    pub calendar: Option<String>,
}

impl TemporalDatum {
    /// Origin expressed in `unit` relative to 1970-01-01T00:00:00Z
    pub fn origin_in(&self, unit: &Unit) -> f64 {
        let seconds = self.origin.timestamp() as f64
            + f64::from(self.origin.timestamp_subsec_nanos()) * 1e-9;
        seconds / unit.factor
    }
}

/// Engineering datum. `datum_type` is the WKT 1 `LOCAL_DATUM` code and,
/// like the vertical one, is left out of equality.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineeringDatum {
    pub properties: Properties,
    pub anchor: Option<String>,
    pub datum_type: i64,
}

impl EngineeringDatum {
    pub const DEFAULT_TYPE: i64 = 0;
}

impl PartialEq for EngineeringDatum {
    fn eq(&self, other: &Self) -> bool {
        self.properties == other.properties && self.anchor == other.anchor
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParametricDatum {
    pub properties: Properties,
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Datum {
    Geodetic(GeodeticDatum),
    Vertical(VerticalDatum),
    Temporal(TemporalDatum),
    Engineering(EngineeringDatum),
    Parametric(ParametricDatum),
}

/// Borrowed view of the datum of a CRS
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatumRef<'a> {
    Geodetic(&'a GeodeticDatum),
    Vertical(&'a VerticalDatum),
    Temporal(&'a TemporalDatum),
    Engineering(&'a EngineeringDatum),
    Parametric(&'a ParametricDatum),
}

impl DatumRef<'_> {
    pub fn properties(&self) -> &Properties {
        match self {
            DatumRef::Geodetic(d) => &d.properties,
            DatumRef::Vertical(d) => &d.properties,
            DatumRef::Temporal(d) => &d.properties,
            DatumRef::Engineering(d) => &d.properties,
            DatumRef::Parametric(d) => &d.properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.properties().name
    }
}

impl Datum {
    pub fn as_ref(&self) -> DatumRef<'_> {
        match self {
            Datum::Geodetic(d) => DatumRef::Geodetic(d),
            Datum::Vertical(d) => DatumRef::Vertical(d),
            Datum::Temporal(d) => DatumRef::Temporal(d),
            Datum::Engineering(d) => DatumRef::Engineering(d),
            Datum::Parametric(d) => DatumRef::Parametric(d),
        }
    }
}

impl IdentifiedObject for Datum {
    fn properties(&self) -> &Properties {
        match self {
            Datum::Geodetic(d) => &d.properties,
            Datum::Vertical(d) => &d.properties,
            Datum::Temporal(d) => &d.properties,
            Datum::Engineering(d) => &d.properties,
            Datum::Parametric(d) => &d.properties,
        }
    }
}

// ============================================================================
// Coordinate systems
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    pub properties: Properties,
    pub abbreviation: String,
    pub direction: AxisDirection,
    pub unit: Unit,
    pub minimum: f64,
    pub maximum: f64,
    pub range_meaning: Option<RangeMeaning>,
}

/// Coordinate system type, as written in `CS[type, dimension]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CsKind {
    Ellipsoidal,
    Cartesian,
    Vertical,
    Temporal,
    Affine,
    Linear,
    Parametric,
    Spherical,
    Polar,
    Cylindrical,
    Ordinal,
    /// Concatenation of the coordinate systems of a compound CRS
    Compound,
}

impl CsKind {
    /// Parse the WKT 2 coordinate system type word
    pub fn from_wkt(word: &str) -> Option<CsKind> {
        match word.to_ascii_lowercase().as_str() {
            "ellipsoidal" => Some(CsKind::Ellipsoidal),
            "cartesian" => Some(CsKind::Cartesian),
            "vertical" => Some(CsKind::Vertical),
            "temporal" | "temporaldatetime" | "temporalcount" | "temporalmeasure" => {
                Some(CsKind::Temporal)
            }
            "affine" => Some(CsKind::Affine),
            "linear" => Some(CsKind::Linear),
            "parametric" => Some(CsKind::Parametric),
            "spherical" => Some(CsKind::Spherical),
            "polar" => Some(CsKind::Polar),
            "cylindrical" => Some(CsKind::Cylindrical),
            "ordinal" => Some(CsKind::Ordinal),
            _ => None,
        }
    }

    pub fn wkt_name(self) -> &'static str {
        match self {
            CsKind::Ellipsoidal => "ellipsoidal",
            CsKind::Cartesian => "Cartesian",
            CsKind::Vertical => "vertical",
            CsKind::Temporal => "temporal",
            CsKind::Affine => "affine",
            CsKind::Linear => "linear",
            CsKind::Parametric => "parametric",
            CsKind::Spherical => "spherical",
            CsKind::Polar => "polar",
            CsKind::Cylindrical => "cylindrical",
            CsKind::Ordinal => "ordinal",
            CsKind::Compound => "compound",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateSystem {
    pub kind: CsKind,
    pub axes: Vec<Axis>,
}

impl CoordinateSystem {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn axis(&self, index: usize) -> Option<&Axis> {
        self.axes.get(index)
    }

    /// Unit shared by all axes, if any
    pub fn common_unit(&self) -> Option<&Unit> {
        let first = &self.axes.first()?.unit;
        self.axes.iter().all(|a| &a.unit == first).then_some(first)
    }
}

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationMethod {
    pub properties: Properties,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub descriptor: Option<&'static MethodDescriptor>,
}

/// Value of an operation parameter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Number(f64),
    /// File name (`PARAMETERFILE`) or other textual value
    Text(String),
    /// Grid of values, row-major
    Matrix(Vec<Vec<f64>>),
}

/// Where a parameter value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterOrigin {
    /// Written in the source text
    Explicit,
    /// Descriptor default
    Default,
    /// Copied from the ellipsoid of the base CRS
    Ellipsoid,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterValue {
    pub properties: Properties,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub descriptor: Option<&'static ParameterDescriptor>,
    pub value: ParamValue,
    pub unit: Option<Unit>,
    pub origin: ParameterOrigin,
}

impl ParameterValue {
    /// Numeric value converted to `unit`. Values without unit are returned as is.
    pub fn value_in(&self, unit: &Unit) -> Option<f64> {
        match (&self.value, &self.unit) {
            (ParamValue::Number(v), Some(own)) => own.convert_to(*v, unit),
            (ParamValue::Number(v), None) => Some(*v),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            ParamValue::Number(v) => Some(v),
            _ => None,
        }
    }

    /// True if `name` is the canonical name or one of the aliases of this parameter
    pub fn is_named(&self, name: &str) -> bool {
        let key = normalize_name(name);
        if normalize_name(&self.properties.name) == key {
            return true;
        }
        self.descriptor.map_or(false, |d| d.matches(&key))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterGroup {
    pub values: Vec<ParameterValue>,
}

impl ParameterGroup {
    /// Find a parameter by canonical name or any authority alias
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.values.iter().find(|p| p.is_named(name))
    }

    /// Numeric value of the named parameter converted to `unit`
    pub fn value_in(&self, name: &str, unit: &Unit) -> Option<f64> {
        self.parameter(name)?.value_in(unit)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conversion {
    pub properties: Properties,
    pub method: OperationMethod,
    pub parameters: ParameterGroup,
}

// ============================================================================
// Coordinate reference systems
// ============================================================================

/// Geographic or geocentric CRS
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticCrs {
    pub properties: Properties,
    pub datum: GeodeticDatum,
    pub cs: CoordinateSystem,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedCrs {
    pub properties: Properties,
    pub base: GeodeticCrs,
    pub conversion: Conversion,
    pub cs: CoordinateSystem,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerticalCrs {
    pub properties: Properties,
    pub datum: VerticalDatum,
    pub cs: CoordinateSystem,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalCrs {
    pub properties: Properties,
    pub datum: TemporalDatum,
    pub cs: CoordinateSystem,
}

impl TemporalCrs {
    /// Datum origin in the axis unit, relative to the Unix epoch
    pub fn epoch_offset(&self) -> Option<f64> {
        let unit = &self.cs.axes.first()?.unit;
        Some(self.datum.origin_in(unit))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineeringCrs {
    pub properties: Properties,
    pub datum: EngineeringDatum,
    pub cs: CoordinateSystem,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParametricCrs {
    pub properties: Properties,
    pub datum: ParametricDatum,
    pub cs: CoordinateSystem,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompoundCrs {
    pub properties: Properties,
    pub components: Vec<Crs>,
    /// Axes of all components, in order
    pub cs: CoordinateSystem,
}

/// Every kind of coordinate reference system
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    Geographic(GeodeticCrs),
    Geocentric(GeodeticCrs),
    Projected(Box<ProjectedCrs>),
    Vertical(VerticalCrs),
    Temporal(TemporalCrs),
    Engineering(EngineeringCrs),
    Parametric(ParametricCrs),
    Compound(CompoundCrs),
}

impl Crs {
    pub fn coordinate_system(&self) -> &CoordinateSystem {
        match self {
            Crs::Geographic(c) | Crs::Geocentric(c) => &c.cs,
            Crs::Projected(c) => &c.cs,
            Crs::Vertical(c) => &c.cs,
            Crs::Temporal(c) => &c.cs,
            Crs::Engineering(c) => &c.cs,
            Crs::Parametric(c) => &c.cs,
            Crs::Compound(c) => &c.cs,
        }
    }

    /// Datum of a single CRS; projected CRS answer with the datum of their base
    pub fn datum(&self) -> Option<DatumRef<'_>> {
        match self {
            Crs::Geographic(c) | Crs::Geocentric(c) => Some(DatumRef::Geodetic(&c.datum)),
            Crs::Projected(c) => Some(DatumRef::Geodetic(&c.base.datum)),
            Crs::Vertical(c) => Some(DatumRef::Vertical(&c.datum)),
            Crs::Temporal(c) => Some(DatumRef::Temporal(&c.datum)),
            Crs::Engineering(c) => Some(DatumRef::Engineering(&c.datum)),
            Crs::Parametric(c) => Some(DatumRef::Parametric(&c.datum)),
            Crs::Compound(_) => None,
        }
    }

    /// Keyword-style name of the variant, used in log messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Crs::Geographic(_) => "GeographicCRS",
            Crs::Geocentric(_) => "GeocentricCRS",
            Crs::Projected(_) => "ProjectedCRS",
            Crs::Vertical(_) => "VerticalCRS",
            Crs::Temporal(_) => "TemporalCRS",
            Crs::Engineering(_) => "EngineeringCRS",
            Crs::Parametric(_) => "ParametricCRS",
            Crs::Compound(_) => "CompoundCRS",
        }
    }
}

impl IdentifiedObject for Crs {
    fn properties(&self) -> &Properties {
        match self {
            Crs::Geographic(c) | Crs::Geocentric(c) => &c.properties,
            Crs::Projected(c) => &c.properties,
            Crs::Vertical(c) => &c.properties,
            Crs::Temporal(c) => &c.properties,
            Crs::Engineering(c) => &c.properties,
            Crs::Parametric(c) => &c.properties,
            Crs::Compound(c) => &c.properties,
        }
    }
}

/// Any object the parser can return
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WktObject {
    Crs(Crs),
    Datum(Datum),
    Ellipsoid(Ellipsoid),
    PrimeMeridian(PrimeMeridian),
    Axis(Axis),
    Conversion(Conversion),
    Unit(Unit),
}

impl WktObject {
    pub fn as_crs(&self) -> Option<&Crs> {
        match self {
            WktObject::Crs(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_crs(self) -> Option<Crs> {
        match self {
            WktObject::Crs(c) => Some(c),
            _ => None,
        }
    }

    /// Name of the object
    pub fn name(&self) -> &str {
        match self {
            WktObject::Crs(c) => c.name(),
            WktObject::Datum(d) => d.name(),
            WktObject::Ellipsoid(e) => e.name(),
            WktObject::PrimeMeridian(p) => p.name(),
            WktObject::Axis(a) => a.name(),
            WktObject::Conversion(c) => c.name(),
            WktObject::Unit(u) => &u.name,
        }
    }
}

impl From<Crs> for WktObject {
    fn from(crs: Crs) -> Self {
        WktObject::Crs(crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bursa_wolf_values() {
        let translation = BursaWolfParameters::from_values(&[-168.0, -60.0, 320.0]).unwrap();
        assert_eq!(translation.values().as_slice(), &[-168.0, -60.0, 320.0]);
        let full =
            BursaWolfParameters::from_values(&[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 1.5]).unwrap();
        assert_eq!(full.values().len(), 7);
        assert!(BursaWolfParameters::from_values(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_ellipsoid_semi_minor() {
        let wgs84 = Ellipsoid {
            properties: Properties::named("WGS 84"),
            semi_major: 6378137.0,
            inverse_flattening: 298.257223563,
            unit: Unit::METRE,
        };
        assert_relative_eq!(wgs84.semi_minor(), 6356752.314245179, epsilon = 1e-6);
        let sphere = Ellipsoid {
            inverse_flattening: f64::INFINITY,
            ..wgs84
        };
        assert!(sphere.is_sphere());
        assert_eq!(sphere.semi_minor(), 6378137.0);
    }

    #[test]
    fn test_prime_meridian_conversion() {
        let paris = PrimeMeridian {
            properties: Properties::named("Paris"),
            greenwich_longitude: 2.5969213,
            angular_unit: Unit::GRAD,
        };
        assert_relative_eq!(
            paris.greenwich_longitude_in(&Unit::DEGREE).unwrap(),
            2.33722917,
            epsilon = 1e-8
        );
        assert!(paris.greenwich_longitude_in(&Unit::METRE).is_none());
    }
}
