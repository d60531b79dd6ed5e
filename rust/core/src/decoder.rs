// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geodetic object decoder
//!
//! Recursive descent over the element tree: one handler per grammar
//! production, dispatched through a keyword table built once per decoder.
//! Each handler pulls the children it knows, parses nested elements first,
//! then asks the [`ObjectFactory`] to build its object. Children nobody
//! pulled are reported to the [`Warnings`] threaded through the calls.

use rustc_hash::FxHashMap;

use crate::axis::{
    apply_context, default_unit, implicit_axes, normalize_name, parse_direction, resolve_axis,
    sort_by_order, split_abbreviation, AxisDirection, CsContext, Pole,
};
use crate::config::Config;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::factory::{DefaultFactory, InvalidObject, ObjectFactory};
use crate::model::*;
use crate::parser::{tokenize, ElementScanner};
use crate::registry::{MethodDescriptor, ParameterDescriptor, ParameterKind, ParameterRegistry};
use crate::units::{Unit, UnitKind, UnitRegistry, UNIT_KEYWORDS};
use crate::warnings::{Notice, Warnings};

const ELLIPSOID: &[&str] = &["ELLIPSOID", "SPHEROID"];
const PRIME_MERIDIAN: &[&str] = &["PRIMEM", "PRIMEMERIDIAN"];
const GEODETIC_DATUM: &[&str] = &["DATUM", "GEODETICDATUM", "TRF"];
const VERTICAL_DATUM: &[&str] = &["VERT_DATUM", "VDATUM", "VERTICALDATUM", "VRF"];
const TEMPORAL_DATUM: &[&str] = &["TDATUM", "TIMEDATUM"];
const ENGINEERING_DATUM: &[&str] = &["EDATUM", "ENGINEERINGDATUM", "LOCAL_DATUM"];
const PARAMETRIC_DATUM: &[&str] = &["PDATUM", "PARAMETRICDATUM"];
const GEODETIC_CRS: &[&str] = &[
    "GEOGCS",
    "GEOGCRS",
    "GEOGRAPHICCRS",
    "GEOCCS",
    "GEODCRS",
    "GEODETICCRS",
];
const BASE_GEODETIC_CRS: &[&str] = &["BASEGEOGCRS", "BASEGEODCRS", "GEOGCS"];
const PROJECTED_CRS: &[&str] = &["PROJCS", "PROJCRS", "PROJECTEDCRS"];
const VERTICAL_CRS: &[&str] = &["VERT_CS", "VERTCRS", "VERTICALCRS"];
const TEMPORAL_CRS: &[&str] = &["TIMECRS"];
const ENGINEERING_CRS: &[&str] = &["ENGCRS", "ENGINEERINGCRS", "LOCAL_CS"];
const PARAMETRIC_CRS: &[&str] = &["PARAMETRICCRS"];
const COMPOUND_CRS: &[&str] = &["COMPD_CS", "COMPOUNDCRS"];
const CONVERSION: &[&str] = &["CONVERSION", "DERIVINGCONVERSION"];
const METHOD: &[&str] = &["METHOD", "PROJECTION"];
const IDENTIFIER: &[&str] = &["ID", "AUTHORITY"];
/// Recognized WKT 2 metadata that the model does not keep
const IGNORED_METADATA: &[&str] = &["BBOX", "VERTICALEXTENT", "TIMEEXTENT", "CITATION", "URI"];

type Handler<F> = fn(&GeodeticDecoder<F>, Element, &mut Warnings) -> Result<WktObject>;

/// Where to start parsing, and where parsing stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsePosition {
    /// Advanced past the parsed object (and trailing whitespace) on success
    pub index: usize,
    /// Offset of the failure; `index` is left unchanged
    pub error_index: Option<usize>,
}

impl ParsePosition {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            error_index: None,
        }
    }
}

/// A parsed object with the warnings emitted while parsing it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub object: WktObject,
    /// `None` when nothing was ignored
    pub warnings: Option<Warnings>,
}

/// WKT decoder for geodetic objects
pub struct GeodeticDecoder<F = DefaultFactory> {
    config: Config,
    factory: F,
    units: UnitRegistry,
    registry: ParameterRegistry,
    /// Upper-case keyword -> handler
    handlers: FxHashMap<&'static str, Handler<F>>,
}

impl GeodeticDecoder<DefaultFactory> {
    pub fn new(config: Config) -> Self {
        Self::with_factory(config, DefaultFactory)
    }
}

impl Default for GeodeticDecoder<DefaultFactory> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn register<F>(table: &mut FxHashMap<&'static str, Handler<F>>, keywords: &[&'static str], handler: Handler<F>) {
    for &keyword in keywords {
        table.insert(keyword, handler);
    }
}

/// Convert a factory refusal into a parse error located on the element
fn invalid(element: &Element, err: InvalidObject) -> Error {
    Error::unparsable(&element.keyword, element.start, err.0)
}

/// First quoted string after `start`, used to name the root of a failed parse
fn peek_root_name(text: &str, start: usize, config: &Config) -> Option<String> {
    let rest = text.get(start..)?;
    let (offset, open) = rest
        .char_indices()
        .take_while(|(_, c)| !config.symbols.is_close_bracket(*c))
        .find(|(_, c)| config.symbols.closing_quote(*c).is_some())?;
    let close = config.symbols.closing_quote(open)?;
    let body = &rest[offset + open.len_utf8()..];
    body.find(close).map(|end| body[..end].to_string())
}

impl<F: ObjectFactory> GeodeticDecoder<F> {
    pub fn with_factory(config: Config, factory: F) -> Self {
        let mut handlers: FxHashMap<&'static str, Handler<F>> = FxHashMap::default();
        register(&mut handlers, ELLIPSOID, Self::handle_ellipsoid);
        register(&mut handlers, PRIME_MERIDIAN, Self::handle_prime_meridian);
        register(&mut handlers, GEODETIC_DATUM, Self::handle_geodetic_datum);
        register(&mut handlers, VERTICAL_DATUM, Self::handle_vertical_datum);
        register(&mut handlers, TEMPORAL_DATUM, Self::handle_temporal_datum);
        register(&mut handlers, ENGINEERING_DATUM, Self::handle_engineering_datum);
        register(&mut handlers, PARAMETRIC_DATUM, Self::handle_parametric_datum);
        register(&mut handlers, &["AXIS"], Self::handle_axis);
        register(&mut handlers, UNIT_KEYWORDS, Self::handle_unit);
        register(&mut handlers, CONVERSION, Self::handle_conversion);
        register(&mut handlers, GEODETIC_CRS, Self::handle_geodetic_crs);
        register(&mut handlers, &["BASEGEOGCRS", "BASEGEODCRS"], Self::handle_geodetic_crs);
        register(&mut handlers, PROJECTED_CRS, Self::handle_projected_crs);
        register(&mut handlers, VERTICAL_CRS, Self::handle_vertical_crs);
        register(&mut handlers, TEMPORAL_CRS, Self::handle_temporal_crs);
        register(&mut handlers, ENGINEERING_CRS, Self::handle_engineering_crs);
        register(&mut handlers, PARAMETRIC_CRS, Self::handle_parametric_crs);
        register(&mut handlers, COMPOUND_CRS, Self::handle_compound_crs);
        Self {
            config,
            factory,
            units: UnitRegistry::default(),
            registry: ParameterRegistry::default(),
            handlers,
        }
    }

    /// Replace the unit registry
    pub fn with_units(mut self, units: UnitRegistry) -> Self {
        self.units = units;
        self
    }

    /// Replace the parameter registry
    pub fn with_registry(mut self, registry: ParameterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the object starting at `position.index`.
    ///
    /// On success the index moves past the object and any trailing
    /// whitespace. On failure `error_index` is set to the offset of the
    /// problem and the error carries the name of the root element.
    pub fn parse_object(&self, text: &str, position: &mut ParsePosition) -> Result<Parsed> {
        position.error_index = None;
        let tokenized = tokenize(text, position.index, &self.config.symbols, &self.config.locale);
        let (element, end) = match tokenized {
            Ok(found) => found,
            Err(err) => {
                let err = err.in_root(peek_root_name(text, position.index, &self.config).as_deref());
                position.error_index = Some(err.offset());
                return Err(err);
            }
        };
        let root = element.name_hint().map(str::to_string);
        match self.decode_element(element) {
            Ok(parsed) => {
                let rest = &text[end..];
                position.index = text.len() - rest.trim_start().len();
                Ok(parsed)
            }
            Err(err) => {
                let err = err.in_root(root.as_deref());
                position.error_index = Some(err.offset());
                Err(err)
            }
        }
    }

    /// Parse a text holding exactly one object
    pub fn parse(&self, text: &str) -> Result<Parsed> {
        let mut position = ParsePosition::new(0);
        let parsed = self.parse_object(text, &mut position)?;
        if position.index < text.len() {
            return Err(Error::syntax(position.index, "unexpected text after the WKT object"));
        }
        Ok(parsed)
    }

    /// Parse every object of a text holding several definitions separated
    /// by whitespace or `;`
    pub fn parse_all(&self, text: &str) -> Result<Vec<Parsed>> {
        let mut scanner =
            ElementScanner::with_symbols(text, self.config.symbols.clone(), self.config.locale);
        let mut out = Vec::new();
        while let Some(element) = scanner.next_element() {
            let element = element?;
            let root = element.name_hint().map(str::to_string);
            out.push(self.decode_element(element).map_err(|e| e.in_root(root.as_deref()))?);
        }
        Ok(out)
    }

    /// Interpret an already tokenized element
    pub fn decode_element(&self, element: Element) -> Result<Parsed> {
        let mut warnings = Warnings::new();
        let object = self.dispatch(element, &mut warnings)?;
        warnings.set_root_element(object.name());
        Ok(Parsed {
            object,
            warnings: warnings.into_report(),
        })
    }

    fn dispatch(&self, element: Element, warnings: &mut Warnings) -> Result<WktObject> {
        let keyword = element.keyword.to_ascii_uppercase();
        match self.handlers.get(keyword.as_str()) {
            Some(handler) => {
                tracing::trace!(keyword = %element.keyword, offset = element.start, "dispatching WKT element");
                handler(self, element, warnings)
            }
            None => Err(Error::unparsable(
                &element.keyword,
                element.start,
                format!("unknown keyword “{}”", element.keyword),
            )),
        }
    }

    /// Dispatch an element that must be a CRS
    fn parse_crs(&self, element: Element, warnings: &mut Warnings) -> Result<Crs> {
        let (keyword, start) = (element.keyword.clone(), element.start);
        match self.dispatch(element, warnings)? {
            WktObject::Crs(crs) => Ok(crs),
            _ => Err(Error::unparsable(keyword, start, "expected a coordinate reference system")),
        }
    }

    fn is_crs_keyword(keyword: &str) -> bool {
        [
            GEODETIC_CRS,
            PROJECTED_CRS,
            VERTICAL_CRS,
            TEMPORAL_CRS,
            ENGINEERING_CRS,
            PARAMETRIC_CRS,
            COMPOUND_CRS,
        ]
        .iter()
        .any(|group| group.iter().any(|k| k.eq_ignore_ascii_case(keyword)))
    }

    // ========================================================================
    // Handlers (table entries)
    // ========================================================================

    fn handle_ellipsoid(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_ellipsoid(element, w).map(WktObject::Ellipsoid)
    }

    fn handle_prime_meridian(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_prime_meridian(element, None, w)
            .map(WktObject::PrimeMeridian)
    }

    fn handle_geodetic_datum(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_geodetic_datum(element, PrimeMeridian::greenwich(), w)
            .map(|d| WktObject::Datum(Datum::Geodetic(d)))
    }

    fn handle_vertical_datum(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_vertical_datum(element, w)
            .map(|d| WktObject::Datum(Datum::Vertical(d)))
    }

    fn handle_temporal_datum(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_temporal_datum(element, w)
            .map(|d| WktObject::Datum(Datum::Temporal(d)))
    }

    fn handle_engineering_datum(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_engineering_datum(element, w)
            .map(|d| WktObject::Datum(Datum::Engineering(d)))
    }

    fn handle_parametric_datum(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_parametric_datum(element, w)
            .map(|d| WktObject::Datum(Datum::Parametric(d)))
    }

    fn handle_axis(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_axis(element, None, w).map(|(_, axis)| WktObject::Axis(axis))
    }

    fn handle_unit(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let unit = self.parse_unit_element(&mut element, None)?;
        self.drop_identifiers(&mut element);
        element.close(w);
        Ok(WktObject::Unit(unit))
    }

    fn handle_conversion(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let properties = self.parse_properties(&mut element, name, w)?;
        let conversion =
            self.parse_conversion_parts(&mut element, properties, None, &Unit::DEGREE, &Unit::METRE, w)?;
        element.close(w);
        Ok(WktObject::Conversion(conversion))
    }

    fn handle_geodetic_crs(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        let crs = self.parse_geodetic_crs(element, w)?;
        Ok(WktObject::Crs(if crs.cs.kind == CsKind::Ellipsoidal {
            Crs::Geographic(crs)
        } else {
            Crs::Geocentric(crs)
        }))
    }

    fn handle_projected_crs(&self, element: Element, w: &mut Warnings) -> Result<WktObject> {
        self.parse_projected_crs(element, w).map(WktObject::Crs)
    }

    fn handle_vertical_crs(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let datum = self.parse_vertical_datum(element.require_element(VERTICAL_DATUM)?, w)?;
        let header = self.parse_cs_header(&mut element, w)?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Length), w)?
            .unwrap_or(Unit::METRE);
        let cs = self.parse_coordinate_system(&mut element, header, CsKind::Vertical, 1, &unit, CsContext::Other, w)?;
        let name = self.crs_name(name, &datum.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_vertical_crs(properties, datum, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs.map(WktObject::Crs)
    }

    fn handle_temporal_crs(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let datum = self.parse_temporal_datum(element.require_element(TEMPORAL_DATUM)?, w)?;
        let header = self.parse_cs_header(&mut element, w)?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Time), w)?
            .unwrap_or(Unit::SECOND);
        let cs = self.parse_coordinate_system(&mut element, header, CsKind::Temporal, 1, &unit, CsContext::Other, w)?;
        let name = self.crs_name(name, &datum.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_temporal_crs(properties, datum, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs.map(WktObject::Crs)
    }

    fn handle_engineering_crs(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let datum = self.parse_engineering_datum(element.require_element(ENGINEERING_DATUM)?, w)?;
        let header = self.parse_cs_header(&mut element, w)?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Length), w)?
            .unwrap_or(Unit::METRE);
        let cs = self.parse_coordinate_system(
            &mut element,
            header,
            CsKind::Cartesian,
            2,
            &unit,
            CsContext::Engineering,
            w,
        )?;
        let name = self.crs_name(name, &datum.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_engineering_crs(properties, datum, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs.map(WktObject::Crs)
    }

    fn handle_parametric_crs(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let datum = self.parse_parametric_datum(element.require_element(PARAMETRIC_DATUM)?, w)?;
        let header = self.parse_cs_header(&mut element, w)?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Parametric), w)?
            .unwrap_or(Unit::UNITY);
        let cs = self.parse_coordinate_system(&mut element, header, CsKind::Parametric, 1, &unit, CsContext::Other, w)?;
        let name = self.crs_name(name, &datum.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_parametric_crs(properties, datum, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs.map(WktObject::Crs)
    }

    fn handle_compound_crs(&self, mut element: Element, w: &mut Warnings) -> Result<WktObject> {
        let name = element.pull_text("name")?;
        let mut components = Vec::new();
        while let Some(component) = element.pull_element_where(Self::is_crs_keyword) {
            components.push(self.parse_crs(component, w)?);
        }
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_compound_crs(properties, components)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs.map(WktObject::Crs)
    }

    // ========================================================================
    // Shared pieces
    // ========================================================================

    /// Empty CRS names are accepted and replaced by the datum name
    fn crs_name(&self, name: String, datum_name: &str) -> String {
        if name.is_empty() {
            tracing::warn!(datum = datum_name, "CRS has no name, using the datum name");
            datum_name.to_string()
        } else {
            name
        }
    }

    /// Identifiers, remarks and usage
    fn parse_properties(&self, element: &mut Element, name: String, w: &mut Warnings) -> Result<Properties> {
        let mut properties = Properties::named(name);
        for id in element.pull_all(IDENTIFIER) {
            properties.identifiers.push(self.parse_identifier(id, w)?);
        }
        if let Some(mut remark) = element.pull_element(&["REMARK"]) {
            properties.remarks = remark.pull_optional_text();
            remark.close(w);
        }
        for mut usage in element.pull_all(&["USAGE"]) {
            self.parse_usage(&mut usage, &mut properties, w);
            usage.close(w);
        }
        // WKT 2 (2015) puts scope and extent directly in the object
        self.parse_usage(element, &mut properties, w);
        Ok(properties)
    }

    fn parse_usage(&self, element: &mut Element, properties: &mut Properties, w: &mut Warnings) {
        if let Some(mut scope) = element.pull_element(&["SCOPE"]) {
            properties.scope = scope.pull_optional_text();
            scope.close(w);
        }
        if let Some(mut area) = element.pull_element(&["AREA"]) {
            properties.area = area.pull_optional_text();
            area.close(w);
        }
        while element.pull_element(IGNORED_METADATA).is_some() {}
    }

    fn parse_identifier(&self, mut element: Element, w: &mut Warnings) -> Result<Identifier> {
        let authority = element.pull_text("authority")?;
        let code = element.pull_code("code")?;
        let mut identifier = Identifier::new(authority, code);
        identifier.version = element.pull_code("version").ok();
        while element.pull_element(IGNORED_METADATA).is_some() {}
        element.close(w);
        Ok(identifier)
    }

    fn drop_identifiers(&self, element: &mut Element) {
        element.pull_all(IDENTIFIER);
    }

    /// Resolve the unit clause of `element` itself (`element` is a unit keyword)
    fn parse_unit_element(&self, element: &mut Element, hint: Option<UnitKind>) -> Result<Unit> {
        let name = element.pull_text("name")?;
        let factor = element.pull_optional_number();
        if factor.map_or(false, |f| !(f > 0.0 && f.is_finite())) {
            return Err(Error::unparsable(
                &element.keyword,
                element.start,
                format!("invalid conversion factor for unit “{}”", name),
            ));
        }
        let kind = UnitKind::from_keyword(&element.keyword).or(hint);
        self.units.resolve(&name, factor, kind).ok_or_else(|| {
            Error::lossy(
                &element.keyword,
                element.start,
                format!("unit “{}” has no conversion factor and is not known", name),
            )
        })
    }

    /// Pull and resolve the unit clause of `parent`, if any
    fn parse_unit(&self, parent: &mut Element, hint: Option<UnitKind>, w: &mut Warnings) -> Result<Option<Unit>> {
        let Some(mut element) = parent.pull_element(UNIT_KEYWORDS) else {
            return Ok(None);
        };
        let unit = self.parse_unit_element(&mut element, hint)?;
        self.drop_identifiers(&mut element);
        element.close(w);
        Ok(Some(unit))
    }

    // ========================================================================
    // Datum components
    // ========================================================================

    fn parse_ellipsoid(&self, mut element: Element, w: &mut Warnings) -> Result<Ellipsoid> {
        let name = element.pull_text("name")?;
        let semi_major = element.pull_number("semi-major axis")?;
        let inverse_flattening = element.pull_number("inverse flattening")?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Length), w)?
            .unwrap_or(Unit::METRE);
        let properties = self.parse_properties(&mut element, name, w)?;
        let ellipsoid = self
            .factory
            .create_ellipsoid(properties, semi_major, inverse_flattening, unit)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        ellipsoid
    }

    /// `context` is the angular unit of the enclosing CRS, used when the
    /// meridian does not declare its own
    fn parse_prime_meridian(
        &self,
        mut element: Element,
        context: Option<&Unit>,
        w: &mut Warnings,
    ) -> Result<PrimeMeridian> {
        let name = element.pull_text("name")?;
        let longitude = element.pull_number("longitude")?;
        let own = self.parse_unit(&mut element, Some(UnitKind::Angle), w)?;
        let unit = match own {
            Some(unit) => unit,
            None if self.config.convention.legacy_units => {
                tracing::debug!(meridian = %name, "reading prime meridian in degrees");
                Unit::DEGREE
            }
            None => context
                .filter(|u| u.is_angular())
                .cloned()
                .unwrap_or(Unit::DEGREE),
        };
        let properties = self.parse_properties(&mut element, name, w)?;
        let meridian = self
            .factory
            .create_prime_meridian(properties, longitude, unit)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        meridian
    }

    fn parse_bursa_wolf(&self, mut element: Element, w: &mut Warnings) -> Result<BursaWolfParameters> {
        let values = element.pull_numbers();
        let parameters = BursaWolfParameters::from_values(&values).ok_or_else(|| {
            Error::unparsable(
                &element.keyword,
                element.start,
                format!("expected 3 or 7 values, got {}", values.len()),
            )
        });
        element.close(w);
        parameters
    }

    fn parse_anchor(&self, element: &mut Element, w: &mut Warnings) -> Option<String> {
        let mut anchor = element.pull_element(&["ANCHOR"])?;
        let text = anchor.pull_optional_text();
        anchor.close(w);
        text
    }

    // ========================================================================
    // Datums
    // ========================================================================

    fn parse_geodetic_datum(
        &self,
        mut element: Element,
        prime_meridian: PrimeMeridian,
        w: &mut Warnings,
    ) -> Result<GeodeticDatum> {
        let name = element.pull_text("name")?;
        let ellipsoid = self.parse_ellipsoid(element.require_element(ELLIPSOID)?, w)?;
        let bursa_wolf = match element.pull_element(&["TOWGS84"]) {
            Some(towgs84) => Some(self.parse_bursa_wolf(towgs84, w)?),
            None => None,
        };
        let anchor = self.parse_anchor(&mut element, w);
        let properties = self.parse_properties(&mut element, name, w)?;
        let datum = self
            .factory
            .create_geodetic_datum(properties, ellipsoid, prime_meridian, anchor, bursa_wolf)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        datum
    }

    /// Optional integer datum type of WKT 1 `VERT_DATUM` and `LOCAL_DATUM`
    fn parse_datum_type(&self, element: &mut Element, default: i64) -> Result<i64> {
        if element.remaining() == 0 {
            return Ok(default);
        }
        match element.pull_integer("datum type") {
            Ok(code) => Ok(code),
            Err(Error::MissingElement { .. }) => Ok(default),
            Err(err) => Err(err),
        }
    }

    fn parse_vertical_datum(&self, mut element: Element, w: &mut Warnings) -> Result<VerticalDatum> {
        let name = element.pull_text("name")?;
        let datum_type = self.parse_datum_type(&mut element, VerticalDatum::DEFAULT_TYPE)?;
        let anchor = self.parse_anchor(&mut element, w);
        let properties = self.parse_properties(&mut element, name, w)?;
        let datum = self
            .factory
            .create_vertical_datum(properties, anchor, datum_type)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        datum
    }

    fn parse_temporal_datum(&self, mut element: Element, w: &mut Warnings) -> Result<TemporalDatum> {
        let name = element.pull_text("name")?;
        let calendar = element.pull_element(&["CALENDAR"]).and_then(|mut calendar| {
            let text = calendar.pull_optional_text();
            calendar.close(w);
            text
        });
        let mut origin_element = element.require_element(&["TIMEORIGIN"])?;
        let origin = origin_element.pull_date("origin")?;
        origin_element.close(w);
        let properties = self.parse_properties(&mut element, name, w)?;
        let datum = self
            .factory
            .create_temporal_datum(properties, origin, calendar)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        datum
    }

    fn parse_engineering_datum(&self, mut element: Element, w: &mut Warnings) -> Result<EngineeringDatum> {
        let name = element.pull_text("name")?;
        let datum_type = self.parse_datum_type(&mut element, EngineeringDatum::DEFAULT_TYPE)?;
        let anchor = self.parse_anchor(&mut element, w);
        let properties = self.parse_properties(&mut element, name, w)?;
        let datum = self
            .factory
            .create_engineering_datum(properties, anchor, datum_type)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        datum
    }

    fn parse_parametric_datum(&self, mut element: Element, w: &mut Warnings) -> Result<ParametricDatum> {
        let name = element.pull_text("name")?;
        let anchor = self.parse_anchor(&mut element, w);
        let properties = self.parse_properties(&mut element, name, w)?;
        let datum = self
            .factory
            .create_parametric_datum(properties, anchor)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        datum
    }

    // ========================================================================
    // Coordinate systems
    // ========================================================================

    /// `AXIS["name (abbr)", direction, MERIDIAN[...], ORDER[n], unit]`.
    /// `default` is the unit declared by the enclosing CRS.
    fn parse_axis(
        &self,
        mut element: Element,
        default: Option<&Unit>,
        w: &mut Warnings,
    ) -> Result<(Option<i64>, Axis)> {
        let text = element.pull_text("name")?;
        let word = match element.pull_word() {
            Some((word, _)) => word,
            None => element.pull_text("direction")?,
        };
        let mut direction = parse_direction(&word).ok_or_else(|| {
            Error::unparsable(
                &element.keyword,
                element.start,
                format!("unknown axis direction “{}”", word),
            )
        })?;
        if let Some(mut meridian) = element.pull_element(&["MERIDIAN"]) {
            let value = meridian.pull_number("longitude")?;
            let unit = self
                .parse_unit(&mut meridian, Some(UnitKind::Angle), w)?
                .unwrap_or(Unit::DEGREE);
            let degrees = unit.convert_to(value, &Unit::DEGREE).ok_or_else(|| {
                Error::lossy(
                    &meridian.keyword,
                    meridian.start,
                    format!("unit “{}” is not angular", unit.name),
                )
            })?;
            direction = match direction {
                AxisDirection::North => AxisDirection::AlongMeridian {
                    toward: Pole::North,
                    meridian: degrees,
                },
                AxisDirection::South => AxisDirection::AlongMeridian {
                    toward: Pole::South,
                    meridian: degrees,
                },
                other => other,
            };
            meridian.close(w);
        }
        let order = match element.pull_element(&["ORDER"]) {
            Some(mut order) => {
                let n = order.pull_integer("order")?;
                order.close(w);
                Some(n)
            }
            None => None,
        };
        let unit = match self.parse_unit(&mut element, None, w)? {
            Some(unit) => unit,
            None => match default {
                Some(unit) => unit.clone(),
                None => {
                    let (name, _) = split_abbreviation(&text);
                    default_unit(&normalize_name(&name), &direction)
                }
            },
        };
        let mut axis = resolve_axis(&text, direction, unit);
        let name = std::mem::take(&mut axis.properties.name);
        axis.properties = self.parse_properties(&mut element, name, w)?;
        element.close(w);
        Ok((order, axis))
    }

    /// `CS[type, dimension]`, absent in WKT 1
    fn parse_cs_header(&self, parent: &mut Element, w: &mut Warnings) -> Result<Option<(CsKind, usize)>> {
        let Some(mut element) = parent.pull_element(&["CS"]) else {
            return Ok(None);
        };
        let word = match element.pull_word() {
            Some((word, _)) => word,
            None => element.pull_text("type")?,
        };
        let kind = CsKind::from_wkt(&word).ok_or_else(|| {
            Error::unparsable(
                &element.keyword,
                element.start,
                format!("unknown coordinate system type “{}”", word),
            )
        })?;
        let dimension = element.pull_integer("dimension")?;
        if !(1..=9).contains(&dimension) {
            return Err(Error::unparsable(
                &element.keyword,
                element.start,
                format!("invalid dimension {}", dimension),
            ));
        }
        self.drop_identifiers(&mut element);
        element.close(w);
        Ok(Some((kind, dimension as usize)))
    }

    /// Parse the AXIS children of `parent`, or build the implicit axes, then
    /// sort, rewrite and validate them.
    #[allow(clippy::too_many_arguments)]
    fn parse_coordinate_system(
        &self,
        parent: &mut Element,
        header: Option<(CsKind, usize)>,
        default_kind: CsKind,
        default_dimension: usize,
        unit: &Unit,
        context: CsContext,
        w: &mut Warnings,
    ) -> Result<CoordinateSystem> {
        let (kind, dimension) = match header {
            Some((kind, dimension)) => (kind, Some(dimension)),
            None => (default_kind, None),
        };
        let mut declared = Vec::new();
        for axis in parent.pull_all(&["AXIS"]) {
            declared.push(self.parse_axis(axis, Some(unit), w)?);
        }
        // A WKT 2 CS[...] header means the axes were written by a conforming producer
        if self.config.convention.ignores_axes() && header.is_none() && !declared.is_empty() {
            tracing::debug!(element = %parent.keyword, "ignoring AXIS elements");
            declared.clear();
        }
        let mut axes = if declared.is_empty() {
            implicit_axes(kind, unit, dimension.unwrap_or(default_dimension))
                .map_err(|message| Error::lossy(&parent.keyword, parent.start, message))?
        } else {
            sort_by_order(declared)
        };
        apply_context(&mut axes, context);
        if let Some(dimension) = dimension {
            if axes.len() != dimension {
                return Err(Error::unparsable(
                    &parent.keyword,
                    parent.start,
                    format!("coordinate system declares {} axes but {} were found", dimension, axes.len()),
                ));
            }
        }
        self.factory
            .create_coordinate_system(kind, axes)
            .map_err(|e| invalid(parent, e))
    }

    // ========================================================================
    // Geodetic and projected CRS
    // ========================================================================

    fn parse_geodetic_crs(&self, mut element: Element, w: &mut Warnings) -> Result<GeodeticCrs> {
        let name = element.pull_text("name")?;
        let header = self.parse_cs_header(&mut element, w)?;
        let kind = match header {
            Some((kind, _)) => kind,
            None if element.is(&["GEOCCS"]) => CsKind::Cartesian,
            None => CsKind::Ellipsoidal,
        };
        let (hint, fallback, context, default_dimension) = if kind == CsKind::Ellipsoidal {
            (UnitKind::Angle, Unit::DEGREE, CsContext::Ellipsoidal, 2)
        } else {
            (UnitKind::Length, Unit::METRE, CsContext::Geocentric, 3)
        };
        let unit = self.parse_unit(&mut element, Some(hint), w)?.unwrap_or(fallback);
        // Before DATUM: WKT 1 writers put PRIMEM after it, but its unit comes from the CRS
        let prime_meridian = match element.pull_element(PRIME_MERIDIAN) {
            Some(pm) => self.parse_prime_meridian(pm, Some(&unit), w)?,
            None => PrimeMeridian::greenwich(),
        };
        let datum = self.parse_geodetic_datum(element.require_element(GEODETIC_DATUM)?, prime_meridian, w)?;
        let cs = self.parse_coordinate_system(&mut element, header, kind, default_dimension, &unit, context, w)?;
        let name = self.crs_name(name, &datum.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_geodetic_crs(properties, datum, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs
    }

    fn parse_projected_crs(&self, mut element: Element, w: &mut Warnings) -> Result<Crs> {
        let name = element.pull_text("name")?;
        let base = self.parse_geodetic_crs(element.require_element(BASE_GEODETIC_CRS)?, w)?;
        let header = self.parse_cs_header(&mut element, w)?;
        let unit = self
            .parse_unit(&mut element, Some(UnitKind::Length), w)?
            .unwrap_or(Unit::METRE);
        let angular = base
            .cs
            .common_unit()
            .filter(|u| u.is_angular())
            .cloned()
            .unwrap_or(Unit::DEGREE);
        let ellipsoid = &base.datum.ellipsoid;
        let conversion = match element.pull_element(CONVERSION) {
            Some(mut c) => {
                let conversion_name = c.pull_text("name")?;
                let properties = self.parse_properties(&mut c, conversion_name, w)?;
                let conversion =
                    self.parse_conversion_parts(&mut c, properties, Some(ellipsoid), &angular, &unit, w)?;
                c.close(w);
                conversion
            }
            // WKT 1: PROJECTION and PARAMETER are children of PROJCS
            None => self.parse_conversion_parts(
                &mut element,
                Properties::default(),
                Some(ellipsoid),
                &angular,
                &unit,
                w,
            )?,
        };
        let cs = self.parse_coordinate_system(&mut element, header, CsKind::Cartesian, 2, &unit, CsContext::Other, w)?;
        let name = self.crs_name(name, &base.properties.name);
        let properties = self.parse_properties(&mut element, name, w)?;
        let crs = self
            .factory
            .create_projected_crs(properties, base, conversion, cs)
            .map_err(|e| invalid(&element, e));
        element.close(w);
        crs
    }

    /// Method and parameters pulled from `holder`. WKT 1 conversions have no
    /// name of their own and take the name of the method.
    fn parse_conversion_parts(
        &self,
        holder: &mut Element,
        mut properties: Properties,
        ellipsoid: Option<&Ellipsoid>,
        angular: &Unit,
        linear: &Unit,
        w: &mut Warnings,
    ) -> Result<Conversion> {
        let method = self.parse_method(holder.require_element(METHOD)?, w)?;
        if properties.name.is_empty() {
            properties.name = method.properties.name.clone();
        }
        let mut values = Vec::new();
        for parameter in holder.pull_all(&["PARAMETER"]) {
            values.push(self.parse_parameter(parameter, &method, angular, linear, w)?);
        }
        for file in holder.pull_all(&["PARAMETERFILE"]) {
            values.push(self.parse_parameter_file(file, &method, w)?);
        }
        self.factory
            .create_conversion(properties, method, values, ellipsoid)
            .map_err(|e| invalid(holder, e))
    }

    fn parse_method(&self, mut element: Element, w: &mut Warnings) -> Result<OperationMethod> {
        let name = element.pull_text("name")?;
        let mut properties = self.parse_properties(&mut element, name, w)?;
        let descriptor = self.registry.resolve_method(&properties.name).or_else(|| {
            properties
                .identifiers
                .iter()
                .filter(|id| id.authority.eq_ignore_ascii_case("EPSG"))
                .find_map(|id| lexical_core::parse::<u32>(id.code.as_bytes()).ok())
                .and_then(|code| self.registry.resolve_epsg(code))
        });
        match descriptor {
            Some(d) => properties.name = d.name.to_string(),
            None => {
                tracing::warn!(method = %properties.name, "unknown operation method");
                w.add_notice(Notice::UnknownMethod {
                    name: properties.name.clone(),
                });
            }
        }
        element.close(w);
        Ok(OperationMethod {
            properties,
            descriptor,
        })
    }

    fn resolve_parameter_name(
        &self,
        method: &OperationMethod,
        name: &str,
        w: &mut Warnings,
    ) -> Option<&'static ParameterDescriptor> {
        let descriptor: &'static MethodDescriptor = method.descriptor?;
        let found = self.registry.resolve_parameter(descriptor, name);
        if found.is_none() {
            tracing::warn!(parameter = name, method = descriptor.name, "unknown parameter");
            w.add_notice(Notice::UnknownParameter {
                name: name.to_string(),
                method: descriptor.name.to_string(),
            });
        }
        found
    }

    /// `PARAMETER["name", value, unit]`. Values without unit are in the
    /// unit of the enclosing CRS matching the parameter kind.
    fn parse_parameter(
        &self,
        mut element: Element,
        method: &OperationMethod,
        angular: &Unit,
        linear: &Unit,
        w: &mut Warnings,
    ) -> Result<ParameterValue> {
        let name = element.pull_text("name")?;
        let value = element.pull_number("value")?;
        let descriptor = self.resolve_parameter_name(method, &name, w);
        let kind = descriptor.map(|d| d.kind);
        let own = self.parse_unit(&mut element, kind.and_then(ParameterKind::unit_kind), w)?;
        let legacy = self.config.convention.legacy_units;
        let unit = match (own, kind) {
            (Some(unit), _) => Some(unit),
            (None, Some(ParameterKind::Angle)) if legacy => Some(Unit::DEGREE),
            (None, Some(ParameterKind::Length)) if legacy => Some(Unit::METRE),
            (None, Some(ParameterKind::Angle)) => Some(angular.clone()),
            (None, Some(ParameterKind::Length)) => Some(linear.clone()),
            (None, Some(ParameterKind::Scale)) => Some(Unit::UNITY),
            (None, _) => None,
        };
        if let (Some(unit), Some(expected)) = (&unit, kind.and_then(ParameterKind::unit_kind)) {
            if unit.kind != expected {
                return Err(Error::lossy(
                    &element.keyword,
                    element.start,
                    format!("unit “{}” does not apply to parameter “{}”", unit.name, name),
                ));
            }
        }
        let name = descriptor.map_or(name, |d| d.name.to_string());
        let properties = self.parse_properties(&mut element, name, w)?;
        element.close(w);
        Ok(ParameterValue {
            properties,
            descriptor,
            value: ParamValue::Number(value),
            unit,
            origin: ParameterOrigin::Explicit,
        })
    }

    fn parse_parameter_file(
        &self,
        mut element: Element,
        method: &OperationMethod,
        w: &mut Warnings,
    ) -> Result<ParameterValue> {
        let name = element.pull_text("name")?;
        let file = element.pull_text("file name")?;
        let descriptor = self.resolve_parameter_name(method, &name, w);
        let name = descriptor.map_or(name, |d| d.name.to_string());
        let properties = self.parse_properties(&mut element, name, w)?;
        element.close(w);
        Ok(ParameterValue {
            properties,
            descriptor,
            value: ParamValue::Text(file),
            unit: None,
            origin: ParameterOrigin::Explicit,
        })
    }
}
