// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT formatter
//!
//! Walks a parsed object graph and builds a small output tree (one [`Node`]
//! per bracketed clause), then renders it with the configured symbols,
//! locale and indentation. Objects that have no representation in the
//! selected dialect are written in a best-effort form and reported in
//! [`Formatted::invalid_elements`].

use std::fmt::{self, Write};

use chrono::SecondsFormat;

use crate::axis::{default_abbreviation, implicit_axes, AxisDirection};
use crate::config::Config;
use crate::model::*;
use crate::registry::{Authority, ParameterKind};
use crate::units::Unit;

/// Result of formatting one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    /// Keywords written in a form the selected dialect does not define
    pub invalid_elements: Vec<String>,
}

impl Formatted {
    pub fn is_valid(&self) -> bool {
        self.invalid_elements.is_empty()
    }
}

/// One child of an output clause
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Text(String),
    Number(f64),
    /// Written verbatim: enumerations, dates, codes, pre-formatted numbers
    Word(String),
    Node(Node),
}

/// One output clause
#[derive(Debug, Clone, PartialEq)]
struct Node {
    keyword: &'static str,
    args: Vec<Arg>,
}

impl Node {
    fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            args: Vec::new(),
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.args.push(Arg::Text(text.into()));
        self
    }

    fn number(mut self, value: f64) -> Self {
        self.args.push(Arg::Number(value));
        self
    }

    fn word(mut self, word: impl Into<String>) -> Self {
        self.args.push(Arg::Word(word.into()));
        self
    }

    fn child(mut self, node: Node) -> Self {
        self.args.push(Arg::Node(node));
        self
    }

    fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.args.extend(nodes.into_iter().map(Arg::Node));
        self
    }
}

/// Shortest text that parses back to the same value
pub fn format_number(value: f64, decimal_separator: char) -> String {
    let magnitude = value.abs();
    let text = if magnitude != 0.0 && !(1e-5..1e15).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    };
    if decimal_separator == '.' {
        text
    } else {
        text.replace('.', &decimal_separator.to_string())
    }
}

/// Fraction digits needed to show the variation of a grid of values.
///
/// Samples the four corners and the center, takes the difference between
/// each sample and its neighbour cells, and keeps enough digits to show the
/// smallest non-zero difference plus one. `None` for a grid with no
/// variation.
pub fn suggest_fraction_digits(rows: &[Vec<f64>]) -> Option<usize> {
    let height = rows.len();
    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    if height == 0 || width == 0 {
        return None;
    }
    let samples = [
        (0, 0),
        (0, width - 1),
        (height - 1, 0),
        (height - 1, width - 1),
        (height / 2, width / 2),
    ];
    let mut smallest = f64::INFINITY;
    for (r, c) in samples {
        let value = rows[r][c];
        let neighbours = [
            (r.checked_sub(1), Some(c)),
            (Some(r + 1).filter(|&n| n < height), Some(c)),
            (Some(r), c.checked_sub(1)),
            (Some(r), Some(c + 1).filter(|&n| n < width)),
        ];
        for (nr, nc) in neighbours {
            if let (Some(nr), Some(nc)) = (nr, nc) {
                let diff = (rows[nr][nc] - value).abs();
                if diff > 0.0 && diff.is_finite() {
                    smallest = smallest.min(diff);
                }
            }
        }
    }
    if !smallest.is_finite() {
        return None;
    }
    // Tolerance absorbs noise such as 2.01 - 2.0 = 0.00999999999999979
    let digits = (-smallest.log10() - 1e-9).ceil() + 1.0;
    Some(digits.clamp(0.0, 17.0) as usize)
}

/// WKT writer for the objects returned by the decoder
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: Config,
}

impl Formatter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn format(&self, object: &WktObject) -> Formatted {
        let mut context = Context::new(&self.config);
        let node = context.object(object);
        context.finish(&node)
    }

    pub fn format_crs(&self, crs: &Crs) -> Formatted {
        let mut context = Context::new(&self.config);
        let node = context.crs(crs);
        context.finish(&node)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Formatter::default().format_crs(self).text)
    }
}

/// State of one `format` call
struct Context<'a> {
    config: &'a Config,
    wkt1: bool,
    invalid: Vec<String>,
}

impl<'a> Context<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            wkt1: config.convention.is_wkt1(),
            invalid: Vec::new(),
        }
    }

    fn mark_invalid(&mut self, keyword: &str) {
        tracing::debug!(keyword, "element has no standard form in this dialect");
        if !self.invalid.iter().any(|k| k == keyword) {
            self.invalid.push(keyword.to_string());
        }
    }

    fn finish(self, node: &Node) -> Formatted {
        let mut writer = Writer {
            config: self.config,
            out: String::new(),
        };
        // Writing to a String can not fail
        let _ = writer.node(node, 0);
        Formatted {
            text: writer.out,
            invalid_elements: self.invalid,
        }
    }

    /// Run `f` with the WKT 2 rules, for objects WKT 1 can not express
    fn as_wkt2<T>(&mut self, keyword: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        if !self.wkt1 {
            return f(self);
        }
        self.mark_invalid(keyword);
        self.wkt1 = false;
        let out = f(self);
        self.wkt1 = true;
        out
    }

    fn object(&mut self, object: &WktObject) -> Node {
        match object {
            WktObject::Crs(crs) => self.crs(crs),
            WktObject::Datum(datum) => self.datum(datum),
            WktObject::Ellipsoid(e) => self.ellipsoid(e),
            WktObject::PrimeMeridian(pm) => self.prime_meridian(pm, None),
            WktObject::Axis(axis) => self.axis(axis, None, true),
            WktObject::Conversion(c) => self.as_wkt2("CONVERSION", |cx| {
                cx.conversion(c, &Unit::DEGREE, &Unit::METRE)
            }),
            WktObject::Unit(unit) => self.unit(unit),
        }
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Identifiers, scope, area and remarks appended to `node`
    fn properties(&self, mut node: Node, properties: &Properties) -> Node {
        if self.wkt1 {
            // WKT 1 has room for one authority code
            if let Some(id) = properties.identifiers.first() {
                node = node.child(Node::new("AUTHORITY").text(&id.authority).text(&id.code));
            }
            return node;
        }
        if properties.scope.is_some() || properties.area.is_some() {
            let mut usage = Node::new("USAGE");
            if let Some(scope) = &properties.scope {
                usage = usage.child(Node::new("SCOPE").text(scope));
            }
            if let Some(area) = &properties.area {
                usage = usage.child(Node::new("AREA").text(area));
            }
            node = node.child(usage);
        }
        for id in &properties.identifiers {
            let mut clause = Node::new("ID").text(&id.authority);
            // Numeric codes are written bare unless that would lose leading zeros
            let numeric = id.code.parse::<u64>().map_or(false, |n| n.to_string() == id.code);
            clause = if numeric {
                clause.word(&id.code)
            } else {
                clause.text(&id.code)
            };
            if let Some(version) = &id.version {
                clause = clause.text(version);
            }
            node = node.child(clause);
        }
        if let Some(remarks) = &properties.remarks {
            node = node.child(Node::new("REMARK").text(remarks));
        }
        node
    }

    fn unit(&self, unit: &Unit) -> Node {
        let keyword = if self.wkt1 {
            "UNIT"
        } else {
            unit.kind.wkt2_keyword()
        };
        Node::new(keyword).text(unit.name.to_string()).number(unit.factor)
    }

    fn ellipsoid(&self, e: &Ellipsoid) -> Node {
        let inverse_flattening = if e.is_sphere() {
            0.0
        } else {
            e.inverse_flattening
        };
        let node = if self.wkt1 {
            Node::new("SPHEROID")
                .text(&e.properties.name)
                .number(e.semi_major_metres())
                .number(inverse_flattening)
        } else {
            Node::new("ELLIPSOID")
                .text(&e.properties.name)
                .number(e.semi_major)
                .number(inverse_flattening)
                .child(self.unit(&e.unit))
        };
        self.properties(node, &e.properties)
    }

    /// `crs_unit` is the angular unit of the enclosing CRS. WKT 1 meridians
    /// are written in it, or in degrees under the legacy unit rules. A
    /// standalone WKT 1 meridian has no unit to refer to and is written in
    /// degrees, so it reads back in degrees.
    fn prime_meridian(&self, pm: &PrimeMeridian, crs_unit: Option<&Unit>) -> Node {
        let node = Node::new("PRIMEM").text(&pm.properties.name);
        let node = if self.wkt1 {
            let target = match crs_unit {
                Some(unit) if !self.config.convention.legacy_units => unit,
                _ => &Unit::DEGREE,
            };
            let longitude = pm
                .greenwich_longitude_in(target)
                .unwrap_or(pm.greenwich_longitude);
            node.number(longitude)
        } else {
            node.number(pm.greenwich_longitude)
                .child(self.unit(&pm.angular_unit))
        };
        self.properties(node, &pm.properties)
    }

    fn anchor(&self, node: Node, anchor: &Option<String>) -> Node {
        match anchor {
            Some(anchor) if !self.wkt1 => node.child(Node::new("ANCHOR").text(anchor)),
            _ => node,
        }
    }

    // ========================================================================
    // Datums
    // ========================================================================

    fn datum(&mut self, datum: &Datum) -> Node {
        match datum {
            Datum::Geodetic(d) => self.geodetic_datum(d),
            Datum::Vertical(d) => self.vertical_datum(d),
            Datum::Temporal(d) => self.as_wkt2("TDATUM", |cx| cx.temporal_datum(d)),
            Datum::Engineering(d) => self.engineering_datum(d),
            Datum::Parametric(d) => self.as_wkt2("PDATUM", |cx| cx.parametric_datum(d)),
        }
    }

    fn geodetic_datum(&mut self, d: &GeodeticDatum) -> Node {
        let mut node = Node::new("DATUM")
            .text(&d.properties.name)
            .child(self.ellipsoid(&d.ellipsoid));
        if let Some(bursa_wolf) = &d.bursa_wolf {
            if !self.wkt1 {
                // WKT 2 moves this to BOUNDCRS
                self.mark_invalid("TOWGS84");
            }
            let mut towgs84 = Node::new("TOWGS84");
            for value in bursa_wolf.values() {
                towgs84 = towgs84.number(value);
            }
            node = node.child(towgs84);
        }
        let node = self.anchor(node, &d.anchor);
        self.properties(node, &d.properties)
    }

    fn vertical_datum(&self, d: &VerticalDatum) -> Node {
        let node = if self.wkt1 {
            Node::new("VERT_DATUM")
                .text(&d.properties.name)
                .number(d.datum_type as f64)
        } else {
            self.anchor(Node::new("VDATUM").text(&d.properties.name), &d.anchor)
        };
        self.properties(node, &d.properties)
    }

    fn temporal_datum(&self, d: &TemporalDatum) -> Node {
        let mut node = Node::new("TDATUM").text(&d.properties.name);
        if let Some(calendar) = &d.calendar {
            node = node.child(Node::new("CALENDAR").text(calendar));
        }
        let origin = d.origin.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        node = node.child(Node::new("TIMEORIGIN").word(origin));
        self.properties(node, &d.properties)
    }

    fn engineering_datum(&self, d: &EngineeringDatum) -> Node {
        let node = if self.wkt1 {
            Node::new("LOCAL_DATUM")
                .text(&d.properties.name)
                .number(d.datum_type as f64)
        } else {
            self.anchor(Node::new("EDATUM").text(&d.properties.name), &d.anchor)
        };
        self.properties(node, &d.properties)
    }

    fn parametric_datum(&self, d: &ParametricDatum) -> Node {
        let node = self.anchor(Node::new("PDATUM").text(&d.properties.name), &d.anchor);
        self.properties(node, &d.properties)
    }

    // ========================================================================
    // Coordinate systems
    // ========================================================================

    /// `order` is the 1-based position in the enclosing CS. The unit is
    /// omitted when the CS writes a common one.
    fn axis(&mut self, axis: &Axis, order: Option<usize>, with_unit: bool) -> Node {
        let node = if self.wkt1 {
            let name = match axis.properties.name.as_str() {
                "Geodetic longitude" => "Longitude",
                "Geodetic latitude" => "Latitude",
                other => other,
            };
            // Only non-default abbreviations need to be spelled out
            let name = if axis.abbreviation == default_abbreviation(&axis.properties.name, &axis.direction) {
                name.to_string()
            } else {
                format!("{} ({})", name, axis.abbreviation)
            };
            let direction = match axis.direction.wkt1_name() {
                Some(direction) => direction.to_string(),
                None => {
                    self.mark_invalid("AXIS");
                    axis.direction.wkt2_name().to_ascii_uppercase()
                }
            };
            Node::new("AXIS").text(name).word(direction)
        } else {
            let mut node = Node::new("AXIS")
                .text(format!("{} ({})", axis.properties.name, axis.abbreviation))
                .word(axis.direction.wkt2_name());
            if let AxisDirection::AlongMeridian { meridian, .. } = axis.direction {
                node = node.child(
                    Node::new("MERIDIAN")
                        .number(meridian)
                        .child(self.unit(&Unit::DEGREE)),
                );
            }
            if let Some(order) = order {
                node = node.child(Node::new("ORDER").number(order as f64));
            }
            if with_unit {
                node = node.child(self.unit(&axis.unit));
            }
            node
        };
        self.properties(node, &axis.properties)
    }

    /// `CS`, `AXIS` and unit clauses of a CRS
    fn coordinate_system(&mut self, cs: &CoordinateSystem) -> Vec<Node> {
        let common = cs.common_unit();
        let mut nodes = Vec::with_capacity(cs.axes.len() + 2);
        if self.wkt1 {
            if let Some(unit) = common.or_else(|| cs.axes.first().map(|a| &a.unit)) {
                nodes.push(self.unit(unit));
            }
            if !self.config.convention.ignores_axes() {
                for axis in &cs.axes {
                    nodes.push(self.axis(axis, None, false));
                }
            }
            return nodes;
        }
        nodes.push(
            Node::new("CS")
                .word(cs.kind.wkt_name())
                .number(cs.dimension() as f64),
        );
        let numbered = cs.axes.len() > 1;
        for (i, axis) in cs.axes.iter().enumerate() {
            let order = numbered.then_some(i + 1);
            nodes.push(self.axis(axis, order, common.is_none()));
        }
        if let Some(unit) = common {
            nodes.push(self.unit(unit));
        }
        nodes
    }

    // ========================================================================
    // Coordinate reference systems
    // ========================================================================

    fn crs(&mut self, crs: &Crs) -> Node {
        match crs {
            Crs::Geographic(g) => {
                let keyword = if self.wkt1 { "GEOGCS" } else { "GEOGCRS" };
                self.geodetic_crs(keyword, g)
            }
            Crs::Geocentric(g) => {
                let keyword = if self.wkt1 { "GEOCCS" } else { "GEODCRS" };
                self.geodetic_crs(keyword, g)
            }
            Crs::Projected(p) => self.projected_crs(p),
            Crs::Vertical(v) => {
                let keyword = if self.wkt1 { "VERT_CS" } else { "VERTCRS" };
                let node = Node::new(keyword)
                    .text(&v.properties.name)
                    .child(self.vertical_datum(&v.datum));
                self.finish_crs(node, &v.cs, &v.properties)
            }
            Crs::Temporal(t) => self.as_wkt2("TIMECRS", |cx| {
                let node = Node::new("TIMECRS")
                    .text(&t.properties.name)
                    .child(cx.temporal_datum(&t.datum));
                cx.finish_crs(node, &t.cs, &t.properties)
            }),
            Crs::Engineering(e) => {
                let keyword = if self.wkt1 { "LOCAL_CS" } else { "ENGCRS" };
                let node = Node::new(keyword)
                    .text(&e.properties.name)
                    .child(self.engineering_datum(&e.datum));
                self.finish_crs(node, &e.cs, &e.properties)
            }
            Crs::Parametric(p) => self.as_wkt2("PARAMETRICCRS", |cx| {
                let node = Node::new("PARAMETRICCRS")
                    .text(&p.properties.name)
                    .child(cx.parametric_datum(&p.datum));
                cx.finish_crs(node, &p.cs, &p.properties)
            }),
            Crs::Compound(c) => {
                let keyword = if self.wkt1 { "COMPD_CS" } else { "COMPOUNDCRS" };
                let mut node = Node::new(keyword).text(&c.properties.name);
                for component in &c.components {
                    node = node.child(self.crs(component));
                }
                self.properties(node, &c.properties)
            }
        }
    }

    fn finish_crs(&mut self, node: Node, cs: &CoordinateSystem, properties: &Properties) -> Node {
        let node = node.children(self.coordinate_system(cs));
        self.properties(node, properties)
    }

    fn geodetic_crs(&mut self, keyword: &'static str, crs: &GeodeticCrs) -> Node {
        let angular = crs.cs.common_unit().filter(|u| u.is_angular());
        let datum = self.geodetic_datum(&crs.datum);
        let node = Node::new(keyword)
            .text(&crs.properties.name)
            .child(datum)
            .child(self.prime_meridian(&crs.datum.prime_meridian, angular));
        self.finish_crs(node, &crs.cs, &crs.properties)
    }

    /// WKT 2 base CRS: no CS clause unless the axes differ from the implicit ones
    fn base_crs(&mut self, base: &GeodeticCrs) -> Node {
        if self.wkt1 {
            return self.geodetic_crs("GEOGCS", base);
        }
        let angular = base.cs.common_unit().filter(|u| u.is_angular());
        let mut node = Node::new("BASEGEOGCRS")
            .text(&base.properties.name)
            .child(self.geodetic_datum(&base.datum))
            .child(self.prime_meridian(&base.datum.prime_meridian, angular));
        let implicit = angular.and_then(|unit| {
            implicit_axes(CsKind::Ellipsoidal, unit, base.cs.dimension()).ok()
        });
        match (angular, implicit) {
            (Some(unit), Some(axes)) if axes == base.cs.axes => {
                node = node.child(self.unit(unit));
            }
            _ => node = node.children(self.coordinate_system(&base.cs)),
        }
        self.properties(node, &base.properties)
    }

    fn projected_crs(&mut self, p: &ProjectedCrs) -> Node {
        let keyword = if self.wkt1 { "PROJCS" } else { "PROJCRS" };
        let angular = p
            .base
            .cs
            .common_unit()
            .filter(|u| u.is_angular())
            .cloned()
            .unwrap_or(Unit::DEGREE);
        let linear = p
            .cs
            .common_unit()
            .filter(|u| u.is_linear())
            .cloned()
            .unwrap_or(Unit::METRE);
        let mut node = Node::new(keyword)
            .text(&p.properties.name)
            .child(self.base_crs(&p.base));
        if self.wkt1 {
            node = node.children(self.projection(&p.conversion, &angular, &linear));
        } else {
            node = node.child(self.conversion(&p.conversion, &angular, &linear));
        }
        self.finish_crs(node, &p.cs, &p.properties)
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    fn method(&self, method: &OperationMethod) -> Node {
        if self.wkt1 {
            let name = method
                .descriptor
                .and_then(|d| d.alias(Authority::Ogc))
                .unwrap_or(method.properties.name.as_str());
            let node = Node::new("PROJECTION").text(name);
            return self.properties(node, &method.properties);
        }
        let node = Node::new("METHOD").text(&method.properties.name);
        self.properties(node, &method.properties)
    }

    fn conversion(&mut self, c: &Conversion, angular: &Unit, linear: &Unit) -> Node {
        let mut node = Node::new("CONVERSION")
            .text(&c.properties.name)
            .child(self.method(&c.method));
        for parameter in c.parameters.values.iter().filter(|p| p.origin == ParameterOrigin::Explicit) {
            node = node.child(self.parameter(parameter, angular, linear));
        }
        self.properties(node, &c.properties)
    }

    /// WKT 1 `PROJECTION` and `PARAMETER` clauses, children of `PROJCS`
    fn projection(&mut self, c: &Conversion, angular: &Unit, linear: &Unit) -> Vec<Node> {
        let mut nodes = vec![self.method(&c.method)];
        for parameter in c.parameters.values.iter().filter(|p| p.origin == ParameterOrigin::Explicit) {
            nodes.push(self.parameter(parameter, angular, linear));
        }
        nodes
    }

    fn parameter(&mut self, p: &ParameterValue, angular: &Unit, linear: &Unit) -> Node {
        let name = if self.wkt1 {
            p.descriptor
                .and_then(|d| d.alias(Authority::Ogc))
                .unwrap_or(p.properties.name.as_str())
        } else {
            p.properties.name.as_str()
        };
        let node = match &p.value {
            ParamValue::Number(value) if self.wkt1 => {
                let legacy = self.config.convention.legacy_units;
                let target = match p.descriptor.map(|d| d.kind) {
                    Some(ParameterKind::Angle) if legacy => Some(&Unit::DEGREE),
                    Some(ParameterKind::Angle) => Some(angular),
                    Some(ParameterKind::Length) if legacy => Some(&Unit::METRE),
                    Some(ParameterKind::Length) => Some(linear),
                    _ => None,
                };
                let value = match (target, &p.unit) {
                    (Some(target), Some(unit)) => unit.convert_to(*value, target).unwrap_or(*value),
                    _ => *value,
                };
                Node::new("PARAMETER").text(name).number(value)
            }
            ParamValue::Number(value) => {
                let node = Node::new("PARAMETER").text(name).number(*value);
                match &p.unit {
                    Some(unit) => node.child(self.unit(unit)),
                    None => node,
                }
            }
            ParamValue::Text(file) => {
                if self.wkt1 {
                    self.mark_invalid("PARAMETERFILE");
                }
                Node::new("PARAMETERFILE").text(name).text(file)
            }
            ParamValue::Matrix(rows) => {
                self.mark_invalid("MATRIX");
                let digits = suggest_fraction_digits(rows);
                let mut matrix = Node::new("MATRIX");
                for row in rows {
                    let mut clause = Node::new("ROW");
                    for value in row {
                        clause = match digits {
                            Some(digits) => clause.word(self.fixed(*value, digits)),
                            None => clause.number(*value),
                        };
                    }
                    matrix = matrix.child(clause);
                }
                Node::new("PARAMETER").text(name).child(matrix)
            }
        };
        self.properties(node, &p.properties)
    }

    fn fixed(&self, value: f64, digits: usize) -> String {
        let text = format!("{:.*}", digits, value);
        match self.config.locale.decimal_separator {
            '.' => text,
            other => text.replace('.', &other.to_string()),
        }
    }
}

/// Renders the output tree
struct Writer<'a> {
    config: &'a Config,
    out: String,
}

impl Writer<'_> {
    fn node(&mut self, node: &Node, depth: usize) -> fmt::Result {
        let (open, close) = self.config.symbols.output_brackets();
        let indentation = self.config.indentation;
        self.out.write_str(node.keyword)?;
        self.out.write_char(open)?;
        for (i, arg) in node.args.iter().enumerate() {
            if i > 0 {
                self.out.write_char(self.config.symbols.separator)?;
            }
            match arg {
                Arg::Node(child) if indentation > 0 => {
                    self.out.write_char('\n')?;
                    for _ in 0..(depth + 1) * indentation {
                        self.out.write_char(' ')?;
                    }
                    self.node(child, depth + 1)?;
                }
                other => {
                    if i > 0 {
                        self.out.write_char(' ')?;
                    }
                    self.scalar(other, depth)?;
                }
            }
        }
        self.out.write_char(close)
    }

    fn scalar(&mut self, arg: &Arg, depth: usize) -> fmt::Result {
        match arg {
            Arg::Text(text) => {
                let (open, close) = self.config.symbols.output_quotes();
                self.out.write_char(open)?;
                for c in text.chars() {
                    if c == close && open == close {
                        self.out.write_char(c)?;
                    }
                    self.out.write_char(c)?;
                }
                self.out.write_char(close)
            }
            Arg::Number(value) => self
                .out
                .write_str(&format_number(*value, self.config.locale.decimal_separator)),
            Arg::Word(word) => self.out.write_str(word),
            Arg::Node(node) => self.node(node, depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Convention;
    use crate::decoder::GeodeticDecoder;
    use crate::symbols::Locale;
    use crate::units::UnitKind;

    const WGS84: &str = r#"GEOGCS["WGS 84",
        DATUM["World Geodetic System 1984",
          SPHEROID["WGS84", 6378137.0, 298.257223563]],
        PRIMEM["Greenwich", 0.0],
        UNIT["degree", 0.017453292519943295],
        AUTHORITY["EPSG", "4326"]]"#;

    fn wgs84() -> Crs {
        GeodeticDecoder::default()
            .parse(WGS84)
            .unwrap()
            .object
            .into_crs()
            .unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(6378137.0, '.'), "6378137");
        assert_eq!(format_number(0.017453292519943295, '.'), "0.017453292519943295");
        assert_eq!(format_number(2.5, ','), "2,5");
        assert_eq!(format_number(1e-7, '.'), "1e-7");
    }

    #[test]
    fn test_suggest_fraction_digits() {
        let rows = vec![vec![0.0, 0.01, 0.02], vec![1.0, 1.01, 1.02], vec![2.0, 2.01, 2.02]];
        assert_eq!(suggest_fraction_digits(&rows), Some(3));
        let coarse = vec![vec![0.0, 0.25, 0.5], vec![1.0, 1.25, 1.5]];
        assert_eq!(suggest_fraction_digits(&coarse), Some(2));
        assert_eq!(suggest_fraction_digits(&[vec![5.0, 5.0]]), None);
        assert_eq!(suggest_fraction_digits(&[]), None);
    }

    #[test]
    fn test_wkt2_geographic() {
        let text = wgs84().to_string();
        assert!(text.starts_with(r#"GEOGCRS["WGS 84", DATUM["World Geodetic System 1984", ELLIPSOID["WGS84", 6378137, 298.257223563, LENGTHUNIT["metre", 1]]]"#));
        assert!(text.contains(r#"CS[ellipsoidal, 2], AXIS["Geodetic longitude (λ)", east, ORDER[1]]"#));
        assert!(text.ends_with(r#"ANGLEUNIT["degree", 0.017453292519943295], ID["EPSG", 4326]]"#));
    }

    #[test]
    fn test_wkt1_geographic() {
        let formatter = Formatter::new(Config::new(Convention::WKT1));
        let formatted = formatter.format_crs(&wgs84());
        assert!(formatted.is_valid());
        assert_eq!(
            formatted.text,
            r#"GEOGCS["WGS 84", DATUM["World Geodetic System 1984", SPHEROID["WGS84", 6378137, 298.257223563]], PRIMEM["Greenwich", 0], UNIT["degree", 0.017453292519943295], AXIS["Longitude", EAST], AXIS["Latitude", NORTH], AUTHORITY["EPSG", "4326"]]"#
        );
    }

    #[test]
    fn test_indentation() {
        let formatter = Formatter::new(Config::default().with_indentation(2));
        let text = formatter.format_crs(&wgs84()).text;
        assert!(text.starts_with("GEOGCRS[\"WGS 84\",\n  DATUM[\"World Geodetic System 1984\",\n    ELLIPSOID["));
    }

    #[test]
    fn test_locale_separator() {
        let formatter = Formatter::new(Config::default().with_locale(Locale::FRENCH));
        let text = formatter
            .format(&WktObject::Unit(Unit::new("demi", UnitKind::Length, 0.5)))
            .text;
        assert_eq!(text, r#"LENGTHUNIT["demi"; 0,5]"#);
    }

    #[test]
    fn test_quote_escape() {
        let formatter = Formatter::default();
        let unit = Unit::new(r#"a "b""#, UnitKind::Scale, 2.0);
        assert_eq!(
            formatter.format(&WktObject::Unit(unit)).text,
            r#"SCALEUNIT["a ""b""", 2]"#
        );
    }
}
