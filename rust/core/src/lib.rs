// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # WKT-Lite Core Parser
//!
//! Well-Known Text parser for geodetic objects built with [nom](https://docs.rs/nom).
//! Reads coordinate reference systems, datums, ellipsoids, axes and map
//! projection parameters written in WKT 1 (OGC 01-009) or WKT 2 (ISO 19162),
//! and writes them back.
//!
//! ## Overview
//!
//! - **Tokenization**: bracket and quote matching with configurable symbols
//!   and locale-aware numbers
//! - **Decoding**: one handler per grammar production, building validated
//!   objects through an [`ObjectFactory`]
//! - **Lenient parsing**: unknown elements are collected as [`Warnings`]
//!   instead of failing the parse
//! - **Formatting**: WKT 1 and WKT 2 output with adaptive matrix precision
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wkt_lite_core::{GeodeticDecoder, Config, Crs};
//!
//! let decoder = GeodeticDecoder::new(Config::default());
//! let parsed = decoder.parse(r#"GEOGCS["WGS 84",
//!     DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
//!     PRIMEM["Greenwich", 0],
//!     UNIT["degree", 0.0174532925199433]]"#)?;
//!
//! let crs = parsed.object.into_crs().unwrap();
//! println!("{}", crs); // WKT 2
//! ```
//!
//! ## Parsing a stream of definitions
//!
//! ```rust,ignore
//! use wkt_lite_core::{GeodeticDecoder, ParsePosition};
//!
//! let mut position = ParsePosition::new(0);
//! while position.index < text.len() {
//!     let parsed = decoder.parse_object(text, &mut position)?;
//!     if let Some(warnings) = parsed.warnings {
//!         eprintln!("{}", warnings);
//!     }
//! }
//! ```
//!
//! ## Conventions
//!
//! [`Convention::WKT1_IGNORE_AXES`] reproduces the GDAL reading of WKT 1:
//! AXIS elements are ignored and angles are read in degrees whatever the
//! declared unit. The convention can also be taken from the `WKT_CONVENTION`
//! environment variable with [`Config::from_env`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the object model

pub mod axis;
pub mod config;
pub mod decoder;
pub mod element;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod model;
pub mod parser;
pub mod registry;
pub mod symbols;
pub mod units;
pub mod warnings;

pub use axis::{AxisDirection, Pole, RangeMeaning};
pub use config::{AxisHandling, Config, Convention, Dialect};
pub use decoder::{GeodeticDecoder, ParsePosition, Parsed};
pub use element::{Element, Value};
pub use error::{Error, Result};
pub use factory::{DefaultFactory, FactoryResult, InvalidObject, ObjectFactory};
pub use formatter::{format_number, suggest_fraction_digits, Formatted, Formatter};
pub use model::{
    Axis, BursaWolfParameters, CompoundCrs, Conversion, CoordinateSystem, Crs, CsKind, Datum,
    Ellipsoid, EngineeringCrs, EngineeringDatum, GeodeticCrs, GeodeticDatum, IdentifiedObject,
    Identifier, OperationMethod, ParamValue, ParameterGroup, ParameterOrigin, ParameterValue,
    ParametricCrs, ParametricDatum, PrimeMeridian, ProjectedCrs, Properties, TemporalCrs,
    TemporalDatum, VerticalCrs, VerticalDatum, WktObject,
};
pub use parser::{tokenize, ElementScanner};
pub use registry::{MethodDescriptor, ParameterDescriptor, ParameterRegistry};
pub use symbols::{Language, Locale, Symbols};
pub use units::{get_si_prefix_multiplier, Unit, UnitKind, UnitRegistry};
pub use warnings::{Notice, Warnings};
