// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object factory
//!
//! The decoder hands fully parsed and resolved parts to an [`ObjectFactory`]
//! to build each domain object. The provided methods validate and complete
//! the objects; implementations can override any of them (for example a
//! test double recording the construction order).

use chrono::{DateTime, Utc};

use crate::axis::AxisDirection;
use crate::model::*;
use crate::registry::{ParameterKind, SEMI_MAJOR, SEMI_MINOR};
use crate::units::{Unit, UnitKind};

/// A factory refused to build an object
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidObject(pub String);

impl InvalidObject {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type FactoryResult<T> = std::result::Result<T, InvalidObject>;

/// Builds the domain objects, one method per type
pub trait ObjectFactory {
    fn create_ellipsoid(
        &self,
        properties: Properties,
        semi_major: f64,
        inverse_flattening: f64,
        unit: Unit,
    ) -> FactoryResult<Ellipsoid> {
        if !(semi_major > 0.0 && semi_major.is_finite()) {
            return Err(InvalidObject::new(format!(
                "semi-major axis of “{}” must be positive, got {}",
                properties.name, semi_major
            )));
        }
        if unit.kind != UnitKind::Length {
            return Err(InvalidObject::new(format!(
                "ellipsoid unit “{}” is not a length",
                unit.name
            )));
        }
        // WKT writes 0 for spheres
        let inverse_flattening = if inverse_flattening == 0.0 {
            f64::INFINITY
        } else {
            inverse_flattening
        };
        if inverse_flattening < 1.0 {
            return Err(InvalidObject::new(format!(
                "inverse flattening of “{}” must be at least 1, got {}",
                properties.name, inverse_flattening
            )));
        }
        Ok(Ellipsoid {
            properties,
            semi_major,
            inverse_flattening,
            unit,
        })
    }

    fn create_prime_meridian(
        &self,
        properties: Properties,
        greenwich_longitude: f64,
        angular_unit: Unit,
    ) -> FactoryResult<PrimeMeridian> {
        if !angular_unit.is_angular() {
            return Err(InvalidObject::new(format!(
                "prime meridian unit “{}” is not angular",
                angular_unit.name
            )));
        }
        Ok(PrimeMeridian {
            properties,
            greenwich_longitude,
            angular_unit,
        })
    }

    fn create_geodetic_datum(
        &self,
        properties: Properties,
        ellipsoid: Ellipsoid,
        prime_meridian: PrimeMeridian,
        anchor: Option<String>,
        bursa_wolf: Option<BursaWolfParameters>,
    ) -> FactoryResult<GeodeticDatum> {
        Ok(GeodeticDatum {
            properties,
            ellipsoid,
            prime_meridian,
            anchor,
            bursa_wolf,
        })
    }

    fn create_vertical_datum(
        &self,
        properties: Properties,
        anchor: Option<String>,
        datum_type: i64,
    ) -> FactoryResult<VerticalDatum> {
        Ok(VerticalDatum {
            properties,
            anchor,
            datum_type,
        })
    }

    fn create_temporal_datum(
        &self,
        properties: Properties,
        origin: DateTime<Utc>,
        calendar: Option<String>,
    ) -> FactoryResult<TemporalDatum> {
        Ok(TemporalDatum {
            properties,
            origin,
            calendar,
        })
    }

    fn create_engineering_datum(
        &self,
        properties: Properties,
        anchor: Option<String>,
        datum_type: i64,
    ) -> FactoryResult<EngineeringDatum> {
        Ok(EngineeringDatum {
            properties,
            anchor,
            datum_type,
        })
    }

    fn create_parametric_datum(
        &self,
        properties: Properties,
        anchor: Option<String>,
    ) -> FactoryResult<ParametricDatum> {
        Ok(ParametricDatum { properties, anchor })
    }

    fn create_coordinate_system(&self, kind: CsKind, axes: Vec<Axis>) -> FactoryResult<CoordinateSystem> {
        let expected = match kind {
            CsKind::Ellipsoidal => 2..=3,
            CsKind::Cartesian | CsKind::Affine => 2..=3,
            CsKind::Spherical | CsKind::Cylindrical => 3..=3,
            CsKind::Polar => 2..=2,
            CsKind::Vertical | CsKind::Temporal | CsKind::Linear | CsKind::Parametric => 1..=1,
            CsKind::Ordinal | CsKind::Compound => 1..=usize::MAX,
        };
        if !expected.contains(&axes.len()) {
            return Err(InvalidObject::new(format!(
                "{} coordinate system can not have {} axes",
                kind.wkt_name(),
                axes.len()
            )));
        }
        if kind == CsKind::Ellipsoidal && !axes.iter().take(2).all(|a| a.unit.is_angular()) {
            return Err(InvalidObject::new(
                "ellipsoidal coordinate system needs angular units on its first two axes",
            ));
        }
        for (i, a) in axes.iter().enumerate() {
            if matches!(a.direction, AxisDirection::Other | AxisDirection::Unspecified) {
                continue;
            }
            let duplicate = axes[..i].iter().any(|b| {
                b.direction == a.direction || a.direction.opposite() == Some(b.direction)
            });
            if duplicate && kind != CsKind::Compound {
                return Err(InvalidObject::new(format!(
                    "axis “{}” is colinear with a previous axis",
                    a.properties.name
                )));
            }
        }
        Ok(CoordinateSystem { kind, axes })
    }

    /// Complete the parameters of a conversion.
    ///
    /// Map projections get `semi_major` and `semi_minor` from the base
    /// ellipsoid, then every parameter missing from the text takes its
    /// descriptor default. A missing parameter without default is an error.
    fn create_conversion(
        &self,
        properties: Properties,
        method: OperationMethod,
        parameters: Vec<ParameterValue>,
        ellipsoid: Option<&Ellipsoid>,
    ) -> FactoryResult<Conversion> {
        let Some(descriptor) = method.descriptor else {
            return Ok(Conversion {
                properties,
                method,
                parameters: ParameterGroup { values: parameters },
            });
        };
        let mut explicit: Vec<Option<ParameterValue>> = parameters.into_iter().map(Some).collect();
        let mut values = Vec::with_capacity(descriptor.parameters.len() + explicit.len());
        for param in descriptor.parameters {
            let written = explicit.iter_mut().find(|slot| {
                slot.as_ref()
                    .and_then(|p| p.descriptor)
                    .map_or(false, |d| d.name == param.name)
            });
            if let Some(value) = written.and_then(Option::take) {
                values.push(value);
                continue;
            }
            let completed = if param.is_ellipsoid_axis() {
                // Standalone conversion: no base CRS to take the axes from
                let Some(e) = ellipsoid else { continue };
                let length = if param.name == SEMI_MAJOR.name {
                    e.semi_major
                } else {
                    debug_assert_eq!(param.name, SEMI_MINOR.name);
                    e.semi_minor()
                };
                Some((length, Some(e.unit.clone()), ParameterOrigin::Ellipsoid))
            } else {
                param
                    .default
                    .map(|v| (v, param.kind.default_unit(), ParameterOrigin::Default))
            };
            match completed {
                Some((value, unit, origin)) => values.push(ParameterValue {
                    properties: Properties::named(param.name),
                    descriptor: Some(*param),
                    value: ParamValue::Number(value),
                    unit,
                    origin,
                }),
                None if param.kind == ParameterKind::Matrix => {}
                None => {
                    return Err(InvalidObject::new(format!(
                        "missing value for parameter “{}” of “{}”",
                        param.name, descriptor.name
                    )))
                }
            }
        }
        // Parameters the method does not declare go last, in written order
        values.extend(explicit.into_iter().flatten());
        Ok(Conversion {
            properties,
            method,
            parameters: ParameterGroup { values },
        })
    }

    /// Geographic (ellipsoidal) or geocentric (Cartesian, spherical) CRS
    fn create_geodetic_crs(
        &self,
        properties: Properties,
        datum: GeodeticDatum,
        cs: CoordinateSystem,
    ) -> FactoryResult<GeodeticCrs> {
        if !matches!(
            cs.kind,
            CsKind::Ellipsoidal | CsKind::Cartesian | CsKind::Spherical
        ) {
            return Err(InvalidObject::new(format!(
                "geodetic CRS “{}” can not use a {} coordinate system",
                properties.name,
                cs.kind.wkt_name()
            )));
        }
        Ok(GeodeticCrs {
            properties,
            datum,
            cs,
        })
    }

    fn create_projected_crs(
        &self,
        properties: Properties,
        base: GeodeticCrs,
        conversion: Conversion,
        cs: CoordinateSystem,
    ) -> FactoryResult<Crs> {
        if base.cs.kind != CsKind::Ellipsoidal {
            return Err(InvalidObject::new(format!(
                "base of projected CRS “{}” must be geographic",
                properties.name
            )));
        }
        if cs.kind != CsKind::Cartesian {
            return Err(InvalidObject::new(format!(
                "projected CRS “{}” needs a Cartesian coordinate system",
                properties.name
            )));
        }
        Ok(Crs::Projected(Box::new(ProjectedCrs {
            properties,
            base,
            conversion,
            cs,
        })))
    }

    fn create_vertical_crs(
        &self,
        properties: Properties,
        datum: VerticalDatum,
        cs: CoordinateSystem,
    ) -> FactoryResult<Crs> {
        Ok(Crs::Vertical(VerticalCrs {
            properties,
            datum,
            cs,
        }))
    }

    fn create_temporal_crs(
        &self,
        properties: Properties,
        datum: TemporalDatum,
        cs: CoordinateSystem,
    ) -> FactoryResult<Crs> {
        if cs.axes.iter().any(|a| a.unit.kind != UnitKind::Time) {
            return Err(InvalidObject::new(format!(
                "temporal CRS “{}” needs a time unit",
                properties.name
            )));
        }
        Ok(Crs::Temporal(TemporalCrs {
            properties,
            datum,
            cs,
        }))
    }

    fn create_engineering_crs(
        &self,
        properties: Properties,
        datum: EngineeringDatum,
        cs: CoordinateSystem,
    ) -> FactoryResult<Crs> {
        Ok(Crs::Engineering(EngineeringCrs {
            properties,
            datum,
            cs,
        }))
    }

    fn create_parametric_crs(
        &self,
        properties: Properties,
        datum: ParametricDatum,
        cs: CoordinateSystem,
    ) -> FactoryResult<Crs> {
        Ok(Crs::Parametric(ParametricCrs {
            properties,
            datum,
            cs,
        }))
    }

    fn create_compound_crs(&self, properties: Properties, components: Vec<Crs>) -> FactoryResult<Crs> {
        if components.len() < 2 {
            return Err(InvalidObject::new(format!(
                "compound CRS “{}” needs at least 2 components",
                properties.name
            )));
        }
        let axes = components
            .iter()
            .flat_map(|c| c.coordinate_system().axes.iter().cloned())
            .collect();
        let cs = self.create_coordinate_system(CsKind::Compound, axes)?;
        Ok(Crs::Compound(CompoundCrs {
            properties,
            components,
            cs,
        }))
    }
}

/// Factory with the standard validation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl ObjectFactory for DefaultFactory {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::resolve_axis;
    use crate::registry::ParameterRegistry;

    fn wgs84() -> Ellipsoid {
        DefaultFactory
            .create_ellipsoid(Properties::named("WGS 84"), 6378137.0, 298.257223563, Unit::METRE)
            .unwrap()
    }

    #[test]
    fn test_ellipsoid_validation() {
        let factory = DefaultFactory;
        assert!(factory
            .create_ellipsoid(Properties::named("x"), -1.0, 300.0, Unit::METRE)
            .is_err());
        assert!(factory
            .create_ellipsoid(Properties::named("x"), 1.0, 300.0, Unit::DEGREE)
            .is_err());
        let sphere = factory
            .create_ellipsoid(Properties::named("Sphere"), 6371000.0, 0.0, Unit::METRE)
            .unwrap();
        assert!(sphere.is_sphere());
    }

    #[test]
    fn test_cs_dimension() {
        let factory = DefaultFactory;
        let up = resolve_axis("Height", AxisDirection::Up, Unit::METRE);
        let down = resolve_axis("Depth", AxisDirection::Down, Unit::METRE);
        assert!(factory
            .create_coordinate_system(CsKind::Vertical, vec![up.clone()])
            .is_ok());
        assert!(factory
            .create_coordinate_system(CsKind::Cartesian, vec![up])
            .is_err());
        let east = resolve_axis("E", AxisDirection::East, Unit::METRE);
        let west = resolve_axis("W", AxisDirection::West, Unit::METRE);
        assert!(factory
            .create_coordinate_system(CsKind::Cartesian, vec![east, west])
            .is_err());
        assert!(factory
            .create_coordinate_system(CsKind::Vertical, vec![down])
            .is_ok());
    }

    #[test]
    fn test_conversion_completion() {
        let registry = ParameterRegistry::new();
        let descriptor = registry.resolve_method("Mercator_1SP").unwrap();
        let method = OperationMethod {
            properties: Properties::named(descriptor.name),
            descriptor: Some(descriptor),
        };
        let false_easting = ParameterValue {
            properties: Properties::named("False easting"),
            descriptor: registry.resolve_parameter(descriptor, "false_easting"),
            value: ParamValue::Number(500000.0),
            unit: Some(Unit::METRE),
            origin: ParameterOrigin::Explicit,
        };
        let ellipsoid = wgs84();
        let conversion = DefaultFactory
            .create_conversion(
                Properties::named("Mercator"),
                method,
                vec![false_easting],
                Some(&ellipsoid),
            )
            .unwrap();
        let params = &conversion.parameters;
        assert_eq!(params.len(), 7);
        assert_eq!(params.values[0].properties.name, "semi_major");
        assert_eq!(params.values[0].origin, ParameterOrigin::Ellipsoid);
        assert_eq!(params.value_in("semi_major", &Unit::METRE), Some(6378137.0));
        assert_eq!(params.value_in("central_meridian", &Unit::DEGREE), Some(0.0));
        assert_eq!(params.value_in("scale_factor", &Unit::UNITY), Some(1.0));
        let fe = params.parameter("x_0").unwrap();
        assert_eq!(fe.origin, ParameterOrigin::Explicit);
        assert_eq!(fe.number(), Some(500000.0));
    }

    #[test]
    fn test_conversion_missing_mandatory() {
        let registry = ParameterRegistry::new();
        let descriptor = registry.resolve_method("Lambert_Conformal_Conic_2SP").unwrap();
        let method = OperationMethod {
            properties: Properties::named(descriptor.name),
            descriptor: Some(descriptor),
        };
        let err = DefaultFactory
            .create_conversion(Properties::named("LCC"), method, vec![], Some(&wgs84()))
            .unwrap_err();
        assert!(err.0.contains("Latitude of 1st standard parallel"));
    }
}
