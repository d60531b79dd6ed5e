// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operation method and parameter registry
//!
//! Each method and parameter has one canonical (EPSG) name plus the names
//! used by other authorities. Lookups ignore case and every character that
//! is not a letter or a digit, so `Mercator_1SP`, `mercator 1SP` and
//! `Mercator (variant A)` all land on the same descriptor.

use rustc_hash::FxHashMap;

use crate::units::{Unit, UnitKind};

/// Naming authority of an alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    Epsg,
    Ogc,
    Esri,
    GeoTiff,
    Proj4,
    S57,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub authority: Authority,
    pub name: &'static str,
}

const fn ogc(name: &'static str) -> Alias {
    Alias {
        authority: Authority::Ogc,
        name,
    }
}

const fn esri(name: &'static str) -> Alias {
    Alias {
        authority: Authority::Esri,
        name,
    }
}

const fn geotiff(name: &'static str) -> Alias {
    Alias {
        authority: Authority::GeoTiff,
        name,
    }
}

const fn proj4(name: &'static str) -> Alias {
    Alias {
        authority: Authority::Proj4,
        name,
    }
}

/// Quantity measured by a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Angle,
    Length,
    Scale,
    Matrix,
}

impl ParameterKind {
    pub fn unit_kind(self) -> Option<UnitKind> {
        match self {
            ParameterKind::Angle => Some(UnitKind::Angle),
            ParameterKind::Length => Some(UnitKind::Length),
            ParameterKind::Scale => Some(UnitKind::Scale),
            ParameterKind::Matrix => None,
        }
    }

    /// Unit of default values
    pub fn default_unit(self) -> Option<Unit> {
        match self {
            ParameterKind::Angle => Some(Unit::DEGREE),
            ParameterKind::Length => Some(Unit::METRE),
            ParameterKind::Scale => Some(Unit::UNITY),
            ParameterKind::Matrix => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub epsg: Option<u32>,
    pub aliases: &'static [Alias],
    pub kind: ParameterKind,
    /// Value used when the text omits the parameter, in the kind's default unit
    pub default: Option<f64>,
}

impl ParameterDescriptor {
    /// Match against an already normalized name
    pub fn matches(&self, key: &str) -> bool {
        normalize_name(self.name) == key || self.aliases.iter().any(|a| normalize_name(a.name) == key)
    }

    /// Name used by the given authority, if any
    pub fn alias(&self, authority: Authority) -> Option<&'static str> {
        self.aliases
            .iter()
            .find(|a| a.authority == authority)
            .map(|a| a.name)
    }

    /// True for the ellipsoid axis lengths carried by map projections
    pub fn is_ellipsoid_axis(&self) -> bool {
        self.epsg.is_none() && (self.name == SEMI_MAJOR.name || self.name == SEMI_MINOR.name)
    }
}

#[derive(Debug, PartialEq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub epsg: Option<u32>,
    pub aliases: &'static [Alias],
    pub parameters: &'static [&'static ParameterDescriptor],
}

impl MethodDescriptor {
    pub fn alias(&self, authority: Authority) -> Option<&'static str> {
        self.aliases
            .iter()
            .find(|a| a.authority == authority)
            .map(|a| a.name)
    }

    /// Map projections carry the ellipsoid axis lengths as parameters
    pub fn is_map_projection(&self) -> bool {
        self.parameters.iter().any(|p| p.is_ellipsoid_axis())
    }
}

/// Lower-case the name and drop everything but letters and digits
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// Parameters
// ============================================================================

pub const SEMI_MAJOR: ParameterDescriptor = ParameterDescriptor {
    name: "semi_major",
    epsg: None,
    aliases: &[esri("Semi_Major"), proj4("a")],
    kind: ParameterKind::Length,
    default: None,
};

pub const SEMI_MINOR: ParameterDescriptor = ParameterDescriptor {
    name: "semi_minor",
    epsg: None,
    aliases: &[esri("Semi_Minor"), proj4("b")],
    kind: ParameterKind::Length,
    default: None,
};

const LATITUDE_OF_NATURAL_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Latitude of natural origin",
    epsg: Some(8801),
    aliases: &[
        ogc("latitude_of_origin"),
        esri("Latitude_Of_Origin"),
        geotiff("NatOriginLat"),
        proj4("lat_0"),
    ],
    kind: ParameterKind::Angle,
    default: Some(0.0),
};

/// Polar stereographic: no sensible default, must be ±90
const LATITUDE_OF_POLAR_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    default: None,
    ..LATITUDE_OF_NATURAL_ORIGIN
};

const LONGITUDE_OF_NATURAL_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Longitude of natural origin",
    epsg: Some(8802),
    aliases: &[
        ogc("central_meridian"),
        esri("Central_Meridian"),
        geotiff("NatOriginLong"),
        proj4("lon_0"),
    ],
    kind: ParameterKind::Angle,
    default: Some(0.0),
};

const SCALE_FACTOR_AT_NATURAL_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Scale factor at natural origin",
    epsg: Some(8805),
    aliases: &[
        ogc("scale_factor"),
        esri("Scale_Factor"),
        geotiff("ScaleAtNatOrigin"),
        proj4("k"),
    ],
    kind: ParameterKind::Scale,
    default: Some(1.0),
};

const FALSE_EASTING: ParameterDescriptor = ParameterDescriptor {
    name: "False easting",
    epsg: Some(8806),
    aliases: &[
        ogc("false_easting"),
        esri("False_Easting"),
        geotiff("FalseEasting"),
        proj4("x_0"),
    ],
    kind: ParameterKind::Length,
    default: Some(0.0),
};

const FALSE_NORTHING: ParameterDescriptor = ParameterDescriptor {
    name: "False northing",
    epsg: Some(8807),
    aliases: &[
        ogc("false_northing"),
        esri("False_Northing"),
        geotiff("FalseNorthing"),
        proj4("y_0"),
    ],
    kind: ParameterKind::Length,
    default: Some(0.0),
};

const LATITUDE_OF_FALSE_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Latitude of false origin",
    epsg: Some(8821),
    aliases: &[
        ogc("latitude_of_origin"),
        esri("Latitude_Of_Origin"),
        geotiff("FalseOriginLat"),
        proj4("lat_0"),
    ],
    kind: ParameterKind::Angle,
    default: Some(0.0),
};

const LONGITUDE_OF_FALSE_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Longitude of false origin",
    epsg: Some(8822),
    aliases: &[
        ogc("central_meridian"),
        esri("Central_Meridian"),
        geotiff("FalseOriginLong"),
        proj4("lon_0"),
    ],
    kind: ParameterKind::Angle,
    default: Some(0.0),
};

const FIRST_PARALLEL: ParameterDescriptor = ParameterDescriptor {
    name: "Latitude of 1st standard parallel",
    epsg: Some(8823),
    aliases: &[
        ogc("standard_parallel_1"),
        esri("Standard_Parallel_1"),
        geotiff("StdParallel1"),
        proj4("lat_1"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

/// Single parallel of the cylindrical projections, defaults to the equator
const STANDARD_PARALLEL: ParameterDescriptor = ParameterDescriptor {
    default: Some(0.0),
    ..FIRST_PARALLEL
};

const SECOND_PARALLEL: ParameterDescriptor = ParameterDescriptor {
    name: "Latitude of 2nd standard parallel",
    epsg: Some(8824),
    aliases: &[
        ogc("standard_parallel_2"),
        esri("Standard_Parallel_2"),
        geotiff("StdParallel2"),
        proj4("lat_2"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

const EASTING_AT_FALSE_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Easting at false origin",
    epsg: Some(8826),
    aliases: &[
        ogc("false_easting"),
        esri("False_Easting"),
        geotiff("FalseOriginEasting"),
        proj4("x_0"),
    ],
    kind: ParameterKind::Length,
    default: Some(0.0),
};

const NORTHING_AT_FALSE_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "Northing at false origin",
    epsg: Some(8827),
    aliases: &[
        ogc("false_northing"),
        esri("False_Northing"),
        geotiff("FalseOriginNorthing"),
        proj4("y_0"),
    ],
    kind: ParameterKind::Length,
    default: Some(0.0),
};

const LATITUDE_OF_PROJECTION_CENTRE: ParameterDescriptor = ParameterDescriptor {
    name: "Latitude of projection centre",
    epsg: Some(8811),
    aliases: &[
        ogc("latitude_of_center"),
        esri("Latitude_Of_Center"),
        geotiff("CenterLat"),
        proj4("lat_0"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

const LONGITUDE_OF_PROJECTION_CENTRE: ParameterDescriptor = ParameterDescriptor {
    name: "Longitude of projection centre",
    epsg: Some(8812),
    aliases: &[
        ogc("longitude_of_center"),
        esri("Longitude_Of_Center"),
        geotiff("CenterLong"),
        proj4("lonc"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

const AZIMUTH_OF_INITIAL_LINE: ParameterDescriptor = ParameterDescriptor {
    name: "Azimuth of initial line",
    epsg: Some(8813),
    aliases: &[
        ogc("azimuth"),
        esri("Azimuth"),
        geotiff("AzimuthAngle"),
        proj4("alpha"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

const RECTIFIED_GRID_ANGLE: ParameterDescriptor = ParameterDescriptor {
    name: "Angle from Rectified to Skew Grid",
    epsg: Some(8814),
    aliases: &[
        ogc("rectified_grid_angle"),
        geotiff("RectifiedGridAngle"),
        proj4("gamma"),
    ],
    kind: ParameterKind::Angle,
    default: None,
};

const SCALE_FACTOR_ON_INITIAL_LINE: ParameterDescriptor = ParameterDescriptor {
    name: "Scale factor on initial line",
    epsg: Some(8815),
    aliases: &[
        ogc("scale_factor"),
        esri("Scale_Factor"),
        geotiff("ScaleAtCenter"),
        proj4("k"),
    ],
    kind: ParameterKind::Scale,
    default: Some(1.0),
};

const GRID: ParameterDescriptor = ParameterDescriptor {
    name: "Grid",
    epsg: None,
    aliases: &[],
    kind: ParameterKind::Matrix,
    default: None,
};

// ============================================================================
// Methods
// ============================================================================

const NATURAL_ORIGIN: &[&ParameterDescriptor] = &[
    &SEMI_MAJOR,
    &SEMI_MINOR,
    &LATITUDE_OF_NATURAL_ORIGIN,
    &LONGITUDE_OF_NATURAL_ORIGIN,
    &SCALE_FACTOR_AT_NATURAL_ORIGIN,
    &FALSE_EASTING,
    &FALSE_NORTHING,
];

const CONIC_2SP: &[&ParameterDescriptor] = &[
    &SEMI_MAJOR,
    &SEMI_MINOR,
    &LATITUDE_OF_FALSE_ORIGIN,
    &LONGITUDE_OF_FALSE_ORIGIN,
    &FIRST_PARALLEL,
    &SECOND_PARALLEL,
    &EASTING_AT_FALSE_ORIGIN,
    &NORTHING_AT_FALSE_ORIGIN,
];

pub static BUILTIN_METHODS: &[MethodDescriptor] = &[
    MethodDescriptor {
        name: "Mercator (variant A)",
        epsg: Some(9804),
        aliases: &[
            ogc("Mercator_1SP"),
            geotiff("CT_Mercator"),
            proj4("merc"),
        ],
        parameters: NATURAL_ORIGIN,
    },
    MethodDescriptor {
        name: "Mercator (variant B)",
        epsg: Some(9805),
        aliases: &[ogc("Mercator_2SP"), esri("Mercator")],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &STANDARD_PARALLEL,
            &LONGITUDE_OF_NATURAL_ORIGIN,
            &FALSE_EASTING,
            &FALSE_NORTHING,
        ],
    },
    MethodDescriptor {
        name: "Mercator (variant C)",
        epsg: Some(1044),
        aliases: &[],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &STANDARD_PARALLEL,
            &LONGITUDE_OF_NATURAL_ORIGIN,
            &EASTING_AT_FALSE_ORIGIN,
            &NORTHING_AT_FALSE_ORIGIN,
        ],
    },
    MethodDescriptor {
        name: "Transverse Mercator",
        epsg: Some(9807),
        aliases: &[
            ogc("Transverse_Mercator"),
            esri("Transverse_Mercator"),
            geotiff("CT_TransverseMercator"),
            proj4("tmerc"),
        ],
        parameters: NATURAL_ORIGIN,
    },
    MethodDescriptor {
        name: "Lambert Conic Conformal (1SP)",
        epsg: Some(9801),
        aliases: &[
            ogc("Lambert_Conformal_Conic_1SP"),
            geotiff("CT_LambertConfConic_1SP"),
        ],
        parameters: NATURAL_ORIGIN,
    },
    MethodDescriptor {
        name: "Lambert Conic Conformal (2SP)",
        epsg: Some(9802),
        aliases: &[
            ogc("Lambert_Conformal_Conic_2SP"),
            esri("Lambert_Conformal_Conic"),
            geotiff("CT_LambertConfConic_2SP"),
            proj4("lcc"),
        ],
        parameters: CONIC_2SP,
    },
    MethodDescriptor {
        name: "Hotine Oblique Mercator (variant A)",
        epsg: Some(9812),
        aliases: &[
            ogc("Hotine_Oblique_Mercator"),
            esri("Hotine_Oblique_Mercator_Azimuth_Natural_Origin"),
            geotiff("CT_ObliqueMercator_Hotine"),
            proj4("omerc"),
        ],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &LATITUDE_OF_PROJECTION_CENTRE,
            &LONGITUDE_OF_PROJECTION_CENTRE,
            &AZIMUTH_OF_INITIAL_LINE,
            &RECTIFIED_GRID_ANGLE,
            &SCALE_FACTOR_ON_INITIAL_LINE,
            &FALSE_EASTING,
            &FALSE_NORTHING,
        ],
    },
    MethodDescriptor {
        name: "Equidistant Cylindrical",
        epsg: Some(1028),
        aliases: &[
            ogc("Equirectangular"),
            esri("Equidistant_Cylindrical"),
            geotiff("CT_Equirectangular"),
            proj4("eqc"),
        ],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &STANDARD_PARALLEL,
            &LONGITUDE_OF_NATURAL_ORIGIN,
            &FALSE_EASTING,
            &FALSE_NORTHING,
        ],
    },
    MethodDescriptor {
        name: "Albers Equal Area",
        epsg: Some(9822),
        aliases: &[
            ogc("Albers_Conic_Equal_Area"),
            esri("Albers"),
            geotiff("CT_AlbersEqualArea"),
            proj4("aea"),
        ],
        parameters: CONIC_2SP,
    },
    MethodDescriptor {
        name: "Polar Stereographic (variant A)",
        epsg: Some(9810),
        aliases: &[
            ogc("Polar_Stereographic"),
            geotiff("CT_PolarStereographic"),
            proj4("stere"),
        ],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &LATITUDE_OF_POLAR_ORIGIN,
            &LONGITUDE_OF_NATURAL_ORIGIN,
            &SCALE_FACTOR_AT_NATURAL_ORIGIN,
            &FALSE_EASTING,
            &FALSE_NORTHING,
        ],
    },
    MethodDescriptor {
        name: "Oblique Stereographic",
        epsg: Some(9809),
        aliases: &[
            ogc("Oblique_Stereographic"),
            esri("Double_Stereographic"),
            geotiff("CT_ObliqueStereographic"),
            proj4("sterea"),
        ],
        parameters: NATURAL_ORIGIN,
    },
    MethodDescriptor {
        name: "Lambert Azimuthal Equal Area",
        epsg: Some(9820),
        aliases: &[
            ogc("Lambert_Azimuthal_Equal_Area"),
            esri("Lambert_Azimuthal_Equal_Area"),
            geotiff("CT_LambertAzimEqualArea"),
            proj4("laea"),
        ],
        parameters: &[
            &SEMI_MAJOR,
            &SEMI_MINOR,
            &LATITUDE_OF_NATURAL_ORIGIN,
            &LONGITUDE_OF_NATURAL_ORIGIN,
            &FALSE_EASTING,
            &FALSE_NORTHING,
        ],
    },
    MethodDescriptor {
        name: "Localization grid",
        epsg: None,
        aliases: &[],
        parameters: &[&GRID],
    },
];

/// Resolves method and parameter names against a fixed set of descriptors
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    methods: &'static [MethodDescriptor],
    /// Normalized name or alias -> index in `methods` (first registration wins)
    index: FxHashMap<String, usize>,
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::with_methods(BUILTIN_METHODS)
    }
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_methods(methods: &'static [MethodDescriptor]) -> Self {
        let mut index = FxHashMap::default();
        for (i, method) in methods.iter().enumerate() {
            index.entry(normalize_name(method.name)).or_insert(i);
            if let Some(code) = method.epsg {
                index.entry(format!("epsg{}", code)).or_insert(i);
            }
            for alias in method.aliases {
                index.entry(normalize_name(alias.name)).or_insert(i);
            }
        }
        Self { methods, index }
    }

    /// Canonical descriptor for a method name or alias
    pub fn resolve_method(&self, name: &str) -> Option<&'static MethodDescriptor> {
        let methods = self.methods;
        self.index.get(&normalize_name(name)).map(|&i| &methods[i])
    }

    /// Canonical descriptor for a parameter of the given method
    pub fn resolve_parameter(
        &self,
        method: &'static MethodDescriptor,
        name: &str,
    ) -> Option<&'static ParameterDescriptor> {
        let key = normalize_name(name);
        method.parameters.iter().copied().find(|p| p.matches(&key))
    }

    /// Method declared with an EPSG code (`ID["EPSG", 9804]` on a METHOD element)
    pub fn resolve_epsg(&self, code: u32) -> Option<&'static MethodDescriptor> {
        let methods = self.methods;
        self.index.get(&format!("epsg{}", code)).map(|&i| &methods[i])
    }
}
