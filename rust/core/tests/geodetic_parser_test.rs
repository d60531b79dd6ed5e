// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of complete geodetic objects written by real-world producers

use approx::assert_relative_eq;
use wkt_lite_core::{
    Axis, AxisDirection, Config, Convention, Crs, Datum, Error, GeodeticCrs, GeodeticDecoder,
    IdentifiedObject, Language, ParsePosition, Parsed, Pole, ProjectedCrs, RangeMeaning, Unit,
    WktObject,
};

fn decoder(convention: Convention) -> GeodeticDecoder {
    GeodeticDecoder::new(Config::new(convention))
}

/// Parse with the default convention and check that nothing was ignored
fn parse_clean(text: &str) -> WktObject {
    let parsed = GeodeticDecoder::default().parse(text).unwrap();
    if let Some(warnings) = &parsed.warnings {
        panic!("unexpected warnings:\n{}", warnings);
    }
    parsed.object
}

fn parse_crs(text: &str) -> Crs {
    parse_clean(text).into_crs().expect("expected a CRS")
}

fn parse_axis(text: &str) -> Axis {
    match parse_clean(text) {
        WktObject::Axis(axis) => axis,
        other => panic!("expected an axis, got {:?}", other),
    }
}

fn geographic(crs: Crs) -> GeodeticCrs {
    match crs {
        Crs::Geographic(g) => g,
        other => panic!("expected a geographic CRS, got {}", other.kind_name()),
    }
}

fn assert_axis(axis: &Axis, name: &str, abbreviation: &str, direction: AxisDirection, unit: &Unit) {
    assert_eq!(axis.properties.name, name);
    assert_eq!(axis.abbreviation, abbreviation);
    assert_eq!(axis.direction, direction);
    assert_eq!(&axis.unit, unit);
}

fn assert_unbounded(axis: &Axis) {
    assert_eq!(axis.minimum, f64::NEG_INFINITY);
    assert_eq!(axis.maximum, f64::INFINITY);
    assert_eq!(axis.range_meaning, None);
}

fn assert_longitude(axis: &Axis, unit: &Unit, limit: f64) {
    assert_axis(axis, "Geodetic longitude", "λ", AxisDirection::East, unit);
    assert_relative_eq!(axis.minimum, -limit, epsilon = 1e-9);
    assert_relative_eq!(axis.maximum, limit, epsilon = 1e-9);
    assert_eq!(axis.range_meaning, Some(RangeMeaning::Wraparound));
}

fn assert_latitude(axis: &Axis, unit: &Unit, limit: f64) {
    assert_axis(axis, "Geodetic latitude", "φ", AxisDirection::North, unit);
    assert_relative_eq!(axis.minimum, -limit, epsilon = 1e-9);
    assert_relative_eq!(axis.maximum, limit, epsilon = 1e-9);
    assert_eq!(axis.range_meaning, Some(RangeMeaning::Exact));
}

fn wgs84(axes: &str) -> String {
    format!(
        r#"GEOGCS["WGS 84",
            DATUM["World Geodetic System 1984",
              SPHEROID["WGS84", 6378137.0, 298.257223563]],
            PRIMEM["Greenwich", 0.0],
            UNIT["degree", 0.017453292519943295]{}]"#,
        axes
    )
}

/// WGS 84 with longitude first and degrees
fn verify_wgs84(crs: &GeodeticCrs) {
    assert_eq!(crs.properties.name, "WGS 84");
    assert_eq!(crs.datum.properties.name, "World Geodetic System 1984");
    assert_eq!(crs.datum.ellipsoid.properties.name, "WGS84");
    assert_eq!(crs.datum.ellipsoid.semi_major, 6378137.0);
    assert_eq!(crs.datum.ellipsoid.inverse_flattening, 298.257223563);
    assert_eq!(crs.datum.prime_meridian.properties.name, "Greenwich");
    assert_eq!(crs.datum.prime_meridian.greenwich_longitude, 0.0);
    assert_eq!(crs.cs.dimension(), 2);
    assert_longitude(&crs.cs.axes[0], &Unit::DEGREE, 180.0);
    assert_latitude(&crs.cs.axes[1], &Unit::DEGREE, 90.0);
}

// ============================================================================
// Axes and datums
// ============================================================================

#[test]
fn test_axis() {
    let axis = parse_axis(r#"AXIS["(Y)", geocentricY]"#);
    assert_axis(&axis, "Y", "Y", AxisDirection::GeocentricY, &Unit::METRE);

    let axis = parse_axis(r#"AXIS["latitude", north, ORDER[1], ANGLEUNIT["degree", 0.0174532925199433]]"#);
    assert_axis(&axis, "Latitude", "φ", AxisDirection::North, &Unit::DEGREE);

    let axis = parse_axis(r#"AXIS["longitude", EAST, order[2], UNIT["degree", 0.0174532925199433]]"#);
    assert_axis(&axis, "Longitude", "λ", AxisDirection::East, &Unit::DEGREE);

    let axis = parse_axis(r#"AXIS["ellipsoidal height (h)", up, ORDER[3], LengthUnit["kilometre", 1000]]"#);
    assert_axis(&axis, "Ellipsoidal height", "h", AxisDirection::Up, &Unit::KILOMETRE);

    let axis = parse_axis(r#"AXIS["time (t)", future, TimeUnit["hour", 3600]]"#);
    assert_axis(&axis, "Time", "t", AxisDirection::Future, &Unit::HOUR);

    let axis = parse_axis(r#"AXIS["easting (X)", south, MERIDIAN[90, UNIT["degree", 0.0174532925199433]]]"#);
    assert_axis(
        &axis,
        "Easting",
        "X",
        AxisDirection::AlongMeridian {
            toward: Pole::South,
            meridian: 90.0,
        },
        &Unit::METRE,
    );
    assert_unbounded(&axis);
}

#[test]
fn test_datum() {
    let object = parse_clean(
        r#"DATUM["Tananarive 1925",
             ELLIPSOID["International 1924", 6378.388, 297.0, LENGTHUNIT["km", 1000]],
             ANCHOR["Tananarive observatory:21.0191667gS, 50.23849537gE of Paris"]]"#,
    );
    let WktObject::Datum(Datum::Geodetic(datum)) = object else {
        panic!("expected a geodetic datum");
    };
    assert_eq!(datum.properties.name, "Tananarive 1925");
    assert_eq!(
        datum.anchor.as_deref(),
        Some("Tananarive observatory:21.0191667gS, 50.23849537gE of Paris")
    );
    let ellipsoid = &datum.ellipsoid;
    assert_eq!(ellipsoid.properties.name, "International 1924");
    assert_eq!(ellipsoid.unit, Unit::KILOMETRE);
    assert_eq!(ellipsoid.semi_major, 6378.388);
    assert_eq!(ellipsoid.inverse_flattening, 297.0);
    assert_relative_eq!(ellipsoid.semi_major_metres(), 6378388.0, epsilon = 1e-6);
    assert_eq!(datum.prime_meridian.properties.name, "Greenwich");
    assert_eq!(datum.prime_meridian.greenwich_longitude, 0.0);
}

// ============================================================================
// Geodetic CRS
// ============================================================================

#[test]
fn test_geocentric_crs() {
    let crs = parse_crs(
        r#"GEOCCS[“Geocentric”,
             DATUM[“World Geodetic System 1984”,
               SPHEROID[“WGS84”, 6378137.0, 298.257223563, AUTHORITY[“EPSG”, “7030”]],
               AUTHORITY[“EPSG”, “6326”]],
             PRIMEM[“Greenwich”, 0.0, AUTHORITY[“EPSG”, “8901”]],
             UNIT[“metre”, 1],
             AXIS[“X”, OTHER],
             AXIS[“Y”, EAST],
             AXIS[“Z”, NORTH]]"#,
    );
    let Crs::Geocentric(crs) = crs else {
        panic!("expected a geocentric CRS");
    };
    assert_eq!(crs.properties.name, "Geocentric");
    assert_eq!(crs.datum.properties.identifiers[0].code, "6326");
    assert_eq!(crs.datum.ellipsoid.properties.identifiers[0].code, "7030");
    assert_eq!(crs.datum.prime_meridian.properties.identifiers[0].authority, "EPSG");
    assert_eq!(crs.datum.prime_meridian.properties.identifiers[0].code, "8901");

    assert_eq!(crs.cs.dimension(), 3);
    let expected = [
        ("Geocentric X", "X", AxisDirection::GeocentricX),
        ("Geocentric Y", "Y", AxisDirection::GeocentricY),
        ("Geocentric Z", "Z", AxisDirection::GeocentricZ),
    ];
    for (axis, (name, abbreviation, direction)) in crs.cs.axes.iter().zip(expected) {
        assert_axis(axis, name, abbreviation, direction, &Unit::METRE);
        assert_unbounded(axis);
    }
}

#[test]
fn test_geographic_crs() {
    let crs = geographic(parse_crs(&wgs84(
        r#", AXIS["Longitude", EAST], AXIS["Latitude", NORTH]"#,
    )));
    verify_wgs84(&crs);
}

#[test]
fn test_geographic_with_swapped_axes() {
    let crs = geographic(parse_crs(&wgs84(
        r#", AXIS["Latitude", NORTH], AXIS["Longitude", EAST]"#,
    )));
    assert_latitude(&crs.cs.axes[0], &Unit::DEGREE, 90.0);
    assert_longitude(&crs.cs.axes[1], &Unit::DEGREE, 180.0);
}

#[test]
fn test_geographic_with_implicit_axes() {
    let crs = geographic(parse_crs(&wgs84("")));
    verify_wgs84(&crs);
}

#[test]
fn test_geographic_with_axis_order() {
    let crs = geographic(parse_crs(
        r#"GEODCRS["WGS 84",
             DATUM["World Geodetic System 1984",
               ELLIPSOID["WGS84", 6378137.0, 298.257223563, LENGTHUNIT["metre", 1]]],
             CS[ellipsoidal, 2],
               AXIS["latitude", north, ORDER[2]],
               AXIS["longitude", east, ORDER[1]],
               ANGLEUNIT["degree", 0.017453292519943295]]"#,
    ));
    verify_wgs84(&crs);
}

#[test]
fn test_cartesian_axis_permutations() {
    const PERMUTATIONS: [[usize; 3]; 6] = [
        [1, 2, 3],
        [1, 3, 2],
        [2, 1, 3],
        [2, 3, 1],
        [3, 1, 2],
        [3, 2, 1],
    ];
    let names = ["X", "Y", "Z"];
    for permutation in PERMUTATIONS {
        // Axes written in the order of the permutation, each tagged with its true rank
        let axes: Vec<String> = permutation
            .iter()
            .map(|&rank| {
                let name = names[rank - 1];
                format!(r#"AXIS["({})", geocentric{}, ORDER[{}]]"#, name, name, rank)
            })
            .collect();
        let text = format!(
            r#"GEODCRS["Cartesian", DATUM["D", ELLIPSOID["S", 6378137, 298.257223563]],
                 CS[Cartesian, 3], {}, LENGTHUNIT["metre", 1]]"#,
            axes.join(", ")
        );
        let crs = parse_crs(&text);
        let directions: Vec<AxisDirection> =
            crs.coordinate_system().axes.iter().map(|a| a.direction).collect();
        assert_eq!(
            directions,
            vec![
                AxisDirection::GeocentricX,
                AxisDirection::GeocentricY,
                AxisDirection::GeocentricZ
            ],
            "permutation {:?}",
            permutation
        );
    }
}

#[test]
fn test_geographic_with_arc_seconds() {
    let crs = geographic(parse_crs(
        r#"GEOGCS["NAD83 / seconds",
             DATUM["North_American_Datum_1983",
               SPHEROID["GRS 1980", 6378137, 298.257222101, AUTHORITY["EPSG", "7019"]],
               AUTHORITY["EPSG", "6269"]],
             PRIMEM["Greenwich", 0],
             UNIT["Decimal_Second", 4.84813681109536e-06, AUTHORITY["EPSG", "100001"]]]"#,
    ));
    let axes = &crs.cs.axes;
    assert_eq!(axes[0].unit, Unit::ARC_SECOND);
    assert_longitude(&axes[0], &Unit::ARC_SECOND, 648000.0);
    assert_latitude(&axes[1], &Unit::ARC_SECOND, 324000.0);
}

const PARIS: &str = r#"GEOGCS["NTF (Paris)",
     DATUM["Nouvelle Triangulation Française (Paris)",
       SPHEROID["Clarke 1880 (IGN)", 6378249.2, 293.4660212936269]],
     PRIMEM["Paris", 2.5969213, AUTHORITY["EPSG", "8903"]],
     UNIT["grade", 0.015707963267948967],
     AXIS["Latitude", NORTH],
     AXIS["Longitude", EAST]]"#;

#[test]
fn test_geographic_with_paris_meridian() {
    let crs = geographic(parse_crs(PARIS));
    assert_eq!(crs.properties.name, "NTF (Paris)");
    let pm = &crs.datum.prime_meridian;
    assert_eq!(pm.properties.name, "Paris");
    assert_eq!(pm.properties.identifiers[0].code, "8903");
    assert_eq!(pm.angular_unit, Unit::GRAD);
    assert_eq!(pm.greenwich_longitude, 2.5969213);
    assert_latitude(&crs.cs.axes[0], &Unit::GRAD, 100.0);
    assert_longitude(&crs.cs.axes[1], &Unit::GRAD, 200.0);

    // GDAL reading: axes ignored, meridian in degrees
    let text = PARIS.replace("2.5969213", "2.33722917");
    let parsed = decoder(Convention::WKT1_IGNORE_AXES).parse(&text).unwrap();
    assert!(parsed.warnings.is_none());
    let crs = geographic(parsed.object.into_crs().unwrap());
    let pm = &crs.datum.prime_meridian;
    assert_eq!(pm.angular_unit, Unit::DEGREE);
    assert_eq!(pm.greenwich_longitude, 2.33722917);
    assert_longitude(&crs.cs.axes[0], &Unit::GRAD, 200.0);
    assert_latitude(&crs.cs.axes[1], &Unit::GRAD, 100.0);
}

#[test]
fn test_convention_only_changes_prime_meridian() {
    let text = PARIS
        .replace(r#"AXIS["Latitude", NORTH]"#, "LAT_AXIS")
        .replace(r#"AXIS["Longitude", EAST]"#, r#"AXIS["Latitude", NORTH]"#)
        .replace("LAT_AXIS", r#"AXIS["Longitude", EAST]"#);
    let honored = geographic(parse_crs(&text));
    let ignored = geographic(
        decoder(Convention::WKT1_IGNORE_AXES)
            .parse(&text)
            .unwrap()
            .object
            .into_crs()
            .unwrap(),
    );
    assert_eq!(honored.properties, ignored.properties);
    assert_eq!(honored.cs, ignored.cs);
    assert_eq!(honored.datum.ellipsoid, ignored.datum.ellipsoid);
    assert_eq!(honored.datum.properties, ignored.datum.properties);
    assert_eq!(
        honored.datum.prime_meridian.greenwich_longitude,
        ignored.datum.prime_meridian.greenwich_longitude
    );
    assert_eq!(honored.datum.prime_meridian.angular_unit, Unit::GRAD);
    assert_eq!(ignored.datum.prime_meridian.angular_unit, Unit::DEGREE);
}

// ============================================================================
// Projected CRS
// ============================================================================

fn projected(crs: Crs) -> Box<ProjectedCrs> {
    match crs {
        Crs::Projected(p) => p,
        other => panic!("expected a projected CRS, got {}", other.kind_name()),
    }
}

fn verify_projected_cs(crs: &ProjectedCrs, unit: &Unit) {
    let axes = &crs.cs.axes;
    assert_eq!(axes.len(), 2);
    assert_axis(&axes[0], "Easting", "E", AxisDirection::East, unit);
    assert_axis(&axes[1], "Northing", "N", AxisDirection::North, unit);
    assert_unbounded(&axes[0]);
    assert_unbounded(&axes[1]);
}

#[test]
fn test_projected_crs() {
    let text = format!(
        r#"PROJCS["Mercator test",
             {},
             PROJECTION["Mercator_1SP"],
             PARAMETER["central_meridian", -20],
             PARAMETER["scale_factor", 1],
             PARAMETER["false_easting", 500000],
             PARAMETER["false_northing", 0],
             UNIT["metre", 1],
             AXIS["Easting", EAST],
             AXIS["Northing", NORTH]]"#,
        wgs84(r#", AXIS["Longitude", EAST], AXIS["Latitude", NORTH]"#)
    );
    let crs = projected(parse_crs(&text));
    assert_eq!(crs.properties.name, "Mercator test");
    verify_wgs84(&crs.base);
    verify_projected_cs(&crs, &Unit::METRE);

    let conversion = &crs.conversion;
    assert_eq!(conversion.method.properties.name, "Mercator (variant A)");
    let p = &conversion.parameters;
    assert_eq!(p.value_in("semi_major", &Unit::METRE), Some(6378137.0));
    assert_relative_eq!(p.value_in("semi_minor", &Unit::METRE).unwrap(), 6356752.3, epsilon = 0.1);
    assert_eq!(p.value_in("central_meridian", &Unit::DEGREE), Some(-20.0));
    assert_eq!(p.value_in("scale_factor", &Unit::UNITY), Some(1.0));
    assert_eq!(p.value_in("false_easting", &Unit::METRE), Some(500000.0));
    assert_eq!(p.value_in("false_northing", &Unit::METRE), Some(0.0));
}

const NTF_LAMBERT: &str = r#"PROJCS[“NTF (Paris) / Lambert zone II”,
     GEOGCS[“NTF (Paris)”,
       DATUM[“Nouvelle Triangulation Française (Paris)”,
         SPHEROID[“Clarke 1880 (IGN)”, 6378249.2, 293.4660212936269],
         TOWGS84[-168,-60,320,0,0,0,0]],
       PRIMEM[“Paris”, 2.5969213, AUTHORITY[“EPSG”, “8903”]],
       UNIT[“grad”, 0.01570796326794897]],
     PROJECTION[“Lambert Conformal Conic (1SP)”],
     PARAMETER[“latitude_of_origin”, 52.0],
     PARAMETER[“scale_factor”, 0.99987742],
     PARAMETER[“false_easting”, 600.0],
     PARAMETER[“false_northing”, 2200.0],
     UNIT[“metre”,1000]]"#;

fn verify_ntf(crs: &ProjectedCrs) {
    assert_eq!(crs.properties.name, "NTF (Paris) / Lambert zone II");
    let datum = &crs.base.datum;
    assert_eq!(datum.properties.name, "Nouvelle Triangulation Française (Paris)");
    let bursa_wolf = datum.bursa_wolf.as_ref().expect("TOWGS84");
    assert_eq!(bursa_wolf.values().as_slice(), &[-168.0, -60.0, 320.0]);
    assert_eq!(datum.ellipsoid.properties.name, "Clarke 1880 (IGN)");
    assert_eq!(datum.ellipsoid.semi_major, 6378249.2);
    assert_eq!(datum.ellipsoid.inverse_flattening, 293.4660212936269);
    assert_eq!(datum.prime_meridian.properties.name, "Paris");

    let p = &crs.conversion.parameters;
    assert_eq!(crs.conversion.method.properties.name, "Lambert Conic Conformal (1SP)");
    assert_eq!(p.value_in("semi_major", &Unit::METRE), Some(6378249.2));
    assert_relative_eq!(p.value_in("semi_minor", &Unit::METRE).unwrap(), 6356515.0, epsilon = 1e-2);
    assert_eq!(p.value_in("central_meridian", &Unit::DEGREE), Some(0.0));
    assert_eq!(p.value_in("scale_factor", &Unit::UNITY), Some(0.99987742));
    assert_relative_eq!(p.value_in("false_easting", &Unit::METRE).unwrap(), 600000.0, epsilon = 1e-6);
    assert_relative_eq!(p.value_in("false_northing", &Unit::METRE).unwrap(), 2200000.0, epsilon = 1e-6);
}

#[test]
fn test_projected_with_grad_units() {
    let crs = projected(parse_crs(NTF_LAMBERT));
    verify_ntf(&crs);
    verify_projected_cs(&crs, &Unit::KILOMETRE);
    let pm = &crs.base.datum.prime_meridian;
    assert_eq!(pm.angular_unit, Unit::GRAD);
    assert_eq!(pm.greenwich_longitude, 2.5969213);
    let latitude = crs.conversion.parameters.parameter("latitude_of_origin").unwrap();
    assert_eq!(latitude.unit, Some(Unit::GRAD));
    assert_eq!(latitude.number(), Some(52.0));

    // GDAL reading: angles in degrees and linear values in metres
    let text = NTF_LAMBERT
        .replace("2.5969213", "2.33722917")
        .replace("52.0", "46.8")
        .replace("600.0", "600000")
        .replace("2200.0", "2200000");
    let parsed = decoder(Convention::WKT1_IGNORE_AXES).parse(&text).unwrap();
    assert!(parsed.warnings.is_none());
    let crs = projected(parsed.object.into_crs().unwrap());
    verify_ntf(&crs);
    verify_projected_cs(&crs, &Unit::KILOMETRE);
    let pm = &crs.base.datum.prime_meridian;
    assert_eq!(pm.angular_unit, Unit::DEGREE);
    assert_eq!(pm.greenwich_longitude, 2.33722917);
    let latitude = crs.conversion.parameters.parameter("latitude_of_origin").unwrap();
    assert_eq!(latitude.unit, Some(Unit::DEGREE));
    assert_eq!(latitude.number(), Some(46.8));
}

#[test]
fn test_projected_with_missing_name() {
    let crs = projected(parse_crs(
        r#"PROJCS[“FRANCE/NTF/Lambert III”,
             GEOGCS[“”,
               DATUM[“NTF=GR3DF97A”,TOWGS84[-168, -60, 320] ,
                 SPHEROID[“Clarke 1880 (IGN)”,6378249.2,293.4660212936269]],
               PRIMEM[“Greenwich”,0],UNIT[“Degrees”,0.0174532925199433],
               AXIS[“Long”,East],AXIS[“Lat”,North]],
             PROJECTION[“Lambert_Conformal_Conic_1SP”],
             PARAMETER[“latitude_of_origin”,44.1],
             PARAMETER[“central_meridian”,2.33722917],
             PARAMETER[“scale_factor”,0.999877499],
             PARAMETER[“false_easting”,600000],
             PARAMETER[“false_northing”,200000],
             UNIT[“Meter”,1],
             AXIS[“Easting”,East],AXIS[“Northing”,North]]"#,
    ));
    assert_eq!(crs.properties.name, "FRANCE/NTF/Lambert III");
    verify_projected_cs(&crs, &Unit::METRE);
    assert_eq!(crs.base.properties.name, "NTF=GR3DF97A");
    assert_eq!(crs.base.datum.properties.name, "NTF=GR3DF97A");
    assert_eq!(crs.base.datum.prime_meridian.properties.name, "Greenwich");
    assert_eq!(
        crs.base.datum.bursa_wolf.as_ref().unwrap().values().as_slice(),
        &[-168.0, -60.0, 320.0]
    );
    assert_eq!(crs.base.datum.ellipsoid.semi_major, 6378249.2);
    assert_longitude(&crs.base.cs.axes[0], &Unit::DEGREE, 180.0);
    assert_latitude(&crs.base.cs.axes[1], &Unit::DEGREE, 90.0);
    let p = &crs.conversion.parameters;
    assert_eq!(p.value_in("latitude_of_origin", &Unit::DEGREE), Some(44.1));
    assert_eq!(p.value_in("central_meridian", &Unit::DEGREE), Some(2.33722917));
}

#[test]
fn test_empty_name_takes_datum_name() {
    let crs = parse_crs(
        r#"GEOGCS["", DATUM["D", SPHEROID["S", 6378137, 298.257223563]], UNIT["degree", 0.0174532925199433]]"#,
    );
    assert_eq!(crs.name(), "D");
}

// ============================================================================
// Other CRS types
// ============================================================================

#[test]
fn test_engineering_crs() {
    let crs = parse_crs(
        "EngineeringCRS[“A building-centred CRS”,\n\
           EngineeringDatum[“Building reference point”],\n\
           CS[Cartesian, 3],\n\
             Axis[“x”, east],\n\
             Axis[“y”, north],\n\
             Axis[“z”, up],\n\
             Unit[“metre”, 1]]",
    );
    let Crs::Engineering(crs) = crs else {
        panic!("expected an engineering CRS");
    };
    assert_eq!(crs.properties.name, "A building-centred CRS");
    assert_eq!(crs.datum.properties.name, "Building reference point");
    assert_eq!(crs.cs.dimension(), 3);
    assert_axis(&crs.cs.axes[0], "Easting", "x", AxisDirection::East, &Unit::METRE);
    assert_axis(&crs.cs.axes[1], "Northing", "y", AxisDirection::North, &Unit::METRE);
    assert_axis(&crs.cs.axes[2], "z", "z", AxisDirection::Up, &Unit::METRE);
    crs.cs.axes.iter().for_each(assert_unbounded);
}

#[test]
fn test_compound_crs() {
    let text = format!(
        r#"COMPD_CS[“WGS 84 + height + time”,
             {},
             VERT_CS[“Gravity-related height”,
               VERT_DATUM[“Mean Sea Level”, 2005],
               UNIT[“metre”, 1],
               AXIS[“Gravity-related height”, UP]],
             TimeCRS[“Time”,
               TimeDatum[“Modified Julian”, TimeOrigin[1858-11-17T00:00:00.0Z]],
               Unit[“day”, 86400],
               Axis[“Time”, FUTURE]]]"#,
        wgs84(r#", AXIS["Longitude", EAST], AXIS["Latitude", NORTH]"#)
    );
    let Crs::Compound(crs) = parse_crs(&text) else {
        panic!("expected a compound CRS");
    };
    assert_eq!(crs.properties.name, "WGS 84 + height + time");
    assert_eq!(crs.components.len(), 3);

    verify_wgs84(&geographic(crs.components[0].clone()));

    let Crs::Vertical(vertical) = &crs.components[1] else {
        panic!("expected a vertical CRS");
    };
    assert_eq!(vertical.properties.name, "Gravity-related height");
    assert_eq!(vertical.datum.properties.name, "Mean Sea Level");
    assert_eq!(vertical.datum.datum_type, 2005);

    let Crs::Temporal(temporal) = &crs.components[2] else {
        panic!("expected a temporal CRS");
    };
    assert_eq!(temporal.properties.name, "Time");
    assert_eq!(temporal.datum.properties.name, "Modified Julian");
    assert_eq!(temporal.datum.origin.timestamp(), -40587 * 86400);
    assert_relative_eq!(temporal.epoch_offset().unwrap(), -40587.0, epsilon = 1e-9);

    let cs = &crs.cs;
    assert_eq!(cs.dimension(), 4);
    assert_longitude(&cs.axes[0], &Unit::DEGREE, 180.0);
    assert_latitude(&cs.axes[1], &Unit::DEGREE, 90.0);
    assert_axis(&cs.axes[2], "Gravity-related height", "H", AxisDirection::Up, &Unit::METRE);
    assert_axis(&cs.axes[3], "Time", "t", AxisDirection::Future, &Unit::DAY);
}

#[test]
fn test_parametric_crs() {
    let crs = parse_crs(
        r#"PARAMETRICCRS["WMO standard atmosphere layer 0",
             PDATUM["Mean Sea Level", ANCHOR["1013.25 hPa at 15°C"]],
             CS[parametric, 1],
               AXIS["pressure (hPa)", up],
               PARAMETRICUNIT["hPa", 100.0]]"#,
    );
    let Crs::Parametric(crs) = crs else {
        panic!("expected a parametric CRS");
    };
    assert_eq!(crs.datum.anchor.as_deref(), Some("1013.25 hPa at 15°C"));
    let axis = &crs.cs.axes[0];
    assert_eq!(axis.properties.name, "pressure");
    assert_eq!(axis.abbreviation, "hPa");
    assert_eq!(axis.unit.name, "hPa");
    assert_eq!(axis.unit.factor, 100.0);
}

// ============================================================================
// Warnings and errors
// ============================================================================

#[test]
fn test_warnings() {
    let parsed: Parsed = GeodeticDecoder::default()
        .parse(
            r#"GEOGCS[“WGS 84”,
                 DATUM[“World Geodetic System 1984”,
                   SPHEROID[“WGS84”, 6378137.0, 298.257223563, Ext1[“foo”], Ext2[“bla”]]],
                 PRIMEM[“Greenwich”, 0.0, Intruder[“unknown”]],
                 UNIT[“degree”, 0.017453292519943295],
                 Intruder[“foo”]]"#,
        )
        .unwrap();
    verify_wgs84(&geographic(parsed.object.into_crs().unwrap()));

    let warnings = parsed.warnings.expect("unknown elements should be reported");
    assert_eq!(warnings.root_element(), Some("WGS 84"));
    assert_eq!(warnings.unknown_elements(), vec!["Intruder", "Ext1", "Ext2"]);
    assert_eq!(
        warnings.unknown_element_locations("Intruder").unwrap(),
        &["PRIMEM".to_string(), "GEOGCS".to_string()]
    );
    assert_eq!(
        warnings.unknown_element_locations("Ext1").unwrap(),
        &["SPHEROID".to_string()]
    );
    assert_eq!(
        warnings.to_string_in(Language::English),
        "Parsing of “WGS 84” done, but some elements were ignored.\n \
         • The text contains unknown elements:\n    \
         ‣ “Intruder” in PRIMEM, GEOGCS.\n    \
         ‣ “Ext1” in SPHEROID.\n    \
         ‣ “Ext2” in SPHEROID.\n"
    );
    assert_eq!(
        warnings.to_string_in(Language::French),
        "La lecture de « WGS 84 » a été faite, mais en ignorant certains éléments.\n \
         • Le texte contient des éléments inconnus :\n    \
         ‣ « Intruder » dans PRIMEM, GEOGCS.\n    \
         ‣ « Ext1 » dans SPHEROID.\n    \
         ‣ « Ext2 » dans SPHEROID.\n"
    );
}

#[test]
fn test_intruder_does_not_change_result() {
    let clean = parse_crs(&wgs84(""));
    let parsed = GeodeticDecoder::default()
        .parse(&wgs84(r#", Intruder["x", 1]"#))
        .unwrap();
    assert_eq!(parsed.object.as_crs(), Some(&clean));
    let warnings = parsed.warnings.unwrap();
    assert_eq!(warnings.unknown_elements(), vec!["Intruder"]);
    assert_eq!(
        warnings.unknown_element_locations("Intruder").unwrap(),
        &["GEOGCS".to_string()]
    );
    assert!(warnings.notices().is_empty());
}

#[test]
fn test_unmatched_bracket() {
    let text = r#"GEOGCS["WGS 84", UNIT["degree", 0.0174532925199433]"#;
    let mut position = ParsePosition::new(0);
    let err = GeodeticDecoder::default()
        .parse_object(text, &mut position)
        .unwrap_err();
    assert!(matches!(err.kind(), Error::Syntax { .. }), "{}", err);
    assert_eq!(err.offset(), text.find('[').unwrap());
    assert_eq!(position.error_index, Some(err.offset()));
    assert_eq!(position.index, 0);
    assert_eq!(err.root_element(), Some("WGS 84"));
}

#[test]
fn test_missing_ellipsoid() {
    let err = GeodeticDecoder::default()
        .parse(r#"GEOGCS["Broken", DATUM["D"], UNIT["degree", 0.0174532925199433]]"#)
        .unwrap_err();
    assert_eq!(err.root_element(), Some("Broken"));
    match err.kind() {
        Error::MissingElement { keyword, parent, .. } => {
            assert_eq!(keyword, "ELLIPSOID");
            assert_eq!(parent, "DATUM");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unknown_unit_without_factor() {
    for (text, keyword) in [
        (r#"PRIMEM["x", 10, ANGLEUNIT["foo"]]"#, "ANGLEUNIT"),
        (
            r#"ELLIPSOID["x", 6378.137, 298.257223563, LENGTHUNIT["league"]]"#,
            "LENGTHUNIT",
        ),
    ] {
        let err = GeodeticDecoder::default().parse(text).unwrap_err();
        assert_eq!(err.root_element(), Some("x"));
        assert_eq!(err.offset(), text.find(keyword).unwrap());
        match err.kind() {
            Error::AmbiguousOrLossyConversion { element, .. } => assert_eq!(element, keyword),
            other => panic!("unexpected error {:?}", other),
        }
    }

    // Known names and SI prefixes need no factor
    let WktObject::Ellipsoid(ellipsoid) =
        parse_clean(r#"ELLIPSOID["x", 6378.137, 298.257223563, LENGTHUNIT["kilometre"]]"#)
    else {
        panic!("expected an ellipsoid");
    };
    assert_relative_eq!(ellipsoid.semi_major_metres(), 6378137.0, epsilon = 1e-6);
}

#[test]
fn test_stream_of_definitions() {
    let text = format!("{}\n\n{}\n", wgs84(""), PARIS);
    let decoder = GeodeticDecoder::default();
    let mut position = ParsePosition::new(0);
    let mut names = Vec::new();
    while position.index < text.len() {
        let parsed = decoder.parse_object(&text, &mut position).unwrap();
        names.push(parsed.object.name().to_string());
    }
    assert_eq!(names, vec!["WGS 84", "NTF (Paris)"]);
    assert_eq!(position.index, text.len());

    let all = decoder.parse_all(&text).unwrap();
    assert_eq!(all.len(), 2);
}
