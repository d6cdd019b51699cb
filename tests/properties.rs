// Copyright (c) 2024-2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

extern crate ellipsoid_geodesic;

use angle_sc::Degrees;
use ellipsoid_geodesic::{angles, Capabilities, Flags, Metres, WGS84_ELLIPSOID};
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

/// Return an arbitrary normal `f64` (or zero) in the range [0, `modulus`).
fn arbitrary_in_range(g: &mut Gen, modulus: f64) -> f64 {
    // quickcheck gives awkward f64 values: infinities, NaNs and subnormals
    loop {
        match f64::arbitrary(g) {
            0.0 => break 0.0,
            f if f.is_normal() => break f.rem_euclid(modulus),
            _ => {}
        }
    }
}

/// A position on the surface of the ellipsoid.
#[derive(Clone, Copy, Debug)]
struct Position {
    lat: f64,
    lon: f64,
}

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            lat: arbitrary_in_range(g, 180.0) - 90.0,
            lon: arbitrary_in_range(g, 360.0) - 180.0,
        }
    }
}

/// A distance along a geodesic, up to half way around the ellipsoid.
#[derive(Clone, Copy, Debug)]
struct Distance(f64);

impl Arbitrary for Distance {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(arbitrary_in_range(g, 2.0e7))
    }
}

/// The distance between a pair of positions in metres.
fn distance_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    WGS84_ELLIPSOID
        .inverse(Degrees(lat1), Degrees(lon1), Degrees(lat2), Degrees(lon2))
        .s12
        .map_or(f64::NAN, |s12| s12.0)
}

#[quickcheck]
fn qc_inverse_then_direct_round_trip(a: Position, b: Position) -> bool {
    let inverse =
        WGS84_ELLIPSOID.inverse(Degrees(a.lat), Degrees(a.lon), Degrees(b.lat), Degrees(b.lon));
    let (Some(azi1), Some(s12)) = (inverse.azi1, inverse.s12) else {
        return false;
    };

    let direct = WGS84_ELLIPSOID.direct(Degrees(a.lat), Degrees(a.lon), azi1, s12);
    let (Some(lat2), Some(lon2)) = (direct.lat2, direct.lon2) else {
        return false;
    };

    distance_between(b.lat, b.lon, lat2.0, lon2.0) < 1e-6
}

/// The magnitude of the difference between a pair of angles in degrees.
fn angle_between(x: f64, y: f64) -> f64 {
    libm::fabs(angles::difference(x, y).0)
}

#[quickcheck]
fn qc_direct_then_inverse_round_trip(a: Position, azimuth: Position, distance: Distance) -> TestResult {
    // the azimuth at a pole depends upon the longitude
    if libm::fabs(a.lat) > 89.9 {
        return TestResult::discard();
    }
    // from 1 km to well short of the antipodal region
    let s12 = 1000.0 + 0.7 * distance.0;
    let azi1 = azimuth.lon;

    let direct = WGS84_ELLIPSOID.direct(Degrees(a.lat), Degrees(a.lon), Degrees(azi1), Metres(s12));
    let (Some(lat2), Some(lon2)) = (direct.lat2, direct.lon2) else {
        return TestResult::failed();
    };

    let inverse = WGS84_ELLIPSOID.inverse(Degrees(a.lat), Degrees(a.lon), lat2, lon2);
    let (Some(inverse_azi1), Some(inverse_s12)) = (inverse.azi1, inverse.s12) else {
        return TestResult::failed();
    };

    TestResult::from_bool(
        libm::fabs(s12 - inverse_s12.0) < 1e-6 && angle_between(azi1, inverse_azi1.0) < 1e-8,
    )
}

#[quickcheck]
fn qc_inverse_symmetry(a: Position, b: Position) -> TestResult {
    let forward =
        WGS84_ELLIPSOID.inverse(Degrees(a.lat), Degrees(a.lon), Degrees(b.lat), Degrees(b.lon));
    let reverse =
        WGS84_ELLIPSOID.inverse(Degrees(b.lat), Degrees(b.lon), Degrees(a.lat), Degrees(a.lon));

    let forward_s12 = forward.s12.map_or(f64::NAN, |s12| s12.0);
    let reverse_s12 = reverse.s12.map_or(f64::NAN, |s12| s12.0);
    if !(libm::fabs(forward_s12 - reverse_s12) < 1e-6
        && libm::fabs(forward.a12.0 - reverse.a12.0) < 1e-11
        && (0.0..=180.0).contains(&forward.a12.0))
    {
        return TestResult::failed();
    }

    // azimuths are ill-conditioned for short, nearly antipodal or polar geodesics
    if forward_s12 < 1.0
        || forward.a12.0 > 170.0
        || libm::fabs(a.lat) > 89.9
        || libm::fabs(b.lat) > 89.9
    {
        return TestResult::discard();
    }

    match (forward.azi1, forward.azi2, reverse.azi1, reverse.azi2) {
        (Some(azi1), Some(azi2), Some(reverse_azi1), Some(reverse_azi2)) => TestResult::from_bool(
            angle_between(angles::normalize(azi2.0 + 180.0), reverse_azi1.0) < 1e-8
                && angle_between(angles::normalize(azi1.0 + 180.0), reverse_azi2.0) < 1e-8,
        ),
        _ => TestResult::failed(),
    }
}

#[quickcheck]
fn qc_direct_additivity(a: Position, azimuth: Position, first: Distance, second: Distance) -> bool {
    let azi1 = Degrees(azimuth.lon);
    let caps = Capabilities::LATITUDE | Capabilities::LONGITUDE | Capabilities::AZIMUTH;

    let midpoint = WGS84_ELLIPSOID.gen_direct(
        Degrees(a.lat),
        Degrees(a.lon),
        azi1,
        Flags::empty(),
        first.0,
        caps,
    );
    let (Some(lat), Some(lon), Some(azi)) = (midpoint.lat2, midpoint.lon2, midpoint.azi2) else {
        return false;
    };
    let finish = WGS84_ELLIPSOID.direct(lat, lon, azi, Metres(second.0));

    let line = WGS84_ELLIPSOID.line(Degrees(a.lat), Degrees(a.lon), azi1, Capabilities::default());
    let expected = line.position(Metres(first.0 + second.0));

    match (finish.lat2, finish.lon2, expected.lat2, expected.lon2) {
        (Some(lat2), Some(lon2), Some(lat3), Some(lon3)) => {
            distance_between(lat2.0, lon2.0, lat3.0, lon3.0) < 1e-6
        }
        _ => false,
    }
}

#[quickcheck]
fn qc_longitude_normalised(a: Position, azimuth: Position, distance: Distance) -> bool {
    let result = WGS84_ELLIPSOID.direct(
        Degrees(a.lat),
        Degrees(a.lon),
        Degrees(azimuth.lon),
        Metres(distance.0),
    );
    result.lon2.is_some_and(|lon2| {
        -180.0 < lon2.0 && lon2.0 <= 180.0 && angles::normalize(lon2.0) == lon2.0
    })
}
