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

//! ellipsoid-geodesic
//!
//! A library for solving the direct and inverse geodesic problems on an
//! [ellipsoid of revolution](https://en.wikipedia.org/wiki/Spheroid),
//! e.g. the [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid used for satellite navigation.
//!
//! ## Geodesics
//!
//! The shortest path between two points on the surface of an ellipsoid is a
//! [geodesic](https://en.wikipedia.org/wiki/Geodesics_on_an_ellipsoid).
//! It is the equivalent of a straight line segment in planar geometry or a
//! [great circle arc](https://en.wikipedia.org/wiki/Great_circle) on the
//! surface of a sphere.
//!
//! The library solves the two classical geodesic problems:
//!
//! - the **direct** problem: given a start point, azimuth and distance,
//!   find the finish point and the azimuth at the finish point;
//! - the **inverse** problem: given two points, find the distance between
//!   them and the azimuths at each end.
//!
//! It can also calculate the arc length on the auxiliary sphere, the reduced
//! length, the geodesic scales and the area between a geodesic and the
//! equator.
//!
//! ## Design
//!
//! The library is based on Charles Karney's
//! [GeographicLib](https://geographiclib.sourceforge.io/) library and his paper
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).
//!
//! Like `GeographicLib`, it models geodesics as great circle arcs on the
//! surface of an auxiliary sphere, using series expansions in the third
//! flattening of the ellipsoid to map between the sphere and the ellipsoid.
//!
//! The `Ellipsoid` struct represents an ellipsoid of revolution and solves
//! geodesic problems on it. The static `WGS84_ELLIPSOID` represents the WGS-84
//! `Ellipsoid`.
//! A `GeodesicLine` represents a geodesic through a start point with a given
//! azimuth. It calculates its series coefficients once, so it is efficient
//! for finding many points along the same geodesic.
//!
//! `Capabilities` select the quantities to calculate and `Flags` modify
//! the direct problem.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Degrees`
//!   and compare results within tolerances;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`;
//! - [libm](https://crates.io/crates/libm) - for the transcendental functions.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.
//!
//! ## Example
//! ```
//! use ellipsoid_geodesic::*;
//!
//! let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
//! let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
//! let result = WGS84_ELLIPSOID.inverse_lat_longs(&istanbul, &washington);
//!
//! let distance = result.s12.unwrap();
//! assert!((distance.0 - 8_339_863.136).abs() < 1e-3);
//!
//! let azimuth = result.azi1.unwrap();
//! assert!((azimuth.0 + 50.693_753).abs() < 1e-6);
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod angles;
pub mod capabilities;
pub mod ellipsoid;
pub mod geodesic;

pub use angle_sc::Degrees;
pub use capabilities::{Capabilities, Flags};
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use angles::{atan2d, lat_fix, norm2, normalize, round_tiny, sincosd, DEGREE, TINY};
use capabilities::Series;
use ellipsoid::coefficients::{
    evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c1p, evaluate_coeffs_c2,
    evaluate_coeffs_c3y, evaluate_coeffs_c4y, evaluate_polynomial, sin_cos_series,
};
use lazy_static::lazy_static;

/// The errors that may be returned by this library.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The Semimajor axis is not positive and finite, or the flattening is
    /// not finite and less than one.
    #[error("invalid ellipsoid: semimajor axis {a}, flattening {f}")]
    InvalidEllipsoid { a: f64, f: f64 },
}

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,
    /// The square of the authalic radius.
    c2: f64,
    /// The tolerance for the short line solution of the inverse problem.
    etol2: f64,

    /// The A3 series `coefficients` of the ellipsoid.
    a3: [f64; 6],
    /// The C3x series `coefficients` of the ellipsoid.
    c3x: [f64; 15],
    /// The C4x series `coefficients` of the ellipsoid.
    c4x: [f64; 21],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    ///   Negative for a prolate ellipsoid.
    ///
    /// # Errors
    ///
    /// `Error::InvalidEllipsoid` if `a` is not positive and finite, or `f`
    /// is not finite and less than one.
    pub fn new(a: Metres, f: f64) -> Result<Self, Error> {
        if !(a.0.is_finite() && 0.0 < a.0) || !(f.is_finite() && f < 1.0) {
            log::debug!("Ellipsoid::new: rejected a: {}, f: {}", a.0, f);
            return Err(Error::InvalidEllipsoid { a: a.0, f });
        }
        Ok(Self::from_parameters(a, f))
    }

    /// Construct an `Ellipsoid` from valid parameters.
    #[must_use]
    fn from_parameters(a: Metres, f: f64) -> Self {
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b: ellipsoid::calculate_minor_axis(a, f),
            one_minus_f: 1.0 - f,
            e_2: ellipsoid::calculate_sq_eccentricity(f),
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            n,
            c2: ellipsoid::calculate_authalic_radius_sq(a, f),
            etol2: ellipsoid::calculate_short_line_tolerance(f),
            a3: ellipsoid::coefficients::evaluate_coeffs_a3(n),
            c3x: ellipsoid::coefficients::evaluate_coeffs_c3x(n),
            c4x: ellipsoid::coefficients::evaluate_coeffs_c4x(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::from_parameters(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The square of the authalic radius: the radius of a sphere with the
    /// same surface area as the ellipsoid.
    #[must_use]
    pub const fn c2(&self) -> f64 {
        self.c2
    }

    /// The total surface area of the ellipsoid in square metres.
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::WGS84_ELLIPSOID;
    ///
    /// let area = WGS84_ELLIPSOID.area();
    /// assert!((area - 510_065_621_724_088.4).abs() < 1.0);
    /// ```
    #[must_use]
    pub fn area(&self) -> f64 {
        4.0 * core::f64::consts::PI * self.c2
    }

    /// The tolerance for the short line solution of the inverse problem.
    #[must_use]
    pub(crate) const fn short_line_tolerance(&self) -> f64 {
        self.etol2
    }

    /// Calculate a3f from the A3 series `coefficients` of the ellipsoid.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_a3f(&self, eps: f64) -> f64 {
        evaluate_polynomial(&self.a3, eps)
    }

    /// Calculate the coefficients `C3[l]` in the Fourier expansion of `C3`.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_c3y(&self, eps: f64) -> [f64; 6] {
        evaluate_coeffs_c3y(&self.c3x, eps)
    }

    /// Calculate the coefficients `C4[l]` in the Fourier expansion of `I4`.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_c4y(&self, eps: f64) -> [f64; 6] {
        evaluate_coeffs_c4y(&self.c4x, eps)
    }

    /// Solve the direct geodesic problem.
    /// * `lat1`, `lon1` - the start point. `lat1` should be in the range
    ///   [-90, 90] degrees, otherwise the results are NaN.
    /// * `azi1` - the azimuth at the start point.
    /// * `flags` - `Flags::ARC_MODE` if `s12_a12` is an arc length in degrees,
    ///   `Flags::LONG_UNROLL` to leave the finish longitude unrolled.
    /// * `s12_a12` - the distance in metres, or arc length in degrees, from
    ///   the start point to the finish point. It may be negative.
    /// * `caps` - the quantities to calculate.
    ///
    /// returns the `DirectSolution`.
    #[must_use]
    pub fn gen_direct(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        flags: Flags,
        s12_a12: f64,
        caps: Capabilities,
    ) -> DirectSolution {
        let line_caps = if flags.contains(Flags::ARC_MODE) {
            caps
        } else {
            // Automatically supply DISTANCE_IN if necessary
            caps | Capabilities::DISTANCE_IN
        };
        GeodesicLine::new(self, lat1, lon1, azi1, line_caps).gen_position(flags, s12_a12, caps)
    }

    /// Solve the direct geodesic problem for the finish position and azimuth.
    /// * `lat1`, `lon1` - the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `s12` - the distance from the start point to the finish point.
    ///
    /// returns the `DirectSolution` with `lat2`, `lon2` and `azi2`.
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::*;
    ///
    /// // 10,000 km north east from JFK airport
    /// let result = WGS84_ELLIPSOID.direct(Degrees(40.64), Degrees(-73.78), Degrees(45.0), Metres(10e6));
    /// assert!((result.lat2.unwrap().0 - 32.621_100).abs() < 1e-6);
    /// assert!((result.lon2.unwrap().0 - 49.052_487).abs() < 1e-6);
    /// assert!((result.azi2.unwrap().0 - 140.405_986).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn direct(&self, lat1: Degrees, lon1: Degrees, azi1: Degrees, s12: Metres) -> DirectSolution {
        self.gen_direct(
            lat1,
            lon1,
            azi1,
            Flags::empty(),
            s12.0,
            Capabilities::LATITUDE | Capabilities::LONGITUDE | Capabilities::AZIMUTH,
        )
    }

    /// Solve the inverse geodesic problem.
    /// * `lat1`, `lon1` - the start point.
    /// * `lat2`, `lon2` - the finish point.
    ///   Latitudes should be in the range [-90, 90] degrees, otherwise the
    ///   results are NaN.
    /// * `caps` - the quantities to calculate. `LATITUDE`, `LONGITUDE` and
    ///   `DISTANCE_IN` have no effect.
    ///
    /// returns the `InverseSolution`.
    #[must_use]
    pub fn gen_inverse(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        lat2: Degrees,
        lon2: Degrees,
        caps: Capabilities,
    ) -> InverseSolution {
        let caps = caps.with_prerequisites();
        let result = geodesic::calculate_inverse(self, lat1.0, lon1.0, lat2.0, lon2.0, caps);

        let azimuth = caps.contains(Capabilities::AZIMUTH);
        let scale = caps.contains(Capabilities::GEODESIC_SCALE);
        InverseSolution {
            a12: Degrees(result.a12),
            s12: caps
                .contains(Capabilities::DISTANCE)
                .then_some(Metres(result.s12)),
            azi1: azimuth.then(|| Degrees(geodesic::to_azimuth(result.salp1, result.calp1))),
            azi2: azimuth.then(|| Degrees(geodesic::to_azimuth(result.salp2, result.calp2))),
            m12: caps
                .contains(Capabilities::REDUCED_LENGTH)
                .then_some(Metres(result.m12)),
            big_m12: scale.then_some(result.big_m12),
            big_m21: scale.then_some(result.big_m21),
            area: caps.contains(Capabilities::AREA).then_some(result.area),
        }
    }

    /// Solve the inverse geodesic problem for the distance and azimuths.
    /// * `lat1`, `lon1` - the start point.
    /// * `lat2`, `lon2` - the finish point.
    ///
    /// returns the `InverseSolution` with `s12`, `azi1` and `azi2`.
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::*;
    ///
    /// // JFK airport to Singapore Changi airport
    /// let result = WGS84_ELLIPSOID.inverse(Degrees(40.64), Degrees(-73.78), Degrees(1.36), Degrees(103.99));
    /// assert!((result.s12.unwrap().0 - 15_347_512.941).abs() < 1e-3);
    /// assert!((result.azi1.unwrap().0 - 3.305_773).abs() < 1e-6);
    /// assert!((result.azi2.unwrap().0 - 177.487_840).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn inverse(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        lat2: Degrees,
        lon2: Degrees,
    ) -> InverseSolution {
        self.gen_inverse(
            lat1,
            lon1,
            lat2,
            lon2,
            Capabilities::DISTANCE | Capabilities::AZIMUTH,
        )
    }

    /// Solve the inverse geodesic problem between a pair of `LatLong`s for
    /// the distance and azimuths.
    /// * `a`, `b` - the start and finish positions.
    ///
    /// returns the `InverseSolution` with `s12`, `azi1` and `azi2`.
    #[must_use]
    pub fn inverse_lat_longs(&self, a: &LatLong, b: &LatLong) -> InverseSolution {
        self.inverse(a.lat(), a.lon(), b.lat(), b.lon())
    }

    /// Construct a `GeodesicLine` from a start point and azimuth.
    /// * `lat1`, `lon1` - the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `caps` - the quantities that the line can calculate. If empty,
    ///   `DISTANCE_IN | LONGITUDE`. `LATITUDE` and `AZIMUTH` are always
    ///   included.
    #[must_use]
    pub fn line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        caps: Capabilities,
    ) -> GeodesicLine<'_> {
        GeodesicLine::new(self, lat1, lon1, azi1, line_capabilities(caps))
    }

    /// Construct a `GeodesicLine` from a start point, azimuth and a distance
    /// or arc length to point 3.
    /// * `lat1`, `lon1` - the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `flags` - `Flags::ARC_MODE` if `s13_a13` is an arc length in degrees.
    /// * `s13_a13` - the distance or arc length to point 3.
    /// * `caps` - the quantities that the line can calculate.
    #[must_use]
    pub fn gen_direct_line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        flags: Flags,
        s13_a13: f64,
        caps: Capabilities,
    ) -> GeodesicLine<'_> {
        let mut line = GeodesicLine::new(self, lat1, lon1, azi1, caps);
        line.gen_set_distance(flags, s13_a13);
        line
    }

    /// Construct a `GeodesicLine` from a start point, azimuth and the
    /// distance to point 3.
    /// * `lat1`, `lon1` - the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `s13` - the distance to point 3.
    /// * `caps` - the quantities that the line can calculate.
    #[must_use]
    pub fn direct_line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        s13: Metres,
        caps: Capabilities,
    ) -> GeodesicLine<'_> {
        self.gen_direct_line(lat1, lon1, azi1, Flags::empty(), s13.0, caps)
    }

    /// Construct a `GeodesicLine` from the solution of the inverse problem,
    /// with point 3 at the finish point.
    /// * `lat1`, `lon1` - the start point.
    /// * `lat2`, `lon2` - the finish point.
    /// * `caps` - the quantities that the line can calculate. If empty,
    ///   `DISTANCE_IN | LONGITUDE`.
    #[must_use]
    pub fn inverse_line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        lat2: Degrees,
        lon2: Degrees,
        caps: Capabilities,
    ) -> GeodesicLine<'_> {
        let result = geodesic::calculate_inverse(
            self,
            lat1.0,
            lon1.0,
            lat2.0,
            lon2.0,
            Capabilities::empty(),
        );
        let azi1 = geodesic::to_azimuth(result.salp1, result.calp1);
        let mut line = GeodesicLine::from_azimuth(
            self,
            lat1.0,
            lon1.0,
            azi1,
            result.salp1,
            result.calp1,
            line_capabilities(caps),
        );
        line.set_arc(Degrees(result.a12));
        line
    }
}

/// The capabilities of a line constructed by an `Ellipsoid`: empty `caps`
/// means `DISTANCE_IN | LONGITUDE`.
#[must_use]
fn line_capabilities(caps: Capabilities) -> Capabilities {
    if caps.is_empty() {
        Capabilities::DISTANCE_IN | Capabilities::LONGITUDE
    } else {
        caps
    }
}

lazy_static! {
    /// A static instance of the WGS-84 `Ellipsoid`.
    pub static ref WGS84_ELLIPSOID: Ellipsoid = Ellipsoid::wgs84();
}

/// The solution of a direct geodesic problem.
///
/// Each quantity is `Some` if it was requested, directly or as a prerequisite
/// of another quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectSolution {
    /// The arc length on the auxiliary sphere.
    pub a12: Degrees,
    /// The latitude of the finish point.
    pub lat2: Option<Degrees>,
    /// The longitude of the finish point.
    pub lon2: Option<Degrees>,
    /// The azimuth at the finish point.
    pub azi2: Option<Degrees>,
    /// The distance from the start point to the finish point.
    pub s12: Option<Metres>,
    /// The reduced length of the geodesic.
    pub m12: Option<Metres>,
    /// The geodesic scale of the finish point relative to the start point.
    pub big_m12: Option<f64>,
    /// The geodesic scale of the start point relative to the finish point.
    pub big_m21: Option<f64>,
    /// The area between the geodesic and the equator in square metres.
    pub area: Option<f64>,
}

impl DirectSolution {
    /// A solution with a NaN arc length and nothing else.
    #[must_use]
    const fn nan() -> Self {
        Self {
            a12: Degrees(f64::NAN),
            lat2: None,
            lon2: None,
            azi2: None,
            s12: None,
            m12: None,
            big_m12: None,
            big_m21: None,
            area: None,
        }
    }
}

/// The solution of an inverse geodesic problem.
///
/// Each quantity is `Some` if it was requested, directly or as a prerequisite
/// of another quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseSolution {
    /// The arc length on the auxiliary sphere, in the range [0, 180] degrees.
    pub a12: Degrees,
    /// The distance between the points.
    pub s12: Option<Metres>,
    /// The azimuth at the start point.
    pub azi1: Option<Degrees>,
    /// The azimuth at the finish point.
    pub azi2: Option<Degrees>,
    /// The reduced length of the geodesic.
    pub m12: Option<Metres>,
    /// The geodesic scale of the finish point relative to the start point.
    pub big_m12: Option<f64>,
    /// The geodesic scale of the start point relative to the finish point.
    pub big_m21: Option<f64>,
    /// The area between the geodesic and the equator in square metres.
    pub area: Option<f64>,
}

/// A geodesic line on the surface of an ellipsoid.
///
/// The line is defined by a start point and the azimuth at that point.
/// It stores the series coefficients of the geodesic so that positions
/// along it can be calculated efficiently.
/// It may also store a point 3, a distance or arc length along the line.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicLine<'a> {
    /// The ellipsoid that the geodesic is on.
    ellipsoid: &'a Ellipsoid,
    /// The start point latitude, in degrees.
    lat1: f64,
    /// The start point longitude, in degrees.
    lon1: f64,
    /// The start azimuth, in degrees.
    azi1: f64,
    /// The sine and cosine of the start azimuth.
    salp1: f64,
    calp1: f64,
    /// The quantities that the line can calculate.
    caps: Capabilities,

    /// The `dn` factor at the start point.
    dn1: f64,
    /// The sine and cosine of the azimuth at the equator crossing.
    salp0: f64,
    calp0: f64,
    /// The sine and cosine of the start arc length on the auxiliary sphere.
    ssig1: f64,
    csig1: f64,
    /// The sine and cosine of the start longitude on the auxiliary sphere.
    somg1: f64,
    comg1: f64,
    /// The sine and cosine of the start of the distance series.
    stau1: f64,
    ctau1: f64,
    k2: f64,

    a1m1: f64,
    a2m1: f64,
    a3c: f64,
    a4: f64,
    b11: f64,
    b21: f64,
    b31: f64,
    b41: f64,
    c1a: [f64; 7],
    c1pa: [f64; 7],
    c2a: [f64; 7],
    c3a: [f64; 6],
    c4a: [f64; 6],

    /// The distance to point 3.
    s13: Option<Metres>,
    /// The arc length to point 3.
    a13: Option<Degrees>,
}

impl<'a> GeodesicLine<'a> {
    /// Constructor.
    /// * `ellipsoid` - the `Ellipsoid`.
    /// * `lat1`, `lon1` - the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `caps` - the quantities that the line can calculate.
    #[must_use]
    pub fn new(
        ellipsoid: &'a Ellipsoid,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        caps: Capabilities,
    ) -> Self {
        let azi1 = normalize(azi1.0);
        // Guard against underflow in salp0
        let (salp1, calp1) = sincosd(round_tiny(azi1));
        Self::from_azimuth(ellipsoid, lat1.0, lon1.0, azi1, salp1, calp1, caps)
    }

    /// Construct a `GeodesicLine` given the sine and cosine of the start
    /// azimuth.
    #[allow(clippy::similar_names)]
    #[must_use]
    fn from_azimuth(
        ellipsoid: &'a Ellipsoid,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        salp1: f64,
        calp1: f64,
        caps: Capabilities,
    ) -> Self {
        let caps = caps.with_prerequisites() | Capabilities::LATITUDE | Capabilities::AZIMUTH;
        let series = caps.series();
        let lat1 = lat_fix(lat1);

        let (sbet1, cbet1) =
            ellipsoid::calculate_parametric_latitude(round_tiny(lat1), ellipsoid.one_minus_f());
        let dn1 = libm::sqrt(1.0 + ellipsoid.ep_2() * sbet1 * sbet1);

        // Evaluate alp0 from sin(alp1) * cos(bet1) = sin(alp0),
        let salp0 = salp1 * cbet1; // alp0 in [0, pi/2 - |bet1|]
        // Alt: calp0 = hypot(sbet1, calp1 * cbet1).  The following
        // is slightly better (consider the case salp1 = 0).
        let calp0 = libm::hypot(calp1, salp1 * sbet1);
        // Evaluate sig with tan(bet1) = tan(sig1) * cos(alp1).
        // sig = 0 is nearest northward crossing of equator.
        // With bet1 = 0, alp1 = pi/2, we have sig1 = 0 (equatorial line).
        // With bet1 =  pi/2, alp1 = -pi, sig1 =  pi/2
        // With bet1 = -pi/2, alp1 =  0 , sig1 = -pi/2
        // Evaluate omg1 with tan(omg1) = sin(alp0) * tan(sig1).
        // With alp0 in (0, pi/2], quadrants for sig and omg coincide.
        // No atan2(0,0) ambiguity at poles since cbet1 = +epsilon.
        // With alp0 = 0, omg1 = 0 for alp1 = 0, omg1 = pi for alp1 = pi.
        let somg1 = salp0 * sbet1;
        let comg1 = if sbet1 != 0.0 || calp1 != 0.0 {
            cbet1 * calp1
        } else {
            1.0
        };
        let (ssig1, csig1) = norm2(sbet1, comg1); // sig1 in (-pi, pi]

        let k2 = calp0 * calp0 * ellipsoid.ep_2();
        let eps = ellipsoid::calculate_epsilon(k2);

        let mut line = Self {
            ellipsoid,
            lat1,
            lon1,
            azi1,
            salp1,
            calp1,
            caps,
            dn1,
            salp0,
            calp0,
            ssig1,
            csig1,
            somg1,
            comg1,
            stau1: 0.0,
            ctau1: 0.0,
            k2,
            a1m1: 0.0,
            a2m1: 0.0,
            a3c: 0.0,
            a4: 0.0,
            b11: 0.0,
            b21: 0.0,
            b31: 0.0,
            b41: 0.0,
            c1a: [0.0; 7],
            c1pa: [0.0; 7],
            c2a: [0.0; 7],
            c3a: [0.0; 6],
            c4a: [0.0; 6],
            s13: None,
            a13: None,
        };

        if series.contains(Series::C1) {
            line.a1m1 = evaluate_a1(eps);
            line.c1a = evaluate_coeffs_c1(eps);
            line.b11 = sin_cos_series(true, ssig1, csig1, &line.c1a);
            let s = libm::sin(line.b11);
            let c = libm::cos(line.b11);
            // tau1 = sig1 + B11
            line.stau1 = ssig1 * c + csig1 * s;
            line.ctau1 = csig1 * c - ssig1 * s;
            // Not necessary because C1pa reverts C1a
            //    B11 = -SinCosSeries(true, stau1, ctau1, C1pa);
        }

        if series.contains(Series::C1P) {
            line.c1pa = evaluate_coeffs_c1p(eps);
        }

        if series.contains(Series::C2) {
            line.a2m1 = evaluate_a2(eps);
            line.c2a = evaluate_coeffs_c2(eps);
            line.b21 = sin_cos_series(true, ssig1, csig1, &line.c2a);
        }

        if series.contains(Series::C3) {
            line.c3a = ellipsoid.calculate_c3y(eps);
            line.a3c = -ellipsoid.f() * salp0 * ellipsoid.calculate_a3f(eps);
            line.b31 = sin_cos_series(true, ssig1, csig1, &line.c3a);
        }

        if series.contains(Series::C4) {
            line.c4a = ellipsoid.calculate_c4y(eps);
            // Multiplier = a^2 * e^2 * cos(alpha0) * sin(alpha0)
            line.a4 = ellipsoid.a().0 * ellipsoid.a().0 * calp0 * salp0 * ellipsoid.e_2();
            line.b41 = sin_cos_series(false, ssig1, csig1, &line.c4a);
        }

        line
    }

    /// The `Ellipsoid` that the line is on.
    #[must_use]
    pub const fn ellipsoid(&self) -> &'a Ellipsoid {
        self.ellipsoid
    }

    /// The latitude of the start point.
    #[must_use]
    pub const fn lat1(&self) -> Degrees {
        Degrees(self.lat1)
    }

    /// The longitude of the start point.
    #[must_use]
    pub const fn lon1(&self) -> Degrees {
        Degrees(self.lon1)
    }

    /// The azimuth at the start point.
    #[must_use]
    pub const fn azi1(&self) -> Degrees {
        Degrees(self.azi1)
    }

    /// The azimuth of the line where it crosses the equator northwards.
    #[must_use]
    pub fn azi0(&self) -> Degrees {
        Degrees(atan2d(self.salp0, self.calp0))
    }

    /// The quantities that the line can calculate.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// The distance to point 3, if set and the line can calculate distances.
    #[must_use]
    pub const fn s13(&self) -> Option<Metres> {
        self.s13
    }

    /// The arc length to point 3, if set.
    #[must_use]
    pub const fn a13(&self) -> Option<Degrees> {
        self.a13
    }

    /// Calculate a position on the line.
    /// * `flags` - `Flags::ARC_MODE` if `s12_a12` is an arc length in degrees,
    ///   `Flags::LONG_UNROLL` to leave the longitude unrolled.
    /// * `s12_a12` - the distance in metres, or arc length in degrees, from
    ///   the start point. It may be negative.
    /// * `caps` - the quantities to calculate. Quantities that the line
    ///   cannot calculate are `None`.
    ///
    /// returns the `DirectSolution`. If `s12_a12` is a distance and the line
    /// does not have `Capabilities::DISTANCE_IN`, then only `a12` is set
    /// and it is NaN.
    #[allow(clippy::many_single_char_names)]
    #[allow(clippy::similar_names)]
    #[allow(clippy::too_many_lines)]
    #[must_use]
    pub fn gen_position(&self, flags: Flags, s12_a12: f64, caps: Capabilities) -> DirectSolution {
        let out = caps.with_prerequisites() & self.caps;
        let arc_mode = flags.contains(Flags::ARC_MODE);
        if !(arc_mode || self.caps.contains(Capabilities::DISTANCE_IN)) {
            // Impossible distance calculation requested
            return DirectSolution::nan();
        }

        let e = self.ellipsoid;
        let b = e.b().0;

        // Avoid warning about uninitialized B12.
        let mut b12 = 0.0;
        let (sig12, ssig12, csig12) = if arc_mode {
            // Interpret s12_a12 as spherical arc length
            let (ssig12, csig12) = sincosd(s12_a12);
            (s12_a12 * DEGREE, ssig12, csig12)
        } else {
            // Interpret s12_a12 as distance
            let tau12 = s12_a12 / (b * (1.0 + self.a1m1));
            let s = libm::sin(tau12);
            let c = libm::cos(tau12);
            // tau2 = tau1 + tau12
            b12 = -sin_cos_series(
                true,
                self.stau1 * c + self.ctau1 * s,
                self.ctau1 * c - self.stau1 * s,
                &self.c1pa,
            );
            let mut sig12 = tau12 - (b12 - self.b11);
            let mut ssig12 = libm::sin(sig12);
            let mut csig12 = libm::cos(sig12);
            if libm::fabs(e.f()) > 0.01 {
                // Reverted distance series is inaccurate for |f| > 1/100, so correct
                // sig12 with 1 Newton iteration.  The following table shows the
                // approximate maximum error for a = WGS_a() and various f relative to
                // GeodesicExact.
                //     erri = the error in the inverse solution (nm)
                //     errd = the error in the direct solution (series only) (nm)
                //     errda = the error in the direct solution (series + 1 Newton) (nm)
                //
                //       f     erri  errd errda
                //     -1/5    12e6 1.2e9  69e6
                //     -1/10  123e3  12e6 765e3
                //     -1/20   1110 108e3  7155
                //     -1/50  18.63 200.9 27.12
                //     -1/100 18.63 23.78 23.37
                //     -1/150 18.63 21.05 20.26
                //      1/150 22.35 24.73 25.83
                //      1/100 22.35 25.03 25.31
                //      1/50  29.80 231.9 30.44
                //      1/20   5376 146e3  10e3
                //      1/10  829e3  22e6 1.5e6
                //      1/5   157e6 3.8e9 280e6
                let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
                let csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a);
                let serr = (1.0 + self.a1m1) * (sig12 + (b12 - self.b11)) - s12_a12 / b;
                sig12 -= serr / libm::sqrt(1.0 + self.k2 * ssig2 * ssig2);
                ssig12 = libm::sin(sig12);
                csig12 = libm::cos(sig12);
                // Update B12 below
            }
            (sig12, ssig12, csig12)
        };

        // sig2 = sig1 + sig12
        let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        let dn2 = libm::sqrt(1.0 + self.k2 * ssig2 * ssig2);
        let mut ab1 = 0.0;
        if out.intersects(
            Capabilities::DISTANCE | Capabilities::REDUCED_LENGTH | Capabilities::GEODESIC_SCALE,
        ) {
            if arc_mode || libm::fabs(e.f()) > 0.01 {
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a);
            }
            ab1 = (1.0 + self.a1m1) * (b12 - self.b11);
        }
        // sin(bet2) = cos(alp0) * sin(sig2)
        let sbet2 = self.calp0 * ssig2;
        // Alt: cbet2 = hypot(csig2, salp0 * ssig2);
        let mut cbet2 = libm::hypot(self.salp0, self.calp0 * csig2);
        if cbet2 == 0.0 {
            // I.e., salp0 = 0, csig2 = 0.  Break the degeneracy in this case
            cbet2 = TINY;
            csig2 = TINY;
        }
        // tan(alp0) = cos(sig2)*tan(alp2)
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2; // No need to normalize

        let mut result = DirectSolution {
            a12: Degrees(if arc_mode { s12_a12 } else { sig12 / DEGREE }),
            lat2: None,
            lon2: None,
            azi2: None,
            s12: None,
            m12: None,
            big_m12: None,
            big_m21: None,
            area: None,
        };

        if out.contains(Capabilities::DISTANCE) {
            result.s12 = Some(Metres(if arc_mode {
                b * ((1.0 + self.a1m1) * sig12 + ab1)
            } else {
                s12_a12
            }));
        }

        if out.contains(Capabilities::LONGITUDE) {
            let unroll = flags.contains(Flags::LONG_UNROLL);
            // east or west going?
            let e_sign = libm::copysign(1.0, self.salp0);
            // tan(omg2) = sin(alp0) * tan(sig2)
            let somg2 = self.salp0 * ssig2;
            let comg2 = csig2; // No need to normalize
            // omg12 = omg2 - omg1
            let omg12 = if unroll {
                e_sign
                    * (sig12 - (libm::atan2(ssig2, csig2) - libm::atan2(self.ssig1, self.csig1))
                        + (libm::atan2(e_sign * somg2, comg2)
                            - libm::atan2(e_sign * self.somg1, self.comg1)))
            } else {
                libm::atan2(
                    somg2 * self.comg1 - comg2 * self.somg1,
                    comg2 * self.comg1 + somg2 * self.somg1,
                )
            };
            let lam12 = omg12
                + self.a3c
                    * (sig12 + (sin_cos_series(true, ssig2, csig2, &self.c3a) - self.b31));
            let lon12 = lam12 / DEGREE;
            result.lon2 = Some(Degrees(if unroll {
                self.lon1 + lon12
            } else {
                normalize(normalize(self.lon1) + normalize(lon12))
            }));
        }

        if out.contains(Capabilities::LATITUDE) {
            result.lat2 = Some(Degrees(ellipsoid::calculate_geodetic_latitude(
                sbet2,
                cbet2,
                e.one_minus_f(),
            )));
        }

        if out.contains(Capabilities::AZIMUTH) {
            result.azi2 = Some(Degrees(atan2d(salp2, calp2)));
        }

        if out.intersects(Capabilities::REDUCED_LENGTH | Capabilities::GEODESIC_SCALE) {
            let b22 = sin_cos_series(true, ssig2, csig2, &self.c2a);
            let ab2 = (1.0 + self.a2m1) * (b22 - self.b21);
            let j12 = (self.a1m1 - self.a2m1) * sig12 + (ab1 - ab2);
            if out.contains(Capabilities::REDUCED_LENGTH) {
                // Add parens around (csig1 * ssig2) and (ssig1 * csig2) to ensure
                // accurate cancellation in the case of coincident points.
                result.m12 = Some(Metres(
                    b * ((dn2 * (self.csig1 * ssig2) - self.dn1 * (self.ssig1 * csig2))
                        - self.csig1 * csig2 * j12),
                ));
            }
            if out.contains(Capabilities::GEODESIC_SCALE) {
                let t = self.k2 * (ssig2 - self.ssig1) * (ssig2 + self.ssig1) / (self.dn1 + dn2);
                result.big_m12 = Some(csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / self.dn1);
                result.big_m21 = Some(csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / dn2);
            }
        }

        if out.contains(Capabilities::AREA) {
            let b42 = sin_cos_series(false, ssig2, csig2, &self.c4a);
            let (salp12, calp12) = if self.calp0 == 0.0 || self.salp0 == 0.0 {
                // alp12 = alp2 - alp1, used in atan2 so no need to normalize
                (
                    salp2 * self.calp1 - calp2 * self.salp1,
                    calp2 * self.calp1 + salp2 * self.salp1,
                )
            } else {
                // tan(alp) = tan(alp0) * sec(sig)
                // tan(alp2-alp1) = (tan(alp2) -tan(alp1)) / (tan(alp2)*tan(alp1)+1)
                // = calp0 * salp0 * (csig1-csig2) / (salp0^2 + calp0^2 * csig1*csig2)
                // If csig12 > 0, write
                //   csig1 - csig2 = ssig12 * (csig1 * ssig12 / (1 + csig12) + ssig1)
                // else
                //   csig1 - csig2 = csig1 * (1 - csig12) + ssig12 * ssig1
                // No need to normalize
                (
                    self.calp0
                        * self.salp0
                        * (if csig12 <= 0.0 {
                            self.csig1 * (1.0 - csig12) + ssig12 * self.ssig1
                        } else {
                            ssig12 * (self.csig1 * ssig12 / (1.0 + csig12) + self.ssig1)
                        }),
                    self.salp0 * self.salp0 + self.calp0 * self.calp0 * self.csig1 * csig2,
                )
            };
            result.area = Some(e.c2() * libm::atan2(salp12, calp12) + self.a4 * (b42 - self.b41));
        }

        result
    }

    /// Calculate the position, at a distance from the start point.
    /// * `s12` - the distance from the start point.
    ///
    /// returns the `DirectSolution` with `lat2`, `lon2` and `azi2`.
    /// If the line does not have `Capabilities::DISTANCE_IN` only `a12` is
    /// set and it is NaN.
    #[must_use]
    pub fn position(&self, s12: Metres) -> DirectSolution {
        self.gen_position(
            Flags::empty(),
            s12.0,
            Capabilities::LATITUDE | Capabilities::LONGITUDE | Capabilities::AZIMUTH,
        )
    }

    /// Calculate the position, at an arc length from the start point.
    /// * `a12` - the arc length from the start point.
    ///
    /// returns the `DirectSolution` with `lat2`, `lon2`, `azi2` and `s12`,
    /// where the line can calculate them.
    #[must_use]
    pub fn arc_position(&self, a12: Degrees) -> DirectSolution {
        self.gen_position(
            Flags::ARC_MODE,
            a12.0,
            Capabilities::LATITUDE
                | Capabilities::LONGITUDE
                | Capabilities::AZIMUTH
                | Capabilities::DISTANCE,
        )
    }

    /// Set the position of point 3 by its distance from the start point.
    /// * `s13` - the distance from the start point.
    pub fn set_distance(&mut self, s13: Metres) {
        let a13 = self
            .gen_position(Flags::empty(), s13.0, Capabilities::empty())
            .a12;
        self.s13 = Some(s13);
        self.a13 = Some(a13);
    }

    /// Set the position of point 3 by its arc length from the start point.
    /// * `a13` - the arc length from the start point.
    pub fn set_arc(&mut self, a13: Degrees) {
        self.a13 = Some(a13);
        self.s13 = self
            .gen_position(Flags::ARC_MODE, a13.0, Capabilities::DISTANCE)
            .s12;
    }

    /// Set the position of point 3 by its distance or arc length from the
    /// start point.
    /// * `flags` - `Flags::ARC_MODE` if `s13_a13` is an arc length in degrees.
    /// * `s13_a13` - the distance or arc length from the start point.
    pub fn gen_set_distance(&mut self, flags: Flags, s13_a13: f64) {
        if flags.contains(Flags::ARC_MODE) {
            self.set_arc(Degrees(s13_a13));
        } else {
            self.set_distance(Metres(s13_a13));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_ellipsoid_traits() {
        let ellipsoid = Ellipsoid::wgs84();

        let ellipsoid_clone = ellipsoid.clone();
        assert!(ellipsoid_clone == ellipsoid);

        println!("Ellipsoid: {:?}", ellipsoid);

        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<Ellipsoid>();
        is_send_sync::<GeodesicLine<'_>>();
    }

    #[test]
    fn test_wgs84_ellipsoid() {
        let ellipsoid = Ellipsoid::wgs84();
        assert_eq!(ellipsoid::wgs84::A, ellipsoid.a());
        assert_eq!(ellipsoid::wgs84::F, ellipsoid.f());
        assert!(is_within_tolerance(
            6_356_752.314_245_179,
            ellipsoid.b().0,
            1e-8
        ));
        assert_eq!(1.0 - ellipsoid::wgs84::F, ellipsoid.one_minus_f());
        assert!(is_within_tolerance(
            0.006_694_379_990_141_316,
            ellipsoid.e_2(),
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            0.006_739_496_742_276_434,
            ellipsoid.ep_2(),
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            0.001_679_220_386_383_705,
            ellipsoid.n(),
            f64::EPSILON
        ));
        assert!(is_within_tolerance(40_589_732_499_314.76, ellipsoid.c2(), 0.1));
        assert!(is_within_tolerance(
            510_065_621_724_088.44,
            ellipsoid.area(),
            1.0
        ));
        assert_eq!(ellipsoid, *WGS84_ELLIPSOID);
    }

    #[test]
    fn test_ellipsoid_new() {
        let sphere = Ellipsoid::new(Metres(6_371_000.0), 0.0).unwrap();
        assert_eq!(Metres(6_371_000.0), sphere.b());
        assert_eq!(0.0, sphere.e_2());
        assert_eq!(6_371_000.0 * 6_371_000.0, sphere.c2());

        let prolate = Ellipsoid::new(Metres(6_400_000.0), -1.0 / 150.0).unwrap();
        assert!(prolate.e_2() < 0.0);
        assert!(prolate.b().0 > prolate.a().0);
    }

    #[test]
    fn test_ellipsoid_new_invalid() {
        assert_eq!(
            Err(Error::InvalidEllipsoid { a: 0.0, f: 0.0 }),
            Ellipsoid::new(Metres(0.0), 0.0)
        );
        assert_eq!(
            Err(Error::InvalidEllipsoid { a: -1.0, f: 0.0 }),
            Ellipsoid::new(Metres(-1.0), 0.0)
        );
        assert!(Ellipsoid::new(Metres(f64::INFINITY), 0.0).is_err());
        assert!(Ellipsoid::new(Metres(f64::NAN), 0.0).is_err());
        assert!(Ellipsoid::new(Metres(1.0), 1.0).is_err());
        assert!(Ellipsoid::new(Metres(1.0), f64::NAN).is_err());

        let error = Ellipsoid::new(Metres(-1.0), 0.5).unwrap_err();
        assert_eq!(
            "invalid ellipsoid: semimajor axis -1, flattening 0.5",
            error.to_string()
        );
    }

    #[test]
    fn test_direct_jfk() {
        // 10,000 km north east from JFK airport
        let result = WGS84_ELLIPSOID.direct(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Metres(10e6),
        );
        assert!(is_within_tolerance(
            32.621_100_463_725_8,
            result.lat2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            49.052_487_092_959_8,
            result.lon2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            140.405_985_876_800_7,
            result.azi2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            89.958_652_385_575_36,
            result.a12.0,
            1e-12
        ));
        assert!(result.s12.is_none());
        assert!(result.m12.is_none());
        assert!(result.area.is_none());
    }

    #[test]
    fn test_direct_geodtest_2874() {
        // GeodTest.dat line 2874
        let result = WGS84_ELLIPSOID.gen_direct(
            Degrees(5.421_025_561_218),
            Degrees(0.0),
            Degrees(84.846_843_174_846),
            Flags::empty(),
            12_161_089.999_180_5,
            Capabilities::ALL,
        );
        assert!(is_within_tolerance(
            3.027_329_237_478_900_117,
            result.lat2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            109.666_857_465_735_641_205,
            result.lon2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            96.826_992_198_613_537_236,
            result.azi2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            109.607_910_081_857_488_806,
            result.a12.0,
            1e-12
        ));
        assert_eq!(Metres(12_161_089.999_180_5), result.s12.unwrap());
        assert!(is_within_tolerance(
            5_988_906.631_925_805_617_8,
            result.m12.unwrap().0,
            1e-6
        ));
        assert!(is_within_tolerance(
            8_449_589_948_776.249_238,
            result.area.unwrap(),
            0.1
        ));
    }

    #[test]
    fn test_direct_arc_mode() {
        let result = WGS84_ELLIPSOID.gen_direct(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Flags::ARC_MODE,
            120.0,
            Capabilities::LATITUDE | Capabilities::LONGITUDE | Capabilities::DISTANCE,
        );
        assert_eq!(Degrees(120.0), result.a12);
        assert!(is_within_tolerance(
            8.093_004_231_201_18,
            result.lat2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            67.797_926_195_54,
            result.lon2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            13_334_476.709_387_427,
            result.s12.unwrap().0,
            1e-6
        ));
        assert!(result.azi2.is_none());
    }

    #[test]
    fn test_direct_invalid_latitude() {
        let result = WGS84_ELLIPSOID.direct(
            Degrees(91.0),
            Degrees(0.0),
            Degrees(45.0),
            Metres(1000.0),
        );
        assert!(result.lat2.unwrap().0.is_nan());
        assert!(result.lon2.unwrap().0.is_nan());
        assert!(result.azi2.unwrap().0.is_nan());
    }

    #[test]
    fn test_direct_from_pole() {
        // Heading "south" from the north pole along the meridian of azi1
        let result = WGS84_ELLIPSOID.direct(
            Degrees(90.0),
            Degrees(0.0),
            Degrees(180.0),
            Metres(1_000_000.0),
        );
        assert!(result.lat2.unwrap().0 < 90.0);
        assert!(is_within_tolerance(0.0, result.lon2.unwrap().0, 1e-9));
        assert!(is_within_tolerance(180.0, result.azi2.unwrap().0, 1e-9));
    }

    #[test]
    fn test_inverse_jfk_singapore() {
        // JFK airport to Singapore Changi airport
        let result = WGS84_ELLIPSOID.inverse(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(1.36),
            Degrees(103.99),
        );
        assert!(is_within_tolerance(
            15_347_512.940_512_94,
            result.s12.unwrap().0,
            1e-6
        ));
        assert!(is_within_tolerance(
            3.305_773_478_017_612_5,
            result.azi1.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            177.487_840_208_155_15,
            result.azi2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            138.051_190_730_162_2,
            result.a12.0,
            1e-12
        ));
        assert!(result.m12.is_none());
        assert!(result.big_m12.is_none());
        assert!(result.area.is_none());
    }

    #[test]
    fn test_inverse_istanbul_washington() {
        let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
        let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
        let result = WGS84_ELLIPSOID.inverse_lat_longs(&istanbul, &washington);

        assert!(is_within_tolerance(
            -50.693_753_041_139_97,
            result.azi1.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            8_339_863.136_005_359,
            result.s12.unwrap().0,
            1e-6
        ));
    }

    #[test]
    fn test_inverse_geodtest_2874() {
        // GeodTest.dat line 2874
        let result = WGS84_ELLIPSOID.gen_inverse(
            Degrees(5.421_025_561_218),
            Degrees(0.0),
            Degrees(3.027_329_237_478_900_117),
            Degrees(109.666_857_465_735_641_205),
            Capabilities::ALL,
        );
        assert!(is_within_tolerance(
            84.846_843_174_846,
            result.azi1.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            96.826_992_198_613_537_236,
            result.azi2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            12_161_089.999_180_5,
            result.s12.unwrap().0,
            1e-6
        ));
        assert!(is_within_tolerance(
            109.607_910_081_857_488_806,
            result.a12.0,
            1e-12
        ));
        assert!(is_within_tolerance(
            5_988_906.631_925_805_617_8,
            result.m12.unwrap().0,
            1e-6
        ));
        assert!(is_within_tolerance(
            8_449_589_948_776.249_238,
            result.area.unwrap(),
            0.1
        ));
        // the geodesic scales are nearly equal for this line
        assert!(is_within_tolerance(
            result.big_m12.unwrap(),
            result.big_m21.unwrap(),
            1e-4
        ));
    }

    #[test]
    fn test_inverse_coincident_points() {
        let result = WGS84_ELLIPSOID.gen_inverse(
            Degrees(10.0),
            Degrees(20.0),
            Degrees(10.0),
            Degrees(20.0),
            Capabilities::ALL,
        );
        assert_eq!(Degrees(0.0), result.a12);
        assert_eq!(Metres(0.0), result.s12.unwrap());
        assert_eq!(Metres(0.0), result.m12.unwrap());
        assert_eq!(result.azi1, result.azi2);
        assert!(is_within_tolerance(1.0, result.big_m12.unwrap(), f64::EPSILON));
        assert_eq!(0.0, result.area.unwrap());
    }

    #[test]
    fn test_inverse_poles() {
        // opposite poles
        let result = WGS84_ELLIPSOID.inverse(
            Degrees(90.0),
            Degrees(0.0),
            Degrees(-90.0),
            Degrees(0.0),
        );
        assert_eq!(Degrees(180.0), result.azi1.unwrap());
        assert_eq!(Degrees(180.0), result.azi2.unwrap());
        assert!(is_within_tolerance(
            20_003_931.458_625_447,
            result.s12.unwrap().0,
            1e-6
        ));

        // equatorial antipodes: the shortest path is via a pole
        let result =
            WGS84_ELLIPSOID.inverse(Degrees(0.0), Degrees(0.0), Degrees(0.0), Degrees(180.0));
        assert_eq!(Degrees(0.0), result.azi1.unwrap());
        assert_eq!(Degrees(180.0), result.azi2.unwrap());
        assert!(is_within_tolerance(
            20_003_931.458_625_447,
            result.s12.unwrap().0,
            1e-6
        ));
    }

    #[test]
    fn test_inverse_invalid_latitude() {
        let result = WGS84_ELLIPSOID.inverse(
            Degrees(0.0),
            Degrees(0.0),
            Degrees(-90.5),
            Degrees(10.0),
        );
        assert!(result.a12.0.is_nan());
        assert!(result.s12.unwrap().0.is_nan());
        assert!(result.azi1.unwrap().0.is_nan());
        assert!(result.azi2.unwrap().0.is_nan());
    }

    #[test]
    fn test_capability_isolation() {
        let result = WGS84_ELLIPSOID.gen_inverse(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(1.36),
            Degrees(103.99),
            Capabilities::DISTANCE,
        );
        let all = WGS84_ELLIPSOID.gen_inverse(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(1.36),
            Degrees(103.99),
            Capabilities::ALL,
        );
        assert_eq!(all.s12, result.s12);
        assert_eq!(all.a12, result.a12);
        assert!(result.azi1.is_none());
        assert!(result.azi2.is_none());
        assert!(result.m12.is_none());
        assert!(result.big_m12.is_none());
        assert!(result.big_m21.is_none());
        assert!(result.area.is_none());

        // area implies distance, latitude and azimuth
        let result = WGS84_ELLIPSOID.gen_direct(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Flags::empty(),
            10e6,
            Capabilities::AREA,
        );
        assert!(result.area.is_some());
        assert!(result.s12.is_some());
        assert!(result.lat2.is_some());
        assert!(result.azi2.is_some());
        assert!(result.lon2.is_none());
        assert!(result.m12.is_none());
    }

    #[test]
    fn test_geodesic_line() {
        let line = WGS84_ELLIPSOID.line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Capabilities::default(),
        );
        assert_eq!(Degrees(40.64), line.lat1());
        assert_eq!(Degrees(-73.78), line.lon1());
        assert_eq!(Degrees(45.0), line.azi1());
        assert!(line.capabilities().contains(
            Capabilities::LATITUDE
                | Capabilities::LONGITUDE
                | Capabilities::AZIMUTH
                | Capabilities::DISTANCE
                | Capabilities::DISTANCE_IN
        ));
        assert!(*line.ellipsoid() == *WGS84_ELLIPSOID);
        assert!(line.s13().is_none());
        assert!(line.a13().is_none());
        // Clairaut's relation: sin(azi0) = sin(azi1) * cos(beta1)
        let (_, cbet1) =
            ellipsoid::calculate_parametric_latitude(40.64, WGS84_ELLIPSOID.one_minus_f());
        let (sin_azi0, _) = angles::sincosd(line.azi0().0);
        let (sin_azi1, _) = angles::sincosd(45.0);
        assert!(is_within_tolerance(sin_azi1 * cbet1, sin_azi0, 1e-14));
        assert!(0.0 < line.azi0().0 && line.azi0().0 < 45.0);

        let result = line.position(Metres(10e6));
        assert!(is_within_tolerance(
            32.621_100_463_725_8,
            result.lat2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            49.052_487_092_959_8,
            result.lon2.unwrap().0,
            1e-12
        ));

        let result = line.arc_position(Degrees(120.0));
        assert!(is_within_tolerance(
            8.093_004_231_201_18,
            result.lat2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            147.132_566_203_416_96,
            result.azi2.unwrap().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            13_334_476.709_387_427,
            result.s12.unwrap().0,
            1e-6
        ));
    }

    #[test]
    fn test_line_default_capabilities() {
        let line = WGS84_ELLIPSOID.line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Capabilities::empty(),
        );
        let inverse_line = WGS84_ELLIPSOID.inverse_line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(1.36),
            Degrees(103.99),
            Capabilities::empty(),
        );
        let expected = Capabilities::LATITUDE
            | Capabilities::LONGITUDE
            | Capabilities::AZIMUTH
            | Capabilities::DISTANCE
            | Capabilities::DISTANCE_IN;
        assert_eq!(expected, line.capabilities());
        assert_eq!(expected, inverse_line.capabilities());

        let result = line.position(Metres(10e6));
        assert!(is_within_tolerance(
            49.052_487_092_959_8,
            result.lon2.unwrap().0,
            1e-12
        ));
    }

    #[test]
    fn test_geodesic_line_without_distance_in() {
        let line = WGS84_ELLIPSOID.line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Capabilities::LATITUDE,
        );
        let result = line.position(Metres(10e6));
        assert!(result.a12.0.is_nan());
        assert!(result.lat2.is_none());
        assert!(result.lon2.is_none());
        assert!(result.azi2.is_none());

        // arc mode is allowed, but only the line's capabilities are calculated
        let result = line.arc_position(Degrees(10.0));
        assert_eq!(Degrees(10.0), result.a12);
        assert!(result.lat2.is_some());
        assert!(result.azi2.is_some());
        assert!(result.lon2.is_none());
        assert!(result.s12.is_none());
    }

    #[test]
    fn test_geodesic_line_long_unroll() {
        let line = WGS84_ELLIPSOID.line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Capabilities::default(),
        );

        let caps = Capabilities::LONGITUDE;
        let unrolled = line.gen_position(Flags::LONG_UNROLL, 40e6, caps);
        let wrapped = line.gen_position(Flags::empty(), 40e6, caps);
        let unrolled = unrolled.lon2.unwrap().0;
        let wrapped = wrapped.lon2.unwrap().0;
        assert!(is_within_tolerance(285.668_267_879_907_5, unrolled, 1e-9));
        assert!(is_within_tolerance(-74.331_732_120_092_54, wrapped, 1e-9));
        assert!(is_within_tolerance(360.0, unrolled - wrapped, 1e-9));
    }

    #[test]
    fn test_direct_line_and_set_distance() {
        let mut line = WGS84_ELLIPSOID.direct_line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Metres(10e6),
            Capabilities::default(),
        );
        assert_eq!(Some(Metres(10e6)), line.s13());
        assert!(is_within_tolerance(
            89.958_652_385_575_36,
            line.a13().unwrap().0,
            1e-12
        ));

        line.set_arc(Degrees(120.0));
        assert_eq!(Some(Degrees(120.0)), line.a13());
        assert!(is_within_tolerance(
            13_334_476.709_387_427,
            line.s13().unwrap().0,
            1e-6
        ));

        line.gen_set_distance(Flags::empty(), 1000.0);
        assert_eq!(Some(Metres(1000.0)), line.s13());

        line.gen_set_distance(Flags::ARC_MODE, 1.0);
        assert_eq!(Some(Degrees(1.0)), line.a13());
    }

    #[test]
    fn test_gen_direct_line_without_distance() {
        // arc mode line without distance capabilities has no s13
        let line = WGS84_ELLIPSOID.gen_direct_line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(45.0),
            Flags::ARC_MODE,
            90.0,
            Capabilities::LATITUDE,
        );
        assert_eq!(Some(Degrees(90.0)), line.a13());
        assert!(line.s13().is_none());
    }

    #[test]
    fn test_inverse_line() {
        let line = WGS84_ELLIPSOID.inverse_line(
            Degrees(40.64),
            Degrees(-73.78),
            Degrees(1.36),
            Degrees(103.99),
            Capabilities::empty(),
        );
        assert!(is_within_tolerance(
            3.305_773_478_017_612_5,
            line.azi1().0,
            1e-12
        ));
        assert!(is_within_tolerance(
            15_347_512.940_512_94,
            line.s13().unwrap().0,
            1e-6
        ));
        assert!(is_within_tolerance(
            138.051_190_730_162_2,
            line.a13().unwrap().0,
            1e-12
        ));

        // point 3 is the finish point
        let result = line.position(line.s13().unwrap());
        assert!(is_within_tolerance(1.36, result.lat2.unwrap().0, 1e-12));
        assert!(is_within_tolerance(103.99, result.lon2.unwrap().0, 1e-12));
    }
}
