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

//! The ellipsoid module contains functions for calculating the parameters of
//! an ellipsoid of revolution given its Semimajor axis (the equivalent of its
//! radius) and flattening ratio.
//!
//! The flattening is positive for an oblate ellipsoid (like the Earth),
//! zero for a sphere and negative for a prolate ellipsoid.

#![allow(clippy::suboptimal_flops)]

pub mod coefficients;
pub mod wgs84;

use crate::angles::{atan2d, norm2, sincosd, TINY};
use crate::Metres;

/// The machine epsilon, used as the basis of convergence tolerances.
const TOL0: f64 = f64::EPSILON;

/// Calculate the Semiminor axis of an ellipsoid.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use ellipsoid_geodesic::Metres;
/// use ellipsoid_geodesic::ellipsoid::{calculate_minor_axis, wgs84};
///
/// // The WGS 84 Semiminor axis measured in metres.
/// let b : Metres = Metres(6_356_752.314_245_179);
/// assert_eq!(b, calculate_minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn calculate_minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// Calculate the square of the Eccentricity of an ellipsoid.
///
/// Negative for a prolate ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_sq_eccentricity, wgs84};
///
/// // The WGS 84 sq_eccentricity.
/// assert_eq!(0.0066943799901413165, calculate_sq_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// Calculate the square of the second Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
///
/// // The WGS 84 sq 2nd eccentricity.
/// assert_eq!(0.006739496742276434, calculate_sq_2nd_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    calculate_sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// Calculate the third flattening of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_3rd_flattening, wgs84};
///
/// // The WGS 84 3rd flattening.
/// assert_eq!(0.0016792203863837047, calculate_3rd_flattening(wgs84::F));
/// ```
#[must_use]
pub fn calculate_3rd_flattening(f: f64) -> f64 {
    f / (2.0 - f)
}

/// Calculate the square of the authalic radius of an ellipsoid, the radius
/// of the sphere with the same surface area.
///
/// CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf)
/// Eq. 60.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_authalic_radius_sq, wgs84};
/// use ellipsoid_geodesic::Metres;
///
/// // a sphere
/// assert_eq!(4.0, calculate_authalic_radius_sq(Metres(2.0), 0.0));
///
/// // the WGS 84 authalic radius is 6371007.181 metres
/// let c = libm::sqrt(calculate_authalic_radius_sq(wgs84::A, wgs84::F));
/// assert!((c - 6_371_007.181).abs() < 1e-3);
/// ```
#[must_use]
pub fn calculate_authalic_radius_sq(a: Metres, f: f64) -> f64 {
    let e2 = calculate_sq_eccentricity(f);
    let b = calculate_minor_axis(a, f).0;
    let ratio = if e2 == 0.0 {
        1.0
    } else {
        let e = libm::sqrt(libm::fabs(e2));
        if e2 > 0.0 {
            libm::atanh(e) / e
        } else {
            libm::atan(e) / e
        }
    };
    (a.0 * a.0 + b * b * ratio) / 2.0
}

/// Calculate the tolerance for the short line solution of the inverse
/// problem.
///
/// The square of the arc length below which the spherical solution (with a
/// mean latitude correction) is accurate to round-off.
/// * `f` - the flattening ratio.
#[must_use]
pub fn calculate_short_line_tolerance(f: f64) -> f64 {
    let tol2 = libm::sqrt(TOL0);
    0.1 * tol2 / libm::sqrt(libm::fmax(0.001, libm::fabs(f)) * libm::fmin(1.0, 1.0 - f / 2.0) / 2.0)
}

/// Function to calculate `epsilon`, the variable used in series expansions,
/// derived from Clairaut's constant.
///
/// Note: `epsilon` is positive and small.
/// CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf)
/// Eqs 9 & 16.
/// * `k2` - the square of `k`: `ep_2` times the square of the cosine of
///   the azimuth at the equator.
#[must_use]
pub fn calculate_epsilon(k2: f64) -> f64 {
    k2 / (2.0 * (1.0 + libm::sqrt(1.0 + k2)) + k2)
}

/// Function to convert a `geodetic` Latitude to a `parametric` Latitude on the
/// auxiliary sphere.
/// * `lat` - the `geodetic` Latitude in degrees.
/// * `one_minus_f` - one minus the flattening ratio.
///
/// returns the sine and cosine of the `parametric` Latitude. The cosine is
/// clamped to a tiny positive value, so a geodesic starting at a pole has a
/// well defined azimuth.
#[must_use]
pub fn calculate_parametric_latitude(lat: f64, one_minus_f: f64) -> (f64, f64) {
    let (sbet, cbet) = sincosd(lat);
    let (sbet, cbet) = norm2(one_minus_f * sbet, cbet);
    (sbet, libm::fmax(TINY, cbet))
}

/// Function to convert a `parametric` Latitude on the auxiliary sphere to a
/// `geodetic` Latitude.
/// * `sbet`, `cbet` - the sine and cosine of the `parametric` Latitude.
/// * `one_minus_f` - one minus the flattening ratio.
///
/// returns the `geodetic` Latitude in degrees.
#[must_use]
pub fn calculate_geodetic_latitude(sbet: f64, cbet: f64, one_minus_f: f64) -> f64 {
    atan2d(sbet, one_minus_f * cbet)
}
