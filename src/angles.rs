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

//! The angles module contains functions for exact trigonometry in degrees.
//!
//! Angles are reduced to a quadrant in degrees *before* converting to radians,
//! so that `sincosd(90.0)` is exactly `(1.0, 0.0)` and the results keep the
//! correct sign at quadrant boundaries.
//! Tiny angles are rounded so that geodesics which nearly touch the equator
//! or a meridian are treated consistently.

#![allow(clippy::float_cmp)]

use core::f64::consts::PI;

/// The number of radians in a degree.
pub const DEGREE: f64 = PI / 180.0;

/// The square root of the smallest positive normal `f64`.
pub const TINY: f64 = 1.491_668_146_240_041_3e-154;

/// Normalise an angle in degrees to the range (-180, 180].
/// * `x` - the angle in degrees.
/// # Examples
/// ```
/// use ellipsoid_geodesic::angles::normalize;
///
/// assert_eq!(180.0, normalize(-180.0));
/// assert_eq!(-90.0, normalize(270.0));
/// assert_eq!(10.0, normalize(730.0));
/// ```
#[must_use]
pub fn normalize(x: f64) -> f64 {
    let x = libm::fmod(x, 360.0);
    if x <= -180.0 {
        x + 360.0
    } else if x <= 180.0 {
        x
    } else {
        x - 360.0
    }
}

/// The error free sum of two numbers.
/// * `u`, `v` - the numbers to add.
///
/// returns the rounded sum and the rounding error, such that `s + t` equals
/// `u + v` exactly.
#[must_use]
pub fn sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    (s, -(up + vpp))
}

/// The exact difference of two angles, `y - x`, reduced to (-180, 180].
/// * `x`, `y` - the angles in degrees.
///
/// returns the difference and its rounding error.
#[must_use]
pub fn difference(x: f64, y: f64) -> (f64, f64) {
    let (d, t) = sum(normalize(-x), normalize(y));
    let d = normalize(d);
    sum(if d == 180.0 && t > 0.0 { -180.0 } else { d }, t)
}

/// Coarsen a tiny angle so that `90 - x` and `180 - x` are exact.
///
/// Values smaller in magnitude than 1/16 degree are rounded to a multiple of
/// 2^-57 degrees. Zero keeps its sign.
/// * `x` - the angle in degrees.
#[must_use]
pub fn round_tiny(x: f64) -> f64 {
    const Z: f64 = 1.0 / 16.0;
    if x == 0.0 {
        return x;
    }
    let y = libm::fabs(x);
    // the compiler must not "simplify" z - (z - y) to y
    let y = if y < Z { Z - (Z - y) } else { y };
    libm::copysign(y, x)
}

/// Replace a latitude outside of [-90, 90] degrees by NaN.
/// * `x` - the latitude in degrees.
#[must_use]
pub fn lat_fix(x: f64) -> f64 {
    if libm::fabs(x) > 90.0 {
        f64::NAN
    } else {
        x
    }
}

/// Calculate the sine and cosine of an angle in degrees.
///
/// The angle is reduced to within 45 degrees of a quadrant boundary before
/// it is converted to radians, so multiples of 90 degrees are exact.
/// * `x` - the angle in degrees.
///
/// returns the sine and cosine of the angle.
/// # Examples
/// ```
/// use ellipsoid_geodesic::angles::sincosd;
///
/// assert_eq!((1.0, 0.0), sincosd(90.0));
/// assert_eq!((0.0, -1.0), sincosd(180.0));
/// assert_eq!((-1.0, 0.0), sincosd(-90.0));
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sincosd(x: f64) -> (f64, f64) {
    let r = libm::fmod(x, 360.0);
    let q = libm::floor(r / 90.0 + 0.5);
    let r = (r - 90.0 * q) * DEGREE;
    let s = libm::sin(r);
    let c = libm::cos(r);
    let (sinx, cosx) = match (q as i32) & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    if x == 0.0 {
        (sinx, cosx)
    } else {
        (sinx + 0.0, cosx + 0.0)
    }
}

/// Calculate the angle in degrees of the point (x, y).
///
/// The arguments are swapped and reflected into the first octant before
/// calling `atan2`, so the result is exact at quadrant boundaries.
/// * `y`, `x` - the coordinates.
///
/// returns the angle in degrees, in the range [-180, 180].
/// # Examples
/// ```
/// use ellipsoid_geodesic::angles::atan2d;
///
/// assert_eq!(90.0, atan2d(1.0, 0.0));
/// assert_eq!(180.0, atan2d(0.0, -1.0));
/// assert_eq!(-90.0, atan2d(-1.0, 0.0));
/// assert_eq!(45.0, atan2d(1.0, 1.0));
/// ```
#[must_use]
pub fn atan2d(y: f64, x: f64) -> f64 {
    let (mut y, mut x) = (y, x);
    let mut q = 0;
    if libm::fabs(y) > libm::fabs(x) {
        core::mem::swap(&mut x, &mut y);
        q = 2;
    }
    if x < 0.0 {
        x = -x;
        q += 1;
    }
    let ang = libm::atan2(y, x) / DEGREE;
    match q {
        1 => (if y >= 0.0 { 180.0 } else { -180.0 }) - ang,
        2 => 90.0 - ang,
        3 => -90.0 + ang,
        _ => ang,
    }
}

/// Normalise a sine and cosine pair so that `s² + c² = 1`.
/// * `s`, `c` - the (unnormalised) sine and cosine.
#[must_use]
pub fn norm2(s: f64, c: f64) -> (f64, f64) {
    let r = libm::hypot(s, c);
    (s / r, c / r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_normalize() {
        assert_eq!(0.0, normalize(0.0));
        assert_eq!(180.0, normalize(180.0));
        assert_eq!(180.0, normalize(-180.0));
        assert_eq!(-179.0, normalize(181.0));
        assert_eq!(179.0, normalize(-181.0));
        assert_eq!(0.0, normalize(360.0));
        assert_eq!(-90.0, normalize(-450.0));
        assert!(normalize(f64::NAN).is_nan());
    }

    #[test]
    fn test_sum() {
        let (s, t) = sum(1.0, 1e-17);
        assert_eq!(1.0, s);
        assert_eq!(1e-17, t);

        let (s, t) = sum(3.0, 4.0);
        assert_eq!(7.0, s);
        assert_eq!(0.0, t);
    }

    #[test]
    fn test_difference() {
        assert_eq!((20.0, 0.0), difference(10.0, 30.0));
        assert_eq!((-20.0, 0.0), difference(30.0, 10.0));
        assert_eq!((20.0, 0.0), difference(170.0, -170.0));
        assert_eq!((180.0, 0.0), difference(0.0, 180.0));
        assert_eq!((180.0, 0.0), difference(0.0, -180.0));

        // the error term recovers the precision lost by normalising
        let (d, t) = difference(1e-17, 180.0);
        assert!(is_within_tolerance(180.0, d + t, f64::EPSILON));
    }

    #[test]
    fn test_round_tiny() {
        assert_eq!(0.0, round_tiny(0.0));
        assert!(round_tiny(-0.0).is_sign_negative());
        assert_eq!(0.0, round_tiny(1e-20));
        assert_eq!(-0.0, round_tiny(-1e-20));
        assert_eq!(45.0, round_tiny(45.0));
        assert_eq!(-30.0, round_tiny(-30.0));
    }

    #[test]
    fn test_lat_fix() {
        assert_eq!(90.0, lat_fix(90.0));
        assert_eq!(-90.0, lat_fix(-90.0));
        assert!(lat_fix(90.000_001).is_nan());
        assert!(lat_fix(-91.0).is_nan());
    }

    #[test]
    fn test_sincosd() {
        assert_eq!((0.0, 1.0), sincosd(0.0));
        assert_eq!((1.0, 0.0), sincosd(90.0));
        assert_eq!((0.0, -1.0), sincosd(180.0));
        assert_eq!((-1.0, 0.0), sincosd(270.0));
        assert_eq!((0.0, 1.0), sincosd(360.0));
        assert_eq!((0.0, -1.0), sincosd(-180.0));

        for i in -720..=720 {
            let x = f64::from(i) * 0.5;
            let (s, c) = sincosd(x);
            assert!(is_within_tolerance(libm::sin(x * DEGREE), s, 4.0 * f64::EPSILON));
            assert!(is_within_tolerance(libm::cos(x * DEGREE), c, 4.0 * f64::EPSILON));
        }
    }

    #[test]
    fn test_sincosd_signed_zero() {
        let (s, c) = sincosd(-0.0);
        assert!(s == 0.0 && s.is_sign_negative());
        assert_eq!(1.0, c);

        // only an exact zero argument keeps its sign
        let (s, _) = sincosd(-360.0);
        assert!(s == 0.0 && s.is_sign_positive());
    }

    #[test]
    fn test_atan2d() {
        assert_eq!(0.0, atan2d(0.0, 1.0));
        assert_eq!(90.0, atan2d(1.0, 0.0));
        assert_eq!(-90.0, atan2d(-1.0, 0.0));
        assert_eq!(180.0, atan2d(0.0, -1.0));
        assert_eq!(-135.0, atan2d(-1.0, -1.0));

        for i in -179..180 {
            let x = f64::from(i);
            let (s, c) = sincosd(x);
            assert!(is_within_tolerance(x, atan2d(s, c), 256.0 * f64::EPSILON));
        }
    }

    #[test]
    fn test_norm2() {
        let (s, c) = norm2(3.0, 4.0);
        assert!(is_within_tolerance(0.6, s, f64::EPSILON));
        assert!(is_within_tolerance(0.8, c, f64::EPSILON));

        // a pole's cosine is clamped to TINY, which must survive
        let (s, c) = norm2(1.0, TINY);
        assert_eq!(1.0, s);
        assert_eq!(TINY, c);
    }
}
