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

//! The geodesic module contains functions for solving the inverse geodesic
//! problem: finding the shortest path between a pair of points on an
//! ellipsoid.
//!
//! The geodesic is mapped to a great circle on an auxiliary sphere.
//! The azimuth at the start point is found by Newton's method on the
//! longitude difference, keeping a bracket of the root and falling back to
//! bisection of the bracket whenever a Newton step is unusable.
//!
//! CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use crate::angles::{atan2d, difference, lat_fix, norm2, round_tiny, sincosd, DEGREE, TINY};
use crate::ellipsoid::coefficients::{
    evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c2, sin_cos_series,
};
use crate::ellipsoid::{calculate_epsilon, calculate_parametric_latitude};
use crate::{Capabilities, Ellipsoid};
use core::f64::consts::PI;

/// The machine epsilon.
const TOL0: f64 = f64::EPSILON;
/// The tolerance for the start of the astroid solution.
const TOL1: f64 = 200.0 * TOL0;
/// The square root of `TOL0`.
const TOL2: f64 = 1.490_116_119_384_765_6e-8;
/// The tolerance for the bisection bracket.
const TOLB: f64 = TOL0 * TOL2;
/// The tolerance of `x` in the astroid solution.
const XTHRESH: f64 = 1000.0 * TOL2;

/// The maximum number of Newton iterations.
pub const MAX_NEWTON_ITERATIONS: u32 = 20;

/// The maximum number of iterations, Newton and bisection.
pub const MAX_ITERATIONS: u32 = MAX_NEWTON_ITERATIONS + f64::MANTISSA_DIGITS + 10;

/// A point on the auxiliary sphere: the sine and cosine of its parametric
/// latitude and its `dn` factor, `sqrt(1 + ep_2 * sin^2 beta)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AuxPoint {
    pub sbet: f64,
    pub cbet: f64,
    pub dn: f64,
}

impl AuxPoint {
    /// Construct an `AuxPoint` from a geodetic latitude in degrees.
    #[must_use]
    pub fn new(lat: f64, ellipsoid: &Ellipsoid) -> Self {
        let (sbet, cbet) = calculate_parametric_latitude(lat, ellipsoid.one_minus_f());
        Self::from_sin_cos(sbet, cbet, ellipsoid.ep_2())
    }

    /// Construct an `AuxPoint` from the sine and cosine of a parametric
    /// latitude.
    #[must_use]
    pub fn from_sin_cos(sbet: f64, cbet: f64, ep_2: f64) -> Self {
        Self {
            sbet,
            cbet,
            dn: libm::sqrt(1.0 + ep_2 * sbet * sbet),
        }
    }
}

/// A position on a great circle on the auxiliary sphere: the sine and cosine
/// of the arc length from the equator crossing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ArcPosition {
    pub ssig: f64,
    pub csig: f64,
}

/// The lengths of a geodesic, scaled by the Semiminor axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Lengths {
    /// The distance.
    pub s12b: f64,
    /// The reduced length.
    pub m12b: f64,
    /// The coefficient of the secular term of the reduced length.
    pub m0: f64,
    /// The geodesic scale of point 2 relative to point 1.
    pub big_m12: f64,
    /// The geodesic scale of point 1 relative to point 2.
    pub big_m21: f64,
}

/// Calculate the lengths of a geodesic from its arc on the auxiliary sphere.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// * `sig12` - the arc length on the auxiliary sphere in radians.
/// * `p1`, `p2` - the start and finish points on the auxiliary sphere.
/// * `s1`, `s2` - their positions along the great circle.
/// * `caps` - the lengths to calculate: `DISTANCE`, `REDUCED_LENGTH` and
///   `GEODESIC_SCALE`. `m0` is calculated with the reduced length or scales.
#[allow(clippy::similar_names)]
#[allow(clippy::too_many_arguments)]
#[must_use]
pub(crate) fn calculate_lengths(
    ellipsoid: &Ellipsoid,
    eps: f64,
    sig12: f64,
    p1: &AuxPoint,
    s1: &ArcPosition,
    p2: &AuxPoint,
    s2: &ArcPosition,
    caps: Capabilities,
) -> Lengths {
    let want_distance = caps.contains(Capabilities::DISTANCE);
    let want_reduced_length = caps.contains(Capabilities::REDUCED_LENGTH);
    let want_scale = caps.contains(Capabilities::GEODESIC_SCALE);
    let redlp = want_reduced_length || want_scale;

    let mut result = Lengths::default();
    if !(want_distance || redlp) {
        return result;
    }

    let a1 = evaluate_a1(eps);
    let ca = evaluate_coeffs_c1(eps);
    let (a2, mut cb) = if redlp {
        (evaluate_a2(eps), evaluate_coeffs_c2(eps))
    } else {
        (0.0, [0.0; 7])
    };
    result.m0 = a1 - a2;
    let a1p1 = 1.0 + a1;
    let a2p1 = 1.0 + a2;

    let mut j12 = 0.0;
    if want_distance {
        let b1 = sin_cos_series(true, s2.ssig, s2.csig, &ca)
            - sin_cos_series(true, s1.ssig, s1.csig, &ca);
        result.s12b = a1p1 * (sig12 + b1);
        if redlp {
            let b2 = sin_cos_series(true, s2.ssig, s2.csig, &cb)
                - sin_cos_series(true, s1.ssig, s1.csig, &cb);
            j12 = result.m0 * sig12 + (a1p1 * b1 - a2p1 * b2);
        }
    } else {
        // Assume here that ca.len() >= cb.len()
        for (b, a) in cb.iter_mut().zip(ca.iter()).skip(1) {
            *b = a1p1 * a - a2p1 * *b;
        }
        j12 = result.m0 * sig12
            + (sin_cos_series(true, s2.ssig, s2.csig, &cb)
                - sin_cos_series(true, s1.ssig, s1.csig, &cb));
    }

    if want_reduced_length {
        // Missing a factor of b.
        // Add parens around (csig1 * ssig2) and (ssig1 * csig2) to ensure
        // accurate cancellation in the case of coincident points.
        result.m12b = p2.dn * (s1.csig * s2.ssig)
            - p1.dn * (s1.ssig * s2.csig)
            - s1.csig * s2.csig * j12;
    }
    if want_scale {
        let csig12 = s1.csig * s2.csig + s1.ssig * s2.ssig;
        let t = ellipsoid.ep_2() * (p1.cbet - p2.cbet) * (p1.cbet + p2.cbet) / (p1.dn + p2.dn);
        result.big_m12 = csig12 + (t * s2.ssig - s2.csig * j12) * s1.ssig / p1.dn;
        result.big_m21 = csig12 - (t * s1.ssig - s1.csig * j12) * s2.ssig / p2.dn;
    }
    result
}

/// Estimate omega12 by solving the astroid problem.
/// Solve k^4+2*k^3-(x^2+y^2-1)*k^2-2*y^2*k-y^2 = 0 for positive root k.
/// * `x`, `y` - astroid parameters, see Karney section 7.
///
/// returns the solution to the astroid problem.
#[must_use]
fn calculate_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // y = 0 with |x| <= 1
    // for y small, positive root is k = abs(y)/sqrt(1-x^2)
    if (q == 0.0) && (r <= 0.0) {
        0.0
    } else {
        let s = p * q / 4.0;
        let r2 = r * r;
        let r3 = r * r2;
        let mut u = r;

        // The discriminant of the quadratic equation for T3.
        // This is zero on the evolute curve p^(1/3)+q^(1/3) = 1
        let discriminant = s * (s + 2.0 * r3);
        if 0.0 <= discriminant {
            let mut t3 = s + r3;
            // Pick the sign on the sqrt to maximize abs(T3), to minimise loss
            // of precision due to cancellation.
            t3 += if t3 < 0.0 {
                -libm::sqrt(discriminant)
            } else {
                libm::sqrt(discriminant)
            };
            let t = libm::cbrt(t3);
            u += if t == 0.0 { 0.0 } else { t + r2 / t };
        } else {
            // T is complex, but the way u is defined the result is real.
            let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
            // There are three possible cube roots.  We choose the root which
            // avoids cancellation.  Note: discriminant < 0 implies that r < 0.
            u += 2.0 * r * libm::cos(angle / 3.0);
        }

        let v = libm::sqrt(u * u + q); // guaranteed positive
        let uv = if u < 0.0 { q / (v - u) } else { u + v }; // u+v, guaranteed positive
        let w = (uv - q) / (2.0 * v);

        // Rearrange expression for k to avoid loss of accuracy due to subtraction.
        // Division by 0 not possible because uv > 0, w >= 0.
        uv / (libm::sqrt(uv + w * w) + w)
    }
}

/// The starting point for Newton's method.
#[derive(Clone, Copy, Debug, PartialEq)]
struct InverseStart {
    /// The arc length if the short line solution applies, otherwise negative.
    sig12: f64,
    salp1: f64,
    calp1: f64,
    /// Only valid if `sig12 >= 0`.
    salp2: f64,
    /// Only valid if `sig12 >= 0`.
    calp2: f64,
    /// The `dn` factor at the mean latitude of a short line.
    dnm: f64,
}

/// Estimate the azimuth at the start of a geodesic.
///
/// The estimate is the great circle azimuth on the auxiliary sphere, or for
/// nearly antipodal points the solution of the astroid problem.
/// Short lines are solved directly, returning a non-negative `sig12`.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `p1`, `p2` - the start and finish points, in canonical form.
/// * `lam12` - the longitude difference in radians.
/// * `slam12`, `clam12` - the sine and cosine of `lam12`.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
#[allow(clippy::similar_names)]
#[must_use]
fn estimate_initial_azimuth(
    ellipsoid: &Ellipsoid,
    p1: &AuxPoint,
    p2: &AuxPoint,
    lam12: f64,
    slam12: f64,
    clam12: f64,
) -> InverseStart {
    let f = ellipsoid.f();
    let (sbet1, cbet1) = (p1.sbet, p1.cbet);
    let (sbet2, cbet2) = (p2.sbet, p2.cbet);

    let mut result = InverseStart {
        sig12: -1.0,
        salp1: 0.0,
        calp1: 0.0,
        salp2: 0.0,
        calp2: 0.0,
        dnm: 0.0,
    };

    // bet12 = bet2 - bet1 in [0, pi); bet12a = bet2 + bet1 in (-pi, 0]
    let sbet12 = sbet2 * cbet1 - cbet2 * sbet1;
    let cbet12 = cbet2 * cbet1 + sbet2 * sbet1;
    let sbet12a = sbet2 * cbet1 + cbet2 * sbet1;

    let shortline = cbet12 >= 0.0 && sbet12 < 0.5 && cbet2 * lam12 < 0.5;
    let (mut somg12, mut comg12) = if shortline {
        let mut sbetm2 = (sbet1 + sbet2) * (sbet1 + sbet2);
        // sin((bet1+bet2)/2)^2 = (sbet1 + sbet2)^2 / ((sbet1 + sbet2)^2 + (cbet1 + cbet2)^2)
        sbetm2 /= sbetm2 + (cbet1 + cbet2) * (cbet1 + cbet2);
        result.dnm = libm::sqrt(1.0 + ellipsoid.ep_2() * sbetm2);
        let omg12 = lam12 / (ellipsoid.one_minus_f() * result.dnm);
        (libm::sin(omg12), libm::cos(omg12))
    } else {
        (slam12, clam12)
    };

    result.salp1 = cbet2 * somg12;
    result.calp1 = if comg12 >= 0.0 {
        sbet12 + cbet2 * sbet1 * somg12 * somg12 / (1.0 + comg12)
    } else {
        sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1.0 - comg12)
    };

    let ssig12 = libm::hypot(result.salp1, result.calp1);
    let csig12 = sbet1 * sbet2 + cbet1 * cbet2 * comg12;

    if shortline && ssig12 < ellipsoid.short_line_tolerance() {
        // really short lines
        let salp2 = cbet1 * somg12;
        let calp2 = sbet12
            - cbet1
                * sbet2
                * (if comg12 >= 0.0 {
                    somg12 * somg12 / (1.0 + comg12)
                } else {
                    1.0 - comg12
                });
        (result.salp2, result.calp2) = norm2(salp2, calp2);
        // Set return value
        result.sig12 = libm::atan2(ssig12, csig12);
    } else if libm::fabs(ellipsoid.n()) > 0.1
        || csig12 >= 0.0
        || ssig12 >= 6.0 * libm::fabs(ellipsoid.n()) * PI * cbet1 * cbet1
    {
        // Nothing to do, zeroth order spherical approximation is OK
    } else {
        // Scale lam12 and bet2 to x, y coordinate system where antipodal point
        // is at origin and singular point is at y = 0, x = -1.
        let lam12x = libm::atan2(-slam12, -clam12); // lam12 - pi
        let (x, y, lamscale) = if f >= 0.0 {
            // In fact f == 0 does not get here
            // x = dlong, y = dlat
            let k2 = sbet1 * sbet1 * ellipsoid.ep_2();
            let eps = calculate_epsilon(k2);
            let lamscale = f * cbet1 * ellipsoid.calculate_a3f(eps) * PI;
            let betscale = lamscale * cbet1;
            (lam12x / lamscale, sbet12a / betscale, lamscale)
        } else {
            // f < 0
            // x = dlat, y = dlong
            let cbet12a = cbet2 * cbet1 - sbet2 * sbet1;
            let bet12a = libm::atan2(sbet12a, cbet12a);
            // In the case of lon12 = 180, this repeats a calculation made in
            // the inverse solver.
            let lengths = calculate_lengths(
                ellipsoid,
                ellipsoid.n(),
                PI + bet12a,
                p1,
                &ArcPosition {
                    ssig: sbet1,
                    csig: -cbet1,
                },
                p2,
                &ArcPosition {
                    ssig: sbet2,
                    csig: cbet2,
                },
                Capabilities::REDUCED_LENGTH,
            );
            let x = -1.0 + lengths.m12b / (cbet1 * cbet2 * lengths.m0 * PI);
            let betscale = if x < -0.01 {
                sbet12a / x
            } else {
                -f * cbet1 * cbet1 * PI
            };
            let lamscale = betscale / cbet1;
            (x, lam12x / lamscale, lamscale)
        };

        if y > -TOL1 && x > -1.0 - XTHRESH {
            if f >= 0.0 {
                result.salp1 = libm::fmin(1.0, -x);
                result.calp1 = -libm::sqrt(1.0 - result.salp1 * result.salp1);
            } else {
                result.calp1 = libm::fmax(if x > -TOL1 { 0.0 } else { -1.0 }, x);
                result.salp1 = libm::sqrt(1.0 - result.calp1 * result.calp1);
            }
        } else {
            let k = calculate_astroid(x, y);
            let omg12a = lamscale
                * (if f >= 0.0 {
                    -x * k / (1.0 + k)
                } else {
                    -y * (1.0 + k) / k
                });
            somg12 = libm::sin(omg12a);
            comg12 = -libm::cos(omg12a);
            // Update spherical estimate of alp1 using omg12 instead of lam12
            result.salp1 = cbet2 * somg12;
            result.calp1 = sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1.0 - comg12);
        }
    }

    // Sanity check on starting guess.  Backwards check allows NaN through.
    if !(result.salp1 <= 0.0) {
        (result.salp1, result.calp1) = norm2(result.salp1, result.calp1);
    } else {
        result.salp1 = 1.0;
        result.calp1 = 0.0;
    }
    result
}

/// The longitude difference for a trial start azimuth and its derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Lambda12 {
    /// The longitude difference minus the target difference.
    lam12: f64,
    salp2: f64,
    calp2: f64,
    sig12: f64,
    s1: ArcPosition,
    s2: ArcPosition,
    eps: f64,
    /// The longitude difference between the ellipsoid and auxiliary sphere.
    domg12: f64,
    /// The derivative of `lam12` with respect to the start azimuth.
    dlam12: f64,
}

/// Calculate the longitude difference of the geodesic starting at `p1` with
/// azimuth `alp1` when it reaches the latitude of `p2`, relative to the
/// target longitude difference.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `p1`, `p2` - the start and finish points, in canonical form.
/// * `salp1`, `calp1` - the sine and cosine of the trial start azimuth.
/// * `slam120`, `clam120` - the sine and cosine of the target longitude difference.
/// * `diffp` - whether to calculate the derivative.
#[allow(clippy::similar_names)]
#[allow(clippy::too_many_arguments)]
#[must_use]
fn calculate_lambda12(
    ellipsoid: &Ellipsoid,
    p1: &AuxPoint,
    p2: &AuxPoint,
    salp1: f64,
    calp1: f64,
    slam120: f64,
    clam120: f64,
    diffp: bool,
) -> Lambda12 {
    let (sbet1, cbet1) = (p1.sbet, p1.cbet);
    let (sbet2, cbet2) = (p2.sbet, p2.cbet);

    // Break degeneracy of equatorial line.  This case has already been handled.
    let calp1 = if sbet1 == 0.0 && calp1 == 0.0 {
        -TINY
    } else {
        calp1
    };

    // sin(alp1) * cos(bet1) = sin(alp0)
    let salp0 = salp1 * cbet1;
    let calp0 = libm::hypot(calp1, salp1 * sbet1); // calp0 > 0

    // tan(bet1) = tan(sig1) * cos(alp1)
    // tan(omg1) = sin(alp0) * tan(sig1) = tan(omg1)=tan(alp1)*sin(bet1)
    let somg1 = salp0 * sbet1;
    let comg1 = calp1 * cbet1;
    let (ssig1, csig1) = norm2(sbet1, comg1);

    // Enforce symmetries in the case abs(bet2) = -bet1.  Need to be careful
    // about this case, since this can yield singularities in the Newton
    // iteration.
    // sin(alp2) * cos(bet2) = sin(alp0)
    let salp2 = if cbet2 == cbet1 { salp1 } else { salp0 / cbet2 };
    // calp2 = sqrt(1 - sq(salp2))
    //       = sqrt(sq(calp0) - sq(sbet2)) / cbet2
    // and subst for calp0 and rearrange to give (choose positive sqrt
    // to give alp2 in [0, pi/2]).
    let calp2 = if cbet2 != cbet1 || libm::fabs(sbet2) != -sbet1 {
        libm::sqrt(
            (calp1 * cbet1) * (calp1 * cbet1)
                + if cbet1 < -sbet1 {
                    (cbet2 - cbet1) * (cbet1 + cbet2)
                } else {
                    (sbet1 - sbet2) * (sbet1 + sbet2)
                },
        ) / cbet2
    } else {
        libm::fabs(calp1)
    };

    // tan(bet2) = tan(sig2) * cos(alp2)
    // tan(omg2) = sin(alp0) * tan(sig2).
    let somg2 = salp0 * sbet2;
    let comg2 = calp2 * cbet2;
    let (ssig2, csig2) = norm2(sbet2, comg2);

    // sig12 = sig2 - sig1, limit to [0, pi]
    let sig12 = libm::atan2(
        libm::fmax(0.0, csig1 * ssig2 - ssig1 * csig2),
        csig1 * csig2 + ssig1 * ssig2,
    );

    // omg12 = omg2 - omg1, limit to [0, pi]
    let somg12 = libm::fmax(0.0, comg1 * somg2 - somg1 * comg2);
    let comg12 = comg1 * comg2 + somg1 * somg2;
    // eta = omg12 - lam120
    let eta = libm::atan2(
        somg12 * clam120 - comg12 * slam120,
        comg12 * clam120 + somg12 * slam120,
    );

    let k2 = calp0 * calp0 * ellipsoid.ep_2();
    let eps = calculate_epsilon(k2);
    let c3a = ellipsoid.calculate_c3y(eps);
    let b312 = sin_cos_series(true, ssig2, csig2, &c3a) - sin_cos_series(true, ssig1, csig1, &c3a);
    let domg12 = -ellipsoid.f() * ellipsoid.calculate_a3f(eps) * salp0 * (sig12 + b312);
    let lam12 = eta + domg12;

    let s1 = ArcPosition {
        ssig: ssig1,
        csig: csig1,
    };
    let s2 = ArcPosition {
        ssig: ssig2,
        csig: csig2,
    };

    let dlam12 = if diffp {
        if calp2 == 0.0 {
            -2.0 * ellipsoid.one_minus_f() * p1.dn / sbet1
        } else {
            let lengths = calculate_lengths(
                ellipsoid,
                eps,
                sig12,
                p1,
                &s1,
                p2,
                &s2,
                Capabilities::REDUCED_LENGTH,
            );
            lengths.m12b * ellipsoid.one_minus_f() / (calp2 * cbet2)
        }
    } else {
        0.0
    };

    Lambda12 {
        lam12,
        salp2,
        calp2,
        sig12,
        s1,
        s2,
        eps,
        domg12,
        dlam12,
    }
}

/// The solution of the inverse problem, in the raw form used to construct a
/// `GeodesicLine`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct InverseResult {
    /// The arc length on the auxiliary sphere in degrees.
    pub a12: f64,
    /// The distance in metres.
    pub s12: f64,
    pub salp1: f64,
    pub calp1: f64,
    pub salp2: f64,
    pub calp2: f64,
    /// The reduced length in metres.
    pub m12: f64,
    pub big_m12: f64,
    pub big_m21: f64,
    /// The area between the geodesic and the equator in square metres.
    pub area: f64,
    /// The number of iterations used by the root finder.
    #[cfg_attr(not(test), allow(dead_code))]
    pub iterations: u32,
}

/// Solve the inverse geodesic problem.
///
/// CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf)
/// Section 4.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `lat1`, `lon1` - the start point in degrees.
/// * `lat2`, `lon2` - the finish point in degrees.
/// * `caps` - the quantities to calculate. The arc length and azimuths are
///   always calculated.
///
/// returns the raw solution: quantities not in `caps` are zero.
#[allow(clippy::similar_names)]
#[allow(clippy::too_many_lines)]
#[must_use]
pub(crate) fn calculate_inverse(
    ellipsoid: &Ellipsoid,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    caps: Capabilities,
) -> InverseResult {
    let caps = caps.with_prerequisites();
    let f = ellipsoid.f();
    let b = ellipsoid.b().0;

    if lat_fix(lat1).is_nan() || lat_fix(lat2).is_nan() {
        return InverseResult {
            a12: f64::NAN,
            s12: f64::NAN,
            salp1: f64::NAN,
            calp1: f64::NAN,
            salp2: f64::NAN,
            calp2: f64::NAN,
            m12: f64::NAN,
            big_m12: f64::NAN,
            big_m21: f64::NAN,
            area: f64::NAN,
            iterations: 0,
        };
    }

    // Compute longitude difference (AngDiff does this carefully).  Result is
    // in [-180, 180] but -180 is only for west-going geodesics.  180 is for
    // east-going and meridional geodesics.
    let (lon12, lon12s) = difference(lon1, lon2);
    // Make longitude difference positive.
    let mut lonsign: f64 = if lon12 >= 0.0 { 1.0 } else { -1.0 };
    // If very close to being on the same half-meridian, then make it so.
    let lon12 = lonsign * round_tiny(lon12);
    let lon12s = round_tiny((180.0 - lon12) - lonsign * lon12s);
    let lam12 = lon12 * DEGREE;
    let (slam12, clam12) = if lon12 > 90.0 {
        let (s, c) = sincosd(lon12s);
        (s, -c)
    } else {
        sincosd(lon12)
    };

    // If really close to the equator, treat as on equator.
    let mut lat1 = round_tiny(lat_fix(lat1));
    let mut lat2 = round_tiny(lat_fix(lat2));
    // Swap points so that point with higher (abs) latitude is point 1.
    // If one latitude is a nan, then it becomes lat1.
    let swapp: f64 = if libm::fabs(lat1) < libm::fabs(lat2) {
        -1.0
    } else {
        1.0
    };
    if swapp < 0.0 {
        lonsign = -lonsign;
        core::mem::swap(&mut lat1, &mut lat2);
    }
    // Make lat1 <= 0
    let latsign: f64 = if lat1 < 0.0 { 1.0 } else { -1.0 };
    lat1 *= latsign;
    lat2 *= latsign;
    // Now we have
    //
    //     0 <= lon12 <= 180
    //     -90 <= lat1 <= 0
    //     lat1 <= lat2 <= -lat1
    //
    // longsign, swapp, latsign register the transformation to bring the
    // coordinates to this canonical form.  In all cases, 1 means no change was
    // made.  We make these transformations so that there are few cases to
    // check, e.g., on verifying quadrants in atan2.  In addition, this
    // enforces some symmetries in the results returned.

    let (sbet1, cbet1) = calculate_parametric_latitude(lat1, ellipsoid.one_minus_f());
    let (mut sbet2, mut cbet2) = calculate_parametric_latitude(lat2, ellipsoid.one_minus_f());

    // If cbet1 < -sbet1, then cbet2 - cbet1 is a sensitive measure of the
    // |bet1| - |bet2|.  Alternatively (cbet1 >= -sbet1), abs(sbet2) + sbet1 is
    // a better measure.  This logic is used in assigning calp2 in Lambda12.
    // Sometimes these quantities vanish and in that case we force bet2 = +/-
    // bet1 exactly.  An example where is is necessary is the inverse problem
    // 48.522876735459 0 -48.52287673545898293 179.599720456223079643
    // which failed with Visual Studio 10 (Release and Debug)
    if cbet1 < -sbet1 {
        if cbet2 == cbet1 {
            sbet2 = if sbet2 < 0.0 { sbet1 } else { -sbet1 };
        }
    } else if libm::fabs(sbet2) == -sbet1 {
        cbet2 = cbet1;
    }

    let p1 = AuxPoint::from_sin_cos(sbet1, cbet1, ellipsoid.ep_2());
    let p2 = AuxPoint::from_sin_cos(sbet2, cbet2, ellipsoid.ep_2());

    let mut a12 = 0.0;
    let mut s12x = 0.0;
    let mut m12x = 0.0;
    let mut big_m12 = 0.0;
    let mut big_m21 = 0.0;
    let mut salp1 = 0.0;
    let mut calp1 = 0.0;
    let mut salp2 = 0.0;
    let mut calp2 = 0.0;
    let mut omg12 = 0.0;
    // somg12 > 1 marks that it needs to be calculated
    let mut somg12 = 2.0;
    let mut comg12 = 0.0;
    let mut iterations = 0;

    let mut meridian = lat1 == -90.0 || slam12 == 0.0;

    if meridian {
        // Endpoints are on a single full meridian, so the geodesic might lie on
        // a meridian.

        // Head to the target longitude
        calp1 = clam12;
        salp1 = slam12;
        // At the target we're heading north
        calp2 = 1.0;
        salp2 = 0.0;

        // tan(bet) = tan(sig) * cos(alp)
        let s1 = ArcPosition {
            ssig: sbet1,
            csig: calp1 * cbet1,
        };
        let s2 = ArcPosition {
            ssig: sbet2,
            csig: calp2 * cbet2,
        };

        // sig12 = sig2 - sig1
        let mut sig12 = libm::atan2(
            libm::fmax(0.0, s1.csig * s2.ssig - s1.ssig * s2.csig),
            s1.csig * s2.csig + s1.ssig * s2.ssig,
        );
        let lengths = calculate_lengths(
            ellipsoid,
            ellipsoid.n(),
            sig12,
            &p1,
            &s1,
            &p2,
            &s2,
            Capabilities::DISTANCE
                | Capabilities::REDUCED_LENGTH
                | (caps & Capabilities::GEODESIC_SCALE),
        );
        s12x = lengths.s12b;
        m12x = lengths.m12b;
        big_m12 = lengths.big_m12;
        big_m21 = lengths.big_m21;

        // Add the check for sig12 since zero length geodesics might yield m12 <
        // 0.  Test case was
        //
        //    echo 20.001 0 20.001 0 | GeodSolve -i
        //
        // In fact, we will have sig12 > pi/2 for meridional geodesic which is
        // not a shortest path.
        if sig12 < 1.0 || m12x >= 0.0 {
            // Need at least 2, to handle 90 0 90 180
            if sig12 < 3.0 * TINY
                // Prevent negative s12 or m12 for short lines
                || (sig12 < TOL0 && (s12x < 0.0 || m12x < 0.0))
            {
                sig12 = 0.0;
                m12x = 0.0;
                s12x = 0.0;
            }
            m12x *= b;
            s12x *= b;
            a12 = sig12 / DEGREE;
        } else {
            // m12 < 0, i.e., prolate and too close to anti-podal
            meridian = false;
        }
    }

    if !meridian
        && sbet1 == 0.0
        // and sbet2 == 0
        && (f <= 0.0 || lon12s >= f * 180.0)
    {
        // Geodesic runs along equator
        calp1 = 0.0;
        calp2 = 0.0;
        salp1 = 1.0;
        salp2 = 1.0;
        s12x = ellipsoid.a().0 * lam12;
        let sig12 = lam12 / ellipsoid.one_minus_f();
        omg12 = sig12;
        m12x = b * libm::sin(sig12);
        big_m12 = libm::cos(sig12);
        big_m21 = big_m12;
        a12 = lon12 / ellipsoid.one_minus_f();
    } else if !meridian {
        // Now point1 and point2 belong within a hemisphere bounded by a
        // meridian and geodesic is neither meridional or equatorial.

        // Figure a starting point for Newton's method
        let start = estimate_initial_azimuth(ellipsoid, &p1, &p2, lam12, slam12, clam12);
        salp1 = start.salp1;
        calp1 = start.calp1;

        if start.sig12 >= 0.0 {
            // Short lines (InverseStart sets salp2, calp2, dnm)
            let sig12 = start.sig12;
            salp2 = start.salp2;
            calp2 = start.calp2;
            s12x = sig12 * b * start.dnm;
            m12x = start.dnm * start.dnm * b * libm::sin(sig12 / start.dnm);
            big_m12 = libm::cos(sig12 / start.dnm);
            big_m21 = big_m12;
            a12 = sig12 / DEGREE;
            omg12 = lam12 / (ellipsoid.one_minus_f() * start.dnm);
        } else {
            // Newton's method.  This is a straightforward solution of f(alp1) =
            // lambda12(alp1) - lam12 = 0 with one wrinkle.  f(alp) has exactly one
            // root in the interval (0, pi) and its derivative is positive at the
            // root.  Thus f(alp) is positive for alp > alp1 and negative for alp <
            // alp1.  During the course of the iteration, a range (alp1a, alp1b) is
            // maintained which brackets the root and with each evaluation of
            // f(alp) the range is shrunk, if possible.  Newton's method is
            // restarted whenever the derivative of f is negative (because the new
            // value of alp1 is then further from the solution) or if the new
            // estimate of alp1 lies outside (0,pi); in this case, the new starting
            // guess is taken to be (alp1a + alp1b) / 2.
            let mut salp1a = TINY;
            let mut calp1a = 1.0;
            let mut salp1b = TINY;
            let mut calp1b = -1.0;
            let mut tripn = false;
            let mut tripb = false;
            let mut bisected = false;
            let mut lambda = calculate_lambda12(
                ellipsoid,
                &p1,
                &p2,
                salp1,
                calp1,
                slam12,
                clam12,
                true,
            );
            while iterations < MAX_ITERATIONS {
                // the derivative is only needed while Newton's method is in use
                if iterations > 0 {
                    lambda = calculate_lambda12(
                        ellipsoid,
                        &p1,
                        &p2,
                        salp1,
                        calp1,
                        slam12,
                        clam12,
                        iterations < MAX_NEWTON_ITERATIONS,
                    );
                }
                let v = lambda.lam12;
                // Reversed test to allow escape with NaNs
                if tripb || !(libm::fabs(v) >= (if tripn { 8.0 } else { 1.0 }) * TOL0) {
                    break;
                }
                // Update bracketing values
                if v > 0.0
                    && (iterations > MAX_NEWTON_ITERATIONS || calp1 / salp1 > calp1b / salp1b)
                {
                    salp1b = salp1;
                    calp1b = calp1;
                } else if v < 0.0
                    && (iterations > MAX_NEWTON_ITERATIONS || calp1 / salp1 < calp1a / salp1a)
                {
                    salp1a = salp1;
                    calp1a = calp1;
                }
                iterations += 1;

                if iterations < MAX_NEWTON_ITERATIONS + 1 && lambda.dlam12 > 0.0 {
                    let dalp1 = -v / lambda.dlam12;
                    let sdalp1 = libm::sin(dalp1);
                    let cdalp1 = libm::cos(dalp1);
                    let nsalp1 = salp1 * cdalp1 + calp1 * sdalp1;
                    if nsalp1 > 0.0 && libm::fabs(dalp1) < PI {
                        calp1 = calp1 * cdalp1 - salp1 * sdalp1;
                        salp1 = nsalp1;
                        (salp1, calp1) = norm2(salp1, calp1);
                        // In some regimes we don't get quadratic convergence
                        // because slope -> 0.  So use convergence conditions
                        // based on epsilon instead of sqrt(epsilon).
                        tripn = libm::fabs(v) <= 16.0 * TOL0;
                        continue;
                    }
                }

                // Either dv was not positive or updated value was outside
                // legal range.  Use the midpoint of the bracket as the next
                // estimate.  This mechanism is not needed for the WGS84
                // ellipsoid, but it does catch problems with more eccentric
                // ellipsoids.  Its efficacy is such for the WGS84 test set
                // with the starting guess set to alp1 = 90deg: the WGS84
                // test set: mean = 5.21, sd = 3.93, max = 24 WGS84 and
                // random input: mean = 4.74, sd = 0.99
                if !bisected {
                    log::trace!(
                        "inverse: Newton step rejected after {iterations} iterations, bisecting"
                    );
                    bisected = true;
                }
                salp1 = (salp1a + salp1b) / 2.0;
                calp1 = (calp1a + calp1b) / 2.0;
                (salp1, calp1) = norm2(salp1, calp1);
                tripn = false;
                tripb = libm::fabs(salp1a - salp1) + (calp1a - calp1) < TOLB
                    || libm::fabs(salp1 - salp1b) + (calp1 - calp1b) < TOLB;
            }
            if iterations >= MAX_ITERATIONS {
                log::trace!("inverse: iteration limit of {MAX_ITERATIONS} reached");
            }

            salp2 = lambda.salp2;
            calp2 = lambda.calp2;
            let sig12 = lambda.sig12;
            let lengths = calculate_lengths(
                ellipsoid,
                lambda.eps,
                sig12,
                &p1,
                &lambda.s1,
                &p2,
                &lambda.s2,
                caps,
            );
            s12x = lengths.s12b * b;
            m12x = lengths.m12b * b;
            big_m12 = lengths.big_m12;
            big_m21 = lengths.big_m21;
            a12 = sig12 / DEGREE;

            // omg12 = lam12 - domg12
            let sdomg12 = libm::sin(lambda.domg12);
            let cdomg12 = libm::cos(lambda.domg12);
            somg12 = slam12 * cdomg12 - clam12 * sdomg12;
            comg12 = clam12 * cdomg12 + slam12 * sdomg12;
        }
    }

    // Convert -0 to 0
    let s12 = 0.0 + s12x;
    let m12 = 0.0 + m12x;

    let area = if caps.contains(Capabilities::AREA) {
        let area = calculate_inverse_area(
            ellipsoid,
            &p1,
            &p2,
            [salp1, calp1, salp2, calp2],
            meridian,
            omg12,
            somg12,
            comg12,
        );
        // Convert -0 to 0
        0.0 + area * swapp * lonsign * latsign
    } else {
        0.0
    };

    if swapp < 0.0 {
        core::mem::swap(&mut salp1, &mut salp2);
        core::mem::swap(&mut calp1, &mut calp2);
        core::mem::swap(&mut big_m12, &mut big_m21);
    }

    InverseResult {
        a12,
        s12,
        salp1: salp1 * swapp * lonsign,
        calp1: calp1 * swapp * latsign,
        salp2: salp2 * swapp * lonsign,
        calp2: calp2 * swapp * latsign,
        m12,
        big_m12,
        big_m21,
        area,
        iterations,
    }
}

/// Calculate the area between a geodesic in canonical form and the equator.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `p1`, `p2` - the start and finish points, in canonical form.
/// * `azimuths` - the sines and cosines of the start and finish azimuths:
///   `[salp1, calp1, salp2, calp2]`.
/// * `meridian` - whether the geodesic runs along a meridian.
/// * `omg12` - the longitude difference on the auxiliary sphere, if
///   `somg12 > 1`.
/// * `somg12`, `comg12` - its sine and cosine, if known.
#[allow(clippy::similar_names)]
#[allow(clippy::too_many_arguments)]
#[must_use]
fn calculate_inverse_area(
    ellipsoid: &Ellipsoid,
    p1: &AuxPoint,
    p2: &AuxPoint,
    azimuths: [f64; 4],
    meridian: bool,
    omg12: f64,
    somg12: f64,
    comg12: f64,
) -> f64 {
    let [salp1, calp1, salp2, calp2] = azimuths;
    let (sbet1, cbet1) = (p1.sbet, p1.cbet);
    let (sbet2, cbet2) = (p2.sbet, p2.cbet);

    // From Lambda12: sin(alp1) * cos(bet1) = sin(alp0)
    let salp0 = salp1 * cbet1;
    let calp0 = libm::hypot(calp1, salp1 * sbet1); // calp0 > 0

    let mut area = if calp0 != 0.0 && salp0 != 0.0 {
        // From Lambda12: tan(bet) = tan(sig) * cos(alp)
        let (ssig1, csig1) = norm2(sbet1, calp1 * cbet1);
        let (ssig2, csig2) = norm2(sbet2, calp2 * cbet2);
        let k2 = calp0 * calp0 * ellipsoid.ep_2();
        let eps = calculate_epsilon(k2);
        // Multiplier = a^2 * e^2 * cos(alpha0) * sin(alpha0).
        let a4 = ellipsoid.a().0 * ellipsoid.a().0 * calp0 * salp0 * ellipsoid.e_2();
        let c4a = ellipsoid.calculate_c4y(eps);
        let b41 = sin_cos_series(false, ssig1, csig1, &c4a);
        let b42 = sin_cos_series(false, ssig2, csig2, &c4a);
        a4 * (b42 - b41)
    } else {
        // Avoid problems with indeterminate sig1, sig2 on equator
        0.0
    };

    let (somg12, comg12) = if !meridian && somg12 > 1.0 {
        (libm::sin(omg12), libm::cos(omg12))
    } else {
        (somg12, comg12)
    };

    let alp12 = if !meridian
        // omg12 < 3/4 * pi
        && comg12 > -0.707_106_78
        // Long difference not too big
        && sbet2 - sbet1 < 1.75
    {
        // Use tan(Gamma/2) = tan(omg12/2)
        // * (tan(bet1/2)+tan(bet2/2))/(1+tan(bet1/2)*tan(bet2/2))
        // with tan(x/2) = sin(x)/(1+cos(x))
        let domg12 = 1.0 + comg12;
        let dbet1 = 1.0 + cbet1;
        let dbet2 = 1.0 + cbet2;
        2.0 * libm::atan2(
            somg12 * (sbet1 * dbet2 + sbet2 * dbet1),
            domg12 * (sbet1 * sbet2 + dbet1 * dbet2),
        )
    } else {
        // alp12 = alp2 - alp1, used in atan2 so no need to normalize
        let mut salp12 = salp2 * calp1 - calp2 * salp1;
        let mut calp12 = calp2 * calp1 + salp2 * salp1;
        // The right thing appears to happen if alp1 = +/-180 and alp2 = 0, viz
        // salp12 = -0 and alp12 = -180.  However this depends on the sign
        // being attached to 0 correctly.  The following ensures the correct
        // behavior.
        if salp12 == 0.0 && calp12 < 0.0 {
            salp12 = TINY * calp1;
            calp12 = -1.0;
        }
        libm::atan2(salp12, calp12)
    };
    area += ellipsoid.c2() * alp12;
    area
}

/// Convert the sine and cosine of an azimuth to degrees.
#[must_use]
pub(crate) fn to_azimuth(salp: f64, calp: f64) -> f64 {
    atan2d(salp, calp)
}
