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

//! This module contains the coefficients of the series expansions used to
//! solve geodesic problems on the surface of an ellipsoid.
//!
//! It uses the equations given by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf),
//! expanded to sixth order in `eps` and the third flattening `n`.

#![allow(clippy::suboptimal_flops)]

/// The scale factor `A1 - 1`.
/// CFF Karney, Eq. 17.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
/// use ellipsoid_geodesic::ellipsoid::coefficients::evaluate_a1;
///
/// // evaluate_a1 for WGS 84 latitude 45.0
/// let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
/// let a1 = evaluate_a1(eps45);
///
/// assert_eq!(0.0033839903702120875, a1);
/// ```
#[must_use]
pub fn evaluate_a1(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * (eps2 * (eps2 + 4.0) + 64.0) / 256.0;
    (t + eps) / (1.0 - eps)
}

/// The scale factor `A2 - 1`.
/// CFF Karney, Eq. 42.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// # Examples
/// ```
/// use ellipsoid_geodesic::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
/// use ellipsoid_geodesic::ellipsoid::coefficients::evaluate_a2;
///
/// // evaluate_a2 for WGS 84 latitude 45.0
/// let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
/// let a2 = evaluate_a2(eps45);
///
/// assert_eq!(-0.003366919118090816, a2);
/// ```
#[must_use]
pub fn evaluate_a2(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * ((-11. * eps2 - 28.) * eps2 - 192.) / 256.;
    (t - eps) / (1. + eps)
}

/// The coefficients `A3x`, the polynomial in `eps` of the scale factor `A3`.
/// CFF Karney, Eq. 24.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_a3(n: f64) -> [f64; 6] {
    [
        1.,
        (n - 1.) / 2.,
        (n * (3. * n - 1.) - 2.) / 8.,
        ((-n - 3.) * n - 1.) / 16.,
        (-2. * n - 3.) / 64.,
        -3. / 128.,
    ]
}

/// The coefficients `C1[l]` in the Fourier expansion of `B1`.
/// CFF Karney, Eq. 18.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c1(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps; // Note: not the same as eps2 * eps2!
    let eps5 = eps4 * eps;
    let eps6 = eps5 * eps;

    [
        0.,
        eps * ((6. - eps2) * eps2 - 16.) / 32.,
        eps2 * ((64. - 9. * eps2) * eps2 - 128.) / 2048.,
        eps3 * (9. * eps2 - 16.) / 768.,
        eps4 * (3. * eps2 - 5.) / 512.,
        eps5 * -7. / 1280.,
        eps6 * -7. / 2048.,
    ]
}

/// The coefficients `C1p[l]` in the Fourier expansion of `B1p`, the
/// inverse of the `B1` series.
/// CFF Karney, Eq. 21.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c1p(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps;
    let eps5 = eps4 * eps;
    let eps6 = eps5 * eps;

    [
        0.,
        eps * (eps2 * (205. * eps2 - 432.) + 768.) / 1536.,
        eps2 * (eps2 * (4005. * eps2 - 4736.) + 3840.) / 12288.,
        eps3 * (116. - 225. * eps2) / 384.,
        eps4 * (2695. - 7173. * eps2) / 7680.,
        eps5 * 3467. / 7680.,
        eps6 * 38081. / 61440.,
    ]
}

/// The coefficients `C2[l]` in the Fourier expansion of `B2`.
/// CFF Karney, Eq. 43.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c2(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps;
    let eps5 = eps4 * eps;
    let eps6 = eps5 * eps;

    [
        0.,
        eps * (eps2 * (eps2 + 2.) + 16.) / 32.,
        eps2 * (eps2 * (35. * eps2 + 64.) + 384.) / 2048.,
        eps3 * (15. * eps2 + 80.) / 768.,
        eps4 * (7. * eps2 + 35.) / 512.,
        eps5 * 63. / 1280.,
        eps6 * 77. / 2048.,
    ]
}

/// The coefficients `C3x`, the polynomials in `eps` of `C3[l]`.
/// CFF Karney, Eq. 25.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_c3x(n: f64) -> [f64; 15] {
    [
        (1. - n) / 4.,
        (1. - n * n) / 8.,
        (n * ((-5. * n - 1.) * n + 3.) + 3.) / 64.,
        (n * ((2. - 2. * n) * n + 2.) + 5.) / 128.,
        (n * (3. * n + 11.) + 12.) / 512.,
        ((n - 3.) * n + 2.) / 32.,
        (n * (n * (2. * n - 3.) - 2.) + 3.) / 64.,
        (n * ((-6. * n - 9.) * n + 2.) + 6.) / 256.,
        ((1. - 2. * n) * n + 5.) / 256.,
        (n * ((5. - n) * n - 9.) + 5.) / 192.,
        (n * (n * (10. * n - 6.) - 10.) + 9.) / 384.,
        ((-77. * n - 8.) * n + 42.) / 3072.,
        (n * ((20. - 7. * n) * n - 28.) + 14.) / 1024.,
        ((-7. * n - 40.) * n + 28.) / 2048.,
        (n * (75. * n - 90.) + 42.) / 5120.,
    ]
}

/// The coefficients `C4x`, the polynomials in `eps` of `C4[l]`.
/// CFF Karney, Eq. 63.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_c4x(n: f64) -> [f64; 21] {
    [
        // C4[0]
        (n * (n * (n * (n * (100. * n + 208.) + 572.) + 3432.) - 12012.) + 30030.) / 45045.,
        (n * (n * (n * (64. * n + 624.) - 4576.) + 6864.) - 3003.) / 15015.,
        (n * ((14144. - 10656. * n) * n - 4576.) - 858.) / 45045.,
        ((-224. * n - 4784.) * n + 1573.) / 45045.,
        (1088. * n + 156.) / 45045.,
        97. / 15015.,
        // C4[1]
        (n * (n * ((-64. * n - 624.) * n + 4576.) - 6864.) + 3003.) / 135_135.,
        (n * (n * (5952. * n - 11648.) + 9152.) - 2574.) / 135_135.,
        (n * (5792. * n + 1040.) - 1287.) / 135_135.,
        (468. - 2944. * n) / 135_135.,
        1. / 9009.,
        // C4[2]
        (n * ((4160. - 1440. * n) * n - 4576.) + 1716.) / 225_225.,
        ((4992. - 8448. * n) * n - 1144.) / 225_225.,
        (1856. * n - 936.) / 225_225.,
        8. / 10725.,
        // C4[3]
        (n * (3584. * n - 3328.) + 1144.) / 315_315.,
        (1024. * n - 208.) / 105_105.,
        -136. / 63063.,
        // C4[4]
        (832. - 2560. * n) / 405_405.,
        -128. / 135_135.,
        // C4[5]
        128. / 99099.,
    ]
}

/// Evaluate the polynomial in x using
/// [Horner's method](https://en.wikipedia.org/wiki/Horner%27s_method).
/// * `coeffs` - the polynomial coefficients, lowest order first.
/// * `x` - the variable.
#[must_use]
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .split_last()
        .map_or(0.0, |(last, elements)| {
            elements
                .iter()
                .rev()
                .fold(*last, |result, element| result * x + element)
        })
}

/// The coefficients `C3[l]` in the Fourier expansion of `C3`.
/// CFF Karney, Eq. 25.
/// * `coeffs` - the polynomial coefficients from `evaluate_coeffs_c3x`.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c3y(coeffs: &[f64; 15], eps: f64) -> [f64; 6] {
    let c1 = eps * evaluate_polynomial(&coeffs[0..5], eps);
    let eps_2 = eps * eps;
    let c2 = eps_2 * evaluate_polynomial(&coeffs[5..9], eps);
    let eps_3 = eps * eps_2;
    let c3 = eps_3 * evaluate_polynomial(&coeffs[9..12], eps);
    let eps_4 = eps * eps_3;
    let c4 = eps_4 * evaluate_polynomial(&coeffs[12..14], eps);
    let eps_5 = eps * eps_4;
    let c5 = eps_5 * evaluate_polynomial(&coeffs[14..15], eps);
    [0.0, c1, c2, c3, c4, c5]
}

/// The coefficients `C4[l]` in the Fourier expansion of `I4`.
/// CFF Karney, Eq. 63.
/// * `coeffs` - the polynomial coefficients from `evaluate_coeffs_c4x`.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c4y(coeffs: &[f64; 21], eps: f64) -> [f64; 6] {
    let mut result = [0.0; 6];
    let mut multiplier = 1.0;
    let mut start = 0;
    for (l, c) in result.iter_mut().enumerate() {
        let end = start + 6 - l;
        *c = multiplier * evaluate_polynomial(&coeffs[start..end], eps);
        multiplier *= eps;
        start = end;
    }
    result
}

/// Evaluate a Fourier series using
/// [Clenshaw summation](https://en.wikipedia.org/wiki/Clenshaw_algorithm).
///
/// If `sinp` the series is `sum(c[i] * sin(2*i * x), i, 1, n-1)`, ignoring
/// `c[0]`; otherwise it is `sum(c[i] * cos((2*i+1) * x), i, 0, n-1)`.
/// * `sinp` - whether to evaluate the sine series.
/// * `sinx`, `cosx` - the sine and cosine of the angle `x`.
/// * `coeffs` - the series coefficients.
#[must_use]
pub fn sin_cos_series(sinp: bool, sinx: f64, cosx: f64, coeffs: &[f64]) -> f64 {
    let mut index = coeffs.len();
    let n = index.saturating_sub(usize::from(sinp));

    // the Clenshaw ak(theta) parameter: 2 * cos(2x)
    let ar = 2.0 * (cosx - sinx) * (cosx + sinx);
    let mut k0 = if n % 2 == 0 {
        0.0
    } else {
        index -= 1;
        coeffs[index]
    };
    let mut k1 = 0.0;

    // Unroll loop x 2, so accumulators return to their original role.
    for _ in 0..n / 2 {
        index -= 1;
        k1 = ar * k0 - k1 + coeffs[index];
        index -= 1;
        k0 = ar * k1 - k0 + coeffs[index];
    }

    if sinp {
        2.0 * sinx * cosx * k0
    } else {
        cosx * (k0 - k1)
    }
}
