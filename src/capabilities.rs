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

//! The capabilities module contains the masks which select the quantities
//! calculated by the geodesic solvers and a `GeodesicLine`.
//!
//! Each quantity depends upon one or more Fourier series, see CFF Karney
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).
//! Only the series required by the requested quantities are evaluated.

use bitflags::bitflags;

bitflags! {
    /// The quantities to calculate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// The latitude `lat2`.
        const LATITUDE = 1 << 0;
        /// The longitude `lon2`.
        const LONGITUDE = 1 << 1;
        /// The azimuths `azi1` and `azi2`.
        const AZIMUTH = 1 << 2;
        /// The distance `s12`.
        const DISTANCE = 1 << 3;
        /// Allow a distance as the input of a direct problem.
        const DISTANCE_IN = 1 << 4;
        /// The reduced length `m12`.
        const REDUCED_LENGTH = 1 << 5;
        /// The geodesic scales `M12` and `M21`.
        const GEODESIC_SCALE = 1 << 6;
        /// The area `S12` between the geodesic and the equator.
        const AREA = 1 << 7;
        /// All of the capabilities.
        const ALL = 0xff;
    }
}

bitflags! {
    /// Flags modifying a direct problem.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        /// The direct problem input is an arc length in degrees,
        /// not a distance.
        const ARC_MODE = 1 << 0;
        /// Do not normalise the output longitude, so that `lon2 - lon1`
        /// indicates how often the geodesic encircles the ellipsoid.
        const LONG_UNROLL = 1 << 1;
    }
}

bitflags! {
    /// The Fourier series required to calculate a set of `Capabilities`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Series: u8 {
        /// The distance series `C1`.
        const C1 = 1 << 0;
        /// The inverted distance series `C1'`.
        const C1P = 1 << 1;
        /// The reduced length series `C2`.
        const C2 = 1 << 2;
        /// The longitude series `C3`.
        const C3 = 1 << 3;
        /// The area series `C4`.
        const C4 = 1 << 4;
    }
}

impl Capabilities {
    /// Add the capabilities that the requested capabilities depend upon.
    ///
    /// * `DISTANCE_IN` requires `DISTANCE`;
    /// * `REDUCED_LENGTH` and `GEODESIC_SCALE` require `DISTANCE`;
    /// * `AREA` requires `DISTANCE`, `LATITUDE` and `AZIMUTH`.
    ///
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::Capabilities;
    ///
    /// let caps = Capabilities::AREA.with_prerequisites();
    /// assert!(caps.contains(Capabilities::DISTANCE | Capabilities::LATITUDE | Capabilities::AZIMUTH));
    /// assert!(!caps.contains(Capabilities::LONGITUDE));
    /// ```
    #[must_use]
    pub fn with_prerequisites(self) -> Self {
        let mut caps = self;
        if self.intersects(Self::DISTANCE_IN | Self::REDUCED_LENGTH | Self::GEODESIC_SCALE) {
            caps |= Self::DISTANCE;
        }
        if self.contains(Self::AREA) {
            caps |= Self::DISTANCE | Self::LATITUDE | Self::AZIMUTH;
        }
        caps
    }

    /// The Fourier series needed to calculate these capabilities.
    #[must_use]
    pub(crate) fn series(self) -> Series {
        let caps = self.with_prerequisites();
        let mut series = Series::empty();
        if caps.contains(Self::DISTANCE) {
            series |= Series::C1;
        }
        if caps.contains(Self::DISTANCE_IN) {
            series |= Series::C1 | Series::C1P;
        }
        if caps.intersects(Self::REDUCED_LENGTH | Self::GEODESIC_SCALE) {
            series |= Series::C1 | Series::C2;
        }
        if caps.contains(Self::LONGITUDE) {
            series |= Series::C3;
        }
        if caps.contains(Self::AREA) {
            series |= Series::C4;
        }
        series
    }
}

impl Default for Capabilities {
    /// The standard direct problem outputs: latitude, longitude, azimuth and
    /// distance, with a distance as input.
    fn default() -> Self {
        Self::LATITUDE | Self::LONGITUDE | Self::AZIMUTH | Self::DISTANCE_IN
    }
}
