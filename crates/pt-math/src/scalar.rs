// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt::Debug;
use std::ops::Mul;

use ndarray::LinalgScalar;
use num_complex::Complex32;

use crate::consts::PI;
use crate::primes::{gaussian_primish_scalar, real_primish_scalar};

#[inline]
pub(crate) fn logistic(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Scalar element of a PlasmaTorch signal: `f32` or [`Complex32`].
///
/// The methods are the per-element pieces of the tensor kernels in
/// [`crate::activations`]; real implementations collapse to the textbook
/// function, complex ones work on the polar decomposition.
pub trait IScalar: LinalgScalar + Send + Sync + Debug + Mul<f32, Output = Self> {
    const IS_COMPLEX: bool;

    fn magnitude(self) -> f32;

    fn polarization(self) -> f32;

    fn into_complex(self) -> Complex32;

    /// Value a softmax normalises over: the value itself for reals, the
    /// magnitude for complex numbers.
    fn softmax_key(self) -> f32;

    /// Rebuilds the element from its softmax weight, keeping the phase.
    fn with_softmax(self, weight: f32) -> Self;

    fn isigmoid(self) -> Self;

    fn icos(self) -> Self;

    fn isin(self) -> Self;

    fn powf(self, exponent: f32) -> Self;

    fn primish_dist(self, relative: bool) -> f32;
}

impl IScalar for f32 {
    const IS_COMPLEX: bool = false;

    #[inline]
    fn magnitude(self) -> f32 {
        self.abs()
    }

    #[inline]
    fn polarization(self) -> f32 {
        0.0f32.atan2(self)
    }

    #[inline]
    fn into_complex(self) -> Complex32 {
        Complex32::new(self, 0.0)
    }

    #[inline]
    fn softmax_key(self) -> f32 {
        self
    }

    #[inline]
    fn with_softmax(self, weight: f32) -> Self {
        weight
    }

    #[inline]
    fn isigmoid(self) -> Self {
        logistic(self)
    }

    #[inline]
    fn icos(self) -> Self {
        self.cos()
    }

    #[inline]
    fn isin(self) -> Self {
        self.sin()
    }

    #[inline]
    fn powf(self, exponent: f32) -> Self {
        f32::powf(self, exponent)
    }

    fn primish_dist(self, relative: bool) -> f32 {
        real_primish_scalar(self, relative, false)
    }
}

impl IScalar for Complex32 {
    const IS_COMPLEX: bool = true;

    #[inline]
    fn magnitude(self) -> f32 {
        self.norm()
    }

    #[inline]
    fn polarization(self) -> f32 {
        self.arg()
    }

    #[inline]
    fn into_complex(self) -> Complex32 {
        self
    }

    #[inline]
    fn softmax_key(self) -> f32 {
        self.norm()
    }

    #[inline]
    fn with_softmax(self, weight: f32) -> Self {
        Complex32::from_polar(weight, self.arg())
    }

    fn isigmoid(self) -> Self {
        let mag = self.norm();
        if mag == 0.0 {
            return Complex32::new(0.5, 0.0);
        }
        let angle = self.arg();
        let gated = match (self.re >= 0.0, self.im >= 0.0) {
            (true, true) => logistic(mag),
            (false, false) => logistic(-mag),
            // Mixed quadrants rotate between the two saturated branches.
            (false, true) => logistic((2.0 * (angle - PI / 2.0)).cos() * mag),
            (true, false) => logistic((2.0 * (angle + PI / 2.0)).cos() * mag),
        };
        Complex32::new(self.re.abs(), self.im.abs()) * (gated / mag)
    }

    #[inline]
    fn icos(self) -> Self {
        Complex32::from_polar(self.norm().cos(), 2.0 * self.arg())
    }

    #[inline]
    fn isin(self) -> Self {
        Complex32::from_polar(self.norm().sin(), self.arg())
    }

    #[inline]
    fn powf(self, exponent: f32) -> Self {
        Complex32::powf(self, exponent)
    }

    fn primish_dist(self, relative: bool) -> f32 {
        gaussian_primish_scalar(self, relative)
    }
}
