// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Distances to "primish" numbers: values of the form `6k ± 1` (or `4k ± 3`
//! on the Gaussian lattice) together with the small specials `{-1, 1, 2, 3}`.

use ndarray::ArrayD;
use num_complex::Complex32;

use crate::scalar::IScalar;

const SPECIALS: [f32; 4] = [-1.0, 1.0, 2.0, 3.0];

/// First `n` primish values, optionally continuing an existing `base`
/// sequence (at least three entries; shorter bases are ignored).
pub fn primishvals(n: usize, base: Option<&[i64]>, gauss: bool) -> Vec<i64> {
    let seed: &[i64] = match base {
        Some(base) if base.len() >= 3 => base,
        _ => &[1, 2, 3],
    };
    if n <= seed.len() {
        return seed[..n].to_vec();
    }
    let mut values = Vec::with_capacity(n);
    values.extend_from_slice(seed);
    for idx in seed.len()..n {
        let step = ((idx as i64 - 3) / 2) + 1;
        let next = if idx & 1 == 1 {
            if gauss {
                4 * step + 1
            } else {
                6 * step - 1
            }
        } else {
            values[idx - 1] + 2
        };
        values.push(next);
    }
    values
}

pub(crate) fn real_primish_scalar(x: f32, relative: bool, gauss: bool) -> f32 {
    let (period, offset) = if gauss { (4.0, 3.0) } else { (6.0, 1.0) };
    let top = ((x - offset) / period).trunc();
    let bottom = ((x + offset) / period).trunc();
    let neighbours = [
        top * period + offset,
        (top + 1.0) * period + offset,
        bottom * period - offset,
        (bottom + 1.0) * period - offset,
    ];

    let mut floor = None::<f32>;
    let mut ceil = None::<f32>;
    let mut smallest = f32::INFINITY;
    let mut largest = f32::NEG_INFINITY;
    for &c in neighbours.iter().chain(SPECIALS.iter()) {
        smallest = smallest.min(c);
        largest = largest.max(c);
        if c <= x {
            floor = Some(floor.map_or(c, |f| f.max(c)));
        } else {
            ceil = Some(ceil.map_or(c, |h| h.min(c)));
        }
    }
    let low = floor.unwrap_or(smallest);
    let high = ceil.unwrap_or(largest);

    let below = x - low;
    let above = high - x;
    let dist = if above < below { above } else { below };
    if relative && !gauss {
        let half_gap = (high - low) / 2.0;
        if half_gap == 0.0 {
            return 0.0;
        }
        return dist / half_gap;
    }
    dist
}

pub(crate) fn gaussian_primish_scalar(z: Complex32, relative: bool) -> f32 {
    let norm = real_primish_scalar(z.norm_sqr(), relative, false).sqrt();
    let re_axis = real_primish_scalar(z.re, true, true).hypot(z.im.abs() / 2.0);
    let im_axis = real_primish_scalar(z.im, true, true).hypot(z.re.abs() / 2.0);
    re_axis.min(im_axis).min(norm)
}

/// Elementwise distance to the nearest primish value on the real line.
pub fn realprimishdist(x: &ArrayD<f32>, relative: bool, gauss: bool) -> ArrayD<f32> {
    x.mapv(|v| real_primish_scalar(v, relative, gauss))
}

/// Elementwise distance of complex values to the Gaussian primish lattice.
pub fn gaussianprimishdist(x: &ArrayD<Complex32>, relative: bool) -> ArrayD<f32> {
    x.mapv(|z| gaussian_primish_scalar(z, relative))
}

/// Real or Gaussian primish distance depending on the element type.
pub fn iprimishdist<T: IScalar>(x: &ArrayD<T>, relative: bool) -> ArrayD<f32> {
    x.mapv(|v| v.primish_dist(relative))
}
