// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Padding and resampling along a single signal axis.

use std::ops::{Add, Mul};

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use num_complex::Complex32;
use rustfft::num_traits::Zero;

use crate::axis::resolve_axis;
use crate::conversions::{real_part, to_complex};
use crate::error::{PureResult, TensorError};
use crate::fft::{fft, ifft};
use crate::observability::emit_tensor_op;

/// Edge handling for [`paddim`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PadMode {
    #[default]
    Zeros,
    /// Mirror around the edge sample without repeating it.
    Reflect,
    /// Repeat the edge sample.
    Replicate,
    /// Wrap around the axis.
    Circular,
}

impl PadMode {
    fn label(self) -> &'static str {
        match self {
            PadMode::Zeros => "zeros",
            PadMode::Reflect => "reflect",
            PadMode::Replicate => "replicate",
            PadMode::Circular => "circular",
        }
    }

    fn source_index(self, i: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        match self {
            PadMode::Zeros => (0..n).contains(&i).then_some(i as usize),
            PadMode::Replicate => Some(i.clamp(0, n - 1) as usize),
            PadMode::Circular => Some(i.rem_euclid(n) as usize),
            PadMode::Reflect => {
                let mut j = i;
                while j < 0 || j >= n {
                    if j < 0 {
                        j = -j;
                    }
                    if j >= n {
                        j = 2 * (n - 1) - j;
                    }
                }
                Some(j as usize)
            }
        }
    }
}

/// Pads `x` along `axis` with `lowpad` samples before and `highpad` after.
pub fn paddim<T>(
    x: &ArrayD<T>,
    lowpad: usize,
    highpad: usize,
    axis: isize,
    mode: PadMode,
) -> PureResult<ArrayD<T>>
where
    T: Clone + Zero,
{
    let ax = resolve_axis(x.ndim(), axis)?;
    let len = x.shape()[ax];
    if len == 0 && mode != PadMode::Zeros {
        return Err(TensorError::EmptyInput("padded axis"));
    }
    if mode == PadMode::Reflect && (lowpad >= len || highpad >= len) {
        return Err(TensorError::PaddingTooWide {
            mode: mode.label(),
            pad: lowpad.max(highpad),
            len,
        });
    }

    let mut shape = x.shape().to_vec();
    shape[ax] = len + lowpad + highpad;
    let mut out = ArrayD::<T>::zeros(IxDyn(&shape));
    for i in 0..shape[ax] {
        if let Some(j) = mode.source_index(i as isize - lowpad as isize, len) {
            out.index_axis_mut(Axis(ax), i)
                .assign(&x.index_axis(Axis(ax), j));
        }
    }
    Ok(out)
}

// Moves the low band of an `n`-bin spectrum into `m` bins. The Nyquist bin of
// the shorter length is split on expansion and merged on contraction so that
// `resignal(resignal(x, 2n), n) == x`.
fn remap_spectrum(src: &[Complex32], dst: &mut [Complex32]) {
    let n = src.len();
    let m = dst.len();
    let common = n.min(m);
    let scale = m as f32 / n as f32;
    dst.iter_mut().for_each(|v| *v = Complex32::zero());

    let (pos, neg) = if common % 2 == 0 {
        (common / 2, common / 2 - 1)
    } else {
        ((common + 1) / 2, (common - 1) / 2)
    };
    for k in 0..pos {
        dst[k] = src[k] * scale;
    }
    for j in 1..=neg {
        dst[m - j] = src[n - j] * scale;
    }
    if common % 2 == 0 {
        let h = common / 2;
        if m > n {
            let half = src[h] * (0.5 * scale);
            dst[h] = half;
            dst[m - h] = half;
        } else {
            dst[h] = (src[h] + src[n - h]) * scale;
        }
    }
}

/// Band-limited resampling of `x` to `samples` points along `axis`.
pub fn resignal(
    x: &ArrayD<Complex32>,
    samples: usize,
    axis: isize,
) -> PureResult<ArrayD<Complex32>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    if samples == 0 {
        return Err(TensorError::InvalidValue { label: "resignal_samples" });
    }
    let len = x.shape()[ax];
    if len == 0 {
        return Err(TensorError::EmptyInput("resignalled axis"));
    }
    if len == samples {
        return Ok(x.clone());
    }

    let spectrum = fft(x, ax as isize, None)?;
    let mut shape = x.shape().to_vec();
    shape[ax] = samples;
    let mut remapped = ArrayD::<Complex32>::zeros(IxDyn(&shape));
    let mut src = vec![Complex32::zero(); len];
    let mut dst = vec![Complex32::zero(); samples];
    Zip::from(remapped.lanes_mut(Axis(ax)))
        .and(spectrum.lanes(Axis(ax)))
        .for_each(|mut out, lane| {
            for (s, v) in src.iter_mut().zip(lane.iter()) {
                *s = *v;
            }
            remap_spectrum(&src, &mut dst);
            for (o, v) in out.iter_mut().zip(dst.iter()) {
                *o = *v;
            }
        });
    let out = ifft(&remapped, ax as isize, None)?;
    emit_tensor_op("resignal", x.shape(), out.shape());
    Ok(out)
}

/// [`resignal`] for real signals; the imaginary residue is dropped.
pub fn resignal_real(x: &ArrayD<f32>, samples: usize, axis: isize) -> PureResult<ArrayD<f32>> {
    Ok(real_part(&resignal(&to_complex(x), samples, axis)?))
}

/// Removes the linear drift between the first sample and the sample at `msi`
/// (negative values count from the end) so the signal meets itself there.
/// Samples past `msi` are shifted by the full drift.
pub fn resample_continuous(
    x: &ArrayD<Complex32>,
    axis: isize,
    msi: isize,
) -> PureResult<ArrayD<Complex32>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let len = x.shape()[ax];
    if len == 0 {
        return Err(TensorError::EmptyInput("continuous axis"));
    }
    let pivot = resolve_axis(len, msi).map_err(|_| TensorError::InvalidValue {
        label: "most_significant_index",
    })?;
    let mut out = x.clone();
    if pivot == 0 {
        return Ok(out);
    }
    for mut lane in out.lanes_mut(Axis(ax)) {
        let drift = lane[pivot] - lane[0];
        for (k, v) in lane.iter_mut().enumerate() {
            let t = k.min(pivot) as f32 / pivot as f32;
            *v -= drift * t;
        }
    }
    Ok(out)
}

/// Linearly interpolates `x` along `axis` at `positions` in `[-1, 1]`, where
/// `-1` and `1` land on the first and last samples. Positions outside the
/// range clamp to the edges.
pub fn weighted_resample<T>(x: &ArrayD<T>, positions: &[f32], axis: isize) -> PureResult<ArrayD<T>>
where
    T: Copy + Zero + Add<Output = T> + Mul<f32, Output = T>,
{
    let ax = resolve_axis(x.ndim(), axis)?;
    if positions.is_empty() {
        return Err(TensorError::EmptyInput("resample positions"));
    }
    let len = x.shape()[ax];
    if len == 0 {
        return Err(TensorError::EmptyInput("resampled axis"));
    }
    let taps: Vec<(usize, usize, f32)> = positions
        .iter()
        .map(|&p| {
            let idx = (p.clamp(-1.0, 1.0) + 1.0) * 0.5 * (len - 1) as f32;
            let lo = (idx.floor().max(0.0) as usize).min(len - 1);
            let hi = (lo + 1).min(len - 1);
            (lo, hi, idx - lo as f32)
        })
        .collect();

    let mut shape = x.shape().to_vec();
    shape[ax] = positions.len();
    let mut out = ArrayD::<T>::zeros(IxDyn(&shape));
    Zip::from(out.lanes_mut(Axis(ax)))
        .and(x.lanes(Axis(ax)))
        .for_each(|mut dst, src| {
            for (o, &(lo, hi, w)) in dst.iter_mut().zip(taps.iter()) {
                *o = src[lo] * (1.0 - w) + src[hi] * w;
            }
        });
    Ok(out)
}
