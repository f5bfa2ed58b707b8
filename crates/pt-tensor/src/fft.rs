// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

// 1-D transforms along an arbitrary axis (CPU). Lanes are gathered into a
// scratch buffer, transformed with rustfft, scaled and scattered back.
use ndarray::{ArrayD, Axis, IxDyn, Zip};
use num_complex::Complex32;
use rustfft::{num_traits::Zero, FftDirection, FftPlanner};

use crate::axis::resolve_axis;
use crate::error::{PureResult, TensorError};
use crate::observability::emit_tensor_op;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FftNorm {
    /// No scaling forward, `1/n` on the inverse.
    #[default]
    Backward,
    /// `1/sqrt(n)` both ways.
    Ortho,
    /// `1/n` forward, no scaling on the inverse.
    Forward,
}

impl FftNorm {
    fn scale(self, direction: FftDirection, n: usize) -> f32 {
        let n = n as f32;
        match (self, direction) {
            (FftNorm::Backward, FftDirection::Forward) => 1.0,
            (FftNorm::Backward, FftDirection::Inverse) => 1.0 / n,
            (FftNorm::Ortho, _) => 1.0 / n.sqrt(),
            (FftNorm::Forward, FftDirection::Forward) => 1.0 / n,
            (FftNorm::Forward, FftDirection::Inverse) => 1.0,
        }
    }
}

fn transform_axis(
    x: &ArrayD<Complex32>,
    axis: isize,
    n: Option<usize>,
    direction: FftDirection,
    norm: FftNorm,
) -> PureResult<ArrayD<Complex32>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let len = n.unwrap_or(x.shape()[ax]);
    if len == 0 {
        return Err(TensorError::InvalidValue { label: "fft_length" });
    }
    let mut shape = x.shape().to_vec();
    shape[ax] = len;
    let mut out = ArrayD::<Complex32>::zeros(IxDyn(&shape));

    let mut planner = FftPlanner::<f32>::new();
    let plan = planner.plan_fft(len, direction);
    let scale = norm.scale(direction, len);
    let mut buf = vec![Complex32::zero(); len];
    let mut scratch = vec![Complex32::zero(); plan.get_inplace_scratch_len()];

    Zip::from(out.lanes_mut(Axis(ax)))
        .and(x.lanes(Axis(ax)))
        .for_each(|mut dst, src| {
            buf.iter_mut().for_each(|v| *v = Complex32::zero());
            for (slot, value) in buf.iter_mut().zip(src.iter()) {
                *slot = *value;
            }
            plan.process_with_scratch(&mut buf, &mut scratch);
            for (d, v) in dst.iter_mut().zip(buf.iter()) {
                *d = *v * scale;
            }
        });

    emit_tensor_op(
        match direction {
            FftDirection::Forward => "fft",
            FftDirection::Inverse => "ifft",
        },
        x.shape(),
        out.shape(),
    );
    Ok(out)
}

/// Forward FFT along `axis`, zero-padding or truncating to `n` samples.
pub fn fft(x: &ArrayD<Complex32>, axis: isize, n: Option<usize>) -> PureResult<ArrayD<Complex32>> {
    transform_axis(x, axis, n, FftDirection::Forward, FftNorm::Backward)
}

/// Inverse FFT along `axis` with `1/n` normalisation.
pub fn ifft(
    x: &ArrayD<Complex32>,
    axis: isize,
    n: Option<usize>,
) -> PureResult<ArrayD<Complex32>> {
    transform_axis(x, axis, n, FftDirection::Inverse, FftNorm::Backward)
}

pub fn fft_with_norm(
    x: &ArrayD<Complex32>,
    axis: isize,
    n: Option<usize>,
    norm: FftNorm,
) -> PureResult<ArrayD<Complex32>> {
    transform_axis(x, axis, n, FftDirection::Forward, norm)
}

pub fn ifft_with_norm(
    x: &ArrayD<Complex32>,
    axis: isize,
    n: Option<usize>,
    norm: FftNorm,
) -> PureResult<ArrayD<Complex32>> {
    transform_axis(x, axis, n, FftDirection::Inverse, norm)
}

/// Inverse of a real FFT: treats the first `n/2 + 1` entries along `axis` as
/// the non-negative half of a Hermitian spectrum and returns `n` real samples.
/// `n` defaults to `2 * (len - 1)`.
pub fn irfft(
    x: &ArrayD<Complex32>,
    axis: isize,
    n: Option<usize>,
    norm: FftNorm,
) -> PureResult<ArrayD<f32>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let bins = x.shape()[ax];
    let len = match n {
        Some(len) => len,
        None => 2 * bins.saturating_sub(1),
    };
    if len == 0 {
        return Err(TensorError::InvalidValue { label: "irfft_length" });
    }
    let half = len / 2 + 1;
    let mut shape = x.shape().to_vec();
    shape[ax] = len;
    let mut out = ArrayD::<f32>::zeros(IxDyn(&shape));

    let mut planner = FftPlanner::<f32>::new();
    let plan = planner.plan_fft_inverse(len);
    let scale = norm.scale(FftDirection::Inverse, len);
    let mut buf = vec![Complex32::zero(); len];

    Zip::from(out.lanes_mut(Axis(ax)))
        .and(x.lanes(Axis(ax)))
        .for_each(|mut dst, src| {
            buf.iter_mut().for_each(|v| *v = Complex32::zero());
            for k in 0..half.min(bins) {
                let mut v = src[k];
                // DC and Nyquist carry no phase in a real signal.
                if k == 0 || (len % 2 == 0 && k == len / 2) {
                    v.im = 0.0;
                }
                buf[k] = v;
                if k != 0 && len - k != k {
                    buf[len - k] = v.conj();
                }
            }
            plan.process(&mut buf);
            for (d, v) in dst.iter_mut().zip(buf.iter()) {
                *d = v.re * scale;
            }
        });

    emit_tensor_op("irfft", x.shape(), out.shape());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_signal(shape: &[usize], seed: u64) -> ArrayD<Complex32> {
        let mut rng = StdRng::seed_from_u64(seed);
        ArrayD::from_shape_fn(IxDyn(shape), |_| {
            Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        })
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut x = ArrayD::<Complex32>::zeros(IxDyn(&[1, 8]));
        x[[0, 0]] = Complex32::new(1.0, 0.0);
        let y = fft(&x, -1, None).unwrap();
        for v in y.iter() {
            assert!((v.re - 1.0).abs() < 1e-6 && v.im.abs() < 1e-6);
        }
    }

    #[test]
    fn roundtrip_on_middle_axis() {
        let x = random_signal(&[3, 12, 5], 7);
        let y = ifft(&fft(&x, 1, None).unwrap(), 1, None).unwrap();
        for (a, b) in x.iter().zip(y.iter()) {
            assert!((a - b).norm() < 1e-5);
        }
    }

    #[test]
    fn ortho_preserves_energy() {
        let x = random_signal(&[16], 3);
        let y = fft_with_norm(&x, 0, None, FftNorm::Ortho).unwrap();
        let ex: f32 = x.iter().map(|v| v.norm_sqr()).sum();
        let ey: f32 = y.iter().map(|v| v.norm_sqr()).sum();
        assert!((ex - ey).abs() < 1e-4);
    }

    #[test]
    fn inverse_with_matching_norm_restores_the_signal() {
        let x = random_signal(&[4, 9], 13);
        for norm in [FftNorm::Backward, FftNorm::Ortho, FftNorm::Forward] {
            let spectrum = fft_with_norm(&x, -1, None, norm).unwrap();
            let back = ifft_with_norm(&spectrum, -1, None, norm).unwrap();
            for (a, b) in x.iter().zip(back.iter()) {
                assert!((a - b).norm() < 1e-5, "{norm:?}");
            }
        }
    }

    #[test]
    fn inverse_scaling_follows_the_norm() {
        let mut x = ArrayD::<Complex32>::zeros(IxDyn(&[8]));
        x[[0]] = Complex32::new(1.0, 0.0);
        let dc = |norm| ifft_with_norm(&x, 0, None, norm).unwrap()[[3]].re;
        assert!((dc(FftNorm::Backward) - 0.125).abs() < 1e-6);
        assert!((dc(FftNorm::Ortho) - 8f32.sqrt().recip()).abs() < 1e-6);
        assert!((dc(FftNorm::Forward) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn explicit_length_pads_and_truncates() {
        let x = random_signal(&[2, 6], 11);
        assert_eq!(fft(&x, -1, Some(10)).unwrap().shape(), &[2, 10]);
        assert_eq!(fft(&x, -1, Some(4)).unwrap().shape(), &[2, 4]);
        assert!(fft(&x, -1, Some(0)).is_err());
        assert!(fft(&x, 2, None).is_err());
    }

    #[test]
    fn irfft_inverts_a_real_spectrum() {
        let mut rng = StdRng::seed_from_u64(5);
        let real: Vec<f32> = (0..10).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let x = ArrayD::from_shape_vec(IxDyn(&[10]), real.clone())
            .unwrap()
            .mapv(|v| Complex32::new(v, 0.0));
        let spectrum = fft(&x, 0, None).unwrap();
        let back = irfft(&spectrum, 0, Some(10), FftNorm::Backward).unwrap();
        for (a, b) in real.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
