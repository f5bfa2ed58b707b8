// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{Array1, ArrayD, Axis};
use pt_tensor::{resolve_axis, PureResult, TensorError};

use crate::consts::EGAMMA;
use crate::scalar::IScalar;

/// Largest harmonic index [`harmonicdist`] will search around.
const MAX_HARMONIC_INDEX: f32 = (1 << 20) as f32;

/// `[bias, bias + 1, ..., bias + n - 1]`.
pub fn xbias(n: usize, bias: f32) -> Array1<f32> {
    Array1::from_shape_fn(n, |k| bias + k as f32)
}

/// Geometric lattice `basis^-k` for `k in 0..dims`. Layers use φ as basis.
pub fn lattice_params(dims: usize, basis: f32) -> Array1<f32> {
    Array1::from_shape_fn(dims, |k| basis.powf(-(k as f32)))
}

/// Harmonic mean along `axis`.
pub fn hmean<T: IScalar>(x: &ArrayD<T>, axis: isize) -> PureResult<ArrayD<T>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let n = x.shape()[ax];
    if n == 0 {
        return Err(TensorError::EmptyInput("harmonic mean axis"));
    }
    let inverse = x.mapv(|v| T::one() / v).sum_axis(Axis(ax));
    Ok(inverse.mapv(|s| T::one() * n as f32 / s))
}

/// The harmonic terms `1/k` for `k = 1..=n`, or with `nosum == false` the
/// partial sums `H_1..H_n`. `addzero` prepends a leading `0`.
pub fn harmonicvals(n: usize, nosum: bool, addzero: bool) -> PureResult<Array1<f32>> {
    if n == 0 {
        return Err(TensorError::InvalidValue { label: "harmonic count" });
    }
    let mut values = Vec::with_capacity(n + usize::from(addzero));
    if addzero {
        values.push(0.0);
    }
    let mut running = 0.0f32;
    for k in 1..=n {
        let term = 1.0 / k as f32;
        running += term;
        values.push(if nosum { term } else { running });
    }
    Ok(Array1::from(values))
}

/// Signed distance from each element to the nearest harmonic number
/// (`H_0 = 0`), searched around the inverse of `H_m ≈ ln m + γ`.
pub fn harmonicdist(x: &ArrayD<f32>) -> ArrayD<f32> {
    let guess = |v: f32| -> usize {
        let m = (v - EGAMMA).exp().round();
        if m.is_finite() {
            m.clamp(0.0, MAX_HARMONIC_INDEX) as usize
        } else if v > 0.0 {
            MAX_HARMONIC_INDEX as usize
        } else {
            0
        }
    };
    let top = x.iter().map(|&v| guess(v)).max().unwrap_or(0) + 1;
    let mut harmonics = Vec::with_capacity(top + 1);
    harmonics.push(0.0f32);
    let mut running = 0.0f32;
    for k in 1..=top {
        running += 1.0 / k as f32;
        harmonics.push(running);
    }

    x.mapv(|v| {
        let m = guess(v);
        let mut best = v - harmonics[m];
        for k in [m.saturating_sub(1), m + 1] {
            let d = v - harmonics[k];
            if d.abs() < best.abs() {
                best = d;
            }
        }
        best
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex32;

    #[test]
    fn bias_and_lattice() {
        assert_eq!(xbias(3, 2.0).to_vec(), vec![2.0, 3.0, 4.0]);
        let lattice = lattice_params(3, crate::PHI);
        assert_eq!(lattice[0], 1.0);
        assert!((lattice[1] - 1.0 / crate::PHI).abs() < 1e-6);
        assert!((lattice[2] * crate::PHI * crate::PHI - 1.0).abs() < 1e-5);
    }

    #[test]
    fn harmonic_mean_of_reals_and_complex() {
        let x = array![[1.0f32, 4.0, 4.0]].into_dyn();
        let h = hmean(&x, -1).unwrap();
        assert!((h[[0]] - 2.0).abs() < 1e-6);

        let z = array![Complex32::new(2.0, 0.0), Complex32::new(2.0, 0.0)].into_dyn();
        let hz = hmean(&z, 0).unwrap();
        let mean = *hz.iter().next().unwrap();
        assert!((mean - Complex32::new(2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn harmonic_values() {
        let terms = harmonicvals(3, true, false).unwrap();
        assert_eq!(terms.to_vec(), vec![1.0, 0.5, 1.0 / 3.0]);
        let sums = harmonicvals(3, false, true).unwrap();
        assert_eq!(sums.len(), 4);
        assert_eq!(sums[0], 0.0);
        assert!((sums[3] - 11.0 / 6.0).abs() < 1e-6);
        assert!(harmonicvals(0, false, false).is_err());
    }

    #[test]
    fn harmonic_distance_vanishes_on_harmonic_numbers() {
        let x = array![0.0f32, 1.0, 1.5, 11.0 / 6.0, 25.0 / 12.0].into_dyn();
        for d in harmonicdist(&x).iter() {
            assert!(d.abs() < 1e-5, "{d}");
        }
        let off = harmonicdist(&array![1.6f32].into_dyn());
        assert!((off[[0]] - 0.1).abs() < 1e-5);
    }
}
