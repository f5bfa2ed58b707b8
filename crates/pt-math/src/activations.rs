// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, Axis, Zip};
use pt_tensor::{resolve_axis, PureResult, TensorError};

use crate::scalar::IScalar;

/// Softmax along `axis`. Complex inputs are normalised over their magnitudes
/// and keep their phase.
pub fn isoftmax<T: IScalar>(x: &ArrayD<T>, axis: isize) -> PureResult<ArrayD<T>> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let mut out = x.clone();
    for mut lane in out.lanes_mut(Axis(ax)) {
        let max = lane
            .iter()
            .map(|v| v.softmax_key())
            .fold(f32::NEG_INFINITY, f32::max);
        let total: f32 = lane.iter().map(|v| (v.softmax_key() - max).exp()).sum();
        for v in lane.iter_mut() {
            let weight = (v.softmax_key() - max).exp() / total;
            *v = v.with_softmax(weight);
        }
    }
    Ok(out)
}

/// Geometric mean of [`isoftmax`] over several axes.
pub fn nsoftmax<T: IScalar>(x: &ArrayD<T>, axes: &[isize]) -> PureResult<ArrayD<T>> {
    if axes.is_empty() {
        return Err(TensorError::EmptyInput("nsoftmax axes"));
    }
    let root = 1.0 / axes.len() as f32;
    let mut out = ArrayD::<T>::from_elem(x.raw_dim(), T::one());
    for &axis in axes {
        let soft = isoftmax(x, axis)?;
        Zip::from(&mut out)
            .and(&soft)
            .for_each(|o, &s| *o = *o * s.powf(root));
    }
    Ok(out)
}

pub fn imagnitude<T: IScalar>(x: &ArrayD<T>) -> ArrayD<f32> {
    x.mapv(IScalar::magnitude)
}

pub fn ipolarization<T: IScalar>(x: &ArrayD<T>) -> ArrayD<f32> {
    x.mapv(IScalar::polarization)
}

/// Quadrant-gated logistic; see [`IScalar::isigmoid`].
pub fn isigmoid<T: IScalar>(x: &ArrayD<T>) -> ArrayD<T> {
    x.mapv(IScalar::isigmoid)
}

/// `cos|x| · e^{2iθ}`; plain cosine for reals.
pub fn icos<T: IScalar>(x: &ArrayD<T>) -> ArrayD<T> {
    x.mapv(IScalar::icos)
}

/// `sin|x| · e^{iθ}`; plain sine for reals.
pub fn isin<T: IScalar>(x: &ArrayD<T>) -> ArrayD<T> {
    x.mapv(IScalar::isin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};
    use num_complex::Complex32;

    #[test]
    fn real_softmax_sums_to_one() {
        let x = array![[1.0f32, 2.0, 3.0], [0.0, 0.0, 0.0]].into_dyn();
        let s = isoftmax(&x, -1).unwrap();
        for row in s.lanes(Axis(1)) {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
        assert!((s[[1, 0]] - 1.0 / 3.0).abs() < 1e-6);
        assert!(s[[0, 2]] > s[[0, 1]]);
    }

    #[test]
    fn complex_softmax_keeps_phase() {
        let x = ArrayD::from_shape_vec(
            IxDyn(&[3]),
            vec![
                Complex32::from_polar(1.0, 0.3),
                Complex32::from_polar(2.0, -1.2),
                Complex32::from_polar(0.5, 2.0),
            ],
        )
        .unwrap();
        let s = isoftmax(&x, 0).unwrap();
        let mags = imagnitude(&s);
        assert!((mags.sum() - 1.0).abs() < 1e-6);
        for (a, b) in ipolarization(&s).iter().zip(ipolarization(&x).iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn nsoftmax_single_axis_matches_isoftmax() {
        let x = array![[0.5f32, -1.0], [2.0, 1.0]].into_dyn();
        let one = nsoftmax(&x, &[0]).unwrap();
        let direct = isoftmax(&x, 0).unwrap();
        for (a, b) in one.iter().zip(direct.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        let two = nsoftmax(&x, &[0, 1]).unwrap();
        let rows = isoftmax(&x, 1).unwrap();
        for ((t, a), b) in two.iter().zip(direct.iter()).zip(rows.iter()) {
            assert!((t - (a * b).sqrt()).abs() < 1e-6);
        }
    }

    #[test]
    fn nsoftmax_rejects_empty_axes() {
        let x = array![1.0f32].into_dyn();
        assert!(matches!(nsoftmax(&x, &[]), Err(TensorError::EmptyInput(_))));
    }

    #[test]
    fn softmax_rejects_bad_axis() {
        let x = array![1.0f32, 2.0].into_dyn();
        assert!(matches!(
            isoftmax(&x, 3),
            Err(TensorError::AxisOutOfRange { .. })
        ));
    }

    #[test]
    fn real_polarization_is_zero_or_pi() {
        let x = array![2.0f32, -2.0, 0.0].into_dyn();
        let p = ipolarization(&x);
        assert_eq!(p[[0]], 0.0);
        assert!((p[[1]] - crate::PI).abs() < 1e-6);
        assert_eq!(p[[2]], 0.0);
    }

    #[test]
    fn real_trig_matches_std() {
        let x = array![0.0f32, 0.5, -1.5].into_dyn();
        for (c, v) in icos(&x).iter().zip(x.iter()) {
            assert!((c - v.cos()).abs() < 1e-6);
        }
        for (s, v) in isin(&x).iter().zip(x.iter()) {
            assert!((s - v.sin()).abs() < 1e-6);
        }
        assert_eq!(isigmoid(&x)[[0]], 0.5);
    }
}
