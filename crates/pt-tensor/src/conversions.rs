// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, Zip};
use num_complex::Complex32;

use crate::error::{PureResult, TensorError};

/// Lifts a real tensor into the complex plane with a zero imaginary part.
pub fn to_complex(x: &ArrayD<f32>) -> ArrayD<Complex32> {
    x.mapv(|v| Complex32::new(v, 0.0))
}

pub fn real_part(x: &ArrayD<Complex32>) -> ArrayD<f32> {
    x.mapv(|v| v.re)
}

pub fn imag_part(x: &ArrayD<Complex32>) -> ArrayD<f32> {
    x.mapv(|v| v.im)
}

/// Rebuilds a complex tensor from matching real and imaginary planes.
pub fn from_parts(re: &ArrayD<f32>, im: &ArrayD<f32>) -> PureResult<ArrayD<Complex32>> {
    if re.shape() != im.shape() {
        return Err(TensorError::shape_mismatch(re.shape(), im.shape()));
    }
    let mut out = ArrayD::<Complex32>::zeros(re.raw_dim());
    Zip::from(&mut out)
        .and(re)
        .and(im)
        .for_each(|o, &r, &i| *o = Complex32::new(r, i));
    Ok(out)
}

#[inline]
fn scrub(v: f32, nan: f32, posinf: f32, neginf: f32) -> f32 {
    if v.is_nan() {
        nan
    } else if v == f32::INFINITY {
        posinf
    } else if v == f32::NEG_INFINITY {
        neginf
    } else {
        v
    }
}

/// Replaces NaN and infinite components with finite stand-ins, component-wise.
pub fn nantonum(
    x: &ArrayD<Complex32>,
    nan: f32,
    posinf: Option<f32>,
    neginf: Option<f32>,
) -> ArrayD<Complex32> {
    let posinf = posinf.unwrap_or(f32::MAX);
    let neginf = neginf.unwrap_or(f32::MIN);
    x.mapv(|v| {
        Complex32::new(
            scrub(v.re, nan, posinf, neginf),
            scrub(v.im, nan, posinf, neginf),
        )
    })
}

pub fn nantonum_real(
    x: &ArrayD<f32>,
    nan: f32,
    posinf: Option<f32>,
    neginf: Option<f32>,
) -> ArrayD<f32> {
    let posinf = posinf.unwrap_or(f32::MAX);
    let neginf = neginf.unwrap_or(f32::MIN);
    x.mapv(|v| scrub(v, nan, posinf, neginf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn lifts_reals_with_empty_imaginary() {
        let x = ArrayD::<f32>::ones(IxDyn(&[8, 8, 8]));
        let c = to_complex(&x);
        assert_eq!(c.shape(), x.shape());
        assert!(c.iter().all(|v| v.re == 1.0 && v.im == 0.0));
        assert_eq!(real_part(&c), x);
    }

    #[test]
    fn parts_roundtrip_and_check_shape() {
        let re = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let im = re.mapv(|v| -v);
        let c = from_parts(&re, &im).unwrap();
        assert_eq!(imag_part(&c), im);
        let short = ArrayD::<f32>::zeros(IxDyn(&[2]));
        assert!(from_parts(&re, &short).is_err());
    }

    #[test]
    fn scrubs_non_finite_components() {
        let x = ArrayD::from_shape_vec(
            IxDyn(&[3]),
            vec![
                Complex32::new(f32::NAN, 1.0),
                Complex32::new(f32::INFINITY, f32::NEG_INFINITY),
                Complex32::new(2.0, 3.0),
            ],
        )
        .unwrap();
        let y = nantonum(&x, 0.0, Some(9.0), Some(-9.0));
        assert_eq!(y[[0]], Complex32::new(0.0, 1.0));
        assert_eq!(y[[1]], Complex32::new(9.0, -9.0));
        assert_eq!(y[[2]], Complex32::new(2.0, 3.0));
    }
}
