// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{Array1, ArrayD, Axis, Dimension, IxDyn};
use num_complex::Complex32;
use pt_tensor::{co_broadcast, real_part, to_complex, CTensor, PureResult, RTensor, TensorError};

use crate::defaults::DEFAULT_FFT_SAMPLES;
use crate::module::{Module, Parameter};

fn polarization(name: &str, units: usize) -> PureResult<Parameter> {
    if units == 0 {
        return Err(TensorError::InvalidValue { label: "observer_units" });
    }
    Ok(Parameter::new(
        format!("{name}::polarization"),
        ArrayD::zeros(IxDyn(&[units])),
    ))
}

// Rotates the last axis of `x` by `e^{i·pol}`; `pol` broadcasts like a
// trailing feature vector.
fn rotate(x: &CTensor, pol: &Parameter) -> PureResult<CTensor> {
    co_broadcast(x.shape(), pol.value().shape())?;
    let rotation = pol.value().mapv(|p| (Complex32::i() * p).exp());
    Ok(x * &rotation)
}

/// Observes a complex signal as a real one: `Re(x · e^{i·pol})`.
#[derive(Debug)]
pub struct RealObserver {
    polarization: Parameter,
}

impl RealObserver {
    pub fn new(name: impl Into<String>, units: usize) -> PureResult<Self> {
        Ok(Self {
            polarization: polarization(&name.into(), units)?,
        })
    }

    pub fn observe(&self, x: &CTensor) -> PureResult<RTensor> {
        Ok(real_part(&rotate(x, &self.polarization)?))
    }
}

impl Module for RealObserver {
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        Ok(to_complex(&self.observe(input)?))
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&self.polarization)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&mut self.polarization)
    }
}

/// `x · e^{i·pol}` with a learned per-unit polarization.
#[derive(Debug)]
pub struct ComplexObserver {
    polarization: Parameter,
}

impl ComplexObserver {
    pub fn new(name: impl Into<String>, units: usize) -> PureResult<Self> {
        Ok(Self {
            polarization: polarization(&name.into(), units)?,
        })
    }
}

impl Module for ComplexObserver {
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        rotate(input, &self.polarization)
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&self.polarization)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&mut self.polarization)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmearConfig {
    pub samples: usize,
    /// Fraction below 1 the window starts at.
    pub lower: f32,
    /// Fraction above 1 the window ends at.
    pub upper: f32,
}

impl Default for SmearConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_FFT_SAMPLES,
            lower: 1.0 / 16.0,
            upper: 1.0 / 16.0,
        }
    }
}

/// Spreads a single value into a window of `samples` slightly scaled copies,
/// `[..., 1] -> [..., samples]`.
#[derive(Clone, Debug)]
pub struct Smear {
    window: Array1<f32>,
}

impl Smear {
    pub fn new(config: SmearConfig) -> PureResult<Self> {
        if config.samples == 0 {
            return Err(TensorError::InvalidValue { label: "smear_samples" });
        }
        Ok(Self {
            window: Array1::linspace(1.0 - config.lower, 1.0 + config.upper, config.samples),
        })
    }

    pub fn window(&self) -> &Array1<f32> {
        &self.window
    }
}

impl Module for Smear {
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        let last = match input.ndim() {
            0 => {
                return Err(TensorError::Rank {
                    label: "smear input",
                    expected: 1,
                    got: 0,
                })
            }
            n => n - 1,
        };
        if input.shape()[last] != 1 {
            let mut expected = input.shape().to_vec();
            expected[last] = 1;
            return Err(TensorError::shape_mismatch(input.shape(), &expected));
        }
        let values = input.index_axis(Axis(last), 0);
        let mut shape = values.shape().to_vec();
        shape.push(self.window.len());
        Ok(ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let (head, k) = idx.slice().split_at(last);
            values[head] * self.window[k[0]]
        }))
    }

    fn visit_parameters(
        &self,
        _visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        Ok(())
    }

    fn visit_parameters_mut(
        &mut self,
        _visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CTensor {
        ArrayD::from_shape_fn(IxDyn(&[2, 3]), |idx| {
            Complex32::new(idx[0] as f32 + 1.0, idx[1] as f32 - 1.0)
        })
    }

    #[test]
    fn fresh_observers_are_identity_maps() {
        let x = sample();
        let complex = ComplexObserver::new("co", 3).unwrap();
        assert_eq!(complex.forward(&x).unwrap(), x);
        let real = RealObserver::new("ro", 3).unwrap();
        assert_eq!(real.observe(&x).unwrap(), real_part(&x));
    }

    #[test]
    fn quarter_turn_reads_negated_imaginary() {
        let x = sample();
        let mut real = RealObserver::new("ro", 1).unwrap();
        real.visit_parameters_mut(&mut |p| {
            p.value_mut().fill(Complex32::new(std::f32::consts::FRAC_PI_2, 0.0));
            Ok(())
        })
        .unwrap();
        let seen = real.observe(&x).unwrap();
        for (s, v) in seen.iter().zip(x.iter()) {
            assert!((s + v.im).abs() < 1e-6);
        }
    }

    #[test]
    fn observers_reject_incompatible_units() {
        let complex = ComplexObserver::new("co", 4).unwrap();
        assert!(matches!(
            complex.forward(&sample()),
            Err(TensorError::Broadcast { .. })
        ));
        assert!(RealObserver::new("ro", 0).is_err());
    }

    #[test]
    fn smear_spreads_last_axis() {
        let smear = Smear::new(SmearConfig {
            samples: 5,
            ..SmearConfig::default()
        })
        .unwrap();
        assert!((smear.window()[0] - 0.9375).abs() < 1e-6);
        assert!((smear.window()[4] - 1.0625).abs() < 1e-6);
        let x = ArrayD::from_elem(IxDyn(&[2, 1]), Complex32::new(2.0, -1.0));
        let out = smear.forward(&x).unwrap();
        assert_eq!(out.shape(), &[2, 5]);
        assert_eq!(out[[1, 2]], Complex32::new(2.0, -1.0));
        assert!(smear.forward(&sample()).is_err());
        assert_eq!(smear.parameter_count().unwrap(), 0);
    }
}
