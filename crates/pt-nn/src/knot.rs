// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, Axis, IxDyn};
use num_complex::Complex32;
use pt_config::determinism;
use pt_math::{lattice_params, IScalar, PHI, PI};
use pt_tensor::{emit_tensor_op, CTensor, PureResult, TensorError};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::defaults::{DEFAULT_FFT_SAMPLES, DEFAULT_SPACE_PRIME};
use crate::module::{Module, Parameter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnotConfig {
    /// Number of output curves.
    pub size: usize,
    /// Waves summed per curve.
    pub depth: usize,
    pub seed: Option<u64>,
}

impl Default for KnotConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SPACE_PRIME,
            depth: DEFAULT_FFT_SAMPLES / 2,
            seed: None,
        }
    }
}

/// Expands a signal into `size` curves, each a bias plus `depth` complex waves
/// of the input:
///
/// `out[.., c, t] = bias[c] + Σ_d amp[c, d] · icos(freq[c, d] · x[.., t] + phase[c, d])`
#[derive(Debug)]
pub struct Knot {
    bias: Parameter,
    amplitude: Parameter,
    frequency: Parameter,
    phase: Parameter,
}

impl Knot {
    pub fn new(name: impl Into<String>, config: KnotConfig) -> PureResult<Self> {
        if config.size == 0 {
            return Err(TensorError::InvalidValue { label: "knot_size" });
        }
        if config.depth == 0 {
            return Err(TensorError::InvalidValue { label: "knot_depth" });
        }
        let name = name.into();
        let mut rng = determinism::rng_from_optional(config.seed, &format!("pt-nn/knot/{name}"));
        let (size, depth) = (config.size, config.depth);
        let lattice = lattice_params(depth, PHI);
        let mut noise = |scale: f32| -> f32 { rng.sample::<f32, _>(StandardNormal) * scale };

        let amplitude = ArrayD::from_shape_fn(IxDyn(&[size, depth]), |_| {
            Complex32::new((1.0 + noise(0.02)) / depth as f32, noise(0.02) / depth as f32)
        });
        let frequency = ArrayD::from_shape_fn(IxDyn(&[size, depth]), |idx| {
            Complex32::new(lattice[idx[1]] * (1.0 + noise(0.01)), 0.0)
        });
        let phase = ArrayD::from_shape_fn(IxDyn(&[size, depth]), |_| {
            Complex32::new(noise(0.1) * PI, 0.0)
        });
        let bias = ArrayD::zeros(IxDyn(&[size]));

        Ok(Self {
            bias: Parameter::new(format!("{name}::bias"), bias),
            amplitude: Parameter::new(format!("{name}::amplitude"), amplitude),
            frequency: Parameter::new(format!("{name}::frequency"), frequency),
            phase: Parameter::new(format!("{name}::phase"), phase),
        })
    }

    pub fn size(&self) -> usize {
        self.bias.value().len()
    }

    pub fn depth(&self) -> usize {
        self.amplitude.value().shape()[1]
    }

    fn curve(&self, c: usize, x: &CTensor) -> CTensor {
        let bias = self.bias.value()[[c]];
        let amp = self.amplitude.value().index_axis(Axis(0), c);
        let freq = self.frequency.value().index_axis(Axis(0), c);
        let phase = self.phase.value().index_axis(Axis(0), c);
        x.mapv(|v| {
            let mut acc = bias;
            for ((&a, &f), &p) in amp.iter().zip(freq.iter()).zip(phase.iter()) {
                acc += a * (f * v + p).icos();
            }
            acc
        })
    }
}

impl Module for Knot {
    /// `[..., L] -> [..., size, L]`.
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        if input.ndim() == 0 {
            return Err(TensorError::Rank {
                label: "knot input",
                expected: 1,
                got: 0,
            });
        }
        let curves: Vec<CTensor> = (0..self.size()).map(|c| self.curve(c, input)).collect();
        let views: Vec<_> = curves.iter().map(|curve| curve.view()).collect();
        let out = ndarray::stack(Axis(input.ndim() - 1), &views)
            .map_err(|_| TensorError::InvalidValue { label: "knot curves" })?;
        emit_tensor_op("knot", input.shape(), out.shape());
        Ok(out)
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&self.bias)?;
        visitor(&self.amplitude)?;
        visitor(&self.frequency)?;
        visitor(&self.phase)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&mut self.bias)?;
        visitor(&mut self.amplitude)?;
        visitor(&mut self.frequency)?;
        visitor(&mut self.phase)
    }
}
