// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{
    s, Array1, Array2, ArrayD, ArrayView1, ArrayView2, Axis, Ix1, Ix2, Ix4, IxDyn, ShapeError,
};
use num_complex::Complex32;
use pt_config::determinism;
use pt_math::isoftmax;
use pt_tensor::{emit_tensor_op, fft, ifft, CTensor, PureResult, TensorError};
use rayon::prelude::*;
use tracing::debug;

use crate::defaults::{DEFAULT_FFT_SAMPLES, DEFAULT_SPACE_PRIME};
use crate::module::{Module, Parameter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntangleOutputMode {
    #[default]
    Collapse,
    Superposition,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntangleConfig {
    pub signals: usize,
    pub curves: usize,
    pub samples: usize,
    pub use_knowledge_mask: bool,
    pub output_mode: EntangleOutputMode,
}

impl Default for EntangleConfig {
    fn default() -> Self {
        Self {
            signals: 1,
            curves: DEFAULT_SPACE_PRIME,
            samples: DEFAULT_FFT_SAMPLES,
            use_knowledge_mask: true,
            output_mode: EntangleOutputMode::Collapse,
        }
    }
}

/// Outputs selected by [`EntangleOutputMode`].
#[derive(Clone, Debug, Default)]
pub struct EntangleOutput {
    /// `[B, signals, curves, samples]`
    pub collapse: Option<CTensor>,
    /// `[B, signals, curves, samples, samples]`
    pub superposition: Option<CTensor>,
}

/// Fuses each signal with the spectra of every other signal.
///
/// For signal `i` with spectrum `S_i` and world spectrum `W_i` (the sum of
/// the other spectra) the superposition is `M[k, l] = S_i[k] · conj(W_i[l])`
/// weighted by `1 + mask`, and the collapse is
/// `e^{i·pol} · ifft(S_i + softmax_l(M) · W_i)`.
#[derive(Debug)]
pub struct Entangle {
    config: EntangleConfig,
    knowledge_mask: Option<Parameter>,
    polarization: Parameter,
}

impl Entangle {
    pub fn new(name: impl Into<String>, config: EntangleConfig) -> PureResult<Self> {
        if config.signals == 0 {
            return Err(TensorError::InvalidValue { label: "entangle_signals" });
        }
        if config.curves == 0 {
            return Err(TensorError::InvalidValue { label: "entangle_curves" });
        }
        if config.samples == 0 {
            return Err(TensorError::InvalidValue { label: "entangle_samples" });
        }
        let name = name.into();
        let (signals, curves, samples) = (config.signals, config.curves, config.samples);
        let knowledge_mask = config.use_knowledge_mask.then(|| {
            Parameter::new(
                format!("{name}::knowledge_mask"),
                ArrayD::zeros(IxDyn(&[signals, curves, samples, samples])),
            )
        });
        let polarization = Parameter::new(
            format!("{name}::polarization"),
            ArrayD::zeros(IxDyn(&[signals, curves])),
        );
        Ok(Self {
            config,
            knowledge_mask,
            polarization,
        })
    }

    pub fn config(&self) -> &EntangleConfig {
        &self.config
    }

    /// Entangles `[B, signals, curves, L]`. `L` is zero-padded or truncated to
    /// `samples` in the frequency domain.
    pub fn entangle(&self, input: &CTensor) -> PureResult<EntangleOutput> {
        if input.ndim() != 4 {
            return Err(TensorError::Rank {
                label: "entangle input",
                expected: 4,
                got: input.ndim(),
            });
        }
        let (batch, signals, curves) = (input.shape()[0], input.shape()[1], input.shape()[2]);
        if signals != self.config.signals || curves != self.config.curves {
            return Err(TensorError::shape_mismatch(
                input.shape(),
                &[batch, self.config.signals, self.config.curves, self.config.samples],
            ));
        }
        let samples = self.config.samples;
        let spectra = fft(input, -1, Some(samples))?;

        // World view of every signal: all other spectra combined.
        let total = spectra.sum_axis(Axis(1));
        let world = if signals == 1 {
            spectra.clone()
        } else {
            let mut world = spectra.mapv(|v| -v);
            for mut per_signal in world.axis_iter_mut(Axis(1)) {
                per_signal += &total;
            }
            world
        };

        let mode = self.config.output_mode;
        let keep_superposition = mode != EntangleOutputMode::Collapse;
        let spectra = spectra
            .into_dimensionality::<Ix4>()
            .map_err(layout_error("entangle spectra"))?;
        let world = world
            .into_dimensionality::<Ix4>()
            .map_err(layout_error("entangle world"))?;
        let mask = self
            .knowledge_mask
            .as_ref()
            .map(|mask| mask.value().view().into_dimensionality::<Ix4>())
            .transpose()
            .map_err(layout_error("entangle mask"))?;

        let jobs: Vec<(usize, usize, usize)> = (0..batch)
            .flat_map(|b| (0..signals).flat_map(move |i| (0..curves).map(move |c| (b, i, c))))
            .collect();
        let fuse = |&(b, i, c): &(usize, usize, usize)| -> PureResult<(Array1<Complex32>, Option<Array2<Complex32>>)> {
            let own = spectra.slice(s![b, i, c, ..]);
            let others = world.slice(s![b, i, c, ..]);
            let superposition =
                superpose(own, others, mask.as_ref().map(|m| m.slice(s![i, c, .., ..])));
            let attention = isoftmax(&superposition.clone().into_dyn(), -1)?
                .into_dimensionality::<Ix2>()
                .map_err(layout_error("entangle attention"))?;
            let mixed = &own + &attention.dot(&others);
            let rotation = (Complex32::i() * self.polarization.value()[[i, c]]).exp();
            let collapsed = ifft(&mixed.into_dyn(), -1, None)?
                .mapv(|v| v * rotation)
                .into_dimensionality::<Ix1>()
                .map_err(layout_error("entangle collapse"))?;
            Ok((collapsed, keep_superposition.then_some(superposition)))
        };
        let fused: Vec<_> = if determinism::lock_reduction_order() {
            jobs.iter().map(fuse).collect::<PureResult<_>>()?
        } else {
            jobs.par_iter().map(fuse).collect::<PureResult<_>>()?
        };

        let mut output = EntangleOutput::default();
        if mode != EntangleOutputMode::Superposition {
            let mut flat = Vec::with_capacity(jobs.len() * samples);
            for (collapsed, _) in &fused {
                flat.extend(collapsed.iter().copied());
            }
            output.collapse = Some(
                ArrayD::from_shape_vec(IxDyn(&[batch, signals, curves, samples]), flat)
                    .map_err(layout_error("entangle collapse"))?,
            );
        }
        if keep_superposition {
            let mut flat = Vec::with_capacity(jobs.len() * samples * samples);
            for (_, superposition) in &fused {
                if let Some(matrix) = superposition {
                    flat.extend(matrix.iter().copied());
                }
            }
            output.superposition = Some(
                ArrayD::from_shape_vec(IxDyn(&[batch, signals, curves, samples, samples]), flat)
                    .map_err(layout_error("entangle superposition"))?,
            );
        }
        debug!(
            target: "plasmatorch::nn::entangle",
            batch,
            signals,
            curves,
            samples,
            ?mode,
            "entangled signals"
        );
        emit_tensor_op("entangle", input.shape(), &[batch, signals, curves, samples]);
        Ok(output)
    }
}

fn layout_error(label: &'static str) -> impl Fn(ShapeError) -> TensorError {
    move |_| TensorError::InvalidValue { label }
}

fn superpose(
    own: ArrayView1<'_, Complex32>,
    others: ArrayView1<'_, Complex32>,
    mask: Option<ArrayView2<'_, Complex32>>,
) -> Array2<Complex32> {
    let n = own.len();
    let one = Complex32::new(1.0, 0.0);
    Array2::from_shape_fn((n, n), |(k, l)| {
        let weight = mask.as_ref().map_or(one, |mask| one + mask[[k, l]]);
        own[k] * others[l].conj() * weight
    })
}

impl Module for Entangle {
    /// Returns the collapsed signals, or the superposition when only that is
    /// produced.
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        let out = self.entangle(input)?;
        out.collapse
            .or(out.superposition)
            .ok_or(TensorError::InvalidValue { label: "entangle output" })
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        if let Some(mask) = &self.knowledge_mask {
            visitor(mask)?;
        }
        visitor(&self.polarization)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        if let Some(mask) = &mut self.knowledge_mask {
            visitor(mask)?;
        }
        visitor(&mut self.polarization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(shape: &[usize]) -> CTensor {
        let rank = shape.len();
        ArrayD::from_shape_fn(IxDyn(shape), |idx| {
            let k: usize = (0..rank).map(|a| (a + 1) * idx[a]).sum();
            Complex32::new((k as f32 * 0.37).sin(), (k as f32 * 0.11).cos())
        })
    }

    fn config(signals: usize, curves: usize, samples: usize, mode: EntangleOutputMode) -> EntangleConfig {
        EntangleConfig {
            signals,
            curves,
            samples,
            use_knowledge_mask: true,
            output_mode: mode,
        }
    }

    #[test]
    fn output_shapes_follow_mode() {
        let x = signal(&[2, 3, 2, 6]);
        let both = Entangle::new("e", config(3, 2, 8, EntangleOutputMode::Both)).unwrap();
        let out = both.entangle(&x).unwrap();
        assert_eq!(out.collapse.as_ref().unwrap().shape(), &[2, 3, 2, 8]);
        assert_eq!(out.superposition.as_ref().unwrap().shape(), &[2, 3, 2, 8, 8]);

        let sup = Entangle::new("e", config(3, 2, 8, EntangleOutputMode::Superposition)).unwrap();
        let out = sup.entangle(&x).unwrap();
        assert!(out.collapse.is_none());
        assert_eq!(sup.forward(&x).unwrap().shape(), &[2, 3, 2, 8, 8]);
    }

    #[test]
    fn superposition_pairs_signal_with_world() {
        let x = signal(&[1, 2, 1, 4]);
        let layer = Entangle::new("e", config(2, 1, 4, EntangleOutputMode::Superposition)).unwrap();
        let sup = layer.entangle(&x).unwrap().superposition.unwrap();
        let spectra = fft(&x, -1, None).unwrap();
        let expected = spectra[[0, 0, 0, 1]] * spectra[[0, 1, 0, 3]].conj();
        assert!((sup[[0, 0, 0, 1, 3]] - expected).norm() < 1e-4);
    }

    #[test]
    fn single_signal_entangles_with_itself() {
        let x = signal(&[1, 1, 1, 4]);
        let layer = Entangle::new("e", config(1, 1, 4, EntangleOutputMode::Both)).unwrap();
        let out = layer.entangle(&x).unwrap();
        let sup = out.superposition.unwrap();
        let spectra = fft(&x, -1, None).unwrap();
        let expected = spectra[[0, 0, 0, 2]] * spectra[[0, 0, 0, 2]].conj();
        assert!((sup[[0, 0, 0, 2, 2]] - expected).norm() < 1e-4);
        assert!(out.collapse.unwrap().iter().all(|v| v.re.is_finite()));
    }

    #[test]
    fn collapse_matches_direct_computation_with_mask_and_polarization() {
        let mut layer = Entangle::new("e", config(2, 1, 4, EntangleOutputMode::Collapse)).unwrap();
        layer
            .visit_parameters_mut(&mut |p| {
                if p.name().ends_with("::knowledge_mask") {
                    p.value_mut().indexed_iter_mut().for_each(|(idx, v)| {
                        *v = Complex32::new(0.1 * (idx[2] as f32 - idx[3] as f32), 0.05 * idx[2] as f32);
                    });
                } else {
                    p.assign(
                        ArrayD::from_shape_vec(
                            IxDyn(&[2, 1]),
                            vec![Complex32::new(0.7, 0.0), Complex32::new(-0.3, 0.0)],
                        )
                        .unwrap(),
                    )?;
                }
                Ok(())
            })
            .unwrap();

        let x = signal(&[1, 2, 1, 4]).mapv(|v| v * 0.5);
        let collapse = layer.forward(&x).unwrap();

        let spectra = fft(&x, -1, None).unwrap();
        for (i, pol) in [(0usize, 0.7f32), (1, -0.3)] {
            let own: Vec<Complex32> = (0..4).map(|k| spectra[[0, i, 0, k]]).collect();
            let world: Vec<Complex32> = (0..4).map(|k| spectra[[0, 1 - i, 0, k]]).collect();
            let superposition = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| {
                let (k, l) = (idx[0], idx[1]);
                let mask = Complex32::new(0.1 * (k as f32 - l as f32), 0.05 * k as f32);
                own[k] * world[l].conj() * (Complex32::new(1.0, 0.0) + mask)
            });
            let attention = isoftmax(&superposition, -1).unwrap();
            let mixed = ArrayD::from_shape_fn(IxDyn(&[4]), |idx| {
                let k = idx[0];
                own[k] + (0..4).map(|l| attention[[k, l]] * world[l]).sum::<Complex32>()
            });
            let rotation = Complex32::from_polar(1.0, pol);
            let expected = ifft(&mixed, -1, None).unwrap().mapv(|v| v * rotation);
            for t in 0..4 {
                let got = collapse[[0, i, 0, t]];
                let want = expected[[t]];
                assert!((got - want).norm() < 1e-4 * (1.0 + want.norm()), "signal {i} t {t}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let layer = Entangle::new("e", config(2, 3, 4, EntangleOutputMode::Collapse)).unwrap();
        assert!(matches!(
            layer.forward(&signal(&[1, 2, 2, 4])),
            Err(TensorError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            layer.forward(&signal(&[2, 3, 4])),
            Err(TensorError::Rank { .. })
        ));
        assert!(Entangle::new("e", config(0, 1, 4, EntangleOutputMode::Collapse)).is_err());
    }

    #[test]
    fn mask_is_optional_parameter() {
        let mut cfg = config(2, 3, 4, EntangleOutputMode::Collapse);
        let with_mask = Entangle::new("e", cfg).unwrap();
        assert_eq!(with_mask.parameter_count().unwrap(), 2 * 3 * 16 + 2 * 3);
        cfg.use_knowledge_mask = false;
        let without = Entangle::new("e", cfg).unwrap();
        assert_eq!(without.parameter_count().unwrap(), 2 * 3);
        // A zero mask is the same as no mask.
        let x = signal(&[1, 2, 3, 5]);
        let a = with_mask.forward(&x).unwrap();
        let b = without.forward(&x).unwrap();
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).norm() < 1e-5);
        }
    }
}
