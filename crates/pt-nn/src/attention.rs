// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Turbulence: attention by warping a stack of entangled views of the signal.
//!
//! Queries and states are knotted into four views (ego, basis, world,
//! integral), entangled together, and then read through a grid-sampled warp
//! that the signal itself chooses. A compressor reweights the warped spectrum
//! before it is brought back to the signal domain.

use ndarray::{ArrayD, Axis, IxDyn};
use num_complex::Complex32;
use pt_math::isoftmax;
use pt_tensor::{
    emit_tensor_op, fft, grid_sample_complex, ifft, CTensor, GridInterpolation, GridPadding,
    GridSampleOptions, PureResult, TensorError,
};
use tracing::debug;

use crate::defaults::{DEFAULT_FFT_SAMPLES, DEFAULT_SPACE_PRIME};
use crate::entangle::{Entangle, EntangleConfig, EntangleOutputMode};
use crate::knot::{Knot, KnotConfig};
use crate::module::{Module, Parameter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurbulenceConfig {
    pub samples: usize,
    /// Curves per knot and signals in the warp entangler.
    pub internal_dimensions: usize,
    /// Waves per knot curve.
    pub internal_waves: usize,
    /// Entangle the output curves once more and sum them, giving `[B, samples]`.
    pub same_dim_out: bool,
    /// Reuse the warp entangler for that final step.
    pub same_dim_warp_entangle: bool,
    pub seed: Option<u64>,
}

impl Default for TurbulenceConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_FFT_SAMPLES,
            internal_dimensions: DEFAULT_SPACE_PRIME,
            internal_waves: DEFAULT_FFT_SAMPLES / 2,
            same_dim_out: false,
            same_dim_warp_entangle: false,
            seed: None,
        }
    }
}

/// Entangler applied to the warped curves, if any.
#[derive(Debug)]
pub enum FinalEntangle {
    None,
    SharedWarp,
    Own(Entangle),
}

#[derive(Debug)]
pub struct Turbulence {
    config: TurbulenceConfig,
    parietal: Entangle,
    ego_knot: Knot,
    world_knot: Knot,
    integral_knot: Knot,
    basis_knot: Knot,
    warp_entangler: Entangle,
    warp_knot: Knot,
    compressor_knot: Knot,
    compressor_gain: Parameter,
    final_entangle: FinalEntangle,
}

impl Turbulence {
    pub fn new(name: impl Into<String>, config: TurbulenceConfig) -> PureResult<Self> {
        let name = name.into();
        let dims = config.internal_dimensions;
        let knot = |part: &str, size: usize| {
            Knot::new(
                format!("{name}::{part}"),
                KnotConfig {
                    size,
                    depth: config.internal_waves,
                    seed: config.seed,
                },
            )
        };
        let entangler = |part: &str, signals: usize, curves: usize| {
            Entangle::new(
                format!("{name}::{part}"),
                EntangleConfig {
                    signals,
                    curves,
                    samples: config.samples,
                    use_knowledge_mask: true,
                    output_mode: EntangleOutputMode::Collapse,
                },
            )
        };

        let final_entangle = match (config.same_dim_out, config.same_dim_warp_entangle) {
            (false, _) => FinalEntangle::None,
            (true, true) => FinalEntangle::SharedWarp,
            (true, false) => FinalEntangle::Own(entangler("final_entangler", dims, 1)?),
        };
        Ok(Self {
            config,
            parietal: entangler("parietal_entangler", 4, dims)?,
            ego_knot: knot("ego_knot", dims)?,
            world_knot: knot("world_knot", dims)?,
            integral_knot: knot("integral_knot", dims)?,
            basis_knot: knot("basis_knot", dims)?,
            warp_entangler: entangler("warp_entangler", dims, 1)?,
            warp_knot: knot("warp_knot", 2)?,
            compressor_knot: knot("compressor_knot", dims)?,
            compressor_gain: Parameter::new(
                format!("{name}::compressor_gain"),
                ArrayD::from_elem(IxDyn(&[1]), Complex32::new(1.0, 0.0)),
            ),
            final_entangle,
        })
    }

    pub fn config(&self) -> &TurbulenceConfig {
        &self.config
    }

    pub fn final_entangle(&self) -> &FinalEntangle {
        &self.final_entangle
    }

    /// Attends `queries` against `states`, both `[B, L]`.
    ///
    /// Returns `[B, internal_dimensions, samples]`, or `[B, samples]` when the
    /// output is entangled back into a single curve.
    pub fn attend(
        &self,
        queries: &CTensor,
        states: &CTensor,
        interpolation: GridInterpolation,
        padding: GridPadding,
    ) -> PureResult<CTensor> {
        if queries.ndim() != 2 {
            return Err(TensorError::Rank {
                label: "turbulence queries",
                expected: 2,
                got: queries.ndim(),
            });
        }
        if states.shape() != queries.shape() {
            return Err(TensorError::shape_mismatch(queries.shape(), states.shape()));
        }
        let samples = self.config.samples;

        let integral_states = ifft(states, -1, None)?;
        let basis_states = fft(states, -1, None)?;

        let ego = self.ego_knot.forward(queries)?;
        let basis = self.basis_knot.forward(&basis_states)?;
        let world = self.world_knot.forward(states)?;
        let integral = self.integral_knot.forward(&integral_states)?;
        let stacked = ndarray::stack(
            Axis(1),
            &[ego.view(), basis.view(), world.view(), integral.view()],
        )
        .map_err(|_| TensorError::InvalidValue { label: "turbulence views" })?;
        // [B, 4, D, S]
        let parietal = self.parietal.forward(&stacked)?;

        let entangle_sum = parietal.sum_axis(Axis(1)).insert_axis(Axis(2));
        let super_sum = self
            .warp_entangler
            .forward(&entangle_sum)?
            .sum_axis(Axis(1));
        // [B, 1, S]

        let warp = isoftmax(&self.warp_knot.forward(&super_sum)?, -2)?.remove_axis(Axis(1));
        let gain = self.compressor_gain.value()[[0]];
        let compressor = isoftmax(&self.compressor_knot.forward(&super_sum)?, -2)?
            .remove_axis(Axis(1))
            .mapv(|v| v * gain);

        // The entangled views become a [B, D, 4, S] image read along a [B, 1, S, 2] grid.
        let mut image = parietal;
        image.swap_axes(1, 2);
        let image = image.as_standard_layout().into_owned();
        let mut grid = warp;
        grid.swap_axes(1, 2);
        let grid = grid.insert_axis(Axis(1)).as_standard_layout().into_owned();
        let options = GridSampleOptions {
            mode: interpolation,
            padding,
            align_corners: false,
        };
        let warped = grid_sample_complex(&image, &grid, options)?.remove_axis(Axis(2));

        let spectrum = fft(&warped, -1, Some(samples))? * &compressor;
        let result = ifft(&spectrum, -1, Some(samples))?;

        let final_entangler = match &self.final_entangle {
            FinalEntangle::None => None,
            FinalEntangle::SharedWarp => Some(&self.warp_entangler),
            FinalEntangle::Own(entangler) => Some(entangler),
        };
        let out = match final_entangler {
            None => result,
            Some(entangler) => entangler
                .forward(&result.insert_axis(Axis(2)))?
                .remove_axis(Axis(2))
                .sum_axis(Axis(1)),
        };

        debug!(
            target: "plasmatorch::nn::turbulence",
            batch = queries.shape()[0],
            input_len = queries.shape()[1],
            samples,
            ?interpolation,
            ?padding,
            output = ?out.shape(),
            "attention pass"
        );
        emit_tensor_op("turbulence", queries.shape(), out.shape());
        Ok(out)
    }

    fn submodules(&self) -> [&dyn Module; 8] {
        [
            &self.parietal,
            &self.ego_knot,
            &self.world_knot,
            &self.integral_knot,
            &self.basis_knot,
            &self.warp_entangler,
            &self.warp_knot,
            &self.compressor_knot,
        ]
    }
}

impl Module for Turbulence {
    /// Self-attention: `attend(x, x)` with bicubic interpolation and border
    /// padding.
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        self.attend(input, input, GridInterpolation::Bicubic, GridPadding::Border)
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        for module in self.submodules() {
            module.visit_parameters(visitor)?;
        }
        visitor(&self.compressor_gain)?;
        if let FinalEntangle::Own(entangler) = &self.final_entangle {
            entangler.visit_parameters(visitor)?;
        }
        Ok(())
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        self.parietal.visit_parameters_mut(visitor)?;
        self.ego_knot.visit_parameters_mut(visitor)?;
        self.world_knot.visit_parameters_mut(visitor)?;
        self.integral_knot.visit_parameters_mut(visitor)?;
        self.basis_knot.visit_parameters_mut(visitor)?;
        self.warp_entangler.visit_parameters_mut(visitor)?;
        self.warp_knot.visit_parameters_mut(visitor)?;
        self.compressor_knot.visit_parameters_mut(visitor)?;
        visitor(&mut self.compressor_gain)?;
        if let FinalEntangle::Own(entangler) = &mut self.final_entangle {
            entangler.visit_parameters_mut(visitor)?;
        }
        Ok(())
    }
}
