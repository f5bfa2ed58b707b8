// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Lenses resample a signal at learned positions. A lens is a real signal in
//! `[-1, 1]`; each entry picks the point of the (circularly padded) input to
//! read, so a lens can stretch, squeeze or fold the view of the signal.

use ndarray::{ArrayD, Axis, IxDyn};
use pt_math::isigmoid;
use pt_tensor::{
    emit_tensor_op, irfft, paddim, resolve_axis, weighted_resample, CTensor, FftNorm, PadMode,
    PureResult, TensorError,
};
use tracing::trace;

use crate::defaults::{DEFAULT_SIGNAL_LENS_PADDING, DEFAULT_SIGNAL_LENS_SAMPLES, GREISS_SAMPLES};
use crate::knowledge::{KnowledgeCollider, KnowledgeFilter};
use crate::module::{Module, Parameter};

// Folds positions outside [-1, 1] back into range with period 2.
fn wrap_position(p: f32) -> f32 {
    if p.abs() <= 1.0 {
        return p;
    }
    let squish = (p + 1.0) / 2.0;
    (squish - squish.floor()) * 2.0 - 1.0
}

/// Views `x` along `axis` through `lens`, padding the signal circularly by
/// `padding` samples on each side so positions near the edges can see past
/// them. The result has `lens.len()` samples along `axis`.
pub fn lens(x: &CTensor, lens: &[f32], padding: usize, axis: isize) -> PureResult<CTensor> {
    let ax = resolve_axis(x.ndim(), axis)?;
    let len = x.shape()[ax];
    if len == 0 {
        return Err(TensorError::EmptyInput("lensed axis"));
    }
    if padding > len {
        return Err(TensorError::PaddingTooWide {
            mode: "circular",
            pad: padding,
            len,
        });
    }
    let padded = paddim(x, padding, padding, ax as isize, PadMode::Circular)?;
    let scale = len as f32 / (len + 2 * padding) as f32;
    let positions: Vec<f32> = lens.iter().map(|&p| wrap_position(p) * scale).collect();
    let out = weighted_resample(&padded, &positions, ax as isize)?;
    trace!(target: "plasmatorch::nn::lens", len, padding, lens = lens.len(), "lensed signal");
    emit_tensor_op("lens", x.shape(), out.shape());
    Ok(out)
}

/// Direction a [`PolarLens`] is viewed through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PolarLensPosition {
    #[default]
    NS,
    SN,
}

impl PolarLensPosition {
    /// `-1` for [`NS`](Self::NS), `+1` for [`SN`](Self::SN).
    pub fn sign(self) -> f32 {
        match self {
            PolarLensPosition::NS => -1.0,
            PolarLensPosition::SN => 1.0,
        }
    }

    fn from_bit(bit: u8) -> Self {
        if bit & 0b1 == 0 {
            PolarLensPosition::NS
        } else {
            PolarLensPosition::SN
        }
    }

    fn bit(self) -> u8 {
        match self {
            PolarLensPosition::NS => 0,
            PolarLensPosition::SN => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolarLensConfig {
    /// Samples of the lensed output.
    pub samples: usize,
    /// Circular padding added on both sides before lensing.
    pub padding: usize,
    /// Length of the learned lens basis.
    pub basis_samples: usize,
}

impl Default for PolarLensConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SIGNAL_LENS_SAMPLES,
            padding: DEFAULT_SIGNAL_LENS_PADDING,
            basis_samples: GREISS_SAMPLES,
        }
    }
}

/// A learned lens that can be looked through in two directions. Flipping the
/// direction mirrors the distortion.
#[derive(Debug)]
pub struct PolarLens {
    config: PolarLensConfig,
    basis: Parameter,
    direction: PolarLensPosition,
}

impl PolarLens {
    pub fn new(name: impl Into<String>, config: PolarLensConfig) -> PureResult<Self> {
        if config.samples == 0 {
            return Err(TensorError::InvalidValue { label: "lens_samples" });
        }
        if config.basis_samples == 0 {
            return Err(TensorError::InvalidValue { label: "lens_basis_samples" });
        }
        let name = name.into();
        Ok(Self {
            config,
            basis: Parameter::new(
                format!("{name}::basis"),
                ArrayD::zeros(IxDyn(&[config.basis_samples])),
            ),
            direction: PolarLensPosition::default(),
        })
    }

    pub fn set_direction(&mut self, direction: PolarLensPosition) {
        self.direction = direction;
    }

    pub fn direction(&self) -> PolarLensPosition {
        self.direction
    }

    /// Current lens positions, `basis_samples` long.
    pub fn intrinsics(&self) -> PureResult<Vec<f32>> {
        let soft = isigmoid(self.basis.value());
        let shaped = irfft(&soft, -1, Some(self.config.basis_samples), FftNorm::Ortho)?;
        let sign = self.direction.sign();
        Ok(shaped.iter().map(|&v| v * sign).collect())
    }
}

impl KnowledgeFilter for PolarLens {
    fn output_samples(&self) -> Option<usize> {
        Some(self.config.samples)
    }

    fn filter_core(&self, x: &CTensor) -> PureResult<CTensor> {
        lens(x, &self.intrinsics()?, self.config.padding, -1)
    }
}

impl Module for PolarLens {
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        self.filter(input)
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&self.basis)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        visitor(&mut self.basis)
    }
}

/// Joint direction of an [`InterferringLens`]: bit 0 selects north/south,
/// bit 1 west/east.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterferringLensPosition {
    #[default]
    NSWE = 0b00,
    SNWE = 0b01,
    NSEW = 0b10,
    SNEW = 0b11,
}

impl InterferringLensPosition {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => InterferringLensPosition::NSWE,
            0b01 => InterferringLensPosition::SNWE,
            0b10 => InterferringLensPosition::NSEW,
            _ => InterferringLensPosition::SNEW,
        }
    }
}

/// Two polar lenses whose views are combined as an outer product,
/// `[..., S] x [..., S] -> [..., S, S]`.
#[derive(Debug)]
pub struct InterferringLens {
    north_south: PolarLens,
    west_east: PolarLens,
}

impl InterferringLens {
    pub fn new(name: impl Into<String>, config: PolarLensConfig) -> PureResult<Self> {
        let name = name.into();
        Ok(Self {
            north_south: PolarLens::new(format!("{name}::ns"), config)?,
            west_east: PolarLens::new(format!("{name}::we"), config)?,
        })
    }

    pub fn set_direction(&mut self, direction: InterferringLensPosition) {
        let bits = direction as u8;
        self.north_south.set_direction(PolarLensPosition::from_bit(bits));
        self.west_east.set_direction(PolarLensPosition::from_bit(bits >> 1));
    }

    pub fn direction(&self) -> InterferringLensPosition {
        InterferringLensPosition::from_bits(
            self.north_south.direction().bit() | (self.west_east.direction().bit() << 1),
        )
    }
}

impl KnowledgeCollider for InterferringLens {
    fn collide_core(&self, a: &CTensor, b: &CTensor) -> PureResult<CTensor> {
        let la = self.north_south.filter(a)?;
        let lb = self.west_east.filter(b)?;
        if la.shape() != lb.shape() {
            return Err(TensorError::shape_mismatch(la.shape(), lb.shape()));
        }
        let last = la.ndim() - 1;
        let column = la.insert_axis(Axis(last + 1));
        let row = lb.insert_axis(Axis(last));
        Ok(&column * &row)
    }
}

impl Module for InterferringLens {
    /// Collides the input with itself.
    fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
        self.collide(input, input)
    }

    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        self.north_south.visit_parameters(visitor)?;
        self.west_east.visit_parameters(visitor)
    }

    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()> {
        self.north_south.visit_parameters_mut(visitor)?;
        self.west_east.visit_parameters_mut(visitor)
    }
}
