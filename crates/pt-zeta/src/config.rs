// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use num_complex::Complex32;
use pt_math::{asigphi, IScalar};

/// Settings for the convergent evaluators ([`crate::hzetae`], [`crate::lerche`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZetaConfig {
    /// Pre-activation of the decay; `isigmoid(residual)` scales the running
    /// value each step. The default gives `ε = 1/φ`.
    pub residual: Complex32,
    /// Elements whose running value drops under this magnitude stop updating.
    pub aeps: f32,
    /// Upper bound on the term index.
    pub max_iter: usize,
}

impl ZetaConfig {
    pub(crate) fn decay(&self) -> Complex32 {
        self.residual.isigmoid()
    }
}

impl Default for ZetaConfig {
    fn default() -> Self {
        Self {
            residual: Complex32::new(asigphi(), 0.0),
            aeps: 1e-4,
            max_iter: 1024,
        }
    }
}

/// Settings for the sampled evaluators ([`crate::hzetas`], [`crate::lerchs`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZetaSeriesConfig {
    pub residual: Complex32,
    /// Steps folded into the first sample before recording starts.
    pub blank_samples: usize,
    /// Length of the trailing sample axis.
    pub samples: usize,
    /// Remove the drift between the first and last sample so the series
    /// wraps cleanly under an FFT.
    pub fft_format: bool,
}

impl ZetaSeriesConfig {
    pub(crate) fn decay(&self) -> Complex32 {
        self.residual.isigmoid()
    }
}

impl Default for ZetaSeriesConfig {
    fn default() -> Self {
        Self {
            residual: Complex32::new(asigphi(), 0.0),
            blank_samples: 0,
            samples: 128,
            fft_format: true,
        }
    }
}
