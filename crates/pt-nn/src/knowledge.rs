// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Layers that read a signal at one resolution and answer at another.

use pt_tensor::{resignal, CTensor, PureResult};

fn resize(x: CTensor, samples: Option<usize>) -> PureResult<CTensor> {
    match samples {
        Some(samples) if x.ndim() > 0 && x.shape()[x.ndim() - 1] != samples => {
            resignal(&x, samples, -1)
        }
        _ => Ok(x),
    }
}

/// Single-input knowledge layer. Inputs are resignalled to
/// [`input_samples`](Self::input_samples) before [`filter_core`](Self::filter_core)
/// and outputs to [`output_samples`](Self::output_samples) after it.
pub trait KnowledgeFilter {
    fn input_samples(&self) -> Option<usize> {
        None
    }

    fn output_samples(&self) -> Option<usize> {
        None
    }

    fn filter_core(&self, x: &CTensor) -> PureResult<CTensor>;

    fn filter(&self, x: &CTensor) -> PureResult<CTensor> {
        let x = resize(x.clone(), self.input_samples())?;
        let y = self.filter_core(&x)?;
        resize(y, self.output_samples())
    }
}

/// Two-input counterpart of [`KnowledgeFilter`].
pub trait KnowledgeCollider {
    fn input_samples(&self) -> Option<usize> {
        None
    }

    fn output_samples(&self) -> Option<usize> {
        None
    }

    fn collide_core(&self, a: &CTensor, b: &CTensor) -> PureResult<CTensor>;

    fn collide(&self, a: &CTensor, b: &CTensor) -> PureResult<CTensor> {
        let a = resize(a.clone(), self.input_samples())?;
        let b = resize(b.clone(), self.input_samples())?;
        let y = self.collide_core(&a, &b)?;
        resize(y, self.output_samples())
    }
}
