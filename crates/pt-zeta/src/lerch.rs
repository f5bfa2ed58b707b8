// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::ArrayD;
use num_complex::Complex32;
use pt_math::TAU;
use pt_tensor::PureResult;

use crate::config::{ZetaConfig, ZetaSeriesConfig};
use crate::hurwitz::HurwitzTerm;
use crate::kernel::{broadcast_all, converge, sample, SeriesTerm};
use crate::telemetry::ConvergenceReport;

#[derive(Clone, Copy, Debug)]
struct LerchTerm {
    lambda: Complex32,
    hurwitz: HurwitzTerm,
}

impl SeriesTerm for LerchTerm {
    #[inline]
    fn term(&self, n: usize) -> Complex32 {
        let phase = Complex32::i() * self.lambda * (TAU * n as f32);
        phase.exp() * self.hurwitz.term(n)
    }
}

fn lerch_series(
    lambda: &ArrayD<Complex32>,
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
) -> PureResult<(Vec<usize>, Vec<LerchTerm>)> {
    let (shape, views) = broadcast_all(&[lambda, s, a])?;
    let series = views[0]
        .iter()
        .zip(views[1].iter())
        .zip(views[2].iter())
        .map(|((&lambda, &s), &a)| LerchTerm {
            lambda,
            hurwitz: HurwitzTerm { s, a },
        })
        .collect();
    Ok((shape, series))
}

/// Damped Lerch transcendent `Σ e^{2πinλ} (n + a)^-s`; see [`crate::hzetae`].
pub fn lerche(
    lambda: &ArrayD<Complex32>,
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaConfig,
) -> PureResult<ArrayD<Complex32>> {
    lerche_report(lambda, s, a, cfg).map(|(values, _)| values)
}

pub fn lerche_report(
    lambda: &ArrayD<Complex32>,
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaConfig,
) -> PureResult<(ArrayD<Complex32>, ConvergenceReport)> {
    let (shape, series) = lerch_series(lambda, s, a)?;
    converge("lerche", &shape, series, cfg)
}

/// Sampled Lerch transcendent; see [`crate::hzetas`].
pub fn lerchs(
    lambda: &ArrayD<Complex32>,
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaSeriesConfig,
) -> PureResult<ArrayD<Complex32>> {
    let (shape, series) = lerch_series(lambda, s, a)?;
    sample(&shape, series, cfg)
}
