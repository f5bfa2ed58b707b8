// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::ArrayD;
use num_complex::Complex32;
use pt_tensor::PureResult;

use crate::config::{ZetaConfig, ZetaSeriesConfig};
use crate::kernel::{broadcast_all, converge, sample, SeriesTerm};
use crate::telemetry::ConvergenceReport;

#[derive(Clone, Copy, Debug)]
pub(crate) struct HurwitzTerm {
    pub(crate) s: Complex32,
    pub(crate) a: Complex32,
}

impl SeriesTerm for HurwitzTerm {
    #[inline]
    fn term(&self, n: usize) -> Complex32 {
        (self.a + n as f32).powc(-self.s)
    }
}

fn hurwitz_series(
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
) -> PureResult<(Vec<usize>, Vec<HurwitzTerm>)> {
    let (shape, views) = broadcast_all(&[s, a])?;
    let series = views[0]
        .iter()
        .zip(views[1].iter())
        .map(|(&s, &a)| HurwitzTerm { s, a })
        .collect();
    Ok((shape, series))
}

/// Damped Hurwitz zeta `Σ (n + a)^-s`, iterated per element until the running
/// value falls below `cfg.aeps`. `s` and `a` broadcast together.
pub fn hzetae(
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaConfig,
) -> PureResult<ArrayD<Complex32>> {
    hzetae_report(s, a, cfg).map(|(values, _)| values)
}

/// [`hzetae`] that also returns how the iteration went.
pub fn hzetae_report(
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaConfig,
) -> PureResult<(ArrayD<Complex32>, ConvergenceReport)> {
    let (shape, series) = hurwitz_series(s, a)?;
    converge("hzetae", &shape, series, cfg)
}

/// Damped Hurwitz zeta recorded step by step along a trailing axis of
/// `cfg.samples`.
pub fn hzetas(
    s: &ArrayD<Complex32>,
    a: &ArrayD<Complex32>,
    cfg: &ZetaSeriesConfig,
) -> PureResult<ArrayD<Complex32>> {
    let (shape, series) = hurwitz_series(s, a)?;
    sample(&shape, series, cfg)
}
