// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use num_complex::Complex32;
use pt_tensor::{co_broadcast, resample_continuous, PureResult, TensorError};

use crate::config::{ZetaConfig, ZetaSeriesConfig};
use crate::telemetry::ConvergenceReport;

/// One element's series: `term(n)` for `n = 0, 1, 2, ...`.
pub(crate) trait SeriesTerm {
    fn term(&self, n: usize) -> Complex32;
}

/// Broadcasts the operands against each other.
pub(crate) fn broadcast_all<'a>(
    operands: &[&'a ArrayD<Complex32>],
) -> PureResult<(Vec<usize>, Vec<ArrayViewD<'a, Complex32>>)> {
    let mut shape: Vec<usize> = Vec::new();
    for operand in operands {
        shape = co_broadcast(&shape, operand.shape())?;
    }
    let views = operands
        .iter()
        .map(|operand| {
            operand
                .broadcast(IxDyn(&shape))
                .ok_or_else(|| TensorError::Broadcast {
                    left: operand.shape().to_vec(),
                    right: shape.clone(),
                })
        })
        .collect::<PureResult<Vec<_>>>()?;
    Ok((shape, views))
}

/// Runs every element until `|r| < aeps` or the term index reaches
/// `max_iter`. Converged elements keep their last value.
pub(crate) fn converge<S: SeriesTerm>(
    kernel: &'static str,
    shape: &[usize],
    series: Vec<S>,
    cfg: &ZetaConfig,
) -> PureResult<(ArrayD<Complex32>, ConvergenceReport)> {
    let eps = cfg.decay();
    let aeps = cfg.aeps.abs();
    let mut iterations = 0;
    let mut active = 0;
    let mut values = Vec::with_capacity(series.len());
    for element in &series {
        let mut r = element.term(0);
        let mut n = 1;
        while r.norm() >= aeps && n < cfg.max_iter {
            r = element.term(n) + eps * r;
            n += 1;
        }
        if r.norm() >= aeps {
            active += 1;
        }
        iterations = iterations.max(n - 1);
        values.push(r);
    }
    let out = ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|_| TensorError::InvalidValue { label: "zeta output" })?;
    let report = ConvergenceReport::new(kernel, series.len(), iterations, active);
    report.emit();
    Ok((out, report))
}

/// Records the running value at every step along a new trailing axis.
pub(crate) fn sample<S: SeriesTerm>(
    shape: &[usize],
    series: Vec<S>,
    cfg: &ZetaSeriesConfig,
) -> PureResult<ArrayD<Complex32>> {
    if cfg.samples == 0 {
        return Err(TensorError::InvalidValue { label: "zeta samples" });
    }
    let eps = cfg.decay();
    let mut out_shape = shape.to_vec();
    out_shape.push(cfg.samples);
    let mut out = ArrayD::<Complex32>::zeros(IxDyn(&out_shape));
    let last = out.ndim() - 1;

    for (mut lane, element) in out.lanes_mut(Axis(last)).into_iter().zip(series.iter()) {
        let mut r = element.term(0);
        for n in 1..=cfg.blank_samples {
            r = element.term(n) + eps * r;
        }
        lane[0] = r;
        for j in 1..cfg.samples {
            r = element.term(cfg.blank_samples + j) + eps * r;
            lane[j] = r;
        }
    }

    if cfg.fft_format {
        return resample_continuous(&out, -1, -1);
    }
    Ok(out)
}
