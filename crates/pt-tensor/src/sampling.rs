// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! 2-D grid sampling over `[N, C, H, W]` planes.
//!
//! Coordinates in the grid are normalised to `[-1, 1]` with `x` indexing the
//! width and `y` the height. Interpolation, padding and corner alignment follow
//! the conventions of `grid_sample` in the mainstream tensor libraries so
//! warps learned there transfer unchanged.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex32;
use rayon::prelude::*;
use tracing::trace;

use crate::conversions::{from_parts, imag_part, real_part};
use crate::error::{PureResult, TensorError};
use crate::observability::emit_tensor_op;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridInterpolation {
    #[default]
    Bilinear,
    Nearest,
    Bicubic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridPadding {
    #[default]
    Zeros,
    Border,
    Reflection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridSampleOptions {
    pub mode: GridInterpolation,
    pub padding: GridPadding,
    pub align_corners: bool,
}

const CUBIC_A: f32 = -0.75;

#[inline]
fn unnormalize(coord: f32, size: usize, align_corners: bool) -> f32 {
    if align_corners {
        (coord + 1.0) * 0.5 * (size as f32 - 1.0)
    } else {
        ((coord + 1.0) * size as f32 - 1.0) * 0.5
    }
}

#[inline]
fn clip(coord: f32, size: usize) -> f32 {
    coord.max(0.0).min(size as f32 - 1.0)
}

fn reflect(coord: f32, twice_low: i64, twice_high: i64) -> f32 {
    if twice_low == twice_high {
        return 0.0;
    }
    let min = twice_low as f32 * 0.5;
    let span = (twice_high - twice_low) as f32 * 0.5;
    let coord = (coord - min).abs();
    let extra = coord % span;
    let flips = (coord / span).floor() as i64;
    if flips % 2 == 0 {
        extra + min
    } else {
        span - extra + min
    }
}

#[inline]
fn apply_padding(coord: f32, size: usize, padding: GridPadding, align_corners: bool) -> f32 {
    match padding {
        GridPadding::Zeros => coord,
        GridPadding::Border => clip(coord, size),
        GridPadding::Reflection => {
            let reflected = if align_corners {
                reflect(coord, 0, 2 * (size as i64 - 1))
            } else {
                reflect(coord, -1, 2 * size as i64 - 1)
            };
            clip(reflected, size)
        }
    }
}

#[inline]
fn cubic_near(x: f32) -> f32 {
    ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0
}

#[inline]
fn cubic_far(x: f32) -> f32 {
    ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A
}

fn cubic_coefficients(t: f32) -> [f32; 4] {
    [cubic_far(t + 1.0), cubic_near(t), cubic_near(1.0 - t), cubic_far(2.0 - t)]
}

struct Plane<'a> {
    data: &'a [f32],
    height: usize,
    width: usize,
}

impl Plane<'_> {
    #[inline]
    fn get(&self, y: i64, x: i64) -> f32 {
        if y < 0 || x < 0 || y >= self.height as i64 || x >= self.width as i64 {
            0.0
        } else {
            self.data[y as usize * self.width + x as usize]
        }
    }

    fn sample(&self, gx: f32, gy: f32, opts: &GridSampleOptions) -> f32 {
        match opts.mode {
            GridInterpolation::Bilinear => {
                let ix = apply_padding(
                    unnormalize(gx, self.width, opts.align_corners),
                    self.width,
                    opts.padding,
                    opts.align_corners,
                );
                let iy = apply_padding(
                    unnormalize(gy, self.height, opts.align_corners),
                    self.height,
                    opts.padding,
                    opts.align_corners,
                );
                let x0 = ix.floor();
                let y0 = iy.floor();
                let (tx, ty) = (ix - x0, iy - y0);
                let (x0, y0) = (x0 as i64, y0 as i64);
                self.get(y0, x0) * (1.0 - tx) * (1.0 - ty)
                    + self.get(y0, x0 + 1) * tx * (1.0 - ty)
                    + self.get(y0 + 1, x0) * (1.0 - tx) * ty
                    + self.get(y0 + 1, x0 + 1) * tx * ty
            }
            GridInterpolation::Nearest => {
                let ix = apply_padding(
                    unnormalize(gx, self.width, opts.align_corners),
                    self.width,
                    opts.padding,
                    opts.align_corners,
                );
                let iy = apply_padding(
                    unnormalize(gy, self.height, opts.align_corners),
                    self.height,
                    opts.padding,
                    opts.align_corners,
                );
                self.get(iy.round_ties_even() as i64, ix.round_ties_even() as i64)
            }
            GridInterpolation::Bicubic => {
                // Padding is applied per tap, not to the source coordinate.
                let ix = unnormalize(gx, self.width, opts.align_corners);
                let iy = unnormalize(gy, self.height, opts.align_corners);
                let x0 = ix.floor();
                let y0 = iy.floor();
                let cx = cubic_coefficients(ix - x0);
                let cy = cubic_coefficients(iy - y0);
                let mut acc = 0.0f32;
                for (j, wy) in cy.iter().enumerate() {
                    let ty = y0 - 1.0 + j as f32;
                    let mut row = 0.0f32;
                    for (i, wx) in cx.iter().enumerate() {
                        let tx = x0 - 1.0 + i as f32;
                        let px = apply_padding(tx, self.width, opts.padding, opts.align_corners);
                        let py = apply_padding(ty, self.height, opts.padding, opts.align_corners);
                        row += self.get(py as i64, px as i64) * wx;
                    }
                    acc += row * wy;
                }
                acc
            }
        }
    }
}

/// Samples `input` (`[N, C, H, W]`) at the locations in `grid`
/// (`[N, Ho, Wo, 2]`), producing `[N, C, Ho, Wo]`.
pub fn grid_sample(
    input: &ArrayD<f32>,
    grid: &ArrayD<f32>,
    opts: GridSampleOptions,
) -> PureResult<ArrayD<f32>> {
    if input.ndim() != 4 {
        return Err(TensorError::Rank {
            label: "grid_sample input",
            expected: 4,
            got: input.ndim(),
        });
    }
    if grid.ndim() != 4 {
        return Err(TensorError::Rank {
            label: "grid_sample grid",
            expected: 4,
            got: grid.ndim(),
        });
    }
    let (n, c, h, w) = (
        input.shape()[0],
        input.shape()[1],
        input.shape()[2],
        input.shape()[3],
    );
    let (gn, ho, wo, pair) = (
        grid.shape()[0],
        grid.shape()[1],
        grid.shape()[2],
        grid.shape()[3],
    );
    if gn != n || pair != 2 {
        return Err(TensorError::shape_mismatch(input.shape(), grid.shape()));
    }
    if h == 0 || w == 0 {
        return Err(TensorError::EmptyInput("grid_sample plane"));
    }

    let input = input.as_standard_layout();
    let grid = grid.as_standard_layout();
    let data = input
        .as_slice()
        .ok_or(TensorError::InvalidValue { label: "grid_sample input layout" })?;
    let coords = grid
        .as_slice()
        .ok_or(TensorError::InvalidValue { label: "grid_sample grid layout" })?;

    let plane_out = ho * wo;
    let mut out = vec![0.0f32; n * c * plane_out];
    let fill = |(p, dst): (usize, &mut [f32])| {
        let batch = p / c.max(1);
        let plane = Plane {
            data: &data[p * h * w..(p + 1) * h * w],
            height: h,
            width: w,
        };
        let batch_grid = &coords[batch * plane_out * 2..(batch + 1) * plane_out * 2];
        for (o, xy) in dst.iter_mut().zip(batch_grid.chunks_exact(2)) {
            *o = plane.sample(xy[0], xy[1], &opts);
        }
    };
    if plane_out > 0 {
        if pt_config::determinism::lock_reduction_order() {
            out.chunks_mut(plane_out).enumerate().for_each(fill);
        } else {
            out.par_chunks_mut(plane_out).enumerate().for_each(fill);
        }
    }

    let out = ArrayD::from_shape_vec(IxDyn(&[n, c, ho, wo]), out)
        .map_err(|_| TensorError::InvalidValue { label: "grid_sample output" })?;
    trace!(
        target: "plasmatorch::tensor::sampling",
        planes = n * c,
        mode = ?opts.mode,
        padding = ?opts.padding,
        "grid sampled"
    );
    emit_tensor_op("grid_sample", &[n, c, h, w], out.shape());
    Ok(out)
}

/// Samples the real plane of `input` with the real plane of `grid` and the
/// imaginary plane with the imaginary grid, then recombines them.
pub fn grid_sample_complex(
    input: &ArrayD<Complex32>,
    grid: &ArrayD<Complex32>,
    opts: GridSampleOptions,
) -> PureResult<ArrayD<Complex32>> {
    let re = grid_sample(&real_part(input), &real_part(grid), opts)?;
    let im = grid_sample(&imag_part(input), &imag_part(grid), opts)?;
    from_parts(&re, &im)
}
