// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, IxDyn};
use pt_tensor::{
    fft, grid_sample, irfft, real_part, resignal, to_complex, Complex32, FftNorm,
    GridInterpolation, GridPadding, GridSampleOptions,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

fn random_real(shape: &[usize], seed: u64) -> ArrayD<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.sample(StandardNormal))
}

fn random_complex(shape: &[usize], seed: u64) -> ArrayD<Complex32> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        Complex32::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
    })
}

#[test]
fn real_spectrum_round_trips_through_irfft() {
    for len in [8usize, 9] {
        let x = random_real(&[3, len], 100 + len as u64);
        let spectrum = fft(&to_complex(&x), -1, None).expect("fft");
        let back = irfft(&spectrum, -1, Some(len), FftNorm::Backward).expect("irfft");
        for (a, b) in back.iter().zip(x.iter()) {
            assert!((a - b).abs() < 1e-4, "len {len}: {a} vs {b}");
        }
    }
}

#[test]
fn resignal_up_then_down_is_lossless() {
    for (len, up) in [(8usize, 16usize), (7, 21), (6, 9)] {
        let x = random_complex(&[2, len], len as u64);
        let wide = resignal(&x, up, -1).expect("up");
        assert_eq!(wide.shape(), &[2, up]);
        let back = resignal(&wide, len, -1).expect("down");
        for (a, b) in back.iter().zip(x.iter()) {
            assert!((a - b).norm() < 1e-4, "{len}->{up}: {a} vs {b}");
        }
    }
}

#[test]
fn identity_grid_reads_every_pixel() {
    let (h, w) = (4usize, 6usize);
    let input = random_real(&[2, 3, h, w], 9);
    let grid = ArrayD::from_shape_fn(IxDyn(&[2, h, w, 2]), |idx| {
        if idx[3] == 0 {
            -1.0 + 2.0 * idx[2] as f32 / (w - 1) as f32
        } else {
            -1.0 + 2.0 * idx[1] as f32 / (h - 1) as f32
        }
    });
    for mode in [
        GridInterpolation::Bilinear,
        GridInterpolation::Nearest,
        GridInterpolation::Bicubic,
    ] {
        let opts = GridSampleOptions {
            mode,
            padding: GridPadding::Border,
            align_corners: true,
        };
        let out = grid_sample(&input, &grid, opts).expect("grid_sample");
        for (a, b) in out.iter().zip(input.iter()) {
            assert!((a - b).abs() < 1e-4, "{mode:?}: {a} vs {b}");
        }
    }
}

#[test]
fn real_part_of_complexified_signal_is_identity() {
    let x = random_real(&[5, 4], 11);
    assert_eq!(real_part(&to_complex(&x)), x);
}
