// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, Axis, IxDyn};
use pt_math::{
    imagnitude, ipolarization, iprimishdist, isigmoid, isoftmax, nsoftmax, Complex32, PI,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn random_signal(shape: &[usize], seed: u64) -> ArrayD<Complex32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0f32, 2.0).unwrap();
    ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        Complex32::new(normal.sample(&mut rng), normal.sample(&mut rng))
    })
}

#[test]
fn complex_softmax_lanes_are_distributions() {
    let x = random_signal(&[3, 4, 9], 7);
    for axis in [-1isize, 0, 1] {
        let s = isoftmax(&x, axis).unwrap();
        let ax = if axis < 0 { 2 } else { axis as usize };
        for lane in imagnitude(&s).lanes(Axis(ax)) {
            assert!((lane.sum() - 1.0).abs() < 1e-5, "axis {axis}: {}", lane.sum());
        }
    }
}

#[test]
fn multi_axis_softmax_stays_bounded() {
    let x = random_signal(&[5, 6], 11);
    let s = nsoftmax(&x, &[0, -1]).unwrap();
    for m in imagnitude(&s).iter() {
        assert!(*m > 0.0 && *m <= 1.0);
    }
}

#[test]
fn sigmoid_lands_in_first_quadrant_with_unit_bounded_magnitude() {
    let x = random_signal(&[64], 3);
    let s = isigmoid(&x);
    for (z, p) in s.iter().zip(ipolarization(&s).iter()) {
        assert!(z.norm() > 0.0 && z.norm() < 1.0);
        assert!(*p >= 0.0 && *p <= PI / 2.0 + 1e-6);
    }
}

#[test]
fn primish_distance_is_non_negative_off_the_negative_axis() {
    let x = random_signal(&[32], 5).mapv(|z| Complex32::new(z.re.abs() * 8.0, z.im.abs() * 8.0));
    for d in iprimishdist(&x, false).iter() {
        assert!(d.is_finite() && *d >= 0.0);
    }
}
