// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex32;
use pt_nn::{
    lens, ComplexObserver, InterferringLens, InterferringLensPosition, KnowledgeCollider,
    KnowledgeFilter, Module, PolarLens, PolarLensConfig, PolarLensPosition, RealObserver, Smear,
    SmearConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

fn random_signal(shape: &[usize], seed: u64) -> ArrayD<Complex32> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        Complex32::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
    })
}

fn lens_config() -> PolarLensConfig {
    PolarLensConfig {
        samples: 11,
        padding: 3,
        basis_samples: 64,
    }
}

#[test]
fn straight_lens_reproduces_the_signal() {
    let x = random_signal(&[2, 7], 1);
    // Positions that land exactly on the unpadded samples.
    let padded = 7.0 + 2.0 * 3.0;
    let positions: Vec<f32> = (0..7)
        .map(|k| (2.0 * (k as f32 + 3.0) / (padded - 1.0) - 1.0) * padded / 7.0)
        .collect();
    let out = lens(&x, &positions, 3, -1).expect("lens");
    for (a, b) in out.iter().zip(x.iter()) {
        assert!((a - b).norm() < 1e-4, "{a} vs {b}");
    }
}

#[test]
fn learned_lenses_resize_to_their_sample_count() {
    let mut polar = PolarLens::new("polar", lens_config()).expect("polar lens");
    polar
        .visit_parameters_mut(&mut |p| {
            let mut rng = StdRng::seed_from_u64(3);
            p.value_mut().mapv_inplace(|_| {
                Complex32::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
            });
            Ok(())
        })
        .expect("randomise basis");
    let x = random_signal(&[3, 40], 2);
    let ns = polar.filter(&x).expect("ns");
    polar.set_direction(PolarLensPosition::SN);
    let sn = polar.filter(&x).expect("sn");
    assert_eq!(ns.shape(), &[3, 11]);
    assert_eq!(sn.shape(), &[3, 11]);
    assert!(ns.iter().chain(sn.iter()).all(|v| v.re.is_finite() && v.im.is_finite()));

    let mut prism = InterferringLens::new("prism", lens_config()).expect("interferring lens");
    prism.set_direction(InterferringLensPosition::SNEW);
    assert_eq!(prism.direction(), InterferringLensPosition::SNEW);
    let out = prism
        .collide(&x, &random_signal(&[3, 25], 4))
        .expect("collide");
    assert_eq!(out.shape(), &[3, 11, 11]);
}

#[test]
fn observers_and_smear_compose() {
    let smear = Smear::new(SmearConfig {
        samples: 8,
        ..SmearConfig::default()
    })
    .expect("smear");
    let x = random_signal(&[4, 1], 5);
    let spread = smear.forward(&x).expect("smear forward");
    assert_eq!(spread.shape(), &[4, 8]);

    let complex = ComplexObserver::new("co", 8).expect("complex observer");
    let real = RealObserver::new("ro", 8).expect("real observer");
    let seen = real.observe(&complex.forward(&spread).expect("rotate")).expect("observe");
    for (r, z) in seen.iter().zip(spread.iter()) {
        assert!((r - z.re).abs() < 1e-6);
    }
}
