// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use num_complex::Complex32;

pub const PI: f32 = std::f32::consts::PI;
pub const TAU: f32 = std::f32::consts::TAU;
/// Euler–Mascheroni constant γ.
pub const EGAMMA: f32 = 0.577_215_66;
/// Golden ratio φ.
pub const PHI: f32 = 1.618_034;

/// Inverse logistic of `φ - 1`, i.e. `σ(asigphi()) = 1/φ`.
pub fn asigphi() -> f32 {
    -(PHI - 1.0).ln()
}

/// The imaginary unit.
pub fn i() -> Complex32 {
    Complex32::i()
}
