// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Default hyper-parameters shared by the layer configs.

pub const DEFAULT_FFT_SAMPLES: usize = 128;
pub const DEFAULT_SPACE_PRIME: usize = 11;

/// Primes dividing the order of the Monster group, ascending.
pub const SUPERSINGULAR_PRIMES_LH: [usize; 15] =
    [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 41, 47, 59, 71];
/// [`SUPERSINGULAR_PRIMES_LH`] in descending order.
pub const SUPERSINGULAR_PRIMES_HL: [usize; 15] =
    [71, 59, 47, 41, 31, 29, 23, 19, 17, 13, 11, 7, 5, 3, 2];

/// Dimension of the Griess algebra, the smallest faithful Monster representation.
pub const GREISS_SAMPLES: usize = 196_884;

pub const DEFAULT_SIGNAL_LENS_SAMPLES: usize = SUPERSINGULAR_PRIMES_HL[0];
pub const DEFAULT_SIGNAL_LENS_PADDING: usize = SUPERSINGULAR_PRIMES_LH[3];
