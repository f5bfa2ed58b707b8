// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Elementwise math kernels that treat complex values in polar form.
//!
//! Each activation accepts real (`f32`) or complex ([`Complex32`]) tensors
//! through the [`IScalar`] trait. Real inputs reduce to the ordinary
//! function (softmax, logistic, cos, ...), complex inputs act on the magnitude
//! and carry the phase through.

pub mod activations;
pub mod consts;
pub mod primes;
pub mod scalar;
pub mod series;

pub use activations::{icos, imagnitude, ipolarization, isigmoid, isin, isoftmax, nsoftmax};
pub use consts::{asigphi, i, EGAMMA, PHI, PI, TAU};
pub use primes::{gaussianprimishdist, iprimishdist, primishvals, realprimishdist};
pub use pt_tensor::{Complex32, PureResult, TensorError};
pub use scalar::IScalar;
pub use series::{harmonicdist, harmonicvals, hmean, lattice_params, xbias};
