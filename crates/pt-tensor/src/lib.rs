// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Signal tensors for PlasmaTorch.
//!
//! Everything operates on dynamic-rank `ndarray` arrays of `f32` or
//! [`Complex32`]. Axes are addressed with signed indices so `-1` always means
//! the sample axis, matching how the layers in `pt-nn` are written.

pub mod axis;
pub mod conversions;
pub mod error;
pub mod fft;
pub mod observability;
pub mod sampling;
pub mod sizing;

use ndarray::ArrayD;
pub use num_complex::Complex32;

pub use axis::{co_broadcast, resolve_axis};
pub use conversions::{from_parts, imag_part, nantonum, nantonum_real, real_part, to_complex};
pub use error::{PureResult, TensorError};
pub use fft::{fft, fft_with_norm, ifft, ifft_with_norm, irfft, FftNorm};
pub use observability::{
    emit_signal_event, emit_tensor_op, observe_signals, ObserverGuard, SignalEvent, SignalObserver,
};
pub use sampling::{
    grid_sample, grid_sample_complex, GridInterpolation, GridPadding, GridSampleOptions,
};
pub use sizing::{
    paddim, resample_continuous, resignal, resignal_real, weighted_resample, PadMode,
};

/// Complex signal tensor.
pub type CTensor = ArrayD<Complex32>;

/// Real signal tensor.
pub type RTensor = ArrayD<f32>;
