// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Result alias used throughout the PlasmaTorch crates.
pub type PureResult<T> = Result<T, TensorError>;

/// Errors emitted by tensor kernels and the modules built on them.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TensorError {
    #[error("axis {axis} is out of range for a tensor of rank {ndim}")]
    AxisOutOfRange { axis: isize, ndim: usize },
    #[error("shape mismatch: left={left:?}, right={right:?} cannot be combined")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("{label} expects a rank-{expected} tensor, got rank {got}")]
    Rank {
        label: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0} must not be empty for this computation")]
    EmptyInput(&'static str),
    #[error("invalid value for {label}")]
    InvalidValue { label: &'static str },
    #[error("{mode} padding of {pad} needs an axis longer than the pad, got {len}")]
    PaddingTooWide {
        mode: &'static str,
        pad: usize,
        len: usize,
    },
    #[error("shapes {left:?} and {right:?} do not broadcast")]
    Broadcast { left: Vec<usize>, right: Vec<usize> },
}

impl TensorError {
    pub fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        TensorError::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}
