// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::error::{PureResult, TensorError};

/// Resolves a possibly negative axis against a tensor rank.
pub fn resolve_axis(ndim: usize, axis: isize) -> PureResult<usize> {
    let resolved = if axis < 0 {
        ndim as isize + axis
    } else {
        axis
    };
    if resolved < 0 || resolved >= ndim as isize {
        return Err(TensorError::AxisOutOfRange { axis, ndim });
    }
    Ok(resolved as usize)
}

/// Computes the shape two operands broadcast to under NumPy rules.
pub fn co_broadcast(left: &[usize], right: &[usize]) -> PureResult<Vec<usize>> {
    let rank = left.len().max(right.len());
    let mut shape = vec![0usize; rank];
    for i in 0..rank {
        let l = if i + left.len() >= rank {
            left[i + left.len() - rank]
        } else {
            1
        };
        let r = if i + right.len() >= rank {
            right[i + right.len() - rank]
        } else {
            1
        };
        shape[i] = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(TensorError::Broadcast {
                    left: left.to_vec(),
                    right: right.to_vec(),
                })
            }
        };
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_axes_count_from_the_end() {
        assert_eq!(resolve_axis(3, -1).unwrap(), 2);
        assert_eq!(resolve_axis(3, 0).unwrap(), 0);
        assert!(matches!(
            resolve_axis(3, -4),
            Err(TensorError::AxisOutOfRange { axis: -4, ndim: 3 })
        ));
        assert!(resolve_axis(2, 2).is_err());
    }

    #[test]
    fn broadcasting_follows_numpy_rules() {
        assert_eq!(co_broadcast(&[4, 1, 3], &[5, 1]).unwrap(), vec![4, 5, 3]);
        assert_eq!(co_broadcast(&[], &[2, 2]).unwrap(), vec![2, 2]);
        assert!(co_broadcast(&[2, 3], &[4, 3]).is_err());
    }
}
