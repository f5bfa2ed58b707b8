// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pt_tensor::{CTensor, PureResult, TensorError};

/// Named complex tensor owned by a layer.
#[derive(Clone)]
pub struct Parameter {
    name: String,
    value: CTensor,
}

impl core::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Parameter(name={},shape={:?})", self.name, self.value.shape())
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: CTensor) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CTensor {
        &self.value
    }

    /// Mutable access for in-place updates. The shape must be preserved.
    pub fn value_mut(&mut self) -> &mut CTensor {
        &mut self.value
    }

    /// Replaces the value, rejecting tensors of a different shape.
    pub fn assign(&mut self, value: CTensor) -> PureResult<()> {
        if value.shape() != self.value.shape() {
            return Err(TensorError::shape_mismatch(self.value.shape(), value.shape()));
        }
        self.value = value;
        Ok(())
    }

    pub fn numel(&self) -> usize {
        self.value.len()
    }
}

/// Forward-only layer with visitable parameters.
pub trait Module {
    /// Runs a forward pass.
    fn forward(&self, input: &CTensor) -> PureResult<CTensor>;

    /// Visits immutable parameters.
    fn visit_parameters(
        &self,
        visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
    ) -> PureResult<()>;

    /// Visits mutable parameters.
    fn visit_parameters_mut(
        &mut self,
        visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
    ) -> PureResult<()>;

    /// Total number of scalar entries across all parameters.
    fn parameter_count(&self) -> PureResult<usize> {
        let mut total = 0usize;
        self.visit_parameters(&mut |param| {
            total += param.numel();
            Ok(())
        })?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use num_complex::Complex32;

    struct Scale {
        gain: Parameter,
    }

    impl Module for Scale {
        fn forward(&self, input: &CTensor) -> PureResult<CTensor> {
            let g = self.gain.value()[[0]];
            Ok(input.mapv(|v| v * g))
        }

        fn visit_parameters(
            &self,
            visitor: &mut dyn FnMut(&Parameter) -> PureResult<()>,
        ) -> PureResult<()> {
            visitor(&self.gain)
        }

        fn visit_parameters_mut(
            &mut self,
            visitor: &mut dyn FnMut(&mut Parameter) -> PureResult<()>,
        ) -> PureResult<()> {
            visitor(&mut self.gain)
        }
    }

    #[test]
    fn visitors_reach_parameters() {
        let mut layer = Scale {
            gain: Parameter::new(
                "scale::gain",
                ArrayD::from_elem(IxDyn(&[1]), Complex32::new(2.0, 0.0)),
            ),
        };
        assert_eq!(layer.parameter_count().unwrap(), 1);
        layer
            .visit_parameters_mut(&mut |param| {
                param.value_mut().mapv_inplace(|v| v * 0.5);
                Ok(())
            })
            .unwrap();
        let x = ArrayD::from_elem(IxDyn(&[3]), Complex32::new(1.0, 1.0));
        assert_eq!(layer.forward(&x).unwrap(), x);
    }

    #[test]
    fn assign_checks_shape() {
        let mut p = Parameter::new("p", ArrayD::zeros(IxDyn(&[2])));
        assert!(p.assign(ArrayD::zeros(IxDyn(&[3]))).is_err());
        assert!(p.assign(ArrayD::zeros(IxDyn(&[2]))).is_ok());
        assert_eq!(format!("{p:?}"), "Parameter(name=p,shape=[2])");
    }
}
