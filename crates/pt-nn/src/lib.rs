// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Parameterised signal layers.
//!
//! Layers consume complex signals shaped `[..., samples]` and implement
//! [`Module`]. Only forward evaluation is provided; parameters are exposed
//! through visitors so an external optimiser can update them in place.

pub mod attention;
pub mod defaults;
pub mod entangle;
pub mod knot;
pub mod knowledge;
pub mod lens;
pub mod module;
pub mod observers;

pub use attention::{FinalEntangle, Turbulence, TurbulenceConfig};
pub use entangle::{Entangle, EntangleConfig, EntangleOutput, EntangleOutputMode};
pub use knot::{Knot, KnotConfig};
pub use knowledge::{KnowledgeCollider, KnowledgeFilter};
pub use lens::{
    lens, InterferringLens, InterferringLensPosition, PolarLens, PolarLensConfig,
    PolarLensPosition,
};
pub use module::{Module, Parameter};
pub use observers::{ComplexObserver, RealObserver, Smear, SmearConfig};
pub use pt_tensor::{CTensor, PureResult, RTensor, TensorError};
