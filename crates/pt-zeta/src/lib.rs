// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Hurwitz zeta and Lerch transcendent evaluated as damped running sums.
//!
//! Every step folds the next series term into the previous value scaled by
//! `ε = isigmoid(residual)`: `r ← term(n) + ε·r`. The convergent forms stop
//! per element once `|r|` falls under `aeps`; the sampled forms keep every
//! step as a sample along a new trailing axis.

mod config;
mod kernel;
pub mod hurwitz;
pub mod lerch;
pub mod telemetry;

pub use config::{ZetaConfig, ZetaSeriesConfig};
pub use hurwitz::{hzetae, hzetae_report, hzetas};
pub use lerch::{lerche, lerche_report, lerchs};
pub use telemetry::ConvergenceReport;
