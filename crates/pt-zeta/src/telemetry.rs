// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Convergence telemetry for the damped zeta evaluators.

use pt_tensor::{emit_signal_event, SignalEvent};
use tracing::{event, Level};

/// Summary of a convergent evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvergenceReport {
    kernel: &'static str,
    elements: usize,
    iterations: usize,
    active: usize,
}

impl ConvergenceReport {
    pub(crate) fn new(kernel: &'static str, elements: usize, iterations: usize, active: usize) -> Self {
        Self {
            kernel,
            elements,
            iterations,
            active,
        }
    }

    pub fn kernel(&self) -> &'static str {
        self.kernel
    }

    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Update steps taken by the slowest element.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Elements still above `aeps` when the iteration cap was reached.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn converged(&self) -> bool {
        self.active == 0
    }

    /// Logs the report and hands it to the installed signal observers.
    pub(crate) fn emit(&self) {
        emit_signal_event(&SignalEvent::Convergence {
            kernel: self.kernel,
            elements: self.elements,
            iterations: self.iterations,
            active: self.active,
        });
        if self.converged() {
            event!(
                target: "plasmatorch::zeta",
                Level::DEBUG,
                kernel = %self.kernel,
                elements = self.elements,
                iterations = self.iterations,
                "series converged"
            );
        } else {
            event!(
                target: "plasmatorch::zeta",
                Level::WARN,
                kernel = %self.kernel,
                elements = self.elements,
                iterations = self.iterations,
                active = self.active,
                "series hit the iteration cap"
            );
        }
    }
}
