// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Scoped observers for signal operations.
//!
//! Every PlasmaTorch crate reports through here: the FFTs, resignalling and
//! grid sampling in this crate, the lens and layer passes in `pt-nn`, and the
//! convergence reports of the zeta evaluators. Observers are registered with
//! [`observe_signals`] and stay installed until the returned guard drops.

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Something a signal operation wants to tell observers about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalEvent<'a> {
    /// An operation mapped a tensor of shape `input` to one of shape `output`.
    Op {
        name: &'static str,
        input: &'a [usize],
        output: &'a [usize],
    },
    /// A convergent series evaluation finished. `active` elements were still
    /// above tolerance when it stopped.
    Convergence {
        kernel: &'static str,
        elements: usize,
        iterations: usize,
        active: usize,
    },
}

impl SignalEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            SignalEvent::Op { name, .. } => name,
            SignalEvent::Convergence { kernel, .. } => kernel,
        }
    }
}

pub type SignalObserver = Arc<dyn Fn(&SignalEvent<'_>) + Send + Sync + 'static>;

static OBSERVERS: RwLock<Vec<(u64, SignalObserver)>> = RwLock::new(Vec::new());
static INSTALLED: AtomicUsize = AtomicUsize::new(0);
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static DISPATCH_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Keeps an observer installed; dropping it removes the observer.
#[must_use = "the observer is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ObserverGuard {
    id: u64,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        let mut observers = match OBSERVERS.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = observers.len();
        observers.retain(|(id, _)| *id != self.id);
        if observers.len() < before {
            INSTALLED.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Installs `observer` for every signal event emitted on any thread.
pub fn observe_signals<F>(observer: F) -> ObserverGuard
where
    F: Fn(&SignalEvent<'_>) + Send + Sync + 'static,
{
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut observers = match OBSERVERS.write() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    observers.push((id, Arc::new(observer)));
    INSTALLED.fetch_add(1, Ordering::AcqRel);
    ObserverGuard { id }
}

// Marks the current thread as dispatching; events raised by an observer
// itself are dropped.
struct Dispatching;

impl Dispatching {
    fn enter() -> Option<Self> {
        DISPATCH_DEPTH.with(|depth| {
            if depth.get() > 0 {
                None
            } else {
                depth.set(1);
                Some(Dispatching)
            }
        })
    }
}

impl Drop for Dispatching {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(0));
    }
}

/// Sends `event` to every installed observer. A panicking observer is
/// contained and does not stop the others.
pub fn emit_signal_event(event: &SignalEvent<'_>) {
    if INSTALLED.load(Ordering::Acquire) == 0 {
        return;
    }
    let Some(_scope) = Dispatching::enter() else {
        return;
    };
    let observers: Vec<SignalObserver> = match OBSERVERS.read() {
        Ok(slot) => slot.iter().map(|(_, o)| Arc::clone(o)).collect(),
        Err(poisoned) => poisoned.into_inner().iter().map(|(_, o)| Arc::clone(o)).collect(),
    };
    for observer in observers {
        let _ = catch_unwind(AssertUnwindSafe(|| observer(event)));
    }
}

/// Reports a shape-mapping operation.
pub fn emit_tensor_op(name: &'static str, input: &[usize], output: &[usize]) {
    emit_signal_event(&SignalEvent::Op {
        name,
        input,
        output,
    });
}
