// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message types between the UI thread and the service worker.

use gomoku_core::{CallOutcome, ServiceCall, Ticket};

/// Messages sent from UI to the worker
#[derive(Debug, Clone)]
pub enum UiToWorker {
    /// Perform a service call on the controller's behalf
    Call(ServiceCall),
    /// Stop the worker
    Shutdown,
}

/// Messages sent from the worker to UI
#[derive(Debug, Clone)]
pub enum WorkerToUi {
    /// Outcome of a previously sent call
    Reply { ticket: Ticket, outcome: CallOutcome },
}
