// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background worker that performs service calls off the UI thread.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use gomoku_core::{DecisionService, LegalityService};
use tracing::{debug, info};

use crate::msg::{UiToWorker, WorkerToUi};

/// Services owned by the worker thread
pub struct Services {
    pub decision: Box<dyn DecisionService>,
    pub legality: Box<dyn LegalityService>,
}

/// Spawn the background worker thread
pub fn spawn_worker(
    services: Services,
    ui_rx: Receiver<UiToWorker>,
    ui_tx: Sender<WorkerToUi>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("service-worker".into())
        .spawn(move || run_worker(services, ui_rx, ui_tx))?;
    Ok(handle)
}

fn run_worker(mut services: Services, ui_rx: Receiver<UiToWorker>, ui_tx: Sender<WorkerToUi>) {
    info!("Service worker started");

    // Exits on Shutdown or when the UI side hangs up
    while let Ok(msg) = ui_rx.recv() {
        match msg {
            UiToWorker::Call(call) => {
                debug!(epoch = call.ticket.epoch, seq = call.ticket.seq, "Performing service call");
                let outcome = call.execute(services.decision.as_mut(), services.legality.as_mut());
                if ui_tx
                    .send(WorkerToUi::Reply {
                        ticket: call.ticket,
                        outcome,
                    })
                    .is_err()
                {
                    break;
                }
            }
            UiToWorker::Shutdown => break,
        }
    }

    info!("Service worker stopped");
}
