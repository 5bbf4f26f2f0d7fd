// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main application: owns the match controller, forwards service calls to
//! the worker and paints the board.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use gomoku_core::{
    Board, BoardView, CallKind, CallOutcome, Color, Coord, MatchController, Phase, ServiceCall,
    ServiceError,
};
use tracing::{debug, error, warn};

use crate::appearance::{Appearance, AppearanceHub};
use crate::components::{BoardInteraction, BoardRenderer, ControlAction, GameControls, GameStatus};
use crate::msg::{UiToWorker, WorkerToUi};
use crate::palette::Palette;
use crate::ui_config::UiConfig;
use crate::worker::{spawn_worker, Services};

/// How often to poll for worker replies while a call is outstanding
const PENDING_REPAINT: Duration = Duration::from_millis(30);

pub struct App {
    controller: MatchController,
    renderer: BoardRenderer,
    interaction: BoardInteraction,
    /// Size currently selected in the setup slider
    chosen_size: u8,
    /// Upper bound on the board's pixel budget
    max_budget: f32,
    worker_tx: Sender<UiToWorker>,
    worker_rx: Receiver<WorkerToUi>,
    worker: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(controller: MatchController, ui_config: &UiConfig, services: Services) -> anyhow::Result<Self> {
        let (worker_tx, net_rx) = unbounded();
        let (net_tx, worker_rx) = unbounded();
        let worker = spawn_worker(services, net_rx, net_tx)?;

        let chosen_size = controller.config().default_board_size;
        Ok(Self {
            controller,
            renderer: BoardRenderer::new(&ui_config.board, AppearanceHub::global().subscribe()),
            interaction: BoardInteraction::new(),
            chosen_size,
            max_budget: ui_config.board.viewport_budget,
            worker_tx,
            worker_rx,
            worker: Some(worker),
        })
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    /// Apply a control action
    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::Start { size, human } => match self.controller.start(size, human) {
                Ok(call) => self.dispatch(call),
                Err(e) => warn!(error = %e, "Could not start match"),
            },
            ControlAction::Undo => {
                if let Err(e) = self.controller.undo() {
                    debug!(error = %e, "Undo ignored");
                }
            }
            ControlAction::Retry => {
                let call = self.controller.retry_opponent();
                self.dispatch(call);
            }
            ControlAction::NewGame => self.controller.new_game(),
        }
    }

    /// Human clicked an intersection. Rejected placements are ignored.
    pub fn click(&mut self, coord: Coord) {
        match self.controller.play(coord) {
            Ok(call) => self.dispatch(Some(call)),
            Err(e) => debug!(error = %e, %coord, "Placement ignored"),
        }
    }

    /// Drain worker replies into the controller
    pub fn poll_worker(&mut self) {
        while let Ok(msg) = self.worker_rx.try_recv() {
            match msg {
                WorkerToUi::Reply { ticket, outcome } => {
                    let next = self.controller.resolve(ticket, outcome);
                    self.dispatch(next);
                }
            }
        }
    }

    fn dispatch(&mut self, mut call: Option<ServiceCall>) {
        while let Some(next) = call.take() {
            let ticket = next.ticket;
            let unavailable = match &next.kind {
                CallKind::Decision(_) => CallOutcome::Decision(Err(ServiceError::Unavailable)),
                CallKind::Legality(_) => CallOutcome::Legality(Err(ServiceError::Unavailable)),
            };
            if self.worker_tx.send(UiToWorker::Call(next)).is_ok() {
                return;
            }
            error!("Service worker is gone");
            call = self.controller.resolve(ticket, unavailable);
        }
    }

    /// Board shown in the central panel. During setup this is an empty
    /// preview of the selected size.
    fn current_view(&self) -> BoardView {
        if self.controller.phase() == Phase::Setup {
            if let Ok(board) = Board::new(self.chosen_size) {
                return BoardView {
                    snapshot: board.snapshot(),
                    last_move: None,
                    revision: 0,
                };
            }
        }
        self.controller.view()
    }

    fn human_to_move(&self) -> Option<Color> {
        (self.controller.phase() == Phase::HumanTurn).then(|| self.controller.session().human())
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        AppearanceHub::global().publish(Appearance::from_dark_mode(ctx.style().visuals.dark_mode));
        self.poll_worker();

        let palette = Palette::for_appearance(self.renderer.appearance());
        let mut action = None;

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            GameStatus::render(ui, &self.controller, &palette);
            action = if self.controller.phase() == Phase::Setup {
                GameControls::setup(ui, &self.controller, &mut self.chosen_size)
            } else {
                GameControls::in_game(ui, &self.controller)
            };
            ui.add_space(4.0);
        });

        if let Some(action) = action {
            self.apply(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let budget = ui.available_size().min_elem().min(self.max_budget).max(1.0);
            self.renderer.set_budget(budget);

            let view = self.current_view();
            let (response, geometry) = ui
                .vertical_centered(|ui| self.renderer.show(ui, &view))
                .inner;

            let clicked = self.interaction.handle(&response, &geometry);

            if let (Some(color), Some(hover)) = (self.human_to_move(), self.interaction.hover()) {
                if view.snapshot.get(hover).is_some_and(|c| c.is_empty()) {
                    let ghost = self.renderer.ghost(&geometry, response.rect.min, hover, color);
                    ui.painter_at(response.rect).add(ghost);
                }
            }

            if let Some(coord) = clicked {
                self.click(coord);
            }
        });

        if self.controller.phase().is_awaiting() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.worker_tx.send(UiToWorker::Shutdown);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("Service worker panicked");
            }
        }
    }
}
