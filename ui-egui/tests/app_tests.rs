// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::{Duration, Instant};

use gomoku_core::engine::SearchEngine;
use gomoku_core::protocol::{DecisionRequest, DecisionResponse, LegalityRequest, LegalityResponse};
use gomoku_core::rules::FiveInRow;
use gomoku_core::{Cell, Color, Coord, MatchController, Phase, ServiceError, SessionConfig};
use gomoku_ui_egui::components::ControlAction;
use gomoku_ui_egui::worker::Services;
use gomoku_ui_egui::{App, UiConfig};

fn app_with(services: Services) -> App {
    let controller = MatchController::new(SessionConfig::default()).unwrap();
    App::new(controller, &UiConfig::default(), services).unwrap()
}

fn builtin() -> Services {
    Services {
        decision: Box::new(SearchEngine::new()),
        legality: Box::new(FiveInRow),
    }
}

/// Poll until nothing is outstanding
fn settle(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.controller().pending().is_some() {
        assert!(Instant::now() < deadline, "worker did not answer");
        app.poll_worker();
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn white_player_waits_for_opening_move() {
    let mut app = app_with(builtin());
    app.apply(ControlAction::Start {
        size: 15,
        human: Color::White,
    });
    assert_eq!(app.controller().phase(), Phase::AwaitingDecision);

    // ignored until the worker answers
    app.click(Coord::new(0, 0));
    settle(&mut app);

    let board = app.controller().session().board();
    assert_eq!(board.get(Coord::new(7, 7)), Some(Cell::Black));
    assert_eq!(board.get(Coord::new(0, 0)), Some(Cell::Empty));
    assert_eq!(app.controller().phase(), Phase::HumanTurn);
}

#[test]
fn click_undo_and_new_game() {
    let mut app = app_with(builtin());
    app.apply(ControlAction::Start {
        size: 9,
        human: Color::Black,
    });
    app.click(Coord::new(4, 4));
    settle(&mut app);
    assert_eq!(app.controller().session().history().len(), 2);

    app.apply(ControlAction::Undo);
    assert_eq!(app.controller().session().history().len(), 0);

    // reply to this placement arrives after the reset and is dropped
    app.click(Coord::new(2, 2));
    app.apply(ControlAction::NewGame);
    std::thread::sleep(Duration::from_millis(50));
    app.poll_worker();
    assert_eq!(app.controller().phase(), Phase::Setup);
    assert_eq!(app.controller().session().board().stone_count(), 0);
}

#[test]
fn retry_after_failed_decision() {
    let mut attempts = 0;
    let decision = move |_req: &DecisionRequest| {
        attempts += 1;
        if attempts == 1 {
            Err(ServiceError::Transport("engine crashed".into()))
        } else {
            Ok(DecisionResponse { row: 0, col: 0 })
        }
    };
    let legality = |_req: &LegalityRequest| Ok::<_, ServiceError>(LegalityResponse::no_win());
    let mut app = app_with(Services {
        decision: Box::new(decision),
        legality: Box::new(legality),
    });

    app.apply(ControlAction::Start {
        size: 9,
        human: Color::Black,
    });
    app.click(Coord::new(4, 4));
    settle(&mut app);
    assert_eq!(app.controller().phase(), Phase::OpponentTurn);
    assert_eq!(app.controller().session().board().stone_count(), 1);

    app.apply(ControlAction::Retry);
    settle(&mut app);
    assert_eq!(app.controller().phase(), Phase::HumanTurn);
    assert_eq!(
        app.controller().session().board().get(Coord::new(0, 0)),
        Some(Cell::White)
    );
}
