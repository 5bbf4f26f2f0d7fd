// SPDX-License-Identifier: MIT OR Apache-2.0

use gomoku_core::engine::SearchEngine;
use gomoku_core::protocol::{
    DecisionRequest, DecisionResponse, LegalityRequest, LegalityResponse, ServiceReply,
    ServiceRequest,
};
use gomoku_core::rules::FiveInRow;
use gomoku_core::service::serve_lines;
use gomoku_core::{
    drive, Board, Color, Coord, DecisionService, LegalityService, MatchController, Phase,
    ServiceError, SessionConfig,
};
use serde_json::json;

#[test]
fn decision_request_wire_shape() {
    let mut board = Board::new(9).unwrap();
    board.place(Coord::new(4, 4), Color::Black).unwrap();

    let req = DecisionRequest::new(&board.snapshot(), Color::White, 3);
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["current_player"], json!(2));
    assert_eq!(value["depth"], json!(3));
    assert_eq!(value["board"][4][4], json!(1));
    assert_eq!(value["board"].as_array().unwrap().len(), 9);

    // camelCase field name from older servers is still accepted
    let legacy: DecisionRequest = serde_json::from_value(json!({
        "board": value["board"].clone(),
        "currentPlayer": 2,
        "depth": 3,
    }))
    .unwrap();
    assert_eq!(legacy, req);
}

#[test]
fn legality_response_without_winner_field() {
    let resp: LegalityResponse = serde_json::from_str(r#"{"is_win": false}"#).unwrap();
    assert_eq!(resp, LegalityResponse::no_win());
    assert_eq!(resp.validate(Color::Black), Ok(None));

    let resp: LegalityResponse = serde_json::from_str(r#"{"is_win": true, "winner": 1}"#).unwrap();
    assert_eq!(resp.validate(Color::Black), Ok(Some(Color::Black)));
    assert!(resp.validate(Color::White).is_err());
}

#[test]
fn envelope_is_tagged_by_method() {
    let board = Board::new(9).unwrap();
    let req = ServiceRequest::CheckWin(LegalityRequest::new(&board.snapshot(), Coord::new(2, 3)));
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["method"], json!("check_win"));
    assert_eq!(value["params"]["row"], json!(2));
    assert_eq!(value["params"]["col"], json!(3));
}

#[test]
fn remote_error_reply_round_trips() {
    let reply: ServiceReply = serde_json::from_str(r#"{"error":"No valid move found"}"#).unwrap();
    assert_eq!(
        reply.into_result::<DecisionResponse>(),
        Err(ServiceError::Remote("No valid move found".into()))
    );
}

/// Pushes every call through the line protocol and the built-in services,
/// exercising the same encoding a child process would see.
struct Loopback;

impl Loopback {
    fn roundtrip(&self, request: ServiceRequest) -> ServiceReply {
        let line = serde_json::to_string(&request).unwrap();
        let mut out = Vec::new();
        let handled = serve_lines(
            format!("{line}\n").as_bytes(),
            &mut out,
            &mut SearchEngine::new(),
            &mut FiveInRow,
        )
        .unwrap();
        assert_eq!(handled, 1);
        serde_json::from_slice(&out).unwrap()
    }
}

impl DecisionService for Loopback {
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionResponse, ServiceError> {
        self.roundtrip(ServiceRequest::Decide(request.clone())).into_result()
    }
}

impl LegalityService for Loopback {
    fn check_win(&mut self, request: &LegalityRequest) -> Result<LegalityResponse, ServiceError> {
        self.roundtrip(ServiceRequest::CheckWin(request.clone())).into_result()
    }
}

#[test]
fn controller_over_line_protocol() {
    let mut c = MatchController::new(SessionConfig {
        search_depth: 2,
        ..SessionConfig::default()
    })
    .unwrap();
    let call = c.start(9, Color::White).unwrap();
    drive(&mut c, call, &mut Loopback, &mut Loopback);
    assert_eq!(c.session().board().stone_count(), 1);
    assert_eq!(c.phase(), Phase::HumanTurn);

    let call = c.play(Coord::new(0, 0)).unwrap();
    drive(&mut c, Some(call), &mut Loopback, &mut Loopback);
    assert_eq!(c.session().board().stone_count(), 3);
    assert_eq!(c.phase(), Phase::HumanTurn);
}

#[test]
fn full_board_reports_remote_error() {
    let mut board = Board::new(2).unwrap();
    for (i, (r, col)) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
        let color = if i % 2 == 0 { Color::Black } else { Color::White };
        board.place(Coord::new(r, col), color).unwrap();
    }
    let req = DecisionRequest::new(&board.snapshot(), Color::Black, 1);
    assert_eq!(
        Loopback.decide(&req),
        Err(ServiceError::Remote("No valid move found".into()))
    );
}
