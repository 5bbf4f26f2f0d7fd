// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match controller: the turn state machine around the board model.
//!
//! The controller performs no I/O. Whenever a transition needs the decision
//! or legality service it hands back a [`ServiceCall`]; the host runs it
//! (on a worker thread, inline, or against a fake) and feeds the outcome
//! back through [`MatchController::resolve`]. While a call is outstanding the
//! phase is one of the `Awaiting*` states and every human input is
//! rejected.
//!
//! ```text
//! Setup ──start──▶ HumanTurn ──play──▶ AwaitingLegality ──win──▶ GameOver
//!   ▲                  ▲                    │
//!   │                  │                    ├─(human moved)──▶ OpponentTurn ─▶ AwaitingDecision
//!   │                  └──(opponent moved)──┘                                        │
//!   │                                        AwaitingLegality ◀──────placement──────┘
//!   └──────────────── new_game (from any phase)
//! ```

use tracing::{debug, info, warn};

use crate::board::{Board, BoardSnapshot, BoardView, MoveHistory};
use crate::config::SessionConfig;
use crate::protocol::{DecisionRequest, DecisionResponse, LegalityRequest, LegalityResponse};
use crate::service::{DecisionService, LegalityService, ServiceError};
use crate::{Color, Coord, GameError, Move};

/// State machine value gating which inputs are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Board size and color not chosen yet
    Setup,
    /// Waiting for the human to place a stone
    HumanTurn,
    /// A placement is committed and the legality service is deciding
    AwaitingLegality,
    /// The opponent is to move but no request is outstanding. Only reached
    /// when a decision request failed and has not been retried.
    OpponentTurn,
    /// Waiting for the decision service
    AwaitingDecision,
    /// Terminal: a win (or a full board) ended the match
    GameOver,
}

impl Phase {
    /// Whether an external call is outstanding
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Phase::AwaitingLegality | Phase::AwaitingDecision)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::HumanTurn => "human-turn",
            Phase::AwaitingLegality => "awaiting-legality",
            Phase::OpponentTurn => "opponent-turn",
            Phase::AwaitingDecision => "awaiting-decision",
            Phase::GameOver => "game-over",
        };
        f.write_str(name)
    }
}

/// Identifies one outstanding service call.
///
/// `epoch` changes on every new session, so replies for a discarded game
/// never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub epoch: u64,
    pub seq: u64,
}

/// Request the host must perform on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Decision(DecisionRequest),
    Legality(LegalityRequest),
}

/// A service call plus the ticket its reply must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub ticket: Ticket,
    pub kind: CallKind,
}

impl ServiceCall {
    /// Perform the call synchronously
    pub fn execute(
        &self,
        decision: &mut dyn DecisionService,
        legality: &mut dyn LegalityService,
    ) -> CallOutcome {
        match &self.kind {
            CallKind::Decision(req) => CallOutcome::Decision(decision.decide(req)),
            CallKind::Legality(req) => CallOutcome::Legality(legality.check_win(req)),
        }
    }
}

/// Result of a performed [`ServiceCall`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Decision(Result<DecisionResponse, ServiceError>),
    Legality(Result<LegalityResponse, ServiceError>),
}

/// What the status line should say
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Choosing board size and color
    Selecting,
    /// Human may place a stone
    HumanToMove,
    /// Waiting on the services
    OpponentThinking,
    /// Match ended with a winner
    Won { winner: Color, human_won: bool },
    /// Board filled up without a winner
    Draw,
    /// The opponent's move could not be obtained
    Error(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Selecting => write!(f, "Choose a board size and your color"),
            Status::HumanToMove => write!(f, "Your move"),
            Status::OpponentThinking => write!(f, "Opponent is thinking..."),
            Status::Won { winner, human_won: true } => write!(f, "You win as {winner}!"),
            Status::Won { winner, human_won: false } => write!(f, "{winner} wins. Better luck next time."),
            Status::Draw => write!(f, "Board is full: draw"),
            Status::Error(message) => write!(f, "Opponent failed to move: {message}"),
        }
    }
}

/// Aggregate state of one match
#[derive(Debug, Clone)]
pub struct MatchSession {
    board: Board,
    history: MoveHistory,
    turn: Color,
    human: Color,
    winner: Option<Color>,
    phase: Phase,
}

impl MatchSession {
    fn new(size: u8, human: Color) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(size)?,
            history: MoveHistory::new(),
            turn: Color::Black,
            human,
            winner: None,
            phase: Phase::Setup,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Color to move
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn opponent(&self) -> Color {
        self.human.opposite()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }
}

/// Bookkeeping for the single outstanding call
#[derive(Debug, Clone)]
struct Pending {
    ticket: Ticket,
    /// Board the request was built from
    snapshot: BoardSnapshot,
    /// Player whose placement is being checked (legality calls)
    mover: Color,
}

/// Owns the session and sequences turns around the external services
#[derive(Debug)]
pub struct MatchController {
    config: SessionConfig,
    session: MatchSession,
    epoch: u64,
    next_seq: u64,
    pending: Option<Pending>,
    last_error: Option<String>,
    revision: u64,
}

impl MatchController {
    pub fn new(config: SessionConfig) -> Result<Self, GameError> {
        let session = MatchSession::new(config.default_board_size, config.default_human_color)?;
        Ok(Self {
            config,
            session,
            epoch: 0,
            next_seq: 0,
            pending: None,
            last_error: None,
            revision: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Message from the most recent failed decision request
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Ticket of the outstanding call, if any
    pub fn pending(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Change counter for renderers
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Projection handed to renderers
    pub fn view(&self) -> BoardView {
        BoardView {
            snapshot: self.session.snapshot(),
            last_move: self.session.history.last().copied(),
            revision: self.revision,
        }
    }

    pub fn status(&self) -> Status {
        match self.session.phase {
            Phase::Setup => Status::Selecting,
            Phase::HumanTurn => Status::HumanToMove,
            Phase::AwaitingLegality | Phase::AwaitingDecision => Status::OpponentThinking,
            Phase::OpponentTurn => match &self.last_error {
                Some(message) => Status::Error(message.clone()),
                None => Status::OpponentThinking,
            },
            Phase::GameOver => match self.session.winner {
                Some(winner) => Status::Won {
                    winner,
                    human_won: winner == self.session.human,
                },
                None => Status::Draw,
            },
        }
    }

    /// Begin a match. If the human took White the opponent's first move
    /// is requested immediately.
    pub fn start(&mut self, size: u8, human: Color) -> Result<Option<ServiceCall>, GameError> {
        if !self.config.accepts_size(size) {
            return Err(GameError::InvalidBoardSize {
                size,
                min: self.config.min_board_size,
                max: self.config.max_board_size,
            });
        }

        self.reset_session(MatchSession::new(size, human)?);
        info!(size, human = %human, epoch = self.epoch, "Match started");

        if human == Color::Black {
            self.session.phase = Phase::HumanTurn;
            Ok(None)
        } else {
            Ok(Some(self.request_decision()))
        }
    }

    /// Human placement. Rejected without side effects unless it is the
    /// human's turn and the cell is empty.
    pub fn play(&mut self, coord: Coord) -> Result<ServiceCall, GameError> {
        match self.session.phase {
            Phase::HumanTurn => {}
            Phase::Setup => return Err(GameError::NoSession),
            Phase::GameOver => return Err(GameError::SessionOver),
            Phase::AwaitingLegality | Phase::AwaitingDecision => {
                return Err(GameError::AwaitingService)
            }
            Phase::OpponentTurn => return Err(GameError::NotHumanTurn),
        }

        let human = self.session.human;
        let mv = self.commit(coord, human)?;
        debug!(row = coord.row, col = coord.col, seq = mv.seq, "Human placed stone");
        Ok(self.request_legality(coord, human))
    }

    /// Feed back the outcome of a call previously handed out
    pub fn resolve(&mut self, ticket: Ticket, outcome: CallOutcome) -> Option<ServiceCall> {
        match outcome {
            CallOutcome::Decision(result) => self.resolve_decision(ticket, result),
            CallOutcome::Legality(result) => self.resolve_legality(ticket, result),
        }
    }

    /// Legality verdict for the last placement. Service failures count as
    /// "no win" so the match stays playable.
    pub fn resolve_legality(
        &mut self,
        ticket: Ticket,
        result: Result<LegalityResponse, ServiceError>,
    ) -> Option<ServiceCall> {
        let pending = self.take_pending(ticket, Phase::AwaitingLegality)?;
        let mover = pending.mover;

        let winner = match result.and_then(|resp| resp.validate(mover)) {
            Ok(winner) => winner,
            Err(e) => {
                warn!(error = %e, "Legality check failed, assuming no win");
                None
            }
        };

        if let Some(winner) = winner {
            info!(winner = %winner, moves = self.session.history.len(), "Match won");
            self.session.winner = Some(winner);
            self.session.phase = Phase::GameOver;
            self.bump();
            return None;
        }

        if self.session.board.is_full() {
            info!("Board full, match drawn");
            self.session.phase = Phase::GameOver;
            self.bump();
            return None;
        }

        self.session.turn = mover.opposite();
        if mover == self.session.human {
            Some(self.request_decision())
        } else {
            self.session.phase = Phase::HumanTurn;
            None
        }
    }

    /// Opponent move from the decision service. The returned cell is
    /// re-validated against the board the request was built from; an
    /// illegal answer is handled like any other service failure.
    pub fn resolve_decision(
        &mut self,
        ticket: Ticket,
        result: Result<DecisionResponse, ServiceError>,
    ) -> Option<ServiceCall> {
        let pending = self.take_pending(ticket, Phase::AwaitingDecision)?;
        let opponent = self.session.opponent();

        let placed = result
            .and_then(|resp| resp.validate(&pending.snapshot))
            .and_then(|coord| {
                self.commit(coord, opponent)
                    .map_err(|e| ServiceError::Malformed(e.to_string()))
            });

        match placed {
            Ok(mv) => {
                debug!(row = mv.coord.row, col = mv.coord.col, seq = mv.seq, "Opponent placed stone");
                Some(self.request_legality(mv.coord, opponent))
            }
            Err(e) => {
                warn!(error = %e, "Decision service failed, move not applied");
                self.session.phase = Phase::OpponentTurn;
                self.last_error = Some(e.to_string());
                self.bump();
                None
            }
        }
    }

    /// Re-issue the opponent's move after a failed decision request
    pub fn retry_opponent(&mut self) -> Option<ServiceCall> {
        if self.session.phase != Phase::OpponentTurn {
            return None;
        }
        info!("Retrying opponent move");
        self.last_error = None;
        Some(self.request_decision())
    }

    /// Undo needs a completed round: it is the human's turn and the last
    /// two moves are the opponent's reply and the human's move before it.
    pub fn can_undo(&self) -> bool {
        self.session.phase == Phase::HumanTurn
            && self.session.history.len() >= 2
            && self
                .session
                .history
                .last()
                .is_some_and(|mv| mv.player == self.session.opponent())
    }

    /// Rewind one full round. A no-op returning an error when unavailable.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if !self.can_undo() {
            return Err(GameError::UndoUnavailable);
        }

        for _ in 0..2 {
            if let Some(mv) = self.session.history.pop() {
                self.session.board.clear(mv.coord)?;
            }
        }
        self.session.winner = None;
        self.session.turn = self.session.human;
        self.session.phase = Phase::HumanTurn;
        self.last_error = None;
        self.bump();

        debug!(moves = self.session.history.len(), "Undid one round");
        Ok(())
    }

    /// Discard the session and return to size/color selection. Replies to
    /// calls issued before this point are ignored.
    pub fn new_game(&mut self) {
        let size = self.session.board.size();
        let human = self.session.human;
        match MatchSession::new(size, human) {
            Ok(session) => self.reset_session(session),
            Err(e) => warn!(error = %e, "Could not recreate session"),
        }
        info!(epoch = self.epoch, "New game");
    }

    fn reset_session(&mut self, session: MatchSession) {
        self.epoch += 1;
        self.next_seq = 0;
        self.pending = None;
        self.last_error = None;
        self.session = session;
        self.bump();
    }

    fn commit(&mut self, coord: Coord, player: Color) -> Result<Move, GameError> {
        self.session.board.place(coord, player)?;
        match self.session.history.push(coord, player) {
            Ok(mv) => {
                self.bump();
                Ok(mv)
            }
            Err(e) => {
                self.session.board.clear(coord)?;
                Err(e)
            }
        }
    }

    fn request_legality(&mut self, coord: Coord, mover: Color) -> ServiceCall {
        let snapshot = self.session.snapshot();
        let request = LegalityRequest::new(&snapshot, coord);
        let ticket = self.issue(snapshot, mover);
        self.session.phase = Phase::AwaitingLegality;
        ServiceCall {
            ticket,
            kind: CallKind::Legality(request),
        }
    }

    fn request_decision(&mut self) -> ServiceCall {
        let opponent = self.session.opponent();
        self.session.turn = opponent;
        self.session.phase = Phase::OpponentTurn;

        let snapshot = self.session.snapshot();
        let request = DecisionRequest::new(&snapshot, opponent, self.config.search_depth);
        let ticket = self.issue(snapshot, opponent);
        self.session.phase = Phase::AwaitingDecision;
        debug!(epoch = ticket.epoch, seq = ticket.seq, "Requesting opponent move");
        ServiceCall {
            ticket,
            kind: CallKind::Decision(request),
        }
    }

    fn issue(&mut self, snapshot: BoardSnapshot, mover: Color) -> Ticket {
        let ticket = Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending = Some(Pending {
            ticket,
            snapshot,
            mover,
        });
        ticket
    }

    fn take_pending(&mut self, ticket: Ticket, expected: Phase) -> Option<Pending> {
        let matches = self.session.phase == expected
            && self.pending.as_ref().is_some_and(|p| p.ticket == ticket);
        if !matches {
            debug!(?ticket, phase = %self.session.phase, "Ignoring stale service reply");
            return None;
        }
        self.pending.take()
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

/// Run calls inline until the controller has nothing outstanding
pub fn drive(
    controller: &mut MatchController,
    mut call: Option<ServiceCall>,
    decision: &mut dyn DecisionService,
    legality: &mut dyn LegalityService,
) {
    while let Some(next) = call.take() {
        let outcome = next.execute(decision, legality);
        call = controller.resolve(next.ticket, outcome);
    }
}
