// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service interfaces and transports.
//!
//! The match controller talks to two collaborators: a decision service that
//! picks the opponent's move and a legality service that decides whether a
//! placement wins. Both are plain traits so they can be backed by the
//! in-process reference implementations, by a child process speaking
//! line-delimited JSON, or by scripted fakes in tests.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::protocol::{
    DecisionRequest, DecisionResponse, LegalityRequest, LegalityResponse, ServiceReply,
    ServiceRequest,
};

/// Failure of an external service call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// I/O or process failure while talking to the service
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded or violates the contract
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The service reported an error
    #[error("service error: {0}")]
    Remote(String),

    /// The service is gone (worker stopped, process exited)
    #[error("service unavailable")]
    Unavailable,
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

/// Selects the opponent's next move
pub trait DecisionService: Send {
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionResponse, ServiceError>;
}

/// Decides whether the stone just placed completes a win
pub trait LegalityService: Send {
    fn check_win(&mut self, request: &LegalityRequest) -> Result<LegalityResponse, ServiceError>;
}

impl<F> DecisionService for F
where
    F: FnMut(&DecisionRequest) -> Result<DecisionResponse, ServiceError> + Send,
{
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionResponse, ServiceError> {
        self(request)
    }
}

impl<F> LegalityService for F
where
    F: FnMut(&LegalityRequest) -> Result<LegalityResponse, ServiceError> + Send,
{
    fn check_win(&mut self, request: &LegalityRequest) -> Result<LegalityResponse, ServiceError> {
        self(request)
    }
}

struct ProcessInner {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Both services backed by one child process speaking the line protocol.
///
/// Cloning shares the same process; calls are serialized.
#[derive(Clone)]
pub struct ProcessService {
    program: String,
    inner: Arc<Mutex<ProcessInner>>,
}

impl ProcessService {
    /// Spawn `program args...` with piped stdin/stdout
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, ServiceError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ServiceError::Transport("child stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ServiceError::Transport("child stdout not captured".into()))?;

        info!(program, pid = child.id(), "Spawned service process");

        Ok(Self {
            program: program.to_string(),
            inner: Arc::new(Mutex::new(ProcessInner {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            })),
        })
    }

    fn call<T: DeserializeOwned>(&self, request: &ServiceRequest) -> Result<T, ServiceError> {
        let line =
            serde_json::to_string(request).map_err(|e| ServiceError::Malformed(e.to_string()))?;

        let mut inner = self.inner.lock();
        writeln!(inner.stdin, "{line}")?;
        inner.stdin.flush()?;

        let mut reply = String::new();
        let read = inner.stdout.read_line(&mut reply)?;
        if read == 0 {
            let status = inner.child.try_wait()?;
            warn!(program = %self.program, ?status, "Service process closed its output");
            return Err(ServiceError::Transport(format!(
                "{} exited ({:?})",
                self.program, status
            )));
        }
        drop(inner);

        debug!(reply = reply.trim_end(), "Service reply");
        let reply: ServiceReply =
            serde_json::from_str(&reply).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        reply.into_result()
    }
}

impl DecisionService for ProcessService {
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionResponse, ServiceError> {
        self.call(&ServiceRequest::Decide(request.clone()))
    }
}

impl LegalityService for ProcessService {
    fn check_win(&mut self, request: &LegalityRequest) -> Result<LegalityResponse, ServiceError> {
        self.call(&ServiceRequest::CheckWin(request.clone()))
    }
}

impl Drop for ProcessInner {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("Service process already gone: {}", e);
        }
        match self.child.wait() {
            Ok(status) => debug!(%status, "Service process reaped"),
            Err(e) => debug!("Failed to reap service process: {}", e),
        }
    }
}

/// Serve the line protocol: one JSON request per input line, one JSON
/// reply per output line. Returns the number of requests handled once the
/// input is exhausted.
pub fn serve_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    decision: &mut dyn DecisionService,
    legality: &mut dyn LegalityService,
) -> std::io::Result<usize> {
    let mut handled = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => dispatch(line.trim(), decision, legality),
            Err(e) => {
                warn!("Request is not UTF-8: {}", e);
                ServiceReply::err("bad request: invalid UTF-8")
            }
        };

        let out = serde_json::to_string(&reply)
            .unwrap_or_else(|e| format!(r#"{{"error":"encode failed: {e}"}}"#));
        writeln!(writer, "{out}")?;
        writer.flush()?;
        handled += 1;
    }

    Ok(handled)
}

fn dispatch(
    line: &str,
    decision: &mut dyn DecisionService,
    legality: &mut dyn LegalityService,
) -> ServiceReply {
    match serde_json::from_str::<ServiceRequest>(line) {
        Ok(ServiceRequest::Decide(req)) => {
            debug!(depth = req.depth, player = req.current_player, "decide");
            to_reply(decision.decide(&req))
        }
        Ok(ServiceRequest::CheckWin(req)) => {
            debug!(row = req.row, col = req.col, "check_win");
            to_reply(legality.check_win(&req))
        }
        Err(e) => {
            warn!("Unparseable request: {}", e);
            ServiceReply::err(format!("bad request: {e}"))
        }
    }
}

fn to_reply<T: serde::Serialize>(result: Result<T, ServiceError>) -> ServiceReply {
    match result.and_then(|value| ServiceReply::ok(&value)) {
        Ok(reply) => reply,
        Err(ServiceError::Remote(message)) => ServiceReply::err(message),
        Err(e) => ServiceReply::err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::Coord;

    #[test]
    fn serve_lines_dispatches_both_methods() {
        let board = Board::new(9).unwrap();
        let decide = serde_json::to_string(&ServiceRequest::Decide(DecisionRequest::new(
            &board.snapshot(),
            crate::Color::White,
            2,
        )))
        .unwrap();
        let check = serde_json::to_string(&ServiceRequest::CheckWin(LegalityRequest::new(
            &board.snapshot(),
            Coord::new(0, 0),
        )))
        .unwrap();
        let input = format!("{decide}\n\n{check}\nnot json\n");

        let mut decision =
            |_: &DecisionRequest| Ok::<_, ServiceError>(DecisionResponse { row: 4, col: 5 });
        let mut legality = |_: &LegalityRequest| Ok::<_, ServiceError>(LegalityResponse::no_win());
        let mut out = Vec::new();
        let handled =
            serve_lines(input.as_bytes(), &mut out, &mut decision, &mut legality).unwrap();
        assert_eq!(handled, 3);

        let lines: Vec<ServiceReply> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let first: DecisionResponse = lines[0].clone().into_result().unwrap();
        assert_eq!(first, DecisionResponse { row: 4, col: 5 });
        let second: LegalityResponse = lines[1].clone().into_result().unwrap();
        assert!(!second.is_win);
        assert!(lines[2].error.is_some());
    }

    #[test]
    fn invalid_utf8_line_gets_an_error_reply() {
        let board = Board::new(9).unwrap();
        let check = serde_json::to_string(&ServiceRequest::CheckWin(LegalityRequest::new(
            &board.snapshot(),
            Coord::new(0, 0),
        )))
        .unwrap();
        let mut input = vec![0xff, 0xfe, b'\n'];
        input.extend_from_slice(check.as_bytes());
        input.push(b'\n');

        let mut decision = |_: &DecisionRequest| Err::<DecisionResponse, _>(ServiceError::Unavailable);
        let mut legality = |_: &LegalityRequest| Ok::<_, ServiceError>(LegalityResponse::no_win());
        let mut out = Vec::new();
        let handled =
            serve_lines(input.as_slice(), &mut out, &mut decision, &mut legality).unwrap();
        assert_eq!(handled, 2);

        let replies: Vec<ServiceReply> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies[0].error.as_deref(), Some("bad request: invalid UTF-8"));
        let answered: LegalityResponse = replies[1].clone().into_result().unwrap();
        assert!(!answered.is_win);
    }

    #[test]
    fn remote_errors_keep_their_message() {
        let reply = to_reply::<DecisionResponse>(Err(ServiceError::Remote("No valid move found".into())));
        assert_eq!(reply.error.as_deref(), Some("No valid move found"));
    }
}
