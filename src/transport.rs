use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::event::AppEvent;
use crate::notation::parse_alg;
use crate::notation::token::MoveToken;

/// Typed event stream from a smart cube. Only `Move` and the one-time
/// `Facelets` snapshot affect matching; the rest drive UI affordances.
/// Gyro frames arrive at a high rate on real hardware and are dropped
/// unprocessed.
#[derive(Clone, Debug, PartialEq)]
pub enum CubeEvent {
    Move { token: MoveToken, timestamp_ms: f64 },
    Facelets(String),
    Gyro,
    Hardware(String),
    Battery(u8),
    Disconnect,
}

/// One entry of a recorded trace file. Traces are JSON arrays captured
/// from a real session, e.g.
/// `[{"facelets": "UUU..."}, {"move": {"notation": "R", "timestamp_ms": 120.0}}]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    Facelets(String),
    Move {
        notation: String,
        timestamp_ms: f64,
        #[serde(default)]
        delay_ms: u64,
    },
    Gyro,
    Hardware(String),
    Battery(u8),
    Disconnect,
}

/// Feeds a recorded trace into the event loop as if a cube were
/// connected; the keyboard fallback and this are the two move sources.
pub struct ReplayTransport {
    events: Vec<TraceEvent>,
}

impl ReplayTransport {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading replay trace {}", path.display()))?;
        let events: Vec<TraceEvent> = serde_json::from_str(&content)
            .with_context(|| format!("parsing replay trace {}", path.display()))?;
        Ok(Self { events })
    }

    pub fn from_events(events: Vec<TraceEvent>) -> Self {
        Self { events }
    }

    /// Replay on a background thread, honoring per-event delays. Ends
    /// with a `Disconnect` so the UI returns to its unplugged state.
    pub fn spawn(self, tx: mpsc::Sender<AppEvent>) {
        thread::spawn(move || {
            for event in self.events {
                let cube_event = match event {
                    TraceEvent::Facelets(snapshot) => CubeEvent::Facelets(snapshot),
                    TraceEvent::Move {
                        notation,
                        timestamp_ms,
                        delay_ms,
                    } => {
                        if delay_ms > 0 {
                            thread::sleep(Duration::from_millis(delay_ms));
                        }
                        match trace_token(&notation) {
                            Some(token) => CubeEvent::Move {
                                token,
                                timestamp_ms,
                            },
                            None => continue,
                        }
                    }
                    TraceEvent::Gyro => CubeEvent::Gyro,
                    TraceEvent::Hardware(name) => CubeEvent::Hardware(name),
                    TraceEvent::Battery(level) => CubeEvent::Battery(level),
                    TraceEvent::Disconnect => CubeEvent::Disconnect,
                };
                if tx.send(AppEvent::Cube(cube_event)).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::Cube(CubeEvent::Disconnect));
        });
    }
}

fn trace_token(notation: &str) -> Option<MoveToken> {
    let mut tokens = parse_alg(notation).ok()?;
    if tokens.len() == 1 { tokens.pop() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn collect(events: Vec<TraceEvent>) -> Vec<CubeEvent> {
        let (tx, rx) = mpsc::channel();
        ReplayTransport::from_events(events).spawn(tx);
        let mut out = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            match event {
                AppEvent::Cube(cube) => out.push(cube),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn replays_moves_in_order_and_appends_disconnect() {
        let trace = vec![
            TraceEvent::Facelets("UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB".into()),
            TraceEvent::Move {
                notation: "R".into(),
                timestamp_ms: 0.0,
                delay_ms: 0,
            },
            TraceEvent::Move {
                notation: "U'".into(),
                timestamp_ms: 140.0,
                delay_ms: 0,
            },
        ];
        let events = collect(trace);
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], CubeEvent::Facelets(_)));
        assert!(
            matches!(&events[1], CubeEvent::Move { token, .. } if token.to_string() == "R")
        );
        assert!(
            matches!(&events[2], CubeEvent::Move { token, .. } if token.to_string() == "U'")
        );
        assert_eq!(events[3], CubeEvent::Disconnect);
    }

    #[test]
    fn unparseable_trace_moves_are_skipped() {
        let trace = vec![TraceEvent::Move {
            notation: "??".into(),
            timestamp_ms: 0.0,
            delay_ms: 0,
        }];
        let events = collect(trace);
        assert_eq!(events, vec![CubeEvent::Disconnect]);
    }

    #[test]
    fn trace_round_trips_through_json() {
        let trace = vec![
            TraceEvent::Move {
                notation: "R".into(),
                timestamp_ms: 10.0,
                delay_ms: 5,
            },
            TraceEvent::Battery(80),
        ];
        let json = serde_json::to_string(&trace).unwrap();
        let back: Vec<TraceEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(json.contains("\"move\""));
        assert!(json.contains("\"battery\""));
    }
}
