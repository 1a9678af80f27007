use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::{DuelSettings, InputSource};
use crate::duel::DuelMachine;
use crate::error::DuelError;
use crate::puzzle::FaceTally;
use crate::types::{Move, Phase, Status};

/// One external trigger, as the core saw it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputRecord {
    Move { competitor: usize, mv: Move },
    Key { key: char },
    Tick,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimedInput {
    pub at_ms: u64,
    pub input: InputRecord,
}

/// A full recorded round: settings, the input timeline, and the statuses it
/// ended in. Re-feeding the timeline through a fresh machine must reproduce
/// the recorded end state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchLog {
    pub time_limit_ms: u64,
    pub num_competitors: usize,
    pub started_at_ms: u64,
    pub inputs: Vec<TimedInput>,
    pub final_statuses: Vec<Status>,
    pub final_phase: Phase,
}

impl MatchLog {
    pub fn new(time_limit_ms: u64, num_competitors: usize, started_at_ms: u64) -> Self {
        MatchLog {
            time_limit_ms,
            num_competitors,
            started_at_ms,
            inputs: Vec::new(),
            final_statuses: Vec::new(),
            final_phase: Phase::Ready,
        }
    }

    pub fn record(&mut self, at_ms: u64, input: InputRecord) {
        self.inputs.push(TimedInput { at_ms, input });
    }

    /// Captures the end state from a finished machine.
    pub fn seal(&mut self, machine: &DuelMachine) {
        self.final_statuses = machine.competitors().iter().map(|c| c.status()).collect();
        self.final_phase = machine.phase();
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_json())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("replay could not start: {0}")]
    Start(DuelError),
    #[error("replay input rejected: {0}")]
    Input(DuelError),
    #[error("competitor {index} ended {got}, log says {expected}")]
    StatusMismatch {
        index: usize,
        expected: Status,
        got: Status,
    },
    #[error("phase ended {got:?}, log says {expected:?}")]
    PhaseMismatch { expected: Phase, got: Phase },
}

/// Deterministically re-runs a recorded round and checks the end state.
pub fn replay_match(log: &MatchLog) -> Result<(), ReplayError> {
    let mut machine = DuelMachine::new(DuelSettings {
        num_competitors: log.num_competitors,
        time_limit_ms: log.time_limit_ms,
    });
    for _ in 0..log.num_competitors {
        machine.add_competitor(InputSource::Keyboard, Box::new(FaceTally::new()));
    }
    machine.start_round(log.started_at_ms).map_err(ReplayError::Start)?;

    for entry in &log.inputs {
        match entry.input {
            InputRecord::Move { competitor, mv } => machine
                .on_move(competitor, mv, entry.at_ms)
                .map_err(ReplayError::Input)?,
            InputRecord::Key { key } => machine.on_key(key, entry.at_ms),
            InputRecord::Tick => machine.tick(entry.at_ms),
        }
    }

    for (index, competitor) in machine.competitors().iter().enumerate() {
        let expected = log.final_statuses[index];
        let got = competitor.status();
        if got != expected {
            return Err(ReplayError::StatusMismatch {
                index,
                expected,
                got,
            });
        }
    }
    if machine.phase() != log.final_phase {
        return Err(ReplayError::PhaseMismatch {
            expected: log.final_phase,
            got: machine.phase(),
        });
    }
    Ok(())
}

pub fn load_log(path: &Path) -> Option<MatchLog> {
    let content = fs::read_to_string(path).ok()?;
    MatchLog::from_json(&content).ok()
}
