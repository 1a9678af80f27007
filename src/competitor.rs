use tracing::debug;

use crate::config::InputSource;
use crate::error::DuelError;
use crate::puzzle::{MoveLog, PuzzleTracker};
use crate::stats::format_time;
use crate::timer::CountdownTimer;
use crate::types::{CompetitorSignal, DisplayState, Move, MoveFamily, Status, Verdict};

/// The full status legality table. Every `set*` operation funnels through
/// here; an illegal request leaves the competitor untouched.
pub(crate) fn transition(index: usize, from: Status, to: Status) -> Result<Status, DuelError> {
    use Status::*;
    let legal = match to {
        Inactive => true,
        BeingScrambled => matches!(from, Inactive | Waiting | Scrambling),
        Scrambling => matches!(from, Inactive | BeingScrambled | Waiting),
        TakingTurn => matches!(from, Waiting | Scrambling | BeingScrambled),
        Waiting => matches!(from, Inactive | BeingScrambled | Scrambling | TakingTurn | Waiting),
        Won => matches!(from, TakingTurn | Waiting),
        Lost => matches!(from, TakingTurn | Waiting),
        Tied => matches!(from, Waiting | Scrambling | BeingScrambled | TakingTurn),
    };
    if legal {
        Ok(to)
    } else {
        Err(DuelError::InvalidTransition { index, from, to })
    }
}

/// One participant: status automaton, countdown timer, move tracking, and
/// the seam to its puzzle sensor. All time-dependent operations take the
/// caller's clock as `now_ms`.
pub struct Competitor {
    index: usize,
    status: Status,
    timer: CountdownTimer,
    move_counter: u32,
    turn_family: Option<MoveFamily>,
    trigger: char,
    input_source: InputSource,
    puzzle: Box<dyn PuzzleTracker>,
    solution: MoveLog,
}

impl Competitor {
    pub fn new(
        index: usize,
        trigger: char,
        input_source: InputSource,
        puzzle: Box<dyn PuzzleTracker>,
    ) -> Self {
        Competitor {
            index,
            status: Status::Inactive,
            timer: CountdownTimer::new(0),
            move_counter: 0,
            turn_family: None,
            trigger,
            input_source,
            puzzle,
            solution: MoveLog::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    pub fn input_source(&self) -> InputSource {
        self.input_source
    }

    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    pub fn turn_family(&self) -> Option<MoveFamily> {
        self.turn_family
    }

    pub fn ms_remaining(&self, now_ms: u64) -> u64 {
        self.timer.sample(now_ms)
    }

    pub fn solution(&self) -> &MoveLog {
        &self.solution
    }

    fn set_status(&mut self, to: Status) -> Result<(), DuelError> {
        let next = transition(self.index, self.status, to)?;
        debug!(competitor = self.index, from = %self.status, to = %next, "status change");
        self.status = next;
        Ok(())
    }

    /// Back to `Inactive` with a fresh time budget. Legal from any status.
    pub fn reset(&mut self, time_limit_ms: u64) {
        self.status = Status::Inactive;
        self.timer.set(time_limit_ms);
        self.move_counter = 0;
        self.turn_family = None;
        self.solution.clear();
        self.puzzle.reset();
    }

    /// This competitor's puzzle is being scrambled by someone else; its own
    /// clock does not run.
    pub fn set_being_scrambled(&mut self) -> Result<(), DuelError> {
        self.set_status(Status::BeingScrambled)
    }

    pub fn set_scrambling(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.set_status(Status::Scrambling)?;
        self.timer.start(now_ms);
        Ok(())
    }

    pub fn set_taking_turn(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.set_status(Status::TakingTurn)?;
        self.timer.start(now_ms);
        Ok(())
    }

    pub fn set_waiting(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.set_status(Status::Waiting)?;
        self.timer.stop(now_ms);
        self.turn_family = None;
        Ok(())
    }

    pub fn set_won(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.finish(Status::Won, now_ms)
    }

    pub fn set_lost(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.finish(Status::Lost, now_ms)
    }

    pub fn set_tied(&mut self, now_ms: u64) -> Result<(), DuelError> {
        self.finish(Status::Tied, now_ms)
    }

    fn finish(&mut self, terminal: Status, now_ms: u64) -> Result<(), DuelError> {
        self.set_status(terminal)?;
        self.timer.stop(now_ms);
        self.turn_family = None;
        Ok(())
    }

    /// Timeout loss. Forced: bypasses the legality table and dominates
    /// whatever operation observed the exhausted budget.
    fn force_lost(&mut self, now_ms: u64) -> CompetitorSignal {
        debug!(competitor = self.index, from = %self.status, "time budget exhausted");
        self.status = Status::Lost;
        self.timer.stop(now_ms);
        self.turn_family = None;
        CompetitorSignal::Finished(Verdict::Lost)
    }

    fn timed_out(&self, now_ms: u64) -> bool {
        self.status.is_running() && self.timer.sample(now_ms) == 0
    }

    /// Periodic timer sampling while the round runs. Idempotent between
    /// real clock changes.
    pub fn on_time_tick(&mut self, now_ms: u64) -> Result<Option<CompetitorSignal>, DuelError> {
        if !matches!(
            self.status,
            Status::Scrambling | Status::TakingTurn | Status::Waiting
        ) {
            return Err(DuelError::IllegalOperation {
                index: self.index,
                op: "time tick",
                from: self.status,
            });
        }
        if self.timed_out(now_ms) {
            return Ok(Some(self.force_lost(now_ms)));
        }
        Ok(None)
    }

    /// A discrete move from this competitor's sensor. Legal in any status;
    /// what it means depends on where the automaton is.
    pub fn on_move_event(
        &mut self,
        mv: Move,
        now_ms: u64,
    ) -> Result<Option<CompetitorSignal>, DuelError> {
        if self.timed_out(now_ms) {
            return Ok(Some(self.force_lost(now_ms)));
        }
        match self.status {
            // Setup phases and finished rounds absorb moves: the tracker
            // stays in sync with the physical puzzle, nothing else changes.
            Status::Inactive | Status::BeingScrambled | Status::Won | Status::Lost
            | Status::Tied => {
                self.puzzle.apply_move(mv);
                Ok(None)
            }
            // Moving while waiting for one's turn is an illegal early move.
            Status::Waiting => {
                self.finish(Status::Lost, now_ms)?;
                Ok(Some(CompetitorSignal::Finished(Verdict::Lost)))
            }
            // The scrambler's own puzzle moved mid-scramble: the round
            // cannot be salvaged for anyone, so the whole duel ties.
            Status::Scrambling => {
                self.finish(Status::Tied, now_ms)?;
                Ok(Some(CompetitorSignal::Finished(Verdict::Tied)))
            }
            Status::TakingTurn => self.solving_move(mv, now_ms),
        }
    }

    fn solving_move(
        &mut self,
        mv: Move,
        now_ms: u64,
    ) -> Result<Option<CompetitorSignal>, DuelError> {
        self.puzzle.apply_move(mv);

        let mismatch = self
            .turn_family
            .is_some_and(|family| family != mv.family);
        if self.turn_family.is_none() {
            self.turn_family = Some(mv.family);
        }
        if !mismatch {
            self.solution.push(mv);
            self.move_counter = self.solution.len() as u32;
        }

        // The solved check runs after the family check and wins the
        // tie-break: a mismatched move that happens to finish the solve
        // still counts as a win.
        if self.puzzle.is_solved() {
            self.finish(Status::Won, now_ms)?;
            return Ok(Some(CompetitorSignal::Finished(Verdict::Won)));
        }
        if mismatch {
            debug!(
                competitor = self.index,
                locked = %self.turn_family.map(|f| f.letter()).unwrap_or('?'),
                moved = %mv.family,
                "turn-family violation"
            );
            self.finish(Status::Lost, now_ms)?;
            return Ok(Some(CompetitorSignal::Finished(Verdict::Lost)));
        }
        Ok(None)
    }

    /// Voluntary turn completion via this competitor's bound trigger. The
    /// transition to `Waiting` happens before the orchestrator hears about
    /// it, so the binding is consumed exactly once per press.
    pub fn on_turn_end_signal(
        &mut self,
        key: char,
        now_ms: u64,
    ) -> Result<Option<CompetitorSignal>, DuelError> {
        if key != self.trigger {
            return Ok(None);
        }
        if !matches!(self.status, Status::Scrambling | Status::TakingTurn) {
            return Err(DuelError::IllegalOperation {
                index: self.index,
                op: "turn-end signal",
                from: self.status,
            });
        }
        if self.timed_out(now_ms) {
            return Ok(Some(self.force_lost(now_ms)));
        }
        self.set_status(Status::Waiting)?;
        self.timer.stop(now_ms);
        self.turn_family = None;
        Ok(Some(CompetitorSignal::TurnDone))
    }

    #[cfg(test)]
    pub(crate) fn force_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Snapshot for the rendering sink.
    pub fn display(&self, now_ms: u64) -> DisplayState {
        DisplayState {
            time_text: format_time(self.timer.sample(now_ms)),
            move_count: self.move_counter,
            status_class: self.status.class(),
            solution: self.solution.to_notation(),
        }
    }
}
