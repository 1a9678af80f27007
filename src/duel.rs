use tracing::{debug, info, warn};

use crate::competitor::Competitor;
use crate::config::{default_trigger, DuelSettings, InputSource};
use crate::error::DuelError;
use crate::puzzle::PuzzleTracker;
use crate::types::{CompetitorSignal, Move, Phase, Status, Verdict};

/// Sequences turns across competitors and resolves round outcomes. Sole
/// owner of `phase` and the turn cursor; competitors talk back only through
/// returned signal values.
pub struct DuelMachine {
    settings: DuelSettings,
    competitors: Vec<Competitor>,
    phase: Phase,
    cursor: usize,
}

impl DuelMachine {
    pub fn new(settings: DuelSettings) -> Self {
        DuelMachine {
            settings,
            competitors: Vec::new(),
            phase: Phase::Ready,
            cursor: 0,
        }
    }

    /// Registers a competitor with the default trigger-key policy and
    /// returns its index. Competitors persist across rounds.
    pub fn add_competitor(
        &mut self,
        input_source: InputSource,
        puzzle: Box<dyn PuzzleTracker>,
    ) -> usize {
        let index = self.competitors.len();
        self.add_competitor_with_trigger(default_trigger(index), input_source, puzzle)
    }

    pub fn add_competitor_with_trigger(
        &mut self,
        trigger: char,
        input_source: InputSource,
        puzzle: Box<dyn PuzzleTracker>,
    ) -> usize {
        let index = self.competitors.len();
        self.competitors
            .push(Competitor::new(index, trigger, input_source, puzzle));
        index
    }

    pub fn settings(&self) -> &DuelSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn competitor(&self, index: usize) -> Option<&Competitor> {
        self.competitors.get(index)
    }

    /// Cursor-relative slot, always non-negative.
    pub fn slot(&self, delta: isize) -> usize {
        let n = self.competitors.len() as isize;
        ((self.cursor as isize + n + delta) % n) as usize
    }

    /// Reinitializes every competitor with the configured budget.
    pub fn reset(&mut self) {
        for competitor in &mut self.competitors {
            competitor.reset(self.settings.time_limit_ms);
        }
        self.phase = Phase::Ready;
        self.cursor = 0;
    }

    /// Opens a round: the competitor before the cursor gets scrambled first,
    /// the cursor competitor scrambles. Leaves all state untouched when
    /// there are not enough competitors.
    pub fn start_round(&mut self, now_ms: u64) -> Result<(), DuelError> {
        let count = self.competitors.len();
        if count < 2 {
            return Err(DuelError::NotEnoughCompetitors { count });
        }
        self.reset();
        self.apply(self.slot(-1), |c, _| c.set_being_scrambled(), now_ms);
        self.apply(self.slot(0), |c, now| c.set_scrambling(now), now_ms);
        self.phase = Phase::Scrambling;
        info!(
            competitors = count,
            time_limit_ms = self.settings.time_limit_ms,
            "round started"
        );
        Ok(())
    }

    /// Per-frame driver: samples exactly the competitors whose timers run
    /// and lets each detect its own timeout loss.
    pub fn tick(&mut self, now_ms: u64) {
        for index in 0..self.competitors.len() {
            if !self.competitors[index].status().is_running() {
                continue;
            }
            if let Ok(Some(signal)) = self.competitors[index].on_time_tick(now_ms) {
                self.handle_signal(index, signal, now_ms);
            }
        }
    }

    /// A raw key press. Routed to the competitor whose trigger matches and
    /// whose turn is active; anything else is dropped. The competitor
    /// leaves its active status before the orchestrator reacts, so one
    /// press is consumed at most once.
    pub fn on_key(&mut self, key: char, now_ms: u64) {
        let Some(index) = self.competitors.iter().position(|c| {
            c.trigger() == key && matches!(c.status(), Status::Scrambling | Status::TakingTurn)
        }) else {
            debug!(key = %key, "key press with no active binding, ignoring");
            return;
        };
        match self.competitors[index].on_turn_end_signal(key, now_ms) {
            Ok(Some(signal)) => self.handle_signal(index, signal, now_ms),
            Ok(None) => {}
            Err(err) => warn!(%err, "turn-end signal rejected"),
        }
    }

    /// A move event from one competitor's sensor.
    pub fn on_move(&mut self, index: usize, mv: Move, now_ms: u64) -> Result<(), DuelError> {
        if index >= self.competitors.len() {
            return Err(DuelError::UnknownCompetitor { index });
        }
        if let Some(signal) = self.competitors[index].on_move_event(mv, now_ms)? {
            self.handle_signal(index, signal, now_ms);
        }
        Ok(())
    }

    fn handle_signal(&mut self, index: usize, signal: CompetitorSignal, now_ms: u64) {
        match signal {
            CompetitorSignal::TurnDone => self.turn_done(index, now_ms),
            CompetitorSignal::Finished(verdict) => self.broadcast(index, verdict, now_ms),
        }
    }

    /// Voluntary turn completion. Stale signals (not from the cursor
    /// competitor) are expected from racing inputs and ignored.
    fn turn_done(&mut self, index: usize, now_ms: u64) {
        if index != self.cursor {
            debug!(from = index, cursor = self.cursor, "stale turn signal, ignoring");
            return;
        }
        let count = self.competitors.len();
        match self.phase {
            Phase::Scrambling => {
                if self.cursor < count - 1 {
                    // Shift the scrambling window forward.
                    if count > 2 {
                        self.apply(self.slot(-1), |c, now| c.set_waiting(now), now_ms);
                        self.apply(self.slot(0), |c, now| c.set_waiting(now), now_ms);
                    } else {
                        self.apply(self.slot(0), |c, _| c.set_being_scrambled(), now_ms);
                    }
                    self.cursor += 1;
                    self.apply(self.slot(0), |c, now| c.set_scrambling(now), now_ms);
                } else {
                    // Last scramble done: the duel proper begins.
                    self.apply(self.slot(0), |c, now| c.set_waiting(now), now_ms);
                    let next = self.slot(1);
                    self.phase = Phase::Solving;
                    self.cursor = next;
                    self.apply(next, |c, now| c.set_taking_turn(now), now_ms);
                    info!(first = next, "solving phase");
                }
            }
            Phase::Solving => {
                self.apply(self.slot(0), |c, now| c.set_waiting(now), now_ms);
                let next = self.slot(1);
                self.cursor = next;
                self.apply(next, |c, now| c.set_taking_turn(now), now_ms);
            }
            // The orchestrator is the only writer of `phase` and never
            // routes turn signals outside a running round.
            Phase::Ready => unreachable!("turn completion while no round is running"),
        }
    }

    /// One competitor's terminal outcome ends the round for everyone: the
    /// complement goes to every other competitor. A target whose status
    /// cannot legally take the complement is skipped.
    fn broadcast(&mut self, index: usize, verdict: Verdict, now_ms: u64) {
        info!(competitor = index, ?verdict, "round resolved");
        for other in 0..self.competitors.len() {
            if other == index {
                continue;
            }
            let result = match verdict {
                Verdict::Won => self.competitors[other].set_lost(now_ms),
                Verdict::Lost => self.competitors[other].set_won(now_ms),
                Verdict::Tied => self.competitors[other].set_tied(now_ms),
            };
            if let Err(err) = result {
                warn!(%err, "outcome broadcast skipped a competitor");
            }
        }
    }

    fn apply<F>(&mut self, index: usize, op: F, now_ms: u64)
    where
        F: FnOnce(&mut Competitor, u64) -> Result<(), DuelError>,
    {
        if let Err(err) = op(&mut self.competitors[index], now_ms) {
            warn!(%err, "orchestrated transition rejected");
        }
    }
}
