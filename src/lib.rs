mod competitor;
mod config;
mod duel;
mod error;
mod input;
mod logging;
mod puzzle;
mod stats;
mod timer;
mod types;

#[cfg(feature = "bevy")]
mod hud;
#[cfg(feature = "bevy")]
mod plugin;

pub use competitor::*;
pub use config::*;
pub use duel::*;
pub use error::*;
pub use input::*;
pub use logging::*;
pub use puzzle::*;
pub use stats::*;
pub use timer::*;
pub use types::*;

#[cfg(feature = "bevy")]
pub use hud::*;
#[cfg(feature = "bevy")]
pub use plugin::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn duel_of(n: usize, time_limit_ms: u64) -> DuelMachine {
        let mut machine = DuelMachine::new(DuelSettings {
            num_competitors: n,
            time_limit_ms,
        });
        for _ in 0..n {
            machine.add_competitor(InputSource::Keyboard, Box::new(Scripted::never_solved()));
        }
        machine
    }

    fn statuses(machine: &DuelMachine) -> Vec<Status> {
        machine.competitors().iter().map(|c| c.status()).collect()
    }

    /// Three competitors, 10 s budget: scramble hand-off order, the flip
    /// into solving, and a turn-family violation deciding the round.
    #[test]
    fn three_way_duel_end_to_end() {
        let mut machine = duel_of(3, 10_000);
        machine.start_round(0).unwrap();
        assert_eq!(
            statuses(&machine),
            vec![Status::Scrambling, Status::Inactive, Status::BeingScrambled]
        );

        machine.on_key('1', 1_000);
        assert_eq!(
            statuses(&machine),
            vec![Status::Waiting, Status::Scrambling, Status::Waiting]
        );

        machine.on_key('2', 2_000);
        assert_eq!(
            statuses(&machine),
            vec![Status::Waiting, Status::Waiting, Status::Scrambling]
        );

        machine.on_key('3', 3_000);
        assert_eq!(machine.phase(), Phase::Solving);
        assert_eq!(
            statuses(&machine),
            vec![Status::TakingTurn, Status::Waiting, Status::Waiting]
        );

        machine.on_move(0, Move::cw(MoveFamily::R), 4_000).unwrap();
        assert_eq!(machine.competitors()[0].turn_family(), Some(MoveFamily::R));
        machine.on_move(0, Move::cw(MoveFamily::U), 5_000).unwrap();
        assert_eq!(
            statuses(&machine),
            vec![Status::Lost, Status::Won, Status::Won]
        );
    }

    #[test]
    fn a_win_broadcasts_losses() {
        let mut machine = DuelMachine::new(DuelSettings {
            num_competitors: 3,
            time_limit_ms: 60_000,
        });
        machine.add_competitor(InputSource::Keyboard, Box::new(Scripted::solved_after(1)));
        machine.add_competitor(InputSource::Keyboard, Box::new(Scripted::never_solved()));
        machine.add_competitor(InputSource::Keyboard, Box::new(Scripted::never_solved()));

        machine.start_round(0).unwrap();
        for key in ['1', '2', '3'] {
            machine.on_key(key, 1_000);
        }
        assert_eq!(machine.competitors()[0].status(), Status::TakingTurn);
        machine.on_move(0, Move::cw(MoveFamily::F), 2_000).unwrap();
        assert_eq!(
            statuses(&machine),
            vec![Status::Won, Status::Lost, Status::Lost]
        );
    }

    #[test]
    fn an_early_move_broadcasts_wins() {
        let mut machine = duel_of(3, 60_000);
        machine.start_round(0).unwrap();
        for key in ['1', '2', '3'] {
            machine.on_key(key, 1_000);
        }
        // Competitor 1 twists while waiting for its turn.
        machine.on_move(1, Move::cw(MoveFamily::R), 2_000).unwrap();
        assert_eq!(
            statuses(&machine),
            vec![Status::Won, Status::Lost, Status::Won]
        );
    }

    #[test]
    fn a_scramble_disturbance_broadcasts_ties() {
        let mut machine = duel_of(3, 60_000);
        machine.start_round(0).unwrap();
        machine.on_key('1', 1_000);
        // Competitor 1 is mid-scramble; its own puzzle moving fouls the round.
        machine.on_move(1, Move::cw(MoveFamily::B), 2_000).unwrap();
        assert_eq!(
            statuses(&machine),
            vec![Status::Tied, Status::Tied, Status::Tied]
        );
    }

    #[test]
    fn waiting_freezes_time_across_turns() {
        let mut machine = duel_of(2, 10_000);
        machine.start_round(0).unwrap();
        machine.on_key('1', 3_000);
        let frozen = machine.competitors()[0].ms_remaining(3_000);
        assert_eq!(frozen, 7_000);
        machine.tick(8_000);
        assert_eq!(machine.competitors()[0].ms_remaining(8_000), 7_000);
        // Budget resumes from the frozen value once the turn starts.
        machine.on_key('2', 9_000);
        assert_eq!(machine.competitors()[0].status(), Status::TakingTurn);
        assert_eq!(machine.competitors()[0].ms_remaining(10_000), 6_000);
    }

    #[test]
    fn duplicate_turn_keys_are_consumed_once() {
        let mut machine = duel_of(3, 60_000);
        machine.start_round(0).unwrap();
        machine.on_key('1', 1_000);
        let after_first = statuses(&machine);
        assert_eq!(machine.cursor(), 1);
        // The same press delivered again: competitor 0 no longer holds the
        // binding, so nothing changes.
        machine.on_key('1', 1_001);
        assert_eq!(statuses(&machine), after_first);
        assert_eq!(machine.cursor(), 1);
    }

    #[test]
    fn failed_start_leaves_prior_round_intact() {
        let mut machine = DuelMachine::new(DuelSettings {
            num_competitors: 1,
            time_limit_ms: 10_000,
        });
        machine.add_competitor(InputSource::Keyboard, Box::new(Scripted::never_solved()));
        assert!(machine.start_round(0).is_err());
        assert_eq!(machine.phase(), Phase::Ready);
        assert_eq!(machine.competitors()[0].status(), Status::Inactive);
    }

    #[test]
    fn rounds_are_repeatable_after_reset() {
        let mut machine = duel_of(2, 10_000);
        machine.start_round(0).unwrap();
        machine.on_key('1', 1_000);
        machine.on_key('2', 2_000);
        machine.on_move(0, Move::cw(MoveFamily::R), 3_000).unwrap();
        machine.on_move(0, Move::cw(MoveFamily::U), 4_000).unwrap();
        assert_eq!(statuses(&machine), vec![Status::Lost, Status::Won]);

        machine.start_round(10_000).unwrap();
        assert_eq!(machine.phase(), Phase::Scrambling);
        assert_eq!(
            statuses(&machine),
            vec![Status::Scrambling, Status::BeingScrambled]
        );
        assert_eq!(machine.competitors()[0].ms_remaining(10_000), 10_000);
        assert_eq!(machine.competitors()[0].move_counter(), 0);
    }

    #[test]
    fn moves_into_unknown_slots_are_errors() {
        let mut machine = duel_of(2, 10_000);
        machine.start_round(0).unwrap();
        assert_eq!(
            machine.on_move(5, Move::cw(MoveFamily::R), 100),
            Err(DuelError::UnknownCompetitor { index: 5 })
        );
    }
}
