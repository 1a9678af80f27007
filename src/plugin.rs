#![cfg(feature = "bevy")]
use std::path::Path;

use bevy::prelude::*;
use tracing::warn;

use crate::config::{DuelSettings, InputSource};
use crate::duel::DuelMachine;
use crate::input::{classify, InputAction};
use crate::logging::{InputRecord, MatchLog};
use crate::puzzle::FaceTally;
use crate::types::{Phase, Status};

/// Front-end knobs; the core settings plus nothing else for now.
#[derive(Debug, Clone, Resource)]
pub struct FmcDuelSettings {
    pub num_competitors: usize,
    pub time_limit_ms: u64,
}

impl Default for FmcDuelSettings {
    fn default() -> Self {
        let core = DuelSettings::default();
        Self {
            num_competitors: core.num_competitors,
            time_limit_ms: core.time_limit_ms,
        }
    }
}

#[derive(Resource)]
pub struct DuelRuntime {
    pub machine: DuelMachine,
    pub log: MatchLog,
    last_statuses: Vec<Status>,
    saved: bool,
}

/// A round just started.
#[derive(Event)]
pub struct RoundCue;

/// The turn moved to a new competitor.
#[derive(Event)]
pub struct HandoffCue {
    pub competitor: usize,
}

/// The round resolved; every competitor holds its outcome.
#[derive(Event)]
pub struct OutcomeCue;

pub struct FmcDuelPlugin;

impl Plugin for FmcDuelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FmcDuelSettings>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_event::<RoundCue>()
            .add_event::<HandoffCue>()
            .add_event::<OutcomeCue>()
            .add_plugins(crate::hud::systems())
            .add_systems(Startup, setup)
            .add_systems(Update, (update_time, read_input, react_outcomes));
    }
}

fn setup(mut commands: Commands, settings: Res<FmcDuelSettings>) {
    commands.spawn(Camera2dBundle::default());
    let mut machine = DuelMachine::new(DuelSettings {
        num_competitors: settings.num_competitors,
        time_limit_ms: settings.time_limit_ms,
    });
    for _ in 0..settings.num_competitors {
        machine.add_competitor(InputSource::Keyboard, Box::new(FaceTally::new()));
    }
    let count = machine.competitors().len();
    commands.insert_resource(DuelRuntime {
        machine,
        log: MatchLog::new(settings.time_limit_ms, settings.num_competitors, 0),
        last_statuses: vec![Status::Inactive; count],
        saved: false,
    });
}

fn now_ms(time: &Time) -> u64 {
    (time.elapsed_seconds_f64() * 1000.0) as u64
}

fn update_time(mut rt: ResMut<DuelRuntime>, time: Res<Time>) {
    let now = now_ms(&time);
    let rt = rt.as_mut();
    let before: Vec<Status> = rt.machine.competitors().iter().map(|c| c.status()).collect();
    rt.machine.tick(now);
    let after: Vec<Status> = rt.machine.competitors().iter().map(|c| c.status()).collect();
    // Only ticks that changed something matter for replay.
    if after != before {
        rt.log.record(now, InputRecord::Tick);
    }
}

/// Keyboard moves are routed to whichever puzzle is live: the one being
/// scrambled during the scramble phase, the current solver afterwards.
fn move_target(machine: &DuelMachine) -> Option<usize> {
    match machine.phase() {
        Phase::Ready => None,
        Phase::Scrambling => Some(machine.slot(-1)),
        Phase::Solving => Some(machine.cursor()),
    }
}

fn read_input(
    mut rt: ResMut<DuelRuntime>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut round_tx: EventWriter<RoundCue>,
) {
    let now = now_ms(&time);
    let rt = rt.as_mut();

    if keys.just_pressed(KeyCode::Space) {
        match rt.machine.start_round(now) {
            Ok(()) => {
                rt.log = MatchLog::new(
                    rt.machine.settings().time_limit_ms,
                    rt.machine.competitors().len(),
                    now,
                );
                rt.saved = false;
                round_tx.send(RoundCue);
            }
            Err(err) => warn!(%err, "round not started"),
        }
        return;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        rt.machine.reset();
        return;
    }

    for key in keys.get_just_pressed() {
        let Some(ch) = keycode_char(*key) else { continue };
        match classify(ch) {
            InputAction::Move(mv) => {
                let Some(target) = move_target(&rt.machine) else { continue };
                if rt.machine.competitors()[target].input_source() != InputSource::Keyboard {
                    continue;
                }
                rt.log.record(now, InputRecord::Move { competitor: target, mv });
                if let Err(err) = rt.machine.on_move(target, mv, now) {
                    warn!(%err, "move dropped");
                }
            }
            InputAction::TurnEnd(trigger) => {
                rt.log.record(now, InputRecord::Key { key: trigger });
                rt.machine.on_key(trigger, now);
            }
        }
    }
}

fn react_outcomes(
    mut rt: ResMut<DuelRuntime>,
    mut handoff_tx: EventWriter<HandoffCue>,
    mut outcome_tx: EventWriter<OutcomeCue>,
) {
    let rt = rt.as_mut();
    let current: Vec<Status> = rt.machine.competitors().iter().map(|c| c.status()).collect();
    if current == rt.last_statuses {
        return;
    }
    if let Some(index) = current.iter().position(|s| *s == Status::TakingTurn) {
        if rt.last_statuses.get(index) != Some(&Status::TakingTurn) {
            handoff_tx.send(HandoffCue { competitor: index });
        }
    }
    if current.iter().any(|s| s.is_terminal()) && !rt.saved {
        rt.log.seal(&rt.machine);
        if let Err(err) = rt.log.save(Path::new("fmc_duel_log.json")) {
            warn!(%err, "could not save the match log");
        }
        rt.saved = true;
        outcome_tx.send(OutcomeCue);
    }
    rt.last_statuses = current;
}

/// Only the keys the duel understands: the twelve face-move keys plus the
/// digit triggers.
fn keycode_char(key: KeyCode) -> Option<char> {
    let ch = match key {
        KeyCode::KeyI => 'i',
        KeyCode::KeyK => 'k',
        KeyCode::KeyJ => 'j',
        KeyCode::KeyF => 'f',
        KeyCode::KeyH => 'h',
        KeyCode::KeyG => 'g',
        KeyCode::KeyD => 'd',
        KeyCode::KeyE => 'e',
        KeyCode::KeyS => 's',
        KeyCode::KeyL => 'l',
        KeyCode::KeyW => 'w',
        KeyCode::KeyO => 'o',
        KeyCode::Digit0 => '0',
        KeyCode::Digit1 => '1',
        KeyCode::Digit2 => '2',
        KeyCode::Digit3 => '3',
        KeyCode::Digit4 => '4',
        KeyCode::Digit5 => '5',
        KeyCode::Digit6 => '6',
        KeyCode::Digit7 => '7',
        KeyCode::Digit8 => '8',
        KeyCode::Digit9 => '9',
        _ => return None,
    };
    Some(ch)
}
