use std::path::Path;

use fmc_duel::{load_log, replay_match};

fn main() {
    // Simple CLI: --replay <path> verifies a recorded round without graphics.
    let mut args = std::env::args().skip(1);
    if let Some(cmd) = args.next() {
        if cmd == "--replay" {
            if let Some(path) = args.next() {
                init_diagnostics();
                replay(&path);
                return;
            }
            eprintln!("usage: fmc_duel [--replay <path>]");
            return;
        }
    }

    run_app();
}

fn init_diagnostics() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn replay(path: &str) {
    match load_log(Path::new(path)) {
        Some(log) => match replay_match(&log) {
            Ok(()) => println!(
                "Replay OK: {} competitors, {} inputs, ended {:?}",
                log.num_competitors,
                log.inputs.len(),
                log.final_statuses
            ),
            Err(err) => eprintln!("Replay FAILED: {err}"),
        },
        None => eprintln!("Failed to load replay: {path}"),
    }
}

#[cfg(feature = "bevy")]
fn run_app() {
    use bevy::prelude::*;
    use fmc_duel::{FmcDuelPlugin, FmcDuelSettings};

    App::new()
        .insert_resource(FmcDuelSettings::default())
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "FMC Duel".into(),
                    resolution: (1280., 720.).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
            FmcDuelPlugin,
        ))
        .run();
}

#[cfg(not(feature = "bevy"))]
fn run_app() {
    eprintln!("built without the bevy front-end; only --replay <path> is available");
}
