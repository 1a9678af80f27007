#![cfg(feature = "bevy")]
use bevy::prelude::*;

use crate::plugin::{DuelRuntime, FmcDuelSettings};
use crate::types::{Phase, Status};

pub fn systems() -> impl Plugin {
    HudPlugin
}

struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_lines);
    }
}

#[derive(Component)]
struct PhaseLine;

#[derive(Component)]
struct CompetitorLine {
    index: usize,
}

fn setup_hud(mut commands: Commands, settings: Res<FmcDuelSettings>) {
    commands.spawn((
        TextBundle::from_section(
            "press SPACE to start a round",
            TextStyle {
                font_size: 26.0,
                color: Color::srgb(0.7, 0.7, 0.7),
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        }),
        PhaseLine,
    ));

    for index in 0..settings.num_competitors {
        commands.spawn((
            TextBundle::from_section(
                "",
                TextStyle {
                    font_size: 34.0,
                    color: Color::WHITE,
                    ..default()
                },
            )
            .with_style(Style {
                position_type: PositionType::Absolute,
                top: Val::Px(64.0 + 48.0 * index as f32),
                left: Val::Px(16.0),
                ..default()
            }),
            CompetitorLine { index },
        ));
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Won => Color::srgb(0.2, 0.9, 0.2),
        Status::Lost => Color::srgb(0.9, 0.2, 0.2),
        Status::Tied => Color::srgb(0.9, 0.9, 0.2),
        Status::TakingTurn | Status::Scrambling => Color::WHITE,
        Status::BeingScrambled => Color::srgb(0.6, 0.6, 0.9),
        Status::Waiting | Status::Inactive => Color::srgb(0.5, 0.5, 0.5),
    }
}

fn update_lines(
    rt: Res<DuelRuntime>,
    time: Res<Time>,
    mut phase_line: Query<&mut Text, (With<PhaseLine>, Without<CompetitorLine>)>,
    mut lines: Query<(&CompetitorLine, &mut Text), Without<PhaseLine>>,
) {
    let now_ms = (time.elapsed_seconds_f64() * 1000.0) as u64;

    if let Ok(mut text) = phase_line.get_single_mut() {
        text.sections[0].value = match rt.machine.phase() {
            Phase::Ready => "press SPACE to start a round".to_string(),
            Phase::Scrambling => format!("scrambling: competitor {}", rt.machine.cursor() + 1),
            Phase::Solving => format!("solving: competitor {}", rt.machine.cursor() + 1),
        };
    }

    for (line, mut text) in lines.iter_mut() {
        let Some(competitor) = rt.machine.competitor(line.index) else {
            continue;
        };
        let display = competitor.display(now_ms);
        text.sections[0].value = format!(
            "[{}] {:>9}  {:2} moves  {}  {}",
            competitor.trigger(),
            display.time_text,
            display.move_count,
            display.status_class,
            display.solution,
        );
        text.sections[0].style.color = status_color(competitor.status());
    }
}
