//! The single HUD line: a start prompt until someone steers, then
//! FPS / level / score / best score.

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};

use crate::game::duel_visualizer::DuelSession;
use crate::AppSet;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(FrameTimeDiagnosticsPlugin);
    app.add_systems(Startup, spawn_hud);
    app.add_systems(Update, update_hud.in_set(AppSet::Update));
}

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD"),
        HudText,
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 18.0,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(4.0),
            left: Val::Px(6.0),
            ..default()
        }),
    ));
}

fn update_hud(
    diagnostics: Res<DiagnosticsStore>,
    session_query: Query<&DuelSession>,
    mut text_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(session) = session_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let game = &session.0;
    text.sections[0].value = if !game.any_started() {
        "Press the arrow keys (P1) or WASD (P2) to start".to_string()
    } else {
        let fps = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed())
            .unwrap_or(0.0);
        format!(
            "FPS: {fps:.2} Level: {} Score: {} Best Score: {}",
            game.level, game.score, game.best_score
        )
    };
}
