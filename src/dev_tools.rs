//! Development tools for dev builds.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::game::duel_visualizer::DuelSession;

const DUMP_STATE_KEY: KeyCode = KeyCode::F1;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        dump_game_state.run_if(input_just_pressed(DUMP_STATE_KEY)),
    );
}

fn dump_game_state(session_query: Query<&DuelSession>) {
    for session in &session_query {
        match serde_json::to_string_pretty(&session.0) {
            Ok(json) => info!("game state:\n{json}"),
            Err(e) => warn!("could not serialize game state: {e}"),
        }
    }
}
